//! Gauss-Schreiber Transverse Mercator (used on Réunion).
//!
//! Conformal sphere of ratio rs, then a spherical transverse Mercator:
//!   L  = rs·(λ - λc),  ls = cp + rs·ψ(φ)      (ψ: isometric latitude)
//!   x  = xs + n₂·atanh(sin L / cosh ls)
//!   y  = ys + n₂·atan(sinh ls / cos L)

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{invlatiso, latiso};
use crate::proj::Projection;

pub struct GaussSchreiber {
    e: f64,
    lc: f64,
    rs: f64,
    cp: f64,
    n2: f64,
    xs: f64,
    ys: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(GaussSchreiber::new(params)))
}

impl GaussSchreiber {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let (e, es) = (ell.e, ell.es);
        let lat0 = params.lat0;
        let sinphi = lat0.sin();

        let rs = (1.0 + es * lat0.cos().powi(4) / (1.0 - es)).sqrt();
        let c = (sinphi / rs).asin();
        let cp = latiso(0.0, c, c.sin()) - rs * latiso(e, lat0, sinphi);
        let n2 = params.k0 * ell.a * (1.0 - es).sqrt() / (1.0 - es * sinphi * sinphi);

        Self {
            e,
            lc: params.long0,
            rs,
            cp,
            n2,
            xs: params.x0,
            ys: params.y0 - n2 * c,
        }
    }
}

impl Projection for GaussSchreiber {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let l = self.rs * (lon - self.lc);
        let ls = self.cp + self.rs * latiso(self.e, lat, lat.sin());
        let lat1 = (l.sin() / ls.cosh()).asin();
        let ls1 = latiso(0.0, lat1, lat1.sin());
        let x = self.xs + self.n2 * ls1;
        let y = self.ys + self.n2 * (ls.sinh() / l.cos()).atan();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let u = (x - self.xs) / self.n2;
        let v = (y - self.ys) / self.n2;
        let l = (u.sinh() / v.cos()).atan();
        let lat1 = (v.sin() / u.cosh()).asin();
        let lc = latiso(0.0, lat1, lat1.sin());
        let lon = self.lc + l / self.rs;
        let lat = invlatiso(self.e, (lc - self.cp) / self.rs)?;
        Ok((lon, lat))
    }
}
