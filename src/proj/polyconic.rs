//! American Polyconic projection.
//!
//! Every parallel is the arc of its own tangent cone:
//!   E = Δλ·sin φ
//!   x = a·m(φ)·sin E / sin φ
//!   y = a·(M(φ) - M(φ₀) + m(φ)·(1 - cos E) / sin φ)
//! The inverse is Snyder's Newton iteration (eq. 18-17).

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, msfn, MeridianSeries};
use crate::proj::Projection;

const EQUATOR_TOL: f64 = 1e-7;
const MAX_ITER: usize = 15;

pub struct Polyconic {
    a: f64,
    es: f64,
    lon0: f64,
    series: MeridianSeries,
    ml0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Polyconic::new(params)))
}

impl Polyconic {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let series = MeridianSeries::new(ell.es);
        Self {
            a: ell.a,
            es: ell.es,
            lon0: params.long0,
            ml0: series.mlfn(params.lat0),
            series,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }

    /// Latitude and `C = tan φ·sqrt(1 - e² sin² φ)` from A = (M₀ + y)/a and
    /// B = (x/a)² + A².
    fn phi4z(&self, a: f64, b: f64) -> Result<(f64, f64), ProjError> {
        let MeridianSeries { e0, e1, e2, e3 } = self.series;
        let mut phi = a;
        for _ in 0..MAX_ITER {
            let sinphi = phi.sin();
            let c = phi.tan() * (1.0 - self.es * sinphi * sinphi).sqrt();
            let sin2ph = (2.0 * phi).sin();
            let ml = self.series.mlfn(phi);
            let mlp = e0 - 2.0 * e1 * (2.0 * phi).cos() + 4.0 * e2 * (4.0 * phi).cos()
                - 6.0 * e3 * (6.0 * phi).cos();
            let con1 = 2.0 * ml + c * (ml * ml + b) - 2.0 * a * (c * ml + 1.0);
            let con2 = self.es * sin2ph * (ml * ml + b - 2.0 * a * ml) / (2.0 * c);
            let con3 = 2.0 * (a - ml) * (c * mlp - 2.0 / sin2ph) - 2.0 * mlp;
            let dphi = con1 / (con2 + con3);
            phi += dphi;
            if dphi.abs() <= 1e-10 {
                let sinphi = phi.sin();
                return Ok((phi, phi.tan() * (1.0 - self.es * sinphi * sinphi).sqrt()));
            }
        }
        Err(ProjError::convergence("poly inverse"))
    }
}

impl Projection for Polyconic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (x, y) = if lat.abs() <= EQUATOR_TOL {
            (self.a * dlon, -self.a * self.ml0)
        } else {
            let sinphi = lat.sin();
            let ms = msfn(lat, self.es);
            let con = dlon * sinphi;
            (
                self.a * ms * con.sin() / sinphi,
                self.a * (self.series.mlfn(lat) - self.ml0 + ms * (1.0 - con.cos()) / sinphi),
            )
        };
        Ok((x + self.false_easting, y + self.false_northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = (x - self.false_easting) / self.a;
        let y = (y - self.false_northing) / self.a;
        let a = self.ml0 + y;
        if a.abs() <= EQUATOR_TOL {
            return Ok((adjust_lon(x + self.lon0), 0.0));
        }
        let b = x * x + a * a;
        let (lat, c) = self.phi4z(a, b)?;
        let lon = adjust_lon(asinz(x * c) / lat.sin() + self.lon0);
        Ok((lon, lat))
    }
}
