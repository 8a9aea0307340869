//! Cylindrical Equal Area projection (Lambert, Behrmann, EASE-Grid 2.0).
//!
//! Sphere:    x = a·Δλ·cos φts,  y = a·sin φ / cos φts
//! Ellipsoid: x = a·k₀·Δλ,       y = a·q(φ) / (2·k₀),  k₀ = m(φts)

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, authlat, authset, msfn, qsfn};
use crate::proj::Projection;

pub struct CylindricalEqualArea {
    a: f64,
    e: f64,
    sphere: bool,
    lon0: f64,
    k0: f64,
    qp: f64,
    apa: [f64; 3],
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(CylindricalEqualArea::new(params)))
}

impl CylindricalEqualArea {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let lat_ts = params.lat_ts.unwrap_or(0.0);
        let k0 = if ell.sphere {
            lat_ts.cos()
        } else {
            msfn(lat_ts, ell.es)
        };
        Self {
            a: ell.a,
            e: ell.e,
            sphere: ell.sphere,
            lon0: params.long0,
            k0,
            qp: qsfn(std::f64::consts::FRAC_PI_2, ell.e),
            apa: authset(ell.es),
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for CylindricalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let x = self.a * self.k0 * adjust_lon(lon - self.lon0);
        let y = if self.sphere {
            self.a * lat.sin() / self.k0
        } else {
            0.5 * self.a * qsfn(lat, self.e) / self.k0
        };
        Ok((x + self.false_easting, y + self.false_northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let lon = adjust_lon(self.lon0 + x / (self.a * self.k0));
        let lat = if self.sphere {
            asinz(y * self.k0 / self.a)
        } else {
            authlat(asinz(2.0 * y * self.k0 / (self.a * self.qp)), &self.apa)
        };
        Ok((lon, lat))
    }
}
