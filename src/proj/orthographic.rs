//! Orthographic azimuthal projection (spherical).
//!
//! cos c = sin φ₀ sin φ + cos φ₀ cos φ cos Δλ  (visible hemisphere: cos c ≥ 0)
//! x = a·cos φ sin Δλ,  y = a·(cos φ₀ sin φ - sin φ₀ cos φ cos Δλ)

use std::f64::consts::FRAC_PI_2;

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, EPSLN};
use crate::proj::Projection;

pub struct Orthographic {
    a: f64,
    lat0: f64,
    lon0: f64,
    sin_p0: f64,
    cos_p0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Orthographic::new(params)))
}

impl Orthographic {
    pub fn new(params: &CrsParams) -> Self {
        Self {
            a: params.ellipsoid.a,
            lat0: params.lat0,
            lon0: params.long0,
            sin_p0: params.lat0.sin(),
            cos_p0: params.lat0.cos(),
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for Orthographic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();
        let g = self.sin_p0 * sinphi + self.cos_p0 * cosphi * coslon;
        if g < -EPSLN {
            return Err(ProjError::Domain(
                "ortho: point on the far hemisphere".to_string(),
            ));
        }
        let x = self.a * cosphi * dlon.sin() + self.false_easting;
        let y = self.a * (self.cos_p0 * sinphi - self.sin_p0 * cosphi * coslon) + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        if rh > self.a + 1e-7 {
            return Err(ProjError::Domain(
                "ortho: point outside the projected disc".to_string(),
            ));
        }
        if rh <= EPSLN {
            return Ok((self.lon0, self.lat0));
        }
        let z = asinz(rh / self.a);
        let (sinz, cosz) = z.sin_cos();
        let lat = asinz(cosz * self.sin_p0 + y * sinz * self.cos_p0 / rh);
        let lon = if (self.lat0.abs() - FRAC_PI_2).abs() <= EPSLN {
            if self.lat0 >= 0.0 {
                self.lon0 + x.atan2(-y)
            } else {
                self.lon0 - (-x).atan2(y)
            }
        } else {
            self.lon0 + (x * sinz).atan2(rh * self.cos_p0 * cosz - y * self.sin_p0 * sinz)
        };
        Ok((adjust_lon(lon), lat))
    }
}
