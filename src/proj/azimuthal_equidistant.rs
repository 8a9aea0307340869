//! Azimuthal Equidistant projection (spherical).
//!
//! Distances and directions from the centre are true:
//!   cos z = sin φ₀ sin φ + cos φ₀ cos φ cos Δλ,  k = z / sin z
//!   x = a·k·cos φ sin Δλ,  y = a·k·(cos φ₀ sin φ - sin φ₀ cos φ cos Δλ)

use std::f64::consts::{FRAC_PI_2, PI};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, EPSLN};
use crate::proj::Projection;

pub struct AzimuthalEquidistant {
    a: f64,
    lat0: f64,
    lon0: f64,
    sin_p0: f64,
    cos_p0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(AzimuthalEquidistant {
        a: params.ellipsoid.a,
        lat0: params.lat0,
        lon0: params.long0,
        sin_p0: params.lat0.sin(),
        cos_p0: params.lat0.cos(),
        false_easting: params.x0,
        false_northing: params.y0,
    }))
}

impl Projection for AzimuthalEquidistant {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();
        let g = self.sin_p0 * sinphi + self.cos_p0 * cosphi * coslon;
        let k = if (g.abs() - 1.0).abs() < EPSLN {
            if g < 0.0 {
                return Err(ProjError::Domain(
                    "aeqd: antipode of the centre has no unique position".to_string(),
                ));
            }
            1.0
        } else {
            let z = g.acos();
            z / z.sin()
        };
        let x = self.false_easting + self.a * k * cosphi * dlon.sin();
        let y = self.false_northing
            + self.a * k * (self.cos_p0 * sinphi - self.sin_p0 * cosphi * coslon);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let rh = x.hypot(y);
        if rh > PI * self.a {
            return Err(ProjError::Domain(
                "aeqd: distance beyond the antipode".to_string(),
            ));
        }
        if rh <= EPSLN {
            return Ok((self.lon0, self.lat0));
        }
        let z = rh / self.a;
        let (sinz, cosz) = z.sin_cos();
        let lat = asinz(cosz * self.sin_p0 + y * sinz * self.cos_p0 / rh);
        let lon = if (self.lat0.abs() - FRAC_PI_2).abs() <= EPSLN {
            if self.lat0 >= 0.0 {
                self.lon0 + x.atan2(-y)
            } else {
                self.lon0 - (-x).atan2(y)
            }
        } else {
            let con = cosz - self.sin_p0 * lat.sin();
            if con.abs() < EPSLN && x.abs() < EPSLN {
                self.lon0
            } else {
                self.lon0 + (x * sinz * self.cos_p0).atan2(con * rh)
            }
        };
        Ok((adjust_lon(lon), lat))
    }
}
