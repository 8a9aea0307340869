//! Gnomonic azimuthal projection (spherical). Great circles map to straight
//! lines; only the hemisphere around the centre is representable.
//!
//! cos c = sin φ₀ sin φ + cos φ₀ cos φ cos Δλ
//! x = a·k₀·cos φ sin Δλ / cos c,  y = a·k₀·(cos φ₀ sin φ - sin φ₀ cos φ cos Δλ) / cos c

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, EPSLN};
use crate::proj::Projection;

pub struct Gnomonic {
    a: f64,
    k0: f64,
    lat0: f64,
    lon0: f64,
    sin_p0: f64,
    cos_p0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Gnomonic::new(params)))
}

impl Gnomonic {
    pub fn new(params: &CrsParams) -> Self {
        Self {
            a: params.ellipsoid.a,
            k0: params.k0,
            lat0: params.lat0,
            lon0: params.long0,
            sin_p0: params.lat0.sin(),
            cos_p0: params.lat0.cos(),
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for Gnomonic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (sinphi, cosphi) = lat.sin_cos();
        let coslon = dlon.cos();
        let g = self.sin_p0 * sinphi + self.cos_p0 * cosphi * coslon;
        if g <= EPSLN {
            return Err(ProjError::Domain(
                "gnom: point 90° or more from the centre".to_string(),
            ));
        }
        let ak = self.a * self.k0 / g;
        let x = ak * cosphi * dlon.sin() + self.false_easting;
        let y = ak * (self.cos_p0 * sinphi - self.sin_p0 * cosphi * coslon) + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = (x - self.false_easting) / (self.a * self.k0);
        let y = (y - self.false_northing) / (self.a * self.k0);
        let rh = x.hypot(y);
        if rh == 0.0 {
            return Ok((self.lon0, self.lat0));
        }
        let c = rh.atan();
        let (sinc, cosc) = c.sin_cos();
        let lat = asinz(cosc * self.sin_p0 + y * sinc * self.cos_p0 / rh);
        let lon = (x * sinc).atan2(rh * self.cos_p0 * cosc - y * self.sin_p0 * sinc);
        Ok((adjust_lon(self.lon0 + lon), lat))
    }
}
