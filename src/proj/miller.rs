//! Miller Cylindrical projection (spherical).
//!
//! x = a·Δλ,  y = 1.25·a·ln(tan(π/4 + φ/2.5))

use std::f64::consts::FRAC_PI_4;

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::adjust_lon;
use crate::proj::Projection;

pub struct Miller {
    a: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Miller {
        a: params.ellipsoid.a,
        lon0: params.long0,
        false_easting: params.x0,
        false_northing: params.y0,
    }))
}

impl Projection for Miller {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let x = self.false_easting + self.a * adjust_lon(lon - self.lon0);
        let y = self.false_northing + 1.25 * self.a * (FRAC_PI_4 + lat / 2.5).tan().ln();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let lon = adjust_lon(self.lon0 + x / self.a);
        let lat = 2.5 * ((0.8 * y / self.a).exp().atan() - FRAC_PI_4);
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_poles_are_finite() {
        let proj = init(&CrsParams::parse("+proj=mill +R_A +ellps=WGS84").unwrap()).unwrap();
        let (_, y) = proj.forward(0.0, FRAC_PI_2).unwrap();
        assert!(y.is_finite());
        let (_, lat) = proj.inverse(0.0, y).unwrap();
        assert_relative_eq!(lat, FRAC_PI_2, epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        let proj = init(&CrsParams::parse("+proj=mill +a=6378137 +b=6378137 +lon_0=90 +x_0=100").unwrap())
            .unwrap();
        for &(lon, lat) in &[(1.2, 0.3), (-1.5, -1.0), (3.0, 1.4)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-12);
            assert_relative_eq!(lat2, lat, epsilon = 1e-12);
        }
    }
}
