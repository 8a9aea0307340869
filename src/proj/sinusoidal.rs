//! Sinusoidal (Sanson–Flamsteed) projection.
//!
//! Sphere:    x = a·Δλ·cos φ,                 y = a·φ
//! Ellipsoid: x = a·Δλ·cos φ / sqrt(1 - e² sin² φ),  y = a·M(φ)
//! where M is the meridian distance on the unit-a ellipsoid.

use std::f64::consts::FRAC_PI_2;

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, MeridianDistance, EPSLN};
use crate::proj::Projection;

pub struct Sinusoidal {
    a: f64,
    es: f64,
    sphere: bool,
    meridian: MeridianDistance,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Sinusoidal::new(params)))
}

impl Sinusoidal {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        Self {
            a: ell.a,
            es: ell.es,
            sphere: ell.sphere,
            meridian: MeridianDistance::new(ell.es),
            lon0: params.long0,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for Sinusoidal {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (sinphi, cosphi) = lat.sin_cos();
        let (x, y) = if self.sphere {
            (self.a * dlon * cosphi, self.a * lat)
        } else {
            (
                self.a * dlon * cosphi / (1.0 - self.es * sinphi * sinphi).sqrt(),
                self.a * self.meridian.distance(lat, sinphi, cosphi),
            )
        };
        Ok((x + self.false_easting, y + self.false_northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let lat = if self.sphere {
            y / self.a
        } else {
            self.meridian.inverse(y / self.a)?
        };

        let abs_lat = lat.abs();
        if abs_lat - EPSLN > FRAC_PI_2 {
            return Err(ProjError::Domain(
                "sinu: northing beyond the pole".to_string(),
            ));
        }
        if abs_lat >= FRAC_PI_2 {
            // longitude is undefined at the poles
            return Ok((self.lon0, lat));
        }
        let (sinphi, cosphi) = lat.sin_cos();
        let lon = if self.sphere {
            self.lon0 + x / (self.a * cosphi)
        } else {
            self.lon0 + x * (1.0 - self.es * sinphi * sinphi).sqrt() / (self.a * cosphi)
        };
        Ok((adjust_lon(lon), lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn sinu(def: &str) -> Sinusoidal {
        Sinusoidal::new(&CrsParams::parse(def).unwrap())
    }

    #[test]
    fn test_roundtrip() {
        for def in ["+proj=sinu +ellps=WGS84", "+proj=sinu +R=6371007.181"] {
            let proj = sinu(def);
            let cases: &[(f64, f64)] = &[
                (0.0, 0.0),
                (10.0, 45.0),
                (-73.9857, 40.7484),
                (139.6917, 35.6895),
            ];
            for &(lon_deg, lat_deg) in cases {
                let lon = lon_deg.to_radians();
                let lat = lat_deg.to_radians();
                let (x, y) = proj.forward(lon, lat).unwrap();
                let (lon2, lat2) = proj.inverse(x, y).unwrap();
                assert_relative_eq!(lon2, lon, epsilon = 1e-10);
                assert_relative_eq!(lat2, lat, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_equator_x_equals_eqrect() {
        // On the equator, cos(0)=1 so x = a*(lon - lon0), same as equirectangular
        let proj = sinu("+proj=sinu +ellps=WGS84");
        let lon = 15.0_f64.to_radians();
        let (x, y) = proj.forward(lon, 0.0).unwrap();
        assert_relative_eq!(x, 6_378_137.0 * lon, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
    }

    #[test]
    fn test_modis_sinusoidal_grid() {
        // MODIS sinusoidal sphere; the h17v04 tile's north edge sits at 50°N
        let proj = sinu("+proj=sinu +lon_0=0 +x_0=0 +y_0=0 +R=6371007.181 +units=m");
        let (_, y) = proj.forward(0.0, 50.0_f64.to_radians()).unwrap();
        assert_relative_eq!(y, 6_371_007.181 * 50.0_f64.to_radians(), epsilon = 1e-6);
        // sphere inverse scales by the radius
        let (_, lat) = proj.inverse(0.0, y).unwrap();
        assert_relative_eq!(lat, 50.0_f64.to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_false_origin_applied_forward() {
        let proj = sinu("+proj=sinu +ellps=WGS84 +x_0=1000 +y_0=2000");
        let (x, y) = proj.forward(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 1000.0, epsilon = 1e-9);
        assert_relative_eq!(y, 2000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_pole() {
        // At the north pole, x should be 0 for any longitude (cos(90°)=0)
        let proj = sinu("+proj=sinu +ellps=WGS84");
        let (x, y) = proj
            .forward(45.0_f64.to_radians(), FRAC_PI_2)
            .unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        let (lon, lat) = proj.inverse(0.0, y).unwrap();
        assert_relative_eq!(lon, 0.0);
        assert_relative_eq!(lat, FRAC_PI_2, epsilon = 1e-9);
    }
}
