//! Mercator projection, spherical and ellipsoidal.
//!
//! Ellipsoidal (scale k₀ at the standard parallel φts: k₀ = m(φts)):
//!   forward: x = x₀ + a·k₀·(λ - λ₀), y = y₀ - a·k₀·ln(t(φ, e))
//!   inverse: λ = λ₀ + x/(a·k₀), φ = phi_from_ts(exp(-y/(a·k₀)), e)
//!
//! Spherical (k₀ = cos φts):
//!   forward: y = y₀ + a·k₀·ln(tan(π/4 + φ/2))
//!   inverse: φ = π/2 - 2·atan(exp(-y/(a·k₀)))
//!
//! Both branches are undefined at the poles.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, msfn, phi_from_ts, tsfn, EPSLN};
use crate::proj::Projection;

pub struct Mercator {
    a: f64,
    e: f64,
    sphere: bool,
    lon0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Mercator::new(params)))
}

impl Mercator {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        // a zero standard parallel keeps an explicit +k
        let k0 = match params.lat_ts.filter(|&phi| phi != 0.0) {
            Some(lat_ts) if ell.sphere => lat_ts.cos(),
            Some(lat_ts) => msfn(lat_ts, ell.es),
            None => params.k0,
        };
        Self {
            a: ell.a,
            e: ell.e,
            sphere: ell.sphere,
            lon0: params.long0,
            k0,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for Mercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        if (lat.abs() - FRAC_PI_2).abs() <= EPSLN {
            return Err(ProjError::Domain(
                "merc: latitude at a pole projects to infinity".to_string(),
            ));
        }
        let ak0 = self.a * self.k0;
        let x = self.false_easting + ak0 * adjust_lon(lon - self.lon0);
        let y = if self.sphere {
            self.false_northing + ak0 * (FRAC_PI_4 + 0.5 * lat).tan().ln()
        } else {
            self.false_northing - ak0 * tsfn(lat, self.e).ln()
        };
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let ak0 = self.a * self.k0;
        let dx = x - self.false_easting;
        let dy = y - self.false_northing;
        let lat = if self.sphere {
            FRAC_PI_2 - 2.0 * (-dy / ak0).exp().atan()
        } else {
            phi_from_ts((-dy / ak0).exp(), self.e)?
        };
        let lon = adjust_lon(self.lon0 + dx / ak0);
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn proj(def: &str) -> Mercator {
        Mercator::new(&CrsParams::parse(def).unwrap())
    }

    #[test]
    fn test_spherical_origin_and_antimeridian() {
        let m = proj("+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1");
        let (x, y) = m.forward(0.0, 0.0).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
        let (x, _) = m.forward(PI, 0.0).unwrap();
        assert_relative_eq!(x, 20_037_508.342_789_244, epsilon = 0.01);
    }

    #[test]
    fn test_spherical_roundtrip() {
        let m = proj("+proj=merc +a=6378137 +b=6378137");
        let cases: &[(f64, f64)] = &[
            (10.0, 45.0),
            (-73.9857, 40.7484), // NYC
            (139.6917, 35.6895), // Tokyo
            (-179.0, -60.0),
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = m.forward(lon, lat).unwrap();
            let (lon2, lat2) = m.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_ellipsoidal_roundtrip() {
        let m = proj("+proj=merc +ellps=WGS84 +lat_ts=20 +x_0=500000");
        let cases: &[(f64, f64)] = &[(0.0, 0.0), (10.0, 45.0), (-73.9857, 40.7484), (100.0, -70.0)];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = m.forward(lon, lat).unwrap();
            let (lon2, lat2) = m.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ellipsoidal_reference_value() {
        // EPSG:3395 (World Mercator) at 45°N
        let m = proj("+proj=merc +ellps=WGS84");
        let (_, y) = m.forward(0.0, 45.0_f64.to_radians()).unwrap();
        assert_relative_eq!(y, 5_591_295.92, epsilon = 0.05);
    }

    #[test]
    fn test_pole_is_domain_error() {
        for def in ["+proj=merc +a=6378137 +b=6378137", "+proj=merc +ellps=WGS84"] {
            let m = proj(def);
            assert!(matches!(m.forward(0.0, FRAC_PI_2), Err(ProjError::Domain(_))));
            assert!(matches!(m.forward(0.0, -FRAC_PI_2), Err(ProjError::Domain(_))));
        }
    }

    #[test]
    fn test_sphere_ellipsoid_equivalence() {
        let sphere = proj("+proj=merc +a=6378137 +b=6378137");
        let degenerate = proj("+proj=merc +a=6378137 +rf=0");
        let p = (0.3, 0.7);
        assert_eq!(sphere.forward(p.0, p.1).unwrap(), degenerate.forward(p.0, p.1).unwrap());
    }
}
