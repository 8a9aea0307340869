//! Lambert Conformal Conic projection, one or two standard parallels.
//!
//! n = ln(m₁/m₂) / ln(t₁/t₂)  (or sin φ₁ when the parallels coincide)
//! F = m₁/(n·t₁ⁿ),  ρ = a·F·tⁿ,  ρ₀ = a·F·t₀ⁿ
//! x = x₀ + k₀·ρ·sin(n·Δλ),  y = y₀ + k₀·(ρ₀ - ρ·cos(n·Δλ))
//!
//! Uses `tsfn`, `msfn`, `phi_from_ts` from common.rs.

use std::f64::consts::FRAC_PI_2;

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, msfn, phi_from_ts, tsfn, EPSLN};
use crate::proj::Projection;

pub struct LambertConformalConic {
    a: f64,
    e: f64,
    lon0: f64,
    k0: f64,
    n: f64,     // cone constant
    f_val: f64, // F = m₁/(n·t₁ⁿ)
    rho0: f64,  // ρ₀ = a·F·t₀ⁿ
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(LambertConformalConic::new(params)?))
}

impl LambertConformalConic {
    /// Standard parallels default to the latitude of origin (1SP form).
    pub fn new(params: &CrsParams) -> Result<Self, ProjError> {
        let lat0 = params.lat0;
        let lat1 = params.lat1.unwrap_or(lat0);
        let lat2 = params.lat2.unwrap_or(lat0);
        if (lat1 + lat2).abs() < EPSLN {
            return Err(ProjError::Config(
                "lcc: standard parallels are opposite (or both on the equator)".to_string(),
            ));
        }

        let ell = &params.ellipsoid;
        let e = ell.e;
        let m1 = msfn(lat1, ell.es);
        let m2 = msfn(lat2, ell.es);
        let t0 = tsfn(lat0, e);
        let t1 = tsfn(lat1, e);
        let t2 = tsfn(lat2, e);

        let n = if (lat1 - lat2).abs() > EPSLN {
            (m1.ln() - m2.ln()) / (t1.ln() - t2.ln())
        } else {
            lat1.sin()
        };

        let f_val = m1 / (n * t1.powf(n));
        let rho0 = ell.a * f_val * t0.powf(n);

        Ok(Self {
            a: ell.a,
            e,
            lon0: params.long0,
            k0: params.k0,
            n,
            f_val,
            rho0,
            false_easting: params.x0,
            false_northing: params.y0,
        })
    }
}

impl Projection for LambertConformalConic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let rho = if (lat.abs() - FRAC_PI_2).abs() > EPSLN {
            self.a * self.f_val * tsfn(lat, self.e).powf(self.n)
        } else {
            // apex of the cone, or the pole it never reaches
            if lat * self.n <= 0.0 {
                return Err(ProjError::Domain(
                    "lcc: pole opposite the cone apex has no projection".to_string(),
                ));
            }
            0.0
        };
        let theta = self.n * adjust_lon(lon - self.lon0);

        let x = self.k0 * rho * theta.sin() + self.false_easting;
        let y = self.k0 * (self.rho0 - rho * theta.cos()) + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x_ = (x - self.false_easting) / self.k0;
        let y_ = self.rho0 - (y - self.false_northing) / self.k0;

        // ρ carries the sign of n, so ρ/(a·F) stays positive
        let sign = if self.n > 0.0 { 1.0 } else { -1.0 };
        let rho = sign * x_.hypot(y_);
        let theta = if rho != 0.0 {
            (sign * x_).atan2(sign * y_)
        } else {
            0.0
        };

        let lat = if rho != 0.0 || self.n > 0.0 {
            let ts = (rho / (self.a * self.f_val)).powf(1.0 / self.n);
            phi_from_ts(ts, self.e)?
        } else {
            -FRAC_PI_2
        };
        let lon = adjust_lon(theta / self.n + self.lon0);
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn lcc(def: &str) -> Result<LambertConformalConic, ProjError> {
        LambertConformalConic::new(&CrsParams::parse(def)?)
    }

    // RGF93 / Lambert-93 (EPSG:2154)
    const LAMBERT_93: &str = "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3 \
        +x_0=700000 +y_0=6600000 +ellps=GRS80 +units=m";

    #[test]
    fn test_2sp_roundtrip() {
        let proj = lcc(LAMBERT_93).unwrap();
        let cases: &[(f64, f64)] = &[
            (3.0, 46.5),    // origin
            (2.35, 48.86),  // Paris
            (-1.55, 47.22), // Nantes
            (7.75, 48.58),  // Strasbourg
        ];
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_origin_point() {
        let proj = lcc(LAMBERT_93).unwrap();
        // At the origin, x should be FE, y should be FN
        let (x, y) = proj
            .forward(3.0_f64.to_radians(), 46.5_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 700_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 6_600_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_1sp_with_scale() {
        let proj = lcc("+proj=lcc +lat_1=45 +lat_0=45 +lon_0=0 +k_0=0.99987742 +ellps=WGS84")
            .unwrap();
        let lon = 5.0_f64.to_radians();
        let lat = 48.0_f64.to_radians();
        let (x, y) = proj.forward(lon, lat).unwrap();
        let (lon2, lat2) = proj.inverse(x, y).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-9);
        assert_relative_eq!(lat2, lat, epsilon = 1e-9);
    }

    #[test]
    fn test_southern_cone() {
        let proj = lcc("+proj=lcc +lat_1=-30 +lat_2=-20 +lat_0=-25 +lon_0=25 +ellps=WGS84")
            .unwrap();
        let lon = 28.0_f64.to_radians();
        let lat = (-26.0_f64).to_radians();
        let (x, y) = proj.forward(lon, lat).unwrap();
        let (lon2, lat2) = proj.inverse(x, y).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-9);
        assert_relative_eq!(lat2, lat, epsilon = 1e-9);
    }

    #[test]
    fn test_pole_handling() {
        let proj = lcc(LAMBERT_93).unwrap();
        assert!(proj.forward(0.0, FRAC_PI_2).is_ok());
        assert!(matches!(proj.forward(0.0, -FRAC_PI_2), Err(ProjError::Domain(_))));
    }

    #[test]
    fn test_opposite_parallels_rejected() {
        assert!(matches!(
            lcc("+proj=lcc +lat_1=30 +lat_2=-30"),
            Err(ProjError::Config(_))
        ));
    }
}
