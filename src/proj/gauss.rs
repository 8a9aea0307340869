//! Gauss conformal sphere.
//!
//! Maps geodetic (λ, φ) onto a sphere of radius Rc conformally:
//!   C   = sqrt(1 + e²·cos⁴φ₀ / (1 - e²))
//!   χ₀  = asin(sin φ₀ / C)
//!   K   = tan(χ₀/2 + π/4) / (tan(φ₀/2 + π/4)^C · srat(e·sin φ₀, C·e/2))
//!   χ   = 2·atan(K · tan(φ/2 + π/4)^C · srat(e·sin φ, C·e/2)) - π/2,  Λ = C·λ
//!
//! Used on its own (output in radians on the sphere) and as the first stage
//! of the oblique stereographic projection.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::srat;
use crate::proj::Projection;

const MAX_ITER: usize = 20;
const TOLERANCE: f64 = 1e-14;

#[derive(Clone, Copy, Debug)]
pub struct GaussSphere {
    e: f64,
    c: f64,
    k: f64,
    ratexp: f64,
    /// Radius of the conformal sphere, in units of the semi-major axis
    pub rc: f64,
    /// Conformal latitude of the origin
    pub phic0: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(GaussSphere::new(params)))
}

impl GaussSphere {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let (es, e) = (ell.es, ell.e);
        let lat0 = params.lat0;
        let sphi = lat0.sin();
        let cphi2 = lat0.cos().powi(2);

        let rc = (1.0 - es).sqrt() / (1.0 - es * sphi * sphi);
        let c = (1.0 + es * cphi2 * cphi2 / (1.0 - es)).sqrt();
        let phic0 = (sphi / c).asin();
        let ratexp = 0.5 * c * e;
        let k = (0.5 * phic0 + FRAC_PI_4).tan()
            / ((0.5 * lat0 + FRAC_PI_4).tan().powf(c) * srat(e * sphi, ratexp));

        Self {
            e,
            c,
            k,
            ratexp,
            rc,
            phic0,
        }
    }

    /// Geodetic to conformal-sphere coordinates.
    pub fn to_sphere(&self, lon: f64, lat: f64) -> (f64, f64) {
        let chi = 2.0
            * (self.k
                * (0.5 * lat + FRAC_PI_4).tan().powf(self.c)
                * srat(self.e * lat.sin(), self.ratexp))
            .atan()
            - FRAC_PI_2;
        (self.c * lon, chi)
    }

    /// Conformal-sphere to geodetic coordinates.
    pub fn from_sphere(&self, lon: f64, chi: f64) -> Result<(f64, f64), ProjError> {
        let num = ((0.5 * chi + FRAC_PI_4).tan() / self.k).powf(1.0 / self.c);
        let mut lat = chi;
        for _ in 0..MAX_ITER {
            let next = 2.0 * (num * srat(self.e * lat.sin(), -0.5 * self.e)).atan() - FRAC_PI_2;
            if (next - lat).abs() < TOLERANCE {
                return Ok((lon / self.c, next));
            }
            lat = next;
        }
        Err(ProjError::convergence("gauss inverse"))
    }
}

impl Projection for GaussSphere {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        Ok(self.to_sphere(lon, lat))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        self.from_sphere(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn gauss(def: &str) -> GaussSphere {
        GaussSphere::new(&CrsParams::parse(def).unwrap())
    }

    #[test]
    fn test_origin_maps_to_conformal_origin() {
        let g = gauss("+proj=gauss +lat_0=52.156 +ellps=bessel");
        let lat0 = 52.156_f64.to_radians();
        let (_, chi) = g.to_sphere(0.0, lat0);
        assert_relative_eq!(chi, g.phic0, epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        let g = gauss("+proj=gauss +lat_0=46.95 +ellps=bessel");
        for &(lon, lat) in &[(0.1, 0.8), (-0.05, 0.9), (0.02, 0.7)] {
            let (x, y) = g.to_sphere(lon, lat);
            let (lon2, lat2) = g.from_sphere(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-12);
            assert_relative_eq!(lat2, lat, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_sphere_is_identity() {
        let g = gauss("+proj=gauss +lat_0=30 +a=6371000 +b=6371000");
        let (x, y) = g.to_sphere(0.3, 0.4);
        assert_relative_eq!(x, 0.3, epsilon = 1e-12);
        assert_relative_eq!(y, 0.4, epsilon = 1e-12);
        assert_relative_eq!(g.rc, 1.0, epsilon = 1e-12);
    }
}
