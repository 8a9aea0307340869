//! Mollweide pseudocylindrical equal-area projection (spherical).
//!
//! 2θ + sin 2θ = π·sin φ  (solved by Newton iteration)
//! x = (2√2/π)·a·Δλ·cos θ,  y = √2·a·sin θ

use std::f64::consts::{FRAC_PI_2, PI, SQRT_2};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, EPSLN};
use crate::proj::Projection;

const MAX_ITER: usize = 50;
const CX: f64 = 2.0 * SQRT_2 / PI;

pub struct Mollweide {
    a: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Mollweide {
        a: params.ellipsoid.a,
        lon0: params.long0,
        false_easting: params.x0,
        false_northing: params.y0,
    }))
}

impl Mollweide {
    /// Auxiliary angle θ for latitude φ.
    fn theta(lat: f64) -> Result<f64, ProjError> {
        // Newton's derivative vanishes at the poles
        if FRAC_PI_2 - lat.abs() < EPSLN {
            return Ok(FRAC_PI_2.copysign(lat));
        }
        let target = PI * lat.sin();
        let mut d = lat;
        for _ in 0..MAX_ITER {
            let delta = -(d + d.sin() - target) / (1.0 + d.cos());
            d += delta;
            if delta.abs() < EPSLN {
                return Ok(0.5 * d);
            }
        }
        Err(ProjError::convergence("moll forward"))
    }
}

impl Projection for Mollweide {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let theta = Self::theta(lat)?;
        let dlon = adjust_lon(lon - self.lon0);
        let x = CX * self.a * dlon * theta.cos() + self.false_easting;
        let y = SQRT_2 * self.a * theta.sin() + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let theta = (y / (SQRT_2 * self.a)).clamp(-0.999_999_999_999, 0.999_999_999_999).asin();
        let lon = adjust_lon(self.lon0 + x / (CX * self.a * theta.cos())).clamp(-PI, PI);
        let lat = ((2.0 * theta + (2.0 * theta).sin()) / PI).clamp(-1.0, 1.0).asin();
        Ok((lon, lat))
    }
}
