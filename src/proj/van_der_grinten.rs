//! Van der Grinten (I) projection, spherical.
//!
//! The whole globe maps into a circle of radius π·a. The equator, the
//! central meridian and the poles are handled as closed forms; the inverse
//! solves Snyder's cubic in trigonometric form.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::adjust_lon;
use crate::proj::Projection;

const TOL: f64 = 1e-10;
const THIRD: f64 = 1.0 / 3.0;
const C2_27: f64 = 2.0 / 27.0;
const PI4_3: f64 = 4.0 * PI / 3.0;
const PISQ: f64 = PI * PI;
const TPISQ: f64 = 2.0 * PISQ;
const HPISQ: f64 = 0.5 * PISQ;

pub struct VanDerGrinten {
    a: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(VanDerGrinten::new(params)))
}

impl VanDerGrinten {
    pub fn new(params: &CrsParams) -> Self {
        Self {
            a: params.ellipsoid.a,
            lon0: params.long0,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }

    /// Forward on the unit sphere.
    fn unit_forward(lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let mut p2 = (phi / FRAC_PI_2).abs();
        if p2 - TOL > 1.0 {
            return Err(ProjError::Domain("vandg: latitude out of range".to_string()));
        }
        p2 = p2.min(1.0);

        if phi.abs() <= TOL {
            return Ok((lam, 0.0));
        }
        if lam.abs() <= TOL || (p2 - 1.0).abs() < TOL {
            let y = PI * (0.5 * p2.asin()).tan();
            return Ok((0.0, y.copysign(phi)));
        }

        let al = 0.5 * (PI / lam - lam / PI).abs();
        let al2 = al * al;
        let mut g = (1.0 - p2 * p2).sqrt();
        g /= p2 + g - 1.0;
        let g2 = g * g;
        let p = g * (2.0 / p2 - 1.0);
        let p = p * p;
        let gp = g - p;
        let den = p + al2;
        let mut x = PI * (al * gp + (al2 * gp * gp - den * (g2 - p)).sqrt()) / den;
        if lam < 0.0 {
            x = -x;
        }

        let t = (x / PI).abs();
        let t = 1.0 - t * (t + 2.0 * al);
        if t < -TOL {
            return Err(ProjError::Domain("vandg: point off the map".to_string()));
        }
        let y = if t < 0.0 { 0.0 } else { t.sqrt() * PI.copysign(phi) };
        Ok((x, y))
    }

    /// Inverse on the unit sphere.
    fn unit_inverse(x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x2 = x * x;
        let ay = y.abs();
        if ay < TOL {
            let t = x2 * x2 + TPISQ * (x2 + HPISQ);
            let lam = if x.abs() <= TOL { 0.0 } else { 0.5 * (x2 - PISQ + t.sqrt()) / x };
            return Ok((lam, 0.0));
        }

        let y2 = y * y;
        let r = x2 + y2;
        if r > PISQ * (1.0 + TOL) {
            return Err(ProjError::Domain("vandg: outside the bounding circle".to_string()));
        }
        let r2 = r * r;
        let c1 = -PI * ay * (r + PISQ);
        let c3 = r2 + TAU * (ay * r + PI * (y2 + PI * (ay + FRAC_PI_2)));
        let c2 = (c1 + PISQ * (r - 3.0 * y2)) / c3;
        let c0 = PI * ay;
        let al = c1 / c3 - THIRD * c2 * c2;
        let m = 2.0 * (-THIRD * al).sqrt();
        let al_m = al * m;
        if al_m.abs() < 1e-16 {
            return Err(ProjError::Domain("vandg: degenerate cubic".to_string()));
        }
        let d = 3.0 * (C2_27 * c2 * c2 * c2 + (c0 * c0 - THIRD * c2 * c1) / c3) / al_m;
        let t = d.abs();
        if t - TOL > 1.0 {
            return Err(ProjError::Domain("vandg: no real solution".to_string()));
        }
        let d = if t > 1.0 {
            if d > 0.0 {
                0.0
            } else {
                PI
            }
        } else {
            d.acos()
        };

        let phi = PI * (m * (d * THIRD + PI4_3).cos() - THIRD * c2);
        let t = r2 + TPISQ * (x2 - y2 + HPISQ);
        let lam = if x.abs() <= TOL {
            0.0
        } else {
            0.5 * (r - PISQ + t.max(0.0).sqrt()) / x
        };
        Ok((lam, phi.copysign(y)))
    }
}

impl Projection for VanDerGrinten {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let (x, y) = Self::unit_forward(adjust_lon(lon - self.lon0), lat)?;
        Ok((
            self.a * x + self.false_easting,
            self.a * y + self.false_northing,
        ))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let (lam, phi) = Self::unit_inverse(
            (x - self.false_easting) / self.a,
            (y - self.false_northing) / self.a,
        )?;
        Ok((adjust_lon(lam + self.lon0), phi))
    }
}
