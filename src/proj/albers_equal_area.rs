//! Albers Equal Area Conic projection.
//!
//! Area-preserving conic using `qsfn` from common.rs.
//!   n = (m₁² - m₂²) / (q₂ - q₁),  C = m₁² + n·q₁,  ρ = a·sqrt(C - n·q)/n

use std::f64::consts::FRAC_PI_2;

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, msfn, qsfn, EPSLN};
use crate::proj::Projection;

pub struct AlbersEqualArea {
    a: f64,
    e: f64,
    es: f64,
    lon0: f64,
    n: f64,
    c: f64,
    rho0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(AlbersEqualArea::new(params)?))
}

impl AlbersEqualArea {
    pub fn new(params: &CrsParams) -> Result<Self, ProjError> {
        let lat0 = params.lat0;
        let lat1 = params.lat1.unwrap_or(lat0);
        let lat2 = params.lat2.unwrap_or(lat1);
        if (lat1 + lat2).abs() < EPSLN {
            return Err(ProjError::Config(
                "aea: standard parallels are equal and opposite".to_string(),
            ));
        }

        let ell = &params.ellipsoid;
        let (e, es) = (ell.e, ell.es);
        let m1 = msfn(lat1, es);
        let m2 = msfn(lat2, es);
        let q0 = qsfn(lat0, e);
        let q1 = qsfn(lat1, e);
        let q2 = qsfn(lat2, e);

        let n = if (lat1 - lat2).abs() > EPSLN {
            (m1 * m1 - m2 * m2) / (q2 - q1)
        } else {
            lat1.sin()
        };

        let c = m1 * m1 + n * q1;
        let rho0 = ell.a * (c - n * q0).sqrt() / n;

        Ok(Self {
            a: ell.a,
            e,
            es,
            lon0: params.long0,
            n,
            c,
            rho0,
            false_easting: params.x0,
            false_northing: params.y0,
        })
    }

    /// Latitude from the authalic `q`.
    fn phi1z(&self, qs: f64) -> Result<f64, ProjError> {
        let mut phi = asinz(0.5 * qs);
        if self.e < EPSLN {
            return Ok(phi);
        }
        for _ in 0..25 {
            let (sinphi, cosphi) = phi.sin_cos();
            let con = self.e * sinphi;
            let com = 1.0 - con * con;
            let dphi = 0.5 * com * com / cosphi
                * (qs / (1.0 - self.es) - sinphi / com
                    + 0.5 / self.e * ((1.0 - con) / (1.0 + con)).ln());
            phi += dphi;
            if dphi.abs() <= 1e-7 {
                return Ok(phi);
            }
        }
        Err(ProjError::convergence("aea phi1z"))
    }
}

impl Projection for AlbersEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let q = qsfn(lat, self.e);
        let rho = self.a * (self.c - self.n * q).sqrt() / self.n;
        let theta = self.n * adjust_lon(lon - self.lon0);

        let x = rho * theta.sin() + self.false_easting;
        let y = self.rho0 - rho * theta.cos() + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x_ = x - self.false_easting;
        let y_ = self.rho0 - (y - self.false_northing);

        let sign = if self.n >= 0.0 { 1.0 } else { -1.0 };
        let rho = sign * x_.hypot(y_);
        let theta = if rho != 0.0 {
            (sign * x_).atan2(sign * y_)
        } else {
            0.0
        };

        let con = rho * self.n / self.a;
        let qs = (self.c - con * con) / self.n;

        let lat = if self.e >= 1e-10 {
            // q at the poles
            let limit = 1.0 - 0.5 * (1.0 - self.es) * ((1.0 - self.e) / (1.0 + self.e)).ln() / self.e;
            if (limit.abs() - qs.abs()).abs() > 1e-10 {
                self.phi1z(qs)?
            } else if qs >= 0.0 {
                FRAC_PI_2
            } else {
                -FRAC_PI_2
            }
        } else {
            self.phi1z(qs)?
        };

        let lon = adjust_lon(theta / self.n + self.lon0);
        Ok((lon, lat))
    }
}
