//! Common helpers for projection math (conformal and authalic latitudes,
//! meridian distance, angle wrapping).

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use crate::error::ProjError;

pub const EPSLN: f64 = 1.0e-10;
pub const SEC_TO_RAD: f64 = 4.848_136_811_095_36e-6;
pub const SIXTH: f64 = 1.0 / 6.0;
pub const RA4: f64 = 17.0 / 360.0;
pub const RA6: f64 = 67.0 / 3024.0;
const MAX_ITER: usize = 20;

/// m(φ) = cos φ / sqrt(1 - e² sin² φ)
pub fn msfn(phi: f64, es: f64) -> f64 {
    let sinphi = phi.sin();
    phi.cos() / (1.0 - es * sinphi * sinphi).sqrt()
}

/// t(φ) = tan(π/4 - φ/2) / ((1 - e sin φ) / (1 + e sin φ))^(e/2)
pub fn tsfn(phi: f64, e: f64) -> f64 {
    let con = e * phi.sin();
    (0.5 * (FRAC_PI_2 - phi)).tan() / ((1.0 - con) / (1.0 + con)).powf(0.5 * e)
}

/// Latitude from the isometric quantity `ts` (inverse of [`tsfn`]).
pub fn phi_from_ts(ts: f64, e: f64) -> Result<f64, ProjError> {
    let eccnth = 0.5 * e;
    let mut phi = FRAC_PI_2 - 2.0 * ts.atan();
    for _ in 0..15 {
        let con = e * phi.sin();
        let dphi = FRAC_PI_2 - 2.0 * (ts * ((1.0 - con) / (1.0 + con)).powf(eccnth)).atan() - phi;
        phi += dphi;
        if dphi.abs() <= EPSLN {
            return Ok(phi);
        }
    }
    Err(ProjError::convergence("latitude from isometric ts"))
}

/// Authalic q(φ); for a sphere this reduces to 2 sin φ.
pub fn qsfn(phi: f64, e: f64) -> f64 {
    let sinphi = phi.sin();
    if e > 1.0e-7 {
        let con = e * sinphi;
        (1.0 - e * e)
            * (sinphi / (1.0 - con * con) - (0.5 / e) * ((1.0 - con) / (1.0 + con)).ln())
    } else {
        2.0 * sinphi
    }
}

/// asin clamped to the valid argument range.
pub fn asinz(x: f64) -> f64 {
    x.clamp(-1.0, 1.0).asin()
}

/// Wrap a longitude into (-π, π].
pub fn adjust_lon(x: f64) -> f64 {
    if x > -PI && x <= PI {
        return x;
    }
    let wrapped = (x + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Clamp a latitude into [-π/2, π/2].
pub fn adjust_lat(x: f64) -> f64 {
    x.clamp(-FRAC_PI_2, FRAC_PI_2)
}

pub fn srat(esinp: f64, exp: f64) -> f64 {
    ((1.0 - esinp) / (1.0 + esinp)).powf(exp)
}

/// Isometric latitude; infinite at the poles.
pub fn latiso(e: f64, phi: f64, sinphi: f64) -> f64 {
    if phi.abs() > FRAC_PI_2 {
        return f64::NAN;
    }
    if phi == FRAC_PI_2 {
        return f64::INFINITY;
    }
    if phi == -FRAC_PI_2 {
        return f64::NEG_INFINITY;
    }
    let con = e * sinphi;
    (FRAC_PI_4 + 0.5 * phi).tan().ln() + e * ((1.0 - con) / (1.0 + con)).ln() / 2.0
}

/// Latitude from isometric latitude.
pub fn invlatiso(e: f64, l: f64) -> Result<f64, ProjError> {
    let fl = |x: f64| 2.0 * (x * l.exp()).atan() - FRAC_PI_2;
    let mut phi = fl(1.0);
    for _ in 0..30 {
        let prev = phi;
        let con = e * prev.sin();
        phi = fl((e * ((1.0 + con) / (1.0 - con)).ln() / 2.0).exp());
        if (phi - prev).abs() <= 1.0e-12 {
            return Ok(phi);
        }
    }
    Err(ProjError::convergence("inverse isometric latitude"))
}

/// Coefficients of the Snyder meridian-distance series (e0fn..e3fn).
#[derive(Clone, Copy, Debug)]
pub struct MeridianSeries {
    pub e0: f64,
    pub e1: f64,
    pub e2: f64,
    pub e3: f64,
}

impl MeridianSeries {
    pub fn new(es: f64) -> Self {
        Self {
            e0: 1.0 - 0.25 * es * (1.0 + es / 16.0 * (3.0 + 1.25 * es)),
            e1: 0.375 * es * (1.0 + 0.25 * es * (1.0 + 0.468_75 * es)),
            e2: 0.058_593_75 * es * es * (1.0 + 0.75 * es),
            e3: es * es * es * (35.0 / 3072.0),
        }
    }

    /// Meridian distance on the unit-a ellipsoid.
    pub fn mlfn(&self, phi: f64) -> f64 {
        self.e0 * phi - self.e1 * (2.0 * phi).sin() + self.e2 * (4.0 * phi).sin()
            - self.e3 * (6.0 * phi).sin()
    }

    /// Latitude from meridian distance by fixed-point iteration.
    pub fn phi3z(&self, ml: f64) -> Result<f64, ProjError> {
        let mut phi = ml;
        for _ in 0..15 {
            let dphi = (ml + self.e1 * (2.0 * phi).sin() - self.e2 * (4.0 * phi).sin()
                + self.e3 * (6.0 * phi).sin())
                / self.e0
                - phi;
            phi += dphi;
            if dphi.abs() <= EPSLN {
                return Ok(phi);
            }
        }
        Err(ProjError::convergence("latitude from meridian distance"))
    }
}

/// Meridian distance through the five `en` coefficients.
#[derive(Clone, Copy, Debug)]
pub struct MeridianDistance {
    es: f64,
    en: [f64; 5],
}

impl MeridianDistance {
    pub fn new(es: f64) -> Self {
        const C00: f64 = 1.0;
        const C02: f64 = 0.25;
        const C04: f64 = 0.046_875;
        const C06: f64 = 0.019_531_25;
        const C08: f64 = 0.010_681_152_343_75;
        const C22: f64 = 0.75;
        const C44: f64 = 0.468_75;
        const C46: f64 = 0.013_020_833_333_333_334;
        const C48: f64 = 0.007_120_768_229_166_667;
        const C66: f64 = 0.364_583_333_333_333_3;
        const C68: f64 = 0.005_696_614_583_333_333;
        const C88: f64 = 0.307_617_187_5;

        let mut t = es * es;
        let en0 = C00 - es * (C02 + es * (C04 + es * (C06 + es * C08)));
        let en1 = es * (C22 - es * (C04 + es * (C06 + es * C08)));
        let en2 = t * (C44 - es * (C46 + es * C48));
        t *= es;
        let en3 = t * (C66 - es * C68);
        let en4 = t * es * C88;
        Self {
            es,
            en: [en0, en1, en2, en3, en4],
        }
    }

    pub fn distance(&self, phi: f64, sinphi: f64, cosphi: f64) -> f64 {
        let en = &self.en;
        let cs = cosphi * sinphi;
        let s2 = sinphi * sinphi;
        en[0] * phi - cs * (en[1] + s2 * (en[2] + s2 * (en[3] + s2 * en[4])))
    }

    pub fn inverse(&self, arg: f64) -> Result<f64, ProjError> {
        let k = 1.0 / (1.0 - self.es);
        let mut phi = arg;
        for _ in 0..MAX_ITER {
            let s = phi.sin();
            let mut t = 1.0 - self.es * s * s;
            t = (self.distance(phi, s, phi.cos()) - arg) * (t * t.sqrt()) * k;
            phi -= t;
            if t.abs() < EPSLN {
                return Ok(phi);
            }
        }
        Err(ProjError::convergence("inverse meridian distance"))
    }
}

/// Authalic latitude series coefficients.
pub fn authset(es: f64) -> [f64; 3] {
    const P00: f64 = 0.333_333_333_333_333_3;
    const P01: f64 = 0.172_222_222_222_222_22;
    const P02: f64 = 0.102_579_365_079_365_08;
    const P10: f64 = 0.063_888_888_888_888_88;
    const P11: f64 = 0.066_402_116_402_116_4;
    const P20: f64 = 0.016_415_012_942_191_543;

    let mut t = es;
    let mut apa = [0.0; 3];
    apa[0] = t * P00;
    t *= es;
    apa[0] += t * P01;
    apa[1] = t * P10;
    t *= es;
    apa[0] += t * P02;
    apa[1] += t * P11;
    apa[2] = t * P20;
    apa
}

/// Geodetic latitude from authalic latitude `beta`.
pub fn authlat(beta: f64, apa: &[f64; 3]) -> f64 {
    let t = beta + beta;
    beta + apa[0] * t.sin() + apa[1] * (t + t).sin() + apa[2] * (t + t + t).sin()
}

/// Reject non-finite projected results as domain errors.
pub fn finite(x: f64, y: f64, what: &str) -> Result<(f64, f64), ProjError> {
    if x.is_finite() && y.is_finite() {
        Ok((x, y))
    } else {
        Err(ProjError::Domain(format!("{what}: point projects to infinity")))
    }
}
