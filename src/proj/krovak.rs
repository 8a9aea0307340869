//! Krovak oblique conformal conic (S-JTSK, Czech Republic and Slovakia).
//!
//! Gauss conformal sphere, rotation onto the cone's oblique pole, then a
//! conic with its pseudo standard parallel at S₀ (78°30' by default).
//! Output is negative easting and northing unless `+czech` asks for the
//! positive westing/southing pair.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::adjust_lon;
use crate::proj::Projection;

const DEFAULT_LAT0: f64 = 0.863_937_979_737_193; // 49°30'
const DEFAULT_LON0: f64 = 0.433_423_430_911_925_1; // 24°50' (42°30' east of Ferro)
const DEFAULT_AZIMUTH: f64 = 0.528_627_762_456_858_5; // 30°17'17.30303"
const DEFAULT_S0: f64 = 1.370_083_462_815_55; // 78°30'
const MAX_ITER: usize = 15;
const TOLERANCE: f64 = 1e-10;

pub struct Krovak {
    e: f64,
    lon0: f64,
    alfa: f64,
    k: f64,
    n: f64,
    s0: f64,
    ro0: f64,
    ad: f64,
    czech: bool,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Krovak::new(params)))
}

impl Krovak {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let (es, e) = (ell.es, ell.e);
        let fi0 = if params.lat0 == 0.0 { DEFAULT_LAT0 } else { params.lat0 };
        let lon0 = if params.long0 == 0.0 { DEFAULT_LON0 } else { params.long0 };
        let ad = if params.alpha == 0.0 { DEFAULT_AZIMUTH } else { params.alpha };
        let s0 = params.lat1.unwrap_or(DEFAULT_S0);

        let (sin_fi0, cos_fi0) = fi0.sin_cos();
        let alfa = (1.0 + es * cos_fi0.powi(4) / (1.0 - es)).sqrt();
        let u0 = (sin_fi0 / alfa).asin();
        let g = ((1.0 + e * sin_fi0) / (1.0 - e * sin_fi0)).powf(alfa * e / 2.0);
        let k = (u0 / 2.0 + FRAC_PI_4).tan() / (fi0 / 2.0 + FRAC_PI_4).tan().powf(alfa) * g;
        let n0 = ell.a * (1.0 - es).sqrt() / (1.0 - es * sin_fi0 * sin_fi0);
        let n = s0.sin();
        let ro0 = params.k0 * n0 / s0.tan();

        Self {
            e,
            lon0,
            alfa,
            k,
            n,
            s0,
            ro0,
            ad,
            czech: params.czech,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }

    fn esinp(&self, phi: f64, exp: f64) -> f64 {
        let con = self.e * phi.sin();
        ((1.0 + con) / (1.0 - con)).powf(exp)
    }
}

impl Projection for Krovak {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let gfi = self.esinp(lat, self.alfa * self.e / 2.0);
        let u = 2.0
            * ((self.k * (lat / 2.0 + FRAC_PI_4).tan().powf(self.alfa) / gfi).atan() - FRAC_PI_4);
        let deltav = -dlon * self.alfa;
        let (sin_ad, cos_ad) = self.ad.sin_cos();
        let s = (cos_ad * u.sin() + sin_ad * u.cos() * deltav.cos()).asin();
        let d = (u.cos() * deltav.sin() / s.cos()).asin();
        let eps = self.n * d;
        let ro = self.ro0 * (self.s0 / 2.0 + FRAC_PI_4).tan().powf(self.n)
            / (s / 2.0 + FRAC_PI_4).tan().powf(self.n);

        let sign = if self.czech { 1.0 } else { -1.0 };
        let x = sign * ro * eps.sin() + self.false_easting;
        let y = sign * ro * eps.cos() + self.false_northing;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let sign = if self.czech { 1.0 } else { -1.0 };
        // polar coordinates on the cone, measured from the southing axis
        let xs = sign * (y - self.false_northing);
        let ys = sign * (x - self.false_easting);

        let ro = xs.hypot(ys);
        let eps = ys.atan2(xs);
        let d = eps / self.s0.sin();
        // forward images only reach |d| <= π/2
        if d.abs() > FRAC_PI_2 {
            return Err(ProjError::Domain(
                "krovak: point outside the projected cone".to_string(),
            ));
        }
        let s = 2.0
            * (((self.ro0 / ro).powf(1.0 / self.n) * (self.s0 / 2.0 + FRAC_PI_4).tan()).atan()
                - FRAC_PI_4);
        let (sin_ad, cos_ad) = self.ad.sin_cos();
        let u = (cos_ad * s.sin() - sin_ad * s.cos() * d.cos()).asin();
        let sin_deltav = s.cos() * d.sin() / u.cos();
        if sin_deltav.is_nan() || sin_deltav.abs() > 1.0 {
            return Err(ProjError::Domain(
                "krovak: point has no preimage on the Gauss sphere".to_string(),
            ));
        }
        let deltav = sin_deltav.asin();
        let lon = adjust_lon(self.lon0 - deltav / self.alfa);

        let k_root = self.k.powf(-1.0 / self.alfa);
        let tan_root = (u / 2.0 + FRAC_PI_4).tan().powf(1.0 / self.alfa);
        let mut fi1 = u;
        for _ in 0..MAX_ITER {
            let lat = 2.0 * ((k_root * tan_root * self.esinp(fi1, self.e / 2.0)).atan() - FRAC_PI_4);
            if (fi1 - lat).abs() < TOLERANCE {
                return Ok((lon, lat));
            }
            fi1 = lat;
        }
        Err(ProjError::convergence("krovak latitude"))
    }
}
