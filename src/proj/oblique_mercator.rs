//! Hotine oblique Mercator.
//!
//! A conformal cylinder tangent along an oblique great circle of the
//! "aposphere" (B, A, E constants after Snyder). The central line is given
//! either by its centre (`lat_0`, `lonc`) and azimuth `alpha`, or by two
//! points `(lon_1, lat_1)` and `(lon_2, lat_2)`.
//!
//!   u, v = rectified coordinates along and across the central line
//!   x = v·cos αc + (u - uc)·sin αc,  y = (u - uc)·cos αc - v·sin αc
//!
//! `uc` puts the origin at the projection centre; `+no_uoff` keeps the
//! natural origin where the central line crosses the aposphere's equator.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, phi_from_ts, tsfn, EPSLN};
use crate::proj::Projection;

pub struct ObliqueMercator {
    e: f64,
    b: f64,
    /// A: radius of the aposphere times k₀
    a_scaled: f64,
    big_e: f64,
    lam0: f64,
    sin_g0: f64,
    cos_g0: f64,
    /// Azimuth of the central line at the centre
    alpha_c: f64,
    u_c: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(ObliqueMercator::new(params)?))
}

impl ObliqueMercator {
    pub fn new(params: &CrsParams) -> Result<Self, ProjError> {
        let ell = &params.ellipsoid;
        let (e, es) = (ell.e, ell.es);
        let lat0 = params.lat0;
        if (lat0.abs() - FRAC_PI_2).abs() <= EPSLN {
            return Err(ProjError::Config(
                "omerc: latitude of the centre cannot be a pole".to_string(),
            ));
        }

        let (sin0, cos0) = lat0.sin_cos();
        let con = 1.0 - es * sin0 * sin0;
        let b = (1.0 + es * cos0.powi(4) / (1.0 - es)).sqrt();
        let a_scaled = ell.a * b * params.k0 * (1.0 - es).sqrt() / con;
        let d = (b * (1.0 - es).sqrt() / (cos0 * con.sqrt())).max(1.0);
        let d_root = (d * d - 1.0).sqrt();
        let f = d + d_root.copysign(lat0);
        let big_e = f * tsfn(lat0, e).powf(b);

        let (lam0, gamma0, alpha_c) = match (params.lon1, params.lon2) {
            (Some(lon1), Some(lon2)) => {
                let lat1 = params.lat1.unwrap_or(0.0);
                let lat2 = params.lat2.unwrap_or(0.0);
                if (lat1 - lat2).abs() <= EPSLN
                    || lat1.abs() <= EPSLN
                    || (lat1.abs() - FRAC_PI_2).abs() <= EPSLN
                {
                    return Err(ProjError::Config(
                        "omerc: the two points do not define a central line".to_string(),
                    ));
                }
                let h = tsfn(lat1, e).powf(b);
                let l = tsfn(lat2, e).powf(b);
                let f = big_e / h;
                let g = 0.5 * (f - 1.0 / f);
                let j = (big_e * big_e - l * h) / (big_e * big_e + l * h);
                let p = (l - h) / (l + h);
                let mut lon2 = lon2;
                if lon1 - lon2 < -PI {
                    lon2 -= 2.0 * PI;
                } else if lon1 - lon2 > PI {
                    lon2 += 2.0 * PI;
                }
                let lam0 = adjust_lon(
                    0.5 * (lon1 + lon2) - (j * (0.5 * b * (lon1 - lon2)).tan() / p).atan() / b,
                );
                let gamma0 = ((b * adjust_lon(lon1 - lam0)).sin() / g).atan();
                let sin_alpha = d * gamma0.sin();
                if sin_alpha.abs() > 1.0 {
                    return Err(ProjError::Config(
                        "omerc: central line azimuth out of range".to_string(),
                    ));
                }
                (lam0, gamma0, sin_alpha.asin())
            }
            _ => {
                let alpha = params.alpha;
                let g = 0.5 * (f - 1.0 / f);
                let sin_gamma = alpha.sin() / d;
                let shift = g * sin_gamma.asin().tan();
                if sin_gamma.abs() > 1.0 || shift.abs() > 1.0 {
                    return Err(ProjError::Config(format!(
                        "omerc: azimuth {:.6}° impossible at this centre",
                        alpha.to_degrees()
                    )));
                }
                let gamma0 = sin_gamma.asin();
                (adjust_lon(params.longc - shift.asin() / b), gamma0, alpha)
            }
        };

        let u_c = if params.no_uoff {
            0.0
        } else {
            (a_scaled / b * (d_root / alpha_c.cos()).atan()).copysign(lat0)
        };

        Ok(Self {
            e,
            b,
            a_scaled,
            big_e,
            lam0,
            sin_g0: gamma0.sin(),
            cos_g0: gamma0.cos(),
            alpha_c,
            u_c,
            false_easting: params.x0,
            false_northing: params.y0,
        })
    }
}

impl Projection for ObliqueMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lam0);
        let (u_big, u) = if (lat.abs() - FRAC_PI_2).abs() > EPSLN {
            let q = self.big_e / tsfn(lat, self.e).powf(self.b);
            let s = 0.5 * (q - 1.0 / q);
            let t = 0.5 * (q + 1.0 / q);
            let (sin_bl, cos_bl) = (self.b * dlon).sin_cos();
            let u_big = (s * self.sin_g0 - sin_bl * self.cos_g0) / t;
            let u = self.a_scaled / self.b * (s * self.cos_g0 + sin_bl * self.sin_g0).atan2(cos_bl);
            (u_big, u)
        } else {
            (self.sin_g0.copysign(lat), self.a_scaled * lat / self.b)
        };
        if (u_big.abs() - 1.0).abs() <= EPSLN {
            return Err(ProjError::Domain(
                "omerc: point 90° from the central line".to_string(),
            ));
        }

        let v = 0.5 * self.a_scaled * ((1.0 - u_big) / (1.0 + u_big)).ln() / self.b;
        let u = u - self.u_c;
        let (sin_a, cos_a) = self.alpha_c.sin_cos();
        Ok((
            self.false_easting + v * cos_a + u * sin_a,
            self.false_northing + u * cos_a - v * sin_a,
        ))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = y - self.false_northing;
        let (sin_a, cos_a) = self.alpha_c.sin_cos();
        let v = x * cos_a - y * sin_a;
        let u = y * cos_a + x * sin_a + self.u_c;

        let q = (-self.b * v / self.a_scaled).exp();
        let s = 0.5 * (q - 1.0 / q);
        let t = 0.5 * (q + 1.0 / q);
        let (sin_bu, cos_bu) = (self.b * u / self.a_scaled).sin_cos();
        let u_big = (sin_bu * self.cos_g0 + s * self.sin_g0) / t;
        if (u_big.abs() - 1.0).abs() <= EPSLN {
            return Ok((self.lam0, FRAC_PI_2.copysign(u_big)));
        }

        let ts = (self.big_e / ((1.0 + u_big) / (1.0 - u_big)).sqrt()).powf(1.0 / self.b);
        let lat = phi_from_ts(ts, self.e)?;
        let lon = self.lam0 - (s * self.cos_g0 - sin_bu * self.sin_g0).atan2(cos_bu) / self.b;
        Ok((adjust_lon(lon), lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // Borneo RSO style centre and azimuth
    const BORNEO: &str = "+proj=omerc +lat_0=4 +lonc=115 +alpha=53.31582047 +k=0.99984 \
                          +x_0=590476.87 +y_0=442857.65 +ellps=evrst69";

    fn omerc(def: &str) -> Result<ObliqueMercator, ProjError> {
        ObliqueMercator::new(&CrsParams::parse(def)?)
    }

    fn assert_roundtrip(proj: &ObliqueMercator, cases: &[(f64, f64)]) {
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
    fn test_centre_maps_to_false_origin() {
        let proj = omerc(BORNEO).unwrap();
        let (x, y) = proj
            .forward(115.0_f64.to_radians(), 4.0_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 590_476.87, epsilon = 1e-3);
        assert_relative_eq!(y, 442_857.65, epsilon = 1e-3);
    }

    #[test]
    fn test_azimuth_roundtrip() {
        let proj = omerc(BORNEO).unwrap();
        assert_roundtrip(&proj, &[(114.0, 3.0), (117.5, 6.2), (110.0, 1.0), (119.0, 7.0)]);
    }

    #[test]
    fn test_two_points_lie_on_central_line() {
        let proj = omerc(
            "+proj=omerc +lat_0=40 +lat_1=47 +lon_1=-75 +lat_2=40 +lon_2=-74 +ellps=WGS84",
        )
        .unwrap();
        let (sin_a, cos_a) = proj.alpha_c.sin_cos();
        for &(lon, lat) in &[(-75.0_f64, 47.0_f64), (-74.0, 40.0)] {
            let (x, y) = proj.forward(lon.to_radians(), lat.to_radians()).unwrap();
            // distance across the central line
            assert_relative_eq!(x * cos_a - y * sin_a, 0.0, epsilon = 1e-6);
        }
        assert_roundtrip(&proj, &[(-75.0, 45.0), (-70.0, 50.0), (-80.0, 35.0)]);
    }

    #[test]
    fn test_natural_origin_offset() {
        let centred = omerc(BORNEO).unwrap();
        let natural = omerc(&format!("{BORNEO} +no_uoff")).unwrap();
        assert_eq!(natural.u_c, 0.0);
        let (x, y) = natural
            .forward(115.0_f64.to_radians(), 4.0_f64.to_radians())
            .unwrap();
        // the centre sits uc along the central line from the natural origin
        let (sin_a, cos_a) = centred.alpha_c.sin_cos();
        assert_relative_eq!(x - 590_476.87, centred.u_c * sin_a, epsilon = 1e-3);
        assert_relative_eq!(y - 442_857.65, centred.u_c * cos_a, epsilon = 1e-3);
        assert_roundtrip(&natural, &[(114.0, 3.0), (117.5, 6.2)]);
    }

    #[test]
    fn test_sphere() {
        let proj = omerc("+proj=omerc +lat_0=45 +lonc=10 +alpha=30 +R=6371000").unwrap();
        let (x, y) = proj
            .forward(10.0_f64.to_radians(), 45.0_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(y, 0.0, epsilon = 1e-6);
        assert_roundtrip(&proj, &[(12.0, 47.0), (5.0, 40.0), (20.0, 30.0)]);
    }

    #[test]
    fn test_invalid_definitions() {
        assert!(matches!(
            omerc("+proj=omerc +lat_0=40 +lat_1=45 +lon_1=-75 +lat_2=45 +lon_2=-70"),
            Err(ProjError::Config(_))
        ));
        assert!(matches!(
            omerc("+proj=omerc +lat_0=90 +lonc=0 +alpha=10"),
            Err(ProjError::Config(_))
        ));
    }
}
