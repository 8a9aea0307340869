//! Lambert Azimuthal Equal Area projection (EPSG:3035 and friends).
//!
//! The ellipsoidal form projects the authalic latitude β, sin β = q(φ)/q_p,
//! from a sphere of radius R_q = a·sqrt(q_p/2):
//!   B = R_q·sqrt(2 / (1 + sin β₁ sin β + cos β₁ cos β cos Δλ))
//!   x = B·D·cos β sin Δλ,  y = (B/D)·(cos β₁ sin β - sin β₁ cos β cos Δλ)
//! with D stretching the oblique aspect so the origin has unit scale.
//! The inverse returns through the authalic-latitude series.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, authlat, authset, qsfn, EPSLN};
use crate::proj::Projection;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Aspect {
    SouthPole,
    NorthPole,
    Equatorial,
    Oblique,
}

pub struct LambertAzimuthalEqualArea {
    a: f64,
    e: f64,
    sphere: bool,
    aspect: Aspect,
    lat0: f64,
    lon0: f64,
    qp: f64,
    apa: [f64; 3],
    rq: f64,
    dd: f64,
    xmf: f64,
    ymf: f64,
    // authalic origin on the ellipsoid, geodetic on the sphere
    sin_b1: f64,
    cos_b1: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(LambertAzimuthalEqualArea::new(params)))
}

impl LambertAzimuthalEqualArea {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let (e, es, lat0) = (ell.e, ell.es, params.lat0);
        let t = lat0.abs();
        let aspect = if (t - FRAC_PI_2).abs() < EPSLN {
            if lat0 < 0.0 {
                Aspect::SouthPole
            } else {
                Aspect::NorthPole
            }
        } else if t < EPSLN {
            Aspect::Equatorial
        } else {
            Aspect::Oblique
        };

        let mut proj = Self {
            a: ell.a,
            e,
            sphere: ell.sphere,
            aspect,
            lat0,
            lon0: params.long0,
            qp: 0.0,
            apa: [0.0; 3],
            rq: 1.0,
            dd: 1.0,
            xmf: 1.0,
            ymf: 1.0,
            sin_b1: lat0.sin(),
            cos_b1: lat0.cos(),
            false_easting: params.x0,
            false_northing: params.y0,
        };
        if ell.sphere {
            return proj;
        }

        proj.qp = qsfn(FRAC_PI_2, e);
        proj.apa = authset(es);
        match aspect {
            Aspect::NorthPole | Aspect::SouthPole => proj.dd = 1.0,
            Aspect::Equatorial => {
                proj.rq = (0.5 * proj.qp).sqrt();
                proj.dd = 1.0 / proj.rq;
                proj.xmf = 1.0;
                proj.ymf = 0.5 * proj.qp;
            }
            Aspect::Oblique => {
                proj.rq = (0.5 * proj.qp).sqrt();
                let sinphi = lat0.sin();
                proj.sin_b1 = qsfn(lat0, e) / proj.qp;
                proj.cos_b1 = (1.0 - proj.sin_b1 * proj.sin_b1).sqrt();
                proj.dd = lat0.cos() / ((1.0 - es * sinphi * sinphi).sqrt() * proj.rq * proj.cos_b1);
                proj.xmf = proj.rq * proj.dd;
                proj.ymf = proj.rq / proj.dd;
            }
        }
        proj
    }

    fn forward_sphere(&self, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, coslam) = lam.sin_cos();
        match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let denom = if self.aspect == Aspect::Equatorial {
                    1.0 + cosphi * coslam
                } else {
                    1.0 + self.sin_b1 * sinphi + self.cos_b1 * cosphi * coslam
                };
                if denom <= EPSLN {
                    return Err(ProjError::Domain("laea: antipode of the origin".to_string()));
                }
                let k = (2.0 / denom).sqrt();
                let y = if self.aspect == Aspect::Equatorial {
                    k * sinphi
                } else {
                    k * (self.cos_b1 * sinphi - self.sin_b1 * cosphi * coslam)
                };
                Ok((k * cosphi * sinlam, y))
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if (phi + self.lat0).abs() < EPSLN {
                    return Err(ProjError::Domain(
                        "laea: pole opposite the projection centre".to_string(),
                    ));
                }
                let coslam = if self.aspect == Aspect::NorthPole { -coslam } else { coslam };
                let half = FRAC_PI_4 - 0.5 * phi;
                let rho = 2.0
                    * if self.aspect == Aspect::SouthPole {
                        half.cos()
                    } else {
                        half.sin()
                    };
                Ok((rho * sinlam, rho * coslam))
            }
        }
    }

    fn forward_ellipsoid(&self, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sinlam, coslam) = lam.sin_cos();
        let mut q = qsfn(phi, self.e);
        let (sin_b, cos_b) = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let s = q / self.qp;
                (s, (1.0 - s * s).sqrt())
            }
            _ => (0.0, 0.0),
        };
        let b = match self.aspect {
            Aspect::Oblique => 1.0 + self.sin_b1 * sin_b + self.cos_b1 * cos_b * coslam,
            Aspect::Equatorial => 1.0 + cos_b * coslam,
            Aspect::NorthPole => {
                q = self.qp - q;
                FRAC_PI_2 + phi
            }
            Aspect::SouthPole => {
                q += self.qp;
                phi - FRAC_PI_2
            }
        };
        if b.abs() < EPSLN {
            return Err(ProjError::Domain(
                "laea: point opposite the projection centre".to_string(),
            ));
        }
        Ok(match self.aspect {
            Aspect::Oblique => {
                let b = (2.0 / b).sqrt();
                (
                    self.xmf * b * cos_b * sinlam,
                    self.ymf * b * (self.cos_b1 * sin_b - self.sin_b1 * cos_b * coslam),
                )
            }
            Aspect::Equatorial => {
                let b = (2.0 / b).sqrt();
                (self.xmf * b * cos_b * sinlam, self.ymf * b * sin_b)
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if q >= 0.0 {
                    let rho = q.sqrt();
                    let y = if self.aspect == Aspect::SouthPole { rho } else { -rho };
                    (rho * sinlam, coslam * y)
                } else {
                    (0.0, 0.0)
                }
            }
        })
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rh = x.hypot(y);
        let half = 0.5 * rh;
        if half > 1.0 {
            return Err(ProjError::Domain(
                "laea: point outside the projected disc".to_string(),
            ));
        }
        let z = 2.0 * half.asin();
        let (sin_z, cos_z) = z.sin_cos();
        let (phi, x, y) = match self.aspect {
            Aspect::Equatorial => {
                let phi = if rh.abs() <= EPSLN { 0.0 } else { (y * sin_z / rh).asin() };
                (phi, x * sin_z, cos_z * rh)
            }
            Aspect::Oblique => {
                let phi = if rh.abs() <= EPSLN {
                    self.lat0
                } else {
                    (cos_z * self.sin_b1 + y * sin_z * self.cos_b1 / rh).asin()
                };
                (
                    phi,
                    x * sin_z * self.cos_b1,
                    (cos_z - phi.sin() * self.sin_b1) * rh,
                )
            }
            Aspect::NorthPole => (FRAC_PI_2 - z, x, -y),
            Aspect::SouthPole => (z - FRAC_PI_2, x, y),
        };
        let polar = matches!(self.aspect, Aspect::NorthPole | Aspect::SouthPole);
        let lam = if y == 0.0 && !polar { 0.0 } else { x.atan2(y) };
        Ok((lam, phi))
    }

    fn inverse_ellipsoid(&self, x: f64, y: f64) -> (f64, f64) {
        let (x, y, ab) = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let x = x / self.dd;
                let y = y * self.dd;
                let rho = x.hypot(y);
                if rho < EPSLN {
                    return (0.0, self.lat0);
                }
                let s_ce = 2.0 * (0.5 * rho / self.rq).asin();
                let (sin_ce, cos_ce) = s_ce.sin_cos();
                let x = x * sin_ce;
                if self.aspect == Aspect::Oblique {
                    (
                        x,
                        rho * self.cos_b1 * cos_ce - y * self.sin_b1 * sin_ce,
                        cos_ce * self.sin_b1 + y * sin_ce * self.cos_b1 / rho,
                    )
                } else {
                    (x, rho * cos_ce, y * sin_ce / rho)
                }
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                let y = if self.aspect == Aspect::NorthPole { -y } else { y };
                let q = x * x + y * y;
                if q == 0.0 {
                    return (0.0, self.lat0);
                }
                let ab = 1.0 - q / self.qp;
                (x, y, if self.aspect == Aspect::SouthPole { -ab } else { ab })
            }
        };
        (x.atan2(y), authlat(ab.clamp(-1.0, 1.0).asin(), &self.apa))
    }
}

impl Projection for LambertAzimuthalEqualArea {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let lam = adjust_lon(lon - self.lon0);
        let (x, y) = if self.sphere {
            self.forward_sphere(lam, lat)?
        } else {
            self.forward_ellipsoid(lam, lat)?
        };
        Ok((self.a * x + self.false_easting, self.a * y + self.false_northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = (x - self.false_easting) / self.a;
        let y = (y - self.false_northing) / self.a;
        let (lam, phi) = if self.sphere {
            self.inverse_sphere(x, y)?
        } else {
            self.inverse_ellipsoid(x, y)
        };
        Ok((adjust_lon(self.lon0 + lam), phi))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn laea(def: &str) -> LambertAzimuthalEqualArea {
        LambertAzimuthalEqualArea::new(&CrsParams::parse(def).unwrap())
    }

    fn assert_roundtrip(proj: &LambertAzimuthalEqualArea, cases: &[(f64, f64)], eps: f64) {
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = eps);
            assert_relative_eq!(lat2, lat, epsilon = eps);
        }
    }

    // ETRS89 / LAEA Europe
    const EPSG_3035: &str =
        "+proj=laea +lat_0=52 +lon_0=10 +x_0=4321000 +y_0=3210000 +ellps=GRS80 +units=m";

    #[test]
    fn test_etrs_laea_reference_point() {
        let proj = laea(EPSG_3035);
        let (x, y) = proj
            .forward(5.0_f64.to_radians(), 50.0_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 3_962_799.45, epsilon = 0.01);
        assert_relative_eq!(y, 2_999_718.85, epsilon = 0.01);
    }

    #[test]
    fn test_origin_maps_to_false_origin() {
        let proj = laea(EPSG_3035);
        let (x, y) = proj
            .forward(10.0_f64.to_radians(), 52.0_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 4_321_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 3_210_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ellipsoidal_aspects_roundtrip() {
        // series latitude is good to a few 1e-9 rad
        assert_roundtrip(&laea(EPSG_3035), &[(5.0, 50.0), (25.0, 60.0), (-8.0, 38.0)], 1e-8);
        assert_roundtrip(&laea("+proj=laea +lat_0=0 +lon_0=0 +ellps=WGS84"), &[(20.0, 10.0), (-30.0, -40.0)], 1e-8);
        assert_roundtrip(&laea("+proj=laea +lat_0=90 +lon_0=0 +ellps=WGS84"), &[(20.0, 70.0), (-120.0, 50.0)], 1e-8);
        assert_roundtrip(&laea("+proj=laea +lat_0=-90 +lon_0=0 +ellps=WGS84"), &[(20.0, -70.0), (160.0, -60.0)], 1e-8);
    }

    #[test]
    fn test_spherical_aspects_roundtrip() {
        let r = "+a=6370997 +b=6370997";
        for (lat0, pts) in [
            (45.0, [(-100.0, 40.0), (-90.0, 50.0)]),
            (0.0, [(10.0, 20.0), (-30.0, -5.0)]),
            (90.0, [(10.0, 60.0), (-135.0, 30.0)]),
            (-90.0, [(10.0, -60.0), (45.0, -20.0)]),
        ] {
            let proj = laea(&format!("+proj=laea +lat_0={lat0} +lon_0=-100 {r}"));
            assert_roundtrip(&proj, &pts, 1e-10);
        }
    }

    #[test]
    fn test_spherical_inverse_outside_disc() {
        let proj = laea("+proj=laea +lat_0=45 +a=6370997 +b=6370997");
        assert!(matches!(
            proj.inverse(3.0 * 6_370_997.0, 0.0),
            Err(ProjError::Domain(_))
        ));
    }
}
