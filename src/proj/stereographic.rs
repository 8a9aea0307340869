//! Stereographic projections.
//!
//! `stere` picks its aspect from the latitude of origin: polar (EPSG:3031,
//! EPSG:3413, UPS), equatorial, or oblique. The ellipsoidal oblique aspect
//! works on the conformal latitude:
//!   X = 2·atan(tan(π/4 + φ/2)·((1 - e sin φ)/(1 + e sin φ))^(e/2)) - π/2
//!   A = akm1 / (cos X₁·(1 + sin X₁ sin X + cos X₁ cos X cos Δλ))
//!   x = A·cos X·sin Δλ,  y = A·(cos X₁ sin X - sin X₁ cos X cos Δλ)
//!
//! `sterea` is the double stereographic of the Netherlands and Romania: the
//! ellipsoid goes through the Gauss conformal sphere first, then a plain
//! oblique stereographic on that sphere.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, finite, tsfn, EPSLN};
use crate::proj::gauss::GaussSphere;
use crate::proj::Projection;

const TOL: f64 = 1.0e-8;
const NITER: usize = 8;
const CONV: f64 = 1.0e-10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Aspect {
    SouthPole,
    NorthPole,
    Oblique,
    Equatorial,
}

impl Aspect {
    fn from_origin(lat0: f64) -> Self {
        let t = lat0.abs();
        if (t - FRAC_PI_2).abs() < EPSLN {
            if lat0 < 0.0 {
                Aspect::SouthPole
            } else {
                Aspect::NorthPole
            }
        } else if t > EPSLN {
            Aspect::Oblique
        } else {
            Aspect::Equatorial
        }
    }

    fn is_polar(self) -> bool {
        matches!(self, Aspect::SouthPole | Aspect::NorthPole)
    }
}

/// `X = 2·atan(ssfn) - π/2` is the conformal latitude.
fn ssfn(phi: f64, sinphi: f64, e: f64) -> f64 {
    let con = e * sinphi;
    (0.5 * (FRAC_PI_2 + phi)).tan() * ((1.0 - con) / (1.0 + con)).powf(0.5 * e)
}

pub struct Stereographic {
    a: f64,
    e: f64,
    sphere: bool,
    aspect: Aspect,
    lat0: f64,
    lon0: f64,
    akm1: f64,
    // sphere: sin/cos of φ₀; ellipsoid: sin/cos of the conformal X₁
    sin_1: f64,
    cos_1: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Stereographic::new(params)))
}

pub fn init_oblique(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(ObliqueStereographic::new(params)))
}

impl Stereographic {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let (e, k0, lat0) = (ell.e, params.k0, params.lat0);
        let aspect = Aspect::from_origin(lat0);
        // latitude of true scale, polar aspects only
        let phits = params
            .lat_ts
            .filter(|&phi| phi != 0.0)
            .unwrap_or(FRAC_PI_2)
            .abs();
        let at_pole = (phits - FRAC_PI_2).abs() < EPSLN;

        let (akm1, sin_1, cos_1) = if ell.sphere {
            match aspect {
                Aspect::Oblique | Aspect::Equatorial => (2.0 * k0, lat0.sin(), lat0.cos()),
                Aspect::SouthPole | Aspect::NorthPole if at_pole => (2.0 * k0, 0.0, 0.0),
                Aspect::SouthPole | Aspect::NorthPole => {
                    (phits.cos() / (FRAC_PI_4 - 0.5 * phits).tan(), 0.0, 0.0)
                }
            }
        } else if aspect.is_polar() {
            let akm1 = if at_pole {
                2.0 * k0 / ((1.0 + e).powf(1.0 + e) * (1.0 - e).powf(1.0 - e)).sqrt()
            } else {
                let esin = e * phits.sin();
                phits.cos() / tsfn(phits, e) / (1.0 - esin * esin).sqrt()
            };
            (akm1, 0.0, 0.0)
        } else {
            let sinphi = lat0.sin();
            let x1 = 2.0 * ssfn(lat0, sinphi, e).atan() - FRAC_PI_2;
            let esin = e * sinphi;
            let akm1 = 2.0 * k0 * lat0.cos() / (1.0 - esin * esin).sqrt();
            (akm1, x1.sin(), x1.cos())
        };

        Self {
            a: ell.a,
            e,
            sphere: ell.sphere,
            aspect,
            lat0,
            lon0: params.long0,
            akm1,
            sin_1,
            cos_1,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }

    pub fn aspect(&self) -> Aspect {
        self.aspect
    }

    fn forward_sphere(&self, lam: f64, phi: f64) -> Result<(f64, f64), ProjError> {
        let (sinphi, cosphi) = phi.sin_cos();
        let (sinlam, coslam) = lam.sin_cos();
        match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let denom = 1.0 + self.sin_1 * sinphi + self.cos_1 * cosphi * coslam;
                if denom <= EPSLN {
                    return Err(ProjError::Domain(
                        "stere: antipode of the origin".to_string(),
                    ));
                }
                let k = self.akm1 / denom;
                Ok((
                    k * cosphi * sinlam,
                    k * (self.cos_1 * sinphi - self.sin_1 * cosphi * coslam),
                ))
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                let (phi, coslam) = if self.aspect == Aspect::NorthPole {
                    (-phi, -coslam)
                } else {
                    (phi, coslam)
                };
                if (phi - FRAC_PI_2).abs() < TOL {
                    return Err(ProjError::Domain(
                        "stere: pole opposite the projection centre".to_string(),
                    ));
                }
                let rho = self.akm1 * (FRAC_PI_4 + 0.5 * phi).tan();
                Ok((sinlam * rho, coslam * rho))
            }
        }
    }

    fn forward_ellipsoid(&self, lam: f64, phi: f64) -> (f64, f64) {
        let (sinlam, coslam) = lam.sin_cos();
        let sinphi = phi.sin();
        match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let x = 2.0 * ssfn(phi, sinphi, self.e).atan() - FRAC_PI_2;
                let (sin_x, cos_x) = x.sin_cos();
                let denom = self.cos_1 * (1.0 + self.sin_1 * sin_x + self.cos_1 * cos_x * coslam);
                let k = if denom == 0.0 { 0.0 } else { self.akm1 / denom };
                (
                    k * cos_x * sinlam,
                    k * (self.cos_1 * sin_x - self.sin_1 * cos_x * coslam),
                )
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                let (phi, coslam) = if self.aspect == Aspect::SouthPole {
                    (-phi, -coslam)
                } else {
                    (phi, coslam)
                };
                let rho = self.akm1 * tsfn(phi, self.e);
                (rho * sinlam, -rho * coslam)
            }
        }
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> (f64, f64) {
        let rh = x.hypot(y);
        let c = 2.0 * (rh / self.akm1).atan();
        let (sinc, cosc) = c.sin_cos();
        match self.aspect {
            Aspect::Equatorial => {
                let phi = if rh.abs() <= EPSLN { 0.0 } else { (y * sinc / rh).asin() };
                let lam = if cosc != 0.0 || x != 0.0 {
                    (x * sinc).atan2(cosc * rh)
                } else {
                    0.0
                };
                (lam, phi)
            }
            Aspect::Oblique => {
                let phi = if rh.abs() <= EPSLN {
                    self.lat0
                } else {
                    (cosc * self.sin_1 + y * sinc * self.cos_1 / rh).asin()
                };
                let c = cosc - self.sin_1 * phi.sin();
                let lam = if c != 0.0 || x != 0.0 {
                    (x * sinc * self.cos_1).atan2(c * rh)
                } else {
                    0.0
                };
                (lam, phi)
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                let y = if self.aspect == Aspect::NorthPole { -y } else { y };
                let phi = if rh.abs() <= EPSLN {
                    self.lat0
                } else if self.aspect == Aspect::SouthPole {
                    (-cosc).asin()
                } else {
                    cosc.asin()
                };
                let lam = if x == 0.0 && y == 0.0 { 0.0 } else { x.atan2(y) };
                (lam, phi)
            }
        }
    }

    fn inverse_ellipsoid(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let rho = x.hypot(y);
        let (mut x, mut y) = (x, y);
        let (tp, mut phi_l, halfpi, halfe) = match self.aspect {
            Aspect::Equatorial | Aspect::Oblique => {
                let t = 2.0 * (rho * self.cos_1).atan2(self.akm1);
                let (sin_t, cos_t) = t.sin_cos();
                let phi_l = if rho == 0.0 {
                    (cos_t * self.sin_1).asin()
                } else {
                    (cos_t * self.sin_1 + y * sin_t * self.cos_1 / rho).asin()
                };
                x *= sin_t;
                y = rho * self.cos_1 * cos_t - y * self.sin_1 * sin_t;
                (
                    (0.5 * (FRAC_PI_2 + phi_l)).tan(),
                    phi_l,
                    FRAC_PI_2,
                    0.5 * self.e,
                )
            }
            Aspect::NorthPole | Aspect::SouthPole => {
                if self.aspect == Aspect::NorthPole {
                    y = -y;
                }
                let tp = -rho / self.akm1;
                (tp, FRAC_PI_2 - 2.0 * tp.atan(), -FRAC_PI_2, -0.5 * self.e)
            }
        };

        for _ in 0..NITER {
            let esin = self.e * phi_l.sin();
            let phi = 2.0 * (tp * ((1.0 + esin) / (1.0 - esin)).powf(halfe)).atan() - halfpi;
            if (phi_l - phi).abs() < CONV {
                let phi = if self.aspect == Aspect::SouthPole { -phi } else { phi };
                let lam = if x == 0.0 && y == 0.0 { 0.0 } else { x.atan2(y) };
                return Ok((lam, phi));
            }
            phi_l = phi;
        }
        Err(ProjError::convergence("stere inverse"))
    }
}

impl Projection for Stereographic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let lam = adjust_lon(lon - self.lon0);
        let (x, y) = if self.sphere {
            self.forward_sphere(lam, lat)?
        } else {
            self.forward_ellipsoid(lam, lat)
        };
        finite(
            x * self.a + self.false_easting,
            y * self.a + self.false_northing,
            "stere",
        )
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = (x - self.false_easting) / self.a;
        let y = (y - self.false_northing) / self.a;
        let (lam, phi) = if self.sphere {
            self.inverse_sphere(x, y)
        } else {
            self.inverse_ellipsoid(x, y)?
        };
        Ok((adjust_lon(lam + self.lon0), phi))
    }
}

/// Oblique stereographic on the Gauss conformal sphere.
pub struct ObliqueStereographic {
    gauss: GaussSphere,
    a: f64,
    lon0: f64,
    k0: f64,
    r2: f64,
    sin_c0: f64,
    cos_c0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl ObliqueStereographic {
    pub fn new(params: &CrsParams) -> Self {
        let gauss = GaussSphere::new(params);
        Self {
            a: params.ellipsoid.a,
            lon0: params.long0,
            k0: params.k0,
            r2: 2.0 * gauss.rc,
            sin_c0: gauss.phic0.sin(),
            cos_c0: gauss.phic0.cos(),
            false_easting: params.x0,
            false_northing: params.y0,
            gauss,
        }
    }
}

impl Projection for ObliqueStereographic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let (lam, chi) = self.gauss.to_sphere(adjust_lon(lon - self.lon0), lat);
        let (sin_chi, cos_chi) = chi.sin_cos();
        let cos_lam = lam.cos();
        let k = self.k0 * self.r2 / (1.0 + self.sin_c0 * sin_chi + self.cos_c0 * cos_chi * cos_lam);
        let x = k * cos_chi * lam.sin();
        let y = k * (self.cos_c0 * sin_chi - self.sin_c0 * cos_chi * cos_lam);
        finite(
            self.a * x + self.false_easting,
            self.a * y + self.false_northing,
            "sterea",
        )
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = (x - self.false_easting) / self.a / self.k0;
        let y = (y - self.false_northing) / self.a / self.k0;
        let rho = x.hypot(y);
        let (lam, chi) = if rho != 0.0 {
            let c = 2.0 * rho.atan2(self.r2);
            let (sinc, cosc) = c.sin_cos();
            let chi = (cosc * self.sin_c0 + y * sinc * self.cos_c0 / rho).asin();
            let lam = (x * sinc).atan2(rho * self.cos_c0 * cosc - y * self.sin_c0 * sinc);
            (lam, chi)
        } else {
            (0.0, self.gauss.phic0)
        };
        let (lon, lat) = self.gauss.from_sphere(lam, chi)?;
        Ok((adjust_lon(lon + self.lon0), lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn params(def: &str) -> CrsParams {
        CrsParams::parse(def).unwrap()
    }

    fn assert_roundtrip(proj: &dyn Projection, cases: &[(f64, f64)], eps: f64) {
        for &(lon_deg, lat_deg) in cases {
            let lon = lon_deg.to_radians();
            let lat = lat_deg.to_radians();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = eps);
            assert_relative_eq!(lat2, lat, epsilon = eps);
        }
    }

    // EPSG:3031, Antarctic Polar Stereographic
    const ANTARCTIC: &str = "+proj=stere +lat_0=-90 +lat_ts=-71 +lon_0=0 +k=1 +x_0=0 +y_0=0 +ellps=WGS84";
    // EPSG:3413, NSIDC Sea Ice Polar Stereographic North
    const ARCTIC: &str = "+proj=stere +lat_0=90 +lat_ts=70 +lon_0=-45 +k=1 +x_0=0 +y_0=0 +ellps=WGS84";

    #[test]
    fn test_aspect_from_origin() {
        let aspect = |def| Stereographic::new(&params(def)).aspect();
        assert_eq!(aspect(ANTARCTIC), Aspect::SouthPole);
        assert_eq!(aspect(ARCTIC), Aspect::NorthPole);
        assert_eq!(aspect("+proj=stere +lat_0=45 +ellps=WGS84"), Aspect::Oblique);
        assert_eq!(aspect("+proj=stere +lat_0=0 +ellps=WGS84"), Aspect::Equatorial);
        assert_eq!(aspect("+proj=stere +lat_0=-30 +ellps=WGS84"), Aspect::Oblique);
    }

    #[test]
    fn test_polar_antarctic_roundtrip() {
        let proj = Stereographic::new(&params(ANTARCTIC));
        assert_roundtrip(
            &proj,
            &[(0.0, -75.0), (90.0, -80.0), (-120.0, -70.0), (45.0, -65.0)],
            1e-9,
        );
    }

    #[test]
    fn test_polar_arctic_roundtrip() {
        let proj = Stereographic::new(&params(ARCTIC));
        assert_roundtrip(
            &proj,
            &[(-45.0, 75.0), (0.0, 80.0), (90.0, 85.0), (-90.0, 70.0)],
            1e-9,
        );
    }

    #[test]
    fn test_polar_south_pole() {
        let proj = Stereographic::new(&params(ANTARCTIC));
        let (x, y) = proj.forward(0.0, -FRAC_PI_2).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1.0);
        assert_relative_eq!(y, 0.0, epsilon = 1.0);
    }

    #[test]
    fn test_polar_north_pole() {
        let proj = Stereographic::new(&params(ARCTIC));
        let (x, y) = proj.forward((-45.0_f64).to_radians(), FRAC_PI_2).unwrap();
        assert_relative_eq!(x, 0.0, epsilon = 1.0);
        assert_relative_eq!(y, 0.0, epsilon = 1.0);
    }

    #[test]
    fn test_ups_north_false_origin() {
        let proj = Stereographic::new(&params(
            "+proj=stere +lat_0=90 +lat_ts=90 +lon_0=0 +k=0.994 +x_0=2000000 +y_0=2000000 +ellps=WGS84",
        ));
        let (x, y) = proj.forward(0.0, FRAC_PI_2).unwrap();
        assert_relative_eq!(x, 2_000_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 2_000_000.0, epsilon = 1e-6);
        assert_roundtrip(&proj, &[(10.0, 85.0), (-170.0, 81.0)], 1e-9);
    }

    #[test]
    fn test_ellipsoidal_oblique_and_equatorial_roundtrip() {
        let oblique = Stereographic::new(&params("+proj=stere +lat_0=45 +lon_0=10 +k=0.9999 +ellps=GRS80"));
        assert_roundtrip(&oblique, &[(10.0, 45.0), (12.0, 47.0), (5.0, 40.0)], 1e-9);
        let equatorial = Stereographic::new(&params("+proj=stere +lat_0=0 +lon_0=0 +ellps=WGS84"));
        assert_roundtrip(&equatorial, &[(5.0, 3.0), (-20.0, -10.0)], 1e-9);
        // centre scale k0 on the equatorial aspect
        let (x, _) = equatorial.forward(1e-6, 0.0).unwrap();
        assert_relative_eq!(x, 6_378_137.0 * 1e-6, epsilon = 1e-6);
    }

    #[test]
    fn test_spherical_aspects_roundtrip() {
        for def in [
            "+proj=stere +lat_0=40 +lon_0=-100 +a=6370997 +b=6370997",
            "+proj=stere +lat_0=0 +lon_0=0 +a=6370997 +b=6370997",
            "+proj=stere +lat_0=90 +lat_ts=60 +a=6370997 +b=6370997",
            "+proj=stere +lat_0=-90 +a=6370997 +b=6370997",
        ] {
            let proj = Stereographic::new(&params(def));
            let lat0 = proj.lat0.to_degrees();
            let lat = if lat0.abs() > 80.0 { lat0.signum() * 70.0 } else { lat0 + 5.0 };
            assert_roundtrip(&proj, &[(10.0, lat), (-15.0, lat - 3.0 * lat0.signum())], 1e-9);
        }
    }

    #[test]
    fn test_spherical_antipode_is_domain_error() {
        let proj = Stereographic::new(&params("+proj=stere +lat_0=0 +lon_0=0 +a=6370997 +b=6370997"));
        assert!(matches!(
            proj.forward(std::f64::consts::PI, 0.0),
            Err(ProjError::Domain(_))
        ));
    }

    // EPSG:28992, Amersfoort / RD New
    const RD_NEW: &str = "+proj=sterea +lat_0=52.15616055555555 +lon_0=5.38763888888889 \
        +k=0.9999079 +x_0=155000 +y_0=463000 +ellps=bessel +units=m";

    #[test]
    fn test_oblique_origin() {
        let proj = ObliqueStereographic::new(&params(RD_NEW));
        let (x, y) = proj
            .forward(5.387_638_888_888_89_f64.to_radians(), 52.156_160_555_555_55_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 155_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 463_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_oblique_roundtrip() {
        let proj = ObliqueStereographic::new(&params(RD_NEW));
        assert_roundtrip(
            &proj,
            &[
                (5.387, 52.156), // origin
                (4.9, 52.37),    // Amsterdam area
                (5.5, 51.44),    // Eindhoven area
            ],
            1e-10,
        );
    }
}
