//! Runtime datum: geodetic/geocentric conversion and the shift to and from
//! WGS84.
//!
//! Geocentric coordinates are Earth-centred Cartesian metres:
//!
//!   X = (N + h) cos φ cos λ
//!   Y = (N + h) cos φ sin λ
//!   Z = (N (1 - e²) + h) sin φ,   N = a / √(1 - e² sin² φ)
//!
//! The inverse uses the iterative scheme of Bowring-style refinement on the
//! (sin φ, cos φ) pair.

use std::f64::consts::{FRAC_PI_2, PI};

use crate::catalog::Ellipsoid;
use crate::error::ProjError;
use crate::point::Point;

const GENAU: f64 = 1.0e-12;
const GENAU2: f64 = GENAU * GENAU;
const MAXITER: usize = 30;

/// Datum shift semantics.
#[derive(Clone, Debug, PartialEq)]
pub enum DatumKind {
    /// No shift relative to WGS84
    Wgs84,
    /// Never shifted, never compared
    NoDatum,
    /// Geocentric translation (metres)
    ThreeParam([f64; 3]),
    /// Bursa-Wolf: translations in metres, rotations in radians, scale as
    /// `1 + ppm / 1e6`
    SevenParam {
        dx: f64,
        dy: f64,
        dz: f64,
        rx: f64,
        ry: f64,
        rz: f64,
        scale: f64,
    },
    /// Named grid files; recognized but not applied
    GridShift(String),
}

impl DatumKind {
    fn is_parametric(&self) -> bool {
        matches!(self, DatumKind::ThreeParam(_) | DatumKind::SevenParam { .. })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Datum {
    pub kind: DatumKind,
    pub a: f64,
    pub b: f64,
    pub es: f64,
    pub ep2: f64,
}

impl Datum {
    pub fn new(kind: DatumKind, ellipsoid: &Ellipsoid) -> Self {
        Self {
            kind,
            a: ellipsoid.a,
            b: ellipsoid.b,
            es: ellipsoid.es,
            ep2: ellipsoid.ep2,
        }
    }

    /// Needs a 3- or 7-parameter shift to reach WGS84.
    pub fn is_shifted(&self) -> bool {
        self.kind.is_parametric()
    }

    /// Same kind, same ellipsoid (a exact, es within 5e-11) and same shift
    /// parameters.
    pub fn compare(&self, other: &Datum) -> bool {
        if self.a != other.a || (self.es - other.es).abs() > 5.0e-11 {
            return false;
        }
        match (&self.kind, &other.kind) {
            (DatumKind::GridShift(_), _) | (_, DatumKind::GridShift(_)) => false,
            (a, b) => a == b,
        }
    }

    /// (lon, lat radians, height) to geocentric X/Y/Z.
    pub fn geodetic_to_geocentric(&self, p: Point) -> Result<Point, ProjError> {
        let mut lon = p.x;
        let mut lat = p.y;
        let height = p.z;

        if lat < -FRAC_PI_2 && lat > -1.001 * FRAC_PI_2 {
            lat = -FRAC_PI_2;
        } else if lat > FRAC_PI_2 && lat < 1.001 * FRAC_PI_2 {
            lat = FRAC_PI_2;
        } else if !(-FRAC_PI_2..=FRAC_PI_2).contains(&lat) {
            return Err(ProjError::Domain(format!(
                "latitude {lat} rad outside geocentric range"
            )));
        }
        if lon > PI {
            lon -= 2.0 * PI;
        }

        let (sin_lat, cos_lat) = lat.sin_cos();
        let rn = self.a / (1.0 - self.es * sin_lat * sin_lat).sqrt();
        Ok(Point::with_z(
            (rn + height) * cos_lat * lon.cos(),
            (rn + height) * cos_lat * lon.sin(),
            (rn * (1.0 - self.es) + height) * sin_lat,
        ))
    }

    /// Geocentric X/Y/Z back to (lon, lat radians, height).
    pub fn geocentric_to_geodetic(&self, p: Point) -> Result<Point, ProjError> {
        let (x, y, z) = (p.x, p.y, p.z);
        let dist = (x * x + y * y).sqrt();
        let radius = (x * x + y * y + z * z).sqrt();

        let lon = if dist / self.a < GENAU {
            if radius / self.a < GENAU {
                // Earth's centre
                return Ok(Point::with_z(0.0, FRAC_PI_2, -self.b));
            }
            0.0
        } else {
            y.atan2(x)
        };

        let ct = z / radius;
        let st = dist / radius;
        let rx = 1.0 / (1.0 - self.es * (2.0 - self.es) * st * st).sqrt();
        let mut cphi = st * (1.0 - self.es) * rx;
        let mut sphi = ct * rx;
        let mut height;

        let mut iter = 0;
        loop {
            iter += 1;
            let rn = self.a / (1.0 - self.es * sphi * sphi).sqrt();
            height = dist * cphi + z * sphi - rn * (1.0 - self.es * sphi * sphi);
            let rk = self.es * rn / (rn + height);
            let rx = 1.0 / (1.0 - rk * (2.0 - rk) * st * st).sqrt();
            let cphi_next = st * (1.0 - rk) * rx;
            let sphi_next = ct * rx;
            let sdphi = sphi_next * cphi - cphi_next * sphi;
            cphi = cphi_next;
            sphi = sphi_next;
            if sdphi * sdphi <= GENAU2 {
                break;
            }
            if iter >= MAXITER {
                return Err(ProjError::convergence("geocentric to geodetic"));
            }
        }

        let lat = (sphi / cphi.abs()).atan();
        Ok(Point::with_z(lon, lat, height))
    }

    /// Geocentric point on this datum to WGS84.
    pub fn to_wgs84(&self, p: Point) -> Point {
        match self.kind {
            DatumKind::ThreeParam([dx, dy, dz]) => Point::with_z(p.x + dx, p.y + dy, p.z + dz),
            DatumKind::SevenParam {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                scale,
            } => Point::with_z(
                scale * (p.x - rz * p.y + ry * p.z) + dx,
                scale * (rz * p.x + p.y - rx * p.z) + dy,
                scale * (-ry * p.x + rx * p.y + p.z) + dz,
            ),
            _ => p,
        }
    }

    /// Geocentric WGS84 point onto this datum.
    pub fn from_wgs84(&self, p: Point) -> Point {
        match self.kind {
            DatumKind::ThreeParam([dx, dy, dz]) => Point::with_z(p.x - dx, p.y - dy, p.z - dz),
            DatumKind::SevenParam {
                dx,
                dy,
                dz,
                rx,
                ry,
                rz,
                scale,
            } => {
                let x = (p.x - dx) / scale;
                let y = (p.y - dy) / scale;
                let z = (p.z - dz) / scale;
                Point::with_z(x + rz * y - ry * z, -rz * x + y + rx * z, ry * x - rx * y + z)
            }
            _ => p,
        }
    }
}
