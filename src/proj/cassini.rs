//! Cassini-Soldner transverse cylindrical projection.
//!
//! Sphere: x = a·asin(cos φ sin Δλ),  y = a·(atan2(tan φ, cos Δλ) - φ₀)
//! Ellipsoid: Snyder's series in A = Δλ·cos φ, T = tan² φ, C = e'² cos² φ
//! around the meridian distance M(φ). The series round-trips to 1e-6°
//! within about 3° of the central meridian; at 5° the error is near 1e-5°.

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, MeridianDistance};
use crate::proj::Projection;

const C1: f64 = 1.0 / 6.0;
const C2: f64 = 1.0 / 120.0;
const C3: f64 = 1.0 / 24.0;
const C4: f64 = 1.0 / 3.0;
const C5: f64 = 1.0 / 15.0;

pub struct Cassini {
    a: f64,
    es: f64,
    sphere: bool,
    lat0: f64,
    lon0: f64,
    meridian: MeridianDistance,
    m0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Cassini::new(params)))
}

impl Cassini {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let meridian = MeridianDistance::new(ell.es);
        let (sin0, cos0) = params.lat0.sin_cos();
        Self {
            a: ell.a,
            es: ell.es,
            sphere: ell.sphere,
            lat0: params.lat0,
            lon0: params.long0,
            m0: meridian.distance(params.lat0, sin0, cos0),
            meridian,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for Cassini {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlon = adjust_lon(lon - self.lon0);
        let (x, y) = if self.sphere {
            (
                (lat.cos() * dlon.sin()).asin(),
                lat.tan().atan2(dlon.cos()) - self.lat0,
            )
        } else {
            let (sinphi, cosphi) = lat.sin_cos();
            let m = self.meridian.distance(lat, sinphi, cosphi);
            let n = 1.0 / (1.0 - self.es * sinphi * sinphi).sqrt();
            let tn = lat.tan();
            let t = tn * tn;
            let a1 = dlon * cosphi;
            let c = self.es * cosphi * cosphi / (1.0 - self.es);
            let a2 = a1 * a1;
            let x = n * a1 * (1.0 - a2 * t * (C1 - (8.0 - t + 8.0 * c) * a2 * C2));
            let y = m - self.m0 + n * tn * a2 * (0.5 + (5.0 - t + 6.0 * c) * a2 * C3);
            (x, y)
        };
        Ok((self.a * x + self.false_easting, self.a * y + self.false_northing))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = (x - self.false_easting) / self.a;
        let y = (y - self.false_northing) / self.a;
        let (dlon, lat) = if self.sphere {
            let dd = y + self.lat0;
            ((x.tan()).atan2(dd.cos()), (dd.sin() * x.cos()).asin())
        } else {
            let phi1 = self.meridian.inverse(self.m0 + y)?;
            let tn = phi1.tan();
            let t = tn * tn;
            let sinphi = phi1.sin();
            let r0 = 1.0 / (1.0 - self.es * sinphi * sinphi);
            let n = r0.sqrt();
            let r = r0 * (1.0 - self.es) * n;
            let dd = x / n;
            let d2 = dd * dd;
            let lat = phi1 - n * tn / r * d2 * (0.5 - (1.0 + 3.0 * t) * d2 * C3);
            let dlon = dd * (1.0 + t * d2 * (-C4 + (1.0 + 3.0 * t) * d2 * C5)) / phi1.cos();
            (dlon, lat)
        };
        Ok((adjust_lon(self.lon0 + dlon), lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn cass(def: &str) -> Cassini {
        Cassini::new(&CrsParams::parse(def).unwrap())
    }

    #[test]
    fn test_origin() {
        let proj = cass("+proj=cass +lat_0=10.4416666 +lon_0=-61.3333333 +x_0=86501.46 +y_0=65379.0 +a=6378293.645 +b=6356617.987");
        let (x, y) = proj
            .forward((-61.3333333_f64).to_radians(), 10.4416666_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 86_501.46, epsilon = 1e-6);
        assert_relative_eq!(y, 65_379.0, epsilon = 1e-6);
    }

    #[test]
    fn test_ellipsoidal_roundtrip() {
        let proj = cass("+proj=cass +lat_0=52.41864827777778 +lon_0=13.62720366666667 +x_0=40000 +y_0=10000 +ellps=bessel");
        for &(lon_deg, lat_deg) in &[(13.4, 52.5), (13.9, 52.3), (13.627, 52.0)] {
            let lon = f64::to_radians(lon_deg);
            let lat = f64::to_radians(lat_deg);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_ellipsoidal_band_accuracy() {
        let proj = cass("+proj=cass +lat_0=0 +lon_0=0 +ellps=WGS84");
        for lat_deg in (0..80).step_by(5) {
            let lon = 2.0_f64.to_radians();
            let lat = f64::from(lat_deg).to_radians();
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2.to_degrees(), 2.0, epsilon = 1e-6);
            assert_relative_eq!(lat2.to_degrees(), f64::from(lat_deg), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_spherical_roundtrip() {
        let proj = cass("+proj=cass +lat_0=30 +lon_0=-5 +a=6371000 +b=6371000");
        for &(lon, lat) in &[(0.1, 0.6), (-0.4, 0.2), (0.3, -0.5)] {
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-12);
            assert_relative_eq!(lat2, lat, epsilon = 1e-12);
        }
    }
}
