//! Swiss Oblique Mercator (CH1903 / LV03, LV95).
//!
//! Conformal double projection: ellipsoid onto a sphere of radius R touching
//! along φ₀, rotate the pole onto the origin, then a plain Mercator.
//!   α = sqrt(1 + e²/(1 - e²)·cos⁴φ₀),  b₀ = asin(sin φ₀ / α)
//!   K = ln tan(π/4 + b₀/2) - α·ln tan(π/4 + φ₀/2) + α·(e/2)·ln((1 + e sin φ₀)/(1 - e sin φ₀))

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::adjust_lon;
use crate::proj::Projection;

const MAX_ITER: usize = 20;
const TOLERANCE: f64 = 1e-12;

pub struct SwissObliqueMercator {
    e: f64,
    lon0: f64,
    r: f64,
    alpha: f64,
    b0: f64,
    k: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(SwissObliqueMercator::new(params)))
}

impl SwissObliqueMercator {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let (es, e) = (ell.es, ell.e);
        let lat0 = params.lat0;
        let sinphi = lat0.sin();

        let r = params.k0 * ell.a * (1.0 - es).sqrt() / (1.0 - es * sinphi * sinphi);
        let alpha = (1.0 + es / (1.0 - es) * lat0.cos().powi(4)).sqrt();
        let b0 = (sinphi / alpha).asin();
        let k = (FRAC_PI_4 + b0 / 2.0).tan().ln() - alpha * (FRAC_PI_4 + lat0 / 2.0).tan().ln()
            + alpha * e / 2.0 * ((1.0 + e * sinphi) / (1.0 - e * sinphi)).ln();

        Self {
            e,
            lon0: params.long0,
            r,
            alpha,
            b0,
            k,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for SwissObliqueMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let esin = self.e * lat.sin();
        let sa1 = (FRAC_PI_4 - lat / 2.0).tan().ln();
        let sa2 = self.e / 2.0 * ((1.0 + esin) / (1.0 - esin)).ln();
        let s = -self.alpha * (sa1 + sa2) + self.k;

        // latitude and longitude on the sphere
        let b = 2.0 * (s.exp().atan() - FRAC_PI_4);
        let i = self.alpha * adjust_lon(lon - self.lon0);

        // rotated onto the oblique pole
        let lon_r = (i.sin() / (self.b0.sin() * b.tan() + self.b0.cos() * i.cos())).atan();
        let lat_r = (self.b0.cos() * b.sin() - self.b0.sin() * b.cos() * i.cos()).asin();

        let y = self.r / 2.0 * ((1.0 + lat_r.sin()) / (1.0 - lat_r.sin())).ln() + self.false_northing;
        let x = self.r * lon_r + self.false_easting;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let y_ = x - self.false_easting;
        let x_ = y - self.false_northing;

        let lon_r = y_ / self.r;
        let lat_r = 2.0 * ((x_ / self.r).exp().atan() - FRAC_PI_4);

        let b = (self.b0.cos() * lat_r.sin() + self.b0.sin() * lat_r.cos() * lon_r.cos()).asin();
        let i = (lon_r.sin() / (self.b0.cos() * lon_r.cos() - self.b0.sin() * lat_r.tan())).atan();
        let lon = adjust_lon(self.lon0 + i / self.alpha);

        let base = ((FRAC_PI_4 + b / 2.0).tan().ln() - self.k) / self.alpha;
        let mut phi = b;
        for _ in 0..MAX_ITER {
            let s = base + self.e * (FRAC_PI_4 + (self.e * phi.sin()).asin() / 2.0).tan().ln();
            let next = 2.0 * s.exp().atan() - FRAC_PI_2;
            if (next - phi).abs() <= TOLERANCE {
                return Ok((lon, next));
            }
            phi = next;
        }
        Err(ProjError::convergence("somerc inverse"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    // EPSG:21781, CH1903 / LV03
    const LV03: &str = "+proj=somerc +lat_0=46.95240555555556 +lon_0=7.439583333333333 \
        +k_0=1 +x_0=600000 +y_0=200000 +ellps=bessel +units=m";

    fn somerc() -> SwissObliqueMercator {
        SwissObliqueMercator::new(&CrsParams::parse(LV03).unwrap())
    }

    #[test]
    fn test_bern_origin() {
        let proj = somerc();
        let (x, y) = proj
            .forward(7.439_583_333_333_333_f64.to_radians(), 46.952_405_555_555_56_f64.to_radians())
            .unwrap();
        assert_relative_eq!(x, 600_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 200_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_roundtrip() {
        let proj = somerc();
        // Zurich, Geneva, Lugano
        for &(lon_deg, lat_deg) in &[(8.5417, 47.3769), (6.1432, 46.2044), (8.9511, 46.0037)] {
            let lon = f64::to_radians(lon_deg);
            let lat = f64::to_radians(lat_deg);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-10);
            assert_relative_eq!(lat2, lat, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_east_and_north_of_bern() {
        let proj = somerc();
        let (x, y) = proj
            .forward(8.5417_f64.to_radians(), 47.3769_f64.to_radians())
            .unwrap();
        // Zurich sits roughly 83 km east and 47 km north of the origin
        assert!((x - 683_000.0).abs() < 2_000.0, "{x}");
        assert!((y - 248_000.0).abs() < 2_000.0, "{y}");
    }
}
