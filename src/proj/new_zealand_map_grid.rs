//! New Zealand Map Grid.
//!
//! Latitude offsets (in units of 10⁵ arc-seconds) become isometric
//! latitude through a real series; the complex value ψ + iλ then goes
//! through a sixth-order complex polynomial to z = (N + iE)/a.
//! The inverse seeds with the C series and refines with Newton-Raphson.

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::SEC_TO_RAD;
use crate::proj::Projection;

const A: [f64; 10] = [
    0.639_917_507_3,
    -0.135_879_761_3,
    0.063_294_409,
    -0.025_268_53,
    0.011_787_9,
    -0.005_516_1,
    0.002_690_6,
    -0.001_333,
    0.000_67,
    -0.000_34,
];

const B: [Complex; 6] = [
    Complex::new(0.755_785_322_8, 0.0),
    Complex::new(0.249_204_646, 0.003_371_507),
    Complex::new(-0.001_541_739, 0.041_058_56),
    Complex::new(-0.101_629_07, 0.017_276_09),
    Complex::new(-0.266_234_89, -0.362_492_18),
    Complex::new(-0.687_098_3, -1.165_196_7),
];

const C: [Complex; 6] = [
    Complex::new(1.323_127_043_9, 0.0),
    Complex::new(-0.577_245_789, -0.007_809_598),
    Complex::new(0.508_307_513, -0.112_208_952),
    Complex::new(-0.150_947_62, 0.182_006_02),
    Complex::new(1.014_181_79, 1.644_976_96),
    Complex::new(1.966_054_9, 2.512_764_5),
];

const D: [f64; 9] = [
    1.562_701_424_3,
    0.518_540_639_8,
    -0.033_330_98,
    -0.105_290_6,
    -0.036_859_4,
    0.007_317,
    0.012_2,
    0.003_94,
    -0.001_3,
];

const MAX_ITER: usize = 8;
const TOLERANCE: f64 = 1e-14;

#[derive(Clone, Copy, Debug, PartialEq)]
struct Complex {
    re: f64,
    im: f64,
}

impl Complex {
    const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    fn add(self, other: Self) -> Self {
        Self::new(self.re + other.re, self.im + other.im)
    }

    fn mul(self, other: Self) -> Self {
        Self::new(
            self.re * other.re - self.im * other.im,
            self.re * other.im + self.im * other.re,
        )
    }

    fn scale(self, k: f64) -> Self {
        Self::new(self.re * k, self.im * k)
    }

    fn div(self, other: Self) -> Self {
        let den = other.re * other.re + other.im * other.im;
        Self::new(
            (self.re * other.re + self.im * other.im) / den,
            (self.im * other.re - self.re * other.im) / den,
        )
    }
}

/// Σ coeffs[k]·zᵏ⁺¹
fn complex_series(coeffs: &[Complex], z: Complex) -> Complex {
    let mut power = Complex::new(1.0, 0.0);
    let mut sum = Complex::new(0.0, 0.0);
    for &c in coeffs {
        power = power.mul(z);
        sum = sum.add(c.mul(power));
    }
    sum
}

/// Σ coeffs[k]·xᵏ⁺¹
fn real_series(coeffs: &[f64], x: f64) -> f64 {
    let mut power = 1.0;
    coeffs.iter().fold(0.0, |sum, &c| {
        power *= x;
        sum + c * power
    })
}

pub struct NewZealandMapGrid {
    a: f64,
    lat0: f64,
    lon0: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(NewZealandMapGrid::new(params)))
}

impl NewZealandMapGrid {
    pub fn new(params: &CrsParams) -> Self {
        Self {
            a: params.ellipsoid.a,
            lat0: params.lat0,
            lon0: params.long0,
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for NewZealandMapGrid {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dphi = (lat - self.lat0) / SEC_TO_RAD * 1e-5;
        let dpsi = real_series(&A, dphi);
        let z = complex_series(&B, Complex::new(dpsi, lon - self.lon0));
        Ok((
            z.im * self.a + self.false_easting,
            z.re * self.a + self.false_northing,
        ))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let z = Complex::new(
            (y - self.false_northing) / self.a,
            (x - self.false_easting) / self.a,
        );

        let mut theta = complex_series(&C, z);
        for _ in 0..MAX_ITER {
            // θ ← (z + Σ (n-1)·Bₙ·θⁿ) / Σ n·Bₙ·θⁿ⁻¹
            let mut power = Complex::new(1.0, 0.0);
            let mut num = z;
            let mut den = B[0];
            for (i, &b) in B.iter().enumerate().skip(1) {
                let n = (i + 1) as f64;
                power = power.mul(theta);
                den = den.add(b.mul(power).scale(n));
                num = num.add(b.mul(power.mul(theta)).scale(n - 1.0));
            }
            let next = num.div(den);
            let step = (next.re - theta.re).hypot(next.im - theta.im);
            theta = next;
            if step < TOLERANCE {
                break;
            }
        }

        let dphi = real_series(&D, theta.re);
        let lat = self.lat0 + dphi * 1e5 * SEC_TO_RAD;
        let lon = self.lon0 + theta.im;
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const NZMG: &str =
        "+proj=nzmg +lat_0=-41 +lon_0=173 +x_0=2510000 +y_0=6023150 +ellps=intl +units=m";

    fn nzmg() -> NewZealandMapGrid {
        NewZealandMapGrid::new(&CrsParams::parse(NZMG).unwrap())
    }

    #[test]
    fn test_origin() {
        let proj = nzmg();
        let (x, y) = proj
            .forward(173.0_f64.to_radians(), (-41.0_f64).to_radians())
            .unwrap();
        assert_relative_eq!(x, 2_510_000.0, epsilon = 1e-6);
        assert_relative_eq!(y, 6_023_150.0, epsilon = 1e-6);
        let (lon, lat) = proj.inverse(2_510_000.0, 6_023_150.0).unwrap();
        assert_relative_eq!(lon, 173.0_f64.to_radians(), epsilon = 1e-12);
        assert_relative_eq!(lat, (-41.0_f64).to_radians(), epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        let proj = nzmg();
        // Wellington, Auckland, Christchurch, Dunedin
        for &(lon_deg, lat_deg) in &[
            (174.78, -41.29),
            (174.76, -36.85),
            (172.64, -43.53),
            (170.50, -45.87),
        ] {
            let lon = f64::to_radians(lon_deg);
            let lat = f64::to_radians(lat_deg);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-7);
            assert_relative_eq!(lat2, lat, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_north_is_up_east_is_right() {
        let proj = nzmg();
        let (x0, y0) = proj
            .forward(173.0_f64.to_radians(), (-41.0_f64).to_radians())
            .unwrap();
        let (x1, _) = proj
            .forward(174.0_f64.to_radians(), (-41.0_f64).to_radians())
            .unwrap();
        let (_, y1) = proj
            .forward(173.0_f64.to_radians(), (-40.0_f64).to_radians())
            .unwrap();
        // a degree is roughly 84 km east-west and 111 km north-south here
        assert!((x1 - x0 - 84_000.0).abs() < 2_000.0, "dx = {}", x1 - x0);
        assert!((y1 - y0 - 111_000.0).abs() < 2_000.0, "dy = {}", y1 - y0);
    }
}
