//! Transverse Mercator projection.
//!
//! Ellipsoids use the Krüger n-series to 6th order (Karney 2011 form):
//! conformal latitude via τ' = τ·√(1+σ²) - σ·√(1+τ²), σ = sinh(e·atanh(e·τ/√(1+τ²))),
//! then ξ = ξ' + Σ αⱼ sin(2jξ') cosh(2jη'), η = η' + Σ αⱼ cos(2jξ') sinh(2jη').
//!
//! Spheres use the closed form:
//!   B = cos φ sin Δλ,  x = x₀ + ½·a·k₀·ln((1+B)/(1-B)),
//!   y = y₀ + a·k₀·(atan2(tan φ, cos Δλ) - φ₀)

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, asinz, finite, EPSLN};
use crate::proj::Projection;

/// Coefficients of n¹..n⁶ in α₁..α₆.
const ALPHA: [[f64; 6]; 6] = [
    [1.0 / 2.0, -2.0 / 3.0, 5.0 / 16.0, 41.0 / 180.0, -127.0 / 288.0, 7891.0 / 37800.0],
    [0.0, 13.0 / 48.0, -3.0 / 5.0, 557.0 / 1440.0, 281.0 / 630.0, -1983433.0 / 1935360.0],
    [0.0, 0.0, 61.0 / 240.0, -103.0 / 140.0, 15061.0 / 26880.0, 167603.0 / 181440.0],
    [0.0, 0.0, 0.0, 49561.0 / 161280.0, -179.0 / 168.0, 6601661.0 / 7257600.0],
    [0.0, 0.0, 0.0, 0.0, 34729.0 / 80640.0, -3418889.0 / 1995840.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 212378941.0 / 319334400.0],
];

/// Coefficients of n¹..n⁶ in β₁..β₆.
const BETA: [[f64; 6]; 6] = [
    [1.0 / 2.0, -2.0 / 3.0, 37.0 / 96.0, -1.0 / 360.0, -81.0 / 512.0, 96199.0 / 604800.0],
    [0.0, 1.0 / 48.0, 1.0 / 15.0, -437.0 / 1440.0, 46.0 / 105.0, -1118711.0 / 3870720.0],
    [0.0, 0.0, 17.0 / 480.0, -37.0 / 840.0, -209.0 / 4480.0, 5569.0 / 90720.0],
    [0.0, 0.0, 0.0, 4397.0 / 161280.0, -11.0 / 504.0, -830251.0 / 7257600.0],
    [0.0, 0.0, 0.0, 0.0, 4583.0 / 161280.0, -108847.0 / 3991680.0],
    [0.0, 0.0, 0.0, 0.0, 0.0, 20648693.0 / 638668800.0],
];

const MAX_ITER: usize = 15;

/// Evaluate each row as a polynomial in n without constant term.
fn krueger(table: [[f64; 6]; 6], n: f64) -> [f64; 6] {
    table.map(|row| row.iter().rev().fold(0.0, |acc, &c| (acc + c) * n))
}

/// Rectifying latitude μ(φ), the meridian arc divided by the rectifying
/// radius.
fn rectifying_latitude(phi: f64, n: f64) -> f64 {
    let n2 = n * n;
    let b2 = -1.5 * n + 9.0 / 16.0 * n2 * n;
    let b4 = 15.0 / 16.0 * n2 - 15.0 / 32.0 * n2 * n2;
    let b6 = -35.0 / 48.0 * n2 * n;
    let b8 = 315.0 / 512.0 * n2 * n2;
    phi + b2 * (2.0 * phi).sin() + b4 * (4.0 * phi).sin() + b6 * (6.0 * phi).sin()
        + b8 * (8.0 * phi).sin()
}

/// tan φ to the tangent of the conformal latitude.
fn conformal_tan(tau: f64, e: f64) -> f64 {
    let sec = tau.hypot(1.0);
    let sigma = (e * (e * tau / sec).atanh()).sinh();
    tau * sigma.hypot(1.0) - sigma * sec
}

/// Newton inverse of [`conformal_tan`].
fn geodetic_tan(taup: f64, e: f64, es: f64) -> Result<f64, ProjError> {
    let mut tau = taup;
    for _ in 0..MAX_ITER {
        let sec = tau.hypot(1.0);
        let estimate = conformal_tan(tau, e);
        let step = (taup - estimate) * (1.0 + (1.0 - es) * tau * tau)
            / ((1.0 - es) * sec * estimate.hypot(1.0));
        tau += step;
        if step.abs() < 1e-12 * (1.0 + tau.abs()) {
            return Ok(tau);
        }
    }
    Err(ProjError::convergence("tmerc conformal latitude"))
}

pub struct TransverseMercator {
    a: f64,
    e: f64,
    es: f64,
    sphere: bool,
    lon0: f64,
    lat0: f64,
    k0: f64,
    false_easting: f64,
    false_northing: f64,
    /// Rectifying radius times k₀
    scale: f64,
    alpha: [f64; 6],
    beta: [f64; 6],
    mu0: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(TransverseMercator::new(params)))
}

impl TransverseMercator {
    pub fn new(params: &CrsParams) -> Self {
        let ell = &params.ellipsoid;
        let n = ell.n;
        let n2 = n * n;
        let rectifying_radius = ell.a / (1.0 + n) * (1.0 + n2 / 4.0 + n2 * n2 / 64.0);

        Self {
            a: ell.a,
            e: ell.e,
            es: ell.es,
            sphere: ell.sphere,
            lon0: params.long0,
            lat0: params.lat0,
            k0: params.k0,
            false_easting: params.x0,
            false_northing: params.y0,
            scale: params.k0 * rectifying_radius,
            alpha: krueger(ALPHA, n),
            beta: krueger(BETA, n),
            mu0: rectifying_latitude(params.lat0, n),
        }
    }

    fn forward_sphere(&self, dlam: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let cos_phi = lat.cos();
        let b = cos_phi * dlam.sin();
        if (b.abs() - 1.0).abs() < EPSLN {
            return Err(ProjError::Domain(
                "tmerc: point 90° from the central meridian projects to infinity".to_string(),
            ));
        }
        let ak0 = self.a * self.k0;
        let x = 0.5 * ak0 * ((1.0 + b) / (1.0 - b)).ln();
        let con = (cos_phi * dlam.cos() / (1.0 - b * b).sqrt()).clamp(-1.0, 1.0).acos();
        let y = ak0 * (con.copysign(lat) - self.lat0);
        Ok((x + self.false_easting, y + self.false_northing))
    }

    fn inverse_sphere(&self, x: f64, y: f64) -> (f64, f64) {
        let ak0 = self.a * self.k0;
        let f = ((x - self.false_easting) / ak0).exp();
        let g = 0.5 * (f - 1.0 / f);
        let temp = self.lat0 + (y - self.false_northing) / ak0;
        let h = temp.cos();
        let lat = asinz(((1.0 - h * h) / (1.0 + g * g)).sqrt()).copysign(temp);
        let lon = if g == 0.0 && h == 0.0 {
            self.lon0
        } else {
            adjust_lon(g.atan2(h) + self.lon0)
        };
        (lon, lat)
    }
}

impl Projection for TransverseMercator {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let dlam = adjust_lon(lon - self.lon0);
        if self.sphere {
            return self.forward_sphere(dlam, lat);
        }

        let taup = conformal_tan(lat.tan(), self.e);
        let (sin_lam, cos_lam) = dlam.sin_cos();
        // Gauss-Schreiber coordinates on the conformal sphere
        let xip = taup.atan2(cos_lam);
        let etap = (sin_lam / taup.hypot(cos_lam)).asinh();

        let (mut xi, mut eta) = (xip, etap);
        for (j, &a) in self.alpha.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xi += a * (k * xip).sin() * (k * etap).cosh();
            eta += a * (k * xip).cos() * (k * etap).sinh();
        }

        finite(
            self.scale * eta + self.false_easting,
            self.scale * (xi - self.mu0) + self.false_northing,
            "tmerc",
        )
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        if self.sphere {
            return Ok(self.inverse_sphere(x, y));
        }
        let eta = (x - self.false_easting) / self.scale;
        let xi = (y - self.false_northing) / self.scale + self.mu0;

        let (mut xip, mut etap) = (xi, eta);
        for (j, &b) in self.beta.iter().enumerate() {
            let k = 2.0 * (j + 1) as f64;
            xip -= b * (k * xi).sin() * (k * eta).cosh();
            etap -= b * (k * xi).cos() * (k * eta).sinh();
        }

        let sinh_eta = etap.sinh();
        let (sin_xi, cos_xi) = xip.sin_cos();
        let taup = sin_xi / sinh_eta.hypot(cos_xi);
        let lat = geodetic_tan(taup, self.e, self.es)?.atan();
        let lon = adjust_lon(self.lon0 + sinh_eta.atan2(cos_xi));
        Ok((lon, lat))
    }
}
