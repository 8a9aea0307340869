//! Equidistant Conic projection, one or two standard parallels.
//!
//! n = (m₁ - m₂) / (M₂ - M₁)  (sin φ₁ with one parallel)
//! G = m₁/n + M₁,  ρ = a·(G - M(φ)),  ρ₀ = a·(G - M(φ₀))
//! with M the Snyder meridian-distance series.

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lon, msfn, MeridianSeries, EPSLN};
use crate::proj::Projection;

pub struct EquidistantConic {
    a: f64,
    lon0: f64,
    series: MeridianSeries,
    ns: f64,
    g: f64,
    rh: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(EquidistantConic::new(params)?))
}

impl EquidistantConic {
    pub fn new(params: &CrsParams) -> Result<Self, ProjError> {
        let ell = &params.ellipsoid;
        let series = MeridianSeries::new(ell.es);
        let lat1 = params.lat1.unwrap_or(params.lat0);
        let ms1 = msfn(lat1, ell.es);
        let ml1 = series.mlfn(lat1);

        let ns = match params.lat2 {
            Some(lat2) => {
                if (lat1 + lat2).abs() < EPSLN {
                    return Err(ProjError::Config(
                        "eqdc: standard parallels are equal and opposite".to_string(),
                    ));
                }
                if (lat1 - lat2).abs() >= EPSLN {
                    (ms1 - msfn(lat2, ell.es)) / (series.mlfn(lat2) - ml1)
                } else {
                    lat1.sin()
                }
            }
            None => lat1.sin(),
        };
        if ns.abs() < EPSLN {
            return Err(ProjError::Config(
                "eqdc: a single standard parallel on the equator".to_string(),
            ));
        }

        let g = ml1 + ms1 / ns;
        let rh = ell.a * (g - series.mlfn(params.lat0));
        Ok(Self {
            a: ell.a,
            lon0: params.long0,
            series,
            ns,
            g,
            rh,
            false_easting: params.x0,
            false_northing: params.y0,
        })
    }
}

impl Projection for EquidistantConic {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let rh1 = self.a * (self.g - self.series.mlfn(lat));
        let theta = self.ns * adjust_lon(lon - self.lon0);
        let x = self.false_easting + rh1 * theta.sin();
        let y = self.false_northing + self.rh - rh1 * theta.cos();
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let x = x - self.false_easting;
        let y = self.rh - (y - self.false_northing);
        let sign = if self.ns >= 0.0 { 1.0 } else { -1.0 };
        let rh1 = sign * x.hypot(y);
        let theta = if rh1 != 0.0 {
            (sign * x).atan2(sign * y)
        } else {
            0.0
        };
        let lat = self.series.phi3z(self.g - rh1 / self.a)?;
        let lon = adjust_lon(self.lon0 + theta / self.ns);
        Ok((lon, lat))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn eqdc(def: &str) -> Result<EquidistantConic, ProjError> {
        EquidistantConic::new(&CrsParams::parse(def)?)
    }

    #[test]
    fn test_two_parallels_roundtrip() {
        let proj = eqdc("+proj=eqdc +lat_0=40 +lon_0=-96 +lat_1=20 +lat_2=60 +ellps=clrk66").unwrap();
        for &(lon_deg, lat_deg) in &[(-75.0, 35.0), (-100.0, 48.0), (-120.0, 25.0), (-96.0, 40.0)] {
            let lon = f64::to_radians(lon_deg);
            let lat = f64::to_radians(lat_deg);
            let (x, y) = proj.forward(lon, lat).unwrap();
            let (lon2, lat2) = proj.inverse(x, y).unwrap();
            assert_relative_eq!(lon2, lon, epsilon = 1e-9);
            assert_relative_eq!(lat2, lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_second_parallel_changes_cone() {
        let one = eqdc("+proj=eqdc +lat_0=40 +lat_1=20 +ellps=clrk66").unwrap();
        let two = eqdc("+proj=eqdc +lat_0=40 +lat_1=20 +lat_2=60 +ellps=clrk66").unwrap();
        assert_relative_eq!(one.ns, 20.0_f64.to_radians().sin(), epsilon = 1e-12);
        assert!((one.ns - two.ns).abs() > 0.1);
    }

    #[test]
    fn test_meridian_spacing_is_true() {
        // distances along the central meridian equal meridian arcs
        let proj = eqdc("+proj=eqdc +lat_0=0 +lat_1=30 +lat_2=50 +a=6371000 +b=6371000").unwrap();
        let (_, y) = proj.forward(0.0, 0.5).unwrap();
        assert_relative_eq!(y, 0.5 * 6_371_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_opposite_parallels_rejected() {
        assert!(matches!(
            eqdc("+proj=eqdc +lat_1=30 +lat_2=-30"),
            Err(ProjError::Config(_))
        ));
    }
}
