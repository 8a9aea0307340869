//! Universal Transverse Mercator: Transverse Mercator with the zone's
//! central meridian (6·zone - 183)°, k₀ = 0.9996, x₀ = 500 km and
//! y₀ = 10 000 km south of the equator.

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::transverse_mercator::TransverseMercator;
use crate::proj::Projection;

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    let zone = params
        .zone
        .ok_or_else(|| ProjError::Config("utm: +zone must be specified".to_string()))?;
    if !(1..=60).contains(&zone) {
        return Err(ProjError::Config(format!(
            "utm: zone {zone} outside 1..=60"
        )));
    }
    let zoned = CrsParams {
        lat0: 0.0,
        long0: f64::from(6 * zone - 183).to_radians(),
        x0: 500_000.0,
        y0: if params.utm_south { 10_000_000.0 } else { 0.0 },
        k0: 0.9996,
        ..params.clone()
    };
    Ok(Box::new(TransverseMercator::new(&zoned)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn utm(def: &str) -> Result<Box<dyn Projection>, ProjError> {
        init(&CrsParams::parse(def)?)
    }

    #[test]
    fn test_zone_central_meridians() {
        for (zone, cm) in [(1, -177.0_f64), (33, 15.0), (60, 177.0)] {
            let proj = utm(&format!("+proj=utm +zone={zone} +ellps=WGS84")).unwrap();
            let (e, _) = proj.forward(cm.to_radians(), 45.0_f64.to_radians()).unwrap();
            assert_relative_eq!(e, 500_000.0, epsilon = 0.01);
        }
    }

    #[test]
    fn test_oslo_roundtrip() {
        let proj = utm("+proj=utm +zone=32 +ellps=WGS84").unwrap();
        let lon = 10.75_f64.to_radians();
        let lat = 59.91_f64.to_radians();
        let (e, n) = proj.forward(lon, lat).unwrap();
        assert!(e > 200_000.0 && e < 800_000.0, "easting = {e}");
        assert!(n > 6_000_000.0 && n < 7_000_000.0, "northing = {n}");
        let (lon2, lat2) = proj.inverse(e, n).unwrap();
        assert_relative_eq!(lon2, lon, epsilon = 1e-9);
        assert_relative_eq!(lat2, lat, epsilon = 1e-9);
    }

    #[test]
    fn test_south_false_northing() {
        let proj = utm("+proj=utm +zone=33 +south +ellps=WGS84").unwrap();
        let (_, n) = proj.forward(15.0_f64.to_radians(), 0.0).unwrap();
        assert_relative_eq!(n, 10_000_000.0, epsilon = 1e-6);
    }

    #[test]
    fn test_zone_required_and_bounded() {
        assert!(matches!(utm("+proj=utm +ellps=WGS84"), Err(ProjError::Config(_))));
        assert!(matches!(utm("+proj=utm +zone=0"), Err(ProjError::Config(_))));
        assert!(matches!(utm("+proj=utm +zone=61"), Err(ProjError::Config(_))));
    }
}
