//! Parsed parameters to a complete CRS descriptor: catalog lookups,
//! ellipsoid constants, datum classification, axis and unit defaults.

use crate::catalog::{datum as datum_catalog, ellipsoid as ellipsoid_catalog, units, Ellipsoid};
use crate::crs::axis::Axis;
use crate::crs::datum::{Datum, DatumKind};
use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::parse::{DefinitionParams, SrsCode};
use crate::proj::common::SEC_TO_RAD;

pub fn derive(params: DefinitionParams, code: Option<&SrsCode>) -> Result<CrsParams, ProjError> {
    let mut datum_code = params.datum.clone().unwrap_or_default();
    if params.nadgrids.as_deref() == Some("@null") {
        datum_code = "none".to_string();
    }

    let catalog_datum = if datum_code.is_empty() || datum_code == "none" {
        None
    } else {
        datum_catalog::lookup(&datum_code)
    };

    let towgs84 = params.towgs84.clone().or_else(|| {
        catalog_datum
            .filter(|def| !def.towgs84.is_empty())
            .map(|def| def.towgs84.to_vec())
    });
    let ellps = match (&params.ellps, params.a, catalog_datum) {
        (None, None, Some(def)) => Some(def.ellipse.to_string()),
        _ => params.ellps.clone(),
    };
    let datum_name = params
        .datum_name
        .clone()
        .or_else(|| catalog_datum.map(|def| def.name.to_string()));

    let ellipsoid = resolve_ellipsoid(&params, ellps.as_deref())?;

    let grids = params
        .nadgrids
        .clone()
        .filter(|g| g != "@null")
        .or_else(|| catalog_datum.and_then(|def| def.nadgrids.map(str::to_string)));
    let kind = if datum_code == "none" {
        DatumKind::NoDatum
    } else if let Some(grids) = grids {
        DatumKind::GridShift(grids)
    } else {
        classify_shift(towgs84.as_deref())?
    };
    let datum = Datum::new(kind, &ellipsoid);

    let axis = match params.axis.as_deref() {
        Some(code) => Axis::parse(code)?,
        None => Axis::default(),
    };

    let proj_name = match params.proj.as_deref() {
        Some("latlong" | "lonlat" | "latlon") => "longlat".to_string(),
        Some(name) => name.to_string(),
        None => {
            return Err(ProjError::Config(
                "definition does not name a projection".to_string(),
            ))
        }
    };

    let lat_ts = if proj_name == "merc" {
        params.lat_ts.or(params.lat1)
    } else {
        params.lat_ts
    };

    let k0 = params
        .k0
        .unwrap_or(if proj_name == "krovak" { 0.9999 } else { 1.0 });

    let to_meter = params
        .to_meter
        .or_else(|| params.units.as_deref().and_then(units::metres_per_unit));

    let (srs_code, srs_auth, srs_proj_number) = match code {
        Some(c) => (c.code.clone(), c.auth.clone(), c.number.clone()),
        None => {
            let name = params.srs_code.clone().unwrap_or_default();
            (name.clone(), String::new(), name)
        }
    };

    Ok(CrsParams {
        srs_code,
        srs_auth,
        srs_proj_number,
        title: params.title,
        proj_name,
        units: params.units,
        datum_code,
        datum_name,
        to_meter,
        from_greenwich: params.from_greenwich.unwrap_or(0.0),
        ellipsoid,
        datum,
        axis,
        lat0: params.lat0.unwrap_or(0.0),
        lat1: params.lat1,
        lat2: params.lat2,
        lat_ts,
        long0: params.long0.unwrap_or(0.0),
        longc: params.longc.unwrap_or(0.0),
        lon1: params.lon1,
        lon2: params.lon2,
        alpha: params.alpha.unwrap_or(0.0),
        x0: params.x0.unwrap_or(0.0),
        y0: params.y0.unwrap_or(0.0),
        k0,
        zone: params.zone,
        utm_south: params.south,
        czech: params.czech,
        no_uoff: params.no_uoff,
        local_cs: params.local_cs,
        extra: params.unknown,
    })
}

/// Explicit axes win over the catalog; `+R_A` turns the result into the
/// equal-area sphere.
fn resolve_ellipsoid(params: &DefinitionParams, ellps: Option<&str>) -> Result<Ellipsoid, ProjError> {
    let ellipsoid = match (params.a, params.b, params.rf) {
        (Some(a), Some(b), _) => Ellipsoid::from_axes(a, b),
        (Some(a), None, Some(rf)) => Ellipsoid::from_inverse_flattening(a, rf),
        (Some(a), None, None) => Ellipsoid::sphere(a),
        (None, ..) => match ellps {
            Some(code) => match ellipsoid_catalog::lookup(code) {
                Some(def) => def.build(),
                None => {
                    log::debug!("unknown ellipsoid '{code}', using WGS84");
                    Ellipsoid::wgs84()
                }
            },
            None => Ellipsoid::wgs84(),
        },
    };
    if !(ellipsoid.a.is_finite() && ellipsoid.a > 0.0 && ellipsoid.b > 0.0) {
        return Err(ProjError::Config(format!(
            "invalid ellipsoid axes a={} b={}",
            ellipsoid.a, ellipsoid.b
        )));
    }
    Ok(if params.r_a {
        ellipsoid.authalic_sphere()
    } else {
        ellipsoid
    })
}

fn classify_shift(towgs84: Option<&[f64]>) -> Result<DatumKind, ProjError> {
    let Some(p) = towgs84 else {
        return Ok(DatumKind::Wgs84);
    };
    match p.len() {
        3 | 7 => {}
        n => {
            return Err(ProjError::Config(format!(
                "towgs84 needs 3 or 7 values, got {n}"
            )))
        }
    }
    if p.len() == 7 && p[3..].iter().any(|&v| v != 0.0) {
        return Ok(DatumKind::SevenParam {
            dx: p[0],
            dy: p[1],
            dz: p[2],
            rx: p[3] * SEC_TO_RAD,
            ry: p[4] * SEC_TO_RAD,
            rz: p[5] * SEC_TO_RAD,
            scale: 1.0 + p[6] / 1.0e6,
        });
    }
    if p[..3].iter().any(|&v| v != 0.0) {
        return Ok(DatumKind::ThreeParam([p[0], p[1], p[2]]));
    }
    Ok(DatumKind::Wgs84)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::parse_definition_text;
    use approx::assert_relative_eq;

    fn derived(def: &str) -> Result<CrsParams, ProjError> {
        derive(parse_definition_text(def)?, None)
    }

    #[test]
    fn test_spherical_mercator() {
        let crs = derived(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 +units=m",
        )
        .unwrap();
        assert!(crs.ellipsoid.sphere);
        assert_relative_eq!(crs.k0, 1.0);
        assert_relative_eq!(crs.to_meter.unwrap(), 1.0);
        assert_eq!(crs.datum.kind, DatumKind::Wgs84);
    }

    #[test]
    fn test_catalog_datum_supplies_ellipsoid_and_shift() {
        let crs = derived("+proj=longlat +datum=potsdam").unwrap();
        let bessel = ellipsoid_catalog::lookup("bessel").unwrap().build();
        assert_relative_eq!(crs.ellipsoid.a, bessel.a);
        assert_eq!(crs.datum.kind, DatumKind::ThreeParam([606.0, 23.0, 413.0]));

        let crs = derived("+proj=longlat +datum=ire65").unwrap();
        assert!(matches!(crs.datum.kind, DatumKind::SevenParam { .. }));
    }

    #[test]
    fn test_explicit_parameters_win() {
        let crs = derived("+proj=longlat +datum=potsdam +towgs84=1,2,3 +ellps=intl").unwrap();
        assert_eq!(crs.datum.kind, DatumKind::ThreeParam([1.0, 2.0, 3.0]));
        let intl = ellipsoid_catalog::lookup("intl").unwrap().build();
        assert_relative_eq!(crs.ellipsoid.a, intl.a);
    }

    #[test]
    fn test_seven_param_units() {
        let crs = derived("+proj=longlat +ellps=airy +towgs84=446.448,-125.157,542.06,0.15,0.247,0.842,-20.489")
            .unwrap();
        match crs.datum.kind {
            DatumKind::SevenParam { rx, scale, .. } => {
                assert_relative_eq!(rx, 0.15 * SEC_TO_RAD);
                assert_relative_eq!(scale, 1.0 - 20.489e-6);
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_zero_shift_is_wgs84() {
        let crs = derived("+proj=longlat +ellps=WGS84 +towgs84=0,0,0,0,0,0,0").unwrap();
        assert_eq!(crs.datum.kind, DatumKind::Wgs84);
    }

    #[test]
    fn test_bad_towgs84_length() {
        assert!(matches!(
            derived("+proj=longlat +towgs84=1,2"),
            Err(ProjError::Config(_))
        ));
    }

    #[test]
    fn test_null_grid_means_no_datum() {
        let crs = derived("+proj=merc +a=6378137 +b=6378137 +nadgrids=@null").unwrap();
        assert_eq!(crs.datum.kind, DatumKind::NoDatum);
        assert_eq!(crs.datum_code, "none");
    }

    #[test]
    fn test_grid_datum() {
        let crs = derived("+proj=longlat +datum=NAD27").unwrap();
        assert!(matches!(crs.datum.kind, DatumKind::GridShift(_)));
        let clrk66 = ellipsoid_catalog::lookup("clrk66").unwrap().build();
        assert_relative_eq!(crs.ellipsoid.a, clrk66.a);
    }

    #[test]
    fn test_r_a_sphere() {
        let crs = derived("+proj=sinu +ellps=WGS84 +R_A").unwrap();
        assert!(crs.ellipsoid.sphere);
        assert_relative_eq!(crs.ellipsoid.a, 6_371_007.18, epsilon = 1.0);
    }

    #[test]
    fn test_defaults() {
        let crs = derived("+proj=latlong").unwrap();
        assert_eq!(crs.proj_name, "longlat");
        assert!(crs.axis.is_enu());
        assert_relative_eq!(crs.k0, 1.0);
        assert_relative_eq!(crs.ellipsoid.a, 6_378_137.0);
    }

    #[test]
    fn test_scale_factor_defaults_per_projection() {
        assert_relative_eq!(derived("+proj=krovak +ellps=bessel").unwrap().k0, 0.9999);
        assert_relative_eq!(derived("+proj=krovak +ellps=bessel +k=0.9998").unwrap().k0, 0.9998);
        let tmerc = derived("+proj=tmerc +ellps=GRS80").unwrap();
        assert_eq!(tmerc.proj_name, "tmerc");
        assert_relative_eq!(tmerc.k0, 1.0);
    }

    #[test]
    fn test_invalid_axis() {
        assert!(matches!(
            derived("+proj=longlat +axis=enq"),
            Err(ProjError::Config(_))
        ));
    }

    #[test]
    fn test_units_supply_to_meter() {
        let crs = derived("+proj=tmerc +units=us-ft").unwrap();
        assert_relative_eq!(crs.to_meter.unwrap(), 1200.0 / 3937.0);
    }

    #[test]
    fn test_mercator_lat_ts_from_standard_parallel() {
        let crs = derived("+proj=merc +lat_1=10").unwrap();
        assert_relative_eq!(crs.lat_ts.unwrap(), 10.0_f64.to_radians());
    }

    #[test]
    fn test_srs_code_from_identifier() {
        let code = SrsCode::parse("EPSG:32633").unwrap();
        let crs = derive(
            parse_definition_text("+proj=utm +zone=33 +ellps=WGS84 +datum=WGS84").unwrap(),
            Some(&code),
        )
        .unwrap();
        assert_eq!(crs.srs_code, "EPSG:32633");
        assert_eq!(crs.srs_auth, "EPSG");
        assert_eq!(crs.srs_proj_number, "32633");
    }
}
