//! Coordinate reference systems: the derived descriptor ([`CrsParams`]) and
//! the ready-to-use [`Crs`] that pairs it with its projection.

pub mod axis;
pub mod datum;
pub mod derive;

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::catalog::{DefinitionStore, Ellipsoid};
use crate::error::ProjError;
use crate::parse::{self, DefinitionSource};
use crate::proj::longlat::LongLat;
use crate::proj::{Projection, Registry};

pub use axis::Axis;
pub use datum::{Datum, DatumKind};

/// Fully derived CRS descriptor. Angles in radians, lengths in metres.
#[derive(Clone, Debug)]
pub struct CrsParams {
    pub srs_code: String,
    pub srs_auth: String,
    pub srs_proj_number: String,
    pub title: Option<String>,
    /// Registry key of the projection algorithm
    pub proj_name: String,
    pub units: Option<String>,
    /// Datum code as written (`WGS84`, `none`, ...); empty when unspecified
    pub datum_code: String,
    pub datum_name: Option<String>,
    /// Metres per CRS unit; `None` means metres
    pub to_meter: Option<f64>,
    /// Prime meridian east of Greenwich
    pub from_greenwich: f64,
    pub ellipsoid: Ellipsoid,
    pub datum: Datum,
    pub axis: Axis,
    pub lat0: f64,
    pub lat1: Option<f64>,
    pub lat2: Option<f64>,
    pub lat_ts: Option<f64>,
    pub long0: f64,
    pub longc: f64,
    /// Central-line points of two-point oblique projections
    pub lon1: Option<f64>,
    pub lon2: Option<f64>,
    pub alpha: f64,
    pub x0: f64,
    pub y0: f64,
    pub k0: f64,
    pub zone: Option<i32>,
    pub utm_south: bool,
    pub czech: bool,
    /// Measure oblique Mercator from the natural origin
    pub no_uoff: bool,
    pub local_cs: bool,
    /// Definition keys no stage consumed
    pub extra: BTreeMap<String, String>,
}

impl CrsParams {
    /// Derive from a proj-string, WKT, or a code found in the built-in
    /// definitions. Codes that need fetching go through
    /// [`Resolver`](crate::resolver::Resolver).
    pub fn parse(definition: &str) -> Result<Self, ProjError> {
        match parse::classify(definition)? {
            DefinitionSource::Wkt(text) => derive::derive(parse::wkt::parse(&text)?, None),
            DefinitionSource::ProjString(text) => {
                derive::derive(parse::proj_string::parse(&text)?, None)
            }
            DefinitionSource::Code(code) => {
                let text = DefinitionStore::builtin().get(&code.code).ok_or_else(|| {
                    ProjError::Resource(format!("no local definition for {code}"))
                })?;
                derive::derive(parse::parse_definition_text(&text)?, Some(&code))
            }
        }
    }

    /// Geographic WGS84, the pivot of two-step datum transforms.
    pub fn geographic_wgs84() -> Self {
        let ellipsoid = Ellipsoid::wgs84();
        Self {
            srs_code: "WGS84".to_string(),
            srs_auth: String::new(),
            srs_proj_number: "WGS84".to_string(),
            title: Some("long/lat:WGS84".to_string()),
            proj_name: "longlat".to_string(),
            units: Some("degrees".to_string()),
            datum_code: "WGS84".to_string(),
            datum_name: Some("WGS84".to_string()),
            to_meter: None,
            from_greenwich: 0.0,
            ellipsoid,
            datum: Datum::new(DatumKind::Wgs84, &ellipsoid),
            axis: Axis::ENU,
            lat0: 0.0,
            lat1: None,
            lat2: None,
            lat_ts: None,
            long0: 0.0,
            longc: 0.0,
            lon1: None,
            lon2: None,
            alpha: 0.0,
            x0: 0.0,
            y0: 0.0,
            k0: 1.0,
            zone: None,
            utm_south: false,
            czech: false,
            no_uoff: false,
            local_cs: false,
            extra: BTreeMap::new(),
        }
    }

    pub fn is_geographic(&self) -> bool {
        matches!(self.proj_name.as_str(), "longlat" | "identity")
    }
}

static WGS84: LazyLock<Arc<Crs>> = LazyLock::new(|| {
    Arc::new(Crs {
        params: CrsParams::geographic_wgs84(),
        projection: Box::new(LongLat),
    })
});

/// A ready CRS: immutable descriptor plus its initialized projection.
pub struct Crs {
    params: CrsParams,
    projection: Box<dyn Projection>,
}

impl Crs {
    /// Initialize the projection named by `params` from `registry`.
    pub fn new(params: CrsParams, registry: &Registry) -> Result<Self, ProjError> {
        let projection = registry.init(&params.proj_name, &params)?;
        log::debug!("CRS '{}' ready ({})", params.srs_code, params.proj_name);
        Ok(Self { params, projection })
    }

    /// Parse and initialize against the process-wide registry.
    pub fn from_definition(definition: &str) -> Result<Self, ProjError> {
        let params = CrsParams::parse(definition)?;
        let registry = Registry::global();
        let guard = registry.read();
        Self::new(params, &guard)
    }

    pub fn wgs84() -> Arc<Crs> {
        Arc::clone(&WGS84)
    }

    pub fn params(&self) -> &CrsParams {
        &self.params
    }

    pub fn projection(&self) -> &dyn Projection {
        self.projection.as_ref()
    }

    pub fn srs_code(&self) -> &str {
        &self.params.srs_code
    }

    pub fn is_geographic(&self) -> bool {
        self.params.is_geographic()
    }
}

impl fmt::Debug for Crs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Crs")
            .field("srs_code", &self.params.srs_code)
            .field("proj_name", &self.params.proj_name)
            .field("datum", &self.params.datum.kind)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_builtin_code() {
        let crs = Crs::from_definition("EPSG:3857").unwrap();
        assert_eq!(crs.srs_code(), "EPSG:3857");
        assert_eq!(crs.params().proj_name, "merc");
        assert!(!crs.is_geographic());
    }

    #[test]
    fn test_unknown_code_needs_resolver() {
        assert!(matches!(
            CrsParams::parse("EPSG:2154"),
            Err(ProjError::Resource(_))
        ));
    }

    #[test]
    fn test_wgs84_matches_parsed_definition() {
        let parsed = CrsParams::parse("WGS84").unwrap();
        let built = Crs::wgs84();
        assert_eq!(parsed.proj_name, built.params().proj_name);
        assert_relative_eq!(parsed.ellipsoid.es, built.params().ellipsoid.es);
        assert!(parsed.datum.compare(&built.params().datum));
    }

    #[test]
    fn test_unregistered_projection() {
        let params = CrsParams::parse("+proj=robin +lon_0=0").unwrap();
        assert!(matches!(
            Crs::new(params, &Registry::builtin()),
            Err(ProjError::Resource(_))
        ));
    }
}
