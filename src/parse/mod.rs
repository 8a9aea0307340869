//! Definition parsing: proj-strings, WKT and authority identifiers all end
//! up as one [`DefinitionParams`].

pub mod params;
pub mod proj_string;
pub mod srs_code;
pub mod wkt;

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ProjError;

pub use params::DefinitionParams;
pub use srs_code::SrsCode;

static IDENTIFIER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.\-]+(:[A-Za-z0-9_.\-]*)*$").expect("static regex")
});

const WKT_KEYWORDS: [&str; 4] = ["GEOGCS", "GEOCCS", "PROJCS", "LOCAL_CS"];

/// What a CRS input string turned out to be.
#[derive(Clone, Debug, PartialEq)]
pub enum DefinitionSource {
    Wkt(String),
    ProjString(String),
    /// Needs a definition looked up or fetched
    Code(SrsCode),
}

pub fn classify(input: &str) -> Result<DefinitionSource, ProjError> {
    let trimmed = input.trim();
    if WKT_KEYWORDS.iter().any(|k| trimmed.contains(k)) {
        return Ok(DefinitionSource::Wkt(trimmed.to_string()));
    }
    if trimmed.starts_with('+') || trimmed.contains("+proj=") {
        return Ok(DefinitionSource::ProjString(trimmed.to_string()));
    }
    if trimmed.starts_with("urn:")
        || trimmed.starts_with("http://")
        || trimmed.starts_with("https://")
        || IDENTIFIER_RE.is_match(trimmed)
    {
        return SrsCode::parse(trimmed).map(DefinitionSource::Code);
    }
    Err(ProjError::Parse(format!(
        "'{trimmed}' is neither a proj-string, WKT nor a CRS identifier"
    )))
}

/// Parse definition text (proj-string or WKT). Identifiers are rejected:
/// they have no parameters of their own.
pub fn parse_definition_text(text: &str) -> Result<DefinitionParams, ProjError> {
    match classify(text)? {
        DefinitionSource::Wkt(wkt) => wkt::parse(&wkt),
        DefinitionSource::ProjString(def) => proj_string::parse(&def),
        DefinitionSource::Code(code) => Err(ProjError::Parse(format!(
            "'{code}' is an identifier, not a definition"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert!(matches!(
            classify("+proj=longlat +datum=WGS84").unwrap(),
            DefinitionSource::ProjString(_)
        ));
        assert!(matches!(
            classify(r#"GEOGCS["WGS84",DATUM["WGS84",SPHEROID["WGS84",6378137,298.257223563]]]"#)
                .unwrap(),
            DefinitionSource::Wkt(_)
        ));
        match classify("EPSG:4326").unwrap() {
            DefinitionSource::Code(code) => assert_eq!(code.code, "EPSG:4326"),
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(
            classify("urn:ogc:def:crs:EPSG::3857").unwrap(),
            DefinitionSource::Code(_)
        ));
    }

    #[test]
    fn test_garbage_is_parse_error() {
        assert!(matches!(classify("not a crs at all"), Err(ProjError::Parse(_))));
        assert!(matches!(
            parse_definition_text("EPSG:4326"),
            Err(ProjError::Parse(_))
        ));
    }

    #[test]
    fn test_both_forms_converge() {
        let from_string = parse_definition_text(
            "+proj=longlat +a=6378137 +rf=298.257223563 +datum=WGS84",
        )
        .unwrap();
        let from_wkt = parse_definition_text(
            r#"GEOGCS["WGS84",DATUM["WGS84",SPHEROID["WGS84",6378137,298.257223563]]]"#,
        )
        .unwrap();
        assert_eq!(from_string.proj, from_wkt.proj);
        assert_eq!(from_string.a, from_wkt.a);
        assert_eq!(from_string.rf, from_wkt.rf);
        assert_eq!(from_string.datum, from_wkt.datum);
    }
}
