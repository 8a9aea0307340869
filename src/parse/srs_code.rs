//! Authority identifiers: `EPSG:4326`, OGC URNs and the short URL forms.

use std::fmt;

use crate::error::ProjError;

/// A canonical `AUTH:NUMBER` code.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct SrsCode {
    /// Upper-cased canonical form, e.g. `EPSG:4326`
    pub code: String,
    /// Authority, e.g. `EPSG`; empty for bare names such as `WGS84`
    pub auth: String,
    pub number: String,
}

impl SrsCode {
    /// Normalize any supported identifier spelling.
    pub fn parse(input: &str) -> Result<Self, ProjError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ProjError::Parse("empty CRS identifier".to_string()));
        }

        let rewritten = if input.starts_with("urn:") {
            rewrite_urn(input)?
        } else if input.starts_with("http://") || input.starts_with("https://") {
            rewrite_url(input)
        } else {
            input.to_string()
        };

        let code = rewritten.to_uppercase();
        let (auth, number) = match code.split_once(':') {
            Some((auth, number)) if !auth.is_empty() && !number.is_empty() => {
                (auth.to_string(), number.to_string())
            }
            Some(_) => return Err(ProjError::Parse(format!("malformed CRS code '{input}'"))),
            None => (String::new(), code.clone()),
        };
        Ok(Self { code, auth, number })
    }

    /// Location of the definition file shipped next to the library.
    pub fn local_definition_url(&self, lib_path: &str) -> String {
        format!("{lib_path}defs/{}{}.js", self.auth, self.number)
    }

    /// Location of the definition on a proj4js-style lookup service.
    pub fn service_definition_url(&self, service: &str) -> String {
        format!(
            "{}/{}/{}/proj4js/",
            service.trim_end_matches('/'),
            self.auth.to_lowercase(),
            self.number
        )
    }
}

impl fmt::Display for SrsCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.code)
    }
}

/// `urn:ogc:def:crs:AUTH:[version]:CODE` and the `x-ogc` variant.
fn rewrite_urn(input: &str) -> Result<String, ProjError> {
    let parts: Vec<&str> = input.split(':').collect();
    let recognized = parts.len() >= 6
        && matches!(parts[1], "ogc" | "x-ogc")
        && parts[2] == "def"
        && parts[3] == "crs";
    match (recognized, parts.last()) {
        (true, Some(code)) if !code.is_empty() => Ok(format!("{}:{}", parts[4], code)),
        _ => Err(ProjError::Parse(format!("unsupported URN '{input}'"))),
    }
}

fn rewrite_url(input: &str) -> String {
    match input.split_once('#') {
        Some((base, code)) if base.contains("epsg.xml") || base.contains("epsg.org") => {
            format!("EPSG:{code}")
        }
        Some((base, code)) if base.contains("RIG.xml") => format!("IGNF:{code}"),
        _ => input.to_string(),
    }
}
