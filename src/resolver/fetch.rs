//! Host-supplied resource loading.

use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use crate::error::FetchError;
use crate::proj::ProjectionEntry;

static DEFS_ASSIGNMENT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)defs\[\s*["'][^"']*["']\s*\]\s*=\s*["'](.*?)["']\s*;?\s*$"#)
        .expect("static regex")
});

/// Asynchronous access to remote definitions and algorithms.
///
/// The resolver never retries: a failed fetch moves straight to the next
/// source or to the configured fallback.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Load the text behind `url`.
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;

    /// Load the algorithm registered as `name`, published at `url`.
    async fn fetch_projection(&self, _name: &str, url: &str) -> Result<ProjectionEntry, FetchError> {
        Err(FetchError::NotFound(url.to_string()))
    }
}

/// Fetcher for hosts without remote resources: every request is
/// `NotFound`.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoFetcher;

#[async_trait]
impl ResourceFetcher for NoFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        Err(FetchError::NotFound(url.to_string()))
    }
}

/// Definition text from a payload that is either the bare definition or a
/// `Proj4js.defs["CODE"] = "...";` assignment.
pub fn extract_definition(payload: &str) -> String {
    match DEFS_ASSIGNMENT_RE.captures(payload.trim()) {
        Some(caps) => caps[1].trim().to_string(),
        None => payload.trim().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::executor::block_on;

    #[test]
    fn test_extract_assignment() {
        let payload = r#"Proj4js.defs["EPSG:2154"] = "+proj=lcc +lat_1=49 +lat_2=44 +units=m";"#;
        assert_eq!(
            extract_definition(payload),
            "+proj=lcc +lat_1=49 +lat_2=44 +units=m"
        );
    }

    #[test]
    fn test_extract_single_quotes_and_newlines() {
        let payload = "\nProj4js.defs['EPSG:27700'] =\n  '+proj=tmerc +lat_0=49 +lon_0=-2';\n";
        assert_eq!(extract_definition(payload), "+proj=tmerc +lat_0=49 +lon_0=-2");
    }

    #[test]
    fn test_extract_raw_text() {
        assert_eq!(
            extract_definition("  +proj=longlat +datum=WGS84 \n"),
            "+proj=longlat +datum=WGS84"
        );
    }

    #[test]
    fn test_no_fetcher() {
        let fetcher = NoFetcher;
        assert_eq!(
            block_on(fetcher.fetch("defs/EPSG2154.js")),
            Err(FetchError::NotFound("defs/EPSG2154.js".to_string()))
        );
        assert!(block_on(fetcher.fetch_projection("omerc", "projCode/omerc.js")).is_err());
    }
}
