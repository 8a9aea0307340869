//! Definition store: projection definitions keyed by canonical code.

use std::collections::HashMap;

pub const WGS84_DEFINITION: &str =
    "+title=long/lat:WGS84 +proj=longlat +ellps=WGS84 +datum=WGS84 +units=degrees";

const SPHERICAL_MERCATOR: &str = "+title= Google Mercator +proj=merc +a=6378137 +b=6378137 \
    +lat_ts=0.0 +lon_0=0.0 +x_0=0.0 +y_0=0 +k=1.0 +units=m +nadgrids=@null +no_defs";

static BUILTIN: &[(&str, &str)] = &[
    ("WGS84", WGS84_DEFINITION),
    (
        "EPSG:4326",
        "+title=long/lat:WGS84 +proj=longlat +a=6378137.0 +b=6356752.31424518 +ellps=WGS84 \
         +datum=WGS84 +units=degrees",
    ),
    (
        "EPSG:4269",
        "+title=long/lat:NAD83 +proj=longlat +a=6378137.0 +b=6356752.31414036 +ellps=GRS80 \
         +datum=NAD83 +units=degrees",
    ),
    ("EPSG:3857", SPHERICAL_MERCATOR),
    ("EPSG:3875", SPHERICAL_MERCATOR),
    ("EPSG:3785", SPHERICAL_MERCATOR),
    ("EPSG:900913", SPHERICAL_MERCATOR),
    ("EPSG:102113", SPHERICAL_MERCATOR),
    ("GOOGLE", SPHERICAL_MERCATOR),
];

/// Definitions known without fetching: the built-in table, generated UTM
/// codes, and anything registered at runtime.
#[derive(Debug, Clone)]
pub struct DefinitionStore {
    defs: HashMap<String, String>,
}

impl DefinitionStore {
    pub fn builtin() -> Self {
        let defs = BUILTIN
            .iter()
            .map(|&(code, def)| (code.to_string(), def.to_string()))
            .collect();
        Self { defs }
    }

    pub fn empty() -> Self {
        Self {
            defs: HashMap::new(),
        }
    }

    /// Add or replace a definition.
    pub fn insert(&mut self, code: &str, definition: &str) {
        self.defs.insert(code.to_string(), definition.to_string());
    }

    pub fn get(&self, code: &str) -> Option<String> {
        self.defs.get(code).cloned().or_else(|| utm_definition(code))
    }

    pub fn contains(&self, code: &str) -> bool {
        self.get(code).is_some()
    }
}

impl Default for DefinitionStore {
    fn default() -> Self {
        Self::builtin()
    }
}

/// WGS84 / UTM zones: EPSG:326XX (north) and EPSG:327XX (south), zones 1–60.
fn utm_definition(code: &str) -> Option<String> {
    let number = code.strip_prefix("EPSG:")?.parse::<u32>().ok()?;
    let (zone, south) = match number {
        32601..=32660 => (number - 32600, false),
        32701..=32760 => (number - 32700, true),
        _ => return None,
    };
    let south = if south { " +south" } else { "" };
    Some(format!(
        "+proj=utm +zone={zone}{south} +ellps=WGS84 +datum=WGS84 +units=m +no_defs"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_aliases_share_definition() {
        let store = DefinitionStore::builtin();
        assert_eq!(store.get("EPSG:900913"), store.get("EPSG:3857"));
        assert_eq!(store.get("GOOGLE"), store.get("EPSG:3785"));
    }

    #[test]
    fn test_utm_codes_generated() {
        let store = DefinitionStore::empty();
        let north = store.get("EPSG:32633").unwrap();
        assert!(north.contains("+zone=33"));
        assert!(!north.contains("+south"));
        let south = store.get("EPSG:32760").unwrap();
        assert!(south.contains("+zone=60 +south"));
        assert!(store.get("EPSG:32661").is_none());
        assert!(store.get("EPSG:32700").is_none());
    }

    #[test]
    fn test_runtime_definition() {
        let mut store = DefinitionStore::builtin();
        assert!(!store.contains("EPSG:2154"));
        store.insert("EPSG:2154", "+proj=lcc +lat_1=49 +lat_2=44 +lat_0=46.5 +lon_0=3");
        assert!(store.contains("EPSG:2154"));
    }
}
