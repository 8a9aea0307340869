use std::collections::BTreeMap;

/// Parameters extracted from a definition, shared by the proj-string and
/// WKT parsers. Angles are already in radians.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefinitionParams {
    pub title: Option<String>,
    pub proj: Option<String>,
    pub units: Option<String>,
    pub datum: Option<String>,
    pub datum_name: Option<String>,
    pub nadgrids: Option<String>,
    pub ellps: Option<String>,
    pub a: Option<f64>,
    pub b: Option<f64>,
    pub rf: Option<f64>,
    pub lat0: Option<f64>,
    pub lat1: Option<f64>,
    pub lat2: Option<f64>,
    pub lat_ts: Option<f64>,
    pub long0: Option<f64>,
    pub alpha: Option<f64>,
    pub longc: Option<f64>,
    pub lon1: Option<f64>,
    pub lon2: Option<f64>,
    pub x0: Option<f64>,
    pub y0: Option<f64>,
    pub k0: Option<f64>,
    pub r_a: bool,
    pub zone: Option<i32>,
    pub south: bool,
    pub towgs84: Option<Vec<f64>>,
    pub to_meter: Option<f64>,
    pub from_greenwich: Option<f64>,
    pub axis: Option<String>,
    pub czech: bool,
    pub no_uoff: bool,
    pub no_defs: bool,
    /// Name taken from the outermost WKT node
    pub srs_code: Option<String>,
    pub geocs_code: Option<String>,
    pub local_cs: bool,
    /// Keys no stage understands, kept verbatim
    pub unknown: BTreeMap<String, String>,
}
