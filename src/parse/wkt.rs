//! Well-Known Text (WKT1) definitions.
//!
//! The text is parsed into a [`WktNode`] tree first, then walked once with
//! the parent keyword in hand so that e.g. a `UNIT` under `PROJCS` can be
//! told apart from the angular `UNIT` of its `GEOGCS`.

use std::sync::LazyLock;

use regex::Regex;

use crate::catalog::datum::code_for_wkt_name;
use crate::error::ProjError;
use crate::parse::params::DefinitionParams;

static NODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)^\s*(\w+)\s*\[(.*)\]\s*$").expect("static regex"));

/// WKT projection names (normalized: lowercase, spaces as underscores)
/// mapped to registry names.
static PROJECTION_NAMES: &[(&str, &str)] = &[
    ("mercator", "merc"),
    ("mercator_1sp", "merc"),
    ("mercator_2sp", "merc"),
    ("mercator_auxiliary_sphere", "merc"),
    ("popular_visualisation_pseudo_mercator", "merc"),
    ("transverse_mercator", "tmerc"),
    ("gauss_kruger", "tmerc"),
    ("universal_transverse_mercator_system", "utm"),
    ("lambert_conformal_conic", "lcc"),
    ("lambert_conformal_conic_1sp", "lcc"),
    ("lambert_conformal_conic_2sp", "lcc"),
    ("lambert_tangential_conformal_conic_projection", "lcc"),
    ("lambert_azimuthal_equal_area", "laea"),
    ("albers_conic_equal_area", "aea"),
    ("albers", "aea"),
    ("stereographic", "stere"),
    ("polar_stereographic", "stere"),
    ("oblique_stereographic", "sterea"),
    ("double_stereographic", "sterea"),
    ("sinusoidal", "sinu"),
    ("equirectangular", "eqc"),
    ("plate_carree", "eqc"),
    ("cylindrical_equal_area", "cea"),
    ("cassini_soldner", "cass"),
    ("cassini", "cass"),
    ("polyconic", "poly"),
    ("american_polyconic", "poly"),
    ("equidistant_conic", "eqdc"),
    ("orthographic", "ortho"),
    ("gnomonic", "gnom"),
    ("azimuthal_equidistant", "aeqd"),
    ("miller_cylindrical", "mill"),
    ("mollweide", "moll"),
    ("krovak", "krovak"),
    ("new_zealand_map_grid", "nzmg"),
    ("hotine_oblique_mercator", "omerc"),
    ("hotine_oblique_mercator_azimuth_natural_origin", "omerc"),
    ("hotine_oblique_mercator_azimuth_center", "omerc"),
    ("hotine_oblique_mercator_two_point_natural_origin", "omerc"),
    ("oblique_mercator", "omerc"),
    ("swiss_oblique_mercator", "somerc"),
    ("swiss_oblique_cylindrical", "somerc"),
    ("van_der_grinten_i", "vandg"),
    ("vandergrinten", "vandg"),
];

/// Registry name for a WKT `PROJECTION` name. Unknown names pass through
/// lowercased.
pub fn projection_name(wkt_name: &str) -> String {
    let normalized = wkt_name.trim().to_lowercase().replace(' ', "_");
    PROJECTION_NAMES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|&(_, proj)| proj.to_string())
        .unwrap_or(normalized)
}

#[derive(Clone, Debug, PartialEq)]
pub enum WktArg {
    Text(String),
    Node(WktNode),
}

/// One `KEYWORD[arg, ...]` element.
#[derive(Clone, Debug, PartialEq)]
pub struct WktNode {
    pub keyword: String,
    pub args: Vec<WktArg>,
}

impl WktNode {
    pub fn parse(text: &str) -> Result<Self, ProjError> {
        let caps = NODE_RE
            .captures(text)
            .ok_or_else(|| ProjError::Parse(format!("not a WKT node: '{}'", abbreviate(text))))?;
        let keyword = caps[1].to_uppercase();
        let args = split_top_level(&caps[2])?
            .into_iter()
            .map(|piece| {
                if NODE_RE.is_match(piece) {
                    WktNode::parse(piece).map(WktArg::Node)
                } else {
                    Ok(WktArg::Text(unquote(piece)))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { keyword, args })
    }

    /// Leading quoted name; `TOWGS84` has none.
    fn name(&self) -> Option<&str> {
        if self.keyword == "TOWGS84" {
            return None;
        }
        match self.args.first() {
            Some(WktArg::Text(name)) => Some(name),
            _ => None,
        }
    }

    /// Text arguments following the name.
    fn values(&self) -> Vec<&str> {
        let skip = usize::from(self.name().is_some());
        self.args
            .iter()
            .skip(skip)
            .filter_map(|arg| match arg {
                WktArg::Text(t) => Some(t.as_str()),
                WktArg::Node(_) => None,
            })
            .collect()
    }

    fn number(&self, index: usize) -> Result<f64, ProjError> {
        let values = self.values();
        let raw = values.get(index).ok_or_else(|| {
            ProjError::Parse(format!("{} is missing value #{}", self.keyword, index + 1))
        })?;
        raw.trim()
            .parse::<f64>()
            .map_err(|_| ProjError::Parse(format!("invalid number '{raw}' in {}", self.keyword)))
    }

    fn children(&self) -> impl Iterator<Item = &WktNode> {
        self.args.iter().filter_map(|arg| match arg {
            WktArg::Node(n) => Some(n),
            WktArg::Text(_) => None,
        })
    }
}

/// Parse a WKT definition into the shared parameter set.
pub fn parse(text: &str) -> Result<DefinitionParams, ProjError> {
    let root = WktNode::parse(text)?;
    let mut params = DefinitionParams::default();
    visit(&root, None, 0, &mut params)?;
    Ok(params)
}

fn visit(
    node: &WktNode,
    parent: Option<&str>,
    axis_position: usize,
    params: &mut DefinitionParams,
) -> Result<(), ProjError> {
    let name = node.name().map(str::to_string);

    match node.keyword.as_str() {
        "PROJCS" => params.srs_code = name,
        "GEOGCS" => {
            params.proj.get_or_insert_with(|| "longlat".to_string());
            if params.srs_code.is_none() {
                params.srs_code = name.clone();
            }
            params.geocs_code = name;
        }
        "LOCAL_CS" => {
            params.proj = Some("identity".to_string());
            params.local_cs = true;
            params.srs_code = name;
        }
        "PROJECTION" => {
            params.proj = name.as_deref().map(projection_name);
            // variant A measures from the natural origin
            if let Some(name) = &name {
                let name = name.trim().to_lowercase().replace(' ', "_");
                if name.starts_with("hotine_oblique_mercator") && !name.ends_with("_center") {
                    params.no_uoff = true;
                }
            }
        }
        "DATUM" => {
            if let Some(name) = &name {
                if let Some(code) = code_for_wkt_name(name) {
                    params.datum = Some(code.to_string());
                }
            }
            params.datum_name = name;
        }
        "LOCAL_DATUM" => params.datum = Some("none".to_string()),
        "SPHEROID" | "ELLIPSOID" => {
            params.ellps = name;
            params.a = Some(node.number(0)?);
            params.rf = Some(node.number(1)?);
        }
        "PRIMEM" => params.from_greenwich = Some(node.number(0)?.to_radians()),
        "UNIT" => {
            if matches!(parent, Some("PROJCS") | Some("LOCAL_CS")) {
                params.to_meter = Some(node.number(0)?);
                params.units = name.map(|n| unit_code(&n));
            }
        }
        "PARAMETER" => {
            let key = name.unwrap_or_default().to_lowercase();
            let value = node.number(0)?;
            match key.as_str() {
                "false_easting" => params.x0 = Some(value),
                "false_northing" => params.y0 = Some(value),
                "scale_factor" => params.k0 = Some(value),
                "central_meridian" => params.long0 = Some(value.to_radians()),
                "longitude_of_center" => {
                    params.long0 = Some(value.to_radians());
                    params.longc = Some(value.to_radians());
                }
                "latitude_of_origin" | "latitude_of_center" => {
                    params.lat0 = Some(value.to_radians())
                }
                "standard_parallel_1" => params.lat1 = Some(value.to_radians()),
                "standard_parallel_2" => params.lat2 = Some(value.to_radians()),
                "azimuth" => params.alpha = Some(value.to_radians()),
                "latitude_of_point_1" => params.lat1 = Some(value.to_radians()),
                "longitude_of_point_1" => params.lon1 = Some(value.to_radians()),
                "latitude_of_point_2" => params.lat2 = Some(value.to_radians()),
                "longitude_of_point_2" => params.lon2 = Some(value.to_radians()),
                _ => {
                    params.unknown.insert(key, value.to_string());
                }
            }
        }
        "TOWGS84" => {
            let shifts = (0..node.values().len())
                .map(|i| node.number(i))
                .collect::<Result<Vec<_>, _>>()?;
            params.towgs84 = Some(shifts);
        }
        "AXIS" => {
            let direction = node
                .values()
                .first()
                .map(|d| axis_char(d))
                .unwrap_or(' ');
            let slot = match name.as_deref().map(str::to_lowercase).as_deref() {
                Some("x") => 0,
                Some("y") => 1,
                Some("z") => 2,
                _ => axis_position,
            };
            if slot < 3 {
                let mut axis: Vec<char> = params
                    .axis
                    .as_deref()
                    .unwrap_or("enu")
                    .chars()
                    .collect();
                axis[slot] = direction;
                params.axis = Some(axis.into_iter().collect());
            }
        }
        _ => {}
    }

    let mut axis_seen = 0;
    for child in node.children() {
        let position = if child.keyword == "AXIS" {
            axis_seen += 1;
            axis_seen - 1
        } else {
            0
        };
        visit(child, Some(node.keyword.as_str()), position, params)?;
    }
    Ok(())
}

fn axis_char(direction: &str) -> char {
    match direction.trim().to_uppercase().as_str() {
        "EAST" => 'e',
        "WEST" => 'w',
        "NORTH" => 'n',
        "SOUTH" => 's',
        "UP" => 'u',
        "DOWN" => 'd',
        _ => ' ',
    }
}

fn unit_code(name: &str) -> String {
    match name.to_lowercase().as_str() {
        "metre" | "meter" => "m".to_string(),
        "foot" => "ft".to_string(),
        "us survey foot" | "foot_us" => "us-ft".to_string(),
        other => other.to_string(),
    }
}

/// Split on commas that are outside brackets and quotes.
fn split_top_level(body: &str) -> Result<Vec<&str>, ProjError> {
    let mut pieces = Vec::new();
    let mut depth: i32 = 0;
    let mut quoted = false;
    let mut start = 0;

    for (i, c) in body.char_indices() {
        match c {
            '"' => quoted = !quoted,
            '[' if !quoted => depth += 1,
            ']' if !quoted => {
                depth -= 1;
                if depth < 0 {
                    return Err(ProjError::Parse("unbalanced ']' in WKT".to_string()));
                }
            }
            ',' if !quoted && depth == 0 => {
                pieces.push(body[start..i].trim());
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 || quoted {
        return Err(ProjError::Parse("unbalanced brackets or quotes in WKT".to_string()));
    }
    let last = body[start..].trim();
    if !last.is_empty() || !pieces.is_empty() {
        pieces.push(last);
    }
    Ok(pieces)
}

fn unquote(piece: &str) -> String {
    let piece = piece.trim();
    let piece = piece.strip_prefix('"').unwrap_or(piece);
    piece.strip_suffix('"').unwrap_or(piece).to_string()
}

fn abbreviate(text: &str) -> String {
    text.chars().take(40).collect()
}
