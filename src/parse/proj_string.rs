//! `+key=value` definitions.

use crate::catalog::units::prime_meridian_degrees;
use crate::error::ProjError;
use crate::parse::params::DefinitionParams;

/// Parse a proj-string. Tokens are delimited by `+`, so a value such as a
/// title may contain spaces.
pub fn parse(text: &str) -> Result<DefinitionParams, ProjError> {
    let mut params = DefinitionParams::default();
    let mut keys = 0usize;

    for token in text.split('+') {
        let (raw_key, value) = match token.split_once('=') {
            Some((k, v)) => (k, Some(v.trim())),
            None => (token, None),
        };
        let key: String = raw_key
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if key.is_empty() {
            continue;
        }
        keys += 1;
        apply(&mut params, &key, raw_key.trim(), value)?;
    }

    if keys == 0 {
        return Err(ProjError::Parse(format!("no +key=value pairs in '{text}'")));
    }
    Ok(params)
}

fn apply(
    params: &mut DefinitionParams,
    key: &str,
    raw_key: &str,
    value: Option<&str>,
) -> Result<(), ProjError> {
    let text = || value.unwrap_or_default().to_string();
    let compact = || {
        value
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
    };

    match key {
        "title" => params.title = Some(text()),
        "proj" => params.proj = Some(compact()),
        "units" => params.units = Some(compact()),
        "datum" => params.datum = Some(compact()),
        "nadgrids" => params.nadgrids = Some(compact()),
        "ellps" => params.ellps = Some(compact()),
        // "+R" is case-sensitive in practice; the lowercased key collides with "+r"
        "r" if raw_key == "R" => {
            let r = number(key, value)?;
            params.a = Some(r);
            params.b = Some(r);
        }
        "a" => params.a = Some(number(key, value)?),
        "b" => params.b = Some(number(key, value)?),
        "rf" => params.rf = Some(number(key, value)?),
        "lat_0" => params.lat0 = Some(degrees(key, value)?),
        "lat_1" => params.lat1 = Some(degrees(key, value)?),
        "lat_2" => params.lat2 = Some(degrees(key, value)?),
        "lat_ts" => params.lat_ts = Some(degrees(key, value)?),
        "lon_0" => params.long0 = Some(degrees(key, value)?),
        "alpha" => params.alpha = Some(degrees(key, value)?),
        "lonc" => params.longc = Some(degrees(key, value)?),
        "lon_1" => params.lon1 = Some(degrees(key, value)?),
        "lon_2" => params.lon2 = Some(degrees(key, value)?),
        "x_0" => params.x0 = Some(number(key, value)?),
        "y_0" => params.y0 = Some(number(key, value)?),
        "k_0" | "k" => params.k0 = Some(number(key, value)?),
        "r_a" => params.r_a = flag(key, value)?,
        "zone" => {
            let zone = compact();
            params.zone = Some(
                zone.parse::<i32>()
                    .map_err(|_| ProjError::Parse(format!("invalid zone '{zone}'")))?,
            );
        }
        "south" => params.south = flag(key, value)?,
        "czech" => params.czech = flag(key, value)?,
        "no_uoff" | "no_off" => params.no_uoff = flag(key, value)?,
        "no_defs" => params.no_defs = flag(key, value)?,
        "towgs84" => {
            let list = compact();
            let values = list
                .split(',')
                .map(|v| {
                    v.parse::<f64>()
                        .map_err(|_| ProjError::Parse(format!("invalid towgs84 value '{v}'")))
                })
                .collect::<Result<Vec<_>, _>>()?;
            params.towgs84 = Some(values);
        }
        "to_meter" => params.to_meter = Some(number(key, value)?),
        "from_greenwich" => params.from_greenwich = Some(degrees(key, value)?),
        "pm" => {
            let pm = compact();
            let deg = match prime_meridian_degrees(&pm) {
                Some(deg) => deg,
                None => pm
                    .parse::<f64>()
                    .map_err(|_| ProjError::Parse(format!("unknown prime meridian '{pm}'")))?,
            };
            params.from_greenwich = Some(deg.to_radians());
        }
        "axis" => params.axis = Some(compact()),
        _ => {
            params.unknown.insert(key.to_string(), text());
        }
    }
    Ok(())
}

fn number(key: &str, value: Option<&str>) -> Result<f64, ProjError> {
    let v = value.ok_or_else(|| ProjError::Parse(format!("+{key} requires a value")))?;
    v.parse::<f64>()
        .map_err(|_| ProjError::Parse(format!("invalid number '{v}' for +{key}")))
}

fn degrees(key: &str, value: Option<&str>) -> Result<f64, ProjError> {
    Ok(number(key, value)?.to_radians())
}

fn flag(key: &str, value: Option<&str>) -> Result<bool, ProjError> {
    match value.map(str::to_ascii_lowercase).as_deref() {
        None | Some("") | Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(ProjError::Parse(format!("invalid flag value '{other}' for +{key}"))),
    }
}
