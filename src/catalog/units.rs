//! Prime meridians and linear units.

/// Longitude of named prime meridians east of Greenwich (degrees).
static PRIME_MERIDIANS: &[(&str, f64)] = &[
    ("greenwich", 0.0),
    ("lisbon", -9.131_906_111_111),
    ("paris", 2.337_229_166_667),
    ("bogota", -74.080_916_666_667),
    ("madrid", -3.687_938_888_889),
    ("rome", 12.452_333_333_333),
    ("bern", 7.439_583_333_333),
    ("jakarta", 106.807_719_444_444),
    ("ferro", -17.666_666_666_667),
    ("brussels", 4.367_975),
    ("stockholm", 18.058_277_777_778),
    ("athens", 23.716_337_5),
    ("oslo", 10.722_916_666_667),
];

/// Metres per unit for the linear units a definition may name.
static LINEAR_UNITS: &[(&str, f64)] = &[
    ("m", 1.0),
    ("km", 1000.0),
    ("ft", 0.3048),
    ("us-ft", 1200.0 / 3937.0),
    ("yd", 0.9144),
    ("link", 0.201_168),
    ("ch", 20.1168),
];

pub fn prime_meridian_degrees(name: &str) -> Option<f64> {
    PRIME_MERIDIANS
        .iter()
        .find(|(n, _)| n.eq_ignore_ascii_case(name))
        .map(|&(_, deg)| deg)
}

pub fn metres_per_unit(name: &str) -> Option<f64> {
    LINEAR_UNITS
        .iter()
        .find(|(n, _)| *n == name)
        .map(|&(_, m)| m)
}
