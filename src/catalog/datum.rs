//! Named geodetic datums with their WGS84 shift parameters.

/// A named entry of the datum catalog.
#[derive(Clone, Copy, Debug)]
pub struct DatumDef {
    pub code: &'static str,
    /// Bursa-Wolf parameters to WGS84 (metres, arcseconds, ppm); empty for grid datums
    pub towgs84: &'static [f64],
    pub nadgrids: Option<&'static str>,
    /// Catalog ellipsoid code
    pub ellipse: &'static str,
    pub name: &'static str,
    /// Spellings used by WKT DATUM nodes
    pub wkt_names: &'static [&'static str],
}

pub static DATUMS: &[DatumDef] = &[
    DatumDef {
        code: "WGS84",
        towgs84: &[0.0, 0.0, 0.0],
        nadgrids: None,
        ellipse: "WGS84",
        name: "WGS84",
        wkt_names: &["WGS_1984", "D_WGS_1984", "World Geodetic System 1984"],
    },
    DatumDef {
        code: "GGRS87",
        towgs84: &[-199.87, 74.79, 246.62],
        nadgrids: None,
        ellipse: "GRS80",
        name: "Greek_Geodetic_Reference_System_1987",
        wkt_names: &["D_GGRS_1987"],
    },
    DatumDef {
        code: "NAD83",
        towgs84: &[0.0, 0.0, 0.0],
        nadgrids: None,
        ellipse: "GRS80",
        name: "North_American_Datum_1983",
        wkt_names: &["D_North_American_1983"],
    },
    DatumDef {
        code: "NAD27",
        towgs84: &[],
        nadgrids: Some("@conus,@alaska,@ntv2_0.gsb,@ntv1_can.dat"),
        ellipse: "clrk66",
        name: "North_American_Datum_1927",
        wkt_names: &["D_North_American_1927"],
    },
    DatumDef {
        code: "potsdam",
        towgs84: &[606.0, 23.0, 413.0],
        nadgrids: None,
        ellipse: "bessel",
        name: "Potsdam Rauenberg 1950 DHDN",
        wkt_names: &["Deutsches_Hauptdreiecksnetz", "D_Deutsches_Hauptdreiecksnetz"],
    },
    DatumDef {
        code: "carthage",
        towgs84: &[-263.0, 6.0, 431.0],
        nadgrids: None,
        ellipse: "clrk80",
        name: "Carthage 1934 Tunisia",
        wkt_names: &["Carthage", "D_Carthage"],
    },
    DatumDef {
        code: "hermannskogel",
        towgs84: &[653.0, -212.0, 449.0],
        nadgrids: None,
        ellipse: "bessel",
        name: "Hermannskogel",
        wkt_names: &["Militar_Geographische_Institut"],
    },
    DatumDef {
        code: "ire65",
        towgs84: &[482.530, -130.596, 564.557, -1.042, -0.214, -0.631, 8.15],
        nadgrids: None,
        ellipse: "mod_airy",
        name: "Ireland 1965",
        wkt_names: &["TM65", "Ireland_1965", "D_TM65"],
    },
    DatumDef {
        code: "nzgd49",
        towgs84: &[59.47, -5.04, 187.44, 0.47, -0.1, 1.024, -4.5993],
        nadgrids: None,
        ellipse: "intl",
        name: "New Zealand Geodetic Datum 1949",
        wkt_names: &["New_Zealand_Geodetic_Datum_1949", "D_New_Zealand_1949"],
    },
    DatumDef {
        code: "OSGB36",
        towgs84: &[446.448, -125.157, 542.060, 0.1502, 0.2470, 0.8421, -20.4894],
        nadgrids: None,
        ellipse: "airy",
        name: "Airy 1830",
        wkt_names: &["OSGB_1936", "D_OSGB_1936"],
    },
];

/// Look up by datum code; `OSB36` is accepted as an alias of `OSGB36`.
pub fn lookup(code: &str) -> Option<&'static DatumDef> {
    let code = if code == "OSB36" { "OSGB36" } else { code };
    DATUMS.iter().find(|def| def.code == code)
}

/// Map a WKT datum name onto a catalog code.
pub fn code_for_wkt_name(name: &str) -> Option<&'static str> {
    DATUMS
        .iter()
        .find(|def| {
            def.code.eq_ignore_ascii_case(name)
                || def.name.eq_ignore_ascii_case(name)
                || def.wkt_names.iter().any(|n| n.eq_ignore_ascii_case(name))
        })
        .map(|def| def.code)
}
