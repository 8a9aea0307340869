//! Reference ellipsoids: the named catalog and the derived constants a CRS
//! carries once resolved.

use crate::proj::common::{EPSLN, RA4, RA6, SIXTH};

/// Resolved ellipsoid with its derived constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipsoid {
    /// Semi-major axis (metres)
    pub a: f64,
    /// Semi-minor axis (metres)
    pub b: f64,
    /// Inverse flattening, when the ellipsoid was given that way
    pub rf: Option<f64>,
    pub a2: f64,
    pub b2: f64,
    /// First eccentricity squared: (a² - b²) / a²
    pub es: f64,
    /// First eccentricity
    pub e: f64,
    /// Second eccentricity squared: (a² - b²) / b²
    pub ep2: f64,
    /// Third flattening: (a - b) / (a + b)
    pub n: f64,
    /// True when a and b coincide; selects the spherical formulas.
    pub sphere: bool,
}

impl Ellipsoid {
    /// Build from both semi-axes. Axes closer than `EPSLN` collapse to a sphere.
    pub fn from_axes(a: f64, b: f64) -> Self {
        if (a - b).abs() < EPSLN {
            return Self::sphere(a);
        }
        Self::derive(a, b, None)
    }

    /// Build from the semi-major axis and inverse flattening; `rf == 0` is a sphere.
    pub fn from_inverse_flattening(a: f64, rf: f64) -> Self {
        if rf == 0.0 {
            return Self {
                rf: Some(0.0),
                ..Self::sphere(a)
            };
        }
        let b = (1.0 - 1.0 / rf) * a;
        if (a - b).abs() < EPSLN {
            return Self {
                rf: Some(rf),
                ..Self::sphere(a)
            };
        }
        Self::derive(a, b, Some(rf))
    }

    pub fn sphere(radius: f64) -> Self {
        Self {
            a: radius,
            b: radius,
            rf: None,
            a2: radius * radius,
            b2: radius * radius,
            es: 0.0,
            e: 0.0,
            ep2: 0.0,
            n: 0.0,
            sphere: true,
        }
    }

    fn derive(a: f64, b: f64, rf: Option<f64>) -> Self {
        let a2 = a * a;
        let b2 = b * b;
        let es = (a2 - b2) / a2;
        Self {
            a,
            b,
            rf,
            a2,
            b2,
            es,
            e: es.sqrt(),
            ep2: (a2 - b2) / b2,
            n: (a - b) / (a + b),
            sphere: false,
        }
    }

    /// Sphere of equal surface area (`+R_A`), from the quartic series in es.
    pub fn authalic_sphere(&self) -> Self {
        let es = self.es;
        let radius = self.a * (1.0 - es * (SIXTH + es * (RA4 + es * RA6)));
        Self::sphere(radius)
    }

    pub fn wgs84() -> Self {
        Self::from_inverse_flattening(6_378_137.0, 298.257_223_563)
    }
}

/// How a catalog entry pins down its flattening.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Shape {
    /// Semi-minor axis in metres
    MinorAxis(f64),
    /// Inverse flattening
    InverseFlattening(f64),
}

/// A named entry of the ellipsoid catalog.
#[derive(Clone, Copy, Debug)]
pub struct EllipsoidDef {
    pub code: &'static str,
    pub a: f64,
    pub shape: Shape,
    pub name: &'static str,
}

impl EllipsoidDef {
    pub fn build(&self) -> Ellipsoid {
        match self.shape {
            Shape::MinorAxis(b) => Ellipsoid::from_axes(self.a, b),
            Shape::InverseFlattening(rf) => Ellipsoid::from_inverse_flattening(self.a, rf),
        }
    }
}

const fn rf(code: &'static str, a: f64, rf: f64, name: &'static str) -> EllipsoidDef {
    EllipsoidDef {
        code,
        a,
        shape: Shape::InverseFlattening(rf),
        name,
    }
}

const fn ab(code: &'static str, a: f64, b: f64, name: &'static str) -> EllipsoidDef {
    EllipsoidDef {
        code,
        a,
        shape: Shape::MinorAxis(b),
        name,
    }
}

pub static ELLIPSOIDS: &[EllipsoidDef] = &[
    rf("MERIT", 6_378_137.0, 298.257, "MERIT 1983"),
    rf("SGS85", 6_378_136.0, 298.257, "Soviet Geodetic System 85"),
    rf("GRS80", 6_378_137.0, 298.257_222_101, "GRS 1980(IUGG, 1980)"),
    rf("IAU76", 6_378_140.0, 298.257, "IAU 1976"),
    ab("airy", 6_377_563.396, 6_356_256.91, "Airy 1830"),
    rf("APL4.", 6_378_137.0, 298.25, "Appl. Physics. 1965"),
    rf("NWL9D", 6_378_145.0, 298.25, "Naval Weapons Lab., 1965"),
    ab("mod_airy", 6_377_340.189, 6_356_034.446, "Modified Airy"),
    rf("andrae", 6_377_104.43, 300.0, "Andrae 1876 (Den., Iclnd.)"),
    rf("aust_SA", 6_378_160.0, 298.25, "Australian Natl & S. Amer. 1969"),
    rf("GRS67", 6_378_160.0, 298.247_167_427, "GRS 67(IUGG 1967)"),
    rf("bessel", 6_377_397.155, 299.152_812_8, "Bessel 1841"),
    rf("bess_nam", 6_377_483.865, 299.152_812_8, "Bessel 1841 (Namibia)"),
    ab("clrk66", 6_378_206.4, 6_356_583.8, "Clarke 1866"),
    rf("clrk80", 6_378_249.145, 293.4663, "Clarke 1880 mod."),
    rf("CPM", 6_375_738.7, 334.29, "Comm. des Poids et Mesures 1799"),
    rf("delmbr", 6_376_428.0, 311.5, "Delambre 1810 (Belgium)"),
    rf("engelis", 6_378_136.05, 298.2566, "Engelis 1985"),
    rf("evrst30", 6_377_276.345, 300.8017, "Everest 1830"),
    rf("evrst48", 6_377_304.063, 300.8017, "Everest 1948"),
    rf("evrst56", 6_377_301.243, 300.8017, "Everest 1956"),
    rf("evrst69", 6_377_295.664, 300.8017, "Everest 1969"),
    rf("evrstSS", 6_377_298.556, 300.8017, "Everest (Sabah & Sarawak)"),
    rf("fschr60", 6_378_166.0, 298.3, "Fischer (Mercury Datum) 1960"),
    rf("fschr60m", 6_378_155.0, 298.3, "Fischer 1960"),
    rf("fschr68", 6_378_150.0, 298.3, "Fischer 1968"),
    rf("helmert", 6_378_200.0, 298.3, "Helmert 1906"),
    rf("hough", 6_378_270.0, 297.0, "Hough"),
    rf("intl", 6_378_388.0, 297.0, "International 1909 (Hayford)"),
    rf("kaula", 6_378_163.0, 298.24, "Kaula 1961"),
    rf("lerch", 6_378_139.0, 298.257, "Lerch 1979"),
    rf("mprts", 6_397_300.0, 191.0, "Maupertius 1738"),
    ab("new_intl", 6_378_157.5, 6_356_772.2, "New International 1967"),
    ab("plessis", 6_376_523.0, 6_355_863.0, "Plessis 1817 (France)"),
    rf("krass", 6_378_245.0, 298.3, "Krassovsky, 1942"),
    ab("SEasia", 6_378_155.0, 6_356_773.3205, "Southeast Asia"),
    ab("walbeck", 6_376_896.0, 6_355_834.8467, "Walbeck"),
    rf("WGS60", 6_378_165.0, 298.3, "WGS 60"),
    rf("WGS66", 6_378_145.0, 298.25, "WGS 66"),
    rf("WGS72", 6_378_135.0, 298.26, "WGS 72"),
    rf("WGS84", 6_378_137.0, 298.257_223_563, "WGS 84"),
    ab("sphere", 6_370_997.0, 6_370_997.0, "Normal Sphere (r=6370997)"),
];

/// Look up a catalog ellipsoid by its code (`"intl"`, `"GRS80"`, ...).
pub fn lookup(code: &str) -> Option<&'static EllipsoidDef> {
    ELLIPSOIDS.iter().find(|def| def.code == code)
}
