use crate::error::ProjError;
use crate::point::Point;

/// Axis order as three direction characters over `ewnsud`, one per stored
/// component (x, y, z). `enu` is the internal order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Axis([u8; 3]);

impl Axis {
    pub const ENU: Axis = Axis(*b"enu");

    pub fn parse(code: &str) -> Result<Self, ProjError> {
        let bytes = code.as_bytes();
        if bytes.len() != 3 {
            return Err(ProjError::Config(format!(
                "axis '{code}' must have exactly three characters"
            )));
        }
        let mut seen = [false; 3];
        for &c in bytes {
            let (component, _) = direction(c).ok_or_else(|| {
                ProjError::Config(format!("axis '{code}' has invalid direction '{}'", c as char))
            })?;
            if seen[component] {
                return Err(ProjError::Config(format!(
                    "axis '{code}' names the same direction twice"
                )));
            }
            seen[component] = true;
        }
        Ok(Self([bytes[0], bytes[1], bytes[2]]))
    }

    pub fn is_enu(&self) -> bool {
        *self == Self::ENU
    }

    /// Stored components to east/north/up.
    pub fn to_enu(&self, p: Point) -> Point {
        if self.is_enu() {
            return p;
        }
        let mut enu = [0.0; 3];
        for (slot, &c) in self.0.iter().enumerate() {
            if let Some((component, sign)) = direction(c) {
                enu[component] = sign * p.component(slot);
            }
        }
        Point::with_z(enu[0], enu[1], enu[2])
    }

    /// East/north/up to stored components.
    pub fn from_enu(&self, p: Point) -> Point {
        if self.is_enu() {
            return p;
        }
        let mut out = [0.0; 3];
        for (slot, &c) in self.0.iter().enumerate() {
            if let Some((component, sign)) = direction(c) {
                out[slot] = sign * p.component(component);
            }
        }
        Point::with_z(out[0], out[1], out[2])
    }
}

impl Default for Axis {
    fn default() -> Self {
        Self::ENU
    }
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

/// ENU component index and sign for a direction character.
fn direction(c: u8) -> Option<(usize, f64)> {
    match c {
        b'e' => Some((0, 1.0)),
        b'w' => Some((0, -1.0)),
        b'n' => Some((1, 1.0)),
        b's' => Some((1, -1.0)),
        b'u' => Some((2, 1.0)),
        b'd' => Some((2, -1.0)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert!(Axis::parse("enu").unwrap().is_enu());
        assert!(Axis::parse("neu").is_ok());
        assert!(matches!(Axis::parse("enx"), Err(ProjError::Config(_))));
        assert!(matches!(Axis::parse("een"), Err(ProjError::Config(_))));
        assert!(matches!(Axis::parse("ews"), Err(ProjError::Config(_))));
        assert!(matches!(Axis::parse("en"), Err(ProjError::Config(_))));
    }

    #[test]
    fn test_north_east_swaps() {
        let axis = Axis::parse("neu").unwrap();
        let enu = axis.to_enu(Point::with_z(45.0, 10.0, 5.0));
        assert_eq!(enu, Point::with_z(10.0, 45.0, 5.0));
        assert_eq!(axis.from_enu(enu), Point::with_z(45.0, 10.0, 5.0));
    }

    #[test]
    fn test_west_south_down_negate() {
        let axis = Axis::parse("wsd").unwrap();
        let enu = axis.to_enu(Point::with_z(1.0, 2.0, 3.0));
        assert_eq!(enu, Point::with_z(-1.0, -2.0, -3.0));
        assert_eq!(axis.from_enu(enu), Point::with_z(1.0, 2.0, 3.0));
    }
}
