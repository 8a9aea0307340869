//! Coordinate triple passed through transforms.

use std::str::FromStr;

use crate::error::ProjError;

/// A coordinate triple. Units depend on the CRS it is interpreted in:
/// degrees for geographic systems, linear units for projected ones.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub const fn with_z(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub(crate) fn component(&self, index: usize) -> f64 {
        match index {
            0 => self.x,
            1 => self.y,
            _ => self.z,
        }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self::new(x, y)
    }
}

impl From<(f64, f64, f64)> for Point {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self::with_z(x, y, z)
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::with_z(x, y, z)
    }
}

impl From<Point> for (f64, f64) {
    fn from(p: Point) -> Self {
        (p.x, p.y)
    }
}

/// Parses `"x,y"` or `"x,y,z"`.
impl FromStr for Point {
    type Err = ProjError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let values = s
            .split(',')
            .map(|v| {
                v.trim()
                    .parse::<f64>()
                    .map_err(|_| ProjError::Parse(format!("invalid coordinate '{v}' in '{s}'")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        match values.as_slice() {
            [x, y] => Ok(Point::new(*x, *y)),
            [x, y, z] => Ok(Point::with_z(*x, *y, *z)),
            _ => Err(ProjError::Parse(format!(
                "expected 2 or 3 coordinates, got {} in '{s}'",
                values.len()
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_z_defaults_to_zero() {
        let p = Point::new(1.0, 2.0);
        assert_relative_eq!(p.z, 0.0);
        let p: Point = (3.0, 4.0).into();
        assert_relative_eq!(p.z, 0.0);
    }

    #[test]
    fn test_parse_from_text() {
        let p: Point = "-122.4194, 37.7749".parse().unwrap();
        assert_relative_eq!(p.x, -122.4194);
        assert_relative_eq!(p.y, 37.7749);

        let p: Point = "1,2,3".parse().unwrap();
        assert_relative_eq!(p.z, 3.0);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!("1".parse::<Point>(), Err(ProjError::Parse(_))));
        assert!(matches!("a,b".parse::<Point>(), Err(ProjError::Parse(_))));
    }
}
