//! Static reference tables: ellipsoids, datums, prime meridians, units and
//! the built-in definitions.

pub mod datum;
pub mod defs;
pub mod ellipsoid;
pub mod units;

pub use defs::{DefinitionStore, WGS84_DEFINITION};
pub use ellipsoid::Ellipsoid;
