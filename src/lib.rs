//! Coordinate reference system engine.
//!
//! Parse proj-strings, WKT or authority codes into a [`Crs`], then move
//! points between two of them with [`transform`] or a bound [`Pipeline`].
//! Codes without a local definition go through a [`Resolver`] and the
//! host's [`ResourceFetcher`].

pub mod catalog;
pub mod crs;
pub mod error;
pub mod parse;
pub mod point;
pub mod proj;
pub mod resolver;

pub use crs::{Crs, CrsParams};
pub use error::{FetchError, ProjError};
pub use point::Point;
pub use proj::pipeline::{transform, transform_when_ready, Pipeline};
pub use proj::{Projection, ProjectionEntry, Registry};
pub use resolver::{CrsHandle, HandleState, ResourceFetcher, Resolver, ResolverConfig};
