pub mod albers_equal_area;
pub mod azimuthal_equidistant;
pub mod cassini;
pub mod common;
pub mod cylindrical_equal_area;
pub mod equidistant_conic;
pub mod equirectangular;
pub mod gauss;
pub mod gauss_schreiber;
pub mod gnomonic;
pub mod krovak;
pub mod lambert_azimuthal;
pub mod lambert_conformal;
pub mod longlat;
pub mod mercator;
pub mod miller;
pub mod mollweide;
pub mod new_zealand_map_grid;
pub mod oblique_mercator;
pub mod orthographic;
pub mod pipeline;
pub mod polyconic;
pub mod registry;
pub mod sinusoidal;
pub mod stereographic;
pub mod swiss_oblique_mercator;
pub mod transverse_mercator;
pub mod utm;
pub mod van_der_grinten;

use crate::error::ProjError;

pub use registry::{InitFn, ProjectionEntry, Registry};

/// Trait for map projections supporting forward and inverse transforms.
///
/// Implementations hold the constants computed once from the CRS in their
/// `init` function and are never mutated afterwards.
pub trait Projection: Send + Sync {
    /// Forward: (lon_rad, lat_rad) -> (easting, northing) in metres
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError>;

    /// Inverse: (easting, northing) -> (lon_rad, lat_rad)
    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError>;

    /// Batch forward transform (default: loop).
    fn forward_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.forward(c.0, c.1)?;
        }
        Ok(())
    }

    /// Batch inverse transform.
    fn inverse_batch(&self, coords: &mut [(f64, f64)]) -> Result<(), ProjError> {
        for c in coords.iter_mut() {
            *c = self.inverse(c.0, c.1)?;
        }
        Ok(())
    }
}
