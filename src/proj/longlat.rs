//! Geographic pass-through (`longlat`, `identity`): coordinates are already
//! longitude/latitude in radians once the pipeline has applied units.

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::Projection;

#[derive(Clone, Copy, Debug, Default)]
pub struct LongLat;

pub fn init(_params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(LongLat))
}

impl Projection for LongLat {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        Ok((lon, lat))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        Ok((x, y))
    }
}
