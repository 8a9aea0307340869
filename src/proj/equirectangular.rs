//! Equirectangular (Plate Carrée) projections.
//!
//! eqc:  x = x₀ + a·(λ - λ₀)·cos(φts), y = y₀ + a·(φ - φ₀)
//! equi: x = x₀ + a·(λ - λ₀)·cos(φ₀),  y = y₀ + a·φ
//!
//! Both treat the ellipsoid as a sphere of radius a.

use std::f64::consts::FRAC_PI_2;

use crate::crs::CrsParams;
use crate::error::ProjError;
use crate::proj::common::{adjust_lat, adjust_lon};
use crate::proj::Projection;

pub struct Equirectangular {
    a: f64,
    lon0: f64,
    lat0: f64,
    cos_lat_ts: f64,
    false_easting: f64,
    false_northing: f64,
}

pub fn init(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Equirectangular::new(params)))
}

pub fn init_equi(params: &CrsParams) -> Result<Box<dyn Projection>, ProjError> {
    Ok(Box::new(Equidistant::new(params)))
}

impl Equirectangular {
    pub fn new(params: &CrsParams) -> Self {
        Self {
            a: params.ellipsoid.a,
            lon0: params.long0,
            lat0: params.lat0,
            cos_lat_ts: params.lat_ts.unwrap_or(0.0).cos(),
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for Equirectangular {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let x = self.false_easting + self.a * adjust_lon(lon - self.lon0) * self.cos_lat_ts;
        let y = self.false_northing + self.a * adjust_lat(lat - self.lat0);
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lon = adjust_lon(self.lon0 + (x - self.false_easting) / (self.a * self.cos_lat_ts));
        let lat = adjust_lat(self.lat0 + (y - self.false_northing) / self.a);
        Ok((lon, lat))
    }
}

/// The older `equi` variant: scale true along φ₀, no latitude offset.
pub struct Equidistant {
    a: f64,
    lon0: f64,
    cos_lat0: f64,
    false_easting: f64,
    false_northing: f64,
}

impl Equidistant {
    pub fn new(params: &CrsParams) -> Self {
        Self {
            a: params.ellipsoid.a,
            lon0: params.long0,
            cos_lat0: params.lat0.cos(),
            false_easting: params.x0,
            false_northing: params.y0,
        }
    }
}

impl Projection for Equidistant {
    fn forward(&self, lon: f64, lat: f64) -> Result<(f64, f64), ProjError> {
        let x = self.false_easting + self.a * adjust_lon(lon - self.lon0) * self.cos_lat0;
        let y = self.false_northing + self.a * lat;
        Ok((x, y))
    }

    fn inverse(&self, x: f64, y: f64) -> Result<(f64, f64), ProjError> {
        let lat = (y - self.false_northing) / self.a;
        if lat.abs() > FRAC_PI_2 {
            return Err(ProjError::Domain(
                "equi: northing beyond the pole".to_string(),
            ));
        }
        let lon = adjust_lon(self.lon0 + (x - self.false_easting) / (self.a * self.cos_lat0));
        Ok((lon, lat))
    }
}
