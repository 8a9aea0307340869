//! Pipeline: point transform between two ready CRSs.
//!
//! source axis → ENU → geodetic radians (inverse projection, prime meridian)
//! → geocentric datum shift through WGS84 → destination prime meridian →
//! forward projection → destination axis.
//!
//! When one side carries a parametric shift and the other is not plain
//! WGS84, the point makes two hops with WGS84 geographic in the middle.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::crs::{Crs, CrsParams, Datum, DatumKind};
use crate::error::ProjError;
use crate::point::Point;
use crate::resolver::CrsHandle;

/// A source/destination pair bound for repeated transforms.
#[derive(Debug)]
pub struct Pipeline {
    src: Arc<Crs>,
    dst: Arc<Crs>,
    datum_shifts: AtomicUsize,
}

impl Pipeline {
    pub fn new(src: Arc<Crs>, dst: Arc<Crs>) -> Self {
        Self {
            src,
            dst,
            datum_shifts: AtomicUsize::new(0),
        }
    }

    /// Bind two handles; fails with [`ProjError::NotReady`] unless both are
    /// ready.
    pub fn from_handles(src: &CrsHandle, dst: &CrsHandle) -> Result<Self, ProjError> {
        let ready = |h: &CrsHandle| h.get().ok_or_else(|| ProjError::NotReady(h.code().to_string()));
        Ok(Self::new(ready(src)?, ready(dst)?))
    }

    pub fn src(&self) -> &Crs {
        &self.src
    }

    pub fn dst(&self) -> &Crs {
        &self.dst
    }

    /// Source coordinates to destination coordinates, in each CRS's native
    /// units and axis order.
    pub fn transform(&self, point: Point) -> Result<Point, ProjError> {
        run(&self.src, &self.dst, point, &self.datum_shifts)
    }

    /// Destination coordinates back to source coordinates.
    pub fn transform_inv(&self, point: Point) -> Result<Point, ProjError> {
        run(&self.dst, &self.src, point, &self.datum_shifts)
    }

    /// Transform in place. Stops at the first failing point; earlier points
    /// keep their transformed values.
    pub fn transform_batch(&self, points: &mut [Point]) -> Result<(), ProjError> {
        for p in points.iter_mut() {
            *p = self.transform(*p)?;
        }
        Ok(())
    }

    /// How many times the geocentric datum shift has run through this
    /// pipeline.
    pub fn datum_shift_count(&self) -> usize {
        self.datum_shifts.load(Ordering::Relaxed)
    }
}

/// One-off transform between two ready CRSs.
pub fn transform(src: &Crs, dst: &Crs, point: Point) -> Result<Point, ProjError> {
    run(src, dst, point, &AtomicUsize::new(0))
}

/// Transform once both handles are ready. `callback` runs exactly once,
/// with the resolution failure of either handle if there is one.
pub fn transform_when_ready<F>(src: &Arc<CrsHandle>, dst: &Arc<CrsHandle>, point: Point, callback: F)
where
    F: FnOnce(Result<Point, ProjError>) + Send + 'static,
{
    let dst = Arc::clone(dst);
    src.when_ready(move |src_crs| match src_crs {
        Err(err) => callback(Err(err)),
        Ok(src_crs) => dst.when_ready(move |dst_crs| {
            callback(dst_crs.and_then(|dst_crs| transform(&src_crs, &dst_crs, point)))
        }),
    });
}

fn needs_wgs84_hop(src: &CrsParams, dst: &CrsParams) -> bool {
    let hop = (src.datum.is_shifted() && dst.datum_code != "WGS84")
        || (dst.datum.is_shifted() && src.datum_code != "WGS84");
    hop && src.datum_code != dst.datum_code
}

fn run(src: &Crs, dst: &Crs, point: Point, shifts: &AtomicUsize) -> Result<Point, ProjError> {
    if needs_wgs84_hop(src.params(), dst.params()) {
        let wgs84 = Crs::wgs84();
        log::trace!(
            "'{}' -> '{}' goes through WGS84",
            src.srs_code(),
            dst.srs_code()
        );
        let mid = run_direct(src, &wgs84, point, shifts)?;
        return run_direct(&wgs84, dst, mid, shifts);
    }
    run_direct(src, dst, point, shifts)
}

fn run_direct(src: &Crs, dst: &Crs, point: Point, shifts: &AtomicUsize) -> Result<Point, ProjError> {
    let sp = src.params();
    let dp = dst.params();

    let p = sp.axis.to_enu(point);
    let mut geodetic = if src.is_geographic() {
        Point::with_z(p.x.to_radians(), p.y.to_radians(), p.z)
    } else {
        let k = sp.to_meter.unwrap_or(1.0);
        let (lon, lat) = src.projection().inverse(p.x * k, p.y * k)?;
        Point::with_z(lon, lat, p.z)
    };
    geodetic.x += sp.from_greenwich;

    let mut geodetic = datum_transform(&sp.datum, &dp.datum, geodetic, shifts)?;
    geodetic.x -= dp.from_greenwich;

    let out = if dst.is_geographic() {
        Point::with_z(geodetic.x.to_degrees(), geodetic.y.to_degrees(), geodetic.z)
    } else {
        let (x, y) = dst.projection().forward(geodetic.x, geodetic.y)?;
        let k = dp.to_meter.unwrap_or(1.0);
        Point::with_z(x / k, y / k, geodetic.z)
    };
    Ok(dp.axis.from_enu(out))
}

/// Geodetic (radians) on `src` to geodetic on `dst`.
fn datum_transform(
    src: &Datum,
    dst: &Datum,
    p: Point,
    shifts: &AtomicUsize,
) -> Result<Point, ProjError> {
    if src.kind == DatumKind::NoDatum || dst.kind == DatumKind::NoDatum {
        return Ok(p);
    }
    for datum in [src, dst] {
        if let DatumKind::GridShift(grids) = &datum.kind {
            return Err(ProjError::UnsupportedDatum(format!(
                "grid shift '{grids}' is not implemented"
            )));
        }
    }
    if src.compare(dst) {
        return Ok(p);
    }

    shifts.fetch_add(1, Ordering::Relaxed);
    log::trace!("geocentric shift {:?} -> {:?}", src.kind, dst.kind);
    let geocentric = src.geodetic_to_geocentric(p)?;
    let shifted = dst.from_wgs84(src.to_wgs84(geocentric));
    dst.geocentric_to_geodetic(shifted)
}
