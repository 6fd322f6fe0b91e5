//! Detector entry points.
//!
//! A [`Detector`] only has to know how to process one image region;
//! [`Detector::detect`] adds optional tiling on top, translating each tile's
//! points back into image coordinates before concatenating them in row-major
//! tile order. Points straddling a tile border may be missed.

#[cfg(feature = "image-io")]
pub mod debug;
mod flat;
mod scale_space;

pub use flat::FlatDetector;
pub use scale_space::{rescale_to_base, OctavePoints, ScaleSpaceConfig, ScaleSpaceDetector};

use crate::image::tiles::{image_blocks, Rect};
use crate::image::{gray_from_u8, ImageView};
use crate::point::InterestPoint;
use crate::refine::fit_peak;
use crate::trace::{trace_event, trace_span};
use crate::util::IpResult;
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration for single-scale detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DetectorConfig {
    /// Maximum number of points kept per tile; 0 keeps all.
    pub max_points: usize,
    /// Process tiles in parallel (requires the `rayon` feature).
    pub parallel: bool,
    /// Drop points whose subpixel fit failed instead of keeping them at their
    /// integer location.
    pub drop_unlocalized: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_points: 1000,
            parallel: false,
            drop_unlocalized: false,
        }
    }
}

/// An interest point detector.
pub trait Detector: Sync {
    /// Detects points in one image region, in that region's coordinates.
    fn process_image(&self, image: ImageView<'_, f32>) -> IpResult<Vec<InterestPoint>>;

    /// Whether [`Detector::detect`] may process tiles concurrently.
    fn parallel(&self) -> bool {
        false
    }

    /// Detects points in `image`, splitting it into tiles of at most
    /// `max_tile_dim` pixels per side. Zero disables tiling.
    fn detect(&self, image: ImageView<'_, f32>, max_tile_dim: usize) -> IpResult<Vec<InterestPoint>> {
        let (width, height) = (image.width(), image.height());
        if max_tile_dim == 0 || (width <= max_tile_dim && height <= max_tile_dim) {
            return self.process_image(image);
        }

        let tiles = image_blocks(width, height, max_tile_dim, max_tile_dim);
        let _span = trace_span!("detect_tiles", tiles = tiles.len()).entered();
        let per_tile = run_tiles(self, image, &tiles)?;
        let mut points = Vec::new();
        for tile_points in per_tile {
            points.extend(tile_points);
        }
        trace_event!("detect_done", points = points.len());
        Ok(points)
    }

    /// Converts an 8-bit image to `[0, 1]` intensities and detects points.
    fn detect_u8(&self, image: ImageView<'_, u8>, max_tile_dim: usize) -> IpResult<Vec<InterestPoint>> {
        let gray = gray_from_u8(image);
        self.detect(gray.view(), max_tile_dim)
    }
}

fn process_tile<D: Detector + ?Sized>(
    detector: &D,
    image: ImageView<'_, f32>,
    tile: &Rect,
) -> IpResult<Vec<InterestPoint>> {
    let view = image.roi(tile.x, tile.y, tile.width, tile.height)?;
    let mut points = detector.process_image(view)?;
    for point in points.iter_mut() {
        point.translate(tile.x, tile.y);
    }
    Ok(points)
}

fn run_tiles<D: Detector + ?Sized>(
    detector: &D,
    image: ImageView<'_, f32>,
    tiles: &[Rect],
) -> IpResult<Vec<Vec<InterestPoint>>> {
    #[cfg(feature = "rayon")]
    if detector.parallel() {
        return tiles
            .par_iter()
            .map(|tile| process_tile(detector, image, tile))
            .collect();
    }
    tiles
        .iter()
        .map(|tile| process_tile(detector, image, tile))
        .collect()
}

/// Refines each candidate in a 2-D field, optionally dropping failed fits.
pub(crate) fn localize_flat(
    field: ImageView<'_, f32>,
    candidates: Vec<InterestPoint>,
    drop_unlocalized: bool,
) -> Vec<InterestPoint> {
    candidates
        .into_iter()
        .filter_map(|mut point| {
            let converged = fit_peak(field, &mut point);
            (converged || !drop_unlocalized).then_some(point)
        })
        .collect()
}
