//! Canonical orientation assignment from local gradient statistics.
//!
//! A Gaussian-weighted histogram of gradient orientations is built in a square
//! window around the point. After circular smoothing every local mode of the
//! histogram becomes an orientation hypothesis.

pub mod histogram;

use crate::filter::gaussian_kernel_2d;
use crate::image::ImageView;
use crate::interest::InterestData;
use crate::point::InterestPoint;
use crate::util::math::round_coord;
use histogram::{find_circular_modes, smooth_circular, weighted_histogram};
use std::f32::consts::PI;

/// Window half-width at `sigma_ratio == 1`.
pub const BASE_HALF_WIDTH: f32 = 5.0;
/// Number of orientation histogram bins.
pub const ORIENTATION_BINS: usize = 36;
/// Bandwidth passed to [`smooth_circular`].
pub const SMOOTHING_BANDWIDTH: f32 = 5.0;
/// Weight kernel sigma at `sigma_ratio == 1`.
const WEIGHT_SIGMA: f32 = 6.0;

/// Finds the dominant orientations around `(i0, j0)`.
///
/// `sigma_ratio` scales the window and the weighting kernel; it is the
/// plane's sigma over the reference plane's sigma, or 1.0 for single-scale
/// detection. Returns an empty vector when the window does not fit inside the
/// fields. Angles are in `[-pi, pi)`, in ascending histogram order.
pub fn orientation_angles(
    orientation: ImageView<'_, f32>,
    magnitude: ImageView<'_, f32>,
    i0: isize,
    j0: isize,
    sigma_ratio: f32,
) -> Vec<f32> {
    if !sigma_ratio.is_finite() || sigma_ratio <= 0.0 {
        return Vec::new();
    }
    let half = (BASE_HALF_WIDTH * sigma_ratio).round() as isize;
    let width = 2 * half + 1;
    let left = i0 - half;
    let top = j0 - half;
    let cols = orientation.width().min(magnitude.width()) as isize;
    let rows = orientation.height().min(magnitude.height()) as isize;
    if left < 0 || top < 0 || left + width >= cols || top + width >= rows {
        return Vec::new();
    }

    let (left, top, width) = (left as usize, top as usize, width as usize);
    let (Ok(ori), Ok(mag)) = (
        orientation.roi(left, top, width, width),
        magnitude.roi(left, top, width, width),
    ) else {
        return Vec::new();
    };
    let kernel = gaussian_kernel_2d(WEIGHT_SIGMA * sigma_ratio, width);
    let Ok(weights) = kernel.zip_map(&mag.to_owned_image(), |k, m| k * m) else {
        return Vec::new();
    };

    let histo = weighted_histogram(ori, weights.view(), -PI, PI, ORIENTATION_BINS);
    let smoothed = smooth_circular(&histo, SMOOTHING_BANDWIDTH);
    let bin_width = 2.0 * PI / ORIENTATION_BINS as f32;
    find_circular_modes(&smoothed)
        .into_iter()
        .map(|m| m as f32 * bin_width - PI)
        .collect()
}

/// Fans `points` out into one oriented copy per orientation hypothesis.
///
/// Copies of one input point are contiguous and follow histogram order.
/// Points for which no orientation is found are dropped. `sigma_ratio`
/// supplies the window scaling for each point.
pub fn assign_orientations<'d>(
    points: Vec<InterestPoint>,
    sigma_ratio: impl Fn(&InterestPoint) -> f32,
    data_for: impl Fn(&InterestPoint) -> Option<&'d InterestData>,
) -> Vec<InterestPoint> {
    let mut oriented = Vec::with_capacity(points.len());
    for point in points {
        let Some(data) = data_for(&point) else {
            continue;
        };
        let angles = orientation_angles(
            data.orientation().view(),
            data.magnitude().view(),
            round_coord(point.x),
            round_coord(point.y),
            sigma_ratio(&point),
        );
        oriented.extend(angles.into_iter().map(|a| point.with_orientation(a)));
    }
    oriented
}
