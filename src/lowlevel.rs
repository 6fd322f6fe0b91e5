//! Low-level building blocks for custom detection pipelines.
//!
//! These expose the filters, extrema search, subpixel fits and histogram
//! primitives the detectors are built from. Most users should prefer the
//! top-level `FlatDetector` and `ScaleSpaceDetector` types.

pub use crate::candidate::{find_peaks, find_peaks_stack};
pub use crate::filter::{
    gaussian_blur, gaussian_kernel, gaussian_kernel_2d, gradients, horizontal_filter, laplacian,
    orientation_and_magnitude, separable_filter, vertical_filter,
};
pub use crate::image::tiles::{image_blocks, Rect};
pub use crate::image::transform::{sample_bilinear, warp_bilinear, Affine2};
pub use crate::orientation::histogram::{find_circular_modes, smooth_circular, weighted_histogram};
pub use crate::refine::quad1d::{quad_peak_offset_1d, quad_valley_offset_1d};
pub use crate::refine::{fit_peak, fit_peak_stack, StackFit};
