//! ipdetect detects repeatable interest points in grayscale images.
//!
//! Corner (Harris/Noble) and blob (Laplacian-of-Gaussian) operators plug into
//! a single-scale detector or a multi-octave scale-space detector. Detected
//! points are localized to subpixel accuracy, thresholded, culled to the
//! strongest and given one or more canonical orientations. Support patches
//! normalized for scale and orientation can then be cut out for descriptor
//! computation. Tiles and octave planes can be processed in parallel via the
//! `rayon` feature.

mod candidate;
pub mod detect;
mod filter;
pub mod image;
pub mod interest;
pub mod lowlevel;
pub mod orientation;
pub mod point;
mod refine;
pub mod support;
mod trace;
pub mod util;

pub use detect::{
    rescale_to_base, Detector, DetectorConfig, FlatDetector, OctavePoints, ScaleSpaceConfig,
    ScaleSpaceDetector,
};
pub use image::pyramid::ImageOctave;
pub use image::{gray_from_u8, ImageView, OwnedImage};
pub use interest::{
    CornerMeasure, HarrisOperator, InterestData, InterestOperator, LogOperator, PeakPolarity,
};
pub use orientation::{assign_orientations, orientation_angles};
pub use point::{crop_points, cull, transfer_error, Homography, InterestPoint, Score};
pub use support::{extract_support, support_from_octave, DEFAULT_SUPPORT_SIZE};
pub use util::{IpDetectError, IpResult};
