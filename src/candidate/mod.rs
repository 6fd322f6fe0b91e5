//! Candidate selection over interest fields.
//!
//! Discrete extrema are found here; subpixel refinement and thresholding
//! happen in the detectors.

pub mod extrema;

pub use extrema::{find_peaks, find_peaks_stack};
