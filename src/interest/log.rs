//! Laplacian-of-Gaussian blob operator.

use crate::filter::{gaussian_blur, laplacian};
use crate::image::OwnedImage;
use crate::interest::{InterestData, InterestOperator, PeakPolarity};
use crate::point::InterestPoint;

/// Scale-weighted Laplacian blob operator.
///
/// The score is `-s^2 * laplacian(plane)` with `s` the scale in plane pixels,
/// so a blob scores the same whichever octave resolves it. Bright blobs on a
/// dark background are positive maxima and dark blobs negative minima. Planes
/// from a scale-space octave are already blurred; for single-scale detection
/// an explicit pre-smoothing sigma turns the Laplacian into a true LoG.
#[derive(Clone, Copy, Debug)]
pub struct LogOperator {
    threshold: f32,
    smoothing: Option<f32>,
}

impl Default for LogOperator {
    fn default() -> Self {
        Self::new(0.03)
    }
}

impl LogOperator {
    pub fn new(threshold: f32) -> Self {
        Self {
            threshold,
            smoothing: None,
        }
    }

    /// Blurs each plane with a Gaussian of `sigma` before the Laplacian.
    pub fn with_smoothing(mut self, sigma: f32) -> Self {
        self.smoothing = Some(sigma);
        self
    }

    pub fn threshold_value(&self) -> f32 {
        self.threshold
    }

    pub fn smoothing(&self) -> Option<f32> {
        self.smoothing
    }
}

impl InterestOperator for LogOperator {
    fn interest(&self, data: &InterestData, scale: f32) -> OwnedImage<f32> {
        let lap = match self.smoothing {
            Some(sigma) => laplacian(gaussian_blur(data.source().view(), sigma).view()),
            None => laplacian(data.source().view()),
        };
        let s = data.plane_scale(scale);
        let weight = s * s;
        lap.map(|v| -weight * v)
    }

    /// Blobs may be light-on-dark or dark-on-light, so the test is symmetric.
    fn threshold(&self, point: &InterestPoint, _data: &InterestData) -> bool {
        point.interest.magnitude_exceeds(self.threshold)
    }

    fn peak_polarity(&self) -> PeakPolarity {
        PeakPolarity::MinimaAndMaxima
    }
}
