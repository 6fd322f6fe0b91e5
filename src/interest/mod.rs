//! Interest operators and the per-plane derived data they consume.
//!
//! An [`InterestOperator`] turns the gradients of one plane into a scalar
//! "interestingness" field, decides which localized points are strong enough
//! to keep, and tells the extrema search whether to look for maxima only or
//! for both minima and maxima.

use crate::filter::{gradients, orientation_and_magnitude};
use crate::image::{ImageView, OwnedImage};
use crate::point::InterestPoint;

mod harris;
mod log;

pub use harris::{CornerMeasure, HarrisOperator};
pub use log::LogOperator;

/// Which extrema of the interest field mark features.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeakPolarity {
    /// Only local maxima are features.
    MaximaOnly,
    /// Both local minima and local maxima are features.
    MinimaAndMaxima,
}

/// Derived fields for one image plane.
///
/// Gradients, orientation and magnitude are computed eagerly on construction;
/// the interest field is filled in by the detector after the operator runs.
/// `base_scale` is the size of one plane pixel in base-image pixels (1.0 unless
/// the plane comes from a downsampled octave).
pub struct InterestData {
    source: OwnedImage<f32>,
    base_scale: f32,
    grad_x: OwnedImage<f32>,
    grad_y: OwnedImage<f32>,
    orientation: OwnedImage<f32>,
    magnitude: OwnedImage<f32>,
    interest: Option<OwnedImage<f32>>,
}

impl InterestData {
    /// Computes gradients, orientation and magnitude for `source`.
    pub fn new(source: OwnedImage<f32>) -> Self {
        let (grad_x, grad_y) = gradients(source.view());
        let (orientation, magnitude) = orientation_and_magnitude(&grad_x, &grad_y);
        Self {
            source,
            base_scale: 1.0,
            grad_x,
            grad_y,
            orientation,
            magnitude,
            interest: None,
        }
    }

    /// Copies `view` and computes its derived fields.
    pub fn from_view(view: ImageView<'_, f32>) -> Self {
        Self::new(view.to_owned_image())
    }

    /// Marks the plane as sampled at `base_scale` base-image pixels per pixel.
    pub fn with_base_scale(mut self, base_scale: f32) -> Self {
        self.base_scale = base_scale;
        self
    }

    pub fn base_scale(&self) -> f32 {
        self.base_scale
    }

    /// Converts an absolute scale to plane pixels.
    pub fn plane_scale(&self, scale: f32) -> f32 {
        scale / self.base_scale
    }

    pub fn source(&self) -> &OwnedImage<f32> {
        &self.source
    }

    pub fn gradient_x(&self) -> &OwnedImage<f32> {
        &self.grad_x
    }

    pub fn gradient_y(&self) -> &OwnedImage<f32> {
        &self.grad_y
    }

    /// Edge orientation `atan2(Iy, Ix)` in `[-pi, pi]`.
    pub fn orientation(&self) -> &OwnedImage<f32> {
        &self.orientation
    }

    /// Edge magnitude `hypot(Ix, Iy)`.
    pub fn magnitude(&self) -> &OwnedImage<f32> {
        &self.magnitude
    }

    /// Interest field, `None` until [`InterestData::set_interest`] is called.
    pub fn interest(&self) -> Option<&OwnedImage<f32>> {
        self.interest.as_ref()
    }

    pub fn set_interest(&mut self, interest: OwnedImage<f32>) {
        self.interest = Some(interest);
    }

    /// Runs `op` at `scale` and stores the resulting interest field.
    pub fn evaluate<O: InterestOperator + ?Sized>(&mut self, op: &O, scale: f32) {
        let interest = op.interest(self, scale);
        self.set_interest(interest);
    }
}

/// Strategy computing an interest field and its acceptance predicate.
pub trait InterestOperator: Sync {
    /// Computes the interest field of `data` at the absolute `scale`.
    ///
    /// Scale-normalized operators work with [`InterestData::plane_scale`] so
    /// the same feature scores alike in every octave.
    fn interest(&self, data: &InterestData, scale: f32) -> OwnedImage<f32>;

    /// Returns true when `point` is strong enough to keep.
    fn threshold(&self, point: &InterestPoint, data: &InterestData) -> bool;

    /// Extrema of the interest field that count as features.
    fn peak_polarity(&self) -> PeakPolarity;
}
