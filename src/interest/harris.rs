//! Corner measures on the second-moment matrix.

use crate::filter::{gaussian_kernel, separable_filter};
use crate::image::OwnedImage;
use crate::interest::{InterestData, InterestOperator, PeakPolarity};
use crate::point::InterestPoint;

const NOBLE_EPSILON: f32 = 1e-6;

/// Scalar corner strength derived from the structure matrix.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CornerMeasure {
    /// `det / (trace + eps)`; needs no tuning.
    Noble,
    /// `det - k * trace^2`; typical `k` lies in `[0.04, 0.15]`.
    Harris { k: f32 },
}

/// Harris/Noble corner operator.
#[derive(Clone, Copy, Debug)]
pub struct HarrisOperator {
    measure: CornerMeasure,
    threshold: f32,
}

impl Default for HarrisOperator {
    fn default() -> Self {
        Self::new(1e-5)
    }
}

impl HarrisOperator {
    /// Noble corner measure with the given threshold.
    pub fn new(threshold: f32) -> Self {
        Self {
            measure: CornerMeasure::Noble,
            threshold,
        }
    }

    /// Harris measure for a non-negative `k`, Noble for a negative one.
    pub fn from_k(threshold: f32, k: f32) -> Self {
        let measure = if k < 0.0 {
            CornerMeasure::Noble
        } else {
            CornerMeasure::Harris { k }
        };
        Self { measure, threshold }
    }

    pub fn with_measure(mut self, measure: CornerMeasure) -> Self {
        self.measure = measure;
        self
    }

    pub fn measure(&self) -> CornerMeasure {
        self.measure
    }

    pub fn threshold_value(&self) -> f32 {
        self.threshold
    }
}

impl InterestOperator for HarrisOperator {
    /// Weights `Ix^2`, `Iy^2` and `IxIy` by the squared plane scale, smooths
    /// them with a Gaussian of that sigma and scores each pixel with the
    /// configured corner measure.
    fn interest(&self, data: &InterestData, scale: f32) -> OwnedImage<f32> {
        let gx = data.gradient_x().data();
        let gy = data.gradient_y().data();
        let width = data.gradient_x().width();
        let height = data.gradient_x().height();
        let sigma = data.plane_scale(scale);
        let norm = sigma * sigma;

        let product = |f: &dyn Fn(f32, f32) -> f32| {
            let values = gx.iter().zip(gy).map(|(&x, &y)| norm * f(x, y)).collect();
            OwnedImage::from_vec(values, width, height).expect("product matches gradients")
        };
        let kernel = gaussian_kernel(sigma, 0);
        let ix2 = separable_filter(product(&|x, _| x * x).view(), &kernel, &kernel);
        let iy2 = separable_filter(product(&|_, y| y * y).view(), &kernel, &kernel);
        let ixy = separable_filter(product(&|x, y| x * y).view(), &kernel, &kernel);

        let measure = self.measure;
        let scores = ix2
            .data()
            .iter()
            .zip(iy2.data())
            .zip(ixy.data())
            .map(|((&a, &b), &c)| {
                let trace = a + b;
                let det = a * b - c * c;
                match measure {
                    CornerMeasure::Noble => det / (trace + NOBLE_EPSILON),
                    CornerMeasure::Harris { k } => det - k * trace * trace,
                }
            })
            .collect();
        OwnedImage::from_vec(scores, width, height).expect("scores match gradients")
    }

    fn threshold(&self, point: &InterestPoint, _data: &InterestData) -> bool {
        point.interest.exceeds(self.threshold)
    }

    fn peak_polarity(&self) -> PeakPolarity {
        PeakPolarity::MaximaOnly
    }
}
