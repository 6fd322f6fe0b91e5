//! Single-scale detection on one plane.

use crate::candidate::find_peaks;
use crate::detect::{localize_flat, Detector, DetectorConfig};
use crate::image::ImageView;
use crate::interest::{InterestData, InterestOperator};
use crate::orientation::assign_orientations;
use crate::point::{cull, InterestPoint};
use crate::trace::{trace_span, StageTimer};
use crate::util::IpResult;

/// Detects extrema of an interest operator evaluated at scale 1.
///
/// Per region: derive gradients, evaluate the operator, find extrema,
/// localize, threshold, cull, then assign orientations. Orientation fan-out
/// happens after culling, so the output may hold more than `max_points`
/// points.
#[derive(Clone, Debug)]
pub struct FlatDetector<O> {
    op: O,
    config: DetectorConfig,
}

impl<O: InterestOperator> FlatDetector<O> {
    pub fn new(op: O) -> Self {
        Self::with_config(op, DetectorConfig::default())
    }

    pub fn with_config(op: O, config: DetectorConfig) -> Self {
        Self { op, config }
    }

    pub fn operator(&self) -> &O {
        &self.op
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Builds the derived fields of `image` and evaluates the operator on them.
    pub fn evaluate(&self, image: ImageView<'_, f32>) -> InterestData {
        let timer = StageTimer::start("derive");
        let mut data = InterestData::from_view(image);
        drop(timer);
        let timer = StageTimer::start("interest");
        data.evaluate(&self.op, 1.0);
        drop(timer);
        data
    }
}

impl<O: InterestOperator> Detector for FlatDetector<O> {
    fn process_image(&self, image: ImageView<'_, f32>) -> IpResult<Vec<InterestPoint>> {
        let _span = trace_span!(
            "flat_detect",
            width = image.width(),
            height = image.height()
        )
        .entered();

        let data = self.evaluate(image);
        let Some(field) = data.interest() else {
            return Ok(Vec::new());
        };

        let timer = StageTimer::start("extrema");
        let candidates = find_peaks(field.view(), self.op.peak_polarity());
        timer.finish(candidates.len());

        let timer = StageTimer::start("localize");
        let mut points = localize_flat(field.view(), candidates, self.config.drop_unlocalized);
        timer.finish(points.len());

        let timer = StageTimer::start("threshold");
        points.retain(|p| self.op.threshold(p, &data));
        timer.finish(points.len());

        let timer = StageTimer::start("cull");
        cull(&mut points, self.config.max_points);
        timer.finish(points.len());

        let timer = StageTimer::start("orientation");
        let points = assign_orientations(points, |_| 1.0, |_| Some(&data));
        timer.finish(points.len());

        Ok(points)
    }

    fn parallel(&self) -> bool {
        self.config.parallel
    }
}

#[cfg(test)]
mod tests {
    use super::FlatDetector;
    use crate::detect::{Detector, DetectorConfig};
    use crate::image::OwnedImage;
    use crate::interest::{HarrisOperator, LogOperator};

    fn corner_image() -> OwnedImage<f32> {
        let mut img = OwnedImage::filled(48, 48, 0.0f32).unwrap();
        for y in 24..48 {
            for x in 24..48 {
                img.set(x, y, 0.8 + 0.004 * x as f32 + 0.001 * y as f32);
            }
        }
        img
    }

    #[test]
    fn corner_is_found_near_junction() {
        let img = corner_image();
        let det = FlatDetector::new(HarrisOperator::default());
        let points = det.process_image(img.view()).unwrap();
        assert!(!points.is_empty());
        let near = points
            .iter()
            .any(|p| (p.x - 23.5).abs() <= 2.0 && (p.y - 23.5).abs() <= 2.0);
        assert!(near);
        assert!(points.iter().all(|p| p.orientation.is_some()));
        assert!(points.iter().all(|p| p.scale == 1.0));
    }

    #[test]
    fn max_points_limits_points_before_fan_out() {
        let mut img = OwnedImage::filled(64, 64, 0.0f32).unwrap();
        for (cx, cy) in [(16usize, 16usize), (46, 18), (20, 44), (44, 44)] {
            for y in cy - 3..=cy + 3 {
                for x in cx - 3..=cx + 3 {
                    img.set(x, y, 1.0);
                }
            }
        }
        let op = LogOperator::default().with_smoothing(2.5);
        let config = DetectorConfig {
            max_points: 2,
            ..DetectorConfig::default()
        };
        let det = FlatDetector::with_config(op, config);
        let points = det.process_image(img.view()).unwrap();
        let mut locations: Vec<(isize, isize)> = points.iter().map(|p| (p.ix, p.iy)).collect();
        locations.dedup();
        assert!(locations.len() <= 2);
    }
}
