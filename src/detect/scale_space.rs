//! Multi-octave detection over a Gaussian scale space.

use crate::candidate::find_peaks_stack;
use crate::detect::Detector;
use crate::image::pyramid::ImageOctave;
use crate::image::{ImageView, OwnedImage};
use crate::interest::{InterestData, InterestOperator};
use crate::orientation::assign_orientations;
use crate::point::{cull, InterestPoint};
use crate::refine::fit_peak_stack;
use crate::trace::{trace_event, trace_span, StageTimer};
use crate::util::math::round_coord;
use crate::util::{IpDetectError, IpResult};
#[cfg(feature = "rayon")]
use rayon::prelude::*;

/// Configuration for scale-space detection.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSpaceConfig {
    /// Number of octaves to process.
    pub octaves: usize,
    /// Scales per octave; each octave holds `scales + 2` planes.
    pub scales: usize,
    /// Sigma of the reference plane, in plane pixels.
    pub init_sigma: f32,
    /// Blur already present in the input image.
    pub source_sigma: f32,
    /// Maximum number of points kept per octave; 0 keeps all.
    pub max_points: usize,
    /// Build per-plane data and process tiles in parallel (requires `rayon`).
    pub parallel: bool,
    /// Drop points whose subpixel/subscale fit failed.
    pub drop_unlocalized: bool,
}

impl Default for ScaleSpaceConfig {
    fn default() -> Self {
        Self {
            octaves: 3,
            scales: 3,
            init_sigma: 1.6,
            source_sigma: 0.5,
            max_points: 1000,
            parallel: false,
            drop_unlocalized: false,
        }
    }
}

impl ScaleSpaceConfig {
    pub fn validate(&self) -> IpResult<()> {
        if self.octaves == 0 {
            return Err(IpDetectError::InvalidConfig {
                reason: "octaves must be positive",
            });
        }
        if self.scales == 0 {
            return Err(IpDetectError::InvalidConfig {
                reason: "scales per octave must be positive",
            });
        }
        Ok(())
    }
}

/// Points surviving one octave, already in base-image coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct OctavePoints {
    pub octave: usize,
    pub base_scale: f32,
    pub points: Vec<InterestPoint>,
}

/// Maps a point from plane coordinates to base-image coordinates.
///
/// `x` and `y` are multiplied by `base_scale` and the integer location is
/// recomputed. `scale` is already absolute and is left alone.
pub fn rescale_to_base(point: &mut InterestPoint, base_scale: f32) {
    point.x *= base_scale;
    point.y *= base_scale;
    point.ix = round_coord(point.x);
    point.iy = round_coord(point.y);
}

/// Detects space-scale extrema of an interest operator, octave by octave.
#[derive(Clone, Debug)]
pub struct ScaleSpaceDetector<O> {
    op: O,
    config: ScaleSpaceConfig,
}

impl<O: InterestOperator> ScaleSpaceDetector<O> {
    pub fn new(op: O) -> Self {
        Self::with_config(op, ScaleSpaceConfig::default())
    }

    pub fn with_config(op: O, config: ScaleSpaceConfig) -> Self {
        Self { op, config }
    }

    pub fn operator(&self) -> &O {
        &self.op
    }

    pub fn config(&self) -> &ScaleSpaceConfig {
        &self.config
    }

    /// Builds the first octave of `image` with this detector's settings.
    pub fn build_octave(&self, image: ImageView<'_, f32>) -> IpResult<ImageOctave> {
        self.config.validate()?;
        ImageOctave::new(
            image,
            self.config.scales,
            self.config.init_sigma,
            self.config.source_sigma,
        )
    }

    /// Derives and scores every plane of `octave`.
    ///
    /// Plane `k` is scored at its absolute scale `plane_index_to_scale(k)`;
    /// the octave's base scale travels with the data for normalization.
    pub fn evaluate_octave(&self, octave: &ImageOctave) -> Vec<InterestData> {
        let timer = StageTimer::start("derive");
        let base_scale = octave.base_scale();
        let evaluate = |(k, plane): (usize, &OwnedImage<f32>)| {
            let mut data = InterestData::from_view(plane.view()).with_base_scale(base_scale);
            data.evaluate(&self.op, octave.plane_index_to_scale(k as f32));
            data
        };
        #[cfg(feature = "rayon")]
        let data: Vec<InterestData> = if self.config.parallel {
            octave.planes().par_iter().enumerate().map(evaluate).collect()
        } else {
            octave.planes().iter().enumerate().map(evaluate).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let data: Vec<InterestData> = octave.planes().iter().enumerate().map(evaluate).collect();
        timer.finish(data.len());
        data
    }

    /// Detects points in one octave, returned in plane coordinates.
    fn detect_in_octave(&self, octave: &ImageOctave) -> Vec<InterestPoint> {
        let data = self.evaluate_octave(octave);
        let fields: Vec<ImageView<'_, f32>> = data
            .iter()
            .filter_map(|d| d.interest().map(|f| f.view()))
            .collect();
        if fields.len() != octave.num_planes() {
            return Vec::new();
        }

        let timer = StageTimer::start("extrema");
        let candidates = find_peaks_stack(&fields, self.op.peak_polarity(), |k| {
            octave.plane_index_to_scale(k as f32)
        });
        timer.finish(candidates.len());

        let timer = StageTimer::start("localize");
        let mut points: Vec<InterestPoint> = candidates
            .into_iter()
            .filter_map(|mut point| {
                let plane = octave.scale_to_plane_index(point.scale);
                let fit = fit_peak_stack(&fields, plane, &mut point);
                point.scale = octave.plane_index_to_scale(fit.plane);
                (fit.converged || !self.config.drop_unlocalized).then_some(point)
            })
            .collect();
        timer.finish(points.len());

        let plane_data = |p: &InterestPoint| data.get(octave.scale_to_plane_index(p.scale));

        let timer = StageTimer::start("threshold");
        points.retain(|p| plane_data(p).is_some_and(|d| self.op.threshold(p, d)));
        timer.finish(points.len());

        let timer = StageTimer::start("cull");
        cull(&mut points, self.config.max_points);
        timer.finish(points.len());

        let timer = StageTimer::start("orientation");
        let points = assign_orientations(
            points,
            |p| octave.sigma_ratio(octave.scale_to_plane_index(p.scale)),
            plane_data,
        );
        timer.finish(points.len());
        points
    }

    /// Runs every octave and returns the points of each, in base-image
    /// coordinates.
    ///
    /// Stops early when the image becomes too small to downsample.
    pub fn process_octaves(&self, image: ImageView<'_, f32>) -> IpResult<Vec<OctavePoints>> {
        let mut octave = self.build_octave(image)?;
        let mut results = Vec::with_capacity(self.config.octaves);
        for index in 0..self.config.octaves {
            let _span = trace_span!("octave", octave = index, base_scale = octave.base_scale())
                .entered();
            let base_scale = octave.base_scale();
            let mut points = self.detect_in_octave(&octave);

            let timer = StageTimer::start("rescale");
            for point in points.iter_mut() {
                rescale_to_base(point, base_scale);
            }
            timer.finish(points.len());

            trace_event!("octave_done", octave = index, points = points.len());
            results.push(OctavePoints {
                octave: index,
                base_scale,
                points,
            });

            if index + 1 < self.config.octaves {
                let timer = StageTimer::start("next_octave");
                let advanced = octave.build_next()?;
                drop(timer);
                if !advanced {
                    break;
                }
            }
        }
        Ok(results)
    }
}

impl<O: InterestOperator> Detector for ScaleSpaceDetector<O> {
    fn process_image(&self, image: ImageView<'_, f32>) -> IpResult<Vec<InterestPoint>> {
        let _span = trace_span!(
            "scale_space_detect",
            width = image.width(),
            height = image.height()
        )
        .entered();
        Ok(self
            .process_octaves(image)?
            .into_iter()
            .flat_map(|octave| octave.points)
            .collect())
    }

    fn parallel(&self) -> bool {
        self.config.parallel
    }
}

#[cfg(test)]
mod tests {
    use super::{rescale_to_base, ScaleSpaceConfig, ScaleSpaceDetector};
    use crate::detect::Detector;
    use crate::image::OwnedImage;
    use crate::interest::LogOperator;
    use crate::point::InterestPoint;
    use crate::util::IpDetectError;

    #[test]
    fn zero_octaves_is_a_config_error() {
        let img = OwnedImage::filled(16, 16, 0.0f32).unwrap();
        let config = ScaleSpaceConfig {
            octaves: 0,
            ..ScaleSpaceConfig::default()
        };
        let det = ScaleSpaceDetector::with_config(LogOperator::default(), config);
        assert_eq!(
            det.process_image(img.view()).unwrap_err(),
            IpDetectError::InvalidConfig {
                reason: "octaves must be positive"
            }
        );
    }

    #[test]
    fn rescale_updates_integer_location() {
        let mut p = InterestPoint::new(10, 7, 3.2, 1.0);
        p.x = 10.3;
        p.y = 6.8;
        rescale_to_base(&mut p, 2.0);
        assert!((p.x - 20.6).abs() < 1e-5);
        assert_eq!((p.ix, p.iy), (21, 14));
        assert_eq!(p.scale, 3.2);
    }

    #[test]
    fn octaves_stop_when_image_is_exhausted() {
        let img = OwnedImage::filled(6, 6, 0.5f32).unwrap();
        let config = ScaleSpaceConfig {
            octaves: 8,
            ..ScaleSpaceConfig::default()
        };
        let det = ScaleSpaceDetector::with_config(LogOperator::default(), config);
        let octaves = det.process_octaves(img.view()).unwrap();
        assert!(octaves.len() < 8);
        assert!(octaves.iter().all(|o| o.points.is_empty()));
        assert_eq!(octaves[0].base_scale, 1.0);
    }
}
