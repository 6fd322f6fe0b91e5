//! Checks that the example CLI configuration stays in sync with the library
//! defaults.

use ipdetect::{
    Detector, DetectorConfig, HarrisOperator, OwnedImage, ScaleSpaceConfig, ScaleSpaceDetector,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Deserialize;

const EXAMPLE_JSON: &str = include_str!("../ipdetect-cli/config.example.json");

#[derive(Debug, Deserialize)]
struct FlatSection {
    max_points: usize,
    parallel: bool,
    drop_unlocalized: bool,
}

#[derive(Debug, Deserialize)]
struct ScaleSpaceSection {
    octaves: usize,
    scales: usize,
    init_sigma: f32,
    source_sigma: f32,
    max_points: usize,
    parallel: bool,
    drop_unlocalized: bool,
}

#[derive(Debug, Deserialize)]
struct OperatorSection {
    kind: String,
    threshold: f32,
    k: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct ExampleConfig {
    image_path: String,
    detector: String,
    max_tile_dim: usize,
    operator: OperatorSection,
    flat: FlatSection,
    scale_space: ScaleSpaceSection,
}

#[test]
fn example_config_uses_library_defaults() {
    let cfg: ExampleConfig = serde_json::from_str(EXAMPLE_JSON).expect("example parses");
    assert!(!cfg.image_path.is_empty());
    assert_eq!(cfg.detector, "scale_space");
    assert_eq!(cfg.max_tile_dim, 0);

    assert_eq!(cfg.operator.kind, "harris");
    assert_eq!(cfg.operator.threshold, HarrisOperator::default().threshold_value());
    assert!(cfg.operator.k.is_none());

    let flat = DetectorConfig::default();
    assert_eq!(cfg.flat.max_points, flat.max_points);
    assert_eq!(cfg.flat.parallel, flat.parallel);
    assert_eq!(cfg.flat.drop_unlocalized, flat.drop_unlocalized);

    let ss = ScaleSpaceConfig::default();
    assert_eq!(cfg.scale_space.octaves, ss.octaves);
    assert_eq!(cfg.scale_space.scales, ss.scales);
    assert_eq!(cfg.scale_space.init_sigma, ss.init_sigma);
    assert_eq!(cfg.scale_space.source_sigma, ss.source_sigma);
    assert_eq!(cfg.scale_space.max_points, ss.max_points);
    assert_eq!(cfg.scale_space.parallel, ss.parallel);
    assert_eq!(cfg.scale_space.drop_unlocalized, ss.drop_unlocalized);
}

#[test]
fn example_config_detects_corners() {
    let cfg: ExampleConfig = serde_json::from_str(EXAMPLE_JSON).expect("example parses");
    let ss = &cfg.scale_space;
    let det = ScaleSpaceDetector::with_config(
        HarrisOperator::new(cfg.operator.threshold),
        ScaleSpaceConfig {
            octaves: ss.octaves,
            scales: ss.scales,
            init_sigma: ss.init_sigma,
            source_sigma: ss.source_sigma,
            max_points: ss.max_points,
            parallel: ss.parallel,
            drop_unlocalized: ss.drop_unlocalized,
        },
    );

    let mut rng = StdRng::seed_from_u64(3);
    let mut img = OwnedImage::filled(128, 128, 0.0f32).unwrap();
    for _ in 0..16 {
        let (w, h) = (rng.random_range(8..=32usize), rng.random_range(8..=32usize));
        let (x0, y0) = (rng.random_range(0..=128 - w), rng.random_range(0..=128 - h));
        let value = rng.random::<f32>();
        for y in y0..y0 + h {
            for x in x0..x0 + w {
                img.set(x, y, value);
            }
        }
    }
    let points = det.detect(img.view(), cfg.max_tile_dim).unwrap();
    assert!(!points.is_empty());
}
