#![cfg(feature = "rayon")]

use ipdetect::{
    Detector, DetectorConfig, FlatDetector, HarrisOperator, LogOperator, OwnedImage,
    ScaleSpaceConfig, ScaleSpaceDetector,
};

fn make_image(width: usize, height: usize) -> OwnedImage<f32> {
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        for x in 0..width {
            let value = ((x * 11) ^ (y * 3) ^ (x * y)) & 0xFF;
            data.push(value as f32 / 255.0);
        }
    }
    OwnedImage::from_vec(data, width, height).unwrap()
}

#[test]
fn parallel_tiles_match_sequential_tiles() {
    let img = make_image(150, 110);
    let sequential = FlatDetector::new(HarrisOperator::new(1e-4));
    let parallel = FlatDetector::with_config(
        HarrisOperator::new(1e-4),
        DetectorConfig {
            parallel: true,
            ..DetectorConfig::default()
        },
    );

    let seq = sequential.detect(img.view(), 48).unwrap();
    let par = parallel.detect(img.view(), 48).unwrap();
    assert!(!seq.is_empty());
    assert_eq!(seq, par);
}

#[test]
fn parallel_planes_match_sequential_planes() {
    let img = make_image(96, 80);
    let config = ScaleSpaceConfig {
        octaves: 2,
        ..ScaleSpaceConfig::default()
    };
    let sequential = ScaleSpaceDetector::with_config(LogOperator::new(0.01), config);
    let parallel = ScaleSpaceDetector::with_config(
        LogOperator::new(0.01),
        ScaleSpaceConfig {
            parallel: true,
            ..config
        },
    );

    let seq = sequential.process_octaves(img.view()).unwrap();
    let par = parallel.process_octaves(img.view()).unwrap();
    assert_eq!(seq, par);
    assert_eq!(
        sequential.detect(img.view(), 64).unwrap(),
        parallel.detect(img.view(), 64).unwrap()
    );
}
