use clap::Parser;
use ipdetect::detect::debug::{write_interest_images, write_octave_images};
use ipdetect::image::io::load_gray_image;
use ipdetect::{
    Detector, DetectorConfig, FlatDetector, HarrisOperator, InterestOperator, InterestPoint,
    IpResult, LogOperator, ScaleSpaceConfig, ScaleSpaceDetector,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const EXAMPLE_JSON: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/config.example.json"));

#[derive(Parser, Debug)]
#[command(author, version, about = "ipdetect CLI (JSON config driven)")]
struct Cli {
    /// Path to the JSON configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "config.json")]
    config: PathBuf,
    /// Print an example config and exit.
    #[arg(long)]
    print_example: bool,
    /// Enable tracing output for per-stage timings.
    #[arg(long)]
    trace: bool,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
enum DetectorKind {
    Flat,
    ScaleSpace,
}

#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum OperatorConfig {
    Harris {
        threshold: f32,
        /// Harris `k`; absent or negative selects the Noble measure.
        #[serde(default)]
        k: Option<f32>,
    },
    Log {
        threshold: f32,
        #[serde(default)]
        smoothing: Option<f32>,
    },
}

impl Default for OperatorConfig {
    fn default() -> Self {
        OperatorConfig::Harris {
            threshold: HarrisOperator::default().threshold_value(),
            k: None,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct FlatConfigJson {
    max_points: usize,
    parallel: bool,
    drop_unlocalized: bool,
}

impl Default for FlatConfigJson {
    fn default() -> Self {
        let cfg = DetectorConfig::default();
        Self {
            max_points: cfg.max_points,
            parallel: cfg.parallel,
            drop_unlocalized: cfg.drop_unlocalized,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct ScaleSpaceConfigJson {
    octaves: usize,
    scales: usize,
    init_sigma: f32,
    source_sigma: f32,
    max_points: usize,
    parallel: bool,
    drop_unlocalized: bool,
}

impl Default for ScaleSpaceConfigJson {
    fn default() -> Self {
        let cfg = ScaleSpaceConfig::default();
        Self {
            octaves: cfg.octaves,
            scales: cfg.scales,
            init_sigma: cfg.init_sigma,
            source_sigma: cfg.source_sigma,
            max_points: cfg.max_points,
            parallel: cfg.parallel,
            drop_unlocalized: cfg.drop_unlocalized,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct Config {
    image_path: String,
    output_path: Option<String>,
    debug_dir: Option<String>,
    detector: DetectorKind,
    max_tile_dim: usize,
    operator: OperatorConfig,
    flat: FlatConfigJson,
    scale_space: ScaleSpaceConfigJson,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_path: String::new(),
            output_path: None,
            debug_dir: None,
            detector: DetectorKind::ScaleSpace,
            max_tile_dim: 0,
            operator: OperatorConfig::default(),
            flat: FlatConfigJson::default(),
            scale_space: ScaleSpaceConfigJson::default(),
        }
    }
}

#[derive(Debug, Serialize)]
struct PointRecord {
    x: f32,
    y: f32,
    scale: f32,
    orientation: Option<f32>,
    interest: f32,
}

impl From<InterestPoint> for PointRecord {
    fn from(value: InterestPoint) -> Self {
        Self {
            x: value.x,
            y: value.y,
            scale: value.scale,
            orientation: value.orientation,
            interest: value.interest.value(),
        }
    }
}

#[derive(Debug, Serialize)]
struct Output {
    count: usize,
    points: Vec<PointRecord>,
}

fn run<O: InterestOperator>(
    op: O,
    config: &Config,
    image: &ipdetect::OwnedImage<f32>,
) -> IpResult<Vec<InterestPoint>> {
    let view = image.view();
    match config.detector {
        DetectorKind::Flat => {
            let detector = FlatDetector::with_config(
                op,
                DetectorConfig {
                    max_points: config.flat.max_points,
                    parallel: config.flat.parallel,
                    drop_unlocalized: config.flat.drop_unlocalized,
                },
            );
            if let Some(dir) = &config.debug_dir {
                write_interest_images(Path::new(dir), &detector.evaluate(view))?;
            }
            detector.detect(view, config.max_tile_dim)
        }
        DetectorKind::ScaleSpace => {
            let ss = &config.scale_space;
            let detector = ScaleSpaceDetector::with_config(
                op,
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
            if let Some(dir) = &config.debug_dir {
                let octave = detector.build_octave(view)?;
                write_octave_images(Path::new(dir), &detector.evaluate_octave(&octave))?;
            }
            detector.detect(view, config.max_tile_dim)
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.trace {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env().add_directive("ipdetect=info".parse()?))
            .with_target(false)
            .init();
    }

    if cli.print_example {
        println!("{EXAMPLE_JSON}");
        return Ok(());
    }

    let config_text = fs::read_to_string(&cli.config)?;
    let config: Config = serde_json::from_str(&config_text)?;
    if config.image_path.is_empty() {
        return Err("image_path must be set in the config".into());
    }

    let image = load_gray_image(&config.image_path)?;
    let points = match config.operator {
        OperatorConfig::Harris { threshold, k } => {
            let op = match k {
                Some(k) => HarrisOperator::from_k(threshold, k),
                None => HarrisOperator::new(threshold),
            };
            run(op, &config, &image)?
        }
        OperatorConfig::Log {
            threshold,
            smoothing,
        } => {
            let op = match smoothing {
                Some(sigma) => LogOperator::new(threshold).with_smoothing(sigma),
                None => LogOperator::new(threshold),
            };
            run(op, &config, &image)?
        }
    };
    tracing::info!(points = points.len(), image = %config.image_path, "detection finished");

    let output = Output {
        count: points.len(),
        points: points.into_iter().map(PointRecord::from).collect(),
    };
    let json = serde_json::to_string_pretty(&output)?;

    match config.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }

    Ok(())
}
