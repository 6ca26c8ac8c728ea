//! Leaf Disease Classification Example
//!
//! Classifies tomato leaf images and prints one JSON response per image, in
//! the same shape an HTTP endpoint would return.
//!
//! Usage:
//! ```
//! cargo run --example classify -- --model-path <path_to_model> <image_paths>...
//! ```
//!
//! Settings can also come from a JSON config file and `LEAFSCAN_*`
//! environment variables:
//! ```
//! cargo run --example classify -- --config service.json <image_paths>...
//! ```

use clap::Parser;
use leafscan::core::init_tracing;
use leafscan::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// Command-line arguments for the leaf disease classification example
#[derive(Parser)]
#[command(name = "classify")]
#[command(about = "Leaf Disease Classification Example - diagnoses tomato leaf images")]
struct Args {
    /// Path to a JSON service configuration
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Path to the model file (overrides the config)
    #[arg(short, long)]
    model_path: Option<PathBuf>,

    /// Confidence floor for listed predictions (overrides the config)
    #[arg(long)]
    floor: Option<f32>,

    /// Print indented JSON
    #[arg(long)]
    pretty: bool,

    /// Print the knowledge base entry for a class label (e.g. "Late Blight") and exit
    #[arg(long)]
    describe: Option<String>,

    /// Print the model's evaluation metrics and exit
    #[arg(long)]
    metrics: bool,

    /// Image file paths to process
    images: Vec<PathBuf>,
}

fn build_config(args: &Args) -> Result<ServiceConfig, Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => ServiceConfig::from_json_file(path)?,
        None => ServiceConfig::default(),
    }
    .apply_env_overrides()?;

    if let Some(path) = &args.model_path {
        config.model.primary = path.clone();
    }
    if let Some(floor) = args.floor {
        config.confidence_floor = floor;
    }
    Ok(config)
}

fn print_json(value: &impl serde::Serialize, pretty: bool) -> Result<(), Box<dyn std::error::Error>> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for logging
    init_tracing();

    let args = Args::parse();

    if let Some(name) = &args.describe {
        let label: ClassLabel = name.parse()?;
        return print_json(leafscan::domain::knowledge::lookup(label), args.pretty);
    }

    if args.metrics {
        let per_class: Vec<_> = leafscan::domain::metrics::all().collect();
        return print_json(
            &serde_json::json!({
                "overall": leafscan::domain::metrics::OVERALL,
                "per_class": per_class,
            }),
            args.pretty,
        );
    }

    if args.images.is_empty() {
        error!("No image paths given");
        return Err("No image paths given".into());
    }

    let config = build_config(&args)?;
    let service = DiagnosisService::new(&config)?;
    if !service.is_ready() {
        warn!("Model is not loaded; every image will report an error");
    }

    for (i, image_path) in args.images.iter().enumerate() {
        info!(
            "Processing image {} of {}: {}",
            i + 1,
            args.images.len(),
            image_path.display()
        );

        let response = match load_image(Path::new(image_path)) {
            Ok(image) => service.predict_response(&image),
            Err(e) => {
                error!("Failed to load {}: {}", image_path.display(), e);
                PredictResponse::failure(&e)
            }
        };
        print_json(&response, args.pretty)?;
    }

    Ok(())
}
