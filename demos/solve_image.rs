//! Equation Solving Example
//!
//! Solves photographed hand-written expressions with the heuristic
//! classifier, or a label string typed on the command line.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example solve_image -- [OPTIONS] [IMAGES]...
//! ```
//!
//! # Arguments
//!
//! * `-c, --config` - JSON pipeline configuration (optional)
//! * `-l, --labels` - Solve this label string instead of images, e.g. `"3x2--12"`
//! * `-d, --dump-dir` - Directory to save the mask, overlay and glyph bitmaps
//! * `<IMAGES>...` - Paths to input images
//!
//! # Example
//!
//! ```bash
//! RUST_LOG=info cargo run --example solve_image -- -d /tmp/glyphs equation.jpg
//! cargo run --example solve_image -- --labels "x2-4--0"
//! ```

use clap::Parser;
use eqn_ocr::domain::Label;
use eqn_ocr::pipeline::{EquationPipeline, PipelineArtifacts, PipelineConfig};
use eqn_ocr::prelude::HeuristicClassifier;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Command-line arguments for the equation solving example
#[derive(Parser)]
#[command(name = "solve_image")]
#[command(about = "Equation Solving Example - reads and solves hand-written expressions")]
struct Args {
    /// Paths to input images
    images: Vec<PathBuf>,

    /// JSON pipeline configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Solve a label string instead of images
    #[arg(short, long)]
    labels: Option<String>,

    /// Directory to save intermediate images
    #[arg(short, long)]
    dump_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    eqn_ocr::utils::init_tracing();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => PipelineConfig::from_json_file(path)?,
        None => PipelineConfig::default(),
    };
    config.collect_artifacts |= args.dump_dir.is_some();

    let pipeline = EquationPipeline::with_config(HeuristicClassifier::new(), config)?;

    if let Some(text) = &args.labels {
        let labels = Label::parse_sequence(text)?;
        let (expression, result) = pipeline.solve_labels(&labels)?;
        println!("{expression} => {result}");
        return Ok(());
    }

    if args.images.is_empty() {
        return Err("Provide at least one image or --labels".into());
    }

    let mut failures = 0usize;
    for (index, path) in args.images.iter().enumerate() {
        match pipeline.run_path(path) {
            Ok(output) => {
                println!(
                    "{}: {} => {}",
                    path.display(),
                    output.expression,
                    output.result
                );
                if let (Some(dir), Some(artifacts)) = (&args.dump_dir, &output.artifacts) {
                    let target = dir.join(format!("image_{index:03}"));
                    dump_artifacts(&target, artifacts)?;
                    info!("Saved intermediate images to {}", target.display());
                }
            }
            Err(err) if err.is_nothing_to_solve() => {
                println!("{}: nothing to solve ({err})", path.display());
            }
            Err(err) => {
                failures += 1;
                error!(
                    "{} failed during {} ({:?}): {}",
                    path.display(),
                    err.stage(),
                    err.kind(),
                    err
                );
            }
        }
    }

    if failures > 0 {
        return Err(format!("{failures} of {} images failed", args.images.len()).into());
    }
    Ok(())
}

fn dump_artifacts(dir: &Path, artifacts: &PipelineArtifacts) -> Result<(), Box<dyn std::error::Error>> {
    std::fs::create_dir_all(dir)?;
    artifacts.gray.save(dir.join("gray.png"))?;
    artifacts.mask.to_document_image().save(dir.join("mask.png"))?;
    artifacts.overlay.save(dir.join("overlay.png"))?;
    for glyph in &artifacts.glyphs {
        glyph
            .bitmap
            .as_image()
            .save(dir.join(format!("glyph_{:02}.png", glyph.ordinal)))?;
    }
    Ok(())
}
