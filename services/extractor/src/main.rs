//! EM-field extraction CLI.
//!
//! Loads a point-format simulation dataset, applies the GSE to EPhiO
//! frame transform, samples the requested region onto a Cartesian grid,
//! and writes the interpolated fields as whitespace-delimited text.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use field_extract::{ExtractionPipeline, RegionSpec};

#[derive(Parser, Debug)]
#[command(name = "fields-extract")]
#[command(about = "Extract EM fields from simulation data onto a Cartesian grid")]
struct Args {
    /// Source dataset (point-format ASCII)
    data: PathBuf,

    /// Region specification YAML file (overrides the built-in defaults)
    #[arg(long)]
    region: Option<PathBuf>,

    /// Region bound overrides, in planetary radii
    #[arg(long)]
    xmin: Option<f64>,
    #[arg(long)]
    xmax: Option<f64>,
    #[arg(long)]
    ymin: Option<f64>,
    #[arg(long)]
    ymax: Option<f64>,
    #[arg(long)]
    zmin: Option<f64>,
    #[arg(long)]
    zmax: Option<f64>,

    /// Grid spacing in planetary radii
    #[arg(long)]
    spacing: Option<f64>,

    /// Output path (derived from the data path and region when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    /// Merge defaults, the optional region file, and explicit flag
    /// overrides into one region, validated as a whole.
    fn region_spec(&self) -> Result<RegionSpec> {
        let mut region = match &self.region {
            Some(path) => RegionSpec::from_yaml(path)?,
            None => RegionSpec::default(),
        };
        if let Some(v) = self.xmin {
            region.xmin = v;
        }
        if let Some(v) = self.xmax {
            region.xmax = v;
        }
        if let Some(v) = self.ymin {
            region.ymin = v;
        }
        if let Some(v) = self.ymax {
            region.ymax = v;
        }
        if let Some(v) = self.zmin {
            region.zmin = v;
        }
        if let Some(v) = self.zmax {
            region.zmax = v;
        }
        if let Some(v) = self.spacing {
            region.h = v;
        }
        region.validate()?;
        Ok(region)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let region = args.region_spec()?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| region.output_name(&args.data));
    info!(data = %args.data.display(), output = %output.display(), "starting extraction");

    let pipeline = ExtractionPipeline::new(region)?;
    let summary = pipeline.extract(&args.data, &output)?;

    info!(
        i = summary.shape.0,
        j = summary.shape.1,
        k = summary.shape.2,
        points = summary.num_points,
        output = %summary.output.display(),
        "extraction complete"
    );
    Ok(())
}
