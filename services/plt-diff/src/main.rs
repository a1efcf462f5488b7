//! Dataset diff CLI.
//!
//! Compares every variable between two point-format datasets and reports,
//! per variable, whether any sample differs at all. The comparison is
//! strict: any nonzero difference counts, with no tolerance band.
//!
//! Exits 0 when the comparison ran, whether or not differences were found;
//! exits nonzero when an input fails to load or the schemas mismatch.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use field_extract::diff_files;

#[derive(Parser, Debug)]
#[command(name = "plt-diff")]
#[command(about = "Diff every variable between two point-format datasets")]
struct Args {
    /// First dataset
    a: PathBuf,

    /// Second dataset
    b: PathBuf,

    /// Emit the report as JSON instead of per-variable lines
    #[arg(long)]
    json: bool,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let report = diff_files(&args.a, &args.b)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("dataset variables: {:?}", report.variables);
        for entry in &report.entries {
            println!("{}\t : {}", entry.variable, entry.differs);
        }
    }
    Ok(())
}
