//! EM-field extraction core.
//!
//! Extracts a regular Cartesian sampling of electromagnetic field
//! quantities from an unstructured simulation dataset and writes it as a
//! point-format text file, plus a variable-by-variable diff of two such
//! datasets.
//!
//! # Pipeline
//!
//! ```text
//! source file
//!      │
//!      ▼
//! read_ascii ──► gse_to_ephio (flip axes, derive E = -1e-6 U x B)
//!      │
//!      ├─► SampleGrid::build(region) ──► extraction zone (coords filled
//!      │                                 in flat-index order, z fastest)
//!      ├─► interpolate_linear(target, source)
//!      │
//!      └─► export X Y Z B E (nine columns, point-major)
//! ```
//!
//! Every step is fail-fast; a failure anywhere leaves no output file.

pub mod config;
pub mod diff;
pub mod error;
pub mod grid;
pub mod pipeline;
pub mod transform;

pub use config::RegionSpec;
pub use diff::{diff_files, DiffEntry, DiffReport};
pub use error::{ExtractError, Result};
pub use grid::SampleGrid;
pub use pipeline::{ExtractionPipeline, ExtractionSummary, EXPORT_VARIABLES};
pub use transform::gse_to_ephio;
