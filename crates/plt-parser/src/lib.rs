//! Point-format ASCII field datasets.
//!
//! This crate provides the in-memory model and file I/O for whitespace-
//! delimited point-format datasets as produced by solver post-processing
//! tools: a dataset-wide variable list (names carry embedded unit
//! annotations such as `B_x [nT]`), one or more zones of equal-length
//! sample arrays, and point-major text serialization (one row per sample
//! point).
//!
//! # Capabilities
//!
//! - [`Dataset`]/[`Zone`]: mutable model with zone creation
//!   ([`Dataset::add_ordered_zone`]) and derived-variable support
//!   ([`Dataset::ensure_variable`]).
//! - [`read_ascii`]/[`write_ascii`]: the ASCII point-format subset described
//!   in [`ascii`].
//! - [`interpolate_linear`]: populate a target zone's field variables from a
//!   source zone's scattered points.

pub mod ascii;
pub mod dataset;
pub mod error;
pub mod interpolate;

pub use ascii::{parse_ascii, read_ascii, write_ascii};
pub use dataset::{Dataset, Zone};
pub use error::{PltError, PltResult};
pub use interpolate::interpolate_linear;
