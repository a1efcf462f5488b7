//! Variable-by-variable comparison of two point-format datasets.

use std::path::Path;

use serde::Serialize;
use tracing::info;

use plt_parser::{read_ascii, Dataset};

use crate::error::{ExtractError, Result};

/// Comparison result for one variable.
#[derive(Debug, Clone, Serialize)]
pub struct DiffEntry {
    /// Variable name, units included.
    pub variable: String,
    /// True iff any sample pair differs at all. Strict: the maximum
    /// absolute difference must exceed zero, with no tolerance band, and a
    /// NaN on either side counts as a difference.
    pub differs: bool,
    /// Maximum absolute pointwise difference (NaN when a sample pair
    /// involved a NaN).
    pub max_abs_diff: f64,
}

/// Comparison result for a dataset pair, in native variable order.
#[derive(Debug, Clone, Serialize)]
pub struct DiffReport {
    /// The shared variable list.
    pub variables: Vec<String>,
    /// One entry per variable.
    pub entries: Vec<DiffEntry>,
}

impl DiffReport {
    /// True iff any variable differs.
    pub fn any_differs(&self) -> bool {
        self.entries.iter().any(|e| e.differs)
    }
}

/// Load two datasets and compare every variable of their first zones.
///
/// The inputs must share a schema: identical variable lists (same order)
/// and equal sample counts. Neither input is mutated.
pub fn diff_files(path_a: &Path, path_b: &Path) -> Result<DiffReport> {
    let a = read_ascii(path_a).map_err(|e| ExtractError::load(path_a.display().to_string(), e))?;
    let b = read_ascii(path_b).map_err(|e| ExtractError::load(path_b.display().to_string(), e))?;
    info!(a = %path_a.display(), b = %path_b.display(), "datasets loaded");

    check_schema(&a, &b, path_a, path_b)?;

    let zone_a = &a.zones()[0];
    let zone_b = &b.zones()[0];
    let entries = a
        .variables()
        .iter()
        .enumerate()
        .map(|(vi, name)| {
            let mut max_abs = 0.0f64;
            let mut saw_nan = false;
            for (&x, &y) in zone_a.values(vi).iter().zip(zone_b.values(vi)) {
                let d = (x - y).abs();
                if d.is_nan() {
                    saw_nan = true;
                } else if d > max_abs {
                    max_abs = d;
                }
            }
            DiffEntry {
                variable: name.clone(),
                differs: saw_nan || max_abs > 0.0,
                max_abs_diff: if saw_nan { f64::NAN } else { max_abs },
            }
        })
        .collect();

    Ok(DiffReport {
        variables: a.variables().to_vec(),
        entries,
    })
}

/// Verify the two datasets are comparable, naming the offenders otherwise.
fn check_schema(a: &Dataset, b: &Dataset, path_a: &Path, path_b: &Path) -> Result<()> {
    if a.variables() != b.variables() {
        let only_a: Vec<&String> = a
            .variables()
            .iter()
            .filter(|v| !b.variables().contains(v))
            .collect();
        let only_b: Vec<&String> = b
            .variables()
            .iter()
            .filter(|v| !a.variables().contains(v))
            .collect();
        let detail = if only_a.is_empty() && only_b.is_empty() {
            format!(
                "variable order differs: {:?} vs {:?}",
                a.variables(),
                b.variables()
            )
        } else {
            format!(
                "variables only in {}: {only_a:?}; only in {}: {only_b:?}",
                path_a.display(),
                path_b.display()
            )
        };
        return Err(ExtractError::schema_mismatch(detail));
    }

    for (ds, path) in [(a, path_a), (b, path_b)] {
        if ds.num_zones() == 0 {
            return Err(ExtractError::schema_mismatch(format!(
                "{} has no zones to compare",
                path.display()
            )));
        }
    }

    let na = a.zones()[0].num_points();
    let nb = b.zones()[0].num_points();
    if na != nb {
        return Err(ExtractError::schema_mismatch(format!(
            "sample counts differ: {} has {na} points, {} has {nb}",
            path_a.display(),
            path_b.display()
        )));
    }
    Ok(())
}
