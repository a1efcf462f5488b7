//! The extraction pipeline: load, transform, grid, interpolate, export.

use std::path::{Path, PathBuf};

use tracing::info;

use plt_parser::{interpolate_linear, read_ascii, write_ascii, Dataset};

use crate::config::RegionSpec;
use crate::error::{ExtractError, Result};
use crate::grid::SampleGrid;
use crate::transform::{
    gse_to_ephio, VAR_BX, VAR_BY, VAR_BZ, VAR_EX, VAR_EY, VAR_EZ, VAR_X, VAR_Y, VAR_Z,
};

/// Variables exported to the output file, in column order.
pub const EXPORT_VARIABLES: [&str; 9] = [
    VAR_X, VAR_Y, VAR_Z, VAR_BX, VAR_BY, VAR_BZ, VAR_EX, VAR_EY, VAR_EZ,
];

/// Field variables filled by interpolation; any of them ending up all-NaN
/// means the interpolation step could not resolve the extraction zone.
const INTERPOLATED_FIELDS: [&str; 6] = [VAR_BX, VAR_BY, VAR_BZ, VAR_EX, VAR_EY, VAR_EZ];

/// What an extraction produced.
#[derive(Debug, Clone)]
pub struct ExtractionSummary {
    /// Per-axis point counts `(i, j, k)`.
    pub shape: (usize, usize, usize),
    /// Total sample points in the extraction zone.
    pub num_points: usize,
    /// The written output file.
    pub output: PathBuf,
}

/// Extracts EM fields from a source dataset onto a Cartesian grid.
pub struct ExtractionPipeline {
    region: RegionSpec,
}

impl ExtractionPipeline {
    /// Create a pipeline for a validated region.
    pub fn new(region: RegionSpec) -> Result<Self> {
        region.validate()?;
        Ok(Self { region })
    }

    /// Run the full extraction, writing the point-format output file.
    ///
    /// Every step is fail-fast, and the output is staged through a
    /// temporary file, so no failure leaves a partial output behind.
    pub fn extract(&self, data_path: &Path, output_path: &Path) -> Result<ExtractionSummary> {
        let mut dataset = read_ascii(data_path)
            .map_err(|e| ExtractError::load(data_path.display().to_string(), e))?;
        info!(
            path = %data_path.display(),
            zones = dataset.num_zones(),
            variables = dataset.num_variables(),
            "source dataset loaded"
        );

        gse_to_ephio(&mut dataset)?;
        info!("frame transform applied, E field derived");

        let grid = SampleGrid::build(&self.region)?;
        let target = self.create_extraction_zone(&mut dataset, &grid)?;
        info!(zone = %grid.zone_name(), points = grid.len(), "extraction zone created");

        interpolate_linear(&mut dataset, target, 0, [VAR_X, VAR_Y, VAR_Z])
            .map_err(|e| ExtractError::interpolation(e.to_string()))?;
        for name in INTERPOLATED_FIELDS {
            let vi = require(&dataset, name)?;
            if dataset.zones()[target].values(vi).iter().all(|v| v.is_nan()) {
                return Err(ExtractError::interpolation(format!(
                    "no resolvable samples for {name} in the extraction zone"
                )));
            }
        }
        info!("fields interpolated onto extraction zone");

        self.export(&dataset, target, output_path)?;
        info!(path = %output_path.display(), "extraction saved");

        Ok(ExtractionSummary {
            shape: grid.shape(),
            num_points: grid.len(),
            output: output_path.to_path_buf(),
        })
    }

    /// Create the extraction zone and fill its coordinates in flat-index
    /// order.
    fn create_extraction_zone(&self, dataset: &mut Dataset, grid: &SampleGrid) -> Result<usize> {
        let coord_idx = [
            require(dataset, VAR_X)?,
            require(dataset, VAR_Y)?,
            require(dataset, VAR_Z)?,
        ];
        let target = dataset.add_ordered_zone(grid.zone_name(), grid.len());
        let points = grid.points();
        let zone = &mut dataset.zones_mut()[target];
        for (axis, &vi) in coord_idx.iter().enumerate() {
            let column: Vec<f64> = points.iter().map(|p| p[axis]).collect();
            zone.values_mut(vi).copy_from_slice(&column);
        }
        Ok(target)
    }

    /// Write the fixed nine-variable set from the extraction zone only,
    /// staging through a temporary file in the destination directory.
    fn export(&self, dataset: &Dataset, target: usize, output_path: &Path) -> Result<()> {
        let variables = EXPORT_VARIABLES
            .iter()
            .map(|name| require(dataset, name))
            .collect::<Result<Vec<_>>>()?;

        let dir = match output_path.parent() {
            Some(parent) if parent != Path::new("") => parent,
            _ => Path::new("."),
        };
        let staging = tempfile::NamedTempFile::new_in(dir)
            .map_err(|e| ExtractError::write(output_path.display().to_string(), e))?;
        write_ascii(staging.path(), dataset, &variables, &[target]).map_err(|e| match e {
            plt_parser::PltError::Io(io) => {
                ExtractError::write(output_path.display().to_string(), io)
            }
            other => ExtractError::write(
                output_path.display().to_string(),
                std::io::Error::other(other.to_string()),
            ),
        })?;
        staging
            .persist(output_path)
            .map_err(|e| ExtractError::write(output_path.display().to_string(), e.error))?;
        Ok(())
    }
}

fn require(dataset: &Dataset, name: &str) -> Result<usize> {
    dataset
        .variable_index(name)
        .ok_or_else(|| ExtractError::missing_variable(name))
}
