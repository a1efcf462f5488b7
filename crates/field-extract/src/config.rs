//! Extraction region configuration.
//!
//! The region is an explicit, validated value passed into the pipeline:
//! six axis-aligned bounds in planetary radii plus a uniform grid spacing.
//! Validation happens here, at the boundary, so an invalid region is
//! rejected before any dataset I/O starts.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ExtractError, Result};

/// An axis-aligned extraction region with uniform grid spacing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegionSpec {
    pub xmin: f64,
    pub xmax: f64,
    pub ymin: f64,
    pub ymax: f64,
    pub zmin: f64,
    pub zmax: f64,
    /// Grid spacing in planetary radii.
    pub h: f64,
}

impl Default for RegionSpec {
    /// The standard dayside-to-magnetotail extraction box.
    fn default() -> Self {
        Self {
            xmin: -5.0,
            xmax: 15.0,
            ymin: -5.0,
            ymax: 5.0,
            zmin: -15.0,
            zmax: 15.0,
            h: 1.0,
        }
    }
}

impl RegionSpec {
    /// Create a validated region.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        xmin: f64,
        xmax: f64,
        ymin: f64,
        ymax: f64,
        zmin: f64,
        zmax: f64,
        h: f64,
    ) -> Result<Self> {
        let spec = Self {
            xmin,
            xmax,
            ymin,
            ymax,
            zmin,
            zmax,
            h,
        };
        spec.validate()?;
        Ok(spec)
    }

    /// Load a region from a YAML file.
    pub fn from_yaml(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            ExtractError::config(format!("cannot read region file {}: {e}", path.display()))
        })?;
        let spec: Self = serde_yaml::from_str(&text).map_err(|e| {
            ExtractError::config(format!("cannot parse region file {}: {e}", path.display()))
        })?;
        spec.validate()?;
        Ok(spec)
    }

    /// Validate bounds and spacing.
    pub fn validate(&self) -> Result<()> {
        let values = [
            self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax, self.h,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(ExtractError::invalid_grid_spec(
                "bounds and spacing must be finite".to_string(),
            ));
        }
        if self.h <= 0.0 {
            return Err(ExtractError::invalid_grid_spec(format!(
                "spacing must be positive, got h = {}",
                self.h
            )));
        }
        for (axis, min, max) in [
            ("x", self.xmin, self.xmax),
            ("y", self.ymin, self.ymax),
            ("z", self.zmin, self.zmax),
        ] {
            if min > max {
                return Err(ExtractError::invalid_grid_spec(format!(
                    "{axis}min {min} exceeds {axis}max {max}"
                )));
            }
        }
        Ok(())
    }

    /// Derive the output path for a source data file, embedding the region
    /// in the file name:
    /// `<stem>_x_{xmin}_{xmax}_y_{ymin}_{ymax}_z_{zmin}_{zmax}_h_{h}.dat`.
    pub fn output_name(&self, data_path: &Path) -> PathBuf {
        let stem = data_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "extract".to_string());
        let name = format!(
            "{stem}_x_{}_{}_y_{}_{}_z_{}_{}_h_{}.dat",
            self.xmin, self.xmax, self.ymin, self.ymax, self.zmin, self.zmax, self.h
        );
        match data_path.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        }
    }
}
