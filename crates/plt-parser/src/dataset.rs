//! In-memory dataset model.
//!
//! A [`Dataset`] holds an ordered list of variable names shared by every
//! zone, plus the zones themselves. Each zone stores one sample array per
//! variable, all of equal length.

use crate::error::{PltError, PltResult};

/// A named collection of zones sharing a single variable list.
#[derive(Debug, Clone)]
pub struct Dataset {
    title: String,
    variables: Vec<String>,
    zones: Vec<Zone>,
}

/// A sub-collection of per-variable sample arrays with a common sample count.
#[derive(Debug, Clone)]
pub struct Zone {
    name: String,
    num_points: usize,
    /// One array per dataset variable, indexed by variable position.
    values: Vec<Vec<f64>>,
}

impl Dataset {
    /// Create an empty dataset with the given title and variable names.
    ///
    /// Variable names must be unique within the dataset.
    pub fn new(title: impl Into<String>, variables: Vec<String>) -> PltResult<Self> {
        for (i, name) in variables.iter().enumerate() {
            if variables[..i].contains(name) {
                return Err(PltError::invalid_format(format!(
                    "duplicate variable name: {name}"
                )));
            }
        }
        Ok(Self {
            title: title.into(),
            variables,
            zones: Vec::new(),
        })
    }

    /// Dataset title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Variable names, in dataset order.
    pub fn variables(&self) -> &[String] {
        &self.variables
    }

    /// Number of variables.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Position of a variable by name.
    pub fn variable_index(&self, name: &str) -> Option<usize> {
        self.variables.iter().position(|v| v == name)
    }

    /// Position of a variable by name, or a `MissingData` error.
    pub fn require_variable(&self, name: &str) -> PltResult<usize> {
        self.variable_index(name)
            .ok_or_else(|| PltError::missing_data(format!("variable {name}")))
    }

    /// Position of a variable, creating it if absent.
    ///
    /// A newly created variable gets a NaN-filled sample array in every
    /// existing zone. This is the assignment-target behavior of a derived
    /// field: create on first write, overwrite on subsequent writes.
    pub fn ensure_variable(&mut self, name: &str) -> usize {
        if let Some(i) = self.variable_index(name) {
            return i;
        }
        self.variables.push(name.to_string());
        for zone in &mut self.zones {
            zone.values.push(vec![f64::NAN; zone.num_points]);
        }
        self.variables.len() - 1
    }

    /// All zones, in creation order.
    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// Mutable access to all zones.
    pub fn zones_mut(&mut self) -> &mut [Zone] {
        &mut self.zones
    }

    /// Number of zones.
    pub fn num_zones(&self) -> usize {
        self.zones.len()
    }

    /// A zone by index.
    pub fn zone(&self, index: usize) -> PltResult<&Zone> {
        self.zones
            .get(index)
            .ok_or_else(|| PltError::missing_data(format!("zone {index}")))
    }

    /// Mutable access to a zone by index.
    pub fn zone_mut(&mut self, index: usize) -> PltResult<&mut Zone> {
        self.zones
            .get_mut(index)
            .ok_or_else(|| PltError::missing_data(format!("zone {index}")))
    }

    /// Append a new ordered zone with NaN-filled arrays for every variable.
    ///
    /// Returns the index of the new zone.
    pub fn add_ordered_zone(&mut self, name: impl Into<String>, num_points: usize) -> usize {
        let values = vec![vec![f64::NAN; num_points]; self.variables.len()];
        self.zones.push(Zone {
            name: name.into(),
            num_points,
            values,
        });
        self.zones.len() - 1
    }

    /// Append a zone with explicit sample arrays, one per variable.
    pub(crate) fn push_zone(
        &mut self,
        name: String,
        num_points: usize,
        values: Vec<Vec<f64>>,
    ) -> PltResult<()> {
        if values.len() != self.variables.len() {
            return Err(PltError::invalid_format(format!(
                "zone '{name}': {} value arrays for {} variables",
                values.len(),
                self.variables.len()
            )));
        }
        for (vi, column) in values.iter().enumerate() {
            if column.len() != num_points {
                return Err(PltError::invalid_format(format!(
                    "zone '{name}': variable {} has {} samples, expected {num_points}",
                    self.variables[vi],
                    column.len()
                )));
            }
        }
        self.zones.push(Zone {
            name,
            num_points,
            values,
        });
        Ok(())
    }
}

impl Zone {
    /// Zone name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Sample count shared by every variable in this zone.
    pub fn num_points(&self) -> usize {
        self.num_points
    }

    /// Sample array of the variable at the given dataset position.
    pub fn values(&self, variable: usize) -> &[f64] {
        &self.values[variable]
    }

    /// Mutable sample array of the variable at the given dataset position.
    pub fn values_mut(&mut self, variable: usize) -> &mut [f64] {
        &mut self.values[variable]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_duplicate_variable_rejected() {
        let result = Dataset::new("t", names(&["X", "Y", "X"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_add_ordered_zone_fills_nan() {
        let mut ds = Dataset::new("t", names(&["X", "B"])).unwrap();
        let zi = ds.add_ordered_zone("new", 4);
        assert_eq!(zi, 0);
        let zone = ds.zone(zi).unwrap();
        assert_eq!(zone.num_points(), 4);
        assert!(zone.values(0).iter().all(|v| v.is_nan()));
        assert!(zone.values(1).iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_ensure_variable_extends_existing_zones() {
        let mut ds = Dataset::new("t", names(&["X"])).unwrap();
        let zi = ds.add_ordered_zone("z", 3);
        ds.zone_mut(zi).unwrap().values_mut(0).copy_from_slice(&[1.0, 2.0, 3.0]);

        let ei = ds.ensure_variable("E");
        assert_eq!(ei, 1);
        assert_eq!(ds.num_variables(), 2);
        assert!(ds.zone(zi).unwrap().values(ei).iter().all(|v| v.is_nan()));

        // Existing variable is returned, not re-created.
        assert_eq!(ds.ensure_variable("X"), 0);
        assert_eq!(ds.num_variables(), 2);
        assert_eq!(ds.zone(zi).unwrap().values(0), &[1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_require_variable() {
        let ds = Dataset::new("t", names(&["X"])).unwrap();
        assert_eq!(ds.require_variable("X").unwrap(), 0);
        assert!(ds.require_variable("missing").is_err());
    }
}
