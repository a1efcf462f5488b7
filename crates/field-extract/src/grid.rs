//! Cartesian sample grids over an extraction region.

use tracing::info;

use crate::config::RegionSpec;
use crate::error::Result;

/// A regular Cartesian lattice over an extraction region.
///
/// Sample points are ordered by [`SampleGrid::flat_index`]: the z axis
/// varies fastest, then y, then x. Every producer and consumer of the
/// extraction zone's sample buffers must go through that one function.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleGrid {
    region: RegionSpec,
    ni: usize,
    nj: usize,
    nk: usize,
}

impl SampleGrid {
    /// Build the grid for a region: per-axis point counts are
    /// `floor((max - min) / h) + 1`, so a degenerate axis (`min == max`)
    /// still yields one point.
    pub fn build(region: &RegionSpec) -> Result<Self> {
        region.validate()?;
        let ni = axis_count(region.xmin, region.xmax, region.h);
        let nj = axis_count(region.ymin, region.ymax, region.h);
        let nk = axis_count(region.zmin, region.zmax, region.h);
        let grid = Self {
            region: *region,
            ni,
            nj,
            nk,
        };
        info!(i = ni, j = nj, k = nk, points = grid.len(), "sample grid computed");
        Ok(grid)
    }

    /// The region this grid samples.
    pub fn region(&self) -> &RegionSpec {
        &self.region
    }

    /// Per-axis point counts `(i, j, k)`.
    pub fn shape(&self) -> (usize, usize, usize) {
        (self.ni, self.nj, self.nk)
    }

    /// Total number of sample points.
    pub fn len(&self) -> usize {
        self.ni * self.nj * self.nk
    }

    /// Always false: every axis has at least one point.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Linear position of the sample at axis indices `(ii, jj, kk)`.
    ///
    /// z varies fastest, then y, then x.
    pub fn flat_index(&self, ii: usize, jj: usize, kk: usize) -> usize {
        ii * self.nj * self.nk + jj * self.nk + kk
    }

    /// Sample positions along the x axis, endpoints inclusive.
    pub fn x_points(&self) -> Vec<f64> {
        linspace(self.region.xmin, self.region.xmax, self.ni)
    }

    /// Sample positions along the y axis, endpoints inclusive.
    pub fn y_points(&self) -> Vec<f64> {
        linspace(self.region.ymin, self.region.ymax, self.nj)
    }

    /// Sample positions along the z axis, endpoints inclusive.
    pub fn z_points(&self) -> Vec<f64> {
        linspace(self.region.zmin, self.region.zmax, self.nk)
    }

    /// All sample points as `[x, y, z]`, in flat-index order.
    pub fn points(&self) -> Vec<[f64; 3]> {
        let xs = self.x_points();
        let ys = self.y_points();
        let zs = self.z_points();
        let mut points = vec![[0.0f64; 3]; self.len()];
        for (ii, &x) in xs.iter().enumerate() {
            for (jj, &y) in ys.iter().enumerate() {
                for (kk, &z) in zs.iter().enumerate() {
                    points[self.flat_index(ii, jj, kk)] = [x, y, z];
                }
            }
        }
        points
    }

    /// Human-readable zone label embedding the region.
    pub fn zone_name(&self) -> String {
        let r = &self.region;
        format!(
            "EPhiO, xmin {}, xmax {}, ymin {}, ymax {}, zmin {}, zmax {}, h {}",
            r.xmin, r.xmax, r.ymin, r.ymax, r.zmin, r.zmax, r.h
        )
    }
}

fn axis_count(min: f64, max: f64, h: f64) -> usize {
    ((max - min) / h).floor() as usize + 1
}

/// `n` evenly spaced values from `min` to `max` inclusive.
fn linspace(min: f64, max: f64, n: usize) -> Vec<f64> {
    if n == 1 {
        return vec![min];
    }
    let step = (max - min) / (n - 1) as f64;
    (0..n)
        .map(|i| if i == n - 1 { max } else { min + step * i as f64 })
        .collect()
}
