//! Scattered-data interpolation between zones.
//!
//! Populates a target zone's field variables from a source zone's samples.
//! Source points are bucketed into a uniform spatial bin index; each target
//! point gathers its nearest neighbors by expanding bin shells and blends
//! them with inverse-distance weights. A target point that lands exactly on
//! a source point takes that point's values unchanged. NaN source samples
//! propagate into the blended result, so a gap in the source data stays a
//! gap in the target.

use tracing::debug;

use crate::dataset::Dataset;
use crate::error::{PltError, PltResult};

/// Neighbor count blended per target point.
const NEIGHBORS: usize = 8;

/// Squared distance below which a target point is treated as coincident
/// with a source point.
const EXACT_HIT_DIST2: f64 = 1e-20;

/// Linearly interpolate every non-coordinate variable of `target` from the
/// scattered points of `source`.
///
/// `coords` names the coordinate triple present in both zones; the target
/// zone's coordinate arrays must already be populated. Fails if the source
/// zone has no points or a coordinate variable is missing.
pub fn interpolate_linear(
    dataset: &mut Dataset,
    target: usize,
    source: usize,
    coords: [&str; 3],
) -> PltResult<()> {
    if target == source {
        return Err(PltError::invalid_format(
            "interpolation target and source zones must differ".to_string(),
        ));
    }
    let ci = [
        dataset.require_variable(coords[0])?,
        dataset.require_variable(coords[1])?,
        dataset.require_variable(coords[2])?,
    ];
    let fill_vars: Vec<usize> = (0..dataset.num_variables())
        .filter(|vi| !ci.contains(vi))
        .collect();

    let (src_points, src_columns) = {
        let zone = dataset.zone(source)?;
        if zone.num_points() == 0 {
            return Err(PltError::interpolation(format!(
                "source zone '{}' has no points",
                zone.name()
            )));
        }
        let points = gather_points(zone.values(ci[0]), zone.values(ci[1]), zone.values(ci[2]));
        let columns: Vec<Vec<f64>> = fill_vars.iter().map(|&vi| zone.values(vi).to_vec()).collect();
        (points, columns)
    };
    let target_points = {
        let zone = dataset.zone(target)?;
        gather_points(zone.values(ci[0]), zone.values(ci[1]), zone.values(ci[2]))
    };

    let index = BinIndex::build(&src_points);
    let mut output: Vec<Vec<f64>> = vec![vec![f64::NAN; target_points.len()]; fill_vars.len()];

    for (p, &point) in target_points.iter().enumerate() {
        let neighbors = index.nearest(&src_points, point, NEIGHBORS);
        if neighbors[0].1 <= EXACT_HIT_DIST2 {
            let hit = neighbors[0].0;
            for (col, values) in src_columns.iter().enumerate() {
                output[col][p] = values[hit];
            }
            continue;
        }
        let total_weight: f64 = neighbors.iter().map(|&(_, d2)| 1.0 / d2).sum();
        for (col, values) in src_columns.iter().enumerate() {
            let blended: f64 = neighbors
                .iter()
                .map(|&(si, d2)| values[si] / d2)
                .sum::<f64>()
                / total_weight;
            output[col][p] = blended;
        }
    }

    let zone = dataset.zone_mut(target)?;
    for (col, &vi) in fill_vars.iter().enumerate() {
        zone.values_mut(vi).copy_from_slice(&output[col]);
    }
    debug!(
        target,
        source,
        points = target_points.len(),
        variables = fill_vars.len(),
        "zone interpolated"
    );
    Ok(())
}

fn gather_points(x: &[f64], y: &[f64], z: &[f64]) -> Vec<[f64; 3]> {
    (0..x.len()).map(|p| [x[p], y[p], z[p]]).collect()
}

fn dist2(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    dx * dx + dy * dy + dz * dz
}

/// Uniform spatial bins over the source point cloud.
struct BinIndex {
    min: [f64; 3],
    cell: [f64; 3],
    dims: [usize; 3],
    bins: Vec<Vec<usize>>,
}

impl BinIndex {
    fn build(points: &[[f64; 3]]) -> Self {
        let mut min = [f64::INFINITY; 3];
        let mut max = [f64::NEG_INFINITY; 3];
        for p in points {
            for a in 0..3 {
                if p[a] < min[a] {
                    min[a] = p[a];
                }
                if p[a] > max[a] {
                    max[a] = p[a];
                }
            }
        }
        for a in 0..3 {
            if !min[a].is_finite() || !max[a].is_finite() {
                min[a] = 0.0;
                max[a] = 0.0;
            }
        }

        // Aim for a couple of points per bin on average.
        let per_axis = ((points.len() as f64 / 2.0).cbrt().ceil() as usize).clamp(1, 64);
        let mut dims = [1usize; 3];
        let mut cell = [1.0f64; 3];
        for a in 0..3 {
            let extent = max[a] - min[a];
            if extent > 0.0 {
                dims[a] = per_axis;
                cell[a] = extent / per_axis as f64;
            }
        }

        let mut index = Self {
            min,
            cell,
            dims,
            bins: vec![Vec::new(); dims[0] * dims[1] * dims[2]],
        };
        for (i, &p) in points.iter().enumerate() {
            let b = index.bin_of(p);
            let flat = index.flat_bin(b);
            index.bins[flat].push(i);
        }
        index
    }

    fn bin_of(&self, p: [f64; 3]) -> [usize; 3] {
        let mut b = [0usize; 3];
        for a in 0..3 {
            let f = (p[a] - self.min[a]) / self.cell[a];
            let i = if f.is_finite() { f.floor() as isize } else { 0 };
            b[a] = i.clamp(0, self.dims[a] as isize - 1) as usize;
        }
        b
    }

    fn flat_bin(&self, b: [usize; 3]) -> usize {
        (b[0] * self.dims[1] + b[1]) * self.dims[2] + b[2]
    }

    /// The `k` nearest source points to `query`, sorted by squared distance.
    ///
    /// Expands bin shells outward from the query's bin; once enough
    /// candidates are found, one further shell is scanned so near points in
    /// adjacent bins are not missed.
    fn nearest(&self, points: &[[f64; 3]], query: [f64; 3], k: usize) -> Vec<(usize, f64)> {
        let needed = k.min(points.len());
        let center = self.bin_of(query);
        let max_r = self.dims.iter().map(|&d| d as isize).max().unwrap_or(1);

        let mut candidates: Vec<usize> = Vec::new();
        let mut shells_after_fill = 0;
        let mut r: isize = 0;
        while r <= max_r {
            self.collect_shell(center, r, &mut candidates);
            if candidates.len() >= needed {
                shells_after_fill += 1;
                if shells_after_fill == 2 {
                    break;
                }
            }
            r += 1;
        }

        let mut with_dist: Vec<(usize, f64)> = candidates
            .into_iter()
            .map(|i| (i, dist2(points[i], query)))
            .collect();
        with_dist.sort_by(|a, b| a.1.total_cmp(&b.1));
        with_dist.truncate(needed);
        with_dist
    }

    /// Append the contents of every bin at Chebyshev distance `r` from `center`.
    fn collect_shell(&self, center: [usize; 3], r: isize, out: &mut Vec<usize>) {
        let c = [center[0] as isize, center[1] as isize, center[2] as isize];
        for dx in -r..=r {
            for dy in -r..=r {
                for dz in -r..=r {
                    if dx.abs().max(dy.abs()).max(dz.abs()) != r {
                        continue;
                    }
                    let b = [c[0] + dx, c[1] + dy, c[2] + dz];
                    if b.iter()
                        .zip(self.dims.iter())
                        .any(|(&v, &d)| v < 0 || v >= d as isize)
                    {
                        continue;
                    }
                    let flat = self.flat_bin([b[0] as usize, b[1] as usize, b[2] as usize]);
                    out.extend_from_slice(&self.bins[flat]);
                }
            }
        }
    }
}
