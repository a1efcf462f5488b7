//! GSE to EPhiO frame transform and induced electric field.
//!
//! The transform is an ordered list of small in-place mutators, each
//! testable on its own. Order matters: the axis flips are destructive and
//! must run before the electric field derivation, which reads the flipped
//! velocity and magnetic field.

use nalgebra::Vector3;
use tracing::debug;

use plt_parser::Dataset;

use crate::error::{ExtractError, Result};

/// X coordinate, planetary radii.
pub const VAR_X: &str = "X [R]";
/// Y coordinate, planetary radii.
pub const VAR_Y: &str = "Y [R]";
/// Z coordinate, planetary radii.
pub const VAR_Z: &str = "Z [R]";
/// Magnetic field components, nanotesla.
pub const VAR_BX: &str = "B_x [nT]";
pub const VAR_BY: &str = "B_y [nT]";
pub const VAR_BZ: &str = "B_z [nT]";
/// Plasma velocity components, km/s.
pub const VAR_UX: &str = "U_x [km/s]";
pub const VAR_UY: &str = "U_y [km/s]";
pub const VAR_UZ: &str = "U_z [km/s]";
/// Induced electric field components, V/m.
pub const VAR_EX: &str = "E_x [V m-1]";
pub const VAR_EY: &str = "E_y [V m-1]";
pub const VAR_EZ: &str = "E_z [V m-1]";

/// Variables negated by the frame flip, in application order.
const FLIP_VARS: [&str; 6] = [VAR_X, VAR_Y, VAR_BX, VAR_BY, VAR_UX, VAR_UY];

/// Converts a km/s by nT cross product into V/m.
const KMS_NT_TO_V_PER_M: f64 = 1e-6;

/// Apply the full GSE to EPhiO transform to a dataset, in place.
///
/// Negates X, Y, B_x, B_y, U_x, and U_y across every zone, then derives
/// `E = -1e-6 (U x B)` from the flipped fields, creating (or overwriting)
/// the three E components on every zone. All referenced variables are
/// checked up front, so a missing one fails the whole transform before any
/// value changes.
pub fn gse_to_ephio(dataset: &mut Dataset) -> Result<()> {
    for name in FLIP_VARS.iter().chain([VAR_BZ, VAR_UZ].iter()) {
        if dataset.variable_index(name).is_none() {
            return Err(ExtractError::missing_variable(*name));
        }
    }
    for name in FLIP_VARS {
        negate(dataset, name)?;
    }
    derive_induced_efield(dataset)?;
    debug!("GSE to EPhiO transform applied");
    Ok(())
}

/// Negate one variable in place across every zone.
pub fn negate(dataset: &mut Dataset, name: &str) -> Result<()> {
    let vi = dataset
        .variable_index(name)
        .ok_or_else(|| ExtractError::missing_variable(name))?;
    for zone in dataset.zones_mut() {
        for value in zone.values_mut(vi) {
            *value = -*value;
        }
    }
    Ok(())
}

/// Derive `E = -1e-6 (U x B)` on every zone.
///
/// Reads the velocity and magnetic field as stored, so the caller is
/// responsible for flipping them first when deriving in the EPhiO frame.
pub fn derive_induced_efield(dataset: &mut Dataset) -> Result<()> {
    let u_idx = [
        require(dataset, VAR_UX)?,
        require(dataset, VAR_UY)?,
        require(dataset, VAR_UZ)?,
    ];
    let b_idx = [
        require(dataset, VAR_BX)?,
        require(dataset, VAR_BY)?,
        require(dataset, VAR_BZ)?,
    ];
    let e_idx = [
        dataset.ensure_variable(VAR_EX),
        dataset.ensure_variable(VAR_EY),
        dataset.ensure_variable(VAR_EZ),
    ];

    for zone in dataset.zones_mut() {
        let n = zone.num_points();
        let mut ex = vec![0.0f64; n];
        let mut ey = vec![0.0f64; n];
        let mut ez = vec![0.0f64; n];
        for p in 0..n {
            let u = Vector3::new(
                zone.values(u_idx[0])[p],
                zone.values(u_idx[1])[p],
                zone.values(u_idx[2])[p],
            );
            let b = Vector3::new(
                zone.values(b_idx[0])[p],
                zone.values(b_idx[1])[p],
                zone.values(b_idx[2])[p],
            );
            let e = -KMS_NT_TO_V_PER_M * u.cross(&b);
            ex[p] = e.x;
            ey[p] = e.y;
            ez[p] = e.z;
        }
        zone.values_mut(e_idx[0]).copy_from_slice(&ex);
        zone.values_mut(e_idx[1]).copy_from_slice(&ey);
        zone.values_mut(e_idx[2]).copy_from_slice(&ez);
    }
    Ok(())
}

fn require(dataset: &Dataset, name: &str) -> Result<usize> {
    dataset
        .variable_index(name)
        .ok_or_else(|| ExtractError::missing_variable(name))
}
