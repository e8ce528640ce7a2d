#![allow(non_upper_case_globals)]

//! Physical constants and the per-group rotational constant *B*.
//!
//! Concrete physical constants are taken from NIST. All energies handed to the
//! rest of the crate are in meV.

use std::f64::consts::PI;
use crate::group::Group;

/// Planck constant (kg m^2 s^-1)
pub const h: f64 = 6.62607015e-34;
//             +/- 0 (exact)

/// reduced Planck constant (kg m^2 s^-1)
pub const hbar: f64 = h / 2.0 / PI;
//                +/- 0 (exact)

/// elementary charge (C)
pub const e: f64 = 1.602176634e-19;
//             +/- 0 (exact)

/// unified atomic mass unit (kg)
pub const mu: f64 = 1.66053906660e-27;
//              +/- 0.00000000050e-27

/// one milli-electronvolt (J)
pub const meV: f64 = e * 1e-3;
//               +/- 0 (exact)

/// one ångström (m)
pub const angstrom: f64 = 1e-10;

/// ¹H atomic mass (u)
pub const m_H: f64 = 1.00782503223;
//               +/- 0.00000000009

/// ²H atomic mass (u)
pub const m_D: f64 = 2.01410177812;
//               +/- 0.00000000012

/// Geometry of an XH₃ rotor: three identical atoms bonded to a central atom
/// lying on the rotation axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RotorGeometry {
    /// Mass of each rotating atom (u).
    pub mass: f64,
    /// Bond length between the central and rotating atoms (Å).
    pub bond_length: f64,
    /// Angle between two bonds, e.g. H–C–H (degrees).
    pub bond_angle: f64,
}

impl RotorGeometry {
    /// Methyl geometry with a tetrahedral H–C–H angle.
    pub const fn methyl(mass: f64) -> Self {
        Self { mass, bond_length: 1.09, bond_angle: 109.47 }
    }

    /// Ammonium-like amine geometry.
    pub const fn amine(mass: f64) -> Self {
        Self { mass, bond_length: 1.012, bond_angle: 106.7 }
    }

    /// Distance of each rotating atom from the rotation axis (m).
    ///
    /// For three bonds spaced evenly about the axis with pairwise angle α,
    /// each bond makes an angle β with the axis where
    /// ```text
    /// sin β = (2 / √3) sin(α / 2)
    /// ```
    pub fn axis_distance(&self) -> f64 {
        let half = (self.bond_angle / 2.0).to_radians();
        let sin_beta = 2.0 / 3.0_f64.sqrt() * half.sin();
        self.bond_length * angstrom * sin_beta
    }

    /// Moment of inertia about the rotation axis (kg m^2).
    pub fn moment_of_inertia(&self) -> f64 {
        3.0 * self.mass * mu * self.axis_distance().powi(2)
    }

    /// Rotational constant B = ħ² / 2I (meV).
    pub fn rotational_constant(&self) -> f64 {
        hbar.powi(2) / 2.0 / self.moment_of_inertia() / meV
    }
}

/// Lookup table of rotational constants (meV) keyed by canonical
/// [`Group`].
///
/// The [`Default`] table derives each entry from [`RotorGeometry`]; custom
/// tables can be built field-by-field.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct InertiaTable {
    pub ch3: f64,
    pub cd3: f64,
    pub nh3: f64,
    pub nd3: f64,
}

impl Default for InertiaTable {
    fn default() -> Self {
        Self {
            ch3: RotorGeometry::methyl(m_H).rotational_constant(),
            cd3: RotorGeometry::methyl(m_D).rotational_constant(),
            nh3: RotorGeometry::amine(m_H).rotational_constant(),
            nd3: RotorGeometry::amine(m_D).rotational_constant(),
        }
    }
}

impl InertiaTable {
    /// Get the rotational constant for a group, returning `None` for
    /// unrecognized groups.
    pub fn get(&self, group: &Group) -> Option<f64> {
        match group {
            Group::CH3 => Some(self.ch3),
            Group::CD3 => Some(self.cd3),
            Group::NH3 => Some(self.nh3),
            Group::ND3 => Some(self.nd3),
            Group::Other(_) => None,
        }
    }
}
