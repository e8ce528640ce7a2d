//! Batch operations over ordered collections of [`System`]s.
//!
//! Outputs are parallel to the input order, with `None` wherever a system has
//! not been populated with the requested data.

use std::{ any::Any, time::Duration };
use crate::{
    error::{ RResult, RotorError },
    group::Group,
    system::System,
};

/// Coerce a heterogeneous collection into a list of [`System`]s, failing at
/// the first element of any other type.
pub fn as_list(items: Vec<Box<dyn Any>>) -> RResult<Vec<System>> {
    items.into_iter().enumerate()
        .map(|(index, item)| {
            item.downcast::<System>()
                .map(|system| *system)
                .map_err(|_| RotorError::TypeMismatch { index })
        })
        .collect()
}

/// Get the eigenvalues of every system.
pub fn get_energies(systems: &[System]) -> Vec<Option<&[f64]>> {
    systems.iter()
        .map(|s| s.is_solved().then(|| s.get_eigenvalues()))
        .collect()
}

/// Get the grid size of every system.
pub fn get_gridsizes(systems: &[System]) -> Vec<Option<usize>> {
    systems.iter().map(|s| s.get_gridsize()).collect()
}

/// Get the runtime of every system.
pub fn get_runtimes(systems: &[System]) -> Vec<Option<Duration>> {
    systems.iter().map(|s| s.get_runtime()).collect()
}

/// Get the distinct groups present, in order of first appearance.
pub fn get_groups(systems: &[System]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    for s in systems.iter() {
        if !groups.contains(s.get_group()) { groups.push(s.get_group().clone()); }
    }
    groups
}

/// Sort by grid size, keeping the relative order of equal sizes. Systems with
/// no grid size come first.
pub fn sort_by_gridsize(systems: &mut [System]) {
    systems.sort_by_key(|s| s.get_gridsize());
}

/// Call [`System::reduce_size`] on every system.
pub fn reduce_size(systems: &mut [System]) {
    systems.iter_mut().for_each(|s| { s.reduce_size(); });
}

/// Energy of the free-rotor level with (zero-based) index `level`, in units of
/// B.
///
/// Levels above the ground state come in degenerate pairs `±m`, so this is
/// `⌈level / 2⌉²`: 0, 1, 1, 4, 4, 9, 9, ...
pub fn ideal_energy(level: usize) -> u64 {
    let m = level.div_ceil(2) as u64;
    m * m
}

/// Absolute deviation `|Eᵢ - B ⋅ ideal_energy(i)|` of every computed level of
/// every system from the free-rotor spectrum.
///
/// Only meaningful for systems solved with the zero potential.
pub fn convergence_errors(systems: &[System]) -> Vec<Option<Vec<f64>>> {
    systems.iter()
        .map(|s| {
            s.is_solved().then(|| {
                s.get_eigenvalues().iter().enumerate()
                    .map(|(i, e)| (e - s.ideal_eigenvalue(i)).abs())
                    .collect()
            })
        })
        .collect()
}
