//! A single hindered-rotor calculation, holding both its inputs and its
//! results.
//!
//! A [`System`] is built from a [`SystemConfig`], which can be written by hand
//! with chained setters or loaded from TOML:
//! ```
//! use qrotor::system::{ System, SystemConfig };
//!
//! let config = SystemConfig::from_toml_str(r#"
//!     group = "methyl"
//!     energy_levels = 3
//!     gridsize = 1000
//!     potential_name = "zero"
//! "#).unwrap();
//! let mut system = System::new(config).unwrap();
//! system.solve().unwrap();
//! assert_eq!(system.get_eigenvalues().len(), 3);
//! ```

use std::{ f64::consts::TAU, time::{ Duration, Instant } };
use ndarray as nd;
use serde::{ Deserialize, Serialize };
use tracing::{ debug, info, instrument };
use crate::{
    error::{ LengthError, PeriodicError, RResult, RotorError },
    group::Group,
    interp::{ resample, uniform_grid },
    potential::{ correct_offset, Potential },
    solve::{ self, Method },
    systems::ideal_energy,
    units::InertiaTable,
};

/// Version of this crate, recorded in every [`System`].
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Inputs for a [`System`].
///
/// Missing fields in a TOML document take their [default][Self::default]
/// values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    /// Free-form label.
    pub comment: String,
    /// Chemical group name or alias; see [`Group::normalize`].
    pub group: String,
    /// Number of eigenstates to compute.
    pub energy_levels: usize,
    /// Shift the potential so that its minimum is zero before solving.
    pub correct_potential_offset: bool,
    /// Retain eigenvectors after solving.
    pub keep_eigenvectors: bool,
    /// Number of grid points over [0, 2π).
    pub gridsize: Option<usize>,
    /// Override for the rotational constant B, in meV.
    pub rotational_inertia: Option<f64>,
    /// Analytic potential model; empty for externally supplied values.
    pub potential_name: String,
    /// Constants passed to the potential model.
    pub potential_constants: Vec<f64>,
    /// Eigensolver strategy.
    pub method: Method,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            comment: String::new(),
            group: Group::CH3.to_string(),
            energy_levels: 15,
            correct_potential_offset: true,
            keep_eigenvectors: true,
            gridsize: Some(200_000),
            rotational_inertia: None,
            potential_name: String::new(),
            potential_constants: Vec::new(),
            method: Method::default(),
        }
    }
}

impl SystemConfig {
    pub fn new() -> Self { Self::default() }

    /// Parse from a TOML document.
    pub fn from_toml_str(s: &str) -> RResult<Self> {
        Ok(toml::from_str(s)?)
    }

    pub fn comment<S: Into<String>>(mut self, comment: S) -> Self {
        self.comment = comment.into();
        self
    }
    pub fn group<S: Into<String>>(mut self, group: S) -> Self {
        self.group = group.into();
        self
    }
    pub fn energy_levels(mut self, k: usize) -> Self {
        self.energy_levels = k;
        self
    }
    pub fn correct_potential_offset(mut self, correct: bool) -> Self {
        self.correct_potential_offset = correct;
        self
    }
    pub fn keep_eigenvectors(mut self, keep: bool) -> Self {
        self.keep_eigenvectors = keep;
        self
    }
    pub fn gridsize(mut self, n: usize) -> Self {
        self.gridsize = Some(n);
        self
    }
    pub fn rotational_inertia(mut self, B: f64) -> Self {
        self.rotational_inertia = Some(B);
        self
    }
    pub fn potential<S: Into<String>>(mut self, name: S, constants: &[f64]) -> Self {
        self.potential_name = name.into();
        self.potential_constants = constants.to_vec();
        self
    }
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }
}

/// Resolve a group name and optional override into a canonical group and its
/// rotational constant.
fn resolve_group(name: &str, B: Option<f64>) -> RResult<(Group, f64)> {
    let group = Group::normalize(name);
    let B = match B.or_else(|| InertiaTable::default().get(&group)) {
        Some(b) => b,
        None => {
            return Err(RotorError::config(format!(
                "unrecognized group '{}' requires an explicit rotational inertia",
                group,
            )));
        },
    };
    RotorError::check_inertia(B)?;
    Ok((group, B))
}

fn check_gridsize(n: usize) -> RResult<()> {
    PeriodicError::check(n).map_err(|e| RotorError::config(e.to_string()))
}

// true if `grid` is the canonical uniform grid of its own length
fn is_uniform(grid: &nd::Array1<f64>) -> bool {
    let n = grid.len();
    let tol = 1e-9 * TAU;
    n >= 3
        && grid.iter().enumerate()
            .all(|(k, xk)| (xk - TAU * k as f64 / n as f64).abs() <= tol)
}

/// Quantum system.
///
/// Contains all the data for a single calculation. Results are only ever
/// written by [`Self::solve`] and friends, and only when they succeed.
#[derive(Clone, Debug)]
pub struct System {
    version: String,
    comment: String,
    group: Group,
    B: f64,
    energy_levels: usize,
    correct_potential_offset: bool,
    keep_eigenvectors: bool,
    method: Method,
    gridsize: Option<usize>,
    grid: nd::Array1<f64>,
    potential: Potential,
    potential_name: String,
    potential_constants: Vec<f64>,
    potential_values: nd::Array1<f64>,
    potential_offset: Option<f64>,
    potential_min: Option<f64>,
    potential_max: Option<f64>,
    eigenvalues: Vec<f64>,
    eigenvectors: Vec<nd::Array1<f64>>,
    energy_barrier: Option<f64>,
    transitions: Vec<f64>,
    runtime: Option<Duration>,
    eigenvalues_B: Vec<f64>,
    potential_max_B: Option<f64>,
}

impl System {
    /// Validate a configuration and create a new, unsolved `System`.
    ///
    /// The grid is not generated until [`Self::set_grid`] or [`Self::solve`]
    /// is called.
    pub fn new(config: SystemConfig) -> RResult<Self> {
        if config.energy_levels == 0 {
            return Err(RotorError::config("at least one energy level must be requested"));
        }
        if let Some(n) = config.gridsize { check_gridsize(n)?; }
        let (group, B) = resolve_group(&config.group, config.rotational_inertia)?;
        let potential
            = Potential::from_name(&config.potential_name, &config.potential_constants)?;
        Ok(Self {
            version: VERSION.to_string(),
            comment: config.comment,
            group,
            B,
            energy_levels: config.energy_levels,
            correct_potential_offset: config.correct_potential_offset,
            keep_eigenvectors: config.keep_eigenvectors,
            method: config.method,
            gridsize: config.gridsize,
            grid: nd::Array1::zeros(0),
            potential,
            potential_name: config.potential_name,
            potential_constants: config.potential_constants,
            potential_values: nd::Array1::zeros(0),
            potential_offset: None,
            potential_min: None,
            potential_max: None,
            eigenvalues: Vec::new(),
            eigenvectors: Vec::new(),
            energy_barrier: None,
            transitions: Vec::new(),
            runtime: None,
            eigenvalues_B: Vec::new(),
            potential_max_B: None,
        })
    }

    /// Create a new `System` from externally loaded grid and potential
    /// arrays.
    ///
    /// The grid need not be uniform, and may include the endpoint 2π; it is
    /// resampled onto a uniform grid of the configured `gridsize` before
    /// solving. Note that [`SystemConfig::default`] sets `gridsize` to
    /// 200 000; to keep the native sampling, set `gridsize` to `None` (or to
    /// the array length), in which case the length of the arrays is used.
    pub fn from_arrays(
        config: SystemConfig,
        grid: nd::Array1<f64>,
        values: nd::Array1<f64>,
    ) -> RResult<Self>
    {
        LengthError::check(&grid, &values)?;
        let gridsize = config.gridsize.unwrap_or(grid.len());
        check_gridsize(gridsize)?;
        let mut system = Self::new(config)?;
        system.gridsize = Some(gridsize);
        system.grid = grid;
        system.potential_values = values;
        Ok(system)
    }

    /// Normalize and set the chemical group, updating the rotational constant
    /// from the inertia table unless an override `B` is given.
    ///
    /// Groups outside the table require an override.
    pub fn set_group(&mut self, group: &str, B: Option<f64>) -> RResult<&mut Self> {
        let (group, B) = resolve_group(group, B)?;
        self.group = group;
        self.B = B;
        Ok(self)
    }

    /// Set the number of energy levels computed by the next solve.
    pub fn set_energy_levels(&mut self, k: usize) -> RResult<&mut Self> {
        if k == 0 {
            return Err(RotorError::config("at least one energy level must be requested"));
        }
        self.energy_levels = k;
        Ok(self)
    }

    /// Set the free-form comment.
    pub fn set_comment<S: Into<String>>(&mut self, comment: S) -> &mut Self {
        self.comment = comment.into();
        self
    }

    // compute the grid and potential values for `n` points without touching
    // `self`
    fn regrid(&self, n: usize) -> RResult<(nd::Array1<f64>, nd::Array1<f64>)> {
        check_gridsize(n)?;
        if self.grid.len() == n && is_uniform(&self.grid) {
            return Ok((self.grid.clone(), self.potential_values.clone()));
        }
        if !self.grid.is_empty() && !self.potential_values.is_empty() {
            debug!(from = self.grid.len(), to = n, "resampling potential");
            Ok(resample(&self.grid, &self.potential_values, n)?)
        } else {
            Ok((uniform_grid(n), self.potential_values.clone()))
        }
    }

    /// Set the grid to `gridsize` uniform points over [0, 2π), falling back to
    /// the stored grid size if `None`.
    ///
    /// Existing potential values are carried over by periodic spline
    /// interpolation. Nothing is done if the grid is already uniform with the
    /// requested size.
    pub fn set_grid(&mut self, gridsize: Option<usize>) -> RResult<&mut Self> {
        let n = gridsize.or(self.gridsize)
            .ok_or_else(|| RotorError::config(
                "a grid size must be provided if none is stored"))?;
        let (grid, values) = self.regrid(n)?;
        self.gridsize = Some(n);
        self.grid = grid;
        self.potential_values = values;
        Ok(self)
    }

    /// Solve for the lowest [`energy_levels`][Self::get_energy_levels]
    /// eigenstates.
    ///
    /// The grid is generated (or resampled) to the stored grid size, and
    /// analytic potentials are evaluated on it. On failure, `self` is left as
    /// it was.
    #[instrument(skip_all, fields(group = %self.group, gridsize = ?self.gridsize))]
    pub fn solve(&mut self) -> RResult<&mut Self> {
        let n = self.gridsize
            .ok_or_else(|| RotorError::config("no grid size has been set"))?;
        RotorError::check_levels(self.energy_levels, n)?;
        let (grid, mut V) = self.regrid(n)?;
        if let Some(sampled) = self.potential.sample(&grid) {
            V = sampled;
        } else if V.is_empty() {
            return Err(RotorError::config(format!(
                "potential '{}' has no analytic form and no values were supplied",
                self.potential_name,
            )));
        }
        LengthError::check(&grid, &V)?;

        let stats = correct_offset(&mut V, self.correct_potential_offset)
            .ok_or_else(|| RotorError::config("potential array is empty"))?;
        let potential_offset
            = if self.potential.is_external() {
                // values stored by a previous solve were already shifted
                stats.offset.map(|o| o + self.potential_offset.unwrap_or(0.0))
            } else {
                stats.offset
            };
        debug!(offset = ?potential_offset, min = stats.min, max = stats.max, "potential ready");

        let dx = TAU / n as f64;
        let t0 = Instant::now();
        let sols = solve::solve(
            dx, &V, self.B, self.energy_levels, &self.method, self.keep_eigenvectors)?;
        let runtime = t0.elapsed();

        let eigenvalues: Vec<f64> = sols.iter().map(|s| s.e).collect();
        let eigenvectors: Vec<nd::Array1<f64>>
            = sols.into_iter().filter_map(|s| s.wf).collect();
        let e0 = eigenvalues[0];
        info!(
            levels = eigenvalues.len(),
            ground = e0,
            runtime = runtime.as_secs_f64(),
            "solved"
        );

        self.grid = grid;
        self.potential_values = V;
        self.potential_offset = potential_offset;
        self.potential_min = Some(stats.min);
        self.potential_max = Some(stats.max);
        self.energy_barrier = Some(stats.max - e0);
        self.transitions = eigenvalues.iter().skip(1).map(|e| e - e0).collect();
        self.eigenvalues_B = eigenvalues.iter().map(|e| e / self.B).collect();
        self.potential_max_B = Some(stats.max / self.B);
        self.eigenvalues = eigenvalues;
        self.eigenvectors = eigenvectors;
        self.runtime = Some(runtime);
        Ok(self)
    }

    /// Set the grid size and solve, committing neither unless both succeed.
    pub fn solve_at(&mut self, gridsize: usize) -> RResult<&mut Self> {
        let mut new = self.clone();
        new.set_grid(Some(gridsize))?;
        new.solve()?;
        *self = new;
        Ok(self)
    }

    /// Discard the grid, potential values, and eigenvectors.
    ///
    /// Eigenvalues and all derived scalars are kept.
    pub fn reduce_size(&mut self) -> &mut Self {
        self.grid = nd::Array1::zeros(0);
        self.potential_values = nd::Array1::zeros(0);
        self.eigenvectors = Vec::new();
        self
    }

    /// Return `B · ideal_energy(level)`, the free-rotor energy of a level.
    pub fn ideal_eigenvalue(&self, level: usize) -> f64 {
        self.B * ideal_energy(level) as f64
    }

    /// Flatten scalar results into a [`Summary`].
    pub fn summary(&self) -> Summary {
        Summary {
            version: self.version.clone(),
            comment: self.comment.clone(),
            group: self.group.to_string(),
            gridsize: self.gridsize,
            B: self.B,
            potential_name: self.potential_name.clone(),
            potential_constants: self.potential_constants.clone(),
            potential_offset: self.potential_offset,
            potential_min: self.potential_min,
            potential_max: self.potential_max,
            eigenvalues: self.eigenvalues.clone(),
            energy_barrier: self.energy_barrier,
            transitions: self.transitions.clone(),
            runtime: self.runtime.map(|t| t.as_secs_f64()),
        }
    }

    /// Get the crate version that produced this system.
    pub fn get_version(&self) -> &str { &self.version }

    /// Get the comment.
    pub fn get_comment(&self) -> &str { &self.comment }

    /// Get the chemical group.
    pub fn get_group(&self) -> &Group { &self.group }

    /// Get the rotational constant B, in meV.
    pub fn get_B(&self) -> f64 { self.B }

    /// Get the number of energy levels computed by the next solve.
    pub fn get_energy_levels(&self) -> usize { self.energy_levels }

    /// Get the stored grid size.
    pub fn get_gridsize(&self) -> Option<usize> { self.gridsize }

    /// Get the solver method.
    pub fn get_method(&self) -> &Method { &self.method }

    /// Get a reference to the grid array (empty if unset or reduced).
    pub fn get_grid(&self) -> &nd::Array1<f64> { &self.grid }

    /// Get the potential model.
    pub fn get_potential(&self) -> &Potential { &self.potential }

    /// Get a reference to the potential array (empty if unset or reduced).
    pub fn get_potential_values(&self) -> &nd::Array1<f64> {
        &self.potential_values
    }

    /// Get the amount subtracted from the potential, if corrected.
    pub fn get_potential_offset(&self) -> Option<f64> { self.potential_offset }

    /// Get the minimum of the potential after correction.
    pub fn get_potential_min(&self) -> Option<f64> { self.potential_min }

    /// Get the maximum of the potential after correction.
    pub fn get_potential_max(&self) -> Option<f64> { self.potential_max }

    /// Get the eigenvalues in ascending order (empty if unsolved).
    pub fn get_eigenvalues(&self) -> &[f64] { &self.eigenvalues }

    /// Get the eigenvectors (empty if unsolved, not kept, or reduced).
    pub fn get_eigenvectors(&self) -> &[nd::Array1<f64>] { &self.eigenvectors }

    /// Get `max(V) - min(eigenvalues)`.
    pub fn get_energy_barrier(&self) -> Option<f64> { self.energy_barrier }

    /// Get `eigenvalues[i + 1] - eigenvalues[0]`.
    pub fn get_transitions(&self) -> &[f64] { &self.transitions }

    /// Get the wall-clock time of the last eigensolve.
    pub fn get_runtime(&self) -> Option<Duration> { self.runtime }

    /// Get the eigenvalues in units of B.
    pub fn get_eigenvalues_B(&self) -> &[f64] { &self.eigenvalues_B }

    /// Get the potential maximum in units of B.
    pub fn get_potential_max_B(&self) -> Option<f64> { self.potential_max_B }

    /// Return `true` if eigenvalues have been computed.
    pub fn is_solved(&self) -> bool { !self.eigenvalues.is_empty() }
}

/// Flat record of a [`System`]'s scalar results.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub version: String,
    pub comment: String,
    pub group: String,
    pub gridsize: Option<usize>,
    pub B: f64,
    pub potential_name: String,
    pub potential_constants: Vec<f64>,
    pub potential_offset: Option<f64>,
    pub potential_min: Option<f64>,
    pub potential_max: Option<f64>,
    pub eigenvalues: Vec<f64>,
    pub energy_barrier: Option<f64>,
    pub transitions: Vec<f64>,
    /// Seconds.
    pub runtime: Option<f64>,
}

impl Summary {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> RResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize from JSON.
    pub fn from_json(s: &str) -> RResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn free(n: usize, k: usize) -> System {
        let config = SystemConfig::new()
            .potential("zero", &[])
            .rotational_inertia(1.0)
            .energy_levels(k)
            .gridsize(n);
        System::new(config).unwrap()
    }

    #[test]
    fn config_defaults() {
        let config = SystemConfig::default();
        assert_eq!(config.group, "CH3");
        assert_eq!(config.energy_levels, 15);
        assert_eq!(config.gridsize, Some(200_000));
        assert!(config.correct_potential_offset && config.keep_eigenvectors);
        assert!(config.method.is_bisection());
        assert_eq!(SystemConfig::from_toml_str("").unwrap(), config);
    }

    #[test]
    fn toml_config() {
        let config = SystemConfig::from_toml_str(r#"
            comment = "test"
            group = "deuterated amine"
            energy_levels = 4
            gridsize = 500
            potential_name = "cosine"
            potential_constants = [10.0, 3.0]

            [method]
            kind = "dense"
        "#).unwrap();
        assert_eq!(config.energy_levels, 4);
        assert!(config.method.is_dense());
        let system = System::new(config).unwrap();
        assert_eq!(system.get_group(), &Group::ND3);
        assert!(matches!(
            SystemConfig::from_toml_str("energy_levels = \"many\""),
            Err(RotorError::Config(_)),
        ));
    }

    #[test]
    fn unknown_group_needs_override() {
        let config = SystemConfig::new().group("SiH3");
        assert!(matches!(System::new(config.clone()), Err(RotorError::InvalidConfiguration(_))));
        let system = System::new(config.rotational_inertia(0.3)).unwrap();
        assert_eq!(system.get_group(), &Group::Other("SiH3".to_string()));
        assert_eq!(system.get_B(), 0.3);
    }

    #[test]
    fn set_grid_is_idempotent() {
        let mut system = free(100, 3);
        assert!(system.get_grid().is_empty());
        system.set_grid(Some(120)).unwrap();
        let first = system.get_grid().clone();
        system.set_grid(Some(120)).unwrap();
        assert_eq!(system.get_grid(), &first);
        assert_eq!(system.get_gridsize(), Some(120));
        assert!(matches!(system.set_grid(Some(2)), Err(RotorError::InvalidConfiguration(_))));
        assert_eq!(system.get_gridsize(), Some(120));
    }

    #[test]
    fn missing_gridsize() {
        let mut config = SystemConfig::new().potential("zero", &[]).energy_levels(2);
        config.gridsize = None;
        let mut system = System::new(config).unwrap();
        assert!(matches!(system.set_grid(None), Err(RotorError::InvalidConfiguration(_))));
        assert!(system.get_grid().is_empty());
        assert!(matches!(system.solve(), Err(RotorError::InvalidConfiguration(_))));
        assert!(system.get_grid().is_empty());
        assert!(!system.is_solved());
        // an explicit size is then stored
        system.set_grid(Some(40)).unwrap();
        assert_eq!(system.get_gridsize(), Some(40));
        system.set_grid(None).unwrap();
        assert_eq!(system.get_grid().len(), 40);
    }

    #[test]
    fn set_grid_keeps_potential_values() {
        let potential = |x: f64| 2.0 + (3.0 * x).cos() + 0.5 * (x - 0.2).sin();
        let n = 90;

        // uniform input: both calls are no-ops
        let grid = uniform_grid(n);
        let values = grid.mapv(potential);
        let config = SystemConfig::new().energy_levels(2).gridsize(n);
        let mut system = System::from_arrays(config.clone(), grid.clone(), values.clone()).unwrap();
        system.set_grid(Some(n)).unwrap();
        assert_eq!(system.get_grid(), &grid);
        assert_eq!(system.get_potential_values(), &values);
        let first = system.get_potential_values().clone();
        system.set_grid(Some(n)).unwrap();
        assert_eq!(system.get_potential_values(), &first);
        assert_eq!(system.get_grid(), &grid);

        // shifted input of the same length: resampled once, then stable
        let shifted = grid.mapv(|x| x + 0.5 * TAU / n as f64);
        let shifted_values = shifted.mapv(potential);
        let mut system = System::from_arrays(config, shifted.clone(), shifted_values.clone()).unwrap();
        system.set_grid(Some(n)).unwrap();
        assert_eq!(system.get_grid(), &grid);
        assert_ne!(system.get_potential_values(), &shifted_values);
        system.get_potential_values().iter().zip(&grid)
            .for_each(|(v, x)| assert_abs_diff_eq!(*v, potential(*x), epsilon = 1e-4));
        let resampled = system.get_potential_values().clone();
        system.set_grid(Some(n)).unwrap();
        assert_eq!(system.get_potential_values(), &resampled);
    }

    #[test]
    fn from_arrays_native_sampling() {
        let grid = uniform_grid(75);
        let values = grid.mapv(|x| (3.0 * x).sin());
        let mut config = SystemConfig::new().energy_levels(2);
        config.gridsize = None;
        let system = System::from_arrays(config, grid.clone(), values.clone()).unwrap();
        assert_eq!(system.get_gridsize(), Some(75));
        let system = System::from_arrays(SystemConfig::new(), grid, values).unwrap();
        assert_eq!(system.get_gridsize(), Some(200_000));
    }

    #[test]
    fn solve_fills_derived_values() {
        let config = SystemConfig::new()
            .potential("cosine", &[20.0, 3.0])
            .energy_levels(4)
            .gridsize(600);
        let mut system = System::new(config).unwrap();
        system.solve().unwrap();
        let ev = system.get_eigenvalues().to_vec();
        assert_eq!(ev.len(), 4);
        assert_eq!(system.get_eigenvectors().len(), 4);
        assert_eq!(system.get_potential_offset(), Some(0.0));
        assert_abs_diff_eq!(system.get_potential_max().unwrap(), 20.0, epsilon = 1e-3);
        assert_abs_diff_eq!(
            system.get_energy_barrier().unwrap(),
            system.get_potential_max().unwrap() - ev[0],
        );
        assert_eq!(system.get_transitions().len(), 3);
        assert_abs_diff_eq!(system.get_transitions()[2], ev[3] - ev[0]);
        assert_abs_diff_eq!(system.get_eigenvalues_B()[1], ev[1] / system.get_B());
        assert!(system.get_runtime().is_some());
    }

    #[test]
    fn external_values_keep_cumulative_offset() {
        let grid = uniform_grid(300);
        let values = grid.mapv(|x| 5.0 + 3.0 * (1.0 - (3.0 * x).cos()));
        let config = SystemConfig::new().energy_levels(2).gridsize(300);
        let mut system = System::from_arrays(config, grid, values).unwrap();
        system.solve().unwrap();
        assert_abs_diff_eq!(system.get_potential_offset().unwrap(), 5.0, epsilon = 1e-9);
        let first = system.get_eigenvalues().to_vec();
        system.solve().unwrap();
        assert_abs_diff_eq!(system.get_potential_offset().unwrap(), 5.0, epsilon = 1e-9);
        assert_abs_diff_eq!(system.get_eigenvalues()[0], first[0], epsilon = 1e-12);
    }

    #[test]
    fn missing_external_values() {
        let config = SystemConfig::new().energy_levels(2).gridsize(50);
        let mut system = System::new(config).unwrap();
        assert!(matches!(system.solve(), Err(RotorError::InvalidConfiguration(_))));
        assert!(!system.is_solved());
    }

    #[test]
    fn solve_at_is_transactional() {
        let mut system = free(50, 3);
        system.solve().unwrap();
        let before = system.get_eigenvalues().to_vec();
        assert!(matches!(
            system.solve_at(2),
            Err(RotorError::InvalidConfiguration(_)),
        ));
        assert_eq!(system.get_eigenvalues(), before.as_slice());
        assert_eq!(system.get_gridsize(), Some(50));
        system.solve_at(80).unwrap();
        assert_eq!(system.get_gridsize(), Some(80));
        assert_eq!(system.get_grid().len(), 80);
    }

    #[test]
    fn summary_round_trip() {
        let mut system = free(64, 3);
        system.set_comment("free rotor");
        system.solve().unwrap();
        let summary = system.summary();
        assert_eq!(summary.group, "CH3");
        assert_eq!(summary.version, VERSION);
        let json = summary.to_json().unwrap();
        assert!(json.contains("\"B\": 1.0"));
        assert_eq!(Summary::from_json(&json).unwrap(), summary);
    }
}
