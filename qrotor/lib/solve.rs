//! Functions to compute the lowest eigenstates of the time-independent
//! Schrödinger equation for a planar rigid rotor in a periodic potential,
//! ```text
//! -B ψ''(θ) + V(θ) ψ(θ) = E ψ(θ),    ψ(θ + 2π) = ψ(θ)
//! ```
//! discretized with a second-order finite-difference stencil on a uniform
//! angular grid. The resulting Hamiltonian is a symmetric [`Cyclic`] matrix.

use std::cmp;
use ndarray as nd;
use ndarray_linalg::{ self as la, EighInto, EigValshInto };
use serde::{ Deserialize, Serialize };
use tracing::{ debug, instrument, warn };
use crate::{
    Arr1,
    cyclic::Cyclic,
    error::{ RResult, RotorError },
    utils::{ fix_sign, wf_renormalize, wf_normalized },
    DEF_EPSILON,
    DEF_INVITERS,
    DEF_MAXITERS,
};

/// A single solution to the TISE.
///
/// This struct is usually only returned by a solver function; you probably
/// won't ever instantiate it yourself. The wavefunction is allowed to be
/// missing in the case that `compute_wf = false` is passed to a solver
/// function.
#[derive(Clone, Debug)]
pub struct Solution {
    /// Energy
    pub e: f64,
    /// Wavefunction
    pub wf: Option<nd::Array1<f64>>,
}

impl Solution {
    /// Compare two `Solution`s by their energy.
    pub fn cmp_energy(&self, other: &Self) -> Option<cmp::Ordering> {
        self.e.partial_cmp(&other.e)
    }
}

/// Build the discretized Hamiltonian `H = -B D₂ + diag(V)`.
///
/// `D₂` is the periodic three-point second-difference operator, so every row
/// has diagonal `V[i] + 2 B / dx²` and couplings `-B / dx²` to both neighbors,
/// including the wrap-around pair `(0, n - 1)`.
pub fn hamiltonian<S>(dx: f64, V: &Arr1<S>, B: f64) -> RResult<Cyclic>
where S: nd::Data<Elem = f64>
{
    RotorError::check_inertia(B)?;
    if !(dx.is_finite() && dx > 0.0) {
        return Err(RotorError::config(format!(
            "grid spacing must be positive and finite; got {}", dx)));
    }
    let t = B / dx.powi(2);
    let diag: nd::Array1<f64> = V.mapv(|vk| vk + 2.0 * t);
    let off: nd::Array1<f64> = nd::Array1::from_elem(V.len(), -t);
    Ok(Cyclic::new(&diag, &off)?)
}

/// Compute the lowest `k` states by full diagonalization of the dense
/// Hamiltonian.
///
/// Memory scales as `n²`, so this is only practical for grids of a few
/// thousand points.
#[instrument(level = "debug", skip_all, fields(n = V.len(), k = k))]
pub fn solve_dense<S>(dx: f64, V: &Arr1<S>, B: f64, k: usize, compute_wf: bool)
    -> RResult<Vec<Solution>>
where S: nd::Data<Elem = f64>
{
    let H = hamiltonian(dx, V, B)?;
    RotorError::check_levels(k, H.len())?;
    if compute_wf {
        let (evals, evecs): (nd::Array1<f64>, nd::Array2<f64>)
            = H.to_dense().eigh_into(la::UPLO::Lower)?;
        let sols: Vec<Solution>
            = evals.into_iter().zip(evecs.columns())
            .take(k)
            .map(|(e, v)| {
                let mut wf = wf_normalized(&v, dx);
                fix_sign(&mut wf);
                Solution { e, wf: Some(wf) }
            })
            .collect();
        Ok(sols)
    } else {
        let evals: nd::Array1<f64>
            = H.to_dense().eigvalsh_into(la::UPLO::Lower)?;
        let sols: Vec<Solution>
            = evals.into_iter()
            .take(k)
            .map(|e| Solution { e, wf: None })
            .collect();
        Ok(sols)
    }
}

#[derive(Copy, Clone, Debug)]
struct Bounds(f64, f64);

impl Bounds {
    fn midpoint(self) -> f64 { (self.0 + self.1) / 2.0 }

    fn diff(self) -> f64 { self.1 - self.0 }

    fn scale(self) -> f64 { self.0.abs().max(self.1.abs()).max(1.0) }
}

/// Locate the `j`-th smallest eigenvalue (zero-based) by bisection on the
/// eigenvalue count, starting from a bracket whose lower end has at most `j`
/// eigenvalues below it.
///
/// Returns the converged bracket and whether `maxiters` was exhausted.
fn bisect_level(
    H: &Cyclic,
    j: usize,
    mut bounds: Bounds,
    pivmin: f64,
    epsilon: f64,
    maxiters: usize,
) -> (Bounds, bool)
{
    let mut mid: f64;
    for _ in 0..maxiters {
        if bounds.diff() <= epsilon * bounds.scale() { return (bounds, false); }
        mid = bounds.midpoint();
        if mid <= bounds.0 || mid >= bounds.1 { return (bounds, false); }
        if H.count_below(mid, pivmin) > j {
            bounds.1 = mid;
        } else {
            bounds.0 = mid;
        }
    }
    let converged = bounds.diff() <= epsilon * bounds.scale();
    (bounds, !converged)
}

// deterministic, roughly unstructured starting vector for inverse iteration
fn start_vector(n: usize, seed: usize) -> nd::Array1<f64> {
    const PHI: f64 = 0.618_033_988_749_894_9;
    (0..n)
        .map(|i| ((i + 1) as f64 * PHI + seed as f64 * PHI.sqrt()).fract() - 0.5)
        .collect()
}

// remove components along each accepted vector; all vectors have unit
// Euclidean norm
fn orthogonalize(v: &mut nd::Array1<f64>, basis: &[nd::Array1<f64>]) {
    for _ in 0..2 {
        for b in basis.iter() {
            let proj = v.dot(b);
            v.scaled_add(-proj, b);
        }
    }
}

fn unit_normalize(v: &mut nd::Array1<f64>) -> f64 {
    let norm = v.dot(v).sqrt();
    if norm > 0.0 { *v /= norm; }
    norm
}

/// Compute the eigenvector for eigenvalue `e` by inverse iteration, keeping it
/// orthogonal to the previously accepted (unit-norm) eigenvectors in `basis`.
fn inverse_iteration(
    H: &Cyclic,
    e: f64,
    basis: &[nd::Array1<f64>],
    pivmin: f64,
    iters: usize,
) -> RResult<nd::Array1<f64>>
{
    let n = H.len();
    let lu = H.factor_shifted(e, pivmin);
    let mut seed = basis.len();
    let mut v = start_vector(n, seed);
    orthogonalize(&mut v, basis);
    unit_normalize(&mut v);
    let mut it: usize = 0;
    while it < iters {
        lu.solve_inplace(&mut v)?;
        orthogonalize(&mut v, basis);
        if unit_normalize(&mut v) <= f64::EPSILON {
            // the solve landed entirely within the accepted subspace; restart
            seed += n;
            v = start_vector(n, seed);
            orthogonalize(&mut v, basis);
            unit_normalize(&mut v);
            continue;
        }
        it += 1;
    }
    Ok(v)
}

/// Compute the lowest `k` states by Sturm-count bisection on the cyclic
/// Hamiltonian, followed by inverse iteration for the wavefunctions.
///
/// Each eigenvalue is bracketed to a relative width of `epsilon`, with at
/// most `maxiters` bisection steps. Degenerate levels are resolved to
/// distinct, mutually orthogonal wavefunctions.
#[instrument(level = "debug", skip_all, fields(n = V.len(), k = k))]
pub fn solve_bisection<S>(
    dx: f64,
    V: &Arr1<S>,
    B: f64,
    k: usize,
    epsilon: f64,
    maxiters: usize,
    compute_wf: bool,
) -> RResult<Vec<Solution>>
where S: nd::Data<Elem = f64>
{
    RotorError::check_epsilon(epsilon)?;
    RotorError::check_maxiters(maxiters)?;
    let H = hamiltonian(dx, V, B)?;
    RotorError::check_levels(k, H.len())?;

    let pivmin = H.pivmin();
    let (lo, hi) = H.gershgorin();
    let pad = 2.0 * f64::EPSILON * lo.abs().max(hi.abs()).max(1.0) + pivmin;
    let (lo, hi) = (lo - pad, hi + pad);

    let mut energies: Vec<f64> = Vec::with_capacity(k);
    let mut lower = lo;
    let mut hit_maxiters: usize = 0;
    for j in 0..k {
        let (bounds, exhausted)
            = bisect_level(&H, j, Bounds(lower, hi), pivmin, epsilon, maxiters);
        if exhausted { hit_maxiters += 1; }
        energies.push(bounds.midpoint());
        lower = bounds.0;
    }
    if hit_maxiters > 0 {
        warn!(
            levels = hit_maxiters,
            maxiters,
            "eigenvalue bisection reached maxiters before converging"
        );
    }
    debug!(?energies, "bisection complete");

    if !compute_wf {
        let sols: Vec<Solution>
            = energies.into_iter()
            .map(|e| Solution { e, wf: None })
            .collect();
        return Ok(sols);
    }

    let mut basis: Vec<nd::Array1<f64>> = Vec::with_capacity(k);
    for e in energies.iter() {
        let v = inverse_iteration(&H, *e, &basis, pivmin, DEF_INVITERS)?;
        basis.push(v);
    }
    let sols: Vec<Solution>
        = energies.into_iter().zip(basis)
        .map(|(e, mut wf)| {
            wf_renormalize(&mut wf, dx);
            fix_sign(&mut wf);
            Solution { e, wf: Some(wf) }
        })
        .collect();
    Ok(sols)
}

/// Solving method selector and parameters.
///
/// In configuration files this is written as a table tagged by `kind`:
/// ```toml
/// [method]
/// kind = "bisection"
/// epsilon = 1e-10
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Method {
    /// Use [full dense diagonalization][solve_dense].
    Dense,
    /// Use [bisection with inverse iteration][solve_bisection].
    Bisection {
        /// Relative eigenvalue accuracy (default: `1e-12`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        epsilon: Option<f64>,
        /// Maximum number of bisection steps per level (default: `200`).
        #[serde(default, skip_serializing_if = "Option::is_none")]
        maxiters: Option<usize>,
    },
}

impl Default for Method {
    fn default() -> Self { Self::Bisection { epsilon: None, maxiters: None } }
}

impl Method {
    /// Return `true` if `self` is `Dense`.
    pub fn is_dense(&self) -> bool { matches!(self, Self::Dense) }

    /// Return `true` if `self` is `Bisection`.
    pub fn is_bisection(&self) -> bool {
        matches!(self, Self::Bisection { .. })
    }
}

/// Master solving function for all [methods][Method].
///
/// Returns the lowest `k` states in ascending order of energy. Wavefunctions,
/// if computed, are normalized to `Σ |ψ|² dx = 1` with their largest-magnitude
/// component positive.
pub fn solve<S>(
    dx: f64,
    V: &Arr1<S>,
    B: f64,
    k: usize,
    method: &Method,
    compute_wf: bool,
) -> RResult<Vec<Solution>>
where S: nd::Data<Elem = f64>
{
    let mut sols = match method {
        Method::Dense => solve_dense(dx, V, B, k, compute_wf)?,
        Method::Bisection { epsilon, maxiters } => {
            solve_bisection(
                dx,
                V,
                B,
                k,
                epsilon.unwrap_or(DEF_EPSILON),
                maxiters.unwrap_or(DEF_MAXITERS),
                compute_wf,
            )?
        },
    };
    // bisection midpoints of a degenerate pair can land in either order
    sols.sort_by(|l, r| l.cmp_energy(r).unwrap_or(cmp::Ordering::Equal));
    Ok(sols)
}
