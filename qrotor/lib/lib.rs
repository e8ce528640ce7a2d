#![allow(dead_code, non_snake_case)]

//! Provides functions and higher-level constructs for computing the
//! rotational energy levels of hindered planar rotors, such as methyl (CH₃)
//! and amine (NH₃) groups, in a periodic potential.
//!
//! The one-dimensional Schrödinger equation
//! ```text
//! -B ψ''(θ) + V(θ) ψ(θ) = E ψ(θ),    ψ(θ + 2π) = ψ(θ)
//! ```
//! is discretized on a uniform angular grid, giving a cyclic tridiagonal
//! Hamiltonian whose lowest eigenstates are found by either
//! - Dense symmetric diagonalization (LAPACK)
//! - Sturm-count bisection with inverse iteration (linear in grid size)
//!
//! Calculations are organized around [`System`], which holds configuration,
//! grid, potential, and results, with batch helpers in [`systems`].

pub mod cyclic;
pub mod error;
pub mod group;
pub mod interp;
pub mod potential;
pub mod solve;
pub mod system;
pub mod systems;
pub mod units;
pub mod utils;

pub use error::{ RResult, RotorError };
pub use group::Group;
pub use potential::Potential;
pub use solve::{ Method, Solution };
pub use system::{ Summary, System, SystemConfig };

pub(crate) const DEF_EPSILON: f64 = 1e-12;
pub(crate) const DEF_MAXITERS: usize = 200;
pub(crate) const DEF_INVITERS: usize = 3;

pub type Arr1<S> = ndarray::ArrayBase<S, ndarray::Ix1>;
