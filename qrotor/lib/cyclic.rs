//! Symmetric cyclic tridiagonal matrices.
//!
//! A periodic second-difference stencil couples each grid point to its two
//! neighbors, with the last point wrapping around to the first:
//! ```text
//! ┌ d₀    o₀                oₙ₋₁ ┐
//! │ o₀    d₁    o₁               │
//! │       o₁    d₂    o₂         │
//! │             o₂    d₃    o₃   │
//! └ oₙ₋₁              o₃    dₙ₋₁ ┘
//! ```
//! where `off[i]` couples `i` with `(i + 1) mod n`. This module provides
//! eigenvalue counting (for bisection) and shifted linear solves (for inverse
//! iteration and periodic splines) in *O*(*n*) time and memory.
//!
//! Shifted solves reorder the unknowns as `0, n - 1, 1, n - 2, 2, ...`, which
//! turns the cycle into a pentadiagonal band that is then factored with
//! partial pivoting.

use ndarray as nd;
use crate::{
    Arr1,
    error::{ CyclicError, LengthError, PeriodicError },
};

/// Symmetric cyclic tridiagonal matrix of size `n >= 3`.
#[derive(Clone, Debug, PartialEq)]
pub struct Cyclic {
    diag: Vec<f64>,
    off: Vec<f64>,
}

impl Cyclic {
    /// Create a new matrix from its diagonal and its `n` off-diagonal
    /// couplings, where `off[n - 1]` is the wrap-around corner element.
    pub fn new<S, T>(diag: &Arr1<S>, off: &Arr1<T>) -> Result<Self, CyclicError>
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        LengthError::check(diag, off)?;
        PeriodicError::check(diag.len())?;
        Ok(Self { diag: diag.to_vec(), off: off.to_vec() })
    }

    /// Get the size of the (square) matrix.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.diag.len() }

    /// Get a reference to the diagonal.
    pub fn diag(&self) -> &[f64] { &self.diag }

    /// Get a reference to the off-diagonal couplings.
    pub fn off(&self) -> &[f64] { &self.off }

    /// Compute the matrix-vector product `A x`.
    ///
    /// *Panics if `x` does not have length `n`*.
    pub fn dot<S>(&self, x: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        let n = self.len();
        (0..n)
            .map(|i| {
                let l = (i + n - 1) % n;
                let r = (i + 1) % n;
                self.off[l] * x[l] + self.diag[i] * x[i] + self.off[i] * x[r]
            })
            .collect()
    }

    /// Materialize as a dense matrix.
    pub fn to_dense(&self) -> nd::Array2<f64> {
        let n = self.len();
        let mut A: nd::Array2<f64> = nd::Array2::zeros((n, n));
        for i in 0..n {
            let r = (i + 1) % n;
            A[[i, i]] = self.diag[i];
            A[[i, r]] = self.off[i];
            A[[r, i]] = self.off[i];
        }
        A
    }

    /// Gershgorin bounds on the spectrum.
    pub fn gershgorin(&self) -> (f64, f64) {
        let n = self.len();
        (0..n)
            .map(|i| {
                let radius
                    = self.off[(i + n - 1) % n].abs() + self.off[i].abs();
                (self.diag[i] - radius, self.diag[i] + radius)
            })
            .fold(
                (f64::INFINITY, f64::NEG_INFINITY),
                |(lo, hi), (l, h)| (lo.min(l), hi.max(h)),
            )
    }

    /// Infinity-norm of the matrix.
    pub fn norm_inf(&self) -> f64 {
        let n = self.len();
        (0..n)
            .map(|i| {
                self.off[(i + n - 1) % n].abs()
                    + self.diag[i].abs()
                    + self.off[i].abs()
            })
            .fold(0.0, f64::max)
    }

    /// Smallest pivot magnitude allowed in factorizations before it is
    /// replaced.
    pub fn pivmin(&self) -> f64 {
        f64::EPSILON * self.norm_inf().max(f64::MIN_POSITIVE)
    }

    /// Count the eigenvalues strictly less than `sigma`.
    ///
    /// By Sylvester's law of inertia this is the number of negative pivots in
    /// an LDLᵀ factorization of `A - sigma I`. The last row and column are
    /// split off so that the leading block is an ordinary tridiagonal matrix
    /// `T`; the wrapped row then contributes the sign of its Schur complement
    /// ```text
    /// s = (d[n-1] - σ) - cᵀ (T - σ)⁻¹ c
    /// ```
    /// where `c` holds the two couplings of the last row.
    pub fn count_below(&self, sigma: f64, pivmin: f64) -> usize {
        let n = self.len();
        let mut count: usize = 0;
        let mut schur = self.diag[n - 1] - sigma;
        let mut d_prev: f64 = 1.0;
        let mut z_prev: f64 = 0.0;
        for i in 0..n - 1 {
            let mut c = 0.0;
            if i == 0 { c += self.off[n - 1]; }
            if i == n - 2 { c += self.off[n - 2]; }
            let (mut d, z)
                = if i == 0 {
                    (self.diag[0] - sigma, c)
                } else {
                    let l = self.off[i - 1] / d_prev;
                    (self.diag[i] - sigma - l * self.off[i - 1], c - l * z_prev)
                };
            if d.abs() < pivmin { d = -pivmin; }
            if d < 0.0 { count += 1; }
            schur -= z * z / d;
            d_prev = d;
            z_prev = z;
        }
        if schur < 0.0 { count += 1; }
        count
    }

    /// Factor `A - mu I` for repeated linear solves.
    ///
    /// Exactly singular pivots are replaced with `pivmin` so that the
    /// factorization can be used for inverse iteration at an eigenvalue.
    pub fn factor_shifted(&self, mu: f64, pivmin: f64) -> CyclicLu {
        let n = self.len();
        let perm: Vec<usize>
            = (0..n)
            .map(|pos| if pos % 2 == 0 { pos / 2 } else { n - 1 - pos / 2 })
            .collect();
        let mut inv: Vec<usize> = vec![0; n];
        perm.iter().enumerate().for_each(|(pos, node)| { inv[*node] = pos; });
        let mut band = Band::zeros(n, 2, 2);
        for i in 0..n {
            let r = (i + 1) % n;
            band.add(inv[i], inv[i], self.diag[i] - mu);
            band.add(inv[i], inv[r], self.off[i]);
            band.add(inv[r], inv[i], self.off[i]);
        }
        band.factor(pivmin);
        CyclicLu { perm, band }
    }

    /// Solve `A x = b` directly.
    pub fn solve<S>(&self, b: &Arr1<S>) -> Result<nd::Array1<f64>, LengthError>
    where S: nd::Data<Elem = f64>
    {
        let mut x = b.to_owned();
        self.factor_shifted(0.0, self.pivmin()).solve_inplace(&mut x)?;
        Ok(x)
    }
}

/// LU factorization of a shifted [`Cyclic`] matrix.
#[derive(Clone, Debug)]
pub struct CyclicLu {
    perm: Vec<usize>,
    band: Band,
}

impl CyclicLu {
    /// Overwrite `b` with the solution `x` to `(A - mu I) x = b`.
    pub fn solve_inplace<S>(&self, b: &mut Arr1<S>) -> Result<(), LengthError>
    where S: nd::DataMut<Elem = f64>
    {
        let n = self.perm.len();
        (b.len() == n).then_some(()).ok_or(LengthError(b.len(), n))?;
        let mut work: Vec<f64> = self.perm.iter().map(|node| b[*node]).collect();
        self.band.solve(&mut work);
        self.perm.iter().zip(work)
            .for_each(|(node, xk)| { b[*node] = xk; });
        Ok(())
    }
}

// general band matrix with `kl` sub- and `ku` super-diagonals, stored with
// room for the `kl` extra super-diagonals created by row interchanges
//
// element (i, j) lives at `ab[i * w + j + kl - i]`, valid for
// i - kl <= j <= i + ku + kl
#[derive(Clone, Debug)]
struct Band {
    n: usize,
    kl: usize,
    ku: usize,
    w: usize,
    ab: Vec<f64>,
    piv: Vec<usize>,
}

impl Band {
    fn zeros(n: usize, kl: usize, ku: usize) -> Self {
        let w = 2 * kl + ku + 1;
        Self { n, kl, ku, w, ab: vec![0.0; n * w], piv: (0..n).collect() }
    }

    fn idx(&self, i: usize, j: usize) -> usize {
        i * self.w + j + self.kl - i
    }

    fn add(&mut self, i: usize, j: usize, val: f64) {
        let k = self.idx(i, j);
        self.ab[k] += val;
    }

    fn get(&self, i: usize, j: usize) -> f64 { self.ab[self.idx(i, j)] }

    fn set(&mut self, i: usize, j: usize, val: f64) {
        let k = self.idx(i, j);
        self.ab[k] = val;
    }

    // Gaussian elimination with partial pivoting; multipliers are stored in
    // place of the eliminated entries
    fn factor(&mut self, pivmin: f64) {
        let n = self.n;
        let reach = self.ku + self.kl;
        for k in 0..n {
            let last_row = (k + self.kl).min(n - 1);
            let last_col = (k + reach).min(n - 1);
            let p
                = (k..=last_row)
                .fold(k, |p, r| {
                    if self.get(r, k).abs() > self.get(p, k).abs() { r } else { p }
                });
            self.piv[k] = p;
            if p != k {
                for c in k..=last_col {
                    let tmp = self.get(k, c);
                    self.set(k, c, self.get(p, c));
                    self.set(p, c, tmp);
                }
            }
            let mut pivot = self.get(k, k);
            if pivot.abs() < pivmin {
                pivot = if pivot < 0.0 { -pivmin } else { pivmin };
                self.set(k, k, pivot);
            }
            for r in k + 1..=last_row {
                let m = self.get(r, k) / pivot;
                self.set(r, k, m);
                if m == 0.0 { continue; }
                for c in k + 1..=last_col {
                    let val = self.get(r, c) - m * self.get(k, c);
                    self.set(r, c, val);
                }
            }
        }
    }

    fn solve(&self, b: &mut [f64]) {
        let n = self.n;
        let reach = self.ku + self.kl;
        for k in 0..n {
            let p = self.piv[k];
            if p != k { b.swap(k, p); }
            for r in k + 1..=(k + self.kl).min(n - 1) {
                b[r] -= self.get(r, k) * b[k];
            }
        }
        for k in (0..n).rev() {
            let s
                = (k + 1..=(k + reach).min(n - 1))
                .fold(b[k], |acc, c| acc - self.get(k, c) * b[c]);
            b[k] = s / self.get(k, k);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray_linalg::EigValshInto;

    fn laplacian(n: usize) -> Cyclic {
        let diag: nd::Array1<f64> = nd::Array1::from_elem(n, 2.0);
        let off: nd::Array1<f64> = nd::Array1::from_elem(n, -1.0);
        Cyclic::new(&diag, &off).unwrap()
    }

    fn irregular(n: usize) -> Cyclic {
        let diag: nd::Array1<f64>
            = (0..n).map(|i| 3.0 + (i as f64 * 0.7).sin()).collect();
        let off: nd::Array1<f64>
            = (0..n).map(|i| -1.0 + 0.3 * (i as f64 * 1.3).cos()).collect();
        Cyclic::new(&diag, &off).unwrap()
    }

    #[test]
    fn rejects_small_or_mismatched() {
        let a: nd::Array1<f64> = nd::Array1::zeros(2);
        assert_eq!(Cyclic::new(&a, &a), Err(CyclicError::Periodic(PeriodicError(2))));
        let b: nd::Array1<f64> = nd::Array1::zeros(3);
        assert_eq!(Cyclic::new(&b, &a), Err(CyclicError::Length(LengthError(3, 2))));
    }

    #[test]
    fn dense_matches_dot() {
        let A = irregular(7);
        let x: nd::Array1<f64> = (0..7).map(|i| i as f64 - 2.5).collect();
        let y = A.dot(&x);
        let yd = A.to_dense().dot(&x);
        y.iter().zip(&yd).for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-12));
    }

    #[test]
    fn solve_recovers_rhs() {
        for n in [3, 4, 5, 10, 11, 64] {
            let A = irregular(n);
            let x: nd::Array1<f64> = (0..n).map(|i| (i as f64).cos()).collect();
            let b = A.dot(&x);
            let xs = A.solve(&b).unwrap();
            xs.iter().zip(&x)
                .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-10));
        }
    }

    #[test]
    fn shifted_solve_with_indefinite_matrix() {
        let A = laplacian(9);
        let mu = 1.7;
        let x: nd::Array1<f64> = (0..9).map(|i| 1.0 + i as f64).collect();
        let b = A.dot(&x) - &(mu * &x);
        let mut xs = b.clone();
        A.factor_shifted(mu, A.pivmin()).solve_inplace(&mut xs).unwrap();
        xs.iter().zip(&x)
            .for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-9));
    }

    #[test]
    fn counts_match_dense_spectrum() {
        let A = irregular(12);
        let evals: nd::Array1<f64>
            = A.to_dense().eigvalsh_into(ndarray_linalg::UPLO::Lower).unwrap();
        let pivmin = A.pivmin();
        for (k, pair) in evals.windows(2).into_iter().enumerate() {
            let mid = (pair[0] + pair[1]) / 2.0;
            assert_eq!(A.count_below(mid, pivmin), k + 1);
        }
        let (lo, hi) = A.gershgorin();
        assert_eq!(A.count_below(lo - 1.0, pivmin), 0);
        assert_eq!(A.count_below(hi + 1.0, pivmin), 12);
    }

    #[test]
    fn counts_through_degenerate_pairs() {
        // eigenvalues 2 - 2 cos(2πm/n): 0 once, then pairs
        let n = 8;
        let A = laplacian(n);
        let pivmin = A.pivmin();
        let ev = |m: usize| 2.0 - 2.0 * (std::f64::consts::TAU * m as f64 / n as f64).cos();
        assert_eq!(A.count_below(ev(0) + 1e-6, pivmin), 1);
        assert_eq!(A.count_below(ev(1) - 1e-6, pivmin), 1);
        assert_eq!(A.count_below(ev(1) + 1e-6, pivmin), 3);
        assert_eq!(A.count_below(ev(2) + 1e-6, pivmin), 5);
    }
}
