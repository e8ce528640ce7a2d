//! Miscellaneous tools.
//!
//! Integrals here are taken over a full period sampled without its endpoint,
//! for which the trapezoidal rule reduces to a plain sum times the spacing.

use ndarray::{ self as nd, Ix1 };
use ndarray_linalg::Scalar;
use num_traits::Float;

/// Integrate a periodic function sampled over one period.
pub fn trapz_periodic<S, A>(y: &nd::ArrayBase<S, Ix1>, dx: A) -> A
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    dx * y.sum()
}

/// Calculate the norm of a wavefunction.
pub fn wf_norm<S, A>(q: &nd::ArrayBase<S, Ix1>, dx: A::Real) -> A::Real
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    trapz_periodic(&q.mapv(|qk| qk.square()), dx)
}

/// Calculate the inner product of two wavefunctions.
///
/// *Panics if the arrays have different lengths*.
pub fn wf_dot<S, T, A>(
    q: &nd::ArrayBase<S, Ix1>,
    p: &nd::ArrayBase<T, Ix1>,
    dx: A::Real,
) -> A
where
    S: nd::Data<Elem = A>,
    T: nd::Data<Elem = A>,
    A: Scalar,
{
    assert_eq!(q.len(), p.len());
    A::from_real(dx)
        * q.iter().zip(p)
        .fold(A::zero(), |acc, (qk, pk)| acc + qk.conj() * *pk)
}

/// Renormalize a wavefunction in place.
pub fn wf_renormalize<S, A>(q: &mut nd::ArrayBase<S, Ix1>, dx: A::Real)
where
    S: nd::DataMut<Elem = A>,
    A: Scalar,
{
    let norm = A::from_real(Float::sqrt(wf_norm(q, dx)));
    q.iter_mut().for_each(|qk| { *qk /= norm; });
}

/// Return a normalized copy of a wavefunction.
pub fn wf_normalized<S, A>(q: &nd::ArrayBase<S, Ix1>, dx: A::Real)
    -> nd::Array1<A>
where
    S: nd::Data<Elem = A>,
    A: Scalar,
{
    let norm = A::from_real(Float::sqrt(wf_norm(q, dx)));
    q.mapv(|qk| qk / norm)
}

/// Flip the sign of a real wavefunction so that its largest-magnitude
/// component is positive.
///
/// Ties are broken by the lowest index.
pub fn fix_sign<S, A>(q: &mut nd::ArrayBase<S, Ix1>)
where
    S: nd::DataMut<Elem = A>,
    A: Float,
{
    let largest
        = q.iter()
        .fold(A::zero(), |acc, qk| if qk.abs() > acc.abs() { *qk } else { acc });
    if largest < A::zero() { q.iter_mut().for_each(|qk| { *qk = -*qk; }); }
}

/// Return the minimum and maximum of an array, or `None` if it is empty.
pub fn extrema<S>(a: &nd::ArrayBase<S, Ix1>) -> Option<(f64, f64)>
where S: nd::Data<Elem = f64>
{
    (!a.is_empty()).then(|| {
        a.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(lo, hi), ak| (lo.min(*ak), hi.max(*ak)),
        )
    })
}
