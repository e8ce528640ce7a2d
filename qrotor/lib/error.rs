//! Collection of all error types.
//!
//! All errors derive [`thiserror::Error`], making them composable when allowed
//! and compatible with application code using [`anyhow`][anyhow].
//!
//! [anyhow]: https://crates.io/crates/anyhow

use ndarray as nd;
use ndarray_linalg::error::LinalgError;
use thiserror::Error;

/// Returned when an operation requiring equal-length arrays encounters arrays
/// with unequal length.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("encountered arrays with incompatible lengths; got {0} and {1}")]
pub struct LengthError(pub usize, pub usize);

impl LengthError {
    pub(crate) fn check<S, A, T, B>(
        a: &nd::ArrayBase<S, nd::Ix1>,
        b: &nd::ArrayBase<T, nd::Ix1>,
    ) -> Result<(), Self>
    where
        S: nd::Data<Elem = A>,
        T: nd::Data<Elem = B>,
    {
        let na = a.len();
        let nb = b.len();
        (na == nb).then_some(()).ok_or(Self(na, nb))
    }
}

/// Returned when a periodic construction is attempted on fewer than 3 points.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("periodic grids must contain at least 3 points; got {0}")]
pub struct PeriodicError(pub usize);

impl PeriodicError {
    pub(crate) fn check(n: usize) -> Result<(), Self> {
        (n >= 3).then_some(()).ok_or(Self(n))
    }
}

/// Returned from [`Cyclic::new`][crate::cyclic::Cyclic::new].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CyclicError {
    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// [`PeriodicError`]
    #[error("periodic error: {0}")]
    Periodic(#[from] PeriodicError),
}

/// Returned from functions in [`interp`][crate::interp].
#[derive(Debug, Error, PartialEq)]
pub enum InterpError {
    /// [`LengthError`]
    #[error("length error: {0}")]
    Length(#[from] LengthError),

    /// [`PeriodicError`]
    #[error("periodic error: {0}")]
    Periodic(#[from] PeriodicError),

    /// Returned when knot coordinates are not strictly increasing within a
    /// single period.
    #[error("knot coordinates must be strictly increasing within one period; failed at index {0}")]
    Knots(usize),
}

/// Returned from everything that builds, mutates, or solves a
/// [`System`][crate::system::System].
#[derive(Debug, Error)]
pub enum RotorError {
    /// A configuration value is missing or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Grid and potential arrays disagree in length.
    #[error("dimension mismatch between grid and potential: {0}")]
    DimensionMismatch(#[from] LengthError),

    /// More eigenstates were requested than there are grid points.
    #[error("cannot compute {requested} eigenstates on a grid of {available} points")]
    UnderdeterminedSystem { requested: usize, available: usize },

    /// A collection element was not a `System`.
    #[error("expected a System at index {index}")]
    TypeMismatch { index: usize },

    /// [`InterpError`]
    #[error("interpolation error: {0}")]
    Interp(#[from] InterpError),

    /// [`LinalgError`]
    #[error("linalg error: {0}")]
    Linalg(#[from] LinalgError),

    /// Malformed TOML configuration.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Failure to (de)serialize a summary record.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

impl RotorError {
    pub(crate) fn config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    pub(crate) fn check_epsilon(epsilon: f64) -> Result<(), Self> {
        (epsilon > 0.0).then_some(())
            .ok_or_else(|| Self::config(format!(
                "epsilon values must be greater than 0; got {}", epsilon)))
    }

    pub(crate) fn check_maxiters(maxiters: usize) -> Result<(), Self> {
        (maxiters != 0).then_some(())
            .ok_or_else(|| Self::config("maxiters must be greater than 0"))
    }

    pub(crate) fn check_levels(requested: usize, available: usize)
        -> Result<(), Self>
    {
        if requested == 0 {
            return Err(Self::config("at least one energy level must be requested"));
        }
        (requested <= available).then_some(())
            .ok_or(Self::UnderdeterminedSystem { requested, available })
    }

    pub(crate) fn check_inertia(b: f64) -> Result<(), Self> {
        (b.is_finite() && b > 0.0).then_some(())
            .ok_or_else(|| Self::config(format!(
                "rotational inertia must be positive and finite; got {}", b)))
    }
}

impl From<CyclicError> for InterpError {
    fn from(err: CyclicError) -> Self {
        match err {
            CyclicError::Length(e) => Self::Length(e),
            CyclicError::Periodic(e) => Self::Periodic(e),
        }
    }
}

impl From<CyclicError> for RotorError {
    fn from(err: CyclicError) -> Self {
        match err {
            CyclicError::Length(e) => Self::DimensionMismatch(e),
            CyclicError::Periodic(e) => Self::config(e.to_string()),
        }
    }
}

pub type RResult<T> = Result<T, RotorError>;
