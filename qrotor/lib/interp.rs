//! Periodic cubic-spline interpolation of array-sampled functions on the
//! circle, used to move potentials between angular grids.
//!
//! ```
//! use std::f64::consts::TAU;
//! use qrotor::interp::{ PeriodicSpline, uniform_grid };
//!
//! let x = uniform_grid(90);
//! let y = x.mapv(|xk| (3.0 * xk).cos());
//! let spline = PeriodicSpline::new(&x, &y, TAU).unwrap();
//! // evaluation wraps around the period
//! assert!((spline.eval(TAU + 0.1) - (0.3_f64).cos()).abs() < 1e-4);
//! ```

use std::f64::consts::TAU;
use ndarray as nd;
use crate::{
    Arr1,
    cyclic::Cyclic,
    error::{ InterpError, LengthError, PeriodicError },
};

pub type InterpResult<T> = Result<T, InterpError>;

/// Generate `n` evenly spaced angles over [0, 2π), excluding the endpoint.
pub fn uniform_grid(n: usize) -> nd::Array1<f64> {
    (0..n).map(|k| TAU * k as f64 / n as f64).collect()
}

/// Interpolating cubic spline with periodic boundary conditions.
///
/// The knots must lie within a single period and be strictly increasing. If
/// the last knot sits exactly one period after the first (i.e. the sampling
/// includes both endpoints), it is dropped as a duplicate.
#[derive(Clone, Debug)]
pub struct PeriodicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    // second derivatives at the knots
    m: Vec<f64>,
    period: f64,
}

impl PeriodicSpline {
    /// Construct from knot coordinates and values.
    pub fn new<S, T>(data_x: &Arr1<S>, data_y: &Arr1<T>, period: f64)
        -> InterpResult<Self>
    where
        S: nd::Data<Elem = f64>,
        T: nd::Data<Elem = f64>,
    {
        LengthError::check(data_x, data_y)?;
        let mut x: Vec<f64> = data_x.to_vec();
        let mut y: Vec<f64> = data_y.to_vec();
        if x.len() > 1 {
            let span = x[x.len() - 1] - x[0];
            if (span - period).abs() <= 1e-9 * period {
                x.pop();
                y.pop();
            }
        }
        let n = x.len();
        PeriodicError::check(n)?;
        if let Some(k) = (1..n).find(|k| x[*k] <= x[*k - 1]) {
            return Err(InterpError::Knots(k));
        }
        if x[n - 1] >= x[0] + period { return Err(InterpError::Knots(n - 1)); }

        let h: nd::Array1<f64>
            = (0..n)
            .map(|k| if k + 1 < n { x[k + 1] - x[k] } else { x[0] + period - x[k] })
            .collect();
        let diag: nd::Array1<f64>
            = (0..n)
            .map(|k| 2.0 * (h[(k + n - 1) % n] + h[k]))
            .collect();
        let rhs: nd::Array1<f64>
            = (0..n)
            .map(|k| {
                let l = (k + n - 1) % n;
                let r = (k + 1) % n;
                6.0 * ((y[r] - y[k]) / h[k] - (y[k] - y[l]) / h[l])
            })
            .collect();
        let m = Cyclic::new(&diag, &h)?.solve(&rhs)?.to_vec();
        Ok(Self { x, y, m, period })
    }

    /// Get the number of (distinct) knots.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize { self.x.len() }

    /// Get the period.
    pub fn period(&self) -> f64 { self.period }

    /// Evaluate the spline at a single point, wrapping it into the knot period.
    pub fn eval(&self, t: f64) -> f64 {
        let n = self.x.len();
        let x0 = self.x[0];
        let mut u = x0 + (t - x0).rem_euclid(self.period);
        if u >= x0 + self.period { u = x0; }
        let i = self.x.partition_point(|xk| *xk <= u).saturating_sub(1);
        let j = (i + 1) % n;
        let xi = self.x[i];
        let xj = if i + 1 < n { self.x[i + 1] } else { x0 + self.period };
        let h = xj - xi;
        let a = xj - u;
        let b = u - xi;
        self.m[i] * a.powi(3) / (6.0 * h)
            + self.m[j] * b.powi(3) / (6.0 * h)
            + (self.y[i] / h - self.m[i] * h / 6.0) * a
            + (self.y[j] / h - self.m[j] * h / 6.0) * b
    }

    /// Evaluate the spline at every point of an array.
    pub fn eval_array<S>(&self, t: &Arr1<S>) -> nd::Array1<f64>
    where S: nd::Data<Elem = f64>
    {
        t.mapv(|tk| self.eval(tk))
    }
}

/// Resample a function given on `grid` onto a uniform grid of `n` points over
/// [0, 2π), returning the new grid and values.
pub fn resample<S, T>(grid: &Arr1<S>, values: &Arr1<T>, n: usize)
    -> InterpResult<(nd::Array1<f64>, nd::Array1<f64>)>
where
    S: nd::Data<Elem = f64>,
    T: nd::Data<Elem = f64>,
{
    let spline = PeriodicSpline::new(grid, values, TAU)?;
    let new_grid = uniform_grid(n);
    let new_values = spline.eval_array(&new_grid);
    Ok((new_grid, new_values))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn potential(x: f64) -> f64 { 1.5 * (3.0 * x).cos() + 0.4 * (6.0 * x).sin() }

    #[test]
    fn uniform_grid_excludes_endpoint() {
        let g = uniform_grid(4);
        assert_eq!(g.len(), 4);
        assert_abs_diff_eq!(g[0], 0.0);
        assert_abs_diff_eq!(g[3], 3.0 * TAU / 4.0, epsilon = 1e-15);
    }

    #[test]
    fn reproduces_knots() {
        let x = uniform_grid(37);
        let y = x.mapv(potential);
        let spline = PeriodicSpline::new(&x, &y, TAU).unwrap();
        x.iter().zip(&y)
            .for_each(|(xk, yk)| assert_abs_diff_eq!(spline.eval(*xk), *yk, epsilon = 1e-12));
    }

    #[test]
    fn wraps_last_interval() {
        let x = uniform_grid(360);
        let y = x.mapv(potential);
        let spline = PeriodicSpline::new(&x, &y, TAU).unwrap();
        // between the last knot and 2π
        let t = TAU - 0.5 * TAU / 360.0;
        assert_abs_diff_eq!(spline.eval(t), potential(t), epsilon = 1e-5);
        assert_abs_diff_eq!(spline.eval(-0.25), potential(-0.25), epsilon = 1e-5);
    }

    #[test]
    fn drops_duplicate_endpoint() {
        let x: nd::Array1<f64> = nd::Array1::linspace(0.0, TAU, 101);
        let y = x.mapv(potential);
        let spline = PeriodicSpline::new(&x, &y, TAU).unwrap();
        assert_eq!(spline.len(), 100);
        assert_abs_diff_eq!(spline.eval(1.0), potential(1.0), epsilon = 1e-3);
    }

    #[test]
    fn round_trip_resample() {
        let x = uniform_grid(360);
        let y = x.mapv(potential);
        let (x2, y2) = resample(&x, &y, 1000).unwrap();
        assert_eq!(x2.len(), 1000);
        let (x3, y3) = resample(&x2, &y2, 360).unwrap();
        x3.iter().zip(&x).for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-12));
        y3.iter().zip(&y).for_each(|(a, b)| assert_abs_diff_eq!(a, b, epsilon = 1e-5));
    }

    #[test]
    fn rejects_bad_knots() {
        let x = nd::array![0.0, 2.0, 1.0, 3.0];
        let y = nd::array![0.0, 0.0, 0.0, 0.0];
        assert_eq!(PeriodicSpline::new(&x, &y, TAU).unwrap_err(), InterpError::Knots(2));
        let x = nd::array![0.0, 1.0];
        let y = nd::array![0.0, 0.0];
        assert_eq!(
            PeriodicSpline::new(&x, &y, TAU).unwrap_err(),
            InterpError::Periodic(PeriodicError(2)),
        );
        let y = nd::array![0.0, 0.0, 1.0];
        assert_eq!(
            PeriodicSpline::new(&x, &y, TAU).unwrap_err(),
            InterpError::Length(LengthError(2, 3)),
        );
    }
}
