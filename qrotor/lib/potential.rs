//! Hindered-rotor potentials on the angular grid.
//!
//! All potentials are in meV and take angles in radians.

use ndarray as nd;
use tracing::warn;
use crate::{
    Arr1,
    error::{ RResult, RotorError },
    utils::extrema,
};

/// Fitted coefficients for the CH₃ rotational potential reported by
/// K. Titov et al., Phys. Rev. Mater. **7**, 073402 (2023).
pub const TITOV2023: [f64; 5] = [2.7860, 0.0130, -1.5284, -0.0037, -1.2791];

/// A potential model selected by name.
#[derive(Clone, Debug, PartialEq)]
pub enum Potential {
    /// `V = 0`; the free rotor.
    Zero,
    /// `V = C0 + C1 sin(3θ + C2)`.
    Sine { offset: f64, amplitude: f64, phase: f64 },
    /// `V = Σ (Vₖ / 2) (1 - cos(nₖ θ))` for `(Vₖ, nₖ)` barrier
    /// height/periodicity pairs.
    Cosine { terms: Vec<(f64, f64)> },
    /// `V = C0 + C1 sin 3θ + C2 cos 3θ + C3 sin 6θ + C4 cos 6θ`.
    Titov2023 { c: [f64; 5] },
    /// No analytic form; values are supplied externally.
    External,
}

impl Potential {
    /// Select a model by (case-insensitive) name and parse its constants.
    ///
    /// An empty or unrecognized name selects [`Potential::External`].
    pub fn from_name(name: &str, constants: &[f64]) -> RResult<Self> {
        let key = name.trim().to_lowercase();
        match key.as_str() {
            "zero" => Ok(Self::Zero),
            "sine" | "sin" => {
                match *constants {
                    [offset, amplitude] => {
                        Ok(Self::Sine { offset, amplitude, phase: 0.0 })
                    },
                    [offset, amplitude, phase] => {
                        Ok(Self::Sine { offset, amplitude, phase })
                    },
                    _ => Err(RotorError::config(format!(
                        "potential 'sine' takes 2 or 3 constants; got {}",
                        constants.len(),
                    ))),
                }
            },
            "cosine" | "cos" => {
                if constants.is_empty() || constants.len() % 2 != 0 {
                    return Err(RotorError::config(format!(
                        "potential 'cosine' takes (barrier, periodicity) pairs; \
                        got {} constants",
                        constants.len(),
                    )));
                }
                let terms: Vec<(f64, f64)>
                    = constants.chunks_exact(2)
                    .map(|pair| (pair[0], pair[1]))
                    .collect();
                Ok(Self::Cosine { terms })
            },
            "titov2023" | "titov" => {
                match constants.len() {
                    0 => Ok(Self::Titov2023 { c: TITOV2023 }),
                    5 => {
                        let mut c = [0.0; 5];
                        c.copy_from_slice(constants);
                        Ok(Self::Titov2023 { c })
                    },
                    n => Err(RotorError::config(format!(
                        "potential 'titov2023' takes 0 or 5 constants; got {}", n))),
                }
            },
            "" => Ok(Self::External),
            _ => {
                warn!(
                    potential_name = name,
                    "unrecognized potential name; using supplied potential values"
                );
                Ok(Self::External)
            },
        }
    }

    /// Return `true` if values must be supplied externally.
    pub fn is_external(&self) -> bool { matches!(self, Self::External) }

    /// Evaluate at a single angle, returning `None` for
    /// [`Potential::External`].
    pub fn eval(&self, x: f64) -> Option<f64> {
        match self {
            Self::Zero => Some(0.0),
            Self::Sine { offset, amplitude, phase } => {
                Some(offset + amplitude * (3.0 * x + phase).sin())
            },
            Self::Cosine { terms } => {
                let v: f64
                    = terms.iter()
                    .map(|(vk, nk)| vk / 2.0 * (1.0 - (nk * x).cos()))
                    .sum();
                Some(v)
            },
            Self::Titov2023 { c } => {
                Some(
                    c[0]
                    + c[1] * (3.0 * x).sin()
                    + c[2] * (3.0 * x).cos()
                    + c[3] * (6.0 * x).sin()
                    + c[4] * (6.0 * x).cos()
                )
            },
            Self::External => None,
        }
    }

    /// Sample over a grid, returning `None` for [`Potential::External`].
    pub fn sample<S>(&self, grid: &Arr1<S>) -> Option<nd::Array1<f64>>
    where S: nd::Data<Elem = f64>
    {
        (!self.is_external())
            .then(|| grid.mapv(|x| self.eval(x).unwrap_or(0.0)))
    }
}

/// Scalars recorded while preparing a potential for the solver.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PotentialStats {
    /// Amount subtracted from every value, if the offset was corrected.
    pub offset: Option<f64>,
    /// Minimum after correction.
    pub min: f64,
    /// Maximum after correction.
    pub max: f64,
}

/// Optionally shift a potential so that its minimum is zero, and record the
/// resulting extrema.
///
/// Returns `None` for an empty array.
pub fn correct_offset<S>(V: &mut Arr1<S>, correct: bool) -> Option<PotentialStats>
where S: nd::DataMut<Elem = f64>
{
    let (min, max) = extrema(V)?;
    if correct {
        V.map_inplace(|vk| { *vk -= min; });
        Some(PotentialStats { offset: Some(min), min: 0.0, max: max - min })
    } else {
        Some(PotentialStats { offset: None, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;
    use approx::assert_abs_diff_eq;
    use crate::interp::uniform_grid;

    #[test]
    fn names_and_constants() {
        assert_eq!(Potential::from_name("Zero", &[1.0]).unwrap(), Potential::Zero);
        assert_eq!(
            Potential::from_name("sine", &[1.0, 2.0]).unwrap(),
            Potential::Sine { offset: 1.0, amplitude: 2.0, phase: 0.0 },
        );
        assert_eq!(
            Potential::from_name("titov2023", &[]).unwrap(),
            Potential::Titov2023 { c: TITOV2023 },
        );
        assert_eq!(Potential::from_name("", &[]).unwrap(), Potential::External);
        assert_eq!(Potential::from_name("from_qe", &[]).unwrap(), Potential::External);
    }

    #[test]
    fn bad_constant_counts() {
        assert!(matches!(
            Potential::from_name("cosine", &[1.0, 3.0, 2.0]),
            Err(RotorError::InvalidConfiguration(_)),
        ));
        assert!(matches!(
            Potential::from_name("sine", &[1.0]),
            Err(RotorError::InvalidConfiguration(_)),
        ));
        assert!(matches!(
            Potential::from_name("titov2023", &[1.0, 2.0]),
            Err(RotorError::InvalidConfiguration(_)),
        ));
    }

    #[test]
    fn cosine_barrier_height() {
        let pot = Potential::from_name("cosine", &[30.0, 3.0]).unwrap();
        assert_abs_diff_eq!(pot.eval(0.0).unwrap(), 0.0);
        assert_abs_diff_eq!(pot.eval(PI / 3.0).unwrap(), 30.0, epsilon = 1e-12);
        // threefold periodicity
        assert_abs_diff_eq!(
            pot.eval(0.4).unwrap(), pot.eval(0.4 + 2.0 * PI / 3.0).unwrap(), epsilon = 1e-12);
    }

    #[test]
    fn external_cannot_be_sampled() {
        let grid = uniform_grid(10);
        assert!(Potential::External.sample(&grid).is_none());
        assert_eq!(Potential::Zero.sample(&grid).unwrap(), nd::Array1::<f64>::zeros(10));
    }

    #[test]
    fn offset_correction() {
        let mut v = nd::array![3.0, 1.5, 4.0];
        let stats = correct_offset(&mut v, true).unwrap();
        assert_eq!(stats, PotentialStats { offset: Some(1.5), min: 0.0, max: 2.5 });
        assert_eq!(v, nd::array![1.5, 0.0, 2.5]);

        let mut w = nd::array![3.0, 1.5, 4.0];
        let stats = correct_offset(&mut w, false).unwrap();
        assert_eq!(stats, PotentialStats { offset: None, min: 1.5, max: 4.0 });
        assert_eq!(w, nd::array![3.0, 1.5, 4.0]);

        let mut e: nd::Array1<f64> = nd::Array1::zeros(0);
        assert!(correct_offset(&mut e, true).is_none());
    }
}
