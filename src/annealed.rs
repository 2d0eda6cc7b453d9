/*!
Geometric interpolation between a target density f₀ and a reference density fₙ:

```text
f_β(x) = f₀(x)^β · fₙ(x)^(1-β),    β ∈ [0, 1]
```

All arithmetic happens in log space. A factor whose exponent is exactly zero is skipped, so the
endpoints β = 1 and β = 0 reproduce f₀ and fₙ exactly, and a zero density only matters where
its exponent is nonzero (in which case `log_evaluate` returns `-inf`, not an error).
*/

use num_traits::Float;

use crate::distributions::{checked_density, checked_log_density, Density};
use crate::error::{ConfigError, Result};

/// The family of intermediate densities between a target and a reference.
///
/// # Examples
///
/// ```rust
/// use mini_ais::annealed::AnnealedDensity;
/// use mini_ais::distributions::{Cauchy, Density, UnnormalizedGaussian};
///
/// let target = UnnormalizedGaussian::new(10.0, 2.0);
/// let reference = Cauchy::new(0.0, 0.5).unwrap();
/// let annealed = AnnealedDensity::new(target, reference);
///
/// let x = [3.0];
/// assert_eq!(annealed.evaluate(&x, 1.0).unwrap(), annealed.target.density(&x));
/// assert_eq!(annealed.evaluate(&x, 0.0).unwrap(), annealed.reference.density(&x));
/// ```
#[derive(Debug, Clone)]
pub struct AnnealedDensity<F0, FN> {
    /// f₀, the distribution of interest.
    pub target: F0,
    /// fₙ, the easy-to-sample distribution chains start from.
    pub reference: FN,
}

impl<F0, FN> AnnealedDensity<F0, FN> {
    pub fn new(target: F0, reference: FN) -> Self {
        Self { target, reference }
    }
}

fn check_beta<T: Float>(beta: T) -> Result<()> {
    if beta >= T::zero() && beta <= T::one() {
        Ok(())
    } else {
        Err(ConfigError::InvalidBeta(beta.to_f64().unwrap_or(f64::NAN)).into())
    }
}

impl<F0, FN> AnnealedDensity<F0, FN> {
    /// `β · log f₀(x) + (1 - β) · log fₙ(x)`.
    ///
    /// Returns `-inf` where the intermediate density is zero. Fails if `beta` lies outside
    /// `[0, 1]` or an evaluator returns NaN / `+inf`.
    pub fn log_evaluate<T>(&self, x: &[T], beta: T) -> Result<T>
    where
        T: Float,
        F0: Density<T>,
        FN: Density<T>,
    {
        check_beta(beta)?;
        let mut log_f = T::zero();
        if beta > T::zero() {
            log_f = log_f + beta * checked_log_density(&self.target, x, "target density")?;
        }
        let ref_weight = T::one() - beta;
        if ref_weight > T::zero() {
            log_f =
                log_f + ref_weight * checked_log_density(&self.reference, x, "reference density")?;
        }
        Ok(log_f)
    }

    /// `f₀(x)^β · fₙ(x)^(1-β)` as a raw density.
    ///
    /// The endpoints are returned exactly; in between the value is `exp(log_evaluate)`, which
    /// may under- or overflow where `log_evaluate` does not.
    pub fn evaluate<T>(&self, x: &[T], beta: T) -> Result<T>
    where
        T: Float,
        F0: Density<T>,
        FN: Density<T>,
    {
        check_beta(beta)?;
        if beta == T::one() {
            return checked_density(&self.target, x, "target density");
        }
        if beta == T::zero() {
            return checked_density(&self.reference, x, "reference density");
        }
        Ok(self.log_evaluate(x, beta)?.exp())
    }

    /// Freezes β, returning the fallible log-density a transition kernel targets.
    pub fn log_density_at<'a, T>(&'a self, beta: T) -> impl Fn(&[T]) -> Result<T> + 'a
    where
        T: Float + 'a,
        F0: Density<T>,
        FN: Density<T>,
    {
        move |x: &[T]| self.log_evaluate(x, beta)
    }
}
