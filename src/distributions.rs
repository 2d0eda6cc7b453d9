/*!
Unnormalized densities, reference distributions and Metropolis proposals.

Everything here is generic over the floating-point precision (e.g., `f32` or `f64`) using
the [`num_traits::Float`] trait. States are plain slices, so every distribution works in any
dimension.

Density evaluation and sampling are separate capabilities: the target of an annealing run only
needs [`Density`], while the reference distribution additionally implements
[`ReferenceSampler`].

# Examples

```rust
use mini_ais::distributions::{Cauchy, Density, ReferenceSampler, UnnormalizedGaussian};
use rand::rngs::SmallRng;
use rand::SeedableRng;

// A heavy-tailed, normalized reference distribution.
let reference = Cauchy::new(0.0, 0.5).unwrap();
let mut rng = SmallRng::seed_from_u64(42);
let x0 = reference.sample(&mut rng);
assert_eq!(x0.len(), 1);

// An unnormalized Gaussian target: exp(-0.5 * ((x - 10) / 2)^2).
let target = UnnormalizedGaussian::new(10.0, 2.0);
assert_eq!(target.density(&[10.0]), 1.0);
```
*/

use num_traits::{Float, FloatConst};
use rand::Rng;
use rand_distr::{Distribution, Standard, StandardNormal};

use crate::error::{AisError, ConfigError, Result};

/// An unnormalized probability density over continuous states.
pub trait Density<T: Float> {
    /// Returns the (nonnegative) unnormalized density at `x`.
    fn density(&self, x: &[T]) -> T;

    /// Returns the log of the unnormalized density at `x`.
    ///
    /// Implementations should override this when the density is more naturally (or more
    /// stably) expressed in log space.
    fn log_density(&self, x: &[T]) -> T {
        self.density(x).ln()
    }
}

impl<T: Float, D: Density<T> + ?Sized> Density<T> for &D {
    fn density(&self, x: &[T]) -> T {
        (**self).density(x)
    }

    fn log_density(&self, x: &[T]) -> T {
        (**self).log_density(x)
    }
}

/// A distribution that can produce exact, independent draws. Used to start every annealing
/// chain.
pub trait ReferenceSampler<T: Float> {
    /// Draws one state.
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<T>;
}

/// A symmetric random-walk proposal, i.e. q(x' | x) = q(x | x').
///
/// Symmetry is what lets the Metropolis acceptance ratio ignore the proposal density.
pub trait SymmetricProposal<T: Float> {
    /// Perturbs a single coordinate.
    fn perturb<R: Rng + ?Sized>(&self, value: T, rng: &mut R) -> T;

    /// Samples a candidate x' ~ q(· | current) by perturbing every coordinate.
    fn propose<R: Rng + ?Sized>(&self, current: &[T], rng: &mut R) -> Vec<T> {
        current.iter().map(|&x| self.perturb(x, rng)).collect()
    }
}

/// Evaluates `density` at `x`, rejecting negative and NaN values.
pub(crate) fn checked_density<T: Float, D: Density<T> + ?Sized>(
    density: &D,
    x: &[T],
    context: &'static str,
) -> Result<T> {
    let value = density.density(x);
    if value.is_nan() || value < T::zero() {
        return Err(AisError::Evaluation {
            value: value.to_f64().unwrap_or(f64::NAN),
            context,
        });
    }
    Ok(value)
}

/// Evaluates the log-density at `x`. `-inf` (zero density) is a valid result, NaN and `+inf`
/// are not.
pub(crate) fn checked_log_density<T: Float, D: Density<T> + ?Sized>(
    density: &D,
    x: &[T],
    context: &'static str,
) -> Result<T> {
    let value = density.log_density(x);
    if value.is_nan() || value == T::infinity() {
        return Err(AisError::Evaluation {
            value: value.to_f64().unwrap_or(f64::NAN),
            context,
        });
    }
    Ok(value)
}

fn check_scale<T: Float>(what: &'static str, value: T) -> Result<()> {
    if value > T::zero() && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::InvalidScale {
            what,
            value: value.to_f64().unwrap_or(f64::NAN),
        }
        .into())
    }
}

/**
A product of independent Cauchy distributions with common location and scale.

The density is normalized, so it can serve as the reference distribution of an annealing run
whose normalizing-constant ratio should be read as an absolute normalizing constant.

# Examples

```rust
use mini_ais::distributions::{Cauchy, Density};

let c = Cauchy::new(0.0, 0.5).unwrap();
let p = c.density(&[0.0]);
assert!((p - 1.0 / (std::f64::consts::PI * 0.5)).abs() < 1e-12);
```
*/
#[derive(Debug, Clone)]
pub struct Cauchy<T>
where
    T: Float + FloatConst,
    Standard: Distribution<T>,
{
    pub loc: T,
    pub scale: T,
    pub dim: usize,
    distr: rand_distr::Cauchy<T>,
}

impl<T> Cauchy<T>
where
    T: Float + FloatConst,
    Standard: Distribution<T>,
{
    /// Creates a one-dimensional Cauchy distribution. Fails unless `scale` is positive and
    /// finite.
    pub fn new(loc: T, scale: T) -> Result<Self> {
        check_scale("Cauchy scale", scale)?;
        let distr = rand_distr::Cauchy::new(loc, scale).map_err(|_| ConfigError::InvalidScale {
            what: "Cauchy scale",
            value: scale.to_f64().unwrap_or(f64::NAN),
        })?;
        Ok(Self {
            loc,
            scale,
            dim: 1,
            distr,
        })
    }

    /// Returns the same distribution over `dim` independent coordinates.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }
}

impl<T> Density<T> for Cauchy<T>
where
    T: Float + FloatConst,
    Standard: Distribution<T>,
{
    fn density(&self, x: &[T]) -> T {
        let norm = T::PI() * self.scale;
        x.iter().fold(T::one(), |acc, &xi| {
            let z = (xi - self.loc) / self.scale;
            acc / (norm * (T::one() + z * z))
        })
    }

    fn log_density(&self, x: &[T]) -> T {
        let log_norm = (T::PI() * self.scale).ln();
        x.iter().fold(T::zero(), |acc, &xi| {
            let z = (xi - self.loc) / self.scale;
            acc - log_norm - (z * z).ln_1p()
        })
    }
}

impl<T> ReferenceSampler<T> for Cauchy<T>
where
    T: Float + FloatConst,
    Standard: Distribution<T>,
{
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<T> {
        (0..self.dim).map(|_| self.distr.sample(rng)).collect()
    }
}

/**
A zero-mean isotropic Gaussian with standard deviation `std` in every coordinate.

Used both as the default Metropolis proposal (adding independent N(0, std²) noise to each
coordinate) and as a normalized, samplable reference distribution.

# Examples

```rust
use mini_ais::distributions::{IsotropicGaussian, SymmetricProposal};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let proposal: IsotropicGaussian<f64> = IsotropicGaussian::new(1.0);
let mut rng = SmallRng::seed_from_u64(7);
let candidate = proposal.propose(&[0.0, 0.0], &mut rng);
assert_eq!(candidate.len(), 2);
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsotropicGaussian<T: Float> {
    pub std: T,
    pub dim: usize,
}

impl<T: Float> IsotropicGaussian<T> {
    /// Creates a one-dimensional isotropic Gaussian with the specified standard deviation.
    pub fn new(std: T) -> Self {
        Self { std, dim: 1 }
    }

    /// Like [`IsotropicGaussian::new`], but rejects a non-positive or non-finite `std`.
    pub fn try_new(std: T) -> Result<Self> {
        check_scale("Gaussian standard deviation", std)?;
        Ok(Self::new(std))
    }

    /// Sets the dimension used when the Gaussian acts as a reference sampler.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }
}

impl<T: Float> SymmetricProposal<T> for IsotropicGaussian<T>
where
    StandardNormal: Distribution<T>,
{
    fn perturb<R: Rng + ?Sized>(&self, value: T, rng: &mut R) -> T {
        let z: T = StandardNormal.sample(rng);
        value + self.std * z
    }
}

impl<T: Float + FloatConst> Density<T> for IsotropicGaussian<T> {
    fn density(&self, x: &[T]) -> T {
        self.log_density(x).exp()
    }

    fn log_density(&self, x: &[T]) -> T {
        let two = T::one() + T::one();
        let var = self.std * self.std;
        let d = T::from(x.len()).unwrap_or_else(T::zero);
        let sq = x.iter().fold(T::zero(), |acc, &xi| acc + xi * xi);
        -sq / (two * var) - d / two * (two * T::PI() * var).ln()
    }
}

impl<T: Float> ReferenceSampler<T> for IsotropicGaussian<T>
where
    StandardNormal: Distribution<T>,
{
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<T> {
        (0..self.dim)
            .map(|_| {
                let z: T = StandardNormal.sample(rng);
                self.std * z
            })
            .collect()
    }
}

/**
An unnormalized Gaussian `exp(-0.5 * Σ ((x_i - mean) / std)²)` sharing `mean` and `std`
across coordinates.

Its normalizing constant is `(std * sqrt(2π))^d`, see
[`UnnormalizedGaussian::normalizing_constant`].
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnnormalizedGaussian<T: Float> {
    pub mean: T,
    pub std: T,
}

impl<T: Float> UnnormalizedGaussian<T> {
    pub fn new(mean: T, std: T) -> Self {
        Self { mean, std }
    }
}

impl<T: Float + FloatConst> UnnormalizedGaussian<T> {
    /// The integral of the density over `dim` dimensions.
    pub fn normalizing_constant(&self, dim: usize) -> T {
        let two = T::one() + T::one();
        (self.std * (two * T::PI()).sqrt()).powi(dim as i32)
    }
}

impl<T: Float> Density<T> for UnnormalizedGaussian<T> {
    fn density(&self, x: &[T]) -> T {
        self.log_density(x).exp()
    }

    fn log_density(&self, x: &[T]) -> T {
        let half = T::from(0.5).unwrap_or_else(T::zero);
        -half
            * x.iter().fold(T::zero(), |acc, &xi| {
                let z = (xi - self.mean) / self.std;
                acc + z * z
            })
    }
}

/// Adapts a closure `Fn(&[T]) -> T` returning a raw (non-log) density.
///
/// ```rust
/// use mini_ais::distributions::{Density, DensityFn};
///
/// let spike = DensityFn(|x: &[f64]| if x[0] == 0.0 { 1.0 } else { 0.0 });
/// assert_eq!(spike.density(&[0.0]), 1.0);
/// assert_eq!(spike.log_density(&[1.0]), f64::NEG_INFINITY);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct DensityFn<F>(pub F);

impl<T: Float, F: Fn(&[T]) -> T> Density<T> for DensityFn<F> {
    fn density(&self, x: &[T]) -> T {
        (self.0)(x)
    }
}

/// Adapts a closure `Fn(&[T]) -> T` returning a log-density.
#[derive(Debug, Clone, Copy)]
pub struct LogDensityFn<F>(pub F);

impl<T: Float, F: Fn(&[T]) -> T> Density<T> for LogDensityFn<F> {
    fn density(&self, x: &[T]) -> T {
        (self.0)(x).exp()
    }

    fn log_density(&self, x: &[T]) -> T {
        (self.0)(x)
    }
}
