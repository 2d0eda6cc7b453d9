/*!
# Transition Kernels

A transition kernel moves a state while (approximately) leaving a given unnormalized density
invariant. The annealing sampler only relies on the [`TransitionKernel`] contract, so kernels
can be swapped without touching the weight accumulation.

Two random-walk kernels are provided:

- [`Metropolis`]: proposes a move of the whole state with a [`SymmetricProposal`]
  (isotropic Gaussian by default) and accepts it with probability
  `min(1, p(x') / p(x))`.
- [`ComponentwiseMetropolis`]: a Metropolis-within-Gibbs sweep that updates one coordinate at
  a time.

Both evaluate the acceptance test in log space, and both treat zero densities specially: a
proposal into a zero-density region is always rejected, while a chain sitting at zero density
always moves.

## Example Usage

```rust
use mini_ais::error::Result;
use mini_ais::transition::{Metropolis, TransitionKernel};
use rand::rngs::SmallRng;
use rand::SeedableRng;

let kernel = Metropolis::new(1.0).unwrap();
let mut rng = SmallRng::seed_from_u64(42);
let log_density = |x: &[f64]| -> Result<f64> { Ok(-0.5 * x[0] * x[0]) };
let outcome = kernel.step(vec![3.0], log_density, 20, &mut rng).unwrap();
assert_eq!(outcome.state.len(), 1);
assert_eq!(outcome.proposed, 20);
```
*/

use num_traits::Float;
use rand::Rng;
use rand_distr::{Distribution, Standard};

use crate::distributions::{IsotropicGaussian, SymmetricProposal};
use crate::error::Result;

/// The state reached after a call to [`TransitionKernel::step`], with acceptance counts.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome<T> {
    pub state: Vec<T>,
    pub accepted: usize,
    pub proposed: usize,
}

impl<T> StepOutcome<T> {
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }
}

/// A Markov chain kernel targeting an unnormalized log-density.
///
/// Implementations must draw all randomness from `rng` and keep no state between calls, so
/// that a run is reproducible from its seed alone.
pub trait TransitionKernel<T: Float> {
    /// Runs `steps` iterations of the kernel starting from `state`.
    ///
    /// `log_density` may return `-inf` (zero density); any error it returns is propagated.
    fn step<L, R>(
        &self,
        state: Vec<T>,
        log_density: L,
        steps: usize,
        rng: &mut R,
    ) -> Result<StepOutcome<T>>
    where
        L: Fn(&[T]) -> Result<T>,
        R: Rng + ?Sized;
}

/// Metropolis acceptance test in log space.
///
/// A candidate at zero density is never accepted; a chain at zero density accepts any
/// candidate that is not itself at zero density.
pub(crate) fn accept<T, R>(current_lp: T, proposed_lp: T, rng: &mut R) -> bool
where
    T: Float,
    R: Rng + ?Sized,
    Standard: Distribution<T>,
{
    if proposed_lp == T::neg_infinity() {
        return false;
    }
    if current_lp == T::neg_infinity() {
        return true;
    }
    let u: T = rng.gen();
    u.ln() < proposed_lp - current_lp
}

/**
Random-walk Metropolis with a symmetric proposal `Q`.

# Examples

```rust
use mini_ais::distributions::IsotropicGaussian;
use mini_ais::transition::Metropolis;

// Equivalent ways to build a kernel with N(0, 0.5²) proposals.
let a = Metropolis::new(0.5).unwrap();
let b = Metropolis::with_proposal(IsotropicGaussian::new(0.5));
assert_eq!(a, b);
```
*/
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metropolis<Q> {
    /// The proposal distribution used to generate candidate states.
    pub proposal: Q,
}

impl<T: Float> Metropolis<IsotropicGaussian<T>> {
    /// A Metropolis kernel with isotropic Gaussian proposals of standard deviation `scale`.
    ///
    /// Fails unless `scale` is positive and finite.
    pub fn new(scale: T) -> Result<Self> {
        Ok(Self {
            proposal: IsotropicGaussian::try_new(scale)?,
        })
    }
}

impl<Q> Metropolis<Q> {
    pub fn with_proposal(proposal: Q) -> Self {
        Self { proposal }
    }
}

impl<T, Q> TransitionKernel<T> for Metropolis<Q>
where
    T: Float,
    Q: SymmetricProposal<T>,
    Standard: Distribution<T>,
{
    /**
    Performs `steps` Metropolis updates.

    Each update proposes `x' = x + ε` and accepts it iff `ln(u) < log p(x') - log p(x)` with
    `u ~ Uniform(0, 1)`. The log-density of the current state is cached, so every update costs
    a single evaluation.
    */
    fn step<L, R>(
        &self,
        state: Vec<T>,
        log_density: L,
        steps: usize,
        rng: &mut R,
    ) -> Result<StepOutcome<T>>
    where
        L: Fn(&[T]) -> Result<T>,
        R: Rng + ?Sized,
    {
        let mut current = state;
        let mut current_lp = log_density(&current)?;
        let mut accepted = 0;
        for _ in 0..steps {
            let proposed = self.proposal.propose(&current, rng);
            let proposed_lp = log_density(&proposed)?;
            if accept(current_lp, proposed_lp, rng) {
                current = proposed;
                current_lp = proposed_lp;
                accepted += 1;
            }
        }
        Ok(StepOutcome {
            state: current,
            accepted,
            proposed: steps,
        })
    }
}

/// Metropolis-within-Gibbs: every sweep proposes a move for each coordinate in turn, keeping
/// the others fixed. `steps` counts sweeps.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentwiseMetropolis<Q> {
    pub proposal: Q,
}

impl<T: Float> ComponentwiseMetropolis<IsotropicGaussian<T>> {
    pub fn new(scale: T) -> Result<Self> {
        Ok(Self {
            proposal: IsotropicGaussian::try_new(scale)?,
        })
    }
}

impl<T, Q> TransitionKernel<T> for ComponentwiseMetropolis<Q>
where
    T: Float,
    Q: SymmetricProposal<T>,
    Standard: Distribution<T>,
{
    fn step<L, R>(
        &self,
        state: Vec<T>,
        log_density: L,
        steps: usize,
        rng: &mut R,
    ) -> Result<StepOutcome<T>>
    where
        L: Fn(&[T]) -> Result<T>,
        R: Rng + ?Sized,
    {
        let mut current = state;
        let mut current_lp = log_density(&current)?;
        let mut accepted = 0;
        for _ in 0..steps {
            for i in 0..current.len() {
                let old = current[i];
                current[i] = self.proposal.perturb(old, rng);
                let proposed_lp = log_density(&current)?;
                if accept(current_lp, proposed_lp, rng) {
                    current_lp = proposed_lp;
                    accepted += 1;
                } else {
                    current[i] = old;
                }
            }
        }
        Ok(StepOutcome {
            proposed: steps * current.len(),
            state: current,
            accepted,
        })
    }
}
