//! Run configuration for [`AnnealedImportanceSampler`](crate::ais::AnnealedImportanceSampler).

use num_traits::Float;

use crate::error::{ConfigError, Result};
use crate::schedule::Schedule;

pub const DEFAULT_N_SAMPLES: usize = 100;
pub const DEFAULT_MCMC_STEPS: usize = 20;

/**
Options recognized by an annealing run.

- `schedule`: annealing resolution and shape.
- `n_samples`: number of independent chains, one weighted sample each.
- `mcmc_steps`: kernel iterations per schedule transition.
- `proposal_scale`: standard deviation of the default Metropolis proposal. Ignored when a
  custom kernel is installed with
  [`with_kernel`](crate::ais::AnnealedImportanceSampler::with_kernel).
- `seed`: global seed; chain `i` is seeded with `seed + i`. Drawn from the thread RNG when
  unset.

# Examples

```rust
use mini_ais::config::AisConfig;
use mini_ais::schedule::Schedule;

let config = AisConfig::new(Schedule::<f64>::linear(200).unwrap())
    .set_n_samples(100)
    .set_mcmc_steps(20)
    .set_seed(42);
assert!(config.validate().is_ok());
```
*/
#[derive(Debug, Clone, PartialEq)]
pub struct AisConfig<T: Float> {
    pub schedule: Schedule<T>,
    pub n_samples: usize,
    pub mcmc_steps: usize,
    pub proposal_scale: T,
    pub seed: Option<u64>,
}

impl<T: Float> AisConfig<T> {
    pub fn new(schedule: Schedule<T>) -> Self {
        Self {
            schedule,
            n_samples: DEFAULT_N_SAMPLES,
            mcmc_steps: DEFAULT_MCMC_STEPS,
            proposal_scale: T::one(),
            seed: None,
        }
    }

    pub fn set_n_samples(mut self, n_samples: usize) -> Self {
        self.n_samples = n_samples;
        self
    }

    pub fn set_mcmc_steps(mut self, mcmc_steps: usize) -> Self {
        self.mcmc_steps = mcmc_steps;
        self
    }

    pub fn set_proposal_scale(mut self, proposal_scale: T) -> Self {
        self.proposal_scale = proposal_scale;
        self
    }

    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Checks every option. The schedule is validated on construction.
    pub fn validate(&self) -> Result<()> {
        if self.n_samples == 0 {
            return Err(ConfigError::ZeroSamples.into());
        }
        if self.mcmc_steps == 0 {
            return Err(ConfigError::ZeroSteps.into());
        }
        if !(self.proposal_scale > T::zero() && self.proposal_scale.is_finite()) {
            return Err(ConfigError::InvalidScale {
                what: "proposal scale",
                value: self.proposal_scale.to_f64().unwrap_or(f64::NAN),
            }
            .into());
        }
        Ok(())
    }
}
