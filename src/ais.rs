/*!
# Annealed Importance Sampling

[`AnnealedImportanceSampler`] draws weighted samples from an unnormalized target density f₀ by
annealing independent chains from an easy reference density fₙ through the intermediate
densities `f₀^β · fₙ^(1-β)` of a [`Schedule`].

Each chain

1. starts at an exact draw from the reference and a log-weight of 0,
2. walks the schedule from β = 0 to β = 1; at every transition from `β_from` to `β_to` it adds
   `log f_{β_to}(x) - log f_{β_from}(x)` to its log-weight and then moves `x` with the
   transition kernel targeting `f_{β_to}`,
3. emits its final state with weight `exp(log_weight)`.

Weighted averages over the samples estimate target expectations, and the mean weight
estimates `Z_target / Z_reference` (see [`SampleSet`]).

Chains run in parallel on rayon's thread pool. Chain `i` owns an RNG seeded with `seed + i`,
so a run is reproducible from its seed regardless of thread scheduling.

## Example Usage

```rust
use mini_ais::ais::AnnealedImportanceSampler;
use mini_ais::config::AisConfig;
use mini_ais::distributions::{Cauchy, UnnormalizedGaussian};
use mini_ais::schedule::Schedule;

let target = UnnormalizedGaussian::new(1.0, 1.0);
let reference = Cauchy::new(0.0, 1.0).unwrap();
let config = AisConfig::new(Schedule::linear(20).unwrap())
    .set_n_samples(8)
    .set_mcmc_steps(5)
    .set_seed(42);

let sampler = AnnealedImportanceSampler::new(target, reference, config).unwrap();
let samples = sampler.run().unwrap();
assert_eq!(samples.len(), 8);
assert!(samples.iter().all(|s| s.weight() >= 0.0));
```
*/

use indicatif::{ProgressBar, ProgressStyle};
use num_traits::Float;
use rand::{thread_rng, Rng};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::abort::{AbortSignal, NopAbortSignal};
use crate::annealed::AnnealedDensity;
use crate::config::AisConfig;
use crate::core::{run_chain, WeightedSample};
use crate::distributions::{Density, IsotropicGaussian, ReferenceSampler};
use crate::error::Result;
use crate::schedule::Schedule;
use crate::stats::SampleSet;
use crate::transition::{Metropolis, TransitionKernel};

/**
The annealed importance sampler, parameterized by:
- `F0`: the target density,
- `FN`: the reference density, which must also be samplable,
- `K`: the transition kernel, random-walk [`Metropolis`] by default.
*/
#[derive(Debug, Clone)]
pub struct AnnealedImportanceSampler<T, F0, FN, K = Metropolis<IsotropicGaussian<T>>>
where
    T: Float,
{
    /// Target, reference and their geometric interpolation.
    pub density: AnnealedDensity<F0, FN>,
    /// The kernel applied at every schedule transition.
    pub kernel: K,
    pub schedule: Schedule<T>,
    /// Number of independent chains.
    pub n_samples: usize,
    /// Kernel iterations per schedule transition.
    pub mcmc_steps: usize,
    /// Global random seed.
    pub seed: u64,
}

impl<T, F0, FN> AnnealedImportanceSampler<T, F0, FN>
where
    T: Float,
{
    /**
    Builds a sampler with the default Metropolis kernel, whose proposal standard deviation is
    `config.proposal_scale`.

    Fails with [`AisError::Config`](crate::error::AisError::Config) if any option is invalid.
    */
    pub fn new(target: F0, reference: FN, config: AisConfig<T>) -> Result<Self> {
        config.validate()?;
        let seed = config.seed.unwrap_or_else(|| thread_rng().gen::<u64>());
        Ok(Self {
            density: AnnealedDensity::new(target, reference),
            kernel: Metropolis::new(config.proposal_scale)?,
            schedule: config.schedule,
            n_samples: config.n_samples,
            mcmc_steps: config.mcmc_steps,
            seed,
        })
    }
}

impl<T, F0, FN, K> AnnealedImportanceSampler<T, F0, FN, K>
where
    T: Float,
{
    /// Replaces the transition kernel, keeping every other setting.
    pub fn with_kernel<K2>(self, kernel: K2) -> AnnealedImportanceSampler<T, F0, FN, K2> {
        AnnealedImportanceSampler {
            density: self.density,
            kernel,
            schedule: self.schedule,
            n_samples: self.n_samples,
            mcmc_steps: self.mcmc_steps,
            seed: self.seed,
        }
    }

    /// Sets a new global seed. Chain `i` is seeded with `seed + i`.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

impl<T, F0, FN, K> AnnealedImportanceSampler<T, F0, FN, K>
where
    T: Float + Send + Sync,
    F0: Density<T> + Sync,
    FN: Density<T> + ReferenceSampler<T> + Sync,
    K: TransitionKernel<T> + Sync,
{
    /// Runs all chains and returns one weighted sample per chain.
    ///
    /// Any evaluation error aborts the whole run. A chain whose weight underflows to zero is
    /// kept; a weight of `+inf` is kept and logged.
    pub fn run(&self) -> Result<SampleSet<T>> {
        self.run_chains(&NopAbortSignal, None)
    }

    /// Like [`run`](Self::run), with a progress bar counting finished chains.
    pub fn run_progress(&self) -> Result<SampleSet<T>> {
        let pb = ProgressBar::new(self.n_samples as u64);
        let style = ProgressStyle::default_bar()
            .template("{prefix} [{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.set_prefix("AIS chains");
        let samples = self.run_chains(&NopAbortSignal, Some(&pb));
        pb.finish_with_message("Done!");
        samples
    }

    /// Like [`run`](Self::run), but chains check `signal` between schedule transitions.
    ///
    /// Chains interrupted by the signal are discarded, so the returned set only contains fully
    /// annealed samples and may be shorter than `n_samples` (possibly empty).
    pub fn run_until<A: AbortSignal>(&self, signal: &A) -> Result<SampleSet<T>> {
        self.run_chains(signal, None)
    }

    #[tracing::instrument(
        skip_all,
        fields(
            n_samples = self.n_samples,
            n_betas = self.schedule.n_betas(),
            mcmc_steps = self.mcmc_steps,
            seed = self.seed
        )
    )]
    fn run_chains(
        &self,
        signal: &dyn AbortSignal,
        progress: Option<&ProgressBar>,
    ) -> Result<SampleSet<T>> {
        let finished: Vec<Option<WeightedSample<T>>> = (0..self.n_samples)
            .into_par_iter()
            .map(|i| -> Result<Option<WeightedSample<T>>> {
                let chain_seed = self.seed.wrapping_add(i as u64);
                let chain = run_chain(
                    &self.density,
                    &self.kernel,
                    &self.schedule,
                    self.mcmc_steps,
                    chain_seed,
                    signal,
                )?;
                if let Some(pb) = progress {
                    pb.inc(1);
                }
                Ok(chain.map(|chain| {
                    debug!(
                        chain = i,
                        log_weight = chain.log_weight.to_f64().unwrap_or(f64::NAN),
                        acceptance_rate = chain.acceptance_rate(),
                        "chain finished"
                    );
                    chain.into_sample()
                }))
            })
            .collect::<Result<_>>()?;

        let samples: SampleSet<T> = finished.into_iter().flatten().collect();
        let discarded = self.n_samples - samples.len();
        if discarded > 0 {
            warn!(discarded, kept = samples.len(), "chains aborted before completion");
        }
        let overflowed = samples
            .iter()
            .filter(|s| s.log_weight == T::infinity())
            .count();
        if overflowed > 0 {
            warn!(
                overflowed,
                "importance weights overflowed to infinity; check the schedule and mcmc_steps"
            );
        }
        match samples.effective_sample_size() {
            Ok(ess) => info!(
                n_samples = samples.len(),
                effective_sample_size = ess.to_f64().unwrap_or(f64::NAN),
                "annealing finished"
            ),
            Err(err) => info!(n_samples = samples.len(), %err, "annealing finished"),
        }
        Ok(samples)
    }
}
