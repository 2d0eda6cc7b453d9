//! Per-chain state of an annealing run and the loop that walks one chain through a schedule.

use num_traits::Float;
use rand::rngs::SmallRng;
use rand::SeedableRng;

use crate::abort::AbortSignal;
use crate::annealed::AnnealedDensity;
use crate::distributions::{Density, ReferenceSampler};
use crate::error::{AisError, Result};
use crate::schedule::Schedule;
use crate::transition::TransitionKernel;

/// The terminal state of one chain together with its importance weight, stored in log space.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedSample<T> {
    pub state: Vec<T>,
    pub log_weight: T,
}

impl<T: Float> WeightedSample<T> {
    pub fn new(state: Vec<T>, log_weight: T) -> Self {
        Self { state, log_weight }
    }

    /// `exp(log_weight)`. May underflow to 0 or overflow to `+inf`; neither is clamped.
    pub fn weight(&self) -> T {
        self.log_weight.exp()
    }
}

/// One independent annealing chain: a current state, its running log-weight and its own RNG.
///
/// Chains share nothing mutable, so any number of them can advance concurrently.
#[derive(Debug, Clone)]
pub struct AnnealingChain<T> {
    /// The current state of the chain.
    pub current_state: Vec<T>,
    /// Accumulated log importance weight.
    pub log_weight: T,
    /// The chain-specific random seed.
    pub seed: u64,
    /// The random number generator for this chain.
    pub rng: SmallRng,
    accepted: usize,
    proposed: usize,
}

impl<T: Float> AnnealingChain<T> {
    /// Starts a chain at an exact draw from the reference distribution with log-weight 0.
    pub fn new<S: ReferenceSampler<T> + ?Sized>(reference: &S, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let current_state = reference.sample(&mut rng);
        Self {
            current_state,
            log_weight: T::zero(),
            seed,
            rng,
            accepted: 0,
            proposed: 0,
        }
    }

    /**
    Performs one annealing transition from `beta_from` to `beta_to` (the next beta towards the
    target):

    1. `log_weight += log f_{beta_to}(x) - log f_{beta_from}(x)`,
    2. `x <- kernel(x)` with `mcmc_steps` iterations targeting `f_{beta_to}`.

    Once the log-weight is `-inf` the weight is exactly zero and stays there.
    */
    pub fn advance<F0, FN, K>(
        &mut self,
        density: &AnnealedDensity<F0, FN>,
        kernel: &K,
        beta_from: T,
        beta_to: T,
        mcmc_steps: usize,
    ) -> Result<()>
    where
        F0: Density<T>,
        FN: Density<T>,
        K: TransitionKernel<T>,
    {
        if self.log_weight != T::neg_infinity() {
            let increment = density.log_evaluate(&self.current_state, beta_to)?
                - density.log_evaluate(&self.current_state, beta_from)?;
            let log_weight = self.log_weight + increment;
            if log_weight.is_nan() {
                return Err(AisError::Evaluation {
                    value: f64::NAN,
                    context: "log importance weight",
                });
            }
            self.log_weight = log_weight;
        }

        let state = std::mem::take(&mut self.current_state);
        let outcome = kernel.step(
            state,
            density.log_density_at(beta_to),
            mcmc_steps,
            &mut self.rng,
        )?;
        self.current_state = outcome.state;
        self.accepted += outcome.accepted;
        self.proposed += outcome.proposed;
        Ok(())
    }

    /// Fraction of accepted kernel proposals over the chain's lifetime so far.
    pub fn acceptance_rate(&self) -> f64 {
        if self.proposed == 0 {
            0.0
        } else {
            self.accepted as f64 / self.proposed as f64
        }
    }

    pub fn into_sample(self) -> WeightedSample<T> {
        WeightedSample::new(self.current_state, self.log_weight)
    }
}

/// Walks a fresh chain seeded with `seed` through every transition of `schedule`.
///
/// Returns `Ok(None)` if `signal` fires before the chain reaches the target end; the partial
/// chain is dropped.
pub fn run_chain<T, F0, FN, K>(
    density: &AnnealedDensity<F0, FN>,
    kernel: &K,
    schedule: &Schedule<T>,
    mcmc_steps: usize,
    seed: u64,
    signal: &dyn AbortSignal,
) -> Result<Option<AnnealingChain<T>>>
where
    T: Float,
    F0: Density<T>,
    FN: Density<T> + ReferenceSampler<T>,
    K: TransitionKernel<T>,
{
    let mut chain = AnnealingChain::new(&density.reference, seed);
    for (beta_from, beta_to) in schedule.transitions() {
        if signal.is_aborted() {
            return Ok(None);
        }
        chain.advance(density, kernel, beta_from, beta_to, mcmc_steps)?;
    }
    Ok(Some(chain))
}
