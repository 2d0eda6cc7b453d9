//! Anneals from a Cauchy(0, 0.5) reference to an unnormalized Gaussian centered at 10 and
//! reports the estimated mean and normalizing constant.

use mini_ais::ais::AnnealedImportanceSampler;
use mini_ais::config::AisConfig;
use mini_ais::distributions::{Cauchy, UnnormalizedGaussian};
use mini_ais::schedule::Schedule;
use rand::{thread_rng, Rng};
use std::error::Error;

#[cfg(feature = "csv")]
use mini_ais::io::csv::save_csv;

fn main() -> Result<(), Box<dyn Error>> {
    const N_BETAS: usize = 200;
    const N_SAMPLES: usize = 500;
    const MCMC_STEPS: usize = 20;
    let seed: u64 = thread_rng().gen();

    let target = UnnormalizedGaussian::new(10.0, 2.0);
    let reference = Cauchy::new(0.0, 0.5)?;
    let config = AisConfig::new(Schedule::linear(N_BETAS)?)
        .set_n_samples(N_SAMPLES)
        .set_mcmc_steps(MCMC_STEPS)
        .set_seed(seed);

    let sampler = AnnealedImportanceSampler::new(target, reference, config)?;
    let samples = sampler.run_progress()?;

    let mean = samples.expectation(|x| x[0])?;
    let z = samples.normalizing_constant_ratio()?;
    let ess = samples.effective_sample_size()?;

    println!("Generated {} weighted samples (seed {seed})", samples.len());
    println!("Estimated mean: {mean:.3} (true value 10)");
    println!(
        "Estimated normalizing constant: {z:.3} (true value {:.3})",
        target.normalizing_constant(1)
    );
    println!("Effective sample size: {ess:.1}");

    #[cfg(feature = "csv")]
    {
        save_csv(&samples, "ais_samples.csv")?;
        println!("Saved samples to ais_samples.csv");
    }

    Ok(())
}
