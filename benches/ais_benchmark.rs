use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mini_ais::ais::AnnealedImportanceSampler;
use mini_ais::config::AisConfig;
use mini_ais::distributions::{Cauchy, UnnormalizedGaussian};
use mini_ais::schedule::Schedule;
use mini_ais::transition::ComponentwiseMetropolis;

fn config(n_betas: usize, seed: u64) -> AisConfig<f64> {
    AisConfig::new(Schedule::linear(n_betas).unwrap())
        .set_n_samples(64)
        .set_mcmc_steps(10)
        .set_seed(seed)
}

fn criterion_benchmark(c: &mut Criterion) {
    let target = UnnormalizedGaussian::new(3.0, 1.0);

    let reference = Cauchy::new(0.0, 1.0).unwrap();
    let sampler = AnnealedImportanceSampler::new(target, reference, config(100, 42)).unwrap();
    c.bench_function("ais metropolis 1d, 100 betas", |b| {
        b.iter(|| black_box(sampler.run().unwrap()))
    });

    let reference = Cauchy::new(0.0, 1.0).unwrap().with_dim(10);
    let sampler = AnnealedImportanceSampler::new(target, reference, config(100, 42)).unwrap();
    c.bench_function("ais metropolis 10d, 100 betas", |b| {
        b.iter(|| black_box(sampler.run().unwrap()))
    });

    let sampler = sampler.with_kernel(ComponentwiseMetropolis::new(1.0).unwrap());
    c.bench_function("ais componentwise 10d, 100 betas", |b| {
        b.iter(|| black_box(sampler.run().unwrap()))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
