//! Annealed importance sampling for unnormalized densities.
//!
//! Start with [`ais::AnnealedImportanceSampler`]; the weighted samples it returns are
//! summarized by [`stats::SampleSet`].

pub mod abort;
pub mod ais;
pub mod annealed;
pub mod config;
pub mod core;
pub mod distributions;
pub mod error;
pub mod io;
pub mod ks_test;
pub mod schedule;
pub mod stats;
pub mod transition;
