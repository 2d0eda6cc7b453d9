//! Error types shared by every stage of an annealing run.

use thiserror::Error;

/// Problems with the inputs of a run, detected before any chain starts.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("schedule needs at least 2 betas, got {len}")]
    ScheduleTooShort { len: usize },

    #[error("beta[{index}] = {value} lies outside [0, 1]")]
    BetaOutOfRange { index: usize, value: f64 },

    #[error("schedule must run from beta = 1 (target) to beta = 0 (reference), got {first} .. {last}")]
    BadEndpoints { first: f64, last: f64 },

    #[error("schedule must be strictly decreasing: beta[{index}] = {value} does not drop below {previous}")]
    NotStrictlyDecreasing {
        index: usize,
        value: f64,
        previous: f64,
    },

    #[error("annealing parameter beta = {0} lies outside [0, 1]")]
    InvalidBeta(f64),

    #[error("{what} must be positive and finite, got {value}")]
    InvalidScale { what: &'static str, value: f64 },

    #[error("sample count must be positive")]
    ZeroSamples,

    #[error("number of MCMC steps per transition must be positive")]
    ZeroSteps,
}

/// Errors surfaced by sampling and aggregation.
#[derive(Debug, Error)]
pub enum AisError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// A density evaluator produced a negative or NaN value.
    #[error("density evaluator returned invalid value {value} while evaluating {context}")]
    Evaluation { value: f64, context: &'static str },

    #[error("sample set is empty")]
    EmptySampleSet,

    /// Aggregate-level numeric degeneracy (all weights zero, overflow, ...).
    #[error("numerically degenerate sample set: {reason}")]
    Degenerate { reason: &'static str },

    #[error("samples have inconsistent dimensions: {0}")]
    Shape(#[from] ndarray::ShapeError),

    #[cfg(feature = "csv")]
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[cfg(feature = "csv")]
    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, AisError>;
