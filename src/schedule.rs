//! Annealing schedules: validated sequences of inverse temperatures β.
//!
//! A schedule always starts at β = 1 (the target) and ends at β = 0 (the reference) and is
//! strictly decreasing in between. Chains walk it backwards, from the reference end towards the
//! target end.

use num_traits::Float;

use crate::error::{ConfigError, Result};

/// A strictly decreasing sequence of betas from 1 (target) to 0 (reference).
#[derive(Debug, Clone, PartialEq)]
pub struct Schedule<T: Float> {
    betas: Vec<T>,
}

impl<T: Float> Schedule<T> {
    /// Validates an arbitrary schedule.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mini_ais::schedule::Schedule;
    ///
    /// assert!(Schedule::from_betas(vec![1.0, 0.3, 0.0]).is_ok());
    /// assert!(Schedule::from_betas(vec![0.0, 0.5, 1.0]).is_err());
    /// ```
    pub fn from_betas(betas: Vec<T>) -> Result<Self> {
        let as_f64 = |v: T| v.to_f64().unwrap_or(f64::NAN);
        if betas.len() < 2 {
            return Err(ConfigError::ScheduleTooShort { len: betas.len() }.into());
        }
        for (index, &value) in betas.iter().enumerate() {
            if !(value >= T::zero() && value <= T::one()) {
                return Err(ConfigError::BetaOutOfRange {
                    index,
                    value: as_f64(value),
                }
                .into());
            }
        }
        let (first, last) = (betas[0], betas[betas.len() - 1]);
        if first != T::one() || last != T::zero() {
            return Err(ConfigError::BadEndpoints {
                first: as_f64(first),
                last: as_f64(last),
            }
            .into());
        }
        for (index, pair) in betas.windows(2).enumerate() {
            if pair[1] >= pair[0] {
                return Err(ConfigError::NotStrictlyDecreasing {
                    index: index + 1,
                    value: as_f64(pair[1]),
                    previous: as_f64(pair[0]),
                }
                .into());
            }
        }
        Ok(Self { betas })
    }

    /// `len` betas evenly spaced from 1 down to 0.
    pub fn linear(len: usize) -> Result<Self> {
        if len < 2 {
            return Err(ConfigError::ScheduleTooShort { len }.into());
        }
        let last = T::from(len - 1).ok_or(ConfigError::ScheduleTooShort { len })?;
        let betas = (0..len)
            .map(|i| T::one() - T::from(i).unwrap_or(last) / last)
            .collect();
        Self::from_betas(betas)
    }

    /// `len` betas following `(1 - i / (len - 1))^exponent`.
    ///
    /// Exponents above 1 spend more of the schedule close to the reference, where the
    /// intermediate densities change fastest for peaked targets.
    pub fn power(len: usize, exponent: T) -> Result<Self> {
        if !(exponent > T::zero() && exponent.is_finite()) {
            return Err(ConfigError::InvalidScale {
                what: "schedule exponent",
                value: exponent.to_f64().unwrap_or(f64::NAN),
            }
            .into());
        }
        if len < 2 {
            return Err(ConfigError::ScheduleTooShort { len }.into());
        }
        let last = T::from(len - 1).ok_or(ConfigError::ScheduleTooShort { len })?;
        let betas = (0..len)
            .map(|i| {
                let frac = T::from(i).unwrap_or(last) / last;
                (T::one() - frac).powf(exponent)
            })
            .collect();
        Self::from_betas(betas)
    }

    pub fn betas(&self) -> &[T] {
        &self.betas
    }

    /// Number of betas, endpoints included. Always at least 2.
    pub fn n_betas(&self) -> usize {
        self.betas.len()
    }

    /// Number of annealing transitions a chain performs.
    pub fn n_transitions(&self) -> usize {
        self.betas.len() - 1
    }

    /// Iterates over `(beta_from, beta_to)` pairs in walking order, from the reference end
    /// (`beta_from = 0` on the first pair) to the target end (`beta_to = 1` on the last).
    pub fn transitions(&self) -> impl Iterator<Item = (T, T)> + '_ {
        (1..self.betas.len())
            .rev()
            .map(move |k| (self.betas[k], self.betas[k - 1]))
    }
}
