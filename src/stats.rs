//! Estimators computed from a set of weighted samples.
//!
//! Every estimator is a pure, order-independent reduction over the [`SampleSet`]. Weights are
//! combined relative to the largest log-weight, so finite log-weights far outside the range of
//! `exp` still aggregate correctly.

use ndarray::{Array1, Array2, ErrorKind, ShapeError};
use num_traits::Float;

use crate::core::WeightedSample;
use crate::distributions::{checked_density, Density};
use crate::error::{AisError, Result};

/// The weighted samples produced by an annealing run. Owned by the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleSet<T> {
    pub samples: Vec<WeightedSample<T>>,
}

impl<T> From<Vec<WeightedSample<T>>> for SampleSet<T> {
    fn from(samples: Vec<WeightedSample<T>>) -> Self {
        Self { samples }
    }
}

impl<T: Float> SampleSet<T> {
    pub fn new(samples: Vec<WeightedSample<T>>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WeightedSample<T>> {
        self.samples.iter()
    }

    pub fn log_weights(&self) -> Array1<T> {
        self.samples.iter().map(|s| s.log_weight).collect()
    }

    pub fn weights(&self) -> Array1<T> {
        self.samples.iter().map(WeightedSample::weight).collect()
    }

    /// The largest log-weight, `-inf` if every weight is zero.
    pub fn max_log_weight(&self) -> Result<T> {
        if self.is_empty() {
            return Err(AisError::EmptySampleSet);
        }
        Ok(self
            .samples
            .iter()
            .fold(T::neg_infinity(), |acc, s| acc.max(s.log_weight)))
    }

    /// Weights divided by the largest weight, all in `[0, 1]`, together with that largest
    /// log-weight. Fails when the set is empty, all weights are zero, or a weight is `+inf`.
    fn shifted_weights(&self) -> Result<(Vec<T>, T)> {
        let max = self.max_log_weight()?;
        if max == T::neg_infinity() {
            return Err(AisError::Degenerate {
                reason: "all weights are zero",
            });
        }
        if max == T::infinity() {
            return Err(AisError::Degenerate {
                reason: "weight sum overflows to infinity",
            });
        }
        let shifted = self
            .samples
            .iter()
            .map(|s| (s.log_weight - max).exp())
            .collect();
        Ok((shifted, max))
    }

    /// Self-normalized weights summing to one.
    pub fn normalized_weights(&self) -> Result<Array1<T>> {
        let (shifted, _) = self.shifted_weights()?;
        let total = shifted.iter().fold(T::zero(), |acc, &w| acc + w);
        Ok(shifted.into_iter().map(|w| w / total).collect())
    }

    /**
    Estimates `E_target[a(X)]` as `Σ wᵢ a(xᵢ) / Σ wᵢ`.

    # Errors

    [`AisError::EmptySampleSet`] for an empty set, [`AisError::Degenerate`] if all weights are
    zero, a weight is infinite, or the weighted average is not finite.

    # Examples

    ```rust
    use mini_ais::core::WeightedSample;
    use mini_ais::stats::SampleSet;

    let set = SampleSet::new(vec![
        WeightedSample::new(vec![1.0], 0.0),
        WeightedSample::new(vec![3.0], 2f64.ln()),
    ]);
    let mean = set.expectation(|x| x[0]).unwrap();
    assert!((mean - 7.0 / 3.0).abs() < 1e-12);
    ```
    */
    pub fn expectation<A>(&self, statistic: A) -> Result<T>
    where
        A: Fn(&[T]) -> T,
    {
        let (shifted, _) = self.shifted_weights()?;
        let (num, den) = self.samples.iter().zip(shifted.iter()).fold(
            (T::zero(), T::zero()),
            |(num, den), (s, &w)| {
                if w == T::zero() {
                    (num, den)
                } else {
                    (num + w * statistic(&s.state), den + w)
                }
            },
        );
        let value = num / den;
        if !value.is_finite() {
            return Err(AisError::Degenerate {
                reason: "weighted average is not finite",
            });
        }
        Ok(value)
    }

    /// `log(mean(wᵢ))`, the log of [`SampleSet::normalizing_constant_ratio`], computed without
    /// leaving log space.
    pub fn log_normalizing_constant_ratio(&self) -> Result<T> {
        let (shifted, max) = self.shifted_weights()?;
        let n = T::from(self.len()).ok_or(AisError::Degenerate {
            reason: "sample count is not representable",
        })?;
        let sum = shifted.iter().fold(T::zero(), |acc, &w| acc + w);
        Ok(max + sum.ln() - n.ln())
    }

    /**
    Estimates `Z_target / Z_reference` as the mean importance weight.

    # Errors

    [`AisError::EmptySampleSet`] for an empty set, [`AisError::Degenerate`] if every weight is
    zero or the mean underflows to zero or overflows.
    */
    pub fn normalizing_constant_ratio(&self) -> Result<T> {
        let ratio = self.log_normalizing_constant_ratio()?.exp();
        if !ratio.is_finite() {
            return Err(AisError::Degenerate {
                reason: "mean weight overflows to infinity",
            });
        }
        if ratio == T::zero() {
            return Err(AisError::Degenerate {
                reason: "mean weight underflows to zero",
            });
        }
        Ok(ratio)
    }

    /**
    Estimates the normalized target density at `x` as `f₀(x) / (Z_target / Z_reference)`.

    **Precondition:** this is the normalized target density only if the reference density is
    itself normalized (`Z_reference = 1`). Otherwise the result is off by the factor
    `Z_reference`.
    */
    pub fn density_at<D>(&self, x: &[T], target: &D) -> Result<T>
    where
        D: Density<T> + ?Sized,
    {
        let ratio = self.normalizing_constant_ratio()?;
        let density = checked_density(target, x, "target density")? / ratio;
        if !density.is_finite() {
            return Err(AisError::Degenerate {
                reason: "density estimate is not finite",
            });
        }
        Ok(density)
    }

    /// Kish's effective sample size `(Σ wᵢ)² / Σ wᵢ²`, between 1 and `len()`.
    pub fn effective_sample_size(&self) -> Result<T> {
        let (shifted, _) = self.shifted_weights()?;
        let (sum, sum_sq) = shifted
            .iter()
            .fold((T::zero(), T::zero()), |(s, s2), &w| (s + w, s2 + w * w));
        Ok(sum * sum / sum_sq)
    }

    /// Stacks all states into an `n_samples × dim` array.
    pub fn states(&self) -> Result<Array2<T>> {
        let dim = self.samples.first().map_or(0, |s| s.state.len());
        if self.samples.iter().any(|s| s.state.len() != dim) {
            return Err(ShapeError::from_kind(ErrorKind::IncompatibleShape).into());
        }
        let flat: Vec<T> = self
            .samples
            .iter()
            .flat_map(|s| s.state.iter().copied())
            .collect();
        Ok(Array2::from_shape_vec((self.len(), dim), flat)?)
    }

    /// Componentwise weighted mean of the states.
    pub fn weighted_mean(&self) -> Result<Array1<T>>
    where
        T: 'static,
    {
        let weights = self.normalized_weights()?;
        let states = self.states()?;
        Ok(states.t().dot(&weights))
    }
}

impl<T> IntoIterator for SampleSet<T> {
    type Item = WeightedSample<T>;
    type IntoIter = std::vec::IntoIter<WeightedSample<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.into_iter()
    }
}

impl<T> FromIterator<WeightedSample<T>> for SampleSet<T> {
    fn from_iter<I: IntoIterator<Item = WeightedSample<T>>>(iter: I) -> Self {
        Self {
            samples: iter.into_iter().collect(),
        }
    }
}
