//! A minimal two-sample Kolmogorov–Smirnov test, used to check that transition kernels and
//! annealing runs reproduce a known distribution.
//!
//! The p-value approximation follows *Numerical Recipes* (Third Edition), as in the
//! `kolmogorov_smirnov` crate.

use std::cmp::Ordering;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum KsError {
    #[error("expected sample {0} to be non-empty")]
    EmptySample(usize),

    #[error("p-value approximation needs more than 7 observations per sample, got {0} and {1}")]
    SampleTooSmall(usize, usize),

    #[error("bad z = {0} for the KS distribution function")]
    BadZ(f64),
}

/// The outcome of a two-sample KS test at significance `level`.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    pub is_rejected: bool,
    pub statistic: f64,
    pub p_value: f64,
    pub level: f64,
}

/// Tests the null hypothesis that both samples come from the same distribution. Both slices
/// are sorted in place.
pub fn two_sample_ks_test(
    sample_1: &mut [f64],
    sample_2: &mut [f64],
    level: f64,
) -> Result<TestResult, KsError> {
    let statistic = ks_statistic(sample_1, sample_2)?;
    let p_value = ks_p_value(statistic, sample_1.len(), sample_2.len())?;
    Ok(TestResult {
        is_rejected: p_value < level,
        statistic,
        p_value,
        level,
    })
}

/// The largest distance between the two empirical distribution functions.
fn ks_statistic(sample_1: &mut [f64], sample_2: &mut [f64]) -> Result<f64, KsError> {
    if sample_1.is_empty() {
        return Err(KsError::EmptySample(1));
    }
    if sample_2.is_empty() {
        return Err(KsError::EmptySample(2));
    }
    sample_1.sort_unstable_by(cmp_f64);
    sample_2.sort_unstable_by(cmp_f64);

    let (n, m) = (sample_1.len(), sample_2.len());
    let (mut i, mut j) = (0, 0);
    let mut max_diff: f64 = 0.0;
    // Once either sample is exhausted the distance can only shrink.
    while i < n && j < m {
        let x = sample_1[i].min(sample_2[j]);
        while i < n && sample_1[i] <= x {
            i += 1;
        }
        while j < m && sample_2[j] <= x {
            j += 1;
        }
        let diff = (i as f64 / n as f64 - j as f64 / m as f64).abs();
        max_diff = max_diff.max(diff);
    }
    Ok(max_diff)
}

fn ks_p_value(statistic: f64, n1: usize, n2: usize) -> Result<f64, KsError> {
    if n1 <= 7 || n2 <= 7 {
        return Err(KsError::SampleTooSmall(n1, n2));
    }
    let (n1, n2) = (n1 as f64, n2 as f64);
    let z = (n1 * n2 / (n1 + n2)).sqrt() * statistic;
    qks(z)
}

/// CDF of the Kolmogorov distribution.
fn pks(z: f64) -> Result<f64, KsError> {
    if z < 0. {
        return Err(KsError::BadZ(z));
    }
    if z == 0. {
        return Ok(0.);
    }
    if z < 1.18 {
        let y = (-1.233_700_550_136_169_7 / z.powi(2)).exp();
        return Ok(2.256_758_334_191_025
            * (-y.ln()).sqrt()
            * (y + y.powf(9.) + y.powf(25.) + y.powf(49.)));
    }
    let x = (-2. * z.powi(2)).exp();
    Ok(1. - 2. * (x - x.powf(4.) + x.powf(9.)))
}

/// Complementary CDF of the Kolmogorov distribution.
fn qks(z: f64) -> Result<f64, KsError> {
    if z < 0. {
        return Err(KsError::BadZ(z));
    }
    if z == 0. {
        return Ok(1.);
    }
    if z < 1.18 {
        return Ok(1. - pks(z)?);
    }
    let x = (-2. * z.powi(2)).exp();
    Ok(2. * (x - x.powf(4.) + x.powf(9.)))
}

/// Orders NaN after every other value.
fn cmp_f64(a: &f64, b: &f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statistic_partial_overlap() {
        let mut s1 = [1.0, 2.0, 3.0];
        let mut s2 = [2.0, 3.0, 4.0];
        let d = ks_statistic(&mut s1, &mut s2).unwrap();
        assert!((d - 1.0 / 3.0).abs() < 1e-9, "Expected D ~ 1/3, got {d}");

        let mut s1 = [0.0, 1.0, 2.0, 3.0];
        let mut s2 = [1.0, 2.0, 3.0, 4.0];
        let d = ks_statistic(&mut s1, &mut s2).unwrap();
        assert!((d - 0.25).abs() < 1e-9, "Expected 0.25, got {d}");
    }

    #[test]
    fn statistic_extremes() {
        let mut s1 = [1.0, 2.0, 3.0];
        let mut s2 = [3.0, 1.0, 2.0];
        assert_eq!(ks_statistic(&mut s1, &mut s2).unwrap(), 0.0);

        let mut s1 = [1.0, 2.0, 3.0];
        let mut s2 = [10.0, 11.0, 12.0];
        assert_eq!(ks_statistic(&mut s1, &mut s2).unwrap(), 1.0);

        let mut s1 = [2.0];
        let mut s2 = [5.0];
        assert_eq!(ks_statistic(&mut s1, &mut s2).unwrap(), 1.0);
    }

    #[test]
    fn statistic_with_ties() {
        let mut s1 = [1.0, 1.0, 1.0, 2.0, 2.0];
        let mut s2 = [1.0, 1.0, 2.0, 2.0, 2.0];
        let d = ks_statistic(&mut s1, &mut s2).unwrap();
        assert!((d - 0.2).abs() < 1e-9, "Expected ~0.2, got {d}");
    }

    #[test]
    fn p_value_of_near_identical_samples() {
        let mut s1: Vec<f64> = [0.12, 0.25, 0.25, 0.78, 0.99, 0.33, 0.15, 0.5]
            .iter()
            .cycle()
            .take(8 * 20)
            .copied()
            .collect();
        let mut s2: Vec<f64> = [0.12, 0.25, 0.25, 0.78, 0.99, 0.33, 0.15, 0.51]
            .iter()
            .cycle()
            .take(8 * 20)
            .copied()
            .collect();

        let result = two_sample_ks_test(&mut s1, &mut s2, 0.05).unwrap();
        assert!((result.statistic - 0.125).abs() < 1e-9, "D mismatch");
        assert!((result.p_value - 0.1641).abs() < 1e-4, "p-value mismatch");
        assert!(!result.is_rejected);
    }

    #[test]
    fn empty_and_small_samples_are_errors() {
        let mut empty: [f64; 0] = [];
        let mut s = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(
            ks_statistic(&mut empty, &mut s),
            Err(KsError::EmptySample(1))
        );
        assert_eq!(
            ks_statistic(&mut s, &mut empty),
            Err(KsError::EmptySample(2))
        );
        let mut t = [1.0, 2.0, 3.0, 4.0];
        assert!(matches!(
            two_sample_ks_test(&mut s, &mut t, 0.05),
            Err(KsError::SampleTooSmall(4, 4))
        ));
    }

    #[test]
    fn kolmogorov_distribution_values() {
        assert!(pks(-1.0).is_err());
        assert_eq!(pks(0.0).unwrap(), 0.0);
        assert_eq!(qks(0.0).unwrap(), 1.0);
        assert!((pks(1.23).unwrap() - 0.9029731024047791).abs() < 1e-8);
        assert!((pks(2.34).unwrap() - 0.9999649260833611).abs() < 1e-8);
        assert!((pks(3.45).unwrap() - 1.0).abs() < 1e-8);
    }

    #[test]
    fn nan_sorts_last() {
        let mut s = [f64::NAN, 2.0, 1.0, f64::NAN];
        s.sort_by(cmp_f64);
        assert!(s[0] == 1.0 && s[1] == 2.0 && s[2].is_nan() && s[3].is_nan());
    }
}
