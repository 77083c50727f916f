/// Mann-Kendall monotonic trend test.
///
/// # Method
///
/// For a time-ordered series `x_1..x_n`:
///
/// 1. `S = Σ_{i<j} sign(x_j − x_i)`
/// 2. `Var(S) = [n(n−1)(2n+5) − Σ_t t(t−1)(2t+5)] / 18`, where the sum
///    runs over groups of `t` tied values
/// 3. Continuity-corrected `Z = (S − 1)/√Var` for `S > 0`,
///    `(S + 1)/√Var` for `S < 0`, and `0` for `S = 0`
/// 4. Two-sided `p = 2·(1 − Φ(|Z|))`
///
/// Sen's slope (median of all pairwise slopes) is reported alongside as
/// the magnitude of change per unit time.
///
/// Series shorter than `MIN_TREND_POINTS` yield
/// `TrendOutcome::InsufficientData` rather than an error.

use std::cmp::Ordering;

use serde::Serialize;

/// Default significance level for the two-sided test.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Smallest series the test is run on.
pub const MIN_TREND_POINTS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    NoTrend,
}

impl TrendDirection {
    pub fn describe(&self) -> &'static str {
        match self {
            TrendDirection::Increasing => "increasing",
            TrendDirection::Decreasing => "decreasing",
            TrendDirection::NoTrend => "no significant trend",
        }
    }
}

/// Full test statistics for a series long enough to test.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MannKendallResult {
    pub n: usize,
    pub s: i64,
    pub variance: f64,
    pub z: f64,
    pub p_value: f64,
    pub alpha: f64,
    pub direction: TrendDirection,
    /// Sen's slope, in value units per time unit. `None` when every
    /// observation shares one time stamp.
    pub sen_slope: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendOutcome {
    Tested(MannKendallResult),
    InsufficientData { points: usize, required: usize },
}

impl TrendOutcome {
    pub fn direction(&self) -> Option<TrendDirection> {
        match self {
            TrendOutcome::Tested(r) => Some(r.direction),
            TrendOutcome::InsufficientData { .. } => None,
        }
    }
}

/// Runs the test at the default significance level.
pub fn mann_kendall(series: &[(f64, f64)]) -> TrendOutcome {
    mann_kendall_with(series, DEFAULT_ALPHA, MIN_TREND_POINTS)
}

/// Runs the test on `(time, value)` pairs.
///
/// Pairs with a non-finite time or value are dropped. The remainder is
/// sorted by time (stable, so equal time stamps keep input order).
pub fn mann_kendall_with(series: &[(f64, f64)], alpha: f64, min_points: usize) -> TrendOutcome {
    let mut points: Vec<(f64, f64)> = series
        .iter()
        .copied()
        .filter(|(t, v)| t.is_finite() && v.is_finite())
        .collect();

    let required = min_points.max(2);
    if points.len() < required {
        return TrendOutcome::InsufficientData {
            points: points.len(),
            required,
        };
    }

    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));
    let values: Vec<f64> = points.iter().map(|(_, v)| *v).collect();
    let n = values.len();

    let s = s_statistic(&values);
    let variance = s_variance(&values);
    let z = z_score(s, variance);
    let p_value = two_sided_p(z);

    let direction = if p_value < alpha && s > 0 {
        TrendDirection::Increasing
    } else if p_value < alpha && s < 0 {
        TrendDirection::Decreasing
    } else {
        TrendDirection::NoTrend
    };

    TrendOutcome::Tested(MannKendallResult {
        n,
        s,
        variance,
        z,
        p_value,
        alpha,
        direction,
        sen_slope: sen_slope(&points),
    })
}

fn s_statistic(values: &[f64]) -> i64 {
    let mut s = 0i64;
    for i in 0..values.len() {
        for j in (i + 1)..values.len() {
            s += match values[j].partial_cmp(&values[i]) {
                Some(Ordering::Greater) => 1,
                Some(Ordering::Less) => -1,
                _ => 0,
            };
        }
    }
    s
}

/// Variance of S with the tied-group correction.
fn s_variance(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let mut tie_term = 0.0;
    for group in sorted.chunk_by(|a, b| a == b) {
        let t = group.len() as f64;
        if group.len() > 1 {
            tie_term += t * (t - 1.0) * (2.0 * t + 5.0);
        }
    }

    (n * (n - 1.0) * (2.0 * n + 5.0) - tie_term) / 18.0
}

fn z_score(s: i64, variance: f64) -> f64 {
    if variance <= 0.0 {
        return 0.0;
    }
    let sd = variance.sqrt();
    match s.cmp(&0) {
        Ordering::Greater => (s as f64 - 1.0) / sd,
        Ordering::Less => (s as f64 + 1.0) / sd,
        Ordering::Equal => 0.0,
    }
}

fn two_sided_p(z: f64) -> f64 {
    if z == 0.0 {
        return 1.0;
    }
    (2.0 * (1.0 - normal_cdf(z.abs()))).clamp(0.0, 1.0)
}

/// Median of pairwise slopes over pairs with distinct time stamps.
pub fn sen_slope(points: &[(f64, f64)]) -> Option<f64> {
    let mut slopes = Vec::new();
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            let dt = points[j].0 - points[i].0;
            if dt != 0.0 {
                slopes.push((points[j].1 - points[i].1) / dt);
            }
        }
    }
    median(&mut slopes)
}

fn median(values: &mut [f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Standard normal CDF.
pub fn normal_cdf(x: f64) -> f64 {
    0.5 * erfc(-x / std::f64::consts::SQRT_2)
}

/// Complementary error function, Chebyshev fit with fractional error
/// below 1.2e-7 everywhere.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let poly = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let ans = t * poly.exp();
    if x >= 0.0 { ans } else { 2.0 - ans }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn series(values: &[f64]) -> Vec<(f64, f64)> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (2015.0 + i as f64, *v))
            .collect()
    }

    fn tested(outcome: TrendOutcome) -> MannKendallResult {
        match outcome {
            TrendOutcome::Tested(r) => r,
            other => panic!("expected a tested result, got {:?}", other),
        }
    }

    #[test]
    fn test_strictly_increasing_series_is_increasing() {
        let values: Vec<f64> = (1..=10).map(|v| v as f64).collect();
        let result = tested(mann_kendall(&series(&values)));

        assert_eq!(result.s, 45);
        assert!((result.variance - 125.0).abs() < 1e-9);
        assert!(result.p_value < 0.05);
        assert_eq!(result.direction, TrendDirection::Increasing);
        assert_eq!(result.sen_slope, Some(1.0));
    }

    #[test]
    fn test_strictly_decreasing_series_is_decreasing() {
        let values: Vec<f64> = (1..=12).rev().map(|v| v as f64 * 2.5).collect();
        let result = tested(mann_kendall(&series(&values)));

        assert_eq!(result.s, -66);
        assert!(result.z < 0.0);
        assert_eq!(result.direction, TrendDirection::Decreasing);
    }

    #[test]
    fn test_constant_series_has_no_trend() {
        let result = tested(mann_kendall(&series(&[7.0; 10])));

        assert_eq!(result.s, 0);
        assert_eq!(result.z, 0.0);
        assert_eq!(result.p_value, 1.0);
        assert_eq!(result.direction, TrendDirection::NoTrend);
    }

    #[test]
    fn test_short_series_is_insufficient_data() {
        let outcome = mann_kendall(&series(&[1.0, 2.0, 3.0]));
        assert_eq!(
            outcome,
            TrendOutcome::InsufficientData {
                points: 3,
                required: 4
            }
        );
        assert_eq!(outcome.direction(), None);
    }

    #[test]
    fn test_unsorted_input_is_ordered_by_time() {
        let shuffled = vec![(2019.0, 5.0), (2015.0, 1.0), (2017.0, 3.0), (2016.0, 2.0), (2018.0, 4.0)];
        let result = tested(mann_kendall(&shuffled));
        assert_eq!(result.s, 10);
    }

    #[test]
    fn test_tie_correction_reduces_variance() {
        // n = 6 with one pair tied: 6·5·17/18 − 2·1·9/18 = 28.333 − 1.0
        let result = tested(mann_kendall(&series(&[1.0, 2.0, 2.0, 3.0, 4.0, 5.0])));
        assert!((result.variance - (510.0 - 18.0) / 18.0).abs() < 1e-9);
        assert_eq!(result.s, 14);
    }

    #[test]
    fn test_short_noisy_series_not_significant() {
        let result = tested(mann_kendall(&series(&[3.0, 1.0, 4.0, 1.0, 5.0])));
        assert_eq!(result.direction, TrendDirection::NoTrend);
    }

    #[test]
    fn test_non_finite_points_are_dropped() {
        let mut points = series(&[1.0, 2.0, 3.0, 4.0]);
        points.push((2030.0, f64::NAN));
        let result = tested(mann_kendall(&points));
        assert_eq!(result.n, 4);
    }

    #[test]
    fn test_normal_cdf_reference_values() {
        assert!((normal_cdf(0.0) - 0.5).abs() < 1e-7);
        assert!((normal_cdf(1.959_964) - 0.975).abs() < 1e-6);
        assert!((normal_cdf(-1.0) - 0.158_655_25).abs() < 1e-6);
    }

    #[test]
    fn test_sen_slope_median() {
        let points = vec![(0.0, 0.0), (1.0, 1.0), (2.0, 4.0)];
        // pairwise slopes: 1, 2, 3
        assert_eq!(sen_slope(&points), Some(2.0));
        assert_eq!(sen_slope(&[(1.0, 1.0), (1.0, 2.0)]), None);
    }
}
