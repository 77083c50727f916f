/// Weibull fitting and return-period estimation.
///
/// # Method
///
/// A two-parameter Weibull distribution, `F(x) = 1 − exp(−(x/λ)^k)`, is
/// fitted by maximum likelihood. The shape `k` solves
///
/// ```text
/// Σ xᵏ ln x / Σ xᵏ − 1/k − mean(ln x) = 0
/// ```
///
/// by Newton-Raphson, and the scale follows in closed form as
/// `λ = (Σ xᵏ / n)^(1/k)`. Magnitudes are divided by their maximum before
/// iterating so that `xᵏ` stays in range for dollar-sized inputs.
///
/// The magnitude with a return period of `T` years is the quantile at
/// non-exceedance probability `1 − 1/T`:
///
/// ```text
/// x_T = λ · (ln T)^(1/k)
/// ```
///
/// Degenerate input (fewer than three distinct positive values) or a
/// solver that fails to converge yields `ReturnPeriodOutcome::Unfitted`.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

/// Return periods, in years, reported when none are configured.
pub const DEFAULT_RETURN_PERIODS: [u32; 6] = [2, 5, 10, 25, 50, 100];

const MIN_DISTINCT_VALUES: usize = 3;
const MAX_ITERATIONS: usize = 200;
const TOLERANCE: f64 = 1e-10;

/// Fitted Weibull parameters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeibullFit {
    /// Shape parameter `k`.
    pub shape: f64,
    /// Scale parameter `λ`, in the units of the input magnitudes.
    pub scale: f64,
    /// Number of magnitudes used in the fit.
    pub sample_size: usize,
    pub iterations: usize,
}

impl WeibullFit {
    /// Probability that a single year's magnitude exceeds `x`.
    pub fn exceedance_probability(&self, x: f64) -> f64 {
        if x <= 0.0 {
            return 1.0;
        }
        (-(x / self.scale).powf(self.shape)).exp()
    }

    /// Magnitude expected to be equalled or exceeded once every `years`.
    ///
    /// Periods of one year or less map to zero, the lower bound of the
    /// distribution's support.
    pub fn magnitude_for(&self, years: f64) -> f64 {
        if years <= 1.0 {
            return 0.0;
        }
        self.scale * years.ln().powf(1.0 / self.shape)
    }

    /// Return period, in years, of a magnitude `x`.
    pub fn return_period_of(&self, x: f64) -> f64 {
        1.0 / self.exceedance_probability(x)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ReturnPeriodOutcome {
    Fitted {
        fit: WeibullFit,
        /// Return period in years → magnitude.
        periods: BTreeMap<u32, f64>,
    },
    Unfitted {
        reason: String,
    },
}

impl ReturnPeriodOutcome {
    pub fn fit(&self) -> Option<&WeibullFit> {
        match self {
            ReturnPeriodOutcome::Fitted { fit, .. } => Some(fit),
            ReturnPeriodOutcome::Unfitted { .. } => None,
        }
    }
}

/// Fits the default set of return periods.
pub fn fit_return_periods(values: &[f64]) -> ReturnPeriodOutcome {
    fit_return_periods_for(values, &DEFAULT_RETURN_PERIODS)
}

/// Fits a Weibull distribution and evaluates it at each requested period.
pub fn fit_return_periods_for(values: &[f64], periods: &[u32]) -> ReturnPeriodOutcome {
    match fit_weibull(values) {
        Ok(fit) => {
            let periods = periods
                .iter()
                .map(|&t| (t, fit.magnitude_for(t as f64)))
                .collect();
            ReturnPeriodOutcome::Fitted { fit, periods }
        }
        Err(reason) => {
            log::debug!("Weibull fit skipped: {}", reason);
            ReturnPeriodOutcome::Unfitted { reason }
        }
    }
}

/// Maximum-likelihood Weibull fit.
///
/// Non-finite and non-positive magnitudes are outside the distribution's
/// support and are ignored.
pub fn fit_weibull(values: &[f64]) -> Result<WeibullFit, String> {
    let mut sample: Vec<f64> = values
        .iter()
        .copied()
        .filter(|v| v.is_finite() && *v > 0.0)
        .collect();
    sample.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let distinct = sample.chunk_by(|a, b| a == b).count();
    if distinct < MIN_DISTINCT_VALUES {
        return Err(format!(
            "need at least {} distinct positive values, got {}",
            MIN_DISTINCT_VALUES, distinct
        ));
    }

    let x_max = sample[sample.len() - 1];
    let logs: Vec<f64> = sample.iter().map(|x| (x / x_max).ln()).collect();
    let n = logs.len() as f64;
    let mean_log = logs.iter().sum::<f64>() / n;
    let sd_log = (logs.iter().map(|l| (l - mean_log).powi(2)).sum::<f64>() / (n - 1.0)).sqrt();

    // Moment estimate of the shape from the spread of ln x.
    let mut k = std::f64::consts::PI / (6f64.sqrt() * sd_log);
    if !k.is_finite() || k <= 0.0 {
        return Err("could not seed the shape estimate".to_string());
    }

    for iteration in 1..=MAX_ITERATIONS {
        let (s0, s1, s2) = logs.iter().fold((0.0, 0.0, 0.0), |(s0, s1, s2), &l| {
            let w = (k * l).exp();
            (s0 + w, s1 + w * l, s2 + w * l * l)
        });
        let ratio = s1 / s0;
        let g = ratio - 1.0 / k - mean_log;
        let dg = s2 / s0 - ratio * ratio + 1.0 / (k * k);

        let mut next = k - g / dg;
        if next <= 0.0 {
            next = k / 2.0;
        }
        if !next.is_finite() {
            return Err("shape iteration diverged".to_string());
        }

        if (next - k).abs() <= TOLERANCE * k.max(1.0) {
            let scaled_mean = logs.iter().map(|&l| (next * l).exp()).sum::<f64>() / n;
            let scale = x_max * scaled_mean.powf(1.0 / next);
            if !scale.is_finite() || scale <= 0.0 {
                return Err("scale estimate is not positive".to_string());
            }
            return Ok(WeibullFit {
                shape: next,
                scale,
                sample_size: sample.len(),
                iterations: iteration,
            });
        }
        k = next;
    }

    Err(format!(
        "shape iteration did not converge in {} steps",
        MAX_ITERATIONS
    ))
}
