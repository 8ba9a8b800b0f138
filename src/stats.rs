//! Descriptive statistics over latency samples.
//!
//! Every function here is pure and works in `f64` without intermediate
//! rounding. Inputs that would divide by zero are reported as
//! [`DegenerateInput`] instead of leaking `NaN`/`inf` to callers.

use serde::Serialize;
use thiserror::Error;

/// Why a statistic could not be computed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DegenerateInput {
    #[error("no samples to summarize")]
    Empty,
    #[error("mean is zero, coefficient of variation is undefined")]
    ZeroMean,
}

/// Mean, population standard deviation and coefficient of variation
/// of one sample set.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    pub standard_deviation: f64,
    /// `None` when the mean is zero.
    pub coefficient_of_variation: Option<f64>,
}

/// Arithmetic mean.
pub fn mean(samples: &[f64]) -> Result<f64, DegenerateInput> {
    if samples.is_empty() {
        return Err(DegenerateInput::Empty);
    }
    Ok(samples.iter().sum::<f64>() / samples.len() as f64)
}

/// Population standard deviation (divides by `n`, not `n - 1`).
pub fn standard_deviation(samples: &[f64]) -> Result<f64, DegenerateInput> {
    let mean = mean(samples)?;
    Ok(deviation_around(samples, mean))
}

/// `standard_deviation / mean`.
pub fn coefficient_of_variation(samples: &[f64]) -> Result<f64, DegenerateInput> {
    let mean = mean(samples)?;
    if mean == 0.0 {
        return Err(DegenerateInput::ZeroMean);
    }
    Ok(deviation_around(samples, mean) / mean)
}

/// Computes all three statistics in one pass over the mean.
///
/// Only an empty input is an error; a zero mean still yields a summary
/// with `coefficient_of_variation` left as `None`.
pub fn summarize(samples: &[f64]) -> Result<Summary, DegenerateInput> {
    let mean = mean(samples)?;
    let standard_deviation = deviation_around(samples, mean);
    let coefficient_of_variation = if mean == 0.0 {
        None
    } else {
        Some(standard_deviation / mean)
    };

    Ok(Summary {
        count: samples.len(),
        mean,
        standard_deviation,
        coefficient_of_variation,
    })
}

fn deviation_around(samples: &[f64], mean: f64) -> f64 {
    let n = samples.len() as f64;
    let variance = samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt()
}
