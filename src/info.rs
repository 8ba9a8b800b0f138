use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, warn};

use crate::stats::{self, Summary};
use crate::store::{RawSample, SampleStore, StoreError};

// ─── Report ──────────────────────────────────────────────────────

/// Latency statistics for one endpoint, recomputed on every request.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub endpoint: String,
    /// `ceil(raw_mean / 1000)`
    pub mean: f64,
    /// `ceil(raw_standard_deviation / 1000)`
    pub standev: f64,
    /// Unrounded; `null` when the mean is zero.
    pub variation: Option<f64>,
    /// Samples that went into the statistics.
    pub samples: usize,
    /// Records dropped because their duration was missing, not UTF-8 or
    /// not a finite number.
    pub skipped: usize,
    #[serde(rename = "timestamp")]
    pub generated_at: DateTime<Utc>,
    #[serde(skip)]
    pub raw: Summary,
}

impl StatsReport {
    fn new(endpoint: &str, raw: Summary, skipped: usize) -> Self {
        Self {
            endpoint: endpoint.to_owned(),
            mean: to_display_unit(raw.mean),
            standev: to_display_unit(raw.standard_deviation),
            variation: raw.coefficient_of_variation,
            samples: raw.count,
            skipped,
            generated_at: Utc::now(),
            raw,
        }
    }
}

/// Scales a raw duration down by 1000 and rounds up.
pub fn to_display_unit(raw: f64) -> f64 {
    (raw / 1000.0).ceil()
}

// ─── Errors ──────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum InfoError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("no usable samples recorded for endpoint '{endpoint}'")]
    NoSamples { endpoint: String },
}

// ─── Service ─────────────────────────────────────────────────────

/// Builds [`StatsReport`]s for a single configured endpoint.
///
/// Holds no per-request state; concurrent calls share only the store
/// handle.
#[derive(Clone)]
pub struct InfoService {
    store: Arc<dyn SampleStore>,
    endpoint: String,
    sample_limit: usize,
}

impl InfoService {
    pub fn new(store: Arc<dyn SampleStore>, endpoint: impl Into<String>, sample_limit: usize) -> Self {
        Self {
            store,
            endpoint: endpoint.into(),
            sample_limit,
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub async fn report(&self) -> Result<StatsReport, InfoError> {
        let raw = self
            .store
            .latest_durations(&self.endpoint, self.sample_limit)
            .await?;

        let (samples, skipped) = parse_samples(&raw);
        if skipped > 0 {
            warn!(
                endpoint = %self.endpoint,
                skipped,
                fetched = raw.len(),
                "ignoring malformed duration values"
            );
        }

        let summary = stats::summarize(&samples).map_err(|_| InfoError::NoSamples {
            endpoint: self.endpoint.clone(),
        })?;

        let report = StatsReport::new(&self.endpoint, summary, skipped);
        debug!(
            endpoint = %report.endpoint,
            samples = report.samples,
            mean = report.raw.mean,
            standev = report.raw.standard_deviation,
            "report built"
        );
        Ok(report)
    }
}

/// Keeps values that parse to a finite `f64`, preserving order.
/// Returns the kept samples and the number dropped.
pub fn parse_samples(raw: &[RawSample]) -> (Vec<f64>, usize) {
    let samples: Vec<f64> = raw
        .iter()
        .filter_map(|v| v.as_deref())
        .filter_map(|v| std::str::from_utf8(v).ok())
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();
    let skipped = raw.len() - samples.len();
    (samples, skipped)
}
