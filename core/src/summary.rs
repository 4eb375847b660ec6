use serde::{Deserialize, Serialize};

use crate::{
    error::{PlotError, Result},
    runlog::RunLog,
};

/// How the individuals of one generation collapse into a single scalar.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reduction {
    /// Minimum over individuals.
    Best,
    /// Arithmetic mean over individuals.
    Avg,
}

impl Reduction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Best => "best",
            Self::Avg => "avg",
        }
    }

    /// `None` when there is nothing to reduce.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        match self {
            Self::Best => Some(values.iter().copied().fold(f64::INFINITY, f64::min)),
            Self::Avg => Some(values.iter().sum::<f64>() / values.len() as f64),
        }
    }
}

/// One scalar per summarized generation, aligned with the source log's generation index.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SummarySeries {
    pub metric: String,
    pub reduction: Reduction,
    pub values: Vec<f64>,
}

impl SummarySeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Generation indices matching `values`.
    pub fn generations(&self) -> Vec<f64> {
        (0..self.values.len()).map(|g| g as f64).collect()
    }
}

/// Reduce `metric` over every generation of `log` except the last one.
///
/// The final record of an optimizer run is a terminal entry and is never compared, so a log
/// with a single generation yields an empty series.
pub fn summarize(log: &RunLog, metric: &str, reduction: Reduction) -> Result<SummarySeries> {
    let included = log.len().saturating_sub(1);
    let mut values = Vec::with_capacity(included);

    for (generation, record) in log.generations()[..included].iter().enumerate() {
        let metric_values = record
            .metric(metric)
            .ok_or_else(|| PlotError::MissingMetric {
                metric: metric.to_string(),
                generation,
            })?;
        let value = reduction
            .apply(&metric_values.primary())
            .ok_or_else(|| PlotError::EmptyGeneration {
                metric: metric.to_string(),
                generation,
            })?;
        tracing::trace!(metric, generation, reduction = reduction.label(), value);
        values.push(value);
    }

    Ok(SummarySeries {
        metric: metric.to_string(),
        reduction,
        values,
    })
}

/// The best and average series of `metric`, in that order.
pub fn summarize_all(log: &RunLog, metric: &str) -> Result<(SummarySeries, SummarySeries)> {
    Ok((
        summarize(log, metric, Reduction::Best)?,
        summarize(log, metric, Reduction::Avg)?,
    ))
}
