//! Run logs written by the evolutionary optimizer: one record per generation, each record
//! mapping a metric name to the per-individual values of that metric.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::load_json,
    error::{PlotError, Result},
};

/// Per-individual values of one metric within a generation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetricValues {
    /// One scalar per individual, e.g. `fitness`.
    Scalars(Vec<f64>),
    /// One sub-objective vector per individual, e.g. `objectives`.
    Vectors(Vec<Vec<f64>>),
}

impl MetricValues {
    pub fn len(&self) -> usize {
        match self {
            Self::Scalars(values) => values.len(),
            Self::Vectors(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The primary scalar of every individual. Sub-objective 0 is the primary one.
    pub fn primary(&self) -> Vec<f64> {
        match self {
            Self::Scalars(values) => values.clone(),
            Self::Vectors(values) => values.iter().filter_map(|v| v.first().copied()).collect(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationRecord {
    metrics: BTreeMap<String, MetricValues>,
}

impl GenerationRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metric(mut self, name: impl Into<String>, values: MetricValues) -> Self {
        self.metrics.insert(name.into(), values);
        self
    }

    pub fn metric(&self, name: &str) -> Option<&MetricValues> {
        self.metrics.get(name)
    }

    pub fn metric_names(&self) -> impl Iterator<Item = &str> {
        self.metrics.keys().map(String::as_str)
    }

    fn from_object(path: &Path, generation: usize, object: Map<String, Value>) -> Result<Self> {
        let mut metrics = BTreeMap::new();
        for (name, value) in object {
            // Only sequences are metrics; optimizers also write scalar bookkeeping fields.
            if !value.is_array() {
                continue;
            }
            let values: MetricValues = serde_json::from_value(value).map_err(|_| {
                PlotError::parse(
                    path,
                    format!(
                        "generation {generation}: `{name}` is neither a list of numbers nor a list of number lists"
                    ),
                )
            })?;
            if let MetricValues::Vectors(individuals) = &values {
                if let Some(individual) = individuals.iter().position(Vec::is_empty) {
                    return Err(PlotError::parse(
                        path,
                        format!(
                            "generation {generation}: individual {individual} has no values for `{name}`"
                        ),
                    ));
                }
            }
            metrics.insert(name, values);
        }
        Ok(Self { metrics })
    }
}

/// An ordered, non-empty sequence of generation records.
#[derive(Clone, Debug, PartialEq)]
pub struct RunLog {
    source: PathBuf,
    records: Vec<GenerationRecord>,
}

impl RunLog {
    /// Read and validate the run log at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let document: Value = load_json(path)?;
        let Value::Array(entries) = document else {
            return Err(PlotError::parse(path, "expected a list of generation records"));
        };
        if entries.is_empty() {
            return Err(PlotError::parse(path, "run log contains no generations"));
        }

        let records = entries
            .into_iter()
            .enumerate()
            .map(|(generation, entry)| match entry {
                Value::Object(object) => GenerationRecord::from_object(path, generation, object),
                _ => Err(PlotError::parse(
                    path,
                    format!("generation {generation} is not a mapping"),
                )),
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            path = %path.display(),
            generations = records.len(),
            "loaded run log"
        );
        Ok(Self {
            source: path.to_path_buf(),
            records,
        })
    }

    /// Build a run log from records already in memory. Fails if `records` is empty.
    pub fn from_records(
        source: impl Into<PathBuf>,
        records: Vec<GenerationRecord>,
    ) -> Result<Self> {
        let source = source.into();
        if records.is_empty() {
            return Err(PlotError::parse(source, "run log contains no generations"));
        }
        Ok(Self { source, records })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn generation(&self, index: usize) -> Option<&GenerationRecord> {
        self.records.get(index)
    }

    pub fn generations(&self) -> &[GenerationRecord] {
        &self.records
    }
}
