//! Error taxonomy shared by every plotting job.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PlotError>;

#[derive(Error, Debug)]
pub enum PlotError {
    #[error("input not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to parse {}: {reason}", path.display())]
    Parse { path: PathBuf, reason: String },

    #[error("metric `{metric}` missing from generation {generation}")]
    MissingMetric { metric: String, generation: usize },

    #[error("metric `{metric}` has no individuals in generation {generation}")]
    EmptyGeneration { metric: String, generation: usize },

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid chart: {reason}")]
    InvalidChart { reason: String },
}

impl PlotError {
    pub(crate) fn parse(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Parse {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_chart(reason: impl Into<String>) -> Self {
        Self::InvalidChart {
            reason: reason.into(),
        }
    }
}
