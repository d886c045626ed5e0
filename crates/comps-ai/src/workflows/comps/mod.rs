pub mod domain;
mod eligibility;
pub mod export;
mod extract;
mod record;
mod stats;
mod status;

use std::io::Read;
use std::path::Path;

use serde_json::Value;

pub use eligibility::is_rental;
pub use extract::{assemble_address, lot_acres};
pub use record::RawRecord;
pub use stats::{
    market_statistic, metric_values, statistic_over, MarketSummary, MetricStatisticEntry,
    StatusCountEntry,
};
pub use status::normalize_status;

use domain::Comparable;

#[derive(Debug)]
pub enum ComparableImportError {
    Io(std::io::Error),
    Json(serde_json::Error),
    NotAnArray,
}

impl std::fmt::Display for ComparableImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ComparableImportError::Io(err) => {
                write!(f, "failed to read listing export: {}", err)
            }
            ComparableImportError::Json(err) => {
                write!(f, "invalid listing JSON data: {}", err)
            }
            ComparableImportError::NotAnArray => {
                write!(f, "listing payload must be a JSON array of records")
            }
        }
    }
}

impl std::error::Error for ComparableImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ComparableImportError::Io(err) => Some(err),
            ComparableImportError::Json(err) => Some(err),
            ComparableImportError::NotAnArray => None,
        }
    }
}

impl From<std::io::Error> for ComparableImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for ComparableImportError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

/// Output of one pipeline pass: the canonical set plus how many raw records
/// the eligibility gate turned away.
#[derive(Debug, Clone)]
pub struct ComparableSet {
    pub comparables: Vec<Comparable>,
    pub excluded: usize,
}

impl ComparableSet {
    pub fn summary(&self) -> MarketSummary {
        MarketSummary::from_comparables(&self.comparables)
    }
}

/// Entry point reducing raw provider records to the canonical comparable set.
/// Request-scoped and recomputed per invocation; nothing here is persisted.
pub struct ComparablePipeline;

impl ComparablePipeline {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<ComparableSet, ComparableImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<ComparableSet, ComparableImportError> {
        let payload: Value = serde_json::from_reader(reader)?;
        let Value::Array(records) = payload else {
            return Err(ComparableImportError::NotAnArray);
        };
        Ok(Self::from_values(records))
    }

    /// Infallible over already-parsed records: a malformed record degrades
    /// field by field instead of failing the batch.
    pub fn from_values(records: Vec<Value>) -> ComparableSet {
        let mut comparables = Vec::with_capacity(records.len());
        let mut excluded = 0usize;

        for value in records {
            let record = RawRecord::new(value);
            if is_rental(&record) {
                excluded += 1;
                continue;
            }
            comparables.push(extract::comparable_from_record(&record));
        }

        if excluded > 0 {
            tracing::debug!(excluded, "eligibility gate removed rental/lease records");
        }

        ComparableSet {
            comparables,
            excluded,
        }
    }
}
