use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One validated row of the job-market dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobRecord {
    pub date: NaiveDate,
    pub role: String,
    pub city: String,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    /// Canonical spelling (see `data::canonical`). May be empty.
    pub skill: String,
    pub salary: i64,
}

/// The immutable, validated in-memory dataset.
///
/// Every record carries a valid integer salary and a canonicalized skill.
/// Records keep the source file's order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    records: Vec<JobRecord>,
    stats: LoadStats,
}

/// Bookkeeping from the load that produced a [`Dataset`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoadStats {
    pub source: Option<PathBuf>,
    pub raw_rows: usize,
    pub dropped_invalid_salary: usize,
}

impl Dataset {
    pub fn new(records: Vec<JobRecord>, stats: LoadStats) -> Self {
        Self { records, stats }
    }

    /// Builds a dataset from already-validated records (no rows dropped).
    #[cfg(test)]
    pub fn from_records(records: Vec<JobRecord>) -> Self {
        let stats = LoadStats {
            source: None,
            raw_rows: records.len(),
            dropped_invalid_salary: 0,
        };
        Self { records, stats }
    }

    pub fn records(&self) -> &[JobRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn stats(&self) -> &LoadStats {
        &self.stats
    }

    /// Earliest and latest observation date, or `None` for an empty dataset.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let min = self.records.iter().map(|r| r.date).min()?;
        let max = self.records.iter().map(|r| r.date).max()?;
        Some((min, max))
    }
}

/// Selectable string columns exposed to dashboard controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Role,
    City,
    Skill,
}

impl Field {
    pub fn value_of<'a>(&self, record: &'a JobRecord) -> &'a str {
        match self {
            Field::Role => &record.role,
            Field::City => &record.city,
            Field::Skill => &record.skill,
        }
    }
}
