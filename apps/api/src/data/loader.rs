//! CSV loader — turns raw job rows into a validated [`Dataset`].
//!
//! Rules applied per row:
//! 1. `date` must parse as a calendar date, otherwise the whole load fails.
//! 2. `salary` is coerced to an integer; rows where that fails are dropped.
//! 3. `skill` is trimmed and canonicalized.
//! 4. `lat` / `lon` become `None` when absent or non-numeric.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{NaiveDate, NaiveDateTime};
use csv::{ReaderBuilder, StringRecord};
use tracing::{debug, info};

use crate::data::canonical::canonicalize_skill;
use crate::data::error::{DataError, DataResult};
use crate::data::models::{Dataset, JobRecord, LoadStats};

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Column positions resolved from the header row.
struct Columns {
    date: usize,
    role: usize,
    city: usize,
    lat: usize,
    lon: usize,
    skill: usize,
    salary: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> DataResult<Self> {
        if headers.iter().all(|h| h.trim().is_empty()) {
            return Err(DataError::EmptySource);
        }
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .ok_or(DataError::MissingColumn(name))
        };
        Ok(Columns {
            date: find("date")?,
            role: find("role")?,
            city: find("city")?,
            lat: find("lat")?,
            lon: find("lon")?,
            skill: find("skill")?,
            salary: find("salary")?,
        })
    }
}

/// Reads and validates the dataset at `path`.
pub fn load_dataset(path: &Path) -> DataResult<Dataset> {
    let file = File::open(path).map_err(|source| DataError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_dataset(file, Some(path.to_path_buf()))?;
    info!(
        path = %path.display(),
        records = dataset.len(),
        dropped = dataset.stats().dropped_invalid_salary,
        "Job dataset loaded"
    );
    Ok(dataset)
}

/// Parses CSV content from any reader. `source` is recorded in the stats only.
pub fn read_dataset<R: Read>(reader: R, source: Option<PathBuf>) -> DataResult<Dataset> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = Columns::from_headers(csv_reader.headers()?)?;

    let mut records = Vec::new();
    let mut raw_rows = 0usize;
    let mut dropped = 0usize;

    for (index, row) in csv_reader.records().enumerate() {
        let row = row?;
        raw_rows += 1;
        // header is line 1
        let line = row
            .position()
            .map(|p| p.line())
            .unwrap_or(index as u64 + 2);

        let raw_date = field(&row, columns.date);
        let date = parse_date(raw_date).ok_or_else(|| DataError::InvalidDate {
            line,
            value: raw_date.to_string(),
        })?;

        let Some(salary) = parse_salary(field(&row, columns.salary)) else {
            debug!(line, salary = field(&row, columns.salary), "Dropping row with invalid salary");
            dropped += 1;
            continue;
        };

        records.push(JobRecord {
            date,
            role: field(&row, columns.role).to_string(),
            city: field(&row, columns.city).to_string(),
            lat: parse_coordinate(field(&row, columns.lat)),
            lon: parse_coordinate(field(&row, columns.lon)),
            skill: canonicalize_skill(field(&row, columns.skill)),
            salary,
        });
    }

    Ok(Dataset::new(
        records,
        LoadStats {
            source,
            raw_rows,
            dropped_invalid_salary: dropped,
        },
    ))
}

fn field(row: &StringRecord, index: usize) -> &str {
    row.get(index).unwrap_or("")
}

/// Accepts ISO dates, slashed dates (year-first or month-first) and
/// ISO datetimes, keeping only the calendar date.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Integer or float text → integer salary. Floats truncate toward zero.
/// Empty, non-numeric, non-finite and out-of-`i64`-range values yield `None`.
pub fn parse_salary(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(value) = raw.parse::<i64>() {
        return Some(value);
    }
    raw.parse::<f64>()
        .ok()
        .map(f64::trunc)
        // `i64::MAX as f64` rounds up to 2^63, hence the exclusive bound
        .filter(|v| v.is_finite() && *v >= i64::MIN as f64 && *v < i64::MAX as f64)
        .map(|v| v as i64)
}

fn parse_coordinate(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const HEADER: &str = "date,role,city,lat,lon,skill,salary\n";

    fn read(body: &str) -> DataResult<Dataset> {
        read_dataset(format!("{HEADER}{body}").as_bytes(), None)
    }

    #[test]
    fn test_end_to_end_invalid_salary_row_is_dropped() {
        let dataset = read(
            "2024-01-01,DA,Pune,18.52,73.85,python,50000\n\
             2024-01-01,DA,Pune,18.52,73.85,aws,abc\n",
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].skill, "Python");
        assert_eq!(dataset.records()[0].salary, 50000);
        assert_eq!(dataset.stats().raw_rows, 2);
        assert_eq!(dataset.stats().dropped_invalid_salary, 1);
    }

    #[test]
    fn test_loaded_count_never_exceeds_raw_count() {
        let clean = read("2024-01-01,DA,Pune,,,sql,40000\n2024-01-02,DS,Delhi,,,nlp,60000\n").unwrap();
        assert_eq!(clean.len(), clean.stats().raw_rows);

        let dirty = read("2024-01-01,DA,Pune,,,sql,\n2024-01-02,DS,Delhi,,,nlp,60000\n").unwrap();
        assert!(dirty.len() < dirty.stats().raw_rows);
    }

    #[test]
    fn test_malformed_date_fails_whole_load() {
        let err = read(
            "2024-01-01,DA,Pune,,,python,50000\n\
             not-a-date,DA,Pune,,,python,50000\n",
        )
        .unwrap_err();

        match err {
            DataError::InvalidDate { line, value } => {
                assert_eq!(line, 3);
                assert_eq!(value, "not-a-date");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_column_is_fatal() {
        let err = read_dataset("date,role,city,skill,salary\n".as_bytes(), None).unwrap_err();
        assert!(matches!(err, DataError::MissingColumn("lat")));
    }

    #[test]
    fn test_empty_source_is_fatal() {
        let err = read_dataset("".as_bytes(), None).unwrap_err();
        assert!(matches!(err, DataError::EmptySource));
    }

    #[test]
    fn test_extra_columns_and_reordering_are_tolerated() {
        let csv = "salary,skill,company,lon,lat,city,role,date\n\
                   72000, tableau ,Acme,77.59,12.97,Bengaluru,BI Analyst,2024-03-05\n";
        let dataset = read_dataset(csv.as_bytes(), None).unwrap();
        let record = &dataset.records()[0];
        assert_eq!(record.skill, "Tableau");
        assert_eq!(record.city, "Bengaluru");
        assert_eq!(record.role, "BI Analyst");
        assert_eq!(record.lat, Some(12.97));
        assert_eq!(record.lon, Some(77.59));
        assert_eq!(record.date, NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn test_missing_coordinates_become_none() {
        let dataset = read("2024-01-01,DA,Pune,,n/a,excel,30000\n").unwrap();
        assert_eq!(dataset.records()[0].lat, None);
        assert_eq!(dataset.records()[0].lon, None);
    }

    #[test]
    fn test_float_salary_truncates() {
        let dataset = read("2024-01-01,DA,Pune,,,excel,45000.9\n").unwrap();
        assert_eq!(dataset.records()[0].salary, 45000);
    }

    #[test]
    fn test_parse_salary_rejects_non_numeric() {
        assert_eq!(parse_salary("abc"), None);
        assert_eq!(parse_salary(""), None);
        assert_eq!(parse_salary("  "), None);
        assert_eq!(parse_salary("NaN"), None);
        assert_eq!(parse_salary("inf"), None);
        assert_eq!(parse_salary(" 1200 "), Some(1200));
        assert_eq!(parse_salary("1e5"), Some(100_000));
    }

    #[test]
    fn test_parse_salary_rejects_values_outside_i64() {
        assert_eq!(parse_salary("1e300"), None);
        assert_eq!(parse_salary("-1e300"), None);
        assert_eq!(parse_salary("9223372036854775808"), None);
        assert_eq!(parse_salary("9.3e18"), None);
        assert_eq!(parse_salary("9223372036854775807"), Some(i64::MAX));
        assert_eq!(parse_salary("-0.5"), Some(0));
    }

    #[test]
    fn test_out_of_range_salary_row_is_dropped_and_counted() {
        let dataset = read(
            "2024-01-01,DA,Pune,,,python,1e300
             2024-01-02,DA,Pune,,,sql,60000
",
        )
        .unwrap();

        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.records()[0].skill, "SQL");
        assert_eq!(dataset.stats().raw_rows, 2);
        assert_eq!(dataset.stats().dropped_invalid_salary, 1);
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(parse_date("2024-02-29"), Some(expected));
        assert_eq!(parse_date("2024/02/29"), Some(expected));
        assert_eq!(parse_date("02/29/2024"), Some(expected));
        assert_eq!(parse_date("2024-02-29 13:45:00"), Some(expected));
        assert_eq!(parse_date("2024-02-29T13:45:00"), Some(expected));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_load_dataset_reads_file_and_records_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{HEADER}2024-01-01,DA,Pune,18.5,73.8,spark,55000\n").unwrap();

        let dataset = load_dataset(file.path()).unwrap();
        assert_eq!(dataset.len(), 1);
        assert_eq!(dataset.stats().source.as_deref(), Some(file.path()));
    }

    #[test]
    fn test_load_dataset_missing_file_is_io_error() {
        let err = load_dataset(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, DataError::Io { .. }));
    }

    #[test]
    fn test_reading_same_content_twice_is_deterministic() {
        let body = "2024-01-02,DS,Delhi,,,nlp,60000\n\
                    2024-01-01,DA,Pune,,,sql,40000\n\
                    2024-01-03,DA,Pune,,,aws,oops\n";
        assert_eq!(read(body).unwrap(), read(body).unwrap());
    }
}
