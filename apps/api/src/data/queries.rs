//! Pure aggregation queries over a loaded [`Dataset`].
//!
//! No query fails on an empty match: "no data" is an ordinary return value
//! (`SalaryEstimate::Unavailable`, an empty vector or set).

use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::data::models::{Dataset, Field, JobRecord};

/// One (date, count) point of a skill's demand series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub count: usize,
}

/// Average salary over a filter, or an explicit "no data" marker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SalaryEstimate {
    Available { average: f64, sample_size: usize },
    Unavailable,
}

impl SalaryEstimate {
    fn from_salaries<'a>(records: impl Iterator<Item = &'a JobRecord>) -> Self {
        let (sum, n) = records.fold((0i128, 0usize), |(sum, n), r| {
            (sum + r.salary as i128, n + 1)
        });
        if n == 0 {
            return SalaryEstimate::Unavailable;
        }
        SalaryEstimate::Available {
            average: sum as f64 / n as f64,
            sample_size: n,
        }
    }

    pub fn average(&self) -> Option<f64> {
        match self {
            SalaryEstimate::Available { average, .. } => Some(*average),
            SalaryEstimate::Unavailable => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillCount {
    pub skill: String,
    pub count: usize,
}

/// A record with coordinates, ready for a map layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
    pub city: String,
    pub role: String,
    pub skill: String,
    pub salary: i64,
}

/// Side-by-side view of two roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoleComparison {
    pub role_a: String,
    pub role_b: String,
    pub shared: BTreeSet<String>,
    pub only_a: BTreeSet<String>,
    pub only_b: BTreeSet<String>,
    pub salary_a: SalaryEstimate,
    pub salary_b: SalaryEstimate,
}

/// Per-date occurrence counts for an exact canonical skill, ascending by date.
///
/// Fewer than two points means the series is too short to forecast.
pub fn skill_time_series(dataset: &Dataset, skill: &str) -> Vec<SeriesPoint> {
    let mut by_date: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    for record in dataset.records().iter().filter(|r| r.skill == skill) {
        *by_date.entry(record.date).or_default() += 1;
    }
    by_date
        .into_iter()
        .map(|(date, count)| SeriesPoint { date, count })
        .collect()
}

/// Mean salary over records matching both `role` and `city` exactly.
pub fn filtered_salary_average(dataset: &Dataset, role: &str, city: &str) -> SalaryEstimate {
    SalaryEstimate::from_salaries(
        dataset
            .records()
            .iter()
            .filter(|r| r.role == role && r.city == city),
    )
}

/// Mean salary over every record for `role`, in any city.
pub fn role_salary_average(dataset: &Dataset, role: &str) -> SalaryEstimate {
    SalaryEstimate::from_salaries(dataset.records().iter().filter(|r| r.role == role))
}

/// Distinct non-empty skills appearing for `role`.
pub fn role_skill_set(dataset: &Dataset, role: &str) -> BTreeSet<String> {
    dataset
        .records()
        .iter()
        .filter(|r| r.role == role && !r.skill.is_empty())
        .map(|r| r.skill.clone())
        .collect()
}

/// The `n` most frequent skills, count descending.
///
/// Ties keep the order in which skills were first encountered in the dataset.
pub fn top_trending_skills(dataset: &Dataset, n: usize) -> Vec<SkillCount> {
    let mut counts: Vec<SkillCount> = Vec::new();
    let mut slot: HashMap<&str, usize> = HashMap::new();

    for record in dataset.records().iter().filter(|r| !r.skill.is_empty()) {
        match slot.get(record.skill.as_str()) {
            Some(&i) => counts[i].count += 1,
            None => {
                slot.insert(&record.skill, counts.len());
                counts.push(SkillCount {
                    skill: record.skill.clone(),
                    count: 1,
                });
            }
        }
    }

    // stable sort: first-seen order survives among equal counts
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts.truncate(n);
    counts
}

/// Sorted, deduplicated non-empty values of `field`.
pub fn unique_values(dataset: &Dataset, field: Field) -> Vec<String> {
    dataset
        .records()
        .iter()
        .map(|r| field.value_of(r))
        .filter(|v| !v.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Records that carry both coordinates.
pub fn geo_points(dataset: &Dataset) -> Vec<GeoPoint> {
    dataset
        .records()
        .iter()
        .filter_map(|r| {
            Some(GeoPoint {
                lat: r.lat?,
                lon: r.lon?,
                city: r.city.clone(),
                role: r.role.clone(),
                skill: r.skill.clone(),
                salary: r.salary,
            })
        })
        .collect()
}

pub fn compare_roles(dataset: &Dataset, role_a: &str, role_b: &str) -> RoleComparison {
    let skills_a = role_skill_set(dataset, role_a);
    let skills_b = role_skill_set(dataset, role_b);

    RoleComparison {
        role_a: role_a.to_string(),
        role_b: role_b.to_string(),
        shared: skills_a.intersection(&skills_b).cloned().collect(),
        only_a: skills_a.difference(&skills_b).cloned().collect(),
        only_b: skills_b.difference(&skills_a).cloned().collect(),
        salary_a: role_salary_average(dataset, role_a),
        salary_b: role_salary_average(dataset, role_b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, day).unwrap()
    }

    fn record(day: u32, role: &str, city: &str, skill: &str, salary: i64) -> JobRecord {
        JobRecord {
            date: date(day),
            role: role.to_string(),
            city: city.to_string(),
            lat: None,
            lon: None,
            skill: skill.to_string(),
            salary,
        }
    }

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            record(3, "Data Analyst", "Pune", "Python", 50_000),
            record(1, "Data Analyst", "Pune", "SQL", 60_000),
            record(3, "Data Analyst", "Delhi", "Python", 70_000),
            record(2, "Data Scientist", "Pune", "Python", 90_000),
            record(2, "Data Scientist", "Pune", "PyTorch", 110_000),
            record(5, "Data Scientist", "Delhi", "", 100_000),
        ])
    }

    #[test]
    fn test_skill_time_series_sorted_and_sums_to_matches() {
        let series = skill_time_series(&sample(), "Python");

        assert_eq!(
            series,
            vec![
                SeriesPoint { date: date(2), count: 1 },
                SeriesPoint { date: date(3), count: 2 },
            ]
        );
        assert!(series.windows(2).all(|w| w[0].date < w[1].date));
        let total: usize = series.iter().map(|p| p.count).sum();
        assert_eq!(total, 3);
    }

    #[test]
    fn test_skill_time_series_is_case_exact() {
        assert!(skill_time_series(&sample(), "python").is_empty());
    }

    #[test]
    fn test_short_series_is_not_an_error() {
        let series = skill_time_series(&sample(), "SQL");
        assert_eq!(series.len(), 1);
    }

    #[test]
    fn test_filtered_salary_average() {
        let dataset = sample();
        assert_eq!(
            filtered_salary_average(&dataset, "Data Scientist", "Pune"),
            SalaryEstimate::Available {
                average: 100_000.0,
                sample_size: 2
            }
        );
    }

    #[test]
    fn test_filtered_salary_average_no_match_is_unavailable() {
        let estimate = filtered_salary_average(&sample(), "Data Analyst", "Mumbai");
        assert_eq!(estimate, SalaryEstimate::Unavailable);
        assert_eq!(estimate.average(), None);
    }

    #[test]
    fn test_salary_average_on_empty_dataset() {
        let empty = Dataset::from_records(vec![]);
        assert_eq!(
            filtered_salary_average(&empty, "Data Analyst", "Pune"),
            SalaryEstimate::Unavailable
        );
    }

    #[test]
    fn test_role_skill_set_excludes_empty_skills() {
        let skills = role_skill_set(&sample(), "Data Scientist");
        let expected: BTreeSet<String> = ["PyTorch", "Python"].iter().map(|s| s.to_string()).collect();
        assert_eq!(skills, expected);
    }

    #[test]
    fn test_role_skill_set_unknown_role_is_empty() {
        assert!(role_skill_set(&sample(), "Chef").is_empty());
    }

    #[test]
    fn test_top_trending_ties_break_by_first_seen() {
        let mut records = Vec::new();
        // SQL is encountered before AWS; both end up with 7
        records.push(record(1, "DA", "Pune", "Python", 1));
        records.push(record(1, "DA", "Pune", "SQL", 1));
        records.push(record(1, "DA", "Pune", "AWS", 1));
        records.push(record(1, "DA", "Pune", "Excel", 1));
        for _ in 0..9 {
            records.push(record(2, "DA", "Pune", "Python", 1));
        }
        for _ in 0..6 {
            records.push(record(2, "DA", "Pune", "AWS", 1));
            records.push(record(2, "DA", "Pune", "SQL", 1));
        }
        records.push(record(3, "DA", "Pune", "Excel", 1));
        let dataset = Dataset::from_records(records);

        let top: Vec<String> = top_trending_skills(&dataset, 3)
            .into_iter()
            .map(|s| s.skill)
            .collect();
        assert_eq!(top, vec!["Python", "SQL", "AWS"]);
    }

    #[test]
    fn test_top_trending_counts_and_overflowing_n() {
        let top = top_trending_skills(&sample(), 10);
        assert_eq!(
            top,
            vec![
                SkillCount { skill: "Python".to_string(), count: 3 },
                SkillCount { skill: "SQL".to_string(), count: 1 },
                SkillCount { skill: "PyTorch".to_string(), count: 1 },
            ]
        );
        assert!(top_trending_skills(&sample(), 0).is_empty());
    }

    #[test]
    fn test_unique_values_sorted_and_deduplicated() {
        let dataset = sample();
        assert_eq!(unique_values(&dataset, Field::City), vec!["Delhi", "Pune"]);
        assert_eq!(
            unique_values(&dataset, Field::Role),
            vec!["Data Analyst", "Data Scientist"]
        );
        assert_eq!(
            unique_values(&dataset, Field::Skill),
            vec!["PyTorch", "Python", "SQL"]
        );
    }

    #[test]
    fn test_geo_points_skip_records_without_coordinates() {
        let mut with_coords = record(1, "DA", "Pune", "SQL", 40_000);
        with_coords.lat = Some(18.52);
        with_coords.lon = Some(73.85);
        let mut half = record(1, "DA", "Delhi", "SQL", 40_000);
        half.lat = Some(28.61);
        let dataset = Dataset::from_records(vec![with_coords, half]);

        let points = geo_points(&dataset);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].city, "Pune");
    }

    #[test]
    fn test_compare_roles_overlap_and_salaries() {
        let cmp = compare_roles(&sample(), "Data Analyst", "Data Scientist");

        assert_eq!(cmp.shared.iter().collect::<Vec<_>>(), vec!["Python"]);
        assert_eq!(cmp.only_a.iter().collect::<Vec<_>>(), vec!["SQL"]);
        assert_eq!(cmp.only_b.iter().collect::<Vec<_>>(), vec!["PyTorch"]);
        assert_eq!(cmp.salary_a.average(), Some(60_000.0));
        assert_eq!(cmp.salary_b.average(), Some(100_000.0));
    }

    #[test]
    fn test_salary_estimate_serializes_with_status_tag() {
        let json = serde_json::to_value(SalaryEstimate::Unavailable).unwrap();
        assert_eq!(json["status"], "unavailable");

        let json = serde_json::to_value(SalaryEstimate::Available {
            average: 1.5,
            sample_size: 2,
        })
        .unwrap();
        assert_eq!(json["status"], "available");
        assert_eq!(json["sample_size"], 2);
    }
}
