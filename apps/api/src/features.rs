//! Dashboard features and the route each one is served on.
//!
//! Adding a variant forces a path, a title and a handler through the
//! exhaustive matches below.

use std::str::FromStr;

use axum::{
    extract::Path,
    routing::{get, post, MethodRouter},
    Json,
};
use serde::Serialize;

use crate::analysis::handlers as analysis;
use crate::data::handlers as data;
use crate::errors::AppError;
use crate::routes::feedback;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    SkillDemandForecasting,
    ResumeAnalyzer,
    GeoHeatmap,
    SalaryEstimator,
    CompareRoles,
    PersonalizationGrowth,
}

#[derive(Debug, Serialize)]
pub struct FeatureInfo {
    pub slug: &'static str,
    pub title: &'static str,
    pub method: &'static str,
    pub path: &'static str,
}

impl Feature {
    pub const ALL: [Feature; 6] = [
        Feature::SkillDemandForecasting,
        Feature::ResumeAnalyzer,
        Feature::GeoHeatmap,
        Feature::SalaryEstimator,
        Feature::CompareRoles,
        Feature::PersonalizationGrowth,
    ];

    pub fn slug(self) -> &'static str {
        match self {
            Feature::SkillDemandForecasting => "skill-demand-forecasting",
            Feature::ResumeAnalyzer => "resume-analyzer",
            Feature::GeoHeatmap => "geo-heatmap",
            Feature::SalaryEstimator => "salary-estimator",
            Feature::CompareRoles => "compare-roles",
            Feature::PersonalizationGrowth => "personalization-growth",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Feature::SkillDemandForecasting => "Skill Demand Forecasting",
            Feature::ResumeAnalyzer => "Resume Analyzer",
            Feature::GeoHeatmap => "Geo Heatmap",
            Feature::SalaryEstimator => "Salary Estimator",
            Feature::CompareRoles => "Compare Roles",
            Feature::PersonalizationGrowth => "Personalization & Growth",
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            Feature::SkillDemandForecasting => "/api/v1/forecast",
            Feature::ResumeAnalyzer => "/api/v1/resume/analyze",
            Feature::GeoHeatmap => "/api/v1/geo",
            Feature::SalaryEstimator => "/api/v1/salary",
            Feature::CompareRoles => "/api/v1/compare",
            Feature::PersonalizationGrowth => "/api/v1/feedback",
        }
    }

    pub fn method(self) -> &'static str {
        match self {
            Feature::ResumeAnalyzer | Feature::PersonalizationGrowth => "POST",
            Feature::SkillDemandForecasting
            | Feature::GeoHeatmap
            | Feature::SalaryEstimator
            | Feature::CompareRoles => "GET",
        }
    }

    /// The handler serving this feature at [`Feature::path`].
    pub fn method_router(self) -> MethodRouter<AppState> {
        match self {
            Feature::SkillDemandForecasting => get(analysis::handle_forecast),
            Feature::ResumeAnalyzer => post(analysis::handle_analyze_resume),
            Feature::GeoHeatmap => get(data::handle_geo),
            Feature::SalaryEstimator => get(data::handle_salary),
            Feature::CompareRoles => get(data::handle_compare),
            Feature::PersonalizationGrowth => post(feedback::handle_feedback),
        }
    }

    pub fn info(self) -> FeatureInfo {
        FeatureInfo {
            slug: self.slug(),
            title: self.title(),
            method: self.method(),
            path: self.path(),
        }
    }
}

impl FromStr for Feature {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Feature::ALL
            .into_iter()
            .find(|f| f.slug() == s)
            .ok_or_else(|| format!("unknown feature '{s}'"))
    }
}

/// GET /api/v1/features
pub async fn handle_list_features() -> Json<Vec<FeatureInfo>> {
    Json(Feature::ALL.into_iter().map(Feature::info).collect())
}

/// GET /api/v1/features/:slug
pub async fn handle_get_feature(Path(slug): Path<String>) -> Result<Json<FeatureInfo>, AppError> {
    let feature = slug.parse::<Feature>().map_err(AppError::NotFound)?;
    Ok(Json(feature.info()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slug_round_trips_through_from_str() {
        for feature in Feature::ALL {
            assert_eq!(feature.slug().parse::<Feature>().unwrap(), feature);
        }
    }

    #[test]
    fn test_unknown_slug_is_rejected() {
        assert!("theme-settings".parse::<Feature>().is_err());
    }

    #[test]
    fn test_paths_and_slugs_are_unique() {
        let paths: HashSet<_> = Feature::ALL.iter().map(|f| f.path()).collect();
        let slugs: HashSet<_> = Feature::ALL.iter().map(|f| f.slug()).collect();
        assert_eq!(paths.len(), Feature::ALL.len());
        assert_eq!(slugs.len(), Feature::ALL.len());
    }

    #[test]
    fn test_titles_match_dashboard_labels() {
        assert_eq!(Feature::SalaryEstimator.title(), "Salary Estimator");
        assert_eq!(Feature::PersonalizationGrowth.title(), "Personalization & Growth");
    }

    #[tokio::test]
    async fn test_list_features_returns_all() {
        let Json(list) = handle_list_features().await;
        assert_eq!(list.len(), 6);
        assert_eq!(list[0].slug, "skill-demand-forecasting");
        assert_eq!(list[1].method, "POST");
    }

    #[tokio::test]
    async fn test_get_feature_by_slug() {
        let Json(info) = handle_get_feature(Path("geo-heatmap".to_string())).await.unwrap();
        assert_eq!(info.path, "/api/v1/geo");

        let err = handle_get_feature(Path("nope".to_string())).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
