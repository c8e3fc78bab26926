use std::sync::Arc;

use crate::analysis::forecast::Forecaster;
use crate::analysis::resume::SkillExtractor;
use crate::config::Config;
use crate::data::models::Dataset;
use crate::data::store::DataStore;
use crate::errors::AppError;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// The process-wide dataset cache. Loaded once, read by every request.
    pub store: Arc<DataStore>,
    pub config: Config,
    /// Pluggable resume skill extractor. Default: KeywordSkillExtractor.
    pub skill_extractor: Arc<dyn SkillExtractor>,
    /// Pluggable demand forecaster. Default: LinearTrendForecaster.
    pub forecaster: Arc<dyn Forecaster>,
}

impl AppState {
    /// Returns the cached dataset. If the store is unloaded (failed reload),
    /// the load runs on the blocking pool.
    pub async fn dataset(&self) -> Result<Arc<Dataset>, AppError> {
        if let Some(dataset) = self.store.peek() {
            return Ok(dataset);
        }
        let store = Arc::clone(&self.store);
        let dataset = tokio::task::spawn_blocking(move || store.get())
            .await
            .map_err(|e| AppError::Internal(e.into()))??;
        Ok(dataset)
    }
}
