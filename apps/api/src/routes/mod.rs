pub mod feedback;
pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::analysis::handlers as analysis;
use crate::data::handlers as data;
use crate::features::{handle_get_feature, handle_list_features, Feature};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let mut router: Router<AppState> = Router::new()
        .route("/health", get(health::health_handler))
        .route("/api/v1/features", get(handle_list_features))
        .route("/api/v1/features/:slug", get(handle_get_feature))
        // Dataset API
        .route("/api/v1/dataset/summary", get(data::handle_summary))
        .route("/api/v1/dataset/reload", post(data::handle_reload))
        .route("/api/v1/values/:field", get(data::handle_unique_values))
        .route("/api/v1/skills/trending", get(data::handle_trending))
        .route("/api/v1/skills/:skill/series", get(data::handle_skill_series))
        // Resume upload shares the analyzer feature
        .route("/api/v1/resume/upload", post(analysis::handle_upload_resume));

    for feature in Feature::ALL {
        router = router.route(feature.path(), feature.method_router());
    }

    router.with_state(state)
}
