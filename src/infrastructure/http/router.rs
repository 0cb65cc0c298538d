use crate::infrastructure::http::controllers::{rules, vocabulary};
use crate::infrastructure::http::middleware::AppState;
use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub fn build_router(state: AppState) -> Router {
    let console = Router::new()
        // Vocabulary routes
        .route("/console/vocabulary", get(vocabulary::get_vocabulary))
        .route(
            "/console/vocabulary/triggers/:rule_type",
            get(vocabulary::get_triggers),
        )
        .route(
            "/console/vocabulary/conditions/:field",
            get(vocabulary::get_condition_row),
        )
        .route(
            "/console/vocabulary/actions/:action_type",
            get(vocabulary::get_action_row),
        )
        .route(
            "/console/custom-fields/refresh",
            post(vocabulary::refresh_custom_fields),
        )
        // Rule routes
        .route("/console/rules", get(rules::list_rules).post(rules::create_rule))
        .route("/console/rules/:id", axum::routing::delete(rules::delete_rule))
        .route("/console/rules/:id/active", patch(rules::set_rule_active));

    Router::new()
        .route("/health", get(health_handler))
        .merge(console)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health_handler() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
