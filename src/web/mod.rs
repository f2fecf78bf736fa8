pub mod campaigns;
pub mod companies;
pub mod departments;
pub mod risk;
pub mod setup;

use crate::config::RunMode;
use crate::error::AppError;
use crate::state::SharedState;
use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Unknown API paths answer with JSON instead of falling through to the SPA.
async fn api_not_found() -> AppError {
    AppError::NotFound("route")
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/companies", companies::router(state.clone()))
        .nest("/departments", departments::router(state.clone()))
        .nest("/campaigns", campaigns::router(state.clone()))
        .nest("/risk", risk::router(state.clone()))
        .nest("/setup", setup::router(state))
        .fallback(api_not_found)
}

/// Full application: `/api` plus, in production, the built SPA with
/// `index.html` as fallback for client-side routes.
pub fn app(state: SharedState) -> Router {
    let config = state.config.clone();
    let router = Router::new().nest("/api", routes(state));

    let router = match config.mode {
        RunMode::Production => {
            let index = config.static_dir.join("index.html");
            let spa = ServeDir::new(&config.static_dir).not_found_service(ServeFile::new(index));
            router.fallback_service(spa)
        }
        RunMode::Development => router.layer(CorsLayer::permissive()),
    };

    router.layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
}
