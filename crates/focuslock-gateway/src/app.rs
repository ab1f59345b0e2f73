use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use focuslock_core::config::FocusConfig;
use focuslock_store::PlannerStore;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;

/// Central shared state: passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: FocusConfig,
    /// Built once at startup; handlers never reach for a global client.
    pub store: Arc<dyn PlannerStore>,
}

impl AppState {
    pub fn new(config: FocusConfig, store: Arc<dyn PlannerStore>) -> Self {
        Self { config, store }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.gateway.cors.origins);

    let routes = Router::new()
        .route("/api/health", get(crate::http::health::health_handler))
        .route(
            "/api/assignments",
            post(crate::http::assignments::save_assignment_handler),
        )
        .route(
            "/api/assignments/latest",
            get(crate::http::assignments::latest_assignment_handler),
        )
        .route(
            "/api/assignments/{id}",
            get(crate::http::assignments::get_assignment_handler),
        )
        .fallback(crate::http::errors::not_found)
        .with_state(state);

    with_layers(routes, cors)
}

/// Panic capture innermost, then CORS, then request tracing.
fn with_layers(router: Router, cors: CorsLayer) -> Router {
    router
        .layer(CatchPanicLayer::custom(crate::http::errors::internal_error))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// CORS for the browser front-end: listed origins only, JSON POSTs.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(%origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
}
