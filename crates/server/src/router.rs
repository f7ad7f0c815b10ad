use super::{errors::handle_panic, handlers, state::AppState};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Any origin may call the API from a browser.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
}

/// Creates the Axum router with all the application routes.
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        .route(
            "/generate_guidance_sentence_only",
            post(handlers::generate_guidance_sentence_only_handler),
        )
        .route("/generate_guidance", post(handlers::generate_guidance_handler))
        .route("/extract_keywords", post(handlers::extract_keywords_handler))
        .with_state(app_state)
        .layer(CatchPanicLayer::custom(handle_panic))
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}
