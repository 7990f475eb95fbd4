pub mod flights;
pub mod users;

use axum::{http::StatusCode, routing::get, Json, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

use common::types::Health;
use service::{FlightService, UserService};

/// Path ids parse as signed integers; a negative id never names a record.
pub(crate) fn stored_id(id: i64) -> Option<u64> {
    u64::try_from(id).ok()
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn metrics() -> (StatusCode, String) {
    common::metrics::encode_metrics()
}

fn with_layers(router: Router, cors: CorsLayer) -> Router {
    router
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}

/// `/users` collection plus health and metrics.
pub fn build_users_router(svc: UserService, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route("/users/:id", get(users::get).put(users::update).delete(users::delete))
        .with_state(svc);
    with_layers(api, cors)
}

/// `/flights` collection plus health and metrics.
pub fn build_flights_router(svc: FlightService, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/flights", get(flights::list).post(flights::create))
        .route("/flights/:id", get(flights::get).put(flights::update).delete(flights::delete))
        .with_state(svc);
    with_layers(api, cors)
}
