use axum::http::{header, HeaderValue};
use axum::routing::{get, patch, put};
use axum::Router;
use tower::ServiceBuilder;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::create_cors_layer;
use crate::handlers::{
    cancel_event, create_event, delete_event, get_event, health_check, list_events, not_found,
    reschedule_event, update_event_details,
};
use crate::state::AppState;

/// Event routes, relative to the API prefix.
pub fn event_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/event",
            get(get_event).post(create_event).delete(delete_event),
        )
        .route("/event/details", put(update_event_details))
        .route("/event/cancel", patch(cancel_event))
        .route("/event/reschedule", patch(reschedule_event))
        .route("/events", get(list_events))
}

pub fn create_routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .nest("/api/v1", event_routes())
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer())
                .layer(SetResponseHeaderLayer::overriding(
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                ))
                .layer(SetResponseHeaderLayer::overriding(
                    header::X_CONTENT_TYPE_OPTIONS,
                    HeaderValue::from_static("nosniff"),
                )),
        )
}
