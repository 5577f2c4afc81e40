use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn app(state: Arc<AppState>) -> Router {
    let cors = cors_layer(state.config.cors_allow_origin.as_deref());

    let router = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/bookings",
            get(handlers::bookings::list_bookings).post(handlers::bookings::create_booking),
        )
        .route(
            "/bookings/check-availability",
            post(handlers::bookings::check_availability),
        )
        .route(
            "/bookings/available-slots",
            post(handlers::bookings::available_slots),
        )
        .route(
            "/bookings/:id",
            get(handlers::bookings::get_booking)
                .put(handlers::bookings::update_booking)
                .delete(handlers::bookings::delete_booking),
        )
        .route(
            "/bookings/:id/confirm",
            post(handlers::bookings::confirm_booking),
        )
        .route(
            "/bookings/:id/cancel",
            post(handlers::bookings::cancel_booking),
        )
        .route(
            "/bookings/:id/complete",
            post(handlers::bookings::complete_booking),
        )
        .route("/services", post(handlers::services::create_service))
        .route("/services/:id", get(handlers::services::get_service))
        .route(
            "/barbers/:barber_id/services",
            get(handlers::services::list_barber_services),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    match cors {
        Some(cors) => router.layer(cors),
        None => router,
    }
}

fn cors_layer(origin: Option<&str>) -> Option<CorsLayer> {
    let origin = origin?;
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if origin == "*" {
        return Some(layer.allow_origin(Any));
    }

    match origin.parse::<HeaderValue>() {
        Ok(value) => Some(layer.allow_origin(value)),
        Err(_) => {
            tracing::warn!(origin, "ignoring invalid CORS_ALLOW_ORIGIN");
            None
        }
    }
}
