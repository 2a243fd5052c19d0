use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod booking;
pub mod error;
pub mod health;
pub mod movies;
pub mod profile;
pub mod state;
pub mod tickets;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(health::routes())
        .merge(movies::routes())
        .merge(booking::routes())
        .merge(tickets::routes())
        .merge(auth::routes())
        .merge(profile::routes())
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
