use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;
use cinema_core::repository::TicketRepository;
use cinema_order::{build_history, TicketHistory};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().route("/v1/tickets", get(list_tickets))
}

/// GET /v1/tickets
/// Upcoming and past tickets, newest first
async fn list_tickets(State(state): State<AppState>) -> Result<Json<TicketHistory>, AppError> {
    let tickets = state.storage.list_tickets().await?;
    let history = build_history(tickets, &state.catalog, Local::now().date_naive()).await;
    Ok(Json(history))
}
