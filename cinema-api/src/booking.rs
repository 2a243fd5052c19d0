//! Detail → seats → payment → success screens.
//!
//! Every screen reads its state from the query string and answers with the
//! location of the next screen; nothing is held between requests.

use std::time::Duration;

use axum::{
    extract::{RawQuery, State},
    routing::get,
    Json, Router,
};
use chrono::Local;
use cinema_catalog::SeatState;
use cinema_core::navigation::{Page, Redirect};
use cinema_core::payment::PaymentForm;
use cinema_core::search::Movie;
use cinema_core::ticket::Ticket;
use cinema_order::{
    BookingContext, BookingError, CheckoutSummary, ConfirmationContext, SeatSelection,
    SelectionSummary,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;

const SUCCESS_REDIRECT_DELAY: Duration = Duration::from_secs(10);

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct BookingPage {
    pub title: String,
    pub movie: Option<Movie>,
    pub showtimes: Vec<String>,
    pub selected_showtime: Option<String>,
    pub context: BookingContext,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ShowtimeRequest {
    pub showtime: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SeatView {
    pub id: String,
    pub state: SeatState,
}

#[derive(Debug, Serialize)]
pub struct SeatRowView {
    pub row: char,
    pub seats: Vec<SeatView>,
}

#[derive(Debug, Serialize)]
pub struct SeatsPage {
    pub title: String,
    pub showtime: Option<String>,
    pub unit_price: String,
    pub rows: Vec<SeatRowView>,
    pub summary: SelectionSummary,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SeatsRequest {
    /// Seats clicked, in order. Clicking a seat twice deselects it.
    pub seats: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct SeatsResponse {
    pub summary: SelectionSummary,
    pub redirect: Redirect,
}

#[derive(Debug, Serialize)]
pub struct ShowtimeResponse {
    pub context: BookingContext,
    pub redirect: Redirect,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub ticket: Ticket,
    pub redirect: Redirect,
}

#[derive(Debug, Serialize)]
pub struct SuccessPage {
    pub confirmation: ConfirmationContext,
    pub redirect: Redirect,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/booking", get(booking_page).post(choose_showtime))
        .route("/v1/seats", get(seats_page).post(confirm_seats))
        .route("/v1/payment", get(payment_page).post(submit_payment))
        .route("/v1/success", get(success_page))
}

fn booking_context(query: Option<String>) -> BookingContext {
    BookingContext::decode(query.as_deref().unwrap_or_default())
}

async fn movie_for(state: &AppState, context: &BookingContext) -> Option<Movie> {
    let movie = context.movie_ref()?;
    state.catalog.details(&movie).await.found()
}

fn selection(state: &AppState, context: BookingContext) -> SeatSelection {
    SeatSelection::new(
        context,
        state.seating.layout,
        &state.seating.taken,
        state.pricing.as_ref().clone(),
    )
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/booking?movie|imdbId
/// Movie detail with the showtimes on offer
async fn booking_page(State(state): State<AppState>, RawQuery(query): RawQuery) -> Json<BookingPage> {
    let context = booking_context(query);
    let movie = movie_for(&state, &context).await;

    Json(BookingPage {
        title: movie
            .as_ref()
            .map(|m| m.title.clone())
            .unwrap_or_else(|| "Movie".to_string()),
        movie,
        showtimes: state.showtimes.as_ref().clone(),
        selected_showtime: context.showtime.clone(),
        context,
    })
}

/// POST /v1/booking?movie|imdbId
/// Pick a showtime and move on to the seat map
async fn choose_showtime(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    Json(req): Json<ShowtimeRequest>,
) -> Result<Json<ShowtimeResponse>, AppError> {
    let context = booking_context(query)
        .choose_showtime(req.showtime.as_deref(), &state.showtimes)?;

    Ok(Json(ShowtimeResponse {
        redirect: Redirect::with_query(Page::Seats, &context.encode()),
        context,
    }))
}

/// GET /v1/seats?movie|imdbId&showtime
/// Fresh seat map; the selection always starts empty
async fn seats_page(State(state): State<AppState>, RawQuery(query): RawQuery) -> Json<SeatsPage> {
    let context = booking_context(query);
    let title = match context.movie_ref() {
        Some(movie) => state.catalog.title_for(&movie).await,
        None => "Movie".to_string(),
    };

    let flow = selection(&state, context);
    let rows = flow
        .seat_map()
        .rows()
        .map(|(row, seats)| SeatRowView {
            row,
            seats: seats
                .iter()
                .map(|seat| SeatView {
                    id: seat.id.clone(),
                    state: seat.state,
                })
                .collect(),
        })
        .collect();

    Json(SeatsPage {
        title,
        showtime: flow.context().showtime.clone(),
        unit_price: state.pricing.format_whole(state.pricing.config().unit_price_cents),
        rows,
        summary: flow.summary(),
    })
}

/// POST /v1/seats?movie|imdbId&showtime
/// Apply the clicked seats and hand the selection to the payment screen
async fn confirm_seats(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    Json(req): Json<SeatsRequest>,
) -> Result<Json<SeatsResponse>, AppError> {
    let mut flow = selection(&state, booking_context(query));
    for seat in &req.seats {
        flow.toggle(seat.trim())?;
    }

    let next = flow.confirm().ok_or(BookingError::NoSeatsSelected)?;

    Ok(Json(SeatsResponse {
        summary: flow.summary(),
        redirect: Redirect::with_query(Page::Payment, &next.encode()),
    }))
}

/// GET /v1/payment?movie|imdbId&showtime&seats
/// Order summary with totals
async fn payment_page(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
) -> Json<CheckoutSummary> {
    let context = booking_context(query);
    let movie = movie_for(&state, &context).await;

    Json(CheckoutSummary::build(
        &context,
        movie.as_ref(),
        &state.pricing,
        Local::now().date_naive(),
    ))
}

/// POST /v1/payment?movie|imdbId&showtime&seats
/// Validate the card form and store the ticket
async fn submit_payment(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    Json(form): Json<PaymentForm>,
) -> Result<Json<PaymentResponse>, AppError> {
    let context = booking_context(query);
    let movie = movie_for(&state, &context).await;
    let summary = CheckoutSummary::build(
        &context,
        movie.as_ref(),
        &state.pricing,
        Local::now().date_naive(),
    );

    let receipt = state.checkout().submit(&summary, &form).await?;

    Ok(Json(PaymentResponse {
        redirect: Redirect::with_query(Page::Success, &receipt.confirmation.encode()),
        ticket: receipt.ticket,
    }))
}

/// GET /v1/success?movie&datetime&seats&total
/// Confirmation; the client returns to the listing after ten seconds
async fn success_page(RawQuery(query): RawQuery) -> Json<SuccessPage> {
    Json(SuccessPage {
        confirmation: ConfirmationContext::decode(query.as_deref().unwrap_or_default()),
        redirect: Redirect::to(Page::Movies).after(SUCCESS_REDIRECT_DELAY),
    })
}
