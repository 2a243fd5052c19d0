use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use cinema_catalog::PricingEngine;
use cinema_core::payment::{PaymentError, PaymentForm};
use cinema_core::repository::TicketRepository;
use cinema_core::search::Movie;
use cinema_core::ticket::Ticket;
use cinema_core::CoreError;
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::context::{BookingContext, ConfirmationContext};

pub const DISPLAY_DATE_FORMAT: &str = "%b %-d, %Y";

#[derive(Debug, thiserror::Error)]
pub enum CheckoutError {
    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("No seats selected")]
    MissingSeats,

    #[error("Storage error: {0}")]
    Storage(#[from] CoreError),
}

/// Order panel of the payment screen, rendered from the booking context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckoutSummary {
    pub movie_title: String,
    pub movie_genre: String,
    pub movie_poster: Option<String>,
    pub imdb_id: Option<String>,
    /// Booking date, e.g. `Oct 18, 2026`.
    pub date: String,
    pub time: String,
    pub seats: String,
    pub seat_count: usize,
    /// `Tickets (2x)`
    pub tickets_label: String,
    /// Totals stay empty until seats are known.
    pub tickets_price: Option<String>,
    pub service_fee: Option<String>,
    pub total: Option<String>,
}

impl CheckoutSummary {
    pub fn build(
        context: &BookingContext,
        movie: Option<&Movie>,
        pricing: &PricingEngine,
        today: NaiveDate,
    ) -> Self {
        let seats = context.seat_list();
        let seat_count = seats.len();
        let priced = seat_count > 0;

        Self {
            movie_title: movie
                .map(|m| m.title.clone())
                .unwrap_or_else(|| "Movie".to_string()),
            movie_genre: movie.map(Movie::genre_label).unwrap_or_default(),
            movie_poster: movie.and_then(|m| m.poster_url.clone()),
            imdb_id: context.imdb_id.clone(),
            date: today.format(DISPLAY_DATE_FORMAT).to_string(),
            time: context.showtime.clone().unwrap_or_else(|| "-".to_string()),
            seats: context.seats.clone().unwrap_or_else(|| "-".to_string()),
            seat_count,
            tickets_label: format!("Tickets ({}x)", seat_count),
            tickets_price: priced.then(|| pricing.format_exact(pricing.seat_total(seat_count))),
            service_fee: priced.then(|| pricing.format_exact(pricing.config().service_fee_cents)),
            total: priced.then(|| pricing.format_exact(pricing.booking_total(seat_count))),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub ticket: Ticket,
    pub confirmation: ConfirmationContext,
}

/// Validates the payment form and appends the resulting ticket.
///
/// Submitting the same summary twice stores two tickets with different ids;
/// there is no duplicate guard.
pub struct Checkout {
    tickets: Arc<dyn TicketRepository>,
}

impl Checkout {
    pub fn new(tickets: Arc<dyn TicketRepository>) -> Self {
        Self { tickets }
    }

    pub async fn submit(
        &self,
        summary: &CheckoutSummary,
        form: &PaymentForm,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        // 1. Validate the masked form; nothing is written on failure
        form.normalized().validate()?;

        let total = summary.total.clone().ok_or(CheckoutError::MissingSeats)?;

        // 2. Snapshot the summary into a ticket
        let ticket = Ticket {
            id: Uuid::now_v7().to_string(),
            movie_title: summary.movie_title.clone(),
            movie_genre: summary.movie_genre.clone(),
            movie_poster: summary.movie_poster.clone(),
            date: summary.date.clone(),
            time: summary.time.clone(),
            seats: summary.seats.clone(),
            total: total.clone(),
            imdb_id: summary.imdb_id.clone(),
            booking_date: Utc::now(),
        };

        // 3. Read-modify-write the ticket list
        let mut tickets = self.tickets.list_tickets().await?;
        tickets.push(ticket.clone());
        self.tickets.save_tickets(&tickets).await?;

        info!(
            ticket_id = %ticket.id,
            movie = %ticket.movie_title,
            seats = %ticket.seats,
            "Ticket booked"
        );

        let confirmation = ConfirmationContext {
            movie: Some(ticket.movie_title.clone()),
            datetime: Some(format!("{} - {}", ticket.date, ticket.time)),
            seats: Some(ticket.seats.clone()),
            total: Some(total),
        };

        Ok(CheckoutReceipt {
            ticket,
            confirmation,
        })
    }
}
