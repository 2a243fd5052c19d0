use cinema_catalog::seating::{SeatError, SeatLayout, SeatMap, SeatState};
use cinema_catalog::PricingEngine;
use serde::Serialize;

use crate::context::BookingContext;

/// Summary panel of the seat screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SelectionSummary {
    /// Sorted ids joined with `, `, or `-` when nothing is selected.
    pub seats: String,
    pub count: usize,
    pub total: String,
    pub confirm_enabled: bool,
}

/// Controller for one seat screen: the grid, the running selection and the
/// incoming booking context. Dropped when the screen is left.
#[derive(Debug, Clone)]
pub struct SeatSelection {
    context: BookingContext,
    seats: SeatMap,
    pricing: PricingEngine,
}

impl SeatSelection {
    pub fn new<S: AsRef<str>>(
        context: BookingContext,
        layout: SeatLayout,
        taken: &[S],
        pricing: PricingEngine,
    ) -> Self {
        Self {
            context,
            seats: SeatMap::new(layout, taken),
            pricing,
        }
    }

    pub fn context(&self) -> &BookingContext {
        &self.context
    }

    pub fn seat_map(&self) -> &SeatMap {
        &self.seats
    }

    pub fn toggle(&mut self, seat_id: &str) -> Result<SeatState, SeatError> {
        self.seats.toggle(seat_id)
    }

    pub fn summary(&self) -> SelectionSummary {
        let count = self.seats.selected_count();
        if count == 0 {
            return SelectionSummary {
                seats: "-".to_string(),
                count,
                total: self.pricing.format_whole(0),
                confirm_enabled: false,
            };
        }

        SelectionSummary {
            seats: self.seats.sorted_selection().join(", "),
            count,
            total: self.pricing.format_whole(self.pricing.seat_total(count)),
            confirm_enabled: true,
        }
    }

    /// Context for the payment screen, or `None` while nothing is selected.
    pub fn confirm(&self) -> Option<BookingContext> {
        if self.seats.selected_count() == 0 {
            return None;
        }

        Some(self.context.with_seats(self.seats.selection_string()))
    }
}
