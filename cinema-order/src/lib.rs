pub mod checkout;
pub mod context;
pub mod flow;
pub mod history;

pub use checkout::{Checkout, CheckoutError, CheckoutReceipt, CheckoutSummary};
pub use context::{BookingContext, BookingError, ConfirmationContext};
pub use flow::{SeatSelection, SelectionSummary};
pub use history::{build_history, TicketHistory, TicketStatus, TicketView};
