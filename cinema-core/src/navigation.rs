use std::time::Duration;

use serde::{Serialize, Serializer};

/// Screens of the booking flow. Each one is addressed by a path; any state it
/// needs travels in the query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    GuestHome,
    Movies,
    Booking,
    Seats,
    Payment,
    Success,
    Tickets,
    Profile,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Home => "/v1/home",
            Page::GuestHome => "/v1/home/guest",
            Page::Movies => "/v1/movies",
            Page::Booking => "/v1/booking",
            Page::Seats => "/v1/seats",
            Page::Payment => "/v1/payment",
            Page::Success => "/v1/success",
            Page::Tickets => "/v1/tickets",
            Page::Profile => "/v1/profile",
        }
    }

    /// Path plus an already-encoded query string.
    pub fn with_query(&self, query: &str) -> String {
        if query.is_empty() {
            self.path().to_string()
        } else {
            format!("{}?{}", self.path(), query)
        }
    }
}

/// A navigation the client should perform, optionally after a delay.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Redirect {
    pub location: String,
    #[serde(rename = "delay_ms", serialize_with = "as_millis")]
    pub delay: Duration,
}

impl Redirect {
    pub fn to(page: Page) -> Self {
        Self {
            location: page.path().to_string(),
            delay: Duration::ZERO,
        }
    }

    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_query(page: Page, query: &str) -> Self {
        Self {
            location: page.with_query(query),
            delay: Duration::ZERO,
        }
    }
}

fn as_millis<S: Serializer>(delay: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(delay.as_millis() as u64)
}
