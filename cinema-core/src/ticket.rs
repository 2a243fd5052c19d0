use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed (simulated) purchase. Tickets are only ever appended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub movie_title: String,
    #[serde(default)]
    pub movie_genre: String,
    #[serde(default)]
    pub movie_poster: Option<String>,
    /// Display date, e.g. `Oct 18, 2026`.
    #[serde(default)]
    pub date: String,
    /// Showtime as carried in the booking context.
    #[serde(default)]
    pub time: String,
    #[serde(default)]
    pub seats: String,
    #[serde(default)]
    pub total: String,
    #[serde(default)]
    pub imdb_id: Option<String>,
    pub booking_date: DateTime<Utc>,
}
