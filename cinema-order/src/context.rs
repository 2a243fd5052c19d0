//! Booking state carried between screens in the query string.
//!
//! Each screen receives everything it needs as query parameters; nothing is
//! kept server-side between requests. Decoding never fails: a malformed or
//! partial query simply yields a context with fewer fields set.

use cinema_core::search::MovieRef;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BookingError {
    #[error("Please select a showtime first!")]
    ShowtimeRequired,

    #[error("Showtime {0} is not offered")]
    UnknownShowtime(String),

    #[error("Please select at least one seat")]
    NoSeatsSelected,
}

/// Movie, showtime and seats chosen so far.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingContext {
    /// Slug of a sample-catalog movie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<String>,

    /// External metadata id. Takes precedence over `movie`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub showtime: Option<String>,

    /// Comma-joined seat ids, e.g. `A1,A2`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<String>,
}

impl BookingContext {
    pub fn for_movie(movie: &MovieRef) -> Self {
        match movie {
            MovieRef::Local(slug) => Self {
                movie: Some(slug.clone()),
                ..Self::default()
            },
            MovieRef::External(id) => Self {
                imdb_id: Some(id.clone()),
                ..Self::default()
            },
        }
    }

    pub fn decode(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let decoded: Self = serde_urlencoded::from_str(query).unwrap_or_default();
        Self {
            movie: non_empty(decoded.movie),
            imdb_id: non_empty(decoded.imdb_id),
            showtime: non_empty(decoded.showtime),
            seats: non_empty(decoded.seats),
        }
    }

    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }

    pub fn movie_ref(&self) -> Option<MovieRef> {
        self.imdb_id
            .as_ref()
            .map(|id| MovieRef::External(id.clone()))
            .or_else(|| self.movie.as_deref().map(MovieRef::parse))
    }

    pub fn seat_list(&self) -> Vec<String> {
        self.seats
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Record the chosen showtime. `offered` empty means any value is accepted.
    pub fn choose_showtime(
        &self,
        showtime: Option<&str>,
        offered: &[String],
    ) -> Result<Self, BookingError> {
        let showtime = showtime
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or(BookingError::ShowtimeRequired)?;

        if !offered.is_empty() && !offered.iter().any(|o| o == showtime) {
            return Err(BookingError::UnknownShowtime(showtime.to_string()));
        }

        Ok(Self {
            showtime: Some(showtime.to_string()),
            seats: None,
            ..self.clone()
        })
    }

    pub fn with_seats(&self, seats: impl Into<String>) -> Self {
        Self {
            seats: non_empty(Some(seats.into())),
            ..self.clone()
        }
    }
}

/// What the success screen shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfirmationContext {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie: Option<String>,

    /// `<date> - <time>`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seats: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<String>,
}

impl ConfirmationContext {
    pub fn decode(query: &str) -> Self {
        let query = query.trim_start_matches('?');
        let decoded: Self = serde_urlencoded::from_str(query).unwrap_or_default();
        Self {
            movie: non_empty(decoded.movie),
            datetime: non_empty(decoded.datetime),
            seats: non_empty(decoded.seats),
            total: non_empty(decoded.total),
        }
    }

    pub fn encode(&self) -> String {
        serde_urlencoded::to_string(self).unwrap_or_default()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_decode() {
        let ctx = BookingContext {
            movie: None,
            imdb_id: Some("tt0133093".into()),
            showtime: Some("7:30 PM".into()),
            seats: Some("A1,A2".into()),
        };
        let query = ctx.encode();
        assert!(query.contains("imdbId=tt0133093"));
        assert!(!query.contains("A1,A2"));
        assert_eq!(BookingContext::decode(&query), ctx);
    }

    #[test]
    fn test_decode_degrades_gracefully() {
        let partial = BookingContext::decode("?movie=matrix&seats=");
        assert_eq!(partial.movie.as_deref(), Some("matrix"));
        assert!(partial.seats.is_none());
        assert!(partial.seat_list().is_empty());
        assert_eq!(partial.movie_ref(), Some(MovieRef::Local("matrix".into())));

        assert_eq!(BookingContext::decode("%%%&&=="), BookingContext::default());
        assert!(BookingContext::decode("").movie_ref().is_none());
    }

    #[test]
    fn test_external_id_wins() {
        let ctx = BookingContext::decode("movie=matrix&imdbId=tt0133093");
        assert_eq!(ctx.movie_ref(), Some(MovieRef::External("tt0133093".into())));
    }

    #[test]
    fn test_choose_showtime() {
        let offered = vec!["10:30 AM".to_string(), "7:30 PM".to_string()];
        let ctx = BookingContext::for_movie(&MovieRef::Local("inception".into()));

        assert_eq!(
            ctx.choose_showtime(None, &offered),
            Err(BookingError::ShowtimeRequired)
        );
        assert_eq!(
            ctx.choose_showtime(Some("9:00 AM"), &offered),
            Err(BookingError::UnknownShowtime("9:00 AM".into()))
        );

        let chosen = ctx.choose_showtime(Some("7:30 PM"), &offered).unwrap();
        assert_eq!(chosen.showtime.as_deref(), Some("7:30 PM"));
        assert_eq!(chosen.movie.as_deref(), Some("inception"));
    }

    #[test]
    fn test_confirmation_context() {
        let confirmation = ConfirmationContext {
            movie: Some("The Matrix".into()),
            datetime: Some("Oct 18, 2026 - 7:30 PM".into()),
            seats: Some("A1,A2".into()),
            total: Some("$26.00".into()),
        };
        let decoded = ConfirmationContext::decode(&confirmation.encode());
        assert_eq!(decoded, confirmation);
        assert!(ConfirmationContext::decode("movie=").movie.is_none());
    }
}
