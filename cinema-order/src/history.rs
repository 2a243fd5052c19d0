use std::cmp::Reverse;

use chrono::{DateTime, NaiveDate};
use cinema_catalog::CatalogService;
use cinema_core::search::{Lookup, MovieRef};
use cinema_core::ticket::Ticket;
use futures_util::future::join_all;
use serde::Serialize;

pub const THEATER_NAME: &str = "Cineplex Downtown";
pub const TICKET_POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/150x200?text=No+Poster";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Upcoming,
    Completed,
}

/// A stored ticket with display fields resolved.
#[derive(Debug, Clone, Serialize)]
pub struct TicketView {
    #[serde(flatten)]
    pub ticket: Ticket,
    pub title: String,
    pub genre: String,
    pub poster: String,
    pub theater: &'static str,
    pub status: TicketStatus,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TicketHistory {
    pub upcoming: Vec<TicketView>,
    pub completed: Vec<TicketView>,
}

/// Show date of a ticket: ISO or `Oct 28, 2025`, else the day it was booked.
pub fn show_date(ticket: &Ticket) -> NaiveDate {
    parse_ticket_date(&ticket.date).unwrap_or_else(|| ticket.booking_date.date_naive())
}

fn parse_ticket_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.date_naive())
        .ok()
        .or_else(|| NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok())
        .or_else(|| NaiveDate::parse_from_str(raw, "%b %d, %Y").ok())
}

/// Split tickets into upcoming (shown today or later) and completed,
/// newest first within each group.
pub async fn build_history(
    tickets: Vec<Ticket>,
    catalog: &CatalogService,
    today: NaiveDate,
) -> TicketHistory {
    let mut dated: Vec<(NaiveDate, Ticket)> =
        tickets.into_iter().map(|t| (show_date(&t), t)).collect();
    dated.sort_by_key(|(date, _)| Reverse(*date));

    let views = join_all(
        dated
            .into_iter()
            .map(|(date, ticket)| resolve_view(ticket, date >= today, catalog)),
    )
    .await;

    let (upcoming, completed): (Vec<TicketView>, Vec<TicketView>) = views
        .into_iter()
        .partition(|view| view.status == TicketStatus::Upcoming);

    TicketHistory {
        upcoming,
        completed,
    }
}

async fn resolve_view(ticket: Ticket, upcoming: bool, catalog: &CatalogService) -> TicketView {
    let stored_poster = ticket.movie_poster.clone();
    let fallback_title = if ticket.movie_title.is_empty() {
        "Movie".to_string()
    } else {
        ticket.movie_title.clone()
    };
    let fallback_genre = if ticket.movie_genre.is_empty() {
        "Movie".to_string()
    } else {
        ticket.movie_genre.clone()
    };

    let details = match &ticket.imdb_id {
        Some(id) => catalog.details(&MovieRef::External(id.clone())).await,
        None => Lookup::NotFound,
    };

    let (title, genre, poster) = match details {
        Lookup::Found(movie) => (
            movie.title.clone(),
            movie.primary_genre().to_string(),
            movie.poster_url.clone().or(stored_poster),
        ),
        _ => (fallback_title, fallback_genre, stored_poster),
    };

    TicketView {
        ticket,
        title,
        genre,
        poster: poster.unwrap_or_else(|| TICKET_POSTER_PLACEHOLDER.to_string()),
        theater: THEATER_NAME,
        status: if upcoming {
            TicketStatus::Upcoming
        } else {
            TicketStatus::Completed
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ticket(id: &str, date: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            movie_title: "Inception".to_string(),
            movie_genre: String::new(),
            movie_poster: None,
            date: date.to_string(),
            time: "7:30 PM".to_string(),
            seats: "A1".to_string(),
            total: "$14.00".to_string(),
            imdb_id: None,
            booking_date: Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_date_parsing() {
        assert_eq!(show_date(&ticket("a", "Oct 8, 2026")), NaiveDate::from_ymd_opt(2026, 10, 8).unwrap());
        assert_eq!(show_date(&ticket("b", "2026-03-01")), NaiveDate::from_ymd_opt(2026, 3, 1).unwrap());
        assert_eq!(show_date(&ticket("c", "someday")), NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[tokio::test]
    async fn test_split_and_order() {
        let catalog = CatalogService::offline();
        let today = NaiveDate::from_ymd_opt(2026, 10, 18).unwrap();
        let tickets = vec![
            ticket("old", "Sep 1, 2026"),
            ticket("today", "Oct 18, 2026"),
            ticket("older", "Aug 1, 2026"),
            ticket("later", "Nov 2, 2026"),
        ];

        let history = build_history(tickets, &catalog, today).await;
        let upcoming: Vec<_> = history.upcoming.iter().map(|v| v.ticket.id.as_str()).collect();
        let completed: Vec<_> = history.completed.iter().map(|v| v.ticket.id.as_str()).collect();
        assert_eq!(upcoming, vec!["later", "today"]);
        assert_eq!(completed, vec!["old", "older"]);

        let view = &history.upcoming[0];
        assert_eq!(view.genre, "Movie");
        assert_eq!(view.poster, TICKET_POSTER_PLACEHOLDER);
        assert_eq!(view.theater, THEATER_NAME);
    }
}
