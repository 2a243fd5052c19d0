use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{Datelike, Local};
use cinema_catalog::Listing;
use cinema_core::identity::CurrentUser;
use cinema_core::search::{Lookup, Movie, MovieRef};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub genre: Option<String>,
    /// `trending` switches to the trending listing.
    pub filter: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HomeResponse {
    pub current_user: Option<CurrentUser>,
    pub guest: bool,
    pub featured: Listing,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/v1/home", get(home))
        .route("/v1/home/guest", get(guest_home))
        .route("/v1/movies", get(list_movies))
        .route("/v1/movies/{id}", get(movie_details))
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /v1/home
/// Landing screen for the signed-in user (falls back to guest view)
async fn home(State(state): State<AppState>) -> Result<Json<HomeResponse>, AppError> {
    let current_user = state.accounts().current_user().await?;
    let featured = state.catalog.featured().await;

    Ok(Json(HomeResponse {
        guest: current_user.is_none(),
        current_user,
        featured,
    }))
}

/// GET /v1/home/guest
async fn guest_home(State(state): State<AppState>) -> Json<HomeResponse> {
    Json(HomeResponse {
        current_user: None,
        guest: true,
        featured: state.catalog.featured().await,
    })
}

/// GET /v1/movies?q&page&genre&filter
/// Featured, trending, genre or free-text listing
async fn list_movies(
    State(state): State<AppState>,
    Query(query): Query<ListingQuery>,
) -> Json<Listing> {
    let page = query.page.unwrap_or(1);
    debug!(?query, "Movie listing");

    let listing = if query.filter.as_deref() == Some("trending") {
        state.catalog.trending(Local::now().year()).await
    } else if let Some(genre) = query.genre.as_deref().filter(|g| !g.is_empty() && *g != "All") {
        state.catalog.by_genre(genre, page).await
    } else if let Some(q) = query.q.as_deref() {
        state.catalog.search(q, page).await
    } else {
        state.catalog.featured().await
    };

    Json(listing)
}

/// GET /v1/movies/{id}
/// Details by sample slug or external id
async fn movie_details(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Movie>, AppError> {
    match state.catalog.details(&MovieRef::parse(&id)).await {
        Lookup::Found(movie) => Ok(Json(movie)),
        Lookup::NotFound | Lookup::Error(_) => {
            Err(AppError::NotFoundError(format!("Movie {} not found", id)))
        }
    }
}
