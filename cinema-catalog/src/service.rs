use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use cinema_core::search::{Lookup, Movie, MovieRef, MovieSummary, POSTER_PLACEHOLDER};
use futures_util::future::join_all;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::client::MovieCatalog;
use crate::sample::SampleCatalog;

/// Search terms combined for the default listing.
pub const DEFAULT_SEARCH_TERMS: [&str; 5] = ["action", "drama", "comedy", "sci-fi", "thriller"];

/// Cards shown per listing.
pub const LISTING_SIZE: usize = 15;

/// Search hits resolved before the trending filter is applied.
pub const TRENDING_CANDIDATES: usize = 20;

pub const TRENDING_MIN_RATING: f32 = 7.5;

/// Results per page returned by the metadata API.
const API_PAGE_SIZE: u32 = 10;

/// Shortest free-text query that is sent to the API.
pub const MIN_QUERY_LENGTH: usize = 2;

/// Fallback title when a movie cannot be resolved.
pub const UNKNOWN_TITLE: &str = "Movie";

pub fn genre_search_term(genre: &str) -> String {
    match genre {
        "Action" => "action".to_string(),
        "Drama" => "drama".to_string(),
        "Comedy" => "comedy".to_string(),
        "Horror" => "horror".to_string(),
        "Romance" => "romance".to_string(),
        "Sci-Fi" => "sci-fi".to_string(),
        other => other.to_lowercase(),
    }
}

// ============================================================================
// Cards & listings
// ============================================================================

/// Display-ready movie tile. `detailed` is false when only the search
/// summary was available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovieCard {
    pub id: MovieRef,
    pub title: String,
    pub year: String,
    pub genre: String,
    pub rating: Option<String>,
    pub runtime: Option<String>,
    pub poster_url: String,
    pub description: String,
    pub detailed: bool,
}

impl MovieCard {
    pub fn from_movie(movie: &Movie) -> Self {
        Self {
            id: movie.id.clone(),
            title: movie.title.clone(),
            year: movie.year.clone(),
            genre: movie.primary_genre().to_string(),
            rating: movie.rating.clone(),
            runtime: movie.runtime.clone(),
            poster_url: movie.poster_or_placeholder().to_string(),
            description: movie.synopsis_excerpt(),
            detailed: true,
        }
    }

    pub fn from_summary(summary: &MovieSummary) -> Self {
        Self {
            id: summary.id.clone(),
            title: summary.title.clone(),
            year: summary.year.clone(),
            genre: UNKNOWN_TITLE.to_string(),
            rating: None,
            runtime: None,
            poster_url: summary
                .poster_url
                .clone()
                .unwrap_or_else(|| POSTER_PLACEHOLDER.to_string()),
            description: "No description available.".to_string(),
            detailed: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ListingKind {
    Featured,
    Trending,
    Genre,
    Search,
}

#[derive(Debug, Clone, Serialize)]
pub struct Listing {
    pub kind: ListingKind,
    pub page: u32,
    pub cards: Vec<MovieCard>,
    pub has_more: bool,
    /// Shown in place of cards when nothing matched.
    pub message: Option<String>,
}

impl Listing {
    fn new(kind: ListingKind, page: u32, cards: Vec<MovieCard>, has_more: bool) -> Self {
        let message = if cards.is_empty() {
            Some(
                match kind {
                    ListingKind::Genre => "No movies found in this genre.",
                    ListingKind::Search => "No movies found. Try a different search.",
                    _ => "No movies available right now.",
                }
                .to_string(),
            )
        } else {
            None
        };

        Self {
            kind,
            page,
            cards,
            has_more,
            message,
        }
    }
}

/// A search hit after its details were requested.
#[derive(Debug, Clone)]
enum Resolved {
    Detailed(Movie),
    Basic(MovieSummary),
}

impl Resolved {
    fn card(&self) -> MovieCard {
        match self {
            Resolved::Detailed(movie) => MovieCard::from_movie(movie),
            Resolved::Basic(summary) => MovieCard::from_summary(summary),
        }
    }
}

// ============================================================================
// Service
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct BatchSettings {
    pub batch_size: usize,
    pub batch_delay: Duration,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            batch_delay: Duration::from_millis(200),
        }
    }
}

/// Movie lookups with the sample catalog as fallback.
///
/// When `remote` is `None` (no API key configured) every listing is served
/// from [`SampleCatalog`]. Details fetched from the remote API are cached by
/// external id for the lifetime of the service.
pub struct CatalogService {
    remote: Option<Arc<dyn MovieCatalog>>,
    sample: SampleCatalog,
    cache: RwLock<HashMap<String, Movie>>,
    batch: BatchSettings,
}

impl CatalogService {
    pub fn new(remote: Option<Arc<dyn MovieCatalog>>, batch: BatchSettings) -> Self {
        if remote.is_none() {
            info!("No metadata API key configured, serving the sample catalog");
        }
        Self {
            remote,
            sample: SampleCatalog,
            cache: RwLock::new(HashMap::new()),
            batch,
        }
    }

    pub fn offline() -> Self {
        Self::new(None, BatchSettings::default())
    }

    pub fn is_remote(&self) -> bool {
        self.remote.is_some()
    }

    /// Details for a slug or an external id.
    pub async fn details(&self, movie: &MovieRef) -> Lookup<Movie> {
        match movie {
            MovieRef::Local(slug) => match self.sample.get(slug) {
                Some(movie) => Lookup::Found(movie),
                None => Lookup::NotFound,
            },
            MovieRef::External(imdb_id) => {
                if let Some(cached) = self.cache.read().await.get(imdb_id) {
                    return Lookup::Found(cached.clone());
                }

                let Some(remote) = &self.remote else {
                    return Lookup::NotFound;
                };

                let lookup = remote.details(imdb_id).await;
                if let Lookup::Found(movie) = &lookup {
                    self.cache
                        .write()
                        .await
                        .insert(imdb_id.clone(), movie.clone());
                }
                lookup
            }
        }
    }

    /// Title for headings; unresolvable movies read as `Movie`.
    pub async fn title_for(&self, movie: &MovieRef) -> String {
        self.details(movie)
            .await
            .found()
            .map(|m| m.title)
            .unwrap_or_else(|| UNKNOWN_TITLE.to_string())
    }

    /// Default listing: the first three search terms combined.
    pub async fn featured(&self) -> Listing {
        let Some(remote) = &self.remote else {
            let cards = self.sample.all().iter().map(MovieCard::from_movie).collect();
            return Listing::new(ListingKind::Featured, 1, cards, false);
        };

        let searches = DEFAULT_SEARCH_TERMS[..3]
            .iter()
            .map(|term| remote.search(term, 1));
        let summaries = unique(collect_hits(join_all(searches).await));

        let picked: Vec<_> = summaries.into_iter().take(LISTING_SIZE).collect();
        let cards = self.resolve_all(picked).await.iter().map(Resolved::card).collect();
        Listing::new(ListingKind::Featured, 1, cards, true)
    }

    /// Highly rated or very recent releases from the last five years.
    pub async fn trending(&self, current_year: i32) -> Listing {
        let movies = match &self.remote {
            None => self.sample.all(),
            Some(remote) => {
                let years: Vec<String> = (0..5).map(|i| (current_year - i).to_string()).collect();
                let searches = years.iter().map(|year| remote.search(year, 1));
                let summaries = unique(collect_hits(join_all(searches).await));

                let picked: Vec<_> = summaries.into_iter().take(TRENDING_CANDIDATES).collect();
                self.resolve_all(picked)
                    .await
                    .into_iter()
                    .filter_map(|r| match r {
                        Resolved::Detailed(movie) => Some(movie),
                        Resolved::Basic(_) => None,
                    })
                    .collect()
            }
        };

        let cards = rank_trending(movies, current_year)
            .iter()
            .take(LISTING_SIZE)
            .map(MovieCard::from_movie)
            .collect();
        Listing::new(ListingKind::Trending, 1, cards, false)
    }

    /// Listing for a genre tag. Cards whose details could not be loaded are
    /// kept since their genre is unknown.
    pub async fn by_genre(&self, genre: &str, page: u32) -> Listing {
        let page = page.max(1);
        let Some(remote) = &self.remote else {
            let cards = self
                .sample
                .all()
                .iter()
                .filter(|m| m.has_genre(genre))
                .map(MovieCard::from_movie)
                .collect();
            return Listing::new(ListingKind::Genre, page, cards, false);
        };

        let term = genre_search_term(genre);
        let (hits, total) = match remote.search(&term, page).await {
            Lookup::Found(result) => (result.movies, result.total_results),
            Lookup::NotFound => (Vec::new(), 0),
            Lookup::Error(reason) => {
                warn!(genre, %reason, "Genre listing failed");
                (Vec::new(), 0)
            }
        };

        let picked: Vec<_> = hits.into_iter().take(LISTING_SIZE).collect();
        let cards = self
            .resolve_all(picked)
            .await
            .iter()
            .filter(|r| match r {
                Resolved::Detailed(movie) => movie.has_genre(genre),
                Resolved::Basic(_) => true,
            })
            .map(Resolved::card)
            .collect();

        Listing::new(ListingKind::Genre, page, cards, has_more(page, total))
    }

    /// Free-text search. Queries shorter than two characters show the
    /// default listing instead.
    pub async fn search(&self, query: &str, page: u32) -> Listing {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LENGTH {
            return self.featured().await;
        }
        let page = page.max(1);

        let result = match &self.remote {
            Some(remote) => match remote.search(query, page).await {
                Lookup::Error(reason) => {
                    warn!(query, %reason, "Search failed, using the sample catalog");
                    Lookup::Found(self.sample.search(query))
                }
                other => other,
            },
            None => Lookup::Found(self.sample.search(query)),
        };

        match result {
            Lookup::Found(result) => {
                let total = result.total_results;
                let cards = self
                    .resolve_all(result.movies)
                    .await
                    .iter()
                    .map(Resolved::card)
                    .collect();
                Listing::new(ListingKind::Search, page, cards, has_more(page, total))
            }
            _ => Listing::new(ListingKind::Search, page, Vec::new(), false),
        }
    }

    /// Fetch details in batches, pausing between batches.
    async fn resolve_all(&self, summaries: Vec<MovieSummary>) -> Vec<Resolved> {
        let batch_size = self.batch.batch_size.max(1);
        let mut resolved = Vec::with_capacity(summaries.len());

        for (index, batch) in summaries.chunks(batch_size).enumerate() {
            if index > 0 && self.remote.is_some() {
                tokio::time::sleep(self.batch.batch_delay).await;
            }

            let details = join_all(batch.iter().map(|s| self.details(&s.id))).await;
            for (summary, lookup) in batch.iter().zip(details) {
                resolved.push(match lookup {
                    Lookup::Found(movie) => Resolved::Detailed(movie),
                    _ => Resolved::Basic(summary.clone()),
                });
            }
        }

        debug!(count = resolved.len(), "Resolved movie details");
        resolved
    }
}

fn collect_hits(results: Vec<Lookup<cinema_core::search::SearchPage>>) -> Vec<MovieSummary> {
    results
        .into_iter()
        .filter_map(Lookup::found)
        .flat_map(|page| page.movies)
        .collect()
}

/// Drop repeated ids, keeping the first occurrence.
fn unique(summaries: Vec<MovieSummary>) -> Vec<MovieSummary> {
    let mut seen = HashSet::new();
    summaries
        .into_iter()
        .filter(|s| seen.insert(s.id.clone()))
        .collect()
}

fn has_more(page: u32, total_results: u32) -> bool {
    page.saturating_mul(API_PAGE_SIZE) < total_results
}

fn rank_trending(movies: Vec<Movie>, current_year: i32) -> Vec<Movie> {
    let mut trending: Vec<Movie> = movies
        .into_iter()
        .filter(|m| {
            let rating = m.rating_value().unwrap_or(0.0);
            let year = m.year_value().unwrap_or(0);
            rating >= TRENDING_MIN_RATING || year >= current_year - 2
        })
        .collect();

    trending.sort_by(|a, b| {
        let a = a.rating_value().unwrap_or(0.0);
        let b = b.rating_value().unwrap_or(0.0);
        b.total_cmp(&a)
    });
    trending
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cinema_core::search::SearchPage;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeCatalog {
        detail_calls: AtomicUsize,
    }

    impl FakeCatalog {
        fn new() -> Self {
            Self {
                detail_calls: AtomicUsize::new(0),
            }
        }
    }

    fn summary(id: &str, title: &str) -> MovieSummary {
        MovieSummary {
            id: MovieRef::External(id.to_string()),
            title: title.to_string(),
            year: "2024".to_string(),
            poster_url: None,
        }
    }

    #[async_trait]
    impl MovieCatalog for FakeCatalog {
        async fn search(&self, query: &str, _page: u32) -> Lookup<SearchPage> {
            match query {
                "action" => Lookup::Found(SearchPage {
                    movies: vec![summary("tt0000001", "Fast"), summary("tt0000002", "Loud")],
                    total_results: 25,
                }),
                "drama" => Lookup::Found(SearchPage {
                    movies: vec![summary("tt0000002", "Loud"), summary("tt0000003", "Sad")],
                    total_results: 2,
                }),
                "broken" => Lookup::Error("Request limit reached!".to_string()),
                _ => Lookup::NotFound,
            }
        }

        async fn details(&self, imdb_id: &str) -> Lookup<Movie> {
            self.detail_calls.fetch_add(1, Ordering::SeqCst);
            if imdb_id == "tt0000003" {
                return Lookup::NotFound;
            }
            Lookup::Found(Movie {
                id: MovieRef::External(imdb_id.to_string()),
                title: format!("Movie {}", imdb_id),
                year: "2024".to_string(),
                rating: Some("6.1".to_string()),
                runtime: Some("99 min".to_string()),
                genres: vec!["Action".to_string()],
                poster_url: None,
                synopsis: None,
            })
        }
    }

    fn service(fake: Arc<FakeCatalog>) -> CatalogService {
        CatalogService::new(
            Some(fake as Arc<dyn MovieCatalog>),
            BatchSettings {
                batch_size: 2,
                batch_delay: Duration::from_millis(1),
            },
        )
    }

    #[tokio::test]
    async fn test_offline_featured_uses_sample() {
        let catalog = CatalogService::offline();
        let listing = catalog.featured().await;
        assert_eq!(listing.cards.len(), 8);
        assert!(listing.cards.iter().all(|c| c.detailed));
    }

    #[tokio::test]
    async fn test_featured_dedupes_and_marks_basic_cards() {
        let fake = Arc::new(FakeCatalog::new());
        let listing = service(fake).featured().await;

        let ids: Vec<_> = listing.cards.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["tt0000001", "tt0000002", "tt0000003"]);
        assert!(!listing.cards[2].detailed);
        assert_eq!(listing.cards[2].genre, "Movie");
    }

    #[tokio::test]
    async fn test_details_are_cached() {
        let fake = Arc::new(FakeCatalog::new());
        let catalog = service(fake.clone());
        let id = MovieRef::External("tt0000001".into());

        assert!(catalog.details(&id).await.is_found());
        assert!(catalog.details(&id).await.is_found());
        assert_eq!(fake.detail_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_title_fallback() {
        let catalog = CatalogService::offline();
        assert_eq!(catalog.title_for(&MovieRef::Local("matrix".into())).await, "The Matrix");
        assert_eq!(catalog.title_for(&MovieRef::External("tt9".into())).await, "Movie");
    }

    #[tokio::test]
    async fn test_search_pagination_and_short_query() {
        let fake = Arc::new(FakeCatalog::new());
        let catalog = service(fake);

        let listing = catalog.search("action", 1).await;
        assert_eq!(listing.kind, ListingKind::Search);
        assert!(listing.has_more);

        let short = catalog.search("a", 1).await;
        assert_eq!(short.kind, ListingKind::Featured);

        let none = catalog.search("nothing", 1).await;
        assert!(none.cards.is_empty());
        assert!(none.message.is_some());
    }

    #[tokio::test]
    async fn test_search_error_falls_back_to_sample() {
        let fake = Arc::new(FakeCatalog::new());
        let listing = service(fake).search("broken", 1).await;
        assert!(listing.cards.is_empty());
        assert_eq!(listing.kind, ListingKind::Search);
    }

    #[tokio::test]
    async fn test_genre_keeps_unresolved_cards() {
        let fake = Arc::new(FakeCatalog::new());
        let listing = service(fake).by_genre("Drama", 1).await;
        // tt0000002 resolves as Action only; tt0000003 has no details.
        let ids: Vec<_> = listing.cards.iter().map(|c| c.id.as_str().to_string()).collect();
        assert_eq!(ids, vec!["tt0000003"]);
    }

    #[tokio::test]
    async fn test_offline_genre_and_trending() {
        let catalog = CatalogService::offline();
        let crime = catalog.by_genre("Crime", 1).await;
        assert_eq!(crime.cards.len(), 2);

        let trending = catalog.trending(2026).await;
        assert_eq!(trending.cards[0].title, "The Shawshank Redemption");
    }

    #[test]
    fn test_rank_trending() {
        let movie = |id: &str, year: &str, rating: &str| Movie {
            id: MovieRef::External(id.to_string()),
            title: id.to_string(),
            year: year.to_string(),
            rating: Some(rating.to_string()),
            runtime: None,
            genres: Vec::new(),
            poster_url: None,
            synopsis: None,
        };

        let ranked = rank_trending(
            vec![
                movie("old-low", "2021", "6.0"),
                movie("new-low", "2025", "5.5"),
                movie("old-high", "2022", "8.1"),
            ],
            2026,
        );
        let ids: Vec<_> = ranked.iter().map(|m| m.title.as_str()).collect();
        assert_eq!(ids, vec!["old-high", "new-low"]);
    }

    #[test]
    fn test_genre_search_term() {
        assert_eq!(genre_search_term("Sci-Fi"), "sci-fi");
        assert_eq!(genre_search_term("Western"), "western");
    }
}
