//! HTTP client for the OMDb-style movie metadata API.
//!
//! Raw responses carry a `Response: "True" | "False"` flag and use the literal
//! `"N/A"` for missing fields. Both are resolved here so that callers only see
//! [`Lookup`] values with optional fields.

use async_trait::async_trait;
use cinema_core::search::{Lookup, Movie, MovieRef, MovieSummary, SearchPage};
use serde::Deserialize;
use tracing::{debug, warn};

/// Remote source of movie metadata.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Free-text title search, one page at a time.
    async fn search(&self, query: &str, page: u32) -> Lookup<SearchPage>;

    /// Full details for one external identifier.
    async fn details(&self, imdb_id: &str) -> Lookup<Movie>;
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Metadata API error ({status}): {body}")]
    ApiError { status: u16, body: String },
}

pub struct OmdbClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    pub fn with_client(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    async fn fetch<T: serde::de::DeserializeOwned>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl MovieCatalog for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Lookup<SearchPage> {
        let page = page.max(1).to_string();
        let params = [("s", query), ("type", "movie"), ("page", page.as_str())];

        match self.fetch::<RawSearch>(&params).await {
            Ok(raw) => {
                let lookup = raw.into_lookup();
                debug!(query, found = lookup.is_found(), "Catalog search");
                lookup
            }
            Err(e) => {
                warn!(query, error = %e, "Catalog search failed");
                Lookup::Error(e.to_string())
            }
        }
    }

    async fn details(&self, imdb_id: &str) -> Lookup<Movie> {
        let params = [("i", imdb_id), ("plot", "full")];

        match self.fetch::<RawDetails>(&params).await {
            Ok(raw) => raw.into_lookup(),
            Err(e) => {
                warn!(imdb_id, error = %e, "Catalog details request failed");
                Lookup::Error(e.to_string())
            }
        }
    }
}

// ============================================================================
// Wire format
// ============================================================================

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSearch {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Search")]
    search: Vec<RawSummary>,
    #[serde(rename = "totalResults")]
    total_results: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawSummary {
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct RawDetails {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "imdbRating")]
    rating: Option<String>,
    #[serde(rename = "Runtime")]
    runtime: Option<String>,
    #[serde(rename = "Genre")]
    genre: Option<String>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Plot")]
    plot: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty() && v != "N/A")
}

fn failure<T>(error: Option<String>) -> Lookup<T> {
    let reason = error.unwrap_or_else(|| "Unknown error".to_string());
    let lower = reason.to_lowercase();
    if lower.contains("not found") || lower.contains("incorrect imdb id") {
        Lookup::NotFound
    } else {
        Lookup::Error(reason)
    }
}

impl RawSearch {
    pub(crate) fn into_lookup(self) -> Lookup<SearchPage> {
        if self.response != "True" {
            return failure(self.error);
        }

        let movies = self
            .search
            .into_iter()
            .map(|raw| MovieSummary {
                id: MovieRef::External(raw.imdb_id),
                title: raw.title,
                year: raw.year,
                poster_url: present(raw.poster),
            })
            .collect::<Vec<_>>();

        let total_results = self
            .total_results
            .and_then(|t| t.parse().ok())
            .unwrap_or(movies.len() as u32);

        Lookup::Found(SearchPage {
            movies,
            total_results,
        })
    }
}

impl RawDetails {
    pub(crate) fn into_lookup(self) -> Lookup<Movie> {
        if self.response != "True" {
            return failure(self.error);
        }

        let genres = present(self.genre)
            .map(|g| {
                g.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Lookup::Found(Movie {
            id: MovieRef::External(self.imdb_id),
            title: self.title,
            year: self.year,
            rating: present(self.rating),
            runtime: present(self.runtime),
            genres,
            poster_url: present(self.poster),
            synopsis: present(self.plot),
        })
    }
}
