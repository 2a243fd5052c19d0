use std::fmt;

use serde::{Deserialize, Serialize};

pub const POSTER_PLACEHOLDER: &str = "https://via.placeholder.com/300x450?text=No+Poster";
pub const SYNOPSIS_EXCERPT_CHARS: usize = 150;

/// How a movie is addressed: a slug from the built-in sample catalog or an
/// identifier of the external metadata service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MovieRef {
    Local(String),
    External(String),
}

impl MovieRef {
    pub fn as_str(&self) -> &str {
        match self {
            MovieRef::Local(slug) => slug,
            MovieRef::External(id) => id,
        }
    }

    /// External ids look like `tt0133093`; anything else is treated as a slug.
    pub fn parse(raw: &str) -> Self {
        let is_external = raw.len() > 2
            && raw.starts_with("tt")
            && raw[2..].chars().all(|c| c.is_ascii_digit());
        if is_external {
            MovieRef::External(raw.to_string())
        } else {
            MovieRef::Local(raw.to_string())
        }
    }
}

impl fmt::Display for MovieRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieRef,
    pub title: String,
    pub year: String,
    pub rating: Option<String>,
    pub runtime: Option<String>,
    pub genres: Vec<String>,
    pub poster_url: Option<String>,
    pub synopsis: Option<String>,
}

impl Movie {
    pub fn primary_genre(&self) -> &str {
        self.genres.first().map(String::as_str).unwrap_or("Movie")
    }

    pub fn genre_label(&self) -> String {
        if self.genres.is_empty() {
            "Movie".to_string()
        } else {
            self.genres.join(", ")
        }
    }

    pub fn poster_or_placeholder(&self) -> &str {
        self.poster_url.as_deref().unwrap_or(POSTER_PLACEHOLDER)
    }

    pub fn rating_value(&self) -> Option<f32> {
        self.rating.as_deref().and_then(|r| r.parse().ok())
    }

    pub fn year_value(&self) -> Option<i32> {
        // Series years come as `2019–2022`; the first four digits are enough.
        self.year.get(..4).and_then(|y| y.parse().ok())
    }

    pub fn has_genre(&self, genre: &str) -> bool {
        self.genres.iter().any(|g| g.eq_ignore_ascii_case(genre))
    }

    pub fn synopsis_excerpt(&self) -> String {
        match &self.synopsis {
            Some(text) => {
                let excerpt: String = text.chars().take(SYNOPSIS_EXCERPT_CHARS).collect();
                format!("{}...", excerpt)
            }
            None => "No description available.".to_string(),
        }
    }
}

/// One hit of a free-text search, before details are fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSummary {
    pub id: MovieRef,
    pub title: String,
    pub year: String,
    pub poster_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    pub movies: Vec<MovieSummary>,
    pub total_results: u32,
}

/// Result of asking the metadata service for something.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "data", rename_all = "snake_case")]
pub enum Lookup<T> {
    Found(T),
    NotFound,
    Error(String),
}

impl<T> Lookup<T> {
    pub fn found(self) -> Option<T> {
        match self {
            Lookup::Found(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_found(&self) -> bool {
        matches!(self, Lookup::Found(_))
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Lookup<U> {
        match self {
            Lookup::Found(value) => Lookup::Found(f(value)),
            Lookup::NotFound => Lookup::NotFound,
            Lookup::Error(reason) => Lookup::Error(reason),
        }
    }
}
