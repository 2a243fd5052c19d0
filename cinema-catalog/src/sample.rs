//! Built-in catalog used when no metadata API key is configured.

use cinema_core::search::{Movie, MovieRef, MovieSummary, SearchPage};

struct SampleMovie {
    slug: &'static str,
    title: &'static str,
    year: &'static str,
    rating: &'static str,
    runtime: &'static str,
    genres: &'static [&'static str],
    poster: &'static str,
    synopsis: &'static str,
}

const SAMPLE_MOVIES: [SampleMovie; 8] = [
    SampleMovie {
        slug: "inception",
        title: "Inception",
        year: "2010",
        rating: "8.8",
        runtime: "2h 28m",
        genres: &["Sci-Fi", "Action"],
        poster: "https://www.johnpaulcaponigro.com/blog/wp-content/uploads/2024/03/Inception.jpg",
        synopsis: "A thief who steals corporate secrets through the use of dream-sharing technology is given the inverse task of planting an idea into the mind of a CEO.",
    },
    SampleMovie {
        slug: "shawshank",
        title: "The Shawshank Redemption",
        year: "1994",
        rating: "9.3",
        runtime: "2h 22m",
        genres: &["Drama"],
        poster: "https://static.wikitide.net/allthetropeswiki/e/e7/Shawshank_Redemption.jpg",
        synopsis: "Two imprisoned men bond over a number of years, finding solace and eventual redemption through acts of common decency.",
    },
    SampleMovie {
        slug: "dark-knight",
        title: "The Dark Knight",
        year: "2008",
        rating: "9.0",
        runtime: "2h 32m",
        genres: &["Action", "Drama"],
        poster: "https://static.wikitide.net/allthetropeswiki/2/2e/The_Dark_Knight_Film_Poster.jpg",
        synopsis: "When the menace known as the Joker wreaks havoc on Gotham, Batman must accept one of the greatest psychological tests to fight injustice.",
    },
    SampleMovie {
        slug: "interstellar",
        title: "Interstellar",
        year: "2014",
        rating: "8.6",
        runtime: "2h 49m",
        genres: &["Sci-Fi", "Drama"],
        poster: "https://static.wikitide.net/allthetropeswiki/thumb/8/87/Interestelar_Portuguese_Language_Poster.jpg/450px-Interestelar_Portuguese_Language_Poster.jpg",
        synopsis: "A team of explorers travel through a wormhole in space in an attempt to ensure humanity's survival.",
    },
    SampleMovie {
        slug: "pulp-fiction",
        title: "Pulp Fiction",
        year: "1994",
        rating: "8.9",
        runtime: "2h 34m",
        genres: &["Drama", "Crime"],
        poster: "https://static.wikitide.net/allthetropeswiki/7/70/Pulp_Fiction_sm_6352.jpg",
        synopsis: "The lives of two mob hitmen, a boxer, a gangster and his wife intertwine in four tales of violence and redemption.",
    },
    SampleMovie {
        slug: "matrix",
        title: "The Matrix",
        year: "1999",
        rating: "8.7",
        runtime: "2h 16m",
        genres: &["Sci-Fi", "Action"],
        poster: "https://static.wikitide.net/allthetropeswiki/d/d4/MATRIX.jpg",
        synopsis: "A computer hacker learns from mysterious rebels about the true nature of his reality and his role in the war against its controllers.",
    },
    SampleMovie {
        slug: "forrest-gump",
        title: "Forrest Gump",
        year: "1994",
        rating: "8.8",
        runtime: "2h 22m",
        genres: &["Drama", "Romance"],
        poster: "https://resizing.flixster.com/hqcqFfWf1syt2OrGlbW7LDvfj9Y=/fit-in/352x330/v2/https://resizing.flixster.com/-XZAfHZM39UwaGJIFWKAE8fS0ak=/v3/t/assets/p15829_v_v13_aa.jpg",
        synopsis: "The presidencies of Kennedy and Johnson, the Vietnam War, and other historical events unfold from the perspective of an Alabama man.",
    },
    SampleMovie {
        slug: "godfather",
        title: "The Godfather",
        year: "1972",
        rating: "9.2",
        runtime: "2h 55m",
        genres: &["Drama", "Crime"],
        poster: "https://static.wikitide.net/allthetropeswiki/f/f6/The-godfather-poster-c12172921.jpg",
        synopsis: "The aging patriarch of an organized crime dynasty transfers control of his clandestine empire to his reluctant son.",
    },
];

impl SampleMovie {
    fn to_movie(&self) -> Movie {
        Movie {
            id: MovieRef::Local(self.slug.to_string()),
            title: self.title.to_string(),
            year: self.year.to_string(),
            rating: Some(self.rating.to_string()),
            runtime: Some(self.runtime.to_string()),
            genres: self.genres.iter().map(|g| g.to_string()).collect(),
            poster_url: Some(self.poster.to_string()),
            synopsis: Some(self.synopsis.to_string()),
        }
    }
}

/// Fixed set of eight movies addressed by slug.
#[derive(Debug, Clone, Copy, Default)]
pub struct SampleCatalog;

impl SampleCatalog {
    pub fn all(&self) -> Vec<Movie> {
        SAMPLE_MOVIES.iter().map(SampleMovie::to_movie).collect()
    }

    pub fn get(&self, slug: &str) -> Option<Movie> {
        SAMPLE_MOVIES
            .iter()
            .find(|m| m.slug == slug)
            .map(SampleMovie::to_movie)
    }

    /// Case-insensitive match on title or any genre. An empty query matches all.
    pub fn search(&self, query: &str) -> SearchPage {
        let needle = query.trim().to_lowercase();
        let movies: Vec<MovieSummary> = self
            .all()
            .into_iter()
            .filter(|m| {
                needle.is_empty()
                    || m.title.to_lowercase().contains(&needle)
                    || m.genres.iter().any(|g| g.to_lowercase() == needle)
            })
            .map(|m| MovieSummary {
                id: m.id,
                title: m.title,
                year: m.year,
                poster_url: m.poster_url,
            })
            .collect();

        SearchPage {
            total_results: movies.len() as u32,
            movies,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eight_movies() {
        let catalog = SampleCatalog;
        assert_eq!(catalog.all().len(), 8);
        let matrix = catalog.get("matrix").unwrap();
        assert_eq!(matrix.title, "The Matrix");
        assert_eq!(matrix.genre_label(), "Sci-Fi, Action");
        assert!(catalog.get("tt0133093").is_none());
    }

    #[test]
    fn test_search_by_title_and_genre() {
        let catalog = SampleCatalog;
        assert_eq!(catalog.search("dark").movies.len(), 1);
        assert_eq!(catalog.search("crime").total_results, 2);
        assert_eq!(catalog.search("").total_results, 8);
        assert!(catalog.search("western").movies.is_empty());
    }
}
