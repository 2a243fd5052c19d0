pub mod client;
pub mod pricing;
pub mod sample;
pub mod seating;
pub mod service;

pub use client::{CatalogError, MovieCatalog, OmdbClient};
pub use pricing::{PricingConfig, PricingEngine};
pub use sample::SampleCatalog;
pub use seating::{SeatError, SeatLayout, SeatMap, SeatState, DEFAULT_TAKEN_SEATS};
pub use service::{BatchSettings, CatalogService, Listing, ListingKind, MovieCard};
