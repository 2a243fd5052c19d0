use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub catalog: CatalogSettings,
    pub storage: StorageSettings,
    pub pricing: PricingSettings,
    pub seating: SeatingSettings,
    pub showtimes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogSettings {
    /// Metadata API key. Unset (or the placeholder) switches to the sample catalog.
    pub api_key: Option<String>,
    pub base_url: String,
    pub batch_size: usize,
    pub batch_delay_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Memory,
    File,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PricingSettings {
    pub unit_price_cents: i64,
    pub service_fee_cents: i64,
    pub currency_symbol: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SeatingSettings {
    pub rows: u8,
    pub seats_per_row: u8,
    pub taken: Vec<String>,
}

pub const API_KEY_PLACEHOLDER: &str = "your_api_key_here";

impl CatalogSettings {
    /// The configured key, if it is a real one.
    pub fn effective_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && *key != API_KEY_PLACEHOLDER)
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::builder()?
            .add_source(config::File::with_name("config/default").required(false))
            // Per-environment overrides, e.g. config/production.toml
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `CINEMA__CATALOG__API_KEY=abc123` sets `catalog.api_key`
            .add_source(config::Environment::with_prefix("CINEMA").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Built-in defaults only, no files or environment.
    pub fn defaults() -> Result<Self, config::ConfigError> {
        Self::builder()?.build()?.try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.port", 8080_i64)?
            .set_default("catalog.base_url", "https://www.omdbapi.com/")?
            .set_default("catalog.batch_size", 5_i64)?
            .set_default("catalog.batch_delay_ms", 200_i64)?
            .set_default("storage.backend", "memory")?
            .set_default("storage.path", "data/storage.json")?
            .set_default("pricing.unit_price_cents", 1200_i64)?
            .set_default("pricing.service_fee_cents", 200_i64)?
            .set_default("pricing.currency_symbol", "$")?
            .set_default("seating.rows", 8_i64)?
            .set_default("seating.seats_per_row", 10_i64)?
            .set_default(
                "seating.taken",
                vec![
                    "A4", "A5", "B3", "B6", "C4", "C5", "D7", "D8", "E2", "F5", "F6", "G3", "G4", "G8",
                ],
            )?
            .set_default(
                "showtimes",
                vec!["10:30 AM", "1:15 PM", "4:00 PM", "7:30 PM", "10:15 PM"],
            )
    }
}
