use std::sync::Arc;
use std::time::Duration;

use cinema_account::{AccountManager, ProfileManager};
use cinema_catalog::service::BatchSettings;
use cinema_catalog::{
    CatalogService, MovieCatalog, OmdbClient, PricingConfig, PricingEngine, SeatLayout,
};
use cinema_order::Checkout;
use cinema_store::app_config::{Config, StorageBackend};
use cinema_store::{FileStore, MemoryStore, Storage};

/// Auditorium the seat screen is built from.
#[derive(Debug, Clone)]
pub struct Seating {
    pub layout: SeatLayout,
    pub taken: Vec<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<Storage>,
    pub catalog: Arc<CatalogService>,
    pub pricing: Arc<PricingEngine>,
    pub seating: Arc<Seating>,
    pub showtimes: Arc<Vec<String>>,
}

impl AppState {
    pub async fn from_config(config: &Config) -> anyhow::Result<Self> {
        let storage = match config.storage.backend {
            StorageBackend::Memory => Storage::in_memory(),
            StorageBackend::File => {
                let local = FileStore::open(&config.storage.path).await?;
                // Session scope never touches disk
                Storage::new(Arc::new(local), Arc::new(MemoryStore::new()))
            }
        };

        let remote = config.catalog.effective_api_key().map(|key| {
            Arc::new(OmdbClient::new(config.catalog.base_url.clone(), key)) as Arc<dyn MovieCatalog>
        });
        let catalog = CatalogService::new(
            remote,
            BatchSettings {
                batch_size: config.catalog.batch_size,
                batch_delay: Duration::from_millis(config.catalog.batch_delay_ms),
            },
        );

        let pricing = PricingEngine::new(PricingConfig {
            unit_price_cents: config.pricing.unit_price_cents,
            service_fee_cents: config.pricing.service_fee_cents,
            currency_symbol: config.pricing.currency_symbol.clone(),
        });

        let seating = Seating {
            layout: SeatLayout::new(config.seating.rows, config.seating.seats_per_row)?,
            taken: config.seating.taken.clone(),
        };

        Ok(Self {
            storage: Arc::new(storage),
            catalog: Arc::new(catalog),
            pricing: Arc::new(pricing),
            seating: Arc::new(seating),
            showtimes: Arc::new(config.showtimes.clone()),
        })
    }

    pub fn accounts(&self) -> AccountManager {
        AccountManager::new(self.storage.clone(), self.storage.clone())
    }

    pub fn profiles(&self) -> ProfileManager {
        ProfileManager::new(self.storage.clone(), self.storage.clone())
    }

    pub fn checkout(&self) -> Checkout {
        Checkout::new(self.storage.clone())
    }
}
