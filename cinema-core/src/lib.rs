pub mod identity;
pub mod navigation;
pub mod payment;
pub mod repository;
pub mod search;
pub mod ticket;

pub use repository::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Storage failure: {0}")]
    StorageError(#[from] StoreError),
}

pub type CoreResult<T> = Result<T, CoreError>;
