use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::identity::{CurrentUser, Profile, User};
use crate::ticket::Ticket;
use crate::CoreResult;

/// Raw string-keyed, string-valued store (the browser's local or session storage).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError>;

    async fn remove(&self, key: &str) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Repository trait for the append-only ticket list
#[async_trait]
pub trait TicketRepository: Send + Sync {
    async fn list_tickets(&self) -> CoreResult<Vec<Ticket>>;

    async fn save_tickets(&self, tickets: &[Ticket]) -> CoreResult<()>;
}

/// Repository trait for registered users and the current-user pointer
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn list_users(&self) -> CoreResult<Vec<User>>;

    async fn save_users(&self, users: &[User]) -> CoreResult<()>;

    async fn current_user(&self) -> CoreResult<Option<CurrentUser>>;

    async fn set_current_user(&self, user: &CurrentUser) -> CoreResult<()>;

    async fn clear_current_user(&self) -> CoreResult<()>;
}

/// Repository trait for per-email profiles, the guest profile and session backups
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn list_profiles(&self) -> CoreResult<BTreeMap<String, Profile>>;

    async fn save_profiles(&self, profiles: &BTreeMap<String, Profile>) -> CoreResult<()>;

    async fn guest_profile(&self) -> CoreResult<Option<Profile>>;

    async fn save_guest_profile(&self, profile: &Profile) -> CoreResult<()>;

    /// Session-scoped map of pre-save profiles, keyed by email.
    async fn list_backups(&self) -> CoreResult<BTreeMap<String, Profile>>;

    async fn save_backups(&self, backups: &BTreeMap<String, Profile>) -> CoreResult<()>;
}
