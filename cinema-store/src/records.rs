use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use cinema_core::identity::{CurrentUser, Profile, User};
use cinema_core::repository::{
    KeyValueStore, ProfileRepository, StoreError, TicketRepository, UserRepository,
};
use cinema_core::ticket::Ticket;
use cinema_core::CoreResult;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::memory::MemoryStore;

pub const USERS_KEY: &str = "cineholicUsers";
pub const CURRENT_USER_KEY: &str = "cineholicCurrentUser";
pub const PROFILES_KEY: &str = "cineholicProfiles";
pub const GUEST_PROFILE_KEY: &str = "userProfile";
pub const TICKETS_KEY: &str = "userTickets";
pub const PROFILE_BACKUPS_KEY: &str = "cineholicProfileBackups";

/// Typed records on top of two raw stores: `local` outlives a visit,
/// `session` only lives as long as the visit.
///
/// Every write is a plain read-modify-write of the whole record. Two writers
/// racing on the same key lose updates (last write wins).
#[derive(Clone)]
pub struct Storage {
    local: Arc<dyn KeyValueStore>,
    session: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(local: Arc<dyn KeyValueStore>, session: Arc<dyn KeyValueStore>) -> Self {
        Self { local, session }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new()))
    }

    pub fn local(&self) -> &Arc<dyn KeyValueStore> {
        &self.local
    }

    /// Read a JSON record. Missing or undecodable values read as `None`.
    async fn read_json<T: DeserializeOwned>(
        store: &dyn KeyValueStore,
        key: &str,
    ) -> Result<Option<T>, StoreError> {
        let Some(raw) = store.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Discarding undecodable record {}: {}", key, e);
                Ok(None)
            }
        }
    }

    async fn write_json<T: Serialize + ?Sized>(
        store: &dyn KeyValueStore,
        key: &str,
        value: &T,
    ) -> Result<(), StoreError> {
        let raw = serde_json::to_string(value)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;
        store.set(key, raw).await
    }
}

#[async_trait]
impl TicketRepository for Storage {
    async fn list_tickets(&self) -> CoreResult<Vec<Ticket>> {
        Ok(Self::read_json(self.local.as_ref(), TICKETS_KEY).await?.unwrap_or_default())
    }

    async fn save_tickets(&self, tickets: &[Ticket]) -> CoreResult<()> {
        Ok(Self::write_json(self.local.as_ref(), TICKETS_KEY, tickets).await?)
    }
}

#[async_trait]
impl UserRepository for Storage {
    async fn list_users(&self) -> CoreResult<Vec<User>> {
        Ok(Self::read_json(self.local.as_ref(), USERS_KEY).await?.unwrap_or_default())
    }

    async fn save_users(&self, users: &[User]) -> CoreResult<()> {
        Ok(Self::write_json(self.local.as_ref(), USERS_KEY, users).await?)
    }

    async fn current_user(&self) -> CoreResult<Option<CurrentUser>> {
        Ok(Self::read_json(self.local.as_ref(), CURRENT_USER_KEY).await?)
    }

    async fn set_current_user(&self, user: &CurrentUser) -> CoreResult<()> {
        Ok(Self::write_json(self.local.as_ref(), CURRENT_USER_KEY, user).await?)
    }

    async fn clear_current_user(&self) -> CoreResult<()> {
        Ok(self.local.remove(CURRENT_USER_KEY).await?)
    }
}

#[async_trait]
impl ProfileRepository for Storage {
    async fn list_profiles(&self) -> CoreResult<BTreeMap<String, Profile>> {
        Ok(Self::read_json(self.local.as_ref(), PROFILES_KEY).await?.unwrap_or_default())
    }

    async fn save_profiles(&self, profiles: &BTreeMap<String, Profile>) -> CoreResult<()> {
        Ok(Self::write_json(self.local.as_ref(), PROFILES_KEY, profiles).await?)
    }

    async fn guest_profile(&self) -> CoreResult<Option<Profile>> {
        Ok(Self::read_json(self.local.as_ref(), GUEST_PROFILE_KEY).await?)
    }

    async fn save_guest_profile(&self, profile: &Profile) -> CoreResult<()> {
        Ok(Self::write_json(self.local.as_ref(), GUEST_PROFILE_KEY, profile).await?)
    }

    async fn list_backups(&self) -> CoreResult<BTreeMap<String, Profile>> {
        Ok(Self::read_json(self.session.as_ref(), PROFILE_BACKUPS_KEY).await?.unwrap_or_default())
    }

    async fn save_backups(&self, backups: &BTreeMap<String, Profile>) -> CoreResult<()> {
        Ok(Self::write_json(self.session.as_ref(), PROFILE_BACKUPS_KEY, backups).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn ticket(id: &str) -> Ticket {
        Ticket {
            id: id.to_string(),
            movie_title: "Inception".into(),
            movie_genre: "Sci-Fi".into(),
            movie_poster: None,
            date: "Oct 18, 2026".into(),
            time: "7:30 PM".into(),
            seats: "A1".into(),
            total: "$14.00".into(),
            imdb_id: None,
            booking_date: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_tickets_round_trip() {
        let storage = Storage::in_memory();
        assert!(storage.list_tickets().await.unwrap().is_empty());

        storage.save_tickets(&[ticket("a"), ticket("b")]).await.unwrap();
        let tickets = storage.list_tickets().await.unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[1].id, "b");
    }

    #[tokio::test]
    async fn test_corrupt_record_reads_as_empty() {
        let storage = Storage::in_memory();
        storage.local().set(USERS_KEY, "{oops".to_string()).await.unwrap();
        storage.local().set(PROFILES_KEY, "[1,2]".to_string()).await.unwrap();
        storage.local().set(CURRENT_USER_KEY, "42".to_string()).await.unwrap();

        assert!(storage.list_users().await.unwrap().is_empty());
        assert!(storage.list_profiles().await.unwrap().is_empty());
        assert!(storage.current_user().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_backups_live_in_session_scope() {
        let storage = Storage::in_memory();
        let mut backups = BTreeMap::new();
        backups.insert("jane@example.com".to_string(), Profile::default());
        storage.save_backups(&backups).await.unwrap();

        assert_eq!(storage.list_backups().await.unwrap().len(), 1);
        assert_eq!(storage.local().get(PROFILE_BACKUPS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_current_user_cleared() {
        let storage = Storage::in_memory();
        let user = User::new("Jane".into(), "jane@example.com", String::new(), "secret1".into());
        storage.set_current_user(&CurrentUser::from_user(&user)).await.unwrap();
        assert!(storage.current_user().await.unwrap().is_some());

        storage.clear_current_user().await.unwrap();
        assert!(storage.current_user().await.unwrap().is_none());
    }
}
