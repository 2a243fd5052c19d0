//! Profile editing with save and cancel-to-restore.
//!
//! Signed-in users edit the entry stored under their email. Before each save
//! the previous version is copied into a session-scoped backup map; cancel
//! restores that copy once and then forgets it. Guests edit a single shared
//! profile record and get no backups.

use std::sync::Arc;

use cinema_core::identity::{is_valid_email, normalize_email, Profile};
use cinema_core::repository::{ProfileRepository, UserRepository};
use cinema_core::{CoreError, CoreResult};
use serde::Deserialize;
use tracing::{debug, info};

use crate::avatar::{check_data_uri, PictureError, PictureUpload, DEFAULT_AVATAR};

pub const DEFAULT_FULL_NAME: &str = "John Doe";
pub const DEFAULT_EMAIL: &str = "john.doe@cinemaholic.com";
pub const DEFAULT_PHONE: &str = "+7 777 777 7777";

/// Identity shown to guests who never saved a profile.
pub fn default_profile() -> Profile {
    Profile {
        full_name: DEFAULT_FULL_NAME.to_string(),
        email: DEFAULT_EMAIL.to_string(),
        phone: DEFAULT_PHONE.to_string(),
        profile_picture: Some(DEFAULT_AVATAR.clone()),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Please fill in all required fields (Name and Email)")]
    MissingFields,

    #[error("Please enter a valid email address")]
    InvalidEmail,

    #[error(transparent)]
    Picture(#[from] PictureError),

    #[error("Storage error: {0}")]
    Storage(#[from] CoreError),
}

/// Editable text fields of the profile form.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileFields {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    /// Picture returned by a previous upload; `None` keeps the current one.
    pub profile_picture: Option<String>,
}

#[derive(Clone)]
pub struct ProfileManager {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl ProfileManager {
    pub fn new(users: Arc<dyn UserRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { users, profiles }
    }

    async fn current_email(&self) -> CoreResult<Option<String>> {
        Ok(self
            .users
            .current_user()
            .await?
            .map(|u| normalize_email(&u.email))
            .filter(|e| !e.is_empty()))
    }

    /// Profile of the signed-in user, else the guest record, else the
    /// default identity.
    pub async fn load(&self) -> CoreResult<Profile> {
        match self.current_email().await? {
            Some(email) => {
                let mut profiles = self.profiles.list_profiles().await?;
                Ok(profiles.remove(&email).unwrap_or_else(|| Profile {
                    email,
                    profile_picture: Some(DEFAULT_AVATAR.clone()),
                    ..Profile::default()
                }))
            }
            None => Ok(self
                .profiles
                .guest_profile()
                .await?
                .unwrap_or_else(default_profile)),
        }
    }

    pub async fn save(&self, profile: Profile) -> Result<Profile, ProfileError> {
        let profile = Profile {
            full_name: profile.full_name.trim().to_string(),
            email: normalize_email(&profile.email),
            phone: profile.phone.trim().to_string(),
            profile_picture: profile.profile_picture,
        };

        if profile.full_name.is_empty() || profile.email.is_empty() {
            return Err(ProfileError::MissingFields);
        }
        if !is_valid_email(&profile.email) {
            return Err(ProfileError::InvalidEmail);
        }

        match self.current_email().await? {
            Some(email) => {
                // Keep what was there before so cancel can bring it back
                let previous = self.load().await?;
                let mut backups = self.profiles.list_backups().await?;
                backups.insert(email.clone(), previous);
                self.profiles.save_backups(&backups).await?;

                let mut profiles = self.profiles.list_profiles().await?;
                profiles.insert(email.clone(), profile.clone());
                self.profiles.save_profiles(&profiles).await?;
                info!(email = %email, "Profile saved");
            }
            None => {
                self.profiles.save_guest_profile(&profile).await?;
                info!("Guest profile saved");
            }
        }

        Ok(profile)
    }

    /// Undo the last save of this session if there is one, otherwise just
    /// reload what is stored.
    pub async fn cancel(&self) -> CoreResult<Profile> {
        if let Some(email) = self.current_email().await? {
            let mut backups = self.profiles.list_backups().await?;
            if let Some(backup) = backups.remove(&email) {
                let mut profiles = self.profiles.list_profiles().await?;
                profiles.insert(email.clone(), backup.clone());
                self.profiles.save_profiles(&profiles).await?;
                self.profiles.save_backups(&backups).await?;
                debug!(email = %email, "Profile restored from backup");
                return Ok(backup);
            }
        }

        self.load().await
    }
}

/// State of one open profile form: the loaded profile plus a picture that
/// has been uploaded but not saved yet.
pub struct ProfileEditor {
    manager: ProfileManager,
    profile: Profile,
    pending_picture: Option<String>,
}

impl ProfileEditor {
    pub async fn open(manager: ProfileManager) -> CoreResult<Self> {
        let profile = manager.load().await?;
        let pending_picture = profile.profile_picture.clone();
        Ok(Self {
            manager,
            profile,
            pending_picture,
        })
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn pending_picture(&self) -> Option<&str> {
        self.pending_picture.as_deref()
    }

    /// Convert an upload and hold it until the next submit.
    pub fn stage_upload(&mut self, upload: PictureUpload) -> Result<&str, PictureError> {
        let uri = upload.into_data_uri()?;
        Ok(self.pending_picture.insert(uri).as_str())
    }

    /// Hold a picture that was converted earlier.
    pub fn stage_data_uri(&mut self, uri: String) -> Result<(), PictureError> {
        check_data_uri(&uri)?;
        self.pending_picture = Some(uri);
        Ok(())
    }

    pub async fn submit(&mut self, fields: ProfileFields) -> Result<Profile, ProfileError> {
        if let Some(uri) = fields.profile_picture {
            self.stage_data_uri(uri)?;
        }

        let saved = self
            .manager
            .save(Profile {
                full_name: fields.full_name,
                email: fields.email,
                phone: fields.phone,
                profile_picture: self.pending_picture.clone(),
            })
            .await?;

        self.profile = saved.clone();
        Ok(saved)
    }

    pub async fn cancel(&mut self) -> CoreResult<Profile> {
        let restored = self.manager.cancel().await?;
        self.pending_picture = Some(
            restored
                .profile_picture
                .clone()
                .unwrap_or_else(|| DEFAULT_AVATAR.clone()),
        );
        self.profile = restored.clone();
        Ok(restored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use cinema_core::identity::CurrentUser;
    use cinema_store::Storage;

    fn manager() -> (ProfileManager, Arc<Storage>) {
        let storage = Arc::new(Storage::in_memory());
        (ProfileManager::new(storage.clone(), storage.clone()), storage)
    }

    async fn sign_in(storage: &Storage, email: &str) {
        storage
            .set_current_user(&CurrentUser {
                full_name: "Jane Roe".into(),
                email: email.into(),
                last_login_at: Utc::now(),
            })
            .await
            .unwrap();
    }

    fn fields(name: &str, email: &str) -> ProfileFields {
        ProfileFields {
            full_name: name.into(),
            email: email.into(),
            phone: "+1 555 0100".into(),
            profile_picture: None,
        }
    }

    #[tokio::test]
    async fn test_guest_gets_default_identity() {
        let (profiles, _) = manager();
        let profile = profiles.load().await.unwrap();
        assert_eq!(profile.full_name, DEFAULT_FULL_NAME);
        assert_eq!(profile.email, DEFAULT_EMAIL);
    }

    #[tokio::test]
    async fn test_blank_profile_for_new_user() {
        let (profiles, storage) = manager();
        sign_in(&storage, "Jane@Example.com").await;

        let profile = profiles.load().await.unwrap();
        assert_eq!(profile.email, "jane@example.com");
        assert!(profile.full_name.is_empty());
        assert_eq!(profile.profile_picture.as_deref(), Some(DEFAULT_AVATAR.as_str()));
    }

    #[tokio::test]
    async fn test_saved_email_is_lower_cased() {
        let (profiles, _) = manager();
        let saved = profiles
            .save(Profile {
                full_name: "Jane Roe".into(),
                email: "  Jane.Roe@Example.COM ".into(),
                ..Profile::default()
            })
            .await
            .unwrap();

        assert_eq!(saved.email, "jane.roe@example.com");
        assert_eq!(profiles.load().await.unwrap().email, "jane.roe@example.com");
    }

    #[tokio::test]
    async fn test_save_then_reload_round_trip() {
        let (profiles, storage) = manager();
        sign_in(&storage, "jane@example.com").await;

        let mut editor = ProfileEditor::open(profiles.clone()).await.unwrap();
        editor
            .stage_upload(PictureUpload::new("image/png", vec![1, 2, 3]))
            .unwrap();
        let saved = editor
            .submit(fields("Jane Roe", "jane@example.com"))
            .await
            .unwrap();

        let reloaded = profiles.load().await.unwrap();
        assert_eq!(reloaded, saved);
        assert_eq!(reloaded.profile_picture.as_deref(), Some("data:image/png;base64,AQID"));
    }

    #[tokio::test]
    async fn test_cancel_restores_previous_save() {
        let (profiles, storage) = manager();
        sign_in(&storage, "jane@example.com").await;

        profiles
            .save(Profile {
                full_name: "Jane Roe".into(),
                email: "jane@example.com".into(),
                ..Profile::default()
            })
            .await
            .unwrap();
        profiles
            .save(Profile {
                full_name: "Jane Changed".into(),
                email: "jane@example.com".into(),
                ..Profile::default()
            })
            .await
            .unwrap();

        let restored = profiles.cancel().await.unwrap();
        assert_eq!(restored.full_name, "Jane Roe");
        assert_eq!(profiles.load().await.unwrap().full_name, "Jane Roe");
        assert!(storage.list_backups().await.unwrap().is_empty());

        // No backup left: cancel only reloads
        assert_eq!(profiles.cancel().await.unwrap().full_name, "Jane Roe");
    }

    #[tokio::test]
    async fn test_save_validation() {
        let (profiles, _) = manager();
        let mut editor = ProfileEditor::open(profiles).await.unwrap();

        let missing = editor.submit(fields("", "jane@example.com")).await;
        assert!(matches!(missing, Err(ProfileError::MissingFields)));

        let invalid = editor.submit(fields("Jane", "jane@")).await;
        assert!(matches!(invalid, Err(ProfileError::InvalidEmail)));

        let picture = editor
            .submit(ProfileFields {
                profile_picture: Some("https://example.com/a.png".into()),
                ..fields("Jane", "jane@example.com")
            })
            .await;
        assert!(matches!(picture, Err(ProfileError::Picture(PictureError::NotAnImage))));
    }

    #[tokio::test]
    async fn test_guest_save_has_no_backup() {
        let (profiles, storage) = manager();
        profiles
            .save(Profile {
                full_name: "Guest Person".into(),
                email: "guest@example.com".into(),
                ..Profile::default()
            })
            .await
            .unwrap();

        assert_eq!(profiles.load().await.unwrap().full_name, "Guest Person");
        assert!(storage.list_backups().await.unwrap().is_empty());
    }
}
