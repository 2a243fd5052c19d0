use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use cinema_shared::Masked;

pub const MIN_NAME_LENGTH: usize = 2;
pub const MIN_PASSWORD_LENGTH: usize = 6;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Canonical form of an email address: trimmed and lower-cased.
///
/// Every stored record and every lookup goes through this, so user records,
/// the current-user pointer and profile keys always agree.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// A registered account. The password is stored as submitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: Masked<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(full_name: String, email: &str, phone: String, password: String) -> Self {
        let now = Utc::now();
        Self {
            full_name,
            email: normalize_email(email),
            phone,
            password: Masked(password),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn has_email(&self, email: &str) -> bool {
        normalize_email(&self.email) == normalize_email(email)
    }

    pub fn password_matches(&self, candidate: &str) -> bool {
        self.password.expose() == candidate
    }
}

/// Pointer to the signed-in account. Absent means guest mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub full_name: String,
    pub email: String,
    pub last_login_at: DateTime<Utc>,
}

impl CurrentUser {
    pub fn from_user(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            email: normalize_email(&user.email),
            last_login_at: Utc::now(),
        }
    }
}

/// Editable contact and display details, keyed by lower-cased email.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Data URI of the uploaded picture.
    #[serde(default)]
    pub profile_picture: Option<String>,
}

impl Profile {
    /// Merge a user record into an existing profile. Non-empty user fields win;
    /// the picture is only ever taken from the existing profile.
    pub fn seeded_from(user: &User, existing: Option<&Profile>) -> Self {
        let pick = |fresh: &str, old: Option<&str>| {
            if !fresh.is_empty() {
                fresh.to_string()
            } else {
                old.unwrap_or_default().to_string()
            }
        };

        Self {
            full_name: pick(&user.full_name, existing.map(|p| p.full_name.as_str())),
            email: pick(&user.email, existing.map(|p| p.email.as_str())),
            phone: pick(&user.phone, existing.map(|p| p.phone.as_str())),
            profile_picture: existing.and_then(|p| p.profile_picture.clone()),
        }
    }
}
