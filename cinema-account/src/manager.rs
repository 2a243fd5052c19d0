use std::sync::Arc;
use std::time::Duration;

use cinema_core::identity::{
    is_valid_email, normalize_email, CurrentUser, Profile, User, MIN_NAME_LENGTH,
    MIN_PASSWORD_LENGTH,
};
use cinema_core::navigation::{Page, Redirect};
use cinema_core::repository::{ProfileRepository, UserRepository};
use cinema_core::{CoreError, CoreResult};
use cinema_shared::Masked;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

const SIGN_UP_REDIRECT_DELAY: Duration = Duration::from_millis(1400);
const SIGN_IN_REDIRECT_DELAY: Duration = Duration::from_millis(1100);
const GUEST_REDIRECT_DELAY: Duration = Duration::from_millis(600);

// ============================================================================
// Forms & outcomes
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignUpForm {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: Masked<String>,
    pub confirm_password: Masked<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignInForm {
    pub email: String,
    pub password: Masked<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    FullName,
    Email,
    Password,
    ConfirmPassword,
}

/// Inline message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    fn new(field: Field, message: &str) -> Self {
        Self {
            field,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("Please correct the highlighted fields")]
    Invalid(Vec<FieldError>),

    #[error("Storage error: {0}")]
    Storage(#[from] CoreError),
}

impl AccountError {
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AccountError::Invalid(errors) => errors,
            AccountError::Storage(_) => &[],
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountOutcome {
    pub message: String,
    pub current_user: Option<CurrentUser>,
    pub redirect: Redirect,
}

// ============================================================================
// Manager
// ============================================================================

/// Sign-up, sign-in and guest access against the stored user list.
pub struct AccountManager {
    users: Arc<dyn UserRepository>,
    profiles: Arc<dyn ProfileRepository>,
}

impl AccountManager {
    pub fn new(users: Arc<dyn UserRepository>, profiles: Arc<dyn ProfileRepository>) -> Self {
        Self { users, profiles }
    }

    pub async fn current_user(&self) -> CoreResult<Option<CurrentUser>> {
        self.users.current_user().await
    }

    /// Create an account. Every failing field is reported at once and
    /// nothing is written unless all checks pass.
    pub async fn register(&self, form: &SignUpForm) -> Result<AccountOutcome, AccountError> {
        let full_name = form.full_name.trim();
        let email = normalize_email(&form.email);
        let password = form.password.expose();
        let confirm = form.confirm_password.expose();

        let mut errors = Vec::new();

        if full_name.is_empty() {
            errors.push(FieldError::new(Field::FullName, "Please enter your name"));
        } else if full_name.chars().count() < MIN_NAME_LENGTH {
            errors.push(FieldError::new(
                Field::FullName,
                "Name must be at least 2 characters long",
            ));
        }

        check_email(&email, &mut errors);

        if password.is_empty() {
            errors.push(FieldError::new(Field::Password, "Please enter a password"));
        } else if password.chars().count() < MIN_PASSWORD_LENGTH {
            errors.push(FieldError::new(
                Field::Password,
                "Password must be at least 6 characters long",
            ));
        }

        if confirm.is_empty() {
            errors.push(FieldError::new(
                Field::ConfirmPassword,
                "Please confirm your password",
            ));
        } else if !password.is_empty() && confirm != password {
            errors.push(FieldError::new(Field::ConfirmPassword, "Passwords do not match"));
        }

        let mut users = self.users.list_users().await?;
        if !email.is_empty() && users.iter().any(|u| u.has_email(&email)) {
            errors.push(FieldError::new(
                Field::Email,
                "An account with this email already exists",
            ));
        }

        if !errors.is_empty() {
            return Err(AccountError::Invalid(errors));
        }

        let user = User::new(
            full_name.to_string(),
            &email,
            form.phone.trim().to_string(),
            password.to_string(),
        );
        users.push(user.clone());
        self.users.save_users(&users).await?;

        let current = CurrentUser::from_user(&user);
        self.users.set_current_user(&current).await?;
        self.seed_profile(&user).await;

        info!(email = %user.email, "Account created");

        Ok(AccountOutcome {
            message: "Account created successfully! Redirecting...".to_string(),
            current_user: Some(current),
            redirect: Redirect::to(Page::Home).after(SIGN_UP_REDIRECT_DELAY),
        })
    }

    pub async fn authenticate(&self, form: &SignInForm) -> Result<AccountOutcome, AccountError> {
        let email = normalize_email(&form.email);
        let password = form.password.expose();

        let mut errors = Vec::new();
        check_email(&email, &mut errors);
        if password.is_empty() {
            errors.push(FieldError::new(Field::Password, "Please enter your password"));
        }
        if !errors.is_empty() {
            return Err(AccountError::Invalid(errors));
        }

        let users = self.users.list_users().await?;
        let Some(user) = users.iter().find(|u| u.has_email(&email)) else {
            return Err(AccountError::Invalid(vec![FieldError::new(
                Field::Email,
                "We couldn’t find an account with this email",
            )]));
        };

        if !user.password_matches(password) {
            warn!(email = %email, "Sign-in rejected: wrong password");
            return Err(AccountError::Invalid(vec![FieldError::new(
                Field::Password,
                "Incorrect password",
            )]));
        }

        let current = CurrentUser::from_user(user);
        self.users.set_current_user(&current).await?;
        self.seed_profile(user).await;

        info!(email = %email, "Signed in");

        Ok(AccountOutcome {
            message: "Welcome back! Taking you to the homepage...".to_string(),
            current_user: Some(current),
            redirect: Redirect::to(Page::Home).after(SIGN_IN_REDIRECT_DELAY),
        })
    }

    /// Drop the current-user pointer. No account is created.
    pub async fn continue_as_guest(&self) -> Result<AccountOutcome, AccountError> {
        self.users.clear_current_user().await?;

        Ok(AccountOutcome {
            message: "Continuing as guest...".to_string(),
            current_user: None,
            redirect: Redirect::to(Page::GuestHome).after(GUEST_REDIRECT_DELAY),
        })
    }

    /// Demo flow: checks the address and reports success. No mail is sent.
    pub async fn request_password_reset(&self, email: &str) -> Result<String, AccountError> {
        let email = normalize_email(email);

        if email.is_empty() {
            return email_error("Enter your email to receive a reset link");
        }
        if !is_valid_email(&email) {
            return email_error("Check the email format and try again");
        }

        let users = self.users.list_users().await?;
        if !users.iter().any(|u| u.has_email(&email)) {
            return email_error("We couldn’t find an account with that email");
        }

        Ok(format!(
            "We just sent reset instructions to {}. (Demo)",
            email
        ))
    }

    /// Merge the account into its profile entry. Failures are logged only.
    async fn seed_profile(&self, user: &User) {
        let key = normalize_email(&user.email);
        let result: CoreResult<()> = async {
            let mut profiles = self.profiles.list_profiles().await?;
            let merged = Profile::seeded_from(user, profiles.get(&key));
            profiles.insert(key.clone(), merged);
            self.profiles.save_profiles(&profiles).await
        }
        .await;

        if let Err(e) = result {
            warn!(email = %key, error = %e, "Unable to sync profile");
        }
    }
}

fn email_error<T>(message: &str) -> Result<T, AccountError> {
    Err(AccountError::Invalid(vec![FieldError::new(Field::Email, message)]))
}

fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if email.is_empty() {
        errors.push(FieldError::new(Field::Email, "Please enter your email"));
    } else if !is_valid_email(email) {
        errors.push(FieldError::new(
            Field::Email,
            "Please enter a valid email address",
        ));
    }
}
