pub mod avatar;
pub mod manager;
pub mod profile;

pub use avatar::{PictureError, PictureUpload, DEFAULT_AVATAR};
pub use manager::{AccountError, AccountManager, AccountOutcome, Field, FieldError, SignInForm, SignUpForm};
pub use profile::{ProfileEditor, ProfileError, ProfileFields, ProfileManager};
