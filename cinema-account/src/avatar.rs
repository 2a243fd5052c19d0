use std::sync::LazyLock;

use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Largest accepted upload, 5 MiB.
pub const MAX_PICTURE_BYTES: usize = 5 * 1024 * 1024;

const DEFAULT_AVATAR_SVG: &str = r##"<?xml version="1.0" encoding="UTF-8"?><svg xmlns='http://www.w3.org/2000/svg' width='120' height='120' viewBox='0 0 120 120'>
  <rect width='100%' height='100%' fill='#e6e9ee'/>
  <circle cx='60' cy='40' r='24' fill='#cfd6e3'/>
  <path d='M30 88c6-10 18-16 30-16s24 6 30 16' fill='#cfd6e3'/>
</svg>"##;

/// Neutral silhouette shown until a picture is uploaded.
pub static DEFAULT_AVATAR: LazyLock<String> =
    LazyLock::new(|| data_uri("image/svg+xml", DEFAULT_AVATAR_SVG.as_bytes()));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PictureError {
    #[error("File size exceeds 5MB limit")]
    TooLarge,

    #[error("Please drop an image file")]
    NotAnImage,
}

/// A picture as received from the upload form.
#[derive(Debug, Clone)]
pub struct PictureUpload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl PictureUpload {
    pub fn new(content_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            content_type: content_type.into(),
            bytes,
        }
    }

    /// Size and type checks, then base64 into a `data:` URI.
    pub fn into_data_uri(self) -> Result<String, PictureError> {
        let content_type = self.content_type.trim().to_lowercase();
        if !content_type.starts_with("image/") {
            return Err(PictureError::NotAnImage);
        }
        if self.bytes.len() > MAX_PICTURE_BYTES {
            return Err(PictureError::TooLarge);
        }
        Ok(data_uri(&content_type, &self.bytes))
    }
}

/// Accept an already-encoded picture coming back from a client.
pub fn check_data_uri(uri: &str) -> Result<(), PictureError> {
    if uri.starts_with("data:image/") {
        Ok(())
    } else {
        Err(PictureError::NotAnImage)
    }
}

fn data_uri(content_type: &str, bytes: &[u8]) -> String {
    format!("data:{};base64,{}", content_type, STANDARD.encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_upload() {
        let upload = PictureUpload::new("image/png", vec![0x89, b'P', b'N', b'G']);
        assert_eq!(upload.into_data_uri().unwrap(), "data:image/png;base64,iVBORw==");
    }

    #[test]
    fn test_rejects_non_images_and_large_files() {
        let pdf = PictureUpload::new("application/pdf", vec![1, 2, 3]);
        assert_eq!(pdf.into_data_uri(), Err(PictureError::NotAnImage));

        let huge = PictureUpload::new("image/jpeg", vec![0; MAX_PICTURE_BYTES + 1]);
        assert_eq!(huge.into_data_uri(), Err(PictureError::TooLarge));

        let limit = PictureUpload::new("image/jpeg", vec![0; MAX_PICTURE_BYTES]);
        assert!(limit.into_data_uri().is_ok());
    }

    #[test]
    fn test_default_avatar() {
        assert!(DEFAULT_AVATAR.starts_with("data:image/svg+xml;base64,"));
        assert!(check_data_uri(&DEFAULT_AVATAR).is_ok());
        assert!(check_data_uri("https://example.com/me.png").is_err());
    }
}
