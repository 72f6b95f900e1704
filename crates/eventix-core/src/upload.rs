//! Upload gate for event images.
//!
//! Checks run before any byte reaches durable storage: the content type
//! against an allow-list, the running size against a ceiling, and the
//! original filename is rewritten so it can never escape the upload
//! directory or collide with an existing file.

use thiserror::Error;

/// Maximum image size: 5 MiB.
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

/// Accepted image MIME types.
pub const IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/webp"];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadError {
    #[error("Invalid file type")]
    InvalidType(String),

    #[error("File too large (max {max_bytes} bytes)")]
    TooLarge { max_bytes: usize },

    #[error("Only one image may be uploaded")]
    TooManyFiles,
}

/// Allow-list and size ceiling for one upload field.
#[derive(Debug, Clone, Copy)]
pub struct UploadPolicy {
    pub allowed_types: &'static [&'static str],
    pub max_bytes: usize,
}

impl UploadPolicy {
    pub const EVENT_IMAGE: Self = Self {
        allowed_types: IMAGE_TYPES,
        max_bytes: MAX_IMAGE_BYTES,
    };

    pub fn check_content_type(&self, content_type: &str) -> Result<(), UploadError> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();

        if self.allowed_types.contains(&essence.as_str()) {
            Ok(())
        } else {
            Err(UploadError::InvalidType(essence))
        }
    }

    /// Call with the running total while streaming.
    pub fn check_size(&self, received: usize) -> Result<(), UploadError> {
        if received > self.max_bytes {
            Err(UploadError::TooLarge {
                max_bytes: self.max_bytes,
            })
        } else {
            Ok(())
        }
    }
}

/// Replace every character outside `[A-Za-z0-9._-]` with `_`.
pub fn sanitize_file_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Build the on-disk name: `<millis>-<nonce>-<sanitized original>`.
pub fn stored_file_name(original: &str, unix_millis: i64, nonce: u32) -> String {
    format!("{unix_millis}-{nonce}-{}", sanitize_file_name(original))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_allowed_types() {
        let policy = UploadPolicy::EVENT_IMAGE;
        assert!(policy.check_content_type("image/png").is_ok());
        assert!(policy.check_content_type("image/jpeg").is_ok());
        assert!(policy.check_content_type("IMAGE/WEBP; charset=binary").is_ok());
    }

    #[test]
    fn test_rejects_other_types() {
        let policy = UploadPolicy::EVENT_IMAGE;
        assert_eq!(
            policy.check_content_type("image/gif"),
            Err(UploadError::InvalidType("image/gif".to_string()))
        );
        assert!(policy.check_content_type("application/pdf").is_err());
    }

    #[test]
    fn test_size_ceiling() {
        let policy = UploadPolicy::EVENT_IMAGE;
        assert!(policy.check_size(MAX_IMAGE_BYTES).is_ok());
        assert_eq!(
            policy.check_size(MAX_IMAGE_BYTES + 1),
            Err(UploadError::TooLarge {
                max_bytes: MAX_IMAGE_BYTES
            })
        );
    }

    #[test]
    fn test_sanitize_strips_path_separators() {
        assert_eq!(sanitize_file_name("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_file_name("my poster (1).png"), "my_poster__1_.png");
        assert_eq!(sanitize_file_name("ok-name_2.webp"), "ok-name_2.webp");
    }

    #[test]
    fn test_stored_file_name_layout() {
        assert_eq!(
            stored_file_name("a b.png", 1_700_000_000_000, 42),
            "1700000000000-42-a_b.png"
        );
        assert!(!stored_file_name("x/y\\z.jpg", 1, 2).contains('/'));
    }
}
