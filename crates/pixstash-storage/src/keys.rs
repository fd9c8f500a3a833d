//! Shared key validation for storage backends.

use crate::staging::STAGING_PREFIX;
use crate::traits::{StorageError, StorageResult};

/// Validate a flat storage key (a bare filename).
///
/// Rejects empty keys, any `..` sequence and any path separator so a key can
/// never address something outside the storage directory. A leading `.` is
/// rejected too; those names belong to staging files.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Filename required".to_string()));
    }
    if key.contains("..") || key.contains('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey("Invalid filename".to_string()));
    }
    if key.starts_with(STAGING_PREFIX) || key.contains('\0') {
        return Err(StorageError::InvalidKey("Invalid filename".to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_keys() {
        assert!(validate_key("0b9c2f52-6a0e-4a51-9b9e-3c1d2e4f5a6b.webp").is_ok());
        assert!(validate_key("abc").is_ok());
        assert!(validate_key("file.tar.gz").is_ok());
    }

    #[test]
    fn test_invalid_keys() {
        for key in [
            "",
            "..",
            "../etc/passwd",
            "a/b",
            "/etc/passwd",
            "a\\b",
            "x..y",
            ".a.webp.part",
            ".hidden",
        ] {
            assert!(
                matches!(validate_key(key), Err(StorageError::InvalidKey(_))),
                "expected {:?} to be rejected",
                key
            );
        }
    }
}
