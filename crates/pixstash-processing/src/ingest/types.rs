//! Types for the ingest pipeline.

use bytes::Bytes;
use pixstash_core::Config;

/// Longest extension (after the dot) kept on a stored name
const MAX_EXTENSION_LEN: usize = 16;

/// One inbound upload, fully materialized
#[derive(Clone, Debug)]
pub struct UploadRequest {
    /// Client-supplied name; untrusted, only its extension is used
    pub original_filename: String,
    /// Size reported by the transport, if any
    pub declared_size: Option<u64>,
    /// Payload; every consumer reads it from the start
    pub content: Bytes,
}

impl UploadRequest {
    pub fn new(original_filename: impl Into<String>, content: Bytes) -> Self {
        Self {
            original_filename: original_filename.into(),
            declared_size: None,
            content,
        }
    }

    pub fn with_declared_size(mut self, declared_size: u64) -> Self {
        self.declared_size = Some(declared_size);
        self
    }

    /// Lower-cased extension of the final path component, with leading dot.
    ///
    /// Empty when the name has no dot or the suffix is not a plain
    /// alphanumeric extension.
    pub fn extension(&self) -> String {
        let name = self
            .original_filename
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or_default();
        let Some(dot) = name.rfind('.') else {
            return String::new();
        };
        let ext = &name[dot + 1..];
        if ext.is_empty()
            || ext.len() > MAX_EXTENSION_LEN
            || !ext.chars().all(|c| c.is_ascii_alphanumeric())
        {
            return String::new();
        }
        format!(".{}", ext.to_ascii_lowercase())
    }
}

/// Ingest settings, fixed at startup
#[derive(Clone, Debug)]
pub struct IngestSettings {
    pub max_file_size_bytes: u64,
    pub webp_quality: u8,
    pub convert_to_webp: bool,
}

impl IngestSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_file_size_bytes: config.max_file_size_bytes,
            webp_quality: config.webp_quality,
            convert_to_webp: config.convert_to_webp,
        }
    }
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ext(name: &str) -> String {
        UploadRequest::new(name, Bytes::new()).extension()
    }

    #[test]
    fn test_extension_derivation() {
        assert_eq!(ext("photo.PNG"), ".png");
        assert_eq!(ext("archive.tar.gz"), ".gz");
        assert_eq!(ext("dir/sub/pic.JpEg"), ".jpeg");
        assert_eq!(ext("C:\\Users\\me\\pic.gif"), ".gif");
        assert_eq!(ext(".bashrc"), ".bashrc");
    }

    #[test]
    fn test_extension_empty_when_absent_or_unsafe() {
        assert_eq!(ext("README"), "");
        assert_eq!(ext("trailing."), "");
        assert_eq!(ext(""), "");
        assert_eq!(ext("dir.d/noext"), "");
        assert_eq!(ext("evil.p\0ng"), "");
        assert_eq!(ext("x.averyveryverylongextension"), "");
    }
}
