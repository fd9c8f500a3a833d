//! Image transcoder - decode a convertible source and write it as lossy WebP

use std::path::{Path, PathBuf};

use bytes::Bytes;
use image::{DynamicImage, GenericImageView};
use pixstash_core::models::FailureKind;
use pixstash_storage::{write_exclusive, PublishError};
use tokio::sync::oneshot;

use crate::ingest::classifier::{classify, FormatClass};

/// Largest width or height libwebp accepts
pub const MAX_WEBP_DIMENSION: u32 = 16383;

#[derive(Debug, thiserror::Error)]
pub enum TranscodeError {
    #[error("failed to decode source image: {0}")]
    Decode(String),

    #[error("failed to encode webp: {0}")]
    Encode(String),

    #[error("failed to write transcoded image: {0}")]
    Storage(String),

    #[error("transcode worker panicked: {0}")]
    WorkerPanicked(String),

    #[error("upload abandoned before the transcoded image was stored")]
    Cancelled,
}

impl TranscodeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            TranscodeError::Decode(_) => FailureKind::DecodeError,
            TranscodeError::Encode(_) => FailureKind::EncodeError,
            TranscodeError::Storage(_) | TranscodeError::Cancelled => FailureKind::StorageError,
            TranscodeError::WorkerPanicked(_) => FailureKind::WorkerPanicked,
        }
    }
}

/// Transcode `source` (an image in the format named by `source_ext`) to lossy
/// WebP at `quality` and write it to a fresh file at `dest`.
///
/// Returns the number of bytes in the destination file. `dest` must not exist;
/// it only appears once the encoded image is fully on disk.
pub fn transcode(
    source: &[u8],
    source_ext: &str,
    dest: &Path,
    quality: u8,
) -> Result<u64, TranscodeError> {
    transcode_until(source, source_ext, dest, quality, || false)
}

/// [`transcode`] that discards its output when `is_cancelled` reports the
/// caller has gone away
fn transcode_until(
    source: &[u8],
    source_ext: &str,
    dest: &Path,
    quality: u8,
    is_cancelled: impl Fn() -> bool,
) -> Result<u64, TranscodeError> {
    let format = match classify(source_ext) {
        FormatClass::Convertible(format) => format,
        FormatClass::Opaque => {
            return Err(TranscodeError::Decode(format!(
                "unsupported source extension '{}'",
                source_ext
            )))
        }
    };

    let img = image::load_from_memory_with_format(source, format.image_format())
        .map_err(|e| TranscodeError::Decode(e.to_string()))?;

    let encoded = encode_webp(&img, quality)?;

    write_exclusive(dest, &encoded, is_cancelled).map_err(|e| match e {
        PublishError::Cancelled => TranscodeError::Cancelled,
        other => TranscodeError::Storage(format!("{}: {}", dest.display(), other)),
    })?;

    Ok(encoded.len() as u64)
}

fn encode_webp(img: &DynamicImage, quality: u8) -> Result<Vec<u8>, TranscodeError> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(TranscodeError::Encode("image has no pixels".to_string()));
    }
    if width > MAX_WEBP_DIMENSION || height > MAX_WEBP_DIMENSION {
        return Err(TranscodeError::Encode(format!(
            "{}x{} exceeds webp maximum of {}x{}",
            width, height, MAX_WEBP_DIMENSION, MAX_WEBP_DIMENSION
        )));
    }

    let quality = quality.min(100) as f32;
    let result = if img.color().has_alpha() {
        let rgba = img.to_rgba8();
        webp::Encoder::from_rgba(&rgba, width, height).encode_simple(false, quality)
    } else {
        let rgb = img.to_rgb8();
        webp::Encoder::from_rgb(&rgb, width, height).encode_simple(false, quality)
    };
    let memory = result.map_err(|e| TranscodeError::Encode(format!("{:?}", e)))?;

    Ok(memory.to_vec())
}

/// Transcoder bound to the service-wide quality, running on the blocking pool
#[derive(Debug, Clone, Copy)]
pub struct ImageTranscoder {
    quality: u8,
}

impl ImageTranscoder {
    pub fn new(quality: u8) -> Self {
        Self {
            quality: quality.min(100),
        }
    }

    /// Run [`transcode`] on the blocking thread pool.
    ///
    /// A panic inside the worker is reported as `WorkerPanicked`. If this
    /// future is dropped the worker still runs to completion, but its output
    /// is discarded instead of being published at `dest`.
    pub async fn transcode(
        &self,
        source: Bytes,
        source_ext: String,
        dest: PathBuf,
    ) -> Result<u64, TranscodeError> {
        let quality = self.quality;
        let (caller_gone, caller) = oneshot::channel::<()>();
        let result = tokio::task::spawn_blocking(move || {
            transcode_until(&source, &source_ext, &dest, quality, || {
                caller_gone.is_closed()
            })
        })
        .await;
        drop(caller);

        result.map_err(|e| TranscodeError::WorkerPanicked(e.to_string()))?
    }
}
