//! Ingest orchestration: one upload in, one stored object out.

use std::sync::Arc;
use std::time::Instant;

use pixstash_core::config::DELIVERY_EXTENSION;
use pixstash_core::models::{ConversionOutcome, FailureKind, ObjectId, StoredObject};
use pixstash_core::UsageRecorder;
use pixstash_storage::Storage;

use super::classifier::{classify, FormatClass};
use super::error::IngestError;
use super::identity::{IdGenerator, UuidGenerator};
use super::size_guard::check_declared_size;
use super::types::{IngestSettings, UploadRequest};
use crate::image::ImageTranscoder;

/// Turns uploads into stored objects.
///
/// Convertible images are transcoded to WebP; if that fails for any reason the
/// original bytes are written once, verbatim, under the original extension.
/// Nothing is retried.
pub struct IngestService {
    storage: Arc<dyn Storage>,
    ids: Arc<dyn IdGenerator>,
    recorder: Arc<dyn UsageRecorder>,
    transcoder: ImageTranscoder,
    settings: IngestSettings,
}

impl IngestService {
    pub fn new(
        storage: Arc<dyn Storage>,
        recorder: Arc<dyn UsageRecorder>,
        settings: IngestSettings,
    ) -> Self {
        Self {
            storage,
            ids: Arc::new(UuidGenerator),
            recorder,
            transcoder: ImageTranscoder::new(settings.webp_quality),
            settings,
        }
    }

    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn settings(&self) -> &IngestSettings {
        &self.settings
    }

    #[tracing::instrument(
        skip(self, request),
        fields(
            original_filename = %request.original_filename,
            size_bytes = request.content.len(),
        )
    )]
    pub async fn ingest(&self, request: UploadRequest) -> Result<StoredObject, IngestError> {
        let start = Instant::now();
        let limit = self.settings.max_file_size_bytes;

        if let Some(declared) = request.declared_size {
            check_declared_size(declared, limit)?;
        }
        check_declared_size(request.content.len() as u64, limit)?;

        let object_id = self.ids.new_id();
        let original_extension = request.extension();

        let conversion = match classify(&original_extension) {
            FormatClass::Convertible(_) if self.settings.convert_to_webp => {
                match self.try_convert(&object_id, &request, &original_extension).await {
                    Ok(bytes) => {
                        let object = StoredObject::new(
                            object_id,
                            DELIVERY_EXTENSION,
                            original_extension,
                            bytes,
                            ConversionOutcome::Converted { bytes },
                        );
                        return Ok(self.finish(object, start));
                    }
                    Err(outcome) => outcome,
                }
            }
            _ => ConversionOutcome::Skipped,
        };

        let size_bytes = self
            .write_original(&object_id, &request, &original_extension)
            .await?;

        let object = StoredObject::new(
            object_id,
            original_extension.clone(),
            original_extension,
            size_bytes,
            conversion,
        );
        Ok(self.finish(object, start))
    }

    /// Attempt the transcode. On failure, returns the outcome to record.
    async fn try_convert(
        &self,
        object_id: &ObjectId,
        request: &UploadRequest,
        original_extension: &str,
    ) -> Result<u64, ConversionOutcome> {
        let key = object_id.filename(DELIVERY_EXTENSION);

        let result = match self.storage.object_path(&key) {
            Ok(dest) => {
                self.transcoder
                    .transcode(request.content.clone(), original_extension.to_string(), dest)
                    .await
            }
            Err(e) => {
                return Err(self.fallback_outcome(
                    object_id,
                    FailureKind::StorageError,
                    e.to_string(),
                ))
            }
        };

        result.map_err(|e| self.fallback_outcome(object_id, e.kind(), e.to_string()))
    }

    fn fallback_outcome(
        &self,
        object_id: &ObjectId,
        kind: FailureKind,
        reason: String,
    ) -> ConversionOutcome {
        tracing::warn!(
            object_id = %object_id,
            conversion = "failed",
            failure_kind = %kind,
            reason = %reason,
            "WebP conversion failed, storing original bytes"
        );
        ConversionOutcome::Failed { kind, reason }
    }

    async fn write_original(
        &self,
        object_id: &ObjectId,
        request: &UploadRequest,
        extension: &str,
    ) -> Result<u64, IngestError> {
        let key = object_id.filename(extension);
        let expected = request.content.len() as u64;

        let written = self
            .storage
            .write_verbatim(&key, request.content.clone())
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "Failed to write upload");
                IngestError::Persist(e.to_string())
            })?;

        if written != expected {
            tracing::error!(
                key = %key,
                expected_bytes = expected,
                written_bytes = written,
                "Short write while storing upload"
            );
            if let Err(e) = self.storage.delete(&key).await {
                tracing::warn!(key = %key, error = %e, "Failed to remove short write");
            }
            return Err(IngestError::Persist(format!(
                "wrote {} of {} bytes",
                written, expected
            )));
        }

        Ok(written)
    }

    fn finish(&self, object: StoredObject, start: Instant) -> StoredObject {
        self.recorder.record_upload(object.size_bytes);
        tracing::info!(
            object_id = %object.object_id,
            filename = %object.filename,
            original_extension = %object.original_extension,
            size_bytes = object.size_bytes,
            converted = object.was_converted,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Upload stored"
        );
        object
    }
}
