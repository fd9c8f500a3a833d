//! Upload size enforcement
//!
//! [`clamp`] bounds a chunked body while it streams in, so an oversized upload
//! is rejected as soon as the ceiling is crossed instead of after it has been
//! buffered. [`check_declared_size`] applies the same ceiling to sizes reported
//! ahead of time.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::{Bytes, BytesMut};
use futures::{ready, Stream, StreamExt};

use super::error::IngestError;

#[derive(Debug, thiserror::Error)]
pub enum SizeGuardError<E> {
    #[error("payload of {received} bytes exceeds limit of {limit} bytes")]
    Oversized { received: u64, limit: u64 },

    #[error("upload stream interrupted after {received} bytes: {source}")]
    Interrupted {
        received: u64,
        #[source]
        source: E,
    },
}

/// A chunk stream that fails once more than `limit` bytes have been seen.
///
/// The chunk that crosses the limit is never yielded. After the first error
/// the stream is finished.
#[derive(Debug)]
pub struct BoundedStream<S> {
    inner: S,
    limit: u64,
    received: u64,
    finished: bool,
}

impl<S> BoundedStream<S> {
    /// Bytes passed downstream so far
    pub fn received(&self) -> u64 {
        self.received
    }
}

/// Bound `stream` to at most `max_bytes` bytes.
pub fn clamp<S, E>(stream: S, max_bytes: u64) -> BoundedStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    BoundedStream {
        inner: stream,
        limit: max_bytes,
        received: 0,
        finished: false,
    }
}

impl<S, E> Stream for BoundedStream<S>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    type Item = Result<Bytes, SizeGuardError<E>>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = &mut *self;
        if this.finished {
            return Poll::Ready(None);
        }

        match ready!(Pin::new(&mut this.inner).poll_next(cx)) {
            None => {
                this.finished = true;
                Poll::Ready(None)
            }
            Some(Ok(chunk)) => {
                let total = this.received + chunk.len() as u64;
                if total > this.limit {
                    this.finished = true;
                    return Poll::Ready(Some(Err(SizeGuardError::Oversized {
                        received: total,
                        limit: this.limit,
                    })));
                }
                this.received = total;
                Poll::Ready(Some(Ok(chunk)))
            }
            Some(Err(source)) => {
                this.finished = true;
                Poll::Ready(Some(Err(SizeGuardError::Interrupted {
                    received: this.received,
                    source,
                })))
            }
        }
    }
}

/// Materialize a bounded stream into one contiguous buffer.
pub async fn read_to_end<S, E>(mut bounded: BoundedStream<S>) -> Result<Bytes, SizeGuardError<E>>
where
    S: Stream<Item = Result<Bytes, E>> + Unpin,
{
    let mut buf = BytesMut::new();
    while let Some(chunk) = bounded.next().await {
        buf.extend_from_slice(&chunk?);
    }
    Ok(buf.freeze())
}

/// Reject a size reported ahead of the payload when it exceeds `max_bytes`.
pub fn check_declared_size(declared: u64, max_bytes: u64) -> Result<(), IngestError> {
    if declared > max_bytes {
        return Err(IngestError::OversizedPayload {
            size: declared,
            limit: max_bytes,
        });
    }
    Ok(())
}
