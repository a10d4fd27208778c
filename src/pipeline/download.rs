//! Asset download fan-out
//!
//! Downloads run concurrently up to a bound. Each result lands in the slot of
//! its URL, so output order is input order no matter which download finishes
//! first. A slot whose URL is the not-available marker, or whose download
//! fails, holds an empty buffer; siblings are unaffected.

use bytes::Bytes;
use futures::stream::{self, StreamExt};
use tracing::{debug, instrument, warn};

use crate::api::NOT_AVAILABLE_URL;
use crate::client::AiTools;
use crate::normalize::normalize_bytes;
use crate::telemetry;
use crate::transport::{RequestContext, Transport, TransportRequest};

/// Download every URL, at most `limit` at a time, preserving order
pub async fn download_all(transport: &dyn Transport, urls: &[String], limit: usize) -> Vec<Bytes> {
    let mut slots = vec![Bytes::new(); urls.len()];

    let mut completed = stream::iter(urls.iter().enumerate())
        .map(|(index, url)| async move { (index, download_one(transport, url).await) })
        .buffer_unordered(limit.max(1));

    while let Some((index, bytes)) = completed.next().await {
        slots[index] = bytes;
    }

    slots
}

async fn download_one(transport: &dyn Transport, url: &str) -> Bytes {
    if url == NOT_AVAILABLE_URL {
        telemetry::record_download("skipped");
        return Bytes::new();
    }

    let ctx = RequestContext::new("download");
    ctx.log_upstream_request(url, None);

    // Generated asset URLs are pre-signed; no credential is sent
    match normalize_bytes(transport.send(TransportRequest::get(url)).await) {
        Ok(bytes) => {
            debug!(trace_id = %ctx.trace_id, size = bytes.len(), elapsed_ms = %ctx.elapsed_ms(), "Asset downloaded");
            telemetry::record_download("ok");
            bytes
        }
        Err(e) => {
            warn!(trace_id = %ctx.trace_id, url = %url, error = %e, "Asset download failed");
            telemetry::record_download("failed");
            Bytes::new()
        }
    }
}

impl AiTools {
    /// Download arbitrary asset URLs into index-matched buffers
    #[instrument(skip(self, urls), fields(count = urls.len()))]
    pub async fn download_urls(&self, urls: &[String]) -> Vec<Bytes> {
        download_all(self.transport.as_ref(), urls, self.download_concurrency).await
    }
}
