//! JSON file ticket store.
//!
//! The whole store lives in a single `{"tickets": [...]}` document that is
//! read fully and rewritten fully on every mutation. An async mutex serializes
//! the read-modify-write cycle so concurrent saves cannot assign duplicate
//! ticket numbers.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, instrument, warn};

use crate::error::StoreError;
use crate::metrics;
use crate::utils::rfc3339_now;

use super::types::{Ticket, TicketDraft};

/// Flat-file ticket store.
#[derive(Debug)]
pub struct TicketStore {
    /// Path of the JSON document.
    path: PathBuf,
    /// Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

/// On-disk document shape.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    tickets: Vec<Ticket>,
}

impl TicketStore {
    /// Create a store backed by the given file. The file is created lazily on
    /// first write; a missing file reads as an empty store.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored tickets in insertion order.
    pub async fn list(&self) -> Result<Vec<Ticket>, StoreError> {
        let _guard = self.lock.lock().await;
        Ok(self.read_document().await?.tickets)
    }

    /// Append `count` tickets for one purchase, numbering them sequentially
    /// from the current store size. Returns the assigned ticket numbers.
    #[instrument(skip(self, draft), fields(vendeur = %draft.vendeur))]
    pub async fn append(&self, draft: &TicketDraft, count: u32) -> Result<Vec<u64>, StoreError> {
        if count == 0 {
            return Ok(Vec::new());
        }

        let _guard = self.lock.lock().await;
        let mut doc = self.read_document().await?;

        let start = doc.tickets.len() as u64 + 1;
        let ids: Vec<u64> = (start..start + u64::from(count)).collect();
        let date = rfc3339_now();
        for id in &ids {
            doc.tickets.push(draft.ticket(*id, date.clone()));
        }

        self.write_document(&doc).await?;
        debug!(first = ids[0], last = ids[ids.len() - 1], "tickets appended");
        Ok(ids)
    }

    /// Replace the entire store contents. Returns the new ticket count.
    pub async fn replace_all(&self, tickets: Vec<Ticket>) -> Result<usize, StoreError> {
        let _guard = self.lock.lock().await;
        let count = tickets.len();
        self.write_document(&StoreDocument { tickets }).await?;
        Ok(count)
    }

    async fn read_document(&self) -> Result<StoreDocument, StoreError> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(StoreDocument::default());
            }
            Err(e) => {
                return Err(StoreError::ReadFailed {
                    path: self.path.display().to_string(),
                    source: e,
                });
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(doc) => Ok(doc),
            Err(e) => {
                // Lenient recovery: a corrupt store reads as empty.
                warn!(path = %self.path.display(), error = %e, "malformed store file, treating as empty");
                Ok(StoreDocument::default())
            }
        }
    }

    async fn write_document(&self, doc: &StoreDocument) -> Result<(), StoreError> {
        let _timer = metrics::timer_store_write();
        let json = serde_json::to_vec_pretty(doc)?;
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| StoreError::WriteFailed {
                path: self.path.display().to_string(),
                source: e,
            })
    }
}
