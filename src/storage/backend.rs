use std::future::Future;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;

/// Persistence boundary for the document store: one opaque blob in one fixed slot.
///
/// `write` must replace the slot atomically. A concurrent `read` sees either the
/// previous blob or the new one, never a mix.
pub trait DocumentBackend: Send + Sync {
    /// Current blob, or `None` if the slot has never been written.
    fn read(&self) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Overwrite the slot with `blob`.
    fn write(&self, blob: &str) -> impl Future<Output = Result<()>> + Send;
}

/// Process-local backend. Clones share the same slot, which lets tests keep a
/// handle to inspect or tamper with what the store persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-existing blob in the slot.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// Raw slot contents, bypassing the store.
    pub async fn snapshot(&self) -> Option<String> {
        self.slot.lock().await.clone()
    }

    /// Replace the raw slot contents, bypassing the store.
    pub async fn overwrite(&self, blob: impl Into<String>) {
        *self.slot.lock().await = Some(blob.into());
    }
}

impl DocumentBackend for MemoryBackend {
    async fn read(&self) -> Result<Option<String>> {
        Ok(self.slot.lock().await.clone())
    }

    async fn write(&self, blob: &str) -> Result<()> {
        *self.slot.lock().await = Some(blob.to_string());
        Ok(())
    }
}
