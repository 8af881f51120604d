//! Claim document store boundary
//!
//! The pipeline reads claim text, loads the policy snippet corpus, and
//! persists results through this trait. The backing technology is a
//! collaborator concern; the bundled implementation is filesystem-based.

mod fs;

pub use fs::FsClaimStore;

use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Store for claim documents, policy snippets, and pipeline results
///
/// Keys are `/`-separated paths such as `claims/claim1.txt`. Listing order
/// is stable so retrieval tie-breaking stays deterministic.
#[async_trait]
pub trait ClaimStore: Send + Sync {
    /// Read the object at `key` as UTF-8 text
    async fn read(&self, key: &str) -> Result<String, StoreError>;

    /// Write an object at `key`, replacing any existing content
    async fn write(&self, key: &str, body: &[u8], content_type: &str) -> Result<(), StoreError>;

    /// List keys under `prefix`, in stable order
    async fn list(&self, prefix: &str) -> Result<Vec<String>, StoreError>;
}
