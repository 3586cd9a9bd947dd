//! External-state access behind repository traits.
//!
//! Handlers never touch a global client: a `DocumentStore` and an
//! `AuthProvider` are constructed once in `main` and injected through
//! `ApiContext`. Production implementations talk to Firestore and the
//! Identity Toolkit over REST; tests swap in `memory::MemoryStore`.

pub mod auth;
pub mod firestore;
pub mod memory;
pub mod value;

use async_trait::async_trait;

/// Collection holding user profile documents.
pub const USERS: &str = "users";
/// Collection holding scan documents (read-only for this service).
pub const SCANS: &str = "scans";

/// A raw document: its id plus its fields as plain JSON.
pub type Document = (String, serde_json::Value);

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("service returned HTTP {status}: {body}")]
    Service { status: u16, body: String },
    #[error("document {collection}/{id} does not exist")]
    NotFound { collection: String, id: String },
    #[error("could not decode response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        StoreError::Transport(err.to_string())
    }
}

/// Full-snapshot CRUD over one document collection.
///
/// `get_all` is deliberately unpaginated — the dashboard always works
/// on a complete point-in-time snapshot.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// Create or overwrite a document at a known id.
    async fn set(
        &self,
        collection: &str,
        id: &str,
        fields: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Merge fields into an existing document. Fails with `NotFound`
    /// if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        fields: &serde_json::Value,
    ) -> Result<(), StoreError>;

    /// Remove a document. Deleting an absent document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;
}

/// Identity provisioning in the external auth service.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Create an identity and return its uid. The caller writes the
    /// profile document under that uid as a second, separate step.
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<String, StoreError>;
}
