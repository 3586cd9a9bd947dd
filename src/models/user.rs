//! User profile documents, keyed by the auth-service uid.

use serde::{Deserialize, Serialize};

use super::Timestamp;

pub const DEFAULT_LANGUAGE: &str = "en";

/// A registered farmer. `uid` is the Firestore document id, injected
/// after deserialization — the document body does not carry it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub uid: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub location: Option<String>,
    /// Acres; optional, non-negative when present.
    pub farm_size: Option<f64>,
    pub preferred_language: Option<String>,
    pub created_at: Option<Timestamp>,
    pub updated_at: Option<Timestamp>,
}

/// Payload for `POST /api/users`. Password and language are optional;
/// defaults are applied by the handler.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub farm_size: Option<f64>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub preferred_language: Option<String>,
}
