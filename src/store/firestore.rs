//! Firestore REST implementation of `DocumentStore`.

use async_trait::async_trait;
use serde_json::Value;

use super::value;
use super::{Document, DocumentStore, StoreError};

/// Firestore client for one project's `(default)` database.
pub struct Firestore {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl Firestore {
    pub fn new(project_id: &str, api_key: &str) -> Self {
        Self::with_base_url(
            &format!(
                "https://firestore.googleapis.com/v1/projects/{project_id}/databases/(default)/documents"
            ),
            api_key,
        )
    }

    /// Point the client at an arbitrary base URL (Firestore emulator).
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    async fn fail_from(response: reqwest::Response) -> StoreError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        StoreError::Service { status, body }
    }
}

#[async_trait]
impl DocumentStore for Firestore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let response = self
            .client
            .get(self.url(collection))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::fail_from(response).await);
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;

        // An empty collection comes back as `{}` with no `documents` key.
        let docs = body
            .get("documents")
            .and_then(Value::as_array)
            .map(|v| v.as_slice())
            .unwrap_or(&[]);

        docs.iter().map(value::from_document).collect()
    }

    async fn set(&self, collection: &str, id: &str, fields: &Value) -> Result<(), StoreError> {
        let body = serde_json::json!({"fields": value::encode_fields(fields)?});
        let response = self
            .client
            .patch(self.url(&format!("{collection}/{id}")))
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::fail_from(response).await);
        }
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: &Value) -> Result<(), StoreError> {
        // Merge semantics: mask to exactly the provided field paths, and
        // require the document to exist so updating a deleted user fails.
        let mut query: Vec<(&str, String)> = vec![
            ("key", self.api_key.clone()),
            ("currentDocument.exists", "true".to_string()),
        ];
        if let Some(map) = fields.as_object() {
            for key in map.keys() {
                query.push(("updateMask.fieldPaths", key.clone()));
            }
        }

        let body = serde_json::json!({"fields": value::encode_fields(fields)?});
        let response = self
            .client
            .patch(self.url(&format!("{collection}/{id}")))
            .query(&query)
            .json(&body)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            });
        }
        if !response.status().is_success() {
            return Err(Self::fail_from(response).await);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.url(&format!("{collection}/{id}")))
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Self::fail_from(response).await);
        }
        Ok(())
    }
}
