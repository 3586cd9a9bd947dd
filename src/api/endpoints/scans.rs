//! Scan collection reads. Scans are never mutated from the admin side.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::scan::Scan;
use crate::store::{Document, SCANS};

#[derive(Serialize)]
pub struct ScansResponse {
    pub scans: Vec<Scan>,
}

/// `GET /api/scans` — full snapshot of the scans collection.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<ScansResponse>, ApiError> {
    let docs = ctx
        .store
        .get_all(SCANS)
        .await
        .map_err(|e| ApiError::fetch("scans", e))?;
    Ok(Json(ScansResponse {
        scans: decode_scans(docs),
    }))
}

/// Decode raw documents into scans. Fields default at the serde
/// boundary; a document that still fails to decode is dropped with a
/// warning rather than failing the whole snapshot.
pub(crate) fn decode_scans(docs: Vec<Document>) -> Vec<Scan> {
    docs.into_iter()
        .filter_map(|(id, fields)| match serde_json::from_value::<Scan>(fields) {
            Ok(scan) => Some(scan),
            Err(err) => {
                tracing::warn!(%id, %err, "dropping malformed scan document");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_keeps_sparse_documents() {
        let scans = decode_scans(vec![
            ("s1".to_string(), json!({"disease": "Tomato___healthy"})),
            ("s2".to_string(), json!({})),
        ]);
        assert_eq!(scans.len(), 2);
        assert_eq!(scans[0].disease.as_deref(), Some("Tomato___healthy"));
        assert!(scans[1].disease.is_none());
    }

    #[test]
    fn decode_drops_type_mismatches() {
        let scans = decode_scans(vec![(
            "bad".to_string(),
            json!({"confidence": "ninety percent"}),
        )]);
        assert!(scans.is_empty());
    }
}
