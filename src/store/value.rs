//! Firestore REST value mapping.
//!
//! The REST API wraps every field in a typed envelope
//! (`{"stringValue": "..."}`, `{"doubleValue": 2.5}`, ...). This module
//! converts between that representation and plain JSON so the rest of
//! the crate never sees the envelopes.
//!
//! `timestampValue` surfaces as `{"_seconds": .., "_nanoseconds": ..}`,
//! the shape the admin SDK hands to dashboard clients and the shape
//! `models::Timestamp` deserializes.

use chrono::{DateTime, SecondsFormat, Utc};
use serde_json::{json, Map, Value};

use super::StoreError;

/// Split a REST document (`{"name": "projects/...", "fields": {...}}`)
/// into its id (last path segment) and plain-JSON fields.
pub fn from_document(doc: &Value) -> Result<(String, Value), StoreError> {
    let name = doc
        .get("name")
        .and_then(Value::as_str)
        .ok_or_else(|| StoreError::Decode("document without a name".into()))?;
    let id = name
        .rsplit('/')
        .next()
        .unwrap_or(name)
        .to_string();

    let fields = match doc.get("fields") {
        Some(fields) => decode_fields(fields)?,
        None => json!({}),
    };
    Ok((id, fields))
}

/// Decode a `fields` map of typed envelopes into a plain JSON object.
pub fn decode_fields(fields: &Value) -> Result<Value, StoreError> {
    let map = fields
        .as_object()
        .ok_or_else(|| StoreError::Decode("fields is not an object".into()))?;
    let mut out = Map::with_capacity(map.len());
    for (key, envelope) in map {
        out.insert(key.clone(), decode_value(envelope)?);
    }
    Ok(Value::Object(out))
}

fn decode_value(envelope: &Value) -> Result<Value, StoreError> {
    let obj = envelope
        .as_object()
        .ok_or_else(|| StoreError::Decode("value without a type envelope".into()))?;
    let (kind, inner) = obj
        .iter()
        .next()
        .ok_or_else(|| StoreError::Decode("empty value envelope".into()))?;

    match kind.as_str() {
        "nullValue" => Ok(Value::Null),
        "booleanValue" | "stringValue" | "doubleValue" => Ok(inner.clone()),
        // Firestore serializes integers as strings.
        "integerValue" => {
            let raw = inner
                .as_str()
                .map(str::to_owned)
                .unwrap_or_else(|| inner.to_string());
            raw.parse::<i64>()
                .map(Value::from)
                .map_err(|_| StoreError::Decode(format!("bad integerValue {raw:?}")))
        }
        "timestampValue" => {
            let raw = inner
                .as_str()
                .ok_or_else(|| StoreError::Decode("timestampValue is not a string".into()))?;
            let dt = DateTime::parse_from_rfc3339(raw)
                .map_err(|e| StoreError::Decode(format!("bad timestampValue {raw:?}: {e}")))?;
            Ok(json!({
                "_seconds": dt.timestamp(),
                "_nanoseconds": dt.timestamp_subsec_nanos(),
            }))
        }
        "mapValue" => match inner.get("fields") {
            Some(fields) => decode_fields(fields),
            None => Ok(json!({})),
        },
        "arrayValue" => {
            let items = inner
                .get("values")
                .and_then(Value::as_array)
                .map(|v| v.as_slice())
                .unwrap_or(&[]);
            items
                .iter()
                .map(decode_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array)
        }
        other => Err(StoreError::Decode(format!("unsupported value type {other:?}"))),
    }
}

/// Encode a plain JSON object as a `fields` map of typed envelopes.
pub fn encode_fields(fields: &Value) -> Result<Value, StoreError> {
    let map = fields
        .as_object()
        .ok_or_else(|| StoreError::Decode("document body must be a JSON object".into()))?;
    let mut out = Map::with_capacity(map.len());
    for (key, value) in map {
        out.insert(key.clone(), encode_value(value)?);
    }
    Ok(Value::Object(out))
}

fn encode_value(value: &Value) -> Result<Value, StoreError> {
    Ok(match value {
        Value::Null => json!({"nullValue": null}),
        Value::Bool(b) => json!({"booleanValue": b}),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                json!({"integerValue": i.to_string()})
            } else {
                json!({"doubleValue": n.as_f64()})
            }
        }
        Value::String(s) => json!({"stringValue": s}),
        Value::Array(items) => {
            let values = items
                .iter()
                .map(encode_value)
                .collect::<Result<Vec<_>, _>>()?;
            json!({"arrayValue": {"values": values}})
        }
        Value::Object(obj) => {
            // The `{_seconds, _nanoseconds}` shape round-trips back to a
            // real Firestore timestamp.
            if let Some(secs) = obj.get("_seconds").and_then(Value::as_i64) {
                let nanos = obj
                    .get("_nanoseconds")
                    .and_then(Value::as_u64)
                    .unwrap_or(0) as u32;
                let dt = DateTime::<Utc>::from_timestamp(secs, nanos).ok_or_else(|| {
                    StoreError::Decode(format!("timestamp out of range: {secs}s"))
                })?;
                json!({
                    "timestampValue": dt.to_rfc3339_opts(SecondsFormat::AutoSi, true)
                })
            } else {
                json!({"mapValue": {"fields": encode_fields(value)?}})
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_id_is_last_path_segment() {
        let doc = json!({
            "name": "projects/p/databases/(default)/documents/users/abc123",
            "fields": {"fullName": {"stringValue": "Amina W."}}
        });
        let (id, fields) = from_document(&doc).unwrap();
        assert_eq!(id, "abc123");
        assert_eq!(fields["fullName"], "Amina W.");
    }

    #[test]
    fn document_without_fields_is_empty_object() {
        let doc = json!({"name": "projects/p/databases/(default)/documents/users/x"});
        let (_, fields) = from_document(&doc).unwrap();
        assert_eq!(fields, json!({}));
    }

    #[test]
    fn scalar_envelopes_decode() {
        let fields = json!({
            "disease": {"stringValue": "Tomato___Early_blight"},
            "confidence": {"doubleValue": 0.95},
            "isOnline": {"booleanValue": true},
            "attempts": {"integerValue": "3"},
            "note": {"nullValue": null}
        });
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded["disease"], "Tomato___Early_blight");
        assert_eq!(decoded["confidence"], 0.95);
        assert_eq!(decoded["isOnline"], true);
        assert_eq!(decoded["attempts"], 3);
        assert_eq!(decoded["note"], Value::Null);
    }

    #[test]
    fn timestamp_decodes_to_admin_sdk_shape() {
        let fields = json!({"timestamp": {"timestampValue": "2023-11-14T22:13:20Z"}});
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded["timestamp"]["_seconds"], 1_700_000_000);
        assert_eq!(decoded["timestamp"]["_nanoseconds"], 0);
    }

    #[test]
    fn nested_map_decodes() {
        let fields = json!({
            "treatment": {"mapValue": {"fields": {
                "type": {"stringValue": "Fungicide"},
                "prevention": {"stringValue": "Crop rotation"}
            }}}
        });
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded["treatment"]["type"], "Fungicide");
    }

    #[test]
    fn array_decodes() {
        let fields = json!({
            "tags": {"arrayValue": {"values": [
                {"stringValue": "a"}, {"integerValue": "2"}
            ]}}
        });
        let decoded = decode_fields(&fields).unwrap();
        assert_eq!(decoded["tags"], json!(["a", 2]));
    }

    #[test]
    fn unknown_envelope_rejected() {
        let fields = json!({"geo": {"geoPointValue": {}}});
        assert!(matches!(
            decode_fields(&fields),
            Err(StoreError::Decode(_))
        ));
    }

    #[test]
    fn encode_round_trips_profile_document() {
        let profile = json!({
            "fullName": "John K.",
            "farmSize": 2.5,
            "scansCount": 7,
            "active": true,
            "createdAt": {"_seconds": 1_700_000_000, "_nanoseconds": 0},
            "treatment": {"type": "Organic"}
        });
        let encoded = encode_fields(&profile).unwrap();
        assert_eq!(encoded["fullName"]["stringValue"], "John K.");
        assert_eq!(encoded["farmSize"]["doubleValue"], 2.5);
        assert_eq!(encoded["scansCount"]["integerValue"], "7");
        assert_eq!(
            encoded["createdAt"]["timestampValue"],
            "2023-11-14T22:13:20Z"
        );
        assert_eq!(
            encoded["treatment"]["mapValue"]["fields"]["type"]["stringValue"],
            "Organic"
        );

        let decoded = decode_fields(&encoded).unwrap();
        assert_eq!(decoded, profile);
    }

    #[test]
    fn encode_rejects_non_object_body() {
        assert!(encode_fields(&json!("just a string")).is_err());
    }
}
