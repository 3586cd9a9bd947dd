//! Scan documents produced by the mobile scanning app.
//!
//! Scans are read-only from the admin side: the dashboard never writes
//! to the `scans` collection.

use serde::{Deserialize, Serialize};

use super::Timestamp;

/// Model-specific prefix carried by raw disease labels
/// (e.g. `Tomato___Early_blight`). Stripped for display.
const DISEASE_LABEL_PREFIX: &str = "Tomato___";

/// One plant-disease analysis event.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Scan {
    /// Raw disease label. Scans without one are invalid and excluded
    /// from every derived view.
    pub disease: Option<String>,
    /// Open set of labels; absent reads as "Unknown" downstream.
    pub severity: Option<String>,
    /// Model confidence in [0, 1]; absent reads as 0.
    pub confidence: f64,
    pub is_online: bool,
    /// Foreign key into `users`, not guaranteed to resolve.
    pub user_id: Option<String>,
    pub timestamp: Option<Timestamp>,
    pub treatment: Option<Treatment>,
    pub original_image_url: Option<String>,
}

impl Scan {
    /// Display form of the raw disease label, if present: model prefix
    /// stripped once, underscores replaced with spaces.
    pub fn display_disease(&self) -> Option<String> {
        self.disease.as_deref().map(normalize_disease)
    }
}

/// `Tomato___Early_blight` -> `Early blight`.
pub fn normalize_disease(raw: &str) -> String {
    raw.replacen(DISEASE_LABEL_PREFIX, "", 1).replace('_', " ")
}

/// Recommended treatment attached to a scan. Every field is optional
/// in the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Treatment {
    #[serde(rename = "type")]
    pub treatment_type: Option<String>,
    pub symptoms: Option<String>,
    pub chemical_treatment: Option<String>,
    pub organic_treatment: Option<String>,
    pub prevention: Option<String>,
}
