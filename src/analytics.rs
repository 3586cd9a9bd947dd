//! Scan analytics: pure transforms from raw scan/user snapshots into
//! chart-ready derived views.
//!
//! Everything here is a function of its inputs — no caching, no
//! incremental recomputation. Volumes are small enough that a full
//! recompute per request is fine.
//!
//! Scans without a `disease` value (missing or empty) are invalid and
//! excluded from every view up front, not merely zero-filled.

use std::collections::HashSet;

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

use crate::models::scan::{normalize_disease, Scan};
use crate::models::user::User;

/// How many users the activity table shows.
const TOP_USERS: usize = 5;

/// Confidence bucket labels, highest first. Buckets use inclusive
/// lower bounds at 0.9 / 0.8 / 0.7.
const CONFIDENCE_RANGES: [&str; 4] = ["90-100%", "80-89%", "70-79%", "Below 70%"];

const UNKNOWN: &str = "Unknown";
const UNKNOWN_USER: &str = "Unknown User";

// ─── View row types ─────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiseaseCount {
    /// Display-normalized disease name.
    pub disease: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeverityCount {
    pub severity: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyCount {
    /// `month/year`, e.g. `11/2023`.
    pub month: String,
    pub scans: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TreatmentCount {
    #[serde(rename = "type")]
    pub treatment_type: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfidenceBucket {
    pub range: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeCount {
    /// "Online" or "Offline".
    #[serde(rename = "type")]
    pub mode: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserActivity {
    /// Display name, or "Unknown User" for unresolved uids.
    pub user: String,
    pub scans: usize,
    pub location: String,
}

/// Scalar metrics over the filtered scan set.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_scans: usize,
    /// Distinct *raw* disease labels. The distribution view groups by
    /// the normalized name instead, so labels differing only by the
    /// model prefix count once there and twice here. Known
    /// discrepancy, kept as-is.
    pub unique_diseases: usize,
    pub average_confidence: f64,
    pub online_scans: usize,
}

/// The seven derived views plus scalar summary, computed in one pass
/// over the snapshot pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedViews {
    pub disease_distribution: Vec<DiseaseCount>,
    pub severity_breakdown: Vec<SeverityCount>,
    pub monthly_trend: Vec<MonthlyCount>,
    pub treatment_types: Vec<TreatmentCount>,
    pub confidence_levels: Vec<ConfidenceBucket>,
    pub analysis_modes: Vec<ModeCount>,
    pub top_users: Vec<UserActivity>,
    pub summary: Summary,
}

/// Dashboard headline numbers, computed over the *unfiltered* arrays.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_users: usize,
    pub total_scans: usize,
    /// Users with at least one scan in the 30 days before `now`.
    pub active_users: usize,
    /// Percentage of scans with confidence strictly above 0.8, rounded.
    pub success_rate: u32,
}

// ─── Pipeline ───────────────────────────────────────────────────────

pub fn derive(scans: &[Scan], users: &[User]) -> DerivedViews {
    // An empty disease label is as invalid as a missing one, so no
    // empty-named row can ever reach the distribution view.
    let valid: Vec<&Scan> = scans
        .iter()
        .filter(|s| s.disease.as_deref().is_some_and(|d| !d.is_empty()))
        .collect();

    DerivedViews {
        disease_distribution: disease_distribution(&valid),
        severity_breakdown: severity_breakdown(&valid),
        monthly_trend: monthly_trend(&valid),
        treatment_types: treatment_types(&valid),
        confidence_levels: confidence_levels(&valid),
        analysis_modes: analysis_modes(&valid),
        top_users: top_users(&valid, users),
        summary: summary(&valid),
    }
}

/// Count occurrences of each key, preserving first-occurrence order.
/// Linear scan: key cardinality is tiny (disease names, severities).
fn tally(keys: impl Iterator<Item = String>) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts
}

fn disease_distribution(valid: &[&Scan]) -> Vec<DiseaseCount> {
    let mut rows: Vec<DiseaseCount> = tally(
        valid
            .iter()
            .filter_map(|s| s.disease.as_deref())
            .map(normalize_disease),
    )
    .into_iter()
    .map(|(disease, count)| DiseaseCount { disease, count })
    .collect();
    rows.sort_by(|a, b| b.count.cmp(&a.count));
    rows
}

fn severity_breakdown(valid: &[&Scan]) -> Vec<SeverityCount> {
    tally(valid.iter().map(|s| {
        s.severity
            .clone()
            .filter(|severity| !severity.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }))
    .into_iter()
    .map(|(severity, count)| SeverityCount { severity, count })
    .collect()
}

fn monthly_trend(valid: &[&Scan]) -> Vec<MonthlyCount> {
    // (year, month) keys; scans without a usable timestamp are excluded
    // from this view only. Epoch-zero seconds read as "no timestamp".
    let keys = valid.iter().filter_map(|s| {
        let ts = s.timestamp.filter(|t| t.seconds != 0)?;
        let date = ts.to_datetime()?;
        Some((date.year(), date.month()))
    });

    let mut counts: Vec<((i32, u32), usize)> = Vec::new();
    for key in keys {
        match counts.iter_mut().find(|(k, _)| *k == key) {
            Some((_, n)) => *n += 1,
            None => counts.push((key, 1)),
        }
    }
    counts.sort_by_key(|(key, _)| *key);

    counts
        .into_iter()
        .map(|((year, month), scans)| MonthlyCount {
            month: format!("{month}/{year}"),
            scans,
        })
        .collect()
}

fn treatment_types(valid: &[&Scan]) -> Vec<TreatmentCount> {
    tally(valid.iter().map(|s| {
        s.treatment
            .as_ref()
            .and_then(|t| t.treatment_type.clone())
            .filter(|kind| !kind.is_empty())
            .unwrap_or_else(|| UNKNOWN.to_string())
    }))
    .into_iter()
    .map(|(treatment_type, count)| TreatmentCount {
        treatment_type,
        count,
    })
    .collect()
}

/// Inclusive lower-bound thresholds; a missing confidence is 0 and
/// lands in "Below 70%".
fn confidence_range(confidence: f64) -> &'static str {
    if confidence >= 0.9 {
        CONFIDENCE_RANGES[0]
    } else if confidence >= 0.8 {
        CONFIDENCE_RANGES[1]
    } else if confidence >= 0.7 {
        CONFIDENCE_RANGES[2]
    } else {
        CONFIDENCE_RANGES[3]
    }
}

fn confidence_levels(valid: &[&Scan]) -> Vec<ConfidenceBucket> {
    let mut counts = [0usize; CONFIDENCE_RANGES.len()];
    for scan in valid {
        let range = confidence_range(scan.confidence);
        let slot = CONFIDENCE_RANGES.iter().position(|r| *r == range);
        counts[slot.unwrap_or(CONFIDENCE_RANGES.len() - 1)] += 1;
    }

    // Fixed bucket order, but only observed buckets are emitted.
    CONFIDENCE_RANGES
        .iter()
        .zip(counts)
        .filter(|(_, count)| *count > 0)
        .map(|(range, count)| ConfidenceBucket {
            range: range.to_string(),
            count,
        })
        .collect()
}

fn analysis_modes(valid: &[&Scan]) -> Vec<ModeCount> {
    let online = valid.iter().filter(|s| s.is_online).count();
    let offline = valid.len() - online;

    // "Online" first, observed modes only.
    [("Online", online), ("Offline", offline)]
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(mode, count)| ModeCount {
            mode: mode.to_string(),
            count,
        })
        .collect()
}

fn top_users(valid: &[&Scan], users: &[User]) -> Vec<UserActivity> {
    // Scans without a userId don't appear in this view. An empty id
    // counts as absent, same as an empty disease or severity.
    let mut rows: Vec<(String, usize)> = tally(
        valid
            .iter()
            .filter_map(|s| s.user_id.clone())
            .filter(|uid| !uid.is_empty()),
    );
    rows.sort_by(|a, b| b.1.cmp(&a.1));
    rows.truncate(TOP_USERS);

    rows.into_iter()
        .map(|(uid, scans)| {
            let user = users.iter().find(|u| u.uid == uid);
            UserActivity {
                user: user
                    .and_then(|u| u.full_name.clone())
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| UNKNOWN_USER.to_string()),
                scans,
                location: user
                    .and_then(|u| u.location.clone())
                    .filter(|loc| !loc.is_empty())
                    .unwrap_or_else(|| UNKNOWN.to_string()),
            }
        })
        .collect()
}

fn summary(valid: &[&Scan]) -> Summary {
    let unique_diseases: HashSet<&str> =
        valid.iter().filter_map(|s| s.disease.as_deref()).collect();

    let average_confidence = if valid.is_empty() {
        0.0
    } else {
        valid.iter().map(|s| s.confidence).sum::<f64>() / valid.len() as f64
    };

    Summary {
        total_scans: valid.len(),
        unique_diseases: unique_diseases.len(),
        average_confidence,
        online_scans: valid.iter().filter(|s| s.is_online).count(),
    }
}

/// Headline numbers for the dashboard cards. Works on the raw arrays,
/// not the disease-filtered set.
pub fn dashboard_stats(scans: &[Scan], users: &[User], now: DateTime<Utc>) -> DashboardStats {
    let cutoff = now - chrono::Duration::days(30);

    let active_users = users
        .iter()
        .filter(|user| {
            scans.iter().any(|scan| {
                scan.user_id.as_deref() == Some(user.uid.as_str())
                    && scan
                        .timestamp
                        .and_then(|t| t.to_datetime())
                        .is_some_and(|t| t > cutoff)
            })
        })
        .count();

    let successful = scans.iter().filter(|s| s.confidence > 0.8).count();
    let success_rate = if scans.is_empty() {
        0
    } else {
        (successful as f64 / scans.len() as f64 * 100.0).round() as u32
    };

    DashboardStats {
        total_users: users.len(),
        total_scans: scans.len(),
        active_users,
        success_rate,
    }
}
