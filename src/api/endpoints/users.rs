//! User profile CRUD — the mutation gateway.
//!
//! Each operation is a single external call with no retry; on failure
//! the frontend keeps whatever it was already showing.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::models::user::{NewUser, User, DEFAULT_LANGUAGE};
use crate::store::{Document, USERS};

#[derive(Serialize)]
pub struct UsersResponse {
    pub users: Vec<User>,
}

#[derive(Serialize)]
pub struct CreatedResponse {
    pub success: bool,
    pub message: &'static str,
    pub uid: String,
}

#[derive(Serialize)]
pub struct MutatedResponse {
    pub success: bool,
    pub message: &'static str,
}

/// `GET /api/users` — full snapshot, uid injected from the document id.
pub async fn list(State(ctx): State<ApiContext>) -> Result<Json<UsersResponse>, ApiError> {
    let docs = ctx
        .store
        .get_all(USERS)
        .await
        .map_err(|e| ApiError::fetch("users", e))?;
    Ok(Json(UsersResponse {
        users: decode_users(docs),
    }))
}

pub(crate) fn decode_users(docs: Vec<Document>) -> Vec<User> {
    docs.into_iter()
        .filter_map(|(id, fields)| match serde_json::from_value::<User>(fields) {
            Ok(mut user) => {
                user.uid = id;
                Some(user)
            }
            Err(err) => {
                tracing::warn!(%id, %err, "dropping malformed user document");
                None
            }
        })
        .collect()
}

/// `POST /api/users` — two-step create: provision an identity in the
/// auth service, then write the profile document under the returned
/// uid.
///
/// If the profile write fails after the identity was created, the
/// identity is left orphaned in the auth service. There is no
/// compensating delete and no retry key; the error is surfaced and the
/// inconsistency is accepted.
pub async fn create(
    State(ctx): State<ApiContext>,
    Json(body): Json<NewUser>,
) -> Result<Json<CreatedResponse>, ApiError> {
    let password = body
        .password
        .as_deref()
        .unwrap_or(&ctx.default_user_password);

    let uid = ctx
        .auth
        .create_identity(&body.email, password, &body.full_name)
        .await
        .map_err(|e| ApiError::mutation("create user", e))?;

    let now = Utc::now();
    let stamp = json!({
        "_seconds": now.timestamp(),
        "_nanoseconds": now.timestamp_subsec_nanos(),
    });
    let profile = json!({
        "fullName": body.full_name,
        "email": body.email,
        "location": body.location,
        "farmSize": body.farm_size,
        "preferredLanguage": body.preferred_language.as_deref().unwrap_or(DEFAULT_LANGUAGE),
        "createdAt": stamp,
        "updatedAt": stamp,
    });

    ctx.store
        .set(USERS, &uid, &profile)
        .await
        .map_err(|e| ApiError::mutation("create user", e))?;

    tracing::info!(%uid, "user created");
    Ok(Json(CreatedResponse {
        success: true,
        message: "User created successfully",
        uid,
    }))
}

/// `PUT /api/users/:uid` — overwrite profile fields. Any `uid` in the
/// body is stripped so the document key can never be rewritten. Fails
/// if the document does not exist.
pub async fn update(
    State(ctx): State<ApiContext>,
    Path(uid): Path<String>,
    Json(mut body): Json<Value>,
) -> Result<Json<MutatedResponse>, ApiError> {
    if let Some(fields) = body.as_object_mut() {
        fields.remove("uid");
    }

    ctx.store
        .update(USERS, &uid, &body)
        .await
        .map_err(|e| ApiError::mutation("update user", e))?;

    tracing::info!(%uid, "user updated");
    Ok(Json(MutatedResponse {
        success: true,
        message: "User updated successfully",
    }))
}

/// `DELETE /api/users/:uid` — remove the profile document. Scans
/// referencing the uid are left in place; they render as
/// "Unknown User" from then on.
pub async fn remove(
    State(ctx): State<ApiContext>,
    Path(uid): Path<String>,
) -> Result<Json<MutatedResponse>, ApiError> {
    ctx.store
        .delete(USERS, &uid)
        .await
        .map_err(|e| ApiError::mutation("delete user", e))?;

    tracing::info!(%uid, "user deleted");
    Ok(Json(MutatedResponse {
        success: true,
        message: "User deleted successfully",
    }))
}
