//! Firebase Identity Toolkit implementation of `AuthProvider`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{AuthProvider, StoreError};

const IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// REST client for identity provisioning.
pub struct IdentityClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

impl IdentityClient {
    pub fn new(api_key: &str) -> Self {
        Self::with_base_url(IDENTITY_TOOLKIT_URL, api_key)
    }

    /// Point the client at an arbitrary base URL (Auth emulator).
    pub fn with_base_url(base_url: &str, api_key: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SignUpRequest<'a> {
    email: &'a str,
    password: &'a str,
    display_name: &'a str,
    return_secure_token: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignUpResponse {
    local_id: String,
}

#[async_trait]
impl AuthProvider for IdentityClient {
    async fn create_identity(
        &self,
        email: &str,
        password: &str,
        display_name: &str,
    ) -> Result<String, StoreError> {
        let url = format!("{}/accounts:signUp", self.base_url);
        let response = self
            .client
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&SignUpRequest {
                email,
                password,
                display_name,
                return_secure_token: false,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Identity Toolkit errors carry a machine-readable message
            // (EMAIL_EXISTS, WEAK_PASSWORD, ...) in the body.
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Service {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SignUpResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Decode(e.to_string()))?;
        Ok(parsed.local_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_up_request_uses_identity_toolkit_field_names() {
        let body = serde_json::to_value(SignUpRequest {
            email: "amina@example.com",
            password: "s3cret",
            display_name: "Amina W.",
            return_secure_token: false,
        })
        .unwrap();
        assert_eq!(body["email"], "amina@example.com");
        assert_eq!(body["displayName"], "Amina W.");
        assert_eq!(body["returnSecureToken"], false);
    }

    #[test]
    fn sign_up_response_reads_local_id() {
        let parsed: SignUpResponse =
            serde_json::from_str(r#"{"kind":"identitytoolkit#SignupNewUserResponse","localId":"uid-1","email":"a@b.c"}"#)
                .unwrap();
        assert_eq!(parsed.local_id, "uid-1");
    }
}
