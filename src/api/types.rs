//! Shared state for the API router.

use std::sync::Arc;

use crate::store::{AuthProvider, DocumentStore};

/// Injected dependencies for every handler: the document store, the
/// auth service, and the create-user password default. Built once in
/// `main` and cloned into the router.
#[derive(Clone)]
pub struct ApiContext {
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthProvider>,
    pub default_user_password: String,
}

impl ApiContext {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthProvider>,
        default_user_password: impl Into<String>,
    ) -> Self {
        Self {
            store,
            auth,
            default_user_password: default_user_password.into(),
        }
    }
}
