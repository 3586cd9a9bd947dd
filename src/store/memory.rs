//! In-memory `DocumentStore` / `AuthProvider` for tests and local
//! development without Firebase credentials.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use super::{AuthProvider, Document, DocumentStore, StoreError};

type Collections = BTreeMap<String, BTreeMap<String, Value>>;

/// Map-of-maps store. Each collection is a `BTreeMap` keyed by
/// document id, so `get_all` returns documents in id order — a
/// deterministic ordering snapshot tests can rely on.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
    fail_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-load a document, bypassing the trait (test setup).
    pub fn seed(&self, collection: &str, id: &str, fields: Value) {
        let mut guard = self.collections.write().expect("store lock");
        guard
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), fields);
    }

    /// Make every subsequent write fail, simulating a store outage.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn len(&self, collection: &str) -> usize {
        let guard = self.collections.read().expect("store lock");
        guard.get(collection).map_or(0, BTreeMap::len)
    }

    fn write_error(&self) -> Option<StoreError> {
        self.fail_writes.load(Ordering::SeqCst).then(|| StoreError::Service {
            status: 503,
            body: "simulated outage".to_string(),
        })
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get_all(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let guard = self.collections.read().expect("store lock");
        Ok(guard
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| (id.clone(), fields.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn set(&self, collection: &str, id: &str, fields: &Value) -> Result<(), StoreError> {
        if let Some(err) = self.write_error() {
            return Err(err);
        }
        self.seed(collection, id, fields.clone());
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: &Value) -> Result<(), StoreError> {
        if let Some(err) = self.write_error() {
            return Err(err);
        }
        let mut guard = self.collections.write().expect("store lock");
        let doc = guard
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;

        if let (Some(target), Some(patch)) = (doc.as_object_mut(), fields.as_object()) {
            for (key, value) in patch {
                target.insert(key.clone(), value.clone());
            }
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        if let Some(err) = self.write_error() {
            return Err(err);
        }
        let mut guard = self.collections.write().expect("store lock");
        if let Some(docs) = guard.get_mut(collection) {
            docs.remove(id);
        }
        Ok(())
    }
}

/// Auth double that hands out sequential uids and records every
/// identity it created — lets tests observe orphaned identities.
#[derive(Default)]
pub struct MemoryAuth {
    created: Mutex<Vec<String>>,
    fail: AtomicBool,
}

impl MemoryAuth {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_next(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    /// Uids of every identity created so far, including ones whose
    /// profile write later failed.
    pub fn created(&self) -> Vec<String> {
        self.created.lock().expect("auth lock").clone()
    }
}

#[async_trait]
impl AuthProvider for MemoryAuth {
    async fn create_identity(
        &self,
        _email: &str,
        _password: &str,
        _display_name: &str,
    ) -> Result<String, StoreError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Service {
                status: 400,
                body: "EMAIL_EXISTS".to_string(),
            });
        }
        let uid = uuid::Uuid::new_v4().to_string();
        self.created.lock().expect("auth lock").push(uid.clone());
        Ok(uid)
    }
}
