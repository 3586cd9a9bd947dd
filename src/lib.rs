//! Backend for the ShambaEye admin dashboard.
//!
//! Serves full-snapshot reads of the `users` and `scans` collections,
//! derived scan analytics, and user profile mutations over a small
//! JSON API. State lives in Firestore and Firebase Auth; this process
//! owns nothing durable.

pub mod analytics;
pub mod api;
pub mod config;
pub mod models;
pub mod store;
