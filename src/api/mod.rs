//! HTTP surface consumed by the dashboard frontend.

pub mod endpoints;
pub mod error;
pub mod router;
pub mod types;
