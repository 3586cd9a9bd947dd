pub mod analytics;
pub mod health;
pub mod scans;
pub mod users;
