//! Canned usage and revenue reports for a multi-tenant messaging platform.
//!
//! [`services::StatsCalculator`] runs a fixed set of aggregate queries
//! against the platform database through [`db::StatsRepo`] and returns
//! best-effort [`models::Report`]s: a failed read never escapes as an error,
//! it is carried inside the report next to the metrics gathered before it.

pub mod config;
pub mod db;
pub mod models;
#[cfg(feature = "cli")]
pub mod observability;
pub mod services;
