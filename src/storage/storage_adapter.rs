//! Storage adapters.
//!
//! A storage adapter wraps another storage and implements the same capability traits, forwarding every call.

pub mod performance_metrics;
pub mod usage_log;
