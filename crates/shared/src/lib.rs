//! Shared types and configuration for the profit-share settlement engine.
//!
//! This crate provides common types used across all other crates:
//! - Member identity newtypes (SSN, badge number, PSN)
//! - Money rounding with the plan's half-away-from-zero rule
//! - Configuration management

pub mod config;
pub mod types;

pub use config::AppConfig;
pub use types::{BadgeNumber, Psn, Ssn};
