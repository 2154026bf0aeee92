//! Shared utilities for the analysis workspace
//!
//! This crate provides common functionality used across the workspace,
//! including logging setup and environment-variable helpers.

pub mod config;
pub mod logging;

pub use config::env_var;
pub use logging::{init_tracing, init_tracing_with};
