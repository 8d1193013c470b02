//! # Core Runtime Module
//!
//! Provides foundational runtime infrastructure for the Playo server:
//! - Logging and tracing infrastructure
//! - Environment-driven configuration with fail-fast validation
//!
//! ## Overview
//!
//! This crate contains the runtime utilities that the server binary wires up
//! before anything else starts. It establishes the logging conventions used
//! throughout the workspace and the single [`AppConfig`](config::AppConfig)
//! that carries every deployment setting.

pub mod config;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
