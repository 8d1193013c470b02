//! # Cloudinary Provider
//!
//! Implements the `MediaStore` trait for the Cloudinary upload API.
//!
//! ## Overview
//!
//! This module provides:
//! - Signed uploads with `resource_type=auto` into a configured folder
//! - Deletion of orphaned uploads by public id
//! - A credentials ping used by the startup check
//!
//! Every operation is a single HTTP request through the injected
//! `HttpClient`; nothing is retried.

pub mod connector;
pub mod error;
pub mod types;

pub use connector::CloudinaryMediaStore;
pub use error::{CloudinaryError, Result};
