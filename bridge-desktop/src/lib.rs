//! # Native Bridge Implementations
//!
//! Default implementations of bridge traits for the native server binary.
//!
//! ## Overview
//!
//! - `HttpClient` using `reqwest`, with multipart bodies mapped onto
//!   `reqwest::multipart::Form`
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::ReqwestHttpClient;
//! use std::sync::Arc;
//!
//! let http_client = Arc::new(ReqwestHttpClient::new()?);
//! ```

mod http;

pub use http::ReqwestHttpClient;
