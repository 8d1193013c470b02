//! # Host Bridge Traits
//!
//! Abstraction traits for the capabilities the Playo core borrows from its
//! environment.
//!
//! ## Overview
//!
//! The upload/list server and the browser-side client logic never talk to a
//! network stack, a media host or the wall clock directly. Each of those sits
//! behind a trait defined here so it can be swapped for a test double or a
//! different host implementation.
//!
//! ## Traits
//!
//! ### Networking
//! - [`HttpClient`](http::HttpClient) - Async HTTP operations, including multipart uploads
//!
//! ### Media hosting
//! - [`MediaStore`](media::MediaStore) - Opaque upload sink returning a durable URL,
//!   a public identifier and a duration
//!
//! ### Utilities
//! - [`Clock`](time::Clock) - Time source for deterministic testing
//! - [`LoggerSink`](time::LoggerSink) - Forward structured logs to host logging
//!
//! ## Implementations
//!
//! | Trait        | Implementation Crate  |
//! |--------------|-----------------------|
//! | `HttpClient` | `bridge-desktop`      |
//! | `MediaStore` | `provider-cloudinary` |
//! | `Clock`      | [`SystemClock`]       |
//!
//! ## Error Handling
//!
//! All bridge traits use the [`BridgeError`](error::BridgeError) type. Implementations
//! should convert their own errors into it with an actionable message.
//!
//! ## Thread Safety
//!
//! All bridge traits require `Send + Sync` so handles can be shared across
//! request handlers as `Arc<dyn Trait>`.

pub mod error;
pub mod http;
pub mod media;
pub mod time;

pub use error::BridgeError;

// Re-export commonly used types
pub use http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm, MultipartPart};
pub use media::{MediaStore, MediaUpload, StoredMedia};
pub use time::{Clock, LogEntry, LogLevel, LoggerSink, ManualClock, SystemClock};
