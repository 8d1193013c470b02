//! # Library Client
//!
//! Client-side state for the Playo library page.
//!
//! ## Overview
//!
//! - [`SongsApiClient`] talks to the songs API over an injected
//!   [`HttpClient`](bridge_traits::http::HttpClient)
//! - [`UploadForm`] owns the upload inputs, validation and simulated progress
//! - [`LibraryView`] holds the fetched songs and the loading/error status
//! - [`LibraryPage`] ties the view and the form to a
//!   [`Player`](core_playback::Player)
//!
//! Fetch failures are only retried when the user asks for it through
//! [`LibraryView::retry`].

pub mod api;
pub mod error;
pub mod library;
pub mod page;
pub mod upload;

pub use api::SongsApiClient;
pub use error::{ClientError, Result};
pub use library::{LibraryRow, LibraryStatus, LibraryView};
pub use page::LibraryPage;
pub use upload::{
    SelectedFile, UploadField, UploadFields, UploadForm, UploadProgress, UploadSubmission,
    MAX_UPLOAD_BYTES,
};
