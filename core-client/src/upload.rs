//! Upload form state.
//!
//! The form keeps its own field values and selected file; what gets sent is
//! always derived from that state, never read back from anywhere else.
//!
//! Upload progress is simulated. The server gives no byte-level feedback, so
//! the bar starts at 10%, creeps up by 10 on every tick while the request is
//! outstanding, stops at 90% and only jumps to 100% once the server answers.

use std::time::Duration;

use bytes::Bytes;
use core_library::Song;
use tokio::sync::watch;
use tokio::time::{interval_at, Instant};
use tracing::{info, warn};

use crate::api::SongsApiClient;

/// Client-side cap on the audio file size.
pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
pub const FILE_TOO_LARGE: &str = "File size exceeds 10MB limit";
pub const MISSING_FIELDS: &str = "Missing required fields";

const DEFAULT_PROGRESS_INTERVAL: Duration = Duration::from_millis(500);
const MIN_PROGRESS_INTERVAL: Duration = Duration::from_millis(1);
const PROGRESS_START: u8 = 10;
const PROGRESS_STEP: u8 = 10;
const PROGRESS_CAP: u8 = 90;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadField {
    Title,
    Artist,
    Album,
    Genre,
}

/// Text inputs of the form. Only `title` is required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadFields {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
}

/// File picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, content_type: Option<String>, data: Bytes) -> Self {
        Self {
            name: name.into(),
            content_type,
            data,
        }
    }

    pub fn size(&self) -> usize {
        self.data.len()
    }
}

/// Everything sent by one upload.
#[derive(Debug, Clone)]
pub struct UploadSubmission {
    pub fields: UploadFields,
    pub file: SelectedFile,
}

/// Simulated upload progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UploadProgress {
    #[default]
    Idle,
    /// Indeterminate estimate while the request is outstanding
    Simulated(u8),
    Complete,
}

impl UploadProgress {
    pub fn percent(self) -> u8 {
        match self {
            UploadProgress::Idle => 0,
            UploadProgress::Simulated(p) => p,
            UploadProgress::Complete => 100,
        }
    }

    /// One ticker step.
    pub fn advanced(self) -> Self {
        match self {
            UploadProgress::Simulated(p) => {
                UploadProgress::Simulated(p.saturating_add(PROGRESS_STEP).min(PROGRESS_CAP))
            }
            other => other,
        }
    }
}

pub struct UploadForm {
    fields: UploadFields,
    file: Option<SelectedFile>,
    error: Option<String>,
    uploading: bool,
    progress: watch::Sender<UploadProgress>,
    progress_interval: Duration,
}

impl Default for UploadForm {
    fn default() -> Self {
        Self::new()
    }
}

impl UploadForm {
    pub fn new() -> Self {
        let (progress, _) = watch::channel(UploadProgress::Idle);
        Self {
            fields: UploadFields::default(),
            file: None,
            error: None,
            uploading: false,
            progress,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }

    /// Change the progress tick period. Periods under 1 ms are raised to 1 ms.
    pub fn with_progress_interval(mut self, interval: Duration) -> Self {
        self.progress_interval = interval.max(MIN_PROGRESS_INTERVAL);
        self
    }

    pub fn fields(&self) -> &UploadFields {
        &self.fields
    }

    pub fn file(&self) -> Option<&SelectedFile> {
        self.file.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_uploading(&self) -> bool {
        self.uploading
    }

    pub fn progress(&self) -> UploadProgress {
        *self.progress.borrow()
    }

    pub fn subscribe_progress(&self) -> watch::Receiver<UploadProgress> {
        self.progress.subscribe()
    }

    pub fn set_field(&mut self, field: UploadField, value: impl Into<String>) {
        let value = value.into();
        match field {
            UploadField::Title => self.fields.title = value,
            UploadField::Artist => self.fields.artist = value,
            UploadField::Album => self.fields.album = value,
            UploadField::Genre => self.fields.genre = value,
        }
        self.error = None;
    }

    pub fn select_file(&mut self, file: Option<SelectedFile>) {
        self.file = file;
        self.error = None;
    }

    /// Check the form and build what would be sent.
    fn submission(&self) -> Result<UploadSubmission, &'static str> {
        if let Some(file) = &self.file {
            if file.size() > MAX_UPLOAD_BYTES {
                return Err(FILE_TOO_LARGE);
            }
        }

        match &self.file {
            Some(file) if !self.fields.title.trim().is_empty() => Ok(UploadSubmission {
                fields: self.fields.clone(),
                file: file.clone(),
            }),
            _ => Err(MISSING_FIELDS),
        }
    }

    /// Submit the form.
    ///
    /// Returns `true` when the song was stored and handed to `on_added`. On
    /// a rejected form nothing is sent and the fields are kept. Once a
    /// request was made the form is reset whatever the outcome; a failure
    /// leaves its message in [`UploadForm::error`].
    pub async fn submit<F>(&mut self, api: &SongsApiClient, on_added: F) -> bool
    where
        F: FnOnce(Song),
    {
        self.error = None;

        let submission = match self.submission() {
            Ok(submission) => submission,
            Err(message) => {
                warn!(reason = message, "Upload form rejected");
                self.error = Some(message.to_string());
                return false;
            }
        };

        self.uploading = true;
        self.progress
            .send_replace(UploadProgress::Simulated(PROGRESS_START));

        let result = {
            let request = api.upload_song(&submission);
            tokio::pin!(request);
            let mut ticker = interval_at(
                Instant::now() + self.progress_interval,
                self.progress_interval,
            );

            loop {
                tokio::select! {
                    result = &mut request => break result,
                    _ = ticker.tick() => {
                        self.progress.send_modify(|p| *p = p.advanced());
                    }
                }
            }
        };

        self.progress.send_replace(UploadProgress::Complete);

        let added = match result {
            Ok(song) => {
                info!(song_id = song.id, title = %song.title, "Song uploaded");
                on_added(song);
                true
            }
            Err(e) => {
                warn!(error = %e, "Upload failed");
                self.error = Some(e.message());
                false
            }
        };

        self.reset();
        added
    }

    fn reset(&mut self) {
        self.fields = UploadFields::default();
        self.file = None;
        self.uploading = false;
        self.progress.send_replace(UploadProgress::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bridge_traits::error::Result as BridgeResult;
    use bridge_traits::http::{HttpClient, HttpRequest, HttpResponse};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const SONG_JSON: &str = r#"{"success":true,"song":{"id":7,"title":"Test Song",
        "artist":null,"album":null,"genre":null,"duration":"180",
        "mediaUrl":"https://media.example/7.mp3","mediaPublicId":"music_app/songs/7",
        "coverArtUrl":null,"createdAt":1,"updatedAt":1}}"#;

    /// Answers every request after `delay`, recording the progress it saw.
    struct SlowServer {
        delay: Duration,
        status: u16,
        body: &'static str,
        calls: AtomicUsize,
        progress: Mutex<Option<watch::Receiver<UploadProgress>>>,
        seen: Mutex<Vec<UploadProgress>>,
    }

    impl SlowServer {
        fn new(delay: Duration, status: u16, body: &'static str) -> Arc<Self> {
            Arc::new(Self {
                delay,
                status,
                body,
                calls: AtomicUsize::new(0),
                progress: Mutex::new(None),
                seen: Mutex::new(Vec::new()),
            })
        }

        fn record(&self) {
            if let Some(rx) = self.progress.lock().unwrap().as_ref() {
                self.seen.lock().unwrap().push(*rx.borrow());
            }
        }
    }

    #[async_trait]
    impl HttpClient for SlowServer {
        async fn execute(&self, _request: HttpRequest) -> BridgeResult<HttpResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.record();
            tokio::time::sleep(self.delay).await;
            self.record();
            Ok(HttpResponse {
                status: self.status,
                headers: HashMap::new(),
                body: Bytes::from_static(self.body.as_bytes()),
            })
        }
    }

    fn filled_form(interval: Duration) -> UploadForm {
        let mut form = UploadForm::new().with_progress_interval(interval);
        form.set_field(UploadField::Title, "Test Song");
        form.set_field(UploadField::Artist, "Band");
        form.select_file(Some(SelectedFile::new(
            "song.mp3",
            Some("audio/mpeg".to_string()),
            Bytes::from_static(b"ID3"),
        )));
        form
    }

    fn api(server: &Arc<SlowServer>) -> SongsApiClient {
        SongsApiClient::new(server.clone(), "http://localhost:3000")
    }

    #[test]
    fn test_progress_steps_cap_at_ninety() {
        let mut p = UploadProgress::Simulated(PROGRESS_START);
        let mut seen = vec![p.percent()];
        for _ in 0..12 {
            p = p.advanced();
            seen.push(p.percent());
        }
        assert_eq!(&seen[..9], &[10, 20, 30, 40, 50, 60, 70, 80, 90]);
        assert!(seen[9..].iter().all(|&v| v == 90));
        assert_eq!(UploadProgress::Complete.advanced(), UploadProgress::Complete);
        assert_eq!(UploadProgress::Idle.percent(), 0);
    }

    #[tokio::test]
    async fn test_oversized_file_makes_no_request() {
        let server = SlowServer::new(Duration::ZERO, 200, SONG_JSON);
        let mut form = filled_form(Duration::from_millis(5));
        form.select_file(Some(SelectedFile::new(
            "huge.mp3",
            None,
            Bytes::from(vec![0u8; MAX_UPLOAD_BYTES + 1]),
        )));

        let added = form.submit(&api(&server), |_| panic!("nothing added")).await;

        assert!(!added);
        assert_eq!(form.error(), Some("File size exceeds 10MB limit"));
        assert_eq!(server.calls.load(Ordering::SeqCst), 0);
        assert_eq!(form.fields().title, "Test Song");
    }

    #[tokio::test]
    async fn test_file_at_limit_is_accepted() {
        let server = SlowServer::new(Duration::ZERO, 200, SONG_JSON);
        let mut form = filled_form(Duration::from_millis(5));
        form.select_file(Some(SelectedFile::new(
            "exact.mp3",
            None,
            Bytes::from(vec![0u8; MAX_UPLOAD_BYTES]),
        )));

        assert!(form.submit(&api(&server), |_| {}).await);
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_make_no_request() {
        let server = SlowServer::new(Duration::ZERO, 200, SONG_JSON);

        let mut form = filled_form(Duration::from_millis(5));
        form.set_field(UploadField::Title, "  ");
        assert!(!form.submit(&api(&server), |_| {}).await);
        assert_eq!(form.error(), Some("Missing required fields"));

        let mut form = filled_form(Duration::from_millis(5));
        form.select_file(None);
        assert!(!form.submit(&api(&server), |_| {}).await);
        assert_eq!(form.error(), Some("Missing required fields"));

        assert_eq!(server.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_editing_clears_error() {
        let server = SlowServer::new(Duration::ZERO, 200, SONG_JSON);
        let mut form = UploadForm::new();
        form.submit(&api(&server), |_| {}).await;
        assert!(form.error().is_some());

        form.set_field(UploadField::Genre, "Jazz");
        assert_eq!(form.error(), None);

        form.submit(&api(&server), |_| {}).await;
        assert!(form.error().is_some());
        form.select_file(None);
        assert_eq!(form.error(), None);
    }

    #[tokio::test]
    async fn test_success_hands_song_over_and_resets() {
        let server = SlowServer::new(Duration::from_millis(60), 200, SONG_JSON);
        let mut form = filled_form(Duration::from_millis(5));
        *server.progress.lock().unwrap() = Some(form.subscribe_progress());

        let mut added = Vec::new();
        let ok = form.submit(&api(&server), |song| added.push(song)).await;

        assert!(ok);
        assert_eq!(added.len(), 1);
        assert_eq!(added[0].title, "Test Song");
        assert_eq!(form.error(), None);
        assert_eq!(form.fields(), &UploadFields::default());
        assert!(form.file().is_none());
        assert!(!form.is_uploading());
        assert_eq!(form.progress(), UploadProgress::Idle);

        let seen = server.seen.lock().unwrap().clone();
        assert_eq!(seen[0], UploadProgress::Simulated(10));
        match seen[1] {
            UploadProgress::Simulated(p) => assert!(p > 10 && p <= 90, "progress {p}"),
            other => panic!("unexpected progress {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_progress_interval_still_submits() {
        let server = SlowServer::new(Duration::from_millis(10), 200, SONG_JSON);
        let mut form = filled_form(Duration::ZERO);

        assert!(form.submit(&api(&server), |_| {}).await);
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.progress(), UploadProgress::Idle);
    }

    #[tokio::test]
    async fn test_failure_keeps_message_and_resets() {
        let server = SlowServer::new(
            Duration::ZERO,
            500,
            r#"{"error":"Failed to upload to media store"}"#,
        );
        let mut form = filled_form(Duration::from_millis(5));

        let ok = form.submit(&api(&server), |_| panic!("nothing added")).await;

        assert!(!ok);
        assert_eq!(server.calls.load(Ordering::SeqCst), 1);
        assert_eq!(form.error(), Some("Failed to upload to media store"));
        assert_eq!(form.fields(), &UploadFields::default());
        assert!(form.file().is_none());
        assert_eq!(form.progress(), UploadProgress::Idle);
    }
}
