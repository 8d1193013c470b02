//! Upload a song through the HTTP API, then play it from the library page.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::Router;
use bridge_traits::error::{BridgeError, Result as BridgeResult};
use bridge_traits::http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm};
use bridge_traits::media::{MediaStore, MediaUpload, StoredMedia};
use bytes::Bytes;
use core_client::{LibraryPage, LibraryRow, LibraryStatus, SelectedFile, SongsApiClient, UploadField};
use core_library::db::create_test_pool;
use core_library::SqliteSongRepository;
use core_playback::{MediaElement, PlaybackState, Result as PlaybackResult};
use core_service::{api, LibraryService};
use tower::ServiceExt;

const BOUNDARY: &str = "playo-flow-boundary";

/// Media store that keeps uploads in memory and reports a fixed duration.
#[derive(Default)]
struct MemoryStore {
    uploads: Mutex<Vec<MediaUpload>>,
}

#[async_trait]
impl MediaStore for MemoryStore {
    async fn upload(&self, upload: MediaUpload) -> BridgeResult<StoredMedia> {
        let mut uploads = self.uploads.lock().unwrap();
        let public_id = format!("music_app/songs/{}", uploads.len() + 1);
        uploads.push(upload);
        Ok(StoredMedia {
            url: format!("https://media.example/{}.mp3", public_id),
            public_id,
            duration_secs: Some(180.0),
        })
    }

    async fn destroy(&self, _public_id: &str) -> BridgeResult<()> {
        Ok(())
    }

    async fn ping(&self) -> BridgeResult<()> {
        Ok(())
    }
}

/// Routes client requests straight into the axum router.
struct InProcessClient {
    router: Router,
}

fn encode_multipart(form: &MultipartForm) -> Vec<u8> {
    let mut body = Vec::new();
    for part in &form.parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        let disposition = match &part.file_name {
            Some(file_name) => format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
                part.name, file_name
            ),
            None => format!("Content-Disposition: form-data; name=\"{}\"\r\n", part.name),
        };
        body.extend_from_slice(disposition.as_bytes());
        if let Some(content_type) = &part.content_type {
            body.extend_from_slice(format!("Content-Type: {}\r\n", content_type).as_bytes());
        }
        body.extend_from_slice(b"\r\n");
        body.extend_from_slice(&part.data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

#[async_trait]
impl HttpClient for InProcessClient {
    async fn execute(&self, request: HttpRequest) -> BridgeResult<HttpResponse> {
        let uri = request
            .url
            .strip_prefix("http://playo.test")
            .unwrap_or(&request.url)
            .to_string();
        let method = match request.method {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            other => {
                return Err(BridgeError::NotAvailable(format!("{:?}", other)));
            }
        };

        let mut builder = Request::builder().method(method).uri(uri);
        let body = match &request.multipart {
            Some(form) => {
                builder = builder.header(
                    "content-type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                );
                Body::from(encode_multipart(form))
            }
            None => Body::empty(),
        };
        let http_request = builder
            .body(body)
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;

        let response = self
            .router
            .clone()
            .oneshot(http_request)
            .await
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;
        let status = response.status().as_u16();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .map_err(|e| BridgeError::OperationFailed(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers: HashMap::new(),
            body,
        })
    }
}

#[derive(Default, Clone)]
struct FakeAudio {
    playing: Arc<Mutex<bool>>,
    source: Arc<Mutex<Option<String>>>,
}

#[async_trait]
impl MediaElement for FakeAudio {
    async fn set_source(&mut self, url: &str) -> PlaybackResult<()> {
        *self.source.lock().unwrap() = Some(url.to_string());
        Ok(())
    }

    async fn play(&mut self) -> PlaybackResult<()> {
        *self.playing.lock().unwrap() = true;
        Ok(())
    }

    async fn pause(&mut self) -> PlaybackResult<()> {
        *self.playing.lock().unwrap() = false;
        Ok(())
    }

    fn current_time(&self) -> f64 {
        0.0
    }

    fn duration(&self) -> f64 {
        180.0
    }

    fn set_current_time(&mut self, _secs: f64) {}
}

#[tokio::test]
async fn test_upload_then_play() {
    let store = Arc::new(MemoryStore::default());
    let songs = Arc::new(SqliteSongRepository::new(create_test_pool().await.unwrap()));
    let router = api::router(LibraryService::new(store.clone(), songs), 1024 * 1024);
    let api = SongsApiClient::new(Arc::new(InProcessClient { router }), "http://playo.test");

    let audio = FakeAudio::default();
    let mut page = LibraryPage::new(audio.clone());

    page.load(&api).await.unwrap();
    assert_eq!(page.view().status(), LibraryStatus::Empty);

    let form = page.upload_form_mut();
    form.set_field(UploadField::Title, "Test Song");
    form.select_file(Some(SelectedFile::new(
        "test.mp3",
        Some("audio/mpeg".to_string()),
        Bytes::from_static(b"ID3\x04\x00\x00\x00\x00\x00\x00"),
    )));
    assert!(page.submit_upload(&api).await.unwrap());
    assert_eq!(page.upload_form().error(), None);

    assert_eq!(store.uploads.lock().unwrap().len(), 1);
    assert_eq!(
        page.view().rows(),
        vec![LibraryRow {
            number: 1,
            title: "Test Song".to_string(),
            artist: "Unknown".to_string(),
            album: "Unknown".to_string(),
            duration: "3:00".to_string(),
        }]
    );

    page.player_mut().toggle_play_pause().await.unwrap();

    let player = page.player();
    assert_eq!(player.state(), PlaybackState::Playing);
    assert_eq!(player.current_time(), 0.0);
    assert_eq!(player.now_playing_title(), "Test Song");
    assert_eq!(player.now_playing_artist(), "Unknown artist");
    assert!(*audio.playing.lock().unwrap());
    assert_eq!(
        audio.source.lock().unwrap().as_deref(),
        Some("https://media.example/music_app/songs/1.mp3")
    );

    // A fresh page sees the stored song on reload.
    let mut reloaded = LibraryPage::new(FakeAudio::default());
    reloaded.load(&api).await.unwrap();
    assert_eq!(reloaded.view().songs().len(), 1);
    assert_eq!(
        reloaded.view().songs()[0].media_url,
        "https://media.example/music_app/songs/1.mp3"
    );
}

#[tokio::test]
async fn test_missing_file_never_reaches_store() {
    let store = Arc::new(MemoryStore::default());
    let songs = Arc::new(SqliteSongRepository::new(create_test_pool().await.unwrap()));
    let router = api::router(LibraryService::new(store.clone(), songs), 1024 * 1024);
    let client = InProcessClient { router };

    let form = MultipartForm::new().text("title", "Test Song");
    let response = client
        .execute(HttpRequest::new(HttpMethod::Post, "http://playo.test/api/songs").multipart(form))
        .await
        .unwrap();

    assert_eq!(response.status, 400);
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["error"], "Missing required fields");
    assert!(store.uploads.lock().unwrap().is_empty());
}
