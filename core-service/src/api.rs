//! HTTP API for the song library.
//!
//! | Method | Path         | Body                                   | Success                      |
//! |--------|--------------|----------------------------------------|------------------------------|
//! | POST   | `/api/songs` | multipart: `audioFile`, `title`, `artist`, `album`, `genre` | `{"success":true,"song":…}` |
//! | GET    | `/api/songs` |                                        | `[Song, …]`                  |
//!
//! Every failure is answered with `{"error": "<message>"}`.

use axum::{
    body::Body,
    extract::{multipart::MultipartRejection, DefaultBodyLimit, Multipart, State},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use bytes::Bytes;
use core_library::Song;
use serde::Serialize;
use tower_http::trace::TraceLayer;
use tracing::{info, warn, Span};

use crate::error::{ServiceError, FETCH_FAILED};
use crate::{AudioPayload, LibraryService, UploadSongRequest};

/// Successful upload response.
#[derive(Debug, Serialize)]
pub struct UploadSongResponse {
    pub success: bool,
    pub song: Song,
}

/// Error body returned by every endpoint.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// An error ready to be sent to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// Map a failed listing; every cause reads the same to the client.
    fn listing(_err: ServiceError) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, FETCH_FAILED)
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::new(err.status_code(), err.public_message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(ErrorBody {
                error: self.message,
            }),
        )
            .into_response()
    }
}

/// Build the API router.
///
/// `max_request_bytes` caps the request body at the transport; it is not an
/// audio size policy.
pub fn router(service: LibraryService, max_request_bytes: usize) -> Router {
    Router::new()
        .route("/api/songs", get(list_songs).post(upload_song))
        .layer(DefaultBodyLimit::max(max_request_bytes))
        .layer(
            TraceLayer::new_for_http().on_request(|request: &Request<Body>, _span: &Span| {
                info!(
                    method = %request.method(),
                    path = %request.uri().path(),
                    "API request"
                );
            }),
        )
        .with_state(service)
}

async fn list_songs(State(service): State<LibraryService>) -> Result<Json<Vec<Song>>, ApiError> {
    let songs = service.list_songs().await.map_err(ApiError::listing)?;
    Ok(Json(songs))
}

async fn upload_song(
    State(service): State<LibraryService>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadSongResponse>, ApiError> {
    let multipart = multipart.map_err(|e| {
        warn!(error = %e, "Upload is not a multipart form");
        ServiceError::Multipart(e.body_text())
    })?;

    let request = read_upload_form(multipart).await?;
    let song = service.upload_song(request).await?;

    Ok(Json(UploadSongResponse {
        success: true,
        song,
    }))
}

/// Collect the known fields of an upload form. Unknown fields are skipped.
async fn read_upload_form(mut multipart: Multipart) -> Result<UploadSongRequest, ServiceError> {
    let mut request = UploadSongRequest::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                warn!(error = %e, "Failed to read multipart field");
                return Err(ServiceError::Multipart(e.body_text()));
            }
        };

        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "audioFile" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServiceError::Multipart(e.body_text()))?;

                request.audio_file = Some(AudioPayload {
                    file_name,
                    content_type,
                    data,
                });
            }
            "title" | "artist" | "album" | "genre" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| ServiceError::Multipart(e.body_text()))?;

                match name.as_str() {
                    "title" => request.title = Some(value),
                    "artist" => request.artist = Some(value),
                    "album" => request.album = Some(value),
                    _ => request.genre = Some(value),
                }
            }
            _ => {}
        }
    }

    Ok(request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{stored, MockSongs, MockStore};
    use axum::body::to_bytes;
    use core_library::db::create_test_pool;
    use core_library::{LibraryError, SqliteSongRepository};
    use std::sync::Arc;
    use tower::ServiceExt;

    const BOUNDARY: &str = "playo-test-boundary";

    enum Part<'a> {
        Text(&'a str, &'a str),
        File(&'a str, &'a str, &'a [u8]),
    }

    fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
        let mut body = Vec::new();
        for part in parts {
            body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
            match part {
                Part::Text(name, value) => {
                    body.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name)
                            .as_bytes(),
                    );
                    body.extend_from_slice(value.as_bytes());
                }
                Part::File(name, file_name, data) => {
                    body.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                             Content-Type: audio/mpeg\r\n\r\n",
                            name, file_name
                        )
                        .as_bytes(),
                    );
                    body.extend_from_slice(data);
                }
            }
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        body
    }

    fn upload_request(parts: &[Part<'_>]) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/songs")
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(multipart_body(parts)))
            .unwrap()
    }

    fn list_request() -> Request<Body> {
        Request::builder()
            .uri("/api/songs")
            .body(Body::empty())
            .unwrap()
    }

    async fn json_body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn app_with_store(store: MockStore) -> Router {
        let songs = Arc::new(SqliteSongRepository::new(create_test_pool().await.unwrap()));
        router(LibraryService::new(Arc::new(store), songs), 1024 * 1024)
    }

    #[tokio::test]
    async fn test_upload_then_list() {
        let mut store = MockStore::new();
        store
            .expect_upload()
            .times(1)
            .withf(|upload| upload.file_name == "song.mp3" && upload.data.as_ref() == b"ID3data")
            .returning(|_| Ok(stored(Some(180.0))));
        let app = app_with_store(store).await;

        let response = app
            .clone()
            .oneshot(upload_request(&[
                Part::Text("title", "Test Song"),
                Part::Text("artist", ""),
                Part::Text("unexpected", "ignored"),
                Part::File("audioFile", "song.mp3", b"ID3data"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);
        assert_eq!(body["song"]["title"], "Test Song");
        assert_eq!(body["song"]["mediaUrl"], stored(None).url);
        assert_eq!(body["song"]["duration"], "180");
        assert!(body["song"]["artist"].is_null());

        let response = app.oneshot(list_request()).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let songs = body.as_array().unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0]["title"], "Test Song");
    }

    #[tokio::test]
    async fn test_missing_file_is_bad_request() {
        let mut store = MockStore::new();
        store.expect_upload().never();
        let app = app_with_store(store).await;

        let response = app
            .oneshot(upload_request(&[Part::Text("title", "Test Song")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Missing required fields" })
        );
    }

    #[tokio::test]
    async fn test_missing_title_is_bad_request() {
        let mut store = MockStore::new();
        store.expect_upload().never();
        let app = app_with_store(store).await;

        let response = app
            .oneshot(upload_request(&[Part::File("audioFile", "song.mp3", b"ID3")]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_store_failure_is_server_error() {
        let mut store = MockStore::new();
        store.expect_upload().times(1).returning(|_| {
            Err(bridge_traits::error::BridgeError::OperationFailed(
                "Invalid Signature".to_string(),
            ))
        });
        let app = app_with_store(store).await;

        let response = app
            .clone()
            .oneshot(upload_request(&[
                Part::Text("title", "Test Song"),
                Part::File("audioFile", "song.mp3", b"ID3"),
            ]))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await["error"],
            "Failed to upload to media store"
        );

        let body = json_body(app.oneshot(list_request()).await.unwrap()).await;
        assert_eq!(body, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_non_multipart_body_is_server_error() {
        let mut store = MockStore::new();
        store.expect_upload().never();
        let app = app_with_store(store).await;

        let request = Request::builder()
            .method("POST")
            .uri("/api/songs")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"title":"x"}"#))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json_body(response).await["error"], "Failed to upload song");
    }

    #[tokio::test]
    async fn test_list_failure() {
        let mut songs = MockSongs::new();
        songs
            .expect_list_by_creation()
            .times(1)
            .returning(|| Err(LibraryError::Migration("locked".to_string())));

        let app = router(
            LibraryService::new(Arc::new(MockStore::new()), Arc::new(songs)),
            1024,
        );
        let response = app.oneshot(list_request()).await.unwrap();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Failed to fetch songs" })
        );
    }
}
