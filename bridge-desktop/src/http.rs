//! [`HttpClient`] over reqwest.

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    http::{HttpClient, HttpMethod, HttpRequest, HttpResponse, MultipartForm},
};
use reqwest::{multipart, Client};
use std::time::Duration;
use tracing::{debug, warn};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Pooled reqwest client. One attempt per request.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Client whose requests time out after `timeout` unless the request sets
    /// its own.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .user_agent(concat!("playo/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                BridgeError::OperationFailed(format!("Failed to build HTTP client: {}", e))
            })?;

        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    fn method(method: HttpMethod) -> reqwest::Method {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }

    fn form(form: MultipartForm) -> Result<multipart::Form> {
        form.parts.into_iter().try_fold(multipart::Form::new(), |out, part| {
            let mut body = multipart::Part::stream(part.data);
            if let Some(file_name) = part.file_name {
                body = body.file_name(file_name);
            }
            if let Some(content_type) = part.content_type {
                body = body.mime_str(&content_type).map_err(|e| {
                    BridgeError::OperationFailed(format!(
                        "Invalid content type '{}': {}",
                        content_type, e
                    ))
                })?;
            }
            Ok(out.part(part.name, body))
        })
    }

    fn builder(&self, request: HttpRequest) -> Result<reqwest::RequestBuilder> {
        let mut builder = self
            .client
            .request(Self::method(request.method), &request.url);

        for (key, value) in request.headers {
            builder = builder.header(key, value);
        }
        if let Some(form) = request.multipart {
            builder = builder.multipart(Self::form(form)?);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(builder)
    }
}

fn send_error(e: reqwest::Error) -> BridgeError {
    if e.is_timeout() {
        BridgeError::OperationFailed("Request timed out".to_string())
    } else if e.is_connect() {
        BridgeError::OperationFailed(format!("Connection failed: {}", e))
    } else {
        BridgeError::OperationFailed(e.to_string())
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse> {
        debug!(url = %request.url, method = ?request.method, "HTTP request");

        let response = self.builder(request)?.send().await.map_err(|e| {
            warn!(error = %e, "HTTP request failed");
            send_error(e)
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| Some((k.to_string(), v.to_str().ok()?.to_string())))
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| BridgeError::OperationFailed(format!("Failed to read body: {}", e)))?;

        debug!(status, bytes = body.len(), "HTTP response");
        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}
