// ============================================================================
// API CLIENT - Authenticated JSON requests against the backend
// ============================================================================
// Stateless apart from the storage handle: the bearer token is read again
// on every call so a fresh login is picked up immediately.
// ============================================================================

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::CONFIG;
use crate::services::http::{Headers, HttpMethod, HttpRequest, HttpTransport};
use crate::utils::constants::{BODY_PARSE_ERROR, PASSWORD_MASK, TOKEN_STORAGE_KEY};
use crate::utils::storage::PersistentStorage;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Non-2xx response. The message is the response body verbatim.
    #[error("{body}")]
    Http { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl ApiError {
    /// HTTP status for `Http` errors
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Per-call options. Defaults to a `GET` with no extra headers and no body.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub headers: Headers,
    pub body: Option<String>,
}

impl RequestOptions {
    pub fn new(method: HttpMethod) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, ApiError> {
        let json = serde_json::to_string(body).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.with_body(json))
    }
}

/// Copy of `value` with a top-level `password` replaced by the mask
pub fn redact_password(mut value: Value) -> Value {
    if let Some(password) = value.as_object_mut().and_then(|object| object.get_mut("password")) {
        *password = Value::String(PASSWORD_MASK.to_string());
    }
    value
}

/// What gets logged for a request body: the redacted JSON, or a fixed
/// marker when the body is not JSON.
pub fn loggable_body(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(value) => redact_password(value).to_string(),
        Err(_) => BODY_PARSE_ERROR.to_string(),
    }
}

pub struct ApiClient<T> {
    base_url: String,
    storage: PersistentStorage,
    transport: T,
}

impl<T: HttpTransport> ApiClient<T> {
    /// Client for the configured backend
    pub fn new(transport: T, storage: PersistentStorage) -> Self {
        Self::with_base_url(CONFIG.api_base_url(), transport, storage)
    }

    pub fn with_base_url(base_url: impl Into<String>, transport: T, storage: PersistentStorage) -> Self {
        Self {
            base_url: base_url.into(),
            storage,
            transport,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn current_token(&self) -> Option<String> {
        self.storage
            .get_raw(TOKEN_STORAGE_KEY)
            .filter(|token| !token.is_empty())
    }

    /// Resolve URL and headers for `path`. Caller headers go over the JSON
    /// content type; the bearer token goes over everything.
    pub fn build_request(&self, path: &str, options: RequestOptions) -> HttpRequest {
        let mut headers = Headers::new();
        headers.set("Content-Type", "application/json");
        headers.merge(&options.headers);

        if let Some(token) = self.current_token() {
            headers.set("Authorization", format!("Bearer {}", token));
        }

        HttpRequest {
            method: options.method,
            url: format!("{}{}", self.base_url, path),
            headers,
            body: options.body,
        }
    }

    /// Send a request and return the parsed JSON body.
    ///
    /// Any non-2xx status becomes `ApiError::Http` whose message is exactly
    /// the response text.
    pub async fn request(&self, path: &str, options: RequestOptions) -> Result<Value, ApiError> {
        let request = self.build_request(path, options);

        log::info!("📤 {} {}", request.method, request.url);
        if let Some(body) = &request.body {
            log::info!("📤 Request body: {}", loggable_body(body));
        }

        let response = self.transport.send(request).await.map_err(|e| {
            log::error!("❌ {}", e);
            e
        })?;

        log::info!("📥 {} {}", response.status, response.status_text);

        if !response.ok() {
            log::error!("❌ API error: {}", response.body);
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }

        let data: Value = serde_json::from_str(&response.body).map_err(|e| {
            log::error!("❌ Error parsing response: {}", e);
            ApiError::Parse(e.to_string())
        })?;
        log::info!("✅ Response: {}", data);

        Ok(data)
    }

    /// `request`, decoded into `R`
    pub async fn request_as<R: DeserializeOwned>(&self, path: &str, options: RequestOptions) -> Result<R, ApiError> {
        let data = self.request(path, options).await?;
        serde_json::from_value(data).map_err(|e| ApiError::Parse(e.to_string()))
    }

    pub async fn get(&self, path: &str) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(HttpMethod::Get)).await
    }

    pub async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let options = RequestOptions::new(HttpMethod::Post).with_json(body)?;
        self.request(path, options).await
    }

    pub async fn put<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<Value, ApiError> {
        let options = RequestOptions::new(HttpMethod::Put).with_json(body)?;
        self.request(path, options).await
    }

    pub async fn delete(&self, path: &str) -> Result<Value, ApiError> {
        self.request(path, RequestOptions::new(HttpMethod::Delete)).await
    }
}
