// ============================================================================
// HTTP - Transport seam for the API client
// ============================================================================
// The browser build sends through `fetch` (gloo-net). Tests plug in a
// scripted transport.
// ============================================================================

use std::fmt;

use async_trait::async_trait;

use crate::services::api_client::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HttpMethod {
    #[default]
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered header list. Names compare case-insensitively; setting an
/// existing name replaces its value in place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn merge(&mut self, other: &Headers) {
        for (name, value) in other.iter() {
            self.set(name, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.set(name, value);
        }
        headers
    }
}

/// Fully built outbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    pub body: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl HttpResponse {
    /// Same rule as `Response.ok` in the browser
    pub fn ok(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Assemble a response once the body read has finished. An unreadable
    /// body is logged and treated as empty so the status is never lost.
    pub fn from_parts<E: fmt::Display>(
        status: u16,
        status_text: String,
        body: Result<String, E>,
    ) -> Self {
        let body = body.unwrap_or_else(|e| {
            log::warn!("⚠️ Could not read response body ({}): {}", status, e);
            String::new()
        });
        Self {
            status,
            status_text,
            body,
        }
    }
}

/// One request, one response. Failures here are transport failures only;
/// HTTP error statuses come back as a normal `HttpResponse`.
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError>;
}

#[cfg(target_arch = "wasm32")]
pub use fetch::FetchTransport;

#[cfg(target_arch = "wasm32")]
mod fetch {
    use super::{HttpMethod, HttpRequest, HttpResponse, HttpTransport};
    use crate::services::api_client::ApiError;
    use async_trait::async_trait;
    use gloo_net::http::{Method, RequestBuilder};

    /// `window.fetch` through gloo-net
    #[derive(Debug, Clone, Copy, Default)]
    pub struct FetchTransport;

    impl FetchTransport {
        pub fn new() -> Self {
            Self
        }
    }

    fn to_gloo_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    #[async_trait(?Send)]
    impl HttpTransport for FetchTransport {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
            let mut builder = RequestBuilder::new(&request.url).method(to_gloo_method(request.method));
            for (name, value) in request.headers.iter() {
                builder = builder.header(name, value);
            }

            let response = match request.body {
                Some(body) => builder
                    .body(body)
                    .map_err(|e| ApiError::Network(e.to_string()))?
                    .send()
                    .await,
                None => builder.send().await,
            }
            .map_err(|e| ApiError::Network(e.to_string()))?;

            let status = response.status();
            let status_text = response.status_text();
            let body = response.text().await;

            Ok(HttpResponse::from_parts(status, status_text, body))
        }
    }
}
