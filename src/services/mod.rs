pub mod api_client;
pub mod auth_service;
pub mod http;

#[cfg(test)]
pub(crate) mod mock_transport;

pub use api_client::{loggable_body, redact_password, ApiClient, ApiError, RequestOptions};
pub use auth_service::AuthService;
pub use http::{Headers, HttpMethod, HttpRequest, HttpResponse, HttpTransport};

#[cfg(target_arch = "wasm32")]
pub use http::FetchTransport;
