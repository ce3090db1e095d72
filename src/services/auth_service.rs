// ============================================================================
// AUTH SERVICE - Login / register against `/auth`
// ============================================================================
// On success the token goes to storage for the API client and the user goes
// to the session store. API errors are returned as is.
// ============================================================================

use std::rc::Rc;

use crate::models::auth::{LoginRequest, RegisterRequest, TokenResponse};
use crate::models::session::UserRecord;
use crate::services::api_client::{ApiClient, ApiError, RequestOptions};
use crate::services::http::{HttpMethod, HttpTransport};
use crate::stores::session_store::SessionStore;
use crate::utils::constants::TOKEN_STORAGE_KEY;
use crate::utils::storage::PersistentStorage;

const LOGIN_PATH: &str = "/auth/login";
const REGISTER_PATH: &str = "/auth/register";

pub struct AuthService<T> {
    api: Rc<ApiClient<T>>,
    session: SessionStore,
    storage: PersistentStorage,
}

impl<T> Clone for AuthService<T> {
    fn clone(&self) -> Self {
        Self {
            api: self.api.clone(),
            session: self.session.clone(),
            storage: self.storage.clone(),
        }
    }
}

impl<T: HttpTransport> AuthService<T> {
    pub fn new(api: Rc<ApiClient<T>>, session: SessionStore, storage: PersistentStorage) -> Self {
        Self { api, session, storage }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<UserRecord, ApiError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        log::info!("🔐 Logging in as {}", email);
        let options = RequestOptions::new(HttpMethod::Post).with_json(&request)?;
        let response: TokenResponse = self.api.request_as(LOGIN_PATH, options).await?;
        Ok(self.accept(response))
    }

    pub async fn register(&self, email: &str, password: &str, username: &str) -> Result<UserRecord, ApiError> {
        let request = RegisterRequest {
            email: email.to_string(),
            password: password.to_string(),
            username: username.to_string(),
        };

        log::info!("📝 Registering {}", email);
        let options = RequestOptions::new(HttpMethod::Post).with_json(&request)?;
        let response: TokenResponse = self.api.request_as(REGISTER_PATH, options).await?;
        Ok(self.accept(response))
    }

    pub fn logout(&self) {
        self.session.logout();
    }

    fn accept(&self, response: TokenResponse) -> UserRecord {
        if !response.token_type.eq_ignore_ascii_case("bearer") {
            log::warn!("⚠️ Unexpected token type `{}`", response.token_type);
        }
        if let Err(e) = self.storage.set_raw(TOKEN_STORAGE_KEY, &response.access_token) {
            log::error!("❌ Error saving token: {}", e);
        }

        let user = response.user;
        log::info!("✅ Logged in: {}", user.display_name());
        self.session.login(user.clone());
        user
    }
}
