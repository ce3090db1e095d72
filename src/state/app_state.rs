// ============================================================================
// APP STATE - Composition root
// ============================================================================
// Owns every client-side component. Built once at start-up and dropped at
// shutdown; nothing below keeps module-level state.
// ============================================================================

use std::rc::Rc;

use chrono::{Datelike, Timelike};

use crate::services::api_client::ApiClient;
use crate::services::auth_service::AuthService;
use crate::services::http::HttpTransport;
use crate::stores::display_settings_store::DisplaySettingsStore;
use crate::stores::session_store::SessionStore;
use crate::utils::storage::PersistentStorage;

pub struct AppContext<T> {
    pub storage: PersistentStorage,
    pub api: Rc<ApiClient<T>>,
    pub session: SessionStore,
    pub display_settings: DisplaySettingsStore,
    pub auth: AuthService<T>,
}

impl<T: HttpTransport> AppContext<T> {
    /// Wire everything against the configured backend
    pub fn new(storage: PersistentStorage, transport: T) -> Self {
        let api = ApiClient::new(transport, storage.clone());
        Self::with_api(api, storage)
    }

    pub fn with_api(api: ApiClient<T>, storage: PersistentStorage) -> Self {
        let api = Rc::new(api);
        let session = SessionStore::new(storage.clone());
        let display_settings = DisplaySettingsStore::new(storage.clone());
        let auth = AuthService::new(api.clone(), session.clone(), storage.clone());

        session.check_login_status();
        log::info!(
            "🚀 Client ready (storage available: {}, logged in: {})",
            storage.is_available(),
            session.is_logged_in()
        );

        Self {
            storage,
            api,
            session,
            display_settings,
            auth,
        }
    }

    /// Clock text for `now` under the current settings
    pub fn clock_text<D>(&self, now: &D) -> Option<String>
    where
        D: Datelike + Timelike,
    {
        self.display_settings.get().render_clock(now)
    }
}

#[cfg(target_arch = "wasm32")]
impl AppContext<crate::services::http::FetchTransport> {
    /// localStorage + fetch
    pub fn browser() -> Self {
        Self::new(PersistentStorage::browser(), crate::services::http::FetchTransport::new())
    }
}
