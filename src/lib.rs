// ============================================================================
// MINDLOG WEB - Client layer (Rust + WASM)
// ============================================================================
// - Services: HTTP only (authenticated fetch wrapper, auth endpoints)
// - Stores: session + clock settings, mirrored to localStorage
// - State: Rc<RefCell> reactivity and the composition root
// - Models: records shared with the backend and the UI
// ============================================================================

pub mod config;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;
pub mod utils;

#[cfg(target_arch = "wasm32")]
mod app;

pub use config::{AppConfig, CONFIG};
pub use models::{DisplayPosition, DisplaySettings, DisplaySettingsPatch, Session, SettingsError, UserRecord};
pub use services::{ApiClient, ApiError, AuthService, HttpMethod, HttpTransport, RequestOptions};
pub use state::{AppContext, ReactiveState, SubscriptionId};
pub use stores::{DisplaySettingsStore, SessionStore};
pub use utils::storage::{KeyValueStorage, MemoryStorage, PersistentStorage, StorageError};
