pub mod display_settings_store;
pub mod session_store;

pub use display_settings_store::{load_settings, DisplaySettingsStore};
pub use session_store::SessionStore;
