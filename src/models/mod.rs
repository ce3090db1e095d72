pub mod auth;
pub mod display_settings;
pub mod session;

pub use auth::{LoginRequest, RegisterRequest, TokenResponse};
pub use display_settings::{DisplayPosition, DisplaySettings, DisplaySettingsPatch, SettingsError};
pub use session::{Session, UserRecord};
