/// Base URL of the remote API when `API_BASE_URL` is not set at build time
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

// localStorage keys
pub const TOKEN_STORAGE_KEY: &str = "token";
pub const USER_STORAGE_KEY: &str = "user";
pub const DISPLAY_SETTINGS_STORAGE_KEY: &str = "datetime-settings";

/// Replacement for `password` values in logged request bodies
pub const PASSWORD_MASK: &str = "***";

/// Logged instead of a request body that is not valid JSON
pub const BODY_PARSE_ERROR: &str = "[body parse error]";

pub const DEFAULT_CLOCK_FORMAT: &str = "YYYY/MM/DD HH:mm";
