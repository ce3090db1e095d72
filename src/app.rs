// ============================================================================
// APP - wasm-bindgen surface for the JavaScript UI
// ============================================================================

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use crate::config::CONFIG;
use crate::models::display_settings::DisplaySettingsPatch;
use crate::services::http::FetchTransport;
use crate::state::app_state::AppContext;
use crate::state::reactivity::SubscriptionId;

// Filled by `main`, emptied by `shutdown`
thread_local! {
    static APP: RefCell<Option<AppContext<FetchTransport>>> = RefCell::new(None);
}

fn with_app<R>(f: impl FnOnce(&AppContext<FetchTransport>) -> R) -> Result<R, JsValue> {
    APP.with(|app_cell| match app_cell.borrow().as_ref() {
        Some(app) => Ok(f(app)),
        None => Err(JsValue::from_str("App is not initialized")),
    })
}

fn to_js_json<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_json::to_string(value)
        .map(|json| JsValue::from_str(&json))
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    if CONFIG.is_logging_enabled() {
        wasm_logger::init(wasm_logger::Config::new(CONFIG.log_level()));
    }
    log::info!("🚀 mindlog client starting ({})", CONFIG.environment);

    let app = AppContext::browser();
    APP.with(|app_cell| {
        *app_cell.borrow_mut() = Some(app);
    });

    Ok(())
}

/// Drop every store and the client
#[wasm_bindgen]
pub fn shutdown() {
    APP.with(|app_cell| {
        app_cell.borrow_mut().take();
    });
    log::info!("🛑 mindlog client stopped");
}

/// Resolves to the user record as a JSON string; rejects with the API
/// error text.
#[wasm_bindgen]
pub async fn login(email: String, password: String) -> Result<JsValue, JsValue> {
    // Clone the handle out so no borrow is held across the await
    let auth = with_app(|app| app.auth.clone())?;
    let user = auth
        .login(&email, &password)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js_json(&user)
}

#[wasm_bindgen]
pub async fn register(email: String, password: String, username: String) -> Result<JsValue, JsValue> {
    let auth = with_app(|app| app.auth.clone())?;
    let user = auth
        .register(&email, &password, &username)
        .await
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js_json(&user)
}

#[wasm_bindgen]
pub fn logout() -> Result<(), JsValue> {
    with_app(|app| app.auth.logout())
}

/// Session as JSON: `{ "isLoggedIn": bool, "user": object | null }`
#[wasm_bindgen]
pub fn session() -> Result<JsValue, JsValue> {
    with_app(|app| app.session.get()).and_then(|session| to_js_json(&session))
}

fn notify_js<T: serde::Serialize>(callback: &js_sys::Function, value: &T, what: &str) {
    let payload = match serde_json::to_string(value) {
        Ok(payload) => payload,
        Err(e) => {
            log::error!("❌ Error serializing {}: {}", what, e);
            return;
        }
    };
    if let Err(e) = callback.call1(&JsValue::NULL, &JsValue::from_str(&payload)) {
        log::error!("❌ {} subscriber failed: {:?}", what, e);
    }
}

/// `callback(sessionJson)` now and after every login/logout. Returns the id
/// to pass to `off_session_change`.
#[wasm_bindgen]
pub fn on_session_change(callback: js_sys::Function) -> Result<f64, JsValue> {
    with_app(|app| {
        let id = app
            .session
            .subscribe(move |session| notify_js(&callback, session, "session"));
        id.raw() as f64
    })
}

/// `false` if the id was not subscribed
#[wasm_bindgen]
pub fn off_session_change(id: f64) -> Result<bool, JsValue> {
    with_app(|app| app.session.unsubscribe(SubscriptionId::from_raw(id as u64)))
}

/// `callback(settingsJson)` now and after every settings change. Returns the
/// id to pass to `off_clock_settings_change`.
#[wasm_bindgen]
pub fn on_clock_settings_change(callback: js_sys::Function) -> Result<f64, JsValue> {
    with_app(|app| {
        let id = app
            .display_settings
            .subscribe(move |settings| notify_js(&callback, settings, "clock settings"));
        id.raw() as f64
    })
}

#[wasm_bindgen]
pub fn off_clock_settings_change(id: f64) -> Result<bool, JsValue> {
    with_app(|app| {
        app.display_settings
            .unsubscribe(SubscriptionId::from_raw(id as u64))
    })
}

#[wasm_bindgen]
pub fn toggle_clock() -> Result<(), JsValue> {
    with_app(|app| app.display_settings.toggle_visibility())
}

#[wasm_bindgen]
pub fn set_clock_position(position: &str) -> Result<(), JsValue> {
    with_app(|app| app.display_settings.set_position_str(position))?
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Persist a partial settings object given as JSON, e.g. `{"format":"HH:mm"}`
#[wasm_bindgen]
pub fn save_clock_settings(patch_json: &str) -> Result<(), JsValue> {
    let patch: DisplaySettingsPatch =
        serde_json::from_str(patch_json).map_err(|e| JsValue::from_str(&e.to_string()))?;
    with_app(|app| app.display_settings.save(patch))
}

/// Current clock text, or `undefined` while the clock is hidden
#[wasm_bindgen]
pub fn clock_text() -> Result<Option<String>, JsValue> {
    let now = chrono::Local::now();
    with_app(|app| app.clock_text(&now))
}
