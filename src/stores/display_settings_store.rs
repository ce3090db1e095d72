// ============================================================================
// DISPLAY SETTINGS STORE - Clock widget settings
// ============================================================================

use serde_json::Value;

use crate::models::display_settings::{DisplayPosition, DisplaySettings, DisplaySettingsPatch, SettingsError};
use crate::state::reactivity::{ReactiveState, SubscriptionId};
use crate::utils::constants::DISPLAY_SETTINGS_STORAGE_KEY;
use crate::utils::storage::PersistentStorage;

/// Settings saved under `datetime-settings`, merged over the defaults.
/// Anything unreadable falls back to the defaults with a warning.
pub fn load_settings(storage: &PersistentStorage) -> DisplaySettings {
    let mut settings = DisplaySettings::default();

    let Some(raw) = storage.get_raw(DISPLAY_SETTINGS_STORAGE_KEY) else {
        return settings;
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(stored)) => {
            let (patch, rejected) = DisplaySettingsPatch::from_stored(&stored);
            for key in rejected {
                log::warn!("⚠️ Ignoring invalid datetime setting `{}`", key);
            }
            patch.apply(&mut settings);
        }
        Ok(other) => {
            log::warn!("⚠️ Failed to load datetime settings: expected an object, got {}", other);
        }
        Err(e) => {
            log::warn!("⚠️ Failed to load datetime settings: {}", e);
        }
    }

    settings
}

#[derive(Clone)]
pub struct DisplaySettingsStore {
    state: ReactiveState<DisplaySettings>,
    storage: PersistentStorage,
}

impl DisplaySettingsStore {
    /// Initial value comes from storage, see `load_settings`
    pub fn new(storage: PersistentStorage) -> Self {
        let settings = load_settings(&storage);
        Self {
            state: ReactiveState::new(settings),
            storage,
        }
    }

    pub fn get(&self) -> DisplaySettings {
        self.state.get()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DisplaySettings) + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Merge `patch` into the current settings, persist, publish
    pub fn save(&self, patch: DisplaySettingsPatch) {
        self.state.update(|current| {
            patch.apply(current);

            if self.storage.is_available() {
                if let Err(e) = self.storage.save_to_storage(DISPLAY_SETTINGS_STORAGE_KEY, &*current) {
                    log::error!("❌ Error saving datetime settings: {}", e);
                }
            }
        });
    }

    /// Show or hide the clock. Not persisted until the next `save`.
    pub fn toggle_visibility(&self) {
        self.state.update(|settings| settings.show = !settings.show);
    }

    /// Move the clock. Not persisted until the next `save`.
    pub fn set_position(&self, position: DisplayPosition) {
        self.state.update(|settings| settings.position = position);
    }

    /// `set_position` for raw UI strings; unknown positions are rejected
    /// and leave the settings untouched.
    pub fn set_position_str(&self, position: &str) -> Result<(), SettingsError> {
        let position = position.parse::<DisplayPosition>()?;
        self.set_position(position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn store_with(raw: Option<&str>) -> (DisplaySettingsStore, PersistentStorage) {
        let storage = PersistentStorage::memory();
        if let Some(raw) = raw {
            storage.set_raw("datetime-settings", raw).unwrap();
        }
        (DisplaySettingsStore::new(storage.clone()), storage)
    }

    #[test]
    fn partial_stored_settings_merge_over_defaults() {
        let (store, _) = store_with(Some(r#"{"show":false}"#));
        assert_eq!(
            store.get(),
            DisplaySettings {
                show: false,
                position: DisplayPosition::TopRight,
                format: "YYYY/MM/DD HH:mm".to_string(),
            }
        );
    }

    #[test]
    fn full_stored_settings_win() {
        let (store, _) = store_with(Some(r#"{"show":false,"position":"bottom-left","format":"HH:mm"}"#));
        let settings = store.get();
        assert!(!settings.show);
        assert_eq!(settings.position, DisplayPosition::BottomLeft);
        assert_eq!(settings.format, "HH:mm");
    }

    #[test]
    fn unreadable_settings_fall_back_to_defaults() {
        for raw in ["{oops", "[1,2,3]", "\"top-left\"", "null"] {
            let (store, _) = store_with(Some(raw));
            assert_eq!(store.get(), DisplaySettings::default(), "input {raw}");
        }
    }

    #[test]
    fn invalid_fields_fall_back_individually() {
        let (store, _) = store_with(Some(r#"{"position":"middle","format":"HH:mm"}"#));
        let settings = store.get();
        assert_eq!(settings.position, DisplayPosition::TopRight);
        assert_eq!(settings.format, "HH:mm");
    }

    #[test]
    fn no_storage_means_defaults() {
        let store = DisplaySettingsStore::new(PersistentStorage::unavailable());
        assert_eq!(store.get(), DisplaySettings::default());

        store.save(DisplaySettingsPatch::default().show(false));
        assert!(!store.get().show);
    }

    #[test]
    fn save_merges_and_persists() {
        let (store, storage) = store_with(None);
        store.save(DisplaySettingsPatch::default().format("HH:mm:ss"));

        let expected = DisplaySettings {
            format: "HH:mm:ss".to_string(),
            ..DisplaySettings::default()
        };
        assert_eq!(store.get(), expected);

        let persisted: DisplaySettings =
            serde_json::from_str(&storage.get_raw("datetime-settings").unwrap()).unwrap();
        assert_eq!(persisted, expected);

        // A fresh store picks the saved settings up
        assert_eq!(DisplaySettingsStore::new(storage).get(), expected);
    }

    #[test]
    fn toggle_twice_restores_show() {
        let (store, storage) = store_with(None);
        let original = store.get();

        store.toggle_visibility();
        assert_eq!(store.get().show, !original.show);
        store.toggle_visibility();
        assert_eq!(store.get(), original);
        assert_eq!(storage.get_raw("datetime-settings"), None);
    }

    #[test]
    fn set_position_changes_only_position() {
        let (store, _) = store_with(Some(r#"{"format":"DD.MM"}"#));
        let before = store.get();

        store.set_position(DisplayPosition::BottomLeft);

        let after = store.get();
        assert_eq!(after.position, DisplayPosition::BottomLeft);
        assert_eq!(after.show, before.show);
        assert_eq!(after.format, before.format);
    }

    #[test]
    fn set_position_str_rejects_unknown_values() {
        let (store, _) = store_with(None);
        let notified = Rc::new(RefCell::new(0));
        let counter = notified.clone();
        store.subscribe(move |_| *counter.borrow_mut() += 1);

        assert_eq!(
            store.set_position_str("center"),
            Err(SettingsError::InvalidPosition("center".to_string()))
        );
        assert_eq!(store.get().position, DisplayPosition::TopRight);
        assert_eq!(*notified.borrow(), 1);

        store.set_position_str("bottom-left").unwrap();
        assert_eq!(store.get().position, DisplayPosition::BottomLeft);
        assert_eq!(*notified.borrow(), 2);
    }

    #[test]
    fn save_persists_earlier_unsaved_changes() {
        let (store, storage) = store_with(None);
        store.toggle_visibility();
        store.save(DisplaySettingsPatch::default().position(DisplayPosition::TopLeft));

        let persisted: DisplaySettings =
            serde_json::from_str(&storage.get_raw("datetime-settings").unwrap()).unwrap();
        assert!(!persisted.show);
        assert_eq!(persisted.position, DisplayPosition::TopLeft);
    }

    #[test]
    fn unsubscribe_by_raw_id() {
        let (store, _) = store_with(None);
        let notified = Rc::new(RefCell::new(0));
        let counter = notified.clone();
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(store.unsubscribe(SubscriptionId::from_raw(id.raw())));
        store.toggle_visibility();
        assert_eq!(*notified.borrow(), 1);
    }
}

