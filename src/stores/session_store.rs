// ============================================================================
// SESSION STORE - Login state mirrored to localStorage
// ============================================================================
// Never fails: storage problems are logged and the state degrades to
// logged-out.
// ============================================================================

use crate::models::session::{Session, UserRecord};
use crate::state::reactivity::{ReactiveState, SubscriptionId};
use crate::utils::constants::{TOKEN_STORAGE_KEY, USER_STORAGE_KEY};
use crate::utils::storage::PersistentStorage;

#[derive(Clone)]
pub struct SessionStore {
    state: ReactiveState<Session>,
    storage: PersistentStorage,
}

impl SessionStore {
    /// Starts logged out; call `check_login_status` to restore a saved login
    pub fn new(storage: PersistentStorage) -> Self {
        Self {
            state: ReactiveState::new(Session::logged_out()),
            storage,
        }
    }

    pub fn get(&self) -> Session {
        self.state.get()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.get().is_logged_in()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&Session) + 'static,
    {
        self.state.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    /// Restore the login saved under `user`. A corrupt entry is removed.
    /// Does nothing when storage is unavailable.
    pub fn check_login_status(&self) {
        if !self.storage.is_available() {
            return;
        }

        let Some(raw) = self.storage.get_raw(USER_STORAGE_KEY) else {
            log::info!("🔓 Not logged in");
            self.state.set(Session::logged_out());
            return;
        };

        match serde_json::from_str::<UserRecord>(&raw) {
            Ok(user) => {
                log::info!("🔐 Logged in: {}", user.display_name());
                self.state.set(Session::logged_in(user));
            }
            Err(e) => {
                log::error!("❌ Error parsing stored user: {}", e);
                if let Err(e) = self.storage.remove_from_storage(USER_STORAGE_KEY) {
                    log::error!("❌ {}", e);
                }
                self.state.set(Session::logged_out());
            }
        }
    }

    /// Persist `user` and switch to logged-in. The record is not validated.
    pub fn login(&self, user: UserRecord) {
        if self.storage.is_available() {
            if let Err(e) = self.storage.save_to_storage(USER_STORAGE_KEY, &user) {
                log::error!("❌ Error saving user: {}", e);
            }
        }
        self.state.set(Session::logged_in(user));
    }

    /// Forget the saved user and token, then switch to logged-out
    pub fn logout(&self) {
        if self.storage.is_available() {
            for key in [USER_STORAGE_KEY, TOKEN_STORAGE_KEY] {
                if let Err(e) = self.storage.remove_from_storage(key) {
                    log::error!("❌ {}", e);
                }
            }
        }
        log::info!("👋 Logged out");
        self.state.set(Session::logged_out());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::storage::tests::BrokenStorage;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn user(id: i64, username: &str) -> UserRecord {
        UserRecord {
            id: Some(id),
            username: Some(username.to_string()),
            ..UserRecord::default()
        }
    }

    #[test]
    fn restores_persisted_user() {
        let storage = PersistentStorage::memory();
        storage.set_raw("user", r#"{"id":1,"username":"a"}"#).unwrap();

        let store = SessionStore::new(storage);
        store.check_login_status();

        assert_eq!(store.get(), Session::logged_in(user(1, "a")));
        assert_eq!(
            serde_json::to_value(store.get()).unwrap(),
            json!({ "isLoggedIn": true, "user": { "id": 1, "username": "a" } })
        );
    }

    #[test]
    fn corrupt_user_entry_is_removed() {
        let storage = PersistentStorage::memory();
        let store = SessionStore::new(storage.clone());
        store.login(user(2, "b"));

        storage.set_raw("user", "{not json").unwrap();
        storage.set_raw("token", "t").unwrap();
        store.check_login_status();

        assert_eq!(store.get(), Session::logged_out());
        assert_eq!(storage.get_raw("user"), None);
        // Only the user entry is touched
        assert_eq!(storage.get_raw("token").as_deref(), Some("t"));
    }

    #[test]
    fn non_object_user_entry_counts_as_corrupt() {
        let storage = PersistentStorage::memory();
        storage.set_raw("user", "null").unwrap();

        let store = SessionStore::new(storage.clone());
        store.check_login_status();

        assert!(!store.is_logged_in());
        assert_eq!(storage.get_raw("user"), None);
    }

    #[test]
    fn missing_user_entry_means_logged_out() {
        let store = SessionStore::new(PersistentStorage::memory());
        store.login(user(1, "a"));
        // Entry vanished behind our back
        store.storage.remove_from_storage("user").unwrap();
        store.check_login_status();
        assert_eq!(store.get(), Session::logged_out());
    }

    #[test]
    fn check_without_storage_keeps_state() {
        let store = SessionStore::new(PersistentStorage::unavailable());
        store.login(user(5, "offline"));
        store.check_login_status();
        assert_eq!(store.get(), Session::logged_in(user(5, "offline")));
    }

    #[test]
    fn login_persists_user_unvalidated() {
        let storage = PersistentStorage::memory();
        let store = SessionStore::new(storage.clone());

        let mut record = UserRecord::default();
        record.extra.insert("nickname".to_string(), json!("kk"));
        store.login(record.clone());

        assert_eq!(store.get(), Session::logged_in(record));
        assert_eq!(storage.get_raw("user").as_deref(), Some(r#"{"nickname":"kk"}"#));
    }

    #[test]
    fn logout_clears_user_and_token() {
        let storage = PersistentStorage::memory();
        storage.set_raw("token", "abc").unwrap();
        storage.set_raw("datetime-settings", "{}").unwrap();
        let store = SessionStore::new(storage.clone());
        store.login(user(1, "a"));

        store.logout();

        assert_eq!(store.get(), Session::logged_out());
        assert_eq!(storage.get_raw("user"), None);
        assert_eq!(storage.get_raw("token"), None);
        assert_eq!(storage.get_raw("datetime-settings").as_deref(), Some("{}"));
    }

    #[test]
    fn storage_failures_are_absorbed() {
        let store = SessionStore::new(PersistentStorage::new(Rc::new(BrokenStorage)));
        store.login(user(1, "a"));
        assert!(store.is_logged_in());

        store.check_login_status();
        assert!(!store.is_logged_in());

        store.login(user(1, "a"));
        store.logout();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn subscribers_see_every_transition() {
        let store = SessionStore::new(PersistentStorage::memory());
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |session| sink.borrow_mut().push(session.is_logged_in()));

        store.login(user(1, "a"));
        store.logout();

        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }

    #[test]
    fn unsubscribe_by_raw_id() {
        let store = SessionStore::new(PersistentStorage::memory());
        let seen = Rc::new(RefCell::new(0));
        let counter = seen.clone();
        let id = store.subscribe(move |_| *counter.borrow_mut() += 1);

        assert!(store.unsubscribe(SubscriptionId::from_raw(id.raw())));
        store.login(user(1, "a"));

        assert_eq!(*seen.borrow(), 1);
        assert!(!store.unsubscribe(id));
    }

    #[test]
    fn subscriber_logging_out_leaves_others_consistent() {
        let store = SessionStore::new(PersistentStorage::memory());
        let guard = store.clone();
        // Rejects any user without an id
        store.subscribe(move |session| {
            if session.user().is_some_and(|user| user.id.is_none()) {
                guard.logout();
            }
        });
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        store.subscribe(move |session| sink.borrow_mut().push(session.is_logged_in()));

        store.login(UserRecord::default());

        assert!(!store.is_logged_in());
        assert_eq!(*seen.borrow(), vec![false, true, false]);
    }
}

