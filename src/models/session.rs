use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// ============================================================================
// SESSION - Logged-in user as seen by the UI
// ============================================================================

/// User record returned by the API and persisted under `user`.
///
/// The API sends an open object. Fields the client relies on are typed;
/// everything else is kept untouched in `extra` and written back flat.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Value of any field, typed or not
    pub fn field(&self, key: &str) -> Option<Value> {
        match key {
            "id" => self.id.map(Value::from),
            "username" => self.username.clone().map(Value::String),
            "email" => self.email.clone().map(Value::String),
            _ => self.extra.get(key).cloned(),
        }
    }

    /// Name to show in the UI: username, then email, then the id
    pub fn display_name(&self) -> String {
        self.username
            .clone()
            .or_else(|| self.email.clone())
            .or_else(|| self.id.map(|id| format!("#{}", id)))
            .unwrap_or_else(|| "anonymous".to_string())
    }
}

/// Login state. `is_logged_in` is true exactly when `user` is present,
/// which the constructors guarantee.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    is_logged_in: bool,
    user: Option<UserRecord>,
}

impl Session {
    pub fn logged_in(user: UserRecord) -> Self {
        Self {
            is_logged_in: true,
            user: Some(user),
        }
    }

    pub fn logged_out() -> Self {
        Self {
            is_logged_in: false,
            user: None,
        }
    }

    pub fn is_logged_in(&self) -> bool {
        self.is_logged_in
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn unknown_fields_land_in_extra_and_round_trip_flat() {
        let raw = json!({ "id": 7, "email": "a@b.c", "name": "Ai", "plan_type": "free" });
        let user: UserRecord = serde_json::from_value(raw.clone()).unwrap();

        assert_eq!(user.id, Some(7));
        assert_eq!(user.username, None);
        assert_eq!(user.extra.get("plan_type"), Some(&json!("free")));
        assert_eq!(user.field("name"), Some(json!("Ai")));
        assert_eq!(user.field("id"), Some(json!(7)));
        assert_eq!(serde_json::to_value(&user).unwrap(), raw);
    }

    #[test]
    fn mistyped_well_known_field_is_rejected() {
        let result = serde_json::from_str::<UserRecord>(r#"{"id":"seven"}"#);
        assert!(result.is_err());
        assert!(serde_json::from_str::<UserRecord>("[1,2]").is_err());
    }

    #[test]
    fn display_name_prefers_username() {
        let mut user = UserRecord {
            id: Some(3),
            email: Some("x@y.z".to_string()),
            ..UserRecord::default()
        };
        assert_eq!(user.display_name(), "x@y.z");
        user.username = Some("kei".to_string());
        assert_eq!(user.display_name(), "kei");
        assert_eq!(UserRecord::default().display_name(), "anonymous");
    }

    #[test]
    fn session_serializes_for_the_ui() {
        let session = Session::logged_out();
        assert_eq!(
            serde_json::to_value(&session).unwrap(),
            json!({ "isLoggedIn": false, "user": null })
        );
        assert!(!session.is_logged_in());
        assert!(session.user().is_none());
    }
}
