//! User models

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A user record as served by the user backend.
///
/// Only the fields the gateway relies on are typed; anything else the
/// backend returns is kept in `extra` and passed through unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: u64,
    /// Display name
    pub name: String,
    /// Contact email
    pub email: String,
    /// Additional backend-defined fields, passed through as-is
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

impl User {
    pub fn new(id: u64, name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            email: email.into(),
            extra: HashMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_fields_survive_round_trip() {
        let json = r#"{"id":1,"name":"John Doe","email":"john@example.com","tier":"gold"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.id, 1);
        assert_eq!(user.extra["tier"], serde_json::json!("gold"));

        let back = serde_json::to_value(&user).unwrap();
        assert_eq!(back["tier"], serde_json::json!("gold"));
    }
}
