// API types module
// The user row shape and the partial-update model

use serde::Serialize;
use serde_json::Value;

/// User row as stored and as returned by both operations.
///
/// `id` and `username` are never altered through this interface; the four
/// remaining columns are nullable and mutable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub bio: Option<String>,
}

/// Columns a PATCH may assign.
///
/// The whitelist is this enumeration; keys from the request body never
/// reach SQL directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserField {
    DisplayName,
    Email,
    Role,
    Bio,
}

impl UserField {
    pub const ALL: [Self; 4] = [Self::DisplayName, Self::Email, Self::Role, Self::Bio];

    pub const fn column(self) -> &'static str {
        match self {
            Self::DisplayName => "display_name",
            Self::Email => "email",
            Self::Role => "role",
            Self::Bio => "bio",
        }
    }
}

/// Assignments queued by a PATCH body, in whitelist order.
///
/// A field is queued only when its key is present in the body; an
/// explicit `null` is a queued assignment (it clears the column), while
/// an absent key leaves the column untouched. Keys outside the whitelist
/// are ignored.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub assignments: Vec<(UserField, Value)>,
}

impl UserPatch {
    /// Collect whitelisted assignments from a parsed request body.
    ///
    /// A body that is valid JSON but not an object contributes nothing.
    pub fn from_body(body: &Value) -> Self {
        let mut assignments = Vec::new();

        if let Value::Object(map) = body {
            for field in UserField::ALL {
                if let Some(value) = map.get(field.column()) {
                    assignments.push((field, value.clone()));
                }
            }
        }

        Self { assignments }
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn patch_queues_present_fields_only() {
        let body = json!({ "bio": "hello", "email": "a@b.c" });
        let patch = UserPatch::from_body(&body);

        assert_eq!(patch.assignments.len(), 2);
        assert_eq!(patch.assignments[0].0, UserField::Email);
        assert_eq!(patch.assignments[0].1, json!("a@b.c"));
        assert_eq!(patch.assignments[1].0, UserField::Bio);
        assert_eq!(patch.assignments[1].1, json!("hello"));
    }

    #[test]
    fn explicit_null_is_queued() {
        let body = json!({ "email": null });
        let patch = UserPatch::from_body(&body);

        assert_eq!(patch.assignments.len(), 1);
        assert_eq!(patch.assignments[0].0, UserField::Email);
        assert_eq!(patch.assignments[0].1, Value::Null);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let body = json!({ "id": 999, "username": "root", "admin": true });
        let patch = UserPatch::from_body(&body);
        assert!(patch.is_empty());
    }

    #[test]
    fn non_object_body_queues_nothing() {
        assert!(UserPatch::from_body(&json!(5)).is_empty());
        assert!(UserPatch::from_body(&json!("display_name")).is_empty());
        assert!(UserPatch::from_body(&json!(["bio"])).is_empty());
        assert!(UserPatch::from_body(&Value::Null).is_empty());
    }

    #[test]
    fn empty_object_queues_nothing() {
        assert!(UserPatch::from_body(&json!({})).is_empty());
    }
}
