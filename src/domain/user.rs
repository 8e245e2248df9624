use serde::{Deserialize, Serialize};

/// A persisted user row. `id` is assigned by the database on insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Body of `POST /api/user`.
///
/// Absent fields default to empty strings. A client-supplied `id` must still be an
/// integer to parse, but it is never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
}

impl CreateUser {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
        }
    }

    pub fn into_user(self, id: i64) -> User {
        User {
            id,
            name: self.name,
            email: self.email,
        }
    }
}
