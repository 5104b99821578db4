//! User schema
//!
//! Stores account credentials and profile fields. The password field holds
//! whatever the configured [`PasswordMode`](crate::auth::PasswordMode)
//! produced at registration and is never serialized into API responses;
//! handlers return [`UserProfile`] instead.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::store::{EntityKind, Record};

/// Stored user record
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    /// Password hash (or plaintext in legacy mode)
    pub password: String,
    pub email: String,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Creation input for a user
#[derive(Deserialize, Clone, Debug)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Partial update; `None` leaves the stored value untouched.
/// The password cannot be changed through a patch.
#[derive(Deserialize, Clone, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub avatar_url: Option<String>,
    pub last_login: Option<DateTime<Utc>>,
}

impl Record for User {
    type New = NewUser;
    const KIND: EntityKind = EntityKind::User;

    fn from_new(id: i64, new: NewUser) -> Self {
        let now = Utc::now();
        Self {
            id,
            username: new.username,
            password: new.password,
            email: new.email,
            display_name: new.display_name,
            avatar_url: None,
            created_at: now,
            last_login: Some(now),
        }
    }

    fn id(&self) -> i64 {
        self.id
    }
}

impl User {
    /// Shallow-merge the provided fields over this record
    pub fn apply(&mut self, patch: UserPatch) {
        if let Some(email) = patch.email {
            self.email = email;
        }
        if let Some(display_name) = patch.display_name {
            self.display_name = Some(display_name);
        }
        if let Some(avatar_url) = patch.avatar_url {
            self.avatar_url = Some(avatar_url);
        }
        if let Some(last_login) = patch.last_login {
            self.last_login = Some(last_login);
        }
    }
}

/// User as returned by the API (no password)
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login: Option<DateTime<Utc>>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            display_name: user.display_name,
            avatar_url: user.avatar_url,
            created_at: user.created_at,
            last_login: user.last_login,
        }
    }
}
