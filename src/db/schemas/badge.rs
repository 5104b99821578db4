//! Badge and user-badge link schemas

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::store::{EntityKind, Record};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Badge {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewBadge,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewBadge {
    pub name: String,
    pub description: String,
    pub image_url: String,
    /// How the badge is earned, in prose
    pub criteria: String,
}

impl Record for Badge {
    type New = NewBadge;
    const KIND: EntityKind = EntityKind::Badge;

    fn from_new(id: i64, fields: NewBadge) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// Link row recording that a user earned a badge
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserBadge {
    pub id: i64,
    pub user_id: i64,
    pub badge_id: i64,
    pub earned_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewUserBadge {
    pub user_id: i64,
    pub badge_id: i64,
}

impl Record for UserBadge {
    type New = NewUserBadge;
    const KIND: EntityKind = EntityKind::UserBadge;

    fn from_new(id: i64, new: NewUserBadge) -> Self {
        Self {
            id,
            user_id: new.user_id,
            badge_id: new.badge_id,
            earned_at: Utc::now(),
        }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
