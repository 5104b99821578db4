//! Printable worksheet schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::store::{EntityKind, Record};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Worksheet {
    pub id: i64,
    pub title: String,
    pub description: String,
    /// e.g. "6-8", matched exactly
    pub age_range: String,
    pub subject: String,
    pub pdf_url: String,
    pub thumbnail_url: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewWorksheet {
    pub title: String,
    pub description: String,
    pub age_range: String,
    pub subject: String,
    pub pdf_url: String,
    pub thumbnail_url: String,
}

impl Record for Worksheet {
    type New = NewWorksheet;
    const KIND: EntityKind = EntityKind::Worksheet;

    fn from_new(id: i64, new: NewWorksheet) -> Self {
        Self {
            id,
            title: new.title,
            description: new.description,
            age_range: new.age_range,
            subject: new.subject,
            pdf_url: new.pdf_url,
            thumbnail_url: new.thumbnail_url,
            created_at: Utc::now(),
        }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
