//! Space mission schema

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::store::{EntityKind, Record};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct SpaceMission {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewSpaceMission,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewSpaceMission {
    pub name: String,
    /// NASA, ESA, ...
    pub agency: String,
    pub launch_date: DateTime<Utc>,
    /// `None` while the mission is still running
    #[serde(default)]
    pub end_date: Option<DateTime<Utc>>,
    pub description: String,
    pub objectives: Vec<String>,
    /// Names of the bodies the mission targets
    pub target_bodies: Vec<String>,
    #[serde(default)]
    pub achievements: Option<Vec<String>>,
    pub image: String,
    /// "flyby", "orbiter", "lander", "rover", ...
    pub mission_type: String,
    /// "planned", "active", "completed" or "failed"
    pub status: String,
}

impl Record for SpaceMission {
    type New = NewSpaceMission;
    const KIND: EntityKind = EntityKind::SpaceMission;

    fn from_new(id: i64, fields: NewSpaceMission) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
