//! Celestial objects: moons, asteroids, comets

use serde::{Deserialize, Serialize};

use crate::db::schemas::Feature;
use crate::db::store::{EntityKind, Record};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CelestialObject {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewCelestialObject,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewCelestialObject {
    pub name: String,
    /// "moon", "asteroid", "comet", ...
    #[serde(rename = "type")]
    pub object_type: String,
    /// Planet this object orbits, if any. Not checked against the planet table.
    #[serde(default)]
    pub parent_body_id: Option<i64>,
    pub overview: String,
    pub composition: String,
    pub discovery: String,
    #[serde(default)]
    pub diameter: Option<i64>,
    #[serde(default)]
    pub orbit_period: Option<String>,
    #[serde(default)]
    pub distance_from_parent: Option<i64>,
    pub image: String,
    #[serde(default)]
    pub features: Option<Vec<Feature>>,
}

impl Record for CelestialObject {
    type New = NewCelestialObject;
    const KIND: EntityKind = EntityKind::CelestialObject;

    fn from_new(id: i64, fields: NewCelestialObject) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
