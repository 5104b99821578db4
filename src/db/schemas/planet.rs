//! Planet schema

use serde::{Deserialize, Serialize};

use crate::db::store::{EntityKind, Record};

/// Highlighted feature shown on planet and celestial-object detail pages
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Feature {
    pub icon: String,
    pub title: String,
    pub description: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Planet {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewPlanet,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewPlanet {
    pub name: String,
    pub overview: String,
    pub composition: String,
    pub exploration: String,
    /// Kilometres
    pub diameter: i64,
    pub day_length: String,
    pub year_length: String,
    pub moons: i64,
    /// Kilometres
    pub distance_from_sun: i64,
    /// Mean surface temperature, °C
    pub temperature: i64,
    pub color: String,
    #[serde(default)]
    pub ring_color: Option<String>,
    pub has_rings: bool,
    pub order_from_sun: i64,
    pub features: Vec<Feature>,
    pub image: String,
}

impl Record for Planet {
    type New = NewPlanet;
    const KIND: EntityKind = EntityKind::Planet;

    fn from_new(id: i64, fields: NewPlanet) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
