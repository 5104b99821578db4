//! Home-page content: fun facts and explore cards

use serde::{Deserialize, Serialize};

use crate::db::store::{EntityKind, Record};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FunFact {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewFunFact,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewFunFact {
    pub title: String,
    pub description: String,
    pub icon: String,
    pub icon_bg_color: String,
}

impl Record for FunFact {
    type New = NewFunFact;
    const KIND: EntityKind = EntityKind::FunFact;

    fn from_new(id: i64, fields: NewFunFact) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ExploreContent {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewExploreContent,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct NewExploreContent {
    pub title: String,
    pub description: String,
    pub image: String,
    /// Client-side route the card links to
    pub link: String,
}

impl Record for ExploreContent {
    type New = NewExploreContent;
    const KIND: EntityKind = EntityKind::ExploreContent;

    fn from_new(id: i64, fields: NewExploreContent) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
