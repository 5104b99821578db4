//! Sample catalogue loaded at startup
//!
//! The bundled `data/seed.json` is inserted through the repository `create_*`
//! operations, so seeded records get ids exactly as if they had been created
//! by a caller in file order (Earth = planet 3, Jupiter = planet 5).

use serde::Deserialize;
use tracing::info;

use crate::db::schemas::{
    NewBadge, NewCelestialObject, NewExploreContent, NewFunFact, NewPlanet, NewQuizCategory,
    NewQuizQuestion, NewSpaceMission, NewWorksheet,
};
use crate::db::storage::Storage;
use crate::types::{ExplorerError, Result};

const SEED_JSON: &str = include_str!("../../data/seed.json");

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedData {
    pub planets: Vec<NewPlanet>,
    pub quiz_questions: Vec<NewQuizQuestion>,
    pub fun_facts: Vec<NewFunFact>,
    pub explore_contents: Vec<NewExploreContent>,
    pub celestial_objects: Vec<NewCelestialObject>,
    pub space_missions: Vec<NewSpaceMission>,
    pub worksheets: Vec<NewWorksheet>,
    pub badges: Vec<NewBadge>,
    pub quiz_categories: Vec<NewQuizCategory>,
}

impl SeedData {
    /// Parse the bundled catalogue
    pub fn bundled() -> Result<Self> {
        serde_json::from_str(SEED_JSON)
            .map_err(|e| ExplorerError::Config(format!("Invalid seed data: {}", e)))
    }
}

/// Insert the bundled catalogue into `storage`
pub async fn seed(storage: &dyn Storage) -> Result<()> {
    let data = SeedData::bundled()?;

    for planet in data.planets {
        storage.create_planet(planet).await?;
    }
    for question in data.quiz_questions {
        storage.create_quiz_question(question).await?;
    }
    for fact in data.fun_facts {
        storage.create_fun_fact(fact).await?;
    }
    for content in data.explore_contents {
        storage.create_explore_content(content).await?;
    }
    for object in data.celestial_objects {
        storage.create_celestial_object(object).await?;
    }
    for mission in data.space_missions {
        storage.create_space_mission(mission).await?;
    }
    for worksheet in data.worksheets {
        storage.create_worksheet(worksheet).await?;
    }
    for badge in data.badges {
        storage.create_badge(badge).await?;
    }
    for category in data.quiz_categories {
        storage.create_quiz_category(category).await?;
    }

    let counts = storage.counts().await?;
    info!(
        planets = counts.planets,
        missions = counts.space_missions,
        worksheets = counts.worksheets,
        badges = counts.badges,
        "Sample catalogue loaded"
    );
    Ok(())
}
