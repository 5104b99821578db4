//! Repository interface over the entity store
//!
//! [`Storage`] is the per-kind query surface the routes talk to.
//! [`MemStorage`] implements it over one [`Collection`] per kind, all behind a
//! single lock: every method takes the lock exactly once, so each repository
//! operation is atomic with respect to concurrent requests.

use std::collections::HashSet;

use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::RwLock;

use crate::db::schemas::{
    Badge, CelestialObject, ExploreContent, FunFact, NewBadge, NewCelestialObject,
    NewExploreContent, NewFunFact, NewPlanet, NewQuizCategory, NewQuizProgress, NewQuizQuestion,
    NewSpaceMission, NewUser, NewUserBadge, NewWorksheet, Planet, QuizCategory, QuizProgress,
    QuizQuestion, SpaceMission, User, UserBadge, UserPatch, Worksheet,
};
use crate::db::store::{eq_ignore_case, Collection};
use crate::types::Result;

/// Record counts per kind, reported by the health endpoint
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StoreCounts {
    pub users: usize,
    pub planets: usize,
    pub quiz_questions: usize,
    pub fun_facts: usize,
    pub explore_contents: usize,
    pub quiz_progress: usize,
    pub quiz_categories: usize,
    pub badges: usize,
    pub user_badges: usize,
    pub celestial_objects: usize,
    pub space_missions: usize,
    pub worksheets: usize,
}

#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn get_user(&self, id: i64) -> Result<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn create_user(&self, user: NewUser) -> Result<User>;
    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>>;

    // Quiz progress
    async fn get_user_quiz_progress(&self, user_id: i64) -> Result<Vec<QuizProgress>>;
    async fn save_user_quiz_progress(&self, progress: NewQuizProgress) -> Result<QuizProgress>;

    // Badges
    async fn get_all_badges(&self) -> Result<Vec<Badge>>;
    async fn get_badge(&self, id: i64) -> Result<Option<Badge>>;
    async fn create_badge(&self, badge: NewBadge) -> Result<Badge>;
    async fn get_user_badges(&self, user_id: i64) -> Result<Vec<Badge>>;
    async fn award_badge_to_user(&self, link: NewUserBadge) -> Result<UserBadge>;

    // Quiz categories
    async fn get_all_quiz_categories(&self) -> Result<Vec<QuizCategory>>;
    async fn get_quiz_category(&self, id: i64) -> Result<Option<QuizCategory>>;
    async fn create_quiz_category(&self, category: NewQuizCategory) -> Result<QuizCategory>;
    async fn get_quiz_questions_by_category(&self, category_id: i64) -> Result<Vec<QuizQuestion>>;

    // Planets
    async fn get_all_planets(&self) -> Result<Vec<Planet>>;
    async fn get_planet(&self, id: i64) -> Result<Option<Planet>>;
    async fn get_planet_by_name(&self, name: &str) -> Result<Option<Planet>>;
    async fn create_planet(&self, planet: NewPlanet) -> Result<Planet>;

    // Quiz questions
    async fn get_all_quiz_questions(&self) -> Result<Vec<QuizQuestion>>;
    async fn get_quiz_question(&self, id: i64) -> Result<Option<QuizQuestion>>;
    async fn create_quiz_question(&self, question: NewQuizQuestion) -> Result<QuizQuestion>;

    // Fun facts
    async fn get_all_fun_facts(&self) -> Result<Vec<FunFact>>;
    async fn get_fun_fact(&self, id: i64) -> Result<Option<FunFact>>;
    async fn create_fun_fact(&self, fact: NewFunFact) -> Result<FunFact>;

    // Explore content
    async fn get_all_explore_contents(&self) -> Result<Vec<ExploreContent>>;
    async fn get_explore_content(&self, id: i64) -> Result<Option<ExploreContent>>;
    async fn create_explore_content(&self, content: NewExploreContent) -> Result<ExploreContent>;

    // Celestial objects
    async fn get_all_celestial_objects(&self) -> Result<Vec<CelestialObject>>;
    async fn get_celestial_objects_by_type(
        &self,
        object_type: &str,
    ) -> Result<Vec<CelestialObject>>;
    async fn get_celestial_objects_by_parent(
        &self,
        parent_id: i64,
    ) -> Result<Vec<CelestialObject>>;
    async fn get_celestial_object(&self, id: i64) -> Result<Option<CelestialObject>>;
    async fn create_celestial_object(&self, object: NewCelestialObject) -> Result<CelestialObject>;

    // Space missions
    async fn get_all_space_missions(&self) -> Result<Vec<SpaceMission>>;
    async fn get_space_mission(&self, id: i64) -> Result<Option<SpaceMission>>;
    async fn get_space_missions_by_status(&self, status: &str) -> Result<Vec<SpaceMission>>;
    async fn get_space_missions_by_target(&self, target: &str) -> Result<Vec<SpaceMission>>;
    async fn create_space_mission(&self, mission: NewSpaceMission) -> Result<SpaceMission>;

    // Worksheets
    async fn get_all_worksheets(&self) -> Result<Vec<Worksheet>>;
    async fn get_worksheets_by_subject(&self, subject: &str) -> Result<Vec<Worksheet>>;
    async fn get_worksheets_by_age_range(&self, age_range: &str) -> Result<Vec<Worksheet>>;
    async fn get_worksheet(&self, id: i64) -> Result<Option<Worksheet>>;
    async fn create_worksheet(&self, worksheet: NewWorksheet) -> Result<Worksheet>;

    async fn counts(&self) -> Result<StoreCounts>;
}

#[derive(Default)]
struct Tables {
    users: Collection<User>,
    planets: Collection<Planet>,
    quiz_questions: Collection<QuizQuestion>,
    fun_facts: Collection<FunFact>,
    explore_contents: Collection<ExploreContent>,
    quiz_progress: Collection<QuizProgress>,
    quiz_categories: Collection<QuizCategory>,
    badges: Collection<Badge>,
    user_badges: Collection<UserBadge>,
    celestial_objects: Collection<CelestialObject>,
    space_missions: Collection<SpaceMission>,
    worksheets: Collection<Worksheet>,
}

/// In-process storage. Constructed once and shared through `AppState`.
#[derive(Default)]
pub struct MemStorage {
    tables: RwLock<Tables>,
}

impl MemStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: i64) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.get(id))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.find(|u| u.username == username))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.tables.read().await.users.find(|u| u.email == email))
    }

    async fn create_user(&self, user: NewUser) -> Result<User> {
        Ok(self.tables.write().await.users.insert(user))
    }

    async fn update_user(&self, id: i64, patch: UserPatch) -> Result<Option<User>> {
        Ok(self.tables.write().await.users.update(id, |u| u.apply(patch)))
    }

    async fn get_user_quiz_progress(&self, user_id: i64) -> Result<Vec<QuizProgress>> {
        Ok(self
            .tables
            .read()
            .await
            .quiz_progress
            .filter(|p| p.user_id == user_id))
    }

    async fn save_user_quiz_progress(&self, progress: NewQuizProgress) -> Result<QuizProgress> {
        Ok(self.tables.write().await.quiz_progress.insert(progress))
    }

    async fn get_all_badges(&self) -> Result<Vec<Badge>> {
        Ok(self.tables.read().await.badges.list())
    }

    async fn get_badge(&self, id: i64) -> Result<Option<Badge>> {
        Ok(self.tables.read().await.badges.get(id))
    }

    async fn create_badge(&self, badge: NewBadge) -> Result<Badge> {
        Ok(self.tables.write().await.badges.insert(badge))
    }

    async fn get_user_badges(&self, user_id: i64) -> Result<Vec<Badge>> {
        let tables = self.tables.read().await;
        let earned: HashSet<i64> = tables
            .user_badges
            .filter(|link| link.user_id == user_id)
            .into_iter()
            .map(|link| link.badge_id)
            .collect();

        Ok(tables.badges.filter(|badge| earned.contains(&badge.id)))
    }

    async fn award_badge_to_user(&self, link: NewUserBadge) -> Result<UserBadge> {
        Ok(self.tables.write().await.user_badges.insert(link))
    }

    async fn get_all_quiz_categories(&self) -> Result<Vec<QuizCategory>> {
        Ok(self.tables.read().await.quiz_categories.list())
    }

    async fn get_quiz_category(&self, id: i64) -> Result<Option<QuizCategory>> {
        Ok(self.tables.read().await.quiz_categories.get(id))
    }

    async fn create_quiz_category(&self, category: NewQuizCategory) -> Result<QuizCategory> {
        Ok(self.tables.write().await.quiz_categories.insert(category))
    }

    async fn get_quiz_questions_by_category(&self, category_id: i64) -> Result<Vec<QuizQuestion>> {
        Ok(self
            .tables
            .read()
            .await
            .quiz_questions
            .filter(|q| q.fields.category_id == Some(category_id)))
    }

    async fn get_all_planets(&self) -> Result<Vec<Planet>> {
        let mut planets = self.tables.read().await.planets.list();
        planets.sort_by_key(|p| p.fields.order_from_sun);
        Ok(planets)
    }

    async fn get_planet(&self, id: i64) -> Result<Option<Planet>> {
        Ok(self.tables.read().await.planets.get(id))
    }

    async fn get_planet_by_name(&self, name: &str) -> Result<Option<Planet>> {
        Ok(self
            .tables
            .read()
            .await
            .planets
            .find(|p| eq_ignore_case(&p.fields.name, name)))
    }

    async fn create_planet(&self, planet: NewPlanet) -> Result<Planet> {
        Ok(self.tables.write().await.planets.insert(planet))
    }

    async fn get_all_quiz_questions(&self) -> Result<Vec<QuizQuestion>> {
        Ok(self.tables.read().await.quiz_questions.list())
    }

    async fn get_quiz_question(&self, id: i64) -> Result<Option<QuizQuestion>> {
        Ok(self.tables.read().await.quiz_questions.get(id))
    }

    async fn create_quiz_question(&self, question: NewQuizQuestion) -> Result<QuizQuestion> {
        Ok(self.tables.write().await.quiz_questions.insert(question))
    }

    async fn get_all_fun_facts(&self) -> Result<Vec<FunFact>> {
        Ok(self.tables.read().await.fun_facts.list())
    }

    async fn get_fun_fact(&self, id: i64) -> Result<Option<FunFact>> {
        Ok(self.tables.read().await.fun_facts.get(id))
    }

    async fn create_fun_fact(&self, fact: NewFunFact) -> Result<FunFact> {
        Ok(self.tables.write().await.fun_facts.insert(fact))
    }

    async fn get_all_explore_contents(&self) -> Result<Vec<ExploreContent>> {
        Ok(self.tables.read().await.explore_contents.list())
    }

    async fn get_explore_content(&self, id: i64) -> Result<Option<ExploreContent>> {
        Ok(self.tables.read().await.explore_contents.get(id))
    }

    async fn create_explore_content(&self, content: NewExploreContent) -> Result<ExploreContent> {
        Ok(self.tables.write().await.explore_contents.insert(content))
    }

    async fn get_all_celestial_objects(&self) -> Result<Vec<CelestialObject>> {
        Ok(self.tables.read().await.celestial_objects.list())
    }

    async fn get_celestial_objects_by_type(
        &self,
        object_type: &str,
    ) -> Result<Vec<CelestialObject>> {
        Ok(self
            .tables
            .read()
            .await
            .celestial_objects
            .filter(|o| eq_ignore_case(&o.fields.object_type, object_type)))
    }

    async fn get_celestial_objects_by_parent(
        &self,
        parent_id: i64,
    ) -> Result<Vec<CelestialObject>> {
        Ok(self
            .tables
            .read()
            .await
            .celestial_objects
            .filter(|o| o.fields.parent_body_id == Some(parent_id)))
    }

    async fn get_celestial_object(&self, id: i64) -> Result<Option<CelestialObject>> {
        Ok(self.tables.read().await.celestial_objects.get(id))
    }

    async fn create_celestial_object(&self, object: NewCelestialObject) -> Result<CelestialObject> {
        Ok(self.tables.write().await.celestial_objects.insert(object))
    }

    async fn get_all_space_missions(&self) -> Result<Vec<SpaceMission>> {
        Ok(self.tables.read().await.space_missions.list())
    }

    async fn get_space_mission(&self, id: i64) -> Result<Option<SpaceMission>> {
        Ok(self.tables.read().await.space_missions.get(id))
    }

    async fn get_space_missions_by_status(&self, status: &str) -> Result<Vec<SpaceMission>> {
        Ok(self
            .tables
            .read()
            .await
            .space_missions
            .filter(|m| eq_ignore_case(&m.fields.status, status)))
    }

    async fn get_space_missions_by_target(&self, target: &str) -> Result<Vec<SpaceMission>> {
        Ok(self.tables.read().await.space_missions.filter(|m| {
            m.fields
                .target_bodies
                .iter()
                .any(|body| eq_ignore_case(body, target))
        }))
    }

    async fn create_space_mission(&self, mission: NewSpaceMission) -> Result<SpaceMission> {
        Ok(self.tables.write().await.space_missions.insert(mission))
    }

    async fn get_all_worksheets(&self) -> Result<Vec<Worksheet>> {
        Ok(self.tables.read().await.worksheets.list())
    }

    async fn get_worksheets_by_subject(&self, subject: &str) -> Result<Vec<Worksheet>> {
        Ok(self
            .tables
            .read()
            .await
            .worksheets
            .filter(|w| eq_ignore_case(&w.subject, subject)))
    }

    async fn get_worksheets_by_age_range(&self, age_range: &str) -> Result<Vec<Worksheet>> {
        Ok(self
            .tables
            .read()
            .await
            .worksheets
            .filter(|w| w.age_range == age_range))
    }

    async fn get_worksheet(&self, id: i64) -> Result<Option<Worksheet>> {
        Ok(self.tables.read().await.worksheets.get(id))
    }

    async fn create_worksheet(&self, worksheet: NewWorksheet) -> Result<Worksheet> {
        Ok(self.tables.write().await.worksheets.insert(worksheet))
    }

    async fn counts(&self) -> Result<StoreCounts> {
        let t = self.tables.read().await;
        Ok(StoreCounts {
            users: t.users.len(),
            planets: t.planets.len(),
            quiz_questions: t.quiz_questions.len(),
            fun_facts: t.fun_facts.len(),
            explore_contents: t.explore_contents.len(),
            quiz_progress: t.quiz_progress.len(),
            quiz_categories: t.quiz_categories.len(),
            badges: t.badges.len(),
            user_badges: t.user_badges.len(),
            celestial_objects: t.celestial_objects.len(),
            space_missions: t.space_missions.len(),
            worksheets: t.worksheets.len(),
        })
    }
}
