//! Entity schemas
//!
//! Every kind has a stored type (with `id`) and a creation-input type
//! (`New*`, without `id`). Kinds whose stored form adds nothing but the id
//! flatten the input type into the stored one.

mod badge;
mod celestial;
mod content;
mod mission;
mod planet;
mod quiz;
mod user;
mod worksheet;

pub use badge::{Badge, NewBadge, NewUserBadge, UserBadge};
pub use celestial::{CelestialObject, NewCelestialObject};
pub use content::{ExploreContent, FunFact, NewExploreContent, NewFunFact};
pub use mission::{NewSpaceMission, SpaceMission};
pub use planet::{Feature, NewPlanet, Planet};
pub use quiz::{
    AnswerRecord, NewQuizCategory, NewQuizProgress, NewQuizQuestion, QuizCategory, QuizOption,
    QuizProgress, QuizQuestion,
};
pub use user::{NewUser, User, UserPatch, UserProfile};
pub use worksheet::{NewWorksheet, Worksheet};
