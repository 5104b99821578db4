//! Quiz schemas: categories, questions, and per-user progress

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::db::store::{EntityKind, Record};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuizCategory {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewQuizCategory,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizCategory {
    pub name: String,
    pub description: String,
    /// "beginner", "intermediate" or "advanced"
    pub difficulty: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

impl Record for QuizCategory {
    type New = NewQuizCategory;
    const KIND: EntityKind = EntityKind::QuizCategory;

    fn from_new(id: i64, fields: NewQuizCategory) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuizOption {
    pub id: i64,
    pub text: String,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct QuizQuestion {
    pub id: i64,
    #[serde(flatten)]
    pub fields: NewQuizQuestion,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizQuestion {
    /// Owning category; questions without one only appear in the full list
    #[serde(default)]
    pub category_id: Option<i64>,
    pub question: String,
    pub options: Vec<QuizOption>,
    pub correct_option_id: i64,
    pub explanation: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
}

fn default_difficulty() -> String {
    "beginner".to_string()
}

impl Record for QuizQuestion {
    type New = NewQuizQuestion;
    const KIND: EntityKind = EntityKind::QuizQuestion;

    fn from_new(id: i64, fields: NewQuizQuestion) -> Self {
        Self { id, fields }
    }

    fn id(&self) -> i64 {
        self.id
    }
}

/// One answered question inside a progress record
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    pub question_id: i64,
    pub answer_id: i64,
    pub correct: bool,
}

/// A completed quiz attempt
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizProgress {
    pub id: i64,
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub completed_at: DateTime<Utc>,
    pub answers: Vec<AnswerRecord>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewQuizProgress {
    pub user_id: i64,
    pub quiz_id: i64,
    pub score: i64,
    pub answers: Vec<AnswerRecord>,
}

impl Record for QuizProgress {
    type New = NewQuizProgress;
    const KIND: EntityKind = EntityKind::QuizProgress;

    fn from_new(id: i64, new: NewQuizProgress) -> Self {
        Self {
            id,
            user_id: new.user_id,
            quiz_id: new.quiz_id,
            score: new.score,
            completed_at: Utc::now(),
            answers: new.answers,
        }
    }

    fn id(&self) -> i64 {
        self.id
    }
}
