//! In-memory entity store
//!
//! Each entity kind lives in its own [`Collection`]: an id-keyed map paired
//! with a monotonically increasing id counter. Ids start at 1 and are never
//! reused, so iterating the map in key order is insertion order.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

/// Entity kinds held by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    User,
    Planet,
    QuizQuestion,
    FunFact,
    ExploreContent,
    QuizProgress,
    QuizCategory,
    Badge,
    UserBadge,
    CelestialObject,
    SpaceMission,
    Worksheet,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Planet => "planet",
            EntityKind::QuizQuestion => "quiz_question",
            EntityKind::FunFact => "fun_fact",
            EntityKind::ExploreContent => "explore_content",
            EntityKind::QuizProgress => "quiz_progress",
            EntityKind::QuizCategory => "quiz_category",
            EntityKind::Badge => "badge",
            EntityKind::UserBadge => "user_badge",
            EntityKind::CelestialObject => "celestial_object",
            EntityKind::SpaceMission => "space_mission",
            EntityKind::Worksheet => "worksheet",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored record with a store-assigned identifier.
///
/// `New` is the creation input: the same fields minus the id and any
/// store-stamped timestamps. [`Collection::insert`] performs the conversion.
pub trait Record: Clone + Send + Sync {
    type New: Send;

    const KIND: EntityKind;

    fn from_new(id: i64, new: Self::New) -> Self;

    fn id(&self) -> i64;
}

/// Id-keyed collection for one entity kind
#[derive(Debug, Clone)]
pub struct Collection<R: Record> {
    rows: BTreeMap<i64, R>,
    next_id: i64,
}

impl<R: Record> Default for Collection<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Record> Collection<R> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Assign the next id, store the record, and return the stored copy
    pub fn insert(&mut self, new: R::New) -> R {
        let id = self.next_id;
        self.next_id += 1;

        let record = R::from_new(id, new);
        self.rows.insert(id, record.clone());
        debug!(kind = %R::KIND, id, "Record inserted");
        record
    }

    pub fn get(&self, id: i64) -> Option<R> {
        self.rows.get(&id).cloned()
    }

    /// All records in insertion order
    pub fn list(&self) -> Vec<R> {
        self.rows.values().cloned().collect()
    }

    /// Full scan returning every record matching `pred`
    pub fn filter<P>(&self, mut pred: P) -> Vec<R>
    where
        P: FnMut(&R) -> bool,
    {
        self.rows.values().filter(|r| pred(r)).cloned().collect()
    }

    /// First record (by id) matching `pred`
    pub fn find<P>(&self, mut pred: P) -> Option<R>
    where
        P: FnMut(&R) -> bool,
    {
        self.rows.values().find(|r| pred(r)).cloned()
    }

    /// Apply `change` to the stored record in place and return the new value.
    /// The id is restored afterwards so a record can never be re-keyed.
    pub fn update<F>(&mut self, id: i64, change: F) -> Option<R>
    where
        F: FnOnce(&mut R),
    {
        let row = self.rows.get_mut(&id)?;
        change(row);
        debug_assert_eq!(row.id(), id, "update must not change the record id");
        Some(row.clone())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Case-insensitive equality used by the free-text category filters
pub fn eq_ignore_case(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}
