// ── School store ──
//
// In-memory school list for one map session. Filled once from
// `GET /schools`; read by the visibility filter, the coordinator and the
// camera.

mod collection;

use std::sync::Arc;

use tracing::debug;

use crate::model::{Coordinate, ModeState, School, SchoolId};
use crate::search::search_schools;
use crate::stream::StateStream;

use collection::EntityCollection;

/// Ordered, indexed school collection.
pub struct SchoolStore {
    schools: EntityCollection<School>,
}

impl SchoolStore {
    pub fn new() -> Self {
        Self {
            schools: EntityCollection::new(),
        }
    }

    /// Build a store that already holds `schools`.
    pub fn from_schools(schools: Vec<School>) -> Self {
        let store = Self::new();
        store.load(schools);
        store
    }

    /// Replace the contents with a freshly fetched batch. Returns the
    /// number of distinct schools stored.
    pub fn load(&self, schools: Vec<School>) -> usize {
        let count = self
            .schools
            .replace_all(schools, |s| s.id.as_str().to_owned());
        debug!(count, "school store loaded");
        count
    }

    pub fn get(&self, id: &SchoolId) -> Option<Arc<School>> {
        self.schools.get(id.as_str())
    }

    pub fn contains(&self, id: &SchoolId) -> bool {
        self.schools.contains(id.as_str())
    }

    pub fn position_of(&self, id: &SchoolId) -> Option<Coordinate> {
        self.get(id).map(|s| s.position)
    }

    /// All schools in load order (cheap `Arc` clone).
    pub fn all(&self) -> Arc<Vec<Arc<School>>> {
        self.schools.snapshot()
    }

    /// Schools whose name or address contains `query`, limited by the
    /// filters in `state`.
    pub fn search(&self, query: &str, state: &ModeState) -> Vec<Arc<School>> {
        search_schools(&self.all(), query, state)
    }

    pub fn len(&self) -> usize {
        self.schools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schools.is_empty()
    }

    /// Subscribe to store replacements.
    pub fn subscribe(&self) -> StateStream<Arc<Vec<Arc<School>>>> {
        StateStream::new(self.schools.subscribe())
    }
}

impl Default for SchoolStore {
    fn default() -> Self {
        Self::new()
    }
}
