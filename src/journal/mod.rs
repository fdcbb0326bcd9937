//! The activity journal: an exclusively owned collection of [Activity]
//! records with write-through persistence and the read-only projections
//! derived from it.

pub mod aggregate;
pub mod entities;
pub mod filter;
pub mod storage;

use anyhow::Result;
use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::utils::clock::Clock;

use entities::{Activity, Category};
use filter::ActivityFilter;
use storage::JournalStorage;

/// Input for a new record. The journal assigns the id itself.
#[derive(Debug, Clone)]
pub struct ActivityDraft {
    pub title: String,
    pub category: Category,
    pub start: NaiveDate,
    pub end: Option<NaiveDate>,
    pub hours: f64,
    pub notes: String,
}

impl ActivityDraft {
    fn into_activity(self, id: u64) -> Activity {
        Activity {
            id,
            title: self.title,
            category: self.category,
            start: self.start,
            end: self.end,
            hours: self.hours,
            notes: self.notes,
        }
    }
}

/// Owns the full collection for the session. Loaded once at open, mutated in
/// memory, and written back whole after every mutation.
pub struct Journal<S: JournalStorage> {
    storage: S,
    activities: Vec<Activity>,
    clock: Box<dyn Clock>,
}

impl<S: JournalStorage> Journal<S> {
    pub async fn open(storage: S, clock: Box<dyn Clock>) -> Result<Self> {
        let activities = storage.load().await?;
        debug!("Loaded {} activities", activities.len());
        Ok(Self {
            storage,
            activities,
            clock,
        })
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn get(&self, id: u64) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }

    /// Filtered, sorted view of the collection. Every listing and derivation
    /// starts from this.
    pub fn select(&self, filter: &ActivityFilter) -> Vec<Activity> {
        filter.select(&self.activities)
    }

    /// Validates the draft, assigns a fresh id, appends and saves. Returns
    /// the assigned id.
    pub async fn add(&mut self, draft: ActivityDraft) -> Result<u64> {
        let id = self.next_id();
        let activity = draft.into_activity(id);
        activity.validate()?;
        self.activities.push(activity);
        self.save().await?;
        Ok(id)
    }

    /// Replaces the record with a matching id. An unknown id is a logged
    /// no-op, not an error; the collection is re-saved either way.
    pub async fn update(&mut self, record: Activity) -> Result<bool> {
        record.validate()?;
        let found = match self.activities.iter_mut().find(|a| a.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => {
                warn!("No activity with id {} to update", record.id);
                false
            }
        };
        self.save().await?;
        Ok(found)
    }

    /// Removes the record with the given id, a logged no-op when absent.
    pub async fn remove(&mut self, id: u64) -> Result<bool> {
        let before = self.activities.len();
        self.activities.retain(|a| a.id != id);
        let found = self.activities.len() != before;
        if !found {
            warn!("No activity with id {id} to remove");
        }
        self.save().await?;
        Ok(found)
    }

    async fn save(&self) -> Result<()> {
        self.storage.save(&self.activities).await
    }

    /// Ids derive from the creation timestamp in milliseconds. Two records
    /// created within the same millisecond bump past the current maximum so
    /// the id stays unique within the collection.
    fn next_id(&self) -> u64 {
        let candidate = self.clock.time().timestamp_millis().max(0) as u64;
        if self.activities.iter().any(|a| a.id == candidate) {
            let max = self
                .activities
                .iter()
                .map(|a| a.id)
                .max()
                .expect("collision implies a non-empty collection");
            max + 1
        } else {
            candidate
        }
    }
}
