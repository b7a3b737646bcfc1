//! Ordered workout collection plus the edit session.
//!
//! Every mutation is written through to the [`Store`] before it becomes
//! visible in memory, so a failed write leaves the ledger as it was.

use crate::database::Store;
use crate::dlog;
use crate::error::{LedgerError, Result};
use crate::types::{Coords, Workout, WorkoutInput, observe_id};

/// What happens to `id` and `created_at` when an edit is committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EditIdentity {
    /// Keep the edited record's id and creation time.
    #[default]
    Preserve,
    /// Give the replacement a fresh id and creation time.
    Regenerate,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerConfig {
    pub edit_identity: EditIdentity,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(String),
}

pub struct Ledger<S: Store> {
    workouts: Vec<Workout>,
    session: EditSession,
    config: LedgerConfig,
    store: S,
}

impl<S: Store> Ledger<S> {
    /// Empty ledger over `store`, ignoring anything already stored.
    pub fn new(store: S, config: LedgerConfig) -> Self {
        Self {
            workouts: Vec::new(),
            session: EditSession::Idle,
            config,
            store,
        }
    }

    /// Ledger restored from whatever `store` holds. Unreadable or
    /// malformed data yields an empty ledger.
    pub fn open(store: S, config: LedgerConfig) -> Self {
        let raw = match store.read_all() {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!(err = %e, "reading stored workouts failed; starting empty");
                None
            }
        };
        let mut ledger = Self::new(store, config);
        ledger.load(raw.as_deref());
        ledger
    }

    /// Replaces the in-memory state with `raw`. Stored records are trusted
    /// as-is; nothing is re-validated or re-derived.
    pub fn load(&mut self, raw: Option<&str>) {
        self.workouts.clear();
        self.session = EditSession::Idle;

        let Some(raw) = raw else {
            dlog!("load: no stored workouts");
            return;
        };

        match serde_json::from_str::<Option<Vec<Workout>>>(raw) {
            Ok(Some(workouts)) => {
                for w in &workouts {
                    observe_id(&w.id);
                }
                tracing::info!(count = workouts.len(), "loaded workouts");
                self.workouts = workouts;
            }
            Ok(None) => {
                dlog!("load: stored workouts are null");
            }
            Err(e) => {
                tracing::warn!(err = %e, "stored workouts are malformed; starting empty");
            }
        }
    }

    /// Serialized form of the current sequence.
    pub fn persist(&self) -> Result<String> {
        Ok(serde_json::to_string(&self.workouts)?)
    }

    pub fn list(&self) -> &[Workout] {
        &self.workouts
    }

    pub fn get(&self, id: &str) -> Option<&Workout> {
        self.workouts.iter().find(|w| w.id == id)
    }

    pub const fn session(&self) -> &EditSession {
        &self.session
    }

    /// The record under edit, if any.
    pub fn editing(&self) -> Option<&Workout> {
        match &self.session {
            EditSession::Editing(id) => self.get(id),
            EditSession::Idle => None,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Validates `input` and appends a new workout at `coords`.
    pub fn create(&mut self, input: WorkoutInput, coords: Coords) -> Result<&Workout> {
        let workout = input.build(coords)?;
        let id = workout.id.clone();

        let mut next = self.workouts.clone();
        next.push(workout);
        self.write(next)?;

        tracing::info!(%id, kind = %input.workout_type(), "created workout");
        Ok(&self.workouts[self.workouts.len() - 1])
    }

    /// Starts (or retargets) an edit session. Returns `false` and changes
    /// nothing when `id` is unknown.
    pub fn begin_edit(&mut self, id: &str) -> bool {
        if self.get(id).is_none() {
            dlog!("begin_edit: unknown id={id}");
            return false;
        }
        dlog!("begin_edit id={id}");
        self.session = EditSession::Editing(id.to_string());
        true
    }

    /// Replaces the record under edit with one built from `input`, keeping
    /// its coordinates. On a validation error the session stays open.
    pub fn commit(&mut self, input: WorkoutInput) -> Result<&Workout> {
        let EditSession::Editing(target) = &self.session else {
            return Err(LedgerError::NotEditing);
        };
        let Some(pos) = self.workouts.iter().position(|w| &w.id == target) else {
            self.session = EditSession::Idle;
            return Err(LedgerError::NotEditing);
        };

        let old = &self.workouts[pos];
        let replacement = match self.config.edit_identity {
            EditIdentity::Preserve => input.build_at(old.coords, old.id.clone(), old.created_at)?,
            EditIdentity::Regenerate => input.build(old.coords)?,
        };
        let old_id = old.id.clone();
        let new_id = replacement.id.clone();

        let mut next = self.workouts.clone();
        next[pos] = replacement;
        self.write(next)?;
        self.session = EditSession::Idle;

        tracing::info!(id = %old_id, new_id = %new_id, kind = %input.workout_type(), "edited workout");
        Ok(&self.workouts[pos])
    }

    /// Ends the edit session without touching any record.
    pub fn cancel(&mut self) {
        if self.session != EditSession::Idle {
            dlog!("edit cancelled");
        }
        self.session = EditSession::Idle;
    }

    /// Removes the workout with `id`. Returns whether one was removed.
    pub fn delete(&mut self, id: &str) -> Result<bool> {
        let Some(pos) = self.workouts.iter().position(|w| w.id == id) else {
            dlog!("delete: unknown id={id}");
            return Ok(false);
        };

        let mut next = self.workouts.clone();
        next.remove(pos);
        self.write(next)?;

        if self.session == EditSession::Editing(id.to_string()) {
            self.session = EditSession::Idle;
        }
        tracing::info!(%id, "deleted workout");
        Ok(true)
    }

    /// Removes every workout and ends any edit session.
    pub fn delete_all(&mut self) -> Result<()> {
        let count = self.workouts.len();
        self.write(Vec::new())?;
        self.session = EditSession::Idle;
        tracing::info!(count, "deleted all workouts");
        Ok(())
    }

    fn write(&mut self, next: Vec<Workout>) -> Result<()> {
        let raw = serde_json::to_string(&next)?;
        self.store.write_all(&raw)?;
        self.workouts = next;
        Ok(())
    }
}
