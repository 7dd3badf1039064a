//! Mood / journal / goal ledger
//!
//! Every mutation follows one pattern: load the user list, locate the record
//! by id, mutate the nested collection, persist the whole list, then refresh
//! the legacy `current_user` mirror. There is no partial-update path; the
//! whole-record round trip is the single-writer contract of this app.

use crate::storage::{self, keys, Goal, GoalCategory, JournalEntry, MoodEntry, StorageError,
    StoreHandle, UserRecord};
use crate::users::{UserError, UserStore};
use chrono::{Local, NaiveDate, Utc};
use thiserror::Error;

/// Errors from ledger mutations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Mood level outside 1-5
    #[error("mood level {0} is out of range (1-5)")]
    InvalidMood(u8),

    /// Energy or sleep quality outside 1-10
    #[error("{field} level {value} is out of range (1-10)")]
    InvalidScale { field: &'static str, value: u8 },

    /// Blank journal body or goal text
    #[error("content must not be empty")]
    EmptyContent,

    #[error("user not found: {0}")]
    UserNotFound(String),

    #[error("goal not found: {0}")]
    GoalNotFound(String),

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type LedgerResult<T> = Result<T, LedgerError>;

/// Append/update logic for the per-user collections
pub struct Ledger {
    users: UserStore,
    /// Durable tier holding the `current_user` mirror
    mirror: StoreHandle,
}

impl Ledger {
    pub fn new(users: UserStore, mirror: StoreHandle) -> Self {
        Self { users, mirror }
    }

    /// Record a mood entry for today
    ///
    /// At most one entry exists per local calendar day: any existing entry
    /// dated today is dropped before the new one is appended, so the last
    /// save of the day wins.
    pub fn record_mood(&self, user_id: &str, entry: MoodEntry) -> LedgerResult<UserRecord> {
        self.record_mood_at(user_id, entry, Local::now().date_naive())
    }

    pub(crate) fn record_mood_at(
        &self,
        user_id: &str,
        entry: MoodEntry,
        today: NaiveDate,
    ) -> LedgerResult<UserRecord> {
        validate_mood(entry.mood)?;
        validate_scale("energy", entry.energy)?;
        validate_scale("sleep", entry.sleep)?;

        self.update(user_id, |user| {
            user.mood_entries.retain(|e| e.day() != today);
            user.mood_entries.push(entry);
            tracing::debug!("Recorded mood for {} on {}", user.id, today);
            Ok(())
        })
    }

    /// Append a journal entry; the title defaults to a date-stamped label
    pub fn record_journal(
        &self,
        user_id: &str,
        title: Option<&str>,
        content: &str,
        mood: Option<u8>,
    ) -> LedgerResult<UserRecord> {
        if content.trim().is_empty() {
            return Err(LedgerError::EmptyContent);
        }
        if let Some(level) = mood {
            validate_mood(level)?;
        }

        let now = Utc::now();
        let title = match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(t) => t.to_string(),
            None => format!(
                "Journal Entry - {}",
                now.with_timezone(&Local).format("%Y-%m-%d")
            ),
        };

        let entry = JournalEntry {
            title,
            content: content.to_string(),
            mood,
            date: now,
        };

        self.update(user_id, |user| {
            user.journal_entries.push(entry);
            Ok(())
        })
    }

    /// Add a goal; returns the updated record (the new goal is last)
    pub fn add_goal(
        &self,
        user_id: &str,
        text: &str,
        category: GoalCategory,
    ) -> LedgerResult<UserRecord> {
        if text.trim().is_empty() {
            return Err(LedgerError::EmptyContent);
        }

        let goal = Goal::new(text.trim(), category);
        self.update(user_id, |user| {
            user.goals.push(goal);
            Ok(())
        })
    }

    /// Flip a goal's completed flag
    ///
    /// The completion timestamp is set on completion and cleared on
    /// un-completion, in the same write as the flip.
    pub fn toggle_goal(&self, user_id: &str, goal_id: &str) -> LedgerResult<UserRecord> {
        let goal_id = goal_id.to_string();
        self.update(user_id, move |user| {
            let goal = user
                .goals
                .iter_mut()
                .find(|g| g.id == goal_id)
                .ok_or(LedgerError::GoalNotFound(goal_id))?;

            goal.completed = !goal.completed;
            goal.completed_date = goal.completed.then(Utc::now);
            Ok(())
        })
    }

    /// Remove a goal by id
    pub fn delete_goal(&self, user_id: &str, goal_id: &str) -> LedgerResult<UserRecord> {
        let goal_id = goal_id.to_string();
        self.update(user_id, move |user| {
            let before = user.goals.len();
            user.goals.retain(|g| g.id != goal_id);
            if user.goals.len() == before {
                return Err(LedgerError::GoalNotFound(goal_id));
            }
            Ok(())
        })
    }

    /// The user's goals, newest last
    pub fn goals(&self, user_id: &str) -> LedgerResult<Vec<Goal>> {
        let user = self
            .users
            .find_by_id(user_id)
            .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))?;
        Ok(user.goals)
    }

    /// Load, mutate, persist the whole record, refresh the mirror
    fn update<F>(&self, user_id: &str, mutate: F) -> LedgerResult<UserRecord>
    where
        F: FnOnce(&mut UserRecord) -> LedgerResult<()>,
    {
        let mut user = self
            .users
            .find_by_id(user_id)
            .ok_or_else(|| LedgerError::UserNotFound(user_id.to_string()))?;

        mutate(&mut user)?;
        self.users.upsert(user.clone())?;
        storage::set_json(&self.mirror, keys::CURRENT_USER, &user)?;
        Ok(user)
    }
}

fn validate_mood(level: u8) -> LedgerResult<()> {
    if (1..=5).contains(&level) {
        Ok(())
    } else {
        Err(LedgerError::InvalidMood(level))
    }
}

fn validate_scale(field: &'static str, value: u8) -> LedgerResult<()> {
    if (1..=10).contains(&value) {
        Ok(())
    } else {
        Err(LedgerError::InvalidScale { field, value })
    }
}
