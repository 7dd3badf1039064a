//! Core record types for the MindTrack store
//!
//! This module defines the persisted data model:
//! - `UserRecord`: the unit of persistence, owning all per-user collections
//! - `MoodEntry`, `JournalEntry`, `Goal`: the three tracked collections
//! - `SessionRecord`: a login snapshot with a sliding validity window

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How long a session stays valid after login, in hours
pub const SESSION_TTL_HOURS: i64 = 24;

/// The local calendar day a timestamp falls on
///
/// All "per day" semantics in the app (one mood entry per day, streaks,
/// chart buckets) are local-time days, not UTC days.
pub fn local_day(ts: DateTime<Utc>) -> NaiveDate {
    ts.with_timezone(&Local).date_naive()
}

/// Kind of mood entry (quick tap vs. full form)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Quick,
    Detailed,
}

/// A single mood log
///
/// Mood is 1-5, energy and sleep quality are 1-10. At most one entry exists
/// per user per local calendar day; the ledger enforces that on write.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MoodEntry {
    /// Mood level, 1 (poor) to 5 (great)
    pub mood: u8,
    /// Energy level, 1-10
    pub energy: u8,
    /// Sleep quality, 1-10
    pub sleep: u8,
    /// Activity tags for the day ("exercise", "social", ...)
    #[serde(default)]
    pub activities: Vec<String>,
    /// Free-text note
    #[serde(default)]
    pub notes: String,
    /// When the entry was logged
    pub date: DateTime<Utc>,
    /// Quick tap or detailed form
    pub kind: EntryKind,
}

impl MoodEntry {
    /// Create a quick entry: just a mood level, everything else defaulted
    pub fn quick(mood: u8) -> Self {
        Self {
            mood,
            energy: 5,
            sleep: 5,
            activities: Vec::new(),
            notes: String::new(),
            date: Utc::now(),
            kind: EntryKind::Quick,
        }
    }

    /// Create a detailed entry
    pub fn detailed(mood: u8, energy: u8, sleep: u8) -> Self {
        Self {
            mood,
            energy,
            sleep,
            activities: Vec::new(),
            notes: String::new(),
            date: Utc::now(),
            kind: EntryKind::Detailed,
        }
    }

    /// Builder: add an activity tag
    pub fn activity(mut self, tag: impl Into<String>) -> Self {
        self.activities.push(tag.into());
        self
    }

    /// Builder: set the note text
    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Builder: set the log timestamp
    pub fn dated(mut self, date: DateTime<Utc>) -> Self {
        self.date = date;
        self
    }

    /// The local calendar day this entry belongs to
    pub fn day(&self) -> NaiveDate {
        local_day(self.date)
    }
}

/// A journal entry; append-only, no per-day uniqueness
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct JournalEntry {
    /// Title, defaulted to a date-stamped label when not given
    pub title: String,
    /// Body text (required, non-empty)
    pub content: String,
    /// Mood while writing, 1-5, if the author picked one
    #[serde(default)]
    pub mood: Option<u8>,
    /// When the entry was written
    pub date: DateTime<Utc>,
}

/// Category a wellness goal belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum GoalCategory {
    Mood,
    Exercise,
    Sleep,
    Social,
    Mindfulness,
    Other,
}

impl GoalCategory {
    /// All categories, for menus and iteration
    pub fn all() -> &'static [GoalCategory] {
        &[
            GoalCategory::Mood,
            GoalCategory::Exercise,
            GoalCategory::Sleep,
            GoalCategory::Social,
            GoalCategory::Mindfulness,
            GoalCategory::Other,
        ]
    }
}

impl std::fmt::Display for GoalCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GoalCategory::Mood => write!(f, "mood"),
            GoalCategory::Exercise => write!(f, "exercise"),
            GoalCategory::Sleep => write!(f, "sleep"),
            GoalCategory::Social => write!(f, "social"),
            GoalCategory::Mindfulness => write!(f, "mindfulness"),
            GoalCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for GoalCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mood" => Ok(GoalCategory::Mood),
            "exercise" => Ok(GoalCategory::Exercise),
            "sleep" => Ok(GoalCategory::Sleep),
            "social" => Ok(GoalCategory::Social),
            "mindfulness" => Ok(GoalCategory::Mindfulness),
            "other" => Ok(GoalCategory::Other),
            other => Err(format!("unknown goal category: {other}")),
        }
    }
}

/// A wellness goal
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Goal {
    /// Generated id
    pub id: String,
    /// Goal text
    pub text: String,
    pub category: GoalCategory,
    pub completed: bool,
    /// When the goal was created
    pub date: DateTime<Utc>,
    /// Set when completed, cleared when un-completed
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
}

impl Goal {
    pub fn new(text: impl Into<String>, category: GoalCategory) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            category,
            completed: false,
            date: Utc::now(),
            completed_date: None,
        }
    }
}

/// A registered user; the unit of persistence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserRecord {
    /// Generated id
    pub id: String,
    pub name: String,
    /// Stored normalized: trimmed, lowercase
    pub email: String,
    /// Salted hash, never the password itself
    pub password_hash: String,
    /// Self-reported age bracket ("18-24", "25-34", ...)
    pub age_bracket: String,
    /// Newsletter opt-in
    #[serde(default)]
    pub newsletter: bool,
    pub join_date: DateTime<Utc>,
    pub last_login: DateTime<Utc>,
    pub login_count: u32,
    pub days_active: u32,
    #[serde(default)]
    pub mood_entries: Vec<MoodEntry>,
    #[serde(default)]
    pub journal_entries: Vec<JournalEntry>,
    #[serde(default)]
    pub goals: Vec<Goal>,
}

/// A login snapshot: the user at login time plus session identity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionRecord {
    pub user: UserRecord,
    pub session_id: String,
    pub login_time: DateTime<Utc>,
}

impl SessionRecord {
    /// Materialize a session for a user, stamped now
    pub fn new(user: UserRecord) -> Self {
        Self {
            user,
            session_id: Uuid::new_v4().to_string(),
            login_time: Utc::now(),
        }
    }

    /// Whether the session is inside its sliding window at `now`
    ///
    /// There is no stored expiry and no sweeper; validity is computed from
    /// wall-clock difference on every read.
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now.signed_duration_since(self.login_time) < Duration::hours(SESSION_TTL_HOURS)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

/// Human label for a mood level
pub fn mood_label(mood: u8) -> &'static str {
    match mood {
        1 => "Poor",
        2 => "Not Great",
        3 => "Okay",
        4 => "Good",
        5 => "Great",
        _ => "Unknown",
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    #[test]
    fn test_mood_entry_builders() {
        let entry = MoodEntry::detailed(4, 7, 6)
            .activity("exercise")
            .activity("social")
            .notes("good day");

        assert_eq!(entry.mood, 4);
        assert_eq!(entry.kind, EntryKind::Detailed);
        assert_eq!(entry.activities, vec!["exercise", "social"]);
        assert_eq!(entry.notes, "good day");
    }

    #[test]
    fn test_mood_entry_serialization() {
        let entry = MoodEntry::quick(3);
        let json = serde_json::to_string(&entry).unwrap();
        let restored: MoodEntry = serde_json::from_str(&json).unwrap();
        assert_eq!(entry, restored);
    }

    #[test]
    fn test_session_validity_window() {
        let user = test_user();
        let session = SessionRecord::new(user);

        let just_after = session.login_time + Duration::hours(23);
        assert!(session.is_valid_at(just_after));

        let too_late = session.login_time + Duration::hours(25);
        assert!(!session.is_valid_at(too_late));
    }

    #[test]
    fn test_goal_category_parsing() {
        assert_eq!(
            "Exercise".parse::<GoalCategory>().unwrap(),
            GoalCategory::Exercise
        );
        assert!("jogging".parse::<GoalCategory>().is_err());
        assert_eq!(GoalCategory::Mindfulness.to_string(), "mindfulness");
    }

    #[test]
    fn test_mood_labels() {
        assert_eq!(mood_label(1), "Poor");
        assert_eq!(mood_label(5), "Great");
        assert_eq!(mood_label(9), "Unknown");
    }

    pub(crate) fn test_user() -> UserRecord {
        UserRecord {
            id: "user-1".into(),
            name: "Test".into(),
            email: "test@example.com".into(),
            password_hash: String::new(),
            age_bracket: "25-34".into(),
            newsletter: false,
            join_date: Utc::now(),
            last_login: Utc::now(),
            login_count: 1,
            days_active: 1,
            mood_entries: Vec::new(),
            journal_entries: Vec::new(),
            goals: Vec::new(),
        }
    }
}
