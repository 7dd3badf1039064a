//! Derived metrics over a user's ledger
//!
//! Pure read-side functions: today's mood, rolling averages, the tracking
//! streak, the fixed 30-day chart series and the recent-activity feed. Each
//! day-sensitive function has an `*_on`/`*_at` variant taking the reference
//! instant; the plain wrappers use the local clock.

use crate::storage::{mood_label, MoodEntry, UserRecord};
use chrono::{DateTime, Duration, Local, NaiveDate, Utc};

/// Number of days in the dashboard chart series
pub const CHART_DAYS: usize = 30;

/// Hard cap on streak lookback, in days
pub const STREAK_LOOKBACK_DAYS: u32 = 365;

/// The mood entry logged today, if any
pub fn todays_mood(user: &UserRecord) -> Option<&MoodEntry> {
    todays_mood_on(user, Local::now().date_naive())
}

pub fn todays_mood_on(user: &UserRecord, today: NaiveDate) -> Option<&MoodEntry> {
    user.mood_entries.iter().find(|e| e.day() == today)
}

/// Mean mood over the trailing window, `None` when the window is empty
///
/// The sentinel is deliberate: an empty window never divides by zero and
/// never yields NaN.
pub fn average_mood(user: &UserRecord, window_days: i64) -> Option<f64> {
    average_mood_at(user, window_days, Utc::now())
}

pub fn average_mood_at(user: &UserRecord, window_days: i64, now: DateTime<Utc>) -> Option<f64> {
    let cutoff = now - Duration::days(window_days);
    let moods: Vec<f64> = user
        .mood_entries
        .iter()
        .filter(|e| e.date >= cutoff)
        .map(|e| e.mood as f64)
        .collect();

    if moods.is_empty() {
        return None;
    }
    Some(moods.iter().sum::<f64>() / moods.len() as f64)
}

/// Consecutive days with a mood entry, walking backward from today
///
/// Stops at the first gap (a missing entry today means a streak of zero)
/// and never looks back more than [`STREAK_LOOKBACK_DAYS`].
pub fn tracking_streak(user: &UserRecord) -> u32 {
    tracking_streak_on(user, Local::now().date_naive())
}

pub fn tracking_streak_on(user: &UserRecord, today: NaiveDate) -> u32 {
    if user.mood_entries.is_empty() {
        return 0;
    }

    let mut streak = 0;
    for back in 0..STREAK_LOOKBACK_DAYS {
        let day = today - Duration::days(back as i64);
        if user.mood_entries.iter().any(|e| e.day() == day) {
            streak += 1;
        } else {
            break;
        }
    }
    streak
}

/// Fixed 30-point mood series, one slot per local day ending today
///
/// Days without an entry stay `None`; the chart renders those as breaks in
/// the line, never interpolated.
pub fn chart_series(user: &UserRecord) -> [Option<u8>; CHART_DAYS] {
    chart_series_on(user, Local::now().date_naive())
}

pub fn chart_series_on(user: &UserRecord, today: NaiveDate) -> [Option<u8>; CHART_DAYS] {
    let mut series = [None; CHART_DAYS];
    for (slot, value) in series.iter_mut().enumerate() {
        let day = today - Duration::days((CHART_DAYS - 1 - slot) as i64);
        *value = user
            .mood_entries
            .iter()
            .find(|e| e.day() == day)
            .map(|e| e.mood);
    }
    series
}

/// One item in the recent-activity feed
#[derive(Debug, Clone, PartialEq)]
pub enum Activity {
    Mood { level: u8, date: DateTime<Utc> },
    Journal { title: String, date: DateTime<Utc> },
    GoalCompleted { text: String, date: DateTime<Utc> },
}

impl Activity {
    pub fn date(&self) -> DateTime<Utc> {
        match self {
            Activity::Mood { date, .. }
            | Activity::Journal { date, .. }
            | Activity::GoalCompleted { date, .. } => *date,
        }
    }

    /// One-line description for feeds and the CLI
    pub fn describe(&self) -> String {
        match self {
            Activity::Mood { level, .. } => format!("Mood: {}", mood_label(*level)),
            Activity::Journal { title, .. } => format!("Journal: {title}"),
            Activity::GoalCompleted { text, .. } => format!("Completed: {text}"),
        }
    }
}

/// Moods, journals and completed goals merged newest-first
pub fn recent_activity(user: &UserRecord, limit: usize) -> Vec<Activity> {
    let mut items: Vec<Activity> = Vec::new();

    items.extend(user.mood_entries.iter().map(|e| Activity::Mood {
        level: e.mood,
        date: e.date,
    }));
    items.extend(user.journal_entries.iter().map(|e| Activity::Journal {
        title: e.title.clone(),
        date: e.date,
    }));
    items.extend(user.goals.iter().filter_map(|g| {
        g.completed_date.map(|date| Activity::GoalCompleted {
            text: g.text.clone(),
            date,
        })
    }));

    items.sort_by_key(|a| std::cmp::Reverse(a.date()));
    items.truncate(limit);
    items
}
