//! # MindTrack
//!
//! A mental-health tracking application: accounts, daily mood logs, journal
//! entries and wellness goals, with derived dashboard metrics and a
//! fragment-based navigation state machine.
//!
//! ## Features
//!
//! - **Accounts**: validated registration, salted password hashes, normalized
//!   emails
//! - **Sessions**: 24-hour sliding window, durable ("remember me") and
//!   ephemeral tiers
//! - **Ledger**: one mood entry per local calendar day, append-only journal,
//!   toggleable goals
//! - **Metrics**: rolling averages, tracking streak, 30-day chart series,
//!   activity feed
//! - **Router**: fragment routes, session-gated redirects, pluggable render
//!   target
//!
//! ## Modules
//!
//! - [`storage`]: key-value store trait, backends, and the persisted data model
//! - [`users`]: registration, validation, and the user store
//! - [`session`]: login, logout, and session tier management
//! - [`ledger`]: mood, journal, and goal writes
//! - [`metrics`]: pure read-side derivations over a user's record
//! - [`chart`]: mood-chart geometry
//! - [`router`]: navigation state machine and route content
//!
//! ## Quick Start
//!
//! ```rust
//! use mindtrack::session::SessionManager;
//! use mindtrack::storage::{handle, MemoryStore, MoodEntry};
//! use mindtrack::users::{NewUser, UserStore};
//! use mindtrack::{ledger::Ledger, metrics};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let durable = handle(MemoryStore::new());
//!     let users = UserStore::new(durable.clone());
//!     let sessions =
//!         SessionManager::new(users.clone(), durable.clone(), handle(MemoryStore::new()));
//!
//!     let session = sessions.register(&NewUser {
//!         name: "Ada Lovelace".into(),
//!         email: "ada@example.com".into(),
//!         password: "engine123".into(),
//!         confirm_password: "engine123".into(),
//!         age_bracket: "25-34".into(),
//!         agree_terms: true,
//!         newsletter: false,
//!     })?;
//!
//!     let ledger = Ledger::new(users.clone(), durable);
//!     ledger.record_mood(&session.user.id, MoodEntry::quick(4))?;
//!
//!     let user = users.find_by_id(&session.user.id).unwrap();
//!     println!("Streak: {} days", metrics::tracking_streak(&user));
//!     Ok(())
//! }
//! ```

pub mod chart;
pub mod config;
pub mod i18n;
pub mod ledger;
pub mod metrics;
pub mod router;
pub mod session;
pub mod storage;
pub mod users;

// Re-export top-level types for convenience
pub use storage::{
    handle, local_day, mood_label, EntryKind, FileStore, Goal, GoalCategory, JournalEntry,
    KvStore, MemoryStore, MoodEntry, SessionRecord, StorageError, StorageResult, StoreHandle,
    UserRecord, SESSION_TTL_HOURS,
};

pub use config::{generate_default_config, Config, ConfigError};

pub use ledger::{Ledger, LedgerError};

pub use metrics::{Activity, CHART_DAYS, STREAK_LOOKBACK_DAYS};

pub use router::{RenderTarget, Route, RouteContent, Router, View};

pub use session::{AuthError, SessionManager};

pub use users::{NewUser, UserError, UserStore};

pub use i18n::{I18nError, QuoteBook, Translations};
