//! Persistence layer
//!
//! A small key-value contract (string keys, JSON string values) with two
//! tiers: a durable file-backed store and an ephemeral in-memory store.
//! The record types that live inside those values are defined here too.

pub mod error;
pub mod kv;
pub mod types;

pub use error::{StorageError, StorageResult};
pub use kv::{get_json, handle, keys, remove, set_json, FileStore, KvStore, MemoryStore, StoreHandle};
pub use types::{
    local_day, mood_label, EntryKind, Goal, GoalCategory, JournalEntry, MoodEntry, SessionRecord,
    UserRecord, SESSION_TTL_HOURS,
};
