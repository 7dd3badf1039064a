//! User store
//!
//! A flat collection of [`UserRecord`]s persisted under one key in the
//! durable tier. Email lookups are case-insensitive and trimmed; emails are
//! unique after normalization. Registration input is validated before
//! anything touches storage.

use crate::storage::{self, keys, StorageError, StoreHandle, UserRecord};
use chrono::Utc;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::sync::OnceLock;
use thiserror::Error;
use uuid::Uuid;

/// Errors from user creation and lookup
#[derive(Error, Debug)]
pub enum UserError {
    /// Malformed registration input; the message is what the form shows
    #[error("validation failed: {0}")]
    Validation(String),

    /// An account with this (normalized) email already exists
    #[error("an account with this email already exists")]
    DuplicateEmail,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type UserResult<T> = Result<T, UserError>;

/// Registration input, exactly as submitted
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub age_bracket: String,
    pub agree_terms: bool,
    pub newsletter: bool,
}

/// Normalize an email the way every lookup does: trim, lowercase
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn email_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("static email regex"))
}

/// Salted SHA-256 password hash, `salt$hex` form
pub fn hash_password(password: &str) -> String {
    let salt = Uuid::new_v4().simple().to_string();
    format!("{salt}${}", digest(&salt, password))
}

/// Check a password against a stored `salt$hex` hash
pub fn verify_password(password: &str, stored: &str) -> bool {
    match stored.split_once('$') {
        Some((salt, hex)) => digest(salt, password) == hex,
        None => false,
    }
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    let out = hasher.finalize();
    out.iter().map(|b| format!("{b:02x}")).collect()
}

/// Store of user records over the durable tier
#[derive(Clone)]
pub struct UserStore {
    store: StoreHandle,
}

impl UserStore {
    pub fn new(store: StoreHandle) -> Self {
        Self { store }
    }

    /// All user records; an absent or unreadable list is empty
    pub fn all(&self) -> Vec<UserRecord> {
        storage::get_json(&self.store, keys::USERS).unwrap_or_default()
    }

    /// Find a user by email, case-insensitive and trimmed
    pub fn find_by_email(&self, email: &str) -> Option<UserRecord> {
        let wanted = normalize_email(email);
        self.all().into_iter().find(|u| u.email == wanted)
    }

    /// Find a user by id
    pub fn find_by_id(&self, id: &str) -> Option<UserRecord> {
        self.all().into_iter().find(|u| u.id == id)
    }

    /// Replace the record with the same id, or append if unknown
    pub fn upsert(&self, record: UserRecord) -> UserResult<()> {
        let mut users = self.all();
        match users.iter_mut().find(|u| u.id == record.id) {
            Some(existing) => *existing = record,
            None => users.push(record),
        }
        self.save(&users)
    }

    /// Validate registration input and create a new user record
    ///
    /// Validation runs first and never touches storage; only then is the
    /// duplicate-email check done against the persisted list.
    pub fn create(&self, profile: &NewUser) -> UserResult<UserRecord> {
        validate(profile)?;

        let email = normalize_email(&profile.email);
        if self.find_by_email(&email).is_some() {
            return Err(UserError::DuplicateEmail);
        }

        let now = Utc::now();
        let record = UserRecord {
            id: Uuid::new_v4().to_string(),
            name: profile.name.trim().to_string(),
            email,
            password_hash: hash_password(&profile.password),
            age_bracket: profile.age_bracket.clone(),
            newsletter: profile.newsletter,
            join_date: now,
            last_login: now,
            login_count: 1,
            days_active: 1,
            mood_entries: Vec::new(),
            journal_entries: Vec::new(),
            goals: Vec::new(),
        };

        let mut users = self.all();
        users.push(record.clone());
        self.save(&users)?;

        tracing::info!("Created user {} ({})", record.id, record.email);
        Ok(record)
    }

    fn save(&self, users: &[UserRecord]) -> UserResult<()> {
        storage::set_json(&self.store, keys::USERS, &users)?;
        Ok(())
    }
}

fn validate(profile: &NewUser) -> UserResult<()> {
    if profile.name.trim().chars().count() < 2 {
        return Err(UserError::Validation(
            "please enter a valid full name".into(),
        ));
    }
    if !email_pattern().is_match(profile.email.trim()) {
        return Err(UserError::Validation(
            "please enter a valid email address".into(),
        ));
    }
    if profile.password.len() < 6 {
        return Err(UserError::Validation(
            "password must be at least 6 characters long".into(),
        ));
    }
    if profile.password != profile.confirm_password {
        return Err(UserError::Validation("passwords do not match".into()));
    }
    if profile.age_bracket.trim().is_empty() {
        return Err(UserError::Validation("please select your age range".into()));
    }
    if !profile.agree_terms {
        return Err(UserError::Validation(
            "please agree to the terms of service and privacy policy".into(),
        ));
    }
    Ok(())
}
