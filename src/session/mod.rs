//! Session state
//!
//! Derives the "current user" from a session record in one of two tiers:
//! the durable store (remember me) or the ephemeral store (this process
//! only), falling back to the legacy `current_user` mirror. Sessions are
//! valid for a sliding 24-hour window from login; expiry is computed on
//! every read, never swept in the background.

use crate::storage::{self, keys, SessionRecord, StorageError, StoreHandle, UserRecord};
use crate::users::{normalize_email, verify_password, NewUser, UserError, UserStore};
use chrono::Utc;
use std::time::Duration;
use thiserror::Error;

/// Errors from login and registration
#[derive(Error, Debug)]
pub enum AuthError {
    /// No record matches the email + password pair
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error(transparent)]
    User(#[from] UserError),

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Manages login state across the two storage tiers
pub struct SessionManager {
    users: UserStore,
    durable: StoreHandle,
    ephemeral: StoreHandle,
    /// Stand-in for the modeled request latency; zero by default and not
    /// part of the contract.
    login_delay: Duration,
}

impl SessionManager {
    pub fn new(users: UserStore, durable: StoreHandle, ephemeral: StoreHandle) -> Self {
        Self {
            users,
            durable,
            ephemeral,
            login_delay: Duration::ZERO,
        }
    }

    /// Builder: set the simulated login/registration delay
    pub fn with_login_delay(mut self, delay: Duration) -> Self {
        self.login_delay = delay;
        self
    }

    /// Log a user in
    ///
    /// On success the matched user's login count and last-login timestamp
    /// are updated before the session is materialized; the session lands in
    /// the durable tier when `remember` is set, the ephemeral tier otherwise.
    pub fn login(&self, email: &str, password: &str, remember: bool) -> AuthResult<SessionRecord> {
        self.simulate_latency();

        let email = normalize_email(email);
        let mut user = self
            .users
            .find_by_email(&email)
            .filter(|u| verify_password(password, &u.password_hash))
            .ok_or(AuthError::InvalidCredentials)?;

        user.login_count += 1;
        user.last_login = Utc::now();
        self.users.upsert(user.clone())?;

        let session = SessionRecord::new(user);
        self.persist(&session, remember)?;

        tracing::info!("User {} logged in (remember={})", session.user.id, remember);
        Ok(session)
    }

    /// Register a new user and log them straight in (durable tier)
    pub fn register(&self, profile: &NewUser) -> AuthResult<SessionRecord> {
        self.simulate_latency();

        let user = self.users.create(profile)?;
        let session = SessionRecord::new(user);
        self.persist(&session, true)?;

        tracing::info!("User {} registered and logged in", session.user.id);
        Ok(session)
    }

    /// Clear both session tiers and the legacy user mirror
    pub fn logout(&self) -> AuthResult<()> {
        storage::remove(&self.durable, keys::SESSION)?;
        storage::remove(&self.ephemeral, keys::SESSION)?;
        storage::remove(&self.durable, keys::CURRENT_USER)?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// The active session, if any tier holds one inside its validity window
    pub fn current(&self) -> Option<SessionRecord> {
        self.tiers()
            .into_iter()
            .filter_map(|tier| storage::get_json::<SessionRecord>(tier, keys::SESSION))
            .find(|session| session.is_valid())
    }

    /// The logged-in user: session snapshot first, legacy mirror second
    pub fn current_user(&self) -> Option<UserRecord> {
        if let Some(session) = self.current() {
            return Some(session.user);
        }
        storage::get_json(&self.durable, keys::CURRENT_USER)
    }

    /// Whether a valid session exists right now (computed, not stored)
    pub fn is_authenticated(&self) -> bool {
        self.current().is_some()
    }

    fn tiers(&self) -> [&StoreHandle; 2] {
        [&self.durable, &self.ephemeral]
    }

    fn persist(&self, session: &SessionRecord, remember: bool) -> AuthResult<()> {
        let tier = if remember { &self.durable } else { &self.ephemeral };
        storage::set_json(tier, keys::SESSION, session)?;
        Ok(())
    }

    fn simulate_latency(&self) {
        if !self.login_delay.is_zero() {
            std::thread::sleep(self.login_delay);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{handle, MemoryStore};
    use chrono::Duration as ChronoDuration;

    fn setup() -> (SessionManager, UserStore) {
        let durable = handle(MemoryStore::new());
        let ephemeral = handle(MemoryStore::new());
        let users = UserStore::new(durable.clone());
        let manager = SessionManager::new(users.clone(), durable, ephemeral);
        (manager, users)
    }

    fn register_user(users: &UserStore, email: &str, password: &str) {
        let mut profile = crate::users::tests::profile(email);
        profile.password = password.into();
        profile.confirm_password = password.into();
        users.create(&profile).unwrap();
    }

    #[test]
    fn test_login_normalizes_email_and_bumps_count() {
        let (manager, users) = setup();
        register_user(&users, "a@b.com", "secret1");

        let session = manager.login("A@B.com ", "secret1", false).unwrap();
        assert_eq!(session.user.email, "a@b.com");
        assert_eq!(session.user.login_count, 2);
        assert!(!session.session_id.is_empty());

        // Valid for the next 24 hours
        assert!(session.is_valid_at(session.login_time + ChronoDuration::hours(23)));
        assert!(!session.is_valid_at(session.login_time + ChronoDuration::hours(25)));

        // The count update is persisted, not just on the snapshot
        assert_eq!(users.find_by_email("a@b.com").unwrap().login_count, 2);
    }

    #[test]
    fn test_login_rejects_bad_credentials() {
        let (manager, users) = setup();
        register_user(&users, "a@b.com", "secret1");

        assert!(matches!(
            manager.login("a@b.com", "wrong", false).unwrap_err(),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            manager.login("nobody@b.com", "secret1", false).unwrap_err(),
            AuthError::InvalidCredentials
        ));

        // Failed logins leave the record untouched
        assert_eq!(users.find_by_email("a@b.com").unwrap().login_count, 1);
    }

    #[test]
    fn test_remember_selects_tier() {
        let (manager, users) = setup();
        register_user(&users, "a@b.com", "secret1");

        manager.login("a@b.com", "secret1", false).unwrap();
        assert!(storage::get_json::<SessionRecord>(&manager.durable, keys::SESSION).is_none());
        assert!(storage::get_json::<SessionRecord>(&manager.ephemeral, keys::SESSION).is_some());
        assert!(manager.is_authenticated());

        manager.logout().unwrap();
        assert!(!manager.is_authenticated());

        manager.login("a@b.com", "secret1", true).unwrap();
        assert!(storage::get_json::<SessionRecord>(&manager.durable, keys::SESSION).is_some());
    }

    #[test]
    fn test_expired_session_is_not_current() {
        let (manager, users) = setup();
        register_user(&users, "a@b.com", "secret1");

        let mut session = manager.login("a@b.com", "secret1", true).unwrap();
        session.login_time = Utc::now() - ChronoDuration::hours(25);
        storage::set_json(&manager.durable, keys::SESSION, &session).unwrap();

        assert!(manager.current().is_none());
        assert!(!manager.is_authenticated());
    }

    #[test]
    fn test_register_auto_logs_in() {
        let (manager, _users) = setup();
        let profile = crate::users::tests::profile("new@b.com");

        let session = manager.register(&profile).unwrap();
        assert_eq!(session.user.email, "new@b.com");
        assert!(manager.is_authenticated());
        assert_eq!(manager.current_user().unwrap().email, "new@b.com");
    }

    #[test]
    fn test_current_user_falls_back_to_mirror() {
        let (manager, users) = setup();
        register_user(&users, "a@b.com", "secret1");
        let user = users.find_by_email("a@b.com").unwrap();

        // No session, but the legacy mirror key is populated
        storage::set_json(&manager.durable, keys::CURRENT_USER, &user).unwrap();
        assert_eq!(manager.current_user().unwrap().id, user.id);
        assert!(!manager.is_authenticated());
    }
}
