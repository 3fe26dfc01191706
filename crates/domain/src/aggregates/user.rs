//! User aggregate - an account that owns stats, quests and finance history

use chrono::{DateTime, Utc};

use crate::types::UserRole;
use crate::value_objects::{Email, PlayerName};
use crate::UserId;

/// How the account authenticates.
pub const LOGIN_METHOD_PASSWORD: &str = "password";

/// A registered account.
///
/// # Invariants
///
/// - `email` is normalized and unique across accounts (uniqueness enforced by storage)
/// - `open_id` is unique; password accounts get `local:<user id>`
/// - `password_hash` is an encoded hash, never the plain password
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    open_id: String,
    email: Email,
    name: PlayerName,
    role: UserRole,
    login_method: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    last_signed_in: DateTime<Utc>,
}

/// Raw column values used to rebuild a `User` from storage.
#[derive(Debug, Clone)]
pub struct UserState {
    pub id: UserId,
    pub open_id: String,
    pub email: Email,
    pub name: PlayerName,
    pub role: UserRole,
    pub login_method: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_signed_in: DateTime<Utc>,
}

impl User {
    /// Registers a new password account.
    pub fn register(
        email: Email,
        name: PlayerName,
        password_hash: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        let id = UserId::new();
        Self {
            id,
            open_id: format!("local:{id}"),
            email,
            name,
            role: UserRole::User,
            login_method: LOGIN_METHOD_PASSWORD.to_string(),
            password_hash: password_hash.into(),
            created_at: now,
            updated_at: now,
            last_signed_in: now,
        }
    }

    pub fn from_state(state: UserState) -> Self {
        Self {
            id: state.id,
            open_id: state.open_id,
            email: state.email,
            name: state.name,
            role: state.role,
            login_method: state.login_method,
            password_hash: state.password_hash,
            created_at: state.created_at,
            updated_at: state.updated_at,
            last_signed_in: state.last_signed_in,
        }
    }

    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }

    #[inline]
    pub fn id(&self) -> UserId {
        self.id
    }

    #[inline]
    pub fn open_id(&self) -> &str {
        &self.open_id
    }

    #[inline]
    pub fn email(&self) -> &Email {
        &self.email
    }

    #[inline]
    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    #[inline]
    pub fn role(&self) -> UserRole {
        self.role
    }

    #[inline]
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    #[inline]
    pub fn login_method(&self) -> &str {
        &self.login_method
    }

    #[inline]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    #[inline]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[inline]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    #[inline]
    pub fn last_signed_in(&self) -> DateTime<Utc> {
        self.last_signed_in
    }

    /// Records a successful sign-in.
    pub fn record_sign_in(&mut self, now: DateTime<Utc>) {
        self.last_signed_in = now;
        self.updated_at = now;
    }
}
