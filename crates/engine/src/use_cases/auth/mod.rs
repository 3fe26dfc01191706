//! Account use cases: registration, password login and bearer sessions.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use lifesys_domain::{DomainError, Email, PlayerName, PlayerStats, SessionId, User};
use lifesys_shared::{LoginRequest, RegisterRequest};

use crate::infrastructure::ports::{ClockPort, RepoError, SessionRecord, SessionRepo, UserRepo};
use crate::infrastructure::security::{
    generate_token, hash_password, token_digest, verify_password, SecurityError,
};

const MIN_PASSWORD_LENGTH: usize = 8;

/// Container for account use cases.
pub struct AuthUseCases {
    pub register: Arc<Register>,
    pub login: Arc<Login>,
    pub logout: Arc<Logout>,
    pub authenticate: Arc<Authenticate>,
}

impl AuthUseCases {
    pub fn new(
        register: Arc<Register>,
        login: Arc<Login>,
        logout: Arc<Logout>,
        authenticate: Arc<Authenticate>,
    ) -> Self {
        Self {
            register,
            login,
            logout,
            authenticate,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("An account with this email already exists")]
    EmailTaken,
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("Missing, unknown or expired session")]
    Unauthenticated,
    #[error(transparent)]
    Security(#[from] SecurityError),
    #[error(transparent)]
    Repo(#[from] RepoError),
}

impl From<DomainError> for AuthError {
    fn from(err: DomainError) -> Self {
        AuthError::InvalidInput(err.to_string())
    }
}

/// Creates an account together with its level 1 stats.
pub struct Register {
    users: Arc<dyn UserRepo>,
    clock: Arc<dyn ClockPort>,
}

impl Register {
    pub fn new(users: Arc<dyn UserRepo>, clock: Arc<dyn ClockPort>) -> Self {
        Self { users, clock }
    }

    pub async fn execute(&self, request: RegisterRequest) -> Result<User, AuthError> {
        let email = Email::new(request.email)?;
        let name = PlayerName::new(request.name)?;
        if request.password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(AuthError::InvalidInput(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let now = self.clock.now();
        let user = User::register(email, name, hash_password(&request.password)?, now);
        let stats = PlayerStats::new_for_user(user.id(), now);

        // Two concurrent registrations can both pass the lookup above.
        match self.users.create_with_stats(&user, &stats).await {
            Ok(()) => {}
            Err(e) if e.is_constraint() => return Err(AuthError::EmailTaken),
            Err(e) => return Err(e.into()),
        }

        tracing::info!(user_id = %user.id(), "Registered new account");
        Ok(user)
    }
}

/// A freshly issued bearer session. `token` is only ever shown here.
#[derive(Debug, Clone)]
pub struct LoginResult {
    pub user: User,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

pub struct Login {
    users: Arc<dyn UserRepo>,
    sessions: Arc<dyn SessionRepo>,
    clock: Arc<dyn ClockPort>,
    session_ttl: Duration,
}

impl Login {
    pub fn new(
        users: Arc<dyn UserRepo>,
        sessions: Arc<dyn SessionRepo>,
        clock: Arc<dyn ClockPort>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            users,
            sessions,
            clock,
            session_ttl,
        }
    }

    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResult, AuthError> {
        // Unknown email, malformed email and wrong password look the same.
        let email = Email::new(request.email).map_err(|_| AuthError::InvalidCredentials)?;
        let mut user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;
        if !verify_password(&request.password, user.password_hash()) {
            tracing::debug!(user_id = %user.id(), "Rejected login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let now = self.clock.now();
        let purged = self.sessions.delete_expired(now).await?;
        if purged > 0 {
            tracing::debug!(count = purged, "Purged expired sessions");
        }

        let token = generate_token();
        let session = SessionRecord {
            id: SessionId::new(),
            user_id: user.id(),
            token_hash: token_digest(&token),
            created_at: now,
            expires_at: now + self.session_ttl,
        };
        self.sessions.create(&session).await?;
        self.users.record_sign_in(user.id(), now).await?;
        user.record_sign_in(now);

        tracing::info!(user_id = %user.id(), expires_at = %session.expires_at, "User logged in");
        Ok(LoginResult {
            user,
            token,
            expires_at: session.expires_at,
        })
    }
}

pub struct Logout {
    sessions: Arc<dyn SessionRepo>,
}

impl Logout {
    pub fn new(sessions: Arc<dyn SessionRepo>) -> Self {
        Self { sessions }
    }

    /// Revokes `token`. Revoking an already removed token is not an error.
    pub async fn execute(&self, token: &str) -> Result<(), AuthError> {
        let removed = self.sessions.delete_by_token_hash(&token_digest(token)).await?;
        tracing::debug!(removed, "Session revoked");
        Ok(())
    }
}

/// Resolves a bearer token to its user.
pub struct Authenticate {
    users: Arc<dyn UserRepo>,
    sessions: Arc<dyn SessionRepo>,
    clock: Arc<dyn ClockPort>,
}

impl Authenticate {
    pub fn new(
        users: Arc<dyn UserRepo>,
        sessions: Arc<dyn SessionRepo>,
        clock: Arc<dyn ClockPort>,
    ) -> Self {
        Self {
            users,
            sessions,
            clock,
        }
    }

    pub async fn execute(&self, token: &str) -> Result<User, AuthError> {
        let digest = token_digest(token);
        let session = self
            .sessions
            .find_by_token_hash(&digest)
            .await?
            .ok_or(AuthError::Unauthenticated)?;

        if session.is_expired(self.clock.now()) {
            self.sessions.delete_by_token_hash(&digest).await?;
            return Err(AuthError::Unauthenticated);
        }

        self.users
            .get(session.user_id)
            .await?
            .ok_or(AuthError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedClock;
    use crate::infrastructure::ports::{MockSessionRepo, MockUserRepo};
    use chrono::TimeZone;
    use lifesys_domain::UserId;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 1, 8, 0, 0).unwrap()
    }

    fn clock() -> Arc<dyn ClockPort> {
        Arc::new(FixedClock(now()))
    }

    fn stored_user(password: &str) -> User {
        User::register(
            Email::new("hero@example.com").unwrap(),
            PlayerName::new("Hero").unwrap(),
            hash_password(password).unwrap(),
            now() - Duration::days(3),
        )
    }

    fn register_request(email: &str) -> RegisterRequest {
        RegisterRequest {
            email: email.into(),
            password: "long enough".into(),
            name: "Hero".into(),
        }
    }

    #[tokio::test]
    async fn register_creates_user_with_fresh_stats() {
        let mut users = MockUserRepo::new();
        users.expect_get_by_email().returning(|_| Ok(None));
        users
            .expect_create_with_stats()
            .withf(|user, stats| {
                stats.user_id() == user.id()
                    && stats.total_xp() == 0
                    && user.password_hash().starts_with("$argon2")
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let register = Register::new(Arc::new(users), clock());
        let user = register
            .execute(register_request("Hero@Example.com"))
            .await
            .unwrap();
        assert_eq!(user.email().as_str(), "hero@example.com");
        assert_eq!(user.created_at(), now());
    }

    #[tokio::test]
    async fn register_reports_taken_email() {
        let mut users = MockUserRepo::new();
        users
            .expect_get_by_email()
            .returning(|_| Ok(Some(stored_user("whatever1"))));
        users.expect_create_with_stats().times(0);

        let register = Register::new(Arc::new(users), clock());
        let err = register
            .execute(register_request("hero@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn register_maps_racing_unique_violation_to_taken_email() {
        let mut users = MockUserRepo::new();
        users.expect_get_by_email().returning(|_| Ok(None));
        users
            .expect_create_with_stats()
            .returning(|_, _| Err(RepoError::constraint("UNIQUE constraint failed: users.email")));

        let register = Register::new(Arc::new(users), clock());
        let err = register
            .execute(register_request("hero@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::EmailTaken));
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let register = Register::new(Arc::new(MockUserRepo::new()), clock());
        let err = register
            .execute(RegisterRequest {
                email: "a@b.co".into(),
                password: "short".into(),
                name: "A".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn login_issues_hashed_session() {
        let user = stored_user("correct horse");
        let user_id = user.id();

        let mut users = MockUserRepo::new();
        users
            .expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        users
            .expect_record_sign_in()
            .withf(move |id, at| *id == user_id && *at == now())
            .times(1)
            .returning(|_, _| Ok(()));

        let mut sessions = MockSessionRepo::new();
        sessions.expect_delete_expired().returning(|_| Ok(0));
        sessions
            .expect_create()
            .withf(move |s| {
                s.user_id == user_id && s.token_hash.len() == 64 && s.expires_at == now() + Duration::hours(2)
            })
            .times(1)
            .returning(|_| Ok(()));

        let login = Login::new(
            Arc::new(users),
            Arc::new(sessions),
            clock(),
            Duration::hours(2),
        );
        let result = login
            .execute(LoginRequest {
                email: "hero@example.com".into(),
                password: "correct horse".into(),
            })
            .await
            .unwrap();

        assert_eq!(result.token.len(), 64);
        assert_eq!(result.expires_at, now() + Duration::hours(2));
        assert_eq!(result.user.last_signed_in(), now());
    }

    #[tokio::test]
    async fn login_with_wrong_password_creates_no_session() {
        let user = stored_user("correct horse");
        let mut users = MockUserRepo::new();
        users
            .expect_get_by_email()
            .returning(move |_| Ok(Some(user.clone())));
        let mut sessions = MockSessionRepo::new();
        sessions.expect_create().times(0);

        let login = Login::new(
            Arc::new(users),
            Arc::new(sessions),
            clock(),
            Duration::hours(2),
        );
        let err = login
            .execute(LoginRequest {
                email: "hero@example.com".into(),
                password: "battery staple".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn expired_session_is_removed_and_rejected() {
        let mut sessions = MockSessionRepo::new();
        sessions.expect_find_by_token_hash().returning(|hash| {
            Ok(Some(SessionRecord {
                id: SessionId::new(),
                user_id: UserId::new(),
                token_hash: hash.to_string(),
                created_at: now() - Duration::days(8),
                expires_at: now() - Duration::seconds(1),
            }))
        });
        sessions
            .expect_delete_by_token_hash()
            .withf(|hash| hash == token_digest("tok"))
            .times(1)
            .returning(|_| Ok(true));
        let mut users = MockUserRepo::new();
        users.expect_get().times(0);

        let authenticate = Authenticate::new(Arc::new(users), Arc::new(sessions), clock());
        let err = authenticate.execute("tok").await.unwrap_err();
        assert!(matches!(err, AuthError::Unauthenticated));
    }

    #[tokio::test]
    async fn valid_session_resolves_user() {
        let user = stored_user("correct horse");
        let user_id = user.id();

        let mut sessions = MockSessionRepo::new();
        sessions.expect_find_by_token_hash().returning(move |hash| {
            Ok(Some(SessionRecord {
                id: SessionId::new(),
                user_id,
                token_hash: hash.to_string(),
                created_at: now(),
                expires_at: now() + Duration::hours(1),
            }))
        });
        let mut users = MockUserRepo::new();
        users
            .expect_get()
            .withf(move |id| *id == user_id)
            .returning(move |_| Ok(Some(user.clone())));

        let authenticate = Authenticate::new(Arc::new(users), Arc::new(sessions), clock());
        let resolved = authenticate.execute("tok").await.unwrap();
        assert_eq!(resolved.id(), user_id);
    }
}
