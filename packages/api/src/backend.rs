//! # Backend seams
//!
//! The portal talks to a hosted backend made of an auth service and a
//! relational data store. Both are described here as traits so the session
//! layer can run against the REST client in production and against
//! [`crate::MemoryBackend`] in tests and demo mode.
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`AuthBackend`] | current session, auth-state subscription, password sign in/up, sign out, token refresh |
//! | [`ProfileStore`] | single-row profile lookup by email on `users` |
//! | [`NoteStore`] | list / create / delete on `daily_notes` |
//! | [`ProgramStore`] | class and teacher lists for the programs tab |

use domain::{ClassInfo, DailyNote, Identity, NewDailyNote, TeacherInfo, UserProfile};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::ApiError;

/// Buffered auth events per subscriber before the oldest are skipped.
pub(crate) const EVENT_CAPACITY: usize = 16;

/// An authenticated session issued by the auth service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: String,
    #[serde(default)]
    pub expires_in: u64,
    pub user: Identity,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthEventKind {
    /// The session found when the context mounted.
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
    /// The signed-in user's record changed; the profile should be reloaded.
    UserUpdated,
}

/// A change of the backend's auth state.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthEvent {
    pub kind: AuthEventKind,
    pub session: Option<Session>,
}

impl AuthEvent {
    pub fn initial(session: Option<Session>) -> Self {
        Self {
            kind: AuthEventKind::InitialSession,
            session,
        }
    }

    pub fn signed_in(session: Session) -> Self {
        Self {
            kind: AuthEventKind::SignedIn,
            session: Some(session),
        }
    }

    pub fn signed_out() -> Self {
        Self {
            kind: AuthEventKind::SignedOut,
            session: None,
        }
    }

    pub fn refreshed(session: Session) -> Self {
        Self {
            kind: AuthEventKind::TokenRefreshed,
            session: Some(session),
        }
    }

    pub fn user_updated(session: Session) -> Self {
        Self {
            kind: AuthEventKind::UserUpdated,
            session: Some(session),
        }
    }
}

/// Receives auth events in the order they were published.
///
/// Dropping the subscription unsubscribes.
pub struct AuthSubscription {
    rx: broadcast::Receiver<AuthEvent>,
}

impl AuthSubscription {
    pub(crate) fn new(rx: broadcast::Receiver<AuthEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the next event. `None` once the backend is gone.
    pub async fn recv(&mut self) -> Option<AuthEvent> {
        loop {
            match self.rx.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "auth subscriber lagged; skipping stale events");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    pub fn unsubscribe(self) {}
}

/// Normalized email + password pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    /// Trim and lower-case the email; reject blanks before any request is made.
    pub fn new(email: &str, password: &str) -> Result<Self, ApiError> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::invalid("Enter a valid email address"));
        }
        if password.is_empty() {
            return Err(ApiError::invalid("Password is required"));
        }
        Ok(Self {
            email,
            password: password.to_string(),
        })
    }
}

#[allow(async_fn_in_trait)]
pub trait AuthBackend {
    async fn get_session(&self) -> Result<Option<Session>, ApiError>;

    fn on_auth_state_change(&self) -> AuthSubscription;

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, ApiError>;

    /// `Some` when the account is usable immediately, `None` when it awaits confirmation.
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, ApiError>;

    async fn sign_out(&self) -> Result<(), ApiError>;

    async fn refresh_session(&self) -> Result<Session, ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait ProfileStore {
    /// Exactly one profile row for `email`; [`ApiError::NoRows`] when there is none.
    async fn profile_by_email(&self, email: &str) -> Result<UserProfile, ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait NoteStore {
    /// Newest first.
    async fn list_daily_notes(&self) -> Result<Vec<DailyNote>, ApiError>;

    async fn create_daily_note(&self, note: &NewDailyNote) -> Result<DailyNote, ApiError>;

    async fn delete_daily_note(&self, id: &str) -> Result<(), ApiError>;
}

#[allow(async_fn_in_trait)]
pub trait ProgramStore {
    async fn list_classes(&self) -> Result<Vec<ClassInfo>, ApiError>;

    async fn list_teachers(&self) -> Result<Vec<TeacherInfo>, ApiError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_normalize_email() {
        let creds = Credentials::new("  Ada@Example.ORG ", "secret").unwrap();
        assert_eq!(creds.email, "ada@example.org");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_credentials_reject_blanks() {
        assert!(matches!(Credentials::new("", "x"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(Credentials::new("nobody", "x"), Err(ApiError::InvalidInput(_))));
        assert!(matches!(Credentials::new("a@b.c", ""), Err(ApiError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_subscription_in_order_and_closes() {
        let (tx, rx) = broadcast::channel(EVENT_CAPACITY);
        let mut sub = AuthSubscription::new(rx);
        tx.send(AuthEvent::signed_out()).unwrap();
        let session = Session {
            access_token: "t".to_string(),
            refresh_token: String::new(),
            expires_in: 3600,
            user: Identity {
                id: "1".to_string(),
                email: "a@b.c".to_string(),
            },
        };
        tx.send(AuthEvent::signed_in(session.clone())).unwrap();
        drop(tx);

        assert_eq!(sub.recv().await, Some(AuthEvent::signed_out()));
        assert_eq!(sub.recv().await, Some(AuthEvent::signed_in(session)));
        assert_eq!(sub.recv().await, None);
    }

    #[tokio::test]
    async fn test_lagging_subscriber_keeps_newest() {
        let (tx, rx) = broadcast::channel(2);
        let mut sub = AuthSubscription::new(rx);
        for _ in 0..5 {
            tx.send(AuthEvent::signed_out()).unwrap();
        }
        assert!(sub.recv().await.is_some());
        assert!(sub.recv().await.is_some());
        drop(tx);
        assert_eq!(sub.recv().await, None);
    }
}
