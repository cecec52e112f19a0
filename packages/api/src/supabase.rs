//! # REST client for the hosted backend
//!
//! [`SupabaseClient`] implements every backend trait over HTTP with `reqwest`:
//!
//! | Endpoint | Used by |
//! |----------|---------|
//! | `POST /auth/v1/token?grant_type=password` | [`AuthBackend::sign_in_with_password`] |
//! | `POST /auth/v1/token?grant_type=refresh_token` | [`AuthBackend::refresh_session`] |
//! | `POST /auth/v1/signup` | [`AuthBackend::sign_up`] |
//! | `POST /auth/v1/logout` | [`AuthBackend::sign_out`] |
//! | `GET /rest/v1/users?email=eq.<email>` | [`ProfileStore::profile_by_email`] (single-object response) |
//! | `GET/POST/DELETE /rest/v1/daily_notes` | [`NoteStore`] |
//! | `GET /rest/v1/classes`, `GET /rest/v1/teachers` | [`ProgramStore`] |
//!
//! The current session is kept in memory and mirrored to a
//! [`SessionPersistence`]. A session restored at start-up is refreshed on the
//! first [`get_session`](AuthBackend::get_session) and dropped if the auth
//! service no longer accepts it. Successful sign in, sign out and refresh
//! publish an [`AuthEvent`] to every subscriber.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use domain::config::BackendConfig;
use domain::{ClassInfo, DailyNote, NewDailyNote, TeacherInfo, UserProfile};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio::sync::{broadcast, RwLock};

use crate::backend::{
    AuthBackend, AuthEvent, AuthSubscription, Credentials, NoteStore, ProfileStore, ProgramStore,
    Session, EVENT_CAPACITY,
};
use crate::persist::SessionPersistence;
use crate::ApiError;

/// PostgREST code for "single object requested, zero (or many) rows found".
const NO_ROWS_CODE: &str = "PGRST116";

#[derive(Clone)]
pub struct SupabaseClient {
    inner: Arc<Inner>,
}

struct Inner {
    http: reqwest::Client,
    url: String,
    anon_key: String,
    session: RwLock<Option<Session>>,
    persistence: SessionPersistence,
    /// Set while the session came from storage and has not been checked yet.
    restored: AtomicBool,
    events: broadcast::Sender<AuthEvent>,
}

/// Error body shapes returned by the auth service and PostgREST.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    error_description: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl ErrorBody {
    fn parse(text: &str) -> Self {
        serde_json::from_str(text).unwrap_or_default()
    }

    fn message(&self, fallback: &str) -> String {
        self.message
            .clone()
            .or_else(|| self.msg.clone())
            .or_else(|| self.error_description.clone())
            .or_else(|| self.error.clone())
            .unwrap_or_else(|| fallback.to_string())
    }

    fn is_no_rows(&self) -> bool {
        self.code.as_ref().and_then(|c| c.as_str()) == Some(NO_ROWS_CODE)
    }
}

#[derive(Clone, Copy, PartialEq)]
enum Service {
    Auth,
    Rest,
}

impl SupabaseClient {
    /// A client persisting its session the platform's default way.
    pub fn new(config: &BackendConfig) -> Self {
        Self::with_persistence(config, SessionPersistence::default())
    }

    pub fn with_persistence(config: &BackendConfig, persistence: SessionPersistence) -> Self {
        Self::with_http(config, persistence, reqwest::Client::new())
    }

    fn with_http(config: &BackendConfig, persistence: SessionPersistence, http: reqwest::Client) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let session = persistence.load();
        if let Some(session) = &session {
            tracing::debug!(email = %session.user.email, "restored stored session");
        }
        Self {
            inner: Arc::new(Inner {
                http,
                url: config.url.trim_end_matches('/').to_string(),
                anon_key: config.anon_key.clone(),
                restored: AtomicBool::new(session.is_some()),
                session: RwLock::new(session),
                persistence,
                events,
            }),
        }
    }

    fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{path}", self.inner.url)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{table}", self.inner.url)
    }

    /// Attach the API key and the user's token (or the anon key when signed out).
    async fn request(&self, method: Method, url: String) -> RequestBuilder {
        let token = self
            .inner
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.access_token.clone())
            .unwrap_or_else(|| self.inner.anon_key.clone());
        self.inner
            .http
            .request(method, url)
            .header("apikey", &self.inner.anon_key)
            .bearer_auth(token)
    }

    async fn send(&self, builder: RequestBuilder, service: Service) -> Result<Response, ApiError> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let text = response.text().await.unwrap_or_default();
        let body = ErrorBody::parse(&text);
        let status = status.as_u16();
        tracing::debug!(status, body = %text, "backend request rejected");
        if body.is_no_rows() {
            return Err(ApiError::NoRows);
        }
        let message = body.message(&format!("HTTP {status}"));
        Err(match service {
            Service::Auth => ApiError::Auth { status, message },
            Service::Rest => ApiError::Status { status, message },
        })
    }

    async fn fetch_json<T: DeserializeOwned>(&self, builder: RequestBuilder, service: Service) -> Result<T, ApiError> {
        let text = self.send(builder, service).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn set_session(&self, session: Option<Session>) {
        self.inner.persistence.save(session.as_ref());
        *self.inner.session.write().await = session;
    }

    async fn store_session(&self, session: Option<Session>, event: AuthEvent) {
        self.set_session(session).await;
        tracing::info!(kind = ?event.kind, "auth state changed");
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    async fn exchange_refresh_token(&self) -> Result<Session, ApiError> {
        let refresh_token = self
            .inner
            .session
            .read()
            .await
            .as_ref()
            .map(|s| s.refresh_token.clone())
            .ok_or(ApiError::NotSignedIn)?;
        let builder = self
            .request(Method::POST, self.auth_url("token"))
            .await
            .query(&[("grant_type", "refresh_token")])
            .json(&serde_json::json!({ "refresh_token": refresh_token }));
        self.fetch_json(builder, Service::Auth).await
    }

    /// Check a session read from storage against the auth service. A rejected
    /// session is forgotten; a network failure keeps it for the next attempt.
    async fn revalidate_restored(&self) {
        match self.exchange_refresh_token().await {
            Ok(session) => {
                tracing::debug!(email = %session.user.email, "stored session refreshed");
                self.set_session(Some(session)).await;
            }
            Err(e) if e.is_auth() => {
                tracing::info!(error = %e, "stored session rejected; signing out");
                self.set_session(None).await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not refresh stored session");
                self.inner.restored.store(true, Ordering::SeqCst);
            }
        }
    }

    async fn list<T: DeserializeOwned>(&self, table: &str, order: &str) -> Result<Vec<T>, ApiError> {
        let builder = self
            .request(Method::GET, self.rest_url(table))
            .await
            .query(&[("select", "*"), ("order", order)]);
        self.fetch_json(builder, Service::Rest).await
    }
}

impl AuthBackend for SupabaseClient {
    async fn get_session(&self) -> Result<Option<Session>, ApiError> {
        if self.inner.restored.swap(false, Ordering::SeqCst) {
            self.revalidate_restored().await;
        }
        Ok(self.inner.session.read().await.clone())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        AuthSubscription::new(self.inner.events.subscribe())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let creds = Credentials::new(email, password)?;
        tracing::debug!(email = %creds.email, "signing in");
        let builder = self
            .request(Method::POST, self.auth_url("token"))
            .await
            .query(&[("grant_type", "password")])
            .json(&creds);
        let session: Session = self.fetch_json(builder, Service::Auth).await?;
        self.store_session(Some(session.clone()), AuthEvent::signed_in(session.clone()))
            .await;
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, ApiError> {
        let creds = Credentials::new(email, password)?;
        tracing::debug!(email = %creds.email, "signing up");
        let builder = self
            .request(Method::POST, self.auth_url("signup"))
            .await
            .json(&creds);
        let body: serde_json::Value = self.fetch_json(builder, Service::Auth).await?;
        if body.get("access_token").is_none() {
            tracing::info!(email = %creds.email, "sign-up awaiting email confirmation");
            return Ok(None);
        }
        let session: Session = serde_json::from_value(body)?;
        self.store_session(Some(session.clone()), AuthEvent::signed_in(session.clone()))
            .await;
        Ok(Some(session))
    }

    /// Revokes the session server-side, then forgets it locally. A token the
    /// auth service no longer recognises still signs the user out.
    async fn sign_out(&self) -> Result<(), ApiError> {
        if self.inner.session.read().await.is_some() {
            let builder = self.request(Method::POST, self.auth_url("logout")).await;
            match self.send(builder, Service::Auth).await {
                Ok(_) => {}
                Err(e) if e.is_rejected_token() => {
                    tracing::info!(error = %e, "session already invalid on the server");
                }
                Err(e) => return Err(e),
            }
        }
        self.store_session(None, AuthEvent::signed_out()).await;
        Ok(())
    }

    async fn refresh_session(&self) -> Result<Session, ApiError> {
        let session = self.exchange_refresh_token().await?;
        self.store_session(Some(session.clone()), AuthEvent::refreshed(session.clone()))
            .await;
        Ok(session)
    }
}

impl ProfileStore for SupabaseClient {
    async fn profile_by_email(&self, email: &str) -> Result<UserProfile, ApiError> {
        let builder = self
            .request(Method::GET, self.rest_url("users"))
            .await
            .query(&[("select", "*".to_string()), ("email", format!("eq.{email}"))])
            .header("Accept", "application/vnd.pgrst.object+json");
        self.fetch_json(builder, Service::Rest).await
    }
}

impl NoteStore for SupabaseClient {
    async fn list_daily_notes(&self) -> Result<Vec<DailyNote>, ApiError> {
        self.list("daily_notes", "created_at.desc").await
    }

    async fn create_daily_note(&self, note: &NewDailyNote) -> Result<DailyNote, ApiError> {
        let builder = self
            .request(Method::POST, self.rest_url("daily_notes"))
            .await
            .header("Prefer", "return=representation")
            .json(note);
        let mut rows: Vec<DailyNote> = self.fetch_json(builder, Service::Rest).await?;
        rows.pop().ok_or(ApiError::NoRows)
    }

    async fn delete_daily_note(&self, id: &str) -> Result<(), ApiError> {
        let builder = self
            .request(Method::DELETE, self.rest_url("daily_notes"))
            .await
            .query(&[("id", format!("eq.{id}"))]);
        self.send(builder, Service::Rest).await?;
        Ok(())
    }
}

impl ProgramStore for SupabaseClient {
    async fn list_classes(&self) -> Result<Vec<ClassInfo>, ApiError> {
        self.list("classes", "name.asc").await
    }

    async fn list_teachers(&self) -> Result<Vec<TeacherInfo>, ApiError> {
        self.list("teachers", "last_name.asc").await
    }
}
