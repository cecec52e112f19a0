//! # Auth context
//!
//! [`AuthContext`] composes the session store, the [`ProfileResolver`] and the
//! permission checks behind one object with an explicit lifecycle:
//!
//! 1. [`mount`](AuthContext::mount) subscribes to auth-state changes, reads the
//!    current session once, resolves its profile, and clears `loading`
//!    whatever the outcome.
//! 2. [`next_change`](AuthContext::next_change) waits for the next auth event
//!    and applies it. Events are applied one at a time in arrival order, so a
//!    slow profile lookup for an earlier event can never overwrite the profile
//!    produced for a later one.
//! 3. [`teardown`](AuthContext::teardown) drops the subscription. Dropping the
//!    context does the same.
//!
//! Sign in, sign up and sign out go straight to the backend (the UI's
//! `AuthHandle` calls them). Local state changes arrive through the
//! subscription.

use std::collections::BTreeSet;

use domain::config::AuthConfig;
use domain::{permissions, Identity, UserProfile};

use crate::backend::{AuthBackend, AuthEvent, AuthSubscription, ProfileStore};
use crate::profile::{ProfileResolver, ProfileSource};

/// Snapshot of who is signed in.
#[derive(Clone, Debug, PartialEq)]
pub struct AuthState {
    pub identity: Option<Identity>,
    pub profile: Option<UserProfile>,
    pub profile_source: Option<ProfileSource>,
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            identity: None,
            profile: None,
            profile_source: None,
            loading: true,
        }
    }
}

impl AuthState {
    pub fn is_signed_in(&self) -> bool {
        self.identity.is_some()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        permissions::has_permission(self.profile.as_ref(), permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        permissions::has_role(self.profile.as_ref(), role)
    }

    pub fn permissions(&self) -> BTreeSet<String> {
        permissions::permissions(self.profile.as_ref())
    }

    /// Whether the profile was synthesized instead of loaded.
    pub fn is_fallback_profile(&self) -> bool {
        self.profile_source.is_some_and(ProfileSource::is_fallback)
    }

    pub fn display_name(&self) -> String {
        match (&self.profile, &self.identity) {
            (Some(profile), _) => profile.display_name(),
            (None, Some(identity)) => identity.email.clone(),
            (None, None) => String::new(),
        }
    }

    /// Avatar letters for the shell.
    pub fn initials(&self) -> String {
        match (&self.profile, &self.identity) {
            (Some(profile), _) => profile.initials(),
            (None, Some(identity)) => identity
                .email
                .chars()
                .next()
                .map(|c| c.to_uppercase().to_string())
                .unwrap_or_default(),
            (None, None) => String::new(),
        }
    }
}

pub struct AuthContext<B> {
    backend: B,
    resolver: ProfileResolver<B>,
    state: AuthState,
    subscription: Option<AuthSubscription>,
}

impl<B> AuthContext<B>
where
    B: AuthBackend + ProfileStore + Clone,
{
    pub fn new(backend: B, config: &AuthConfig) -> Self {
        Self {
            resolver: ProfileResolver::new(backend.clone(), config),
            backend,
            state: AuthState::default(),
            subscription: None,
        }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription.is_some()
    }

    pub async fn mount(&mut self) {
        // Subscribe first so nothing published during bootstrap is missed.
        self.subscription = Some(self.backend.on_auth_state_change());
        let session = match self.backend.get_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "failed to read current session");
                None
            }
        };
        self.apply(AuthEvent::initial(session)).await;
        tracing::info!(signed_in = self.state.is_signed_in(), "auth context mounted");
    }

    /// Wait for and apply the next auth event. `false` once unsubscribed or the
    /// backend has gone away.
    pub async fn next_change(&mut self) -> bool {
        let Some(subscription) = self.subscription.as_mut() else {
            return false;
        };
        let event = subscription.recv().await;
        match event {
            Some(event) => {
                self.apply(event).await;
                true
            }
            None => {
                self.subscription = None;
                false
            }
        }
    }

    pub async fn apply(&mut self, event: AuthEvent) {
        tracing::debug!(kind = ?event.kind, "applying auth event");
        self.set_identity(event.session.map(|s| s.user)).await;
        self.state.loading = false;
    }

    pub fn teardown(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("auth context torn down");
        }
    }

    async fn set_identity(&mut self, identity: Option<Identity>) {
        match identity {
            Some(identity) => {
                let (profile, source) = self.resolver.resolve_with_source(&identity.email).await;
                self.state.identity = Some(identity);
                self.state.profile = Some(profile);
                self.state.profile_source = Some(source);
            }
            None => {
                self.state.identity = None;
                self.state.profile = None;
                self.state.profile_source = None;
            }
        }
    }

    pub fn permissions(&self) -> BTreeSet<String> {
        self.state.permissions()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.state.has_permission(permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.state.has_role(role)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::backend::Session;
    use crate::{ApiError, MemoryBackend};

    fn context(backend: &MemoryBackend) -> AuthContext<MemoryBackend> {
        AuthContext::new(backend.clone(), &AuthConfig::default())
    }

    fn profile(email: &str, role: &str, permissions: &[&str]) -> UserProfile {
        UserProfile {
            id: format!("id-{email}"),
            first_name: "Pat".to_string(),
            last_name: "Kim".to_string(),
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..UserProfile::default_for(email)
        }
    }

    fn session_for(email: &str) -> Session {
        Session {
            access_token: format!("token-{email}"),
            refresh_token: String::new(),
            expires_in: 3600,
            user: Identity {
                id: format!("uid-{email}"),
                email: email.to_string(),
            },
        }
    }

    #[tokio::test]
    async fn test_starts_loading_and_mount_without_session() {
        let backend = MemoryBackend::new();
        let mut ctx = context(&backend);
        assert!(ctx.state().loading);

        ctx.mount().await;
        assert!(!ctx.state().loading);
        assert!(!ctx.state().is_signed_in());
        assert!(ctx.state().profile.is_none());
        assert!(!ctx.has_permission("all"));
        assert!(ctx.is_mounted());
    }

    #[tokio::test]
    async fn test_mount_resolves_existing_session() {
        let backend = MemoryBackend::new();
        backend.put_profile(profile("pat@example.org", "therapist", &["dailynotes.write"]));
        backend.emit(AuthEvent::signed_in(session_for("pat@example.org")));

        let mut ctx = context(&backend);
        ctx.mount().await;

        let state = ctx.state();
        assert!(!state.loading);
        assert_eq!(state.identity.as_ref().unwrap().email, "pat@example.org");
        assert_eq!(state.profile_source, Some(ProfileSource::Stored));
        assert!(ctx.has_role("therapist"));
        assert!(ctx.has_permission("dailynotes.write"));
        assert!(!ctx.has_permission("students.write"));
        assert_eq!(state.display_name(), "Pat Kim");
        assert_eq!(state.initials(), "PK");
    }

    #[tokio::test(start_paused = true)]
    async fn test_mount_finishes_loading_after_timeout() {
        let backend = MemoryBackend::new();
        backend.put_profile(profile("pat@example.org", "therapist", &[]));
        backend.delay_profile_lookups(Duration::from_secs(60));
        backend.emit(AuthEvent::signed_in(session_for("pat@example.org")));

        let mut ctx = context(&backend);
        ctx.mount().await;
        assert!(!ctx.state().loading);
        assert!(ctx.state().is_fallback_profile());
        assert!(ctx.has_role("administrator"));
        assert!(ctx.has_permission("anything"));
    }

    #[tokio::test]
    async fn test_sign_in_arrives_through_subscription() {
        let backend = MemoryBackend::new();
        backend.add_account("pat@example.org", "pw");
        backend.put_profile(profile("pat@example.org", "teacher", &["students.read"]));

        let mut ctx = context(&backend);
        ctx.mount().await;

        backend.sign_in_with_password("pat@example.org", "pw").await.unwrap();
        // Signing in does not touch local state until the event is applied.
        assert!(!ctx.state().is_signed_in());

        assert!(ctx.next_change().await);
        assert!(ctx.state().is_signed_in());
        assert!(ctx.has_role("teacher"));
        assert_eq!(
            ctx.permissions().into_iter().collect::<Vec<_>>(),
            vec!["students.read".to_string()]
        );

        backend.sign_out().await.unwrap();
        assert!(ctx.next_change().await);
        assert!(!ctx.state().is_signed_in());
        assert!(ctx.state().profile.is_none());
        assert!(ctx.state().profile_source.is_none());
    }

    #[tokio::test]
    async fn test_sign_in_errors_propagate() {
        let backend = MemoryBackend::new();
        let mut ctx = context(&backend);
        ctx.mount().await;

        let err = backend.sign_in_with_password("ghost@example.org", "pw").await.unwrap_err();
        assert!(err.is_auth());
        assert!(matches!(
            backend.sign_up("not-an-email", "pw").await,
            Err(ApiError::InvalidInput(_))
        ));
        assert!(!ctx.state().is_signed_in());
    }

    #[tokio::test]
    async fn test_events_apply_in_arrival_order() {
        let backend = MemoryBackend::new();
        backend.put_profile(profile("first@example.org", "teacher", &[]));
        backend.put_profile(profile("second@example.org", "therapist", &[]));

        let mut ctx = context(&backend);
        ctx.mount().await;
        backend.emit(AuthEvent::signed_in(session_for("first@example.org")));
        backend.emit(AuthEvent::signed_in(session_for("second@example.org")));

        assert!(ctx.next_change().await);
        assert!(ctx.has_role("teacher"));
        assert!(ctx.next_change().await);
        assert!(ctx.has_role("therapist"));
        assert_eq!(
            ctx.state().profile.as_ref().unwrap().email,
            "second@example.org"
        );
    }

    #[tokio::test]
    async fn test_missing_profile_gets_default_admin() {
        let backend = MemoryBackend::new();
        let mut ctx = context(&backend);
        ctx.mount().await;

        ctx.apply(AuthEvent::signed_in(session_for("new@example.org"))).await;
        let state = ctx.state();
        assert_eq!(state.profile_source, Some(ProfileSource::Missing));
        let profile = state.profile.as_ref().unwrap();
        assert_eq!(profile.role, "administrator");
        assert_eq!(profile.email, "new@example.org");
        assert!(state.has_permission("students.delete"));
    }

    #[tokio::test]
    async fn test_profile_edit_reloads_profile() {
        let backend = MemoryBackend::new();
        backend.put_profile(profile("pat@example.org", "teacher", &[]));
        backend.emit(AuthEvent::signed_in(session_for("pat@example.org")));
        let mut ctx = context(&backend);
        ctx.mount().await;
        assert!(ctx.has_role("teacher"));

        backend.put_profile(profile("pat@example.org", "therapist", &["forms.read"]));
        assert!(ctx.next_change().await);
        assert!(ctx.has_role("therapist"));
        assert!(ctx.has_permission("forms.read"));
        assert!(ctx.state().is_signed_in());
    }

    #[tokio::test]
    async fn test_teardown_stops_delivery() {
        let backend = MemoryBackend::new();
        let mut ctx = context(&backend);
        ctx.mount().await;
        ctx.teardown();
        assert!(!ctx.is_mounted());

        backend.emit(AuthEvent::signed_in(session_for("late@example.org")));
        assert!(!ctx.next_change().await);
        assert!(!ctx.state().is_signed_in());
    }
}
