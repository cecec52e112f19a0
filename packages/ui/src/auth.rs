//! Authentication context and hooks for the UI.
//!
//! [`AuthProvider`] runs an [`api::AuthContext`] for as long as it is mounted
//! and mirrors its state into a `Signal<AuthState>`. Components read it
//! through [`use_auth`].

use std::collections::BTreeSet;
use std::time::Duration;

use api::{ApiError, AuthBackend, AuthContext, AuthState, Backend};
use dioxus::prelude::*;
use domain::config::AuthConfig;

/// How often a signed-in session's access token is refreshed.
const TOKEN_REFRESH_INTERVAL: Duration = Duration::from_secs(45 * 60);

/// The backend provided at the application root.
pub fn use_backend() -> Backend {
    use_context::<Backend>()
}

/// Auth state plus the sign-in/up/out operations.
#[derive(Clone)]
pub struct AuthHandle {
    state: Signal<AuthState>,
    backend: Backend,
}

/// Get the current authentication state.
/// Re-renders the caller when the user signs in or out.
pub fn use_auth() -> AuthHandle {
    AuthHandle {
        state: use_context::<Signal<AuthState>>(),
        backend: use_backend(),
    }
}

impl AuthHandle {
    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.state.read().has_permission(permission)
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.state.read().has_role(role)
    }

    pub fn permissions(&self) -> BTreeSet<String> {
        self.state.read().permissions()
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), ApiError> {
        self.backend.sign_in_with_password(email, password).await.map(|_| ())
    }

    /// `true` when the new account is signed in right away.
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<bool, ApiError> {
        self.backend.sign_up(email, password).await.map(|s| s.is_some())
    }

    pub async fn sign_out(&self) -> Result<(), ApiError> {
        self.backend.sign_out().await
    }
}

/// Provider component that manages authentication state.
/// Wrap your app with this component to enable authentication.
#[component]
pub fn AuthProvider(auth_config: AuthConfig, children: Element) -> Element {
    let backend = use_backend();
    let mut auth_state = use_context_provider(|| Signal::new(AuthState::default()));

    // Session bootstrap, then one state update per auth event. The task is
    // dropped with this component, which unsubscribes.
    let _session = use_future({
        let backend = backend.clone();
        move || {
            let backend = backend.clone();
            let config = auth_config.clone();
            async move {
                let mut ctx = AuthContext::new(backend, &config);
                ctx.mount().await;
                auth_state.set(ctx.state().clone());
                while ctx.next_change().await {
                    auth_state.set(ctx.state().clone());
                }
                tracing::debug!("auth subscription closed");
            }
        }
    });

    let _refresh = use_future(move || {
        let backend = backend.clone();
        async move {
            loop {
                api::profile::sleep(TOKEN_REFRESH_INTERVAL).await;
                if !auth_state.peek().is_signed_in() {
                    continue;
                }
                if let Err(e) = backend.refresh_session().await {
                    tracing::warn!(error = %e, "session refresh failed");
                }
            }
        }
    });

    use_drop(|| tracing::debug!("auth provider unmounted"));

    rsx! {
        {children}
    }
}

/// Button to sign the current user out.
#[component]
pub fn SignOutButton(
    #[props(default = "Sign out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let auth = use_auth();
    let mut log = crate::use_activity_log();

    let onclick = move |_| {
        let auth = auth.clone();
        async move {
            if let Err(e) = auth.sign_out().await {
                tracing::error!(error = %e, "sign out failed");
                crate::log_activity(&mut log, crate::LogLevel::Error, &format!("Sign out failed: {e}"));
            }
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
