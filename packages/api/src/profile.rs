//! # Profile resolution
//!
//! Maps an authenticated email to its [`UserProfile`]. The lookup races a
//! timer (5 seconds by default); whichever finishes first wins and the other
//! future is dropped. A late lookup is therefore cancelled, not left running in
//! the background with its result ignored. Callers see the same outcome either
//! way, but the request may be aborted mid-flight.
//!
//! Resolution never fails. A timeout, a missing row or any other error yields
//! the configured fallback profile:
//!
//! - [`FallbackProfile::Administrator`]: `Demo User`, role `administrator`,
//!   permissions `["all"]`.
//! - [`FallbackProfile::Restricted`]: role `guest`, no permissions.

use std::future::Future;
use std::time::Duration;

use domain::config::AuthConfig;
use domain::{FallbackProfile, UserProfile};
use futures::future::{self, Either};

use crate::backend::ProfileStore;
use crate::ApiError;

/// Where a resolved profile came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProfileSource {
    Stored,
    Missing,
    TimedOut,
    Failed,
}

impl ProfileSource {
    pub fn is_fallback(self) -> bool {
        self != ProfileSource::Stored
    }
}

pub struct ProfileResolver<S> {
    store: S,
    timeout: Duration,
    fallback: FallbackProfile,
}

impl<S: ProfileStore> ProfileResolver<S> {
    pub fn new(store: S, config: &AuthConfig) -> Self {
        Self {
            store,
            timeout: Duration::from_secs(config.profile_timeout_secs),
            fallback: config.fallback_profile,
        }
    }

    pub async fn resolve(&self, email: &str) -> UserProfile {
        self.resolve_with_source(email).await.0
    }

    pub async fn resolve_with_source(&self, email: &str) -> (UserProfile, ProfileSource) {
        let source = match with_timeout(self.timeout, self.store.profile_by_email(email)).await {
            Some(Ok(profile)) => {
                tracing::debug!(email, role = %profile.role, "profile loaded");
                return (profile, ProfileSource::Stored);
            }
            Some(Err(ApiError::NoRows)) => {
                tracing::warn!(email, "no profile row; using fallback profile");
                ProfileSource::Missing
            }
            Some(Err(e)) => {
                tracing::warn!(email, error = %e, "profile lookup failed; using fallback profile");
                ProfileSource::Failed
            }
            None => {
                tracing::warn!(email, timeout = ?self.timeout, "profile lookup timed out; using fallback profile");
                ProfileSource::TimedOut
            }
        };
        (self.fallback_for(email), source)
    }

    fn fallback_for(&self, email: &str) -> UserProfile {
        match self.fallback {
            FallbackProfile::Administrator => UserProfile::default_for(email),
            FallbackProfile::Restricted => UserProfile::restricted_for(email),
        }
    }
}

/// Run `fut` against a timer; `None` if the timer fires first.
pub async fn with_timeout<F: Future>(timeout: Duration, fut: F) -> Option<F::Output> {
    let fut = std::pin::pin!(fut);
    let timer = std::pin::pin!(sleep(timeout));
    match future::select(fut, timer).await {
        Either::Left((output, _)) => Some(output),
        Either::Right(_) => None,
    }
}

/// Platform timer: `gloo-timers` in the browser, tokio natively.
pub async fn sleep(duration: Duration) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(duration).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(duration).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBackend;

    fn resolver(backend: &MemoryBackend, fallback: FallbackProfile) -> ProfileResolver<MemoryBackend> {
        let config = AuthConfig {
            fallback_profile: fallback,
            ..AuthConfig::default()
        };
        ProfileResolver::new(backend.clone(), &config)
    }

    fn teacher(email: &str) -> UserProfile {
        UserProfile {
            id: "t-1".to_string(),
            first_name: "Grace".to_string(),
            last_name: "Hopper".to_string(),
            role: "teacher".to_string(),
            permissions: ["students.read".to_string()].into(),
            ..UserProfile::default_for(email)
        }
    }

    #[tokio::test]
    async fn test_stored_profile_is_used_verbatim() {
        let backend = MemoryBackend::new();
        backend.put_profile(teacher("grace@example.org"));

        let (profile, source) = resolver(&backend, FallbackProfile::Administrator)
            .resolve_with_source("grace@example.org")
            .await;
        assert_eq!(profile, teacher("grace@example.org"));
        assert_eq!(source, ProfileSource::Stored);
    }

    #[tokio::test]
    async fn test_missing_row_falls_back_to_default() {
        let backend = MemoryBackend::new();
        for email in ["nobody@example.org", "", "MiXeD@Example.org"] {
            let (profile, source) = resolver(&backend, FallbackProfile::Administrator)
                .resolve_with_source(email)
                .await;
            assert_eq!(source, ProfileSource::Missing);
            assert_eq!(profile.role, "administrator");
            assert_eq!(profile.email, email);
            assert_eq!(profile.permissions.iter().collect::<Vec<_>>(), vec!["all"]);
        }
    }

    #[tokio::test]
    async fn test_store_error_falls_back() {
        let backend = MemoryBackend::new();
        backend.put_profile(teacher("grace@example.org"));
        backend.fail_profile_lookups("connection reset");

        let (profile, source) = resolver(&backend, FallbackProfile::Administrator)
            .resolve_with_source("grace@example.org")
            .await;
        assert_eq!(source, ProfileSource::Failed);
        assert_eq!(profile, UserProfile::default_for("grace@example.org"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_lookup_times_out() {
        let backend = MemoryBackend::new();
        backend.put_profile(teacher("grace@example.org"));
        backend.delay_profile_lookups(Duration::from_secs(30));

        let started = tokio::time::Instant::now();
        let (profile, source) = resolver(&backend, FallbackProfile::Administrator)
            .resolve_with_source("grace@example.org")
            .await;
        assert_eq!(source, ProfileSource::TimedOut);
        assert_eq!(profile.first_name, "Demo");
        assert_eq!(started.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookup_just_inside_window_wins() {
        let backend = MemoryBackend::new();
        backend.put_profile(teacher("grace@example.org"));
        backend.delay_profile_lookups(Duration::from_millis(4_900));

        let (_, source) = resolver(&backend, FallbackProfile::Administrator)
            .resolve_with_source("grace@example.org")
            .await;
        assert_eq!(source, ProfileSource::Stored);
    }

    #[tokio::test]
    async fn test_restricted_fallback() {
        let backend = MemoryBackend::new();
        let profile = resolver(&backend, FallbackProfile::Restricted)
            .resolve("stranger@example.org")
            .await;
        assert_eq!(profile.role, "guest");
        assert!(profile.permissions.is_empty());
        assert_eq!(profile.email, "stranger@example.org");
    }
}
