//! Configuration loading for the client.
//!
//! The application embeds `portal.toml` at build time. On native targets the
//! backend location may be overridden from the environment (a `.env` file is
//! honoured through `dotenvy`):
//!
//! - `SUPABASE_URL`
//! - `SUPABASE_ANON_KEY`

use domain::PortalConfig;

use crate::{Backend, MemoryBackend, SupabaseClient};

/// Parse the embedded config, falling back to defaults when it is malformed.
pub fn load_config(embedded: &str) -> PortalConfig {
    let config = match PortalConfig::from_toml(embedded) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "invalid {}; using defaults", PortalConfig::filename());
            PortalConfig::default()
        }
    };
    with_env_overrides(config)
}

#[cfg(not(target_arch = "wasm32"))]
fn with_env_overrides(config: PortalConfig) -> PortalConfig {
    dotenvy::dotenv().ok();
    match (std::env::var("SUPABASE_URL"), std::env::var("SUPABASE_ANON_KEY")) {
        (Ok(url), Ok(key)) => config.with_backend(url, key),
        _ => config,
    }
}

#[cfg(target_arch = "wasm32")]
fn with_env_overrides(config: PortalConfig) -> PortalConfig {
    config
}

/// The REST client when a backend is configured, the seeded demo backend otherwise.
pub fn backend_for(config: &PortalConfig) -> Backend {
    if config.has_backend() {
        tracing::info!(url = %config.backend.url, "using hosted backend");
        Backend::Supabase(SupabaseClient::new(&config.backend))
    } else {
        tracing::warn!("no backend configured; running against the in-memory demo backend");
        Backend::Memory(MemoryBackend::demo())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_config_uses_defaults() {
        let config = load_config("[auth\nprofile_timeout_secs = ");
        assert_eq!(config.auth, PortalConfig::default().auth);
    }

    #[test]
    fn test_backend_choice() {
        let demo = PortalConfig::default();
        assert!(matches!(backend_for(&demo), Backend::Memory(_)));

        let hosted = PortalConfig::default().with_backend("https://x.supabase.co", "anon");
        assert!(matches!(backend_for(&hosted), Backend::Supabase(_)));
    }
}
