use dioxus::prelude::*;

use api::config::{backend_for, load_config};
use domain::PortalConfig;
use ui::{ActivityLog, AuthProvider, Portal};

const PORTAL_TOML: &str = include_str!("../portal.toml");

fn main() {
    dioxus::launch(App);
}

/// Embedded config plus backend credentials baked in at build time.
fn portal_config() -> PortalConfig {
    let config = load_config(PORTAL_TOML);
    match (option_env!("SUPABASE_URL"), option_env!("SUPABASE_ANON_KEY")) {
        (Some(url), Some(key)) if !url.is_empty() => config.with_backend(url, key),
        _ => config,
    }
}

#[component]
fn App() -> Element {
    let config = use_context_provider(portal_config);
    use_context_provider(|| backend_for(&config));
    use_context_provider(|| Signal::new(ActivityLog::default()));

    use_hook(|| tracing::info!(demo = !config.has_backend(), "portal starting"));

    rsx! {
        AuthProvider {
            auth_config: config.auth.clone(),
            Portal {}
        }
    }
}
