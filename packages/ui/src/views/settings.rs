use dioxus::prelude::*;
use domain::FallbackProfile;

use crate::{use_activity_log, use_auth, use_backend, use_portal_config, SignOutButton};

/// Account and connection details. Read-only: configuration comes from
/// `portal.toml` and the environment at startup.
#[component]
pub fn SettingsView() -> Element {
    let auth = use_auth();
    let backend = use_backend();
    let config = use_portal_config();
    let mut activity_log = use_activity_log();

    let state = auth.state();
    let email = state.identity.as_ref().map(|i| i.email.clone()).unwrap_or_default();
    let role = state.profile.as_ref().map(|p| p.role.clone()).unwrap_or_default();
    let permissions: Vec<String> = auth.permissions().into_iter().collect();

    let connection = if backend.is_demo() {
        "Demo mode (in-memory data, reset on reload)".to_string()
    } else {
        config.backend.url.clone()
    };
    let fallback = match config.auth.fallback_profile {
        FallbackProfile::Administrator => "Full access (Demo User, administrator)",
        FallbackProfile::Restricted => "Restricted (guest, no permissions)",
    };
    let timeout = config.auth.profile_timeout_secs;
    let log_visible = activity_log.read().visible;
    let log_size = activity_log.read().entries.len();

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h1 { "Settings" }
            }
            section {
                class: "view-section",
                h2 { "Account" }
                dl {
                    class: "note-detail-meta",
                    dt { "Email" }
                    dd { "{email}" }
                    dt { "Role" }
                    dd { "{role}" }
                    dt { "Permissions" }
                    dd {
                        for permission in permissions {
                            span { key: "{permission}", class: "tag", "{permission}" }
                        }
                    }
                }
                SignOutButton { class: "btn btn-danger" }
            }
            section {
                class: "view-section",
                h2 { "Connection" }
                dl {
                    class: "note-detail-meta",
                    dt { "Backend" }
                    dd { "{connection}" }
                    dt { "Profile lookup timeout" }
                    dd { "{timeout} s" }
                    dt { "When the profile is unavailable" }
                    dd { "{fallback}" }
                }
            }
            section {
                class: "view-section",
                h2 { "Daily notes" }
                dl {
                    class: "note-detail-meta",
                    dt { "Category for plain-text notes" }
                    dd { "{config.notes.default_category}" }
                    dt { "Empty note preview" }
                    dd { "{config.notes.preview_placeholder}" }
                }
            }
            section {
                class: "view-section",
                h2 { "Activity log" }
                p { class: "muted", "{log_size} entries this session." }
                div {
                    class: "form-actions",
                    button {
                        class: "btn",
                        onclick: move |_| {
                            let mut log = activity_log.write();
                            log.visible = !log.visible;
                        },
                        if log_visible { "Hide log" } else { "Show log" }
                    }
                    button {
                        class: "btn",
                        onclick: move |_| activity_log.write().entries.clear(),
                        "Clear"
                    }
                }
            }
        }
    }
}
