use api::ProfileSource;
use dioxus::prelude::*;

use crate::{use_auth, SignOutButton};

use super::ModalOverlay;

/// Current user's profile, shown over the active view.
#[component]
pub fn ProfileOverlay(on_close: EventHandler<()>) -> Element {
    let state = use_auth().state();

    let notice = match state.profile_source {
        Some(ProfileSource::Missing) => Some("No staff profile exists for this account yet."),
        Some(ProfileSource::TimedOut) => Some("The profile service did not answer in time."),
        Some(ProfileSource::Failed) => Some("The profile service returned an error."),
        _ => None,
    };

    let Some(profile) = state.profile.clone() else {
        return rsx! {
            ModalOverlay {
                title: "Profile",
                on_close: on_close,
                p { class: "view-placeholder", "Not signed in." }
            }
        };
    };

    let permissions: Vec<String> = profile.permissions.iter().cloned().collect();
    let initials = profile.initials();
    let name = profile.display_name();

    rsx! {
        ModalOverlay {
            title: "Profile",
            on_close: on_close,
            div {
                class: "profile-card",
                div { class: "profile-avatar", "{initials}" }
                div {
                    h3 { "{name}" }
                    p { class: "muted", "{profile.email}" }
                }
            }
            if let Some(notice) = notice {
                div {
                    class: "view-warning",
                    "{notice} Default account details are shown until it can be loaded."
                }
            }
            dl {
                class: "note-detail-meta",
                dt { "Role" }
                dd { "{profile.role}" }
                if let Some(department) = profile.department.clone() {
                    dt { "Department" }
                    dd { "{department}" }
                }
                if let Some(phone) = profile.phone.clone() {
                    dt { "Phone" }
                    dd { "{phone}" }
                }
                dt { "Status" }
                dd { "{profile.status}" }
                dt { "Permissions" }
                dd {
                    if permissions.is_empty() {
                        span { class: "muted", "None" }
                    }
                    for permission in permissions {
                        span { key: "{permission}", class: "tag", "{permission}" }
                    }
                }
            }
            div {
                class: "form-actions",
                SignOutButton { class: "btn btn-danger" }
            }
        }
    }
}
