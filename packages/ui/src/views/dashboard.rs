use api::NoteStore;
use dioxus::prelude::*;
use domain::notes::{self, CATEGORIES};
use domain::{DailyNote, StructuredNote, Tab};

use crate::{use_auth, use_backend, use_portal_config};

use super::daily_notes::decode_notes;

const RECENT_NOTES: usize = 5;

/// Headline counts over the loaded daily notes.
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct NoteStats {
    pub total: usize,
    pub high_priority: usize,
    pub follow_ups: usize,
    pub parent_contacts: usize,
}

impl NoteStats {
    pub(crate) fn collect(notes: &[(DailyNote, StructuredNote)]) -> Self {
        notes.iter().fold(Self::default(), |mut stats, (_, s)| {
            stats.total += 1;
            stats.high_priority += usize::from(s.is_high_priority());
            stats.follow_ups += usize::from(s.follow_up_needed);
            stats.parent_contacts += usize::from(s.parent_contacted);
            stats
        })
    }
}

#[component]
pub fn DashboardView(on_select: EventHandler<Tab>) -> Element {
    let backend = use_backend();
    let auth = use_auth();
    let config = use_portal_config();
    let state = auth.state();

    let notes = use_resource(move || {
        let backend = backend.clone();
        async move { backend.list_daily_notes().await.map_err(|e| e.to_string()) }
    });

    let first_name = state
        .profile
        .as_ref()
        .map(|p| p.first_name.clone())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| state.display_name());
    let role = state.profile.as_ref().map(|p| p.role.clone()).unwrap_or_default();

    let loaded = notes.cloned();
    let mut decoded = match &loaded {
        Some(Ok(list)) => decode_notes(list, &config.notes.default_category),
        _ => Vec::new(),
    };
    let stats = NoteStats::collect(&decoded);
    decoded.sort_by(|a, b| b.0.created_at.cmp(&a.0.created_at));
    let recent: Vec<(String, String, &'static str, String)> = decoded
        .iter()
        .take(RECENT_NOTES)
        .map(|(note, structured)| {
            (
                note.id.clone(),
                note.student_name.clone(),
                category_label(&structured.category),
                notes::one_line(
                    notes::summarize_or(structured, &config.notes.preview_placeholder),
                    80,
                ),
            )
        })
        .collect();

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h1 { "Welcome back, {first_name}" }
                if !role.is_empty() {
                    span { class: "badge", "{role}" }
                }
            }
            if state.is_fallback_profile() {
                div {
                    class: "view-warning",
                    "Your staff profile could not be loaded. Showing default account details."
                }
            }
            div {
                class: "stat-grid",
                StatCard { label: "Daily notes", value: stats.total }
                StatCard { label: "High priority", value: stats.high_priority }
                StatCard { label: "Follow-ups", value: stats.follow_ups }
                StatCard { label: "Parent contacts", value: stats.parent_contacts }
            }
            div {
                class: "view-section",
                div {
                    class: "view-section-header",
                    h2 { "Recent notes" }
                    button {
                        class: "btn",
                        onclick: move |_| on_select.call(Tab::DailyNotes),
                        "Open daily notes"
                    }
                }
                {match loaded {
                    None => rsx! { p { class: "view-placeholder", "Loading..." } },
                    Some(Err(e)) => rsx! { p { class: "view-error", "Could not load notes: {e}" } },
                    Some(Ok(_)) if recent.is_empty() => rsx! {
                        p { class: "view-placeholder", "No daily notes yet." }
                    },
                    Some(Ok(_)) => rsx! {
                        ul {
                            class: "recent-notes",
                            for (id, student, category, preview) in recent {
                                li {
                                    key: "{id}",
                                    span { class: "recent-notes-student", "{student}" }
                                    span { class: "badge", "{category}" }
                                    span { class: "recent-notes-preview", "{preview}" }
                                }
                            }
                        }
                    },
                }}
            }
        }
    }
}

/// Label of a category value, or "Other" for values outside the table.
fn category_label(value: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or("Other")
}

#[component]
fn StatCard(label: String, value: usize) -> Element {
    rsx! {
        div {
            class: "stat-card",
            span { class: "stat-card-value", "{value}" }
            span { class: "stat-card-label", "{label}" }
        }
    }
}
