use dioxus::prelude::*;
use domain::notes::{label_for, CATEGORIES, MOODS, PRIORITIES};
use domain::{DailyNote, StructuredNote};

use super::daily_notes::display_tags;

/// Read-only view of one note, with delete behind a confirmation step.
#[component]
pub fn NoteDetail(
    note: DailyNote,
    structured: StructuredNote,
    can_delete: bool,
    on_delete: EventHandler<String>,
) -> Element {
    let mut confirming = use_signal(|| false);

    let date = note.created_at.format("%A, %B %-d %Y at %H:%M").to_string();
    let category = label_for(CATEGORIES, &structured.category).to_string();
    let mood = label_for(MOODS, &structured.overall_mood).to_string();
    let priority = label_for(PRIORITIES, &structured.priority).to_string();
    let tags = display_tags(&note, &structured);
    let sections: Vec<(&'static str, String)> = structured
        .sections()
        .iter()
        .filter(|(_, text)| !text.trim().is_empty())
        .map(|(label, text)| (*label, text.to_string()))
        .collect();
    let id = note.id.clone();

    rsx! {
        div {
            class: "note-detail",
            dl {
                class: "note-detail-meta",
                dt { "Date" }
                dd { "{date}" }
                if !note.program_name.is_empty() {
                    dt { "Program" }
                    dd { "{note.program_name}" }
                }
                if !note.author_name.is_empty() {
                    dt { "Author" }
                    dd { "{note.author_name}" }
                }
                dt { "Category" }
                dd { "{category}" }
                dt { "Mood" }
                dd { "{mood}" }
                dt { "Priority" }
                dd { "{priority}" }
            }
            if sections.is_empty() {
                p { class: "view-placeholder", "No notes recorded" }
            }
            for (label, text) in sections {
                section {
                    key: "{label}",
                    class: "note-detail-section",
                    h3 { "{label}" }
                    p { "{text}" }
                }
            }
            if structured.parent_contacted {
                section {
                    class: "note-detail-section",
                    h3 { "Parent contact" }
                    p {
                        if structured.parent_contact_notes.is_empty() {
                            "Parent was contacted."
                        } else {
                            "{structured.parent_contact_notes}"
                        }
                    }
                }
            }
            if structured.follow_up_needed {
                section {
                    class: "note-detail-section note-detail-section--follow-up",
                    h3 { "Follow-up" }
                    p {
                        if structured.follow_up_assignee.is_empty() {
                            "Unassigned"
                        } else {
                            "Assigned to {structured.follow_up_assignee}"
                        }
                    }
                }
            }
            if !tags.is_empty() {
                div {
                    class: "note-card-tags",
                    for tag in tags {
                        span { key: "{tag}", class: "tag", "#{tag}" }
                    }
                }
            }
            if can_delete {
                div {
                    class: "form-actions",
                    if confirming() {
                        span { class: "form-error", "Delete this note permanently?" }
                        button {
                            class: "btn",
                            onclick: move |_| confirming.set(false),
                            "Keep"
                        }
                        button {
                            class: "btn btn-danger",
                            onclick: move |_| {
                                confirming.set(false);
                                on_delete.call(id.clone());
                            },
                            "Delete"
                        }
                    } else {
                        button {
                            class: "btn btn-danger",
                            onclick: move |_| confirming.set(true),
                            "Delete note"
                        }
                    }
                }
            }
        }
    }
}
