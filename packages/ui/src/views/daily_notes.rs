use api::{ApiError, NoteStore};
use dioxus::prelude::*;
use domain::notes::{self, CATEGORIES, PRIORITIES};
use domain::{DailyNote, NewDailyNote, StructuredNote};

use crate::{log_activity, use_activity_log, use_auth, use_backend, use_portal_config, LogLevel};

use super::{ModalOverlay, NoteDetail, NoteForm};

const PREVIEW_CHARS: usize = 140;
const ALL_CATEGORIES: &str = "all";

/// Decode every note's payload once per load.
pub(crate) fn decode_notes(
    list: &[DailyNote],
    fallback_category: &str,
) -> Vec<(DailyNote, StructuredNote)> {
    list.iter()
        .map(|note| {
            let structured = notes::interpret(&note.notes, Some(fallback_category));
            (note.clone(), structured)
        })
        .collect()
}

/// Case-insensitive match on student, program, author, tags and note text,
/// restricted to `category` unless it is `"all"`.
pub(crate) fn note_matches(
    note: &DailyNote,
    structured: &StructuredNote,
    query: &str,
    category: &str,
) -> bool {
    if category != ALL_CATEGORIES && structured.category != category {
        return false;
    }
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    let contains = |s: &str| s.to_lowercase().contains(&query);
    contains(&note.student_name)
        || contains(&note.program_name)
        || contains(&note.author_name)
        || display_tags(note, structured).iter().any(|t| contains(t))
        || structured.sections().iter().any(|(_, text)| contains(text))
}

/// Tags from the row when set, else those inside the payload.
pub(crate) fn display_tags(note: &DailyNote, structured: &StructuredNote) -> Vec<String> {
    if note.tags.is_empty() {
        structured.tags.clone()
    } else {
        note.tags.clone()
    }
}

/// Modal alert the user has to acknowledge.
fn blocking_alert(message: &str) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    tracing::warn!("{message}");
}

/// Delete a note and reload the list whether or not the delete went through,
/// so a row removed elsewhere disappears too. A failure goes to `alert` first.
pub(crate) async fn delete_then_reload<S: NoteStore>(
    store: &S,
    id: &str,
    mut alert: impl FnMut(&str),
    reload: impl FnOnce(),
) -> Result<(), ApiError> {
    let result = store.delete_daily_note(id).await;
    if let Err(e) = &result {
        tracing::error!(id, error = %e, "failed to delete daily note");
        alert(&format!("Could not delete the note: {e}"));
    }
    reload();
    result
}

#[component]
pub fn DailyNotesView() -> Element {
    let backend = use_backend();
    let auth = use_auth();
    let config = use_portal_config();
    let mut activity_log = use_activity_log();

    let mut search = use_signal(String::new);
    let mut category = use_signal(|| ALL_CATEGORIES.to_string());
    let mut show_form = use_signal(|| false);
    let mut form_error = use_signal(|| Option::<String>::None);
    let mut selected = use_signal(|| Option::<String>::None);

    let mut notes = use_resource({
        let backend = backend.clone();
        move || {
            let backend = backend.clone();
            async move { backend.list_daily_notes().await.map_err(|e| e.to_string()) }
        }
    });

    let on_create = use_callback({
        let backend = backend.clone();
        move |new_note: NewDailyNote| {
            let backend = backend.clone();
            spawn(async move {
                match backend.create_daily_note(&new_note).await {
                    Ok(created) => {
                        log_activity(
                            &mut activity_log,
                            LogLevel::Success,
                            &format!("Saved note for {}", created.student_name),
                        );
                        form_error.set(None);
                        show_form.set(false);
                        notes.restart();
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "failed to create daily note");
                        log_activity(&mut activity_log, LogLevel::Error, &format!("Save failed: {e}"));
                        form_error.set(Some(e.to_string()));
                    }
                }
            });
        }
    });

    let on_delete = use_callback({
        let backend = backend.clone();
        move |id: String| {
            let backend = backend.clone();
            spawn(async move {
                let reload = move || {
                    selected.set(None);
                    notes.restart();
                };
                match delete_then_reload(&backend, &id, blocking_alert, reload).await {
                    Ok(()) => log_activity(&mut activity_log, LogLevel::Info, "Deleted daily note"),
                    Err(e) => log_activity(&mut activity_log, LogLevel::Error, &format!("Delete failed: {e}")),
                }
            });
        }
    });

    let can_write = auth.has_permission("dailynotes.write");
    let can_delete = auth.has_permission("dailynotes.delete");
    let author = auth.state().display_name();
    let placeholder = config.notes.preview_placeholder.clone();

    let loaded = notes.cloned();
    let decoded = match &loaded {
        Some(Ok(list)) => decode_notes(list, &config.notes.default_category),
        _ => Vec::new(),
    };
    let detail = selected().and_then(|id| decoded.iter().find(|(n, _)| n.id == id).cloned());
    let rows: Vec<(DailyNote, StructuredNote)> = decoded
        .iter()
        .filter(|(n, s)| note_matches(n, s, &search.read(), &category.read()))
        .cloned()
        .collect();

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h1 { "Daily Notes" }
                if can_write {
                    button {
                        class: "btn btn-primary",
                        onclick: move |_| {
                            form_error.set(None);
                            show_form.set(true);
                        },
                        "New note"
                    }
                }
            }
            div {
                class: "view-toolbar",
                input {
                    class: "input",
                    r#type: "search",
                    placeholder: "Search student, program, author or text",
                    value: "{search}",
                    oninput: move |evt: FormEvent| search.set(evt.value()),
                }
                select {
                    class: "input",
                    value: "{category}",
                    onchange: move |evt: FormEvent| category.set(evt.value()),
                    option { value: ALL_CATEGORIES, "All categories" }
                    for (value, label) in CATEGORIES.iter() {
                        option { key: "{value}", value: "{value}", "{label}" }
                    }
                }
                button {
                    class: "btn",
                    onclick: move |_| notes.restart(),
                    "Refresh"
                }
            }
            {match loaded {
                None => rsx! {
                    div { class: "view-placeholder", "Loading notes..." }
                },
                Some(Err(e)) => rsx! {
                    div { class: "view-error", "Could not load notes: {e}" }
                },
                Some(Ok(_)) if rows.is_empty() => rsx! {
                    div { class: "view-placeholder", "No notes match." }
                },
                Some(Ok(_)) => rsx! {
                    div {
                        class: "note-list",
                        for (note, structured) in rows {
                            NoteCard {
                                key: "{note.id}",
                                note: note.clone(),
                                structured: structured.clone(),
                                placeholder: placeholder.clone(),
                                on_open: move |id: String| selected.set(Some(id)),
                            }
                        }
                    }
                },
            }}
        }
        if show_form() {
            ModalOverlay {
                title: "New daily note",
                wide: true,
                on_close: move |_| show_form.set(false),
                if let Some(err) = form_error() {
                    div { class: "form-error", "{err}" }
                }
                NoteForm {
                    author_name: author.clone(),
                    on_create: on_create,
                    on_cancel: move |_| show_form.set(false),
                }
            }
        }
        if let Some((note, structured)) = detail {
            ModalOverlay {
                title: "{note.student_name}",
                wide: true,
                on_close: move |_| selected.set(None),
                NoteDetail {
                    note: note.clone(),
                    structured: structured.clone(),
                    can_delete: can_delete,
                    on_delete: on_delete,
                }
            }
        }
    }
}

/// One row of the notes list.
#[component]
fn NoteCard(
    note: DailyNote,
    structured: StructuredNote,
    placeholder: String,
    on_open: EventHandler<String>,
) -> Element {
    let preview = notes::one_line(notes::summarize_or(&structured, &placeholder), PREVIEW_CHARS);
    let category = notes::label_for(CATEGORIES, &structured.category).to_string();
    let priority = notes::label_for(PRIORITIES, &structured.priority).to_string();
    let date = note.created_at.format("%b %-d, %Y").to_string();
    let tags = display_tags(&note, &structured);
    let id = note.id.clone();

    rsx! {
        div {
            class: if structured.is_high_priority() { "note-card note-card--urgent" } else { "note-card" },
            onclick: move |_| on_open.call(id.clone()),
            div {
                class: "note-card-header",
                span { class: "note-card-student", "{note.student_name}" }
                span { class: "note-card-date", "{date}" }
            }
            div {
                class: "note-card-meta",
                span { class: "badge", "{category}" }
                span { class: "badge badge-{structured.priority}", "{priority}" }
                if !note.program_name.is_empty() {
                    span { class: "note-card-program", "{note.program_name}" }
                }
                if structured.follow_up_needed {
                    span { class: "badge badge-follow-up", "Follow-up" }
                }
            }
            p { class: "note-card-preview", "{preview}" }
            if !tags.is_empty() {
                div {
                    class: "note-card-tags",
                    for tag in tags {
                        span { key: "{tag}", class: "tag", "#{tag}" }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use api::MemoryBackend;
    use chrono::Utc;

    fn note(student: &str, raw: &str, tags: &[&str]) -> DailyNote {
        DailyNote {
            id: format!("n-{student}"),
            student_name: student.to_string(),
            program_name: "Early Learning".to_string(),
            author_name: "Ada Byron".to_string(),
            created_at: Utc::now(),
            notes: raw.to_string(),
            tags: tags.iter().map(|t| t.to_string()).collect(),
        }
    }

    #[test]
    fn test_decode_uses_fallback_category_for_plain_text() {
        let list = vec![note("Sam", "Great day", &[])];
        let decoded = decode_notes(&list, "academic");
        assert_eq!(decoded[0].1.category, "academic");
        assert_eq!(decoded[0].1.general_notes, "Great day");
    }

    #[test]
    fn test_filter_by_category_and_query() {
        let list = vec![
            note("Sam", r#"{"category":"social","generalNotes":"Shared blocks"}"#, &[]),
            note("Lee", r#"{"category":"medical","generalNotes":"Nurse visit"}"#, &["health"]),
        ];
        let decoded = decode_notes(&list, "other");
        let hits = |q: &str, c: &str| {
            decoded
                .iter()
                .filter(|(n, s)| note_matches(n, s, q, c))
                .map(|(n, _)| n.student_name.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(hits("", "all"), vec!["Sam", "Lee"]);
        assert_eq!(hits("", "social"), vec!["Sam"]);
        assert_eq!(hits("BLOCKS", "all"), vec!["Sam"]);
        assert_eq!(hits("health", "all"), vec!["Lee"]);
        assert_eq!(hits("nurse", "social"), Vec::<String>::new());
        assert_eq!(hits("early", "all").len(), 2);
    }

    #[test]
    fn test_display_tags_prefers_row_tags() {
        let with_row = note("Sam", r#"{"tags":["inner"]}"#, &["outer"]);
        let s = notes::interpret(&with_row.notes, None);
        assert_eq!(display_tags(&with_row, &s), vec!["outer"]);

        let without_row = note("Sam", r#"{"tags":["inner"]}"#, &[]);
        let s = notes::interpret(&without_row.notes, None);
        assert_eq!(display_tags(&without_row, &s), vec!["inner"]);
    }

    #[tokio::test]
    async fn test_failed_delete_alerts_and_still_reloads() {
        let backend = MemoryBackend::demo();
        backend.fail_deletes("permission denied for table daily_notes");
        let mut alerts = Vec::new();
        let mut reloaded = false;

        let result = delete_then_reload(&backend, "n-1", |m| alerts.push(m.to_string()), || reloaded = true).await;

        assert!(matches!(result, Err(ApiError::Status { status: 500, .. })));
        assert_eq!(alerts.len(), 1);
        assert!(alerts[0].contains("permission denied"));
        assert!(reloaded);
        assert_eq!(backend.list_daily_notes().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_delete_reloads_without_alert() {
        let backend = MemoryBackend::demo();
        let mut alerts = Vec::new();
        let mut reloads = 0;

        delete_then_reload(&backend, "n-1", |m| alerts.push(m.to_string()), || reloads += 1)
            .await
            .unwrap();

        assert!(alerts.is_empty());
        assert_eq!(reloads, 1);
        let ids: Vec<String> = backend.list_daily_notes().await.unwrap().into_iter().map(|n| n.id).collect();
        assert!(!ids.contains(&"n-1".to_string()));
    }

    #[tokio::test]
    async fn test_deleting_vanished_note_alerts_and_reloads() {
        let backend = MemoryBackend::demo();
        let mut alerts = Vec::new();
        let mut reloaded = false;

        let result = delete_then_reload(&backend, "gone", |m| alerts.push(m.to_string()), || reloaded = true).await;

        assert!(matches!(result, Err(ApiError::NoRows)));
        assert_eq!(alerts.len(), 1);
        assert!(reloaded);
    }
}
