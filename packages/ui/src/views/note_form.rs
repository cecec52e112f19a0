use dioxus::prelude::*;
use domain::notes::{CATEGORIES, MOODS, PRIORITIES};
use domain::{NewDailyNote, StructuredNote};

/// Text section `index` in the order of [`StructuredNote::sections`].
fn section_mut(note: &mut StructuredNote, index: usize) -> &mut String {
    match index {
        0 => &mut note.general_notes,
        1 => &mut note.behavior_notes,
        2 => &mut note.academic_progress,
        3 => &mut note.social_interaction,
        4 => &mut note.activities_participated,
        5 => &mut note.achievements_successes,
        _ => &mut note.concerns_challenges,
    }
}

/// Split a comma separated tag field. Leading `#` is dropped and duplicates
/// are removed.
pub(crate) fn parse_tags(input: &str) -> Vec<String> {
    let mut tags: Vec<String> = Vec::new();
    for tag in input.split(',') {
        let tag = tag.trim().trim_start_matches('#').trim().to_lowercase();
        if !tag.is_empty() && !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

/// Assemble the insert row. The payload carries the tags as well so it
/// stands on its own.
pub(crate) fn build_note(
    student: &str,
    program: &str,
    author: &str,
    tags_input: &str,
    draft: &StructuredNote,
) -> Result<NewDailyNote, String> {
    let student = student.trim();
    if student.is_empty() {
        return Err("Student name is required".to_string());
    }
    let tags = parse_tags(tags_input);
    let payload = StructuredNote {
        tags: tags.clone(),
        ..draft.clone()
    };
    Ok(NewDailyNote {
        student_name: student.to_string(),
        program_name: program.trim().to_string(),
        author_name: author.to_string(),
        notes: payload.to_json(),
        tags,
    })
}

/// Structured daily note editor.
#[component]
pub fn NoteForm(
    author_name: String,
    on_create: EventHandler<NewDailyNote>,
    on_cancel: EventHandler<()>,
) -> Element {
    let mut draft = use_signal(StructuredNote::default);
    let mut student = use_signal(String::new);
    let mut program = use_signal(String::new);
    let mut tags = use_signal(String::new);
    let mut error = use_signal(|| Option::<String>::None);

    let sections: Vec<(usize, &'static str, String)> = draft
        .read()
        .sections()
        .iter()
        .enumerate()
        .map(|(i, (label, value))| (i, *label, value.to_string()))
        .collect();
    let current = draft.read().clone();

    let submit = move |_| {
        match build_note(&student.read(), &program.read(), &author_name, &tags.read(), &draft.read()) {
            Ok(note) => {
                error.set(None);
                on_create.call(note);
            }
            Err(message) => error.set(Some(message)),
        }
    };

    rsx! {
        div {
            class: "note-form",
            div {
                class: "form-row",
                label {
                    "Student"
                    input {
                        class: "input",
                        value: "{student}",
                        oninput: move |evt: FormEvent| student.set(evt.value()),
                    }
                }
                label {
                    "Program"
                    input {
                        class: "input",
                        value: "{program}",
                        oninput: move |evt: FormEvent| program.set(evt.value()),
                    }
                }
            }
            div {
                class: "form-row",
                label {
                    "Category"
                    select {
                        class: "input",
                        value: "{current.category}",
                        onchange: move |evt: FormEvent| draft.write().category = evt.value(),
                        for (value, label) in CATEGORIES.iter() {
                            option { key: "{value}", value: "{value}", "{label}" }
                        }
                    }
                }
                label {
                    "Overall mood"
                    select {
                        class: "input",
                        value: "{current.overall_mood}",
                        onchange: move |evt: FormEvent| draft.write().overall_mood = evt.value(),
                        for (value, label) in MOODS.iter() {
                            option { key: "{value}", value: "{value}", "{label}" }
                        }
                    }
                }
                label {
                    "Priority"
                    select {
                        class: "input",
                        value: "{current.priority}",
                        onchange: move |evt: FormEvent| draft.write().priority = evt.value(),
                        for (value, label) in PRIORITIES.iter() {
                            option { key: "{value}", value: "{value}", "{label}" }
                        }
                    }
                }
            }
            for (index, label, value) in sections {
                label {
                    key: "{index}",
                    class: "form-section",
                    "{label}"
                    textarea {
                        class: "input",
                        rows: "3",
                        value: "{value}",
                        oninput: move |evt: FormEvent| *section_mut(&mut draft.write(), index) = evt.value(),
                    }
                }
            }
            div {
                class: "form-row",
                label {
                    class: "form-check",
                    input {
                        r#type: "checkbox",
                        checked: current.parent_contacted,
                        onchange: move |evt: FormEvent| draft.write().parent_contacted = evt.checked(),
                    }
                    "Parent contacted"
                }
                if current.parent_contacted {
                    input {
                        class: "input",
                        placeholder: "How and what was discussed",
                        value: "{current.parent_contact_notes}",
                        oninput: move |evt: FormEvent| draft.write().parent_contact_notes = evt.value(),
                    }
                }
            }
            div {
                class: "form-row",
                label {
                    class: "form-check",
                    input {
                        r#type: "checkbox",
                        checked: current.follow_up_needed,
                        onchange: move |evt: FormEvent| draft.write().follow_up_needed = evt.checked(),
                    }
                    "Follow-up needed"
                }
                if current.follow_up_needed {
                    input {
                        class: "input",
                        placeholder: "Assigned to",
                        value: "{current.follow_up_assignee}",
                        oninput: move |evt: FormEvent| draft.write().follow_up_assignee = evt.value(),
                    }
                }
            }
            label {
                "Tags"
                input {
                    class: "input",
                    placeholder: "comma, separated",
                    value: "{tags}",
                    oninput: move |evt: FormEvent| tags.set(evt.value()),
                }
            }
            if let Some(message) = error() {
                div { class: "form-error", "{message}" }
            }
            div {
                class: "form-actions",
                button {
                    class: "btn",
                    onclick: move |_| on_cancel.call(()),
                    "Cancel"
                }
                button {
                    class: "btn btn-primary",
                    onclick: submit,
                    "Save note"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::notes::interpret;

    #[test]
    fn test_parse_tags() {
        assert_eq!(parse_tags(" #Reading, math,,reading "), vec!["reading", "math"]);
        assert!(parse_tags("  ").is_empty());
    }

    #[test]
    fn test_build_note_requires_student() {
        let err = build_note("  ", "", "Ada", "", &StructuredNote::default()).unwrap_err();
        assert!(err.contains("Student"));
    }

    #[test]
    fn test_built_payload_decodes_to_draft() {
        let draft = StructuredNote {
            category: "social".to_string(),
            behavior_notes: "Calm all morning".to_string(),
            follow_up_needed: true,
            ..StructuredNote::default()
        };
        let row = build_note(" Sam ", "Early Learning", "Ada", "calm", &draft).unwrap();
        assert_eq!(row.student_name, "Sam");
        assert_eq!(row.tags, vec!["calm"]);

        let decoded = interpret(&row.notes, None);
        assert_eq!(decoded.category, "social");
        assert_eq!(decoded.behavior_notes, "Calm all morning");
        assert!(decoded.follow_up_needed);
        assert_eq!(decoded.tags, vec!["calm"]);
    }

    #[test]
    fn test_section_order_matches_preview_order() {
        let mut note = StructuredNote::default();
        for i in 0..7 {
            *section_mut(&mut note, i) = format!("s{i}");
        }
        let values: Vec<&str> = note.sections().iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec!["s0", "s1", "s2", "s3", "s4", "s5", "s6"]);
    }
}
