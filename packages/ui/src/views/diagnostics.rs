use dioxus::prelude::*;
use domain::notes::{interpret, summarize_or, NotePayload};

use crate::{use_auth, use_portal_config};

const SAMPLE_PAYLOAD: &str = r#"{"category":"academic","overallMood":"good","academicProgress":"Counted to 20 unaided","followUpNeeded":true}"#;

/// Session and payload inspection tools for staff troubleshooting.
#[component]
pub fn DiagnosticsView() -> Element {
    let auth = use_auth();
    let config = use_portal_config();
    let mut permission = use_signal(|| "dailynotes.write".to_string());
    let mut raw = use_signal(|| SAMPLE_PAYLOAD.to_string());

    let state = auth.state();
    let source = state
        .profile_source
        .map(|s| format!("{s:?}"))
        .unwrap_or_else(|| "none".to_string());
    let identity = state
        .identity
        .as_ref()
        .map(|i| format!("{} ({})", i.email, i.id))
        .unwrap_or_else(|| "signed out".to_string());
    let granted = auth.has_permission(&permission.read());

    let fallback = config.notes.default_category.clone();
    let kind = if NotePayload::decode(&raw.read()).is_structured() {
        "structured JSON"
    } else {
        "plain text"
    };
    let decoded = interpret(&raw.read(), Some(&fallback));
    let preview = summarize_or(&decoded, &config.notes.preview_placeholder).to_string();
    let pretty = serde_json::to_string_pretty(&decoded).unwrap_or_default();

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h1 { "Test" }
            }
            section {
                class: "view-section",
                h2 { "Session" }
                dl {
                    class: "note-detail-meta",
                    dt { "Identity" }
                    dd { "{identity}" }
                    dt { "Profile source" }
                    dd { "{source}" }
                    dt { "Loading" }
                    dd { "{state.loading}" }
                }
            }
            section {
                class: "view-section",
                h2 { "Permission check" }
                div {
                    class: "view-toolbar",
                    input {
                        class: "input",
                        value: "{permission}",
                        oninput: move |evt: FormEvent| permission.set(evt.value()),
                    }
                    span {
                        class: if granted { "badge badge-low" } else { "badge badge-high" },
                        if granted { "granted" } else { "denied" }
                    }
                }
            }
            section {
                class: "view-section",
                h2 { "Note payload" }
                textarea {
                    class: "input",
                    rows: "6",
                    value: "{raw}",
                    oninput: move |evt: FormEvent| raw.set(evt.value()),
                }
                p { class: "muted", "Read as {kind}. Preview: {preview}" }
                pre { class: "code-block", "{pretty}" }
            }
        }
    }
}
