//! Floating drawer over the portal listing recent operations.

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::FaClockRotateLeft;
use dioxus_free_icons::Icon;

use crate::activity_log::use_activity_log;

#[component]
pub fn ActivityLogPanel() -> Element {
    let mut log = use_activity_log();
    let snapshot = log();
    if !snapshot.visible {
        return rsx! {};
    }

    let rows: Vec<(usize, String, &'static str, String)> = snapshot
        .recent()
        .enumerate()
        .map(|(i, e)| (i, e.timestamp.clone(), e.level.label(), e.message.clone()))
        .collect();
    let no_rows = rows.is_empty();

    rsx! {
        aside {
            class: "activity-drawer",
            div {
                class: "activity-drawer-header",
                h2 { "Recent activity" }
                div {
                    class: "activity-drawer-actions",
                    button {
                        class: "btn-link",
                        disabled: no_rows,
                        onclick: move |_| log.write().clear(),
                        "Clear"
                    }
                    button {
                        class: "modal-close",
                        title: "Close",
                        onclick: move |_| log.write().toggle(),
                        "\u{00d7}"
                    }
                }
            }
            if no_rows {
                p { class: "view-placeholder", "No activity this session." }
            } else {
                ul {
                    class: "activity-drawer-list",
                    for (i, time, level, message) in rows {
                        li {
                            key: "{i}",
                            class: "activity-item activity-item--{level}",
                            span { class: "badge", "{level}" }
                            span { class: "activity-item-message", "{message}" }
                            span { class: "activity-item-time", "{time}" }
                        }
                    }
                }
            }
        }
    }
}

/// Corner button opening the drawer; turns red once something has failed.
#[component]
pub fn ActivityLogToggle() -> Element {
    let mut log = use_activity_log();
    let snapshot = log();
    let errors = snapshot.error_count();
    let total = snapshot.entries.len();

    rsx! {
        button {
            class: if errors > 0 { "activity-fab activity-fab--errors" } else { "activity-fab" },
            title: "Recent activity",
            onclick: move |_| log.write().toggle(),
            Icon { icon: FaClockRotateLeft, width: 14, height: 14 }
            if errors > 0 {
                span { "{errors} failed" }
            } else if total > 0 {
                span { "{total}" }
            }
        }
    }
}
