use dioxus::prelude::*;
use domain::Tab;

/// Header and short description for feature screens that live outside the
/// session layer (rosters, attendance sheets, form builders, ...).
#[component]
pub fn FeaturePlaceholder(tab: Tab) -> Element {
    let blurb = match tab {
        Tab::Students => "Student records, guardians and enrollment details.",
        Tab::Attendance => "Daily attendance by program and class.",
        Tab::WaitingList => "Families waiting for a placement, in priority order.",
        Tab::Forms => "Intake, consent and incident forms.",
        Tab::Calendar => "Sessions, holidays and staff events.",
        Tab::Announcements => "Messages to staff and families.",
        _ => "",
    };

    let title = tab.label();

    rsx! {
        div {
            class: "view",
            div {
                class: "view-header",
                h1 { "{title}" }
            }
            div {
                class: "view-placeholder",
                p { "{blurb}" }
            }
        }
    }
}
