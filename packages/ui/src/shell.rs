//! Application shell: sidebar, active view and the profile overlay.

use dioxus::prelude::*;
use dioxus_free_icons::icons::fa_solid_icons::{
    FaBullhorn, FaCalendarDays, FaClipboardCheck, FaFileLines, FaFlask, FaGaugeHigh,
    FaGear, FaLayerGroup, FaListOl, FaNoteSticky, FaUserGraduate,
};
use dioxus_free_icons::Icon;
use domain::nav::PROFILE_ID;
use domain::{Navigation, Tab};

use crate::views::{
    DailyNotesView, DashboardView, DiagnosticsView, FeaturePlaceholder, LoginView, ProgramsView,
    ProfileOverlay, SettingsView,
};
use crate::{use_auth, ActivityLogPanel, ActivityLogToggle, SignOutButton};

const PORTAL_CSS: Asset = asset!("/assets/styling/portal.css");

/// Apply a sidebar selection.
fn select(mut nav: Signal<Navigation>, id: &str) {
    let effect = nav.write().select(id);
    tracing::debug!(id, ?effect, "navigation");
}

/// Root of the signed-in experience. Shows a splash while the session is
/// being restored and the login screen when nobody is signed in.
#[component]
pub fn Portal() -> Element {
    let auth = use_auth();
    let state = auth.state();

    rsx! {
        document::Stylesheet { href: PORTAL_CSS }

        if state.loading {
            div {
                class: "splash",
                div { class: "splash-spinner" }
                p { "Loading your account..." }
            }
        } else if state.is_signed_in() {
            AppShell {}
        } else {
            LoginView {}
        }
    }
}

#[component]
fn AppShell() -> Element {
    let auth = use_auth();
    let mut nav = use_signal(Navigation::default);

    let state = auth.state();
    let name = state.display_name();
    let initials = state.initials();
    let role = state.profile.as_ref().map(|p| p.role.clone()).unwrap_or_default();
    let current = nav();

    rsx! {
        div {
            class: "portal",
            nav {
                class: "sidebar",
                div {
                    class: "sidebar-brand",
                    "Staff Portal"
                }
                ul {
                    class: "sidebar-tabs",
                    for tab in Tab::ALL {
                        li {
                            key: "{tab.id()}",
                            button {
                                class: if current.active == tab { "sidebar-tab active" } else { "sidebar-tab" },
                                onclick: move |_| select(nav, tab.id()),
                                TabIcon { tab }
                                span { "{tab.label()}" }
                            }
                        }
                    }
                }
                div {
                    class: "sidebar-footer",
                    button {
                        class: if current.profile_open { "sidebar-user active" } else { "sidebar-user" },
                        onclick: move |_| select(nav, PROFILE_ID),
                        span { class: "sidebar-avatar", "{initials}" }
                        span {
                            class: "sidebar-user-text",
                            span { class: "sidebar-user-name", "{name}" }
                            span { class: "sidebar-user-role", "{role}" }
                        }
                    }
                    SignOutButton { class: "sidebar-sign-out" }
                }
            }
            main {
                class: "content",
                ViewRouter {
                    tab: current.active,
                    programs_refresh: current.programs_epoch,
                    on_select: move |tab: Tab| select(nav, tab.id()),
                }
            }
            ActivityLogToggle {}
            ActivityLogPanel {}
        }
        if current.profile_open {
            ProfileOverlay {
                on_close: move |_| nav.write().close_profile(),
            }
        }
    }
}

/// The single view shown for `tab`.
#[component]
fn ViewRouter(tab: Tab, programs_refresh: u64, on_select: EventHandler<Tab>) -> Element {
    match tab {
        Tab::Dashboard => rsx! { DashboardView { on_select } },
        Tab::DailyNotes => rsx! { DailyNotesView {} },
        Tab::Programs => rsx! { ProgramsView { refresh: programs_refresh } },
        Tab::Settings => rsx! { SettingsView {} },
        Tab::Test => rsx! { DiagnosticsView {} },
        Tab::Students
        | Tab::Attendance
        | Tab::WaitingList
        | Tab::Forms
        | Tab::Calendar
        | Tab::Announcements => rsx! { FeaturePlaceholder { tab } },
    }
}

#[component]
fn TabIcon(tab: Tab) -> Element {
    match tab {
        Tab::Dashboard => rsx! { Icon { icon: FaGaugeHigh, width: 14, height: 14 } },
        Tab::Students => rsx! { Icon { icon: FaUserGraduate, width: 14, height: 14 } },
        Tab::Attendance => rsx! { Icon { icon: FaClipboardCheck, width: 14, height: 14 } },
        Tab::WaitingList => rsx! { Icon { icon: FaListOl, width: 14, height: 14 } },
        Tab::Forms => rsx! { Icon { icon: FaFileLines, width: 14, height: 14 } },
        Tab::DailyNotes => rsx! { Icon { icon: FaNoteSticky, width: 14, height: 14 } },
        Tab::Calendar => rsx! { Icon { icon: FaCalendarDays, width: 14, height: 14 } },
        Tab::Announcements => rsx! { Icon { icon: FaBullhorn, width: 14, height: 14 } },
        Tab::Programs => rsx! { Icon { icon: FaLayerGroup, width: 14, height: 14 } },
        Tab::Settings => rsx! { Icon { icon: FaGear, width: 14, height: 14 } },
        Tab::Test => rsx! { Icon { icon: FaFlask, width: 14, height: 14 } },
    }
}
