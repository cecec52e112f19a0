//! Tab navigation for the portal shell.
//!
//! The shell shows exactly one feature view at a time, chosen by [`Tab`].
//! The `"profile"` entry in the sidebar is not a tab: selecting it toggles the
//! profile overlay on top of whatever view is active.

use serde::{Deserialize, Serialize};

/// Sidebar identifier of the profile overlay.
pub const PROFILE_ID: &str = "profile";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Dashboard,
    Students,
    Attendance,
    WaitingList,
    Forms,
    DailyNotes,
    Calendar,
    Announcements,
    Programs,
    Settings,
    Test,
}

impl Tab {
    /// Sidebar order.
    pub const ALL: [Tab; 11] = [
        Tab::Dashboard,
        Tab::Students,
        Tab::Attendance,
        Tab::WaitingList,
        Tab::Forms,
        Tab::DailyNotes,
        Tab::Calendar,
        Tab::Announcements,
        Tab::Programs,
        Tab::Settings,
        Tab::Test,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Tab::Dashboard => "dashboard",
            Tab::Students => "students",
            Tab::Attendance => "attendance",
            Tab::WaitingList => "waitinglist",
            Tab::Forms => "forms",
            Tab::DailyNotes => "dailynotes",
            Tab::Calendar => "calendar",
            Tab::Announcements => "announcements",
            Tab::Programs => "programs",
            Tab::Settings => "settings",
            Tab::Test => "test",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Students => "Students",
            Tab::Attendance => "Attendance",
            Tab::WaitingList => "Waiting List",
            Tab::Forms => "Forms",
            Tab::DailyNotes => "Daily Notes",
            Tab::Calendar => "Calendar",
            Tab::Announcements => "Announcements",
            Tab::Programs => "Programs",
            Tab::Settings => "Settings",
            Tab::Test => "Test",
        }
    }

    /// Look up a tab by id. Unknown ids route to the dashboard.
    pub fn from_id(id: &str) -> Tab {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == id)
            .unwrap_or(Tab::Dashboard)
    }
}

/// What the shell must do after a selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavEffect {
    None,
    /// Reload the class and teacher lists before showing programs.
    RefreshPrograms,
    /// The profile overlay was shown or hidden.
    ToggleProfile,
}

/// Active tab plus the profile overlay flag.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Navigation {
    pub active: Tab,
    pub profile_open: bool,
    /// Bumped on every entry into programs; the view reloads when it changes.
    pub programs_epoch: u64,
}

impl Navigation {
    /// Apply a sidebar selection by id.
    pub fn select(&mut self, id: &str) -> NavEffect {
        if id == PROFILE_ID {
            self.profile_open = !self.profile_open;
            return NavEffect::ToggleProfile;
        }
        self.select_tab(Tab::from_id(id))
    }

    pub fn select_tab(&mut self, tab: Tab) -> NavEffect {
        self.active = tab;
        if tab == Tab::Programs {
            self.programs_epoch += 1;
            NavEffect::RefreshPrograms
        } else {
            NavEffect::None
        }
    }

    pub fn close_profile(&mut self) {
        self.profile_open = false;
    }
}
