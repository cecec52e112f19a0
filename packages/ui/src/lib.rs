//! This crate contains all shared UI for the workspace.

use dioxus::prelude::*;
use domain::PortalConfig;

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
}

pub mod views;

mod auth;
pub use auth::{use_auth, use_backend, AuthHandle, AuthProvider, SignOutButton};

pub mod activity_log;
pub use activity_log::{log_activity, use_activity_log, ActivityLog, LogLevel};

mod activity_log_panel;
pub use activity_log_panel::{ActivityLogPanel, ActivityLogToggle};

mod shell;
pub use shell::Portal;

/// The configuration provided at the application root.
pub fn use_portal_config() -> PortalConfig {
    use_context::<PortalConfig>()
}
