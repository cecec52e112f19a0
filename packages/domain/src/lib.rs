pub mod config;
pub mod models;
pub mod nav;
pub mod notes;
pub mod permissions;

pub use config::{FallbackProfile, PortalConfig};
pub use models::{ClassInfo, DailyNote, Identity, NewDailyNote, TeacherInfo, UserProfile};
pub use nav::{NavEffect, Navigation, Tab};
pub use notes::{interpret, summarize, NotePayload, StructuredNote};
pub use permissions::{has_permission, has_role, ALL_PERMISSIONS};
