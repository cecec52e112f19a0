mod modal_overlay;
pub use modal_overlay::ModalOverlay;

mod placeholder;
pub use placeholder::FeaturePlaceholder;

mod dashboard;
pub use dashboard::DashboardView;

mod daily_notes;
pub use daily_notes::DailyNotesView;

mod note_form;
pub use note_form::NoteForm;

mod note_detail;
pub use note_detail::NoteDetail;

mod programs;
pub use programs::ProgramsView;

mod profile;
pub use profile::ProfileOverlay;

mod settings;
pub use settings::SettingsView;

mod diagnostics;
pub use diagnostics::DiagnosticsView;

mod login;
pub use login::LoginView;
