//! [`Backend`]: the concrete backend handed to the UI.

use domain::{ClassInfo, DailyNote, NewDailyNote, TeacherInfo, UserProfile};

use crate::backend::{AuthBackend, AuthSubscription, NoteStore, ProfileStore, ProgramStore, Session};
use crate::{ApiError, MemoryBackend, SupabaseClient};

#[derive(Clone)]
pub enum Backend {
    Supabase(SupabaseClient),
    Memory(MemoryBackend),
}

impl Backend {
    pub fn is_demo(&self) -> bool {
        matches!(self, Backend::Memory(_))
    }
}

impl AuthBackend for Backend {
    async fn get_session(&self) -> Result<Option<Session>, ApiError> {
        match self {
            Backend::Supabase(b) => b.get_session().await,
            Backend::Memory(b) => b.get_session().await,
        }
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        match self {
            Backend::Supabase(b) => b.on_auth_state_change(),
            Backend::Memory(b) => b.on_auth_state_change(),
        }
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        match self {
            Backend::Supabase(b) => b.sign_in_with_password(email, password).await,
            Backend::Memory(b) => b.sign_in_with_password(email, password).await,
        }
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, ApiError> {
        match self {
            Backend::Supabase(b) => b.sign_up(email, password).await,
            Backend::Memory(b) => b.sign_up(email, password).await,
        }
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        match self {
            Backend::Supabase(b) => b.sign_out().await,
            Backend::Memory(b) => b.sign_out().await,
        }
    }

    async fn refresh_session(&self) -> Result<Session, ApiError> {
        match self {
            Backend::Supabase(b) => b.refresh_session().await,
            Backend::Memory(b) => b.refresh_session().await,
        }
    }
}

impl ProfileStore for Backend {
    async fn profile_by_email(&self, email: &str) -> Result<UserProfile, ApiError> {
        match self {
            Backend::Supabase(b) => b.profile_by_email(email).await,
            Backend::Memory(b) => b.profile_by_email(email).await,
        }
    }
}

impl NoteStore for Backend {
    async fn list_daily_notes(&self) -> Result<Vec<DailyNote>, ApiError> {
        match self {
            Backend::Supabase(b) => b.list_daily_notes().await,
            Backend::Memory(b) => b.list_daily_notes().await,
        }
    }

    async fn create_daily_note(&self, note: &NewDailyNote) -> Result<DailyNote, ApiError> {
        match self {
            Backend::Supabase(b) => b.create_daily_note(note).await,
            Backend::Memory(b) => b.create_daily_note(note).await,
        }
    }

    async fn delete_daily_note(&self, id: &str) -> Result<(), ApiError> {
        match self {
            Backend::Supabase(b) => b.delete_daily_note(id).await,
            Backend::Memory(b) => b.delete_daily_note(id).await,
        }
    }
}

impl ProgramStore for Backend {
    async fn list_classes(&self) -> Result<Vec<ClassInfo>, ApiError> {
        match self {
            Backend::Supabase(b) => b.list_classes().await,
            Backend::Memory(b) => b.list_classes().await,
        }
    }

    async fn list_teachers(&self) -> Result<Vec<TeacherInfo>, ApiError> {
        match self {
            Backend::Supabase(b) => b.list_teachers().await,
            Backend::Memory(b) => b.list_teachers().await,
        }
    }
}
