use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{Duration as ChronoDuration, Utc};
use domain::{ClassInfo, DailyNote, Identity, NewDailyNote, StructuredNote, TeacherInfo, UserProfile};
use tokio::sync::broadcast;

use crate::backend::{
    AuthBackend, AuthEvent, AuthSubscription, Credentials, NoteStore, ProfileStore, ProgramStore,
    Session, EVENT_CAPACITY,
};
use crate::ApiError;

/// Email of the account seeded by [`MemoryBackend::demo`].
pub const DEMO_EMAIL: &str = "demo@portal.local";
pub const DEMO_PASSWORD: &str = "demo-password";

/// In-memory backend for tests and demo mode.
#[derive(Clone)]
pub struct MemoryBackend {
    inner: Arc<Inner>,
}

struct Inner {
    accounts: Mutex<HashMap<String, (String, Identity)>>,
    session: Mutex<Option<Session>>,
    profiles: Mutex<HashMap<String, UserProfile>>,
    notes: Mutex<Vec<DailyNote>>,
    classes: Mutex<Vec<ClassInfo>>,
    teachers: Mutex<Vec<TeacherInfo>>,
    profile_delay: Mutex<Option<Duration>>,
    profile_failure: Mutex<Option<String>>,
    delete_failure: Mutex<Option<String>>,
    events: broadcast::Sender<AuthEvent>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                accounts: Mutex::default(),
                session: Mutex::default(),
                profiles: Mutex::default(),
                notes: Mutex::default(),
                classes: Mutex::default(),
                teachers: Mutex::default(),
                profile_delay: Mutex::default(),
                profile_failure: Mutex::default(),
                delete_failure: Mutex::default(),
                events,
            }),
        }
    }

    /// A backend seeded with one account, a few notes and a program roster.
    pub fn demo() -> Self {
        let backend = Self::new();
        backend.add_account(DEMO_EMAIL, DEMO_PASSWORD);

        let teachers = [("t-1", "Maya", "Lopez"), ("t-2", "Owen", "Park")];
        for (id, first, last) in teachers {
            lock(&backend.inner.teachers).push(TeacherInfo {
                id: id.to_string(),
                first_name: first.to_string(),
                last_name: last.to_string(),
                email: None,
            });
        }
        let classes = [
            ("c-1", "Morning Circle", "Early Learning", Some("t-1")),
            ("c-2", "Speech Group", "Therapy", Some("t-2")),
            ("c-3", "Social Skills", "Therapy", None),
        ];
        for (id, name, program, teacher) in classes {
            lock(&backend.inner.classes).push(ClassInfo {
                id: id.to_string(),
                name: name.to_string(),
                program_name: Some(program.to_string()),
                teacher_id: teacher.map(str::to_string),
            });
        }

        let structured = StructuredNote {
            category: "social".to_string(),
            overall_mood: "good".to_string(),
            social_interaction: "Took turns during the group game.".to_string(),
            tags: vec!["turn-taking".to_string()],
            ..StructuredNote::default()
        };
        backend.insert_note(
            "n-1",
            NewDailyNote {
                student_name: "Sam Rivera".to_string(),
                program_name: "Early Learning".to_string(),
                author_name: "Maya Lopez".to_string(),
                notes: structured.to_json(),
                tags: vec!["turn-taking".to_string()],
            },
            2,
        );
        backend.insert_note(
            "n-2",
            NewDailyNote {
                student_name: "Lena Ortiz".to_string(),
                program_name: "Therapy".to_string(),
                author_name: "Owen Park".to_string(),
                notes: "Worked on /s/ sounds, good focus.".to_string(),
                tags: Vec::new(),
            },
            1,
        );
        backend
    }

    /// Register a password account.
    pub fn add_account(&self, email: &str, password: &str) -> Identity {
        let email = email.trim().to_lowercase();
        let identity = Identity {
            id: uuid::Uuid::new_v4().to_string(),
            email: email.clone(),
        };
        lock(&self.inner.accounts).insert(email, (password.to_string(), identity.clone()));
        identity
    }

    /// Store a profile. Editing the signed-in user's own record publishes
    /// `UserUpdated`.
    pub fn put_profile(&self, profile: UserProfile) {
        let email = profile.email.clone();
        lock(&self.inner.profiles).insert(email.clone(), profile);
        let current = lock(&self.inner.session).clone();
        if let Some(session) = current.filter(|s| s.user.email == email) {
            self.emit(AuthEvent::user_updated(session));
        }
    }

    /// Make every profile lookup take `delay` before answering.
    pub fn delay_profile_lookups(&self, delay: Duration) {
        *lock(&self.inner.profile_delay) = Some(delay);
    }

    /// Make every profile lookup fail with a transport-like error.
    pub fn fail_profile_lookups(&self, message: &str) {
        *lock(&self.inner.profile_failure) = Some(message.to_string());
    }

    pub fn fail_deletes(&self, message: &str) {
        *lock(&self.inner.delete_failure) = Some(message.to_string());
    }

    /// Publish an auth event as if the backend had produced it.
    pub fn emit(&self, event: AuthEvent) {
        if let Some(session) = &event.session {
            *lock(&self.inner.session) = Some(session.clone());
        } else {
            *lock(&self.inner.session) = None;
        }
        // No subscribers is fine.
        let _ = self.inner.events.send(event);
    }

    fn insert_note(&self, id: &str, note: NewDailyNote, days_ago: i64) -> DailyNote {
        let stored = DailyNote {
            id: id.to_string(),
            student_name: note.student_name,
            program_name: note.program_name,
            author_name: note.author_name,
            created_at: Utc::now() - ChronoDuration::days(days_ago),
            notes: note.notes,
            tags: note.tags,
        };
        lock(&self.inner.notes).push(stored.clone());
        stored
    }

    fn new_session(identity: Identity) -> Session {
        Session {
            access_token: uuid::Uuid::new_v4().to_string(),
            refresh_token: uuid::Uuid::new_v4().to_string(),
            expires_in: 3600,
            user: identity,
        }
    }
}

impl AuthBackend for MemoryBackend {
    async fn get_session(&self) -> Result<Option<Session>, ApiError> {
        Ok(lock(&self.inner.session).clone())
    }

    fn on_auth_state_change(&self) -> AuthSubscription {
        AuthSubscription::new(self.inner.events.subscribe())
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<Session, ApiError> {
        let creds = Credentials::new(email, password)?;
        let identity = match lock(&self.inner.accounts).get(&creds.email) {
            Some((stored, identity)) if *stored == creds.password => identity.clone(),
            _ => {
                return Err(ApiError::Auth {
                    status: 400,
                    message: "Invalid login credentials".to_string(),
                })
            }
        };
        let session = Self::new_session(identity);
        self.emit(AuthEvent::signed_in(session.clone()));
        Ok(session)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<Session>, ApiError> {
        let creds = Credentials::new(email, password)?;
        if lock(&self.inner.accounts).contains_key(&creds.email) {
            return Err(ApiError::Auth {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        let identity = self.add_account(&creds.email, &creds.password);
        let session = Self::new_session(identity);
        self.emit(AuthEvent::signed_in(session.clone()));
        Ok(Some(session))
    }

    async fn sign_out(&self) -> Result<(), ApiError> {
        self.emit(AuthEvent::signed_out());
        Ok(())
    }

    async fn refresh_session(&self) -> Result<Session, ApiError> {
        let current = lock(&self.inner.session).clone();
        let Some(current) = current else {
            return Err(ApiError::NotSignedIn);
        };
        let session = Self::new_session(current.user);
        self.emit(AuthEvent::refreshed(session.clone()));
        Ok(session)
    }
}

impl ProfileStore for MemoryBackend {
    async fn profile_by_email(&self, email: &str) -> Result<UserProfile, ApiError> {
        let delay = *lock(&self.inner.profile_delay);
        if let Some(delay) = delay {
            crate::profile::sleep(delay).await;
        }
        if let Some(message) = lock(&self.inner.profile_failure).clone() {
            return Err(ApiError::Status { status: 503, message });
        }
        lock(&self.inner.profiles)
            .get(email)
            .cloned()
            .ok_or(ApiError::NoRows)
    }
}

impl NoteStore for MemoryBackend {
    async fn list_daily_notes(&self) -> Result<Vec<DailyNote>, ApiError> {
        let mut notes = lock(&self.inner.notes).clone();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }

    async fn create_daily_note(&self, note: &NewDailyNote) -> Result<DailyNote, ApiError> {
        let id = uuid::Uuid::new_v4().to_string();
        Ok(self.insert_note(&id, note.clone(), 0))
    }

    async fn delete_daily_note(&self, id: &str) -> Result<(), ApiError> {
        if let Some(message) = lock(&self.inner.delete_failure).clone() {
            return Err(ApiError::Status { status: 500, message });
        }
        let mut notes = lock(&self.inner.notes);
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Err(ApiError::NoRows);
        }
        Ok(())
    }
}

impl ProgramStore for MemoryBackend {
    async fn list_classes(&self) -> Result<Vec<ClassInfo>, ApiError> {
        Ok(lock(&self.inner.classes).clone())
    }

    async fn list_teachers(&self) -> Result<Vec<TeacherInfo>, ApiError> {
        Ok(lock(&self.inner.teachers).clone())
    }
}
