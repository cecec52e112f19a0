//! # Session persistence
//!
//! [`SessionPersistence`] keeps the signed-in [`Session`] across page reloads so
//! that [`AuthBackend::get_session`](crate::AuthBackend::get_session) can hand
//! the auth context a session to bootstrap from.
//!
//! | Variant | Where the session lives |
//! |---------|-------------------------|
//! | `Browser` | `window.localStorage` under [`SESSION_KEY`] (web only) |
//! | `Memory` | a slot shared by every clone, for native runs and tests |
//! | `Disabled` | nowhere; every start is signed out |
//!
//! Storage failures never surface to the caller. An unreadable or corrupt entry
//! reads as "no session" and a failed write is logged, so a broken store
//! degrades to signing in again.

use std::sync::{Arc, Mutex};

use crate::backend::Session;

/// `localStorage` key holding the serialized session.
pub const SESSION_KEY: &str = "portal.session";

#[derive(Clone)]
pub enum SessionPersistence {
    Disabled,
    #[cfg(target_arch = "wasm32")]
    Browser(String),
    Memory(Arc<Mutex<Option<String>>>),
}

impl Default for SessionPersistence {
    /// `localStorage` in the browser, nothing natively.
    fn default() -> Self {
        #[cfg(target_arch = "wasm32")]
        {
            SessionPersistence::Browser(SESSION_KEY.to_string())
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            SessionPersistence::Disabled
        }
    }
}

impl SessionPersistence {
    pub fn memory() -> Self {
        SessionPersistence::Memory(Arc::new(Mutex::new(None)))
    }

    pub fn load(&self) -> Option<Session> {
        let raw = self.read()?;
        match serde_json::from_str(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(error = %e, "discarding unreadable stored session");
                self.write(None);
                None
            }
        }
    }

    pub fn save(&self, session: Option<&Session>) {
        match session.map(serde_json::to_string).transpose() {
            Ok(raw) => self.write(raw),
            Err(e) => tracing::warn!(error = %e, "failed to serialize session"),
        }
    }

    fn read(&self) -> Option<String> {
        match self {
            SessionPersistence::Disabled => None,
            #[cfg(target_arch = "wasm32")]
            SessionPersistence::Browser(key) => browser::local_storage()?.get_item(key).ok().flatten(),
            SessionPersistence::Memory(slot) => slot.lock().ok()?.clone(),
        }
    }

    fn write(&self, raw: Option<String>) {
        match self {
            SessionPersistence::Disabled => {}
            #[cfg(target_arch = "wasm32")]
            SessionPersistence::Browser(key) => browser::write(key, raw),
            SessionPersistence::Memory(slot) => match slot.lock() {
                Ok(mut slot) => *slot = raw,
                Err(_) => tracing::warn!("session slot poisoned"),
            },
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod browser {
    pub(super) fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }

    pub(super) fn write(key: &str, raw: Option<String>) {
        let Some(storage) = local_storage() else {
            tracing::warn!("localStorage unavailable; session not persisted");
            return;
        };
        let result = match raw {
            Some(raw) => storage.set_item(key, &raw),
            None => storage.remove_item(key),
        };
        if let Err(e) = result {
            tracing::warn!(error = ?e, "failed to update stored session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::Identity;

    fn session() -> Session {
        Session {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            expires_in: 3600,
            user: Identity {
                id: "u-1".to_string(),
                email: "pat@example.org".to_string(),
            },
        }
    }

    #[test]
    fn test_memory_slot_is_shared_between_clones() {
        let store = SessionPersistence::memory();
        let other = store.clone();
        store.save(Some(&session()));
        assert_eq!(other.load(), Some(session()));

        other.save(None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_corrupt_entry_reads_as_signed_out() {
        let slot = Arc::new(Mutex::new(Some("{not json".to_string())));
        let store = SessionPersistence::Memory(slot.clone());
        assert_eq!(store.load(), None);
        assert_eq!(*slot.lock().unwrap(), None);
    }

    #[test]
    fn test_disabled_keeps_nothing() {
        let store = SessionPersistence::Disabled;
        store.save(Some(&session()));
        assert_eq!(store.load(), None);
    }
}
