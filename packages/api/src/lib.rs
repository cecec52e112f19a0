//! # API crate: backend access and the session layer
//!
//! Everything the portal UI needs from the hosted backend, plus the logic that
//! turns an authenticated identity into an application profile.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`backend`] | Traits for the auth service and data store, `Session`, `AuthEvent`, `AuthSubscription` |
//! | [`supabase`] | REST implementation of every backend trait (`reqwest`) |
//! | [`memory`] | In-memory backend for tests and demo mode |
//! | [`persist`] | Keeping the session across reloads (`localStorage` in the browser) |
//! | [`client`] | [`Backend`], the enum the UI holds |
//! | [`profile`] | [`ProfileResolver`]: timeout race and fallback profile policy |
//! | [`context`] | [`AuthContext`] and [`AuthState`]: session bootstrap, subscription, permission checks |
//! | [`config`] | Loading `portal.toml` with environment overrides |

pub mod backend;
pub mod client;
pub mod config;
pub mod context;
mod error;
pub mod memory;
pub mod persist;
pub mod profile;
pub mod supabase;

pub use backend::{
    AuthBackend, AuthEvent, AuthEventKind, AuthSubscription, NoteStore, ProfileStore, ProgramStore, Session,
};
pub use client::Backend;
pub use context::{AuthContext, AuthState};
pub use error::ApiError;
pub use memory::MemoryBackend;
pub use persist::SessionPersistence;
pub use profile::{ProfileResolver, ProfileSource};
pub use supabase::SupabaseClient;
