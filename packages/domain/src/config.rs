//! # Portal configuration: `portal.toml`
//!
//! The TOML file embedded into the application at build time. It tells the
//! client where the hosted backend lives and how the session layer behaves
//! when a profile cannot be loaded.
//!
//! ## Structure
//!
//! ```toml
//! [backend]
//! url = "https://project.supabase.co"
//! anon_key = "public-anon-key"
//!
//! [auth]
//! profile_timeout_secs = 5        # race window for the profile lookup
//! fallback_profile = "administrator"  # or "restricted"
//!
//! [notes]
//! default_category = "other"
//! preview_placeholder = "No notes recorded"
//! ```
//!
//! Every section derives `Default`, so a missing or empty file is equivalent to
//! the default configuration.

use serde::{Deserialize, Serialize};

/// Top-level configuration stored in `portal.toml`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PortalConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub notes: NotesConfig,
}

/// Location of the hosted backend.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project URL without a trailing slash.
    #[serde(default)]
    pub url: String,
    /// Public (anonymous) API key sent with every request.
    #[serde(default)]
    pub anon_key: String,
}

/// Which profile an authenticated identity receives when its own record
/// cannot be loaded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackProfile {
    /// Full administrative access (`permissions = ["all"]`).
    #[default]
    Administrator,
    /// A guest profile with no permissions.
    Restricted,
}

/// Session layer settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default = "default_profile_timeout")]
    pub profile_timeout_secs: u64,
    #[serde(default)]
    pub fallback_profile: FallbackProfile,
}

fn default_profile_timeout() -> u64 {
    5
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            profile_timeout_secs: default_profile_timeout(),
            fallback_profile: FallbackProfile::default(),
        }
    }
}

/// Daily note display settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NotesConfig {
    /// Category given to legacy plain-text notes.
    #[serde(default = "default_category")]
    pub default_category: String,
    /// Preview shown when a note has no text at all.
    #[serde(default = "default_placeholder")]
    pub preview_placeholder: String,
}

fn default_category() -> String {
    crate::notes::DEFAULT_CATEGORY.to_string()
}

fn default_placeholder() -> String {
    crate::notes::EMPTY_PREVIEW.to_string()
}

impl Default for NotesConfig {
    fn default() -> Self {
        Self {
            default_category: default_category(),
            preview_placeholder: default_placeholder(),
        }
    }
}

impl PortalConfig {
    /// Builder method to point the client at a backend.
    pub fn with_backend(mut self, url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        self.backend.url = url.into().trim_end_matches('/').to_string();
        self.backend.anon_key = anon_key.into();
        self
    }

    /// The well-known filename for the config file.
    pub fn filename() -> &'static str {
        "portal.toml"
    }

    /// Parse from TOML string.
    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Serialize to TOML string.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Whether a backend URL and key are both present.
    pub fn has_backend(&self) -> bool {
        !self.backend.url.is_empty() && !self.backend.anon_key.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_default() {
        let config = PortalConfig::from_toml("").unwrap();
        assert_eq!(config, PortalConfig::default());
        assert_eq!(config.auth.profile_timeout_secs, 5);
        assert_eq!(config.auth.fallback_profile, FallbackProfile::Administrator);
        assert_eq!(config.notes.default_category, "other");
        assert!(!config.has_backend());
    }

    #[test]
    fn test_partial_sections() {
        let config = PortalConfig::from_toml(
            r#"
            [auth]
            fallback_profile = "restricted"
            "#,
        )
        .unwrap();
        assert_eq!(config.auth.fallback_profile, FallbackProfile::Restricted);
        assert_eq!(config.auth.profile_timeout_secs, 5);
        assert_eq!(config.backend.url, "");
    }

    #[test]
    fn test_with_backend_strips_trailing_slash() {
        let config = PortalConfig::default().with_backend("https://x.supabase.co/", "key");
        assert_eq!(config.backend.url, "https://x.supabase.co");
        assert!(config.has_backend());

        let text = config.to_toml().unwrap();
        let parsed = PortalConfig::from_toml(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_unknown_fallback_is_rejected() {
        let result = PortalConfig::from_toml("[auth]\nfallback_profile = \"root\"\n");
        assert!(result.is_err());
    }
}
