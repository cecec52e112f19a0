//! # Domain models for the portal
//!
//! Plain data shared by the backend client and the UI. Every type is
//! `Serialize + Deserialize` so it can be read straight from the backend's
//! JSON rows.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`Identity`] | The authenticated principal owned by the backend auth service. |
//! | [`UserProfile`] | The application-level user record from the `users` relation: role, status and permissions. |
//! | [`DailyNote`] | A row of the `daily_notes` relation. The `notes` column is a loosely typed payload decoded by [`crate::notes`]. |
//! | [`NewDailyNote`] | Insert shape for a daily note. |
//! | [`ClassInfo`] / [`TeacherInfo`] | Program assignments shown on the programs tab. |

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::permissions::ALL_PERMISSIONS;

/// Well-known role names.
pub mod roles {
    pub const ADMINISTRATOR: &str = "administrator";
    pub const GUEST: &str = "guest";
}

/// An authenticated principal. Mirrors the backend user for the session duration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// Application user record carrying role and permissions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub department: Option<String>,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub picture_url: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub permissions: BTreeSet<String>,
}

/// Treats an explicit JSON `null` like a missing column.
fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl UserProfile {
    /// The profile handed to an identity whose record is missing or could not
    /// be loaded. Grants every permission.
    pub fn default_for(email: &str) -> Self {
        Self {
            id: format!("default:{email}"),
            first_name: "Demo".to_string(),
            last_name: "User".to_string(),
            email: email.to_string(),
            phone: None,
            role: roles::ADMINISTRATOR.to_string(),
            department: None,
            status: "active".to_string(),
            picture_url: None,
            permissions: BTreeSet::from([ALL_PERMISSIONS.to_string()]),
        }
    }

    /// A fallback profile without any permissions.
    pub fn restricted_for(email: &str) -> Self {
        Self {
            role: roles::GUEST.to_string(),
            permissions: BTreeSet::new(),
            ..Self::default_for(email)
        }
    }

    /// "First Last", falling back to the email when both names are blank.
    pub fn display_name(&self) -> String {
        let name = format!("{} {}", self.first_name.trim(), self.last_name.trim());
        let name = name.trim();
        if name.is_empty() {
            self.email.clone()
        } else {
            name.to_string()
        }
    }

    /// Up to two uppercase initials for avatars.
    pub fn initials(&self) -> String {
        [&self.first_name, &self.last_name]
            .iter()
            .filter_map(|part| part.trim().chars().next())
            .flat_map(char::to_uppercase)
            .collect()
    }
}

/// A daily observation note as stored by the backend.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailyNote {
    pub id: String,
    #[serde(default)]
    pub student_name: String,
    #[serde(default)]
    pub program_name: String,
    #[serde(default)]
    pub author_name: String,
    pub created_at: DateTime<Utc>,
    /// Structured JSON payload or legacy plain text.
    #[serde(default, deserialize_with = "nullable")]
    pub notes: String,
    #[serde(default, deserialize_with = "nullable")]
    pub tags: Vec<String>,
}

/// Insert shape for the `daily_notes` relation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NewDailyNote {
    pub student_name: String,
    pub program_name: String,
    pub author_name: String,
    pub notes: String,
    pub tags: Vec<String>,
}

/// A class within a program and its assigned teacher.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassInfo {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub program_name: Option<String>,
    #[serde(default)]
    pub teacher_id: Option<String>,
}

/// A staff member who can be assigned to classes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TeacherInfo {
    pub id: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl TeacherInfo {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_profile_shape() {
        let profile = UserProfile::default_for("someone@example.org");
        assert_eq!(profile.email, "someone@example.org");
        assert_eq!(profile.first_name, "Demo");
        assert_eq!(profile.last_name, "User");
        assert_eq!(profile.role, roles::ADMINISTRATOR);
        assert_eq!(profile.status, "active");
        assert!(profile.permissions.contains("all"));
        assert_eq!(profile.permissions.len(), 1);
    }

    #[test]
    fn test_restricted_profile_has_no_permissions() {
        let profile = UserProfile::restricted_for("x@example.org");
        assert_eq!(profile.role, roles::GUEST);
        assert!(profile.permissions.is_empty());
        assert_eq!(profile.email, "x@example.org");
    }

    #[test]
    fn test_profile_row_with_null_permissions() {
        let row = r#"{
            "id": "u1",
            "first_name": "Ada",
            "last_name": "Byron",
            "email": "ada@example.org",
            "phone": null,
            "role": "teacher",
            "status": "active",
            "permissions": null
        }"#;
        let profile: UserProfile = serde_json::from_str(row).unwrap();
        assert!(profile.permissions.is_empty());
        assert_eq!(profile.display_name(), "Ada Byron");
        assert_eq!(profile.initials(), "AB");
    }

    #[test]
    fn test_display_name_falls_back_to_email() {
        let mut profile = UserProfile::default_for("blank@example.org");
        profile.first_name.clear();
        profile.last_name = "  ".to_string();
        assert_eq!(profile.display_name(), "blank@example.org");
        assert_eq!(profile.initials(), "");
    }

    #[test]
    fn test_daily_note_row() {
        let row = r#"{
            "id": "n1",
            "student_name": "Sam",
            "program_name": "Early Learning",
            "author_name": "Ms. Lee",
            "created_at": "2024-03-04T09:15:00.123456+00:00",
            "notes": "plain text",
            "tags": ["reading"]
        }"#;
        let note: DailyNote = serde_json::from_str(row).unwrap();
        assert_eq!(note.student_name, "Sam");
        assert_eq!(note.tags, vec!["reading".to_string()]);
        assert_eq!(note.created_at.format("%Y-%m-%d").to_string(), "2024-03-04");
    }
}
