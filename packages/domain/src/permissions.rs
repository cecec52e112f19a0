//! Capability checks derived from a [`UserProfile`].

use std::collections::BTreeSet;

use crate::models::UserProfile;

/// Permission value that grants every capability.
pub const ALL_PERMISSIONS: &str = "all";

/// Whether `profile` grants `permission`. No profile grants nothing.
pub fn has_permission(profile: Option<&UserProfile>, permission: &str) -> bool {
    match profile {
        None => false,
        Some(p) => p.permissions.contains(ALL_PERMISSIONS) || p.permissions.contains(permission),
    }
}

/// Whether `profile` carries exactly `role`.
pub fn has_role(profile: Option<&UserProfile>, role: &str) -> bool {
    profile.is_some_and(|p| p.role == role)
}

/// The profile's permission set, empty when signed out.
pub fn permissions(profile: Option<&UserProfile>) -> BTreeSet<String> {
    profile.map(|p| p.permissions.clone()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile_with(role: &str, permissions: &[&str]) -> UserProfile {
        UserProfile {
            role: role.to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            ..UserProfile::default_for("t@example.org")
        }
    }

    #[test]
    fn test_absent_profile_has_nothing() {
        assert!(!has_permission(None, "students.read"));
        assert!(!has_permission(None, ALL_PERMISSIONS));
        assert!(!has_role(None, "administrator"));
        assert!(permissions(None).is_empty());
    }

    #[test]
    fn test_all_sentinel_grants_everything() {
        let profile = profile_with("teacher", &["all"]);
        for name in ["students.read", "attendance.write", "", "anything at all", "all"] {
            assert!(has_permission(Some(&profile), name), "{name}");
        }
    }

    #[test]
    fn test_membership() {
        let profile = profile_with("therapist", &["dailynotes.write", "students.read"]);
        assert!(has_permission(Some(&profile), "students.read"));
        assert!(!has_permission(Some(&profile), "students.write"));
        assert!(!has_permission(Some(&profile), "all"));
    }

    #[test]
    fn test_role_is_exact_match() {
        let profile = profile_with("teacher", &[]);
        assert!(has_role(Some(&profile), "teacher"));
        assert!(!has_role(Some(&profile), "Teacher"));
        assert!(!has_role(Some(&profile), "administrator"));
    }
}
