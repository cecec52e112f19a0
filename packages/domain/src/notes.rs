//! # Daily note payloads
//!
//! The `notes` column of a daily note holds either a JSON object written by the
//! structured note form or free text from before that form existed. This module
//! decodes both into a [`StructuredNote`] for display and editing.
//!
//! Decoding is total: any input, including the empty string and malformed JSON,
//! produces a valid note. Text that is not a JSON object becomes
//! [`NotePayload::PlainText`] and lands in `general_notes`. Inside a JSON object
//! each known key is read on its own, so one badly typed value only resets that
//! field to its default.
//!
//! [`StructuredNote::to_json`] writes the camelCase keys read here, which makes
//! `interpret(&note.to_json(), _)` reproduce `note`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_CATEGORY: &str = "other";
pub const DEFAULT_MOOD: &str = "neutral";
pub const DEFAULT_PRIORITY: &str = "medium";
pub const EMPTY_PREVIEW: &str = "No notes recorded";

/// `(value, label)` pairs offered by the note form.
pub const CATEGORIES: &[(&str, &str)] = &[
    ("academic", "Academic"),
    ("behavioral", "Behavioral"),
    ("social", "Social"),
    ("therapy", "Therapy"),
    ("medical", "Medical"),
    ("communication", "Communication"),
    ("other", "Other"),
];

pub const MOODS: &[(&str, &str)] = &[
    ("excellent", "Excellent"),
    ("good", "Good"),
    ("neutral", "Neutral"),
    ("difficult", "Difficult"),
    ("challenging", "Challenging"),
];

pub const PRIORITIES: &[(&str, &str)] = &[("low", "Low"), ("medium", "Medium"), ("high", "High")];

/// Decoded form of a daily note's `notes` column.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructuredNote {
    pub category: String,
    pub overall_mood: String,
    pub general_notes: String,
    pub behavior_notes: String,
    pub academic_progress: String,
    pub social_interaction: String,
    pub activities_participated: String,
    pub achievements_successes: String,
    pub concerns_challenges: String,
    pub priority: String,
    pub parent_contacted: bool,
    pub parent_contact_notes: String,
    pub follow_up_needed: bool,
    pub follow_up_assignee: String,
    pub tags: Vec<String>,
}

impl Default for StructuredNote {
    fn default() -> Self {
        Self {
            category: DEFAULT_CATEGORY.to_string(),
            overall_mood: DEFAULT_MOOD.to_string(),
            general_notes: String::new(),
            behavior_notes: String::new(),
            academic_progress: String::new(),
            social_interaction: String::new(),
            activities_participated: String::new(),
            achievements_successes: String::new(),
            concerns_challenges: String::new(),
            priority: DEFAULT_PRIORITY.to_string(),
            parent_contacted: false,
            parent_contact_notes: String::new(),
            follow_up_needed: false,
            follow_up_assignee: String::new(),
            tags: Vec::new(),
        }
    }
}

/// A note payload as found in storage.
#[derive(Clone, Debug, PartialEq)]
pub enum NotePayload {
    Structured(StructuredNote),
    PlainText(String),
}

impl NotePayload {
    /// Classify `raw`. Only a JSON object counts as structured.
    pub fn decode(raw: &str) -> Self {
        match serde_json::from_str::<Value>(raw) {
            Ok(Value::Object(map)) => NotePayload::Structured(StructuredNote::from_map(&map)),
            _ => NotePayload::PlainText(raw.to_string()),
        }
    }

    /// Flatten into a [`StructuredNote`]. Plain text becomes the general notes
    /// and takes `fallback_category` (or `"other"`).
    pub fn into_structured(self, fallback_category: Option<&str>) -> StructuredNote {
        match self {
            NotePayload::Structured(note) => note,
            NotePayload::PlainText(text) => StructuredNote {
                category: fallback_category
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or(DEFAULT_CATEGORY)
                    .to_string(),
                general_notes: text,
                ..StructuredNote::default()
            },
        }
    }

    pub fn is_structured(&self) -> bool {
        matches!(self, NotePayload::Structured(_))
    }
}

/// Decode a raw `notes` value for display. Never fails.
pub fn interpret(raw: &str, fallback_category: Option<&str>) -> StructuredNote {
    NotePayload::decode(raw).into_structured(fallback_category)
}

/// The first non-empty text section, or [`EMPTY_PREVIEW`].
pub fn summarize(note: &StructuredNote) -> &str {
    summarize_or(note, EMPTY_PREVIEW)
}

/// [`summarize`] with a caller-chosen placeholder.
pub fn summarize_or<'a>(note: &'a StructuredNote, placeholder: &'a str) -> &'a str {
    note.first_section().unwrap_or(placeholder)
}

/// Collapse `text` onto one line and cut it at `max_chars`.
pub fn one_line(text: &str, max_chars: usize) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.chars().count() <= max_chars {
        return joined;
    }
    let mut cut: String = joined.chars().take(max_chars).collect();
    cut.push('…');
    cut
}

/// Human label for a value from one of the option tables.
pub fn label_for<'a>(options: &'a [(&'a str, &'a str)], value: &'a str) -> &'a str {
    options
        .iter()
        .find(|(v, _)| *v == value)
        .map(|(_, label)| *label)
        .unwrap_or(value)
}

impl StructuredNote {
    fn from_map(map: &Map<String, Value>) -> Self {
        let defaults = StructuredNote::default();
        Self {
            category: keyword(map, "category").unwrap_or(defaults.category),
            overall_mood: keyword(map, "overallMood").unwrap_or(defaults.overall_mood),
            general_notes: text(map, "generalNotes"),
            behavior_notes: text(map, "behaviorNotes"),
            academic_progress: text(map, "academicProgress"),
            social_interaction: text(map, "socialInteraction"),
            activities_participated: text(map, "activitiesParticipated"),
            achievements_successes: text(map, "achievementsSuccesses"),
            concerns_challenges: text(map, "concernsChallenges"),
            priority: keyword(map, "priority").unwrap_or(defaults.priority),
            parent_contacted: flag(map, "parentContacted"),
            parent_contact_notes: text(map, "parentContactNotes"),
            follow_up_needed: flag(map, "followUpNeeded"),
            follow_up_assignee: text(map, "followUpAssignee"),
            tags: tag_list(map.get("tags")),
        }
    }

    /// Serialize with the camelCase keys the decoder reads.
    pub fn to_json(&self) -> String {
        // Only strings, bools and a Vec<String>; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// The seven free-text sections in preview order, with their labels.
    pub fn sections(&self) -> [(&'static str, &str); 7] {
        [
            ("General Notes", self.general_notes.as_str()),
            ("Behavior", self.behavior_notes.as_str()),
            ("Academic Progress", self.academic_progress.as_str()),
            ("Social Interaction", self.social_interaction.as_str()),
            ("Activities", self.activities_participated.as_str()),
            ("Achievements", self.achievements_successes.as_str()),
            ("Concerns / Challenges", self.concerns_challenges.as_str()),
        ]
    }

    fn first_section(&self) -> Option<&str> {
        self.sections()
            .into_iter()
            .map(|(_, value)| value)
            .find(|value| !value.trim().is_empty())
    }

    pub fn is_high_priority(&self) -> bool {
        self.priority == "high"
    }
}

fn text(map: &Map<String, Value>, key: &str) -> String {
    match map.get(key) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    }
}

/// Like [`text`] but blank counts as missing.
fn keyword(map: &Map<String, Value>, key: &str) -> Option<String> {
    Some(text(map, key)).filter(|s| !s.trim().is_empty())
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    match map.get(key) {
        Some(Value::Bool(b)) => *b,
        Some(Value::String(s)) => matches!(s.trim(), "true" | "yes"),
        _ => false,
    }
}

fn tag_list(value: Option<&Value>) -> Vec<String> {
    let cleaned = |s: &str| Some(s.trim().to_string()).filter(|t| !t.is_empty());
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .filter_map(cleaned)
            .collect(),
        Some(Value::String(s)) => s.split(',').filter_map(cleaned).collect(),
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_with_defaults() {
        let note = interpret(r#"{"category":"academic","generalNotes":"ok"}"#, None);
        assert_eq!(
            note,
            StructuredNote {
                category: "academic".to_string(),
                general_notes: "ok".to_string(),
                ..StructuredNote::default()
            }
        );
        assert_eq!(note.priority, "medium");
        assert_eq!(note.overall_mood, "neutral");
        assert!(!note.parent_contacted);
        assert!(!note.follow_up_needed);
        assert!(note.tags.is_empty());
    }

    #[test]
    fn test_plain_text_fallback() {
        let note = interpret("plain text", Some("behavioral"));
        assert_eq!(note.general_notes, "plain text");
        assert_eq!(note.category, "behavioral");
        assert!(note.tags.is_empty());
        assert_eq!(note.priority, "medium");

        let note = interpret("plain text", None);
        assert_eq!(note.category, "other");
        let note = interpret("plain text", Some("  "));
        assert_eq!(note.category, "other");
    }

    #[test]
    fn test_never_fails() {
        let inputs = [
            "",
            " ",
            "{",
            "{\"category\":",
            "null",
            "42",
            "\"quoted\"",
            "[1,2,3]",
            "{}",
            "{\"tags\":{\"a\":1}}",
            "\u{0}\u{ffff}",
        ];
        for raw in inputs {
            let note = interpret(raw, None);
            assert_eq!(note.category, "other", "{raw:?}");
        }
    }

    #[test]
    fn test_non_object_json_is_plain_text() {
        assert_eq!(NotePayload::decode("42"), NotePayload::PlainText("42".to_string()));
        assert_eq!(interpret("[\"a\"]", None).general_notes, "[\"a\"]");
        assert!(NotePayload::decode("{}").is_structured());
        assert_eq!(interpret("", None).general_notes, "");
    }

    #[test]
    fn test_badly_typed_fields_reset_individually() {
        let raw = r#"{
            "category": "",
            "overallMood": 7,
            "priority": null,
            "parentContacted": "yes",
            "followUpNeeded": 1,
            "behaviorNotes": ["not", "text"],
            "concernsChallenges": "tired",
            "tags": ["a", 3, " ", "b "]
        }"#;
        let note = interpret(raw, Some("medical"));
        assert_eq!(note.category, "other");
        assert_eq!(note.overall_mood, "7");
        assert_eq!(note.priority, "medium");
        assert!(note.parent_contacted);
        assert!(!note.follow_up_needed);
        assert_eq!(note.behavior_notes, "");
        assert_eq!(note.concerns_challenges, "tired");
        assert_eq!(note.tags, vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn test_comma_separated_tags() {
        let note = interpret(r#"{"tags":"reading, math,,"}"#, None);
        assert_eq!(note.tags, vec!["reading".to_string(), "math".to_string()]);
    }

    #[test]
    fn test_reencoding_is_stable() {
        let original = StructuredNote {
            category: "social".to_string(),
            overall_mood: "good".to_string(),
            general_notes: "Played with peers".to_string(),
            behavior_notes: "Calm".to_string(),
            achievements_successes: "Shared toys".to_string(),
            priority: "high".to_string(),
            parent_contacted: true,
            parent_contact_notes: "Called mom".to_string(),
            follow_up_needed: true,
            follow_up_assignee: "Ms. Lee".to_string(),
            tags: vec!["sharing".to_string()],
            ..StructuredNote::default()
        };
        let decoded = interpret(&original.to_json(), Some("academic"));
        assert_eq!(decoded, original);
        assert_eq!(interpret(&decoded.to_json(), None), decoded);
        assert!(original.to_json().contains("\"followUpAssignee\""));
    }

    #[test]
    fn test_summary_picks_first_non_empty_section() {
        let note = StructuredNote {
            concerns_challenges: "Refused lunch".to_string(),
            ..StructuredNote::default()
        };
        assert_eq!(summarize(&note), "Refused lunch");

        let note = StructuredNote {
            general_notes: "   ".to_string(),
            social_interaction: "Joined circle time".to_string(),
            concerns_challenges: "Refused lunch".to_string(),
            ..StructuredNote::default()
        };
        assert_eq!(summarize(&note), "Joined circle time");

        assert_eq!(summarize(&StructuredNote::default()), EMPTY_PREVIEW);
        assert_eq!(summarize_or(&StructuredNote::default(), "-"), "-");
    }

    #[test]
    fn test_one_line() {
        assert_eq!(one_line("a\n  b\tc", 10), "a b c");
        assert_eq!(one_line("abcdef", 3), "abc…");
        assert_eq!(one_line("", 3), "");
    }

    #[test]
    fn test_label_for() {
        assert_eq!(label_for(CATEGORIES, "academic"), "Academic");
        assert_eq!(label_for(PRIORITIES, "urgent"), "urgent");
    }
}
