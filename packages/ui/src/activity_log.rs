//! In-app record of user-visible operations (saves, deletes, failures).

use dioxus::prelude::*;

/// Entries kept before the oldest are dropped.
const MAX_ENTRIES: usize = 200;

#[derive(Clone, Debug, PartialEq)]
pub enum LogLevel {
    Info,
    Success,
    Warning,
    Error,
}

impl LogLevel {
    /// Short label shown next to each entry.
    pub fn label(&self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Success => "done",
            LogLevel::Warning => "warning",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

#[derive(Clone, Debug, Default)]
pub struct ActivityLog {
    pub entries: Vec<LogEntry>,
    pub visible: bool,
}

impl ActivityLog {
    pub fn push(&mut self, level: LogLevel, message: &str) {
        self.entries.push(LogEntry {
            timestamp: chrono::Local::now().format("%H:%M:%S").to_string(),
            level,
            message: message.to_string(),
        });
        if self.entries.len() > MAX_ENTRIES {
            let excess = self.entries.len() - MAX_ENTRIES;
            self.entries.drain(..excess);
        }
    }

    pub fn error_count(&self) -> usize {
        self.entries.iter().filter(|e| e.level == LogLevel::Error).count()
    }

    /// Newest first, as the drawer lists them.
    pub fn recent(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().rev()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

pub fn use_activity_log() -> Signal<ActivityLog> {
    use_context::<Signal<ActivityLog>>()
}

pub fn log_activity(log: &mut Signal<ActivityLog>, level: LogLevel, message: &str) {
    log.write().push(level, message);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_is_bounded() {
        let mut log = ActivityLog::default();
        for i in 0..(MAX_ENTRIES + 5) {
            log.push(LogLevel::Info, &format!("entry {i}"));
        }
        assert_eq!(log.entries.len(), MAX_ENTRIES);
        assert_eq!(log.entries[0].message, "entry 5");
    }

    #[test]
    fn test_error_count() {
        let mut log = ActivityLog::default();
        log.push(LogLevel::Error, "a");
        log.push(LogLevel::Success, "b");
        log.push(LogLevel::Error, "c");
        assert_eq!(log.error_count(), 2);
    }

    #[test]
    fn test_recent_lists_newest_first_and_clear_keeps_drawer_open() {
        let mut log = ActivityLog::default();
        log.toggle();
        log.push(LogLevel::Info, "signed in");
        log.push(LogLevel::Success, "saved note");
        let messages: Vec<&str> = log.recent().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["saved note", "signed in"]);

        log.clear();
        assert!(log.entries.is_empty());
        assert!(log.visible);
        log.toggle();
        assert!(!log.visible);
    }
}
