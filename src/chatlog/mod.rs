//! Durable history store for sent commands and displayed chat lines.
//!
//! Two logically separate collections, cleared independently but usually
//! together: the commands the user sent, and snapshots of the lines the
//! display showed. In-memory state is authoritative for the session; the
//! JSONL mirrors are best-effort durability, never a transactional guarantee.

mod jsonl;

use std::io;
use std::path::Path;

use crate::flags::{Flag, FlagSet};
use crate::line::Line;
use jsonl::JsonlFile;

/// File name of the sent-command collection inside the chat log directory.
pub const HISTORY_FILE: &str = "history.jsonl";
/// File name of the displayed-line collection inside the chat log directory.
pub const MESSAGES_FILE: &str = "messages.jsonl";

#[derive(Debug)]
pub struct ChatLog {
    history: Vec<String>,
    messages: Vec<Line>,
    history_file: Option<JsonlFile>,
    messages_file: Option<JsonlFile>,
}

impl ChatLog {
    /// A store with no file mirrors, for disabled persistence and tests.
    pub fn in_memory() -> Self {
        Self {
            history: Vec::new(),
            messages: Vec::new(),
            history_file: None,
            messages_file: None,
        }
    }

    /// Open (creating if needed) both collections under `dir` and load their
    /// existing content so a later restore can replay it.
    pub fn open(dir: &Path) -> io::Result<Self> {
        let history_path = dir.join(HISTORY_FILE);
        let messages_path = dir.join(MESSAGES_FILE);

        let history_file = JsonlFile::open(&history_path)?;
        let messages_file = JsonlFile::open(&messages_path)?;

        let history = jsonl::read_all(&history_path)?;
        let messages = jsonl::read_all(&messages_path)?;

        Ok(Self {
            history,
            messages,
            history_file: Some(history_file),
            messages_file: Some(messages_file),
        })
    }

    /// Whether the store mirrors to disk.
    pub fn is_persistent(&self) -> bool {
        self.history_file.is_some()
    }

    /// Sent commands, oldest first.
    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Displayed-line snapshots, oldest first.
    pub fn messages(&self) -> &[Line] {
        &self.messages
    }

    /// Record a sent command, unless it is itself being replayed from
    /// storage. Blank commands are dropped.
    pub fn append_history(&mut self, command: &str, flags: &FlagSet) {
        if flags.is_raised(Flag::Restoring) {
            return;
        }
        let trimmed = command.trim();
        if trimmed.is_empty() {
            return;
        }
        self.history.push(trimmed.to_string());
        if let Some(file) = self.history_file.as_mut() {
            if let Err(err) = file.append(&trimmed) {
                tracing::warn!(error = %err, "command history append failed; in-memory copy kept");
            }
        }
    }

    /// Record a displayed line, unless it is itself being replayed from
    /// storage.
    pub fn append_message(&mut self, line: &Line, flags: &FlagSet) {
        if flags.is_raised(Flag::Restoring) {
            return;
        }
        self.messages.push(line.clone());
        if let Some(file) = self.messages_file.as_mut() {
            if let Err(err) = file.append(line) {
                tracing::warn!(error = %err, "chat log append failed; in-memory copy kept");
            }
        }
    }

    /// Empty the sent-command collection and truncate its file. Idempotent.
    pub fn clear_history(&mut self) {
        self.history.clear();
        if let Some(file) = self.history_file.as_mut() {
            if let Err(err) = file.clear() {
                tracing::warn!(error = %err, "command history truncate failed");
            }
        }
    }

    /// Empty the displayed-line collection and truncate its file. Idempotent.
    pub fn clear_messages(&mut self) {
        self.messages.clear();
        if let Some(file) = self.messages_file.as_mut() {
            if let Err(err) = file.clear() {
                tracing::warn!(error = %err, "chat log truncate failed");
            }
        }
    }

    /// Flush both file mirrors (session-end persistence point).
    pub fn flush(&mut self) -> io::Result<()> {
        if let Some(file) = self.history_file.as_mut() {
            file.flush()?;
        }
        if let Some(file) = self.messages_file.as_mut() {
            file.flush()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(suffix: &str) -> PathBuf {
        let pid = std::process::id();
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        std::env::temp_dir().join(format!("chatfold-chatlog-{suffix}-{pid}-{nanos}"))
    }

    #[test]
    fn appends_land_in_both_collections() {
        let flags = FlagSet::new();
        let mut log = ChatLog::in_memory();
        log.append_history("/help", &flags);
        log.append_message(&Line::plain("hello"), &flags);

        assert_eq!(log.history(), ["/help"]);
        assert_eq!(log.messages().len(), 1);
    }

    #[test]
    fn restoring_flag_suppresses_appends() {
        let mut flags = FlagSet::new();
        flags.raise(Flag::Restoring);

        let mut log = ChatLog::in_memory();
        log.append_history("/replayed", &flags);
        log.append_message(&Line::plain("replayed"), &flags);

        assert!(log.history().is_empty());
        assert!(log.messages().is_empty());
    }

    #[test]
    fn blank_commands_are_dropped() {
        let flags = FlagSet::new();
        let mut log = ChatLog::in_memory();
        log.append_history("   ", &flags);
        log.append_history("", &flags);
        assert!(log.history().is_empty());
    }

    #[test]
    fn clears_are_independent_and_idempotent() {
        let flags = FlagSet::new();
        let mut log = ChatLog::in_memory();
        log.append_history("/one", &flags);
        log.append_message(&Line::plain("one"), &flags);

        log.clear_history();
        assert!(log.history().is_empty());
        assert_eq!(log.messages().len(), 1);

        log.clear_messages();
        log.clear_messages();
        assert!(log.messages().is_empty());
    }

    #[test]
    fn open_loads_previously_persisted_content() {
        let dir = temp_dir("roundtrip");
        let flags = FlagSet::new();
        {
            let mut log = ChatLog::open(&dir).expect("open");
            log.append_history("/first", &flags);
            log.append_message(&Line::plain("alpha"), &flags);
            log.append_message(&Line::decorated("[12:00] ", "beta"), &flags);
            log.flush().expect("flush");
        }

        let reopened = ChatLog::open(&dir).expect("reopen");
        assert_eq!(reopened.history(), ["/first"]);
        assert_eq!(reopened.messages().len(), 2);
        assert_eq!(reopened.messages()[1].content(), Some("beta"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn clear_reaches_the_files() {
        let dir = temp_dir("clearfiles");
        let flags = FlagSet::new();
        {
            let mut log = ChatLog::open(&dir).expect("open");
            log.append_history("/gone", &flags);
            log.append_message(&Line::plain("gone"), &flags);
            log.clear_history();
            log.clear_messages();
            log.flush().expect("flush");
        }

        let reopened = ChatLog::open(&dir).expect("reopen");
        assert!(reopened.history().is_empty());
        assert!(reopened.messages().is_empty());

        let _ = std::fs::remove_dir_all(&dir);
    }
}
