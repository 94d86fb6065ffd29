//! The single ingestion surface tying buffer, collapsing, and chat log
//! together.
//!
//! Hosts hand lines and commands in and get values back; the buffer and both
//! log collections stay owned here. All calls are synchronous and total:
//! nothing on the display path returns an error or panics.

use std::io;
use std::path::Path;

use crate::buffer::{MessageBuffer, RemovedLine};
use crate::chatlog::ChatLog;
use crate::collapse::collapse;
use crate::config::ChatConfig;
use crate::flags::{Flag, FlagSet};
use crate::line::{Line, LineKind};

/// Result of a host clear request. `Cancelled` means the configuration
/// vetoed the wipe and the host must skip its own destructive clearing too.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    Cleared,
    Cancelled,
}

impl ClearOutcome {
    pub fn is_cancelled(self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

/// Chat post-processing pipeline for one display session.
#[derive(Debug)]
pub struct ChatPipeline {
    config: ChatConfig,
    buffer: MessageBuffer,
    chatlog: ChatLog,
    flags: FlagSet,
}

impl ChatPipeline {
    /// A pipeline without durable storage.
    pub fn new(config: ChatConfig) -> Self {
        let buffer = MessageBuffer::new(config.max_messages);
        Self {
            config,
            buffer,
            chatlog: ChatLog::in_memory(),
            flags: FlagSet::new(),
        }
    }

    /// A pipeline whose chat log lives under `dir`. Previously persisted
    /// content is loaded, ready for [`ChatPipeline::restore_messages`].
    /// Falls back to an in-memory log when the chat log is disabled.
    pub fn with_chatlog_dir(config: ChatConfig, dir: &Path) -> io::Result<Self> {
        let chatlog = if config.chatlog {
            ChatLog::open(dir)?
        } else {
            ChatLog::in_memory()
        };
        let buffer = MessageBuffer::new(config.max_messages);
        Ok(Self {
            config,
            buffer,
            chatlog,
            flags: FlagSet::new(),
        })
    }

    /// Inbound display path. Collapses the line into a recent duplicate when
    /// eligible, inserts the result as the new head, mirrors it to the chat
    /// log, and returns it for the renderer.
    ///
    /// `refreshing` marks a redraw replay of already-processed content: the
    /// engine and the log are bypassed entirely so collapsed lines are not
    /// re-collapsed and the log is not double-fed. The same bypass applies
    /// while a restore is in progress.
    pub fn add_message(&mut self, line: Line, refreshing: bool) -> Line {
        if refreshing || self.flags.is_raised(Flag::Restoring) {
            self.buffer.push_front(line.clone());
            return line;
        }

        let processed = if self.config.counter && line.kind() == LineKind::Chat {
            collapse(line, &mut self.buffer, self.config.lookback_policy())
        } else {
            line
        };

        self.buffer.push_front(processed.clone());
        self.chatlog.append_message(&processed, &self.flags);
        processed
    }

    /// Inbound send path: record a sent command, unless it is being replayed
    /// from storage.
    pub fn add_history(&mut self, command: &str) {
        self.chatlog.append_history(command, &self.flags);
    }

    /// The host's native command log should stay off while the durable chat
    /// log covers it.
    pub fn host_command_log_enabled(&self) -> bool {
        !self.config.chatlog
    }

    /// Whether the host must skip its own logging for a line it re-displays.
    /// True while restoring for entries the host tagged as restored.
    pub fn suppress_host_line_log(&self, restored_tag: Option<&str>) -> bool {
        self.flags.is_raised(Flag::Restoring) && restored_tag.is_some()
    }

    /// Host clear request. Vetoed entirely (no partial work) unless the
    /// configuration allows host-triggered clearing; when allowed, empties
    /// the buffer and both chat log collections regardless of
    /// `clear_history`.
    pub fn clear(&mut self, clear_history: bool) -> ClearOutcome {
        if !self.config.host_clearing {
            tracing::debug!(clear_history, "host clear vetoed by configuration");
            return ClearOutcome::Cancelled;
        }
        self.buffer.clear();
        self.chatlog.clear_messages();
        self.chatlog.clear_history();
        ClearOutcome::Cleared
    }

    /// Replay persisted line snapshots into the live buffer. The restoring
    /// latch stays raised throughout, so the replay neither collapses nor
    /// re-persists anything. At most the newest `max_messages` snapshots are
    /// replayed. Returns the number of lines restored.
    pub fn restore_messages(&mut self) -> usize {
        let snapshot: Vec<Line> = self.chatlog.messages().to_vec();
        let skip = snapshot.len().saturating_sub(self.config.max_messages);

        self.flags.raise(Flag::Restoring);
        let mut restored = 0;
        for line in snapshot.into_iter().skip(skip) {
            self.add_message(line, false);
            restored += 1;
        }
        self.flags.lower(Flag::Restoring);

        if restored > 0 {
            tracing::debug!(restored, "replayed chat lines from the log");
        }
        restored
    }

    /// Hand persisted sent commands to the host's input-history widget,
    /// oldest first. The restoring latch stays raised for the duration so
    /// the handoff cannot re-append what it is replaying.
    pub fn restore_history<F: FnMut(&str)>(&mut self, mut sink: F) -> usize {
        self.flags.raise(Flag::Restoring);
        let mut restored = 0;
        for command in self.chatlog.history() {
            sink(command);
            restored += 1;
        }
        self.flags.lower(Flag::Restoring);
        restored
    }

    /// Renderer sync: which rows are on screen.
    pub fn sync_viewport(&mut self, scroll_offset: usize, visible_rows: usize) {
        self.buffer.sync_viewport(scroll_offset, visible_rows);
    }

    /// Drain removal instructions for the renderer.
    pub fn take_removals(&mut self) -> Vec<RemovedLine> {
        self.buffer.take_removals()
    }

    /// Session-end persistence point. Best-effort, like every other write.
    pub fn flush(&mut self) {
        if let Err(err) = self.chatlog.flush() {
            tracing::warn!(error = %err, "chat log flush failed");
        }
    }

    pub fn config(&self) -> &ChatConfig {
        &self.config
    }

    pub fn buffer(&self) -> &MessageBuffer {
        &self.buffer
    }

    pub fn chatlog(&self) -> &ChatLog {
        &self.chatlog
    }
}
