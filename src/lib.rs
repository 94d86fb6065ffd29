//! Chat-line post-processing between a host display pipeline and durable
//! chat logs.
//!
//! Incoming display-ready lines pass through a duplicate-collapsing engine
//! backed by a bounded newest-first buffer; sent commands and displayed
//! lines are mirrored into an append-only chat log that can be replayed at
//! session start without re-triggering either path.

pub mod buffer;
pub mod chatlog;
pub mod collapse;
pub mod config;
pub mod flags;
pub mod line;
pub mod pipeline;

pub use buffer::{MessageBuffer, RemovalReason, RemovedLine};
pub use chatlog::ChatLog;
pub use collapse::{collapse, LookbackPolicy};
pub use config::ChatConfig;
pub use flags::{Flag, FlagSet};
pub use line::{Line, LineKind, Segment};
pub use pipeline::{ChatPipeline, ClearOutcome};
