//! Demo driver: feeds display lines from stdin through the pipeline and
//! prints what a renderer would do with them.
//!
//! A stand-in for a host display path, not a UI. Lines starting with `/` are
//! treated as sent commands and recorded in the command history; everything
//! else is ingested as a chat line.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use chatfold::{ChatConfig, ChatPipeline, Line};

#[derive(Debug, Parser)]
#[command(name = "chatfold", version, about = "Collapse duplicate chat lines and keep a durable chat log")]
struct Cli {
    /// Maximum lines kept in the display buffer.
    #[arg(long, env = "CHATFOLD_MAX_MESSAGES")]
    max_messages: Option<usize>,

    /// Scan this many recent lines for duplicates; -1 scans the whole
    /// buffer, 0 follows the rendered row count. Enables extended lookback.
    #[arg(long, allow_hyphen_values = true)]
    lookback: Option<i32>,

    /// Disable the duplicate-occurrence counter.
    #[arg(long)]
    no_counter: bool,

    /// Chat log directory (defaults to the platform data dir).
    #[arg(long, env = "CHATFOLD_LOG_DIR")]
    chatlog_dir: Option<PathBuf>,

    /// Run without a durable chat log.
    #[arg(long)]
    no_chatlog: bool,

    /// Replay the persisted chat log into the buffer before reading stdin.
    #[arg(long)]
    restore: bool,

    /// Config file to load instead of the platform default.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let config = resolve_config(&cli)?;
    let mut pipeline = match chatlog_dir(&cli, &config) {
        Some(dir) => ChatPipeline::with_chatlog_dir(config, &dir)?,
        None => ChatPipeline::new(config),
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if cli.restore {
        let restored = pipeline.restore_messages();
        let lines: Vec<String> = pipeline.buffer().lines().map(Line::to_string).collect();
        for line in lines.iter().rev() {
            writeln!(out, "  + {line}")?;
        }
        writeln!(out, "-- restored {restored} lines --")?;
    }

    let stdin = io::stdin();
    for raw in stdin.lock().lines() {
        let raw = raw?;
        let text = sanitize(&raw);
        if text.is_empty() {
            continue;
        }
        if text.starts_with('/') {
            pipeline.add_history(&text);
            writeln!(out, "  > {text}")?;
            continue;
        }

        let shown = pipeline.add_message(Line::plain(text), false);
        for removal in pipeline.take_removals() {
            writeln!(out, "  - remove [{}] {}", removal.index, removal.line)?;
        }
        writeln!(out, "  + {shown}")?;
    }

    pipeline.flush();
    Ok(())
}

/// Raw terminal lines may carry ANSI escapes; comparisons want plain text.
fn sanitize(raw: &str) -> String {
    let stripped = strip_ansi_escapes::strip(raw.as_bytes());
    String::from_utf8_lossy(&stripped).trim().to_string()
}

fn resolve_config(cli: &Cli) -> Result<ChatConfig> {
    let mut config = match &cli.config {
        Some(path) => ChatConfig::load(path)?,
        None => match ChatConfig::default_path() {
            Some(path) if path.exists() => ChatConfig::load(&path)?,
            _ => ChatConfig::default(),
        },
    };
    if let Some(max_messages) = cli.max_messages {
        config.max_messages = max_messages;
    }
    if let Some(distance) = cli.lookback {
        config.counter_compact = true;
        config.counter_compact_distance = distance;
    }
    if cli.no_counter {
        config.counter = false;
    }
    if cli.no_chatlog {
        config.chatlog = false;
    }
    Ok(config)
}

fn chatlog_dir(cli: &Cli, config: &ChatConfig) -> Option<PathBuf> {
    if !config.chatlog {
        return None;
    }
    cli.chatlog_dir
        .clone()
        .or_else(ChatConfig::default_chatlog_dir)
}
