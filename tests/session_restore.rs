//! Cross-session persistence: what one session writes, the next one can
//! replay without growing the log or re-collapsing anything.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use chatfold::{ChatConfig, ChatPipeline, ClearOutcome, Line};

fn temp_dir(suffix: &str) -> PathBuf {
    let pid = std::process::id();
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    std::env::temp_dir().join(format!("chatfold-session-{suffix}-{pid}-{nanos}"))
}

#[test]
fn restore_replays_the_previous_session() {
    let dir = temp_dir("replay");
    {
        let mut session =
            ChatPipeline::with_chatlog_dir(ChatConfig::default(), &dir).expect("open session");
        session.add_message(Line::plain("welcome"), false);
        session.add_message(Line::plain("WELCOME"), false);
        session.add_history("/login guest");
        session.flush();
    }

    let mut next =
        ChatPipeline::with_chatlog_dir(ChatConfig::default(), &dir).expect("reopen session");
    let restored = next.restore_messages();
    assert_eq!(restored, 2);
    assert_eq!(next.buffer().len(), 2);

    // The newest restored line carries the collapsed counter from last time.
    let head = next.buffer().get(0).expect("head line");
    assert_eq!(head.count(), 2);
    assert_eq!(head.content(), Some("welcome"));

    // Replaying must not grow the log.
    assert_eq!(next.chatlog().messages().len(), 2);

    let mut commands = Vec::new();
    next.restore_history(|command| commands.push(command.to_string()));
    assert_eq!(commands, ["/login guest"]);
    assert_eq!(next.chatlog().history().len(), 1);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn vetoed_clear_survives_a_session_boundary() {
    let dir = temp_dir("veto");
    {
        let mut session =
            ChatPipeline::with_chatlog_dir(ChatConfig::default(), &dir).expect("open session");
        session.add_message(Line::plain("precious"), false);
        session.add_history("/keep");

        // Default config protects the chat from host-triggered wipes.
        assert_eq!(session.clear(false), ClearOutcome::Cancelled);
        session.flush();
    }

    let next =
        ChatPipeline::with_chatlog_dir(ChatConfig::default(), &dir).expect("reopen session");
    assert_eq!(next.chatlog().messages().len(), 1);
    assert_eq!(next.chatlog().history(), ["/keep"]);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn allowed_clear_truncates_the_files() {
    let dir = temp_dir("clear");
    let config = ChatConfig {
        host_clearing: true,
        ..ChatConfig::default()
    };
    {
        let mut session =
            ChatPipeline::with_chatlog_dir(config.clone(), &dir).expect("open session");
        session.add_message(Line::plain("gone"), false);
        session.add_history("/gone");
        assert_eq!(session.clear(false), ClearOutcome::Cleared);
        session.flush();
    }

    let next = ChatPipeline::with_chatlog_dir(config, &dir).expect("reopen session");
    assert!(next.chatlog().messages().is_empty());
    assert!(next.chatlog().history().is_empty());

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn disabled_chatlog_never_touches_disk() {
    let dir = temp_dir("disabled");
    let config = ChatConfig {
        chatlog: false,
        ..ChatConfig::default()
    };
    {
        let mut session =
            ChatPipeline::with_chatlog_dir(config, &dir).expect("open session");
        session.add_message(Line::plain("ephemeral"), false);
        session.add_history("/ephemeral");
        session.flush();
    }

    assert!(!dir.exists());
}
