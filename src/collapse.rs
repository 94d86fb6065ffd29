//! Duplicate-line collapsing with a configurable lookback window.
//!
//! The engine compares content segments only (case-insensitive), so
//! timestamps and badges never defeat a match. A match produces a new line
//! carrying an incremented counter badge and removes the superseded record
//! from the buffer; the caller inserts the result as the new head.

use crate::buffer::{MessageBuffer, RemovalReason};
use crate::line::{Line, LineKind};

/// How far back the engine hunts for a duplicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookbackPolicy {
    /// Only the most recent line.
    Single,
    /// The last `n` lines.
    Window(usize),
    /// Every buffered line.
    All,
    /// Exactly as many lines as the renderer currently shows.
    VisibleCount,
}

impl LookbackPolicy {
    /// Config encoding: `-1` scans the whole buffer, `0` matches the rendered
    /// row count, any other value scans that many recent lines.
    pub fn from_distance(distance: i32) -> Self {
        match distance {
            d if d < 0 => Self::All,
            0 => Self::VisibleCount,
            d => Self::Window(d as usize),
        }
    }

    /// Concrete scan depth, always within `[0, buffer.len()]`.
    pub fn resolve(self, buffer: &MessageBuffer) -> usize {
        let requested = match self {
            Self::Single => 1,
            Self::Window(n) => n,
            Self::All => buffer.len(),
            Self::VisibleCount => buffer.visible_len(),
        };
        requested.min(buffer.len())
    }
}

/// Collapse `incoming` into a recent duplicate, if one exists.
///
/// Returns either `incoming` unchanged or a new line built from the matched
/// record's segments with counter = previous count + 1; in the latter case
/// the matched record is removed and a `Superseded` removal instruction is
/// queued. Total contract: malformed lines are logged and passed through, and
/// nothing here can take down the display path.
pub fn collapse(incoming: Line, buffer: &mut MessageBuffer, policy: LookbackPolicy) -> Line {
    let Some(index) = find_duplicate(&incoming, buffer, policy) else {
        return incoming;
    };
    let Some(matched) = buffer.get(index) else {
        return incoming;
    };
    let collapsed = matched.with_count(matched.count().saturating_add(1));
    buffer.remove(index, RemovalReason::Superseded);
    tracing::debug!(index, count = collapsed.count(), "collapsed duplicate line");
    collapsed
}

fn find_duplicate(incoming: &Line, buffer: &MessageBuffer, policy: LookbackPolicy) -> Option<usize> {
    if buffer.is_empty() {
        return None;
    }
    let Some(content) = incoming.content() else {
        tracing::error!(
            line = %incoming,
            "incoming line has no content segment; duplicate check skipped"
        );
        return None;
    };

    // Cheap path: the line just above.
    if buffer.get(0).is_some_and(|head| is_match(head, content)) {
        return Some(0);
    }

    // Extended scan, index 0 already checked. `Single` resolves to a depth
    // that leaves this range empty.
    let depth = policy.resolve(buffer);
    (1..depth).find(|&index| {
        buffer
            .get(index)
            .is_some_and(|candidate| is_match(candidate, content))
    })
}

fn is_match(candidate: &Line, content: &str) -> bool {
    candidate.kind() == LineKind::Chat
        && candidate
            .content()
            .is_some_and(|text| text.eq_ignore_ascii_case(content))
}
