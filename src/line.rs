//! Chat line model: ordered decorated segments with one designated content segment.
//!
//! Lines are immutable once constructed. Collapsing never edits a line in
//! place; it builds a new [`Line`] with an updated [`Segment::Counter`] badge.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of a line entering the display buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Ordinary chat content, eligible for duplicate collapsing.
    #[default]
    Chat,
    /// Separator or system rule lines, exempt from collapsing on both sides
    /// of the comparison.
    Boundary,
}

/// One piece of a display-ready line.
///
/// Exactly one `Content` segment carries the text used for duplicate
/// comparison; everything else is decoration the comparison ignores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    /// Decoration rendered before the content (timestamp, sender tag).
    Prefix(String),
    /// The text compared when hunting duplicates.
    Content(String),
    /// Decoration rendered after the content.
    Suffix(String),
    /// Occurrence counter appended when duplicates collapse.
    Counter(u32),
}

/// An immutable, display-ready chat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    kind: LineKind,
    segments: Vec<Segment>,
}

impl Line {
    /// Build a line from pre-assembled segments.
    pub fn from_segments(segments: Vec<Segment>) -> Self {
        Self {
            kind: LineKind::Chat,
            segments,
        }
    }

    /// A bare chat line whose whole text is the content segment.
    pub fn plain(content: impl Into<String>) -> Self {
        Self::from_segments(vec![Segment::Content(content.into())])
    }

    /// A boundary line (separator/system rule); never collapsed.
    pub fn boundary(text: impl Into<String>) -> Self {
        Self {
            kind: LineKind::Boundary,
            segments: vec![Segment::Content(text.into())],
        }
    }

    /// A chat line with a leading decoration, e.g. a timestamp.
    pub fn decorated(prefix: impl Into<String>, content: impl Into<String>) -> Self {
        Self::from_segments(vec![
            Segment::Prefix(prefix.into()),
            Segment::Content(content.into()),
        ])
    }

    pub fn kind(&self) -> LineKind {
        self.kind
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// The designated comparison text. `None` means the line is malformed for
    /// collapsing purposes and must be passed through untouched.
    pub fn content(&self) -> Option<&str> {
        self.segments.iter().find_map(|segment| match segment {
            Segment::Content(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Occurrence count carried by the counter badge; 1 when absent.
    pub fn count(&self) -> u32 {
        self.segments
            .iter()
            .find_map(|segment| match segment {
                Segment::Counter(count) => Some(*count),
                _ => None,
            })
            .unwrap_or(1)
    }

    /// Case-insensitive comparison of content segments. Lines without a
    /// content segment never match anything.
    pub fn content_matches(&self, other: &Line) -> bool {
        match (self.content(), other.content()) {
            (Some(a), Some(b)) => a.eq_ignore_ascii_case(b),
            _ => false,
        }
    }

    /// A copy of this line with its counter badge replaced by `count`.
    /// The badge stays the trailing segment.
    pub fn with_count(&self, count: u32) -> Line {
        let mut segments: Vec<Segment> = self
            .segments
            .iter()
            .filter(|segment| !matches!(segment, Segment::Counter(_)))
            .cloned()
            .collect();
        segments.push(Segment::Counter(count));
        Line {
            kind: self.kind,
            segments,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Prefix(text) | Segment::Content(text) | Segment::Suffix(text) => {
                    f.write_str(text)?;
                }
                Segment::Counter(count) => write!(f, " (\u{d7}{count})")?,
            }
        }
        Ok(())
    }
}
