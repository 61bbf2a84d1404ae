use serde::{Deserialize, Serialize};

/// One block of text shown by a module.
///
/// Field names follow the i3bar protocol so a host can serialize segments
/// straight into a status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// Text shown normally.
    pub full_text: String,
    /// Shorter text used when the bar runs out of room.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub short_text: Option<String>,
    /// Foreground color, e.g. `"#ff0000"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Ask the host to highlight this segment.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub urgent: bool,
}

impl Segment {
    /// Plain segment with only `full_text` set.
    pub fn new(text: impl Into<String>) -> Self {
        Self { full_text: text.into(), short_text: None, color: None, urgent: false }
    }

    /// Set the short text.
    pub fn short(mut self, text: impl Into<String>) -> Self {
        self.short_text = Some(text.into());
        self
    }

    /// Mark as urgent.
    pub fn urgent(mut self, urgent: bool) -> Self {
        self.urgent = urgent;
        self
    }
}

/// Everything a module currently displays, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Output {
    /// Segments, left to right.
    pub segments: Vec<Segment>,
}

impl Output {
    /// Single plain-text segment.
    pub fn text(text: impl Into<String>) -> Self {
        Self::from(Segment::new(text))
    }

    /// Urgent segment describing a worker failure.
    pub fn error(err: &anyhow::Error) -> Self {
        Self::from(Segment::new(format!("Error: {err:#}")).short("Error").urgent(true))
    }
}

impl From<Segment> for Output {
    fn from(segment: Segment) -> Self {
        Self { segments: vec![segment] }
    }
}
