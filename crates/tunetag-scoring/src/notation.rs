//! Cheap textual checks on notation strings

use regex::Regex;
use tunetag_core::{DifficultyBand, Error, Result};

/// At least one pitch letter or a title/key/unit-length/meter field
const NOTATION_PRESENCE: &str = r"[A-Ga-g]|T:|K:|L:|M:";

/// Existing difficulty marker, band name in any case
const DIFFICULTY_MARKER: &str = r"(?i)<\s*difficulty\s*=\s*(easy|medium|hard)\s*>";

pub(crate) fn compile(pattern: &str, what: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| Error::internal(format!("Failed to compile {} regex: {}", what, e)))
}

/// Detects scoreable notation and pre-existing difficulty markers
#[derive(Debug, Clone)]
pub struct NotationDetector {
    presence: Regex,
    marker: Regex,
}

impl NotationDetector {
    pub fn new() -> Result<Self> {
        Ok(Self {
            presence: compile(NOTATION_PRESENCE, "notation presence")?,
            marker: compile(DIFFICULTY_MARKER, "difficulty marker")?,
        })
    }

    /// Whether `text` looks like it carries any notation worth scoring
    pub fn contains_notation(&self, text: &str) -> bool {
        !text.is_empty() && self.presence.is_match(text)
    }

    /// Band named by the first difficulty marker in `text`, if it has one
    pub fn find_marker(&self, text: &str) -> Option<DifficultyBand> {
        self.marker
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| DifficultyBand::from_label(m.as_str()))
    }
}
