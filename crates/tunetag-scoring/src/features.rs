//! Feature extraction from ABC notation text
//!
//! Features are simple counts over the text after catalog metadata has been
//! stripped. Stripping happens here only; stored records are never rewritten.

use crate::notation::compile;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use tunetag_core::Result;

/// Tempo assumed when the text has no `Q:` field
pub const DEFAULT_TEMPO: u64 = 100;

/// Tempos at or below this many beats per minute add no difficulty
pub const TEMPO_BASELINE: u64 = 60;

const ACCIDENTAL_MARKERS: [char; 2] = ['^', '_'];
const ORNAMENT_MARKERS: &str = "~HLMOPSTuv";

/// Structural signals pulled out of one notation string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct FeatureVector {
    /// Distinct pitch-letter characters (`C` and `c` are distinct octaves)
    pub unique_pitches: usize,
    /// Distinct digit runs
    pub unique_rhythms: usize,
    /// Sharp and flat markers
    pub accidentals: usize,
    /// Ornament marker characters
    pub ornaments: usize,
    /// Pitch-letter occurrences
    pub note_count: usize,
    /// Tempo in beats per minute
    pub tempo: u64,
}

impl FeatureVector {
    /// Tempo above the baseline, zero for slow pieces
    pub fn tempo_factor(&self) -> f64 {
        self.tempo.saturating_sub(TEMPO_BASELINE) as f64
    }
}

/// Extracts a [`FeatureVector`] from notation text
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    catalog_tag: Regex,
    header_line: Regex,
    rhythm: Regex,
    tempo: Regex,
}

impl FeatureExtractor {
    pub fn new() -> Result<Self> {
        Ok(Self {
            catalog_tag: compile(r"%%\s*(book|source)", "catalog tag")?,
            header_line: compile(r"(?m)^[BS]:.*$", "book/source line")?,
            rhythm: compile(r"\d+", "rhythm")?,
            tempo: compile(r"Q:\s*([0-9]+)", "tempo")?,
        })
    }

    /// Remove `%%book`/`%%source` tags and `B:`/`S:` lines
    pub fn strip_metadata(&self, text: &str) -> String {
        let stripped = self.catalog_tag.replace_all(text, "");
        self.header_line.replace_all(&stripped, "").into_owned()
    }

    pub fn extract(&self, text: &str) -> FeatureVector {
        let s = self.strip_metadata(text);

        let mut pitches = HashSet::new();
        let mut note_count = 0;
        let mut accidentals = 0;
        let mut ornaments = 0;
        for c in s.chars() {
            if matches!(c, 'A'..='G' | 'a'..='g') {
                pitches.insert(c);
                note_count += 1;
            }
            if ACCIDENTAL_MARKERS.contains(&c) {
                accidentals += 1;
            }
            if ORNAMENT_MARKERS.contains(c) {
                ornaments += 1;
            }
        }

        let rhythms: HashSet<&str> = self.rhythm.find_iter(&s).map(|m| m.as_str()).collect();

        FeatureVector {
            unique_pitches: pitches.len(),
            unique_rhythms: rhythms.len(),
            accidentals,
            ornaments,
            note_count,
            tempo: self.tempo_of(&s),
        }
    }

    fn tempo_of(&self, text: &str) -> u64 {
        match self.tempo.captures(text).and_then(|caps| caps.get(1)) {
            // An all-digit run only fails to parse when it overflows
            Some(digits) => digits.as_str().parse().unwrap_or(u64::MAX),
            None => DEFAULT_TEMPO,
        }
    }
}
