//! Mapping scores to difficulty bands

use tunetag_core::{DifficultyBand, ThresholdPair};

/// Band for a combined score. Each band's upper bound is inclusive, and an
/// absent score is medium.
pub fn tag(score: Option<f64>, thresholds: &ThresholdPair) -> DifficultyBand {
    match score {
        None => DifficultyBand::Medium,
        Some(score) if score <= thresholds.easy_max => DifficultyBand::Easy,
        Some(score) if score <= thresholds.medium_max => DifficultyBand::Medium,
        Some(_) => DifficultyBand::Hard,
    }
}

/// Marker text for a combined score
pub fn tag_marker(score: Option<f64>, thresholds: &ThresholdPair) -> &'static str {
    tag(score, thresholds).marker()
}

/// Prepend a marker to `input`; blank input yields the marker and a single space
pub fn prepend_marker(band: DifficultyBand, input: &str) -> String {
    if input.trim().is_empty() {
        format!("{} ", band.marker())
    } else {
        format!("{} {}", band.marker(), input)
    }
}
