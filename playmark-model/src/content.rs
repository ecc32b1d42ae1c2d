use crate::ids::ContentId;

/// Catalog-owned facts about a piece of content.
///
/// The catalog is an external collaborator; this record is the subset the
/// progress engine reads: existence, the playable URL and the canonical
/// duration in seconds.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContentSummary {
    pub id: ContentId,
    pub title: String,
    pub thumbnail_url: String,
    pub video_url: String,
    pub duration: f64,
}

impl ContentSummary {
    /// Share of the content covered by `position`, as a 0..=100 percentage.
    pub fn progress_percent(&self, position: f64) -> f64 {
        if self.duration <= 0.0 || !self.duration.is_finite() {
            return 0.0;
        }
        (position / self.duration * 100.0).clamp(0.0, 100.0)
    }
}
