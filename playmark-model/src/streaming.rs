/// What a session needs to start playing: where to stream from and where
/// to resume. Computed per session start and never persisted.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamingGrant {
    pub streaming_url: String,
    pub resume_position: f64,
}

impl StreamingGrant {
    pub fn new(streaming_url: impl Into<String>, resume_position: f64) -> Self {
        Self {
            streaming_url: streaming_url.into(),
            resume_position,
        }
    }
}
