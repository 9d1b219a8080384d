use thiserror::Error;

/// Failures while listing videos or fetching a single caption track.
///
/// These never abort a run on their own; the affected item is skipped.
#[derive(Error, Debug)]
pub enum AcquisitionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("no transcript available for video '{video_id}'")]
    NoTranscript { video_id: String },

    #[error("player response is missing {0}")]
    MissingPlayerData(String),

    #[error("malformed timed-text document:\n{0}")]
    MalformedTranscript(String),

    #[error("channel not found: '{0}'")]
    ChannelNotFound(String),
}

/// Conditions that abort a run before any output is written.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("no videos found for channel '{channel}'")]
    NoVideos { channel: String },

    #[error("no transcripts could be collected from {attempted} videos")]
    NoTranscripts { attempted: usize },
}
