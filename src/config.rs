use crate::extractor::Vocabulary;

use std::path::PathBuf;
use std::time::Duration;

use clap::ValueEnum;

pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";
const PLACEHOLDER_KEY: &str = "your_youtube_api_key_here";

pub const MISSING_KEY_HELP: &str = "\
No YouTube API key configured.
Create a YouTube Data API v3 key in the Google Cloud Console and export it:

    export YOUTUBE_API_KEY=your_api_key_here

or pass it with --api-key.";

/// Language profile used to classify sentences and phrase generated questions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    Turkish,
    English,
}

impl Profile {
    pub fn vocabulary(self) -> Vocabulary {
        match self {
            Profile::Turkish => Vocabulary::TURKISH,
            Profile::English => Vocabulary::ENGLISH,
        }
    }
}

/// Everything a pipeline run needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct Settings {
    pub channel: String,
    pub output: PathBuf,
    pub transcripts: Option<PathBuf>,
    pub pace: Duration,
    pub vocabulary: Vocabulary,
}

/// Returns the API key unless it is missing, blank or still the placeholder.
pub fn credential(raw: Option<&str>) -> Option<String> {
    let key = raw?.trim();
    if key.is_empty() || key == PLACEHOLDER_KEY {
        None
    } else {
        Some(key.to_string())
    }
}
