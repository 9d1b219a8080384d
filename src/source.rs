use crate::caption::CaptionItem;
use crate::error::AcquisitionError;

/// Supplies the videos of a channel, newest first.
pub trait VideoLister {
    fn list_videos(&self, channel: &str) -> Result<Vec<CaptionItem>, AcquisitionError>;
}

/// Supplies the raw caption text of a single video.
pub trait TranscriptSource {
    fn fetch(&self, video_id: &str) -> Result<String, AcquisitionError>;
}

/// A caption track advertised for a video.
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub(crate) language: String,
    pub(crate) generated: bool,
    pub(crate) url: String,
}

/// One step of the caption language fallback chain.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackSelector {
    /// A human-authored track in exactly this language.
    Manual(String),
    /// An auto-generated track in any of these languages, earlier ones preferred.
    Generated(Vec<String>),
}

impl TrackSelector {
    fn pick<'a>(&self, tracks: &'a [Track]) -> Option<&'a Track> {
        match self {
            TrackSelector::Manual(lang) => tracks
                .iter()
                .find(|t| !t.generated && &t.language == lang),
            TrackSelector::Generated(langs) => langs.iter().find_map(|lang| {
                tracks
                    .iter()
                    .find(|t| t.generated && &t.language == lang)
            }),
        }
    }
}

/// Primary manual, secondary manual, then auto-generated in either.
pub fn fallback_chain(primary: &str, secondary: &str) -> Vec<TrackSelector> {
    vec![
        TrackSelector::Manual(primary.to_string()),
        TrackSelector::Manual(secondary.to_string()),
        TrackSelector::Generated(vec![primary.to_string(), secondary.to_string()]),
    ]
}

/// Returns the track chosen by the first selector that finds one.
pub fn select_track<'a>(tracks: &'a [Track], chain: &[TrackSelector]) -> Option<&'a Track> {
    chain.iter().find_map(|selector| selector.pick(tracks))
}
