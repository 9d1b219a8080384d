use std::time::Duration;

/// One timed cue from a timed-text caption document.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionFragment {
    pub(crate) start: Duration,
    pub(crate) duration: Duration,
    pub(crate) text: String,
}

/// A listed video, optionally carrying the raw caption text fetched for it.
#[derive(Debug, Clone, PartialEq)]
pub struct CaptionItem {
    pub(crate) id: String,
    pub(crate) title: String,
    pub(crate) caption: Option<String>,
}

impl CaptionItem {
    pub fn listed(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            caption: None,
        }
    }

    pub fn with_caption(&self, caption: String) -> Self {
        Self {
            caption: Some(caption),
            ..self.clone()
        }
    }
}

/// Joins fragments into the raw caption text of a single video.
pub fn join_fragments(fragments: &[CaptionFragment]) -> String {
    fragments
        .iter()
        .map(|f| f.text.as_str())
        .collect::<Vec<_>>()
        .join(" ")
        .trim()
        .to_string()
}
