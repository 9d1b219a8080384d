use once_cell::sync::Lazy;
use regex::Regex;

// Applied in this order; later patterns rely on earlier removals.
static TIMESTAMP_RANGE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?\s*->\s*[0-9]{1,2}:[0-9]{2}(?::[0-9]{2})?")
        .unwrap()
});
static BRACKETED: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\[.*?\]").unwrap());
static AUDIO_CUE: Lazy<Regex> = Lazy::new(|| {
    let keywords = AUDIO_CUE_KEYWORDS.join("|");
    Regex::new(&format!(r"(?i)\([^)]*(?:{})[^)]*\)", keywords)).unwrap()
});
static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static BLANK_LINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Parentheticals containing any of these are non-speech cues.
const AUDIO_CUE_KEYWORDS: &[&str] = &[
    "müzik", "alkış", "gülüş", "ses", "efekt", "music", "applause", "laugh", "sound", "effect",
];

/// Cleans raw caption text into plain prose.
///
/// Removes timestamp ranges, bracketed annotations and parenthesised audio
/// cues, then collapses whitespace. Removing a segment can splice its
/// neighbours into a new match (`1:00 [x]-> 1:02`), so the cleaning pass is
/// repeated until the text stops changing. No pass ever lengthens the text.
pub fn normalize(raw: &str) -> String {
    let mut text = clean_pass(raw);
    loop {
        let next = clean_pass(&text);
        if next == text {
            return text;
        }
        text = next;
    }
}

fn clean_pass(text: &str) -> String {
    let text = TIMESTAMP_RANGE.replace_all(text, "");
    let text = BRACKETED.replace_all(&text, "");
    let text = AUDIO_CUE.replace_all(&text, "");
    let text = WHITESPACE.replace_all(&text, " ");
    let text = BLANK_LINES.replace_all(&text, "\n");
    text.trim().to_string()
}
