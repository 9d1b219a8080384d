use crate::caption::CaptionItem;
use crate::config::Settings;
use crate::dataset;
use crate::error::RunError;
use crate::extractor::Extractor;
use crate::normaliser;
use crate::seed;
use crate::serialiser;
use crate::source::{TranscriptSource, VideoLister};

use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use tracing::{info, warn};

/// Normalised caption text of one video.
#[derive(Debug, Clone, PartialEq)]
pub struct Transcript {
    pub(crate) title: String,
    pub(crate) text: String,
}

#[derive(Debug, Default)]
struct Accumulator {
    transcripts: Vec<Transcript>,
}

impl Accumulator {
    fn push(mut self, item: CaptionItem) -> Self {
        let raw = item.caption.unwrap_or_default();
        if raw.trim().is_empty() {
            warn!("Empty caption for {}, skipping", item.id);
            return self;
        }
        info!("Collected transcript for {} ({} chars)", item.id, raw.chars().count());
        self.transcripts.push(Transcript {
            title: item.title,
            text: normaliser::normalize(&raw),
        });
        self
    }

    fn corpus(&self) -> String {
        self.transcripts
            .iter()
            .map(|t| t.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub videos: usize,
    pub transcripts: usize,
    pub seed_pairs: usize,
    pub extracted_pairs: usize,
    pub output: PathBuf,
}

/// Lists the channel, collects every available transcript, and writes the
/// dataset. Nothing is written unless at least one transcript was collected.
pub fn run<L, S>(lister: &L, source: &S, settings: &Settings) -> Result<RunSummary>
where
    L: VideoLister,
    S: TranscriptSource,
{
    let videos = lister
        .list_videos(&settings.channel)
        .unwrap_or_else(|err| {
            warn!("Failed to list videos: {}", err);
            Vec::new()
        });
    if videos.is_empty() {
        return Err(RunError::NoVideos {
            channel: settings.channel.clone(),
        }
        .into());
    }

    let collected = collect(source, &videos, settings.pace);
    if collected.transcripts.is_empty() {
        return Err(RunError::NoTranscripts {
            attempted: videos.len(),
        }
        .into());
    }
    info!(
        "Collected {} of {} transcripts",
        collected.transcripts.len(),
        videos.len()
    );

    if let Some(path) = &settings.transcripts {
        serialiser::serialise_transcripts(&collected.transcripts, path)?;
        info!("Wrote combined transcripts to {}", path.display());
    }

    let extracted = Extractor::new(settings.vocabulary).extract(&collected.corpus());
    let seed = seed::seed_pairs();
    let summary = RunSummary {
        videos: videos.len(),
        transcripts: collected.transcripts.len(),
        seed_pairs: seed.len(),
        extracted_pairs: extracted.len(),
        output: settings.output.clone(),
    };

    let pairs = dataset::assemble(&seed, extracted);
    serialiser::serialise(&pairs, &settings.output)?;
    info!("Wrote {} pairs to {}", pairs.len(), settings.output.display());

    Ok(summary)
}

fn collect<S: TranscriptSource>(source: &S, videos: &[CaptionItem], pace: Duration) -> Accumulator {
    videos
        .iter()
        .enumerate()
        .fold(Accumulator::default(), |acc, (i, video)| {
            info!("[{}/{}] {}", i + 1, videos.len(), short_title(&video.title));
            let acc = match source.fetch(&video.id) {
                Ok(raw) => acc.push(video.with_caption(raw)),
                Err(err) => {
                    warn!("Skipping {}: {}", video.id, err);
                    acc
                }
            };
            thread::sleep(pace);
            acc
        })
}

fn short_title(title: &str) -> String {
    const MAX: usize = 40;
    if title.chars().count() > MAX {
        format!("{}...", title.chars().take(MAX).collect::<String>())
    } else {
        title.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::QaPair;
    use crate::error::AcquisitionError;
    use crate::extractor::Vocabulary;

    use std::collections::HashMap;
    use std::path::Path;

    struct FakeLister {
        videos: Result<Vec<CaptionItem>, ()>,
    }

    impl VideoLister for FakeLister {
        fn list_videos(&self, channel: &str) -> Result<Vec<CaptionItem>, AcquisitionError> {
            self.videos
                .clone()
                .map_err(|_| AcquisitionError::ChannelNotFound(channel.to_string()))
        }
    }

    struct FakeSource {
        captions: HashMap<&'static str, &'static str>,
    }

    impl TranscriptSource for FakeSource {
        fn fetch(&self, video_id: &str) -> Result<String, AcquisitionError> {
            self.captions
                .get(video_id)
                .map(|c| c.to_string())
                .ok_or_else(|| AcquisitionError::NoTranscript {
                    video_id: video_id.to_string(),
                })
        }
    }

    fn videos() -> Vec<CaptionItem> {
        vec![
            CaptionItem::listed("v1", "Python Fonksiyonlar"),
            CaptionItem::listed("v2", "Listeler"),
            CaptionItem::listed("v3", "Altyazısız Video"),
        ]
    }

    fn fixture_source() -> FakeSource {
        let mut captions = HashMap::new();
        captions.insert(
            "v1",
            "00:01 -> 00:03 Python'da fonksiyon nedir diye soralım. [Müzik] Kısa.",
        );
        captions.insert(
            "v2",
            "(alkış) Python ile listeleri sıralamak oldukça kolaydır. Hava güzel.",
        );
        FakeSource { captions }
    }

    fn settings(dir: &Path) -> Settings {
        Settings {
            channel: "@kodla_dev".to_string(),
            output: dir.join("dataset.jsonl"),
            transcripts: Some(dir.join("combined.txt")),
            pace: Duration::ZERO,
            vocabulary: Vocabulary::TURKISH,
        }
    }

    fn read_pairs(path: &Path) -> Vec<QaPair> {
        std::fs::read_to_string(path)
            .unwrap()
            .lines()
            .map(|line| {
                let record: serde_json::Value = serde_json::from_str(line).unwrap();
                QaPair::new(
                    record["messages"][0]["content"].as_str().unwrap(),
                    record["messages"][1]["content"].as_str().unwrap(),
                )
            })
            .collect()
    }

    #[test]
    fn test_run_writes_seed_then_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let lister = FakeLister { videos: Ok(videos()) };

        let summary = run(&lister, &fixture_source(), &settings).unwrap();

        let pairs = read_pairs(&settings.output);
        assert_eq!(pairs.len(), 5);
        assert_eq!(&pairs[..3], &seed::seed_pairs()[..]);
        assert_eq!(
            &pairs[3..],
            &[
                QaPair::new(
                    "Python'da fonksiyon nedir diye soralım?",
                    Vocabulary::TURKISH.referral_answer,
                ),
                QaPair::new(
                    "Python'da ile listeleri sıralamak oldukç... nasıl yapılır?",
                    "Python ile listeleri sıralamak oldukça kolaydır",
                ),
            ][..]
        );
        assert_eq!(
            summary,
            RunSummary {
                videos: 3,
                transcripts: 2,
                seed_pairs: 3,
                extracted_pairs: 2,
                output: settings.output.clone(),
            }
        );
    }

    #[test]
    fn test_run_writes_normalised_transcripts() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let lister = FakeLister { videos: Ok(videos()) };

        run(&lister, &fixture_source(), &settings).unwrap();

        let combined = std::fs::read_to_string(settings.transcripts.unwrap()).unwrap();
        assert!(combined.contains("VİDEO: Python Fonksiyonlar"));
        assert!(combined.contains("Python'da fonksiyon nedir diye soralım. Kısa."));
        assert!(!combined.contains("Altyazısız"));
        assert!(!combined.contains("[Müzik]"));
    }

    #[test]
    fn test_run_aborts_when_every_fetch_fails() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let lister = FakeLister { videos: Ok(videos()) };
        let source = FakeSource {
            captions: HashMap::new(),
        };

        let err = run(&lister, &source, &settings).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::NoTranscripts { attempted: 3 })
        ));
        assert!(!settings.output.exists());
        assert!(!settings.transcripts.unwrap().exists());
    }

    #[test]
    fn test_run_aborts_without_videos() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let lister = FakeLister { videos: Ok(vec![]) };

        let err = run(&lister, &fixture_source(), &settings).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::NoVideos { .. })
        ));
        assert!(!settings.output.exists());
    }

    #[test]
    fn test_run_treats_listing_failure_as_no_videos() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let lister = FakeLister { videos: Err(()) };

        let err = run(&lister, &fixture_source(), &settings).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::NoVideos { .. })
        ));
    }

    #[test]
    fn test_run_skips_blank_captions() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let lister = FakeLister {
            videos: Ok(vec![CaptionItem::listed("blank", "Boş")]),
        };
        let mut captions = HashMap::new();
        captions.insert("blank", "   ");
        let source = FakeSource { captions };

        let err = run(&lister, &source, &settings).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<RunError>(),
            Some(RunError::NoTranscripts { attempted: 1 })
        ));
    }

    #[test]
    fn test_seed_only_when_nothing_extracted() {
        let dir = tempfile::tempdir().unwrap();
        let settings = settings(dir.path());
        let lister = FakeLister {
            videos: Ok(vec![CaptionItem::listed("v", "Sohbet")]),
        };
        let mut captions = HashMap::new();
        captions.insert("v", "Bugün hava çok güzel, biraz sohbet edelim.");
        let source = FakeSource { captions };

        let summary = run(&lister, &source, &settings).unwrap();

        assert_eq!(summary.extracted_pairs, 0);
        assert_eq!(read_pairs(&settings.output), seed::seed_pairs());
    }

    #[test]
    fn test_short_title() {
        assert_eq!(short_title("Kısa"), "Kısa");
        let long = "ş".repeat(45);
        assert_eq!(short_title(&long), format!("{}...", "ş".repeat(40)));
    }
}
