use crate::caption::{self, CaptionItem};
use crate::error::AcquisitionError;
use crate::parser::{self, Parser};
use crate::source::{self, Track, TrackSelector, TranscriptSource, VideoLister};

use std::thread;
use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::header::ACCEPT_LANGUAGE;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};

const DATA_API: &str = "https://www.googleapis.com/youtube/v3";
const WATCH_URL: &str = "https://www.youtube.com/watch";
const PLAYER_URL: &str = "https://www.youtube.com/youtubei/v1/player";
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const PAGE_SIZE: &str = "50";
const PAGE_DELAY: Duration = Duration::from_millis(100);

static INNERTUBE_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""INNERTUBE_API_KEY":\s*"([a-zA-Z0-9_-]+)""#).unwrap());
static CHANNEL_ID: Lazy<Regex> = Lazy::new(|| Regex::new(r"^UC[0-9A-Za-z_-]{22}$").unwrap());

/// How the user pointed at a channel.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelRef {
    Id(String),
    Handle(String),
}

impl ChannelRef {
    /// Accepts `https://youtube.com/@name`, `@name`, `.../channel/UC...`, a bare
    /// channel id or a bare name.
    pub fn parse(input: &str) -> Option<ChannelRef> {
        let input = input.trim();
        let input = input.split('?').next().unwrap_or(input).trim_end_matches('/');

        if let Some(idx) = input.find("/channel/") {
            let id = first_segment(&input[idx + "/channel/".len()..]);
            return non_empty(id).map(ChannelRef::Id);
        }
        if let Some(idx) = input.rfind('@') {
            return non_empty(first_segment(&input[idx + 1..])).map(ChannelRef::Handle);
        }
        if CHANNEL_ID.is_match(input) {
            return Some(ChannelRef::Id(input.to_string()));
        }
        if input.contains('/') {
            return None;
        }
        non_empty(input).map(ChannelRef::Handle)
    }
}

fn first_segment(path: &str) -> &str {
    path.split('/').next().unwrap_or(path)
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
    next_page_token: Option<String>,
}

#[derive(Deserialize)]
struct SearchItem {
    id: ResourceId,
    snippet: Snippet,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
    channel_id: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    channel_id: Option<String>,
}

#[derive(Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Deserialize)]
struct ChannelItem {
    id: String,
}

#[derive(Deserialize)]
struct PlayerResponse {
    captions: Option<PlayerCaptions>,
}

#[derive(Deserialize)]
struct PlayerCaptions {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    renderer: TracklistRenderer,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TracklistRenderer {
    #[serde(default)]
    caption_tracks: Vec<CaptionTrack>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CaptionTrack {
    base_url: String,
    language_code: String,
    kind: Option<String>,
}

impl From<CaptionTrack> for Track {
    fn from(track: CaptionTrack) -> Self {
        Track {
            language: track.language_code,
            generated: track.kind.as_deref() == Some("asr"),
            url: track.base_url.replace("&fmt=srv3", ""),
        }
    }
}

/// Lists channel videos through the Data API and fetches captions through
/// the public player endpoint.
pub struct YouTubeClient {
    http: Client,
    api_key: String,
    chain: Vec<TrackSelector>,
}

impl YouTubeClient {
    pub fn new(api_key: impl Into<String>, chain: Vec<TrackSelector>) -> Result<Self, AcquisitionError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            api_key: api_key.into(),
            chain,
        })
    }

    fn resolve_channel(&self, channel: &str) -> Result<String, AcquisitionError> {
        let handle = match ChannelRef::parse(channel) {
            Some(ChannelRef::Id(id)) => return Ok(id),
            Some(ChannelRef::Handle(handle)) => handle,
            None => return Err(AcquisitionError::ChannelNotFound(channel.to_string())),
        };

        let lookups = vec![("forHandle", format!("@{}", handle)), ("forUsername", handle.clone())];
        for (param, value) in lookups {
            let response: ChannelListResponse = self
                .http
                .get(format!("{}/channels", DATA_API))
                .query(&[("part", "id"), (param, value.as_str()), ("key", self.api_key.as_str())])
                .send()?
                .error_for_status()?
                .json()?;
            if let Some(item) = response.items.into_iter().next() {
                debug!("Resolved channel '{}' via {}: {}", channel, param, item.id);
                return Ok(item.id);
            }
        }

        let response: SearchResponse = self
            .http
            .get(format!("{}/search", DATA_API))
            .query(&[
                ("part", "snippet"),
                ("q", handle.as_str()),
                ("type", "channel"),
                ("maxResults", "1"),
                ("key", self.api_key.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        response
            .items
            .into_iter()
            .find_map(|item| item.snippet.channel_id.or(item.id.channel_id))
            .ok_or_else(|| AcquisitionError::ChannelNotFound(channel.to_string()))
    }

    fn search_page(&self, channel_id: &str, page_token: Option<&str>) -> Result<SearchResponse, AcquisitionError> {
        let mut request = self.http.get(format!("{}/search", DATA_API)).query(&[
            ("part", "snippet"),
            ("channelId", channel_id),
            ("type", "video"),
            ("order", "date"),
            ("maxResults", PAGE_SIZE),
            ("key", self.api_key.as_str()),
        ]);
        if let Some(token) = page_token {
            request = request.query(&[("pageToken", token)]);
        }
        Ok(request.send()?.error_for_status()?.json()?)
    }

    fn caption_tracks(&self, video_id: &str) -> Result<Vec<Track>, AcquisitionError> {
        let page = self
            .http
            .get(WATCH_URL)
            .query(&[("v", video_id)])
            .header(ACCEPT_LANGUAGE, "en-US")
            .send()?
            .error_for_status()?
            .text()?;
        let key = INNERTUBE_KEY
            .captures(&page)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
            .ok_or_else(|| AcquisitionError::MissingPlayerData("INNERTUBE_API_KEY".to_string()))?;

        let body = json!({
            "context": { "client": { "clientName": "ANDROID", "clientVersion": "20.10.38" } },
            "videoId": video_id,
        });
        let player: PlayerResponse = self
            .http
            .post(PLAYER_URL)
            .query(&[("key", key.as_str())])
            .json(&body)
            .send()?
            .error_for_status()?
            .json()?;
        tracks_of(player, video_id)
    }
}

fn tracks_of(player: PlayerResponse, video_id: &str) -> Result<Vec<Track>, AcquisitionError> {
    let captions = player.captions.ok_or_else(|| AcquisitionError::NoTranscript {
        video_id: video_id.to_string(),
    })?;
    Ok(captions
        .renderer
        .caption_tracks
        .into_iter()
        .map(Track::from)
        .collect())
}

fn items_of(page: SearchResponse) -> impl Iterator<Item = CaptionItem> {
    page.items.into_iter().filter_map(|item| {
        let title = parser::decode_entities(&item.snippet.title);
        item.id.video_id.map(|id| CaptionItem::listed(id, title))
    })
}

impl VideoLister for YouTubeClient {
    fn list_videos(&self, channel: &str) -> Result<Vec<CaptionItem>, AcquisitionError> {
        let channel_id = self.resolve_channel(channel)?;
        info!("Listing videos of channel {}", channel_id);

        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;
        loop {
            let page = match self.search_page(&channel_id, page_token.as_deref()) {
                Ok(page) => page,
                Err(err) if !videos.is_empty() => {
                    warn!("Stopped listing after {} videos: {}", videos.len(), err);
                    break;
                }
                Err(err) => return Err(err),
            };
            page_token = page.next_page_token.clone();
            for item in items_of(page) {
                debug!("Found video: {}", item.title);
                videos.push(item);
            }
            if page_token.is_none() {
                break;
            }
            thread::sleep(PAGE_DELAY);
        }

        info!("Found {} videos", videos.len());
        Ok(videos)
    }
}

impl TranscriptSource for YouTubeClient {
    fn fetch(&self, video_id: &str) -> Result<String, AcquisitionError> {
        let tracks = self.caption_tracks(video_id)?;
        let track = source::select_track(&tracks, &self.chain).ok_or_else(|| {
            AcquisitionError::NoTranscript {
                video_id: video_id.to_string(),
            }
        })?;
        debug!(
            "Using {} track '{}' for {}",
            if track.generated { "generated" } else { "manual" },
            track.language,
            video_id
        );

        let body = self.http.get(&track.url).send()?.error_for_status()?.text()?;
        let fragments = Parser::new().parse(&body)?;
        if let Some(last) = fragments.last() {
            debug!("{} fragments, ending at {:?}", fragments.len(), last.start + last.duration);
        }
        Ok(caption::join_fragments(&fragments))
    }
}
