use percent_encoding::percent_decode_str;
use std::path::Path;
use url::Url;

/// Something the player screen was asked to open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerItem {
    pub path: String,
    pub uri: String,
    pub duration_ms: i64,
    /// URIs of sidecar subtitle files.
    pub subtitle_tracks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubtitleConfiguration {
    pub uri: String,
    pub mime_type: Option<&'static str>,
    pub label: Option<String>,
    pub selected: bool,
}

impl SubtitleConfiguration {
    pub fn from_uri(uri: &str) -> Self {
        let file_name = file_name_of(uri);
        let mime_type = file_name
            .as_deref()
            .and_then(|name| Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .and_then(subtitle_mime_type);

        Self {
            uri: uri.to_string(),
            mime_type,
            label: file_name,
            selected: false,
        }
    }
}

/// Input handed to the playback engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaItem {
    pub media_id: String,
    pub uri: String,
    pub subtitle_configurations: Vec<SubtitleConfiguration>,
}

impl PlayerItem {
    pub fn to_media_item(&self) -> MediaItem {
        MediaItem {
            media_id: self.path.clone(),
            uri: self.uri.clone(),
            subtitle_configurations: self
                .subtitle_tracks
                .iter()
                .map(|uri| SubtitleConfiguration::from_uri(uri))
                .collect(),
        }
    }
}

fn subtitle_mime_type(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "srt" => Some("application/x-subrip"),
        "vtt" => Some("text/vtt"),
        "ass" | "ssa" => Some("text/x-ssa"),
        "ttml" | "dfxp" | "xml" => Some("application/ttml+xml"),
        _ => None,
    }
}

fn file_name_of(uri: &str) -> Option<String> {
    match Url::parse(uri) {
        Ok(url) => url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .filter(|segment| !segment.is_empty())
            .map(|segment| percent_decode_str(segment).decode_utf8_lossy().into_owned()),
        Err(_) => Path::new(uri)
            .file_name()
            .map(|name| name.to_string_lossy().into_owned()),
    }
}
