use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Mime type attached to files that were restored from persistence rather
/// than picked, since the store only keeps the uri and the display name.
pub const RESTORED_MIME_TYPE: &str = "audio/*";

const FILE_SCHEME: &str = "file://";

/// The single pending playback. Serialized as `{uri, name, targetTime}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduledPlayback {
    #[serde(rename = "uri")]
    pub file_uri: String,
    #[serde(rename = "name")]
    pub file_name: String,
    #[serde(rename = "targetTime")]
    pub target_time: DateTime<Utc>,
}

impl ScheduledPlayback {
    pub fn new(file: &SelectedFile, target_time: DateTime<Utc>) -> Self {
        Self {
            file_uri: file.uri.clone(),
            file_name: file.name.clone(),
            target_time,
        }
    }

    /// Signed distance from `now` to the target. Negative once the target passed.
    pub fn remaining(&self, now: DateTime<Utc>) -> chrono::Duration {
        self.target_time.signed_duration_since(now)
    }

    pub fn to_selected_file(&self) -> SelectedFile {
        SelectedFile {
            uri: self.file_uri.clone(),
            name: self.file_name.clone(),
            mime_type: RESTORED_MIME_TYPE.to_string(),
            size: 0,
        }
    }
}

/// A file chosen through the picker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedFile {
    pub uri: String,
    pub name: String,
    pub mime_type: String,
    pub size: u64,
}

impl SelectedFile {
    /// Describes a file on the local filesystem. Size is read from metadata
    /// when available.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("<unnamed>")
            .to_string();
        let size = std::fs::metadata(path).map(|meta| meta.len()).unwrap_or(0);
        Self {
            uri: path_to_uri(path),
            name,
            mime_type: guess_audio_mime(path)
                .unwrap_or(RESTORED_MIME_TYPE)
                .to_string(),
            size,
        }
    }

    pub fn is_audio(&self) -> bool {
        self.mime_type.starts_with("audio/")
    }
}

/// Outcome of asking the user for a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickResult {
    Picked(SelectedFile),
    Cancelled,
}

/// Extensions offered by the picker's audio filter.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "flac", "ogg", "oga", "m4a", "aac", "opus"];

pub fn guess_audio_mime(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    let mime = match ext.as_str() {
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" | "oga" => "audio/ogg",
        "opus" => "audio/opus",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        _ => return None,
    };
    Some(mime)
}

pub fn path_to_uri(path: &Path) -> String {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    };
    format!("{FILE_SCHEME}{}", absolute.display())
}

/// Resolves a `file://` uri (or a bare path) to a local path. Other schemes
/// are opaque to this crate and yield `None`.
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    if let Some(rest) = uri.strip_prefix(FILE_SCHEME) {
        // file://localhost/... is equivalent to file:///...
        let rest = rest.strip_prefix("localhost").unwrap_or(rest);
        return Some(PathBuf::from(rest));
    }
    if uri.contains("://") {
        return None;
    }
    Some(PathBuf::from(uri))
}
