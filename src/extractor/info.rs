//! Engine metadata structure

use serde::{Deserialize, Serialize};

/// Metadata returned by the extraction engine for one URL.
///
/// A playlist carries `entries`; a single video carries the flat fields.
/// Every field is optional because flat playlist extraction omits most of
/// them and failed playlist entries come back as `null`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InfoDict {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub ext: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub entries: Option<Vec<Option<InfoDict>>>,
}

impl InfoDict {
    /// Check if this result describes a playlist
    pub fn is_playlist(&self) -> bool {
        self.entries.is_some()
    }

    /// Parse the JSON document yt-dlp prints for `-J`.
    ///
    /// A literal `null` document yields `None`.
    pub fn from_json(json: &str) -> serde_json::Result<Option<InfoDict>> {
        serde_json::from_str(json)
    }
}
