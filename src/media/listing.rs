//! Video listing
//!
//! Runs the engine in flat listing mode and turns whatever comes back into
//! an ordered list of `VideoDescriptor`s with every display field filled in.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::extractor::{ExtractOptions, InfoDict, MediaExtractor};

/// One listed video
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDescriptor {
    pub id: String,
    pub title: String,
    /// Canonical watch URL
    pub url: String,
    pub thumbnail: String,
    pub ext: Option<String>,
    pub duration: Option<f64>,
    pub uploader: Option<String>,
}

impl VideoDescriptor {
    /// Build a descriptor from engine metadata, backfilling the thumbnail
    /// and watch URL from the id. Entries without an id are rejected.
    ///
    /// The URL prefers `url`, then `webpage_url`, then the watch URL built
    /// from the id.
    pub fn from_info(info: InfoDict) -> Option<Self> {
        let id = info.id.filter(|id| !id.is_empty())?;

        let thumbnail = non_empty(info.thumbnail).unwrap_or_else(|| thumbnail_url(&id));
        let url = non_empty(info.url)
            .or_else(|| non_empty(info.webpage_url))
            .unwrap_or_else(|| watch_url(&id));
        let title = non_empty(info.title).unwrap_or_else(|| id.clone());

        Some(Self {
            id,
            title,
            url,
            thumbnail,
            ext: info.ext,
            duration: info.duration,
            uploader: info.uploader,
        })
    }
}

/// Default thumbnail for a video id
pub fn thumbnail_url(id: &str) -> String {
    format!("https://img.youtube.com/vi/{}/hqdefault.jpg", id)
}

/// Canonical watch URL for a video id
pub fn watch_url(id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", id)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// List the videos behind `url`.
///
/// Never fails: engine errors are logged and reported as an empty list.
pub async fn list_videos(extractor: &dyn MediaExtractor, url: &str) -> Vec<VideoDescriptor> {
    let info = match extractor.extract_info(url, &ExtractOptions::listing()).await {
        Ok(Some(info)) => info,
        Ok(None) => {
            tracing::info!("No result for {}", url);
            return Vec::new();
        }
        Err(e) => {
            tracing::warn!("Error fetching video/playlist {}: {}", url, e);
            return Vec::new();
        }
    };

    let candidates: Vec<InfoDict> = if info.is_playlist() {
        info.entries.unwrap_or_default().into_iter().flatten().collect()
    } else {
        vec![info]
    };

    let mut seen = HashSet::new();
    let videos: Vec<VideoDescriptor> = candidates
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.clone();
            let descriptor = VideoDescriptor::from_info(entry);
            if descriptor.is_none() {
                tracing::debug!("Skipping entry without id: {:?}", title);
            }
            descriptor
        })
        .filter(|v| seen.insert(v.id.clone()))
        .collect();

    tracing::info!("Listed {} video(s) for {}", videos.len(), url);
    videos
}
