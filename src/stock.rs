//! Stock photo and clip search against the Pexels API.

use reqwest::{header, Client};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{StudioError, StudioResult};
use crate::studio::model::{MediaKind, StockMediaItem};

/// Pexels API root.
pub const PEXELS_BASE_URL: &str = "https://api.pexels.com";

const PER_PAGE: &str = "20";
const FALLBACK_QUERY: &str = "nature";

/// Which media kinds a search returns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StockFilter {
    Images,
    Videos,
    #[default]
    Both,
}

impl StockFilter {
    fn images(self) -> bool {
        matches!(self, StockFilter::Images | StockFilter::Both)
    }

    fn videos(self) -> bool {
        matches!(self, StockFilter::Videos | StockFilter::Both)
    }
}

/// Picks the search term: the typed query, else the first keyword, else `"nature"`.
///
/// Returns `None` when there is neither a query nor any keyword.
pub fn resolve_query(query: &str, keywords: &[String]) -> Option<String> {
    let query = query.trim();
    if query.is_empty() && keywords.is_empty() {
        return None;
    }
    let chosen = if !query.is_empty() {
        query
    } else {
        keywords
            .first()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .unwrap_or(FALLBACK_QUERY)
    };
    Some(chosen.to_string())
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(Debug, Deserialize)]
struct PhotoSearch {
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct Photo {
    id: u64,
    #[serde(default)]
    photographer: String,
    src: PhotoSources,
}

#[derive(Debug, Deserialize)]
struct PhotoSources {
    medium: String,
    large2x: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideoSearch {
    #[serde(default)]
    videos: Vec<Video>,
}

#[derive(Debug, Deserialize)]
struct Video {
    id: u64,
    #[serde(default)]
    image: String,
    user: Option<VideoUser>,
    #[serde(default)]
    video_files: Vec<VideoFile>,
}

#[derive(Debug, Deserialize)]
struct VideoUser {
    name: String,
}

#[derive(Debug, Deserialize)]
struct VideoFile {
    quality: Option<String>,
    link: String,
}

impl From<Photo> for StockMediaItem {
    fn from(photo: Photo) -> Self {
        Self {
            id: photo.id,
            kind: MediaKind::Image,
            thumbnail: photo.src.medium,
            large_url: photo.src.large2x,
            video_url: None,
            photographer: photo.photographer,
        }
    }
}

impl From<Video> for StockMediaItem {
    fn from(video: Video) -> Self {
        let video_url = video
            .video_files
            .iter()
            .find(|f| f.quality.as_deref() == Some("hd"))
            .or_else(|| video.video_files.first())
            .map(|f| f.link.clone());
        Self {
            id: video.id,
            kind: MediaKind::Video,
            thumbnail: video.image,
            large_url: None,
            video_url,
            photographer: video.user.map(|u| u.name).unwrap_or_default(),
        }
    }
}

// =============================================================================
// CLIENT
// =============================================================================

/// Pexels search client.
#[derive(Debug, Clone)]
pub struct PexelsClient {
    client: Client,
    base_url: String,
}

impl PexelsClient {
    /// Creates a client with the given API key.
    pub fn new(api_key: &str) -> StudioResult<Self> {
        Self::with_base_url(PEXELS_BASE_URL, api_key)
    }

    /// Creates a client against a different API root.
    pub fn with_base_url(base_url: &str, api_key: &str) -> StudioResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(api_key)
                .map_err(|e| StudioError::config(format!("invalid Pexels API key: {}", e)))?,
        );
        let client = Client::builder().default_headers(headers).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    async fn search_json<T: DeserializeOwned>(&self, path: &str, query: &str) -> StudioResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .query(&[("query", query), ("per_page", PER_PAGE)])
            .send()
            .await?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(StudioError::api(status, message));
        }

        Ok(resp.json().await?)
    }

    /// GET /v1/search
    pub async fn search_images(&self, query: &str) -> StudioResult<Vec<StockMediaItem>> {
        let found: PhotoSearch = self.search_json("/v1/search", query).await?;
        Ok(found.photos.into_iter().map(StockMediaItem::from).collect())
    }

    /// GET /videos/search
    pub async fn search_videos(&self, query: &str) -> StudioResult<Vec<StockMediaItem>> {
        let found: VideoSearch = self.search_json("/videos/search", query).await?;
        Ok(found.videos.into_iter().map(StockMediaItem::from).collect())
    }

    /// Searches images and/or videos. A failure in one half is logged and the
    /// other half's results are still returned.
    pub async fn search(&self, query: &str, filter: StockFilter) -> Vec<StockMediaItem> {
        let mut results = Vec::new();

        if filter.images() {
            match self.search_images(query).await {
                Ok(items) => results.extend(items),
                Err(e) => tracing::warn!(error = %e, query, "image search failed"),
            }
        }
        if filter.videos() {
            match self.search_videos(query).await {
                Ok(items) => results.extend(items),
                Err(e) => tracing::warn!(error = %e, query, "video search failed"),
            }
        }

        tracing::debug!(query, count = results.len(), "stock search finished");
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_resolve_query() {
        let keywords = vec!["fog".to_string(), "forest".to_string()];
        assert_eq!(resolve_query("  haunted house ", &keywords).as_deref(), Some("haunted house"));
        assert_eq!(resolve_query("", &keywords).as_deref(), Some("fog"));
        assert_eq!(resolve_query("", &["  ".to_string()]).as_deref(), Some("nature"));
        assert_eq!(resolve_query("   ", &[]), None);
    }

    #[test]
    fn test_video_prefers_hd_file() {
        let video: Video = serde_json::from_value(json!({
            "id": 7,
            "image": "https://images.pexels.com/7.jpg",
            "user": {"name": "Ana"},
            "video_files": [
                {"quality": "sd", "link": "https://videos.pexels.com/7-sd.mp4"},
                {"quality": "hd", "link": "https://videos.pexels.com/7-hd.mp4"}
            ]
        }))
        .unwrap();
        let item = StockMediaItem::from(video);
        assert_eq!(item.kind, MediaKind::Video);
        assert_eq!(item.video_url.as_deref(), Some("https://videos.pexels.com/7-hd.mp4"));
        assert_eq!(item.photographer, "Ana");
    }

    #[test]
    fn test_video_falls_back_to_first_file() {
        let video: Video = serde_json::from_value(json!({
            "id": 8,
            "image": "",
            "video_files": [{"quality": null, "link": "https://videos.pexels.com/8.mp4"}]
        }))
        .unwrap();
        let item = StockMediaItem::from(video);
        assert_eq!(item.video_url.as_deref(), Some("https://videos.pexels.com/8.mp4"));
        assert_eq!(item.photographer, "");
    }

    #[test]
    fn test_photo_mapping() {
        let photo: Photo = serde_json::from_value(json!({
            "id": 3,
            "photographer": "Lee",
            "src": {"medium": "m.jpg", "large2x": "l.jpg", "tiny": "t.jpg"}
        }))
        .unwrap();
        let item = StockMediaItem::from(photo);
        assert_eq!(item.kind, MediaKind::Image);
        assert_eq!(item.thumbnail, "m.jpg");
        assert_eq!(item.large_url.as_deref(), Some("l.jpg"));
    }
}
