//! Gallery of finished videos.
//!
//! The session controller appends a record for every completed generation.
//! Saving is fire-and-forget: a failure is logged and never affects the session.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::error::{StudioError, StudioResult};
use crate::session::VideoResult;
use crate::studio::options::{ImageStyle, StoryType};

/// Fields the caller supplies for a new record.
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryEntry {
    pub topic: String,
    pub video_path: String,
    pub story_type: StoryType,
    pub image_style: ImageStyle,
    pub voice_id: String,
    pub duration: u32,
}

impl From<&VideoResult> for GalleryEntry {
    fn from(result: &VideoResult) -> Self {
        Self {
            topic: result.topic.clone(),
            video_path: result.video_path.clone(),
            story_type: result.story_type,
            image_style: result.image_style,
            voice_id: result.voice_id.clone(),
            duration: result.duration,
        }
    }
}

/// A stored gallery record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GalleryRecord {
    pub id: String,
    pub topic: String,
    pub video_path: String,
    pub story_type: StoryType,
    pub image_style: ImageStyle,
    pub voice_id: String,
    pub duration: u32,
    pub created_at: DateTime<Utc>,
}

impl GalleryRecord {
    fn from_entry(entry: GalleryEntry) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            topic: entry.topic,
            video_path: entry.video_path,
            story_type: entry.story_type,
            image_style: entry.image_style,
            voice_id: entry.voice_id,
            duration: entry.duration,
            created_at: Utc::now(),
        }
    }
}

/// Storage for finished videos.
#[async_trait]
pub trait GalleryStore: Send + Sync {
    /// Appends a record.
    async fn save(&self, entry: GalleryEntry) -> StudioResult<GalleryRecord>;

    /// All records, newest first.
    async fn list(&self) -> StudioResult<Vec<GalleryRecord>>;

    /// Removes a record. Returns false if no record had that id.
    async fn delete(&self, id: &str) -> StudioResult<bool>;
}

// =============================================================================
// JSON FILE STORE
// =============================================================================

/// Gallery kept in a single JSON file.
#[derive(Debug)]
pub struct JsonGallery {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonGallery {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> StudioResult<Vec<GalleryRecord>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.is_empty() => Ok(Vec::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| {
                StudioError::persistence(format!("{}: {}", self.path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StudioError::persistence(format!("{}: {}", self.path.display(), e))),
        }
    }

    async fn write_all(&self, records: &[GalleryRecord]) -> StudioResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| StudioError::persistence(e.to_string()))?;
        }
        let bytes = serde_json::to_vec_pretty(records)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, bytes)
            .await
            .map_err(|e| StudioError::persistence(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| StudioError::persistence(e.to_string()))
    }
}

#[async_trait]
impl GalleryStore for JsonGallery {
    async fn save(&self, entry: GalleryEntry) -> StudioResult<GalleryRecord> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let record = GalleryRecord::from_entry(entry);
        records.push(record.clone());
        self.write_all(&records).await?;
        tracing::info!(id = %record.id, topic = %record.topic, "saved video to gallery");
        Ok(record)
    }

    async fn list(&self) -> StudioResult<Vec<GalleryRecord>> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn delete(&self, id: &str) -> StudioResult<bool> {
        let _guard = self.lock.lock().await;
        let mut records = self.read_all().await?;
        let before = records.len();
        records.retain(|r| r.id != id);
        if records.len() == before {
            return Ok(false);
        }
        self.write_all(&records).await?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(topic: &str) -> GalleryEntry {
        GalleryEntry {
            topic: topic.to_string(),
            video_path: format!("{}.mp4", topic),
            story_type: StoryType::TrueCrime,
            image_style: ImageStyle::DarkNoir,
            voice_id: "guy".to_string(),
            duration: 10,
        }
    }

    #[tokio::test]
    async fn test_save_list_delete() {
        let dir = tempfile::tempdir().unwrap();
        let gallery = JsonGallery::new(dir.path().join("nested").join("gallery.json"));

        assert!(gallery.list().await.unwrap().is_empty());

        let first = gallery.save(entry("first")).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = gallery.save(entry("second")).await.unwrap();

        let records = gallery.list().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, second.id);
        assert_eq!(records[1].id, first.id);
        assert_eq!(records[1].story_type, StoryType::TrueCrime);

        assert!(gallery.delete(&first.id).await.unwrap());
        assert!(!gallery.delete(&first.id).await.unwrap());

        let reopened = JsonGallery::new(gallery.path());
        let records = reopened.list().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].topic, "second");
    }

    #[tokio::test]
    async fn test_corrupt_file_is_persistence_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gallery.json");
        std::fs::write(&path, "not json").unwrap();

        let err = JsonGallery::new(&path).save(entry("x")).await.unwrap_err();
        assert!(matches!(err, StudioError::PersistenceFailed(_)));
    }
}
