//! On-disk audio artifact store
//!
//! Every artifact is a single file named `<uuid-v4>.mp3` directly inside the
//! store directory. Writes go to `<uuid>.mp3.part` first and are renamed into
//! place, so readers never observe a partially written file. Lookups accept
//! only names of that exact shape, anything else is reported as missing
//! without touching the filesystem.

use super::{Result, SpeechError};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tokio::task::JoinHandle;
use uuid::Uuid;

pub const AUDIO_EXTENSION: &str = "mp3";
pub const AUDIO_MEDIA_TYPE: &str = "audio/mpeg";
const PARTIAL_SUFFIX: &str = ".part";

/// A stored artifact
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactHandle {
    pub id: Uuid,
    pub filename: String,
    pub path: PathBuf,
}

/// Debug view of an artifact lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactInfo {
    pub filename: String,
    pub exists: bool,
    pub filepath: String,
}

/// UUID of a well-formed artifact filename (`<uuid>.mp3`)
pub fn parse_artifact_name(filename: &str) -> Option<Uuid> {
    let stem = filename.strip_suffix(AUDIO_EXTENSION)?.strip_suffix('.')?;
    let id = Uuid::parse_str(stem).ok()?;
    // Only the canonical hyphenated form, so one artifact has one name
    (id.hyphenated().to_string() == stem).then_some(id)
}

fn artifact_filename(id: Uuid) -> String {
    format!("{}.{}", id.hyphenated(), AUDIO_EXTENSION)
}

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the store directory if needed
    pub async fn ensure_dir(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }

    /// Path of a valid artifact name, `None` for anything else
    pub fn resolve(&self, filename: &str) -> Option<PathBuf> {
        parse_artifact_name(filename).map(|_| self.dir.join(filename))
    }

    /// Persist `bytes` under a freshly generated name
    pub async fn save(&self, bytes: &[u8]) -> Result<ArtifactHandle> {
        self.ensure_dir().await?;

        let id = Uuid::new_v4();
        let filename = artifact_filename(id);
        let path = self.dir.join(&filename);
        let partial = self.dir.join(format!("{}{}", filename, PARTIAL_SUFFIX));

        tokio::fs::write(&partial, bytes).await?;
        if let Err(e) = tokio::fs::rename(&partial, &path).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e.into());
        }

        Ok(ArtifactHandle { id, filename, path })
    }

    /// Audio bytes of a stored artifact
    pub async fn read(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self
            .resolve(filename)
            .ok_or_else(|| SpeechError::NotFound(filename.to_string()))?;

        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SpeechError::NotFound(filename.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn exists(&self, filename: &str) -> bool {
        match self.resolve(filename) {
            Some(path) => tokio::fs::try_exists(&path).await.unwrap_or(false),
            None => false,
        }
    }

    pub async fn info(&self, filename: &str) -> ArtifactInfo {
        ArtifactInfo {
            filename: filename.to_string(),
            exists: self.exists(filename).await,
            filepath: self.dir.join(filename).display().to_string(),
        }
    }

    /// Delete artifacts (and abandoned partial writes) older than `max_age`.
    /// Returns the number of files removed. Files that do not follow the
    /// artifact naming scheme are never touched.
    pub async fn sweep(&self, max_age: Duration) -> Result<usize> {
        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(e.into()),
        };

        let now = SystemTime::now();
        let mut removed = 0;

        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            let artifact_name = name.strip_suffix(PARTIAL_SUFFIX).unwrap_or(name);
            if parse_artifact_name(artifact_name).is_none() {
                continue;
            }

            let metadata = match entry.metadata().await {
                Ok(metadata) if metadata.is_file() => metadata,
                _ => continue,
            };
            let age = metadata
                .modified()
                .ok()
                .and_then(|modified| now.duration_since(modified).ok())
                .unwrap_or_default();

            if age >= max_age {
                match tokio::fs::remove_file(entry.path()).await {
                    Ok(()) => removed += 1,
                    Err(e) => tracing::warn!("Failed to remove expired artifact {}: {}", name, e),
                }
            }
        }

        Ok(removed)
    }
}

/// Periodically remove artifacts older than `max_age`.
///
/// The first sweep runs immediately. Errors are logged and retried on the
/// next tick.
pub fn spawn_retention_sweeper(
    store: ArtifactStore,
    interval: Duration,
    max_age: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            match store.sweep(max_age).await {
                Ok(0) => tracing::debug!("Retention sweep: nothing expired"),
                Ok(removed) => {
                    tracing::info!("🧹 Retention sweep removed {} audio file(s)", removed)
                }
                Err(e) => tracing::warn!("Retention sweep failed: {}", e),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_artifact_name() {
        let id = Uuid::new_v4();
        assert_eq!(parse_artifact_name(&format!("{}.mp3", id)), Some(id));

        assert_eq!(parse_artifact_name("hello.mp3"), None);
        assert_eq!(parse_artifact_name(&format!("{}.wav", id)), None);
        assert_eq!(parse_artifact_name(&format!("{}mp3", id)), None);
        assert_eq!(parse_artifact_name(&format!("{}.mp3", id.simple())), None);
        assert_eq!(parse_artifact_name(&format!("../{}.mp3", id)), None);
        assert_eq!(parse_artifact_name(""), None);
    }

    #[tokio::test]
    async fn test_save_and_read() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("tts"));

        let handle = store.save(b"audio").await.unwrap();

        assert!(handle.filename.ends_with(".mp3"));
        assert_eq!(handle.path, dir.path().join("tts").join(&handle.filename));
        assert_eq!(store.read(&handle.filename).await.unwrap(), b"audio");
        assert!(store.exists(&handle.filename).await);

        // No partial file left behind
        let names: Vec<_> = std::fs::read_dir(store.dir())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        assert_eq!(names.len(), 1);
    }

    #[tokio::test]
    async fn test_read_missing_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());

        let missing = format!("{}.mp3", Uuid::new_v4());
        assert!(matches!(
            store.read(&missing).await,
            Err(SpeechError::NotFound(_))
        ));
        assert!(!store.exists(&missing).await);
    }

    #[tokio::test]
    async fn test_traversal_names_never_resolve() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("secret.mp3"), b"x").unwrap();
        let store = ArtifactStore::new(dir.path().join("tts"));

        assert!(store.resolve("../secret.mp3").is_none());
        assert!(matches!(
            store.read("../secret.mp3").await,
            Err(SpeechError::NotFound(_))
        ));
        assert!(!store.exists("../secret.mp3").await);
    }

    #[tokio::test]
    async fn test_info() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let handle = store.save(b"a").await.unwrap();

        let info = store.info(&handle.filename).await;
        assert_eq!(info.filename, handle.filename);
        assert!(info.exists);
        assert_eq!(info.filepath, handle.path.display().to_string());

        let info = store.info("nope.mp3").await;
        assert!(!info.exists);
    }

    #[tokio::test]
    async fn test_sweep_removes_only_expired_artifacts() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let handle = store.save(b"old").await.unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"keep me").unwrap();

        // Nothing is older than an hour yet
        assert_eq!(store.sweep(Duration::from_secs(3600)).await.unwrap(), 0);
        assert!(handle.path.exists());

        // Zero retention expires every artifact but leaves foreign files alone
        assert_eq!(store.sweep(Duration::ZERO).await.unwrap(), 1);
        assert!(!handle.path.exists());
        assert!(dir.path().join("notes.txt").exists());
    }

    #[tokio::test]
    async fn test_sweep_removes_abandoned_partial_writes() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let partial = dir.path().join(format!("{}.mp3.part", Uuid::new_v4()));
        std::fs::write(&partial, b"half").unwrap();

        assert_eq!(store.sweep(Duration::ZERO).await.unwrap(), 1);
        assert!(!partial.exists());
    }

    #[tokio::test]
    async fn test_sweep_missing_dir_is_noop() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path().join("never-created"));
        assert_eq!(store.sweep(Duration::ZERO).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_retention_sweeper_runs_in_background() {
        let dir = TempDir::new().unwrap();
        let store = ArtifactStore::new(dir.path());
        let handle = store.save(b"old").await.unwrap();

        let sweeper =
            spawn_retention_sweeper(store.clone(), Duration::from_millis(20), Duration::ZERO);

        for _ in 0..50 {
            if !handle.path.exists() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
        sweeper.abort();

        assert!(!handle.path.exists());
    }
}
