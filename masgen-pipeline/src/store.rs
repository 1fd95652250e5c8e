//! Disk-backed artifact storage, one directory per sample.
//!
//! Every sample's artifacts live under
//! `<results_path>/<dataset>/sample_<id>/`; presence of a file is the sole
//! resumability signal. Each stage is `load_if_present() |
//! generate_and_persist()`, and the sample directory is created lazily,
//! immediately before a stage's first write.

use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Identifies one pipeline run: `(dataset, sample_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SampleKey {
    pub dataset: String,
    pub sample_id: usize,
}

impl SampleKey {
    pub fn new(dataset: impl Into<String>, sample_id: usize) -> Self {
        Self {
            dataset: dataset.into(),
            sample_id,
        }
    }
}

impl fmt::Display for SampleKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/sample_{}", self.dataset, self.sample_id)
    }
}

/// The three artifacts a sample accumulates, in pipeline order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Raw scenario line (`scenario.txt`)
    Scenario,
    /// Structured plan, pretty-printed UTF-8 JSON (`plan.json`)
    Plan,
    /// Generated workflow source (`workflow.mas`)
    Workflow,
}

impl ArtifactKind {
    pub fn file_name(&self) -> &'static str {
        match self {
            ArtifactKind::Scenario => "scenario.txt",
            ArtifactKind::Plan => "plan.json",
            ArtifactKind::Workflow => "workflow.mas",
        }
    }
}

/// Persistent artifact store rooted at a results path.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding one sample's artifacts.
    pub fn sample_dir(&self, key: &SampleKey) -> PathBuf {
        self.root
            .join(&key.dataset)
            .join(format!("sample_{}", key.sample_id))
    }

    /// Full path of one artifact.
    pub fn artifact_path(&self, key: &SampleKey, kind: ArtifactKind) -> PathBuf {
        self.sample_dir(key).join(kind.file_name())
    }

    /// Whether an artifact is already on disk.
    pub fn exists(&self, key: &SampleKey, kind: ArtifactKind) -> bool {
        self.artifact_path(key, kind).exists()
    }

    /// Load an artifact if present; `Ok(None)` when the file does not exist.
    pub async fn load_if_present(
        &self,
        key: &SampleKey,
        kind: ArtifactKind,
    ) -> std::io::Result<Option<String>> {
        match fs::read_to_string(self.artifact_path(key, kind)).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Persist an artifact, creating the sample directory on first write.
    pub async fn persist(
        &self,
        key: &SampleKey,
        kind: ArtifactKind,
        content: &str,
    ) -> std::io::Result<()> {
        fs::create_dir_all(self.sample_dir(key)).await?;
        let path = self.artifact_path(key, kind);
        fs::write(&path, content).await?;
        log::debug!("Persisted {} for {}", kind.file_name(), key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_key_display() {
        assert_eq!(SampleKey::new("gsm8k", 3).to_string(), "gsm8k/sample_3");
    }

    #[test]
    fn test_artifact_paths() {
        let store = ArtifactStore::new("/results");
        let key = SampleKey::new("drop", 0);

        assert_eq!(
            store.sample_dir(&key),
            PathBuf::from("/results/drop/sample_0")
        );
        assert_eq!(
            store.artifact_path(&key, ArtifactKind::Plan),
            PathBuf::from("/results/drop/sample_0/plan.json")
        );
        assert_eq!(
            store.artifact_path(&key, ArtifactKind::Workflow),
            PathBuf::from("/results/drop/sample_0/workflow.mas")
        );
    }

    #[tokio::test]
    async fn test_load_absent_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let key = SampleKey::new("gsm8k", 0);

        let loaded = store
            .load_if_present(&key, ArtifactKind::Scenario)
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_persist_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let key = SampleKey::new("gsm8k", 0);

        store
            .persist(&key, ArtifactKind::Scenario, "Custom -> Format")
            .await
            .unwrap();

        let loaded = store
            .load_if_present(&key, ArtifactKind::Scenario)
            .await
            .unwrap();
        assert_eq!(loaded.as_deref(), Some("Custom -> Format"));
        assert!(store.exists(&key, ArtifactKind::Scenario));
    }

    #[tokio::test]
    async fn test_directory_created_lazily_on_first_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        let key = SampleKey::new("gsm8k", 1);

        // Reading must not create anything.
        store
            .load_if_present(&key, ArtifactKind::Plan)
            .await
            .unwrap();
        assert!(!store.sample_dir(&key).exists());

        store
            .persist(&key, ArtifactKind::Plan, "{}")
            .await
            .unwrap();
        assert!(store.sample_dir(&key).exists());
    }

    #[tokio::test]
    async fn test_samples_use_disjoint_paths() {
        let store = ArtifactStore::new("/results");
        let a = store.sample_dir(&SampleKey::new("gsm8k", 0));
        let b = store.sample_dir(&SampleKey::new("gsm8k", 1));
        let c = store.sample_dir(&SampleKey::new("drop", 0));
        assert_ne!(a, b);
        assert_ne!(a, c);
    }
}
