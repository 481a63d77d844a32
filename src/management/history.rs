use std::path::{Path, PathBuf};

use crate::{error::StoreError, types::GenerationRecord};

/// Append-only store of generated playlists.
///
/// Records are written once when a generation succeeds and never modified
/// afterwards. All records live in a single JSON file in the data directory.
pub struct PlaylistHistoryManager {
    records: Vec<GenerationRecord>,
    data_dir: PathBuf,
}

impl PlaylistHistoryManager {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            records: Vec::new(),
            data_dir: data_dir.into(),
        }
    }

    /// Loads the history, starting empty when nothing was stored yet.
    pub async fn load(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let path = Self::history_path(&data_dir);
        if !path.is_file() {
            return Ok(Self::new(data_dir));
        }

        let content = async_fs::read_to_string(&path).await?;
        let records: Vec<GenerationRecord> = serde_json::from_str(&content)?;
        Ok(Self { records, data_dir })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let path = Self::history_path(&self.data_dir);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.records)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Adds `record` unless a record with the same id already exists.
    pub fn add_record(&mut self, record: GenerationRecord) -> &mut Self {
        if !self.records.iter().any(|r| r.id == record.id) {
            self.records.push(record);
        }
        self
    }

    /// All records, newest first.
    pub fn all(&self) -> Vec<GenerationRecord> {
        let mut records = self.records.clone();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records
    }

    fn history_path(data_dir: &Path) -> PathBuf {
        data_dir.join("playlists/history.json")
    }
}
