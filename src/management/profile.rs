use std::path::{Path, PathBuf};

use crate::{error::StoreError, types::UserProfile};

/// Stores the profile written by `sync`, most importantly the listener's top
/// genres that feed mood analysis.
pub struct UserProfileManager {
    profile: Option<UserProfile>,
    data_dir: PathBuf,
}

impl UserProfileManager {
    pub fn new(profile: Option<UserProfile>, data_dir: impl Into<PathBuf>) -> Self {
        Self {
            profile,
            data_dir: data_dir.into(),
        }
    }

    /// Loads the stored profile, if any. A missing file is not an error.
    pub async fn load(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let path = Self::profile_path(&data_dir);
        if !path.is_file() {
            return Ok(Self::new(None, data_dir));
        }

        let content = async_fs::read_to_string(&path).await?;
        let profile: Option<UserProfile> = serde_json::from_str(&content)?;
        Ok(Self::new(profile, data_dir))
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let path = Self::profile_path(&self.data_dir);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.profile)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    pub fn set_profile(&mut self, profile: UserProfile) -> &mut Self {
        self.profile = Some(profile);
        self
    }

    pub fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    /// Genre preferences for mood analysis; empty until the first sync.
    pub fn top_genres(&self) -> Vec<String> {
        self.profile
            .as_ref()
            .map(|p| p.top_genres.clone())
            .unwrap_or_default()
    }

    fn profile_path(data_dir: &Path) -> PathBuf {
        data_dir.join("cache/profile.json")
    }
}
