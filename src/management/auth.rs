use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::{error::StoreError, spotify, types::Token};

/// Seconds before expiry at which a token is already treated as expired.
const EXPIRY_MARGIN_SECS: u64 = 240;

pub struct TokenManager {
    token: Token,
    data_dir: PathBuf,
}

impl TokenManager {
    pub fn new(token: Token, data_dir: impl Into<PathBuf>) -> Self {
        TokenManager {
            token,
            data_dir: data_dir.into(),
        }
    }

    pub async fn load(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let data_dir = data_dir.into();
        let content = async_fs::read_to_string(Self::token_path(&data_dir)).await?;
        let token: Token = serde_json::from_str(&content)?;
        Ok(Self { token, data_dir })
    }

    pub async fn persist(&self) -> Result<(), StoreError> {
        let path = Self::token_path(&self.data_dir);
        if let Some(parent) = path.parent() {
            async_fs::create_dir_all(parent).await?;
        }

        let json = serde_json::to_string_pretty(&self.token)?;
        async_fs::write(path, json).await?;
        Ok(())
    }

    /// Returns an access token that is valid for at least four more minutes,
    /// refreshing and persisting it first when needed.
    pub async fn get_valid_token(&mut self) -> Result<String, String> {
        if self.is_expired() {
            let new_token = spotify::auth::refresh_token(&self.token.refresh_token).await?;
            self.token = new_token;
            self.persist().await.map_err(|e| e.to_string())?;
        }

        Ok(self.token.access_token.clone())
    }

    pub fn is_expired(&self) -> bool {
        let now = Utc::now().timestamp() as u64;
        now + EXPIRY_MARGIN_SECS >= self.token.obtained_at + self.token.expires_in
    }

    fn token_path(data_dir: &Path) -> PathBuf {
        data_dir.join("cache/token.json")
    }

    pub fn current_token(&self) -> &Token {
        &self.token
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(obtained_at: u64, expires_in: u64) -> Token {
        Token {
            access_token: "access".to_string(),
            refresh_token: "refresh".to_string(),
            scope: "user-top-read".to_string(),
            expires_in,
            obtained_at,
        }
    }

    #[test]
    fn test_fresh_token_is_not_expired() {
        let now = Utc::now().timestamp() as u64;
        let mgr = TokenManager::new(token(now, 3600), ".");
        assert!(!mgr.is_expired());
    }

    #[test]
    fn test_token_inside_margin_is_expired() {
        let now = Utc::now().timestamp() as u64;
        let mgr = TokenManager::new(token(now - 3500, 3600), ".");
        assert!(mgr.is_expired());
    }

    #[tokio::test]
    async fn test_persist_and_load_token() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc::now().timestamp() as u64;
        TokenManager::new(token(now, 3600), dir.path())
            .persist()
            .await
            .unwrap();

        let mut loaded = TokenManager::load(dir.path()).await.unwrap();
        assert_eq!(loaded.current_token().refresh_token, "refresh");
        assert_eq!(loaded.get_valid_token().await.unwrap(), "access");
    }
}
