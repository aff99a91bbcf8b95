//! Access token storage for the catalog service.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Environment variable that overrides the stored token.
pub const TOKEN_ENV: &str = "TVBROWSE_TOKEN";

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("token must not be empty")]
    Empty,
}

/// Persisted token data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredToken {
    pub access_token: String,
    pub saved_at: DateTime<Utc>,
}

pub fn token_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config/tvbrowse/token.json")
}

pub fn save_token(access_token: &str) -> Result<StoredToken, TokenError> {
    save_token_at(&token_path(), access_token)
}

pub fn load_token() -> Result<Option<StoredToken>, TokenError> {
    let get = |name: &str| std::env::var(name).ok().filter(|v| !v.is_empty());
    if let Some(access_token) = get(TOKEN_ENV) {
        return Ok(Some(StoredToken {
            access_token,
            saved_at: Utc::now(),
        }));
    }
    load_token_at(&token_path())
}

/// Remove the stored token. Returns `false` if there was nothing to remove.
pub fn clear_token() -> Result<bool, TokenError> {
    clear_token_at(&token_path())
}

fn save_token_at(path: &Path, access_token: &str) -> Result<StoredToken, TokenError> {
    let access_token = access_token.trim();
    if access_token.is_empty() {
        return Err(TokenError::Empty);
    }
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let data = StoredToken {
        access_token: access_token.to_owned(),
        saved_at: Utc::now(),
    };
    let json = serde_json::to_string_pretty(&data)?;
    std::fs::write(path, json)?;
    Ok(data)
}

fn load_token_at(path: &Path) -> Result<Option<StoredToken>, TokenError> {
    if !path.exists() {
        return Ok(None);
    }
    let json = std::fs::read_to_string(path)?;
    let data: StoredToken = serde_json::from_str(&json)?;
    Ok(Some(data))
}

fn clear_token_at(path: &Path) -> Result<bool, TokenError> {
    if !path.exists() {
        return Ok(false);
    }
    std::fs::remove_file(path)?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("tvbrowse-token-{}-{name}", std::process::id()))
            .join("token.json")
    }

    #[test]
    fn save_load_clear_cycle() {
        let path = scratch_path("cycle");
        assert_eq!(load_token_at(&path).unwrap(), None);

        let saved = save_token_at(&path, "  abc123 \n").unwrap();
        assert_eq!(saved.access_token, "abc123");
        assert_eq!(load_token_at(&path).unwrap(), Some(saved));

        assert!(clear_token_at(&path).unwrap());
        assert!(!clear_token_at(&path).unwrap());
        assert_eq!(load_token_at(&path).unwrap(), None);
    }

    #[test]
    fn empty_token_is_rejected() {
        let path = scratch_path("empty");
        assert!(matches!(save_token_at(&path, "   "), Err(TokenError::Empty)));
        assert!(!path.exists());
    }
}
