//! Sign-in state for the catalog service.
//!
//! The service authenticates with a bearer token. Tokens come from the
//! environment (optionally via `.env` files) or from `token.json` written by
//! `tvbrowse signin`.

pub mod token;

use std::path::PathBuf;

/// Return candidate .env paths in priority order.
fn env_file_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();
    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".config/tvbrowse/.env"));
    }
    paths.push(PathBuf::from(".env"));
    paths
}

/// Load .env files into the process environment.
///
/// Earlier files win because dotenvy never overwrites variables that are
/// already set.
pub fn load_env_files() {
    for path in env_file_paths() {
        if path.exists() {
            let _ = dotenvy::from_path(&path);
        }
    }
}

/// Bearer header value for the current token, if any.
pub fn bearer_header() -> Result<Option<String>, token::TokenError> {
    Ok(token::load_token()?.map(|t| format!("Bearer {}", t.access_token)))
}

/// Check whether a token is available without touching the network.
pub fn has_stored_token() -> bool {
    matches!(token::load_token(), Ok(Some(_)))
}
