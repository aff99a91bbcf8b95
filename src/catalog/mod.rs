//! Media catalog service interface and its HTTP implementation.

pub mod http;
pub mod types;

use futures::stream::BoxStream;
use thiserror::Error;

use crate::auth::token::TokenError;
use types::{CatalogKind, MediaGroup};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error (status {status}): {detail}")]
    ApiError { status: u16, detail: String },
    #[error("token error: {0}")]
    Token(#[from] TokenError),
    #[error("deserialization error: {0}")]
    Deserialize(String),
    #[error("invalid base URL {0}")]
    InvalidBaseUrl(String),
}

// ---------------------------------------------------------------------------
// Producers
// ---------------------------------------------------------------------------

/// Producer of single catalog groups (grid sections, continuations).
pub type GroupStream = BoxStream<'static, Result<MediaGroup, CatalogError>>;

/// Producer of ordered group lists (row sections).
pub type GroupListStream = BoxStream<'static, Result<Vec<MediaGroup>, CatalogError>>;

/// Producer of the current "signed in" status.
pub type SignedInStream = BoxStream<'static, Result<bool, CatalogError>>;

/// The remote media catalog.
///
/// Every method returns a lazy stream: nothing is fetched until the stream is
/// polled, and calling the method again issues a fresh fetch.
pub trait MediaService: Send + Sync {
    /// A single group for a grid section.
    fn group(&self, kind: CatalogKind) -> GroupStream;

    /// An ordered list of groups for a row section.
    fn group_rows(&self, kind: CatalogKind) -> GroupListStream;

    /// Further pages of `group`.
    fn continue_group(&self, group: &MediaGroup) -> GroupStream;

    fn is_signed(&self) -> SignedInStream;
}
