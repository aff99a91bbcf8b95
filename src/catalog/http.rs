use futures::stream::{self, StreamExt, TryStreamExt};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Response, StatusCode};
use serde::de::DeserializeOwned;

use crate::auth;
use crate::catalog::types::{CatalogKind, GroupsResponse, MediaGroup};
use crate::catalog::{CatalogError, GroupListStream, GroupStream, MediaService, SignedInStream};

/// Percent-encoding set for URL query values (encode everything except unreserved chars).
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

fn encode_query(s: &str) -> String {
    utf8_percent_encode(s, QUERY_ENCODE_SET).to_string()
}

// ---------------------------------------------------------------------------
// HTTP catalog client
// ---------------------------------------------------------------------------

/// JSON catalog API client.
///
/// Cheap to clone; every stream it hands out owns its own clone so the
/// request can run on a worker task after the caller has moved on.
#[derive(Debug, Clone)]
pub struct HttpCatalogClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpCatalogClient {
    pub fn new(base_url: &str) -> Result<Self, CatalogError> {
        let parsed = url::Url::parse(base_url)
            .map_err(|e| CatalogError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            http_client: reqwest::Client::new(),
            base_url: parsed.as_str().trim_end_matches('/').to_owned(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build a full API URL from a path (e.g. "/rows/home").
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Issue a GET request, attaching the bearer token when one is stored.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let resp = self.get(url).await?;
        self.handle_response(resp).await
    }

    async fn get(&self, url: &str) -> Result<Response, CatalogError> {
        let mut req = self.http_client.get(url);
        if let Some(header) = auth::bearer_header()? {
            req = req.header("Authorization", header);
        }
        tracing::debug!(url, "catalog request");
        Ok(req.send().await?)
    }

    /// Check status and deserialize the body.
    async fn handle_response<T: DeserializeOwned>(
        &self,
        resp: Response,
    ) -> Result<T, CatalogError> {
        let status = resp.status();

        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(CatalogError::ApiError {
                status: status.as_u16(),
                detail: body,
            });
        }

        let body = resp.text().await?;
        serde_json::from_str::<T>(&body)
            .map_err(|e| CatalogError::Deserialize(format!("{e}: {body}")))
    }

    pub async fn fetch_group(&self, kind: CatalogKind) -> Result<MediaGroup, CatalogError> {
        let url = self.url(&format!("/groups/{}", kind.as_str()));
        self.get_json(&url).await
    }

    pub async fn fetch_rows(&self, kind: CatalogKind) -> Result<Vec<MediaGroup>, CatalogError> {
        let url = self.url(&format!("/rows/{}", kind.as_str()));
        let resp: GroupsResponse = self.get_json(&url).await?;
        Ok(resp.groups)
    }

    pub async fn fetch_continuation(&self, token: &str) -> Result<Vec<MediaGroup>, CatalogError> {
        let url = self.url(&format!("/continuation?token={}", encode_query(token)));
        let resp: GroupsResponse = self.get_json(&url).await?;
        Ok(resp.groups)
    }

    /// Ask the service whether the stored token is still accepted.
    pub async fn check_signed_in(&self) -> Result<bool, CatalogError> {
        if !auth::has_stored_token() {
            return Ok(false);
        }
        let resp = self.get(&self.url("/account")).await?;
        match resp.status() {
            s if s.is_success() => Ok(true),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(false),
            s => Err(CatalogError::ApiError {
                status: s.as_u16(),
                detail: resp.text().await.unwrap_or_default(),
            }),
        }
    }
}

impl MediaService for HttpCatalogClient {
    fn group(&self, kind: CatalogKind) -> GroupStream {
        let client = self.clone();
        stream::once(async move { client.fetch_group(kind).await }).boxed()
    }

    fn group_rows(&self, kind: CatalogKind) -> GroupListStream {
        let client = self.clone();
        stream::once(async move { client.fetch_rows(kind).await }).boxed()
    }

    fn continue_group(&self, group: &MediaGroup) -> GroupStream {
        let Some(token) = group.next_page.clone() else {
            tracing::debug!(title = %group.title, "group has no further pages");
            return stream::empty().boxed();
        };
        let client = self.clone();
        stream::once(async move { client.fetch_continuation(&token).await })
            .map_ok(|groups| stream::iter(groups.into_iter().map(Ok::<_, CatalogError>)))
            .try_flatten()
            .boxed()
    }

    fn is_signed(&self) -> SignedInStream {
        let client = self.clone();
        stream::once(async move { client.check_signed_in().await }).boxed()
    }
}
