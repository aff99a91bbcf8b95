use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Catalog kinds
// ---------------------------------------------------------------------------

/// Well-known catalog identifiers exposed by the media service.
///
/// The numeric id doubles as the section id in the browse registry, so it
/// must stay stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Home,
    Gaming,
    News,
    Music,
    Subscriptions,
    History,
    Playlists,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 7] = [
        CatalogKind::Home,
        CatalogKind::Gaming,
        CatalogKind::News,
        CatalogKind::Music,
        CatalogKind::Subscriptions,
        CatalogKind::History,
        CatalogKind::Playlists,
    ];

    pub fn id(self) -> i64 {
        match self {
            CatalogKind::Home => 0,
            CatalogKind::Gaming => 1,
            CatalogKind::News => 2,
            CatalogKind::Music => 3,
            CatalogKind::Subscriptions => 4,
            CatalogKind::History => 5,
            CatalogKind::Playlists => 6,
        }
    }

    /// Path segment used by the catalog API.
    pub fn as_str(self) -> &'static str {
        match self {
            CatalogKind::Home => "home",
            CatalogKind::Gaming => "gaming",
            CatalogKind::News => "news",
            CatalogKind::Music => "music",
            CatalogKind::Subscriptions => "subscriptions",
            CatalogKind::History => "history",
            CatalogKind::Playlists => "playlists",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
    }
}

// ---------------------------------------------------------------------------
// Media group
// ---------------------------------------------------------------------------

/// A titled collection of catalog items plus the state needed to fetch the
/// next page.
///
/// `items == None` means the service returned a group without an item list.
/// That is distinct from `Some(vec![])`, which is a present but empty group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaGroup {
    pub kind: CatalogKind,
    pub title: String,
    #[serde(default)]
    pub items: Option<Vec<MediaItem>>,
    #[serde(default)]
    pub next_page: Option<String>,
}

impl MediaGroup {
    pub fn new(kind: CatalogKind, title: impl Into<String>, items: Vec<MediaItem>) -> Self {
        Self {
            kind,
            title: title.into(),
            items: Some(items),
            next_page: None,
        }
    }

    pub fn with_next_page(mut self, token: impl Into<String>) -> Self {
        self.next_page = Some(token.into());
        self
    }
}

/// Body of the row and continuation endpoints.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupsResponse {
    #[serde(default)]
    pub groups: Vec<MediaGroup>,
}

// ---------------------------------------------------------------------------
// Media item
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub duration_secs: Option<u64>,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

impl MediaItem {
    pub fn new(video_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            title: title.into(),
            channel: None,
            duration_secs: None,
            published_at: None,
            thumbnail_url: None,
            url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_kind_ids_are_unique_and_names_round_trip() {
        let ids: std::collections::HashSet<i64> =
            CatalogKind::ALL.iter().map(|k| k.id()).collect();
        assert_eq!(ids.len(), CatalogKind::ALL.len());
        for kind in CatalogKind::ALL {
            assert_eq!(CatalogKind::parse(kind.as_str()), Some(kind));
        }
    }

    #[test]
    fn catalog_kind_parse_is_case_insensitive() {
        assert_eq!(CatalogKind::parse(" Music "), Some(CatalogKind::Music));
        assert_eq!(CatalogKind::parse("nope"), None);
    }

    #[test]
    fn media_group_distinguishes_missing_and_empty_items() {
        let missing: MediaGroup =
            serde_json::from_str(r#"{"kind":"home","title":"Trending"}"#).unwrap();
        assert_eq!(missing.items, None);

        let empty: MediaGroup =
            serde_json::from_str(r#"{"kind":"music","title":"Music","items":[]}"#).unwrap();
        assert_eq!(empty.items, Some(vec![]));
    }
}
