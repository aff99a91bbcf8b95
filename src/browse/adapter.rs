//! Display projections of catalog data.
//!
//! Everything here is a pure function of its inputs.

use std::sync::Arc;

use serde::Serialize;

use crate::browse::section::Section;
use crate::catalog::types::{MediaGroup, MediaItem};

/// One playable entry as the browse screen shows it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    /// Channel and duration, e.g. "Rust Weekly · 12:05".
    pub subtitle: String,
    pub url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl Video {
    pub fn from_item(item: &MediaItem) -> Self {
        let mut parts = Vec::new();
        if let Some(ref channel) = item.channel {
            parts.push(channel.clone());
        }
        if let Some(secs) = item.duration_secs {
            parts.push(format_duration(secs));
        }
        Self {
            id: item.video_id.clone(),
            title: item.title.clone(),
            subtitle: parts.join(" · "),
            url: item.url.clone(),
            thumbnail_url: item.thumbnail_url.clone(),
        }
    }
}

/// An update for one section: a titled row of videos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VideoGroup {
    pub title: String,
    pub videos: Vec<Video>,
    /// Appends to the row with the same title instead of adding a new one.
    pub continuation: bool,
    #[serde(skip)]
    pub section: Arc<Section>,
    /// The group this update was built from. `None` for placeholders.
    #[serde(skip)]
    pub media_group: Option<MediaGroup>,
}

impl VideoGroup {
    pub fn from_group(group: &MediaGroup, section: &Arc<Section>) -> Self {
        let videos = group
            .items
            .as_deref()
            .unwrap_or_default()
            .iter()
            .map(Video::from_item)
            .collect();
        Self {
            title: group.title.clone(),
            videos,
            continuation: false,
            section: Arc::clone(section),
            media_group: Some(group.clone()),
        }
    }

    /// Same as [`VideoGroup::from_group`], flagged as a further page.
    pub fn continuation(group: &MediaGroup, section: &Arc<Section>) -> Self {
        Self {
            continuation: true,
            ..Self::from_group(group, section)
        }
    }

    /// Empty entry announcing a section at startup.
    pub fn from_section(section: &Arc<Section>) -> Self {
        Self {
            title: section.title.clone(),
            videos: Vec::new(),
            continuation: false,
            section: Arc::clone(section),
            media_group: None,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.media_group.is_none()
    }
}

/// Request to show a "sign in to see this" placeholder for a section.
#[derive(Debug, Clone, PartialEq)]
pub struct SignInData {
    pub section: Arc<Section>,
    pub title: String,
    pub message: String,
}

impl SignInData {
    pub fn new(section: &Arc<Section>) -> Self {
        Self {
            section: Arc::clone(section),
            title: format!("Nothing in {}", section.title),
            message: "Sign in with `tvbrowse signin <token>` to see your content.".to_owned(),
        }
    }
}

fn format_duration(secs: u64) -> String {
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::section::SectionRegistry;
    use crate::catalog::types::CatalogKind;

    fn home() -> Arc<Section> {
        Arc::clone(SectionRegistry::initialize().find_by_name("home").unwrap())
    }

    #[test]
    fn from_group_projects_items() {
        let mut item = MediaItem::new("abc", "Intro to lifetimes");
        item.channel = Some("Rust Weekly".into());
        item.duration_secs = Some(725);
        let group = MediaGroup::new(CatalogKind::Home, "Trending", vec![item]).with_next_page("p2");

        let update = VideoGroup::from_group(&group, &home());
        assert_eq!(update.title, "Trending");
        assert!(!update.continuation);
        assert_eq!(update.videos.len(), 1);
        assert_eq!(update.videos[0].subtitle, "Rust Weekly · 12:05");
        assert_eq!(update.media_group.as_ref(), Some(&group));
        assert_eq!(update.section.title, "Home");
    }

    #[test]
    fn continuation_keeps_projection() {
        let group = MediaGroup::new(CatalogKind::Home, "Trending", vec![MediaItem::new("x", "X")]);
        let section = home();
        let update = VideoGroup::continuation(&group, &section);
        assert!(update.continuation);
        assert_eq!(update.videos, VideoGroup::from_group(&group, &section).videos);
    }

    #[test]
    fn placeholder_has_no_origin() {
        let update = VideoGroup::from_section(&home());
        assert!(update.is_placeholder());
        assert!(update.videos.is_empty());
        assert_eq!(update.title, "Home");
    }

    #[test]
    fn durations() {
        assert_eq!(format_duration(59), "0:59");
        assert_eq!(format_duration(3600 + 62), "1:01:02");
    }
}
