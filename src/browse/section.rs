use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::catalog::types::CatalogKind;

/// Stable section identity. Equal to the catalog kind id it is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SectionId(pub i64);

impl fmt::Display for SectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a section lays out its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// One collection, fetched as a single group.
    Grid,
    /// Several collections, fetched as an ordered list of groups.
    Row,
}

/// A browsable area of the catalog ("header").
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub id: SectionId,
    pub catalog: CatalogKind,
    pub title: String,
    pub icon: &'static str,
    pub kind: SectionKind,
    pub auth_only: bool,
}

impl Section {
    pub fn new(catalog: CatalogKind, title: &str, kind: SectionKind, icon: &'static str) -> Self {
        Self {
            id: SectionId(catalog.id()),
            catalog,
            title: title.to_owned(),
            icon,
            kind,
            auth_only: false,
        }
    }

    pub fn auth_only(mut self) -> Self {
        self.auth_only = true;
        self
    }
}

/// Ordered set of sections; insertion order is display order.
#[derive(Debug, Clone, Default)]
pub struct SectionRegistry {
    sections: Vec<Arc<Section>>,
}

impl SectionRegistry {
    /// The fixed section list shown by the browse screen.
    pub fn initialize() -> Self {
        let mut registry = Self::default();
        registry.add(Section::new(CatalogKind::Home, "Home", SectionKind::Row, "home"));
        registry.add(Section::new(CatalogKind::Gaming, "Gaming", SectionKind::Row, "gaming"));
        registry.add(Section::new(CatalogKind::News, "News", SectionKind::Row, "news"));
        registry.add(Section::new(CatalogKind::Music, "Music", SectionKind::Row, "music"));
        registry.add(
            Section::new(
                CatalogKind::Subscriptions,
                "Subscriptions",
                SectionKind::Grid,
                "subscriptions",
            )
            .auth_only(),
        );
        registry.add(
            Section::new(CatalogKind::History, "History", SectionKind::Grid, "history")
                .auth_only(),
        );
        registry.add(
            Section::new(CatalogKind::Playlists, "Playlists", SectionKind::Row, "playlist")
                .auth_only(),
        );
        registry
    }

    /// Append a section. A section whose id is already registered is ignored.
    pub fn add(&mut self, section: Section) {
        if self.get(section.id).is_some() {
            tracing::warn!(id = %section.id, title = %section.title, "duplicate section id ignored");
            return;
        }
        self.sections.push(Arc::new(section));
    }

    pub fn get(&self, id: SectionId) -> Option<&Arc<Section>> {
        self.sections.iter().find(|s| s.id == id)
    }

    /// Look a section up by its catalog name or title, ignoring case.
    pub fn find_by_name(&self, name: &str) -> Option<&Arc<Section>> {
        let name = name.trim();
        self.sections.iter().find(|s| {
            s.catalog.as_str().eq_ignore_ascii_case(name) || s.title.eq_ignore_ascii_case(name)
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Section>> {
        self.sections.iter()
    }

    /// Display index of the section bound to `kind`.
    pub fn position(&self, kind: CatalogKind) -> Option<usize> {
        self.sections.iter().position(|s| s.catalog == kind)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_registers_sections_in_display_order() {
        let registry = SectionRegistry::initialize();
        let titles: Vec<&str> = registry.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(
            titles,
            [
                "Home",
                "Gaming",
                "News",
                "Music",
                "Subscriptions",
                "History",
                "Playlists"
            ]
        );
    }

    #[test]
    fn auth_and_kind_flags() {
        let registry = SectionRegistry::initialize();
        let history = registry.find_by_name("history").unwrap();
        assert_eq!(history.kind, SectionKind::Grid);
        assert!(history.auth_only);

        let home = registry.get(SectionId(CatalogKind::Home.id())).unwrap();
        assert_eq!(home.kind, SectionKind::Row);
        assert!(!home.auth_only);

        let playlists = registry.find_by_name("Playlists").unwrap();
        assert_eq!(playlists.kind, SectionKind::Row);
        assert!(playlists.auth_only);
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = SectionRegistry::initialize();
        let before = registry.len();
        registry.add(Section::new(CatalogKind::Home, "Home again", SectionKind::Grid, "home"));
        assert_eq!(registry.len(), before);
        assert_eq!(registry.find_by_name("home").unwrap().title, "Home");
    }

    #[test]
    fn position_follows_display_order() {
        let registry = SectionRegistry::initialize();
        assert_eq!(registry.position(CatalogKind::Home), Some(0));
        assert_eq!(registry.position(CatalogKind::History), Some(5));

        let mut partial = SectionRegistry::default();
        partial.add(Section::new(CatalogKind::Music, "Music", SectionKind::Row, "music"));
        assert_eq!(partial.position(CatalogKind::Music), Some(0));
        assert_eq!(partial.position(CatalogKind::Home), None);
    }

    #[test]
    fn unknown_lookups() {
        let registry = SectionRegistry::initialize();
        assert!(registry.get(SectionId(99)).is_none());
        assert!(registry.find_by_name("shorts").is_none());
    }
}
