//! Terminal-side state the presenter writes into.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use crate::browse::adapter::{SignInData, Video, VideoGroup};
use crate::browse::section::{Section, SectionId};
use crate::browse::view::{BrowseView, Navigator};

pub struct SectionState {
    pub section: Arc<Section>,
    pub rows: Vec<VideoGroup>,
    pub sign_in: Option<SignInData>,
}

impl SectionState {
    fn new(section: &Arc<Section>) -> Self {
        Self {
            section: Arc::clone(section),
            rows: Vec::new(),
            sign_in: None,
        }
    }
}

#[derive(Default)]
pub struct BrowseScreen {
    pub sections: Vec<SectionState>,
    pub loading: bool,
    pub details: Option<Video>,
    pub status_message: Option<String>,
}

impl BrowseScreen {
    pub fn section(&self, id: SectionId) -> Option<&SectionState> {
        self.sections.iter().find(|s| s.section.id == id)
    }

    fn section_mut(&mut self, section: &Arc<Section>) -> &mut SectionState {
        let idx = match self.sections.iter().position(|s| s.section.id == section.id) {
            Some(idx) => idx,
            None => {
                self.sections.push(SectionState::new(section));
                self.sections.len() - 1
            }
        };
        &mut self.sections[idx]
    }

    fn apply(&mut self, group: VideoGroup) {
        let state = self.section_mut(&group.section);
        if group.is_placeholder() {
            return;
        }
        state.sign_in = None;

        if group.continuation
            && let Some(row) = state.rows.iter_mut().find(|r| r.title == group.title)
        {
            row.videos.extend(group.videos);
            row.media_group = group.media_group;
            return;
        }
        state.rows.push(group);
    }
}

/// [`BrowseView`] handle over the shared screen state.
#[derive(Clone)]
pub struct SharedScreen(pub Rc<RefCell<BrowseScreen>>);

impl BrowseView for SharedScreen {
    fn show_progress_bar(&mut self, show: bool) {
        self.0.borrow_mut().loading = show;
    }

    fn clear_header(&mut self, section: &Section) {
        let mut screen = self.0.borrow_mut();
        if let Some(state) = screen.sections.iter_mut().find(|s| s.section.id == section.id) {
            state.rows.clear();
            state.sign_in = None;
        }
    }

    fn update_header(&mut self, group: VideoGroup) {
        self.0.borrow_mut().apply(group);
    }

    fn update_header_if_empty(&mut self, data: SignInData) {
        let mut screen = self.0.borrow_mut();
        let state = screen.section_mut(&data.section);
        if state.rows.is_empty() {
            state.sign_in = Some(data);
        }
    }
}

/// Opens videos with the system handler and shows details in a popup.
pub struct TerminalNavigator {
    screen: Rc<RefCell<BrowseScreen>>,
}

impl TerminalNavigator {
    pub fn new(screen: Rc<RefCell<BrowseScreen>>) -> Self {
        Self { screen }
    }
}

impl Navigator for TerminalNavigator {
    fn open_video(&mut self, video: &Video) {
        let message = match video.url {
            Some(ref url) => match open::that(url) {
                Ok(()) => format!("Playing {}", video.title),
                Err(e) => {
                    tracing::warn!(url, "failed to open video: {e}");
                    format!("Could not open {url}: {e}")
                }
            },
            None => format!("No playable URL for {}", video.title),
        };
        self.screen.borrow_mut().status_message = Some(message);
    }

    fn open_details(&mut self, video: &Video) {
        self.screen.borrow_mut().details = Some(video.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browse::section::SectionRegistry;
    use crate::catalog::types::{CatalogKind, MediaGroup, MediaItem};

    fn shared() -> (SharedScreen, Rc<RefCell<BrowseScreen>>) {
        let screen = Rc::new(RefCell::new(BrowseScreen::default()));
        (SharedScreen(Rc::clone(&screen)), screen)
    }

    fn home() -> Arc<Section> {
        Arc::clone(SectionRegistry::initialize().find_by_name("home").unwrap())
    }

    fn group(title: &str, ids: &[&str]) -> MediaGroup {
        let items = ids.iter().map(|id| MediaItem::new(*id, *id)).collect();
        MediaGroup::new(CatalogKind::Home, title, items)
    }

    #[test]
    fn placeholders_register_sections_without_rows() {
        let (mut view, screen) = shared();
        view.update_header(VideoGroup::from_section(&home()));

        let screen = screen.borrow();
        assert_eq!(screen.sections.len(), 1);
        assert!(screen.sections[0].rows.is_empty());
    }

    #[test]
    fn continuation_extends_matching_row() {
        let (mut view, screen) = shared();
        let section = home();
        view.update_header(VideoGroup::from_group(&group("Trending", &["a", "b"]), &section));
        let next = group("Trending", &["c"]).with_next_page("p3");
        view.update_header(VideoGroup::continuation(&next, &section));

        let screen = screen.borrow();
        let rows = &screen.section(section.id).unwrap().rows;
        assert_eq!(rows.len(), 1);
        let ids: Vec<&str> = rows[0].videos.iter().map(|v| v.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
        assert_eq!(
            rows[0].media_group.as_ref().unwrap().next_page.as_deref(),
            Some("p3")
        );
    }

    #[test]
    fn sign_in_placeholder_only_when_empty() {
        let (mut view, screen) = shared();
        let section = home();

        view.update_header_if_empty(SignInData::new(&section));
        assert!(screen.borrow().section(section.id).unwrap().sign_in.is_some());

        view.update_header(VideoGroup::from_group(&group("Trending", &["a"]), &section));
        view.update_header_if_empty(SignInData::new(&section));
        assert!(screen.borrow().section(section.id).unwrap().sign_in.is_none());

        view.clear_header(&section);
        assert!(screen.borrow().section(section.id).unwrap().rows.is_empty());
    }

    #[test]
    fn details_are_shown_without_opening() {
        let (_, screen) = shared();
        let mut nav = TerminalNavigator::new(Rc::clone(&screen));
        let video = Video::from_item(&MediaItem::new("abc", "Intro"));

        nav.open_details(&video);
        assert_eq!(screen.borrow().details.as_ref(), Some(&video));

        nav.open_video(&video);
        assert_eq!(
            screen.borrow().status_message.as_deref(),
            Some("No playable URL for Intro")
        );
    }
}
