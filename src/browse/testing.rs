//! In-memory collaborators for presenter tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::stream::{self, BoxStream, StreamExt};
use tokio::sync::Notify;

use crate::browse::adapter::{SignInData, Video, VideoGroup};
use crate::browse::section::Section;
use crate::browse::view::{BrowseView, Navigator};
use crate::catalog::types::{CatalogKind, MediaGroup};
use crate::catalog::{CatalogError, GroupListStream, GroupStream, MediaService, SignedInStream};

type Feed<T> = Vec<Result<T, String>>;

#[derive(Default)]
pub struct FakeService {
    signed_in: bool,
    groups: HashMap<CatalogKind, Feed<MediaGroup>>,
    rows: HashMap<CatalogKind, Feed<Vec<MediaGroup>>>,
    row_holds: HashMap<CatalogKind, Arc<Notify>>,
    continuation: Feed<MediaGroup>,
    continuation_hold: Option<Arc<Notify>>,
    fetches: AtomicUsize,
    sign_in_checks: AtomicUsize,
    continuations: AtomicUsize,
}

impl FakeService {
    pub fn signed_in(mut self, signed_in: bool) -> Self {
        self.signed_in = signed_in;
        self
    }

    pub fn with_group(mut self, kind: CatalogKind, group: MediaGroup) -> Self {
        self.groups.entry(kind).or_default().push(Ok(group));
        self
    }

    pub fn with_rows(mut self, kind: CatalogKind, groups: Vec<MediaGroup>) -> Self {
        self.rows.entry(kind).or_default().push(Ok(groups));
        self
    }

    pub fn with_rows_error(mut self, kind: CatalogKind, error: &str) -> Self {
        self.rows.entry(kind).or_default().push(Err(error.to_owned()));
        self
    }

    /// Keep row fetches for `kind` pending until `hold` is notified.
    pub fn hold_rows(mut self, kind: CatalogKind, hold: Arc<Notify>) -> Self {
        self.row_holds.insert(kind, hold);
        self
    }

    pub fn with_continuation(mut self, groups: Vec<MediaGroup>) -> Self {
        self.continuation.extend(groups.into_iter().map(Ok));
        self
    }

    pub fn with_continuation_error(mut self, error: &str) -> Self {
        self.continuation.push(Err(error.to_owned()));
        self
    }

    pub fn hold_continuations(mut self, hold: Arc<Notify>) -> Self {
        self.continuation_hold = Some(hold);
        self
    }

    /// Number of group and row subscriptions.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn sign_in_checks(&self) -> usize {
        self.sign_in_checks.load(Ordering::SeqCst)
    }

    pub fn continuation_count(&self) -> usize {
        self.continuations.load(Ordering::SeqCst)
    }
}

fn feed<T: Clone + Send + 'static>(
    items: Option<&Feed<T>>,
    hold: Option<Arc<Notify>>,
) -> BoxStream<'static, Result<T, CatalogError>> {
    let items: Vec<Result<T, CatalogError>> = items
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .map(|r| {
            r.map_err(|detail| CatalogError::ApiError {
                status: 500,
                detail,
            })
        })
        .collect();
    match hold {
        None => stream::iter(items).boxed(),
        Some(hold) => stream::once(async move {
            hold.notified().await;
            stream::iter(items)
        })
        .flatten()
        .boxed(),
    }
}

impl MediaService for FakeService {
    fn group(&self, kind: CatalogKind) -> GroupStream {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        feed(self.groups.get(&kind), None)
    }

    fn group_rows(&self, kind: CatalogKind) -> GroupListStream {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        feed(self.rows.get(&kind), self.row_holds.get(&kind).cloned())
    }

    fn continue_group(&self, _group: &MediaGroup) -> GroupStream {
        self.continuations.fetch_add(1, Ordering::SeqCst);
        feed(Some(&self.continuation), self.continuation_hold.clone())
    }

    fn is_signed(&self) -> SignedInStream {
        self.sign_in_checks.fetch_add(1, Ordering::SeqCst);
        stream::iter([Ok(self.signed_in)]).boxed()
    }
}

// ---------------------------------------------------------------------------
// View and navigator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ViewCall {
    Progress(bool),
    Clear(String),
    Update {
        section: String,
        title: String,
        videos: usize,
    },
    SignIn(String),
}

impl ViewCall {
    pub fn update(section: &str, title: &str, videos: usize) -> Self {
        ViewCall::Update {
            section: section.to_owned(),
            title: title.to_owned(),
            videos,
        }
    }
}

#[derive(Clone, Default)]
pub struct RecordingView {
    calls: Rc<RefCell<Vec<ViewCall>>>,
    updates: Rc<RefCell<Vec<VideoGroup>>>,
}

impl RecordingView {
    pub fn calls(&self) -> Vec<ViewCall> {
        self.calls.borrow().clone()
    }

    pub fn updates(&self) -> Vec<VideoGroup> {
        self.updates.borrow().clone()
    }

    pub fn update_titles(&self) -> Vec<String> {
        self.updates.borrow().iter().map(|u| u.title.clone()).collect()
    }

    pub fn last_update(&self) -> Option<VideoGroup> {
        self.updates.borrow().last().cloned()
    }
}

impl BrowseView for RecordingView {
    fn show_progress_bar(&mut self, show: bool) {
        self.calls.borrow_mut().push(ViewCall::Progress(show));
    }

    fn clear_header(&mut self, section: &Section) {
        self.calls
            .borrow_mut()
            .push(ViewCall::Clear(section.title.clone()));
    }

    fn update_header(&mut self, group: VideoGroup) {
        self.calls.borrow_mut().push(ViewCall::update(
            &group.section.title,
            &group.title,
            group.videos.len(),
        ));
        self.updates.borrow_mut().push(group);
    }

    fn update_header_if_empty(&mut self, data: SignInData) {
        self.calls
            .borrow_mut()
            .push(ViewCall::SignIn(data.section.title.clone()));
    }
}

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    opened: Rc<RefCell<Vec<String>>>,
}

impl RecordingNavigator {
    pub fn opened(&self) -> Vec<String> {
        self.opened.borrow().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn open_video(&mut self, video: &Video) {
        self.opened.borrow_mut().push(format!("play:{}", video.id));
    }

    fn open_details(&mut self, video: &Video) {
        self.opened.borrow_mut().push(format!("details:{}", video.id));
    }
}

// ---------------------------------------------------------------------------
// Event loop helpers
// ---------------------------------------------------------------------------

pub(crate) use crate::cli::pump;

/// Give spawned workers a chance to run.
pub async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}
