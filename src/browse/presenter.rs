//! Section refresh orchestration.
//!
//! The presenter lives on the UI loop. Fetches run on spawned tokio tasks and
//! report back through the app event channel as [`BrowseEvent`]s, which the
//! UI loop hands to [`BrowsePresenter::handle_event`]. Only that method (and
//! the public entry points) ever touch the view.
//!
//! There are two task slots, one for section refreshes and one for scroll
//! continuations. Each slot holds at most one task. Starting a refresh
//! cancels the previous refresh; a continuation request is dropped while one
//! is already running. Every message carries the id of the task that sent it,
//! and messages from a task that no longer owns its slot are discarded.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use futures::stream::BoxStream;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::browse::adapter::{SignInData, Video, VideoGroup};
use crate::browse::binding::{Binding, BindingTable};
use crate::browse::gate::gate;
use crate::browse::section::{Section, SectionId, SectionRegistry};
use crate::browse::view::{BrowseView, Navigator};
use crate::catalog::types::MediaGroup;
use crate::catalog::{CatalogError, MediaService};
use crate::event::{AppEvent, Event};

/// Resuming the view reloads the focused section once data is this old.
pub const RELOAD_PERIOD: Duration = Duration::from_secs(10 * 60);

/// Which section, if any, the user is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    None,
    Section(SectionId),
}

// ---------------------------------------------------------------------------
// Task messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Refresh,
    Scroll,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
pub enum TaskPayload {
    /// One emission of a row producer.
    Groups(Vec<MediaGroup>),
    /// One emission of a grid or continuation producer.
    Group(MediaGroup),
    Failed(Arc<String>),
    Completed,
}

impl TaskPayload {
    fn is_terminal(&self) -> bool {
        matches!(self, TaskPayload::Failed(_) | TaskPayload::Completed)
    }
}

/// Worker to UI loop message.
#[derive(Debug, Clone)]
pub struct BrowseEvent {
    pub slot: Slot,
    pub task: TaskId,
    pub payload: TaskPayload,
}

struct ActiveTask {
    id: TaskId,
    section: Arc<Section>,
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl ActiveTask {
    fn cancel(self) {
        self.cancel.cancel();
        self.handle.abort();
    }
}

/// Sends a worker's results to the UI loop, tagged with its slot and id.
struct TaskReporter {
    sender: mpsc::UnboundedSender<Event>,
    slot: Slot,
    task: TaskId,
}

impl TaskReporter {
    fn send(&self, payload: TaskPayload) {
        let _ = self.sender.send(Event::App(Box::new(AppEvent::Browse(BrowseEvent {
            slot: self.slot,
            task: self.task,
            payload,
        }))));
    }
}

// ---------------------------------------------------------------------------
// Presenter
// ---------------------------------------------------------------------------

pub struct BrowsePresenter {
    service: Arc<dyn MediaService>,
    registry: SectionRegistry,
    bindings: BindingTable,
    view: Option<Box<dyn BrowseView>>,
    navigator: Option<Box<dyn Navigator>>,
    sender: mpsc::UnboundedSender<Event>,
    focus: Focus,
    last_update: Option<Instant>,
    refresh_task: Option<ActiveTask>,
    scroll_task: Option<ActiveTask>,
    next_task_id: u64,
}

impl BrowsePresenter {
    /// Build the section registry and bind every section to `service`.
    pub fn new(service: Arc<dyn MediaService>, sender: mpsc::UnboundedSender<Event>) -> Self {
        let registry = SectionRegistry::initialize();
        let bindings = BindingTable::bind(&registry, &service);
        Self {
            service,
            registry,
            bindings,
            view: None,
            navigator: None,
            sender,
            focus: Focus::None,
            last_update: None,
            refresh_task: None,
            scroll_task: None,
            next_task_id: 0,
        }
    }

    // -- Collaborators ------------------------------------------------------

    pub fn register(&mut self, view: Box<dyn BrowseView>) {
        self.view = Some(view);
    }

    pub fn unregister(&mut self) {
        self.view = None;
    }

    pub fn set_navigator(&mut self, navigator: Box<dyn Navigator>) {
        self.navigator = Some(navigator);
    }

    pub fn registry(&self) -> &SectionRegistry {
        &self.registry
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn is_refreshing(&self) -> bool {
        self.refresh_task.is_some()
    }

    pub fn is_continuing(&self) -> bool {
        self.scroll_task.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.is_refreshing() || self.is_continuing()
    }

    /// Cancel both task slots and detach the view.
    pub fn shutdown(&mut self) {
        if let Some(task) = self.refresh_task.take() {
            task.cancel();
        }
        if let Some(task) = self.scroll_task.take() {
            task.cancel();
        }
        self.view = None;
        self.navigator = None;
    }

    // -- UI entry points ----------------------------------------------------

    /// Announce every section to the view with an empty placeholder row.
    pub fn on_init_done(&mut self) {
        let Some(view) = self.view.as_mut() else {
            return;
        };
        for section in self.registry.iter() {
            view.update_header(VideoGroup::from_section(section));
        }
    }

    pub fn on_video_item_clicked(&mut self, video: &Video) {
        if self.view.is_none() {
            return;
        }
        if let Some(nav) = self.navigator.as_mut() {
            nav.open_video(video);
        }
    }

    pub fn on_video_item_long_clicked(&mut self, video: &Video) {
        if self.view.is_none() {
            return;
        }
        if let Some(nav) = self.navigator.as_mut() {
            nav.open_details(video);
        }
    }

    /// Make `focus` the current section and reload it.
    pub fn focus_section(&mut self, focus: Focus) {
        self.focus = focus;

        let Focus::Section(id) = focus else {
            return;
        };
        if self.view.is_none() {
            return;
        }

        if let Some(task) = self.refresh_task.take() {
            tracing::debug!(section = %task.section.title, "superseding in-flight refresh");
            task.cancel();
        }

        let Some(section) = self.registry.get(id).cloned() else {
            tracing::warn!(%id, "focused section is not registered");
            return;
        };

        if let Some(view) = self.view.as_mut() {
            view.show_progress_bar(true);
            view.clear_header(&section);
        }
        self.start_refresh(section);
    }

    /// Reload the focused section.
    pub fn refresh(&mut self) {
        self.focus_section(self.focus);
    }

    /// Reload the focused section if its data has gone stale.
    pub fn on_view_resumed(&mut self) {
        let stale = self
            .last_update
            .is_none_or(|at| at.elapsed() > RELOAD_PERIOD);
        if stale && self.focus != Focus::None {
            tracing::debug!("view resumed with stale data; reloading");
            self.focus_section(self.focus);
        }
    }

    /// Fetch the next page of `group`, unless a continuation is running.
    pub fn on_scroll_end(&mut self, group: &VideoGroup) {
        tracing::debug!(title = %group.title, "scroll end");

        if self.scroll_task.is_some() {
            tracing::debug!(title = %group.title, "continuation already in flight; dropped");
            return;
        }
        if self.view.is_none() {
            return;
        }
        let Some(ref media_group) = group.media_group else {
            tracing::debug!(title = %group.title, "placeholder row has nothing to continue");
            return;
        };

        tracing::debug!(title = %group.title, "continuing group");
        let stream = self.service.continue_group(media_group);
        let task = self.spawn(Slot::Scroll, Arc::clone(&group.section), stream, TaskPayload::Group);
        self.scroll_task = Some(task);
    }

    // -- Worker side --------------------------------------------------------

    fn start_refresh(&mut self, section: Arc<Section>) {
        tracing::debug!(section = %section.title, kind = ?section.kind, "loading section");

        let task = match self.bindings.get(section.id) {
            Some(Binding::Grid(producer)) => {
                let stream = gate(producer.clone(), section.auth_only, &self.service).subscribe();
                self.spawn(Slot::Refresh, section, stream, TaskPayload::Group)
            }
            Some(Binding::Row(producer)) => {
                let stream = gate(producer.clone(), section.auth_only, &self.service).subscribe();
                self.spawn(Slot::Refresh, section, stream, TaskPayload::Groups)
            }
            None => {
                tracing::warn!(section = %section.title, "no producer bound to section");
                if let Some(view) = self.view.as_mut() {
                    view.show_progress_bar(false);
                }
                return;
            }
        };
        self.refresh_task = Some(task);
    }

    fn spawn<T, F>(
        &mut self,
        slot: Slot,
        section: Arc<Section>,
        mut stream: BoxStream<'static, Result<T, CatalogError>>,
        wrap: F,
    ) -> ActiveTask
    where
        T: Send + 'static,
        F: Fn(T) -> TaskPayload + Send + 'static,
    {
        self.next_task_id += 1;
        let id = TaskId(self.next_task_id);
        let cancel = CancellationToken::new();
        let token = cancel.clone();
        let reporter = TaskReporter {
            sender: self.sender.clone(),
            slot,
            task: id,
        };

        let handle = tokio::spawn(async move {
            loop {
                let next = tokio::select! {
                    biased;
                    _ = token.cancelled() => return,
                    next = stream.next() => next,
                };
                match next {
                    Some(Ok(value)) => reporter.send(wrap(value)),
                    Some(Err(e)) => {
                        reporter.send(TaskPayload::Failed(Arc::new(e.to_string())));
                        return;
                    }
                    None => {
                        reporter.send(TaskPayload::Completed);
                        return;
                    }
                }
            }
        });

        ActiveTask {
            id,
            section,
            cancel,
            handle,
        }
    }

    // -- UI loop side -------------------------------------------------------

    /// Apply a worker message. Must be called from the UI loop.
    pub fn handle_event(&mut self, event: BrowseEvent) {
        let slot = match event.slot {
            Slot::Refresh => &mut self.refresh_task,
            Slot::Scroll => &mut self.scroll_task,
        };
        let Some(section) = slot
            .as_ref()
            .filter(|task| task.id == event.task)
            .map(|task| Arc::clone(&task.section))
        else {
            tracing::trace!(slot = ?event.slot, task = ?event.task, "stale task message dropped");
            return;
        };
        if event.payload.is_terminal() {
            *slot = None;
        }

        match event.slot {
            Slot::Refresh => self.apply_refresh(&section, event.payload),
            Slot::Scroll => self.apply_continuation(&section, event.payload),
        }
    }

    fn apply_refresh(&mut self, section: &Arc<Section>, payload: TaskPayload) {
        match payload {
            TaskPayload::Groups(groups) => {
                for group in groups {
                    self.apply_group(section, &group);
                }
            }
            TaskPayload::Group(group) => self.apply_group(section, &group),
            TaskPayload::Failed(e) => {
                tracing::error!(section = %section.title, error = %e, "section load failed");
                if let Some(view) = self.view.as_mut() {
                    view.show_progress_bar(false);
                }
            }
            TaskPayload::Completed => {
                tracing::debug!(section = %section.title, "section load finished");
                if let Some(view) = self.view.as_mut() {
                    view.show_progress_bar(false);
                    view.update_header_if_empty(SignInData::new(section));
                }
            }
        }
    }

    fn apply_group(&mut self, section: &Arc<Section>, group: &MediaGroup) {
        if group.items.is_none() {
            tracing::error!(
                section = %section.title,
                group = %group.title,
                "group has no items; skipped"
            );
            return;
        }
        let Some(view) = self.view.as_mut() else {
            return;
        };
        view.update_header(VideoGroup::from_group(group, section));
        self.last_update = Some(Instant::now());
    }

    fn apply_continuation(&mut self, section: &Arc<Section>, payload: TaskPayload) {
        match payload {
            TaskPayload::Group(group) => {
                if group.items.is_none() {
                    tracing::error!(
                        section = %section.title,
                        group = %group.title,
                        "continuation has no items; skipped"
                    );
                    return;
                }
                if let Some(view) = self.view.as_mut() {
                    view.update_header(VideoGroup::continuation(&group, section));
                }
            }
            TaskPayload::Groups(groups) => {
                for group in groups {
                    self.apply_continuation(section, TaskPayload::Group(group));
                }
            }
            TaskPayload::Failed(e) => {
                tracing::error!(section = %section.title, error = %e, "continuation failed");
                if let Some(view) = self.view.as_mut() {
                    view.show_progress_bar(false);
                }
            }
            TaskPayload::Completed => {
                if let Some(view) = self.view.as_mut() {
                    view.show_progress_bar(false);
                }
            }
        }
    }
}

impl Drop for BrowsePresenter {
    fn drop(&mut self) {
        self.shutdown();
    }
}
