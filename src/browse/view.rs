use crate::browse::adapter::{SignInData, Video, VideoGroup};
use crate::browse::section::Section;

/// The browse screen as the presenter drives it.
///
/// All methods are called from the UI loop only.
pub trait BrowseView {
    fn show_progress_bar(&mut self, show: bool);

    /// Drop everything currently shown for `section`.
    fn clear_header(&mut self, section: &Section);

    /// Add a row to a section, or extend an existing one when
    /// `group.continuation` is set.
    fn update_header(&mut self, group: VideoGroup);

    /// Show the sign-in placeholder if the section has no rows.
    fn update_header_if_empty(&mut self, data: SignInData);
}

/// Playback and details screens reached from the browse screen.
pub trait Navigator {
    fn open_video(&mut self, video: &Video);

    fn open_details(&mut self, video: &Video);
}
