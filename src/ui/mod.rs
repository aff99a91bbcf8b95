pub mod command_bar;
pub mod details;
pub mod help;
pub mod rows;
pub mod sections;
pub mod status_bar;

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};
use unicode_width::UnicodeWidthChar;

use crate::app::{App, AppMode};

use command_bar::CommandBar;
use details::DetailsPopup;
use help::HelpView;
use rows::RowsView;
use sections::SectionList;
use status_bar::StatusBar;

pub fn draw(frame: &mut Frame, app: &App) {
    let area = frame.area();
    let screen = app.screen.borrow();

    // Layout: main content + status bar + optional command bar
    let bottom_height = if app.mode != AppMode::Normal { 2 } else { 1 };

    let [main_area, bottom_area] =
        Layout::vertical([Constraint::Min(1), Constraint::Length(bottom_height)]).areas(area);

    // Split bottom into status bar and optional command bar
    if app.mode != AppMode::Normal {
        let [status_area, cmd_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(bottom_area);
        frame.render_widget(StatusBar::new(app, &screen), status_area);
        frame.render_widget(CommandBar::new(&app.command_input), cmd_area);
    } else {
        frame.render_widget(StatusBar::new(app, &screen), bottom_area);
    }

    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(22), Constraint::Min(1)]).areas(main_area);

    frame.render_widget(SectionList::new(app), sidebar_area);

    let section = app.current_section();
    let state = section.as_ref().and_then(|s| screen.section(s.id));
    frame.render_widget(RowsView::new(app, section.as_deref(), state, screen.loading), content_area);

    if app.show_help {
        frame.render_widget(HelpView::new(), main_area);
    }

    // Details popup overlay (renders on top of everything)
    if let Some(ref video) = screen.details {
        frame.render_widget(DetailsPopup::new(video), frame.area());
    }
}

/// Cut `text` to at most `max` terminal columns, marking the cut with `…`.
pub fn truncate(text: &str, max: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > max {
            if max > 0 {
                // Make room for the ellipsis.
                while used + 1 > max {
                    match out.pop() {
                        Some(c) => used -= c.width().unwrap_or(0),
                        None => break,
                    }
                }
                out.push('…');
            }
            return out;
        }
        used += w;
        out.push(ch);
    }
    out
}
