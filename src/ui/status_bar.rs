use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Widget;

use crate::app::{App, AppMode};
use crate::screen::BrowseScreen;

/// Bottom status bar showing mode, current section, and status messages.
pub struct StatusBar<'a> {
    pub app: &'a App,
    pub screen: &'a BrowseScreen,
}

impl<'a> StatusBar<'a> {
    pub fn new(app: &'a App, screen: &'a BrowseScreen) -> Self {
        Self { app, screen }
    }
}

impl Widget for StatusBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        // Background
        let bg_style = Style::default().bg(Color::DarkGray).fg(Color::White);
        for x in area.x..area.x + area.width {
            buf[(x, area.y)].set_style(bg_style);
        }

        let mut spans = Vec::new();

        // Mode indicator
        let mode_str = match self.app.mode {
            AppMode::Normal => " NORMAL ",
            AppMode::Command => " COMMAND ",
        };
        let mode_style = Style::default()
            .bg(match self.app.mode {
                AppMode::Normal => Color::Blue,
                AppMode::Command => Color::Magenta,
            })
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);
        spans.push(Span::styled(mode_str, mode_style));
        spans.push(Span::raw(" "));

        let section_name = self
            .app
            .current_section()
            .map_or_else(|| "tvbrowse".to_string(), |s| s.title.clone());
        spans.push(Span::styled(section_name, bg_style));

        // Loading indicator
        if self.screen.loading || self.app.presenter.is_continuing() {
            spans.push(Span::styled(
                " [loading...]",
                Style::default().bg(Color::DarkGray).fg(Color::Yellow),
            ));
        }

        // Status message (right-aligned)
        if let Some(ref msg) = self.screen.status_message {
            let left_width: usize = spans.iter().map(|s| s.width()).sum();
            let msg = crate::ui::truncate(msg, area.width as usize);
            let msg_width = unicode_width::UnicodeWidthStr::width(msg.as_str());
            let padding = (area.width as usize).saturating_sub(left_width + msg_width);
            if padding > 0 {
                spans.push(Span::styled(" ".repeat(padding), bg_style));
            }
            spans.push(Span::styled(
                msg,
                Style::default().bg(Color::DarkGray).fg(Color::Red),
            ));
        }

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
