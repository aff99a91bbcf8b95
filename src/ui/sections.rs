use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Widget};

use crate::app::{App, Pane};
use crate::browse::Focus;
use crate::ui::truncate;

/// Sidebar listing every registered section.
pub struct SectionList<'a> {
    pub app: &'a App,
}

impl<'a> SectionList<'a> {
    pub fn new(app: &'a App) -> Self {
        Self { app }
    }
}

fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "home" => "⌂",
        "gaming" => "◆",
        "news" => "■",
        "music" => "♪",
        "subscriptions" => "▶",
        "history" => "↺",
        "playlist" => "≡",
        _ => "•",
    }
}

impl Widget for SectionList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let active = self.app.pane == Pane::Sections;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Sections ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(if active {
                Color::Cyan
            } else {
                Color::DarkGray
            }));

        let inner = block.inner(area);
        block.render(area, buf);

        let focused = match self.app.presenter.focus() {
            Focus::Section(id) => Some(id),
            Focus::None => None,
        };
        let width = inner.width.saturating_sub(1) as usize;

        for (idx, section) in self.app.presenter.registry().iter().enumerate() {
            let y = inner.y + idx as u16;
            if y >= inner.y + inner.height {
                break;
            }

            let mut style = Style::default().fg(Color::White);
            if Some(section.id) == focused {
                style = style.add_modifier(Modifier::BOLD);
            }
            if idx == self.app.selected_section {
                style = style.fg(Color::Cyan);
                if active {
                    style = style.add_modifier(Modifier::REVERSED);
                }
            }

            let lock = if section.auth_only { " 🔒" } else { "" };
            let label = format!("{} {}{lock}", icon_glyph(section.icon), section.title);
            buf.set_string(inner.x + 1, y, truncate(&label, width), style);
        }
    }
}
