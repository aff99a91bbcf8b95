use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap};

use crate::browse::adapter::Video;

/// A dismissible centered popup with everything known about one video.
pub struct DetailsPopup<'a> {
    video: &'a Video,
}

impl<'a> DetailsPopup<'a> {
    pub fn new(video: &'a Video) -> Self {
        Self { video }
    }
}

impl Widget for DetailsPopup<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = 70u16.min(area.width.saturating_sub(4));
        let height = 10u16.min(area.height.saturating_sub(2));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let y = area.y + (area.height.saturating_sub(height)) / 2;
        let panel = Rect::new(x, y, width, height);

        Clear.render(panel, buf);

        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Details ")
            .title_style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(panel);
        block.render(panel, buf);

        // Reserve the last line of inner area for the dismiss hint
        if inner.height < 2 {
            return;
        }
        let text_area = Rect::new(inner.x, inner.y, inner.width, inner.height - 1);
        let hint_area = Rect::new(inner.x, inner.y + inner.height - 1, inner.width, 1);

        let label = Style::default().fg(Color::Yellow);
        let mut lines = vec![
            Line::from(Span::styled(
                self.video.title.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(self.video.subtitle.as_str()),
            Line::from(vec![
                Span::styled("id   ", label),
                Span::raw(self.video.id.as_str()),
            ]),
        ];
        if let Some(ref url) = self.video.url {
            lines.push(Line::from(vec![Span::styled("url  ", label), Span::raw(url.as_str())]));
        }
        if let Some(ref thumb) = self.video.thumbnail_url {
            lines.push(Line::from(vec![
                Span::styled("img  ", label),
                Span::raw(thumb.as_str()),
            ]));
        }

        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .render(text_area, buf);

        let hint = Line::from(Span::styled(
            " Press Esc to dismiss ",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        ));
        Paragraph::new(hint).render(hint_area, buf);
    }
}
