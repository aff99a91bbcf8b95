use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders, Paragraph, Widget, Wrap};
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Pane};
use crate::browse::adapter::VideoGroup;
use crate::browse::section::Section;
use crate::screen::SectionState;
use crate::ui::truncate;

/// Title line, item line, spacer.
const ROW_HEIGHT: u16 = 3;
const ITEM_WIDTH: usize = 24;
const ITEM_GAP: u16 = 2;

/// The focused section's rows, each a horizontal strip of videos.
pub struct RowsView<'a> {
    pub app: &'a App,
    pub section: Option<&'a Section>,
    pub state: Option<&'a SectionState>,
    pub loading: bool,
}

impl<'a> RowsView<'a> {
    pub fn new(
        app: &'a App,
        section: Option<&'a Section>,
        state: Option<&'a SectionState>,
        loading: bool,
    ) -> Self {
        Self {
            app,
            section,
            state,
            loading,
        }
    }
}

impl Widget for RowsView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let active = self.app.pane == Pane::Rows;
        let title = self.section.map_or("tvbrowse", |s| s.title.as_str());
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} "))
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

        let rows = self.state.map_or(&[][..], |s| s.rows.as_slice());
        if rows.is_empty() {
            self.render_empty(inner, buf);
            return;
        }

        let heights = vec![ROW_HEIGHT; rows.len()];
        let scroll_start = compute_scroll_start(&heights, self.app.selected_row, inner.height);

        let mut y = inner.y;
        for (idx, row) in rows.iter().enumerate().skip(scroll_start) {
            if y + 1 >= inner.y + inner.height {
                break;
            }
            let selected_row = idx == self.app.selected_row;
            render_row(
                row,
                selected_row,
                selected_row.then_some(self.app.selected_item),
                active,
                Rect::new(inner.x + 1, y, inner.width.saturating_sub(1), 2),
                buf,
            );
            y += ROW_HEIGHT;
        }
    }
}

impl RowsView<'_> {
    fn render_empty(&self, area: Rect, buf: &mut Buffer) {
        let dim = Style::default().fg(Color::DarkGray);
        if self.loading {
            buf.set_string(area.x + 1, area.y, "Loading...", dim);
            return;
        }
        match self.state.and_then(|s| s.sign_in.as_ref()) {
            Some(sign_in) => {
                let text = format!("{}\n\n{}", sign_in.title, sign_in.message);
                Paragraph::new(text)
                    .style(Style::default().fg(Color::Yellow))
                    .wrap(Wrap { trim: true })
                    .render(
                        Rect::new(area.x + 1, area.y, area.width.saturating_sub(2), area.height),
                        buf,
                    );
            }
            None => buf.set_string(area.x + 1, area.y, "Nothing to show", dim),
        }
    }
}

fn render_row(
    row: &VideoGroup,
    selected_row: bool,
    selected_item: Option<usize>,
    active: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    if area.height == 0 || area.width == 0 {
        return;
    }

    let title_style = if selected_row {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().add_modifier(Modifier::BOLD)
    };
    let more = if row.media_group.as_ref().is_some_and(|g| g.next_page.is_some()) {
        " …"
    } else {
        ""
    };
    let header = format!("{} ({}){more}", row.title, row.videos.len());
    buf.set_string(area.x, area.y, truncate(&header, area.width as usize), title_style);

    if area.height < 2 {
        return;
    }
    let y = area.y + 1;
    if row.videos.is_empty() {
        buf.set_string(area.x, y, "(empty)", Style::default().fg(Color::DarkGray));
        return;
    }

    let labels: Vec<String> = row
        .videos
        .iter()
        .map(|v| format!("[{}]", truncate(&v.title, ITEM_WIDTH)))
        .collect();
    let widths: Vec<u16> = labels
        .iter()
        .map(|l| l.width() as u16 + ITEM_GAP)
        .collect();
    let start = compute_scroll_start(&widths, selected_item.unwrap_or(0), area.width);

    let mut x = area.x;
    for (idx, label) in labels.iter().enumerate().skip(start) {
        if x >= area.x + area.width {
            break;
        }
        let style = if selected_item == Some(idx) {
            let style = Style::default().fg(Color::Black).bg(Color::Cyan);
            if active { style } else { style.bg(Color::DarkGray) }
        } else {
            Style::default().fg(Color::White)
        };
        let remaining = (area.x + area.width - x) as usize;
        buf.set_string(x, y, truncate(label, remaining), style);
        x = x.saturating_add(widths[idx]);
    }
}

/// Find the smallest scroll start index so that the selected item fits
/// within the available extent.
fn compute_scroll_start(sizes: &[u16], selected: usize, available: u16) -> usize {
    if sizes.is_empty() {
        return 0;
    }

    let selected = selected.min(sizes.len() - 1);
    if available == 0 {
        return selected;
    }

    // Build a viewport that always includes the selected item and packs as
    // many previous items as can fit before it.
    let mut start = selected;
    let mut used = sizes[selected];

    while start > 0 {
        let next = used.saturating_add(sizes[start - 1]);
        if next > available {
            break;
        }
        start -= 1;
        used = next;
    }

    start
}

#[cfg(test)]
mod tests {
    use super::compute_scroll_start;

    #[test]
    fn handles_empty_rows() {
        assert_eq!(compute_scroll_start(&[], 0, 10), 0);
    }

    #[test]
    fn keeps_start_at_zero_while_selection_fits() {
        assert_eq!(compute_scroll_start(&[3, 3, 3, 3], 2, 9), 0);
    }

    #[test]
    fn scrolls_so_selected_row_is_last_visible() {
        assert_eq!(compute_scroll_start(&[3, 3, 3, 3, 3], 4, 9), 2);
    }

    #[test]
    fn oversized_item_is_shown_alone() {
        assert_eq!(compute_scroll_start(&[10, 30, 10], 1, 20), 1);
    }

    #[test]
    fn clamps_selected_index_to_last_item() {
        assert_eq!(compute_scroll_start(&[2, 2, 2], 99, 4), 1);
    }
}
