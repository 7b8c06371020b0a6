//! Home directory tree browser

use ratatui::prelude::*;
use ratatui::widgets::*;

use super::app::scroll_offset;
use super::styles::Theme;
use crate::selection::{BrowseRow, BrowseState};

pub fn render(frame: &mut Frame, area: Rect, state: &mut BrowseState, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title_style(Style::default().fg(theme.title).bold());
    let inner = block.inner(area);

    state.set_page_size(inner.height as usize);
    let view = state.view();

    let title = format!(" Home directory: {} hidden ", view.hidden_count);
    frame.render_widget(block.title(title), area);

    let height = inner.height as usize;
    let offset = scroll_offset(view.cursor, height);

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .skip(offset)
        .take(height)
        .map(|row| ListItem::new(row_line(row, theme)))
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new("Nothing to show. Press Enter to continue.")
            .style(Style::default().fg(theme.dimmed));
        frame.render_widget(empty, inner);
        return;
    }

    frame.render_widget(List::new(items), inner);
}

fn row_line(row: &BrowseRow, theme: &Theme) -> Line<'static> {
    let indent = "  ".repeat(row.depth);
    let icon = if row.expandable {
        if row.expanded {
            "▼ "
        } else {
            "▶ "
        }
    } else {
        "  "
    };

    let (marker, marker_style) = if row.hidden {
        ("[x] ", Style::default().fg(theme.hidden))
    } else {
        ("[ ] ", Style::default().fg(theme.dimmed))
    };

    let name_style = if row.hidden {
        Style::default().fg(theme.hidden).crossed_out()
    } else if row.is_sensitive {
        Style::default().fg(theme.sensitive)
    } else if row.is_directory {
        Style::default().fg(theme.directory)
    } else {
        Style::default().fg(theme.text)
    };

    let mut name = row.name.clone();
    if row.is_directory {
        name.push('/');
    }

    let mut spans = vec![
        Span::raw(indent),
        Span::styled(marker, marker_style),
        Span::styled(icon, Style::default().fg(theme.dimmed)),
        Span::styled(name, name_style),
    ];
    if row.is_sensitive && !row.reason.is_empty() {
        spans.push(Span::styled(
            format!("  {}", row.reason),
            Style::default().fg(theme.dimmed),
        ));
    }

    let line = Line::from(spans);
    if row.is_cursor {
        line.style(Style::default().bg(theme.selection))
    } else {
        line
    }
}
