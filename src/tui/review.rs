//! Sensitive-file review screen

use ratatui::prelude::*;
use ratatui::widgets::*;

use super::app::scroll_offset;
use super::styles::Theme;
use crate::selection::ReviewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ReviewState, theme: &Theme) {
    let view = state.view();

    let title = format!(
        " Sensitive files: {} of {} hidden ",
        view.selected_count, view.total
    );
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border))
        .title(title)
        .title_style(Style::default().fg(theme.title).bold());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(1)])
        .split(inner);

    let intro = Paragraph::new(vec![
        Line::from(Span::styled(
            "These files look like they hold secrets. Checked files stay hidden from the container.",
            Style::default().fg(theme.text),
        )),
        Line::from(""),
    ])
    .wrap(Wrap { trim: true });
    frame.render_widget(intro, chunks[0]);

    let height = chunks[1].height as usize;
    let offset = scroll_offset(view.cursor, height);

    let items: Vec<ListItem> = view
        .rows
        .iter()
        .skip(offset)
        .take(height)
        .map(|row| {
            let marker = if row.selected { "[x]" } else { "[ ]" };
            let marker_style = if row.selected {
                Style::default().fg(theme.hidden)
            } else {
                Style::default().fg(theme.dimmed)
            };
            let mut line = Line::from(vec![
                Span::styled(format!(" {} ", marker), marker_style),
                Span::styled(row.label.clone(), Style::default().fg(theme.sensitive)),
                Span::styled(format!("  {}", row.reason), Style::default().fg(theme.dimmed)),
            ]);
            if row.is_cursor {
                line = line.style(Style::default().bg(theme.selection));
            }
            ListItem::new(line)
        })
        .collect();

    frame.render_widget(List::new(items), chunks[1]);
}
