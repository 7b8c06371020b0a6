//! Selector application state and event loop

use crossterm::event::{self, Event as TermEvent, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::*;

use super::components::HelpOverlay;
use super::keys::{map_key, Action, PhaseKind};
use super::styles::Theme;
use super::{browse, review};
use crate::selection::{Event, Phase, SelectionOutcome, Session};

pub struct App {
    session: Session,
    theme: Theme,
    show_help: bool,
}

impl App {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            theme: Theme::default(),
            show_help: false,
        }
    }

    pub fn phase_kind(&self) -> PhaseKind {
        match self.session.phase() {
            Phase::Review(_) => PhaseKind::Review,
            Phase::Browse(_) => PhaseKind::Browse,
        }
    }

    pub fn show_help(&self) -> bool {
        self.show_help
    }

    /// Feed one key press. Returns the outcome once the session ends.
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<SelectionOutcome> {
        let action = map_key(key, self.phase_kind())?;

        if self.show_help {
            // any bound key closes the overlay; cancel still works
            self.show_help = false;
            return match action {
                Action::Select(event @ Event::Cancel) => self.session.handle(event),
                _ => None,
            };
        }

        match action {
            Action::ToggleHelp => {
                self.show_help = true;
                None
            }
            Action::Select(event) => self.session.handle(event),
        }
    }

    /// Block on terminal input until the session is confirmed or cancelled.
    pub fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    ) -> std::io::Result<SelectionOutcome> {
        loop {
            terminal.draw(|frame| self.render(frame))?;

            if let TermEvent::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if let Some(outcome) = self.handle_key(key) {
                    return Ok(outcome);
                }
            }
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.background)),
            area,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let phase = self.phase_kind();
        match self.session.phase_mut() {
            Phase::Review(state) => review::render(frame, chunks[0], state, &self.theme),
            Phase::Browse(state) => browse::render(frame, chunks[0], state, &self.theme),
        }

        render_footer(frame, chunks[1], phase, &self.theme);

        if self.show_help {
            HelpOverlay::render(frame, area, &self.theme, phase);
        }
    }
}

fn render_footer(frame: &mut Frame, area: Rect, phase: PhaseKind, theme: &Theme) {
    let hints: &[(&str, &str)] = match phase {
        PhaseKind::Review => &[
            ("Space", "toggle"),
            ("a/n", "all/none"),
            ("Enter", "continue"),
            ("?", "help"),
            ("Esc", "cancel"),
        ],
        PhaseKind::Browse => &[
            ("Space", "toggle"),
            ("→/←", "expand/collapse"),
            ("Enter", "confirm"),
            ("?", "help"),
            ("Esc", "cancel"),
        ],
    };

    let mut spans = Vec::new();
    for (key, desc) in hints {
        spans.push(Span::styled(format!(" {} ", key), Style::default().fg(theme.key)));
        spans.push(Span::styled(format!("{}  ", desc), Style::default().fg(theme.hint)));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// First visible row so that `cursor` stays on screen.
pub(crate) fn scroll_offset(cursor: usize, height: usize) -> usize {
    if height == 0 {
        return cursor;
    }
    (cursor + 1).saturating_sub(height)
}
