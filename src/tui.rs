use anyhow::Result;
use crossterm::{
    ExecutableCommand,
    event::{self, Event, KeyCode, KeyEventKind},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};
use std::io::stdout;

use crate::export;
use crate::filter::{self, FilterState};
use crate::models::{ApplicationRecord, Position, Status};
use crate::registry::ApplicationStore;

struct BrowseState {
    filter: FilterState,
    visible: Vec<ApplicationRecord>,
    selected: usize,
    scroll_offset: u16,
    searching: bool,
    message: Option<String>,
    dirty: bool,
}

impl BrowseState {
    fn new(store: &ApplicationStore, filter: FilterState) -> Self {
        let visible = filter::apply(store.list(), &filter);
        Self {
            filter,
            visible,
            selected: 0,
            scroll_offset: 0,
            searching: false,
            message: None,
            dirty: false,
        }
    }

    fn current(&self) -> Option<&ApplicationRecord> {
        self.visible.get(self.selected)
    }

    // Re-run the projection and keep the cursor in range
    fn refresh(&mut self, store: &ApplicationStore) {
        self.visible = filter::apply(store.list(), &self.filter);
        if self.selected >= self.visible.len() {
            self.selected = self.visible.len().saturating_sub(1);
        }
        self.scroll_offset = 0;
    }

    fn next(&mut self) {
        if !self.visible.is_empty() && self.selected < self.visible.len() - 1 {
            self.selected += 1;
            self.scroll_offset = 0;
        }
    }

    fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.scroll_offset = 0;
        }
    }

    fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(3);
    }

    fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(3);
    }

    fn cycle_status_filter(&mut self) {
        self.filter.status = match self.filter.status {
            None => Some(Status::ALL[0]),
            Some(current) => {
                let idx = Status::ALL.iter().position(|s| *s == current).unwrap_or(0);
                Status::ALL.get(idx + 1).copied()
            }
        };
    }

    fn cycle_position_filter(&mut self) {
        self.filter.position = match self.filter.position {
            None => Some(Position::ALL[0]),
            Some(current) => {
                let idx = Position::ALL.iter().position(|p| *p == current).unwrap_or(0);
                Position::ALL.get(idx + 1).copied()
            }
        };
    }
}

/// Interactive browser over the filtered collection. Returns true if any
/// record was changed, so the caller knows to persist the store.
pub fn run_browse(store: &mut ApplicationStore, filter: FilterState) -> Result<bool> {
    let mut state = BrowseState::new(store, filter);

    // Setup terminal
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run_loop(&mut terminal, &mut state, store);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    result.map(|_| state.dirty)
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    state: &mut BrowseState,
    store: &mut ApplicationStore,
) -> Result<()> {
    let mut list_state = ListState::default();
    list_state.select(Some(0));

    loop {
        terminal.draw(|frame| draw(frame, state, &mut list_state))?;

        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if state.searching {
                match key.code {
                    KeyCode::Enter | KeyCode::Esc => state.searching = false,
                    KeyCode::Backspace => {
                        state.filter.search.pop();
                        state.refresh(store);
                    }
                    KeyCode::Char(c) => {
                        state.filter.search.push(c);
                        state.refresh(store);
                    }
                    _ => {}
                }
                list_state.select(Some(state.selected));
                continue;
            }

            state.message = None;
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => state.next(),
                KeyCode::Up | KeyCode::Char('k') => state.prev(),
                KeyCode::Char('J') | KeyCode::PageDown => state.scroll_down(),
                KeyCode::Char('K') | KeyCode::PageUp => state.scroll_up(),
                KeyCode::Tab => {
                    state.filter.tab = state.filter.tab.next();
                    state.refresh(store);
                }
                KeyCode::Char('/') => state.searching = true,
                KeyCode::Char('s') => {
                    state.cycle_status_filter();
                    state.refresh(store);
                }
                KeyCode::Char('p') => {
                    state.cycle_position_filter();
                    state.refresh(store);
                }
                KeyCode::Char(c @ '1'..='5') => {
                    let status = Status::ALL[c as usize - '1' as usize];
                    if let Some(record) = state.current() {
                        let id = record.id;
                        if store.set_status(id, status) {
                            state.dirty = true;
                            state.refresh(store);
                        }
                    }
                }
                KeyCode::Char('e') => {
                    let path = std::path::Path::new(export::DEFAULT_EXPORT_FILE);
                    match export::write_xlsx(&state.visible, path) {
                        Ok(()) => {
                            state.message = Some(format!(
                                "Exported {} application(s) to {}",
                                state.visible.len(),
                                path.display()
                            ));
                        }
                        Err(err) => {
                            tracing::error!(%err, "export failed");
                            state.message = Some("Export failed; no file was written".to_string());
                        }
                    }
                }
                _ => {}
            }
            list_state.select(Some(state.selected));
        }
    }
    Ok(())
}

fn status_icon(status: Status) -> &'static str {
    match status {
        Status::Pending => " ",
        Status::Lolos => "+",
        Status::Wawancara => "*",
        Status::Test => "~",
        Status::Ditolak => "x",
    }
}

// Mirrors the badge colors of the original web UI
fn status_style(status: Status) -> Style {
    match status {
        Status::Pending => Style::default().fg(Color::DarkGray),
        Status::Lolos => Style::default().fg(Color::Green),
        Status::Wawancara => Style::default().fg(Color::Blue),
        Status::Test => Style::default().fg(Color::Yellow),
        Status::Ditolak => Style::default().fg(Color::Red),
    }
}

fn draw(frame: &mut Frame, state: &BrowseState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(rows[0]);

    // Left panel: application list
    let items: Vec<ListItem> = state
        .visible
        .iter()
        .map(|record| {
            let name = if record.name.len() > 24 {
                format!("{}...", &record.name[..21])
            } else {
                record.name.clone()
            };
            ListItem::new(format!(
                "{} #{:<4} {} | {}",
                status_icon(record.status),
                record.id,
                name,
                record.position
            ))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Applications ({}) [{}] ",
            state.visible.len(),
            state.filter.tab
        )))
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    // Right panel: application detail
    let detail = build_detail(state);
    let detail_widget = Paragraph::new(detail)
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((state.scroll_offset, 0));

    frame.render_widget(detail_widget, chunks[1]);

    // Filter summary / transient message line
    let summary = if state.searching {
        format!(" Search: {}_", state.filter.search)
    } else if let Some(message) = &state.message {
        format!(" {}", message)
    } else {
        format!(
            " tab:{}  search:{}  status:{}  position:{}",
            state.filter.tab,
            if state.filter.search.is_empty() {
                "-"
            } else {
                &state.filter.search
            },
            state.filter.status.map(|s| s.as_str()).unwrap_or("-"),
            state.filter.position.map(|p| p.as_str()).unwrap_or("-"),
        )
    };
    frame.render_widget(
        Paragraph::new(summary).style(Style::default().fg(Color::Gray)),
        rows[1],
    );

    let help = Paragraph::new(
        " j/k:navigate  J/K:scroll  Tab:tab  /:search  s:status  p:position  1-5:set status  e:export  q:quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, rows[2]);
}

fn build_detail<'a>(state: &'a BrowseState) -> Text<'a> {
    let Some(record) = state.current() else {
        return Text::raw("No applications found matching your criteria");
    };

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(Span::styled(
        &record.name,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(record.position.as_str()));
    lines.push(Line::from(Span::styled(
        format!("Status: {}", record.status),
        status_style(record.status),
    )));
    lines.push(Line::from(format!("Email: {}", record.email)));
    lines.push(Line::from(format!("Contact: {}", record.contact)));
    lines.push(Line::from(format!("Applied: {}", record.applied_date)));
    if let Some(interview) = record.interview_date {
        lines.push(Line::from(format!("Interview: {}", interview)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Documents ({})", record.documents.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if record.documents.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (none attached)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for name in &record.documents {
        lines.push(Line::from(format!("  - {}", name)));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Notes ({})", record.notes.len()),
        Style::default().add_modifier(Modifier::BOLD),
    )));
    if record.notes.is_empty() {
        lines.push(Line::from(Span::styled(
            "  (no notes yet)",
            Style::default().fg(Color::DarkGray),
        )));
    }
    for note in &record.notes {
        lines.push(Line::from(Span::styled(
            format!("  {} - {}", note.author, note.date),
            Style::default().fg(Color::Cyan),
        )));
        for line in note.text.lines() {
            lines.push(Line::from(format!("    {}", line)));
        }
    }

    Text::from(lines)
}
