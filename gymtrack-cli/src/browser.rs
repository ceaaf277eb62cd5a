use anyhow::Result;
use chrono::Local;
use crossterm::event::{self, KeyCode};
use gymtrack::models::HistoryPRExercise;
use gymtrack::session::Session;
use gymtrack::stats::{DateWindow, ExerciseReport};
use ratatui::{
    DefaultTerminal,
    layout::{Constraint, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

const WINDOWS: [DateWindow; 6] = [
    DateWindow::All,
    DateWindow::Week,
    DateWindow::Month,
    DateWindow::ThreeMonths,
    DateWindow::SixMonths,
    DateWindow::Year,
];

const HELP: &str = "j/k: navigate | w: window | r: reload | d: delete | q: quit";

struct HistoryBrowser<'a> {
    session: &'a Session,
    exercise_id: i64,
    history: Vec<HistoryPRExercise>,
    report: ExerciseReport,
    window: usize,
    selected: usize,
    status_message: String,
    confirm_delete: bool,
}

impl<'a> HistoryBrowser<'a> {
    async fn new(session: &'a Session, exercise_id: i64) -> Result<Self> {
        let history = session.exercise_history(exercise_id).await?;
        let report = build_report(exercise_id, &history, WINDOWS[0]);
        let status_message = if history.is_empty() {
            "No sessions logged for this exercise. Press 'q' to quit".to_string()
        } else {
            HELP.to_string()
        };
        Ok(Self {
            session,
            exercise_id,
            history,
            report,
            window: 0,
            selected: 0,
            status_message,
            confirm_delete: false,
        })
    }

    fn rebuild(&mut self) {
        self.report = build_report(self.exercise_id, &self.history, WINDOWS[self.window]);
        if self.selected >= self.report.sessions.len() {
            self.selected = self.report.sessions.len().saturating_sub(1);
        }
    }

    async fn reload(&mut self) -> Result<()> {
        self.history = self.session.exercise_history(self.exercise_id).await?;
        self.rebuild();
        self.status_message = format!("Loaded {} sessions", self.history.len());
        Ok(())
    }

    fn cycle_window(&mut self) {
        self.window = (self.window + 1) % WINDOWS.len();
        self.selected = 0;
        self.rebuild();
        self.status_message = format!("Window: {}", WINDOWS[self.window]);
    }

    fn scroll_down(&mut self) {
        if self.selected + 1 < self.report.sessions.len() {
            self.selected += 1;
        }
    }

    fn scroll_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    fn selected_session(&self) -> Option<&HistoryPRExercise> {
        let summary = self.report.sessions.get(self.selected)?;
        self.history.iter().find(|h| h.id == summary.history_id)
    }

    async fn delete_selected(&mut self) -> Result<()> {
        let Some(id) = self.selected_session().map(|h| h.id) else {
            return Ok(());
        };
        self.session.delete_session(id).await?;
        self.history.retain(|h| h.id != id);
        self.rebuild();
        self.status_message = format!("Deleted session #{}", id);
        Ok(())
    }

    fn detail_lines(&self) -> String {
        let mut lines = Vec::new();
        let records = &self.report.records;
        lines.push(format!("Max weight:   {:.1} kg", records.max_weight_value()));
        lines.push(format!("Est. 1RM:     {:.1} kg", records.one_rep_max_value()));
        lines.push(format!(
            "Best series:  {:.1} kg",
            records.best_series_volume_value()
        ));
        lines.push(format!("Window volume: {:.1} kg", self.report.window_volume));
        lines.push(String::new());

        if let Some(h) = self.selected_session() {
            lines.push(format!("Session #{} on {}", h.id, h.date));
            for (i, s) in h.series.iter().enumerate() {
                lines.push(format!("  {}. {}", i + 1, s));
            }
            if let Some(notes) = &h.notes {
                lines.push(format!("  notes: {}", notes));
            }
        }
        lines.join("\n")
    }
}

fn build_report(exercise_id: i64, history: &[HistoryPRExercise], window: DateWindow) -> ExerciseReport {
    ExerciseReport::build(exercise_id, history, window, None, Local::now().date_naive())
}

pub async fn run_history_browser(
    mut terminal: DefaultTerminal,
    session: &Session,
    exercise_id: i64,
) -> Result<()> {
    let mut browser = HistoryBrowser::new(session, exercise_id).await?;

    loop {
        terminal.draw(|frame| {
            let rows = Layout::vertical([
                Constraint::Length(3),
                Constraint::Min(1),
                Constraint::Length(3),
            ])
            .split(frame.area());
            let columns = Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                .split(rows[1]);

            let header = Paragraph::new(format!(
                "Exercise #{} - {}",
                browser.exercise_id, WINDOWS[browser.window]
            ))
            .style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
            .block(Block::default().borders(Borders::ALL));
            frame.render_widget(header, rows[0]);

            if browser.report.sessions.is_empty() {
                let empty_msg = Paragraph::new("No sessions in this window.")
                    .style(Style::default().fg(Color::Gray))
                    .block(Block::default().borders(Borders::ALL).title("Sessions"));
                frame.render_widget(empty_msg, columns[0]);
            } else {
                let items: Vec<ListItem> = browser
                    .report
                    .sessions
                    .iter()
                    .enumerate()
                    .map(|(idx, s)| {
                        let content = format!(
                            "{}  {} series  top {:.1}kg  vol {:.0}",
                            s.date, s.series_count, s.max_weight, s.volume
                        );
                        let style = if idx == browser.selected {
                            Style::default()
                                .fg(Color::Black)
                                .bg(Color::Cyan)
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default()
                        };
                        ListItem::new(content).style(style)
                    })
                    .collect();

                let list = List::new(items).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Sessions ({} shown)", browser.report.sessions.len())),
                );
                let mut list_state = ListState::default();
                list_state.select(Some(browser.selected));
                frame.render_stateful_widget(list, columns[0], &mut list_state);
            }

            let detail = Paragraph::new(browser.detail_lines())
                .block(Block::default().borders(Borders::ALL).title("Records"));
            frame.render_widget(detail, columns[1]);

            let footer = Paragraph::new(browser.status_message.as_str())
                .style(Style::default().fg(Color::White))
                .block(Block::default().borders(Borders::ALL).title("Status"));
            frame.render_widget(footer, rows[2]);
        })?;

        if let event::Event::Key(key) = event::read()? {
            if browser.confirm_delete {
                browser.confirm_delete = false;
                if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                    if let Err(e) = browser.delete_selected().await {
                        browser.status_message = format!("Delete failed: {}", e);
                    }
                } else {
                    browser.status_message = HELP.to_string();
                }
                continue;
            }

            match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => return Ok(()),
                KeyCode::Char('j') | KeyCode::Down => browser.scroll_down(),
                KeyCode::Char('k') | KeyCode::Up => browser.scroll_up(),
                KeyCode::Char('w') | KeyCode::Char('W') => browser.cycle_window(),
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    if let Err(e) = browser.reload().await {
                        browser.status_message = format!("Reload failed: {}", e);
                    }
                }
                KeyCode::Char('d') | KeyCode::Char('D') => {
                    if browser.selected_session().is_some() {
                        browser.confirm_delete = true;
                        browser.status_message = "Delete this session? (y/n)".to_string();
                    }
                }
                _ => {}
            }
        }
    }
}
