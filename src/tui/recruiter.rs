use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Tabs},
};

use super::{format_date, help_line, status_style, type_style, with_terminal};
use crate::dashboard::{DashboardStats, FilterState};
use crate::store::Store;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Applications,
    Jobs,
}

/// Recruiter dashboard: stat cards on top, then either the filterable
/// applications table or the job postings list. The applications filter is
/// recomputed from the full list on every draw; the source data never
/// changes underneath it.
struct App<'a> {
    store: &'a Store,
    tab: Tab,
    filter: FilterState,
    editing_search: bool,
    selected: usize,
    quit: bool,
}

impl<'a> App<'a> {
    fn new(store: &'a Store) -> Self {
        Self {
            store,
            tab: Tab::Applications,
            filter: FilterState::default(),
            editing_search: false,
            selected: 0,
            quit: false,
        }
    }

    fn visible_rows(&self) -> usize {
        match self.tab {
            Tab::Applications => self.filter.filter(self.store.applications()).len(),
            Tab::Jobs => self.store.jobs().len(),
        }
    }

    fn clamp_selection(&mut self) {
        let rows = self.visible_rows();
        if rows == 0 {
            self.selected = 0;
        } else if self.selected >= rows {
            self.selected = rows - 1;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.editing_search {
            match key.code {
                KeyCode::Esc | KeyCode::Enter => self.editing_search = false,
                KeyCode::Backspace => {
                    self.filter.search.pop();
                    self.selected = 0;
                }
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    self.filter.search.push(c);
                    self.selected = 0;
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Tab => {
                self.tab = match self.tab {
                    Tab::Applications => Tab::Jobs,
                    Tab::Jobs => Tab::Applications,
                };
                self.selected = 0;
            }
            KeyCode::Char('/') => {
                if self.tab == Tab::Applications {
                    self.editing_search = true;
                }
            }
            KeyCode::Char('f') => {
                if self.tab == Tab::Applications {
                    self.filter.status = self.filter.status.cycle();
                    self.selected = 0;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let rows = self.visible_rows();
                if rows > 0 && self.selected < rows - 1 {
                    self.selected += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = self.selected.saturating_sub(1);
            }
            _ => {}
        }
        self.clamp_selection();
    }
}

pub fn run(store: &Store) -> Result<()> {
    let mut app = App::new(store);
    with_terminal(|terminal| {
        let mut table_state = TableState::default();
        loop {
            table_state.select(Some(app.selected));
            terminal.draw(|frame| draw(frame, &app, &mut table_state))?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                app.handle_key(key);
                if app.quit {
                    break;
                }
            }
        }
        Ok(())
    })
}

fn draw(frame: &mut Frame, app: &App, table_state: &mut TableState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_stats(frame, app, chunks[0]);

    let tabs = Tabs::new(vec![" Applications ", " Job Postings "])
        .select(match app.tab {
            Tab::Applications => 0,
            Tab::Jobs => 1,
        })
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .divider("|");
    frame.render_widget(tabs, chunks[1]);

    match app.tab {
        Tab::Applications => draw_applications(frame, app, chunks[2], table_state),
        Tab::Jobs => draw_jobs(frame, app, chunks[2], table_state),
    }

    let hint = if app.editing_search {
        " typing into search  Enter/Esc:done"
    } else if app.tab == Tab::Applications {
        " Tab:switch tab  /:search  f:cycle status filter  j/k:navigate  q:quit"
    } else {
        " Tab:switch tab  j/k:navigate  q:quit"
    };
    frame.render_widget(help_line(hint), chunks[3]);
}

fn draw_stats(frame: &mut Frame, app: &App, area: Rect) {
    let stats = DashboardStats::compute(app.store.jobs(), app.store.applications());
    let cards = [
        ("Active Jobs", stats.total_jobs),
        ("Total Applications", stats.total_applications),
        ("Pending Review", stats.pending_review),
        ("Interviews", stats.interviews),
    ];

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    for ((title, value), column) in cards.into_iter().zip(columns.iter()) {
        let card = Paragraph::new(Line::from(Span::styled(
            value.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", title)),
        );
        frame.render_widget(card, *column);
    }
}

fn draw_applications(frame: &mut Frame, app: &App, area: Rect, table_state: &mut TableState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let search_style = if app.editing_search {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let cursor = if app.editing_search { "_" } else { "" };
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(
            format!("Search: {}{}", app.filter.search, cursor),
            search_style,
        ),
        Span::raw("    "),
        Span::raw(format!("Status: {}", app.filter.status.label())),
    ]))
    .block(Block::default().borders(Borders::ALL).title(" Filter "));
    frame.render_widget(bar, chunks[0]);

    let filtered = app.filter.filter(app.store.applications());
    if filtered.is_empty() {
        let empty = Paragraph::new("No applications found")
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(empty, chunks[1]);
        return;
    }

    let rows: Vec<Row> = filtered
        .iter()
        .map(|application| {
            let score = match application.test_score {
                Some(score) => format!("{}%", score),
                None => "Not taken".to_string(),
            };
            Row::new(vec![
                Cell::from(application.candidate_name.clone()),
                Cell::from(application.email.clone()),
                Cell::from(application.job_title.clone()),
                Cell::from(format_date(&application.applied_date)),
                Cell::from(score),
                Cell::from(Span::styled(
                    application.status.as_str(),
                    status_style(application.status),
                )),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(18),
            Constraint::Percentage(24),
            Constraint::Percentage(24),
            Constraint::Percentage(14),
            Constraint::Percentage(10),
            Constraint::Percentage(10),
        ],
    )
    .header(
        Row::new(vec![
            "Candidate",
            "Email",
            "Job Title",
            "Applied",
            "Score",
            "Status",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(format!(
        " Candidate Applications ({}) ",
        filtered.len()
    )))
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, chunks[1], table_state);
}

fn draw_jobs(frame: &mut Frame, app: &App, area: Rect, table_state: &mut TableState) {
    let rows: Vec<Row> = app
        .store
        .jobs()
        .iter()
        .map(|job| {
            Row::new(vec![
                Cell::from(job.title.clone()),
                Cell::from(job.department.clone()),
                Cell::from(job.location.clone()),
                Cell::from(Span::styled(job.job_type.as_str(), type_style(job.job_type))),
                Cell::from(format_date(&job.posted_date)),
                Cell::from(format!("{}", app.store.application_count(&job.id))),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Percentage(28),
            Constraint::Percentage(16),
            Constraint::Percentage(18),
            Constraint::Percentage(12),
            Constraint::Percentage(14),
            Constraint::Percentage(12),
        ],
    )
    .header(
        Row::new(vec![
            "Title",
            "Department",
            "Location",
            "Type",
            "Posted",
            "Applications",
        ])
        .style(Style::default().add_modifier(Modifier::BOLD)),
    )
    .block(Block::default().borders(Borders::ALL).title(format!(
        " Active Job Postings ({}) ",
        app.store.jobs().len()
    )))
    .row_highlight_style(Style::default().bg(Color::DarkGray))
    .highlight_symbol("> ");

    frame.render_stateful_widget(table, area, table_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dashboard::StatusFilter;
    use crate::models::ApplicationStatus;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_search_editing_updates_filter() {
        let store = Store::load().unwrap();
        let mut app = App::new(&store);
        app.handle_key(key(KeyCode::Char('/')));
        assert!(app.editing_search);
        for c in "sarah".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        app.handle_key(key(KeyCode::Enter));
        assert!(!app.editing_search);
        assert_eq!(app.filter.search, "sarah");
        assert_eq!(app.visible_rows(), 1);
    }

    #[test]
    fn test_status_filter_cycles_from_keyboard() {
        let store = Store::load().unwrap();
        let mut app = App::new(&store);
        app.handle_key(key(KeyCode::Char('f')));
        assert_eq!(
            app.filter.status,
            StatusFilter::Only(ApplicationStatus::Pending)
        );
        let pending = app.visible_rows();
        assert!(pending < store.applications().len());
    }

    #[test]
    fn test_selection_clamps_when_filter_shrinks() {
        let store = Store::load().unwrap();
        let mut app = App::new(&store);
        for _ in 0..store.applications().len() {
            app.handle_key(key(KeyCode::Char('j')));
        }
        assert_eq!(app.selected, store.applications().len() - 1);

        app.handle_key(key(KeyCode::Char('/')));
        for c in "sarah".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.selected, 0);
        assert_eq!(app.visible_rows(), 1);
    }

    #[test]
    fn test_tab_switches_between_views() {
        let store = Store::load().unwrap();
        let mut app = App::new(&store);
        assert_eq!(app.tab, Tab::Applications);
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Jobs);
        assert_eq!(app.visible_rows(), store.jobs().len());
        app.handle_key(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Applications);
    }
}
