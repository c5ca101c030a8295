use std::collections::HashMap;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, List, ListItem, ListState, Paragraph, Wrap},
};

use super::{format_date, help_line, type_style, with_terminal};
use crate::apply::{ApplicationForm, Field};
use crate::assessment::Assessment;
use crate::models::Job;
use crate::store::Store;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Screen {
    Listing,
    Assess { job_id: String },
    NoTest { job_id: String },
    Apply { job_id: String },
}

/// Candidate-side state: the job cursor plus per-job assessment and form
/// state. Assessments and drafts are keyed by job id so leaving a flow and
/// coming back within the session does not reset it.
struct App<'a> {
    store: &'a Store,
    selected: usize,
    scroll_offset: u16,
    screen: Screen,
    assessments: HashMap<String, Assessment>,
    forms: HashMap<String, ApplicationForm>,
    form_focus: usize, // index into Field::ALL
    notice: Option<String>,
    quit: bool,
}

impl<'a> App<'a> {
    fn new(store: &'a Store) -> Self {
        Self {
            store,
            selected: 0,
            scroll_offset: 0,
            screen: Screen::Listing,
            assessments: HashMap::new(),
            forms: HashMap::new(),
            form_focus: 0,
            notice: None,
            quit: false,
        }
    }

    fn current_job(&self) -> Option<&'a Job> {
        self.store.jobs().get(self.selected)
    }

    fn select_job(&mut self, job_id: &str) {
        if let Some(idx) = self.store.jobs().iter().position(|j| j.id == job_id) {
            self.selected = idx;
        }
    }

    fn next(&mut self) {
        let jobs = self.store.jobs();
        if !jobs.is_empty() && self.selected < jobs.len() - 1 {
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

    fn start_assessment(&mut self, job_id: &str) {
        self.select_job(job_id);
        let questions = self.store.questions_for(job_id);
        if self.store.job(job_id).is_none() || questions.is_empty() {
            self.screen = Screen::NoTest {
                job_id: job_id.to_string(),
            };
            return;
        }
        if !self.assessments.contains_key(job_id) {
            // non-empty by the check above, so new() cannot fail
            if let Ok(assessment) = Assessment::new(questions.to_vec()) {
                self.assessments.insert(job_id.to_string(), assessment);
            }
        }
        self.screen = Screen::Assess {
            job_id: job_id.to_string(),
        };
    }

    fn start_apply(&mut self, job_id: &str) {
        self.select_job(job_id);
        let Some(job) = self.store.job(job_id) else {
            return;
        };
        let score = self
            .assessments
            .get(job_id)
            .filter(|a| a.is_complete())
            .map(Assessment::score);
        match self.forms.get_mut(job_id) {
            // a draft opened before the test was taken picks the score up now
            Some(form) => {
                if let Some(score) = score {
                    form.set_test_score(score);
                }
            }
            None => {
                self.forms
                    .insert(job_id.to_string(), ApplicationForm::new(job, score));
            }
        }
        self.form_focus = 0;
        self.notice = None;
        self.screen = Screen::Apply {
            job_id: job_id.to_string(),
        };
    }

    fn handle_key(&mut self, key: KeyEvent) {
        match self.screen.clone() {
            Screen::Listing => self.handle_listing_key(key),
            Screen::Assess { job_id } => self.handle_assess_key(key, &job_id),
            Screen::NoTest { .. } => match key.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Char('b') | KeyCode::Esc => self.screen = Screen::Listing,
                _ => {}
            },
            Screen::Apply { job_id } => self.handle_apply_key(key, &job_id),
        }
    }

    fn handle_listing_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.prev(),
            KeyCode::Char('J') | KeyCode::PageDown => {
                self.scroll_offset = self.scroll_offset.saturating_add(3);
            }
            KeyCode::Char('K') | KeyCode::PageUp => {
                self.scroll_offset = self.scroll_offset.saturating_sub(3);
            }
            KeyCode::Char('t') => {
                if let Some(job) = self.current_job() {
                    self.start_assessment(&job.id);
                }
            }
            KeyCode::Char('a') => {
                if let Some(job) = self.current_job() {
                    self.start_apply(&job.id);
                }
            }
            _ => {}
        }
    }

    fn handle_assess_key(&mut self, key: KeyEvent, job_id: &str) {
        let Some(assessment) = self.assessments.get_mut(job_id) else {
            self.screen = Screen::Listing;
            return;
        };

        if assessment.is_complete() {
            // terminal screen: two targets plus quit
            match key.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Char('a') => self.start_apply(job_id),
                KeyCode::Char('b') | KeyCode::Esc => self.screen = Screen::Listing,
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => self.quit = true,
            KeyCode::Char('b') | KeyCode::Esc => self.screen = Screen::Listing,
            KeyCode::Char(c @ '1'..='9') => {
                let index = c as usize - '1' as usize;
                let question = assessment.current_question();
                if index < question.options.len() {
                    let id = question.id.clone();
                    assessment.select_answer(&id, index);
                }
            }
            // Next and Submit are gated on the current question being
            // answered; the state layer would no-op anyway.
            KeyCode::Char('n') | KeyCode::Right => {
                if assessment.current_answered() && !assessment.is_last() {
                    assessment.advance();
                }
            }
            KeyCode::Char('p') | KeyCode::Left => assessment.retreat(),
            KeyCode::Char('s') => {
                if assessment.is_last() && assessment.current_answered() {
                    assessment.submit();
                }
            }
            KeyCode::Enter => {
                if assessment.current_answered() {
                    if assessment.is_last() {
                        assessment.submit();
                    } else {
                        assessment.advance();
                    }
                }
            }
            _ => {}
        }
    }

    fn handle_apply_key(&mut self, key: KeyEvent, job_id: &str) {
        let Some(form) = self.forms.get_mut(job_id) else {
            self.screen = Screen::Listing;
            return;
        };

        if form.is_submitted() {
            match key.code {
                KeyCode::Char('q') => self.quit = true,
                KeyCode::Char('b') | KeyCode::Esc => {
                    self.selected = 0;
                    self.scroll_offset = 0;
                    self.screen = Screen::Listing;
                }
                KeyCode::Char('d') => self.screen = Screen::Listing,
                _ => {}
            }
            return;
        }

        let field = Field::ALL[self.form_focus];
        match key.code {
            KeyCode::Esc => self.screen = Screen::Listing,
            KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                if !form.submit() {
                    let missing: Vec<&str> = form
                        .missing_required()
                        .iter()
                        .map(|f| f.label())
                        .collect();
                    self.notice = Some(format!("Required: {}", missing.join(", ")));
                } else {
                    self.notice = None;
                }
            }
            KeyCode::Tab | KeyCode::Down | KeyCode::Enter => {
                self.form_focus = (self.form_focus + 1) % Field::ALL.len();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form_focus = self
                    .form_focus
                    .checked_sub(1)
                    .unwrap_or(Field::ALL.len() - 1);
            }
            KeyCode::Backspace => {
                form.pop_char(field);
                self.notice = None;
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                form.push_char(field, c);
                self.notice = None;
            }
            _ => {}
        }
    }
}

pub fn run(store: &Store) -> Result<()> {
    run_app(App::new(store))
}

/// Opens the browse view directly on the skills assessment for one job, the
/// deep link used by `openings test <id>`. An unknown job or a job without
/// questions lands on the "no test available" screen.
pub fn run_assessment(store: &Store, job_id: &str) -> Result<()> {
    let mut app = App::new(store);
    app.start_assessment(job_id);
    run_app(app)
}

/// Opens the browse view directly on the application form for one job.
pub fn run_apply(store: &Store, job_id: &str) -> Result<()> {
    let mut app = App::new(store);
    app.start_apply(job_id);
    run_app(app)
}

fn run_app(mut app: App) -> Result<()> {
    with_terminal(|terminal| {
        let mut list_state = ListState::default();
        loop {
            list_state.select(Some(app.selected));
            terminal.draw(|frame| draw(frame, &app, &mut list_state))?;

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

fn draw(frame: &mut Frame, app: &App, list_state: &mut ListState) {
    match &app.screen {
        Screen::Listing => draw_listing(frame, app, list_state),
        Screen::Assess { job_id } => draw_assessment(frame, app, job_id),
        Screen::NoTest { job_id } => draw_no_test(frame, app, job_id),
        Screen::Apply { job_id } => draw_apply(frame, app, job_id),
    }
}

// --- Listing ---

fn draw_listing(frame: &mut Frame, app: &App, list_state: &mut ListState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(frame.area());

    let items: Vec<ListItem> = app
        .store
        .jobs()
        .iter()
        .map(|job| {
            let title: String = if job.title.chars().count() > 30 {
                format!("{}...", job.title.chars().take(27).collect::<String>())
            } else {
                job.title.clone()
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{:<9} ", job.job_type), type_style(job.job_type)),
                Span::raw(format!("{} | {}", title, job.company)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" Open Positions ({}) ", app.store.jobs().len())),
        )
        .highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, chunks[0], list_state);

    let detail = Paragraph::new(build_detail(app))
        .block(Block::default().borders(Borders::ALL).title(" Detail "))
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset, 0));
    frame.render_widget(detail, chunks[1]);

    let footer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());
    frame.render_widget(
        help_line(" j/k:navigate  J/K:scroll  t:skills test  a:apply  q:quit"),
        footer[1],
    );
}

fn build_detail<'a>(app: &'a App) -> Text<'a> {
    let Some(job) = app.current_job() else {
        return Text::raw("No job selected");
    };

    let mut lines: Vec<Line> = Vec::new();
    lines.push(Line::from(Span::styled(
        &job.title,
        Style::default().add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(format!("at {}", job.company)));
    lines.push(Line::from(""));
    lines.push(Line::from(format!("Location: {}", job.location)));
    lines.push(Line::from(vec![
        Span::raw("Type: "),
        Span::styled(job.job_type.as_str(), type_style(job.job_type)),
        Span::raw(format!("  |  {}", job.experience)),
    ]));
    lines.push(Line::from(format!("Salary: {}", job.salary)));
    lines.push(Line::from(format!("Department: {}", job.department)));
    lines.push(Line::from(format!(
        "Posted: {}",
        format_date(&job.posted_date)
    )));

    if !app.store.questions_for(&job.id).is_empty() {
        lines.push(Line::from(Span::styled(
            "Skills test available - press t to take it",
            Style::default().fg(Color::Green),
        )));
    }

    lines.push(Line::from(""));
    for line in textwrap::fill(&job.description, 70).lines() {
        lines.push(Line::from(line.to_string()));
    }

    if !job.requirements.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "REQUIREMENTS",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for req in &job.requirements {
            lines.push(Line::from(format!("  - {}", req)));
        }
    }

    if !job.responsibilities.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "RESPONSIBILITIES",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for resp in &job.responsibilities {
            lines.push(Line::from(format!("  - {}", resp)));
        }
    }

    Text::from(lines)
}

// --- Assessment ---

fn draw_assessment(frame: &mut Frame, app: &App, job_id: &str) {
    let Some(assessment) = app.assessments.get(job_id) else {
        return;
    };
    let job_title = app
        .store
        .job(job_id)
        .map(|j| j.title.as_str())
        .unwrap_or("Unknown position");

    if assessment.is_complete() {
        draw_assessment_complete(frame, job_title, assessment.score());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(
            " Skills Assessment: {} - Question {} of {} ",
            job_title,
            assessment.current_index() + 1,
            assessment.len()
        )))
        .gauge_style(Style::default().fg(Color::Cyan))
        .ratio(assessment.progress());
    frame.render_widget(gauge, chunks[0]);

    let question = assessment.current_question();
    let selected = assessment.answer_for(&question.id);

    let mut lines: Vec<Line> = Vec::new();
    for line in textwrap::fill(&question.question, 76).lines() {
        lines.push(Line::from(Span::styled(
            line.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }
    lines.push(Line::from(""));
    for (i, option) in question.options.iter().enumerate() {
        let marker = if selected == Some(i) { "(x)" } else { "( )" };
        let style = if selected == Some(i) {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(
            format!("  {} {}. {}", marker, i + 1, option),
            style,
        )));
    }
    if question.correct_answer.is_none() {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "This question is reviewed by the hiring team and does not count toward your score.",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let body = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[1]);

    let hint = if !assessment.current_answered() {
        " 1-9:answer  p:previous  b:back to job  (answer to continue)"
    } else if assessment.is_last() {
        " 1-9:answer  p:previous  s/Enter:submit test  b:back to job"
    } else {
        " 1-9:answer  p:previous  n/Enter:next  b:back to job"
    };
    frame.render_widget(help_line(hint), chunks[2]);
}

fn draw_assessment_complete(frame: &mut Frame, job_title: &str, score: u8) {
    let area = centered_rect(60, 12, frame.area());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Test Complete!",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(format!("You finished the skills assessment for {}", job_title)).centered(),
        Line::from(""),
        Line::from(Span::styled(
            format!("{}%", score),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from("Your Score").centered(),
        Line::from(""),
        Line::from("Your result will be included with your application.").centered(),
        Line::from(""),
        Line::from(Span::styled(
            "[a] continue to application   [b] back to job details",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];
    let card = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(card, area);
}

fn draw_no_test(frame: &mut Frame, app: &App, job_id: &str) {
    let job_title = app
        .store
        .job(job_id)
        .map(|j| j.title.as_str())
        .unwrap_or("this position");
    let area = centered_rect(60, 8, frame.area());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "No Test Available",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(format!("There is no skills test for {}.", job_title)).centered(),
        Line::from(""),
        Line::from(Span::styled(
            "[b] back to job details",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];
    let card = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(card, area);
}

// --- Application form ---

fn draw_apply(frame: &mut Frame, app: &App, job_id: &str) {
    let Some(form) = app.forms.get(job_id) else {
        return;
    };

    if form.is_submitted() {
        draw_apply_submitted(frame, form.job_title());
        return;
    }

    let company = app
        .store
        .job(job_id)
        .map(|j| j.company.as_str())
        .unwrap_or("");

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let mut header_lines = vec![Line::from(vec![
        Span::styled(
            "Apply for Position: ",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("{} at {}", form.job_title(), company)),
    ])];
    if let Some(score) = form.test_score() {
        header_lines.push(Line::from(Span::styled(
            format!("Skills test score on file: {}%", score),
            Style::default().fg(Color::Green),
        )));
    } else {
        header_lines.push(Line::from(Span::styled(
            "No skills test taken",
            Style::default().fg(Color::DarkGray),
        )));
    }
    frame.render_widget(
        Paragraph::new(Text::from(header_lines))
            .block(Block::default().borders(Borders::BOTTOM)),
        chunks[0],
    );

    let mut lines: Vec<Line> = Vec::new();
    for (i, field) in Field::ALL.into_iter().enumerate() {
        let focused = i == app.form_focus;
        let marker = if focused { "> " } else { "  " };
        let required = if field.required() { "*" } else { " " };
        let label = format!("{}{}{:<18}", marker, required, field.label());

        let value = form.value(field);
        let value_span = if value.is_empty() {
            Span::styled(field.placeholder(), Style::default().fg(Color::DarkGray))
        } else {
            Span::raw(value)
        };

        let label_style = if focused {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        let mut spans = vec![Span::styled(label, label_style), value_span];
        if focused {
            spans.push(Span::styled("_", Style::default().fg(Color::Cyan)));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    if let Some(notice) = &app.notice {
        lines.push(Line::from(Span::styled(
            notice.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let body = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title(" Application "))
        .wrap(Wrap { trim: false });
    frame.render_widget(body, chunks[1]);

    frame.render_widget(
        help_line(" type to edit  Tab/Enter:next field  Shift-Tab:previous  Ctrl-s:submit  Esc:back"),
        chunks[2],
    );
}

fn draw_apply_submitted(frame: &mut Frame, job_title: &str) {
    let area = centered_rect(60, 11, frame.area());
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Application Submitted!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ))
        .centered(),
        Line::from(format!("Thank you for applying to {}", job_title)).centered(),
        Line::from(""),
        Line::from("Our recruitment team will review your application shortly.").centered(),
        Line::from("You'll receive updates about your application status.").centered(),
        Line::from(""),
        Line::from(Span::styled(
            "[b] browse more jobs   [d] back to job details",
            Style::default().fg(Color::DarkGray),
        ))
        .centered(),
    ];
    let card = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(card, area);
}

fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(height),
            Constraint::Min(1),
        ])
        .split(area);
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1]);
    horizontal[1]
}
