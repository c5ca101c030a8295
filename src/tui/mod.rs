pub mod browse;
pub mod recruiter;

use std::io::{stdout, Stdout};

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::{
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{prelude::*, widgets::Paragraph};

use crate::models::{ApplicationStatus, JobType};

/// Puts the terminal into raw mode and the alternate screen, runs the view,
/// and restores the terminal even when the view errors.
fn with_terminal<F>(run: F) -> Result<()>
where
    F: FnOnce(&mut Terminal<CrosstermBackend<Stdout>>) -> Result<()>,
{
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout()))?;

    let result = run(&mut terminal);

    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;
    result
}

/// Status badge colors. Total over the enum so a new status will not compile
/// without a color.
fn status_style(status: ApplicationStatus) -> Style {
    match status {
        ApplicationStatus::Pending => Style::default().fg(Color::Yellow),
        ApplicationStatus::Reviewing => Style::default().fg(Color::Blue),
        ApplicationStatus::Interview => Style::default().fg(Color::Magenta),
        ApplicationStatus::Rejected => Style::default().fg(Color::Red),
        ApplicationStatus::Accepted => Style::default().fg(Color::Green),
    }
}

fn type_style(job_type: JobType) -> Style {
    match job_type {
        JobType::FullTime => Style::default().fg(Color::Cyan),
        JobType::PartTime => Style::default().fg(Color::Yellow),
        JobType::Contract => Style::default().fg(Color::Magenta),
        JobType::Remote => Style::default().fg(Color::Green),
    }
}

/// "2024-01-15" -> "Jan 15, 2024"; anything unparseable is shown as-is.
fn format_date(iso: &str) -> String {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d")
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|_| iso.to_string())
}

fn help_line(text: &str) -> Paragraph<'_> {
    Paragraph::new(text).style(Style::default().fg(Color::DarkGray))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-01-15"), "Jan 15, 2024");
        assert_eq!(format_date("2024-02-05"), "Feb 5, 2024");
        assert_eq!(format_date("not a date"), "not a date");
    }
}
