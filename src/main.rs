mod apply;
mod assessment;
mod dashboard;
mod models;
mod store;
mod tui;

use anyhow::Result;
use clap::{Parser, Subcommand};

use dashboard::{FilterState, StatusFilter};
use models::{ApplicationStatus, JobType};
use store::Store;

#[derive(Parser)]
#[command(name = "openings")]
#[command(about = "Job board in the terminal - browse positions, take skills tests, apply")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List open positions
    Jobs {
        /// Filter by employment type (full-time, part-time, contract, remote)
        #[arg(short = 't', long = "type")]
        job_type: Option<String>,

        /// Filter by department
        #[arg(short, long)]
        department: Option<String>,

        /// Search in title, company, and location
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show full details for one position
    Show {
        /// Job ID
        id: String,
    },

    /// Browse positions interactively
    Browse,

    /// Take the skills test for a position
    Test {
        /// Job ID
        job_id: String,
    },

    /// Fill in the application form for a position
    Apply {
        /// Job ID
        job_id: String,
    },

    /// Open the recruiter dashboard
    Dashboard,

    /// List candidate applications
    Applications {
        /// Filter by status (pending, reviewing, interview, rejected, accepted)
        #[arg(long)]
        status: Option<String>,

        /// Search in candidate name, job title, and email
        #[arg(short, long)]
        search: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let store = Store::load()?;

    match cli.command {
        Commands::Jobs {
            job_type,
            department,
            search,
        } => {
            let job_type: Option<JobType> =
                job_type.as_deref().map(str::parse).transpose()?;
            let jobs = store.list_jobs(job_type, department.as_deref(), search.as_deref());
            if jobs.is_empty() {
                println!("No jobs found.");
            } else {
                println!(
                    "{:<4} {:<10} {:<30} {:<22} {:<20} {:<12}",
                    "ID", "TYPE", "TITLE", "COMPANY", "LOCATION", "POSTED"
                );
                println!("{}", "-".repeat(102));
                for job in jobs {
                    println!(
                        "{:<4} {:<10} {:<30} {:<22} {:<20} {:<12}",
                        job.id,
                        job.job_type,
                        truncate(&job.title, 28),
                        truncate(&job.company, 20),
                        truncate(&job.location, 18),
                        job.posted_date
                    );
                }
            }
        }

        Commands::Show { id } => match store.job(&id) {
            Some(job) => {
                println!("Job #{}", job.id);
                println!("Title: {}", job.title);
                println!("Company: {}", job.company);
                println!("Location: {}", job.location);
                println!("Type: {}", job.job_type);
                println!("Salary: {}", job.salary);
                println!("Department: {}", job.department);
                println!("Experience: {}", job.experience);
                println!("Posted: {}", job.posted_date);
                if !store.questions_for(&job.id).is_empty() {
                    println!(
                        "Skills test: {} questions (openings test {})",
                        store.questions_for(&job.id).len(),
                        job.id
                    );
                }
                println!("\n{}", textwrap::fill(&job.description, 78));
                if !job.requirements.is_empty() {
                    println!("\nRequirements:");
                    for req in &job.requirements {
                        println!("  - {}", req);
                    }
                }
                if !job.responsibilities.is_empty() {
                    println!("\nResponsibilities:");
                    for resp in &job.responsibilities {
                        println!("  - {}", resp);
                    }
                }
            }
            None => {
                println!("Job #{} not found.", id);
            }
        },

        Commands::Browse => {
            tui::browse::run(&store)?;
        }

        Commands::Test { job_id } => {
            tui::browse::run_assessment(&store, &job_id)?;
        }

        Commands::Apply { job_id } => {
            if store.job(&job_id).is_none() {
                println!("Job #{} not found.", job_id);
            } else {
                tui::browse::run_apply(&store, &job_id)?;
            }
        }

        Commands::Dashboard => {
            tui::recruiter::run(&store)?;
        }

        Commands::Applications { status, search } => {
            let status = match status.as_deref() {
                Some(s) => StatusFilter::Only(s.parse::<ApplicationStatus>()?),
                None => StatusFilter::All,
            };
            let filter = FilterState {
                search: search.unwrap_or_default(),
                status,
            };
            let applications = filter.filter(store.applications());
            if applications.is_empty() {
                println!("No applications found.");
            } else {
                println!(
                    "{:<4} {:<20} {:<26} {:<28} {:<10} {:<12}",
                    "ID", "CANDIDATE", "EMAIL", "JOB TITLE", "SCORE", "STATUS"
                );
                println!("{}", "-".repeat(104));
                for application in applications {
                    let score = match application.test_score {
                        Some(score) => format!("{}%", score),
                        None => "-".to_string(),
                    };
                    println!(
                        "{:<4} {:<20} {:<26} {:<28} {:<10} {:<12}",
                        application.id,
                        truncate(&application.candidate_name, 18),
                        truncate(&application.email, 24),
                        truncate(&application.job_title, 26),
                        score,
                        application.status
                    );
                }
            }
        }
    }

    Ok(())
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
