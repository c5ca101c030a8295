use std::collections::HashMap;

use anyhow::{bail, Context, Result};

use crate::models::{Application, Job, JobType, TestQuestion};

const JOBS_JSON: &str = include_str!("../data/jobs.json");
const QUESTIONS_JSON: &str = include_str!("../data/questions.json");
const APPLICATIONS_JSON: &str = include_str!("../data/applications.json");

/// Read-only source for all job board data. Everything lives in memory for
/// the lifetime of the process; nothing is ever written back.
pub struct Store {
    jobs: Vec<Job>,
    questions: HashMap<String, Vec<TestQuestion>>,
    applications: Vec<Application>,
}

impl Store {
    pub fn load() -> Result<Self> {
        let jobs: Vec<Job> =
            serde_json::from_str(JOBS_JSON).context("Parsing bundled jobs fixture")?;
        let questions: HashMap<String, Vec<TestQuestion>> =
            serde_json::from_str(QUESTIONS_JSON).context("Parsing bundled questions fixture")?;
        let applications: Vec<Application> = serde_json::from_str(APPLICATIONS_JSON)
            .context("Parsing bundled applications fixture")?;

        let store = Self {
            jobs,
            questions,
            applications,
        };
        store.validate()?;
        Ok(store)
    }

    // The fixtures ship inside the binary, so a violation here is a packaging
    // mistake. Catch it at startup instead of somewhere mid-render.
    fn validate(&self) -> Result<()> {
        for (job_id, questions) in &self.questions {
            if self.job(job_id).is_none() {
                bail!("Questions reference unknown job id '{}'", job_id);
            }
            for q in questions {
                if let Some(answer) = q.correct_answer {
                    if answer >= q.options.len() {
                        bail!(
                            "Question '{}' has correct answer index {} but only {} options",
                            q.id,
                            answer,
                            q.options.len()
                        );
                    }
                }
            }
        }
        for app in &self.applications {
            if self.job(&app.job_id).is_none() {
                bail!(
                    "Application '{}' references unknown job id '{}'",
                    app.id,
                    app.job_id
                );
            }
            if let Some(score) = app.test_score {
                if score > 100 {
                    bail!("Application '{}' has test score {} > 100", app.id, score);
                }
            }
        }
        Ok(())
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn job(&self, id: &str) -> Option<&Job> {
        self.jobs.iter().find(|j| j.id == id)
    }

    /// Questions for a job, in presentation order. Empty when the job has no
    /// skills test (or does not exist).
    pub fn questions_for(&self, job_id: &str) -> &[TestQuestion] {
        self.questions
            .get(job_id)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn applications(&self) -> &[Application] {
        &self.applications
    }

    pub fn application_count(&self, job_id: &str) -> usize {
        self.applications
            .iter()
            .filter(|a| a.job_id == job_id)
            .count()
    }

    /// Filtered job listing for the `jobs` subcommand. All filters are
    /// conjunctive; search matches title, company, or location.
    pub fn list_jobs(
        &self,
        job_type: Option<JobType>,
        department: Option<&str>,
        search: Option<&str>,
    ) -> Vec<&Job> {
        let search = search.map(str::to_lowercase);
        self.jobs
            .iter()
            .filter(|job| job_type.is_none_or(|t| job.job_type == t))
            .filter(|job| {
                department.is_none_or(|d| job.department.eq_ignore_ascii_case(d))
            })
            .filter(|job| {
                search.as_deref().is_none_or(|s| {
                    job.title.to_lowercase().contains(s)
                        || job.company.to_lowercase().contains(s)
                        || job.location.to_lowercase().contains(s)
                })
            })
            .collect()
    }
}
