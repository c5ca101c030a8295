use crate::models::{Application, ApplicationStatus, Job};

/// Status side of the applications filter. `All` disables the predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Only(ApplicationStatus),
}

impl StatusFilter {
    pub fn label(&self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Only(status) => status.as_str(),
        }
    }

    /// Next filter in the cycle all -> pending -> ... -> accepted -> all.
    pub fn cycle(&self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Only(ApplicationStatus::ALL[0]),
            StatusFilter::Only(status) => {
                let idx = ApplicationStatus::ALL
                    .iter()
                    .position(|s| s == status)
                    .unwrap_or(0);
                match ApplicationStatus::ALL.get(idx + 1) {
                    Some(next) => StatusFilter::Only(*next),
                    None => StatusFilter::All,
                }
            }
        }
    }
}

/// Search + status filter over the applications list. Both predicates are
/// conjunctive; the text search is a case-insensitive substring match against
/// candidate name, job title, or email, and an empty search matches all.
#[derive(Debug, Clone, Default)]
pub struct FilterState {
    pub search: String,
    pub status: StatusFilter,
}

impl FilterState {
    pub fn matches(&self, app: &Application) -> bool {
        let matches_status = match self.status {
            StatusFilter::All => true,
            StatusFilter::Only(status) => app.status == status,
        };
        let needle = self.search.to_lowercase();
        let matches_search = needle.is_empty()
            || app.candidate_name.to_lowercase().contains(&needle)
            || app.job_title.to_lowercase().contains(&needle)
            || app.email.to_lowercase().contains(&needle);
        matches_status && matches_search
    }

    /// Subset of `applications` passing both predicates, in input order.
    pub fn filter<'a>(&self, applications: &'a [Application]) -> Vec<&'a Application> {
        applications.iter().filter(|a| self.matches(a)).collect()
    }
}

/// Headline numbers for the dashboard stat cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_jobs: usize,
    pub total_applications: usize,
    pub pending_review: usize,
    pub interviews: usize,
}

impl DashboardStats {
    pub fn compute(jobs: &[Job], applications: &[Application]) -> Self {
        Self {
            total_jobs: jobs.len(),
            total_applications: applications.len(),
            pending_review: applications
                .iter()
                .filter(|a| a.status == ApplicationStatus::Pending)
                .count(),
            interviews: applications
                .iter()
                .filter(|a| a.status == ApplicationStatus::Interview)
                .count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(id: &str, name: &str, title: &str, email: &str, status: ApplicationStatus) -> Application {
        Application {
            id: id.to_string(),
            job_id: "1".into(),
            job_title: title.to_string(),
            candidate_name: name.to_string(),
            email: email.to_string(),
            phone: "+1 (555) 000-0000".into(),
            resume: "resume.pdf".into(),
            cover_letter: "Hello".into(),
            test_score: None,
            status,
            applied_date: "2024-02-01".into(),
        }
    }

    fn fixture() -> Vec<Application> {
        vec![
            app("a1", "Sarah Chen", "Frontend Engineer", "sarah@example.com", ApplicationStatus::Reviewing),
            app("a2", "Marcus Johnson", "Frontend Engineer", "marcus@example.com", ApplicationStatus::Interview),
            app("a3", "Elena Rodriguez", "Product Designer", "elena@example.com", ApplicationStatus::Pending),
            app("a4", "David Kim", "Backend Engineer", "dkim@example.com", ApplicationStatus::Pending),
        ]
    }

    #[test]
    fn test_empty_filter_returns_full_list_in_order() {
        let apps = fixture();
        let filtered = FilterState::default().filter(&apps);
        assert_eq!(filtered.len(), apps.len());
        let ids: Vec<&str> = filtered.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "a2", "a3", "a4"]);
    }

    #[test]
    fn test_search_matches_name_title_or_email() {
        let apps = fixture();

        let by_name = FilterState {
            search: "sarah".into(),
            status: StatusFilter::All,
        };
        assert_eq!(by_name.filter(&apps).len(), 1);

        let by_title = FilterState {
            search: "FRONTEND".into(),
            status: StatusFilter::All,
        };
        assert_eq!(by_title.filter(&apps).len(), 2);

        let by_email = FilterState {
            search: "dkim@".into(),
            status: StatusFilter::All,
        };
        assert_eq!(by_email.filter(&apps).len(), 1);
    }

    #[test]
    fn test_predicates_are_conjunctive() {
        let apps = fixture();
        let filter = FilterState {
            search: "engineer".into(),
            status: StatusFilter::Only(ApplicationStatus::Pending),
        };
        let filtered = filter.filter(&apps);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].id, "a4");
        assert!(filtered
            .iter()
            .all(|a| filter.matches(a) && a.status == ApplicationStatus::Pending));
    }

    #[test]
    fn test_no_match_yields_empty_not_error() {
        let apps = fixture();
        let filter = FilterState {
            search: "nobody by this name".into(),
            status: StatusFilter::All,
        };
        assert!(filter.filter(&apps).is_empty());
    }

    #[test]
    fn test_filtered_is_always_a_subset() {
        let apps = fixture();
        for status in ApplicationStatus::ALL {
            for search in ["", "e", "engineer", "zzz"] {
                let filter = FilterState {
                    search: search.into(),
                    status: StatusFilter::Only(status),
                };
                let filtered = filter.filter(&apps);
                assert!(filtered.len() <= apps.len());
                assert!(filtered.iter().all(|f| apps.iter().any(|a| a.id == f.id)));
            }
        }
    }

    #[test]
    fn test_status_filter_cycle_covers_every_status_and_wraps() {
        let mut filter = StatusFilter::All;
        let mut seen = Vec::new();
        for _ in 0..ApplicationStatus::ALL.len() {
            filter = filter.cycle();
            if let StatusFilter::Only(status) = filter {
                seen.push(status);
            }
        }
        assert_eq!(seen, ApplicationStatus::ALL.to_vec());
        assert_eq!(filter.cycle(), StatusFilter::All);
    }

    #[test]
    fn test_dashboard_stats() {
        let apps = fixture();
        let stats = DashboardStats::compute(&[], &apps);
        assert_eq!(stats.total_jobs, 0);
        assert_eq!(stats.total_applications, 4);
        assert_eq!(stats.pending_review, 2);
        assert_eq!(stats.interviews, 1);
    }
}
