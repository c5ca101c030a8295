use crate::models::Job;

/// One input on the application form, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Name,
    Email,
    Phone,
    Resume,
    CoverLetter,
    Linkedin,
    Portfolio,
}

impl Field {
    pub const ALL: [Field; 7] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Resume,
        Field::CoverLetter,
        Field::Linkedin,
        Field::Portfolio,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Field::Name => "Full Name",
            Field::Email => "Email",
            Field::Phone => "Phone Number",
            Field::Resume => "Resume/CV",
            Field::CoverLetter => "Cover Letter",
            Field::Linkedin => "LinkedIn Profile",
            Field::Portfolio => "Portfolio/Website",
        }
    }

    pub fn placeholder(&self) -> &'static str {
        match self {
            Field::Name => "John Doe",
            Field::Email => "john@example.com",
            Field::Phone => "+1 (555) 123-4567",
            Field::Resume => "resume.pdf",
            Field::CoverLetter => "Tell us why you're a great fit for this role...",
            Field::Linkedin => "https://linkedin.com/in/johndoe",
            Field::Portfolio => "https://johndoe.com",
        }
    }

    pub fn required(&self) -> bool {
        !matches!(self, Field::Linkedin | Field::Portfolio)
    }
}

/// Draft application for one job. Field edits merge into the draft until
/// submission, after which the record is frozen; every mutator is a silent
/// no-op on a submitted form. The submission itself is simulated locally,
/// there is no backend to send it to.
pub struct ApplicationForm {
    job_id: String,
    job_title: String,
    values: [String; Field::ALL.len()],
    test_score: Option<u8>,
    submitted: bool,
}

impl ApplicationForm {
    pub fn new(job: &Job, test_score: Option<u8>) -> Self {
        Self {
            job_id: job.id.clone(),
            job_title: job.title.clone(),
            values: Default::default(),
            test_score,
            submitted: false,
        }
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn job_title(&self) -> &str {
        &self.job_title
    }

    pub fn test_score(&self) -> Option<u8> {
        self.test_score
    }

    /// Attaches a score from a test completed after the draft was opened.
    /// Like every other mutator, ignored once the form is submitted.
    pub fn set_test_score(&mut self, score: u8) {
        if self.submitted {
            return;
        }
        self.test_score = Some(score);
    }

    pub fn value(&self, field: Field) -> &str {
        &self.values[field as usize]
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        if self.submitted {
            return;
        }
        self.values[field as usize] = value.into();
    }

    pub fn push_char(&mut self, field: Field, c: char) {
        if self.submitted {
            return;
        }
        self.values[field as usize].push(c);
    }

    pub fn pop_char(&mut self, field: Field) {
        if self.submitted {
            return;
        }
        self.values[field as usize].pop();
    }

    /// Required fields that are still empty (whitespace does not count as
    /// filled). Inputs are otherwise opaque; there is no email or phone
    /// format validation at this layer.
    pub fn missing_required(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|f| f.required() && self.value(*f).trim().is_empty())
            .collect()
    }

    /// Freezes the draft when every required field is filled. Returns whether
    /// the form is now submitted; a second call is a no-op that stays true.
    pub fn submit(&mut self) -> bool {
        if self.submitted {
            return true;
        }
        if !self.missing_required().is_empty() {
            return false;
        }
        self.submitted = true;
        true
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobType;

    fn job() -> Job {
        Job {
            id: "1".into(),
            title: "Senior Frontend Engineer".into(),
            company: "TechVista Solutions".into(),
            location: "San Francisco, CA".into(),
            job_type: JobType::FullTime,
            salary: "$150,000 - $190,000".into(),
            description: "Build things.".into(),
            requirements: vec![],
            responsibilities: vec![],
            posted_date: "2024-01-15".into(),
            department: "Engineering".into(),
            experience: "Senior (5+ years)".into(),
        }
    }

    fn filled_form() -> ApplicationForm {
        let mut form = ApplicationForm::new(&job(), Some(85));
        form.set(Field::Name, "Jane Doe");
        form.set(Field::Email, "jane@example.com");
        form.set(Field::Phone, "+1 (555) 000-1234");
        form.set(Field::Resume, "jane.pdf");
        form.set(Field::CoverLetter, "I would be a great fit.");
        form
    }

    #[test]
    fn test_set_merges_single_field() {
        let mut form = ApplicationForm::new(&job(), None);
        form.set(Field::Name, "Jane");
        form.set(Field::Email, "jane@example.com");
        form.set(Field::Name, "Jane Doe");
        assert_eq!(form.value(Field::Name), "Jane Doe");
        assert_eq!(form.value(Field::Email), "jane@example.com");
        assert_eq!(form.value(Field::Phone), "");
    }

    #[test]
    fn test_char_editing() {
        let mut form = ApplicationForm::new(&job(), None);
        for c in "Janet".chars() {
            form.push_char(Field::Name, c);
        }
        form.pop_char(Field::Name);
        assert_eq!(form.value(Field::Name), "Jane");
    }

    #[test]
    fn test_submit_blocked_until_required_fields_filled() {
        let mut form = ApplicationForm::new(&job(), None);
        assert!(!form.submit());
        assert!(!form.is_submitted());
        assert_eq!(form.missing_required().len(), 5);

        form.set(Field::Name, "Jane Doe");
        form.set(Field::Email, "jane@example.com");
        assert!(!form.submit());
        assert_eq!(
            form.missing_required(),
            vec![Field::Phone, Field::Resume, Field::CoverLetter]
        );
    }

    #[test]
    fn test_whitespace_does_not_satisfy_required() {
        let mut form = filled_form();
        form.set(Field::CoverLetter, "   ");
        assert!(form.missing_required().contains(&Field::CoverLetter));
        assert!(!form.submit());
    }

    #[test]
    fn test_optional_fields_never_block_submission() {
        let mut form = filled_form();
        assert_eq!(form.value(Field::Linkedin), "");
        assert!(form.submit());
    }

    #[test]
    fn test_submitted_form_is_frozen() {
        let mut form = filled_form();
        assert!(form.submit());
        assert!(form.is_submitted());

        form.set(Field::Name, "Someone Else");
        form.push_char(Field::Email, 'x');
        form.pop_char(Field::Phone);
        assert_eq!(form.value(Field::Name), "Jane Doe");
        assert_eq!(form.value(Field::Email), "jane@example.com");
        assert_eq!(form.value(Field::Phone), "+1 (555) 000-1234");

        // resubmitting stays submitted
        assert!(form.submit());
    }

    #[test]
    fn test_carries_assessment_score() {
        let form = filled_form();
        assert_eq!(form.test_score(), Some(85));
        assert_eq!(form.job_id(), "1");
    }

    #[test]
    fn test_score_can_be_attached_to_open_draft_but_not_after_submit() {
        let mut form = ApplicationForm::new(&job(), None);
        form.set_test_score(40);
        assert_eq!(form.test_score(), Some(40));

        let mut submitted = filled_form();
        assert!(submitted.submit());
        submitted.set_test_score(10);
        assert_eq!(submitted.test_score(), Some(85));
    }
}
