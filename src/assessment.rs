use std::collections::HashMap;

use anyhow::{bail, Result};

use crate::models::TestQuestion;

/// Linear wizard over the skills test for one job: a cursor walks the
/// question list while answers accumulate in a map, and submission computes
/// the percentage score. Navigation away and back does not reset anything;
/// the state lives as long as the screen does.
pub struct Assessment {
    questions: Vec<TestQuestion>,
    current: usize,
    answers: HashMap<String, usize>, // question id -> selected option index
    complete: bool,
    score: u8,
}

impl Assessment {
    /// Fails on an empty question set. Callers show the "no test available"
    /// screen instead of entering the flow, which also guards the division
    /// in `submit`.
    pub fn new(questions: Vec<TestQuestion>) -> Result<Self> {
        if questions.is_empty() {
            bail!("No test available for this position");
        }
        Ok(Self {
            questions,
            current: 0,
            answers: HashMap::new(),
            complete: false,
            score: 0,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_question(&self) -> &TestQuestion {
        &self.questions[self.current]
    }

    /// Fraction of the test reached so far, for the progress gauge.
    pub fn progress(&self) -> f64 {
        (self.current + 1) as f64 / self.questions.len() as f64
    }

    pub fn answer_for(&self, question_id: &str) -> Option<usize> {
        self.answers.get(question_id).copied()
    }

    pub fn current_answered(&self) -> bool {
        self.answer_for(&self.current_question().id).is_some()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current == self.questions.len() - 1
    }

    /// Records or overwrites the answer for a question. Does not advance the
    /// cursor. Ignored once the test has been submitted.
    pub fn select_answer(&mut self, question_id: &str, option_index: usize) {
        if self.complete {
            return;
        }
        self.answers.insert(question_id.to_string(), option_index);
    }

    /// Moves to the next question; no-op at the last one. The UI additionally
    /// refuses to advance until the current question is answered.
    pub fn advance(&mut self) {
        if !self.complete && self.current < self.questions.len() - 1 {
            self.current += 1;
        }
    }

    /// Moves to the previous question; no-op at the first one.
    pub fn retreat(&mut self) {
        if !self.complete && self.current > 0 {
            self.current -= 1;
        }
    }

    /// Grades the test and marks it complete. A question only counts as
    /// correct when it defines a correct answer and the recorded selection
    /// matches it; questions without one are ungraded and never score.
    /// Idempotent after the first call.
    pub fn submit(&mut self) {
        if self.complete {
            return;
        }
        let correct = self
            .questions
            .iter()
            .filter(|q| {
                q.correct_answer
                    .is_some_and(|expected| self.answer_for(&q.id) == Some(expected))
            })
            .count();
        // questions is non-empty per the constructor
        self.score = ((correct as f64 / self.questions.len() as f64) * 100.0).round() as u8;
        self.complete = true;
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn score(&self) -> u8 {
        self.score
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: &str, correct: Option<usize>) -> TestQuestion {
        TestQuestion {
            id: id.to_string(),
            question: format!("Question {}", id),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: correct,
        }
    }

    #[test]
    fn test_empty_question_set_is_rejected() {
        assert!(Assessment::new(Vec::new()).is_err());
    }

    #[test]
    fn test_scoring_counts_only_graded_matches() {
        // Correct answers [0, 1, None, 2], candidate answers [0, 2, 1, 2]:
        // q1 and q4 match, q2 is wrong, q3 is ungraded -> 2/4 -> 50.
        let mut a = Assessment::new(vec![
            question("q1", Some(0)),
            question("q2", Some(1)),
            question("q3", None),
            question("q4", Some(2)),
        ])
        .unwrap();
        a.select_answer("q1", 0);
        a.select_answer("q2", 1);
        a.select_answer("q2", 2); // overwrite; only the last selection counts
        a.select_answer("q3", 1);
        a.select_answer("q4", 2);
        a.submit();
        assert!(a.is_complete());
        assert_eq!(a.score(), 50);
    }

    #[test]
    fn test_score_rounds_to_nearest() {
        // 2 of 3 correct -> 66.67 -> 67.
        let mut a = Assessment::new(vec![
            question("q1", Some(0)),
            question("q2", Some(0)),
            question("q3", Some(0)),
        ])
        .unwrap();
        a.select_answer("q1", 0);
        a.select_answer("q2", 0);
        a.select_answer("q3", 3);
        a.submit();
        assert_eq!(a.score(), 67);
    }

    #[test]
    fn test_unanswered_questions_score_zero() {
        let mut a = Assessment::new(vec![question("q1", Some(0))]).unwrap();
        a.submit();
        assert_eq!(a.score(), 0);
    }

    #[test]
    fn test_advance_at_last_is_noop() {
        let mut a =
            Assessment::new(vec![question("q1", Some(0)), question("q2", Some(0))]).unwrap();
        a.advance();
        assert_eq!(a.current_index(), 1);
        assert!(a.is_last());
        a.advance();
        assert_eq!(a.current_index(), 1);
    }

    #[test]
    fn test_retreat_at_first_is_noop() {
        let mut a =
            Assessment::new(vec![question("q1", Some(0)), question("q2", Some(0))]).unwrap();
        assert!(a.is_first());
        a.retreat();
        assert_eq!(a.current_index(), 0);
        a.advance();
        a.retreat();
        assert_eq!(a.current_index(), 0);
    }

    #[test]
    fn test_answers_survive_navigation() {
        let mut a =
            Assessment::new(vec![question("q1", Some(0)), question("q2", Some(1))]).unwrap();
        a.select_answer("q1", 0);
        a.advance();
        a.retreat();
        assert_eq!(a.answer_for("q1"), Some(0));
        assert!(a.current_answered());
    }

    #[test]
    fn test_no_mutation_after_submit() {
        let mut a =
            Assessment::new(vec![question("q1", Some(0)), question("q2", Some(1))]).unwrap();
        a.select_answer("q1", 0);
        a.select_answer("q2", 1);
        a.submit();
        assert_eq!(a.score(), 100);

        a.select_answer("q1", 3);
        a.advance();
        a.submit();
        assert_eq!(a.current_index(), 0);
        assert_eq!(a.score(), 100);
        assert_eq!(a.answer_for("q1"), Some(0));
    }

    #[test]
    fn test_score_stays_in_range() {
        for answered in 0..=3 {
            let mut a = Assessment::new(vec![
                question("q1", Some(0)),
                question("q2", Some(0)),
                question("q3", Some(0)),
            ])
            .unwrap();
            for i in 0..answered {
                a.select_answer(&format!("q{}", i + 1), 0);
            }
            a.submit();
            assert!(a.score() <= 100);
        }
    }
}
