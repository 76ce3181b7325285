//! The quiz attempt state machine. An attempt moves `loading ->
//! in_progress -> submitted`; loading resolves the question set, and once
//! submitted every input is frozen. Submission is guarded by the `submitted`
//! flag so the explicit submit, the countdown hitting zero, and a
//! visibility-loss report can race in any order and still persist exactly
//! one result.

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

use crate::model::question::Question;
use crate::model::quiz_result::QuizResult;
use crate::model::student::Student;

/// Countdown budget for one attempt, in seconds (60 minutes).
pub const QUIZ_DURATION_SECS: i64 = 3600;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Manual,
    TimerExpired,
    VisibilityLost,
}

#[derive(Debug, PartialEq, Eq)]
pub enum AttemptError {
    AlreadySubmitted,
    OptionOutOfRange,
}

impl std::fmt::Display for AttemptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttemptError::AlreadySubmitted => write!(f, "Quiz already submitted."),
            AttemptError::OptionOutOfRange => write!(f, "Invalid option selected."),
        }
    }
}

#[derive(Debug)]
pub struct Attempt {
    student: Student,
    questions: Vec<Question>,
    answers: Vec<Option<usize>>,
    current: usize,
    deadline: DateTime<Utc>,
    submitted: bool,
    result_line: Option<String>,
}

/// Snapshot of an attempt for the client.
#[derive(Debug, Serialize)]
pub struct AttemptView {
    pub enroll: String,
    pub question_number: usize,
    pub total_questions: usize,
    pub question: String,
    pub options: Vec<String>,
    pub selected: Option<usize>,
    pub answers: Vec<Option<usize>>,
    pub remaining_secs: i64,
    pub submitted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<String>,
}

impl Attempt {
    pub fn start(student: Student, questions: Vec<Question>, now: DateTime<Utc>) -> Self {
        let answers = vec![None; questions.len()];
        Attempt {
            student,
            questions,
            answers,
            current: 0,
            deadline: now + TimeDelta::seconds(QUIZ_DURATION_SECS),
            submitted: false,
            result_line: None,
        }
    }

    pub fn student(&self) -> &Student {
        &self.student
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn remaining_secs(&self, now: DateTime<Utc>) -> i64 {
        if self.submitted {
            return 0;
        }
        (self.deadline - now).num_seconds().max(0)
    }

    /// True while the deadline has passed but no submission has landed yet.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        !self.submitted && now >= self.deadline
    }

    /// Sets or replaces the answer for the current question only.
    pub fn select_answer(&mut self, option: usize) -> Result<(), AttemptError> {
        if self.submitted {
            return Err(AttemptError::AlreadySubmitted);
        }
        if option >= self.questions[self.current].options.len() {
            return Err(AttemptError::OptionOutOfRange);
        }
        self.answers[self.current] = Some(option);
        Ok(())
    }

    /// Moves back one question. Never discards recorded answers.
    pub fn previous(&mut self) -> Result<(), AttemptError> {
        if self.submitted {
            return Err(AttemptError::AlreadySubmitted);
        }
        self.current = self.current.saturating_sub(1);
        Ok(())
    }

    /// Moves forward one question, clamped to the last.
    pub fn next(&mut self) -> Result<(), AttemptError> {
        if self.submitted {
            return Err(AttemptError::AlreadySubmitted);
        }
        self.current = (self.current + 1).min(self.questions.len().saturating_sub(1));
        Ok(())
    }

    /// Count of questions whose recorded answer matches the correct index.
    /// Unanswered questions never match.
    pub fn score(&self) -> u32 {
        self.questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| **a == Some(q.answer))
            .count() as u32
    }

    /// Transitions to `submitted` and produces the result record. Returns
    /// `None` when the attempt was already submitted; callers only persist a
    /// result they actually received, so repeated triggers are no-ops.
    pub fn submit(&mut self, trigger: SubmitTrigger, now: DateTime<Utc>) -> Option<QuizResult> {
        if self.submitted {
            return None;
        }
        self.submitted = true;

        let score = self.score();
        let total = self.questions.len() as u32;
        let percentage = if total == 0 {
            0.0
        } else {
            f64::from(score) / f64::from(total) * 100.0
        };
        let percentage = format!("{percentage:.2}");
        self.result_line = Some(format!("Score: {score}/{total} ({percentage}%)"));

        match trigger {
            SubmitTrigger::Manual => {
                tracing::info!("Student {} submitted the quiz", self.student.enroll)
            }
            SubmitTrigger::TimerExpired => {
                tracing::info!("Time expired for student {}", self.student.enroll)
            }
            SubmitTrigger::VisibilityLost => tracing::warn!(
                "Student {} switched tabs; attempt force-submitted",
                self.student.enroll
            ),
        }

        Some(QuizResult {
            name: self.student.name.clone(),
            enroll: self.student.enroll.clone(),
            score,
            total,
            percentage,
            timestamp: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        })
    }

    /// Clears the submitted flag after a failed persist. The attempt stays
    /// answerable and a later trigger produces the result record again, so
    /// a store hiccup never loses a submission for good.
    pub fn revert_submission(&mut self) {
        self.submitted = false;
        self.result_line = None;
    }

    pub fn view(&self, now: DateTime<Utc>) -> AttemptView {
        let q = &self.questions[self.current];
        AttemptView {
            enroll: self.student.enroll.clone(),
            question_number: self.current + 1,
            total_questions: self.questions.len(),
            question: q.question.clone(),
            options: q.options.clone(),
            selected: self.answers[self.current],
            answers: self.answers.clone(),
            remaining_secs: self.remaining_secs(now),
            submitted: self.submitted,
            result: self.result_line.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(correct: usize) -> Question {
        Question {
            question: format!("pick option {correct}"),
            options: vec!["0".into(), "1".into(), "2".into(), "3".into()],
            answer: correct,
            marks: None,
        }
    }

    fn student() -> Student {
        Student {
            name: "Asha".into(),
            enroll: "EN001".into(),
            email: "230102103005.asha@upluniversity.ac.in".into(),
        }
    }

    fn attempt_with(correct: &[usize]) -> (Attempt, DateTime<Utc>) {
        let now = Utc::now();
        let questions = correct.iter().map(|c| question(*c)).collect();
        (Attempt::start(student(), questions, now), now)
    }

    #[test]
    fn starts_with_all_questions_unanswered() {
        let (attempt, now) = attempt_with(&[1, 0, 0]);
        let view = attempt.view(now);
        assert_eq!(view.answers, vec![None, None, None]);
        assert_eq!(view.question_number, 1);
        assert_eq!(view.remaining_secs, QUIZ_DURATION_SECS);
        assert!(!view.submitted);
    }

    #[test]
    fn scoring_counts_exact_matches_only() {
        let (mut attempt, now) = attempt_with(&[1, 0, 0]);
        attempt.select_answer(1).unwrap();
        attempt.next().unwrap();
        attempt.select_answer(0).unwrap();
        attempt.next().unwrap();
        attempt.select_answer(2).unwrap();

        let result = attempt.submit(SubmitTrigger::Manual, now).unwrap();
        assert_eq!(result.score, 2);
        assert_eq!(result.total, 3);
        assert_eq!(result.percentage, "66.67");
    }

    #[test]
    fn unanswered_questions_never_score() {
        let (mut attempt, now) = attempt_with(&[0, 0]);
        attempt.select_answer(0).unwrap();
        let result = attempt.submit(SubmitTrigger::Manual, now).unwrap();
        assert_eq!(result.score, 1);
    }

    #[test]
    fn second_submit_is_a_no_op() {
        let (mut attempt, now) = attempt_with(&[1, 0, 0]);
        let first = attempt.submit(SubmitTrigger::Manual, now);
        assert!(first.is_some());
        // Timer firing after an explicit submit must not produce a second record.
        assert!(attempt.submit(SubmitTrigger::TimerExpired, now).is_none());
        assert!(attempt.submit(SubmitTrigger::VisibilityLost, now).is_none());
    }

    #[test]
    fn reverted_submission_can_submit_again() {
        let (mut attempt, now) = attempt_with(&[1, 0, 0]);
        attempt.select_answer(1).unwrap();
        assert!(attempt.submit(SubmitTrigger::Manual, now).is_some());

        attempt.revert_submission();
        assert!(!attempt.is_submitted());
        let result = attempt.submit(SubmitTrigger::TimerExpired, now).unwrap();
        assert_eq!(result.score, 1);
    }

    #[test]
    fn navigation_preserves_answers() {
        let (mut attempt, now) = attempt_with(&[1, 0, 0]);
        attempt.select_answer(3).unwrap();
        attempt.next().unwrap();
        attempt.previous().unwrap();
        assert_eq!(attempt.view(now).selected, Some(3));
    }

    #[test]
    fn navigation_clamps_to_bounds() {
        let (mut attempt, now) = attempt_with(&[1, 0]);
        attempt.previous().unwrap();
        assert_eq!(attempt.view(now).question_number, 1);
        attempt.next().unwrap();
        attempt.next().unwrap();
        assert_eq!(attempt.view(now).question_number, 2);
    }

    #[test]
    fn answer_replaces_previous_selection() {
        let (mut attempt, now) = attempt_with(&[2]);
        attempt.select_answer(0).unwrap();
        attempt.select_answer(2).unwrap();
        assert_eq!(attempt.view(now).selected, Some(2));
        let result = attempt.submit(SubmitTrigger::Manual, now).unwrap();
        assert_eq!(result.score, 1);
    }

    #[test]
    fn out_of_range_option_rejected() {
        let (mut attempt, _) = attempt_with(&[0]);
        assert_eq!(
            attempt.select_answer(4).unwrap_err(),
            AttemptError::OptionOutOfRange
        );
    }

    #[test]
    fn inputs_frozen_after_submission() {
        let (mut attempt, now) = attempt_with(&[1, 0]);
        attempt.submit(SubmitTrigger::VisibilityLost, now);
        assert_eq!(
            attempt.select_answer(0).unwrap_err(),
            AttemptError::AlreadySubmitted
        );
        assert_eq!(attempt.next().unwrap_err(), AttemptError::AlreadySubmitted);
        assert_eq!(
            attempt.previous().unwrap_err(),
            AttemptError::AlreadySubmitted
        );
    }

    #[test]
    fn visibility_loss_scores_recorded_answers() {
        let (mut attempt, now) = attempt_with(&[1, 0, 0]);
        attempt.select_answer(1).unwrap();
        let result = attempt.submit(SubmitTrigger::VisibilityLost, now).unwrap();
        assert_eq!(result.score, 1);
        assert_eq!(result.percentage, "33.33");
    }

    #[test]
    fn deadline_drives_expiry() {
        let (attempt, now) = attempt_with(&[0]);
        assert!(!attempt.is_expired(now));
        let later = now + TimeDelta::seconds(QUIZ_DURATION_SECS);
        assert!(attempt.is_expired(later));
        assert_eq!(attempt.remaining_secs(later), 0);
    }

    #[test]
    fn remaining_time_counts_down() {
        let (attempt, now) = attempt_with(&[0]);
        let later = now + TimeDelta::seconds(100);
        assert_eq!(attempt.remaining_secs(later), QUIZ_DURATION_SECS - 100);
    }
}
