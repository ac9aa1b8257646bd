//! The three question lifestyle check and its age banded scoring.

pub mod answers;
pub mod scoring;

pub use answers::{Answer, Answers, CompletedAnswers, Question};
pub use scoring::{band_for, score, Advice, ScoreBand, ScoreResult, ADVICE_THRESHOLD, SCORE_TABLE};

/// Reasons a questionnaire submission produces no score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum QuestionnaireError {
    #[error("Please answer all questions")]
    Incomplete,
    #[error("Unable to calculate score for the given age")]
    UnscorableAge,
}

/// Validate a submission and score it for the given age.
pub fn evaluate(age: i32, answers: &Answers) -> Result<ScoreResult, QuestionnaireError> {
    let completed = answers.complete()?;
    score(age, &completed).ok_or(QuestionnaireError::UnscorableAge)
}
