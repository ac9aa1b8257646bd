use serde::{Deserialize, Serialize};

use super::QuestionnaireError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Answer {
    Yes,
    No,
}

impl Answer {
    pub fn label(self) -> &'static str {
        match self {
            Answer::Yes => "Yes",
            Answer::No => "No",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Question {
    Drinking,
    Smoking,
    Exercise,
}

impl Question {
    pub const ALL: [Question; 3] = [Question::Drinking, Question::Smoking, Question::Exercise];

    pub fn field_name(self) -> &'static str {
        match self {
            Question::Drinking => "q1",
            Question::Smoking => "q2",
            Question::Exercise => "q3",
        }
    }

    pub fn prompt(self) -> &'static str {
        match self {
            Question::Drinking => "Q1. Do you drink on more than 2 days a week?",
            Question::Smoking => "Q2. Do you smoke?",
            Question::Exercise => "Q3. Do you exercise more than 1 hour per week?",
        }
    }

    /// The answer that adds the band weight to the score. Exercise is inverted.
    pub fn risk_answer(self) -> Answer {
        match self {
            Question::Drinking | Question::Smoking => Answer::Yes,
            Question::Exercise => Answer::No,
        }
    }
}

/// Questionnaire state as submitted; any question may still be unset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct Answers {
    #[serde(default)]
    pub q1: Option<Answer>,
    #[serde(default)]
    pub q2: Option<Answer>,
    #[serde(default)]
    pub q3: Option<Answer>,
}

/// All three answers present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompletedAnswers {
    pub q1: Answer,
    pub q2: Answer,
    pub q3: Answer,
}

impl Answers {
    pub fn all(q1: Answer, q2: Answer, q3: Answer) -> Self {
        Self {
            q1: Some(q1),
            q2: Some(q2),
            q3: Some(q3),
        }
    }

    pub fn get(&self, question: Question) -> Option<Answer> {
        match question {
            Question::Drinking => self.q1,
            Question::Smoking => self.q2,
            Question::Exercise => self.q3,
        }
    }

    pub fn complete(&self) -> Result<CompletedAnswers, QuestionnaireError> {
        match (self.q1, self.q2, self.q3) {
            (Some(q1), Some(q2), Some(q3)) => Ok(CompletedAnswers { q1, q2, q3 }),
            _ => Err(QuestionnaireError::Incomplete),
        }
    }
}

impl CompletedAnswers {
    pub fn get(&self, question: Question) -> Answer {
        match question {
            Question::Drinking => self.q1,
            Question::Smoking => self.q2,
            Question::Exercise => self.q3,
        }
    }
}
