use serde::Serialize;

use super::answers::{CompletedAnswers, Question};

/// Inclusive age range and the weight each question's risk answer contributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreBand {
    pub min_age: i32,
    pub max_age: i32,
    pub weights: [u32; 3],
}

impl ScoreBand {
    const fn new(min_age: i32, max_age: i32, weights: [u32; 3]) -> Self {
        Self {
            min_age,
            max_age,
            weights,
        }
    }

    pub fn contains(&self, age: i32) -> bool {
        (self.min_age..=self.max_age).contains(&age)
    }

    pub fn weight(&self, question: Question) -> u32 {
        match question {
            Question::Drinking => self.weights[0],
            Question::Smoking => self.weights[1],
            Question::Exercise => self.weights[2],
        }
    }
}

/// Disjoint, contiguous bands covering ages 16 to 1200.
pub const SCORE_TABLE: [ScoreBand; 4] = [
    ScoreBand::new(16, 21, [1, 2, 1]),
    ScoreBand::new(22, 40, [2, 2, 3]),
    ScoreBand::new(41, 65, [3, 2, 2]),
    ScoreBand::new(66, 1200, [3, 3, 1]),
];

/// Totals above this warrant a call to the surgery.
pub const ADVICE_THRESHOLD: u32 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Advice {
    LowRisk,
    SeeClinician,
}

impl Advice {
    pub fn for_total(total: u32) -> Self {
        if total <= ADVICE_THRESHOLD {
            Advice::LowRisk
        } else {
            Advice::SeeClinician
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Advice::LowRisk => "Thank you for answering our questions, we don't need to see you at this time. Keep up the good work!",
            Advice::SeeClinician => "We think there are some simple things you could do to improve your quality of life, please phone to book an appointment.",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScoreResult {
    pub total: u32,
    pub advice: Advice,
}

pub fn band_for(age: i32) -> Option<&'static ScoreBand> {
    SCORE_TABLE.iter().find(|band| band.contains(age))
}

/// Sum the band weight for every question answered the risky way.
pub fn score(age: i32, answers: &CompletedAnswers) -> Option<ScoreResult> {
    let band = band_for(age)?;
    let total = Question::ALL
        .iter()
        .filter(|question| answers.get(**question) == question.risk_answer())
        .map(|question| band.weight(*question))
        .sum();

    Some(ScoreResult {
        total,
        advice: Advice::for_total(total),
    })
}
