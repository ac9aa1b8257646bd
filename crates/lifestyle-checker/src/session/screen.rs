use std::fmt;

use serde_json::Value;

use crate::patients::{LoginFieldErrors, LoginForm, VerifiedPatient};
use crate::questionnaire::{Answers, QuestionnaireError, ScoreResult};

#[derive(Debug, Clone, PartialEq)]
pub enum Screen {
    LoggedOut {
        form: LoginForm,
        errors: LoginFieldErrors,
    },
    Verifying {
        form: LoginForm,
        attempt: u64,
    },
    LoginError {
        message: String,
    },
    Authenticated {
        patient: AuthenticatedPatient,
        questionnaire: QuestionnaireState,
    },
    QuestionnaireSubmitted {
        patient: AuthenticatedPatient,
        result: ScoreResult,
    },
}

impl Default for Screen {
    fn default() -> Self {
        Screen::LoggedOut {
            form: LoginForm::default(),
            errors: LoginFieldErrors::default(),
        }
    }
}

impl Screen {
    pub fn kind(&self) -> ScreenKind {
        match self {
            Screen::LoggedOut { .. } => ScreenKind::LoggedOut,
            Screen::Verifying { .. } => ScreenKind::Verifying,
            Screen::LoginError { .. } => ScreenKind::LoginError,
            Screen::Authenticated { .. } => ScreenKind::Authenticated,
            Screen::QuestionnaireSubmitted { .. } => ScreenKind::QuestionnaireSubmitted,
        }
    }

    pub fn patient(&self) -> Option<&AuthenticatedPatient> {
        match self {
            Screen::Authenticated { patient, .. }
            | Screen::QuestionnaireSubmitted { patient, .. } => Some(patient),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    LoggedOut,
    Verifying,
    LoginError,
    Authenticated,
    QuestionnaireSubmitted,
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ScreenKind::LoggedOut => "logged out",
            ScreenKind::Verifying => "verifying",
            ScreenKind::LoginError => "login error",
            ScreenKind::Authenticated => "authenticated",
            ScreenKind::QuestionnaireSubmitted => "questionnaire submitted",
        };
        f.write_str(label)
    }
}

/// Session data for a verified patient.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedPatient {
    pub display_name: String,
    pub age: Option<i32>,
    pub record: Value,
}

impl AuthenticatedPatient {
    pub fn welcome_text(&self) -> String {
        format!("Welcome {}", self.display_name)
    }

    /// The questionnaire is only offered when an age could be derived.
    pub fn can_answer_questionnaire(&self) -> bool {
        self.age.is_some()
    }
}

impl From<VerifiedPatient> for AuthenticatedPatient {
    fn from(patient: VerifiedPatient) -> Self {
        Self {
            display_name: patient.record.display_name(),
            age: patient.age,
            record: patient.record.raw().clone(),
        }
    }
}

/// Answers in progress and the message from the last rejected submission.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionnaireState {
    pub answers: Answers,
    pub error: Option<QuestionnaireError>,
}
