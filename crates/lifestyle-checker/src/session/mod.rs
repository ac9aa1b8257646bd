//! Per-visitor screen state for the checker.
//!
//! A visitor is always on exactly one [`Screen`]. [`ViewController`] owns the current screen
//! and only moves between screens through its transition methods, so combinations such as
//! "authenticated and showing a login error" cannot be represented.

pub mod directory;
pub mod screen;

pub use directory::PatientDirectory;
pub use screen::{AuthenticatedPatient, QuestionnaireState, Screen, ScreenKind};

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde_json::Value;
use tracing::debug;

use crate::patients::{verify, LoginForm, PatientRecord};
use crate::questionnaire::{self, Answers};

/// An action was attempted from a screen that does not offer it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot {action} from the {from} screen")]
pub struct TransitionError {
    pub from: ScreenKind,
    pub action: &'static str,
}

/// A validated login form waiting on its upstream lookup. Only the most recent attempt may
/// complete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginAttempt {
    pub id: u64,
    pub form: LoginForm,
}

static ATTEMPT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_attempt_id() -> u64 {
    ATTEMPT_SEQUENCE.fetch_add(1, Ordering::Relaxed)
}

#[derive(Debug, Clone, Default)]
pub struct ViewController {
    screen: Screen,
}

impl ViewController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    fn transition(&mut self, next: Screen) {
        debug!(from = %self.screen.kind(), to = %next.kind(), "screen transition");
        self.screen = next;
    }

    fn reject(&self, action: &'static str) -> TransitionError {
        TransitionError {
            from: self.screen.kind(),
            action,
        }
    }

    /// Validate the login form. Returns the attempt to look up when every field is present and
    /// the screen has moved to `Verifying`; otherwise shows the login form with inline errors.
    ///
    /// Accepted while logged out, after a login error, and while an earlier attempt is still
    /// verifying. A resubmission supersedes the pending attempt.
    pub fn begin_login(
        &mut self,
        form: LoginForm,
    ) -> Result<Option<LoginAttempt>, TransitionError> {
        if !matches!(
            self.screen,
            Screen::LoggedOut { .. } | Screen::LoginError { .. } | Screen::Verifying { .. }
        ) {
            return Err(self.reject("submit the login form"));
        }

        let errors = form.validate();
        if !errors.is_empty() {
            self.transition(Screen::LoggedOut { form, errors });
            return Ok(None);
        }

        let attempt = LoginAttempt {
            id: next_attempt_id(),
            form,
        };
        self.transition(Screen::Verifying {
            form: attempt.form.clone(),
            attempt: attempt.id,
        });
        Ok(Some(attempt))
    }

    /// Apply the upstream answer for an attempt started by [`begin_login`](Self::begin_login).
    /// Results for superseded attempts are dropped.
    pub fn complete_login(
        &mut self,
        attempt: u64,
        lookup: Result<Value, String>,
        today: NaiveDate,
    ) -> Result<(), TransitionError> {
        let form = match &self.screen {
            Screen::Verifying { form, attempt: pending } if *pending == attempt => form.clone(),
            Screen::Verifying { .. } => {
                debug!(attempt, "discarding result of superseded login attempt");
                return Ok(());
            }
            _ => return Err(self.reject("complete a login")),
        };

        let next = match lookup {
            Err(message) => Screen::LoginError { message },
            Ok(raw) => match verify(&form, PatientRecord::from_json(raw), today) {
                Ok(patient) => Screen::Authenticated {
                    patient: AuthenticatedPatient::from(patient),
                    questionnaire: QuestionnaireState::default(),
                },
                Err(rejection) => Screen::LoginError {
                    message: rejection.to_string(),
                },
            },
        };

        self.transition(next);
        Ok(())
    }

    /// Validate, look up and verify in one go. Exactly one lookup per valid submission.
    pub async fn login<D>(
        &mut self,
        form: LoginForm,
        directory: &D,
        today: NaiveDate,
    ) -> Result<(), TransitionError>
    where
        D: PatientDirectory,
    {
        let Some(attempt) = self.begin_login(form)? else {
            return Ok(());
        };
        let lookup = directory.find(&attempt.form.nhs_number).await;
        self.complete_login(attempt.id, lookup, today)
    }

    /// Leave an error, or abandon a pending lookup, for an empty login form.
    pub fn back_to_login(&mut self) -> Result<(), TransitionError> {
        if !matches!(
            self.screen,
            Screen::LoginError { .. } | Screen::Verifying { .. }
        ) {
            return Err(self.reject("go back to login"));
        }
        self.transition(Screen::default());
        Ok(())
    }

    /// Drop everything and return to an empty login form.
    pub fn logout(&mut self) -> Result<(), TransitionError> {
        if self.screen.patient().is_none() {
            return Err(self.reject("log out"));
        }
        self.transition(Screen::default());
        Ok(())
    }

    pub fn submit_questionnaire(&mut self, answers: Answers) -> Result<(), TransitionError> {
        let (patient, age) = match &self.screen {
            Screen::Authenticated { patient, .. } => match patient.age {
                Some(age) => (patient.clone(), age),
                None => return Err(self.reject("answer the questionnaire")),
            },
            _ => return Err(self.reject("answer the questionnaire")),
        };

        match questionnaire::evaluate(age, &answers) {
            Ok(result) => self.transition(Screen::QuestionnaireSubmitted { patient, result }),
            Err(err) => {
                self.screen = Screen::Authenticated {
                    patient,
                    questionnaire: QuestionnaireState {
                        answers,
                        error: Some(err),
                    },
                };
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
