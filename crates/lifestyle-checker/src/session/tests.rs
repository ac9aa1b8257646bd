use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::*;
use crate::patients::LoginField;
use crate::questionnaire::{Advice, Answer, QuestionnaireError};

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 18).expect("valid date")
}

#[derive(Default)]
struct FixedDirectory {
    reply: Option<Value>,
    failure: Option<String>,
    lookups: AtomicUsize,
}

impl FixedDirectory {
    fn returning(record: Value) -> Self {
        Self {
            reply: Some(record),
            ..Self::default()
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl PatientDirectory for FixedDirectory {
    async fn find(&self, _nhs_number: &str) -> Result<Value, String> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        match (&self.reply, &self.failure) {
            (Some(record), _) => Ok(record.clone()),
            (None, Some(message)) => Err(message.clone()),
            (None, None) => Err("Login failed".to_string()),
        }
    }
}

fn john_doe() -> Value {
    json!({ "nhsnumber": "111222333", "name": "Doe, John", "born": "14-01-2007" })
}

fn john_doe_form() -> LoginForm {
    LoginForm::new("111222333", "Doe", "2007-01-14")
}

async fn logged_in() -> ViewController {
    let mut controller = ViewController::new();
    let directory = FixedDirectory::returning(john_doe());
    controller
        .login(john_doe_form(), &directory, today())
        .await
        .expect("login accepted");
    controller
}

#[tokio::test]
async fn empty_form_stays_logged_out_without_lookup() {
    let mut controller = ViewController::new();
    let directory = FixedDirectory::returning(john_doe());

    controller
        .login(LoginForm::default(), &directory, today())
        .await
        .expect("validation is not a transition error");

    match controller.screen() {
        Screen::LoggedOut { errors, .. } => {
            assert!(errors.contains(LoginField::NhsNumber));
            assert!(errors.contains(LoginField::Surname));
            assert!(errors.contains(LoginField::DateOfBirth));
        }
        other => panic!("unexpected screen {other:?}"),
    }
    assert_eq!(directory.lookups(), 0);
}

#[tokio::test]
async fn matching_details_show_welcome_and_questionnaire() {
    let controller = logged_in().await;

    match controller.screen() {
        Screen::Authenticated {
            patient,
            questionnaire,
        } => {
            assert_eq!(patient.welcome_text(), "Welcome John Doe");
            assert_eq!(patient.age, Some(19));
            assert!(patient.can_answer_questionnaire());
            assert_eq!(patient.record, john_doe());
            assert!(questionnaire.error.is_none());
        }
        other => panic!("unexpected screen {other:?}"),
    }
}

#[tokio::test]
async fn wrong_surname_shows_not_found_and_can_go_back() {
    let mut controller = ViewController::new();
    let directory = FixedDirectory::returning(john_doe());

    controller
        .login(
            LoginForm::new("111222333", "Smith", "2007-01-14"),
            &directory,
            today(),
        )
        .await
        .expect("login accepted");

    assert_eq!(
        controller.screen(),
        &Screen::LoginError {
            message: "Your details could not be found".to_string()
        }
    );

    controller.back_to_login().expect("back to login");
    assert_eq!(controller.screen(), &Screen::default());
}

#[tokio::test]
async fn minor_is_not_eligible() {
    let mut controller = ViewController::new();
    let directory = FixedDirectory::returning(
        json!({ "nhsnumber": "111222333", "name": "Doe, John", "born": "14-01-2009" }),
    );

    controller
        .login(
            LoginForm::new("111222333", "Doe", "2009-01-14"),
            &directory,
            today(),
        )
        .await
        .expect("login accepted");

    assert_eq!(
        controller.screen(),
        &Screen::LoginError {
            message: "You are not eligible for this service".to_string()
        }
    );
}

#[tokio::test]
async fn upstream_failure_message_is_shown() {
    let mut controller = ViewController::new();
    let directory = FixedDirectory::failing("Invalid NHS number");

    controller
        .login(john_doe_form(), &directory, today())
        .await
        .expect("login accepted");

    assert_eq!(
        controller.screen(),
        &Screen::LoginError {
            message: "Invalid NHS number".to_string()
        }
    );
    assert_eq!(directory.lookups(), 1);
}

#[test]
fn begin_login_moves_to_verifying() {
    let mut controller = ViewController::new();
    let pending = controller
        .begin_login(john_doe_form())
        .expect("logged out accepts a form")
        .expect("form is complete");

    assert_eq!(pending.form, john_doe_form());
    assert_eq!(controller.screen().kind(), ScreenKind::Verifying);
}

#[test]
fn resubmission_supersedes_a_pending_attempt() {
    let mut controller = ViewController::new();
    let abandoned = controller
        .begin_login(LoginForm::new("111222333", "Smith", "2007-01-14"))
        .expect("logged out accepts a form")
        .expect("form is complete");
    let current = controller
        .begin_login(john_doe_form())
        .expect("verifying accepts a fresh form")
        .expect("form is complete");
    assert_ne!(abandoned.id, current.id);

    controller
        .complete_login(abandoned.id, Err("Login failed".to_string()), today())
        .expect("stale result is ignored");
    assert_eq!(controller.screen().kind(), ScreenKind::Verifying);

    controller
        .complete_login(current.id, Ok(john_doe()), today())
        .expect("current attempt completes");
    let patient = controller.screen().patient().expect("authenticated");
    assert_eq!(patient.welcome_text(), "Welcome John Doe");
}

#[test]
fn pending_attempt_can_be_abandoned() {
    let mut controller = ViewController::new();
    controller
        .begin_login(john_doe_form())
        .expect("logged out accepts a form");

    controller.back_to_login().expect("verifying can go back");
    assert_eq!(controller.screen(), &Screen::default());
}

#[tokio::test]
async fn login_error_accepts_a_new_submission() {
    let mut controller = ViewController::new();
    let directory = FixedDirectory::returning(john_doe());

    controller
        .login(
            LoginForm::new("111222333", "Smith", "2007-01-14"),
            &directory,
            today(),
        )
        .await
        .expect("login accepted");
    assert_eq!(controller.screen().kind(), ScreenKind::LoginError);

    controller
        .login(john_doe_form(), &directory, today())
        .await
        .expect("error screen accepts a form");
    assert_eq!(controller.screen().kind(), ScreenKind::Authenticated);
}

#[test]
fn complete_login_requires_pending_attempt() {
    let mut controller = ViewController::new();
    let err = controller
        .complete_login(1, Ok(john_doe()), today())
        .expect_err("nothing pending");
    assert_eq!(err.to_string(), "cannot complete a login from the logged out screen");
}

#[tokio::test]
async fn authenticated_patient_cannot_resubmit_login() {
    let mut controller = logged_in().await;
    let err = controller
        .begin_login(john_doe_form())
        .expect_err("already authenticated");
    assert_eq!(err.from, ScreenKind::Authenticated);
}

#[tokio::test]
async fn incomplete_questionnaire_keeps_answers_and_reports() {
    let mut controller = logged_in().await;
    let partial = Answers {
        q1: Some(Answer::Yes),
        q2: None,
        q3: None,
    };

    controller
        .submit_questionnaire(partial)
        .expect("questionnaire offered");

    match controller.screen() {
        Screen::Authenticated { questionnaire, .. } => {
            assert_eq!(questionnaire.error, Some(QuestionnaireError::Incomplete));
            assert_eq!(questionnaire.answers, partial);
        }
        other => panic!("unexpected screen {other:?}"),
    }
}

#[tokio::test]
async fn complete_questionnaire_shows_advice() {
    let mut controller = logged_in().await;

    controller
        .submit_questionnaire(Answers::all(Answer::Yes, Answer::Yes, Answer::No))
        .expect("questionnaire offered");

    match controller.screen() {
        Screen::QuestionnaireSubmitted { patient, result } => {
            // 19 falls in the 16-21 band: 1 + 2 + 1.
            assert_eq!(result.total, 4);
            assert_eq!(result.advice, Advice::SeeClinician);
            assert_eq!(patient.display_name, "John Doe");
        }
        other => panic!("unexpected screen {other:?}"),
    }

    let err = controller
        .submit_questionnaire(Answers::all(Answer::No, Answer::No, Answer::Yes))
        .expect_err("already submitted");
    assert_eq!(err.from, ScreenKind::QuestionnaireSubmitted);
}

#[tokio::test]
async fn logout_clears_everything() {
    let mut controller = logged_in().await;
    controller
        .submit_questionnaire(Answers::all(Answer::No, Answer::No, Answer::Yes))
        .expect("questionnaire offered");

    controller.logout().expect("logout from result screen");
    assert_eq!(controller.screen(), &Screen::default());
    assert!(controller.logout().is_err());
}

#[test]
fn questionnaire_is_unreachable_when_logged_out() {
    let mut controller = ViewController::new();
    let err = controller
        .submit_questionnaire(Answers::all(Answer::No, Answer::No, Answer::Yes))
        .expect_err("not authenticated");
    assert_eq!(err.from, ScreenKind::LoggedOut);
}

#[test]
fn match_without_derivable_age_hides_questionnaire() {
    let mut controller = ViewController::new();
    let form = LoginForm::new("111222333", "Doe", "2007-02-30");
    let attempt = controller
        .begin_login(form)
        .expect("accepted")
        .expect("form is complete");
    controller
        .complete_login(
            attempt.id,
            Ok(json!({ "nhsnumber": "111222333", "name": "Doe, John", "born": "30-02-2007" })),
            today(),
        )
        .expect("completes");

    let patient = controller.screen().patient().expect("authenticated");
    assert_eq!(patient.age, None);
    assert!(!patient.can_answer_questionnaire());
    assert!(controller
        .submit_questionnaire(Answers::all(Answer::No, Answer::No, Answer::Yes))
        .is_err());
}
