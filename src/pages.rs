//! Server-rendered markup for each screen.

use lifestyle_checker::patients::{LoginField, LoginFieldErrors, LoginForm};
use lifestyle_checker::questionnaire::{Answer, Question, ScoreResult};
use lifestyle_checker::session::{AuthenticatedPatient, QuestionnaireState, Screen};
use std::fmt::Write;

const TITLE: &str = "T2 Lifestyle Checker";

pub(crate) fn render(screen: &Screen) -> String {
    let (body, refresh) = match screen {
        Screen::LoggedOut { form, errors } => (login_form(form, errors), false),
        Screen::Verifying { .. } => (
            r#"<p class="loading" role="status">Checking your details...</p><form method="post" action="/login/back"><button type="submit">Cancel</button></form>"#.to_string(),
            true,
        ),
        Screen::LoginError { message } => (login_error(message), false),
        Screen::Authenticated {
            patient,
            questionnaire,
        } => {
            let mut body = welcome(patient);
            if patient.can_answer_questionnaire() {
                body.push_str(&questionnaire_form(questionnaire));
            }
            (body, false)
        }
        Screen::QuestionnaireSubmitted { patient, result } => {
            let mut body = welcome(patient);
            body.push_str(&score_result(result));
            (body, false)
        }
    };

    layout(&body, refresh)
}

fn layout(body: &str, refresh: bool) -> String {
    let refresh = if refresh {
        r#"<meta http-equiv="refresh" content="1">"#
    } else {
        ""
    };
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
{refresh}<title>{TITLE}</title>
</head>
<body>
<main>
<h1>{TITLE}</h1>
{body}
</main>
</body>
</html>"#
    )
}

fn login_form(form: &LoginForm, errors: &LoginFieldErrors) -> String {
    let mut html = String::from(r#"<form method="post" action="/login" novalidate>"#);
    for field in [
        LoginField::NhsNumber,
        LoginField::Surname,
        LoginField::DateOfBirth,
    ] {
        let input_type = if field == LoginField::DateOfBirth {
            "date"
        } else {
            "text"
        };
        let name = field.input_name();
        let _ = write!(
            html,
            r#"<div class="form-row"><label for="{name}">{label}</label><input id="{name}" name="{name}" type="{input_type}" value="{value}" required>"#,
            label = field.label(),
            value = escape(form.value(field)),
        );
        if let Some(message) = errors.message_for(field) {
            let _ = write!(html, r#"<small class="error">{message}</small>"#);
        }
        html.push_str("</div>");
    }
    html.push_str(r#"<div class="form-actions"><button type="submit">Submit</button></div></form>"#);
    html
}

fn login_error(message: &str) -> String {
    format!(
        r#"<p class="error" role="alert">{}</p><form method="post" action="/login/back"><button type="submit">Back to login</button></form>"#,
        escape(message)
    )
}

fn welcome(patient: &AuthenticatedPatient) -> String {
    format!(
        r#"<p class="welcome">{}</p><form method="post" action="/logout"><button type="submit">Logout</button></form>"#,
        escape(&patient.welcome_text())
    )
}

fn questionnaire_form(state: &QuestionnaireState) -> String {
    let mut html = String::from(
        r#"<h2>Health Questionnaire</h2><form method="post" action="/questionnaire" novalidate>"#,
    );
    for question in Question::ALL {
        let name = question.field_name();
        let _ = write!(html, "<fieldset><legend>{}</legend>", question.prompt());
        for answer in [Answer::Yes, Answer::No] {
            let checked = if state.answers.get(question) == Some(answer) {
                " checked"
            } else {
                ""
            };
            let _ = write!(
                html,
                r#"<label><input type="radio" name="{name}" value="{value}"{checked}> {value}</label>"#,
                value = answer.label(),
            );
        }
        html.push_str("</fieldset>");
    }
    if let Some(error) = &state.error {
        let _ = write!(html, r#"<p class="error" role="alert">{error}</p>"#);
    }
    html.push_str(r#"<button type="submit">Submit</button></form>"#);
    html
}

fn score_result(result: &ScoreResult) -> String {
    format!(
        r#"<div class="result"><h3>Thanks for completing the questionnaire</h3><p>{}</p></div>"#,
        result.advice.message()
    )
}

fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifestyle_checker::questionnaire::{Advice, Answers, QuestionnaireError};
    use serde_json::json;

    fn patient(age: Option<i32>) -> AuthenticatedPatient {
        AuthenticatedPatient {
            display_name: "John Doe".to_string(),
            age,
            record: json!({}),
        }
    }

    #[test]
    fn logged_out_lists_missing_fields() {
        let form = LoginForm::new("", "Doe", "");
        let html = render(&Screen::LoggedOut {
            errors: form.validate(),
            form,
        });
        assert!(html.contains("NHS Number is required"));
        assert!(!html.contains("Surname is required"));
        assert!(html.contains("Date of birth is required"));
        assert!(html.contains(r#"value="Doe""#));
    }

    #[test]
    fn user_text_is_escaped() {
        let html = render(&Screen::LoginError {
            message: "<script>alert(1)</script>".to_string(),
        });
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("Back to login"));
    }

    #[test]
    fn authenticated_shows_welcome_and_questions() {
        let html = render(&Screen::Authenticated {
            patient: patient(Some(30)),
            questionnaire: QuestionnaireState {
                answers: Answers {
                    q1: Some(Answer::Yes),
                    q2: None,
                    q3: None,
                },
                error: Some(QuestionnaireError::Incomplete),
            },
        });
        assert!(html.contains("Welcome John Doe"));
        assert!(html.contains("Do you smoke?"));
        assert!(html.contains(r#"name="q1" value="Yes" checked"#));
        assert!(html.contains("Please answer all questions"));
    }

    #[test]
    fn questionnaire_hidden_without_age() {
        let html = render(&Screen::Authenticated {
            patient: patient(None),
            questionnaire: QuestionnaireState::default(),
        });
        assert!(html.contains("Welcome John Doe"));
        assert!(!html.contains("Health Questionnaire"));
    }

    #[test]
    fn submitted_shows_advice() {
        let html = render(&Screen::QuestionnaireSubmitted {
            patient: patient(Some(30)),
            result: ScoreResult {
                total: 0,
                advice: Advice::LowRisk,
            },
        });
        assert!(html.contains("Keep up the good work!"));
        assert!(!html.contains("Health Questionnaire"));
    }

    #[test]
    fn verifying_refreshes() {
        let html = render(&Screen::Verifying {
            form: LoginForm::default(),
            attempt: 1,
        });
        assert!(html.contains("Checking your details"));
        assert!(html.contains(r#"http-equiv="refresh""#));
        assert!(html.contains(r#"action="/login/back""#));
    }
}
