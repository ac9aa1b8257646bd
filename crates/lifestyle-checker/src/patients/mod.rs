//! Patient identity: the upstream record shape, the login form and the matching rules that
//! decide whether a login attempt is allowed through to the questionnaire.

pub mod form;
pub mod record;
pub mod verifier;

pub use form::{LoginField, LoginFieldErrors, LoginForm};
pub use record::PatientRecord;
pub use verifier::{
    age_on, compare, verify, LoginRejection, VerificationResult, VerifiedPatient, MINIMUM_AGE,
};

/// Keeps the last three characters of an NHS number for log lines.
pub fn mask_nhs_number(raw: &str) -> String {
    let digits: Vec<char> = raw.chars().filter(|c| !c.is_whitespace()).collect();
    if digits.len() <= 3 {
        return "*".repeat(digits.len());
    }
    let visible: String = digits[digits.len() - 3..].iter().collect();
    format!("{}{}", "*".repeat(digits.len() - 3), visible)
}
