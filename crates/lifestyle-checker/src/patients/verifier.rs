use chrono::{Datelike, NaiveDate};

use super::form::LoginForm;
use super::record::PatientRecord;

/// Youngest age allowed to use the service.
pub const MINIMUM_AGE: i32 = 18;

/// Field-by-field outcome of comparing a login form with an upstream record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationResult {
    pub nhs_matches: bool,
    pub surname_matches: bool,
    pub dob_matches: bool,
    pub derived_age: Option<i32>,
}

/// Why a login attempt that reached upstream was turned away.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LoginRejection {
    #[error("Your details could not be found")]
    DetailsNotFound,
    #[error("You are not eligible for this service")]
    NotEligible,
}

/// A patient who passed verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedPatient {
    pub record: PatientRecord,
    pub age: Option<i32>,
}

impl VerificationResult {
    pub fn all_fields_match(&self) -> bool {
        self.nhs_matches && self.surname_matches && self.dob_matches
    }

    /// A mismatch always wins over the age check.
    pub fn decision(&self) -> Result<Option<i32>, LoginRejection> {
        if !self.all_fields_match() {
            return Err(LoginRejection::DetailsNotFound);
        }
        match self.derived_age {
            Some(age) if age < MINIMUM_AGE => Err(LoginRejection::NotEligible),
            age => Ok(age),
        }
    }
}

fn normalise(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn compare(form: &LoginForm, record: &PatientRecord, today: NaiveDate) -> VerificationResult {
    VerificationResult {
        nhs_matches: normalise(&form.nhs_number) == normalise(&record.nhs_number),
        surname_matches: normalise(&form.surname) == normalise(&record.surname()),
        dob_matches: form.date_of_birth == record.born_iso(),
        derived_age: age_on(&form.date_of_birth, today),
    }
}

/// Match the form against the record and apply the eligibility policy.
pub fn verify(
    form: &LoginForm,
    record: PatientRecord,
    today: NaiveDate,
) -> Result<VerifiedPatient, LoginRejection> {
    let result = compare(form, &record, today);
    let age = result.decision()?;
    Ok(VerifiedPatient { record, age })
}

/// Whole years between a `YYYY-MM-DD` birth date and `today`, or `None` if the date does not
/// parse. The year difference drops by one until the birthday has come round.
pub fn age_on(date_of_birth: &str, today: NaiveDate) -> Option<i32> {
    let born = NaiveDate::parse_from_str(date_of_birth.trim(), "%Y-%m-%d").ok()?;
    let mut age = today.year() - born.year();
    if (today.month0(), today.day()) < (born.month0(), born.day()) {
        age -= 1;
    }
    Some(age)
}
