use serde::Deserialize;
use std::fmt;

/// What the patient typed on the login screen. The date of birth is the `YYYY-MM-DD` value of
/// a date input and is only checked for presence here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LoginForm {
    #[serde(default, rename = "nhsnumber")]
    pub nhs_number: String,
    #[serde(default)]
    pub surname: String,
    #[serde(default, rename = "dob")]
    pub date_of_birth: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    NhsNumber,
    Surname,
    DateOfBirth,
}

impl LoginField {
    pub fn label(self) -> &'static str {
        match self {
            LoginField::NhsNumber => "NHS Number",
            LoginField::Surname => "Surname",
            LoginField::DateOfBirth => "Date of birth",
        }
    }

    pub fn input_name(self) -> &'static str {
        match self {
            LoginField::NhsNumber => "nhsnumber",
            LoginField::Surname => "surname",
            LoginField::DateOfBirth => "dob",
        }
    }
}

impl fmt::Display for LoginField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inline errors for missing login fields, in form order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginFieldErrors {
    missing: Vec<LoginField>,
}

impl LoginFieldErrors {
    pub fn is_empty(&self) -> bool {
        self.missing.is_empty()
    }

    pub fn contains(&self, field: LoginField) -> bool {
        self.missing.contains(&field)
    }

    pub fn message_for(&self, field: LoginField) -> Option<String> {
        self.contains(field)
            .then(|| format!("{} is required", field.label()))
    }

    pub fn messages(&self) -> Vec<String> {
        self.missing
            .iter()
            .map(|field| format!("{} is required", field.label()))
            .collect()
    }
}

impl LoginForm {
    pub fn new(
        nhs_number: impl Into<String>,
        surname: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> Self {
        Self {
            nhs_number: nhs_number.into(),
            surname: surname.into(),
            date_of_birth: date_of_birth.into(),
        }
    }

    /// All three fields are required; nothing beyond presence is checked.
    pub fn validate(&self) -> LoginFieldErrors {
        let mut missing = Vec::new();
        if self.nhs_number.is_empty() {
            missing.push(LoginField::NhsNumber);
        }
        if self.surname.is_empty() {
            missing.push(LoginField::Surname);
        }
        if self.date_of_birth.is_empty() {
            missing.push(LoginField::DateOfBirth);
        }
        LoginFieldErrors { missing }
    }

    pub fn value(&self, field: LoginField) -> &str {
        match field {
            LoginField::NhsNumber => &self.nhs_number,
            LoginField::Surname => &self.surname,
            LoginField::DateOfBirth => &self.date_of_birth,
        }
    }
}
