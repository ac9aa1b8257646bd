use serde_json::Value;

/// A patient record as returned by the upstream record API.
///
/// Upstream sends `{"nhsnumber": "...", "name": "Surname, Firstname", "born": "DD-MM-YYYY"}`.
/// The raw document is kept alongside the extracted fields because an authenticated session
/// carries it as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct PatientRecord {
    pub nhs_number: String,
    pub full_name: Option<String>,
    pub born: String,
    raw: Value,
}

impl PatientRecord {
    pub fn from_json(raw: Value) -> Self {
        let nhs_number = raw.get("nhsnumber").map(coerce).unwrap_or_default();
        let full_name = raw
            .get("name")
            .and_then(Value::as_str)
            .map(str::to_string);
        let born = raw.get("born").map(coerce).unwrap_or_default();

        Self {
            nhs_number,
            full_name,
            born,
            raw,
        }
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Portion of the name before the first comma, trimmed. Empty when upstream sent no name.
    pub fn surname(&self) -> String {
        self.full_name
            .as_deref()
            .and_then(|name| name.split(',').next())
            .map(|surname| surname.trim().to_string())
            .unwrap_or_default()
    }

    fn first_name(&self) -> String {
        self.full_name
            .as_deref()
            .and_then(|name| name.split_once(','))
            .map(|(_, rest)| rest.trim().to_string())
            .unwrap_or_default()
    }

    /// `DD-MM-YYYY` reordered to `YYYY-MM-DD`. Only the segments move; no calendar check.
    pub fn born_iso(&self) -> String {
        let mut parts: Vec<&str> = self.born.split('-').collect();
        parts.reverse();
        parts.join("-")
    }

    /// "Firstname Surname", each part capitalised, for the welcome banner.
    pub fn display_name(&self) -> String {
        [self.first_name(), self.surname()]
            .iter()
            .map(|part| capitalise(part))
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn coerce(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn capitalise(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
