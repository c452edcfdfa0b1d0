//! Field rules, evaluated in precedence order. Pure functions of the
//! field's identity and current value.

use std::sync::LazyLock;

use regex::Regex;
use shared::domain::{FieldKind, Validity};

pub const REQUIRED_MESSAGE: &str = "Dieses Feld ist erforderlich.";
pub const EMAIL_MESSAGE: &str = "Bitte geben Sie eine gültige E-Mail-Adresse ein.";
pub const PHONE_MESSAGE: &str = "Bitte geben Sie eine gültige Telefonnummer ein.";
pub const NAME_MESSAGE: &str = "Bitte verwenden Sie nur Buchstaben.";
pub const MESSAGE_TOO_SHORT: &str = "Die Nachricht muss mindestens 10 Zeichen enthalten.";
pub const CONSENT_MESSAGE: &str = "Sie müssen der Datenschutzerklärung zustimmen.";

pub const MESSAGE_MIN_CHARS: usize = 10;

const NAME_FIELD_IDS: [&str; 2] = ["firstName", "lastName"];
const MESSAGE_FIELD_ID: &str = "message";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("invalid email pattern"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9\s+\-()]{10,20}$").expect("invalid phone pattern"));
static NAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\s'\-]{2,50}$").expect("invalid name pattern"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Checked(bool),
}

/// A snapshot of everything the rules look at.
#[derive(Debug, Clone, Copy)]
pub struct FieldInput<'a> {
    pub id: Option<&'a str>,
    pub kind: FieldKind,
    pub required: bool,
    pub value: FieldValue<'a>,
}

pub fn evaluate_field(input: &FieldInput<'_>) -> Validity {
    let text = match input.value {
        FieldValue::Text(raw) => raw.trim(),
        FieldValue::Checked(checked) => {
            return if input.required && !checked {
                Validity::invalid(REQUIRED_MESSAGE)
            } else {
                Validity::Valid
            };
        }
    };

    if text.is_empty() {
        return if input.required {
            Validity::invalid(REQUIRED_MESSAGE)
        } else {
            Validity::Valid
        };
    }

    match input.kind {
        FieldKind::Email if !EMAIL_PATTERN.is_match(text) => {
            return Validity::invalid(EMAIL_MESSAGE)
        }
        FieldKind::Tel if !PHONE_PATTERN.is_match(text) => {
            return Validity::invalid(PHONE_MESSAGE)
        }
        _ => {}
    }

    match input.id {
        Some(id) if NAME_FIELD_IDS.contains(&id) && !NAME_PATTERN.is_match(text) => {
            Validity::invalid(NAME_MESSAGE)
        }
        Some(MESSAGE_FIELD_ID) if text.chars().count() < MESSAGE_MIN_CHARS => {
            Validity::invalid(MESSAGE_TOO_SHORT)
        }
        _ => Validity::Valid,
    }
}

pub fn evaluate_consent(checked: bool) -> Validity {
    if checked {
        Validity::Valid
    } else {
        Validity::invalid(CONSENT_MESSAGE)
    }
}
