use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub usize);
    };
}

id_newtype!(NodeId);
id_newtype!(TimerId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Email,
    Tel,
    Checkbox,
    TextArea,
    Select,
}

impl FieldKind {
    /// Derives the kind of a form control from its tag name and `type` attribute.
    /// Returns `None` for elements that are not form controls.
    pub fn from_control(tag: &str, type_attr: Option<&str>) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "textarea" => Some(Self::TextArea),
            "select" => Some(Self::Select),
            "input" => Some(
                match type_attr
                    .map(str::to_ascii_lowercase)
                    .as_deref()
                    .unwrap_or("text")
                {
                    "email" => Self::Email,
                    "tel" => Self::Tel,
                    "checkbox" => Self::Checkbox,
                    _ => Self::Text,
                },
            ),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum Validity {
    Valid,
    Invalid(String),
}

impl Validity {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Valid => None,
            Self::Invalid(message) => Some(message),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubmissionState {
    #[default]
    Idle,
    Validating,
    Rejected,
    Submitting,
}

/// Vertical extent of an element relative to the top of the document, in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub top: f64,
    pub bottom: f64,
}

impl Rect {
    pub fn new(top: f64, height: f64) -> Self {
        Self {
            top,
            bottom: top + height,
        }
    }
}
