//! Typed document model for the two document kinds, plus the request
//! envelopes shared by the HTTP and CLI entry points.

mod cover_letter;
mod cv;
mod sample;

pub use cover_letter::{Applicant, CoverLetterData, Recipient};
pub use cv::{Contact, CVData, Education, Experience, Project, SkillGroup};

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// The request could not be turned into a document model.
#[derive(Error, Debug)]
pub enum InvalidPayloadError {
    #[error("Missing data")]
    MissingData,
    #[error("Invalid data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("Invalid data: '{0}' must not be empty")]
    MissingField(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub label: String,
    pub url: String,
}

/// `Some(trimmed)` when the optional field holds visible text.
pub fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

pub(crate) fn require(value: &str, field: &'static str) -> Result<(), InvalidPayloadError> {
    if value.trim().is_empty() {
        Err(InvalidPayloadError::MissingField(field))
    } else {
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StringOrNumber {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl From<StringOrNumber> for String {
    fn from(value: StringOrNumber) -> Self {
        match value {
            StringOrNumber::Text(text) => text,
            StringOrNumber::Integer(n) => n.to_string(),
            StringOrNumber::Float(n) => n.to_string(),
        }
    }
}

/// Years arrive as `"2020"` or `2020`; both become text.
pub(crate) fn year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    StringOrNumber::deserialize(deserializer).map(String::from)
}

pub(crate) fn optional_year<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Option::<StringOrNumber>::deserialize(deserializer).map(|v| v.map(String::from))
}

/// Body of `POST /cv` and input of `dossier cv`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CvRequest {
    pub data: CVData,
    pub portrait_url: Option<String>,
    pub creation_date: Option<String>,
}

/// Body of `POST /cover-letter` and input of `dossier cover-letter`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverLetterRequest {
    pub data: CoverLetterData,
    pub signature_url: Option<String>,
}

/// Splits an envelope into its `data` payload and the object holding the options.
fn envelope(value: &Value) -> Result<(&Value, &serde_json::Map<String, Value>), InvalidPayloadError> {
    let object = value.as_object().ok_or(InvalidPayloadError::MissingData)?;
    match object.get("data") {
        Some(data) if !data.is_null() => Ok((data, object)),
        _ => Err(InvalidPayloadError::MissingData),
    }
}

fn option_string(object: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    object
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Treats a bare data object (no `data` key) as the payload itself.
fn wrap_bare(value: Value) -> Value {
    match &value {
        Value::Object(object) if !object.contains_key("data") => {
            let mut wrapped = serde_json::Map::new();
            wrapped.insert("data".to_string(), value);
            Value::Object(wrapped)
        }
        _ => value,
    }
}

impl CvRequest {
    /// Parses a `{data, portraitUrl?, creationDate?}` envelope and validates it.
    pub fn from_envelope(value: &Value) -> Result<Self, InvalidPayloadError> {
        let (data, object) = envelope(value)?;
        let data = CVData::deserialize(data)?;
        data.validate()?;
        Ok(Self {
            data,
            portrait_url: option_string(object, "portraitUrl"),
            creation_date: option_string(object, "creationDate"),
        })
    }

    /// Accepts either an envelope or a bare `CVData` object.
    pub fn from_value(value: Value) -> Result<Self, InvalidPayloadError> {
        Self::from_envelope(&wrap_bare(value))
    }

    pub fn sample() -> Self {
        Self {
            data: CVData::sample(),
            portrait_url: None,
            creation_date: None,
        }
    }
}

impl CoverLetterRequest {
    pub fn from_envelope(value: &Value) -> Result<Self, InvalidPayloadError> {
        let (data, object) = envelope(value)?;
        let data = CoverLetterData::deserialize(data)?;
        data.validate()?;
        Ok(Self {
            data,
            signature_url: option_string(object, "signatureUrl"),
        })
    }

    pub fn from_value(value: Value) -> Result<Self, InvalidPayloadError> {
        Self::from_envelope(&wrap_bare(value))
    }

    pub fn sample() -> Self {
        Self {
            data: CoverLetterData::sample(),
            signature_url: None,
        }
    }
}
