//! PersonaRecord — the validated, structured persona produced by the extractor.
//!
//! Decoding is strict: every rendered field must be present with the right
//! type and every personality trait must be an integer in [0, 100]. Anything
//! else is a `SchemaError`, which the extractor reports as `InvalidModelOutput`.
//! A record that exists is therefore always safe to lay out.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Upper bound of every personality score.
pub const MAX_TRAIT_SCORE: u8 = 100;

// ────────────────────────────────────────────────────────────────────────────
// Scalars
// ────────────────────────────────────────────────────────────────────────────

/// A demographic value the model may return as either a string or a number
/// (`"age": 29` and `"age": "late 20s"` are both accepted and persisted as given).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// Display text, or `None` when the value is blank.
    pub fn display(&self) -> Option<String> {
        match self {
            Scalar::Text(s) if s.trim().is_empty() => None,
            Scalar::Text(s) => Some(s.clone()),
            Scalar::Number(n) => Some(n.to_string()),
        }
    }
}

/// Accepts `null` but not a missing key.
fn required_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

/// Marks a key as present. Paired with `default`, an absent key stays `None`
/// and is omitted again on serialization.
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ────────────────────────────────────────────────────────────────────────────
// Personality
// ────────────────────────────────────────────────────────────────────────────

/// The fixed Big Five vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trait {
    Openness,
    Conscientiousness,
    Extraversion,
    Agreeableness,
    Neuroticism,
}

impl Trait {
    /// Canonical render order.
    pub const ALL: [Trait; 5] = [
        Trait::Openness,
        Trait::Conscientiousness,
        Trait::Extraversion,
        Trait::Agreeableness,
        Trait::Neuroticism,
    ];

    /// JSON key.
    pub fn key(&self) -> &'static str {
        match self {
            Trait::Openness => "openness",
            Trait::Conscientiousness => "conscientiousness",
            Trait::Extraversion => "extraversion",
            Trait::Agreeableness => "agreeableness",
            Trait::Neuroticism => "neuroticism",
        }
    }

    /// Capitalized label drawn next to the bar.
    pub fn label(&self) -> &'static str {
        match self {
            Trait::Openness => "Openness",
            Trait::Conscientiousness => "Conscientiousness",
            Trait::Extraversion => "Extraversion",
            Trait::Agreeableness => "Agreeableness",
            Trait::Neuroticism => "Neuroticism",
        }
    }
}

impl fmt::Display for Trait {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Integer scores in [0, 100]. Extra keys in the source object are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Personality {
    pub openness: u8,
    pub conscientiousness: u8,
    pub extraversion: u8,
    pub agreeableness: u8,
    pub neuroticism: u8,
}

impl Personality {
    pub fn score(&self, t: Trait) -> u8 {
        match t {
            Trait::Openness => self.openness,
            Trait::Conscientiousness => self.conscientiousness,
            Trait::Extraversion => self.extraversion,
            Trait::Agreeableness => self.agreeableness,
            Trait::Neuroticism => self.neuroticism,
        }
    }

    /// Traits with their scores, always in `Trait::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (Trait, u8)> + '_ {
        Trait::ALL.iter().map(move |&t| (t, self.score(t)))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Record
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonaRecord {
    #[serde(deserialize_with = "required_nullable")]
    pub name: Option<Scalar>,
    #[serde(deserialize_with = "required_nullable")]
    pub age: Option<Scalar>,
    #[serde(deserialize_with = "required_nullable")]
    pub location: Option<Scalar>,
    #[serde(rename = "profile_quote", deserialize_with = "required_nullable")]
    pub quote: Option<Scalar>,
    pub goals: Vec<String>,
    pub frustrations: Vec<String>,
    pub interests: Vec<String>,
    pub personality: Personality,
    pub technology: Vec<String>,
    /// Reserved for a future portrait; never rendered.
    /// Outer `None`: key absent. `Some(None)`: explicit `null`.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub image_hint: Option<Option<String>>,
    /// List-field name → supporting source URLs. Informational only.
    #[serde(
        default,
        deserialize_with = "present",
        skip_serializing_if = "Option::is_none"
    )]
    pub citations: Option<BTreeMap<String, Vec<String>>>,
}

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    Syntax(serde_json::Error),

    #[error("expected a JSON object at the top level, found {0}")]
    NotAnObject(&'static str),

    #[error("response does not match the persona schema: {0}")]
    Shape(serde_json::Error),

    #[error("personality trait {name} is {value}, expected 0-{MAX_TRAIT_SCORE}")]
    TraitOutOfRange { name: Trait, value: u8 },
}

impl PersonaRecord {
    /// Strict decode of an already-parsed JSON value.
    pub fn from_value(value: Value) -> Result<Self, SchemaError> {
        if !value.is_object() {
            return Err(SchemaError::NotAnObject(json_kind(&value)));
        }
        let record: PersonaRecord = serde_json::from_value(value).map_err(SchemaError::Shape)?;
        record.validate()?;
        Ok(record)
    }

    /// Strict decode of JSON text.
    pub fn from_json(text: &str) -> Result<Self, SchemaError> {
        let value: Value = serde_json::from_str(text).map_err(SchemaError::Syntax)?;
        Self::from_value(value)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        match self
            .personality
            .iter()
            .find(|(_, value)| *value > MAX_TRAIT_SCORE)
        {
            Some((name, value)) => Err(SchemaError::TraitOutOfRange { name, value }),
            None => Ok(()),
        }
    }

    /// The four list sections in render order, with their display titles.
    pub fn list_sections(&self) -> [(&'static str, &[String]); 4] {
        [
            ("Goals", self.goals.as_slice()),
            ("Frustrations", self.frustrations.as_slice()),
            ("Interests", self.interests.as_slice()),
            ("Technology", self.technology.as_slice()),
        ]
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
