//! Field rules for recipe submissions.
//!
//! Each rule checks one named field on its own and records a message on
//! failure instead of returning early, so a caller sees every problem with a
//! submission in a single response.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const NOT_A_WHOLE_NUMBER: &str = "must be a non-negative whole number";
pub const NO_INGREDIENTS: &str = "at least one ingredient required";
pub const NOT_INGREDIENT_LINES: &str = "must be text or a list of ingredient lines";

/// Field name to the messages recorded against it.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, thiserror::Error, utoipa::ToSchema)]
#[error("{}", summarize(.0))]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<String>>);

fn summarize(fields: &BTreeMap<String, Vec<String>>) -> String {
    fields
        .iter()
        .map(|(field, messages)| format!("{field}: {}", messages.join(", ")))
        .collect::<Vec<_>>()
        .join("; ")
}

impl ValidationErrors {
    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_string())
            .or_default()
            .push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// A numeric field as sent by a form: either a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(f64),
    Text(String),
}

/// Ingredients as a newline-separated block, or as one entry per line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IngredientsInput {
    Block(String),
    Lines(Vec<IngredientLine>),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IngredientLine {
    Text(String),
    Item { ingredient: String },
}

impl IngredientLine {
    fn as_str(&self) -> &str {
        match self {
            IngredientLine::Text(text) => text,
            IngredientLine::Item { ingredient } => ingredient,
        }
    }
}

/// Trimmed length in characters is at least `min`.
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Coerce a number or numeric string into a non-negative `i32`.
///
/// Blank strings are `Ok(None)`: an empty form input means "not provided".
pub fn coerce_whole_number(input: &NumericInput) -> Result<Option<i32>, &'static str> {
    let value = match input {
        NumericInput::Number(n) => *n,
        NumericInput::Text(text) => {
            let text = text.trim();
            if text.is_empty() {
                return Ok(None);
            }
            text.parse::<f64>().map_err(|_| NOT_A_WHOLE_NUMBER)?
        }
    };

    if !value.is_finite() || value < 0.0 || value.fract() != 0.0 || value > f64::from(i32::MAX)
    {
        return Err(NOT_A_WHOLE_NUMBER);
    }
    Ok(Some(value as i32))
}

/// Split ingredients into trimmed, non-blank lines, keeping their order.
pub fn ingredient_lines(input: &IngredientsInput) -> Vec<String> {
    let keep = |line: &str| {
        let line = line.trim();
        (!line.is_empty()).then(|| line.to_string())
    };
    match input {
        IngredientsInput::Block(block) => block.lines().filter_map(keep).collect(),
        IngredientsInput::Lines(lines) => {
            lines.iter().filter_map(|line| keep(line.as_str())).collect()
        }
    }
}

/// Collects violations while each field is checked independently.
///
/// Fields arrive as raw JSON so that a value of the wrong type is one more
/// recorded violation instead of a body that fails to decode. Every method
/// returns `Some` when the field passed and `None` when a message was
/// recorded, so a `None` anywhere implies `into_errors` is non-empty.
#[derive(Debug, Default)]
pub struct Validator {
    errors: ValidationErrors,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Required text of at least `min_chars` characters, returned trimmed.
    pub fn text(
        &mut self,
        field: &str,
        value: Option<Value>,
        min_chars: usize,
    ) -> Option<String> {
        let value = match value {
            None => {
                self.errors.add(field, format!("{field} is required"));
                return None;
            }
            Some(Value::String(value)) => value,
            Some(_) => {
                self.errors.add(field, format!("{field} must be a string"));
                return None;
            }
        };
        if !has_min_chars(&value, min_chars) {
            self.errors.add(field, format!("{field} too short"));
            return None;
        }
        Some(value.trim().to_string())
    }

    /// Optional text; when present it must have at least `min_chars` characters.
    pub fn optional_text(
        &mut self,
        field: &str,
        value: Option<Value>,
        min_chars: usize,
    ) -> Option<Option<String>> {
        match value {
            None => Some(None),
            Some(value) => self.text(field, Some(value), min_chars).map(Some),
        }
    }

    /// Optional string kept exactly as sent, with no length rule.
    pub fn optional_string(
        &mut self,
        field: &str,
        value: Option<Value>,
    ) -> Option<Option<String>> {
        match value {
            None => Some(None),
            Some(Value::String(value)) => Some(Some(value)),
            Some(_) => {
                self.errors.add(field, format!("{field} must be a string"));
                None
            }
        }
    }

    /// Optional whole number (see [`coerce_whole_number`]).
    pub fn optional_whole_number(
        &mut self,
        field: &str,
        value: Option<Value>,
    ) -> Option<Option<i32>> {
        let Some(value) = value else {
            return Some(None);
        };
        let coerced = serde_json::from_value::<NumericInput>(value)
            .map_err(|_| NOT_A_WHOLE_NUMBER)
            .and_then(|input| coerce_whole_number(&input));
        match coerced {
            Ok(number) => Some(number),
            Err(message) => {
                self.errors.add(field, message);
                None
            }
        }
    }

    pub fn whole_number(&mut self, field: &str, value: Option<Value>) -> Option<i32> {
        match self.optional_whole_number(field, value)? {
            Some(number) => Some(number),
            None => {
                self.errors.add(field, format!("{field} is required"));
                None
            }
        }
    }

    /// At least one non-blank ingredient line.
    pub fn ingredients(&mut self, field: &str, value: Option<Value>) -> Option<Vec<String>> {
        let lines = match value.map(serde_json::from_value::<IngredientsInput>) {
            None => Vec::new(),
            Some(Ok(input)) => ingredient_lines(&input),
            Some(Err(_)) => {
                self.errors.add(field, NOT_INGREDIENT_LINES);
                return None;
            }
        };
        if lines.is_empty() {
            self.errors.add(field, NO_INGREDIENTS);
            return None;
        }
        Some(lines)
    }

    pub fn into_errors(self) -> ValidationErrors {
        self.errors
    }
}
