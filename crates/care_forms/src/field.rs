//! Form field kinds & per-field rules.
//!
//! This module defines the declarative pieces of a schema:
//! - `FormFieldKind`: the primitive shape a field value must have
//! - `FormField`: key, label and the rule set (required, lengths, items, pattern, options, validator)
//! - `FieldError`: a message attached to one field
//!
//! Responsibilities here are pure / data-centric. Whole-record rules live in
//! `schema.rs`; mutation lives in `session.rs` and `controller.rs`.
//!
//! Usage:
//! ```ignore
//! use care_forms::field::{FormField, FormFieldKind};
//!
//! let field = FormField::new("phone1", "電話番号1", FormFieldKind::Text)
//!     .required("電話番号を入力してください")
//!     .pattern(PHONE.clone(), "電話番号は半角数字とハイフンで入力してください");
//! ```

use std::str::FromStr;

use regex::Regex;
use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::dates;
use crate::schema::ValidationContext;

/// Message used when a value is not one of the offered options.
pub const INVALID_OPTION: &str = "選択肢から選択してください";

/// The primitive shape of a field value.
///
/// Notes:
/// - Date / DateTime / Time are strings as delivered by the date inputs
///   (`2025-01-25`, `2025-01-25T14:00`, `14:00`)
/// - Number accepts JSON numbers and numeric strings
/// - Select values must be one of `options`
/// - List holds multiple string entries (e.g. staff ids); the validator runs per item
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldKind {
    Text,
    Date,
    DateTime,
    Time,
    Number,
    Bool,
    Select { options: Vec<String> },
    List,
}

impl FormFieldKind {
    pub fn select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FormFieldKind::Select {
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// A validation message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

type Validator = Box<dyn Fn(&str) -> Result<(), String> + Send + Sync>;

/// Declarative description of a form field.
///
/// Rules are checked in a fixed order and the first failing rule wins:
/// kind → required → min items → min/max length → pattern → options → validator.
/// Blank values (null, whitespace-only text, empty list) only ever fail
/// the `required` rule.
pub struct FormField {
    pub key: &'static str,
    pub label: String,
    pub kind: FormFieldKind,
    pub help: Option<String>,
    required: Option<String>,
    min_length: Option<(usize, String)>,
    max_length: Option<(usize, String)>,
    min_items: Option<(usize, String)>,
    pattern: Option<(Regex, String)>,
    validator: Option<Validator>,
}

impl FormField {
    /// Create a new optional field without any rules.
    pub fn new(key: &'static str, label: impl Into<String>, kind: FormFieldKind) -> Self {
        Self {
            key,
            label: label.into(),
            kind,
            help: None,
            required: None,
            min_length: None,
            max_length: None,
            min_items: None,
            pattern: None,
            validator: None,
        }
    }

    /// Attach optional help / hint text.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Mark the field as required; `message` is shown when it is blank.
    pub fn required(mut self, message: impl Into<String>) -> Self {
        self.required = Some(message.into());
        self
    }

    /// Minimum length in characters (not bytes).
    pub fn min_length(mut self, min: usize, message: impl Into<String>) -> Self {
        self.min_length = Some((min, message.into()));
        self
    }

    /// Maximum length in characters (not bytes).
    pub fn max_length(mut self, max: usize, message: impl Into<String>) -> Self {
        self.max_length = Some((max, message.into()));
        self
    }

    /// Minimum number of entries of a list field.
    pub fn min_items(mut self, min: usize, message: impl Into<String>) -> Self {
        self.min_items = Some((min, message.into()));
        self
    }

    pub fn pattern(mut self, pattern: Regex, message: impl Into<String>) -> Self {
        self.pattern = Some((pattern, message.into()));
        self
    }

    /// Attach a validator closure (for lists it runs on every item).
    pub fn validator(
        mut self,
        f: impl Fn(&str) -> Result<(), String> + Send + Sync + 'static,
    ) -> Self {
        self.validator = Some(Box::new(f));
        self
    }

    pub fn is_required(&self) -> bool {
        self.required.is_some()
    }

    pub fn is_list(&self) -> bool {
        matches!(self.kind, FormFieldKind::List)
    }

    /// Check one value against this field's rules.
    pub fn check(&self, value: &Value, cx: &ValidationContext) -> Result<(), String> {
        if is_blank(value) {
            return match &self.required {
                Some(message) => Err(message.clone()),
                None => Ok(()),
            };
        }

        let mismatch = || cx.type_mismatch.clone();
        match &self.kind {
            FormFieldKind::Bool => value.as_bool().map(|_| ()).ok_or_else(mismatch),
            FormFieldKind::List => {
                let items = value.as_array().ok_or_else(mismatch)?;
                if let Some((min, message)) = &self.min_items {
                    if items.len() < *min {
                        return Err(message.clone());
                    }
                }
                for item in items {
                    let item = item.as_str().ok_or_else(mismatch)?;
                    self.check_text(item)?;
                }
                Ok(())
            }
            FormFieldKind::Text => {
                let text = value.as_str().ok_or_else(mismatch)?;
                self.check_text(text)
            }
            FormFieldKind::Date => {
                let text = value.as_str().ok_or_else(mismatch)?;
                dates::parse_date(text).ok_or_else(mismatch)?;
                self.check_text(text)
            }
            FormFieldKind::DateTime => {
                let text = value.as_str().ok_or_else(mismatch)?;
                dates::parse_date_time(text).ok_or_else(mismatch)?;
                self.check_text(text)
            }
            FormFieldKind::Time => {
                let text = value.as_str().ok_or_else(mismatch)?;
                dates::parse_time(text).ok_or_else(mismatch)?;
                self.check_text(text)
            }
            FormFieldKind::Number => match value {
                Value::Number(n) => self.check_text(&n.to_string()),
                Value::String(s) if s.trim().parse::<f64>().is_ok() => self.check_text(s.trim()),
                _ => Err(mismatch()),
            },
            FormFieldKind::Select { options } => {
                let text = value.as_str().ok_or_else(mismatch)?;
                if !options.iter().any(|o| o == text) {
                    return Err(INVALID_OPTION.to_string());
                }
                self.check_text(text)
            }
        }
    }

    fn check_text(&self, text: &str) -> Result<(), String> {
        let len = text.chars().count();
        if let Some((min, message)) = &self.min_length {
            if len < *min {
                return Err(message.clone());
            }
        }
        if let Some((max, message)) = &self.max_length {
            if len > *max {
                return Err(message.clone());
            }
        }
        if let Some((pattern, message)) = &self.pattern {
            if !pattern.is_match(text) {
                return Err(message.clone());
            }
        }
        if let Some(validator) = &self.validator {
            validator(text)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormField")
            .field("key", &self.key)
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("required", &self.required.is_some())
            .finish_non_exhaustive()
    }
}

/// Null, whitespace-only strings and empty lists count as "not filled in".
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrText<N> {
    Number(N),
    Text(String),
}

/// Serde helper for `Number` fields stored as `Option<N>`: accepts a JSON
/// number or numeric text; blank text and `null` become `None`.
pub fn optional_number<'de, D, N>(deserializer: D) -> Result<Option<N>, D::Error>
where
    D: Deserializer<'de>,
    N: Deserialize<'de> + FromStr,
{
    match Option::<NumberOrText<N>>::deserialize(deserializer)? {
        None => Ok(None),
        Some(NumberOrText::Number(n)) => Ok(Some(n)),
        Some(NumberOrText::Text(text)) if text.trim().is_empty() => Ok(None),
        Some(NumberOrText::Text(text)) => text
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("not a number: `{text}`"))),
    }
}
