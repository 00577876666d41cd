//! Form schema definition.
//!
//! `FormSchema` groups the `FormField` rules of one domain record together
//! with its whole-record refinements (rules comparing two or more fields,
//! e.g. "end date after start date").
//!
//! Validation never short-circuits across fields: every field is checked and
//! every refinement runs, so the caller can highlight all problems at once.
//!
//! Typical usage:
//! ```ignore
//! let schema = FormSchema::new("服薬登録", vec![
//!     FormField::new("medicationName", "薬剤名", FormFieldKind::Text)
//!         .required("薬剤名を入力してください"),
//! ])
//! .refine(|record: &MedicationForm, _cx| { /* compare dates */ Ok(()) });
//!
//! let result = schema.validate(&record, &ValidationContext::today());
//! ```

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::debug;

use crate::field::{FieldError, FormField};

/// Message for values of the wrong primitive type.
pub const TYPE_MISMATCH: &str = "入力形式が正しくありません";

/// Bound for records that can be edited through a form.
///
/// Records must serialize to a JSON object holding every field (no
/// `skip_serializing_if`), so that single fields can be read and replaced by key.
pub trait FormRecord:
    Clone + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

impl<T> FormRecord for T where
    T: Clone + PartialEq + Default + Serialize + DeserializeOwned + Send + Sync + 'static
{
}

/// Inputs a validation run needs besides the record itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationContext {
    /// Reference date for "not in the future" rules.
    pub today: NaiveDate,
    pub type_mismatch: String,
}

impl ValidationContext {
    pub fn today() -> Self {
        Self::on(Local::now().date_naive())
    }

    pub fn on(today: NaiveDate) -> Self {
        Self {
            today,
            type_mismatch: TYPE_MISMATCH.to_string(),
        }
    }
}

impl Default for ValidationContext {
    fn default() -> Self {
        Self::today()
    }
}

/// Field errors produced by one validation run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationResult {
    errors: BTreeMap<String, String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn errors(&self) -> &BTreeMap<String, String> {
        &self.errors
    }

    pub fn into_errors(self) -> BTreeMap<String, String> {
        self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Insert unless the field already carries an error (first message wins).
    fn insert(&mut self, field: &str, message: String) {
        self.errors.entry(field.to_string()).or_insert(message);
    }

    /// A value that could not be applied; replaces any rule message.
    pub(crate) fn set_type_error(&mut self, field: &str, message: String) {
        self.errors.insert(field.to_string(), message);
    }
}

pub type Refinement<T> = Box<dyn Fn(&T, &ValidationContext) -> Result<(), FieldError> + Send + Sync>;

/// Declarative schema for one domain record.
///
/// Fields:
/// - `title`:       Display title of the form
/// - `description`: Optional descriptive text
/// - `fields`:      Ordered field rules
/// - `refinements`: Whole-record rules, run after the per-field pass
/// - `dual_submit`: The form offers "save draft" next to the final submit
/// - `save_failed`: Form specific message when the save handler declines
pub struct FormSchema<T> {
    pub title: String,
    pub description: Option<String>,
    pub fields: Vec<FormField>,
    refinements: Vec<Refinement<T>>,
    dual_submit: bool,
    save_failed: Option<String>,
}

impl<T: FormRecord> FormSchema<T> {
    pub fn new(title: impl Into<String>, fields: Vec<FormField>) -> Self {
        Self {
            title: title.into(),
            description: None,
            fields,
            refinements: Vec::new(),
            dual_submit: false,
            save_failed: None,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    /// Add a whole-record rule. The returned `FieldError` names the field
    /// the message is attached to.
    pub fn refine(
        mut self,
        f: impl Fn(&T, &ValidationContext) -> Result<(), FieldError> + Send + Sync + 'static,
    ) -> Self {
        self.refinements.push(Box::new(f));
        self
    }

    /// Offer both a draft and a final submission path.
    pub fn dual_submit(mut self) -> Self {
        self.dual_submit = true;
        self
    }

    pub fn save_failed_message(mut self, message: impl Into<String>) -> Self {
        self.save_failed = Some(message.into());
        self
    }

    pub fn is_dual_submit(&self) -> bool {
        self.dual_submit
    }

    pub fn save_failed(&self) -> Option<&str> {
        self.save_failed.as_deref()
    }

    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    pub fn refinement_count(&self) -> usize {
        self.refinements.len()
    }

    pub fn field_by_key(&self, key: &str) -> Option<&FormField> {
        self.fields.iter().find(|f| f.key == key)
    }

    /// Run every field rule, then every refinement.
    pub fn validate(&self, record: &T, cx: &ValidationContext) -> ValidationResult {
        let mut result = ValidationResult::default();

        let values = match serde_json::to_value(record) {
            Ok(Value::Object(map)) => map,
            _ => {
                for field in &self.fields {
                    result.insert(field.key, cx.type_mismatch.clone());
                }
                return result;
            }
        };

        for field in &self.fields {
            let value = values.get(field.key).unwrap_or(&Value::Null);
            if let Err(message) = field.check(value, cx) {
                result.insert(field.key, message);
            }
        }

        for refinement in &self.refinements {
            if let Err(err) = refinement(record, cx) {
                result.insert(err.field, err.message);
            }
        }

        debug!(
            "validated '{}': {} field error(s)",
            self.title,
            result.len()
        );
        result
    }
}
