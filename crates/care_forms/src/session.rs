//! Form runtime (mutable) state.
//!
//! `FormSession` holds the *current editing state* of one form instance:
//!   * the record being edited (`values`) and its baseline (`initial_values`)
//!   * per-field validation errors and the general (submission) error
//!   * the submitting flags and the unsaved-changes marker
//!
//! A session lives exactly as long as the view that created it. It is
//! mutated only through `FormController` (user edits and submissions);
//! readers get clones via `FormController::session()`.
//!
//! The two error channels are independent: re-validating fields never
//! touches `general_error`, and a submission failure never touches
//! `field_errors`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::controller::SubmitKind;
use crate::errors::FormError;
use crate::schema::{FormRecord, ValidationResult};

/// When field errors are recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidationTrigger {
    /// After every field update (errors show for fields the user touched).
    OnChange,
    /// Only when a submission is attempted.
    #[default]
    OnSubmit,
}

/// Whether the session creates a new record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionMode {
    Create,
    Edit,
}

/// Mutable state captured while editing a form.
///
/// Fields:
/// - `values`:              Current record, updated synchronously on every edit
/// - `initial_values`:      Defaults (create) or the last saved record (edit)
/// - `field_errors`:        Present only for fields currently failing validation
/// - `general_error`:       Last submission-level failure
/// - `is_submitting`:       A plain/final save is in flight
/// - `is_saving_draft`:     A draft save is in flight
/// - `has_unsaved_changes`: Set by edits, cleared by a successful save
#[derive(Debug, Clone, PartialEq)]
pub struct FormSession<T> {
    values: T,
    initial_values: T,
    mode: SessionMode,
    field_errors: BTreeMap<String, String>,
    /// Rejected updates (wrong value type); kept until the field is set again.
    type_errors: BTreeMap<String, String>,
    touched: BTreeSet<String>,
    general_error: Option<String>,
    is_submitting: bool,
    is_saving_draft: bool,
    has_unsaved_changes: bool,
}

impl<T: FormRecord> FormSession<T> {
    /// Fresh session for "create" views, starting from the record defaults.
    pub fn new() -> Self {
        Self::with_defaults(T::default())
    }

    /// Create-mode session with caller supplied defaults.
    pub fn with_defaults(defaults: T) -> Self {
        Self::build(defaults, SessionMode::Create)
    }

    /// Session for "edit" views, pre-populated from an existing record.
    pub fn from_existing(record: T) -> Self {
        Self::build(record, SessionMode::Edit)
    }

    fn build(values: T, mode: SessionMode) -> Self {
        Self {
            initial_values: values.clone(),
            values,
            mode,
            field_errors: BTreeMap::new(),
            type_errors: BTreeMap::new(),
            touched: BTreeSet::new(),
            general_error: None,
            is_submitting: false,
            is_saving_draft: false,
            has_unsaved_changes: false,
        }
    }

    pub fn values(&self) -> &T {
        &self.values
    }

    pub fn initial_values(&self) -> &T {
        &self.initial_values
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn field_errors(&self) -> &BTreeMap<String, String> {
        &self.field_errors
    }

    pub fn field_error(&self, key: &str) -> Option<&str> {
        self.field_errors.get(key).map(String::as_str)
    }

    pub fn general_error(&self) -> Option<&str> {
        self.general_error.as_deref()
    }

    pub fn is_submitting(&self) -> bool {
        self.is_submitting
    }

    pub fn is_saving_draft(&self) -> bool {
        self.is_saving_draft
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn is_touched(&self, key: &str) -> bool {
        self.touched.contains(key)
    }

    /// Read a single field by its (camelCase) key.
    pub fn field_value(&self, key: &str) -> Option<Value> {
        match serde_json::to_value(&self.values) {
            Ok(Value::Object(mut map)) => map.remove(key),
            _ => None,
        }
    }

    /// Replace one field. The value is applied immediately or not at all.
    pub(crate) fn set_field(&mut self, key: &str, value: Value) -> Result<(), FormError> {
        let mut map = match serde_json::to_value(&self.values)? {
            Value::Object(map) => map,
            _ => return Err(FormError::NotAnObject),
        };
        if !map.contains_key(key) {
            return Err(FormError::UnknownField(key.to_string()));
        }
        map.insert(key.to_string(), value);

        let next: T = serde_json::from_value(Value::Object(map)).map_err(|source| {
            FormError::TypeMismatch {
                field: key.to_string(),
                source,
            }
        })?;

        self.values = next;
        self.type_errors.remove(key);
        self.touched.insert(key.to_string());
        self.has_unsaved_changes = true;
        Ok(())
    }

    /// Apply a typed edit; every field whose serialized value changed counts as touched.
    pub(crate) fn edit_record(&mut self, edit: impl FnOnce(&mut T)) {
        let before = serde_json::to_value(&self.values).ok();
        edit(&mut self.values);
        let after = serde_json::to_value(&self.values).ok();

        if let (Some(Value::Object(before)), Some(Value::Object(after))) = (before, after) {
            for (key, value) in after {
                if before.get(&key) != Some(&value) {
                    self.type_errors.remove(&key);
                    self.touched.insert(key);
                }
            }
        }
        self.has_unsaved_changes = true;
    }

    /// Report an update that could not be applied because of its type.
    pub(crate) fn record_type_error(&mut self, key: &str, message: String) {
        self.touched.insert(key.to_string());
        self.type_errors.insert(key.to_string(), message.clone());
        self.field_errors.insert(key.to_string(), message);
    }

    /// Publish errors for touched fields only (change-triggered validation).
    pub(crate) fn publish_touched(&mut self, result: ValidationResult) {
        let touched = &self.touched;
        let mut errors: BTreeMap<String, String> = result
            .into_errors()
            .into_iter()
            .filter(|(key, _)| touched.contains(key))
            .collect();
        errors.extend(self.type_errors.clone());
        self.field_errors = errors;
    }

    /// Publish every error (submission / explicit validation).
    pub(crate) fn publish_all<'a>(
        &mut self,
        keys: impl IntoIterator<Item = &'a str>,
        result: ValidationResult,
    ) {
        self.touched.extend(keys.into_iter().map(str::to_string));
        let mut errors = result.into_errors();
        errors.extend(self.type_errors.clone());
        self.field_errors = errors;
    }

    pub(crate) fn clear_general_error(&mut self) {
        self.general_error = None;
    }

    pub(crate) fn set_general_error(&mut self, message: String) {
        self.general_error = Some(message);
    }

    /// A flag for `kind` (or, for dual-submit forms, any flag) is set.
    pub(crate) fn is_busy(&self, kind: SubmitKind, dual_submit: bool) -> bool {
        if dual_submit {
            return self.is_submitting || self.is_saving_draft;
        }
        match kind {
            SubmitKind::Draft => self.is_saving_draft,
            SubmitKind::Submit | SubmitKind::Final => self.is_submitting,
        }
    }

    pub(crate) fn begin_submission(&mut self, kind: SubmitKind) {
        self.set_flag(kind, true);
        self.general_error = None;
    }

    pub(crate) fn end_submission(&mut self, kind: SubmitKind) {
        self.set_flag(kind, false);
    }

    fn set_flag(&mut self, kind: SubmitKind, on: bool) {
        match kind {
            SubmitKind::Draft => self.is_saving_draft = on,
            SubmitKind::Submit | SubmitKind::Final => self.is_submitting = on,
        }
    }

    /// Apply a successful save of `submitted`.
    ///
    /// Create mode resets to the defaults; edit mode keeps the submitted
    /// record as the new baseline. Edits that arrived while the save was in
    /// flight keep the session dirty in edit mode.
    pub(crate) fn complete_submission(&mut self, submitted: T) {
        self.general_error = None;
        match self.mode {
            SessionMode::Create => {
                self.values = self.initial_values.clone();
                self.field_errors.clear();
                self.type_errors.clear();
                self.touched.clear();
                self.has_unsaved_changes = false;
            }
            SessionMode::Edit => {
                self.has_unsaved_changes = self.values != submitted;
                self.initial_values = submitted;
            }
        }
    }

    /// Back to the baseline, dropping errors and the dirty marker.
    pub(crate) fn reset(&mut self) {
        self.values = self.initial_values.clone();
        self.field_errors.clear();
        self.type_errors.clear();
        self.touched.clear();
        self.general_error = None;
        self.has_unsaved_changes = false;
    }
}

impl<T: FormRecord> Default for FormSession<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase", default)]
    struct Note {
        title: String,
        staff_ids: Vec<String>,
        urgent: bool,
    }

    #[test]
    fn new_and_existing_modes() {
        let fresh = FormSession::<Note>::new();
        assert_eq!(fresh.mode(), SessionMode::Create);
        assert!(!fresh.has_unsaved_changes());

        let existing = Note {
            title: "夜勤".into(),
            ..Note::default()
        };
        let edit = FormSession::from_existing(existing.clone());
        assert_eq!(edit.mode(), SessionMode::Edit);
        assert_eq!(edit.values(), &existing);
        assert_eq!(edit.initial_values(), &existing);
    }

    #[test]
    fn set_field_applies_and_marks_dirty() {
        let mut session = FormSession::<Note>::new();
        session.set_field("title", json!("朝の申し送り")).unwrap();
        session.set_field("staffIds", json!(["s1", "s2"])).unwrap();
        assert_eq!(session.values().title, "朝の申し送り");
        assert_eq!(session.values().staff_ids, vec!["s1", "s2"]);
        assert!(session.has_unsaved_changes());
        assert!(session.is_touched("title"));
        assert_eq!(session.field_value("urgent"), Some(json!(false)));
    }

    #[test]
    fn unknown_field_changes_nothing() {
        let mut session = FormSession::<Note>::new();
        let err = session.set_field("nope", json!("x")).unwrap_err();
        assert!(matches!(err, FormError::UnknownField(ref k) if k == "nope"));
        assert!(!session.has_unsaved_changes());
    }

    #[test]
    fn wrong_type_keeps_previous_value() {
        let mut session = FormSession::<Note>::new();
        session.set_field("urgent", json!(true)).unwrap();
        let err = session.set_field("urgent", json!("sometimes")).unwrap_err();
        assert!(matches!(err, FormError::TypeMismatch { ref field, .. } if field == "urgent"));
        assert!(session.values().urgent);
    }

    #[test]
    fn type_error_survives_revalidation_until_field_is_fixed() {
        let mut session = FormSession::<Note>::new();
        session.record_type_error("urgent", "bad".into());
        session.publish_touched(ValidationResult::default());
        assert_eq!(session.field_error("urgent"), Some("bad"));

        session.set_field("urgent", json!(false)).unwrap();
        session.publish_touched(ValidationResult::default());
        assert_eq!(session.field_error("urgent"), None);
    }

    #[test]
    fn edit_record_touches_changed_fields_only() {
        let mut session = FormSession::<Note>::new();
        session.edit_record(|n| n.urgent = true);
        assert!(session.is_touched("urgent"));
        assert!(!session.is_touched("title"));
        assert!(session.has_unsaved_changes());
    }

    #[test]
    fn flags_per_kind() {
        let mut session = FormSession::<Note>::new();
        session.set_general_error("前回の失敗".into());
        session.begin_submission(SubmitKind::Draft);
        assert!(session.is_saving_draft());
        assert!(!session.is_submitting());
        assert_eq!(session.general_error(), None);

        assert!(session.is_busy(SubmitKind::Draft, false));
        assert!(!session.is_busy(SubmitKind::Submit, false));
        assert!(session.is_busy(SubmitKind::Final, true));

        session.end_submission(SubmitKind::Draft);
        assert!(!session.is_busy(SubmitKind::Final, true));
    }

    #[test]
    fn completion_resets_create_and_rebases_edit() {
        let mut create = FormSession::<Note>::new();
        create.set_field("title", json!("A")).unwrap();
        let submitted = create.values().clone();
        create.complete_submission(submitted);
        assert_eq!(create.values(), &Note::default());
        assert!(!create.has_unsaved_changes());

        let mut edit = FormSession::from_existing(Note::default());
        edit.set_field("title", json!("B")).unwrap();
        let submitted = edit.values().clone();
        edit.complete_submission(submitted.clone());
        assert_eq!(edit.values(), &submitted);
        assert_eq!(edit.initial_values(), &submitted);
        assert!(!edit.has_unsaved_changes());
    }

    #[test]
    fn edit_during_flight_keeps_edit_session_dirty() {
        let mut edit = FormSession::from_existing(Note::default());
        edit.set_field("title", json!("B")).unwrap();
        let submitted = edit.values().clone();
        edit.set_field("title", json!("C")).unwrap();
        edit.complete_submission(submitted);
        assert_eq!(edit.values().title, "C");
        assert!(edit.has_unsaved_changes());
    }

    #[test]
    fn reset_returns_to_baseline() {
        let mut session = FormSession::<Note>::new();
        session.set_field("title", json!("X")).unwrap();
        session.set_general_error("err".into());
        session.reset();
        assert_eq!(session, FormSession::<Note>::new());
    }
}
