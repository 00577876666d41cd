//! Concrete form schemas of the care desk.
//!
//! Every domain module provides its record type (camelCase keys, as the
//! forms post them), the create-mode defaults via `Default`, and its
//! `FormSchema` via the `CareForm` trait.
//!
//! `FormKind` enumerates the forms so callers that only know a form by name
//! (CLI, routing) can dispatch to the typed record through a `FormVisitor`.

pub mod absence;
pub mod care_plan;
pub mod care_record;
pub mod contact;
pub mod contact_schedule;
pub mod document;
pub mod folder;
pub mod handover;
pub mod individual_point;
pub mod medical_history;
pub mod medication;
pub mod medication_status;
pub mod resident;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumIter, EnumString};

use crate::errors::FormError;
use crate::schema::{FormRecord, FormSchema, ValidationContext, ValidationResult};

/// Care levels (要介護度) shared by resident and care plan forms.
pub const CARE_LEVELS: [&str; 7] = [
    "要支援1", "要支援2", "要介護1", "要介護2", "要介護3", "要介護4", "要介護5",
];

/// A record type with a schema.
pub trait CareForm: FormRecord {
    const KIND: FormKind;

    fn schema() -> FormSchema<Self>;
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum FormKind {
    Absence,
    Contact,
    Handover,
    Medication,
    MedicationStatus,
    MedicalHistory,
    CareRecord,
    CarePlan,
    IndividualPoint,
    ContactSchedule,
    Document,
    Folder,
    Resident,
}

/// Generic operation over the record type behind a `FormKind`.
pub trait FormVisitor {
    type Output;

    fn visit<F: CareForm>(self) -> Self::Output;
}

impl FormKind {
    pub fn accept<V: FormVisitor>(self, visitor: V) -> V::Output {
        match self {
            FormKind::Absence => visitor.visit::<absence::AbsenceForm>(),
            FormKind::Contact => visitor.visit::<contact::ContactForm>(),
            FormKind::Handover => visitor.visit::<handover::HandoverForm>(),
            FormKind::Medication => visitor.visit::<medication::MedicationForm>(),
            FormKind::MedicationStatus => {
                visitor.visit::<medication_status::MedicationStatusForm>()
            }
            FormKind::MedicalHistory => visitor.visit::<medical_history::MedicalHistoryForm>(),
            FormKind::CareRecord => visitor.visit::<care_record::CareRecordForm>(),
            FormKind::CarePlan => visitor.visit::<care_plan::CarePlanForm>(),
            FormKind::IndividualPoint => {
                visitor.visit::<individual_point::IndividualPointForm>()
            }
            FormKind::ContactSchedule => {
                visitor.visit::<contact_schedule::ContactScheduleForm>()
            }
            FormKind::Document => visitor.visit::<document::DocumentForm>(),
            FormKind::Folder => visitor.visit::<folder::FolderForm>(),
            FormKind::Resident => visitor.visit::<resident::ResidentForm>(),
        }
    }

    /// Whether the form offers "save draft" next to the final submit.
    pub fn is_dual_submit(self) -> bool {
        matches!(
            self,
            FormKind::Handover | FormKind::CareRecord | FormKind::ContactSchedule
        )
    }

    /// Field overview for help output.
    pub fn outline(self) -> FormOutline {
        self.accept(Outline)
    }

    /// Validate an untyped JSON record against this form's schema.
    ///
    /// Missing keys take the create-mode defaults. A value of the wrong
    /// type is not applied and reports the type-mismatch message on its
    /// field, as a field update would. Unknown keys are an error.
    pub fn validate_json(
        self,
        record: &Value,
        cx: &ValidationContext,
    ) -> Result<ValidationResult, FormError> {
        self.accept(ValidateJson { record, cx })
    }
}

struct ValidateJson<'a> {
    record: &'a Value,
    cx: &'a ValidationContext,
}

impl FormVisitor for ValidateJson<'_> {
    type Output = Result<ValidationResult, FormError>;

    fn visit<F: CareForm>(self) -> Self::Output {
        let Value::Object(fields) = self.record else {
            return Err(FormError::NotAnObject);
        };
        let mut values = match serde_json::to_value(F::default())? {
            Value::Object(values) => values,
            _ => return Err(FormError::NotAnObject),
        };

        let mut mismatched = Vec::new();
        for (key, value) in fields {
            let Some(previous) = values.insert(key.clone(), value.clone()) else {
                return Err(FormError::UnknownField(key.clone()));
            };
            if serde_json::from_value::<F>(Value::Object(values.clone())).is_err() {
                values.insert(key.clone(), previous);
                mismatched.push(key.as_str());
            }
        }

        let record: F = serde_json::from_value(Value::Object(values))?;
        let mut result = F::schema().validate(&record, self.cx);
        for key in mismatched {
            result.set_type_error(key, self.cx.type_mismatch.clone());
        }
        Ok(result)
    }
}

/// Display-only summary of a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FormOutline {
    pub kind: FormKind,
    pub title: String,
    pub dual_submit: bool,
    pub fields: Vec<FieldOutline>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldOutline {
    pub key: &'static str,
    pub label: String,
    pub required: bool,
}

struct Outline;

impl FormVisitor for Outline {
    type Output = FormOutline;

    fn visit<F: CareForm>(self) -> FormOutline {
        let schema = F::schema();
        FormOutline {
            kind: F::KIND,
            title: schema.title.clone(),
            dual_submit: schema.is_dual_submit(),
            fields: schema
                .fields
                .iter()
                .map(|f| FieldOutline {
                    key: f.key,
                    label: f.label.clone(),
                    required: f.is_required(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationContext;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn kinds_parse_from_kebab_case() {
        assert_eq!(
            FormKind::from_str("medication-status").unwrap(),
            FormKind::MedicationStatus
        );
        assert_eq!(FormKind::ContactSchedule.to_string(), "contact-schedule");
        assert!(FormKind::from_str("payroll").is_err());
    }

    #[test]
    fn every_kind_dispatches_to_its_own_record() {
        for kind in FormKind::iter() {
            let outline = kind.outline();
            assert_eq!(outline.kind, kind);
            assert_eq!(outline.dual_submit, kind.is_dual_submit(), "{kind}");
            assert!(!outline.fields.is_empty(), "{kind} has no fields");
        }
    }

    struct DefaultsHaveErrors;

    impl FormVisitor for DefaultsHaveErrors {
        type Output = bool;

        fn visit<F: CareForm>(self) -> bool {
            let cx = ValidationContext::default();
            !F::schema().validate(&F::default(), &cx).is_valid()
        }
    }

    #[test]
    fn create_defaults_are_not_submittable() {
        for kind in FormKind::iter() {
            assert!(kind.accept(DefaultsHaveErrors), "{kind} defaults pass validation");
        }
    }

    #[test]
    fn validate_json_dispatches_by_kind() {
        let cx = ValidationContext::default();
        let record = serde_json::json!({
            "name": "山田 太郎",
            "phone1": "03-1234-5678",
        });
        let result = FormKind::Contact.validate_json(&record, &cx).unwrap();
        assert!(result.is_valid(), "{:?}", result.errors());

        let result = FormKind::Folder
            .validate_json(&serde_json::json!({ "name": "山田 太郎" }), &cx)
            .unwrap();
        assert!(result.get("name").is_none());

        assert!(matches!(
            FormKind::Folder.validate_json(&record, &cx),
            Err(FormError::UnknownField(key)) if key == "phone1"
        ));
        assert!(matches!(
            FormKind::Contact.validate_json(&serde_json::json!([1, 2]), &cx),
            Err(FormError::NotAnObject)
        ));
    }

    #[test]
    fn validate_json_reports_wrong_types_on_their_field() {
        let cx = ValidationContext::default();
        let record = serde_json::json!({
            "startDateTime": 20250125,
            "endDateTime": "2025-01-25T12:00",
            "reason": "outing",
        });
        let result = FormKind::Absence.validate_json(&record, &cx).unwrap();
        assert_eq!(result.get("startDateTime"), Some(cx.type_mismatch.as_str()));
        assert_eq!(result.len(), 1, "{:?}", result.errors());

        let result = FormKind::Contact
            .validate_json(&serde_json::json!({ "name": 7, "phone1": "03-1234-5678" }), &cx)
            .unwrap();
        assert_eq!(result.get("name"), Some(cx.type_mismatch.as_str()));
    }

    #[test]
    fn field_keys_exist_on_records() {
        struct KeysExist;
        impl FormVisitor for KeysExist {
            type Output = Vec<&'static str>;
            fn visit<F: CareForm>(self) -> Vec<&'static str> {
                let json = serde_json::to_value(F::default()).unwrap();
                F::schema()
                    .fields
                    .iter()
                    .map(|f| f.key)
                    .filter(|key| json.get(key).is_none())
                    .collect()
            }
        }
        for kind in FormKind::iter() {
            let missing = kind.accept(KeysExist);
            assert!(missing.is_empty(), "{kind}: unknown schema keys {missing:?}");
        }
    }
}
