//! Absence (外出・外泊) registration.

use serde::{Deserialize, Serialize};

use crate::dates::parse_date_time;
use crate::domains::{CareForm, FormKind};
use crate::field::{FieldError, FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const REASON_HOSPITAL_VISIT: &str = "hospital_visit";
pub const REASON_OUTING: &str = "outing";
pub const REASON_OVERNIGHT: &str = "overnight";
pub const REASON_HOSPITALIZATION: &str = "hospitalization";
pub const REASON_OTHER: &str = "other";

pub const REASONS: [&str; 5] = [
    REASON_HOSPITAL_VISIT,
    REASON_OUTING,
    REASON_OVERNIGHT,
    REASON_HOSPITALIZATION,
    REASON_OTHER,
];

pub const END_BEFORE_START: &str = "終了日時は開始日時より後の時刻を入力してください";
pub const CUSTOM_REASON_REQUIRED: &str = "その他の理由を入力してください";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AbsenceForm {
    pub start_date_time: String,
    pub end_date_time: String,
    pub reason: String,
    pub custom_reason: String,
    pub destination: String,
    pub notes: String,
}

impl CareForm for AbsenceForm {
    const KIND: FormKind = FormKind::Absence;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "外出・外泊登録",
            vec![
                FormField::new("startDateTime", "開始日時", FormFieldKind::DateTime)
                    .required("開始日時を入力してください"),
                FormField::new("endDateTime", "終了日時", FormFieldKind::DateTime)
                    .required("終了日時を入力してください"),
                FormField::new("reason", "理由", FormFieldKind::select(REASONS))
                    .required("理由を選択してください"),
                FormField::new("customReason", "その他の理由", FormFieldKind::Text)
                    .max_length(100, "その他の理由は100文字以内で入力してください"),
                FormField::new("destination", "行き先", FormFieldKind::Text)
                    .max_length(100, "行き先は100文字以内で入力してください"),
                FormField::new("notes", "備考", FormFieldKind::Text)
                    .max_length(500, "備考は500文字以内で入力してください"),
            ],
        )
        .refine(|form: &AbsenceForm, _| {
            match (
                parse_date_time(&form.start_date_time),
                parse_date_time(&form.end_date_time),
            ) {
                (Some(start), Some(end)) if end <= start => {
                    Err(FieldError::new("endDateTime", END_BEFORE_START))
                }
                _ => Ok(()),
            }
        })
        .refine(|form: &AbsenceForm, _| {
            if form.reason == REASON_OTHER && form.custom_reason.trim().is_empty() {
                Err(FieldError::new("customReason", CUSTOM_REASON_REQUIRED))
            } else {
                Ok(())
            }
        })
        .save_failed_message("外出・外泊の登録に失敗しました")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationContext;

    fn valid() -> AbsenceForm {
        AbsenceForm {
            start_date_time: "2025-01-25T10:00".into(),
            end_date_time: "2025-01-25T15:00".into(),
            reason: REASON_HOSPITAL_VISIT.into(),
            destination: "市民病院".into(),
            ..AbsenceForm::default()
        }
    }

    #[test]
    fn valid_absence_passes() {
        let result = AbsenceForm::schema().validate(&valid(), &ValidationContext::default());
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn equal_start_and_end_is_rejected() {
        let form = AbsenceForm {
            end_date_time: "2025-01-25T10:00".into(),
            ..valid()
        };
        let result = AbsenceForm::schema().validate(&form, &ValidationContext::default());
        assert_eq!(result.get("endDateTime"), Some(END_BEFORE_START));
    }

    #[test]
    fn other_reason_needs_text() {
        let form = AbsenceForm {
            reason: REASON_OTHER.into(),
            ..valid()
        };
        let schema = AbsenceForm::schema();
        let cx = ValidationContext::default();
        assert_eq!(
            schema.validate(&form, &cx).get("customReason"),
            Some(CUSTOM_REASON_REQUIRED)
        );

        let form = AbsenceForm {
            custom_reason: "家族の結婚式".into(),
            ..form
        };
        assert!(schema.validate(&form, &cx).is_valid());
    }
}
