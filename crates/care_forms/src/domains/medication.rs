//! Medication (服薬) prescriptions of a resident.

use serde::{Deserialize, Serialize};

use crate::dates::{optional_date, parse_date};
use crate::domains::{CareForm, FormKind};
use crate::field::{FieldError, FormField, FormFieldKind, INVALID_OPTION};
use crate::schema::FormSchema;

pub const TIMINGS: [&str; 6] = ["起床時", "朝食後", "昼食後", "夕食後", "就寝前", "頓服"];

pub const END_BEFORE_START: &str = "終了日は開始日以降の日付を入力してください";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicationForm {
    pub medication_name: String,
    pub dosage: String,
    pub frequency: String,
    pub timing: Vec<String>,
    pub start_date: String,
    pub end_date: String,
    pub prescribed_by: String,
    pub notes: String,
}

impl CareForm for MedicationForm {
    const KIND: FormKind = FormKind::Medication;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "服薬登録",
            vec![
                FormField::new("medicationName", "薬剤名", FormFieldKind::Text)
                    .required("薬剤名を入力してください")
                    .max_length(100, "薬剤名は100文字以内で入力してください"),
                FormField::new("dosage", "用量", FormFieldKind::Text)
                    .required("用量を入力してください")
                    .max_length(50, "用量は50文字以内で入力してください"),
                FormField::new("frequency", "服用回数", FormFieldKind::Text)
                    .required("服用回数を入力してください")
                    .max_length(50, "服用回数は50文字以内で入力してください"),
                FormField::new("timing", "服用タイミング", FormFieldKind::List).validator(|t| {
                    if TIMINGS.contains(&t) {
                        Ok(())
                    } else {
                        Err(INVALID_OPTION.to_string())
                    }
                }),
                FormField::new("startDate", "開始日", FormFieldKind::Date)
                    .required("開始日を入力してください"),
                FormField::new("endDate", "終了日", FormFieldKind::Date),
                FormField::new("prescribedBy", "処方医", FormFieldKind::Text)
                    .max_length(50, "処方医は50文字以内で入力してください"),
                FormField::new("notes", "備考", FormFieldKind::Text)
                    .max_length(500, "備考は500文字以内で入力してください"),
            ],
        )
        .refine(|form: &MedicationForm, _| {
            match (parse_date(&form.start_date), optional_date(&form.end_date)) {
                (Some(start), Some(end)) if end < start => {
                    Err(FieldError::new("endDate", END_BEFORE_START))
                }
                _ => Ok(()),
            }
        })
        .save_failed_message("服薬情報の保存に失敗しました")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationContext;

    fn valid() -> MedicationForm {
        MedicationForm {
            medication_name: "アムロジピン".into(),
            dosage: "5mg".into(),
            frequency: "1日1回".into(),
            timing: vec!["朝食後".into()],
            start_date: "2025-01-10".into(),
            ..MedicationForm::default()
        }
    }

    #[test]
    fn end_date_is_optional() {
        let result = MedicationForm::schema().validate(&valid(), &ValidationContext::default());
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn same_day_end_is_fine_earlier_is_not() {
        let schema = MedicationForm::schema();
        let cx = ValidationContext::default();

        let same_day = MedicationForm {
            end_date: "2025-01-10".into(),
            ..valid()
        };
        assert!(schema.validate(&same_day, &cx).is_valid());

        let earlier = MedicationForm {
            end_date: "2025-01-09".into(),
            ..valid()
        };
        assert_eq!(schema.validate(&earlier, &cx).get("endDate"), Some(END_BEFORE_START));
    }

    #[test]
    fn unknown_timing_is_rejected() {
        let form = MedicationForm {
            timing: vec!["朝食後".into(), "おやつ".into()],
            ..valid()
        };
        let result = MedicationForm::schema().validate(&form, &ValidationContext::default());
        assert_eq!(result.get("timing"), Some(INVALID_OPTION));
    }
}
