//! Daily medication intake record (服薬状況).

use serde::{Deserialize, Serialize};

use crate::dates::parse_date;
use crate::domains::{CareForm, FormKind};
use crate::field::{FieldError, FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const TIMINGS: [&str; 4] = ["morning", "noon", "evening", "bedtime"];
pub const STATUSES: [&str; 3] = ["taken", "refused", "missed"];

pub const FUTURE_DATE: &str = "登録日に未来の日付は指定できません";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicationStatusForm {
    pub medication_id: String,
    pub date: String,
    pub timing: String,
    pub status: String,
    pub notes: String,
}

impl CareForm for MedicationStatusForm {
    const KIND: FormKind = FormKind::MedicationStatus;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "服薬状況登録",
            vec![
                FormField::new("medicationId", "薬剤", FormFieldKind::Text)
                    .required("薬剤を選択してください"),
                FormField::new("date", "日付", FormFieldKind::Date)
                    .required("日付を入力してください"),
                FormField::new("timing", "タイミング", FormFieldKind::select(TIMINGS))
                    .required("タイミングを選択してください"),
                FormField::new("status", "状況", FormFieldKind::select(STATUSES))
                    .required("服薬状況を選択してください"),
                FormField::new("notes", "備考", FormFieldKind::Text)
                    .max_length(200, "備考は200文字以内で入力してください"),
            ],
        )
        .refine(|form: &MedicationStatusForm, cx| match parse_date(&form.date) {
            Some(date) if date > cx.today => Err(FieldError::new("date", FUTURE_DATE)),
            _ => Ok(()),
        })
        .save_failed_message("服薬状況の登録に失敗しました")
    }
}
