//! Medical history (既往歴) entries.

use serde::{Deserialize, Serialize};

use crate::dates::optional_date;
use crate::domains::{CareForm, FormKind};
use crate::field::{FieldError, FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const STATUSES: [&str; 3] = ["治療中", "経過観察", "完治"];

pub const FUTURE_ONSET: &str = "発症日に未来の日付は指定できません";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MedicalHistoryForm {
    pub disease_name: String,
    pub onset_date: String,
    pub status: String,
    pub hospital: String,
    pub treatment: String,
    pub notes: String,
}

impl CareForm for MedicalHistoryForm {
    const KIND: FormKind = FormKind::MedicalHistory;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "既往歴登録",
            vec![
                FormField::new("diseaseName", "病名", FormFieldKind::Text)
                    .required("病名を入力してください")
                    .max_length(100, "病名は100文字以内で入力してください"),
                FormField::new("onsetDate", "発症日", FormFieldKind::Date),
                FormField::new("status", "状態", FormFieldKind::select(STATUSES)),
                FormField::new("hospital", "医療機関", FormFieldKind::Text)
                    .max_length(100, "医療機関は100文字以内で入力してください"),
                FormField::new("treatment", "治療内容", FormFieldKind::Text)
                    .max_length(500, "治療内容は500文字以内で入力してください"),
                FormField::new("notes", "備考", FormFieldKind::Text)
                    .max_length(500, "備考は500文字以内で入力してください"),
            ],
        )
        .refine(|form: &MedicalHistoryForm, cx| match optional_date(&form.onset_date) {
            Some(onset) if onset > cx.today => Err(FieldError::new("onsetDate", FUTURE_ONSET)),
            _ => Ok(()),
        })
        .save_failed_message("既往歴の保存に失敗しました")
    }
}
