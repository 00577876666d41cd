//! Scheduled contacts with families and agencies (連絡予定). Supports draft and final submit.

use serde::{Deserialize, Serialize};

use crate::domains::{CareForm, FormKind};
use crate::field::{FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const CONTACT_TYPES: [&str; 4] = ["電話", "面会", "メール", "その他"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactScheduleForm {
    pub title: String,
    pub content: String,
    pub scheduled_date: String,
    pub scheduled_time: String,
    pub contact_type: String,
    pub contact_person: String,
    pub resident_id: String,
    pub target_staff_ids: Vec<String>,
}

impl CareForm for ContactScheduleForm {
    const KIND: FormKind = FormKind::ContactSchedule;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "連絡予定",
            vec![
                FormField::new("title", "件名", FormFieldKind::Text)
                    .required("件名を入力してください")
                    .max_length(100, "件名は100文字以内で入力してください"),
                FormField::new("content", "内容", FormFieldKind::Text)
                    .max_length(1000, "内容は1000文字以内で入力してください"),
                FormField::new("scheduledDate", "予定日", FormFieldKind::Date)
                    .required("予定日を入力してください"),
                FormField::new("scheduledTime", "予定時刻", FormFieldKind::Time),
                FormField::new("contactType", "連絡方法", FormFieldKind::select(CONTACT_TYPES))
                    .required("連絡方法を選択してください"),
                FormField::new("contactPerson", "連絡先担当者", FormFieldKind::Text)
                    .max_length(50, "連絡先担当者は50文字以内で入力してください"),
                FormField::new("residentId", "関連する入居者", FormFieldKind::Text),
                FormField::new("targetStaffIds", "対象スタッフ", FormFieldKind::List),
            ],
        )
        .dual_submit()
        .save_failed_message("連絡予定の保存に失敗しました")
    }
}
