//! Handover notes (申し送り) between shifts. Supports draft and final submit.

use serde::{Deserialize, Serialize};

use crate::domains::{CareForm, FormKind};
use crate::field::{FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const PRIORITIES: [&str; 3] = ["normal", "high", "urgent"];

pub const TARGET_STAFF_REQUIRED: &str = "申し送り対象のスタッフを選択してください";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct HandoverForm {
    pub title: String,
    pub content: String,
    pub target_staff_ids: Vec<String>,
    pub priority: String,
    pub resident_id: String,
}

impl Default for HandoverForm {
    fn default() -> Self {
        Self {
            title: String::new(),
            content: String::new(),
            target_staff_ids: Vec::new(),
            priority: PRIORITIES[0].to_string(),
            resident_id: String::new(),
        }
    }
}

impl CareForm for HandoverForm {
    const KIND: FormKind = FormKind::Handover;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "申し送り",
            vec![
                FormField::new("title", "タイトル", FormFieldKind::Text)
                    .required("タイトルを入力してください")
                    .max_length(100, "タイトルは100文字以内で入力してください"),
                FormField::new("content", "内容", FormFieldKind::Text)
                    .required("内容を入力してください")
                    .max_length(2000, "内容は2000文字以内で入力してください"),
                FormField::new("targetStaffIds", "対象スタッフ", FormFieldKind::List)
                    .required(TARGET_STAFF_REQUIRED),
                FormField::new("priority", "優先度", FormFieldKind::select(PRIORITIES))
                    .required("優先度を選択してください"),
                FormField::new("residentId", "関連する入居者", FormFieldKind::Text)
                    .help("入居者に関する申し送りの場合に選択します"),
            ],
        )
        .dual_submit()
        .save_failed_message("申し送りの保存に失敗しました")
    }
}
