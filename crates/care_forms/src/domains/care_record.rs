//! Care records (介護記録). Supports draft and final submit.

use serde::{Deserialize, Serialize};

use crate::domains::{CareForm, FormKind};
use crate::field::{FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const CATEGORIES: [&str; 7] = ["食事", "排泄", "入浴", "睡眠", "バイタル", "レクリエーション", "その他"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CareRecordForm {
    pub resident_id: String,
    pub record_date_time: String,
    pub category: String,
    pub content: String,
    pub is_important: bool,
}

impl CareForm for CareRecordForm {
    const KIND: FormKind = FormKind::CareRecord;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "介護記録",
            vec![
                FormField::new("residentId", "入居者", FormFieldKind::Text)
                    .required("入居者を選択してください"),
                FormField::new("recordDateTime", "記録日時", FormFieldKind::DateTime)
                    .required("記録日時を入力してください"),
                FormField::new("category", "分類", FormFieldKind::select(CATEGORIES))
                    .required("分類を選択してください"),
                FormField::new("content", "記録内容", FormFieldKind::Text)
                    .required("記録内容を入力してください")
                    .max_length(1000, "記録内容は1000文字以内で入力してください"),
                FormField::new("isImportant", "重要", FormFieldKind::Bool)
                    .help("重要な記録は申し送りにも表示されます"),
            ],
        )
        .dual_submit()
        .save_failed_message("介護記録の保存に失敗しました")
    }
}
