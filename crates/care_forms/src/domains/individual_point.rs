//! Individual care points (個別ポイント): per-resident notes staff should keep in mind.

use serde::{Deserialize, Serialize};

use crate::domains::{CareForm, FormKind};
use crate::field::{FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const CATEGORIES: [&str; 6] = ["食事", "排泄", "入浴", "移動", "コミュニケーション", "その他"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndividualPointForm {
    pub resident_id: String,
    pub category: String,
    pub title: String,
    pub content: String,
}

impl CareForm for IndividualPointForm {
    const KIND: FormKind = FormKind::IndividualPoint;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "個別ポイント",
            vec![
                FormField::new("residentId", "入居者", FormFieldKind::Text)
                    .required("入居者を選択してください"),
                FormField::new("category", "カテゴリ", FormFieldKind::select(CATEGORIES))
                    .required("カテゴリを選択してください"),
                FormField::new("title", "タイトル", FormFieldKind::Text)
                    .required("タイトルを入力してください")
                    .max_length(50, "タイトルは50文字以内で入力してください"),
                FormField::new("content", "内容", FormFieldKind::Text)
                    .required("内容を入力してください")
                    .max_length(1000, "内容は1000文字以内で入力してください"),
            ],
        )
        .description("入居者ごとのケアの注意点を記録します")
    }
}
