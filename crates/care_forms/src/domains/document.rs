//! Document metadata (書類) stored in folders.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domains::{CareForm, FormKind};
use crate::field::{FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const CATEGORIES: [&str; 5] = ["契約書", "計画書", "記録", "マニュアル", "その他"];

lazy_static! {
    pub static ref FILE_NAME: Regex =
        Regex::new(r"(?i)^[^\\/:*?<>|]+\.(pdf|docx?|xlsx?|csv|txt|jpe?g|png)$")
            .expect("valid file name pattern");
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentForm {
    pub title: String,
    pub folder_id: String,
    pub file_name: String,
    pub category: String,
    pub description: String,
}

impl CareForm for DocumentForm {
    const KIND: FormKind = FormKind::Document;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "書類登録",
            vec![
                FormField::new("title", "タイトル", FormFieldKind::Text)
                    .required("タイトルを入力してください")
                    .max_length(100, "タイトルは100文字以内で入力してください"),
                FormField::new("folderId", "フォルダ", FormFieldKind::Text)
                    .required("フォルダを選択してください"),
                FormField::new("fileName", "ファイル", FormFieldKind::Text)
                    .required("ファイルを選択してください")
                    .max_length(255, "ファイル名は255文字以内にしてください")
                    .pattern(
                        FILE_NAME.clone(),
                        "対応していないファイル形式です（PDF、Word、Excel、CSV、テキスト、画像）",
                    ),
                FormField::new("category", "分類", FormFieldKind::select(CATEGORIES)),
                FormField::new("description", "説明", FormFieldKind::Text)
                    .max_length(500, "説明は500文字以内で入力してください"),
            ],
        )
        .save_failed_message("書類の保存に失敗しました")
    }
}
