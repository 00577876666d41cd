//! Document folders (フォルダ).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domains::{CareForm, FormKind};
use crate::field::{FormField, FormFieldKind};
use crate::schema::FormSchema;

lazy_static! {
    static ref FOLDER_NAME: Regex = Regex::new(r#"^[^\\/:*?"<>|]+$"#).expect("valid folder pattern");
}

pub const INVALID_FOLDER_NAME: &str = r#"フォルダ名に使用できない文字が含まれています（\ / : * ? " < > |）"#;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FolderForm {
    pub name: String,
    pub parent_id: String,
    pub description: String,
}

impl CareForm for FolderForm {
    const KIND: FormKind = FormKind::Folder;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "フォルダ作成",
            vec![
                FormField::new("name", "フォルダ名", FormFieldKind::Text)
                    .required("フォルダ名を入力してください")
                    .max_length(50, "フォルダ名は50文字以内で入力してください")
                    .pattern(FOLDER_NAME.clone(), INVALID_FOLDER_NAME)
                    .validator(|name| {
                        if name.trim() == "." || name.trim() == ".." {
                            Err(INVALID_FOLDER_NAME.to_string())
                        } else {
                            Ok(())
                        }
                    }),
                FormField::new("parentId", "親フォルダ", FormFieldKind::Text)
                    .help("未選択の場合は最上位に作成されます"),
                FormField::new("description", "説明", FormFieldKind::Text)
                    .max_length(200, "説明は200文字以内で入力してください"),
            ],
        )
        .save_failed_message("フォルダの作成に失敗しました")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ValidationContext;

    #[test]
    fn reserved_characters_are_rejected() {
        let schema = FolderForm::schema();
        let cx = ValidationContext::default();
        for bad in ["a/b", "議事録:2025", "..", "what?"] {
            let folder = FolderForm {
                name: bad.into(),
                ..FolderForm::default()
            };
            assert_eq!(
                schema.validate(&folder, &cx).get("name"),
                Some(INVALID_FOLDER_NAME),
                "{bad}"
            );
        }
        let folder = FolderForm {
            name: "2025年度 研修資料".into(),
            ..FolderForm::default()
        };
        assert!(schema.validate(&folder, &cx).is_valid());
    }
}
