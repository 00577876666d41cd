//! Resident master data (入居者).

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dates::{optional_date, parse_date};
use crate::domains::{CARE_LEVELS, CareForm, FormKind};
use crate::field::{FieldError, FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const GENDERS: [&str; 3] = ["男性", "女性", "その他"];

lazy_static! {
    /// Full-width katakana, long vowel mark and spaces.
    pub static ref KATAKANA: Regex = Regex::new(r"^[\u{30A0}-\u{30FF}\u{3000} ]+$").expect("valid katakana pattern");
    static ref ROOM_NUMBER: Regex = Regex::new(r"^[0-9A-Za-z-]+$").expect("valid room pattern");
}

pub const FUTURE_BIRTH_DATE: &str = "生年月日に未来の日付は指定できません";
pub const ADMISSION_BEFORE_BIRTH: &str = "入居日は生年月日より後の日付を入力してください";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResidentForm {
    pub name: String,
    pub furigana: String,
    pub gender: String,
    pub birth_date: String,
    pub care_level: String,
    pub room_number: String,
    pub admission_date: String,
    pub notes: String,
}

impl CareForm for ResidentForm {
    const KIND: FormKind = FormKind::Resident;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "入居者登録",
            vec![
                FormField::new("name", "氏名", FormFieldKind::Text)
                    .required("氏名を入力してください")
                    .max_length(50, "氏名は50文字以内で入力してください"),
                FormField::new("furigana", "フリガナ", FormFieldKind::Text)
                    .required("フリガナを入力してください")
                    .max_length(50, "フリガナは50文字以内で入力してください")
                    .pattern(KATAKANA.clone(), "フリガナは全角カタカナで入力してください"),
                FormField::new("gender", "性別", FormFieldKind::select(GENDERS))
                    .required("性別を選択してください"),
                FormField::new("birthDate", "生年月日", FormFieldKind::Date)
                    .required("生年月日を入力してください"),
                FormField::new("careLevel", "要介護度", FormFieldKind::select(CARE_LEVELS)),
                FormField::new("roomNumber", "居室番号", FormFieldKind::Text)
                    .max_length(10, "居室番号は10文字以内で入力してください")
                    .pattern(ROOM_NUMBER.clone(), "居室番号は半角英数字とハイフンで入力してください"),
                FormField::new("admissionDate", "入居日", FormFieldKind::Date),
                FormField::new("notes", "備考", FormFieldKind::Text)
                    .max_length(1000, "備考は1000文字以内で入力してください"),
            ],
        )
        .refine(|resident: &ResidentForm, cx| match parse_date(&resident.birth_date) {
            Some(birth) if birth > cx.today => {
                Err(FieldError::new("birthDate", FUTURE_BIRTH_DATE))
            }
            _ => Ok(()),
        })
        .refine(|resident: &ResidentForm, _| {
            match (
                parse_date(&resident.birth_date),
                optional_date(&resident.admission_date),
            ) {
                (Some(birth), Some(admission)) if admission <= birth => {
                    Err(FieldError::new("admissionDate", ADMISSION_BEFORE_BIRTH))
                }
                _ => Ok(()),
            }
        })
        .save_failed_message("入居者情報の保存に失敗しました")
    }
}
