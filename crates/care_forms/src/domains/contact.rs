//! Contacts (連絡先) of a resident: family, emergency contacts, physicians.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domains::{CareForm, FormKind};
use crate::field::{FormField, FormFieldKind};
use crate::schema::FormSchema;

pub const CONTACT_TYPES: [&str; 4] = ["連絡先", "緊急連絡先", "かかりつけ医", "ケアマネジャー"];

lazy_static! {
    pub static ref PHONE: Regex = Regex::new(r"^[0-9]+(-[0-9]+)*$").expect("valid phone pattern");
    pub static ref EMAIL: Regex =
        Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email pattern");
}

const PHONE_FORMAT: &str = "電話番号は半角数字とハイフンで入力してください";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ContactForm {
    pub name: String,
    pub relationship: String,
    pub phone1: String,
    pub phone2: String,
    pub email: String,
    pub address: String,
    #[serde(rename = "type")]
    pub contact_type: String,
    pub notes: String,
}

impl Default for ContactForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            relationship: String::new(),
            phone1: String::new(),
            phone2: String::new(),
            email: String::new(),
            address: String::new(),
            contact_type: CONTACT_TYPES[0].to_string(),
            notes: String::new(),
        }
    }
}

impl CareForm for ContactForm {
    const KIND: FormKind = FormKind::Contact;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "連絡先登録",
            vec![
                FormField::new("name", "氏名", FormFieldKind::Text)
                    .required("氏名を入力してください")
                    .max_length(50, "氏名は50文字以内で入力してください"),
                FormField::new("relationship", "続柄", FormFieldKind::Text)
                    .max_length(20, "続柄は20文字以内で入力してください"),
                FormField::new("phone1", "電話番号1", FormFieldKind::Text)
                    .required("電話番号を入力してください")
                    .max_length(15, "電話番号は15文字以内で入力してください")
                    .pattern(PHONE.clone(), PHONE_FORMAT),
                FormField::new("phone2", "電話番号2", FormFieldKind::Text)
                    .max_length(15, "電話番号は15文字以内で入力してください")
                    .pattern(PHONE.clone(), PHONE_FORMAT),
                FormField::new("email", "メールアドレス", FormFieldKind::Text)
                    .pattern(EMAIL.clone(), "メールアドレスの形式が正しくありません"),
                FormField::new("address", "住所", FormFieldKind::Text)
                    .max_length(200, "住所は200文字以内で入力してください"),
                FormField::new("type", "種別", FormFieldKind::select(CONTACT_TYPES))
                    .required("種別を選択してください"),
                FormField::new("notes", "備考", FormFieldKind::Text)
                    .max_length(500, "備考は500文字以内で入力してください"),
            ],
        )
        .save_failed_message("連絡先の保存に失敗しました")
    }
}
