//! Care plans (ケアプラン) with care level certification periods.

use serde::{Deserialize, Serialize};

use crate::dates::parse_date;
use crate::domains::{CARE_LEVELS, CareForm, FormKind};
use crate::field::{FieldError, FormField, FormFieldKind, optional_number};
use crate::schema::FormSchema;

pub const VALIDITY_END_NOT_AFTER_START: &str =
    "認定有効期間の終了日は開始日より後の日付を入力してください";
pub const VALIDITY_START_BEFORE_CERTIFICATION: &str =
    "認定有効期間の開始日は認定日以降の日付を入力してください";
pub const MONITORING_INTERVAL: &str = "モニタリング間隔は1〜12か月の整数で入力してください";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CarePlanForm {
    pub resident_id: String,
    pub care_level: String,
    pub certification_date: String,
    pub cert_validity_start: String,
    pub cert_validity_end: String,
    pub care_manager: String,
    /// Months between monitoring visits.
    #[serde(deserialize_with = "optional_number")]
    pub monitoring_interval_months: Option<u32>,
    pub goals: String,
    pub service_content: String,
    pub notes: String,
}

impl CareForm for CarePlanForm {
    const KIND: FormKind = FormKind::CarePlan;

    fn schema() -> FormSchema<Self> {
        FormSchema::new(
            "ケアプラン",
            vec![
                FormField::new("residentId", "入居者", FormFieldKind::Text)
                    .required("入居者を選択してください"),
                FormField::new("careLevel", "要介護度", FormFieldKind::select(CARE_LEVELS))
                    .required("要介護度を選択してください"),
                FormField::new("certificationDate", "認定日", FormFieldKind::Date)
                    .required("認定日を入力してください"),
                FormField::new("certValidityStart", "認定有効期間（開始）", FormFieldKind::Date)
                    .required("認定有効期間の開始日を入力してください"),
                FormField::new("certValidityEnd", "認定有効期間（終了）", FormFieldKind::Date)
                    .required("認定有効期間の終了日を入力してください"),
                FormField::new("careManager", "ケアマネジャー", FormFieldKind::Text)
                    .max_length(50, "ケアマネジャーは50文字以内で入力してください"),
                FormField::new("monitoringIntervalMonths", "モニタリング間隔（月）", FormFieldKind::Number)
                    .validator(|months| match months.parse::<u32>() {
                        Ok(1..=12) => Ok(()),
                        _ => Err(MONITORING_INTERVAL.to_string()),
                    }),
                FormField::new("goals", "目標", FormFieldKind::Text)
                    .required("目標を入力してください")
                    .max_length(1000, "目標は1000文字以内で入力してください"),
                FormField::new("serviceContent", "サービス内容", FormFieldKind::Text)
                    .max_length(2000, "サービス内容は2000文字以内で入力してください"),
                FormField::new("notes", "備考", FormFieldKind::Text)
                    .max_length(500, "備考は500文字以内で入力してください"),
            ],
        )
        .refine(|plan: &CarePlanForm, _| {
            match (
                parse_date(&plan.cert_validity_start),
                parse_date(&plan.cert_validity_end),
            ) {
                (Some(start), Some(end)) if end <= start => Err(FieldError::new(
                    "certValidityEnd",
                    VALIDITY_END_NOT_AFTER_START,
                )),
                _ => Ok(()),
            }
        })
        .refine(|plan: &CarePlanForm, _| {
            match (
                parse_date(&plan.certification_date),
                parse_date(&plan.cert_validity_start),
            ) {
                (Some(certified), Some(start)) if start < certified => Err(FieldError::new(
                    "certValidityStart",
                    VALIDITY_START_BEFORE_CERTIFICATION,
                )),
                _ => Ok(()),
            }
        })
        .save_failed_message("ケアプランの保存に失敗しました")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::{FormController, SubmitKind};
    use crate::errors::SaveError;
    use crate::schema::ValidationContext;
    use serde_json::json;

    fn valid() -> CarePlanForm {
        CarePlanForm {
            resident_id: "resident-101".into(),
            care_level: "要介護2".into(),
            certification_date: "2024-03-20".into(),
            cert_validity_start: "2024-04-01".into(),
            cert_validity_end: "2025-03-31".into(),
            goals: "日中の離床時間を増やす".into(),
            ..CarePlanForm::default()
        }
    }

    #[test]
    fn valid_plan_passes() {
        let result = CarePlanForm::schema().validate(&valid(), &ValidationContext::default());
        assert!(result.is_valid(), "{:?}", result.errors());
    }

    #[test]
    fn both_period_rules_report_on_their_own_fields() {
        let plan = CarePlanForm {
            certification_date: "2024-05-01".into(),
            cert_validity_start: "2024-04-01".into(),
            cert_validity_end: "2024-04-01".into(),
            ..valid()
        };
        let result = CarePlanForm::schema().validate(&plan, &ValidationContext::default());
        assert_eq!(result.get("certValidityEnd"), Some(VALIDITY_END_NOT_AFTER_START));
        assert_eq!(
            result.get("certValidityStart"),
            Some(VALIDITY_START_BEFORE_CERTIFICATION)
        );
    }

    #[test]
    fn monitoring_interval_in_months() {
        let schema = CarePlanForm::schema();
        let cx = ValidationContext::default();
        for (months, ok) in [(None, true), (Some(3), true), (Some(12), true), (Some(0), false), (Some(13), false)] {
            let plan = CarePlanForm {
                monitoring_interval_months: months,
                ..valid()
            };
            let result = schema.validate(&plan, &cx);
            if ok {
                assert!(result.is_valid(), "{months:?}: {:?}", result.errors());
            } else {
                assert_eq!(result.get("monitoringIntervalMonths"), Some(MONITORING_INTERVAL), "{months:?}");
            }
        }
    }

    #[test]
    fn monitoring_interval_accepts_json_numbers() {
        let form = FormController::create(CarePlanForm::schema(), |_: CarePlanForm, _: SubmitKind| async {
            Ok::<_, SaveError>(true)
        });
        form.update_field("monitoringIntervalMonths", json!(3)).unwrap();
        assert_eq!(form.values().monitoring_interval_months, Some(3));
        form.update_field("monitoringIntervalMonths", json!("6")).unwrap();
        assert_eq!(form.values().monitoring_interval_months, Some(6));
        assert!(form.field_error("monitoringIntervalMonths").is_none());
        assert!(form.update_field("monitoringIntervalMonths", json!("半年")).is_err());
        assert_eq!(form.values().monitoring_interval_months, Some(6));

        let cx = ValidationContext::default();
        let mut record = serde_json::to_value(valid()).unwrap();
        record["monitoringIntervalMonths"] = json!(3);
        let result = FormKind::CarePlan.validate_json(&record, &cx).unwrap();
        assert!(result.is_valid(), "{:?}", result.errors());

        record["monitoringIntervalMonths"] = json!(24);
        let result = FormKind::CarePlan.validate_json(&record, &cx).unwrap();
        assert_eq!(result.get("monitoringIntervalMonths"), Some(MONITORING_INTERVAL));
    }

    #[test]
    fn unknown_care_level() {
        let plan = CarePlanForm {
            care_level: "要介護6".into(),
            ..valid()
        };
        let result = CarePlanForm::schema().validate(&plan, &ValidationContext::default());
        assert_eq!(result.get("careLevel"), Some(crate::field::INVALID_OPTION));
    }
}
