use std::sync::{Arc, Mutex};

use care_forms::domains::CareForm;
use care_forms::domains::absence::{AbsenceForm, END_BEFORE_START};
use care_forms::domains::contact::ContactForm;
use care_forms::domains::handover::{HandoverForm, TARGET_STAFF_REQUIRED};
use care_forms::domains::medication::{self, MedicationForm};
use care_forms::domains::medication_status::{FUTURE_DATE, MedicationStatusForm};
use care_forms::{FormController, FormRecord, SaveError, SubmitKind};
use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use serde_json::json;

type Calls<T> = Arc<Mutex<Vec<(T, SubmitKind)>>>;

/// Controller whose handler records every payload and reports success.
fn recording<F: CareForm>() -> (FormController<F>, Calls<F>) {
    let calls: Calls<F> = Arc::default();
    let sink = Arc::clone(&calls);
    let form = FormController::create(F::schema(), move |record: F, kind: SubmitKind| {
        sink.lock().unwrap().push((record, kind));
        async { Ok::<bool, SaveError>(true) }
    });
    (form, calls)
}

fn fill<T: FormRecord>(form: &FormController<T>, fields: serde_json::Value) {
    for (key, value) in fields.as_object().unwrap() {
        form.update_field(key, value.clone()).unwrap();
    }
}

#[tokio::test]
async fn absence_end_before_start() {
    let (form, calls) = recording::<AbsenceForm>();
    fill(
        &form,
        json!({
            "startDateTime": "2025-01-25T14:00",
            "endDateTime": "2025-01-25T12:00",
            "reason": "hospital_visit",
        }),
    );

    assert!(!form.submit().await);
    assert_eq!(form.field_error("endDateTime").as_deref(), Some(END_BEFORE_START));
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn medication_end_before_start() {
    let (form, calls) = recording::<MedicationForm>();
    fill(
        &form,
        json!({
            "medicationName": "アムロジピン錠5mg",
            "dosage": "1錠",
            "frequency": "1日1回",
            "timing": ["朝食後"],
            "startDate": "2025-01-15",
            "endDate": "2024-12-31",
        }),
    );

    assert!(!form.submit().await);
    assert_eq!(
        form.field_error("endDate").as_deref(),
        Some(medication::END_BEFORE_START)
    );
    assert_eq!(form.field_errors().len(), 1);
    assert!(calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn contact_valid_input_is_saved_once_with_exact_payload() {
    let (form, calls) = recording::<ContactForm>();
    fill(
        &form,
        json!({
            "name": "山田 太郎",
            "relationship": "長男",
            "phone1": "090-1234-5678",
            "email": "taro@example.jp",
            "type": "連絡先",
        }),
    );
    let expected = ContactForm {
        name: "山田 太郎".into(),
        relationship: "長男".into(),
        phone1: "090-1234-5678".into(),
        email: "taro@example.jp".into(),
        contact_type: "連絡先".into(),
        ..ContactForm::default()
    };
    assert_eq!(form.values(), expected);

    assert!(form.submit().await);
    assert_eq!(*calls.lock().unwrap(), vec![(expected, SubmitKind::Submit)]);
    assert!(form.field_errors().is_empty());
    assert_eq!(form.general_error(), None);
}

#[tokio::test]
async fn handover_draft_still_requires_targets() {
    let (form, calls) = recording::<HandoverForm>();
    fill(
        &form,
        json!({
            "title": "夜勤からの申し送り",
            "content": "203号室の方、夜間に2回起床されました",
        }),
    );

    assert!(!form.save_draft().await);
    assert_eq!(
        form.field_error("targetStaffIds").as_deref(),
        Some(TARGET_STAFF_REQUIRED)
    );
    assert!(calls.lock().unwrap().is_empty());
    assert!(!form.is_saving_draft());

    form.update_field("targetStaffIds", json!(["staff-3"])).unwrap();
    assert!(form.save_draft().await);
    let calls = calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, SubmitKind::Draft);
    assert_eq!(calls[0].0.target_staff_ids, vec!["staff-3"]);
}

#[tokio::test]
async fn medication_status_uses_the_pinned_date() {
    let (form, calls) = recording::<MedicationStatusForm>();
    let form = form.with_today(NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
    fill(
        &form,
        json!({
            "medicationId": "med-7",
            "date": "2025-01-21",
            "timing": "bedtime",
            "status": "taken",
        }),
    );

    assert!(!form.submit().await);
    assert_eq!(form.field_error("date").as_deref(), Some(FUTURE_DATE));

    form.update_field("date", "2025-01-20").unwrap();
    assert!(form.submit().await);
    assert_eq!(calls.lock().unwrap().len(), 1);
}
