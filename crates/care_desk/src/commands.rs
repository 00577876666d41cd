//! Subcommand implementations.
//!
//! Every command returns `Ok(true)` when the record is valid / saved, so
//! `main` can turn the outcome into the exit code.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::time::Duration;

use care_forms::domains::absence::AbsenceForm;
use care_forms::domains::{CareForm, FormKind, FormVisitor};
use care_forms::care_board::{BoardColor, status_color};
use care_forms::status::{ResidentStatus, derive_status};
use care_forms::{FormController, FormError, FormRecord, SubmitKind, ValidationContext};
use chrono::{Local, NaiveDate, NaiveDateTime};
use color_eyre::Result;
use color_eyre::eyre::{WrapErr, bail, eyre};
use futures::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;
use strum::IntoEnumIterator;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::DeskConfig;
use crate::store::{Failure, MemoryStore};

/// Read a JSON file.
pub fn read_record(path: &Path) -> Result<Value> {
    let text = fs::read_to_string(path)
        .wrap_err_with(|| format!("could not read {}", path.display()))?;
    serde_json::from_str(&text).wrap_err_with(|| format!("{} is not valid JSON", path.display()))
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_field_errors(errors: &BTreeMap<String, String>) {
    for (field, message) in errors {
        println!("  {field}: {message}");
    }
}

fn context(today: Option<NaiveDate>) -> ValidationContext {
    today.map_or_else(ValidationContext::today, ValidationContext::on)
}

/// `forms`: list every form with its fields.
pub fn forms(json: bool) -> Result<bool> {
    let outlines: Vec<_> = FormKind::iter().map(FormKind::outline).collect();
    if json {
        print_json(&outlines)?;
        return Ok(true);
    }
    for outline in outlines {
        let dual = if outline.dual_submit { " [下書き保存可]" } else { "" };
        println!("{} - {}{dual}", outline.kind, outline.title);
        for field in outline.fields {
            let required = if field.required { " *" } else { "" };
            println!("    {} ({}){required}", field.key, field.label);
        }
    }
    Ok(true)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub form: FormKind,
    pub valid: bool,
    pub field_errors: BTreeMap<String, String>,
}

/// `validate`: run the schema over a JSON record.
pub fn validate(kind: FormKind, file: &Path, today: Option<NaiveDate>, json: bool) -> Result<bool> {
    let record = read_record(file)?;
    let result = kind
        .validate_json(&record, &context(today))
        .wrap_err_with(|| format!("{} is not a {kind} record", file.display()))?;

    let report = ValidationReport {
        form: kind,
        valid: result.is_valid(),
        field_errors: result.into_errors(),
    };
    info!(
        "validated {} as {kind}: {} error(s)",
        file.display(),
        report.field_errors.len()
    );

    if json {
        print_json(&report)?;
    } else if report.valid {
        println!("OK: 入力内容に問題はありません");
    } else {
        println!("入力内容に誤りがあります:");
        print_field_errors(&report.field_errors);
    }
    Ok(report.valid)
}

/// Options of `submit` besides the form kind.
#[derive(Debug, Clone, Default)]
pub struct SubmitRequest {
    pub record: Value,
    pub draft: bool,
    pub edit: bool,
    pub sets: Vec<(String, Value)>,
    pub failure: Failure,
    pub today: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitReport {
    pub form: FormKind,
    pub kind: SubmitKind,
    pub saved: bool,
    pub field_errors: BTreeMap<String, String>,
    pub general_error: Option<String>,
    pub stored_id: Option<Uuid>,
    pub stored: Option<Value>,
}

/// `submit`: feed a JSON record through a form controller into a fresh store.
pub async fn submit(
    kind: FormKind,
    request: SubmitRequest,
    config: &DeskConfig,
    json: bool,
) -> Result<bool> {
    let report = submit_record(kind, request, config).await?;

    if json {
        print_json(&report)?;
    } else if report.saved {
        let id = report.stored_id.map(|id| id.to_string()).unwrap_or_default();
        let what = if report.kind.is_draft() { "下書きを保存しました" } else { "保存しました" };
        println!("{what} ({id})");
    } else {
        if let Some(message) = &report.general_error {
            println!("エラー: {message}");
        }
        if !report.field_errors.is_empty() {
            println!("入力内容に誤りがあります:");
            print_field_errors(&report.field_errors);
        }
    }
    Ok(report.saved)
}

pub async fn submit_record(
    kind: FormKind,
    request: SubmitRequest,
    config: &DeskConfig,
) -> Result<SubmitReport> {
    kind.accept(Submission {
        request,
        config: config.clone(),
    })
    .await
}

struct Submission {
    request: SubmitRequest,
    config: DeskConfig,
}

impl FormVisitor for Submission {
    type Output = BoxFuture<'static, Result<SubmitReport>>;

    fn visit<F: CareForm>(self) -> Self::Output {
        Box::pin(run_submission::<F>(self.request, self.config))
    }
}

async fn run_submission<F: CareForm>(
    request: SubmitRequest,
    config: DeskConfig,
) -> Result<SubmitReport> {
    let schema = F::schema();
    let kind = match (schema.is_dual_submit(), request.draft) {
        (true, true) => SubmitKind::Draft,
        (true, false) => SubmitKind::Final,
        (false, false) => SubmitKind::Submit,
        (false, true) => bail!("{} has no draft mode", F::KIND),
    };

    let store = MemoryStore::<F>::new()
        .with_failure(request.failure)
        .with_latency(Duration::from_millis(config.store.latency_ms));

    // create mode loads the file field by field, after the configuration
    let (form, loaded) = if request.edit {
        let existing: F = serde_json::from_value(request.record)
            .wrap_err_with(|| format!("not a {} record", F::KIND))?;
        (FormController::edit(schema, existing, store.clone()), None)
    } else {
        let fields = match request.record {
            Value::Object(fields) => fields,
            _ => return Err(eyre!(FormError::NotAnObject)),
        };
        (FormController::create(schema, store.clone()), Some(fields))
    };
    let form = form.with_config(&config.forms);
    let form = match request.today {
        Some(today) => form.with_today(today),
        None => form,
    };

    for (key, value) in loaded.into_iter().flatten() {
        apply(&form, &key, value)?;
    }

    for (key, value) in request.sets {
        apply(&form, &key, value)?;
    }

    let saved = match kind {
        SubmitKind::Submit => form.submit().await,
        SubmitKind::Draft => form.save_draft().await,
        SubmitKind::Final => form.submit_final().await,
    };

    let stored = store.last_saved();
    Ok(SubmitReport {
        form: F::KIND,
        kind,
        saved,
        field_errors: form.field_errors(),
        general_error: form.general_error(),
        stored_id: stored.as_ref().map(|s| s.id),
        stored: stored.map(|s| serde_json::to_value(s.record)).transpose()?,
    })
}

/// Set one field. Wrong value types stay in the form as field errors;
/// unknown keys are a usage error.
fn apply<T: FormRecord>(form: &FormController<T>, key: &str, value: Value) -> Result<()> {
    match form.update_field(key, value) {
        Ok(()) => Ok(()),
        Err(err @ FormError::TypeMismatch { .. }) => {
            warn!("{err}");
            Ok(())
        }
        Err(err) => Err(eyre!(err)),
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusReport {
    pub at: NaiveDateTime,
    pub status: ResidentStatus,
    pub label: String,
    pub color: BoardColor,
}

/// `status`: derive the presence of a resident from absence records.
pub fn status(file: &Path, at: Option<NaiveDateTime>, json: bool) -> Result<bool> {
    let report = status_report(file, at)?;
    let at = report.at;
    if json {
        print_json(&report)?;
    } else {
        println!(
            "{} 時点: {} ({})",
            at.format("%Y-%m-%d %H:%M"),
            report.label,
            report.color.hex()
        );
    }
    Ok(true)
}

pub fn status_report(file: &Path, at: Option<NaiveDateTime>) -> Result<StatusReport> {
    let absences: Vec<AbsenceForm> = serde_json::from_value(read_record(file)?)
        .wrap_err_with(|| format!("{} is not a list of absence records", file.display()))?;
    let at = at.unwrap_or_else(|| Local::now().naive_local());
    let status = derive_status(&absences, at);

    Ok(StatusReport {
        at,
        status,
        label: status.to_string(),
        color: status_color(status),
    })
}
