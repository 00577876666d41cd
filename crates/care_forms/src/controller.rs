//! Form controller and submission coordinator.
//!
//! `FormController` binds a `FormSchema` to a `FormSession` and to the
//! injected `SaveHandler`. It is the only thing that mutates a session:
//!
//! - `update_field` / `update_record`: synchronous local edits, optionally
//!   re-validated right away (`ValidationTrigger::OnChange`)
//! - `submit` (plain forms), `save_draft` / `submit_final` (draft/final forms):
//!   validate a snapshot → call the save handler → map the outcome
//!
//! Guarantees:
//! - At most one save per flag is in flight; a second submit while the first
//!   is pending returns `false` without calling the handler.
//! - Invalid input never reaches the handler.
//! - Handler errors, panics and timeouts end as a general error message and
//!   a `false` return, never as an error/panic in the caller.
//! - The submitting flag is cleared on every path, including when the submit
//!   future is dropped mid-flight.
//!
//! The controller is a cheap `Clone` handle; all clones share one session.

use std::any::Any;
use std::collections::BTreeMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::NaiveDate;
use futures::FutureExt;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::Display;
use tracing::{debug, info, warn};

use crate::config::{FormsConfig, Messages};
use crate::errors::{FormError, SaveError};
use crate::schema::{FormRecord, FormSchema, ValidationContext};
use crate::session::{FormSession, ValidationTrigger};

/// Which submission path triggered a save.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum SubmitKind {
    /// Single-path forms.
    Submit,
    /// Draft save of a draft/final form.
    Draft,
    /// Final submission of a draft/final form.
    Final,
}

impl SubmitKind {
    pub fn is_draft(self) -> bool {
        matches!(self, SubmitKind::Draft)
    }
}

/// Persistence boundary of a form (API client, mock store, ...).
///
/// `Ok(true)` means saved, `Ok(false)` means the collaborator declined.
/// Closures `Fn(T, SubmitKind) -> impl Future<Output = Result<bool, SaveError>>`
/// implement this trait.
pub trait SaveHandler<T>: Send + Sync + 'static {
    fn save(&self, record: T, kind: SubmitKind) -> BoxFuture<'static, Result<bool, SaveError>>;
}

impl<T, F, Fut> SaveHandler<T> for F
where
    F: Fn(T, SubmitKind) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<bool, SaveError>> + Send + 'static,
{
    fn save(&self, record: T, kind: SubmitKind) -> BoxFuture<'static, Result<bool, SaveError>> {
        self(record, kind).boxed()
    }
}

#[derive(Debug, Clone, Default)]
struct ControllerOptions {
    trigger: ValidationTrigger,
    save_timeout: Option<Duration>,
    messages: Messages,
    /// Pinned reference date; `None` uses the local date per validation run.
    today: Option<NaiveDate>,
}

pub struct FormController<T: FormRecord> {
    schema: Arc<FormSchema<T>>,
    session: Arc<Mutex<FormSession<T>>>,
    saver: Arc<dyn SaveHandler<T>>,
    options: Arc<ControllerOptions>,
}

impl<T: FormRecord> Clone for FormController<T> {
    fn clone(&self) -> Self {
        Self {
            schema: Arc::clone(&self.schema),
            session: Arc::clone(&self.session),
            saver: Arc::clone(&self.saver),
            options: Arc::clone(&self.options),
        }
    }
}

impl<T: FormRecord> FormController<T> {
    pub fn new(schema: FormSchema<T>, session: FormSession<T>, saver: impl SaveHandler<T>) -> Self {
        Self {
            schema: Arc::new(schema),
            session: Arc::new(Mutex::new(session)),
            saver: Arc::new(saver),
            options: Arc::new(ControllerOptions::default()),
        }
    }

    /// Controller for a "create" view (record defaults).
    pub fn create(schema: FormSchema<T>, saver: impl SaveHandler<T>) -> Self {
        Self::new(schema, FormSession::new(), saver)
    }

    /// Controller for an "edit" view of `record`.
    pub fn edit(schema: FormSchema<T>, record: T, saver: impl SaveHandler<T>) -> Self {
        Self::new(schema, FormSession::from_existing(record), saver)
    }

    /// Take trigger, timeout and messages from configuration.
    pub fn with_config(mut self, config: &FormsConfig) -> Self {
        let options = Arc::make_mut(&mut self.options);
        options.trigger = config.validation_trigger;
        options.save_timeout = config.save_timeout();
        options.messages = config.messages.clone();
        self
    }

    pub fn with_trigger(mut self, trigger: ValidationTrigger) -> Self {
        Arc::make_mut(&mut self.options).trigger = trigger;
        self
    }

    pub fn with_save_timeout(mut self, timeout: Option<Duration>) -> Self {
        Arc::make_mut(&mut self.options).save_timeout = timeout;
        self
    }

    /// Pin the reference date of "not in the future" rules.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        Arc::make_mut(&mut self.options).today = Some(today);
        self
    }

    pub fn schema(&self) -> &FormSchema<T> {
        &self.schema
    }

    pub fn trigger(&self) -> ValidationTrigger {
        self.options.trigger
    }

    /// A copy of the current session, for rendering.
    pub fn session(&self) -> FormSession<T> {
        self.lock().clone()
    }

    pub fn values(&self) -> T {
        self.lock().values().clone()
    }

    pub fn field_errors(&self) -> BTreeMap<String, String> {
        self.lock().field_errors().clone()
    }

    pub fn field_error(&self, key: &str) -> Option<String> {
        self.lock().field_error(key).map(str::to_string)
    }

    pub fn general_error(&self) -> Option<String> {
        self.lock().general_error().map(str::to_string)
    }

    /// Dismiss the error banner.
    pub fn clear_general_error(&self) {
        self.lock().clear_general_error();
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting()
    }

    pub fn is_saving_draft(&self) -> bool {
        self.lock().is_saving_draft()
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.lock().has_unsaved_changes()
    }

    /// Set one field by key.
    ///
    /// A value of the wrong type is not applied; the field gets the
    /// type-mismatch message and `FormError::TypeMismatch` is returned.
    pub fn update_field(&self, key: &str, value: impl Into<Value>) -> Result<(), FormError> {
        let mut session = self.lock();
        match session.set_field(key, value.into()) {
            Ok(()) => {}
            Err(err @ FormError::TypeMismatch { .. }) => {
                debug!("'{}': rejected value for {key}: {err}", self.schema.title);
                session.record_type_error(key, self.options.messages.type_mismatch.clone());
                return Err(err);
            }
            Err(err) => return Err(err),
        }

        if self.options.trigger == ValidationTrigger::OnChange {
            let result = self.schema.validate(session.values(), &self.context());
            session.publish_touched(result);
        }
        Ok(())
    }

    /// Typed edit of the record.
    pub fn update_record(&self, edit: impl FnOnce(&mut T)) {
        let mut session = self.lock();
        session.edit_record(edit);
        if self.options.trigger == ValidationTrigger::OnChange {
            let result = self.schema.validate(session.values(), &self.context());
            session.publish_touched(result);
        }
    }

    /// Validate the whole record and publish every error.
    pub fn validate(&self) -> bool {
        let mut session = self.lock();
        let result = self.schema.validate(session.values(), &self.context());
        session.publish_all(self.schema.fields.iter().map(|f| f.key), result);
        session.field_errors().is_empty()
    }

    /// Discard edits and errors.
    pub fn reset(&self) {
        self.lock().reset();
    }

    /// Submit a single-path form.
    pub async fn submit(&self) -> bool {
        self.run_submission(SubmitKind::Submit).await
    }

    /// Save a draft of a draft/final form.
    pub async fn save_draft(&self) -> bool {
        self.run_submission(SubmitKind::Draft).await
    }

    /// Final submission of a draft/final form.
    pub async fn submit_final(&self) -> bool {
        self.run_submission(SubmitKind::Final).await
    }

    async fn run_submission(&self, kind: SubmitKind) -> bool {
        let title = &self.schema.title;

        let payload = {
            let mut session = self.lock();
            if session.is_busy(kind, self.schema.is_dual_submit()) {
                debug!("'{title}': {kind} ignored, a save is already in flight");
                return false;
            }

            let result = self.schema.validate(session.values(), &self.context());
            session.publish_all(self.schema.fields.iter().map(|f| f.key), result);
            if !session.field_errors().is_empty() {
                info!(
                    "'{title}': {kind} blocked by {} field error(s)",
                    session.field_errors().len()
                );
                return false;
            }

            session.begin_submission(kind);
            session.values().clone()
        };

        let mut in_flight = InFlight {
            session: Arc::clone(&self.session),
            kind,
            armed: true,
        };
        let outcome = self.call_save(payload.clone(), kind).await;

        let mut session = self.lock();
        session.end_submission(kind);
        in_flight.armed = false;

        match outcome {
            Ok(true) => {
                info!("'{title}': {kind} saved");
                session.complete_submission(payload);
                true
            }
            Ok(false) => {
                warn!("'{title}': {kind} declined by the save handler");
                let message = self
                    .schema
                    .save_failed()
                    .map(str::to_string)
                    .unwrap_or_else(|| self.options.messages.save_failed.clone());
                session.set_general_error(message);
                false
            }
            Err(err) => {
                warn!("'{title}': {kind} failed: {err}");
                session.set_general_error(self.describe_failure(&err));
                false
            }
        }
    }

    async fn call_save(&self, record: T, kind: SubmitKind) -> Result<bool, SaveError> {
        let saver = Arc::clone(&self.saver);
        let future = match std::panic::catch_unwind(AssertUnwindSafe(|| saver.save(record, kind))) {
            Ok(future) => future,
            Err(panic) => return Err(panicked(panic.as_ref())),
        };

        let guarded = AssertUnwindSafe(future).catch_unwind();
        let joined = match self.options.save_timeout {
            Some(limit) => match tokio::time::timeout(limit, guarded).await {
                Ok(joined) => joined,
                Err(_) => return Err(SaveError::Timeout(limit)),
            },
            None => guarded.await,
        };
        joined.unwrap_or_else(|panic| Err(panicked(panic.as_ref())))
    }

    fn describe_failure(&self, err: &SaveError) -> String {
        let messages = &self.options.messages;
        if err.is_network() {
            return messages.network.clone();
        }
        match err {
            SaveError::Timeout(_) => messages.timeout.clone(),
            _ => err
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| messages.unexpected.clone()),
        }
    }

    fn context(&self) -> ValidationContext {
        let mut cx = match self.options.today {
            Some(today) => ValidationContext::on(today),
            None => ValidationContext::today(),
        };
        cx.type_mismatch = self.options.messages.type_mismatch.clone();
        cx
    }

    fn lock(&self) -> MutexGuard<'_, FormSession<T>> {
        lock(&self.session)
    }
}

/// Clears the submitting flag if the submit future goes away before it
/// could do so itself (dropped/cancelled while awaiting the handler).
struct InFlight<T: FormRecord> {
    session: Arc<Mutex<FormSession<T>>>,
    kind: SubmitKind,
    armed: bool,
}

impl<T: FormRecord> Drop for InFlight<T> {
    fn drop(&mut self) {
        if self.armed {
            lock(&self.session).end_submission(self.kind);
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A panicking handler is reported like an error without a message.
/// The panic text only goes to the log, never to the user facing banner.
fn panicked(panic: &(dyn Any + Send)) -> SaveError {
    let detail = panic
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| panic.downcast_ref::<String>().cloned())
        .unwrap_or_default();
    warn!("save handler panicked: {detail}");
    SaveError::Other(String::new())
}
