//! Form validation and submission pipeline for the care facility desk.
//!
//! The crate is split the same way the form system is layered:
//! - `field` / `schema`: declarative validation rules per domain record
//! - `session`: mutable editing state of one form instance
//! - `controller`: field updates plus the submission coordinator (plain and draft/final)
//! - `domains`: the concrete schemas (absence, medication, handover, ...)
//! - `status`: resident presence derived from absence records
//! - `care_board`: board colours for care records and resident presence
//!
//! Typical usage:
//! ```ignore
//! use care_forms::{FormController, SubmitKind, SaveError};
//! use care_forms::domains::{CareForm, absence::AbsenceForm};
//!
//! let form = FormController::create(AbsenceForm::schema(), |record: AbsenceForm, _kind: SubmitKind| async move {
//!     api.store_absence(record).await.map_err(|e| SaveError::Other(e.to_string()))
//! });
//! form.update_field("startDateTime", "2025-01-25T10:00")?;
//! let saved = form.submit().await;
//! ```

pub mod care_board;
pub mod config;
pub mod controller;
pub mod dates;
pub mod domains;
pub mod errors;
pub mod field;
pub mod schema;
pub mod session;
pub mod status;

pub use config::{FormsConfig, Messages};
pub use controller::{FormController, SaveHandler, SubmitKind};
pub use errors::{FormError, SaveError};
pub use field::{FieldError, FormField, FormFieldKind};
pub use schema::{FormRecord, FormSchema, ValidationContext, ValidationResult};
pub use session::{FormSession, SessionMode, ValidationTrigger};
