//! In-memory record store standing in for the facility API.
//!
//! Final submissions and drafts are kept apart. Failures can be simulated
//! to exercise the error paths of the submission coordinator.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use care_forms::{FormRecord, SaveError, SaveHandler, SubmitKind};
use chrono::{DateTime, Local};
use clap::ValueEnum;
use futures::future::BoxFuture;
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

/// Failure mode of the store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum Failure {
    #[default]
    None,
    /// Connection errors on every save.
    Network,
    /// The backend answers "not saved".
    Decline,
    /// Saves never answer (ends in the configured timeout).
    Hang,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredRecord<T> {
    pub id: Uuid,
    pub kind: SubmitKind,
    pub saved_at: DateTime<Local>,
    pub record: T,
}

#[derive(Debug)]
struct Shelves<T> {
    records: Vec<StoredRecord<T>>,
    drafts: Vec<StoredRecord<T>>,
}

pub struct MemoryStore<T> {
    shelves: Arc<Mutex<Shelves<T>>>,
    failure: Failure,
    latency: Duration,
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            shelves: Arc::clone(&self.shelves),
            failure: self.failure,
            latency: self.latency,
        }
    }
}

impl<T: FormRecord> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: FormRecord> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            shelves: Arc::new(Mutex::new(Shelves {
                records: Vec::new(),
                drafts: Vec::new(),
            })),
            failure: Failure::None,
            latency: Duration::ZERO,
        }
    }

    pub fn with_failure(mut self, failure: Failure) -> Self {
        self.failure = failure;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Final (and single-path) submissions, oldest first.
    pub fn records(&self) -> Vec<StoredRecord<T>> {
        self.shelves().records.clone()
    }

    pub fn drafts(&self) -> Vec<StoredRecord<T>> {
        self.shelves().drafts.clone()
    }

    pub fn last_saved(&self) -> Option<StoredRecord<T>> {
        let shelves = self.shelves();
        shelves
            .records
            .iter()
            .chain(shelves.drafts.iter())
            .max_by_key(|stored| stored.saved_at)
            .cloned()
    }

    fn put(&self, record: T, kind: SubmitKind) -> Uuid {
        let stored = StoredRecord {
            id: Uuid::new_v4(),
            kind,
            saved_at: Local::now(),
            record,
        };
        let id = stored.id;
        let mut shelves = self.shelves();
        if kind.is_draft() {
            shelves.drafts.push(stored);
        } else {
            shelves.records.push(stored);
        }
        debug!("stored {kind} as {id}");
        id
    }

    fn shelves(&self) -> std::sync::MutexGuard<'_, Shelves<T>> {
        self.shelves.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: FormRecord> SaveHandler<T> for MemoryStore<T> {
    fn save(&self, record: T, kind: SubmitKind) -> BoxFuture<'static, Result<bool, SaveError>> {
        let store = self.clone();
        Box::pin(async move {
            if !store.latency.is_zero() {
                tokio::time::sleep(store.latency).await;
            }
            match store.failure {
                Failure::None => {
                    store.put(record, kind);
                    Ok(true)
                }
                Failure::Network => Err(SaveError::Network("connection refused".to_string())),
                Failure::Decline => Ok(false),
                Failure::Hang => futures::future::pending().await,
            }
        })
    }
}
