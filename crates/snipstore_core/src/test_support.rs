//! Shared test-only helpers for snipstore_core.

use crate::db::DocumentStore;
use crate::error::AppError;
use crate::ids::IdGenerator;
use crate::models::document::{Document, Extension};
use crate::Database;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Creates an isolated temporary database and returns it with the temp dir.
///
/// Keep the [`TempDir`] alive for the full test to preserve the backing files.
///
/// # Panics
/// Panics if temp-dir creation or database initialization fails.
pub(crate) fn setup_temp_db() -> (Database, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let db_path = temp_dir.path().join("db");
    let db = Database::new(db_path.to_str().expect("db path")).expect("db");
    (db, temp_dir)
}

/// Take one unit from `counter` if any remain.
fn take_one(counter: &AtomicUsize) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

fn poisoned() -> AppError {
    AppError::StorageMessage("memory store lock poisoned".to_string())
}

/// In-memory [`DocumentStore`] with knobs for injecting latency, collisions,
/// lost races, and failures. Records every id it is asked about.
#[derive(Default)]
pub(crate) struct MemoryStore {
    documents: Mutex<HashMap<String, Document>>,
    exists_delay: Duration,
    forced_collisions: AtomicUsize,
    stolen_creates: AtomicUsize,
    failing: bool,
    failing_creates: bool,
    exists_calls: Mutex<Vec<String>>,
    create_calls: Mutex<Vec<String>>,
}

impl MemoryStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Sleep inside every `exists` call to widen the check-then-create window.
    pub(crate) fn with_exists_delay(mut self, delay: Duration) -> Self {
        self.exists_delay = delay;
        self
    }

    /// Report the first `count` candidates as taken.
    pub(crate) fn with_forced_collisions(self, count: usize) -> Self {
        self.forced_collisions.store(count, Ordering::SeqCst);
        self
    }

    /// Make the first `count` creates lose to a concurrent writer that claims
    /// the same id just before the insert.
    pub(crate) fn with_stolen_creates(self, count: usize) -> Self {
        self.stolen_creates.store(count, Ordering::SeqCst);
        self
    }

    /// Fail every operation with a storage error.
    pub(crate) fn failing() -> Self {
        Self {
            failing: true,
            ..Self::default()
        }
    }

    /// Serve reads normally but fail every `create` with a storage error.
    pub(crate) fn failing_creates() -> Self {
        Self {
            failing_creates: true,
            ..Self::default()
        }
    }

    pub(crate) fn exists_calls(&self) -> Vec<String> {
        self.exists_calls.lock().expect("exists calls").clone()
    }

    pub(crate) fn create_calls(&self) -> Vec<String> {
        self.create_calls.lock().expect("create calls").clone()
    }

    pub(crate) fn len(&self) -> usize {
        self.documents.lock().expect("documents").len()
    }

    fn documents(&self) -> Result<MutexGuard<'_, HashMap<String, Document>>, AppError> {
        self.documents.lock().map_err(|_| poisoned())
    }

    fn check_failing(&self) -> Result<(), AppError> {
        if self.failing {
            return Err(AppError::StorageMessage("storage offline".to_string()));
        }
        Ok(())
    }
}

impl DocumentStore for MemoryStore {
    fn exists(&self, id: &str) -> Result<bool, AppError> {
        self.check_failing()?;
        self.exists_calls
            .lock()
            .map_err(|_| poisoned())?
            .push(id.to_string());
        if !self.exists_delay.is_zero() {
            thread::sleep(self.exists_delay);
        }
        if take_one(&self.forced_collisions) {
            return Ok(true);
        }
        Ok(self.documents()?.contains_key(id))
    }

    fn create(
        &self,
        id: &str,
        content: &str,
        extension: Extension,
    ) -> Result<Document, AppError> {
        self.check_failing()?;
        self.create_calls
            .lock()
            .map_err(|_| poisoned())?
            .push(id.to_string());
        if self.failing_creates {
            return Err(AppError::StorageMessage("write rejected".to_string()));
        }
        let mut documents = self.documents()?;
        if take_one(&self.stolen_creates) {
            documents.insert(
                id.to_string(),
                Document::new(id.to_string(), "claimed elsewhere".to_string(), Extension::Txt),
            );
        }
        if documents.contains_key(id) {
            return Err(AppError::DuplicateKey(id.to_string()));
        }
        let document = Document::new(id.to_string(), content.to_string(), extension);
        documents.insert(id.to_string(), document.clone());
        Ok(document)
    }

    fn get(&self, id: &str) -> Result<Option<Document>, AppError> {
        self.check_failing()?;
        Ok(self.documents()?.get(id).cloned())
    }
}

/// Id generator that replays a fixed list of candidates, in order.
pub(crate) struct ScriptedIdGenerator {
    candidates: Mutex<VecDeque<String>>,
}

impl ScriptedIdGenerator {
    pub(crate) fn new<I, T>(candidates: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            candidates: Mutex::new(candidates.into_iter().map(Into::into).collect()),
        }
    }
}

impl IdGenerator for ScriptedIdGenerator {
    fn generate(&self, _length: usize) -> String {
        self.candidates
            .lock()
            .expect("candidates")
            .pop_front()
            .expect("scripted id generator ran out of candidates")
    }
}
