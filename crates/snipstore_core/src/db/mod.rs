//! Database layer for snipstore.

/// Document storage helpers.
pub mod document;
/// Table definitions.
pub mod tables;

use crate::error::AppError;
use crate::models::document::{Document, Extension};
use std::path::Path;
use std::sync::Arc;


/// Id-keyed document persistence used by [`crate::DocumentHandler`].
///
/// Implementations are shared across concurrent requests and must arbitrate
/// concurrent `create` calls for the same id themselves.
pub trait DocumentStore: Send + Sync {
    /// Report whether a document with `id` is stored. Has no side effects.
    ///
    /// # Errors
    /// Returns an error only when the underlying storage fails.
    fn exists(&self, id: &str) -> Result<bool, AppError>;

    /// Persist a new document under `id` if, and only if, `id` is free.
    ///
    /// # Returns
    /// The stored document.
    ///
    /// # Errors
    /// Returns [`AppError::DuplicateKey`] when `id` is already taken, or a
    /// storage error.
    fn create(&self, id: &str, content: &str, extension: Extension)
        -> Result<Document, AppError>;

    /// Fetch a document by id.
    ///
    /// # Returns
    /// `Ok(None)` when no document has this id.
    ///
    /// # Errors
    /// Returns an error only when the underlying storage fails.
    fn get(&self, id: &str) -> Result<Option<Document>, AppError>;
}

impl<S: DocumentStore + ?Sized> DocumentStore for Arc<S> {
    fn exists(&self, id: &str) -> Result<bool, AppError> {
        (**self).exists(id)
    }

    fn create(
        &self,
        id: &str,
        content: &str,
        extension: Extension,
    ) -> Result<Document, AppError> {
        (**self).create(id, content, extension)
    }

    fn get(&self, id: &str) -> Result<Option<Document>, AppError> {
        (**self).get(id)
    }
}

/// Database handle with access to the redb-backed stores.
pub struct Database {
    pub db: Arc<redb::Database>,
    pub documents: document::DocumentDb,
}

impl Database {
    /// Open the database directory and initialize tables.
    ///
    /// `path` is a directory; the redb file lives inside it as
    /// [`tables::REDB_FILE_NAME`].
    ///
    /// # Returns
    /// A fully initialized [`Database`].
    ///
    /// # Errors
    /// Returns an error if the directory cannot be created or redb cannot open
    /// the file.
    pub fn new(path: &str) -> Result<Self, AppError> {
        let dir = Path::new(path);
        std::fs::create_dir_all(dir).map_err(|err| {
            AppError::StorageMessage(format!(
                "Failed to create database directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let file = dir.join(tables::REDB_FILE_NAME);
        let db = match redb::Database::create(&file) {
            Ok(db) => Arc::new(db),
            Err(redb::DatabaseError::DatabaseAlreadyOpen) => {
                return Err(AppError::StorageMessage(format!(
                    "Database '{}' is already open in another process.\n\
                    Stop the other snipstore instance, or set DB_PATH to a different location.",
                    file.display()
                )));
            }
            Err(err) => return Err(err.into()),
        };
        tracing::debug!("Opened document database at {}", file.display());

        Self::from_shared(db)
    }

    /// Build a handle from an already-open redb instance.
    ///
    /// # Errors
    /// Returns an error if table initialization fails.
    pub fn from_shared(db: Arc<redb::Database>) -> Result<Self, AppError> {
        Ok(Self {
            documents: document::DocumentDb::new(db.clone())?,
            db,
        })
    }

    /// Clone this handle for another subsystem in the same process.
    ///
    /// Avoids reopening the file, which redb would refuse while it is held.
    pub fn share(&self) -> Self {
        Self {
            db: self.db.clone(),
            documents: self.documents.clone(),
        }
    }
}
