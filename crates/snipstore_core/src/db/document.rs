//! Document storage operations backed by redb.

use super::tables::DOCUMENTS;
use super::DocumentStore;
use crate::error::AppError;
use crate::models::document::{Document, Extension};
use redb::{ReadableDatabase, ReadableTable, ReadableTableMetadata};
use std::sync::Arc;

/// Accessor for the `documents` redb table.
#[derive(Clone)]
pub struct DocumentDb {
    db: Arc<redb::Database>,
}

fn deserialize_document(bytes: &[u8]) -> Result<Document, AppError> {
    Ok(bincode::deserialize(bytes)?)
}

impl DocumentDb {
    /// Create the `documents` table if it does not exist yet.
    ///
    /// # Errors
    /// Returns an error when redb transaction/table initialization fails.
    pub fn new(db: Arc<redb::Database>) -> Result<Self, AppError> {
        let write_txn = db.begin_write()?;
        write_txn.open_table(DOCUMENTS)?;
        write_txn.commit()?;
        Ok(Self { db })
    }

    /// Number of stored documents.
    ///
    /// # Errors
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<u64, AppError> {
        let read_txn = self.db.begin_read()?;
        let documents = read_txn.open_table(DOCUMENTS)?;
        Ok(documents.len()?)
    }
}

impl DocumentStore for DocumentDb {
    fn exists(&self, id: &str) -> Result<bool, AppError> {
        let read_txn = self.db.begin_read()?;
        let documents = read_txn.open_table(DOCUMENTS)?;
        Ok(documents.get(id)?.is_some())
    }

    /// Check and insert run in one write transaction. redb admits a single
    /// writer at a time, so two racing creates for one id cannot both commit.
    fn create(
        &self,
        id: &str,
        content: &str,
        extension: Extension,
    ) -> Result<Document, AppError> {
        let document = Document::new(id.to_string(), content.to_string(), extension);
        let encoded = bincode::serialize(&document)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut documents = write_txn.open_table(DOCUMENTS)?;
            if documents.get(id)?.is_some() {
                return Err(AppError::DuplicateKey(id.to_string()));
            }
            documents.insert(id, encoded.as_slice())?;
        }
        write_txn.commit()?;
        Ok(document)
    }

    fn get(&self, id: &str) -> Result<Option<Document>, AppError> {
        let read_txn = self.db.begin_read()?;
        let documents = read_txn.open_table(DOCUMENTS)?;
        match documents.get(id)? {
            Some(value) => Ok(Some(deserialize_document(value.value())?)),
            None => Ok(None),
        }
    }
}
