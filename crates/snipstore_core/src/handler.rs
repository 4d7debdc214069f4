//! Document create/read orchestration.
//!
//! Allocation draws random candidates and checks them against the store. The
//! store's `create` is an atomic create-if-absent, so a candidate that passed
//! the existence check but lost a race to a concurrent request surfaces as
//! [`AppError::DuplicateKey`]; that costs one attempt and allocation starts
//! over with a fresh candidate.

use crate::config::IdConfig;
use crate::db::DocumentStore;
use crate::error::AppError;
use crate::ids::{is_well_formed_id, IdGenerator, RandomIdGenerator};
use crate::models::document::{Document, Extension};

/// Allocates ids and serves document create/read requests over a store.
pub struct DocumentHandler<S, G = RandomIdGenerator> {
    config: IdConfig,
    store: S,
    generator: G,
}

impl<S: DocumentStore> DocumentHandler<S> {
    /// Create a handler that draws ids from [`RandomIdGenerator`].
    ///
    /// # Errors
    /// Returns [`AppError::InvalidConfig`] when `config` cannot produce ids.
    pub fn new(config: IdConfig, store: S) -> Result<Self, AppError> {
        Self::with_generator(config, store, RandomIdGenerator)
    }
}

impl<S: DocumentStore, G: IdGenerator> DocumentHandler<S, G> {
    /// Create a handler with a caller-supplied id generator.
    ///
    /// # Errors
    /// Returns [`AppError::InvalidConfig`] when `config` cannot produce ids.
    pub fn with_generator(config: IdConfig, store: S, generator: G) -> Result<Self, AppError> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            generator,
        })
    }

    /// Id settings this handler allocates with.
    pub fn config(&self) -> &IdConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn budget_exhausted(&self, attempts: u32) -> bool {
        self.config
            .max_attempts
            .is_some_and(|max| attempts >= max)
    }

    /// Draw candidates until one is not present in the store.
    ///
    /// `attempts` carries across calls so duplicate-key retries in
    /// [`Self::new_document`] share a single budget with collisions here.
    fn choose_id(&self, attempts: &mut u32) -> Result<String, AppError> {
        loop {
            if self.budget_exhausted(*attempts) {
                tracing::warn!(
                    attempts = *attempts,
                    id_length = self.config.id_length,
                    "Document id allocation exhausted"
                );
                return Err(AppError::AllocationExhausted {
                    attempts: *attempts,
                });
            }
            *attempts = attempts.saturating_add(1);

            let candidate = self.generator.generate(self.config.id_length);
            if !self.store.exists(&candidate)? {
                return Ok(candidate);
            }
            tracing::debug!(attempt = *attempts, "Document id collision; regenerating");
        }
    }

    /// Allocate a fresh id and persist a new document under it.
    ///
    /// # Arguments
    /// - `content`: Document body; stored verbatim.
    /// - `extension`: File-type tag.
    ///
    /// # Returns
    /// The stored document, owned by the caller.
    ///
    /// # Errors
    /// Returns [`AppError::AllocationExhausted`] when the attempt cap is hit,
    /// or propagates storage failures. Never returns [`AppError::DuplicateKey`].
    pub fn new_document(&self, content: &str, extension: Extension) -> Result<Document, AppError> {
        let mut attempts = 0u32;
        loop {
            let id = self.choose_id(&mut attempts)?;
            match self.store.create(&id, content, extension) {
                Ok(document) => {
                    tracing::info!(
                        id = %document.id,
                        extension = %document.extension,
                        bytes = document.content.len(),
                        "Created document"
                    );
                    return Ok(document);
                }
                Err(AppError::DuplicateKey(taken)) => {
                    tracing::warn!(
                        id = %taken,
                        attempt = attempts,
                        "Document id claimed concurrently; retrying allocation"
                    );
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Fetch a document by id.
    ///
    /// Ids that no generator could have produced are reported missing
    /// without a store lookup.
    ///
    /// # Returns
    /// `Ok(None)` when no document has this id.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn get_document(&self, id: &str) -> Result<Option<Document>, AppError> {
        if !is_well_formed_id(id) {
            return Ok(None);
        }
        self.store.get(id)
    }

    /// Fetch only the content of a document.
    ///
    /// # Returns
    /// `Ok(None)` when no document has this id.
    ///
    /// # Errors
    /// Propagates storage failures.
    pub fn get_raw_document(&self, id: &str) -> Result<Option<String>, AppError> {
        Ok(self.get_document(id)?.map(|document| document.content))
    }
}
