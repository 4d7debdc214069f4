//! redb table definitions shared by storage modules.

use redb::TableDefinition;

/// File name for the redb database within the configured DB directory.
pub const REDB_FILE_NAME: &str = "data.redb";

/// Canonical document rows (`Document`, bincode-encoded), keyed by id.
pub const DOCUMENTS: TableDefinition<&str, &[u8]> = TableDefinition::new("documents");
