//! Shared integration-test server bootstrap helpers.

use axum_test::TestServer;
use snipstore_server::{config::IdConfig, create_app, AppState, Config, Database};
use std::path::Path;
use tempfile::TempDir;

pub(crate) fn test_config_for_db_path(db_path: &Path) -> Config {
    Config {
        db_path: db_path.to_str().expect("db path").to_string(),
        port: 0,
        bind: None,
        max_document_size: 1024,
        allow_public_access: false,
        id: IdConfig::default(),
    }
}

pub(crate) fn test_server_for_config(config: Config) -> TestServer {
    let db = Database::new(config.db_path.as_str()).expect("open db");
    let state = AppState::new(config, db).expect("state");
    TestServer::new(create_app(state)).expect("server")
}

pub(crate) fn setup_test_server() -> (TestServer, TempDir) {
    let temp_dir = TempDir::new().expect("temp dir");
    let config = test_config_for_db_path(&temp_dir.path().join("db"));
    (test_server_for_config(config), temp_dir)
}
