//! Root crate facade for the snipstore server and storage core.

pub use snipstore_server::{
    config, create_app, db, error, handlers, models, resolve_bind_address, serve_router,
    AppError, AppState, Config, Database, DocumentHandler, DEFAULT_PORT,
};
