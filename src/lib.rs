pub mod cli;
pub mod config;
pub mod derivation;
pub mod entity;
pub mod error;
pub mod repository;
pub mod storage;
pub mod warnings;
pub mod workspace;

pub use config::VbmsConfig;
pub use error::{Result, VbmsError};
pub use repository::Repository;
pub use storage::{DocumentStore, SqliteStore};
