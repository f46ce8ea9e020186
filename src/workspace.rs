use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::VbmsConfig;
use crate::error::{Result, VbmsError};
use crate::repository::Repository;
use crate::storage::{SqliteStore, STORE_DB};

pub const VBMS_DIR: &str = ".vbms";

/// Create `.vbms/` under `root` with an empty store and default config.
pub fn init(root: &Path) -> Result<Repository<SqliteStore>> {
    let vbms_dir = root.join(VBMS_DIR);

    if vbms_dir.exists() {
        return Err(VbmsError::AlreadyInitialized);
    }

    fs::create_dir_all(&vbms_dir)?;

    let config = VbmsConfig::default();
    config.save(&vbms_dir)?;
    let store = SqliteStore::open(&vbms_dir)?;

    debug!(dir = %vbms_dir.display(), "workspace initialized");
    Ok(Repository::new(store, config))
}

/// Open the workspace under `root`.
pub fn open(root: &Path) -> Result<Repository<SqliteStore>> {
    let vbms_dir = root.join(VBMS_DIR);

    if !vbms_dir.join(STORE_DB).exists() {
        return Err(VbmsError::NotInitialized);
    }

    let config = VbmsConfig::load(&vbms_dir)?;
    let store = SqliteStore::open(&vbms_dir)?;
    Ok(Repository::new(store, config))
}

/// Find the workspace root by walking up from the current directory
pub fn find_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(VBMS_DIR).exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}
