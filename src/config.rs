use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::derivation::EXPIRING_SOON_DAYS;
use crate::entity::{DEFAULT_MAXIMUM, DEFAULT_MINIMUM};
use crate::error::Result;

pub const CONFIG_FILE: &str = "config.yaml";

/// Extra attempts made after a display-id collision before giving up.
pub const DEFAULT_ID_RETRY_LIMIT: u32 = 3;

/// Workspace settings, read from `.vbms/config.yaml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VbmsConfig {
    /// 0 surfaces the first collision unchanged
    pub id_retry_limit: u32,
    pub expiring_soon_days: i64,
    pub inventory_defaults: InventoryDefaults,
}

/// Thresholds applied to new inventory records when none are given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryDefaults {
    pub minimum: i64,
    pub maximum: i64,
}

impl Default for VbmsConfig {
    fn default() -> Self {
        Self {
            id_retry_limit: DEFAULT_ID_RETRY_LIMIT,
            expiring_soon_days: EXPIRING_SOON_DAYS,
            inventory_defaults: InventoryDefaults::default(),
        }
    }
}

impl Default for InventoryDefaults {
    fn default() -> Self {
        Self {
            minimum: DEFAULT_MINIMUM,
            maximum: DEFAULT_MAXIMUM,
        }
    }
}

impl VbmsConfig {
    /// Load the config from `vbms_dir`, falling back to defaults if absent.
    pub fn load(vbms_dir: &Path) -> Result<Self> {
        let path = vbms_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(&path)?;
        let config = serde_yaml::from_str(&raw)?;
        Ok(config)
    }

    pub fn save(&self, vbms_dir: &Path) -> Result<()> {
        let raw = serde_yaml::to_string(self)?;
        fs::write(vbms_dir.join(CONFIG_FILE), raw)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = VbmsConfig::load(tmp.path()).unwrap();
        assert_eq!(config, VbmsConfig::default());
        assert_eq!(config.id_retry_limit, 3);
        assert_eq!(config.expiring_soon_days, 7);
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "id_retry_limit: 0\n").unwrap();

        let config = VbmsConfig::load(tmp.path()).unwrap();
        assert_eq!(config.id_retry_limit, 0);
        assert_eq!(config.inventory_defaults.minimum, DEFAULT_MINIMUM);
    }

    #[test]
    fn test_save_and_reload() {
        let tmp = TempDir::new().unwrap();
        let mut config = VbmsConfig::default();
        config.inventory_defaults.maximum = 250;
        config.save(tmp.path()).unwrap();

        let loaded = VbmsConfig::load(tmp.path()).unwrap();
        assert_eq!(loaded.inventory_defaults.maximum, 250);
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "id_retry_limit: [nope").unwrap();
        assert!(VbmsConfig::load(tmp.path()).is_err());
    }
}
