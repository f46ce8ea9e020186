// src/entity/file.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::RecordBase;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    MainAdmin,
    Admin,
    #[default]
    Customer,
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::MainAdmin => write!(f, "main_admin"),
            UserRole::Admin => write!(f, "admin"),
            UserRole::Customer => write!(f, "customer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "main_admin" | "mainadmin" => Ok(UserRole::MainAdmin),
            "admin" => Ok(UserRole::Admin),
            "customer" => Ok(UserRole::Customer),
            _ => Err(format!("Invalid user role: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Document,
    Image,
    Audio,
    Invoice,
    #[default]
    Other,
}

impl std::fmt::Display for FileCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FileCategory::Document => write!(f, "document"),
            FileCategory::Image => write!(f, "image"),
            FileCategory::Audio => write!(f, "audio"),
            FileCategory::Invoice => write!(f, "invoice"),
            FileCategory::Other => write!(f, "other"),
        }
    }
}

impl std::str::FromStr for FileCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "document" => Ok(FileCategory::Document),
            "image" => Ok(FileCategory::Image),
            "audio" => Ok(FileCategory::Audio),
            "invoice" => Ok(FileCategory::Invoice),
            "other" => Ok(FileCategory::Other),
            _ => Err(format!("Invalid file category: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Owner {
    pub user_id: String,
    pub role: UserRole,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileRecord {
    #[serde(flatten)]
    pub base: RecordBase,
    pub owner: Owner,
    /// Object-storage key; unique per file
    pub storage_key: String,
    pub size: u64,
    pub category: FileCategory,
    #[serde(default)]
    pub download_count: u64,
    pub last_accessed: Option<DateTime<Utc>>,
}

impl FileRecord {
    pub fn new(
        owner: Owner,
        storage_key: String,
        size: u64,
        category: FileCategory,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            base: RecordBase::at(now),
            owner,
            storage_key,
            size,
            category,
            download_count: 0,
            last_accessed: None,
        }
    }

    pub fn record_access(&mut self, now: DateTime<Utc>) {
        self.download_count += 1;
        self.last_accessed = Some(now);
        self.base.touch(now);
    }
}
