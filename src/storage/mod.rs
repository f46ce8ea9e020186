//! Document store abstraction.
//!
//! Records are stored whole as JSON documents keyed by UUID, with an
//! optional human-facing display id that the store keeps unique per kind.

mod sqlite_store;

pub use sqlite_store::{SqliteStore, STORE_DB};

use serde::de::DeserializeOwned;
use serde::Serialize;
use uuid::Uuid;

use crate::derivation::SequenceWindow;
use crate::entity::{Call, FileRecord, Inventory, Order, RecordBase};
use crate::error::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    Order,
    Call,
    Inventory,
    File,
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentKind::Order => write!(f, "order"),
            DocumentKind::Call => write!(f, "call"),
            DocumentKind::Inventory => write!(f, "inventory"),
            DocumentKind::File => write!(f, "file"),
        }
    }
}

impl std::str::FromStr for DocumentKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "order" | "orders" => Ok(DocumentKind::Order),
            "call" | "calls" => Ok(DocumentKind::Call),
            "inventory" | "item" | "items" => Ok(DocumentKind::Inventory),
            "file" | "files" => Ok(DocumentKind::File),
            _ => Err(format!("Invalid record kind: {}", s)),
        }
    }
}

/// A record type the store knows how to persist.
pub trait Record: Serialize + DeserializeOwned {
    const KIND: DocumentKind;

    fn base(&self) -> &RecordBase;

    /// Unique human-facing identifier, if the record has one yet
    fn display_id(&self) -> Option<&str>;
}

/// Persistence operations the repository relies on.
///
/// `count_documents` followed by `create` is not atomic. Two writers may
/// read the same count; the second `create` then fails with
/// [`VbmsError::DuplicateId`](crate::error::VbmsError::DuplicateId).
pub trait DocumentStore {
    /// Number of `kind` records created inside `window`
    fn count_documents(&self, kind: DocumentKind, window: SequenceWindow) -> Result<u64>;

    /// Insert a new record. Fails on a duplicate id or display id.
    fn create<R: Record>(&self, record: &R) -> Result<()>;

    /// Overwrite an existing record. Last writer wins.
    fn save<R: Record>(&self, record: &R) -> Result<()>;

    fn find<R: Record>(&self, id: &Uuid) -> Result<Option<R>>;

    fn find_by_display_id<R: Record>(&self, display_id: &str) -> Result<Option<R>>;

    /// All records of a kind, oldest first
    fn list<R: Record>(&self) -> Result<Vec<R>>;
}

impl Record for Order {
    const KIND: DocumentKind = DocumentKind::Order;

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn display_id(&self) -> Option<&str> {
        self.order_id()
    }
}

impl Record for Call {
    const KIND: DocumentKind = DocumentKind::Call;

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn display_id(&self) -> Option<&str> {
        self.call_id()
    }
}

impl Record for Inventory {
    const KIND: DocumentKind = DocumentKind::Inventory;

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn display_id(&self) -> Option<&str> {
        Some(&self.sku)
    }
}

impl Record for FileRecord {
    const KIND: DocumentKind = DocumentKind::File;

    fn base(&self) -> &RecordBase {
        &self.base
    }

    fn display_id(&self) -> Option<&str> {
        Some(&self.storage_key)
    }
}
