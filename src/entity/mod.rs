mod call;
mod file;
mod inventory;
mod order;

pub use call::{Call, CallCustomer, CallInfo};
pub use file::{FileCategory, FileRecord, Owner, UserRole};
pub use inventory::{Alerts, Inventory, InventoryPricing, Stock, DEFAULT_MAXIMUM, DEFAULT_MINIMUM};
pub use order::{
    Modifier, Order, OrderInfo, OrderItem, OrderSource, OrderStatus, OrderType, Pricing,
    StatusChange,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Result, VbmsError};

/// Base fields shared by all persisted records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordBase {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl RecordBase {
    /// Base stamped with an explicit creation time
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// First seven characters of the UUID, used in CLI output
    pub fn short_id(&self) -> String {
        self.id.to_string()[..7].to_string()
    }
}

/// Amounts are stored as JSON numbers, which cannot hold NaN or infinity.
pub(crate) fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(VbmsError::InvalidValue(format!(
            "{} must be a finite number, got {}",
            field, value
        )))
    }
}
