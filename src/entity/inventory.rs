// src/entity/inventory.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ensure_finite, RecordBase};
use crate::error::Result;

pub const DEFAULT_MINIMUM: i64 = 10;
pub const DEFAULT_MAXIMUM: i64 = 1000;

fn default_minimum() -> i64 {
    DEFAULT_MINIMUM
}

fn default_maximum() -> i64 {
    DEFAULT_MAXIMUM
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stock {
    pub current: i64,
    #[serde(default)]
    pub reserved: i64,
    /// current − reserved; derived
    #[serde(default)]
    pub available: i64,
    #[serde(default = "default_minimum")]
    pub minimum: i64,
    #[serde(default = "default_maximum")]
    pub maximum: i64,
}

impl Stock {
    pub fn new(current: i64) -> Self {
        Self {
            current,
            reserved: 0,
            available: current,
            minimum: DEFAULT_MINIMUM,
            maximum: DEFAULT_MAXIMUM,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryPricing {
    pub cost: f64,
    pub price: f64,
    /// Percentage over cost; derived. `None` when cost is zero.
    #[serde(default)]
    pub margin: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Alerts {
    pub low_stock: bool,
    pub out_of_stock: bool,
    pub overstock: bool,
    pub expiring_soon: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(flatten)]
    pub base: RecordBase,
    pub name: String,
    pub sku: String,
    pub stock: Stock,
    pub pricing: InventoryPricing,
    #[serde(default)]
    pub alerts: Alerts,
    pub expiration_date: Option<DateTime<Utc>>,
}

impl Inventory {
    pub fn new(name: String, sku: String, now: DateTime<Utc>) -> Self {
        Self {
            base: RecordBase::at(now),
            name,
            sku,
            stock: Stock::new(0),
            pricing: InventoryPricing {
                cost: 0.0,
                price: 0.0,
                margin: None,
            },
            alerts: Alerts::default(),
            expiration_date: None,
        }
    }

    /// Reject cost or price values that cannot be stored.
    pub fn check_amounts(&self) -> Result<()> {
        ensure_finite("cost", self.pricing.cost)?;
        ensure_finite("price", self.pricing.price)
    }
}
