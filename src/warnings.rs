//! Stock warnings for inventory records.
//!
//! Turns the derived alert flags on inventory records into typed warnings
//! that the CLI can print.

use chrono::{DateTime, Utc};

use crate::entity::Inventory;

/// A stock condition that needs attention.
#[derive(Debug, Clone, PartialEq)]
pub enum StockWarning {
    /// More units reserved than on hand.
    OverReserved { sku: String, current: i64, reserved: i64 },
    /// Nothing available to sell.
    OutOfStock { sku: String, available: i64 },
    /// Available stock at or under the reorder minimum.
    LowStock { sku: String, available: i64, minimum: i64 },
    /// On-hand stock at or over the configured maximum.
    Overstock { sku: String, current: i64, maximum: i64 },
    /// Expiration date falls inside the expiring-soon window.
    ExpiringSoon { sku: String, expires: DateTime<Utc> },
}

/// Check stored alert flags and return any warnings.
///
/// `OutOfStock` replaces `LowStock` for the same record.
pub fn check_inventory(items: &[Inventory]) -> Vec<StockWarning> {
    let mut warnings = Vec::new();

    for item in items {
        let sku = &item.sku;
        let stock = &item.stock;

        if stock.available < 0 {
            warnings.push(StockWarning::OverReserved {
                sku: sku.clone(),
                current: stock.current,
                reserved: stock.reserved,
            });
        }

        if item.alerts.out_of_stock {
            warnings.push(StockWarning::OutOfStock {
                sku: sku.clone(),
                available: stock.available,
            });
        } else if item.alerts.low_stock {
            warnings.push(StockWarning::LowStock {
                sku: sku.clone(),
                available: stock.available,
                minimum: stock.minimum,
            });
        }

        if item.alerts.overstock {
            warnings.push(StockWarning::Overstock {
                sku: sku.clone(),
                current: stock.current,
                maximum: stock.maximum,
            });
        }

        if item.alerts.expiring_soon {
            if let Some(expires) = item.expiration_date {
                warnings.push(StockWarning::ExpiringSoon {
                    sku: sku.clone(),
                    expires,
                });
            }
        }
    }

    warnings
}

/// Format a warning for display.
pub fn format_warning(warning: &StockWarning) -> String {
    match warning {
        StockWarning::OverReserved {
            sku,
            current,
            reserved,
        } => format!(
            "Warning: {} has {} reserved but only {} on hand",
            sku, reserved, current
        ),
        StockWarning::OutOfStock { sku, available } => {
            format!("Warning: {} is out of stock ({} available)", sku, available)
        }
        StockWarning::LowStock {
            sku,
            available,
            minimum,
        } => format!(
            "Warning: {} is low ({} available, minimum {})",
            sku, available, minimum
        ),
        StockWarning::Overstock {
            sku,
            current,
            maximum,
        } => format!(
            "Warning: {} is overstocked ({} on hand, maximum {})",
            sku, current, maximum
        ),
        StockWarning::ExpiringSoon { sku, expires } => {
            format!("Warning: {} expires on {}", sku, expires.format("%Y-%m-%d"))
        }
    }
}
