//! Values computed from a record right before it is written.
//!
//! Everything here is a plain function of its inputs. The repository calls
//! these explicitly ahead of each store write.

mod ids;
mod stock;

pub use ids::{generate_call_id, generate_order_id, SequenceWindow, CALL_ID_PREFIX, ORDER_ID_PREFIX};
pub use stock::{
    compute_margin, days_until, derive_inventory_fields, EXPIRING_SOON_DAYS, MS_PER_DAY,
};
