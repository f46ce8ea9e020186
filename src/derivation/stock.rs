use chrono::{DateTime, Utc};

use crate::entity::Inventory;

pub const MS_PER_DAY: f64 = 86_400_000.0;
pub const EXPIRING_SOON_DAYS: i64 = 7;

/// `(price − cost) / cost × 100`, or `None` when that is not a finite number.
pub fn compute_margin(cost: f64, price: f64) -> Option<f64> {
    let margin = (price - cost) / cost * 100.0;
    margin.is_finite().then_some(margin)
}

/// Fractional days from `now` until `expiration`; negative once expired.
pub fn days_until(expiration: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (expiration - now).num_milliseconds() as f64 / MS_PER_DAY
}

/// Recompute every derived field of an inventory record.
///
/// Steps run in a fixed order: available stock, margin, threshold alerts,
/// then expiry. `available` is not floored, so over-reservation shows up as
/// a negative number. Without an expiration date `expiring_soon` keeps
/// whatever value the record already had.
pub fn derive_inventory_fields(
    mut item: Inventory,
    now: DateTime<Utc>,
    expiring_soon_days: i64,
) -> Inventory {
    let stock = &mut item.stock;
    stock.available = stock.current - stock.reserved;

    item.pricing.margin = compute_margin(item.pricing.cost, item.pricing.price);

    item.alerts.low_stock = stock.available <= stock.minimum;
    item.alerts.out_of_stock = stock.available <= 0;
    item.alerts.overstock = stock.current >= stock.maximum;

    if let Some(expiration) = item.expiration_date {
        let days = days_until(expiration, now);
        item.alerts.expiring_soon = days > 0.0 && days <= expiring_soon_days as f64;
    }

    item
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn item(current: i64, reserved: i64, minimum: i64, maximum: i64, cost: f64, price: f64) -> Inventory {
        let mut item = Inventory::new("Flour".to_string(), "FL-01".to_string(), Utc::now());
        item.stock.current = current;
        item.stock.reserved = reserved;
        item.stock.minimum = minimum;
        item.stock.maximum = maximum;
        item.pricing.cost = cost;
        item.pricing.price = price;
        item
    }

    fn derive(item: Inventory, now: DateTime<Utc>) -> Inventory {
        derive_inventory_fields(item, now, EXPIRING_SOON_DAYS)
    }

    #[test]
    fn test_reference_scenario() {
        let out = derive(item(10, 2, 5, 100, 4.0, 10.0), Utc::now());
        assert_eq!(out.stock.available, 8);
        assert_eq!(out.pricing.margin, Some(150.0));
        assert!(!out.alerts.low_stock);
        assert!(!out.alerts.out_of_stock);
        assert!(!out.alerts.overstock);
        assert!(!out.alerts.expiring_soon);
    }

    #[test]
    fn test_idempotent() {
        let now = Utc::now();
        let mut input = item(3, 5, 2, 3, 2.5, 4.0);
        input.expiration_date = Some(now + Duration::days(2));

        let once = derive(input, now);
        let twice = derive(once.clone(), now);
        assert_eq!(once.stock, twice.stock);
        assert_eq!(once.pricing, twice.pricing);
        assert_eq!(once.alerts, twice.alerts);
    }

    #[test]
    fn test_invariants_hold_across_inputs() {
        let now = Utc::now();
        for current in [-5, 0, 1, 7, 50, 120] {
            for reserved in [0, 3, 60] {
                for (minimum, maximum) in [(0, 10), (5, 100), (10, 1000)] {
                    let out = derive(item(current, reserved, minimum, maximum, 3.0, 5.0), now);
                    let alerts = out.alerts;
                    assert_eq!(out.stock.available, current - reserved);
                    assert_eq!(alerts.out_of_stock, out.stock.available <= 0);
                    assert_eq!(alerts.low_stock, out.stock.available <= minimum);
                    assert_eq!(alerts.overstock, current >= maximum);
                }
            }
        }
    }

    #[test]
    fn test_available_may_go_negative() {
        let out = derive(item(2, 5, 0, 10, 1.0, 2.0), Utc::now());
        assert_eq!(out.stock.available, -3);
        assert!(out.alerts.out_of_stock);
        assert!(out.alerts.low_stock);
    }

    #[test]
    fn test_expiration_boundaries() {
        let now = Utc::now();

        let mut exact = item(10, 0, 1, 100, 1.0, 2.0);
        exact.expiration_date = Some(now + Duration::days(7));
        assert!(derive(exact, now).alerts.expiring_soon);

        let mut just_over = item(10, 0, 1, 100, 1.0, 2.0);
        just_over.expiration_date = Some(now + Duration::days(7) + Duration::seconds(1));
        assert!(!derive(just_over, now).alerts.expiring_soon);

        let mut expired = item(10, 0, 1, 100, 1.0, 2.0);
        expired.expiration_date = Some(now - Duration::seconds(1));
        assert!(!derive(expired, now).alerts.expiring_soon);
    }

    #[test]
    fn test_unset_expiration_keeps_previous_flag() {
        let mut input = item(10, 0, 1, 100, 1.0, 2.0);
        input.alerts.expiring_soon = true;
        assert!(derive(input, Utc::now()).alerts.expiring_soon);
    }

    #[test]
    fn test_zero_cost_has_no_margin() {
        assert_eq!(compute_margin(0.0, 5.0), None);
        assert_eq!(compute_margin(0.0, 0.0), None);
        assert_eq!(compute_margin(4.0, 3.0), Some(-25.0));
    }
}
