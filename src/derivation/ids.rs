use chrono::{DateTime, NaiveDate, TimeZone, Utc};

pub const ORDER_ID_PREFIX: &str = "VBMS";
pub const CALL_ID_PREFIX: &str = "CALL";

/// Range of creation times counted to pick the next sequence number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequenceWindow {
    AllTime,
    Since(DateTime<Utc>),
}

impl SequenceWindow {
    /// Window opening at midnight of `now`'s calendar day, in `now`'s zone.
    ///
    /// Falls back to `now` itself when midnight does not exist locally
    /// (a DST gap at 00:00).
    pub fn since_midnight<Tz: TimeZone>(now: &DateTime<Tz>) -> Self {
        let midnight = now
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .and_then(|m| m.and_local_timezone(now.timezone()).earliest())
            .map(|m| m.with_timezone(&Utc))
            .unwrap_or_else(|| now.with_timezone(&Utc));
        SequenceWindow::Since(midnight)
    }

    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        match self {
            SequenceWindow::AllTime => true,
            SequenceWindow::Since(start) => at >= *start,
        }
    }
}

/// `VBMS-<year>-<existing + 1, six digits>`
///
/// `existing_count` is a count over the whole collection, not the year.
pub fn generate_order_id(existing_count: u64, year: i32) -> String {
    format!("{}-{}-{:06}", ORDER_ID_PREFIX, year, existing_count + 1)
}

/// `CALL-<YYYYMMDD>-<existing + 1, four digits>`
pub fn generate_call_id(existing_count_today: u64, date: NaiveDate) -> String {
    format!(
        "{}-{}-{:04}",
        CALL_ID_PREFIX,
        date.format("%Y%m%d"),
        existing_count_today + 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};

    #[test]
    fn test_order_id_for_n_existing() {
        assert_eq!(generate_order_id(0, 2026), "VBMS-2026-000001");
        assert_eq!(generate_order_id(41, 2026), "VBMS-2026-000042");
        assert_eq!(generate_order_id(999_999, 2027), "VBMS-2027-1000000");
    }

    #[test]
    fn test_call_id_format() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 4).unwrap();
        assert_eq!(generate_call_id(0, date), "CALL-20260304-0001");
        assert_eq!(generate_call_id(11, date), "CALL-20260304-0012");
    }

    #[test]
    fn test_since_midnight_uses_local_day() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2026, 5, 10, 1, 30, 0).unwrap();

        let window = SequenceWindow::since_midnight(&now);
        let expected = Utc.with_ymd_and_hms(2026, 5, 9, 22, 0, 0).unwrap();
        assert_eq!(window, SequenceWindow::Since(expected));

        assert!(window.contains(expected));
        assert!(!window.contains(expected - Duration::seconds(1)));
    }

    #[test]
    fn test_all_time_contains_everything() {
        let ancient = Utc.with_ymd_and_hms(1999, 1, 1, 0, 0, 0).unwrap();
        assert!(SequenceWindow::AllTime.contains(ancient));
    }
}
