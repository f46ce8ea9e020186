//! Record lifecycle on top of a [`DocumentStore`].
//!
//! Every write goes through here so that generated ids and derived fields
//! are computed right before the record reaches the store.

use chrono::{DateTime, Datelike, TimeZone, Utc};
use tracing::{debug, info, warn};

use crate::config::VbmsConfig;
use crate::derivation::{derive_inventory_fields, generate_call_id, generate_order_id, SequenceWindow};
use crate::entity::{Call, FileRecord, Inventory, Order, OrderStatus};
use crate::error::{Result, VbmsError};
use crate::storage::{DocumentStore, Record};

/// Shortest UUID prefix accepted when a key is not a display id
pub const MIN_ID_PREFIX_LEN: usize = 4;

pub struct Repository<S: DocumentStore> {
    store: S,
    config: VbmsConfig,
}

impl<S: DocumentStore> Repository<S> {
    pub fn new(store: S, config: VbmsConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &VbmsConfig {
        &self.config
    }

    /// Persist a new order, assigning `VBMS-<year>-<seq>` if it has no id.
    ///
    /// The sequence comes from a count of all orders ever stored, so it does
    /// not restart with the year in the prefix.
    pub fn create_order<Tz: TimeZone>(&self, mut order: Order, now: &DateTime<Tz>) -> Result<Order> {
        order.check_amounts()?;
        if order.order_id().is_some() {
            self.store.create(&order)?;
            return Ok(order);
        }

        let year = now.year();
        self.insert_with_generated_id(&mut order, SequenceWindow::AllTime, |order, n| {
            order.order_info.order_id = Some(generate_order_id(n, year));
        })?;

        info!(order_id = ?order.order_id(), "order created");
        Ok(order)
    }

    /// Apply a status change to the order with the given display id or UUID prefix.
    pub fn update_order_status(
        &self,
        key: &str,
        next: OrderStatus,
        note: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        let mut order: Order = self.resolve(key)?;
        order.transition(next, note, now)?;
        self.store.save(&order)?;

        info!(order_id = ?order.order_id(), status = %next, "order status changed");
        Ok(order)
    }

    /// Persist a new call, assigning `CALL-<YYYYMMDD>-<seq>` if it has no id.
    ///
    /// The sequence counts calls created since local midnight of `now`.
    pub fn create_call<Tz: TimeZone>(&self, mut call: Call, now: &DateTime<Tz>) -> Result<Call> {
        if call.call_id().is_some() {
            self.store.create(&call)?;
            return Ok(call);
        }

        let date = now.date_naive();
        let window = SequenceWindow::since_midnight(now);
        self.insert_with_generated_id(&mut call, window, |call, n| {
            call.call_info.call_id = Some(generate_call_id(n, date));
        })?;

        info!(call_id = ?call.call_id(), "call logged");
        Ok(call)
    }

    pub fn create_inventory(&self, item: Inventory, now: DateTime<Utc>) -> Result<Inventory> {
        item.check_amounts()?;
        let item = derive_inventory_fields(item, now, self.config.expiring_soon_days);
        self.store.create(&item)?;

        debug!(sku = %item.sku, available = item.stock.available, "inventory created");
        Ok(item)
    }

    /// Re-derive and overwrite an inventory record. No version check is made.
    pub fn update_inventory(&self, mut item: Inventory, now: DateTime<Utc>) -> Result<Inventory> {
        item.check_amounts()?;
        item.base.touch(now);
        let item = derive_inventory_fields(item, now, self.config.expiring_soon_days);
        self.store.save(&item)?;

        debug!(sku = %item.sku, available = item.stock.available, "inventory updated");
        Ok(item)
    }

    pub fn create_file(&self, file: FileRecord) -> Result<FileRecord> {
        self.store.create(&file)?;
        debug!(storage_key = %file.storage_key, "file registered");
        Ok(file)
    }

    /// Bump the download counter of a file and stamp its access time.
    pub fn record_file_access(&self, key: &str, now: DateTime<Utc>) -> Result<FileRecord> {
        let mut file: FileRecord = self.resolve(key)?;
        file.record_access(now);
        self.store.save(&file)?;
        Ok(file)
    }

    /// Look a record up by display id, falling back to a UUID prefix of at
    /// least [`MIN_ID_PREFIX_LEN`] characters.
    pub fn resolve<R: Record>(&self, key: &str) -> Result<R> {
        let key = key.trim();
        if key.is_empty() {
            return Err(VbmsError::EntityNotFound(key.to_string()));
        }

        if let Some(record) = self.store.find_by_display_id(key)? {
            return Ok(record);
        }

        if key.len() < MIN_ID_PREFIX_LEN {
            return Err(VbmsError::EntityNotFound(key.to_string()));
        }

        let key_lower = key.to_lowercase();
        self.store
            .list::<R>()?
            .into_iter()
            .find(|r| r.base().id.to_string().starts_with(&key_lower))
            .ok_or_else(|| VbmsError::EntityNotFound(key.to_string()))
    }

    pub fn list<R: Record>(&self) -> Result<Vec<R>> {
        self.store.list()
    }

    /// Count, assign, insert. A collision on the display id regenerates the
    /// id with the next sequence number, up to `id_retry_limit` times; after
    /// that the `DuplicateId` error is returned as is.
    fn insert_with_generated_id<R, F>(&self, record: &mut R, window: SequenceWindow, assign: F) -> Result<()>
    where
        R: Record,
        F: Fn(&mut R, u64),
    {
        let existing = self.store.count_documents(R::KIND, window)?;
        let limit = u64::from(self.config.id_retry_limit);
        let mut attempt = 0;

        loop {
            assign(record, existing + attempt);
            match self.store.create(record) {
                Ok(()) => return Ok(()),
                Err(VbmsError::DuplicateId(id)) if attempt < limit => {
                    warn!(kind = %R::KIND, id = %id, attempt, "display id already taken, regenerating");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
