// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! The consumed boundary of the storage engine collaborator
//!
//! The workload drives any engine that exposes the eleven tables as
//! ordered maps of opaque byte keys to opaque byte values, with point
//! operations and ascending range scans inside atomic transactions. The
//! engine owns concurrency control, commit, and rollback; this crate only
//! reacts to [Aborted].

use thiserror::Error;

/// The storage engine refused to apply a transaction (conflict,
/// constraint violation).
///
/// This is the only recoverable error in the crate. Transaction profiles
/// catch it, count it, and return; loaders retry on it only when scoped to
/// a single warehouse for parallel loading. Everything else that can go
/// wrong (a mandatory row missing, a sanity check failing, malformed
/// bytes) is a fatal invariant violation and panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
#[error("transaction aborted by the storage engine")]
pub struct Aborted;

/// The eleven TPCC tables.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TableId {
    /// The WAREHOUSE table.
    Warehouse,
    /// The DISTRICT table.
    District,
    /// The CUSTOMER table.
    Customer,
    /// The (last, first) name secondary index over CUSTOMER.
    CustomerNameIdx,
    /// The HISTORY table, insert-only.
    History,
    /// The ITEM table.
    Item,
    /// The STOCK table.
    Stock,
    /// The NEW-ORDER table of undelivered order markers.
    NewOrder,
    /// The ORDER table (oorder, to dodge the SQL keyword).
    Oorder,
    /// The per-customer secondary index over ORDER.
    OorderCIdIdx,
    /// The ORDER-LINE table.
    OrderLine,
}

impl TableId {
    /// Every table, in loader dependency order.
    pub const ALL: [TableId; 11] = [
        TableId::Warehouse,
        TableId::Item,
        TableId::Stock,
        TableId::District,
        TableId::Customer,
        TableId::CustomerNameIdx,
        TableId::History,
        TableId::Oorder,
        TableId::OorderCIdIdx,
        TableId::NewOrder,
        TableId::OrderLine,
    ];

    /// The table's conventional name.
    pub fn name(self) -> &'static str {
        match self {
            TableId::Warehouse => "warehouse",
            TableId::District => "district",
            TableId::Customer => "customer",
            TableId::CustomerNameIdx => "customer_name_idx",
            TableId::History => "history",
            TableId::Item => "item",
            TableId::Stock => "stock",
            TableId::NewOrder => "new_order",
            TableId::Oorder => "oorder",
            TableId::OorderCIdIdx => "oorder_c_id_idx",
            TableId::OrderLine => "order_line",
        }
    }

    /// A dense index for engines that keep tables in an array.
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Which part of the workload a transaction belongs to.
///
/// Semantically inert to this crate; engines may use it to pick a
/// specialized execution strategy per profile.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WorkloadHint {
    /// Bulk loading.
    Load,
    /// The NewOrder profile.
    NewOrder,
    /// The Payment profile.
    Payment,
    /// The Delivery profile.
    Delivery,
    /// The OrderStatus profile.
    OrderStatus,
    /// The StockLevel profile.
    StockLevel,
}

/// Options for [Engine::begin].
#[derive(Clone, Copy, Debug)]
pub struct TxnOptions {
    /// The transaction will perform no writes.
    pub read_only: bool,
    /// Which part of the workload is opening the transaction.
    pub hint: WorkloadHint,
}

impl TxnOptions {
    /// Options for a loader transaction.
    pub fn load() -> Self {
        TxnOptions {
            read_only: false,
            hint: WorkloadHint::Load,
        }
    }

    /// Options for a transaction profile.
    pub fn profile(hint: WorkloadHint, read_only: bool) -> Self {
        TxnOptions { read_only, hint }
    }
}

/// A visitor invoked once per matching row of an ascending range scan.
pub trait ScanVisitor {
    /// Called in key order. Return false to end the scan early.
    fn visit(&mut self, key: &[u8], value: &[u8]) -> bool;
}

/// One open transaction against the engine.
///
/// Any operation may fail with [Aborted]; the transaction is then dead and
/// must be dropped via [Txn::abort].
pub trait Txn {
    /// Reads `key` from `table` into `out`, returning false if the key is
    /// absent. `out` is cleared first.
    fn get(&mut self, table: TableId, key: &[u8], out: &mut Vec<u8>) -> Result<bool, Aborted>;

    /// Like [Txn::get], but the engine may stop reading after `max_bytes`
    /// bytes of the value. Engines without partial reads serve the full
    /// value truncated, which is what the default does.
    fn get_up_to(
        &mut self,
        table: TableId,
        key: &[u8],
        out: &mut Vec<u8>,
        max_bytes: usize,
    ) -> Result<bool, Aborted> {
        let found = self.get(table, key, out)?;
        out.truncate(max_bytes);
        Ok(found)
    }

    /// Overwrites `key` in `table`. The key must already exist.
    fn put(&mut self, table: TableId, key: &[u8], value: &[u8]) -> Result<(), Aborted>;

    /// Inserts `key` into `table`. The key must not already exist.
    fn insert(&mut self, table: TableId, key: &[u8], value: &[u8]) -> Result<(), Aborted>;

    /// Removes `key` from `table`.
    fn remove(&mut self, table: TableId, key: &[u8]) -> Result<(), Aborted>;

    /// Visits the rows in `[start, end)` in ascending key order.
    fn scan(
        &mut self,
        table: TableId,
        start: &[u8],
        end: &[u8],
        visitor: &mut dyn ScanVisitor,
    ) -> Result<(), Aborted>;

    /// Attempts to apply the transaction.
    fn commit(self) -> Result<(), Aborted>;

    /// Rolls the transaction back.
    fn abort(self);
}

/// A transactional ordered key-value storage engine.
pub trait Engine {
    /// The engine's transaction handle.
    type Txn<'a>: Txn
    where
        Self: 'a;

    /// Opens a transaction.
    fn begin(&self, opts: TxnOptions) -> Self::Txn<'_>;

    /// Loader batching hint: commit after this many rows. None means
    /// unbounded transactions are fine.
    fn max_batch_size(&self) -> Option<usize>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_ids_dense_and_distinct() {
        let mut seen = [false; 11];
        for table in TableId::ALL {
            assert!(!seen[table.index()], "{}", table.name());
            seen[table.index()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
