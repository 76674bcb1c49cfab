// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! A reference in-memory implementation of the storage engine boundary
//!
//! Eleven ordered maps behind one mutex. Transactions buffer writes in
//! per-table write sets; gets and scans overlay the write set on the base
//! image so a transaction reads its own writes; commit applies the write
//! set atomically. There is no concurrency control: transactions serialize
//! on the mutex and never conflict-abort. Aborts happen only on demand via
//! [MemEngine::fail_next_commits], which is what the abort-path tests use.
//!
//! This is test and bench scaffolding. A real benchmark target implements
//! [Engine] over an actual transactional store.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::engine::{Aborted, Engine, ScanVisitor, TableId, Txn, TxnOptions};

type Table = BTreeMap<Vec<u8>, Vec<u8>>;
type WriteSet = BTreeMap<Vec<u8>, Option<Vec<u8>>>;

/// See the module docs.
#[derive(Debug, Default)]
pub struct MemEngine {
    tables: Mutex<[Table; 11]>,
    fail_commits: AtomicUsize,
    max_batch_size: Option<usize>,
}

impl MemEngine {
    /// An empty engine with unbounded loader batches.
    pub fn new() -> Self {
        MemEngine::default()
    }

    /// An empty engine that asks loaders to commit every `n` rows.
    pub fn with_max_batch_size(n: usize) -> Self {
        MemEngine {
            max_batch_size: Some(n),
            ..MemEngine::default()
        }
    }

    /// Makes the next `n` commits abort without applying.
    pub fn fail_next_commits(&self, n: usize) {
        self.fail_commits.store(n, Ordering::SeqCst);
    }

    /// The number of rows in `table`, read outside any transaction.
    pub fn len(&self, table: TableId) -> usize {
        self.tables.lock().unwrap()[table.index()].len()
    }

    /// Whether `table` is empty, read outside any transaction.
    pub fn is_empty(&self, table: TableId) -> bool {
        self.len(table) == 0
    }

    /// Reads `key` outside any transaction.
    pub fn get_raw(&self, table: TableId, key: &[u8]) -> Option<Vec<u8>> {
        self.tables.lock().unwrap()[table.index()].get(key).cloned()
    }
}

impl Engine for MemEngine {
    type Txn<'a> = MemTxn<'a>;

    fn begin(&self, _opts: TxnOptions) -> MemTxn<'_> {
        MemTxn {
            engine: self,
            writes: Default::default(),
        }
    }

    fn max_batch_size(&self) -> Option<usize> {
        self.max_batch_size
    }
}

/// One open transaction against a [MemEngine].
#[derive(Debug)]
pub struct MemTxn<'a> {
    engine: &'a MemEngine,
    // None is a tombstone from remove.
    writes: [WriteSet; 11],
}

impl MemTxn<'_> {
    fn exists(&self, table: TableId, key: &[u8]) -> bool {
        if let Some(w) = self.writes[table.index()].get(key) {
            return w.is_some();
        }
        self.engine.tables.lock().unwrap()[table.index()].contains_key(key)
    }
}

impl Txn for MemTxn<'_> {
    fn get(&mut self, table: TableId, key: &[u8], out: &mut Vec<u8>) -> Result<bool, Aborted> {
        out.clear();
        if let Some(w) = self.writes[table.index()].get(key) {
            return Ok(match w {
                Some(v) => {
                    out.extend_from_slice(v);
                    true
                }
                None => false,
            });
        }
        match self.engine.tables.lock().unwrap()[table.index()].get(key) {
            Some(v) => {
                out.extend_from_slice(v);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn put(&mut self, table: TableId, key: &[u8], value: &[u8]) -> Result<(), Aborted> {
        assert!(
            self.exists(table, key),
            "put of missing key in {}",
            table.name()
        );
        self.writes[table.index()].insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn insert(&mut self, table: TableId, key: &[u8], value: &[u8]) -> Result<(), Aborted> {
        assert!(
            !self.exists(table, key),
            "insert of existing key in {}",
            table.name()
        );
        self.writes[table.index()].insert(key.to_vec(), Some(value.to_vec()));
        Ok(())
    }

    fn remove(&mut self, table: TableId, key: &[u8]) -> Result<(), Aborted> {
        assert!(
            self.exists(table, key),
            "remove of missing key in {}",
            table.name()
        );
        self.writes[table.index()].insert(key.to_vec(), None);
        Ok(())
    }

    fn scan(
        &mut self,
        table: TableId,
        start: &[u8],
        end: &[u8],
        visitor: &mut dyn ScanVisitor,
    ) -> Result<(), Aborted> {
        let tables = self.engine.tables.lock().unwrap();
        let bounds = (Bound::Included(start), Bound::Excluded(end));
        let mut base = tables[table.index()].range::<[u8], _>(bounds).peekable();
        let mut overlay = self.writes[table.index()]
            .range::<[u8], _>(bounds)
            .peekable();

        // Two-way merge in ascending key order; on a shared key the
        // overlay shadows the base row.
        loop {
            let take_overlay = match (base.peek(), overlay.peek()) {
                (None, None) => break,
                (Some(_), None) => false,
                (None, Some(_)) => true,
                (Some((bk, _)), Some((ok, _))) => ok <= bk,
            };
            if take_overlay {
                let (key, write) = overlay.next().unwrap();
                if let Some((bk, _)) = base.peek() {
                    if *bk == key {
                        base.next();
                    }
                }
                match write {
                    Some(value) => {
                        if !visitor.visit(key, value) {
                            break;
                        }
                    }
                    None => {} // removed within this transaction
                }
            } else {
                let (key, value) = base.next().unwrap();
                if !visitor.visit(key, value) {
                    break;
                }
            }
        }
        Ok(())
    }

    fn commit(self) -> Result<(), Aborted> {
        let injected_failure = self
            .engine
            .fail_commits
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if injected_failure {
            return Err(Aborted);
        }
        let mut tables = self.engine.tables.lock().unwrap();
        for (idx, writes) in self.writes.into_iter().enumerate() {
            for (key, write) in writes {
                match write {
                    Some(value) => {
                        tables[idx].insert(key, value);
                    }
                    None => {
                        tables[idx].remove(&key);
                    }
                }
            }
        }
        Ok(())
    }

    fn abort(self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::CollectRows;

    const T: TableId = TableId::Item;

    #[test]
    fn reads_see_own_writes() {
        let engine = MemEngine::new();
        let mut out = Vec::new();

        let mut txn = engine.begin(TxnOptions::load());
        txn.insert(T, b"a", b"1").unwrap();
        assert!(txn.get(T, b"a", &mut out).unwrap());
        assert_eq!(out, b"1");
        txn.put(T, b"a", b"2").unwrap();
        assert!(txn.get(T, b"a", &mut out).unwrap());
        assert_eq!(out, b"2");
        txn.remove(T, b"a").unwrap();
        assert!(!txn.get(T, b"a", &mut out).unwrap());
        txn.commit().unwrap();

        assert!(engine.is_empty(T));
    }

    #[test]
    fn scan_merges_overlay_and_base() {
        let engine = MemEngine::new();
        let mut txn = engine.begin(TxnOptions::load());
        for key in [b"b", b"d", b"f"] {
            txn.insert(T, key, b"base").unwrap();
        }
        txn.commit().unwrap();

        let mut txn = engine.begin(TxnOptions::load());
        txn.insert(T, b"c", b"new").unwrap();
        txn.put(T, b"d", b"updated").unwrap();
        txn.remove(T, b"f").unwrap();

        let mut rows = CollectRows::new(10);
        txn.scan(T, b"a", b"z", &mut rows).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows.key(0), b"b");
        assert_eq!(rows.value(0), b"base");
        assert_eq!(rows.key(1), b"c");
        assert_eq!(rows.value(1), b"new");
        assert_eq!(rows.key(2), b"d");
        assert_eq!(rows.value(2), b"updated");
        txn.abort();

        // Nothing from the aborted transaction is visible.
        assert_eq!(engine.len(T), 3);
        assert!(engine.get_raw(T, b"f").is_some());
    }

    #[test]
    fn scan_bounds_are_half_open() {
        let engine = MemEngine::new();
        let mut txn = engine.begin(TxnOptions::load());
        for key in [b"a", b"b", b"c"] {
            txn.insert(T, key, b"").unwrap();
        }
        let mut rows = CollectRows::new(10);
        txn.scan(T, b"a", b"c", &mut rows).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.key(0), b"a");
        assert_eq!(rows.key(1), b"b");
        txn.abort();
    }

    #[test]
    fn injected_commit_failure_discards_writes() {
        let engine = MemEngine::new();
        engine.fail_next_commits(1);

        let mut txn = engine.begin(TxnOptions::load());
        txn.insert(T, b"a", b"1").unwrap();
        assert_eq!(txn.commit(), Err(Aborted));
        assert!(engine.is_empty(T));

        let mut txn = engine.begin(TxnOptions::load());
        txn.insert(T, b"a", b"1").unwrap();
        assert_eq!(txn.commit(), Ok(()));
        assert_eq!(engine.len(T), 1);
    }
}
