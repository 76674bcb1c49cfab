// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! Scan visitors: the manual-join helpers invoked once per scanned row
//!
//! Three shapes cover every scan in the workload: grab the first matching
//! key, collect a bounded batch of rows, keep only the latest key, or
//! accumulate the distinct item ids of a join. Each is a small state
//! struct that a worker owns and resets between transactions so the row
//! buffers are reused instead of reallocated.

use std::collections::HashSet;

use crate::engine::ScanVisitor;
use crate::schema::OrderLineValue;
use crate::NUM_ITEMS;

/// Captures the first key of a scan and stops.
#[derive(Debug, Default)]
pub struct FirstKey {
    key: Vec<u8>,
    found: bool,
}

impl FirstKey {
    /// Clears the captured key for the next scan.
    pub fn reset(&mut self) {
        self.key.clear();
        self.found = false;
    }

    /// The captured key, if the scan matched anything.
    pub fn key(&self) -> Option<&[u8]> {
        self.found.then_some(self.key.as_slice())
    }
}

impl ScanVisitor for FirstKey {
    fn visit(&mut self, key: &[u8], _value: &[u8]) -> bool {
        self.key.clear();
        self.key.extend_from_slice(key);
        self.found = true;
        false
    }
}

/// Collects up to a fixed cap of rows, reusing row buffers across scans.
#[derive(Debug)]
pub struct CollectRows {
    cap: usize,
    rows: Vec<(Vec<u8>, Vec<u8>)>,
    len: usize,
}

impl CollectRows {
    /// A collector that stops after `cap` rows.
    pub fn new(cap: usize) -> Self {
        assert!(cap > 0);
        CollectRows {
            cap,
            rows: Vec::new(),
            len: 0,
        }
    }

    /// Forgets collected rows (keeping their buffers) for the next scan.
    pub fn reset(&mut self) {
        self.len = 0;
    }

    /// The number of rows collected by the last scan.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the last scan collected nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Whether the last scan was cut off at the cap. Callers that need
    /// every match treat this as a fatal capacity-exceeded condition.
    pub fn hit_cap(&self) -> bool {
        self.len == self.cap
    }

    /// The key of collected row `idx`.
    pub fn key(&self, idx: usize) -> &[u8] {
        assert!(idx < self.len);
        &self.rows[idx].0
    }

    /// The value of collected row `idx`.
    pub fn value(&self, idx: usize) -> &[u8] {
        assert!(idx < self.len);
        &self.rows[idx].1
    }
}

impl ScanVisitor for CollectRows {
    fn visit(&mut self, key: &[u8], value: &[u8]) -> bool {
        if self.len == self.rows.len() {
            self.rows.push((key.to_vec(), value.to_vec()));
        } else {
            let (k, v) = &mut self.rows[self.len];
            k.clear();
            k.extend_from_slice(key);
            v.clear();
            v.extend_from_slice(value);
        }
        self.len += 1;
        self.len < self.cap
    }
}

/// Visits every row, keeping only the last key seen and a row count.
///
/// Scanning an ascending index with this yields the largest matching key.
#[derive(Debug, Default)]
pub struct LatestKey {
    key: Vec<u8>,
    n: usize,
}

impl LatestKey {
    /// Clears the state for the next scan.
    pub fn reset(&mut self) {
        self.key.clear();
        self.n = 0;
    }

    /// The number of rows the last scan visited.
    pub fn n(&self) -> usize {
        self.n
    }

    /// The largest key the last scan visited, if any.
    pub fn key(&self) -> Option<&[u8]> {
        (self.n > 0).then_some(self.key.as_slice())
    }
}

impl ScanVisitor for LatestKey {
    fn visit(&mut self, key: &[u8], _value: &[u8]) -> bool {
        self.key.clear();
        self.key.extend_from_slice(key);
        self.n += 1;
        true
    }
}

/// Accumulates the distinct item ids referenced by scanned order_line
/// rows: the scan half of StockLevel's manual join.
#[derive(Debug, Default)]
pub struct DistinctItemIds {
    ids: HashSet<u32>,
    rows: usize,
}

impl DistinctItemIds {
    /// Clears accumulated ids for the next scan.
    pub fn reset(&mut self) {
        self.ids.clear();
        self.rows = 0;
    }

    /// The number of order_line rows scanned.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The distinct item ids seen.
    pub fn ids(&self) -> &HashSet<u32> {
        &self.ids
    }
}

impl ScanVisitor for DistinctItemIds {
    fn visit(&mut self, _key: &[u8], value: &[u8]) -> bool {
        let v = OrderLineValue::decode(value);
        assert!(
            v.ol_i_id >= 1 && v.ol_i_id <= NUM_ITEMS,
            "order line item id {} out of range",
            v.ol_i_id
        );
        self.ids.insert(v.ol_i_id);
        self.rows += 1;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ScanVisitor;

    #[test]
    fn first_key_stops_immediately() {
        let mut v = FirstKey::default();
        assert_eq!(v.key(), None);
        assert!(!v.visit(b"a", b""));
        assert_eq!(v.key(), Some(&b"a"[..]));
        v.reset();
        assert_eq!(v.key(), None);
    }

    #[test]
    fn collect_rows_caps_and_reuses() {
        let mut v = CollectRows::new(2);
        assert!(v.visit(b"k1", b"v1"));
        assert!(!v.visit(b"k2", b"v2"));
        assert_eq!(v.len(), 2);
        assert!(v.hit_cap());
        assert_eq!(v.key(0), b"k1");
        assert_eq!(v.value(1), b"v2");

        v.reset();
        assert!(v.is_empty());
        assert!(v.visit(b"x", b"y"));
        assert_eq!(v.len(), 1);
        assert_eq!(v.key(0), b"x");
        assert!(!v.hit_cap());
    }

    #[test]
    fn latest_key_keeps_last() {
        let mut v = LatestKey::default();
        assert!(v.visit(b"a", b""));
        assert!(v.visit(b"b", b""));
        assert!(v.visit(b"c", b""));
        assert_eq!(v.key(), Some(&b"c"[..]));
        assert_eq!(v.n(), 3);
    }

    #[test]
    fn distinct_item_ids_dedupe() {
        use crate::schema::OrderLineValue;

        let mut v = DistinctItemIds::default();
        let mut buf = Vec::new();
        for i_id in [7u32, 8, 7, 9, 8] {
            OrderLineValue {
                ol_i_id: i_id,
                ..Default::default()
            }
            .encode(&mut buf);
            assert!(v.visit(b"", &buf));
        }
        assert_eq!(v.rows(), 5);
        assert_eq!(v.ids().len(), 3);
        assert!(v.ids().contains(&9));
    }
}
