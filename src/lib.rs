// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! Transaction Processing Performance Council Benchmark C ([TPCC])
//!
//! [TPCC]: https://www.tpc.org/tpcc/
//!
//! An OLTP workload driver for ordered transactional key-value engines.
//!
//! The crate populates the eleven-table TPCC schema through the [load]
//! module and then replays the five-profile transaction mix through
//! [worker::Worker], against any engine exposing the [engine::Engine]
//! boundary: ordered tables of opaque byte keys and values with
//! transactional point operations and ascending range scans. Secondary
//! indexes and joins are maintained and executed by hand; there is no
//! query planner anywhere.
//!
//! Everything is deterministic given the seeds: loaders and workers own
//! their generator state explicitly, so two runs seeded identically
//! produce identical databases and identical transaction streams.

#![warn(missing_docs, missing_debug_implementations)]

pub mod affinity;
pub mod check;
pub mod codec;
pub mod engine;
pub mod gen;
pub mod load;
pub mod mem;
pub mod scan;
pub mod schema;
pub mod worker;

/// Configuration for the loaders and workers.
#[derive(Debug, Clone)]
pub struct TpccConfig {
    /// The number of warehouses and the base unit of scaling.
    pub warehouses: u32,
    /// Run the per-table sanity checks after every decode.
    pub check_invariants: bool,
    /// Pin loaders and workers to the core assigned to their warehouse.
    pub pin_cpus: bool,
}

impl TpccConfig {
    /// A configuration with the given warehouse count, sanity checks on,
    /// and CPU pinning off.
    pub fn new(warehouses: u32) -> Self {
        assert!(warehouses >= 1, "need at least one warehouse");
        TpccConfig {
            warehouses,
            check_invariants: true,
            pin_cpus: false,
        }
    }
}

// These constants are set by the spec - they're not knobs. Don't change them.

/// The number of rows in the item table.
pub const NUM_ITEMS: u32 = 100_000;
/// The number of districts in each warehouse.
pub const NUM_DISTRICTS_PER_WAREHOUSE: u32 = 10;
/// The number of customers in each district.
pub const NUM_CUSTOMERS_PER_DISTRICT: u32 = 3_000;
/// The number of initially loaded orders in each district.
pub const NUM_ORDERS_PER_DISTRICT: u32 = 3_000;
/// The first loaded order id left undelivered (it gets a new_order row and
/// no carrier).
pub const FIRST_UNDELIVERED_O_ID: u32 = 2_101;
/// The most order lines any order may have.
pub const MAX_OL_CNT: u32 = 15;
/// The initial warehouse year-to-date balance.
pub const INITIAL_W_YTD: f64 = 300_000.00;
/// The initial district year-to-date balance.
pub const INITIAL_D_YTD: f64 = 30_000.00;

/// An explicit logical timestamp source.
///
/// Order entry, delivery, and history rows are stamped from one of these.
/// Each loader and worker owns its own clock, so stamps are monotonic per
/// owner with no hidden thread-local state. A harness that wants wall time
/// instead can seed the start from a real clock; nothing in the workload
/// compares stamps across owners.
#[derive(Debug, Clone)]
pub struct Clock {
    next: u32,
}

impl Clock {
    /// A clock whose first tick returns `start`.
    pub fn new(start: u32) -> Self {
        Clock { next: start }
    }

    /// Returns the next timestamp.
    pub fn tick(&mut self) -> u32 {
        let ts = self.next;
        self.next = self.next.wrapping_add(1);
        ts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_ticks() {
        let mut clock = Clock::new(7);
        assert_eq!(clock.tick(), 7);
        assert_eq!(clock.tick(), 8);
        assert_eq!(clock.tick(), 9);
    }
}
