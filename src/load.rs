// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! Bulk loaders for the initial database image
//!
//! Six loaders populate the eleven tables in dependency order: warehouse,
//! item, stock, district, customer (+ name index + history), order
//! (+ order index + new_order + order_line). Later loaders read nothing
//! back but rely on the id ranges established earlier.
//!
//! The stock, customer, and order loaders optionally scope themselves to a
//! single warehouse so a harness can run one loader thread per warehouse.
//! In that mode a commit abort is survivable: the batch is discarded and
//! regenerated. Unscoped (single-threaded) loads must not abort at all;
//! an abort there is fatal because the database must load completely.

use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{info, warn};

use crate::engine::{Aborted, Engine, TableId, Txn, TxnOptions};
use crate::schema::*;
use crate::{
    affinity, check, gen, Clock, TpccConfig, FIRST_UNDELIVERED_O_ID, INITIAL_D_YTD, INITIAL_W_YTD,
    NUM_CUSTOMERS_PER_DISTRICT, NUM_DISTRICTS_PER_WAREHOUSE, NUM_ITEMS, NUM_ORDERS_PER_DISTRICT,
};

/// Runs all six loaders single-threaded in dependency order, with the
/// conventional per-loader seeds.
///
/// A harness that wants parallel loading instead constructs the scoped
/// loaders itself, one per warehouse, with per-warehouse seeds.
pub fn load_all<E: Engine>(engine: &E, cfg: &TpccConfig) {
    WarehouseLoader::new(engine, cfg.clone(), 9_324).load();
    ItemLoader::new(engine, cfg.clone(), 235_443).load();
    StockLoader::new(engine, cfg.clone(), 89_785_943, None).load();
    DistrictLoader::new(engine, cfg.clone(), 129_856_349).load();
    CustomerLoader::new(engine, cfg.clone(), 923_587_856_425, None).load();
    OrderLoader::new(engine, cfg.clone(), 2_343_352, None).load();
}

fn scope_range(scope: Option<u32>, warehouses: u32) -> (u32, u32) {
    match scope {
        None => (1, warehouses),
        Some(w) => {
            assert!(w >= 1 && w <= warehouses, "scope warehouse {w} out of range");
            (w, w)
        }
    }
}

// A load abort is only survivable when the loader is scoped to one
// warehouse for parallel loading; the batch is then redone from scratch.
fn abort_is_fatal(loader: &str, scope: Option<u32>) {
    assert!(
        scope.is_some(),
        "{loader} loader aborted in single-threaded mode"
    );
    warn!("{} loader loading abort", loader);
}

/// Clears `out` and appends an alphanumeric string of nominal length
/// drawn from `[min, max]`.
fn rand_astr<R: Rng>(rng: &mut R, min: u32, max: u32, out: &mut String) {
    out.clear();
    let len = gen::rand_number(rng, min, max) as usize;
    gen::rand_str(rng, len, out);
}

/// A two-letter state code.
fn rand_state<R: Rng>(rng: &mut R, scratch: &mut String) -> [u8; 2] {
    scratch.clear();
    gen::rand_str(rng, 3, scratch);
    scratch.as_bytes().try_into().unwrap()
}

/// A customer zip: four random digits then the constant "11111".
fn rand_customer_zip<R: Rng>(rng: &mut R, scratch: &mut String) -> [u8; 9] {
    scratch.clear();
    gen::rand_nstr(rng, 4, scratch);
    scratch.push_str("11111");
    scratch.as_bytes().try_into().unwrap()
}

/// A sixteen-digit phone number.
fn rand_phone<R: Rng>(rng: &mut R, scratch: &mut String) -> [u8; 16] {
    scratch.clear();
    gen::rand_nstr(rng, 16, scratch);
    scratch.as_bytes().try_into().unwrap()
}

/// A 24-byte district distribution snapshot, zero-padded.
fn rand_dist_info<R: Rng>(rng: &mut R, scratch: &mut String) -> [u8; 24] {
    scratch.clear();
    gen::rand_str(rng, 24, scratch);
    let mut out = [0u8; 24];
    out[..scratch.len()].copy_from_slice(scratch.as_bytes());
    out
}

/// Loads the warehouse table, then reads every row back and verifies it.
#[derive(Debug)]
pub struct WarehouseLoader<'e, E: Engine> {
    engine: &'e E,
    cfg: TpccConfig,
    rng: SmallRng,
}

impl<'e, E: Engine> WarehouseLoader<'e, E> {
    /// A loader over `engine` seeded with `seed`.
    pub fn new(engine: &'e E, cfg: TpccConfig, seed: u64) -> Self {
        WarehouseLoader {
            engine,
            cfg,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Runs the load. Panics on abort: warehouse loading is always
    /// single-threaded.
    pub fn load(mut self) {
        let mut kbuf = Vec::new();
        let mut vbuf = Vec::new();
        let mut scratch = String::new();
        let mut loaded = Vec::with_capacity(self.cfg.warehouses as usize);
        let mut total_bytes = 0u64;

        let mut txn = self.engine.begin(TxnOptions::load());
        for w in 1..=self.cfg.warehouses {
            // Seems kind of silly to change affinity to insert one row,
            // but it keeps the row home-allocated.
            if self.cfg.pin_cpus {
                affinity::pin_to_warehouse(w);
            }
            let k = WarehouseKey { w_id: w };
            let mut v = WarehouseValue {
                w_ytd: INITIAL_W_YTD,
                w_tax: gen::rand_number(&mut self.rng, 0, 2000) as f64 / 10_000.0,
                w_zip: *b"123456789",
                ..Default::default()
            };
            rand_astr(&mut self.rng, 6, 10, &mut v.w_name);
            rand_astr(&mut self.rng, 10, 20, &mut v.w_street_1);
            rand_astr(&mut self.rng, 10, 20, &mut v.w_street_2);
            rand_astr(&mut self.rng, 10, 20, &mut v.w_city);
            v.w_state = rand_state(&mut self.rng, &mut scratch);

            if self.cfg.check_invariants {
                check::warehouse(&self.cfg, &k, &v);
            }
            k.encode(&mut kbuf);
            v.encode(&mut vbuf);
            total_bytes += vbuf.len() as u64;
            txn.insert(TableId::Warehouse, &kbuf, &vbuf)
                .expect("warehouse load must not abort");
            loaded.push(v);
        }
        txn.commit().expect("warehouse load must not abort");

        // Read everything back and make sure it survived the round trip.
        let mut txn = self.engine.begin(TxnOptions::load());
        for w in 1..=self.cfg.warehouses {
            let k = WarehouseKey { w_id: w };
            k.encode(&mut kbuf);
            let found = txn
                .get(TableId::Warehouse, &kbuf, &mut vbuf)
                .expect("warehouse load must not abort");
            assert!(found, "warehouse {w} missing after load");
            let v = WarehouseValue::decode(&vbuf);
            assert_eq!(v, loaded[(w - 1) as usize], "warehouse {w} readback");
            if self.cfg.check_invariants {
                check::warehouse(&self.cfg, &k, &v);
            }
        }
        txn.commit().expect("warehouse load must not abort");

        info!(
            avg_record_bytes = total_bytes / u64::from(self.cfg.warehouses),
            "finished loading warehouse"
        );
    }
}

/// Loads the item table.
#[derive(Debug)]
pub struct ItemLoader<'e, E: Engine> {
    engine: &'e E,
    cfg: TpccConfig,
    rng: SmallRng,
}

impl<'e, E: Engine> ItemLoader<'e, E> {
    /// A loader over `engine` seeded with `seed`.
    pub fn new(engine: &'e E, cfg: TpccConfig, seed: u64) -> Self {
        ItemLoader {
            engine,
            cfg,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Runs the load. Panics on abort: item loading is always
    /// single-threaded.
    pub fn load(mut self) {
        let bsize = self.engine.max_batch_size();
        let mut kbuf = Vec::new();
        let mut vbuf = Vec::new();
        let mut v = ItemValue::default();
        let mut total_bytes = 0u64;

        let mut txn = self.engine.begin(TxnOptions::load());
        for i in 1..=NUM_ITEMS {
            // Items don't belong to a warehouse, so no pinning.
            let k = ItemKey { i_id: i };
            rand_astr(&mut self.rng, 14, 24, &mut v.i_name);
            v.i_price = gen::rand_number(&mut self.rng, 100, 10_000) as f64 / 100.0;
            v.i_data.clear();
            gen::rand_data_str(&mut self.rng, &mut v.i_data);
            v.i_im_id = gen::rand_number(&mut self.rng, 1, 10_000);

            if self.cfg.check_invariants {
                check::item(&k, &v);
            }
            k.encode(&mut kbuf);
            v.encode(&mut vbuf);
            total_bytes += vbuf.len() as u64;
            txn.insert(TableId::Item, &kbuf, &vbuf)
                .expect("item load must not abort");

            if let Some(b) = bsize {
                if i as usize % b == 0 {
                    txn.commit().expect("item load must not abort");
                    txn = self.engine.begin(TxnOptions::load());
                }
            }
        }
        txn.commit().expect("item load must not abort");

        info!(
            avg_record_bytes = total_bytes / u64::from(NUM_ITEMS),
            "finished loading item"
        );
    }
}

/// Loads the stock table, optionally scoped to one warehouse.
#[derive(Debug)]
pub struct StockLoader<'e, E: Engine> {
    engine: &'e E,
    cfg: TpccConfig,
    rng: SmallRng,
    scope: Option<u32>,
    kbuf: Vec<u8>,
    vbuf: Vec<u8>,
    scratch: String,
    row: StockValue,
}

impl<'e, E: Engine> StockLoader<'e, E> {
    /// A loader over `engine` seeded with `seed`. `scope` restricts the
    /// load to one warehouse and makes aborts retryable.
    pub fn new(engine: &'e E, cfg: TpccConfig, seed: u64, scope: Option<u32>) -> Self {
        StockLoader {
            engine,
            cfg,
            rng: SmallRng::seed_from_u64(seed),
            scope,
            kbuf: Vec::new(),
            vbuf: Vec::new(),
            scratch: String::new(),
            row: StockValue::default(),
        }
    }

    fn insert_batch<T: Txn>(&mut self, txn: &mut T, w: u32, lo: u32, hi: u32) -> Result<(), Aborted> {
        for i in lo..=hi {
            let k = StockKey { s_w_id: w, s_i_id: i };
            let row = &mut self.row;
            row.s_quantity = gen::rand_number(&mut self.rng, 10, 100) as i16;
            row.s_ytd = 0;
            row.s_order_cnt = 0;
            row.s_remote_cnt = 0;
            for dist in &mut row.s_dist {
                *dist = rand_dist_info(&mut self.rng, &mut self.scratch);
            }
            row.s_data.clear();
            gen::rand_data_str(&mut self.rng, &mut row.s_data);

            if self.cfg.check_invariants {
                check::stock(&self.cfg, &k, row);
            }
            k.encode(&mut self.kbuf);
            self.row.encode(&mut self.vbuf);
            txn.insert(TableId::Stock, &self.kbuf, &self.vbuf)?;
        }
        Ok(())
    }

    /// Runs the load.
    pub fn load(mut self) {
        let (w_start, w_end) = scope_range(self.scope, self.cfg.warehouses);
        let batch = self
            .engine
            .max_batch_size()
            .map_or(NUM_ITEMS, |b| u32::try_from(b).unwrap())
            .max(1);

        for w in w_start..=w_end {
            if self.cfg.pin_cpus {
                affinity::pin_to_warehouse(w);
            }
            let mut i = 1u32;
            while i <= NUM_ITEMS {
                let hi = i.saturating_add(batch - 1).min(NUM_ITEMS);
                let mut txn = self.engine.begin(TxnOptions::load());
                match self.insert_batch(&mut txn, w, i, hi) {
                    Ok(()) => match txn.commit() {
                        Ok(()) => i = hi + 1,
                        Err(Aborted) => abort_is_fatal("stock", self.scope),
                    },
                    Err(Aborted) => {
                        txn.abort();
                        abort_is_fatal("stock", self.scope);
                    }
                }
            }
        }

        match self.scope {
            None => info!("finished loading stock"),
            Some(w) => info!(warehouse = w, "finished loading stock"),
        }
    }
}

/// Loads the district table.
#[derive(Debug)]
pub struct DistrictLoader<'e, E: Engine> {
    engine: &'e E,
    cfg: TpccConfig,
    rng: SmallRng,
}

impl<'e, E: Engine> DistrictLoader<'e, E> {
    /// A loader over `engine` seeded with `seed`.
    pub fn new(engine: &'e E, cfg: TpccConfig, seed: u64) -> Self {
        DistrictLoader {
            engine,
            cfg,
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    /// Runs the load. Panics on abort: district loading is always
    /// single-threaded.
    pub fn load(mut self) {
        let bsize = self.engine.max_batch_size();
        let mut kbuf = Vec::new();
        let mut vbuf = Vec::new();
        let mut scratch = String::new();
        let mut v = DistrictValue::default();
        let mut cnt = 0usize;

        let mut txn = self.engine.begin(TxnOptions::load());
        for w in 1..=self.cfg.warehouses {
            if self.cfg.pin_cpus {
                affinity::pin_to_warehouse(w);
            }
            for d in 1..=NUM_DISTRICTS_PER_WAREHOUSE {
                let k = DistrictKey { d_w_id: w, d_id: d };
                v.d_ytd = INITIAL_D_YTD;
                v.d_tax = gen::rand_number(&mut self.rng, 0, 2000) as f64 / 10_000.0;
                v.d_next_o_id = NUM_ORDERS_PER_DISTRICT + 1;
                rand_astr(&mut self.rng, 6, 10, &mut v.d_name);
                rand_astr(&mut self.rng, 10, 20, &mut v.d_street_1);
                rand_astr(&mut self.rng, 10, 20, &mut v.d_street_2);
                rand_astr(&mut self.rng, 10, 20, &mut v.d_city);
                v.d_state = rand_state(&mut self.rng, &mut scratch);
                v.d_zip = *b"123456789";

                if self.cfg.check_invariants {
                    check::district(&self.cfg, &k, &v);
                }
                k.encode(&mut kbuf);
                v.encode(&mut vbuf);
                txn.insert(TableId::District, &kbuf, &vbuf)
                    .expect("district load must not abort");

                cnt += 1;
                if let Some(b) = bsize {
                    if cnt % b == 0 {
                        txn.commit().expect("district load must not abort");
                        txn = self.engine.begin(TxnOptions::load());
                    }
                }
            }
        }
        txn.commit().expect("district load must not abort");

        info!("finished loading district");
    }
}

/// Loads customers plus their name-index and history rows, optionally
/// scoped to one warehouse.
#[derive(Debug)]
pub struct CustomerLoader<'e, E: Engine> {
    engine: &'e E,
    cfg: TpccConfig,
    rng: SmallRng,
    clock: Clock,
    scope: Option<u32>,
    kbuf: Vec<u8>,
    vbuf: Vec<u8>,
    scratch: String,
    customer: CustomerValue,
    history: HistoryValue,
}

impl<'e, E: Engine> CustomerLoader<'e, E> {
    /// A loader over `engine` seeded with `seed`. `scope` restricts the
    /// load to one warehouse and makes aborts retryable.
    pub fn new(engine: &'e E, cfg: TpccConfig, seed: u64, scope: Option<u32>) -> Self {
        CustomerLoader {
            engine,
            cfg,
            rng: SmallRng::seed_from_u64(seed),
            clock: Clock::new(0),
            scope,
            kbuf: Vec::new(),
            vbuf: Vec::new(),
            scratch: String::new(),
            customer: CustomerValue::default(),
            history: HistoryValue::default(),
        }
    }

    fn insert_district<T: Txn>(&mut self, txn: &mut T, w: u32, d: u32) -> Result<(), Aborted> {
        for c in 1..=NUM_CUSTOMERS_PER_DISTRICT {
            let k = CustomerKey {
                c_w_id: w,
                c_d_id: d,
                c_id: c,
            };
            let v = &mut self.customer;
            v.c_discount = gen::rand_number(&mut self.rng, 1, 5000) as f64 / 10_000.0;
            v.c_credit = if gen::rand_number(&mut self.rng, 1, 100) <= 10 {
                *b"BC"
            } else {
                *b"GC"
            };
            v.c_last.clear();
            // The first thousand customers per district get the thousand
            // sequential surnames so every surname is guaranteed present;
            // the rest draw non-uniformly.
            if c <= 1000 {
                gen::last_name(c - 1, &mut v.c_last);
            } else {
                gen::last_name_load(&mut self.rng, &mut v.c_last);
            }
            rand_astr(&mut self.rng, 8, 16, &mut v.c_first);
            v.c_credit_lim = 50_000.0;
            v.c_balance = -10.0;
            v.c_ytd_payment = 10.0;
            v.c_payment_cnt = 1;
            v.c_delivery_cnt = 0;
            rand_astr(&mut self.rng, 10, 20, &mut v.c_street_1);
            rand_astr(&mut self.rng, 10, 20, &mut v.c_street_2);
            rand_astr(&mut self.rng, 10, 20, &mut v.c_city);
            v.c_state = rand_state(&mut self.rng, &mut self.scratch);
            v.c_zip = rand_customer_zip(&mut self.rng, &mut self.scratch);
            v.c_phone = rand_phone(&mut self.rng, &mut self.scratch);
            v.c_since = self.clock.tick();
            v.c_middle = *b"OE";
            rand_astr(&mut self.rng, 300, 500, &mut v.c_data);

            if self.cfg.check_invariants {
                check::customer(&self.cfg, &k, v);
            }
            k.encode(&mut self.kbuf);
            v.encode(&mut self.vbuf);
            txn.insert(TableId::Customer, &self.kbuf, &self.vbuf)?;

            // Index structure is (c_w_id, c_d_id, c_last, c_first) -> c_id.
            let k_idx = CustomerNameKey::from_names(w, d, &v.c_last, &v.c_first);
            k_idx.encode(&mut self.kbuf);
            CustomerNameValue { c_id: c }.encode(&mut self.vbuf);
            txn.insert(TableId::CustomerNameIdx, &self.kbuf, &self.vbuf)?;

            let k_hist = HistoryKey {
                h_c_d_id: d,
                h_c_w_id: w,
                h_c_id: c,
                h_d_id: d,
                h_w_id: w,
                h_date: self.clock.tick(),
            };
            self.history.h_amount = 10.00;
            self.history.h_data.clear();
            let len = gen::rand_number(&mut self.rng, 10, 24) as usize;
            gen::rand_str(&mut self.rng, len, &mut self.history.h_data);
            k_hist.encode(&mut self.kbuf);
            self.history.encode(&mut self.vbuf);
            txn.insert(TableId::History, &self.kbuf, &self.vbuf)?;
        }
        Ok(())
    }

    /// Runs the load.
    pub fn load(mut self) {
        let (w_start, w_end) = scope_range(self.scope, self.cfg.warehouses);

        for w in w_start..=w_end {
            if self.cfg.pin_cpus {
                affinity::pin_to_warehouse(w);
            }
            let mut d = 1;
            while d <= NUM_DISTRICTS_PER_WAREHOUSE {
                let mut txn = self.engine.begin(TxnOptions::load());
                match self.insert_district(&mut txn, w, d) {
                    Ok(()) => match txn.commit() {
                        Ok(()) => d += 1,
                        Err(Aborted) => abort_is_fatal("customer", self.scope),
                    },
                    Err(Aborted) => {
                        txn.abort();
                        abort_is_fatal("customer", self.scope);
                    }
                }
            }
        }

        match self.scope {
            None => info!("finished loading customer"),
            Some(w) => info!(warehouse = w, "finished loading customer"),
        }
    }
}

/// Loads initial orders plus their index, new_order, and order_line rows,
/// optionally scoped to one warehouse.
#[derive(Debug)]
pub struct OrderLoader<'e, E: Engine> {
    engine: &'e E,
    cfg: TpccConfig,
    rng: SmallRng,
    clock: Clock,
    scope: Option<u32>,
    c_ids: Vec<u32>,
    kbuf: Vec<u8>,
    vbuf: Vec<u8>,
    scratch: String,
}

impl<'e, E: Engine> OrderLoader<'e, E> {
    /// A loader over `engine` seeded with `seed`. `scope` restricts the
    /// load to one warehouse and makes aborts retryable.
    pub fn new(engine: &'e E, cfg: TpccConfig, seed: u64, scope: Option<u32>) -> Self {
        OrderLoader {
            engine,
            cfg,
            rng: SmallRng::seed_from_u64(seed),
            clock: Clock::new(0),
            scope,
            c_ids: Vec::new(),
            kbuf: Vec::new(),
            vbuf: Vec::new(),
            scratch: String::new(),
        }
    }

    fn insert_order<T: Txn>(&mut self, txn: &mut T, w: u32, d: u32, o: u32) -> Result<(), Aborted> {
        let k_oo = OorderKey {
            o_w_id: w,
            o_d_id: d,
            o_id: o,
        };
        let v_oo = OorderValue {
            o_c_id: self.c_ids[(o - 1) as usize],
            o_carrier_id: if o < FIRST_UNDELIVERED_O_ID {
                gen::rand_number(&mut self.rng, 1, 10) as u8
            } else {
                0
            },
            o_ol_cnt: gen::rand_number(&mut self.rng, 5, 15) as u8,
            o_all_local: true,
            o_entry_d: self.clock.tick(),
        };
        if self.cfg.check_invariants {
            check::oorder(&self.cfg, &k_oo, &v_oo);
        }
        k_oo.encode(&mut self.kbuf);
        v_oo.encode(&mut self.vbuf);
        txn.insert(TableId::Oorder, &self.kbuf, &self.vbuf)?;

        let k_idx = OorderCIdKey {
            o_w_id: w,
            o_d_id: d,
            o_c_id: v_oo.o_c_id,
            o_o_id: o,
        };
        k_idx.encode(&mut self.kbuf);
        OorderCIdValue.encode(&mut self.vbuf);
        txn.insert(TableId::OorderCIdIdx, &self.kbuf, &self.vbuf)?;

        if o >= FIRST_UNDELIVERED_O_ID {
            let k_no = NewOrderKey {
                no_w_id: w,
                no_d_id: d,
                no_o_id: o,
            };
            if self.cfg.check_invariants {
                check::new_order(&self.cfg, &k_no, &NewOrderValue);
            }
            k_no.encode(&mut self.kbuf);
            NewOrderValue.encode(&mut self.vbuf);
            txn.insert(TableId::NewOrder, &self.kbuf, &self.vbuf)?;
        }

        let delivered = o < FIRST_UNDELIVERED_O_ID;
        for l in 1..=u32::from(v_oo.o_ol_cnt) {
            let k_ol = OrderLineKey {
                ol_w_id: w,
                ol_d_id: d,
                ol_o_id: o,
                ol_number: l,
            };
            let v_ol = OrderLineValue {
                ol_i_id: gen::rand_number(&mut self.rng, 1, NUM_ITEMS),
                ol_delivery_d: if delivered { v_oo.o_entry_d } else { 0 },
                ol_amount: if delivered {
                    0.0
                } else {
                    // Random within [0.01, 9999.99].
                    gen::rand_number(&mut self.rng, 1, 999_999) as f64 / 100.0
                },
                ol_supply_w_id: w,
                ol_quantity: 5,
                ol_dist_info: rand_dist_info(&mut self.rng, &mut self.scratch),
            };
            if self.cfg.check_invariants {
                check::order_line(&self.cfg, &k_ol, &v_ol);
            }
            k_ol.encode(&mut self.kbuf);
            v_ol.encode(&mut self.vbuf);
            txn.insert(TableId::OrderLine, &self.kbuf, &self.vbuf)?;
        }
        Ok(())
    }

    /// Runs the load.
    pub fn load(mut self) {
        let (w_start, w_end) = scope_range(self.scope, self.cfg.warehouses);

        for w in w_start..=w_end {
            if self.cfg.pin_cpus {
                affinity::pin_to_warehouse(w);
            }
            for d in 1..=NUM_DISTRICTS_PER_WAREHOUSE {
                // A pseudo-random bijection from orders to customers, so
                // order o belongs to a customer other than o itself
                // (almost always) while every customer gets exactly one
                // initial order.
                self.c_ids.clear();
                self.c_ids.extend(1..=NUM_CUSTOMERS_PER_DISTRICT);
                self.c_ids.shuffle(&mut self.rng);

                let mut o = 1u32;
                while o <= NUM_ORDERS_PER_DISTRICT {
                    let mut txn = self.engine.begin(TxnOptions::load());
                    match self.insert_order(&mut txn, w, d, o) {
                        Ok(()) => match txn.commit() {
                            Ok(()) => o += 1,
                            Err(Aborted) => abort_is_fatal("order", self.scope),
                        },
                        Err(Aborted) => {
                            txn.abort();
                            abort_is_fatal("order", self.scope);
                        }
                    }
                }
            }
        }

        match self.scope {
            None => info!("finished loading order"),
            Some(w) => info!(warehouse = w, "finished loading order"),
        }
    }
}
