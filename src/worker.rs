// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! The five transaction profiles, run by per-warehouse workers
//!
//! Every profile follows the same shape: draw all randomized inputs up
//! front, open a transaction, perform a fixed sequence of point
//! operations and ordered scans (decoding and sanity-checking every row
//! read), then try to commit. Success bumps the worker's commit counter
//! and yields a signed byte delta; an engine abort bumps the abort
//! counter and yields [Aborted] with no internal retry. Retrying is the
//! caller's call.
//!
//! The inputs live in plain structs ([NewOrderInput] and friends) so a
//! test can pin them instead of drawing them.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::engine::{Aborted, Engine, TableId, Txn, TxnOptions, WorkloadHint};
use crate::scan::{CollectRows, DistinctItemIds, FirstKey, LatestKey};
use crate::schema::*;
use crate::{
    affinity, check, gen, Clock, TpccConfig, NUM_DISTRICTS_PER_WAREHOUSE, NUM_ITEMS,
};

/// The cap on rows a surname-index scan may collect. Reaching it is a
/// fatal capacity-exceeded condition (the middle pick would silently go
/// wrong on a truncated result), not a truncation.
pub const MAX_CUSTOMER_IDX_SCAN_ELEMS: usize = 512;

/// The five transaction profiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TxnKind {
    /// Enter a new order.
    NewOrder,
    /// Record a customer payment.
    Payment,
    /// Deliver pending orders, one per district.
    Delivery,
    /// Report a customer's newest order (read-only).
    OrderStatus,
    /// Count low-stock items behind recent orders (read-only).
    StockLevel,
}

/// The fixed workload mix as (profile, weight percent) pairs.
pub const WORKLOAD_MIX: [(TxnKind, u32); 5] = [
    (TxnKind::NewOrder, 45),
    (TxnKind::Payment, 43),
    (TxnKind::Delivery, 4),
    (TxnKind::OrderStatus, 4),
    (TxnKind::StockLevel, 4),
];

/// Picks a profile by the weighted mix.
pub fn pick_txn<R: Rng>(rng: &mut R) -> TxnKind {
    let mut roll = gen::rand_number(rng, 1, 100);
    for (kind, weight) in WORKLOAD_MIX {
        if roll <= weight {
            return kind;
        }
        roll -= weight;
    }
    unreachable!("workload weights sum to 100")
}

/// One prospective order line of a [NewOrderInput].
#[derive(Clone, Copy, Debug, Default)]
pub struct OrderLineInput {
    /// The ordered item.
    pub item_id: u32,
    /// The supplying warehouse.
    pub supply_w_id: u32,
    /// Units ordered, 1..=10.
    pub quantity: u32,
}

/// Inputs to one NewOrder attempt.
#[derive(Clone, Debug)]
pub struct NewOrderInput {
    /// The ordering district.
    pub district_id: u32,
    /// The ordering customer.
    pub customer_id: u32,
    // The benchmark caps lines at 15, so they live on the stack.
    lines: [OrderLineInput; 15],
    num_lines: usize,
}

impl NewOrderInput {
    /// An order with no lines yet; push 5 to 15 with
    /// [NewOrderInput::push_line].
    pub fn new(district_id: u32, customer_id: u32) -> Self {
        NewOrderInput {
            district_id,
            customer_id,
            lines: [OrderLineInput::default(); 15],
            num_lines: 0,
        }
    }

    /// Appends an order line.
    pub fn push_line(&mut self, line: OrderLineInput) {
        assert!(self.num_lines < self.lines.len(), "orders cap at 15 lines");
        self.lines[self.num_lines] = line;
        self.num_lines += 1;
    }

    /// The order's lines.
    pub fn lines(&self) -> &[OrderLineInput] {
        &self.lines[..self.num_lines]
    }
}

/// How Payment and OrderStatus locate their customer.
#[derive(Clone, Debug)]
pub enum CustomerSelector {
    /// Range-scan the name index for this surname and take the middle
    /// match (lower middle on even counts).
    ByName(String),
    /// Point-read this customer id.
    ById(u32),
}

/// Inputs to one Payment attempt.
#[derive(Clone, Debug)]
pub struct PaymentInput {
    /// The paying district in the home warehouse.
    pub district_id: u32,
    /// The customer's warehouse; differs from home for remote payments.
    pub customer_w_id: u32,
    /// The customer's district.
    pub customer_d_id: u32,
    /// The customer lookup.
    pub customer: CustomerSelector,
    /// Payment amount in [1.00, 5000.00].
    pub amount: f64,
}

/// Inputs to one Delivery attempt.
#[derive(Clone, Copy, Debug)]
pub struct DeliveryInput {
    /// The carrier assigned to every order this attempt delivers.
    pub carrier_id: u32,
}

/// Inputs to one OrderStatus attempt.
#[derive(Clone, Debug)]
pub struct OrderStatusInput {
    /// The district to look in.
    pub district_id: u32,
    /// The customer lookup.
    pub customer: CustomerSelector,
}

/// Inputs to one StockLevel attempt.
#[derive(Clone, Copy, Debug)]
pub struct StockLevelInput {
    /// The district whose recent orders to join against stock.
    pub district_id: u32,
    /// The low-stock threshold in [10, 20].
    pub threshold: u32,
}

/// One workload worker bound to a home warehouse.
///
/// A harness runs one worker per warehouse (or several warehouses per
/// thread), calling [Worker::run_one] back to back and reading the
/// commit/abort counters for its statistics.
#[derive(Debug)]
pub struct Worker<'e, E: Engine> {
    engine: &'e E,
    cfg: TpccConfig,
    warehouse_id: u32,
    rng: SmallRng,
    clock: Clock,
    // Delivery resumes each district's new_order probe where the last
    // call left off, so already delivered ids are never rescanned.
    last_no_o_ids: [u32; NUM_DISTRICTS_PER_WAREHOUSE as usize],
    commits: u64,
    aborts: u64,
    // Scratch reused across attempts, never shared across workers.
    key0: Vec<u8>,
    key1: Vec<u8>,
    val: Vec<u8>,
    out: Vec<u8>,
    idx_rows: CollectRows,
    line_rows: CollectRows,
    first_no: FirstKey,
    latest_order: LatestKey,
    distinct_items: DistinctItemIds,
}

impl<'e, E: Engine> Worker<'e, E> {
    /// A worker over `engine` for `warehouse_id`, seeded with `seed`.
    pub fn new(engine: &'e E, cfg: TpccConfig, warehouse_id: u32, seed: u64) -> Self {
        assert!(
            warehouse_id >= 1 && warehouse_id <= cfg.warehouses,
            "warehouse {warehouse_id} out of range"
        );
        Worker {
            engine,
            cfg,
            warehouse_id,
            rng: SmallRng::seed_from_u64(seed),
            clock: Clock::new(0),
            last_no_o_ids: [0; NUM_DISTRICTS_PER_WAREHOUSE as usize],
            commits: 0,
            aborts: 0,
            key0: Vec::new(),
            key1: Vec::new(),
            val: Vec::new(),
            out: Vec::new(),
            idx_rows: CollectRows::new(MAX_CUSTOMER_IDX_SCAN_ELEMS),
            line_rows: CollectRows::new(15),
            first_no: FirstKey::default(),
            latest_order: LatestKey::default(),
            distinct_items: DistinctItemIds::default(),
        }
    }

    /// The worker's home warehouse.
    pub fn warehouse_id(&self) -> u32 {
        self.warehouse_id
    }

    /// Committed attempts across all profiles.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    /// Aborted attempts across all profiles.
    pub fn aborts(&self) -> u64 {
        self.aborts
    }

    /// Pins the calling thread to the warehouse's core if the config asks
    /// for pinning. Returns whether the thread is verifiably pinned.
    pub fn pin(&self) -> bool {
        if !self.cfg.pin_cpus {
            return false;
        }
        affinity::pin_to_warehouse(self.warehouse_id)
            && affinity::is_pinned_to_warehouse(self.warehouse_id)
    }

    /// Picks a profile by the weighted mix and runs it once.
    pub fn run_one(&mut self) -> (TxnKind, Result<isize, Aborted>) {
        let kind = pick_txn(&mut self.rng);
        let result = match kind {
            TxnKind::NewOrder => self.new_order(),
            TxnKind::Payment => self.payment(),
            TxnKind::Delivery => self.delivery(),
            TxnKind::OrderStatus => self.order_status(),
            TxnKind::StockLevel => self.stock_level(),
        };
        (kind, result)
    }

    // ABORT is terminal per attempt: whoever wants a retry runs the
    // profile again with fresh inputs.
    fn finish<T: Txn, R>(&mut self, txn: T, body: Result<R, Aborted>) -> Result<R, Aborted> {
        match body {
            Ok(out) => match txn.commit() {
                Ok(()) => {
                    self.commits += 1;
                    Ok(out)
                }
                Err(Aborted) => {
                    self.aborts += 1;
                    Err(Aborted)
                }
            },
            Err(Aborted) => {
                txn.abort();
                self.aborts += 1;
                Err(Aborted)
            }
        }
    }

    fn gen_customer_selector(&mut self) -> CustomerSelector {
        if gen::rand_number(&mut self.rng, 1, 100) <= 60 {
            let mut name = String::new();
            gen::last_name_run(&mut self.rng, &mut name);
            CustomerSelector::ByName(name)
        } else {
            CustomerSelector::ById(gen::customer_id(&mut self.rng))
        }
    }

    // Locates a customer by selector: a point get for ById, or the
    // surname range scan with the deterministic middle pick for ByName.
    fn lookup_customer<T: Txn>(
        &mut self,
        txn: &mut T,
        w_id: u32,
        d_id: u32,
        selector: &CustomerSelector,
    ) -> Result<(CustomerKey, CustomerValue), Aborted> {
        let c_id = match selector {
            CustomerSelector::ById(c_id) => *c_id,
            CustomerSelector::ByName(last) => {
                let (lo, hi) = CustomerNameKey::surname_range(w_id, d_id, last);
                lo.encode(&mut self.key0);
                hi.encode(&mut self.key1);
                self.idx_rows.reset();
                txn.scan(
                    TableId::CustomerNameIdx,
                    &self.key0,
                    &self.key1,
                    &mut self.idx_rows,
                )?;
                let n = self.idx_rows.len();
                assert!(n > 0, "no customer with surname {last:?}");
                assert!(
                    !self.idx_rows.hit_cap(),
                    "surname {last:?} matched {n}+ customers, over the scan cap"
                );
                let index = if n % 2 == 0 { n / 2 - 1 } else { n / 2 };
                CustomerNameValue::decode(self.idx_rows.value(index)).c_id
            }
        };

        let k_c = CustomerKey {
            c_w_id: w_id,
            c_d_id: d_id,
            c_id,
        };
        k_c.encode(&mut self.key0);
        let found = txn.get(TableId::Customer, &self.key0, &mut self.val)?;
        assert!(found, "customer {k_c:?} missing");
        let v_c = CustomerValue::decode(&self.val);
        if self.cfg.check_invariants {
            check::customer(&self.cfg, &k_c, &v_c);
        }
        Ok((k_c, v_c))
    }

    /// Draws the randomized inputs for one NewOrder attempt: a district,
    /// a skewed customer, and 5..=15 lines, ~1% of them supplied by a
    /// remote warehouse when there is more than one.
    pub fn gen_new_order_input(&mut self) -> NewOrderInput {
        let district_id = gen::rand_number(&mut self.rng, 1, NUM_DISTRICTS_PER_WAREHOUSE);
        let customer_id = gen::customer_id(&mut self.rng);
        let num_lines = gen::rand_number(&mut self.rng, 5, 15);
        let mut input = NewOrderInput::new(district_id, customer_id);
        for _ in 0..num_lines {
            let item_id = gen::item_id(&mut self.rng);
            let supply_w_id = if self.cfg.warehouses == 1
                || gen::rand_number(&mut self.rng, 1, 100) > 1
            {
                self.warehouse_id
            } else {
                loop {
                    let w = gen::rand_number(&mut self.rng, 1, self.cfg.warehouses);
                    if w != self.warehouse_id {
                        break w;
                    }
                }
            };
            input.push_line(OrderLineInput {
                item_id,
                supply_w_id,
                quantity: gen::rand_number(&mut self.rng, 1, 10),
            });
        }
        input
    }

    /// Runs one NewOrder with freshly drawn inputs.
    pub fn new_order(&mut self) -> Result<isize, Aborted> {
        let input = self.gen_new_order_input();
        self.new_order_with(&input)
    }

    /// Runs one NewOrder attempt: reads the customer, warehouse, and
    /// district, allocates the next order id from the district counter,
    /// inserts the order with its index and marker rows, and walks the
    /// lines reading items and adjusting stock. Returns the bytes
    /// written on commit.
    pub fn new_order_with(&mut self, input: &NewOrderInput) -> Result<isize, Aborted> {
        let mut txn = self
            .engine
            .begin(TxnOptions::profile(WorkloadHint::NewOrder, false));
        let body = self.new_order_body(&mut txn, input);
        self.finish(txn, body)
    }

    fn new_order_body<T: Txn>(
        &mut self,
        txn: &mut T,
        input: &NewOrderInput,
    ) -> Result<isize, Aborted> {
        let w_id = self.warehouse_id;
        let d_id = input.district_id;
        let mut delta = 0isize;

        let k_c = CustomerKey {
            c_w_id: w_id,
            c_d_id: d_id,
            c_id: input.customer_id,
        };
        k_c.encode(&mut self.key0);
        let found = txn.get(TableId::Customer, &self.key0, &mut self.val)?;
        assert!(found, "customer {k_c:?} missing");
        let v_c = CustomerValue::decode(&self.val);
        if self.cfg.check_invariants {
            check::customer(&self.cfg, &k_c, &v_c);
        }

        let k_w = WarehouseKey { w_id };
        k_w.encode(&mut self.key0);
        let found = txn.get(TableId::Warehouse, &self.key0, &mut self.val)?;
        assert!(found, "warehouse {w_id} missing");
        let v_w = WarehouseValue::decode(&self.val);
        if self.cfg.check_invariants {
            check::warehouse(&self.cfg, &k_w, &v_w);
        }

        let k_d = DistrictKey {
            d_w_id: w_id,
            d_id,
        };
        k_d.encode(&mut self.key0);
        let found = txn.get(TableId::District, &self.key0, &mut self.val)?;
        assert!(found, "district ({w_id}, {d_id}) missing");
        let mut v_d = DistrictValue::decode(&self.val);
        if self.cfg.check_invariants {
            check::district(&self.cfg, &k_d, &v_d);
        }
        let o_id = v_d.d_next_o_id;

        let k_no = NewOrderKey {
            no_w_id: w_id,
            no_d_id: d_id,
            no_o_id: o_id,
        };
        k_no.encode(&mut self.key0);
        NewOrderValue.encode(&mut self.out);
        txn.insert(TableId::NewOrder, &self.key0, &self.out)?;
        delta += self.out.len() as isize;

        v_d.d_next_o_id += 1;
        k_d.encode(&mut self.key0);
        v_d.encode(&mut self.out);
        txn.put(TableId::District, &self.key0, &self.out)?;

        let k_oo = OorderKey {
            o_w_id: w_id,
            o_d_id: d_id,
            o_id,
        };
        let v_oo = OorderValue {
            o_c_id: input.customer_id,
            o_carrier_id: 0, // not delivered yet
            o_ol_cnt: input.lines().len() as u8,
            o_all_local: input.lines().iter().all(|l| l.supply_w_id == w_id),
            o_entry_d: self.clock.tick(),
        };
        k_oo.encode(&mut self.key0);
        v_oo.encode(&mut self.out);
        txn.insert(TableId::Oorder, &self.key0, &self.out)?;
        delta += self.out.len() as isize;

        let k_oo_idx = OorderCIdKey {
            o_w_id: w_id,
            o_d_id: d_id,
            o_c_id: input.customer_id,
            o_o_id: o_id,
        };
        k_oo_idx.encode(&mut self.key0);
        OorderCIdValue.encode(&mut self.out);
        txn.insert(TableId::OorderCIdIdx, &self.key0, &self.out)?;

        for (idx, line) in input.lines().iter().enumerate() {
            let ol_number = idx as u32 + 1;

            let k_i = ItemKey { i_id: line.item_id };
            k_i.encode(&mut self.key0);
            let found = txn.get(TableId::Item, &self.key0, &mut self.val)?;
            assert!(found, "item {} missing", line.item_id);
            let v_i = ItemValue::decode(&self.val);
            if self.cfg.check_invariants {
                check::item(&k_i, &v_i);
            }

            // The stock row lives in the order's home warehouse even for
            // remote lines; the supplier only shows up in the counters.
            let k_s = StockKey {
                s_w_id: w_id,
                s_i_id: line.item_id,
            };
            k_s.encode(&mut self.key0);
            let found = txn.get(TableId::Stock, &self.key0, &mut self.val)?;
            assert!(found, "stock ({w_id}, {}) missing", line.item_id);
            let mut v_s = StockValue::decode(&self.val);
            if self.cfg.check_invariants {
                check::stock(&self.cfg, &k_s, &v_s);
            }
            let dist_info = *v_s.dist_info(d_id);

            // Wraparound replenishment keeps the quantity in its band.
            let quantity = line.quantity as i16;
            if v_s.s_quantity - quantity >= 10 {
                v_s.s_quantity -= quantity;
            } else {
                v_s.s_quantity += -quantity + 91;
            }
            v_s.s_ytd += line.quantity;
            if line.supply_w_id != w_id {
                v_s.s_remote_cnt += 1;
            }
            v_s.encode(&mut self.out);
            txn.put(TableId::Stock, &self.key0, &self.out)?;

            let k_ol = OrderLineKey {
                ol_w_id: w_id,
                ol_d_id: d_id,
                ol_o_id: o_id,
                ol_number,
            };
            let v_ol = OrderLineValue {
                ol_i_id: line.item_id,
                ol_delivery_d: 0, // not delivered yet
                ol_amount: line.quantity as f64 * v_i.i_price,
                ol_supply_w_id: line.supply_w_id,
                ol_quantity: line.quantity as u8,
                ol_dist_info: dist_info,
            };
            k_ol.encode(&mut self.key0);
            v_ol.encode(&mut self.out);
            txn.insert(TableId::OrderLine, &self.key0, &self.out)?;
            delta += self.out.len() as isize;
        }

        Ok(delta)
    }

    /// Draws the randomized inputs for one Payment attempt: 85% home
    /// customer (always, with one warehouse), 60% surname lookup, amount
    /// in [1.00, 5000.00].
    pub fn gen_payment_input(&mut self) -> PaymentInput {
        let district_id = gen::rand_number(&mut self.rng, 1, NUM_DISTRICTS_PER_WAREHOUSE);
        let (customer_w_id, customer_d_id) = if self.cfg.warehouses == 1
            || gen::rand_number(&mut self.rng, 1, 100) <= 85
        {
            (self.warehouse_id, district_id)
        } else {
            let d = gen::rand_number(&mut self.rng, 1, NUM_DISTRICTS_PER_WAREHOUSE);
            let w = loop {
                let w = gen::rand_number(&mut self.rng, 1, self.cfg.warehouses);
                if w != self.warehouse_id {
                    break w;
                }
            };
            (w, d)
        };
        PaymentInput {
            district_id,
            customer_w_id,
            customer_d_id,
            customer: self.gen_customer_selector(),
            amount: gen::rand_number(&mut self.rng, 100, 500_000) as f64 / 100.0,
        }
    }

    /// Runs one Payment with freshly drawn inputs.
    pub fn payment(&mut self) -> Result<isize, Aborted> {
        let input = self.gen_payment_input();
        self.payment_with(&input)
    }

    /// Runs one Payment attempt: credits warehouse and district ytd,
    /// debits the customer, rewrites bad-credit data, and appends a
    /// history row. Returns the bytes written on commit.
    pub fn payment_with(&mut self, input: &PaymentInput) -> Result<isize, Aborted> {
        let mut txn = self
            .engine
            .begin(TxnOptions::profile(WorkloadHint::Payment, false));
        let body = self.payment_body(&mut txn, input);
        self.finish(txn, body)
    }

    fn payment_body<T: Txn>(
        &mut self,
        txn: &mut T,
        input: &PaymentInput,
    ) -> Result<isize, Aborted> {
        let w_id = self.warehouse_id;
        let mut delta = 0isize;

        let k_w = WarehouseKey { w_id };
        k_w.encode(&mut self.key0);
        let found = txn.get(TableId::Warehouse, &self.key0, &mut self.val)?;
        assert!(found, "warehouse {w_id} missing");
        let mut v_w = WarehouseValue::decode(&self.val);
        if self.cfg.check_invariants {
            check::warehouse(&self.cfg, &k_w, &v_w);
        }
        v_w.w_ytd += input.amount;
        v_w.encode(&mut self.out);
        txn.put(TableId::Warehouse, &self.key0, &self.out)?;

        let k_d = DistrictKey {
            d_w_id: w_id,
            d_id: input.district_id,
        };
        k_d.encode(&mut self.key0);
        let found = txn.get(TableId::District, &self.key0, &mut self.val)?;
        assert!(found, "district ({w_id}, {}) missing", input.district_id);
        let mut v_d = DistrictValue::decode(&self.val);
        if self.cfg.check_invariants {
            check::district(&self.cfg, &k_d, &v_d);
        }
        v_d.d_ytd += input.amount;
        v_d.encode(&mut self.out);
        txn.put(TableId::District, &self.key0, &self.out)?;

        let (k_c, mut v_c) =
            self.lookup_customer(txn, input.customer_w_id, input.customer_d_id, &input.customer)?;

        v_c.c_balance -= input.amount;
        v_c.c_ytd_payment += input.amount;
        v_c.c_payment_cnt += 1;
        if &v_c.c_credit == b"BC" {
            // Bad credit buys an audit line prepended to the data field.
            let mut data = format!(
                "{} {} {} {} {} {:.2} | {}",
                k_c.c_id, k_c.c_d_id, k_c.c_w_id, input.district_id, w_id, input.amount, v_c.c_data
            );
            data.truncate(C_DATA_MAX);
            v_c.c_data = data;
        }
        k_c.encode(&mut self.key0);
        v_c.encode(&mut self.out);
        txn.put(TableId::Customer, &self.key0, &self.out)?;

        let k_h = HistoryKey {
            h_c_d_id: k_c.c_d_id,
            h_c_w_id: k_c.c_w_id,
            h_c_id: k_c.c_id,
            h_d_id: input.district_id,
            h_w_id: w_id,
            h_date: self.clock.tick(),
        };
        let v_h = HistoryValue {
            h_amount: input.amount,
            h_data: format!("{:.10}    {:.10}", v_w.w_name, v_d.d_name),
        };
        k_h.encode(&mut self.key0);
        v_h.encode(&mut self.out);
        txn.insert(TableId::History, &self.key0, &self.out)?;
        delta += self.out.len() as isize;

        Ok(delta)
    }

    /// Draws the randomized inputs for one Delivery attempt.
    pub fn gen_delivery_input(&mut self) -> DeliveryInput {
        DeliveryInput {
            carrier_id: gen::rand_number(&mut self.rng, 1, NUM_DISTRICTS_PER_WAREHOUSE),
        }
    }

    /// Runs one Delivery with freshly drawn inputs.
    pub fn delivery(&mut self) -> Result<isize, Aborted> {
        let input = self.gen_delivery_input();
        self.delivery_with(&input)
    }

    /// Runs one Delivery attempt: for each district, finds the oldest
    /// pending order at or after the worker's cursor, stamps its lines,
    /// removes the new_order marker, assigns the carrier, and credits the
    /// customer with the line total. Districts with nothing pending are
    /// skipped; that is an expected outcome.
    pub fn delivery_with(&mut self, input: &DeliveryInput) -> Result<isize, Aborted> {
        let mut txn = self
            .engine
            .begin(TxnOptions::profile(WorkloadHint::Delivery, false));
        let body = self.delivery_body(&mut txn, input);
        self.finish(txn, body)
    }

    fn delivery_body<T: Txn>(
        &mut self,
        txn: &mut T,
        input: &DeliveryInput,
    ) -> Result<isize, Aborted> {
        let w_id = self.warehouse_id;
        let ts = self.clock.tick();

        for d_id in 1..=NUM_DISTRICTS_PER_WAREHOUSE {
            let cursor = self.last_no_o_ids[(d_id - 1) as usize];
            NewOrderKey {
                no_w_id: w_id,
                no_d_id: d_id,
                no_o_id: cursor,
            }
            .encode(&mut self.key0);
            NewOrderKey {
                no_w_id: w_id,
                no_d_id: d_id,
                no_o_id: u32::MAX,
            }
            .encode(&mut self.key1);
            self.first_no.reset();
            txn.scan(TableId::NewOrder, &self.key0, &self.key1, &mut self.first_no)?;
            let k_no = match self.first_no.key() {
                Some(bytes) => NewOrderKey::decode(bytes),
                // Nothing pending in this district.
                None => continue,
            };
            if self.cfg.check_invariants {
                check::new_order(&self.cfg, &k_no, &NewOrderValue);
            }
            // Advance the cursor even if this attempt later aborts; the
            // next call starts its probe here either way.
            self.last_no_o_ids[(d_id - 1) as usize] = k_no.no_o_id + 1;

            let k_oo = OorderKey {
                o_w_id: w_id,
                o_d_id: d_id,
                o_id: k_no.no_o_id,
            };
            k_oo.encode(&mut self.key0);
            let found = txn.get(TableId::Oorder, &self.key0, &mut self.val)?;
            assert!(found, "oorder {k_oo:?} missing");
            let mut v_oo = OorderValue::decode(&self.val);
            if self.cfg.check_invariants {
                check::oorder(&self.cfg, &k_oo, &v_oo);
            }

            OrderLineKey {
                ol_w_id: w_id,
                ol_d_id: d_id,
                ol_o_id: k_no.no_o_id,
                ol_number: 0,
            }
            .encode(&mut self.key0);
            OrderLineKey {
                ol_w_id: w_id,
                ol_d_id: d_id,
                ol_o_id: k_no.no_o_id,
                ol_number: u32::MAX,
            }
            .encode(&mut self.key1);
            self.line_rows.reset();
            txn.scan(TableId::OrderLine, &self.key0, &self.key1, &mut self.line_rows)?;

            let mut total = 0.0f64;
            for idx in 0..self.line_rows.len() {
                let v_ol = OrderLineValue::decode(self.line_rows.value(idx));
                if self.cfg.check_invariants {
                    let k_ol = OrderLineKey::decode(self.line_rows.key(idx));
                    check::order_line(&self.cfg, &k_ol, &v_ol);
                }
                total += v_ol.ol_amount;
                let stamped = OrderLineValue {
                    ol_delivery_d: ts,
                    ..v_ol
                };
                stamped.encode(&mut self.out);
                txn.put(TableId::OrderLine, self.line_rows.key(idx), &self.out)?;
            }

            k_no.encode(&mut self.key0);
            txn.remove(TableId::NewOrder, &self.key0)?;

            v_oo.o_carrier_id = input.carrier_id as u8;
            k_oo.encode(&mut self.key0);
            v_oo.encode(&mut self.out);
            txn.put(TableId::Oorder, &self.key0, &self.out)?;

            let k_c = CustomerKey {
                c_w_id: w_id,
                c_d_id: d_id,
                c_id: v_oo.o_c_id,
            };
            k_c.encode(&mut self.key0);
            let found = txn.get(TableId::Customer, &self.key0, &mut self.val)?;
            assert!(found, "customer {k_c:?} missing");
            let mut v_c = CustomerValue::decode(&self.val);
            v_c.c_balance += total;
            v_c.encode(&mut self.out);
            txn.put(TableId::Customer, &self.key0, &self.out)?;
        }

        Ok(0)
    }

    /// Draws the randomized inputs for one OrderStatus attempt.
    pub fn gen_order_status_input(&mut self) -> OrderStatusInput {
        OrderStatusInput {
            district_id: gen::rand_number(&mut self.rng, 1, NUM_DISTRICTS_PER_WAREHOUSE),
            customer: self.gen_customer_selector(),
        }
    }

    /// Runs one OrderStatus with freshly drawn inputs.
    pub fn order_status(&mut self) -> Result<isize, Aborted> {
        let input = self.gen_order_status_input();
        self.order_status_with(&input)
    }

    /// Runs one read-only OrderStatus attempt: locates the customer like
    /// Payment does, finds their newest order through the order index,
    /// and walks its lines. Nothing is written.
    pub fn order_status_with(&mut self, input: &OrderStatusInput) -> Result<isize, Aborted> {
        let mut txn = self
            .engine
            .begin(TxnOptions::profile(WorkloadHint::OrderStatus, true));
        let body = self.order_status_body(&mut txn, input);
        self.finish(txn, body)
    }

    fn order_status_body<T: Txn>(
        &mut self,
        txn: &mut T,
        input: &OrderStatusInput,
    ) -> Result<isize, Aborted> {
        let w_id = self.warehouse_id;
        let d_id = input.district_id;

        let (k_c, _v_c) = self.lookup_customer(txn, w_id, d_id, &input.customer)?;

        // The newest order is the largest id in the customer's index
        // prefix; the index scan visits ascending and keeps the last.
        OorderCIdKey {
            o_w_id: w_id,
            o_d_id: d_id,
            o_c_id: k_c.c_id,
            o_o_id: 0,
        }
        .encode(&mut self.key0);
        OorderCIdKey {
            o_w_id: w_id,
            o_d_id: d_id,
            o_c_id: k_c.c_id,
            o_o_id: u32::MAX,
        }
        .encode(&mut self.key1);
        self.latest_order.reset();
        txn.scan(
            TableId::OorderCIdIdx,
            &self.key0,
            &self.key1,
            &mut self.latest_order,
        )?;
        let latest = self
            .latest_order
            .key()
            .unwrap_or_else(|| panic!("customer {k_c:?} has no orders"));
        let o_id = OorderCIdKey::decode(latest).o_o_id;

        OrderLineKey {
            ol_w_id: w_id,
            ol_d_id: d_id,
            ol_o_id: o_id,
            ol_number: 0,
        }
        .encode(&mut self.key0);
        OrderLineKey {
            ol_w_id: w_id,
            ol_d_id: d_id,
            ol_o_id: o_id,
            ol_number: u32::MAX,
        }
        .encode(&mut self.key1);
        self.line_rows.reset();
        txn.scan(TableId::OrderLine, &self.key0, &self.key1, &mut self.line_rows)?;
        let n = self.line_rows.len();
        assert!((5..=15).contains(&n), "order {o_id} has {n} lines");
        for idx in 0..n {
            let v_ol = OrderLineValue::decode(self.line_rows.value(idx));
            if self.cfg.check_invariants {
                let k_ol = OrderLineKey::decode(self.line_rows.key(idx));
                check::order_line(&self.cfg, &k_ol, &v_ol);
            }
        }

        Ok(0)
    }

    /// Draws the randomized inputs for one StockLevel attempt.
    pub fn gen_stock_level_input(&mut self) -> StockLevelInput {
        StockLevelInput {
            threshold: gen::rand_number(&mut self.rng, 10, 20),
            district_id: gen::rand_number(&mut self.rng, 1, NUM_DISTRICTS_PER_WAREHOUSE),
        }
    }

    /// Runs one StockLevel with freshly drawn inputs.
    pub fn stock_level(&mut self) -> Result<isize, Aborted> {
        let input = self.gen_stock_level_input();
        self.stock_level_with(&input).map(|_count| 0)
    }

    /// Runs one read-only StockLevel attempt: reads the district's order
    /// counter, joins the last twenty orders' lines against stock by
    /// hand, and returns how many distinct items sit below the
    /// threshold. The count is the transaction's computed result; nothing
    /// is persisted.
    pub fn stock_level_with(&mut self, input: &StockLevelInput) -> Result<usize, Aborted> {
        let mut txn = self
            .engine
            .begin(TxnOptions::profile(WorkloadHint::StockLevel, true));
        let body = self.stock_level_body(&mut txn, input);
        self.finish(txn, body)
    }

    fn stock_level_body<T: Txn>(
        &mut self,
        txn: &mut T,
        input: &StockLevelInput,
    ) -> Result<usize, Aborted> {
        let w_id = self.warehouse_id;
        let d_id = input.district_id;

        let k_d = DistrictKey {
            d_w_id: w_id,
            d_id,
        };
        k_d.encode(&mut self.key0);
        let found = txn.get(TableId::District, &self.key0, &mut self.val)?;
        assert!(found, "district ({w_id}, {d_id}) missing");
        let v_d = DistrictValue::decode(&self.val);
        if self.cfg.check_invariants {
            check::district(&self.cfg, &k_d, &v_d);
        }

        // Manual joins are fun: sweep the lines of the twenty orders
        // ending just before the counter, then point-read each distinct
        // item's stock quantity (and only the quantity).
        let lower = v_d.d_next_o_id.saturating_sub(20);
        OrderLineKey {
            ol_w_id: w_id,
            ol_d_id: d_id,
            ol_o_id: lower,
            ol_number: 0,
        }
        .encode(&mut self.key0);
        OrderLineKey {
            ol_w_id: w_id,
            ol_d_id: d_id,
            ol_o_id: v_d.d_next_o_id,
            ol_number: 0,
        }
        .encode(&mut self.key1);
        self.distinct_items.reset();
        txn.scan(
            TableId::OrderLine,
            &self.key0,
            &self.key1,
            &mut self.distinct_items,
        )?;

        let mut low_stock = 0usize;
        for &i_id in self.distinct_items.ids() {
            assert!(i_id >= 1 && i_id <= NUM_ITEMS);
            let k_s = StockKey {
                s_w_id: w_id,
                s_i_id: i_id,
            };
            k_s.encode(&mut self.key0);
            let found = txn.get_up_to(
                TableId::Stock,
                &self.key0,
                &mut self.val,
                StockValue::QUANTITY_WIDTH,
            )?;
            assert!(found, "stock ({w_id}, {i_id}) missing");
            let quantity = StockValue::decode_quantity(&self.val);
            if i32::from(quantity) < input.threshold as i32 {
                low_stock += 1;
            }
        }

        Ok(low_stock)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::SmallRng;
    use rand::SeedableRng;

    use super::*;

    #[test]
    fn mix_weights_sum_to_one_hundred() {
        assert_eq!(WORKLOAD_MIX.iter().map(|(_, w)| w).sum::<u32>(), 100);
    }

    #[test]
    fn pick_txn_tracks_the_mix() {
        let mut rng = SmallRng::seed_from_u64(1);
        let mut counts = [0u32; 5];
        const N: u32 = 100_000;
        for _ in 0..N {
            let kind = pick_txn(&mut rng);
            let slot = WORKLOAD_MIX
                .iter()
                .position(|(k, _)| *k == kind)
                .unwrap();
            counts[slot] += 1;
        }
        for ((_, weight), count) in WORKLOAD_MIX.iter().zip(counts) {
            let expected = N * weight / 100;
            // Within a percentage point of nominal.
            assert!(
                count.abs_diff(expected) < N / 100,
                "{count} vs {expected}"
            );
        }
    }

    #[test]
    fn new_order_input_lines_are_bounded() {
        let mut input = NewOrderInput::new(1, 1);
        assert!(input.lines().is_empty());
        for i in 0..15 {
            input.push_line(OrderLineInput {
                item_id: i + 1,
                supply_w_id: 1,
                quantity: 1,
            });
        }
        assert_eq!(input.lines().len(), 15);
        assert_eq!(input.lines()[14].item_id, 15);
    }

    #[test]
    #[should_panic(expected = "cap at 15")]
    fn sixteenth_line_is_fatal() {
        let mut input = NewOrderInput::new(1, 1);
        for i in 0..16 {
            input.push_line(OrderLineInput {
                item_id: i + 1,
                supply_w_id: 1,
                quantity: 1,
            });
        }
    }
}
