// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! End-to-end workload scenarios over a loaded one-warehouse database.
//!
//! Loading is the expensive part, so everything runs as one sequential
//! test: load, verify the image, then walk the profiles through known
//! states and check every side effect against hand-computed expectations.

use std::collections::HashSet;

use tpcc::engine::{Aborted, Engine, TableId, Txn, TxnOptions};
use tpcc::load;
use tpcc::mem::MemEngine;
use tpcc::scan::CollectRows;
use tpcc::schema::*;
use tpcc::worker::{
    CustomerSelector, DeliveryInput, NewOrderInput, OrderLineInput, OrderStatusInput,
    PaymentInput, StockLevelInput, Worker,
};
use tpcc::{TpccConfig, FIRST_UNDELIVERED_O_ID, NUM_ORDERS_PER_DISTRICT};

fn get<K: FnOnce(&mut Vec<u8>)>(engine: &MemEngine, table: TableId, key: K) -> Option<Vec<u8>> {
    let mut kbuf = Vec::new();
    key(&mut kbuf);
    engine.get_raw(table, &kbuf)
}

fn district_value(engine: &MemEngine, w: u32, d: u32) -> DistrictValue {
    let bytes = get(engine, TableId::District, |b| {
        DistrictKey { d_w_id: w, d_id: d }.encode(b)
    })
    .expect("district row");
    DistrictValue::decode(&bytes)
}

fn customer_value(engine: &MemEngine, w: u32, d: u32, c: u32) -> CustomerValue {
    let bytes = get(engine, TableId::Customer, |b| {
        CustomerKey {
            c_w_id: w,
            c_d_id: d,
            c_id: c,
        }
        .encode(b)
    })
    .expect("customer row");
    CustomerValue::decode(&bytes)
}

fn order_line_value(engine: &MemEngine, w: u32, d: u32, o: u32, l: u32) -> Option<OrderLineValue> {
    get(engine, TableId::OrderLine, |b| {
        OrderLineKey {
            ol_w_id: w,
            ol_d_id: d,
            ol_o_id: o,
            ol_number: l,
        }
        .encode(b)
    })
    .map(|bytes| OrderLineValue::decode(&bytes))
}

fn item_price(engine: &MemEngine, i_id: u32) -> f64 {
    let bytes = get(engine, TableId::Item, |b| ItemKey { i_id }.encode(b)).expect("item row");
    ItemValue::decode(&bytes).i_price
}

fn stock_quantity(engine: &MemEngine, w: u32, i_id: u32) -> i16 {
    let bytes = get(engine, TableId::Stock, |b| {
        StockKey {
            s_w_id: w,
            s_i_id: i_id,
        }
        .encode(b)
    })
    .expect("stock row");
    StockValue::decode(&bytes).s_quantity
}

#[test]
fn tpcc_workload() {
    let cfg = TpccConfig::new(1);
    let engine = MemEngine::new();
    load::load_all(&engine, &cfg);

    // The loaded image has the mandated shape.
    assert_eq!(engine.len(TableId::Warehouse), 1);
    assert_eq!(engine.len(TableId::Item), 100_000);
    assert_eq!(engine.len(TableId::Stock), 100_000);
    assert_eq!(engine.len(TableId::District), 10);
    assert_eq!(engine.len(TableId::Customer), 30_000);
    assert_eq!(engine.len(TableId::CustomerNameIdx), 30_000);
    assert_eq!(engine.len(TableId::History), 30_000);
    assert_eq!(engine.len(TableId::Oorder), 30_000);
    assert_eq!(engine.len(TableId::OorderCIdIdx), 30_000);
    assert_eq!(engine.len(TableId::NewOrder), 9_000);

    // Every district starts its counter right above the loaded orders,
    // and every customer of district 1 passes its sanity predicate.
    for d in 1..=10 {
        assert_eq!(
            district_value(&engine, 1, d).d_next_o_id,
            NUM_ORDERS_PER_DISTRICT + 1
        );
    }
    for c in 1..=3000 {
        let v = customer_value(&engine, 1, 1, c);
        tpcc::check::customer(
            &cfg,
            &CustomerKey {
                c_w_id: 1,
                c_d_id: 1,
                c_id: c,
            },
            &v,
        );
        assert_eq!(v.c_balance, -10.0);
        assert_eq!(v.c_payment_cnt, 1);
    }

    let mut worker = Worker::new(&engine, cfg.clone(), 1, 23_984_543);

    // Scenario: one NewOrder with five local lines against district 1.
    let mut input = NewOrderInput::new(1, 42);
    let mut expected_total = 0.0;
    for i in 0..5u32 {
        let item_id = i + 1;
        let quantity = i + 1;
        expected_total += f64::from(quantity) * item_price(&engine, item_id);
        input.push_line(OrderLineInput {
            item_id,
            supply_w_id: 1,
            quantity,
        });
    }
    let stock_before = stock_quantity(&engine, 1, 1);
    let delta = worker.new_order_with(&input).expect("new order commits");
    assert!(delta > 0);
    assert_eq!(worker.commits(), 1);

    let o_id = NUM_ORDERS_PER_DISTRICT + 1; // 3001
    assert_eq!(district_value(&engine, 1, 1).d_next_o_id, o_id + 1);
    assert_eq!(engine.len(TableId::NewOrder), 9_001);
    assert!(get(&engine, TableId::NewOrder, |b| {
        NewOrderKey {
            no_w_id: 1,
            no_d_id: 1,
            no_o_id: o_id,
        }
        .encode(b)
    })
    .is_some());
    let oorder = get(&engine, TableId::Oorder, |b| {
        OorderKey {
            o_w_id: 1,
            o_d_id: 1,
            o_id,
        }
        .encode(b)
    })
    .map(|bytes| OorderValue::decode(&bytes))
    .expect("oorder row");
    assert_eq!(oorder.o_c_id, 42);
    assert_eq!(oorder.o_carrier_id, 0);
    assert_eq!(oorder.o_ol_cnt, 5);
    assert!(oorder.o_all_local);
    for l in 1..=5 {
        let line = order_line_value(&engine, 1, 1, o_id, l).expect("order line");
        assert_eq!(line.ol_i_id, l);
        assert_eq!(line.ol_delivery_d, 0);
        assert_eq!(line.ol_quantity as u32, l);
    }
    assert!(order_line_value(&engine, 1, 1, o_id, 6).is_none());
    // Item 1 was ordered with quantity 1 from a quantity-10..=100 stock
    // row, so the write was either a plain decrement or a replenishment.
    let stock_after = stock_quantity(&engine, 1, 1);
    assert!(stock_after == stock_before - 1 || stock_after == stock_before + 90);

    // A NewOrder whose commit is refused leaves nothing behind.
    let district_before = district_value(&engine, 1, 2);
    let stock_before = stock_quantity(&engine, 1, 10);
    let mut aborted_input = NewOrderInput::new(2, 7);
    for i in 0..5u32 {
        aborted_input.push_line(OrderLineInput {
            item_id: i + 10,
            supply_w_id: 1,
            quantity: 1,
        });
    }
    engine.fail_next_commits(1);
    assert_eq!(worker.new_order_with(&aborted_input), Err(Aborted));
    assert_eq!(worker.aborts(), 1);
    assert_eq!(district_value(&engine, 1, 2), district_before);
    assert_eq!(stock_quantity(&engine, 1, 10), stock_before);
    assert!(get(&engine, TableId::NewOrder, |b| {
        NewOrderKey {
            no_w_id: 1,
            no_d_id: 2,
            no_o_id: 3001,
        }
        .encode(b)
    })
    .is_none());

    // Scenario: a 100.00 payment by customer id.
    let before = customer_value(&engine, 1, 1, 100);
    let history_before = engine.len(TableId::History);
    worker
        .payment_with(&PaymentInput {
            district_id: 1,
            customer_w_id: 1,
            customer_d_id: 1,
            customer: CustomerSelector::ById(100),
            amount: 100.0,
        })
        .expect("payment commits");
    let after = customer_value(&engine, 1, 1, 100);
    assert_eq!(after.c_balance, before.c_balance - 100.0);
    assert_eq!(after.c_ytd_payment, before.c_ytd_payment + 100.0);
    assert_eq!(after.c_payment_cnt, before.c_payment_cnt + 1);
    assert_eq!(engine.len(TableId::History), history_before + 1);

    // A surname payment picks the deterministic middle match.
    let surname = "BARBARBAR";
    let expected_c_id = {
        let (lo, hi) = CustomerNameKey::surname_range(1, 1, surname);
        let mut kbuf0 = Vec::new();
        let mut kbuf1 = Vec::new();
        lo.encode(&mut kbuf0);
        hi.encode(&mut kbuf1);
        let mut rows = CollectRows::new(512);
        let mut txn = engine.begin(TxnOptions::load());
        txn.scan(TableId::CustomerNameIdx, &kbuf0, &kbuf1, &mut rows)
            .unwrap();
        txn.abort();
        let n = rows.len();
        assert!(n > 0, "loader guarantees every surname exists");
        let index = if n % 2 == 0 { n / 2 - 1 } else { n / 2 };
        CustomerNameValue::decode(rows.value(index)).c_id
    };
    let before = customer_value(&engine, 1, 1, expected_c_id);
    worker
        .payment_with(&PaymentInput {
            district_id: 1,
            customer_w_id: 1,
            customer_d_id: 1,
            customer: CustomerSelector::ByName(surname.to_string()),
            amount: 1.0,
        })
        .expect("payment by name commits");
    let after = customer_value(&engine, 1, 1, expected_c_id);
    assert_eq!(after.c_payment_cnt, before.c_payment_cnt + 1);

    // Scenario: deliveries drain the backlog one order per district per
    // call, oldest first, then reach the order entered above. District 1
    // has 901 pending orders (2101..=3001), the rest have 900.
    let commits_before_drain = worker.commits();
    let backlog = NUM_ORDERS_PER_DISTRICT - FIRST_UNDELIVERED_O_ID + 1; // 900
    for _ in 0..backlog {
        worker.delivery_with(&DeliveryInput { carrier_id: 7 }).expect("delivery commits");
    }
    // The loaded backlog is gone everywhere; only the new order remains.
    assert_eq!(engine.len(TableId::NewOrder), 1);
    let balance_before = customer_value(&engine, 1, 1, 42).c_balance;

    worker.delivery_with(&DeliveryInput { carrier_id: 7 }).expect("delivery commits");
    assert_eq!(worker.commits(), commits_before_drain + u64::from(backlog) + 1);
    assert_eq!(engine.len(TableId::NewOrder), 0);
    let oorder = get(&engine, TableId::Oorder, |b| {
        OorderKey {
            o_w_id: 1,
            o_d_id: 1,
            o_id,
        }
        .encode(b)
    })
    .map(|bytes| OorderValue::decode(&bytes))
    .expect("oorder row");
    assert_eq!(oorder.o_carrier_id, 7);
    let balance_after = customer_value(&engine, 1, 1, 42).c_balance;
    assert!(
        (balance_after - (balance_before + expected_total)).abs() < 1e-9,
        "{balance_after} vs {balance_before} + {expected_total}"
    );
    for l in 1..=5 {
        let line = order_line_value(&engine, 1, 1, o_id, l).expect("order line");
        assert_ne!(line.ol_delivery_d, 0, "line {l} not stamped");
    }

    // With nothing pending anywhere, another delivery is an empty commit.
    worker.delivery_with(&DeliveryInput { carrier_id: 3 }).expect("empty delivery commits");
    assert_eq!(
        get(&engine, TableId::Oorder, |b| {
            OorderKey {
                o_w_id: 1,
                o_d_id: 1,
                o_id,
            }
            .encode(b)
        })
        .map(|bytes| OorderValue::decode(&bytes))
        .unwrap()
        .o_carrier_id,
        7,
        "already delivered orders are never revisited"
    );

    // Scenario: OrderStatus on the customer we know has orders.
    worker
        .order_status_with(&OrderStatusInput {
            district_id: 1,
            customer: CustomerSelector::ById(42),
        })
        .expect("order status commits");

    // Scenario: StockLevel against a hand-computed join. The last twenty
    // orders of district 1 are 2982..=3001.
    let d_next = district_value(&engine, 1, 1).d_next_o_id;
    assert_eq!(d_next, 3002);
    let mut distinct = HashSet::new();
    for o in d_next - 20..d_next {
        for l in 1..=15 {
            if let Some(line) = order_line_value(&engine, 1, 1, o, l) {
                distinct.insert(line.ol_i_id);
            }
        }
    }
    let threshold = 15;
    let expected = distinct
        .iter()
        .filter(|&&i_id| i32::from(stock_quantity(&engine, 1, i_id)) < threshold)
        .count();
    let got = worker
        .stock_level_with(&StockLevelInput {
            district_id: 1,
            threshold: threshold as u32,
        })
        .expect("stock level commits");
    assert_eq!(got, expected);

    // Mixed-run smoke: every attempt either commits or aborts, and the
    // reference engine never spuriously aborts.
    let commits = worker.commits();
    let aborts = worker.aborts();
    for _ in 0..300 {
        let (_kind, result) = worker.run_one();
        assert!(result.is_ok());
    }
    assert_eq!(worker.commits() + worker.aborts(), commits + aborts + 300);
}
