// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! Per-table sanity checks
//!
//! A few simple checks that decoded records are not corrupted, run after
//! every decode in loaders and transactions when
//! [TpccConfig::check_invariants] is set. A violation means a loader or
//! codec bug and panics; it is never a business condition.

use crate::schema::*;
use crate::{
    TpccConfig, NUM_CUSTOMERS_PER_DISTRICT, NUM_DISTRICTS_PER_WAREHOUSE, NUM_ITEMS,
    NUM_ORDERS_PER_DISTRICT,
};

fn check_w_id(cfg: &TpccConfig, w_id: u32) {
    assert!(
        w_id >= 1 && w_id <= cfg.warehouses,
        "warehouse id {w_id} out of range"
    );
}

fn check_d_id(d_id: u32) {
    assert!(
        d_id >= 1 && d_id <= NUM_DISTRICTS_PER_WAREHOUSE,
        "district id {d_id} out of range"
    );
}

/// Checks a warehouse row.
pub fn warehouse(cfg: &TpccConfig, k: &WarehouseKey, v: &WarehouseValue) {
    check_w_id(cfg, k.w_id);
    assert_eq!(&v.w_zip, b"123456789");
}

/// Checks a district row.
pub fn district(cfg: &TpccConfig, k: &DistrictKey, v: &DistrictValue) {
    check_w_id(cfg, k.d_w_id);
    check_d_id(k.d_id);
    assert!(
        v.d_next_o_id >= NUM_ORDERS_PER_DISTRICT + 1,
        "district counter {} below loaded floor",
        v.d_next_o_id
    );
    assert_eq!(&v.d_zip, b"123456789");
}

/// Checks a customer row.
pub fn customer(cfg: &TpccConfig, k: &CustomerKey, v: &CustomerValue) {
    check_w_id(cfg, k.c_w_id);
    check_d_id(k.c_d_id);
    assert!(
        k.c_id >= 1 && k.c_id <= NUM_CUSTOMERS_PER_DISTRICT,
        "customer id {} out of range",
        k.c_id
    );
    assert!(
        &v.c_credit == b"GC" || &v.c_credit == b"BC",
        "credit {:?}",
        v.c_credit
    );
    assert_eq!(&v.c_middle, b"OE");
}

/// Checks an item row.
pub fn item(k: &ItemKey, v: &ItemValue) {
    assert!(
        k.i_id >= 1 && k.i_id <= NUM_ITEMS,
        "item id {} out of range",
        k.i_id
    );
    assert!(
        v.i_price >= 1.00 && v.i_price <= 100.00,
        "item price {}",
        v.i_price
    );
}

/// Checks a stock row.
pub fn stock(cfg: &TpccConfig, k: &StockKey, _v: &StockValue) {
    check_w_id(cfg, k.s_w_id);
    assert!(
        k.s_i_id >= 1 && k.s_i_id <= NUM_ITEMS,
        "stock item id {} out of range",
        k.s_i_id
    );
}

/// Checks a new_order row.
pub fn new_order(cfg: &TpccConfig, k: &NewOrderKey, _v: &NewOrderValue) {
    check_w_id(cfg, k.no_w_id);
    check_d_id(k.no_d_id);
}

/// Checks an oorder row.
pub fn oorder(cfg: &TpccConfig, k: &OorderKey, v: &OorderValue) {
    check_w_id(cfg, k.o_w_id);
    check_d_id(k.o_d_id);
    assert!(
        v.o_c_id >= 1 && v.o_c_id <= NUM_CUSTOMERS_PER_DISTRICT,
        "order customer id {} out of range",
        v.o_c_id
    );
    assert!(
        u32::from(v.o_carrier_id) <= NUM_DISTRICTS_PER_WAREHOUSE,
        "carrier id {}",
        v.o_carrier_id
    );
    assert!(
        v.o_ol_cnt >= 5 && v.o_ol_cnt <= 15,
        "order line count {}",
        v.o_ol_cnt
    );
}

/// Checks an order_line row.
pub fn order_line(cfg: &TpccConfig, k: &OrderLineKey, v: &OrderLineValue) {
    check_w_id(cfg, k.ol_w_id);
    check_d_id(k.ol_d_id);
    assert!(
        k.ol_number >= 1 && k.ol_number <= 15,
        "order line number {}",
        k.ol_number
    );
    assert!(
        v.ol_i_id >= 1 && v.ol_i_id <= NUM_ITEMS,
        "order line item id {} out of range",
        v.ol_i_id
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    #[should_panic(expected = "credit")]
    fn bad_credit_is_fatal() {
        let cfg = TpccConfig::new(1);
        let k = CustomerKey {
            c_w_id: 1,
            c_d_id: 1,
            c_id: 1,
        };
        let v = CustomerValue {
            c_credit: *b"XX",
            c_middle: *b"OE",
            ..Default::default()
        };
        customer(&cfg, &k, &v);
    }

    #[test]
    #[should_panic(expected = "district counter")]
    fn rolled_back_counter_is_fatal() {
        let cfg = TpccConfig::new(1);
        let k = DistrictKey { d_w_id: 1, d_id: 1 };
        let v = DistrictValue {
            d_next_o_id: 3000,
            d_zip: *b"123456789",
            ..Default::default()
        };
        district(&cfg, &k, &v);
    }
}
