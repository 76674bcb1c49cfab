// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! The eleven TPCC tables as typed key/value records
//!
//! Each record has an `encode` that replaces the contents of a reusable
//! byte buffer and a `decode` that panics on malformed input (malformed
//! means a codec bug, never a runtime condition). Key encodings are
//! order-preserving: encoded keys sort byte-lexicographically exactly like
//! their field tuples. See [crate::codec].
//!
//! Numeric id fields are 1-based everywhere, matching the benchmark.

use crate::codec::{put_f64, put_fixed, put_i16, put_str, put_u32, put_u8, Reader};

/// The most bytes a customer's free-text data field may hold.
pub const C_DATA_MAX: usize = 500;
/// The width of the padded name fields in [CustomerNameKey].
pub const NAME_KEY_WIDTH: usize = 16;

/// Zero-pads `s` into a fixed name-index field.
///
/// Panics if `s` does not fit; loader-generated surnames and first names
/// never exceed the width.
pub fn pad_name(s: &str) -> [u8; NAME_KEY_WIDTH] {
    let mut out = [0u8; NAME_KEY_WIDTH];
    assert!(s.len() <= NAME_KEY_WIDTH, "name {s:?} too wide for index");
    out[..s.len()].copy_from_slice(s.as_bytes());
    out
}

/// The WAREHOUSE primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WarehouseKey {
    /// Warehouse id, 1-based.
    pub w_id: u32,
}

impl WarehouseKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.w_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = WarehouseKey { w_id: r.u32() };
        r.done();
        k
    }
}

/// The WAREHOUSE row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WarehouseValue {
    /// Year-to-date balance.
    pub w_ytd: f64,
    /// Sales tax rate.
    pub w_tax: f64,
    /// Warehouse name.
    pub w_name: String,
    /// First street line.
    pub w_street_1: String,
    /// Second street line.
    pub w_street_2: String,
    /// City.
    pub w_city: String,
    /// Two-letter state.
    pub w_state: [u8; 2],
    /// Fixed nine-digit zip.
    pub w_zip: [u8; 9],
}

impl WarehouseValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_f64(buf, self.w_ytd);
        put_f64(buf, self.w_tax);
        put_str(buf, &self.w_name);
        put_str(buf, &self.w_street_1);
        put_str(buf, &self.w_street_2);
        put_str(buf, &self.w_city);
        put_fixed(buf, &self.w_state);
        put_fixed(buf, &self.w_zip);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = WarehouseValue {
            w_ytd: r.f64(),
            w_tax: r.f64(),
            w_name: r.str(),
            w_street_1: r.str(),
            w_street_2: r.str(),
            w_city: r.str(),
            w_state: r.fixed(),
            w_zip: r.fixed(),
        };
        r.done();
        v
    }
}

/// The DISTRICT primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DistrictKey {
    /// Owning warehouse id.
    pub d_w_id: u32,
    /// District id, 1..=10.
    pub d_id: u32,
}

impl DistrictKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.d_w_id);
        put_u32(buf, self.d_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = DistrictKey {
            d_w_id: r.u32(),
            d_id: r.u32(),
        };
        r.done();
        k
    }
}

/// The DISTRICT row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DistrictValue {
    /// Year-to-date balance.
    pub d_ytd: f64,
    /// Sales tax rate.
    pub d_tax: f64,
    /// The next order id this district will allocate. Starts at 3001 and
    /// only ever increases.
    pub d_next_o_id: u32,
    /// District name.
    pub d_name: String,
    /// First street line.
    pub d_street_1: String,
    /// Second street line.
    pub d_street_2: String,
    /// City.
    pub d_city: String,
    /// Two-letter state.
    pub d_state: [u8; 2],
    /// Fixed nine-digit zip.
    pub d_zip: [u8; 9],
}

impl DistrictValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_f64(buf, self.d_ytd);
        put_f64(buf, self.d_tax);
        put_u32(buf, self.d_next_o_id);
        put_str(buf, &self.d_name);
        put_str(buf, &self.d_street_1);
        put_str(buf, &self.d_street_2);
        put_str(buf, &self.d_city);
        put_fixed(buf, &self.d_state);
        put_fixed(buf, &self.d_zip);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = DistrictValue {
            d_ytd: r.f64(),
            d_tax: r.f64(),
            d_next_o_id: r.u32(),
            d_name: r.str(),
            d_street_1: r.str(),
            d_street_2: r.str(),
            d_city: r.str(),
            d_state: r.fixed(),
            d_zip: r.fixed(),
        };
        r.done();
        v
    }
}

/// The CUSTOMER primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustomerKey {
    /// Owning warehouse id.
    pub c_w_id: u32,
    /// Owning district id.
    pub c_d_id: u32,
    /// Customer id, 1..=3000.
    pub c_id: u32,
}

impl CustomerKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.c_w_id);
        put_u32(buf, self.c_d_id);
        put_u32(buf, self.c_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = CustomerKey {
            c_w_id: r.u32(),
            c_d_id: r.u32(),
            c_id: r.u32(),
        };
        r.done();
        k
    }
}

/// The CUSTOMER row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CustomerValue {
    /// Discount rate.
    pub c_discount: f64,
    /// Credit rating, "GC" (good) or "BC" (bad).
    pub c_credit: [u8; 2],
    /// Surname, synthesized from the token vocabulary.
    pub c_last: String,
    /// First name.
    pub c_first: String,
    /// Credit limit.
    pub c_credit_lim: f64,
    /// Balance; payments debit it, deliveries credit it.
    pub c_balance: f64,
    /// Year-to-date payment total.
    pub c_ytd_payment: f64,
    /// Number of payments.
    pub c_payment_cnt: u32,
    /// Number of deliveries.
    pub c_delivery_cnt: u32,
    /// First street line.
    pub c_street_1: String,
    /// Second street line.
    pub c_street_2: String,
    /// City.
    pub c_city: String,
    /// Two-letter state.
    pub c_state: [u8; 2],
    /// Fixed nine-digit zip.
    pub c_zip: [u8; 9],
    /// Sixteen-digit phone number.
    pub c_phone: [u8; 16],
    /// Registration timestamp.
    pub c_since: u32,
    /// Always "OE".
    pub c_middle: [u8; 2],
    /// Free-text data, at most [C_DATA_MAX] bytes. Bad-credit payments
    /// prepend an audit line here.
    pub c_data: String,
}

impl CustomerValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_f64(buf, self.c_discount);
        put_fixed(buf, &self.c_credit);
        put_str(buf, &self.c_last);
        put_str(buf, &self.c_first);
        put_f64(buf, self.c_credit_lim);
        put_f64(buf, self.c_balance);
        put_f64(buf, self.c_ytd_payment);
        put_u32(buf, self.c_payment_cnt);
        put_u32(buf, self.c_delivery_cnt);
        put_str(buf, &self.c_street_1);
        put_str(buf, &self.c_street_2);
        put_str(buf, &self.c_city);
        put_fixed(buf, &self.c_state);
        put_fixed(buf, &self.c_zip);
        put_fixed(buf, &self.c_phone);
        put_u32(buf, self.c_since);
        put_fixed(buf, &self.c_middle);
        put_str(buf, &self.c_data);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = CustomerValue {
            c_discount: r.f64(),
            c_credit: r.fixed(),
            c_last: r.str(),
            c_first: r.str(),
            c_credit_lim: r.f64(),
            c_balance: r.f64(),
            c_ytd_payment: r.f64(),
            c_payment_cnt: r.u32(),
            c_delivery_cnt: r.u32(),
            c_street_1: r.str(),
            c_street_2: r.str(),
            c_city: r.str(),
            c_state: r.fixed(),
            c_zip: r.fixed(),
            c_phone: r.fixed(),
            c_since: r.u32(),
            c_middle: r.fixed(),
            c_data: r.str(),
        };
        r.done();
        v
    }
}

/// The (last, first) name secondary index key over CUSTOMER.
///
/// Both name fields are zero-padded to [NAME_KEY_WIDTH] so that all
/// customers sharing a surname form one contiguous key range, scanned in
/// first-name order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustomerNameKey {
    /// Owning warehouse id.
    pub c_w_id: u32,
    /// Owning district id.
    pub c_d_id: u32,
    /// Zero-padded surname.
    pub c_last: [u8; NAME_KEY_WIDTH],
    /// Zero-padded first name.
    pub c_first: [u8; NAME_KEY_WIDTH],
}

impl CustomerNameKey {
    /// The key under which the loader indexes a customer.
    pub fn from_names(w_id: u32, d_id: u32, last: &str, first: &str) -> Self {
        CustomerNameKey {
            c_w_id: w_id,
            c_d_id: d_id,
            c_last: pad_name(last),
            c_first: pad_name(first),
        }
    }

    /// The `[start, end)` scan bounds covering every customer in the
    /// district with the given surname: first name padded with zeros below,
    /// with 0xFF above. No generated first name reaches sixteen 0xFF bytes,
    /// so the exclusive upper bound is safe.
    pub fn surname_range(w_id: u32, d_id: u32, last: &str) -> (Self, Self) {
        let lo = CustomerNameKey {
            c_w_id: w_id,
            c_d_id: d_id,
            c_last: pad_name(last),
            c_first: [0u8; NAME_KEY_WIDTH],
        };
        let hi = CustomerNameKey {
            c_first: [0xFFu8; NAME_KEY_WIDTH],
            ..lo
        };
        (lo, hi)
    }

    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.c_w_id);
        put_u32(buf, self.c_d_id);
        put_fixed(buf, &self.c_last);
        put_fixed(buf, &self.c_first);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = CustomerNameKey {
            c_w_id: r.u32(),
            c_d_id: r.u32(),
            c_last: r.fixed(),
            c_first: r.fixed(),
        };
        r.done();
        k
    }
}

/// The name index payload: the indexed customer's primary key suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CustomerNameValue {
    /// The customer id the indexed name maps to.
    pub c_id: u32,
}

impl CustomerNameValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.c_id);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = CustomerNameValue { c_id: r.u32() };
        r.done();
        v
    }
}

/// The HISTORY composite key.
///
/// Insert-only and never read back; the trailing tick disambiguates
/// multiple payments by one customer through one district.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HistoryKey {
    /// The customer's district id.
    pub h_c_d_id: u32,
    /// The customer's warehouse id.
    pub h_c_w_id: u32,
    /// The customer id.
    pub h_c_id: u32,
    /// The district the payment went through.
    pub h_d_id: u32,
    /// The warehouse the payment went through.
    pub h_w_id: u32,
    /// Payment timestamp.
    pub h_date: u32,
}

impl HistoryKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.h_c_d_id);
        put_u32(buf, self.h_c_w_id);
        put_u32(buf, self.h_c_id);
        put_u32(buf, self.h_d_id);
        put_u32(buf, self.h_w_id);
        put_u32(buf, self.h_date);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = HistoryKey {
            h_c_d_id: r.u32(),
            h_c_w_id: r.u32(),
            h_c_id: r.u32(),
            h_d_id: r.u32(),
            h_w_id: r.u32(),
            h_date: r.u32(),
        };
        r.done();
        k
    }
}

/// The HISTORY row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HistoryValue {
    /// Payment amount.
    pub h_amount: f64,
    /// Free-text description.
    pub h_data: String,
}

impl HistoryValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_f64(buf, self.h_amount);
        put_str(buf, &self.h_data);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = HistoryValue {
            h_amount: r.f64(),
            h_data: r.str(),
        };
        r.done();
        v
    }
}

/// The ITEM primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ItemKey {
    /// Item id, 1..=100000.
    pub i_id: u32,
}

impl ItemKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.i_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = ItemKey { i_id: r.u32() };
        r.done();
        k
    }
}

/// The ITEM row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ItemValue {
    /// Item name.
    pub i_name: String,
    /// Unit price in [1.00, 100.00].
    pub i_price: f64,
    /// Free-text data; one in ten rows embeds "ORIGINAL".
    pub i_data: String,
    /// Image id.
    pub i_im_id: u32,
}

impl ItemValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_str(buf, &self.i_name);
        put_f64(buf, self.i_price);
        put_str(buf, &self.i_data);
        put_u32(buf, self.i_im_id);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = ItemValue {
            i_name: r.str(),
            i_price: r.f64(),
            i_data: r.str(),
            i_im_id: r.u32(),
        };
        r.done();
        v
    }
}

/// The STOCK primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct StockKey {
    /// Owning warehouse id.
    pub s_w_id: u32,
    /// Item id.
    pub s_i_id: u32,
}

impl StockKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.s_w_id);
        put_u32(buf, self.s_i_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = StockKey {
            s_w_id: r.u32(),
            s_i_id: r.u32(),
        };
        r.done();
        k
    }
}

/// The STOCK row.
///
/// The quantity leads the encoding as a bare i16 so that StockLevel's
/// partial read of the first two bytes decodes it without touching the
/// rest of the row ([StockValue::decode_quantity]).
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StockValue {
    /// On-hand quantity, kept in the [10, 100] band by wraparound
    /// replenishment.
    pub s_quantity: i16,
    /// Year-to-date units sold.
    pub s_ytd: u32,
    /// Number of orders that touched this stock.
    pub s_order_cnt: u32,
    /// Number of remote orders that touched this stock.
    pub s_remote_cnt: u32,
    /// One 24-byte distribution snapshot per district, copied into order
    /// lines at order time.
    pub s_dist: [[u8; 24]; 10],
    /// Free-text data; one in ten rows embeds "ORIGINAL".
    pub s_data: String,
}

impl StockValue {
    /// The byte width of the leading quantity field.
    pub const QUANTITY_WIDTH: usize = 2;

    /// The district-specific distribution snapshot for `d_id` in 1..=10.
    pub fn dist_info(&self, d_id: u32) -> &[u8; 24] {
        assert!((1..=10).contains(&d_id), "district {d_id} out of range");
        &self.s_dist[(d_id - 1) as usize]
    }

    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_i16(buf, self.s_quantity);
        put_u32(buf, self.s_ytd);
        put_u32(buf, self.s_order_cnt);
        put_u32(buf, self.s_remote_cnt);
        for dist in &self.s_dist {
            put_fixed(buf, dist);
        }
        put_str(buf, &self.s_data);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let mut v = StockValue {
            s_quantity: r.i16(),
            s_ytd: r.u32(),
            s_order_cnt: r.u32(),
            s_remote_cnt: r.u32(),
            ..Default::default()
        };
        for dist in &mut v.s_dist {
            *dist = r.fixed();
        }
        v.s_data = r.str();
        r.done();
        v
    }

    /// Decodes just the quantity from the leading bytes of a (possibly
    /// partial) encoded row.
    pub fn decode_quantity(bytes: &[u8]) -> i16 {
        Reader::new(&bytes[..Self::QUANTITY_WIDTH]).i16()
    }
}

/// The NEW-ORDER primary key, one row per undelivered order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NewOrderKey {
    /// Owning warehouse id.
    pub no_w_id: u32,
    /// Owning district id.
    pub no_d_id: u32,
    /// The undelivered order's id.
    pub no_o_id: u32,
}

impl NewOrderKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.no_w_id);
        put_u32(buf, self.no_d_id);
        put_u32(buf, self.no_o_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = NewOrderKey {
            no_w_id: r.u32(),
            no_d_id: r.u32(),
            no_o_id: r.u32(),
        };
        r.done();
        k
    }
}

/// The NEW-ORDER row: an empty marker, all information is in the key.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NewOrderValue;

impl NewOrderValue {
    /// Encodes into `buf`, replacing its contents (with nothing).
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        Reader::new(bytes).done();
        NewOrderValue
    }
}

/// The ORDER primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OorderKey {
    /// Owning warehouse id.
    pub o_w_id: u32,
    /// Owning district id.
    pub o_d_id: u32,
    /// Order id, allocated from the district's counter.
    pub o_id: u32,
}

impl OorderKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.o_w_id);
        put_u32(buf, self.o_d_id);
        put_u32(buf, self.o_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = OorderKey {
            o_w_id: r.u32(),
            o_d_id: r.u32(),
            o_id: r.u32(),
        };
        r.done();
        k
    }
}

/// The ORDER row.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct OorderValue {
    /// The ordering customer.
    pub o_c_id: u32,
    /// Carrier id 1..=10 once delivered, 0 until then.
    pub o_carrier_id: u8,
    /// Number of order lines, 5..=15.
    pub o_ol_cnt: u8,
    /// Whether every line is supplied by the home warehouse.
    pub o_all_local: bool,
    /// Order entry timestamp.
    pub o_entry_d: u32,
}

impl OorderValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.o_c_id);
        put_u8(buf, self.o_carrier_id);
        put_u8(buf, self.o_ol_cnt);
        put_u8(buf, self.o_all_local as u8);
        put_u32(buf, self.o_entry_d);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = OorderValue {
            o_c_id: r.u32(),
            o_carrier_id: r.u8(),
            o_ol_cnt: r.u8(),
            o_all_local: r.u8() != 0,
            o_entry_d: r.u32(),
        };
        r.done();
        v
    }
}

/// The per-customer secondary index key over ORDER.
///
/// Scanning a customer's prefix in ascending order visits their orders
/// oldest first, so the last visited key is the most recent order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OorderCIdKey {
    /// Owning warehouse id.
    pub o_w_id: u32,
    /// Owning district id.
    pub o_d_id: u32,
    /// The ordering customer.
    pub o_c_id: u32,
    /// The order id.
    pub o_o_id: u32,
}

impl OorderCIdKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.o_w_id);
        put_u32(buf, self.o_d_id);
        put_u32(buf, self.o_c_id);
        put_u32(buf, self.o_o_id);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = OorderCIdKey {
            o_w_id: r.u32(),
            o_d_id: r.u32(),
            o_c_id: r.u32(),
            o_o_id: r.u32(),
        };
        r.done();
        k
    }
}

/// The per-customer order index row: an empty marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OorderCIdValue;

impl OorderCIdValue {
    /// Encodes into `buf`, replacing its contents (with nothing).
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        Reader::new(bytes).done();
        OorderCIdValue
    }
}

/// The ORDER-LINE primary key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrderLineKey {
    /// Owning warehouse id.
    pub ol_w_id: u32,
    /// Owning district id.
    pub ol_d_id: u32,
    /// Owning order id.
    pub ol_o_id: u32,
    /// Line number within the order, 1..=15.
    pub ol_number: u32,
}

impl OrderLineKey {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.ol_w_id);
        put_u32(buf, self.ol_d_id);
        put_u32(buf, self.ol_o_id);
        put_u32(buf, self.ol_number);
    }

    /// Decodes an encoded key.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let k = OrderLineKey {
            ol_w_id: r.u32(),
            ol_d_id: r.u32(),
            ol_o_id: r.u32(),
            ol_number: r.u32(),
        };
        r.done();
        k
    }
}

/// The ORDER-LINE row.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrderLineValue {
    /// The ordered item.
    pub ol_i_id: u32,
    /// Delivery timestamp, 0 until delivered.
    pub ol_delivery_d: u32,
    /// Line amount (quantity times unit price).
    pub ol_amount: f64,
    /// The supplying warehouse.
    pub ol_supply_w_id: u32,
    /// Units ordered.
    pub ol_quantity: u8,
    /// The supplying stock's distribution snapshot for the order's
    /// district.
    pub ol_dist_info: [u8; 24],
}

impl Default for OrderLineValue {
    fn default() -> Self {
        OrderLineValue {
            ol_i_id: 0,
            ol_delivery_d: 0,
            ol_amount: 0.0,
            ol_supply_w_id: 0,
            ol_quantity: 0,
            ol_dist_info: [0; 24],
        }
    }
}

impl OrderLineValue {
    /// Encodes into `buf`, replacing its contents.
    pub fn encode(&self, buf: &mut Vec<u8>) {
        buf.clear();
        put_u32(buf, self.ol_i_id);
        put_u32(buf, self.ol_delivery_d);
        put_f64(buf, self.ol_amount);
        put_u32(buf, self.ol_supply_w_id);
        put_u8(buf, self.ol_quantity);
        put_fixed(buf, &self.ol_dist_info);
    }

    /// Decodes an encoded row.
    pub fn decode(bytes: &[u8]) -> Self {
        let mut r = Reader::new(bytes);
        let v = OrderLineValue {
            ol_i_id: r.u32(),
            ol_delivery_d: r.u32(),
            ol_amount: r.f64(),
            ol_supply_w_id: r.u32(),
            ol_quantity: r.u8(),
            ol_dist_info: r.fixed(),
        };
        r.done();
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[track_caller]
    fn assert_key_order(keys: &[Vec<u8>]) {
        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "{:?} !< {:?}", pair[0], pair[1]);
        }
    }

    #[test]
    fn order_line_keys_sort_like_tuples() {
        let tuples = [
            (1, 1, 1, 1),
            (1, 1, 1, 15),
            (1, 1, 2, 1),
            (1, 2, 1, 1),
            (1, 10, 3000, 1),
            (2, 1, 1, 1),
        ];
        let keys = tuples
            .iter()
            .map(|&(w, d, o, l)| {
                let mut buf = Vec::new();
                OrderLineKey {
                    ol_w_id: w,
                    ol_d_id: d,
                    ol_o_id: o,
                    ol_number: l,
                }
                .encode(&mut buf);
                buf
            })
            .collect::<Vec<_>>();
        assert_key_order(&keys);
    }

    #[test]
    fn surname_range_brackets_the_surname() {
        let (lo, hi) = CustomerNameKey::surname_range(1, 3, "BARBARBAR");
        let mid = CustomerNameKey::from_names(1, 3, "BARBARBAR", "alice");
        let other = CustomerNameKey::from_names(1, 3, "BARBAROUGHT", "alice");

        let mut lo_buf = Vec::new();
        let mut hi_buf = Vec::new();
        let mut mid_buf = Vec::new();
        let mut other_buf = Vec::new();
        lo.encode(&mut lo_buf);
        hi.encode(&mut hi_buf);
        mid.encode(&mut mid_buf);
        other.encode(&mut other_buf);

        assert!(lo_buf < mid_buf && mid_buf < hi_buf);
        assert!(!(lo_buf..hi_buf).contains(&other_buf));
    }

    #[test]
    fn stock_partial_quantity_decode() {
        let v = StockValue {
            s_quantity: 42,
            s_ytd: 17,
            ..Default::default()
        };
        let mut buf = Vec::new();
        v.encode(&mut buf);
        assert_eq!(StockValue::decode_quantity(&buf), 42);
        assert_eq!(
            StockValue::decode_quantity(&buf[..StockValue::QUANTITY_WIDTH]),
            42
        );
        assert_eq!(StockValue::decode(&buf), v);
    }

    #[test]
    fn customer_value_round_trips() {
        let v = CustomerValue {
            c_discount: 0.1234,
            c_credit: *b"BC",
            c_last: "BAROUGHTABLE".to_string(),
            c_first: "firstname".to_string(),
            c_credit_lim: 50_000.0,
            c_balance: -10.0,
            c_ytd_payment: 10.0,
            c_payment_cnt: 1,
            c_delivery_cnt: 0,
            c_street_1: "street one".to_string(),
            c_street_2: "street two".to_string(),
            c_city: "city".to_string(),
            c_state: *b"aZ",
            c_zip: *b"123411111",
            c_phone: *b"0123456789012345",
            c_since: 99,
            c_middle: *b"OE",
            c_data: "x".repeat(C_DATA_MAX),
        };
        let mut buf = Vec::new();
        v.encode(&mut buf);
        assert_eq!(CustomerValue::decode(&buf), v);
    }
}
