// Copyright 2023 Daniel Harrison. All Rights Reserved.

//! Fixed-layout encoding primitives for table records
//!
//! Keys encode every integer field big-endian in declaration order, so the
//! encoded byte strings sort exactly like the field tuples. Every range
//! scan in the workload depends on that property; do not change the key
//! side of this module without re-deriving the scan bounds.
//!
//! Values reuse the same primitives (order there is irrelevant) plus
//! u16-length-prefixed variable strings and raw fixed-width byte arrays.
//! Decoding is infallible by contract: these bytes were produced by the
//! matching encoder, and anything malformed is a codec bug, so the reader
//! panics rather than surfacing an error.

/// Appends a big-endian u32.
pub fn put_u32(buf: &mut Vec<u8>, v: u32) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends a big-endian u16.
pub fn put_u16(buf: &mut Vec<u8>, v: u16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends a big-endian i16.
pub fn put_i16(buf: &mut Vec<u8>, v: i16) {
    buf.extend_from_slice(&v.to_be_bytes());
}

/// Appends a single byte.
pub fn put_u8(buf: &mut Vec<u8>, v: u8) {
    buf.push(v);
}

/// Appends an f64 as its big-endian bit pattern.
pub fn put_f64(buf: &mut Vec<u8>, v: f64) {
    buf.extend_from_slice(&v.to_bits().to_be_bytes());
}

/// Appends a u16 length prefix and the string bytes.
pub fn put_str(buf: &mut Vec<u8>, s: &str) {
    let len = u16::try_from(s.len()).expect("string field over 64KiB");
    put_u16(buf, len);
    buf.extend_from_slice(s.as_bytes());
}

/// Appends a fixed-width byte array verbatim.
pub fn put_fixed<const N: usize>(buf: &mut Vec<u8>, bytes: &[u8; N]) {
    buf.extend_from_slice(bytes);
}

/// A cursor over encoded bytes.
///
/// Panics on truncated or oversized input; see the module docs.
#[derive(Debug)]
pub struct Reader<'a> {
    bytes: &'a [u8],
}

impl<'a> Reader<'a> {
    /// A reader positioned at the start of `bytes`.
    pub fn new(bytes: &'a [u8]) -> Self {
        Reader { bytes }
    }

    fn take(&mut self, n: usize) -> &'a [u8] {
        assert!(n <= self.bytes.len(), "decode past end of record");
        let (head, tail) = self.bytes.split_at(n);
        self.bytes = tail;
        head
    }

    /// Reads a big-endian u32.
    pub fn u32(&mut self) -> u32 {
        u32::from_be_bytes(self.take(4).try_into().unwrap())
    }

    /// Reads a big-endian u16.
    pub fn u16(&mut self) -> u16 {
        u16::from_be_bytes(self.take(2).try_into().unwrap())
    }

    /// Reads a big-endian i16.
    pub fn i16(&mut self) -> i16 {
        i16::from_be_bytes(self.take(2).try_into().unwrap())
    }

    /// Reads a single byte.
    pub fn u8(&mut self) -> u8 {
        self.take(1)[0]
    }

    /// Reads an f64 from its big-endian bit pattern.
    pub fn f64(&mut self) -> f64 {
        f64::from_bits(u64::from_be_bytes(self.take(8).try_into().unwrap()))
    }

    /// Reads a u16-length-prefixed string.
    pub fn str(&mut self) -> String {
        let len = self.u16() as usize;
        let bytes = self.take(len);
        String::from_utf8(bytes.to_vec()).expect("string field not utf8")
    }

    /// Reads a fixed-width byte array.
    pub fn fixed<const N: usize>(&mut self) -> [u8; N] {
        self.take(N).try_into().unwrap()
    }

    /// Asserts the record was fully consumed.
    pub fn done(&self) {
        assert!(self.bytes.is_empty(), "{} bytes left after decode", self.bytes.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitives_round_trip() {
        let mut buf = Vec::new();
        put_u32(&mut buf, 123_456);
        put_i16(&mut buf, -7);
        put_u8(&mut buf, 9);
        put_f64(&mut buf, -12.5);
        put_str(&mut buf, "hello");
        put_fixed(&mut buf, b"abcd");

        let mut r = Reader::new(&buf);
        assert_eq!(r.u32(), 123_456);
        assert_eq!(r.i16(), -7);
        assert_eq!(r.u8(), 9);
        assert_eq!(r.f64(), -12.5);
        assert_eq!(r.str(), "hello");
        assert_eq!(&r.fixed::<4>(), b"abcd");
        r.done();
    }

    #[test]
    fn big_endian_u32_preserves_order() {
        let mut prev = Vec::new();
        put_u32(&mut prev, 0);
        for v in [1, 2, 9, 10, 255, 256, 65_535, 65_536, u32::MAX] {
            let mut cur = Vec::new();
            put_u32(&mut cur, v);
            assert!(prev < cur, "{v}");
            prev = cur;
        }
    }

    #[test]
    #[should_panic(expected = "decode past end")]
    fn truncated_record_is_fatal() {
        let mut r = Reader::new(&[0, 1]);
        let _ = r.u32();
    }
}
