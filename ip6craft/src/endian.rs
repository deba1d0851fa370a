//! Byte-order primitives shared by the address and header views.
//!
//! Everything on the wire is network order. The "host view" of a 16-byte
//! address is the byte-swapped form: each 32-bit word is swapped and the word
//! order is reversed, so word 0 lands on word 3 and word 1 on word 2.

use byteorder::{ByteOrder, LittleEndian, NetworkEndian};

/// Read a 16-byte network-order value as its `(hi, lo)` 64-bit limbs.
#[inline]
pub(crate) fn read_limbs(buf: &[u8; 16]) -> (u64, u64) {
    (
        NetworkEndian::read_u64(&buf[..8]),
        NetworkEndian::read_u64(&buf[8..]),
    )
}

/// Write `(hi, lo)` limbs back as a 16-byte network-order value.
#[inline]
pub(crate) fn write_limbs(hi: u64, lo: u64) -> [u8; 16] {
    let mut out = [0; 16];
    NetworkEndian::write_u64(&mut out[..8], hi);
    NetworkEndian::write_u64(&mut out[8..], lo);
    out
}

/// Convert between the stored and the host view of a 16-byte value.
///
/// The conversion is its own inverse.
#[inline]
pub(crate) fn swap_words(buf: &[u8; 16]) -> [u8; 16] {
    let mut out = [0; 16];
    for word in 0..4 {
        let value = NetworkEndian::read_u32(&buf[word * 4..word * 4 + 4]);
        let target = (3 - word) * 4;
        LittleEndian::write_u32(&mut out[target..target + 4], value);
    }
    out
}

#[test]
fn test_swap_words_mapping() {
    let mut buf = [0; 16];
    for (i, b) in buf.iter_mut().enumerate() {
        *b = i as u8;
    }
    let swapped = swap_words(&buf);
    assert_eq!(&swapped[..4], &[15, 14, 13, 12]);
    assert_eq!(&swapped[4..8], &[11, 10, 9, 8]);
    assert_eq!(&swapped[12..], &[3, 2, 1, 0]);
    assert_eq!(swap_words(&swapped), buf);
}

#[test]
fn test_read_write_limbs() {
    let buf = [
        0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
        0x01,
    ];
    let (hi, lo) = read_limbs(&buf);
    assert_eq!(hi, 0xfe80_0000_0000_0000);
    assert_eq!(lo, 1);
    assert_eq!(write_limbs(hi, lo), buf);
}
