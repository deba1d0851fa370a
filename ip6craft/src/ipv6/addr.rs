use std::fmt::{self, Write};
use std::net::Ipv6Addr;
use std::ops::{Add, AddAssign, Sub, SubAssign};
use std::str::FromStr;

use log::trace;

use crate::endian;
use crate::{Error, Result};

/// A 128-bit IPv6 address.
///
/// The bytes are always kept in network order. Arithmetic works on the
/// host-order `(hi, lo)` limbs obtained from [`Ipv6Address::to_limbs`] and
/// stores the result back in network order.
#[derive(Debug, Hash, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct Ipv6Address(pub [u8; 16]);

impl Ipv6Address {
    /// The unspecified address `::`.
    pub const UNSPECIFIED: Ipv6Address = Ipv6Address([0; 16]);

    /// Construct an address from a sequence of octets, in network order.
    ///
    /// # Panics
    /// The function panics if `data` is not sixteen octets long.
    pub fn from_bytes(data: &[u8]) -> Ipv6Address {
        let mut bytes = [0; 16];
        bytes.copy_from_slice(data);
        Ipv6Address(bytes)
    }

    /// Return the address as a sequence of octets, in network order.
    pub const fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Return a copy of the sixteen octets, in network order.
    pub const fn octets(&self) -> [u8; 16] {
        self.0
    }

    /// Return the host-order `(hi, lo)` 64-bit limbs of the address.
    pub fn to_limbs(&self) -> (u64, u64) {
        endian::read_limbs(&self.0)
    }

    /// Build an address from host-order `(hi, lo)` limbs.
    pub fn from_limbs(hi: u64, lo: u64) -> Ipv6Address {
        Ipv6Address(endian::write_limbs(hi, lo))
    }

    /// Return the host view of the stored bytes.
    ///
    /// All four 32-bit words are byte swapped and their order is reversed.
    /// Applying `get` twice yields the original value.
    pub fn get(&self) -> Ipv6Address {
        Ipv6Address(endian::swap_words(&self.0))
    }

    /// Store a host-view value, the inverse of [`Ipv6Address::get`].
    pub fn set(&mut self, host: Ipv6Address) {
        self.0 = endian::swap_words(&host.0);
    }

    /// Parse `text` and store the result.
    ///
    /// On error the stored value is left untouched.
    pub fn set_from_str(&mut self, text: &str) -> Result<()> {
        let host = parse_host(text)?;
        self.set(host);
        Ok(())
    }

    /// Whether both addresses carry exactly the same 128 bits.
    pub fn equals(&self, other: &Ipv6Address) -> bool {
        self.to_limbs() == other.to_limbs()
    }

    /// Add a signed delta in place, treating the address as a 128-bit
    /// big-endian integer.
    ///
    /// A carry or borrow out of the low limb moves into the high limb. The
    /// whole value wraps around at 128 bits.
    pub fn add_in_place(&mut self, delta: i64) {
        let (hi, lo) = self.to_limbs();
        let new_lo = lo.wrapping_add(delta as u64);
        let new_hi = if delta > 0 && new_lo < lo {
            trace!("carry into high limb: {:#x} + {}", lo, delta);
            hi.wrapping_add(1)
        } else if delta < 0 && new_lo > lo {
            trace!("borrow from high limb: {:#x} - {}", lo, delta.unsigned_abs());
            hi.wrapping_sub(1)
        } else {
            hi
        };
        *self = Ipv6Address::from_limbs(new_hi, new_lo);
    }

    /// Subtract a signed delta in place.
    ///
    /// Equivalent to `add_in_place(-delta)`, including for `i64::MIN`
    /// whose negation does not fit in an `i64`.
    pub fn subtract_in_place(&mut self, delta: i64) {
        match delta.checked_neg() {
            Some(neg) => self.add_in_place(neg),
            None => {
                // -i64::MIN == i64::MAX + 1
                self.add_in_place(i64::MAX);
                self.add_in_place(1);
            }
        }
    }

    /// Return `self + delta` without touching `self`.
    pub fn plus(&self, delta: i64) -> Ipv6Address {
        let mut out = *self;
        out.add_in_place(delta);
        out
    }

    /// Return `self - delta` without touching `self`.
    pub fn minus(&self, delta: i64) -> Ipv6Address {
        let mut out = *self;
        out.subtract_in_place(delta);
        out
    }

    /// Render the address as eight colon-separated groups of four lowercase
    /// hex digits, without zero compression.
    ///
    /// With `swap_first` the host view is rendered instead of the stored
    /// bytes.
    pub fn render(&self, swap_first: bool) -> String {
        let bytes = if swap_first { self.get().0 } else { self.0 };
        let mut out = String::with_capacity(39);
        for (i, group) in bytes.chunks_exact(2).enumerate() {
            if i > 0 {
                out.push(':');
            }
            let _ = write!(out, "{:02x}{:02x}", group[0], group[1]);
        }
        out
    }

    /// Query whether the address is `::`.
    pub fn is_unspecified(&self) -> bool {
        *self == Self::UNSPECIFIED
    }

    /// Query whether the address is in `fe80::/10`.
    pub const fn is_link_local(&self) -> bool {
        self.0[0] == 0xfe && (self.0[1] & 0xc0) == 0x80
    }

    /// Query whether the address is in `ff00::/8`.
    pub const fn is_multicast(&self) -> bool {
        self.0[0] == 0xff
    }
}

// The textual parser yields a host-view value, ready for `Ipv6Address::set`.
fn parse_host(text: &str) -> Result<Ipv6Address> {
    let parsed = Ipv6Addr::from_str(text).map_err(|_| Error::Parse(text.to_string()))?;
    Ok(Ipv6Address(endian::swap_words(&parsed.octets())))
}

impl fmt::Display for Ipv6Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(false))
    }
}

impl FromStr for Ipv6Address {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let mut addr = Ipv6Address::UNSPECIFIED;
        addr.set_from_str(s)?;
        Ok(addr)
    }
}

impl From<Ipv6Addr> for Ipv6Address {
    fn from(value: Ipv6Addr) -> Self {
        Ipv6Address(value.octets())
    }
}

impl From<Ipv6Address> for Ipv6Addr {
    fn from(value: Ipv6Address) -> Self {
        Ipv6Addr::from(value.0)
    }
}

impl PartialEq<Ipv6Addr> for Ipv6Address {
    fn eq(&self, other: &Ipv6Addr) -> bool {
        self.0 == other.octets()
    }
}

impl Add<i64> for Ipv6Address {
    type Output = Ipv6Address;

    fn add(self, rhs: i64) -> Ipv6Address {
        self.plus(rhs)
    }
}

impl Add<Ipv6Address> for i64 {
    type Output = Ipv6Address;

    fn add(self, rhs: Ipv6Address) -> Ipv6Address {
        rhs.plus(self)
    }
}

impl Sub<i64> for Ipv6Address {
    type Output = Ipv6Address;

    fn sub(self, rhs: i64) -> Ipv6Address {
        self.minus(rhs)
    }
}

impl AddAssign<i64> for Ipv6Address {
    fn add_assign(&mut self, rhs: i64) {
        self.add_in_place(rhs);
    }
}

impl SubAssign<i64> for Ipv6Address {
    fn sub_assign(&mut self, rhs: i64) {
        self.subtract_in_place(rhs);
    }
}

/// An address argument given either as text or as an already typed value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddrSpec {
    /// Textual form, parsed when the argument is applied.
    Text(String),
    /// A typed address, applied as is.
    Addr(Ipv6Address),
}

impl AddrSpec {
    /// Turn the argument into an address.
    pub fn resolve(&self) -> Result<Ipv6Address> {
        match self {
            AddrSpec::Text(text) => text.parse(),
            AddrSpec::Addr(addr) => Ok(*addr),
        }
    }
}

impl From<&str> for AddrSpec {
    fn from(value: &str) -> Self {
        AddrSpec::Text(value.to_string())
    }
}

impl From<String> for AddrSpec {
    fn from(value: String) -> Self {
        AddrSpec::Text(value)
    }
}

impl From<Ipv6Address> for AddrSpec {
    fn from(value: Ipv6Address) -> Self {
        AddrSpec::Addr(value)
    }
}

impl From<Ipv6Addr> for AddrSpec {
    fn from(value: Ipv6Addr) -> Self {
        AddrSpec::Addr(value.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Ipv6Address {
        s.parse().unwrap()
    }

    #[test]
    fn parse_stores_network_order() {
        let a = addr("fe80::1");
        assert_eq!(a.0[0], 0xfe);
        assert_eq!(a.0[1], 0x80);
        assert_eq!(a.0[15], 0x01);
        assert_eq!(a, Ipv6Addr::from_str("fe80::1").unwrap());
    }

    #[test]
    fn parse_error() {
        let mut a = addr("fe80::1");
        assert_eq!(
            a.set_from_str("fe80::zz"),
            Err(Error::Parse("fe80::zz".to_string()))
        );
        assert_eq!(a, addr("fe80::1"));
        assert!("1.2.3.4".parse::<Ipv6Address>().is_err());
        assert!("".parse::<Ipv6Address>().is_err());
        assert_eq!(
            " fe80::1".parse::<Ipv6Address>(),
            Err(Error::Parse(" fe80::1".to_string()))
        );
        assert_eq!(
            "fe80::1\n".parse::<Ipv6Address>(),
            Err(Error::Parse("fe80::1\n".to_string()))
        );
    }

    #[test]
    fn get_set_symmetry() {
        let original = addr("2001:db8:1:2:3:4:5:6");
        let host = original.get();
        assert_eq!(host.0[0], 0x06);
        assert_eq!(host.0[15], 0x20);
        assert_eq!(host.get(), original);

        let mut restored = Ipv6Address::UNSPECIFIED;
        restored.set(host);
        assert_eq!(restored, original);
    }

    #[test]
    fn limbs() {
        let a = addr("::1:0:0:0:0");
        assert_eq!(a.to_limbs(), (1, 0));
        assert_eq!(Ipv6Address::from_limbs(1, 0), a);
        let b = addr("::ffff:ffff:ffff:ffff");
        assert_eq!(b.to_limbs(), (0, u64::MAX));
    }

    #[test]
    fn add_carries_into_high_limb() {
        let mut a = addr("::ffff:ffff:ffff:ffff");
        a.add_in_place(1);
        assert_eq!(a, addr("::1:0:0:0:0"));

        let mut b = addr("::1:ffff:ffff:ffff:fff0");
        b.add_in_place(0x20);
        assert_eq!(b, addr("::2:0:0:0:10"));
    }

    #[test]
    fn subtract_borrows_from_high_limb() {
        let mut a = addr("::1:0:0:0:0");
        a.subtract_in_place(1);
        assert_eq!(a, addr("::ffff:ffff:ffff:ffff"));

        let mut b = addr("::1:0:0:0:0");
        b.add_in_place(-1);
        assert_eq!(b, addr("::ffff:ffff:ffff:ffff"));
    }

    #[test]
    fn no_spurious_borrow() {
        let mut a = addr("::1:ffff:ffff:ffff:ffff");
        a.subtract_in_place(1);
        assert_eq!(a, addr("::1:ffff:ffff:ffff:fffe"));
    }

    #[test]
    fn boundary_deltas() {
        let a = addr("fe80::1");
        assert_eq!(a.plus(0), a);
        assert_eq!(a.minus(0), a);

        let b = addr("::1:0:0:0:0");
        assert_eq!(b.minus(i64::MIN), addr("::1:8000:0:0:0"));
        assert_eq!(b.plus(i64::MIN), addr("::8000:0:0:0"));
        assert_eq!(b.minus(i64::MIN).plus(i64::MIN), b);
        assert_eq!(addr("::").plus(i64::MAX), addr("::7fff:ffff:ffff:ffff"));
    }

    #[test]
    fn wraps_at_128_bits() {
        let max = Ipv6Address([0xff; 16]);
        assert_eq!(max.plus(1), Ipv6Address::UNSPECIFIED);
        assert_eq!(Ipv6Address::UNSPECIFIED.minus(1), max);
    }

    #[test]
    fn commutative_plus() {
        let a = addr("2001:db8::ffff");
        assert_eq!(a + 5, 5i64 + a);
        assert_eq!(a + 5, addr("2001:db8::1:4"));
        assert_eq!(a - 5, a.minus(5));

        let mut b = a;
        b += 5;
        b -= 5;
        assert_eq!(b, a);
    }

    #[test]
    fn equality() {
        let a = addr("fe80::1");
        let b = addr("fe80:0:0:0::1");
        assert!(a.equals(&b));
        assert_eq!(a, b);

        for bit in 0..128 {
            let mut flipped = a;
            flipped.0[bit / 8] ^= 1 << (bit % 8);
            assert!(!a.equals(&flipped));
        }
    }

    #[test]
    fn render_full_groups() {
        let a = addr("fe80::2");
        assert_eq!(a.render(false), "fe80:0000:0000:0000:0000:0000:0000:0002");
        assert_eq!(a.to_string(), a.render(false));
        assert_eq!(
            a.get().render(true),
            "fe80:0000:0000:0000:0000:0000:0000:0002"
        );
        assert_eq!(a.render(true), "0200:0000:0000:0000:0000:0000:0000:80fe");
    }

    #[test]
    fn address_kinds() {
        assert!(Ipv6Address::UNSPECIFIED.is_unspecified());
        assert!(addr("fe80::1").is_link_local());
        assert!(addr("febf::1").is_link_local());
        assert!(!addr("fec0::1").is_link_local());
        assert!(addr("ff02::1").is_multicast());
        assert!(!addr("fe80::1").is_multicast());
    }

    #[test]
    fn addr_spec_resolve() {
        let typed = AddrSpec::from(addr("fe80::9"));
        assert_eq!(typed.resolve(), Ok(addr("fe80::9")));
        let text = AddrSpec::from("fe80::9");
        assert_eq!(text.resolve(), Ok(addr("fe80::9")));
        assert!(AddrSpec::from("not an address").resolve().is_err());
    }
}
