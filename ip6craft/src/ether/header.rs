#![allow(missing_docs)]

use byteorder::{ByteOrder, NetworkEndian};
use log::debug;

use super::{EtherAddr, EtherType};
use crate::field::FieldMap;

/// A constant that defines the fixed byte length of the Ether protocol header.
pub const ETHER_HEADER_LEN: usize = 14;

pub const DEFAULT_DST_MAC: EtherAddr = EtherAddr::BROADCAST;
pub const DEFAULT_SRC_MAC: EtherAddr = EtherAddr([0; 6]);
pub const DEFAULT_ETHERTYPE: EtherType = EtherType::IPV4;

/// A fixed Ether header carrying the defaults.
pub const ETHER_HEADER_TEMPLATE: EtherHeader<[u8; 14]> = EtherHeader {
    buf: [
        0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x08, 0x00,
    ],
};

/// Values for [`EtherHeader::fill`].
///
/// A field left as `None` receives its default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EtherOptions {
    pub dst_addr: Option<EtherAddr>,
    pub src_addr: Option<EtherAddr>,
    pub ethertype: Option<EtherType>,
}

#[derive(Debug, Clone, Copy)]
pub struct EtherHeader<T> {
    buf: T,
}

impl<T: AsRef<[u8]>> EtherHeader<T> {
    #[inline]
    pub fn parse_unchecked(buf: T) -> Self {
        Self { buf }
    }
    #[inline]
    pub fn buf(&self) -> &T {
        &self.buf
    }
    #[inline]
    pub fn release(self) -> T {
        self.buf
    }
    #[inline]
    pub fn parse(buf: T) -> Result<Self, T> {
        let remaining_len = buf.as_ref().len();
        if remaining_len < ETHER_HEADER_LEN {
            return Err(buf);
        }
        Ok(Self { buf })
    }
    #[inline]
    pub fn header_slice(&self) -> &[u8] {
        &self.buf.as_ref()[0..ETHER_HEADER_LEN]
    }
    #[inline]
    pub fn dst_addr(&self) -> EtherAddr {
        EtherAddr::from_bytes(&self.buf.as_ref()[0..6])
    }
    #[inline]
    pub fn src_addr(&self) -> EtherAddr {
        EtherAddr::from_bytes(&self.buf.as_ref()[6..12])
    }
    #[inline]
    pub fn ethertype(&self) -> EtherType {
        EtherType::from(NetworkEndian::read_u16(&self.buf.as_ref()[12..14]))
    }

    /// Every field of the header, keyed by field name.
    pub fn fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("dst_mac", self.dst_addr().to_string().into());
        fields.insert("src_mac", self.src_addr().to_string().into());
        fields.insert("ethertype", self.ethertype().raw().into());
        fields
    }
}

impl<T: AsMut<[u8]>> EtherHeader<T> {
    #[inline]
    pub fn header_slice_mut(&mut self) -> &mut [u8] {
        &mut self.buf.as_mut()[0..ETHER_HEADER_LEN]
    }
    #[inline]
    pub fn set_dst_addr(&mut self, value: EtherAddr) {
        self.buf.as_mut()[0..6].copy_from_slice(value.as_bytes());
    }
    #[inline]
    pub fn set_src_addr(&mut self, value: EtherAddr) {
        self.buf.as_mut()[6..12].copy_from_slice(value.as_bytes());
    }
    #[inline]
    pub fn set_ethertype(&mut self, value: EtherType) {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[12..14], u16::from(value));
    }

    /// Write every field, taking the default for those left unset in `opts`.
    pub fn fill(&mut self, opts: &EtherOptions) {
        let ethertype = opts.ethertype.unwrap_or(DEFAULT_ETHERTYPE);
        self.set_dst_addr(opts.dst_addr.unwrap_or(DEFAULT_DST_MAC));
        self.set_src_addr(opts.src_addr.unwrap_or(DEFAULT_SRC_MAC));
        self.set_ethertype(ethertype);
        debug!("filled ether header, ethertype {:#06x}", ethertype);
    }
}
