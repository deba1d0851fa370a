//! An Ethernet + IPv6 frame laid out in one contiguous buffer.
#![allow(missing_docs)]

use bytes::BytesMut;
use log::debug;

use crate::ether::{EtherHeader, EtherOptions, EtherType, ETHER_HEADER_LEN};
use crate::field::FieldMap;
use crate::hexdump::{self, Region};
use crate::ipv6::{AddrSpec, Ipv6Header, Ipv6Options, IPV6_HEADER_LEN};
use crate::{Error, Result};

/// Byte length of the Ethernet and IPv6 headers together.
pub const FRAME_HEADER_LEN: usize = ETHER_HEADER_LEN + IPV6_HEADER_LEN;

/// Values for [`Ipv6Frame::fill`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameOptions {
    /// Length of the whole frame. Used to derive the IPv6 payload length
    /// when `ipv6.payload_len` is unset.
    pub total_len: Option<usize>,
    pub ether: EtherOptions,
    pub ipv6: Ipv6Options,
}

/// An Ethernet header followed by an IPv6 header.
///
/// The frame only sequences the two headers; every field belongs to one of
/// them.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Frame<T> {
    buf: T,
}

impl Ipv6Frame<BytesMut> {
    /// Allocate a zeroed frame of `total_len` bytes.
    pub fn zeroed(total_len: usize) -> Result<Self> {
        if total_len < FRAME_HEADER_LEN {
            return Err(Error::FrameTooShort(total_len, FRAME_HEADER_LEN));
        }
        Ok(Self {
            buf: BytesMut::zeroed(total_len),
        })
    }
}

impl<T: AsRef<[u8]>> Ipv6Frame<T> {
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
    pub fn parse(buf: T) -> core::result::Result<Self, T> {
        if buf.as_ref().len() < FRAME_HEADER_LEN {
            return Err(buf);
        }
        Ok(Self { buf })
    }

    #[inline]
    pub fn ether_header(&self) -> EtherHeader<&[u8]> {
        EtherHeader::parse_unchecked(&self.buf.as_ref()[..ETHER_HEADER_LEN])
    }

    #[inline]
    pub fn ipv6_header(&self) -> Ipv6Header<&[u8]> {
        Ipv6Header::parse_unchecked(&self.buf.as_ref()[ETHER_HEADER_LEN..FRAME_HEADER_LEN])
    }

    /// The bytes following the IPv6 header, cut at the payload length if the
    /// buffer is longer.
    pub fn payload(&self) -> &[u8] {
        let buf = self.buf.as_ref();
        let end = (FRAME_HEADER_LEN + self.ipv6_header().payload_len() as usize).min(buf.len());
        &buf[FRAME_HEADER_LEN..end]
    }

    /// The fields of both headers in one map.
    pub fn fields(&self) -> FieldMap {
        let mut fields = self.ether_header().fields();
        fields.extend(self.ipv6_header().fields());
        fields
    }

    /// Hex dump of the first `byte_count` bytes with both headers marked.
    pub fn dump(&self, byte_count: usize) -> String {
        let regions = [
            Region::new("ether", 0, ETHER_HEADER_LEN),
            Region::new("ipv6", ETHER_HEADER_LEN, IPV6_HEADER_LEN),
        ];
        hexdump::dump(self.buf.as_ref(), byte_count, &regions)
    }
}

impl<T: AsMut<[u8]>> Ipv6Frame<T> {
    #[inline]
    pub fn ether_header_mut(&mut self) -> EtherHeader<&mut [u8]> {
        EtherHeader::parse_unchecked(&mut self.buf.as_mut()[..ETHER_HEADER_LEN])
    }

    #[inline]
    pub fn ipv6_header_mut(&mut self) -> Ipv6Header<&mut [u8]> {
        Ipv6Header::parse_unchecked(&mut self.buf.as_mut()[ETHER_HEADER_LEN..FRAME_HEADER_LEN])
    }

    /// Fill the Ethernet header, then the IPv6 header.
    ///
    /// Unless given explicitly, the ethertype is forced to IPv6 and the
    /// payload length is derived from `opts.total_len`. Nothing is written
    /// if the length or an address is invalid.
    pub fn fill(&mut self, opts: &FrameOptions) -> Result<()> {
        let mut ipv6 = opts.ipv6.clone();
        if let Some(spec) = &opts.ipv6.src_addr {
            ipv6.src_addr = Some(AddrSpec::Addr(spec.resolve()?));
        }
        if let Some(spec) = &opts.ipv6.dst_addr {
            ipv6.dst_addr = Some(AddrSpec::Addr(spec.resolve()?));
        }
        if ipv6.payload_len.is_none() {
            if let Some(total_len) = opts.total_len {
                ipv6.payload_len = Some(derive_payload_len(total_len)?);
            }
        }

        let mut ether = opts.ether;
        if ether.ethertype.is_none() {
            ether.ethertype = Some(EtherType::IPV6);
        }

        self.ether_header_mut().fill(&ether);
        self.ipv6_header_mut().fill(&ipv6)
    }
}

/// The IPv6 payload length of an Ethernet frame of `total_len` bytes.
pub fn derive_payload_len(total_len: usize) -> Result<u16> {
    let payload_len = total_len
        .checked_sub(FRAME_HEADER_LEN)
        .ok_or(Error::FrameTooShort(total_len, FRAME_HEADER_LEN))?;
    let payload_len = u16::try_from(payload_len).map_err(|_| Error::PayloadTooLong(payload_len))?;
    debug!(
        "derived ipv6 payload length {} from frame length {}",
        payload_len, total_len
    );
    Ok(payload_len)
}
