#![allow(missing_docs)]

use std::fmt;

use byteorder::{ByteOrder, NetworkEndian};
use log::{debug, warn};

use super::{AddrSpec, Ipv6Address, NextHeader};
use crate::field::{FieldMap, FieldValue};
use crate::{Error, Result};

/// A constant that defines the fixed byte length of the Ipv6 protocol header.
pub const IPV6_HEADER_LEN: usize = 40;

/// Version written by [`Ipv6Header::fill`] when unset.
pub const DEFAULT_VERSION: u8 = 6;
/// Traffic class written by [`Ipv6Header::fill`] when unset.
pub const DEFAULT_TRAFFIC_CLASS: u8 = 0;
/// Flow label written by [`Ipv6Header::fill`] when unset.
pub const DEFAULT_FLOW_LABEL: u32 = 0;
/// Payload length written by [`Ipv6Header::fill`] when unset.
pub const DEFAULT_PAYLOAD_LEN: u16 = 8;
/// Next header written by [`Ipv6Header::fill`] when unset.
pub const DEFAULT_NEXT_HEADER: NextHeader = NextHeader::UDP;
/// Hop limit written by [`Ipv6Header::fill`] when unset.
pub const DEFAULT_HOP_LIMIT: u8 = 64;
/// `fe80::1`
pub const DEFAULT_SRC: Ipv6Address = Ipv6Address([
    0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01,
]);
/// `fe80::2`
pub const DEFAULT_DST: Ipv6Address = Ipv6Address([
    0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02,
]);

/// An Ipv6 header carrying every default value.
pub const IPV6_HEADER_TEMPLATE: [u8; 40] = [
    0x60, 0x00, 0x00, 0x00, 0x00, 0x08, 0x11, 0x40, 0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x01, 0xfe, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x02,
];

/// The position of a sub-field inside the 32-bit version/class/flow word.
#[derive(Debug, Clone, Copy)]
struct BitSpan {
    shift: u32,
    width: u32,
}

impl BitSpan {
    const fn new(shift: u32, width: u32) -> Self {
        Self { shift, width }
    }

    const fn max(&self) -> u32 {
        ((1u64 << self.width) - 1) as u32
    }

    const fn mask(&self) -> u32 {
        self.max() << self.shift
    }

    #[inline]
    const fn extract(&self, word: u32) -> u32 {
        (word & self.mask()) >> self.shift
    }

    #[inline]
    const fn insert(&self, word: u32, value: u32) -> u32 {
        (word & !self.mask()) | ((value & self.max()) << self.shift)
    }
}

const VERSION: BitSpan = BitSpan::new(28, 4);
const TRAFFIC_CLASS: BitSpan = BitSpan::new(20, 8);
const FLOW_LABEL: BitSpan = BitSpan::new(0, 20);

// The three spans are disjoint and cover the whole word.
const _: () = {
    assert!(VERSION.mask() & TRAFFIC_CLASS.mask() == 0);
    assert!(VERSION.mask() & FLOW_LABEL.mask() == 0);
    assert!(TRAFFIC_CLASS.mask() & FLOW_LABEL.mask() == 0);
    assert!(VERSION.mask() | TRAFFIC_CLASS.mask() | FLOW_LABEL.mask() == u32::MAX);
};

/// The fields of an Ipv6 header, in wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Ipv6Field {
    Version,
    TrafficClass,
    FlowLabel,
    PayloadLen,
    NextHeader,
    HopLimit,
    SrcAddr,
    DstAddr,
}

impl Ipv6Field {
    /// All fields, in wire order.
    pub const ALL: [Ipv6Field; 8] = [
        Ipv6Field::Version,
        Ipv6Field::TrafficClass,
        Ipv6Field::FlowLabel,
        Ipv6Field::PayloadLen,
        Ipv6Field::NextHeader,
        Ipv6Field::HopLimit,
        Ipv6Field::SrcAddr,
        Ipv6Field::DstAddr,
    ];

    /// The key used for this field in a [`FieldMap`].
    pub const fn name(&self) -> &'static str {
        match self {
            Ipv6Field::Version => "version",
            Ipv6Field::TrafficClass => "traffic_class",
            Ipv6Field::FlowLabel => "flow_label",
            Ipv6Field::PayloadLen => "payload_len",
            Ipv6Field::NextHeader => "next_header",
            Ipv6Field::HopLimit => "hop_limit",
            Ipv6Field::SrcAddr => "src_addr",
            Ipv6Field::DstAddr => "dst_addr",
        }
    }
}

/// Values for [`Ipv6Header::fill`].
///
/// A field left as `None` receives its default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Ipv6Options {
    pub version: Option<u8>,
    pub traffic_class: Option<u8>,
    pub flow_label: Option<u32>,
    pub payload_len: Option<u16>,
    pub next_header: Option<NextHeader>,
    pub hop_limit: Option<u8>,
    pub src_addr: Option<AddrSpec>,
    pub dst_addr: Option<AddrSpec>,
}

/// A view of the fixed Ipv6 header over a byte buffer.
#[derive(Debug, Clone, Copy)]
pub struct Ipv6Header<T> {
    buf: T,
}

impl<T: AsRef<[u8]>> Ipv6Header<T> {
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

    /// Map the header onto `buf`, giving the buffer back if it is shorter
    /// than 40 bytes.
    #[inline]
    pub fn parse(buf: T) -> core::result::Result<Self, T> {
        if buf.as_ref().len() < IPV6_HEADER_LEN {
            return Err(buf);
        }
        Ok(Self { buf })
    }

    #[inline]
    pub fn header_slice(&self) -> &[u8] {
        &self.buf.as_ref()[0..IPV6_HEADER_LEN]
    }

    #[inline]
    pub fn to_owned(&self) -> Ipv6Header<[u8; IPV6_HEADER_LEN]> {
        let mut buf = [0; IPV6_HEADER_LEN];
        buf.copy_from_slice(self.header_slice());
        Ipv6Header { buf }
    }

    /// The raw version/class/flow word.
    #[inline]
    pub fn vtf(&self) -> u32 {
        NetworkEndian::read_u32(&self.buf.as_ref()[0..4])
    }

    #[inline]
    pub fn check_version(&self) -> bool {
        self.version() == 6
    }

    #[inline]
    pub fn version(&self) -> u8 {
        VERSION.extract(self.vtf()) as u8
    }

    #[inline]
    pub fn traffic_class(&self) -> u8 {
        TRAFFIC_CLASS.extract(self.vtf()) as u8
    }

    #[inline]
    pub fn flow_label(&self) -> u32 {
        FLOW_LABEL.extract(self.vtf())
    }

    #[inline]
    pub fn payload_len(&self) -> u16 {
        NetworkEndian::read_u16(&self.buf.as_ref()[4..6])
    }

    #[inline]
    pub fn next_header(&self) -> NextHeader {
        NextHeader::from(self.buf.as_ref()[6])
    }

    #[inline]
    pub fn hop_limit(&self) -> u8 {
        self.buf.as_ref()[7]
    }

    #[inline]
    pub fn src_addr(&self) -> Ipv6Address {
        Ipv6Address::from_bytes(&self.buf.as_ref()[8..24])
    }

    #[inline]
    pub fn dst_addr(&self) -> Ipv6Address {
        Ipv6Address::from_bytes(&self.buf.as_ref()[24..40])
    }

    /// Decode a single field.
    pub fn field_value(&self, field: Ipv6Field) -> FieldValue {
        match field {
            Ipv6Field::Version => self.version().into(),
            Ipv6Field::TrafficClass => self.traffic_class().into(),
            Ipv6Field::FlowLabel => self.flow_label().into(),
            Ipv6Field::PayloadLen => self.payload_len().into(),
            Ipv6Field::NextHeader => self.next_header().raw().into(),
            Ipv6Field::HopLimit => self.hop_limit().into(),
            Ipv6Field::SrcAddr => self.src_addr().to_string().into(),
            Ipv6Field::DstAddr => self.dst_addr().to_string().into(),
        }
    }

    /// Decode a single field and render it for display.
    ///
    /// The traffic class and flow label are shown in hex, the next header
    /// as `code(name)`.
    pub fn field_string(&self, field: Ipv6Field) -> String {
        match field {
            Ipv6Field::TrafficClass => format!("{:#04x}", self.traffic_class()),
            Ipv6Field::FlowLabel => format!("{:#07x}", self.flow_label()),
            Ipv6Field::NextHeader => {
                let nh = self.next_header();
                format!("{}({})", nh.raw(), nh.name())
            }
            _ => self.field_value(field).to_string(),
        }
    }

    /// Every field of the header, keyed by [`Ipv6Field::name`].
    pub fn fields(&self) -> FieldMap {
        Ipv6Field::ALL
            .iter()
            .map(|field| (field.name(), self.field_value(*field)))
            .collect()
    }
}

impl<T: AsMut<[u8]>> Ipv6Header<T> {
    #[inline]
    pub fn header_slice_mut(&mut self) -> &mut [u8] {
        &mut self.buf.as_mut()[0..IPV6_HEADER_LEN]
    }

    #[inline]
    pub fn set_vtf(&mut self, value: u32) {
        NetworkEndian::write_u32(&mut self.buf.as_mut()[0..4], value);
    }

    // Read-modify-write of the whole word, siblings are preserved.
    #[inline]
    fn update_vtf(&mut self, span: BitSpan, value: u32) {
        let word = NetworkEndian::read_u32(&self.buf.as_mut()[0..4]);
        self.set_vtf(span.insert(word, value));
    }

    /// Set the version, keeping only its low 4 bits.
    #[inline]
    pub fn set_version(&mut self, value: u8) {
        if (value as u32) > VERSION.max() {
            warn!("ipv6 version {} truncated to 4 bits", value);
        }
        self.update_vtf(VERSION, value as u32);
    }

    #[inline]
    pub fn try_set_version(&mut self, value: u8) -> Result<()> {
        check_range("version", value as u64, VERSION.max() as u64)?;
        self.update_vtf(VERSION, value as u32);
        Ok(())
    }

    #[inline]
    pub fn set_traffic_class(&mut self, value: u8) {
        self.update_vtf(TRAFFIC_CLASS, value as u32);
    }

    /// Set the flow label, keeping only its low 20 bits.
    #[inline]
    pub fn set_flow_label(&mut self, value: u32) {
        if value > FLOW_LABEL.max() {
            warn!("ipv6 flow label {:#x} truncated to 20 bits", value);
        }
        self.update_vtf(FLOW_LABEL, value);
    }

    #[inline]
    pub fn try_set_flow_label(&mut self, value: u32) -> Result<()> {
        check_range("flow_label", value as u64, FLOW_LABEL.max() as u64)?;
        self.update_vtf(FLOW_LABEL, value);
        Ok(())
    }

    #[inline]
    pub fn set_payload_len(&mut self, value: u16) {
        NetworkEndian::write_u16(&mut self.buf.as_mut()[4..6], value);
    }

    #[inline]
    pub fn try_set_payload_len(&mut self, value: usize) -> Result<()> {
        check_range("payload_len", value as u64, u16::MAX as u64)?;
        self.set_payload_len(value as u16);
        Ok(())
    }

    #[inline]
    pub fn set_next_header(&mut self, value: NextHeader) {
        self.buf.as_mut()[6] = u8::from(value);
    }

    #[inline]
    pub fn set_hop_limit(&mut self, value: u8) {
        self.buf.as_mut()[7] = value;
    }

    #[inline]
    pub fn set_src_addr(&mut self, value: &Ipv6Address) {
        self.buf.as_mut()[8..24].copy_from_slice(value.as_bytes());
    }

    #[inline]
    pub fn set_dst_addr(&mut self, value: &Ipv6Address) {
        self.buf.as_mut()[24..40].copy_from_slice(value.as_bytes());
    }

    /// Set the source address from text or from a typed address.
    pub fn set_src<A: Into<AddrSpec>>(&mut self, value: A) -> Result<()> {
        let addr = value.into().resolve()?;
        self.set_src_addr(&addr);
        Ok(())
    }

    /// Set the destination address from text or from a typed address.
    pub fn set_dst<A: Into<AddrSpec>>(&mut self, value: A) -> Result<()> {
        let addr = value.into().resolve()?;
        self.set_dst_addr(&addr);
        Ok(())
    }

    /// Write every field, taking the default for those left unset in `opts`.
    ///
    /// Both addresses are resolved before anything is written, so a parse
    /// error leaves the header untouched.
    pub fn fill(&mut self, opts: &Ipv6Options) -> Result<()> {
        let src = match &opts.src_addr {
            Some(spec) => spec.resolve()?,
            None => DEFAULT_SRC,
        };
        let dst = match &opts.dst_addr {
            Some(spec) => spec.resolve()?,
            None => DEFAULT_DST,
        };

        self.set_version(opts.version.unwrap_or(DEFAULT_VERSION));
        self.set_traffic_class(opts.traffic_class.unwrap_or(DEFAULT_TRAFFIC_CLASS));
        self.set_flow_label(opts.flow_label.unwrap_or(DEFAULT_FLOW_LABEL));
        self.set_payload_len(opts.payload_len.unwrap_or(DEFAULT_PAYLOAD_LEN));
        self.set_next_header(opts.next_header.unwrap_or(DEFAULT_NEXT_HEADER));
        self.set_hop_limit(opts.hop_limit.unwrap_or(DEFAULT_HOP_LIMIT));
        self.set_src_addr(&src);
        self.set_dst_addr(&dst);

        debug!("filled ipv6 header {} > {}", src, dst);
        Ok(())
    }
}

fn check_range(field: &'static str, value: u64, max: u64) -> Result<()> {
    if value > max {
        return Err(Error::Range(field, value, max));
    }
    Ok(())
}

impl<T: AsRef<[u8]>> fmt::Display for Ipv6Header<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nh = self.next_header();
        write!(
            f,
            "IP6 {} > {} ver {} tc {} fl {} len {} next {}({}) ttl {}",
            self.src_addr(),
            self.dst_addr(),
            self.version(),
            self.traffic_class(),
            self.flow_label(),
            self.payload_len(),
            nh.raw(),
            nh.name(),
            self.hop_limit()
        )
    }
}
