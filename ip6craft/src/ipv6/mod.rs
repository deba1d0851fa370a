//! IPv6 protocol.

mod addr;
pub use addr::{AddrSpec, Ipv6Address};

mod header;
pub use header::{
    Ipv6Field, Ipv6Header, Ipv6Options, DEFAULT_DST, DEFAULT_FLOW_LABEL, DEFAULT_HOP_LIMIT,
    DEFAULT_NEXT_HEADER, DEFAULT_PAYLOAD_LEN, DEFAULT_SRC, DEFAULT_TRAFFIC_CLASS,
    DEFAULT_VERSION, IPV6_HEADER_LEN, IPV6_HEADER_TEMPLATE,
};

enum_sim! {
    /// An enum-like type for the protocol or extension header that follows
    /// an IPv6 header.
    pub struct NextHeader (u8) {
        /// Hop-by-hop options extension header.
        HOPOPT = 0,

        /// The payload is TCP.
        TCP = 0x06,

        /// The payload is UDP.
        UDP = 0x11,

        /// Routing extension header.
        IPV6_ROUTE = 43,

        /// Fragment extension header.
        IPV6_FRAG = 44,

        /// The payload is ICMPv6.
        ICMP = 0x3a,

        /// No next header.
        IPV6_NO_NXT = 59,

        /// Destination options extension header.
        IPV6_OPTS = 60,
    }
}

static NEXT_HEADER_NAMES: [(NextHeader, &str); 3] = [
    (NextHeader::TCP, "TCP"),
    (NextHeader::UDP, "UDP"),
    (NextHeader::ICMP, "ICMP"),
];

impl NextHeader {
    /// The display name of the code, `"unknown"` for codes without one.
    pub fn name(&self) -> &'static str {
        NEXT_HEADER_NAMES
            .iter()
            .find(|(code, _)| code == self)
            .map(|(_, name)| *name)
            .unwrap_or("unknown")
    }
}
