mod common;

use common::*;

use bytes::BufMut;
use pnet::packet::ethernet::{EtherTypes, EthernetPacket};
use pnet::packet::ipv6::Ipv6Packet;
use pnet::packet::Packet;

use ip6craft::ether::*;
use ip6craft::field::FieldValue;
use ip6craft::frame::FRAME_HEADER_LEN;
use ip6craft::ipv6::*;
use ip6craft::{Error, FrameOptions, Ipv6Frame};

#[test]
fn fill_derives_payload_len() {
    let mut frame = Ipv6Frame::zeroed(100).unwrap();
    frame
        .fill(&FrameOptions {
            total_len: Some(100),
            ..Default::default()
        })
        .unwrap();

    assert_eq!(frame.ipv6_header().payload_len(), 46);
    assert_eq!(frame.ether_header().ethertype(), EtherType::IPV6);
    assert_eq!(frame.payload().len(), 46);
}

#[test]
fn explicit_payload_len_wins() {
    let mut frame = Ipv6Frame::zeroed(100).unwrap();
    frame
        .fill(&FrameOptions {
            total_len: Some(100),
            ipv6: Ipv6Options {
                payload_len: Some(20),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
    assert_eq!(frame.ipv6_header().payload_len(), 20);
    assert_eq!(frame.payload().len(), 20);
}

#[test]
fn fill_without_total_len_uses_default() {
    let mut frame = Ipv6Frame::parse([0u8; 64]).unwrap();
    frame.fill(&FrameOptions::default()).unwrap();
    assert_eq!(frame.ipv6_header().payload_len(), DEFAULT_PAYLOAD_LEN);
    assert_eq!(frame.ipv6_header().header_slice(), &IPV6_HEADER_TEMPLATE[..]);
}

#[test]
fn explicit_ethertype_wins() {
    let mut frame = Ipv6Frame::zeroed(60).unwrap();
    frame
        .fill(&FrameOptions {
            ether: EtherOptions {
                ethertype: Some(EtherType::IPV4),
                ..Default::default()
            },
            ..Default::default()
        })
        .unwrap();
    assert_eq!(frame.ether_header().ethertype(), EtherType::IPV4);
}

#[test]
fn fill_errors() {
    let mut frame = Ipv6Frame::parse([0u8; 60]).unwrap();
    assert_eq!(
        frame.fill(&FrameOptions {
            total_len: Some(40),
            ..Default::default()
        }),
        Err(Error::FrameTooShort(40, FRAME_HEADER_LEN))
    );

    let res = frame.fill(&FrameOptions {
        ipv6: Ipv6Options {
            src_addr: Some("fe80::1::2".into()),
            ..Default::default()
        },
        ..Default::default()
    });
    assert_eq!(res, Err(Error::Parse("fe80::1::2".to_string())));
}

#[test]
fn bad_address_writes_nothing() {
    let mut frame = Ipv6Frame::zeroed(60).unwrap();
    let res = frame.fill(&FrameOptions {
        total_len: Some(60),
        ipv6: Ipv6Options {
            dst_addr: Some("2001:db8::x".into()),
            ..Default::default()
        },
        ..Default::default()
    });
    assert_eq!(res, Err(Error::Parse("2001:db8::x".to_string())));
    assert!(frame.buf().iter().all(|b| *b == 0));
}

#[test]
fn build_udp_frame() {
    let pkt = file_to_packet("ipv6_udp.dat");

    let mut frame = Ipv6Frame::zeroed(pkt.len()).unwrap();
    frame
        .fill(&FrameOptions {
            total_len: Some(pkt.len()),
            ether: EtherOptions {
                dst_addr: Some("00:1b:21:3a:4f:10".parse().unwrap()),
                src_addr: Some("52:54:00:12:34:56".parse().unwrap()),
                ..Default::default()
            },
            ipv6: Ipv6Options {
                traffic_class: Some(0x2a),
                flow_label: Some(0xabcde),
                src_addr: Some("2001:db8::1".into()),
                dst_addr: Some(AddrSpec::Addr("2001:db8::2".parse().unwrap())),
                ..Default::default()
            },
        })
        .unwrap();

    let mut buf = frame.release();
    let mut payload = &mut buf[FRAME_HEADER_LEN..];
    payload.put_slice(&pkt[FRAME_HEADER_LEN..]);

    assert_eq!(&buf[..], &pkt[..]);
}

#[test]
fn parse_udp_frame() {
    let pkt = file_to_packet("ipv6_udp.dat");
    let frame = Ipv6Frame::parse(&pkt[..]).unwrap();

    let fields = frame.fields();
    assert_eq!(fields.len(), 11);
    assert_eq!(fields["dst_mac"].as_text(), Some("00:1b:21:3a:4f:10"));
    assert_eq!(fields["src_mac"].as_text(), Some("52:54:00:12:34:56"));
    assert_eq!(fields["ethertype"], FieldValue::Num(0x86dd));
    assert_eq!(fields["traffic_class"], FieldValue::Num(0x2a));
    assert_eq!(fields["flow_label"], FieldValue::Num(0xabcde));
    assert_eq!(fields["payload_len"], FieldValue::Num(16));
    assert_eq!(
        fields["src_addr"].as_text(),
        Some("2001:0db8:0000:0000:0000:0000:0000:0001")
    );
    assert_eq!(&frame.payload()[8..], b"ip6craft");

    let eth = EthernetPacket::new(&pkt[..]).unwrap();
    assert_eq!(eth.get_ethertype(), EtherTypes::Ipv6);
    let ipv6 = Ipv6Packet::new(eth.payload()).unwrap();
    assert_eq!(ipv6.get_flow_label(), frame.ipv6_header().flow_label());
    assert_eq!(ipv6.payload(), frame.payload());
}

#[test]
fn payload_cut_at_payload_len() {
    let mut pkt = file_to_packet("ipv6_icmp_echo.dat");
    pkt.extend_from_slice(&[0xee; 10]);
    let frame = Ipv6Frame::parse(&pkt[..]).unwrap();
    assert_eq!(frame.payload(), &[0x80u8, 0, 0, 0, 0, 1, 0, 1]);
}

#[test]
fn dump_marks_headers() {
    let pkt = file_to_packet("ipv6_icmp_echo.dat");
    let frame = Ipv6Frame::parse(&pkt[..]).unwrap();

    let text = frame.dump(pkt.len());
    let labels: Vec<&str> = text.lines().filter(|line| line.contains('[')).collect();
    assert_eq!(labels, vec!["ether [0..14)", "ipv6 [14..54)", "payload [54..62)"]);
    assert!(text.starts_with(
        "ether [0..14)\n0000  33 33 00 00 00 01 52 54 00 12 34 56 86 dd\n"
    ));
    assert!(text.ends_with("0036  80 00 00 00 00 01 00 01\n"));

    assert_eq!(frame.dump(16).lines().last(), Some("000e  60 00"));
}
