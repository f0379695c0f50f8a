//! Canned responses for tests, built with the crate's own `Builder`

use std::net::Ipv4Addr;

use crate::dns_parser::{
    Builder, Name, Packet, QueryClass as QC, QueryType as QT, RRData, ResponseCode,
};

pub fn name(s: &str) -> Name {
    Name::from_str(s.to_string()).unwrap()
}

pub fn parse(bytes: &[u8]) -> Packet {
    Packet::parse(bytes).unwrap()
}

pub fn answer(id: u16, qname: &str, owner: &str, ttl: u32, ip: Ipv4Addr) -> Vec<u8> {
    Builder::new_response(id, false, true)
        .add_question(&name(qname), QT::A, QC::IN)
        .unwrap()
        .add_answer(&name(owner), QC::IN, ttl, &RRData::A(ip))
        .unwrap()
        .build()
        .unwrap()
}

pub fn cname(id: u16, qname: &str, target: &str) -> Vec<u8> {
    Builder::new_response(id, false, true)
        .add_question(&name(qname), QT::A, QC::IN)
        .unwrap()
        .add_answer(&name(qname), QC::IN, 300, &RRData::CNAME(name(target)))
        .unwrap()
        .build()
        .unwrap()
}

pub fn referral(id: u16, qname: &str, zone: &str, ns: &str, glue: Option<Ipv4Addr>) -> Vec<u8> {
    let builder = Builder::new_response(id, false, false)
        .add_question(&name(qname), QT::A, QC::IN)
        .unwrap()
        .add_nameserver(&name(zone), QC::IN, 172800, &RRData::NS(name(ns)))
        .unwrap();
    match glue {
        Some(ip) => builder
            .add_additional(&name(ns), QC::IN, 172800, &RRData::A(ip))
            .unwrap()
            .build()
            .unwrap(),
        None => builder.build().unwrap(),
    }
}

pub fn soa_only(id: u16, qname: &str, zone: &str) -> Vec<u8> {
    Builder::new_response(id, false, true)
        .add_question(&name(qname), QT::A, QC::IN)
        .unwrap()
        .add_nameserver(&name(zone), QC::IN, 3600, &RRData::SOA)
        .unwrap()
        .build()
        .unwrap()
}

pub fn error(id: u16, qname: &str, code: ResponseCode) -> Vec<u8> {
    let mut builder = Builder::new_response(id, false, true)
        .add_question(&name(qname), QT::A, QC::IN)
        .unwrap();
    builder.set_response_code(code);
    builder.build().unwrap()
}

pub fn empty(id: u16, qname: &str) -> Vec<u8> {
    Builder::new_response(id, false, true)
        .add_question(&name(qname), QT::A, QC::IN)
        .unwrap()
        .build()
        .unwrap()
}
