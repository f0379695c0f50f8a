use super::{Header, Name, QueryClass, QueryType, RRData, Type};

/// Parsed DNS packet
///
/// Records are sorted into sections while parsing; see `Packet::parse`.
#[derive(Debug)]
pub struct Packet {
    pub header: Header,
    pub question: Option<Question>,
    pub answers: Vec<ResourceRecord>,
    pub nameservers: Vec<ResourceRecord>,
    pub additional: Vec<ResourceRecord>,
}

/// A parsed chunk of data in the Query section of the packet
#[derive(Debug, Clone, PartialEq)]
pub struct Question {
    pub qname: Name,
    pub qtype: u16,
    pub qclass: u16,
}

impl Question {
    pub fn is_a_in(&self) -> bool {
        self.qtype == QueryType::A as u16 && self.qclass == QueryClass::IN as u16
    }
}

/// A single DNS record
///
/// `offset` is where the owner name starts and `rdata_offset` is the first
/// byte after the RDLENGTH field; both are positions in the datagram the
/// record was read from.
#[derive(Debug, Clone)]
pub struct ResourceRecord {
    pub name: Name,
    pub typ: Type,
    pub cls: u16,
    pub ttl: u32,
    pub rdlength: u16,
    pub offset: usize,
    pub rdata_offset: usize,
    pub data: RRData,
    /// Set once the resolver picks this record as the answer it acts on
    pub is_answer: bool,
}

impl ResourceRecord {
    /// Bytes this record occupies on the wire, name included
    pub fn consumed_len(&self) -> usize {
        self.rdata_offset + self.rdlength as usize - self.offset
    }
}
