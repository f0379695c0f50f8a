use byteorder::{BigEndian, ByteOrder};
use log::trace;

use super::{Error, Header, Name, Packet, Question, RRData, ResourceRecord, Type};

/// Size of TYPE, CLASS, TTL and RDLENGTH together
const RR_FIXED_LEN: usize = 10;
/// A root owner name followed by the fixed fields
const MIN_RR_LEN: usize = 1 + RR_FIXED_LEN;

impl Packet {
    /// Parse a full DNS packet and return the structure
    ///
    /// Records are read one after another until the datagram is exhausted.
    /// NS and SOA go to `nameservers`; A, AAAA and CNAME go to `answers`
    /// until the header's answer count is reached and to `additional` after
    /// that. Records of any other type are parsed only to step over them.
    pub fn parse(data: &[u8]) -> Result<Packet, Error> {
        let header = Header::parse(data)?;
        let mut offset = Header::SIZE;

        let mut question = None;
        for _ in 0..header.questions {
            let (qname, name_len) = Name::scan(data, offset)?;
            offset += name_len;
            if data.len() < offset + 4 {
                return Err(Error::UnexpectedEOF);
            }
            let qtype = BigEndian::read_u16(&data[offset..offset + 2]);
            let qclass = BigEndian::read_u16(&data[offset + 2..offset + 4]);
            offset += 4;
            if question.is_none() {
                question = Some(Question {
                    qname,
                    qtype,
                    qclass,
                });
            }
        }

        let mut remaining_answers = header.answers;
        // counts are untrusted, so reservations are bounded by what can fit
        let fits = |count: u16| (count as usize).min(data.len() / MIN_RR_LEN);
        let mut answers = Vec::with_capacity(fits(header.answers));
        let mut nameservers = Vec::with_capacity(fits(header.nameservers));
        let mut additional = Vec::with_capacity(fits(header.additional));
        while offset < data.len() {
            let record = parse_record(data, offset)?;
            offset += record.consumed_len();
            match record.typ {
                Type::NS | Type::SOA => nameservers.push(record),
                Type::A | Type::AAAA | Type::CNAME if remaining_answers > 0 => {
                    remaining_answers -= 1;
                    answers.push(record);
                }
                Type::A | Type::AAAA | Type::CNAME => additional.push(record),
                Type::Unknown(code) => {
                    trace!("skipping record {} of type {}", record.name, code);
                }
            }
        }

        Ok(Packet {
            header,
            question,
            answers,
            nameservers,
            additional,
        })
    }
}

fn parse_record(data: &[u8], offset: usize) -> Result<ResourceRecord, Error> {
    let (name, name_len) = Name::scan(data, offset)?;
    let fixed = offset + name_len;
    if data.len() < fixed + RR_FIXED_LEN {
        return Err(Error::UnexpectedEOF);
    }
    let typ = Type::from(BigEndian::read_u16(&data[fixed..fixed + 2]));
    let cls = BigEndian::read_u16(&data[fixed + 2..fixed + 4]);
    let ttl = BigEndian::read_u32(&data[fixed + 4..fixed + 8]);
    let rdlength = BigEndian::read_u16(&data[fixed + 8..fixed + 10]);
    let rdata_offset = fixed + RR_FIXED_LEN;
    if data.len() < rdata_offset + rdlength as usize {
        return Err(Error::UnexpectedEOF);
    }
    let rdata = RRData::parse(typ, data, rdata_offset, rdlength as usize)?;

    Ok(ResourceRecord {
        name,
        typ,
        cls,
        ttl,
        rdlength,
        offset,
        rdata_offset,
        data: rdata,
        is_answer: false,
    })
}
