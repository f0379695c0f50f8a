use std::fmt;
use std::io;
use std::net::{Ipv4Addr, Ipv6Addr};

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::{Error, Name, Type};

/// Placeholder shown for SOA data, which is never decoded
pub const SOA_PLACEHOLDER: &str = "----";

/// The enumeration that represents known types of DNS resource records data
#[derive(Debug, Clone, PartialEq)]
pub enum RRData {
    A(Ipv4Addr),
    AAAA(Ipv6Addr),
    NS(Name),
    CNAME(Name),
    /// Start of authority; only its presence matters
    SOA,
    // Anything that is skipped rather than parsed
    Unknown { typ: Type },
}

impl RRData {
    pub fn typ(&self) -> Type {
        match *self {
            RRData::A(..) => Type::A,
            RRData::AAAA(..) => Type::AAAA,
            RRData::NS(..) => Type::NS,
            RRData::CNAME(..) => Type::CNAME,
            RRData::SOA => Type::SOA,
            RRData::Unknown { typ } => typ,
        }
    }

    /// Decode the RDATA found at `offset..offset + len` in `original`
    ///
    /// Names inside RDATA may point anywhere earlier in the packet, but must
    /// end within the declared length.
    pub fn parse(typ: Type, original: &[u8], offset: usize, len: usize) -> Result<RRData, Error> {
        let rdata = original
            .get(offset..offset + len)
            .ok_or(Error::UnexpectedEOF)?;
        match typ {
            Type::A => {
                if rdata.len() != 4 {
                    return Err(Error::WrongRdataLength);
                }
                Ok(RRData::A(Ipv4Addr::from(BigEndian::read_u32(rdata))))
            }
            Type::AAAA => {
                if rdata.len() != 16 {
                    return Err(Error::WrongRdataLength);
                }
                let mut segments = [0u16; 8];
                BigEndian::read_u16_into(rdata, &mut segments);
                Ok(RRData::AAAA(Ipv6Addr::from(segments)))
            }
            Type::NS => Ok(RRData::NS(RRData::scan_name(original, offset, len)?)),
            Type::CNAME => Ok(RRData::CNAME(RRData::scan_name(original, offset, len)?)),
            Type::SOA => Ok(RRData::SOA),
            typ => Ok(RRData::Unknown { typ }),
        }
    }

    fn scan_name(original: &[u8], offset: usize, len: usize) -> Result<Name, Error> {
        let (name, consumed) = Name::scan(original, offset)?;
        if consumed != len {
            return Err(Error::WrongRdataLength);
        }
        Ok(name)
    }

    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        match *self {
            RRData::A(ip) => writer.write_u32::<BigEndian>(ip.into()),
            RRData::AAAA(ip) => {
                for segment in ip.segments().iter() {
                    writer.write_u16::<BigEndian>(*segment)?;
                }
                Ok(())
            }
            RRData::NS(ref name) | RRData::CNAME(ref name) => name.write_to(writer),
            RRData::SOA => {
                // root MNAME and RNAME, zero SERIAL/REFRESH/RETRY/EXPIRE/MINIMUM
                Name::root().write_to(writer)?;
                Name::root().write_to(writer)?;
                writer.write_all(&[0u8; 20])
            }
            RRData::Unknown { .. } => Ok(()),
        }
    }
}

impl fmt::Display for RRData {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            RRData::A(ip) => write!(f, "{}", ip),
            RRData::AAAA(ip) => {
                // all eight groups, no zero-run shortening
                for (i, segment) in ip.segments().iter().enumerate() {
                    if i != 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{:x}", segment)?;
                }
                Ok(())
            }
            RRData::NS(ref name) | RRData::CNAME(ref name) => write!(f, "{}", name),
            RRData::SOA => f.write_str(SOA_PLACEHOLDER),
            RRData::Unknown { .. } => Ok(()),
        }
    }
}
