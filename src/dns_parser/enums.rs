use std::fmt;

/// The TYPE value of a resource record
///
/// Only the types an A lookup needs to follow are decoded; everything else
/// keeps its numeric code so the record can still be skipped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    A,
    NS,
    CNAME,
    SOA,
    AAAA,
    Unknown(u16),
}

impl Type {
    pub fn code(self) -> u16 {
        match self {
            Type::A => 1,
            Type::NS => 2,
            Type::CNAME => 5,
            Type::SOA => 6,
            Type::AAAA => 28,
            Type::Unknown(code) => code,
        }
    }
}

impl From<u16> for Type {
    fn from(code: u16) -> Type {
        match code {
            1 => Type::A,
            2 => Type::NS,
            5 => Type::CNAME,
            6 => Type::SOA,
            28 => Type::AAAA,
            code => Type::Unknown(code),
        }
    }
}

/// Mnemonics as printed in trace dumps
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Type::A => f.write_str("A"),
            Type::NS => f.write_str("NS"),
            Type::CNAME => f.write_str("CN"),
            Type::SOA => f.write_str("6"),
            Type::AAAA => f.write_str("AAAA"),
            Type::Unknown(code) => write!(f, "{}", code),
        }
    }
}

/// The QTYPE value of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum QueryType {
    A = 1,
}

/// The QCLASS value of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u16)]
pub enum QueryClass {
    IN = 1,
}

/// The OPCODE field of the header
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Opcode {
    StandardQuery,
    InverseQuery,
    ServerStatusRequest,
    Reserved(u8),
}

impl From<u8> for Opcode {
    fn from(code: u8) -> Opcode {
        match code {
            0 => Opcode::StandardQuery,
            1 => Opcode::InverseQuery,
            2 => Opcode::ServerStatusRequest,
            code => Opcode::Reserved(code),
        }
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        match op {
            Opcode::StandardQuery => 0,
            Opcode::InverseQuery => 1,
            Opcode::ServerStatusRequest => 2,
            Opcode::Reserved(code) => code,
        }
    }
}

/// The RCODE field of the header
///
/// Only `NoError` and `NameError` drive resolution; any other value is a
/// generic server failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseCode {
    NoError,
    FormatError,
    ServerFailure,
    NameError,
    NotImplemented,
    Refused,
    Reserved(u8),
}

impl From<u8> for ResponseCode {
    fn from(code: u8) -> ResponseCode {
        match code & 0x0F {
            0 => ResponseCode::NoError,
            1 => ResponseCode::FormatError,
            2 => ResponseCode::ServerFailure,
            3 => ResponseCode::NameError,
            4 => ResponseCode::NotImplemented,
            5 => ResponseCode::Refused,
            code => ResponseCode::Reserved(code),
        }
    }
}

impl From<ResponseCode> for u8 {
    fn from(rc: ResponseCode) -> u8 {
        match rc {
            ResponseCode::NoError => 0,
            ResponseCode::FormatError => 1,
            ResponseCode::ServerFailure => 2,
            ResponseCode::NameError => 3,
            ResponseCode::NotImplemented => 4,
            ResponseCode::Refused => 5,
            ResponseCode::Reserved(code) => code & 0x0F,
        }
    }
}
