//! Wire codec for the subset of RFC 1035 an iterative A lookup needs

mod builder;
mod enums;
mod error;
mod header;
mod name;
mod parser;
mod rrdata;
mod structs;

pub use self::builder::{encode_query, Additional, Answers, Builder, Nameservers, Questions};
pub use self::enums::{Opcode, QueryClass, QueryType, ResponseCode, Type};
pub use self::error::Error;
pub use self::header::Header;
pub use self::name::Name;
pub use self::rrdata::{RRData, SOA_PLACEHOLDER};
pub use self::structs::{Packet, Question, ResourceRecord};
