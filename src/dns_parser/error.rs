use std::io;

use thiserror::Error;

/// Error parsing or building a DNS packet
#[derive(Debug, Error)]
pub enum Error {
    #[error("packet is smaller than header size")]
    HeaderTooShort,
    #[error("packet is has incomplete data")]
    UnexpectedEOF,
    #[error("wrong (too short or too long) size of RDATA")]
    WrongRdataLength,
    #[error("label in domain name has unknown label format")]
    UnknownLabelFormat,
    #[error("compression pointer at {at} targets {target}, which is not before it")]
    BadPointer { at: usize, target: usize },
    #[error("domain name is longer than 255 bytes")]
    NameTooLong,
    #[error("label of {0} bytes exceeds the 63 byte limit")]
    LabelTooLong(usize),
    #[error("domain name is empty")]
    EmptyName,
    #[error("domain name contains an empty label")]
    EmptyLabel,
    #[error("invalid characters encountered while reading label")]
    LabelIsNotAscii,
    #[error("section counter overflowed")]
    TooManyRecords,
    #[error("failed to write packet: {0}")]
    Io(#[from] io::Error),
}
