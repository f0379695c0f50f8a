use std::fmt;
use std::hash;
use std::io;
use std::str::from_utf8;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::Error;

const POINTER_MASK: u8 = 0b1100_0000;
const MAX_LABEL: usize = 63;
const MAX_NAME: usize = 255;

/// A domain name, dot-joined and without the trailing root dot
///
/// Names decoded from a packet own their text, so a `Name` never borrows
/// the datagram it came from. Comparison and hashing ignore ASCII case.
#[derive(Debug, Clone, Default)]
pub struct Name(String);

impl Name {
    /// Decompress the name starting at `start` in `original`
    ///
    /// Returns the name together with the number of bytes it occupies at
    /// `start` (a compression pointer counts as two bytes no matter how long
    /// the name it refers to is).
    ///
    /// Every pointer must target an offset strictly before the previous hop
    /// (the pointer's own position for the first one), so the visited offsets
    /// decrease on each jump and the walk ends after at most
    /// `original.len()` jumps.
    pub fn scan(original: &[u8], start: usize) -> Result<(Name, usize), Error> {
        let mut name = String::new();
        let mut pos = start;
        let mut limit = usize::MAX;
        let mut consumed = None;
        loop {
            let byte = *original.get(pos).ok_or(Error::UnexpectedEOF)?;
            if byte == 0 {
                let consumed = consumed.unwrap_or_else(|| pos + 1 - start);
                return Ok((Name(name), consumed));
            } else if byte & POINTER_MASK == POINTER_MASK {
                if original.len() < pos + 2 {
                    return Err(Error::UnexpectedEOF);
                }
                let target = (BigEndian::read_u16(&original[pos..pos + 2])
                    & !0b1100_0000_0000_0000) as usize;
                if target >= limit.min(pos) {
                    return Err(Error::BadPointer { at: pos, target });
                }
                if consumed.is_none() {
                    consumed = Some(pos + 2 - start);
                }
                limit = target;
                pos = target;
            } else if byte & POINTER_MASK == 0 {
                let end = pos + 1 + byte as usize;
                if end > original.len() {
                    return Err(Error::UnexpectedEOF);
                }
                let label =
                    from_utf8(&original[pos + 1..end]).map_err(|_| Error::LabelIsNotAscii)?;
                if !name.is_empty() {
                    name.push('.');
                }
                name.push_str(label);
                if name.len() > MAX_NAME {
                    return Err(Error::NameTooLong);
                }
                pos = end;
            } else {
                return Err(Error::UnknownLabelFormat);
            }
        }
    }

    /// Validate a name for use in an outgoing question
    ///
    /// A single trailing dot is accepted and dropped.
    pub fn from_str<T: Into<String>>(name: T) -> Result<Name, Error> {
        let mut name = name.into();
        if name.ends_with('.') {
            name.pop();
        }
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        for label in name.split('.') {
            if label.is_empty() {
                return Err(Error::EmptyLabel);
            }
            if label.len() > MAX_LABEL {
                return Err(Error::LabelTooLong(label.len()));
            }
        }
        if name.len() > MAX_NAME {
            return Err(Error::NameTooLong);
        }
        Ok(Name(name))
    }

    /// The root name, written as a single zero byte
    pub fn root() -> Name {
        Name(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Write the name as uncompressed length-prefixed labels
    pub fn write_to<T: io::Write>(&self, writer: &mut T) -> io::Result<()> {
        if !self.0.is_empty() {
            for part in self.0.split('.') {
                writer.write_u8(part.len() as u8)?;
                writer.write_all(part.as_bytes())?;
            }
        }
        writer.write_u8(0)
    }
}

impl fmt::Display for Name {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(&self.0)
    }
}

impl hash::Hash for Name {
    fn hash<H>(&self, state: &mut H)
    where
        H: hash::Hasher,
    {
        for byte in self.0.bytes() {
            state.write_u8(byte.to_ascii_lowercase());
        }
    }
}

impl PartialEq for Name {
    fn eq(&self, other: &Name) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl Eq for Name {}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.0.eq_ignore_ascii_case(other.strip_suffix('.').unwrap_or(other))
    }
}
