use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};

use super::{Error, Header, Name, Opcode, QueryClass, QueryType, RRData, ResponseCode};

pub enum Questions {}
pub enum Answers {}
pub enum Nameservers {}
pub enum Additional {}

pub trait MoveTo<T> {}
impl<T> MoveTo<T> for T {}

impl MoveTo<Answers> for Questions {}

impl MoveTo<Nameservers> for Questions {}
impl MoveTo<Nameservers> for Answers {}

impl MoveTo<Additional> for Questions {}
impl MoveTo<Additional> for Answers {}
impl MoveTo<Additional> for Nameservers {}

/// Allows to build a DNS packet
///
/// Sections can only be filled in wire order: questions, answers,
/// nameservers, additional. Names are always written uncompressed.
pub struct Builder<S> {
    buf: Vec<u8>,
    max_size: Option<usize>,
    _state: PhantomData<S>,
}

impl Builder<Questions> {
    /// Creates a new query
    ///
    /// Initially all sections are empty. You're expected to fill
    /// the questions section with `add_question`
    pub fn new_query(id: u16, recursion: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            id,
            query: true,
            opcode: Opcode::StandardQuery,
            authoritative: false,
            truncated: false,
            recursion_desired: recursion,
            recursion_available: false,
            reserved: 0,
            response_code: ResponseCode::NoError,
            questions: 0,
            answers: 0,
            nameservers: 0,
            additional: 0,
        })
    }

    pub fn new_response(id: u16, recursion: bool, authoritative: bool) -> Builder<Questions> {
        Builder::with_header(Header {
            id,
            query: false,
            opcode: Opcode::StandardQuery,
            authoritative,
            truncated: false,
            recursion_desired: recursion,
            recursion_available: false,
            reserved: 0,
            response_code: ResponseCode::NoError,
            questions: 0,
            answers: 0,
            nameservers: 0,
            additional: 0,
        })
    }

    fn with_header(head: Header) -> Builder<Questions> {
        let mut buf = Vec::with_capacity(512);
        buf.extend([0u8; Header::SIZE].iter());
        head.write(&mut buf[..Header::SIZE]);
        Builder {
            buf,
            max_size: Some(512),
            _state: PhantomData,
        }
    }
}

impl<T> Builder<T> {
    fn write_rr(
        &mut self,
        name: &Name,
        cls: QueryClass,
        ttl: u32,
        data: &RRData,
    ) -> Result<(), Error> {
        name.write_to(&mut self.buf)?;
        self.buf.write_u16::<BigEndian>(data.typ().code())?;
        self.buf.write_u16::<BigEndian>(cls as u16)?;
        self.buf.write_u32::<BigEndian>(ttl)?;

        let size_offset = self.buf.len();
        self.buf.write_u16::<BigEndian>(0)?;

        let data_offset = self.buf.len();
        data.write_to(&mut self.buf)?;
        let data_size = self.buf.len() - data_offset;

        BigEndian::write_u16(
            &mut self.buf[size_offset..size_offset + 2],
            data_size as u16,
        );
        Ok(())
    }

    /// Returns the final packet
    ///
    /// When packet is not truncated method returns `Ok(packet)`. If
    /// packet is truncated the method returns `Err(packet)`. In both
    /// cases the packet is fully valid.
    pub fn build(mut self) -> Result<Vec<u8>, Vec<u8>> {
        match self.max_size {
            Some(max_size) if self.buf.len() > max_size => {
                Header::set_truncated(&mut self.buf[..Header::SIZE]);
                Err(self.buf)
            }
            _ => Ok(self.buf),
        }
    }

    pub fn move_to<U>(self) -> Builder<U>
    where
        T: MoveTo<U>,
    {
        Builder {
            buf: self.buf,
            max_size: self.max_size,
            _state: PhantomData,
        }
    }

    pub fn set_response_code(&mut self, code: ResponseCode) {
        Header::set_response_code(&mut self.buf[..Header::SIZE], code);
    }
}

impl<T: MoveTo<Questions>> Builder<T> {
    /// Adds a question to the packet
    pub fn add_question(
        self,
        qname: &Name,
        qtype: QueryType,
        qclass: QueryClass,
    ) -> Result<Builder<Questions>, Error> {
        let mut builder = self.move_to::<Questions>();

        qname.write_to(&mut builder.buf)?;
        builder.buf.write_u16::<BigEndian>(qtype as u16)?;
        builder.buf.write_u16::<BigEndian>(qclass as u16)?;
        Header::inc_questions(&mut builder.buf).ok_or(Error::TooManyRecords)?;
        Ok(builder)
    }
}

impl<T: MoveTo<Answers>> Builder<T> {
    pub fn add_answer(
        self,
        name: &Name,
        cls: QueryClass,
        ttl: u32,
        data: &RRData,
    ) -> Result<Builder<Answers>, Error> {
        let mut builder = self.move_to::<Answers>();

        builder.write_rr(name, cls, ttl, data)?;
        Header::inc_answers(&mut builder.buf).ok_or(Error::TooManyRecords)?;

        Ok(builder)
    }
}

impl<T: MoveTo<Nameservers>> Builder<T> {
    pub fn add_nameserver(
        self,
        name: &Name,
        cls: QueryClass,
        ttl: u32,
        data: &RRData,
    ) -> Result<Builder<Nameservers>, Error> {
        let mut builder = self.move_to::<Nameservers>();

        builder.write_rr(name, cls, ttl, data)?;
        Header::inc_nameservers(&mut builder.buf).ok_or(Error::TooManyRecords)?;

        Ok(builder)
    }
}

impl<T: MoveTo<Additional>> Builder<T> {
    pub fn add_additional(
        self,
        name: &Name,
        cls: QueryClass,
        ttl: u32,
        data: &RRData,
    ) -> Result<Builder<Additional>, Error> {
        let mut builder = self.move_to::<Additional>();

        builder.write_rr(name, cls, ttl, data)?;
        Header::inc_additional(&mut builder.buf).ok_or(Error::TooManyRecords)?;

        Ok(builder)
    }
}

/// Encode the non-recursive A/IN query this resolver sends
pub fn encode_query(id: u16, fqdn: &str) -> Result<Vec<u8>, Error> {
    let name = Name::from_str(fqdn)?;
    let builder =
        Builder::new_query(id, false).add_question(&name, QueryType::A, QueryClass::IN)?;
    // a single question of at most 255 bytes always fits in 512
    Ok(builder.build().unwrap_or_else(|x| x))
}
