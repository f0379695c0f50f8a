use std::fmt;
use std::io::{self, Write};

use crate::dns_parser::{Packet, ResourceRecord};
use crate::fsm::Query;

/// Hooks called by the resolver around every exchange
pub trait Observer {
    fn on_query(&mut self, _id: u16, _query: &Query, _attempt: u32) {}
    fn on_response(&mut self, _packet: &Packet) {}
    fn on_attempt_failed(&mut self, _id: u16, _query: &Query, _reason: &str) {}
}

/// Prints every query and a dump of every response
pub struct Tracer<W: Write> {
    out: W,
}

impl Tracer<io::Stdout> {
    pub fn stdout() -> Tracer<io::Stdout> {
        Tracer { out: io::stdout() }
    }
}

impl<W: Write> Tracer<W> {
    pub fn new(out: W) -> Tracer<W> {
        Tracer { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Observer for Tracer<W> {
    fn on_query(&mut self, id: u16, query: &Query, attempt: u32) {
        let retry = if attempt > 1 {
            format!(" (attempt {})", attempt)
        } else {
            String::new()
        };
        // trace output is best effort
        let _ = write!(
            self.out,
            "\n\nQuery ID     {} {} --> {}{}\n",
            id, query.name, query.server, retry
        );
    }

    fn on_response(&mut self, packet: &Packet) {
        let _ = write!(self.out, "{}", PacketDump(packet));
    }

    fn on_attempt_failed(&mut self, id: u16, query: &Query, reason: &str) {
        let _ = writeln!(
            self.out,
            "Query ID     {} {} --> {} failed: {}",
            id, query.name, query.server, reason
        );
    }
}

/// Human readable listing of a response's classified sections
pub struct PacketDump<'a>(pub &'a Packet);

impl<'a> PacketDump<'a> {
    fn section(
        f: &mut fmt::Formatter,
        title: &str,
        count: u16,
        records: &[ResourceRecord],
    ) -> fmt::Result {
        writeln!(f, "  {} ({})", title, count)?;
        for rr in records {
            write!(
                f,
                "       {:<30} {:<10} {:<4} {}",
                rr.name.as_str(),
                rr.ttl,
                rr.typ.to_string(),
                rr.data
            )?;
            if rr.is_answer {
                f.write_str(" *")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a> fmt::Display for PacketDump<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let packet = self.0;
        writeln!(
            f,
            "Response ID: {} Authoritative {}",
            packet.header.id, packet.header.authoritative
        )?;
        PacketDump::section(f, "Answers", packet.header.answers, &packet.answers)?;
        PacketDump::section(f, "Nameservers", packet.header.nameservers, &packet.nameservers)?;
        PacketDump::section(
            f,
            "Additional Information",
            packet.header.additional,
            &packet.additional,
        )
    }
}
