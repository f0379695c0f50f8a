//! Iterative DNS resolution
//!
//! Starting from a reference name server, an A lookup is resolved by asking
//! servers directly and following their referrals, without recursion from
//! anyone else. `Resolver` drives the `fsm::Resolution` state machine over a
//! `Transport`; `dns_parser` holds the wire codec.

pub mod config;
pub mod dns_parser;
pub mod fsm;
pub mod outcome;
pub mod resolver;
pub mod trace;
pub mod transport;

#[cfg(test)]
mod fixtures;

pub use crate::config::ResolverConfig;
pub use crate::outcome::{Outcome, ResultLine};
pub use crate::resolver::Resolver;
pub use crate::transport::{Transport, UdpTransport};

pub const DNS_PORT: u16 = 53;

/// Largest datagram the transport will accept
pub const MAX_DATAGRAM: usize = 65535;
