use std::fmt;
use std::net::IpAddr;

use crate::dns_parser::RRData;

/// How a resolution run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Resolved { ttl: u32, address: IpAddr },
    NameError,
    ServerError,
    TimedOut,
    /// Authority held only an SOA, so there was nowhere left to ask
    AuthoritativeNegative,
}

impl Outcome {
    /// Sentinel printed in place of the TTL for failed lookups
    pub fn code(&self) -> Option<i32> {
        match *self {
            Outcome::Resolved { .. } => None,
            Outcome::NameError | Outcome::ServerError => Some(-1),
            Outcome::TimedOut => Some(-3),
            Outcome::AuthoritativeNegative => Some(-4),
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(*self, Outcome::Resolved { .. })
    }
}

/// The single line printed for a lookup: `<fqdn> <ttl|code> <address>`
pub struct ResultLine<'a> {
    pub fqdn: &'a str,
    pub outcome: Outcome,
}

impl<'a> fmt::Display for ResultLine<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.outcome {
            Outcome::Resolved { ttl, address } => {
                let data = match address {
                    IpAddr::V4(ip) => RRData::A(ip),
                    IpAddr::V6(ip) => RRData::AAAA(ip),
                };
                write!(f, "{} {} {}", self.fqdn, ttl, data)
            }
            failed => write!(
                f,
                "{} {} 0.0.0.0",
                self.fqdn,
                failed.code().unwrap_or(-1)
            ),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn line(fqdn: &str, outcome: Outcome) -> String {
        ResultLine { fqdn, outcome }.to_string()
    }

    #[test]
    fn sentinel_lines() {
        assert_eq!(
            line("nosuchname.example.com", Outcome::NameError),
            "nosuchname.example.com -1 0.0.0.0"
        );
        assert_eq!(line("a.example", Outcome::ServerError), "a.example -1 0.0.0.0");
        assert_eq!(line("a.example", Outcome::TimedOut), "a.example -3 0.0.0.0");
        assert_eq!(
            line("a.example", Outcome::AuthoritativeNegative),
            "a.example -4 0.0.0.0"
        );
    }

    #[test]
    fn resolved_lines() {
        let outcome = Outcome::Resolved {
            ttl: 172800,
            address: Ipv4Addr::new(93, 184, 216, 34).into(),
        };
        assert_eq!(
            line("www.example.com", outcome),
            "www.example.com 172800 93.184.216.34"
        );
        assert!(outcome.is_resolved());
        assert_eq!(outcome.code(), None);

        let outcome = Outcome::Resolved {
            ttl: 5,
            address: Ipv6Addr::new(0x2001, 0xdb8, 0, 0, 0, 0, 0, 1).into(),
        };
        assert_eq!(line("v6.example", outcome), "v6.example 5 2001:db8:0:0:0:0:0:1");
    }
}
