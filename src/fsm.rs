use std::net::{IpAddr, Ipv4Addr};

use log::{debug, trace};

use crate::dns_parser::{Name, Packet, RRData, ResponseCode, Type};
use crate::outcome::Outcome;

/// A question to put to a server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    pub name: String,
    pub server: Ipv4Addr,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Ask the reference server about a name, from scratch
    Start(Query),
    AwaitingResponse(Query),
    /// Ask a delegated server about the same name
    HaveReferral(Query),
    HaveAnswer { ttl: u32, address: IpAddr },
    NameError,
    AuthoritativeNegative,
    ServerError,
    TimedOut,
}

impl State {
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match *self {
            State::HaveAnswer { ttl, address } => Some(Outcome::Resolved { ttl, address }),
            State::NameError => Some(Outcome::NameError),
            State::AuthoritativeNegative => Some(Outcome::AuthoritativeNegative),
            State::ServerError => Some(Outcome::ServerError),
            State::TimedOut => Some(Outcome::TimedOut),
            State::Start(..) | State::AwaitingResponse(..) | State::HaveReferral(..) => None,
        }
    }
}

/// Iterative resolution of one name, one response at a time
///
/// `goals` is a stack of names being resolved. The bottom entry is the name
/// whose address is wanted (replaced when a CNAME is followed); every entry
/// above it is a nameserver hostname whose address is needed before the
/// entry below can continue.
#[derive(Debug)]
pub struct Resolution {
    reference: Ipv4Addr,
    goals: Vec<String>,
    max_depth: usize,
    state: State,
}

impl Resolution {
    pub fn new(reference: Ipv4Addr, fqdn: &str, max_depth: usize) -> Resolution {
        Resolution {
            reference,
            goals: vec![fqdn.to_string()],
            max_depth,
            state: State::Start(Query {
                name: fqdn.to_string(),
                server: reference,
            }),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.state.outcome()
    }

    /// Nested nameserver lookups currently in progress
    pub fn depth(&self) -> usize {
        self.goals.len() - 1
    }

    /// The query to send next, or `None` once resolution has ended
    ///
    /// Asking again while a response is awaited returns the same query, so a
    /// driver can retransmit it.
    pub fn next_query(&mut self) -> Option<Query> {
        let query = match self.state {
            State::Start(ref query)
            | State::HaveReferral(ref query)
            | State::AwaitingResponse(ref query) => query.clone(),
            _ => return None,
        };
        self.state = State::AwaitingResponse(query.clone());
        Some(query)
    }

    /// No usable response arrived for the pending query
    pub fn on_timeout(&mut self) -> &State {
        debug!("giving up on {:?}", self.state);
        self.state = State::TimedOut;
        &self.state
    }

    /// The pending query could not be sent at all
    pub fn on_unsendable(&mut self) -> &State {
        self.state = State::ServerError;
        &self.state
    }

    /// Advance on a decoded response to the pending query
    ///
    /// The answer record acted upon, if any, is tagged with `is_answer`.
    pub fn on_response(&mut self, packet: &mut Packet) -> &State {
        let query = match self.state {
            State::AwaitingResponse(ref query) => query.clone(),
            ref other => {
                debug!("ignoring response in state {:?}", other);
                return &self.state;
            }
        };

        let next = match packet.header.response_code {
            ResponseCode::NoError => self.follow(&query, packet),
            ResponseCode::NameError => self.terminate(State::NameError),
            code => {
                debug!("{} answered {} with {:?}", query.server, query.name, code);
                self.terminate(State::ServerError)
            }
        };
        trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
        &self.state
    }

    fn follow(&mut self, query: &Query, packet: &mut Packet) -> State {
        if let Some(first) = packet.answers.first_mut() {
            first.is_answer = true;
            let owner_matches = first.name == *query.name.as_str();
            return match first.data {
                RRData::A(ip) if owner_matches => self.answered(first.ttl, IpAddr::V4(ip)),
                RRData::AAAA(ip) if owner_matches => self.answered(first.ttl, IpAddr::V6(ip)),
                RRData::CNAME(ref target) => self.restart(target),
                ref data => {
                    debug!("answer {} {} does not resolve {}", first.name, data, query.name);
                    self.terminate(State::ServerError)
                }
            };
        }

        let servers: Vec<&Name> = packet
            .nameservers
            .iter()
            .filter_map(|rr| match rr.data {
                RRData::NS(ref host) => Some(host),
                _ => None,
            })
            .collect();

        let glue = packet.additional.iter().find_map(|rr| match rr.data {
            RRData::A(ip) if servers.contains(&&rr.name) => Some(ip),
            _ => None,
        });
        if let Some(server) = glue {
            return State::HaveReferral(Query {
                name: query.name.clone(),
                server,
            });
        }

        if let Some(host) = servers.first() {
            return self.descend(host);
        }

        if packet.nameservers.iter().any(|rr| rr.typ == Type::SOA) {
            return self.terminate(State::AuthoritativeNegative);
        }

        debug!("{} gave neither answer nor referral for {}", query.server, query.name);
        self.terminate(State::ServerError)
    }

    fn answered(&mut self, ttl: u32, address: IpAddr) -> State {
        if self.goals.len() == 1 {
            return State::HaveAnswer { ttl, address };
        }
        let host = self.goals.pop().unwrap_or_default();
        match address {
            IpAddr::V4(server) => {
                debug!("nameserver {} is at {}", host, server);
                let name = self.goals.last().cloned().unwrap_or_default();
                State::HaveReferral(Query { name, server })
            }
            IpAddr::V6(ip) => {
                debug!("nameserver {} only has IPv6 address {}", host, ip);
                State::ServerError
            }
        }
    }

    fn restart(&mut self, target: &Name) -> State {
        debug!("following alias to {}", target);
        let name = target.to_string();
        if let Some(goal) = self.goals.last_mut() {
            *goal = name.clone();
        }
        State::Start(Query {
            name,
            server: self.reference,
        })
    }

    fn descend(&mut self, host: &Name) -> State {
        if self.depth() >= self.max_depth {
            debug!("too deep resolving nameserver {}", host);
            return self.terminate(State::ServerError);
        }
        if self.goals.iter().any(|goal| *host == *goal.as_str()) {
            debug!("nameserver {} is needed to resolve itself", host);
            return self.terminate(State::ServerError);
        }
        debug!("resolving nameserver {} from {}", host, self.reference);
        let name = host.to_string();
        self.goals.push(name.clone());
        State::Start(Query {
            name,
            server: self.reference,
        })
    }

    /// Failures inside a nested nameserver lookup fail the whole run
    fn terminate(&self, state: State) -> State {
        if self.goals.len() > 1 && state != State::TimedOut && state != State::ServerError {
            debug!("nameserver lookup ended in {:?}", state);
            return State::ServerError;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{self, parse};

    const ROOT: Ipv4Addr = Ipv4Addr::new(198, 41, 0, 4);
    const TLD: Ipv4Addr = Ipv4Addr::new(192, 5, 6, 30);
    const AUTH: Ipv4Addr = Ipv4Addr::new(199, 43, 135, 53);

    fn query(name: &str, server: Ipv4Addr) -> Query {
        Query {
            name: name.to_string(),
            server,
        }
    }

    fn started(name: &str) -> Resolution {
        let mut res = Resolution::new(ROOT, name, 8);
        assert_eq!(res.next_query(), Some(query(name, ROOT)));
        res
    }

    #[test]
    fn start_asks_reference_and_repeats_while_waiting() {
        let mut res = Resolution::new(ROOT, "www.example.com", 8);
        assert_eq!(res.state(), &State::Start(query("www.example.com", ROOT)));
        assert_eq!(res.next_query(), Some(query("www.example.com", ROOT)));
        assert_eq!(
            res.state(),
            &State::AwaitingResponse(query("www.example.com", ROOT))
        );
        assert_eq!(res.next_query(), Some(query("www.example.com", ROOT)));
        assert!(res.outcome().is_none());
    }

    #[test]
    fn matching_address_answer_completes() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::answer(
            1,
            "www.example.com",
            "WWW.example.com",
            172800,
            Ipv4Addr::new(93, 184, 216, 34),
        ));
        let state = res.on_response(&mut packet).clone();
        assert_eq!(
            state,
            State::HaveAnswer {
                ttl: 172800,
                address: Ipv4Addr::new(93, 184, 216, 34).into()
            }
        );
        assert!(packet.answers[0].is_answer);
        assert!(res.state().is_terminal());
        assert_eq!(res.next_query(), None);
    }

    #[test]
    fn answer_for_another_owner_is_unusable() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::answer(
            1,
            "www.example.com",
            "mail.example.com",
            60,
            Ipv4Addr::new(10, 0, 0, 1),
        ));
        assert_eq!(res.on_response(&mut packet), &State::ServerError);
    }

    #[test]
    fn rcodes_end_resolution() {
        let mut res = started("nosuchname.example.com");
        let mut packet = parse(&fixtures::error(
            1,
            "nosuchname.example.com",
            ResponseCode::NameError,
        ));
        assert_eq!(res.on_response(&mut packet), &State::NameError);
        assert_eq!(res.outcome(), Some(Outcome::NameError));

        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::error(
            1,
            "www.example.com",
            ResponseCode::Refused,
        ));
        assert_eq!(res.on_response(&mut packet), &State::ServerError);
    }

    #[test]
    fn glue_referral_keeps_name_and_switches_server() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::referral(
            1,
            "www.example.com",
            "com",
            "a.gtld-servers.net",
            Some(TLD),
        ));
        assert_eq!(
            res.on_response(&mut packet),
            &State::HaveReferral(query("www.example.com", TLD))
        );
        assert_eq!(res.next_query(), Some(query("www.example.com", TLD)));
        assert_eq!(res.depth(), 0);
    }

    #[test]
    fn address_for_unrelated_host_is_not_glue() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::referral(
            1,
            "www.example.com",
            "com",
            "a.gtld-servers.net",
            None,
        ));
        // an address for a host the authority section does not list
        packet.additional.push(
            parse(&fixtures::answer(2, "x", "other.net", 60, TLD))
                .answers
                .remove(0),
        );
        assert_eq!(
            res.on_response(&mut packet),
            &State::Start(query("a.gtld-servers.net", ROOT))
        );
    }

    #[test]
    fn referral_without_glue_resolves_nameserver_first() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::referral(
            1,
            "www.example.com",
            "example.com",
            "ns1.example.net",
            None,
        ));
        assert_eq!(
            res.on_response(&mut packet),
            &State::Start(query("ns1.example.net", ROOT))
        );
        assert_eq!(res.depth(), 1);

        assert_eq!(res.next_query(), Some(query("ns1.example.net", ROOT)));
        let mut packet = parse(&fixtures::answer(
            2,
            "ns1.example.net",
            "ns1.example.net",
            60,
            AUTH,
        ));
        assert_eq!(
            res.on_response(&mut packet),
            &State::HaveReferral(query("www.example.com", AUTH))
        );
        assert_eq!(res.depth(), 0);

        assert_eq!(res.next_query(), Some(query("www.example.com", AUTH)));
        let ip = Ipv4Addr::new(93, 184, 216, 34);
        let mut packet = parse(&fixtures::answer(
            3,
            "www.example.com",
            "www.example.com",
            300,
            ip,
        ));
        assert_eq!(
            res.on_response(&mut packet),
            &State::HaveAnswer {
                ttl: 300,
                address: ip.into()
            }
        );
    }

    #[test]
    fn failure_inside_nameserver_lookup_is_server_error() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::referral(
            1,
            "www.example.com",
            "example.com",
            "ns1.example.net",
            None,
        ));
        res.on_response(&mut packet);
        res.next_query();
        let mut packet = parse(&fixtures::error(2, "ns1.example.net", ResponseCode::NameError));
        assert_eq!(res.on_response(&mut packet), &State::ServerError);
    }

    #[test]
    fn nameserver_needed_for_itself_is_a_loop() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::referral(
            1,
            "www.example.com",
            "example.com",
            "ns.example.com",
            None,
        ));
        res.on_response(&mut packet);
        assert_eq!(res.next_query(), Some(query("ns.example.com", ROOT)));
        let mut packet = parse(&fixtures::referral(
            2,
            "ns.example.com",
            "example.com",
            "ns.example.com",
            None,
        ));
        assert_eq!(res.on_response(&mut packet), &State::ServerError);
    }

    #[test]
    fn nesting_is_bounded() {
        let mut res = Resolution::new(ROOT, "www.example.com", 2);
        for (i, host) in ["ns1.a.net", "ns1.b.net", "ns1.c.net"].iter().enumerate() {
            let name = res.next_query().unwrap().name;
            let mut packet = parse(&fixtures::referral(i as u16, &name, "net", host, None));
            let state = res.on_response(&mut packet).clone();
            if i < 2 {
                assert_eq!(state, State::Start(query(host, ROOT)));
            } else {
                assert_eq!(state, State::ServerError);
            }
        }
    }

    #[test]
    fn cname_restarts_from_reference() {
        let mut res = Resolution::new(ROOT, "www.example.com", 8);
        res.next_query();
        let mut packet = parse(&fixtures::referral(
            1,
            "www.example.com",
            "com",
            "a.gtld-servers.net",
            Some(TLD),
        ));
        res.on_response(&mut packet);
        res.next_query();
        let mut packet = parse(&fixtures::cname(2, "www.example.com", "alias.example.com"));
        assert_eq!(
            res.on_response(&mut packet),
            &State::Start(query("alias.example.com", ROOT))
        );
        assert!(packet.answers[0].is_answer);
        assert_eq!(res.depth(), 0);
    }

    #[test]
    fn soa_only_authority_is_authoritative_negative() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::soa_only(1, "www.example.com", "example.com"));
        assert_eq!(res.on_response(&mut packet), &State::AuthoritativeNegative);
        assert_eq!(res.outcome(), Some(Outcome::AuthoritativeNegative));
    }

    #[test]
    fn empty_response_is_server_error() {
        let mut res = started("www.example.com");
        let mut packet = parse(&fixtures::empty(1, "www.example.com"));
        assert_eq!(res.on_response(&mut packet), &State::ServerError);
    }

    #[test]
    fn timeout_is_terminal() {
        let mut res = started("www.example.com");
        assert_eq!(res.on_timeout(), &State::TimedOut);
        assert_eq!(res.outcome(), Some(Outcome::TimedOut));
        assert_eq!(res.next_query(), None);
    }

    #[test]
    fn response_without_pending_query_is_ignored() {
        let mut res = Resolution::new(ROOT, "www.example.com", 8);
        let mut packet = parse(&fixtures::empty(1, "www.example.com"));
        assert_eq!(
            res.on_response(&mut packet),
            &State::Start(query("www.example.com", ROOT))
        );
    }
}
