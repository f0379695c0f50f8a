use std::net::{Ipv4Addr, SocketAddr};
use std::time::{Duration, Instant};

use log::{debug, warn};
use rand::{thread_rng, Rng};

use super::DNS_PORT;
use crate::config::ResolverConfig;
use crate::dns_parser::{self, encode_query, Packet};
use crate::fsm::{Query, Resolution};
use crate::outcome::Outcome;
use crate::trace::Observer;
use crate::transport::{self, Transport};

enum Failure {
    /// Every attempt went unanswered, or the deadline passed
    Exhausted,
    Unsendable(dns_parser::Error),
}

/// Drives a `Resolution` over a transport until it ends
pub struct Resolver<T: Transport> {
    transport: T,
    config: ResolverConfig,
    observer: Option<Box<dyn Observer>>,
}

impl<T: Transport> Resolver<T> {
    pub fn new(transport: T, config: ResolverConfig) -> Resolver<T> {
        Resolver {
            transport,
            config,
            observer: None,
        }
    }

    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Resolver<T> {
        self.observer = Some(observer);
        self
    }

    pub fn into_transport(self) -> T {
        self.transport
    }

    /// Resolve `fqdn` to an address starting at `reference`
    ///
    /// The transport is closed before returning, so every run gets a channel
    /// of its own.
    pub fn resolve(&mut self, reference: Ipv4Addr, fqdn: &str) -> Outcome {
        let deadline = Instant::now() + self.config.deadline;
        let mut resolution = Resolution::new(reference, fqdn, self.config.max_depth);

        while let Some(query) = resolution.next_query() {
            match self.exchange(&query, deadline) {
                Ok(mut packet) => {
                    resolution.on_response(&mut packet);
                    if let Some(ref mut observer) = self.observer {
                        observer.on_response(&packet);
                    }
                }
                Err(Failure::Exhausted) => {
                    resolution.on_timeout();
                }
                Err(Failure::Unsendable(err)) => {
                    warn!("cannot query {}: {}", query.name, err);
                    resolution.on_unsendable();
                }
            }
        }

        self.transport.close();
        let outcome = resolution.outcome().unwrap_or(Outcome::ServerError);
        debug!("{} resolved to {:?}", fqdn, outcome);
        outcome
    }

    /// Send `query` until a matching response arrives or attempts run out
    fn exchange(&mut self, query: &Query, deadline: Instant) -> Result<Packet, Failure> {
        let server = SocketAddr::new(query.server.into(), DNS_PORT);
        for attempt in 1..=self.config.attempts.max(1) {
            let now = Instant::now();
            if now >= deadline {
                debug!("deadline passed before asking {} about {}", server, query.name);
                return Err(Failure::Exhausted);
            }
            let timeout = self.config.attempt_timeout.min(deadline - now);

            let id: u16 = thread_rng().gen();
            let bytes = encode_query(id, &query.name).map_err(Failure::Unsendable)?;
            debug!(
                "query {} for {} to {} (attempt {})",
                id, query.name, server, attempt
            );
            if let Some(ref mut observer) = self.observer {
                observer.on_query(id, query, attempt);
            }

            let result = self
                .transport
                .send(&bytes, server)
                .and_then(|()| self.await_reply(id, server, timeout));
            let err = match result {
                Ok(packet) => return Ok(packet),
                Err(err) => err,
            };
            let reason = err.to_string();
            warn!("query {} to {}: {}", id, server, reason);
            if let Some(ref mut observer) = self.observer {
                observer.on_attempt_failed(id, query, &reason);
            }
        }
        Err(Failure::Exhausted)
    }

    /// Receive from `server` until the response to `id` arrives
    ///
    /// Late replies to earlier attempts, datagrams that are not responses
    /// and undecodable datagrams are dropped without ending the wait.
    fn await_reply(
        &mut self,
        id: u16,
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<Packet, transport::Error> {
        let until = Instant::now() + timeout;
        loop {
            let remaining = until.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(transport::Error::Timeout(timeout));
            }
            let reply = self.transport.recv(server, remaining)?;
            match Packet::parse(&reply) {
                Ok(ref packet) if packet.header.id != id => {
                    warn!(
                        "discarding response {} from {} while waiting for {}",
                        packet.header.id, server, id
                    );
                }
                Ok(ref packet) if packet.header.query => {
                    warn!("discarding query {} echoed by {}", packet.header.id, server);
                }
                Ok(packet) => return Ok(packet),
                Err(err) => {
                    warn!("discarding malformed response from {}: {}", server, err);
                }
            }
        }
    }
}
