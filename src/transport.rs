use std::io;
use std::net::{Ipv4Addr, SocketAddr, UdpSocket};
use std::time::{Duration, Instant};

use log::{trace, warn};
use socket2::{Domain, Protocol, SockAddr, Socket, Type};
use thiserror::Error;

use super::MAX_DATAGRAM;

#[derive(Debug, Error)]
pub enum Error {
    #[error("no response within {0:?}")]
    Timeout(Duration),
    #[error("socket error: {0}")]
    Io(#[from] io::Error),
}

/// A datagram channel to name servers
///
/// `recv` returns the next datagram from `server`, so a caller that rejects
/// what it got can call it again for the rest of its wait.
pub trait Transport {
    fn send(&mut self, query: &[u8], server: SocketAddr) -> Result<(), Error>;

    fn recv(&mut self, server: SocketAddr, timeout: Duration) -> Result<Vec<u8>, Error>;

    /// Release the channel; the next `send` opens a new one
    fn close(&mut self) {}
}

/// Blocking IPv4 UDP transport
///
/// The socket is opened on the first send and released by `close` or when
/// the transport is dropped.
#[derive(Debug, Default)]
pub struct UdpTransport {
    socket: Option<UdpSocket>,
}

impl UdpTransport {
    pub fn new() -> UdpTransport {
        UdpTransport { socket: None }
    }

    fn bind() -> io::Result<UdpSocket> {
        let addr: SockAddr = SocketAddr::new(Ipv4Addr::UNSPECIFIED.into(), 0).into();
        let socket = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket.bind(&addr)?;
        Ok(socket.into())
    }

    fn socket(&mut self) -> io::Result<&UdpSocket> {
        if self.socket.is_none() {
            let socket = UdpTransport::bind()?;
            trace!("opened socket on {:?}", socket.local_addr());
            self.socket = Some(socket);
        }
        match self.socket {
            Some(ref socket) => Ok(socket),
            None => Err(not_open()),
        }
    }
}

fn not_open() -> io::Error {
    io::Error::new(io::ErrorKind::NotConnected, "socket not open")
}

impl Transport for UdpTransport {
    fn send(&mut self, query: &[u8], server: SocketAddr) -> Result<(), Error> {
        let socket = self.socket()?;
        let sent = socket.send_to(query, server)?;
        if sent != query.len() {
            warn!("failed to send entire packet to {}", server);
        }
        Ok(())
    }

    fn recv(&mut self, server: SocketAddr, timeout: Duration) -> Result<Vec<u8>, Error> {
        let socket = match self.socket {
            Some(ref socket) => socket,
            None => return Err(not_open().into()),
        };

        let deadline = Instant::now() + timeout;
        let mut buf = vec![0u8; MAX_DATAGRAM];
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return Err(Error::Timeout(timeout));
            }
            socket.set_read_timeout(Some(remaining))?;
            match socket.recv_from(&mut buf) {
                Ok((len, from)) if from == server => {
                    trace!("received {} bytes from {}", len, from);
                    buf.truncate(len);
                    return Ok(buf);
                }
                Ok((len, from)) => {
                    warn!("dropping {} bytes from unexpected source {}", len, from);
                }
                Err(ref err)
                    if err.kind() == io::ErrorKind::WouldBlock
                        || err.kind() == io::ErrorKind::TimedOut =>
                {
                    return Err(Error::Timeout(timeout));
                }
                Err(err) => return Err(err.into()),
            }
        }
    }

    fn close(&mut self) {
        if let Some(socket) = self.socket.take() {
            trace!("closing socket on {:?}", socket.local_addr());
        }
    }
}
