//! UDP socket
//!
//! Non-blocking socket polled by the listener thread, and an MIO event source.
//! Each datagram is decoded on receipt; a bundle yields several packets.

use super::RecvError;
use crate::osc::proto::{self, Packet};
use mio::net::UdpSocket;
use std::io;
use std::net::SocketAddr;

/// Largest payload a single UDP datagram can carry.
const MAX_DATAGRAM_SIZE: usize = 65535;

pub struct Socket {
    sock: UdpSocket,
    buf: Vec<u8>,
}

impl Socket {
    /// Binds a socket that also accepts broadcast traffic.
    pub fn bind(address: &SocketAddr) -> io::Result<Socket> {
        let sock = UdpSocket::bind(*address)?;
        sock.set_broadcast(true)?;
        Ok(Socket {
            sock,
            buf: vec![0u8; MAX_DATAGRAM_SIZE],
        })
    }

    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Returns the packets of one datagram, or `RecvError::NotReady` when
    /// nothing is pending.
    pub fn recv(&mut self) -> Result<Vec<Packet>, RecvError> {
        let (size, from) = match self.sock.recv_from(&mut self.buf) {
            Ok(received) => received,
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => return Err(RecvError::NotReady),
            Err(e) => return Err(RecvError::IO(e)),
        };
        proto::decode(&self.buf[..size], &from.to_string()).map_err(RecvError::Protocol)
    }
}

impl mio::event::Source for Socket {
    fn register(
        &mut self,
        registry: &mio::Registry,
        token: mio::Token,
        interests: mio::Interest,
    ) -> io::Result<()> {
        self.sock.register(registry, token, interests)
    }

    fn reregister(
        &mut self,
        registry: &mio::Registry,
        token: mio::Token,
        interests: mio::Interest,
    ) -> io::Result<()> {
        self.sock.reregister(registry, token, interests)
    }

    fn deregister(&mut self, registry: &mio::Registry) -> io::Result<()> {
        self.sock.deregister(registry)
    }
}
