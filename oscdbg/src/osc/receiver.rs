//! Receiver
//!
//! Transport lifecycle for the monitor. A `Receiver` keeps the listening
//! configuration and at most one running `Listener`, and delivers every
//! packet the listener decodes into an `IngestQueue`.
//!
//! Each (re)initialization stops the running listener, if any, and starts a
//! fresh one from the current configuration.

use super::listener::{ListenError, Listener, ListenerConfig, RecvError};
use super::proto::Packet;
use super::util;
use crate::monitor::IngestQueue;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

pub struct Receiver {
    config: ListenerConfig,
    ingest: Arc<IngestQueue>,
    listener: Option<Listener>,
}

impl Receiver {
    /// A receiver with the default configuration. Nothing is bound until
    /// `initialize()`.
    pub fn new(ingest: Arc<IngestQueue>) -> Receiver {
        Receiver::with_config(ingest, ListenerConfig::default())
    }

    pub fn with_config(ingest: Arc<IngestQueue>, config: ListenerConfig) -> Receiver {
        Receiver {
            config,
            ingest,
            listener: None,
        }
    }

    pub fn config(&self) -> &ListenerConfig {
        &self.config
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    /// Stops the current listener, if any, and starts a new one.
    pub fn initialize(&mut self) -> Result<(), ListenError> {
        self.stop();
        let listener = Listener::start(&self.config, Receiver::delivery(self.ingest.clone()))?;
        self.listener = Some(listener);
        Ok(())
    }

    /// Changes the port, restarting the listener only if it differs from the
    /// configured one.
    pub fn set_port(&mut self, port: u16) -> Result<(), ListenError> {
        if port == self.config.port {
            return Ok(());
        }
        self.config.port = port;
        self.initialize()
    }

    /// Replaces the whole configuration and restarts the listener.
    pub fn reconfigure(&mut self, config: ListenerConfig) -> Result<(), ListenError> {
        self.config = config;
        self.initialize()
    }

    /// Stops listening. Safe to call when nothing is running.
    pub fn stop(&mut self) {
        if let Some(mut listener) = self.listener.take() {
            listener.stop();
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listener.as_ref().is_some_and(|l| l.is_running())
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.listener.as_ref().map(|l| l.local_addr())
    }

    /// Human readable `address:port` the receiver can be reached at.
    pub fn endpoint(&self) -> String {
        match self.local_addr() {
            Some(addr) if addr.ip().is_unspecified() => {
                format!("{}:{}", util::local_address(), addr.port())
            }
            Some(addr) => addr.to_string(),
            None => format!("{}:{} (not listening)", util::UNKNOWN_ADDRESS, self.config.port),
        }
    }

    /// Listener callback feeding the ingest queue. Undecodable datagrams are
    /// logged and skipped; they never reach the monitor.
    fn delivery(
        ingest: Arc<IngestQueue>,
    ) -> impl Fn(Result<Packet, RecvError>) -> io::Result<()> + Send + 'static {
        move |rxdata| {
            match rxdata {
                Ok(pkt) => {
                    if !ingest.deliver(pkt) {
                        tracing::trace!("held, packet discarded");
                    }
                }
                Err(RecvError::Protocol(e)) => tracing::debug!("undecodable datagram: {:?}", e),
                Err(RecvError::IO(e)) => tracing::debug!("receive failed: {}", e),
                Err(RecvError::NotReady) => {}
            }
            Ok(())
        }
    }
}
