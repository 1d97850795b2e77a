//! Listener
//!
//! A `Listener` owns a bound UDP socket and a dedicated poller thread. The
//! thread waits on `mio` for datagrams or a stop request, decodes whatever
//! arrives, and hands each packet (or receive error) to an owned callback.
//!
//! Stopping joins the thread, so the socket is closed by the time `stop()`
//! returns and the same port can be bound again immediately.

mod udp;

use super::proto::{self, Packet};
use super::util;
use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::thread;
use thiserror::Error;

/// Possible errors when receiving on a `Listener`
#[derive(Debug)]
pub enum RecvError {
    /// No datagrams available at this time.
    NotReady,
    /// The datagram could not be decoded.
    Protocol(proto::Error),
    /// Low level IO error.
    IO(io::Error),
}

/// Where a `Listener` binds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListenerConfig {
    pub bind: IpAddr,
    pub port: u16,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        ListenerConfig {
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: util::DEFAULT_PORT,
        }
    }
}

impl ListenerConfig {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}

#[derive(Debug, Error)]
pub enum ListenError {
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },
    #[error("failed to set up socket polling: {0}")]
    Poll(#[source] io::Error),
    #[error("failed to spawn listener thread: {0}")]
    Spawn(#[source] io::Error),
}

/// Control messages sent to the poller thread.
enum Control {
    Stop,
}

const WAKER: mio::Token = mio::Token(0);
const SOCKET: mio::Token = mio::Token(1);

/// Handle to a running listener thread. Dropping it stops the thread.
pub struct Listener {
    ctl: crossbeam::channel::Sender<Control>,
    waker: mio::Waker,
    thread: Option<thread::JoinHandle<()>>,
    local_addr: SocketAddr,
}

impl Listener {
    /// Poller thread event loop. Runs until a stop request arrives, the
    /// handle goes away, or the rx callback returns an error.
    fn poller_thread<RxCallbackT: Fn(Result<Packet, RecvError>) -> io::Result<()>>(
        mut socket: udp::Socket,
        mut poll: mio::Poll,
        rx: RxCallbackT,
        ctl: crossbeam::channel::Receiver<Control>,
    ) {
        use crossbeam::channel::TryRecvError;

        let mut events = mio::Events::with_capacity(4);

        'ioloop: loop {
            if let Err(e) = poll.poll(&mut events, None) {
                if e.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                tracing::warn!("listener poll failed: {}", e);
                break 'ioloop;
            }

            for event in events.iter() {
                match event.token() {
                    WAKER => match ctl.try_recv() {
                        Ok(Control::Stop) | Err(TryRecvError::Disconnected) => break 'ioloop,
                        Err(TryRecvError::Empty) => {}
                    },
                    SOCKET => loop {
                        match socket.recv() {
                            Ok(packets) => {
                                for pkt in packets {
                                    if rx(Ok(pkt)).is_err() {
                                        break 'ioloop;
                                    }
                                }
                            }
                            Err(RecvError::NotReady) => break,
                            Err(RecvError::IO(e)) => {
                                // Wait for the next readiness event rather than spin.
                                if rx(Err(RecvError::IO(e))).is_err() {
                                    break 'ioloop;
                                }
                                break;
                            }
                            Err(e) => {
                                if rx(Err(e)).is_err() {
                                    break 'ioloop;
                                }
                            }
                        }
                    },
                    mio::Token(x) => {
                        tracing::warn!("unexpected poll token {}", x);
                    }
                }
            }
        }
        tracing::debug!("listener thread exiting");
    }

    /// Binds according to `config` and starts the poller thread, which calls
    /// `rx` for every decoded packet or receive error. If `rx` returns an
    /// `Err()`, the listener shuts down.
    ///
    /// Bind failures are returned here; nothing is retried.
    pub fn start<RxCallbackT: Fn(Result<Packet, RecvError>) -> io::Result<()> + Send + 'static>(
        config: &ListenerConfig,
        rx: RxCallbackT,
    ) -> Result<Listener, ListenError> {
        let addr = config.socket_addr();
        let mut socket = udp::Socket::bind(&addr).map_err(|source| ListenError::Bind { addr, source })?;
        let local_addr = socket
            .local_addr()
            .map_err(|source| ListenError::Bind { addr, source })?;

        let poll = mio::Poll::new().map_err(ListenError::Poll)?;
        poll.registry()
            .register(&mut socket, SOCKET, mio::Interest::READABLE)
            .map_err(ListenError::Poll)?;
        let waker = mio::Waker::new(poll.registry(), WAKER).map_err(ListenError::Poll)?;

        let (ctl, ctl_receiver) = crossbeam::channel::bounded::<Control>(1);
        let thread = thread::Builder::new()
            .name(format!("osc-listener-{}", local_addr.port()))
            .spawn(move || Listener::poller_thread(socket, poll, rx, ctl_receiver))
            .map_err(ListenError::Spawn)?;

        tracing::info!("listening for OSC on {}", local_addr);
        Ok(Listener {
            ctl,
            waker,
            thread: Some(thread),
            local_addr,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Whether the poller thread is still alive.
    pub fn is_running(&self) -> bool {
        self.thread.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Stops the poller thread and waits for it to release the socket.
    /// Calling it again, or on a listener whose thread already exited, does nothing.
    pub fn stop(&mut self) {
        let thread = match self.thread.take() {
            Some(thread) => thread,
            None => return,
        };
        // The thread may already be gone, in which case both of these fail harmlessly.
        let _ = self.ctl.try_send(Control::Stop);
        let _ = self.waker.wake();
        if thread.join().is_err() {
            tracing::warn!("listener thread on {} panicked", self.local_addr);
        }
        tracing::info!("stopped listening on {}", self.local_addr);
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.stop();
    }
}
