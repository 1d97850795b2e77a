pub mod listener;
pub mod proto;
pub mod receiver;
pub mod util;

pub use listener::{ListenError, Listener, ListenerConfig, RecvError};
pub use proto::{Argument, Packet};
pub use receiver::Receiver;
