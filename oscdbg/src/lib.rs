pub mod monitor;
pub mod osc;

pub use monitor::Session;
pub use osc::Receiver;
