//! Core functionality: serial I/O and the background reader thread.

pub mod link;

pub use link::{LinkConfig, LinkError, LinkEvent, PortInfo, SerialLink};
