//! Protocol code for the tactile sensor stream: terminator framing and
//! fixed-offset frame decoding. No I/O lives here.

pub mod frame;
pub mod framer;

pub use frame::{Frame, FrameError};
pub use framer::{FrameSplitter, TERMINATOR};
