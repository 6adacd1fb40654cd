//! Interactive hosts for the shell. Tests use the scripted
//! [`TestHost`](crate::io) instead.

pub mod terminal;

pub use terminal::TerminalHost;
