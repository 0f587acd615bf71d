//! Terminal presentation: spinner and interactive console.

pub mod spinner;
pub mod terminal;

pub use spinner::Spinner;
pub use terminal::TerminalConsole;
