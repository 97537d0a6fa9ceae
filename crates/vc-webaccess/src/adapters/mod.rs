//! Host adapters.

pub mod memory;

pub use memory::{ConsoleAction, InMemoryConsole};
