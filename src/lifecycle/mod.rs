//! Start-up and shutdown of the console.
//!
//! [`ConsoleSystem`] is the dependency-injection root: it spawns one backend actor
//! per resource, wires the ones that depend on each other, builds the session
//! context, and hands out pages to whoever is signed in.

pub mod accounts;
pub mod console_system;

pub use accounts::AccountDirectory;
pub use console_system::{ConsoleSystem, ShutdownError};
