//! # Building Console
//!
//! Management console for an apartment building: households, residents, temporary
//! residences, temporary absences and fee types, each on its own list-and-edit
//! page, plus a dashboard of record counts.
//!
//! The generic machinery (loaders, modal controller, page composition, in-memory
//! backend actors, sessions) lives in the `console_framework` crate. This crate
//! supplies the domain on top of it:
//!
//! - [`model`]: records, form values and request payloads, with their field rules.
//! - [`actors`]: the store rules each backend actor enforces.
//! - [`clients`]: typed clients the pages and other actors talk to.
//! - [`pages`]: the management pages, including the select-box lookups.
//! - [`config`]: settings from the environment or a JSON file.
//! - [`lifecycle`]: [`ConsoleSystem`](lifecycle::ConsoleSystem), which starts
//!   everything, signs users in and stops it again.
//!
//! ## Running the Demo
//!
//! ```bash
//! RUST_LOG=info cargo run
//! CONSOLE_SESSION_FILE=target/session.json cargo run   # keep the sign-in between runs
//! ```

pub mod actors;
pub mod clients;
pub mod config;
pub mod lifecycle;
pub mod model;
pub mod pages;
