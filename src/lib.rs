//! Causette is a minimal full-screen terminal chat client for remote
//! completion APIs.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the conversation state, the single-flight turn lifecycle,
//!   and the session context (HTTP client, configuration, transcript log).
//! - [`ui`] renders the transcript and runs the interactive event loop that
//!   drives user input and display updates.
//! - [`api`] defines the wire payloads for both supported endpoint flavors.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which builds the configuration and dispatches
//! into [`ui::chat_loop`].

pub mod api;
pub mod cli;
pub mod core;
pub mod ui;
pub mod utils;
