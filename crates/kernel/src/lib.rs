//! Espalier content kernel library.
//!
//! Exposes kernel internals for integration testing. The main entry point
//! for running the server is the `espalier` binary.

pub mod config;
pub mod content;
pub mod db;
pub mod error;
pub mod menu;
pub mod models;
pub mod permissions;
pub mod routes;
pub mod state;
pub mod store;

pub use config::Config;
pub use state::AppState;
