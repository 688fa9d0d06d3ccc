//! `cavil`: command-line front end for the cavil static-analysis core.
//!
//! This crate only parses flags and renders results; the token stream,
//! pattern matcher, symbol database, check framework, and driver all live
//! in their own crates (`cavil-tokens`, `cavil-match`, `cavil-symbols`,
//! `cavil-checks`, `cavil-driver`).

pub mod cli;

pub use cli::run_cli;
