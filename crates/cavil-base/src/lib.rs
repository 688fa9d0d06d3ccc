//! Structural atoms shared across the cavil analysis core.
//!
//! This crate has no knowledge of the analyzed language's grammar or of
//! any particular check. It provides only the generic, reusable
//! infrastructure higher-level crates build on: index-addressed arena
//! allocation and path normalization for diagnostics.

pub mod arena;
pub mod path;

pub use arena::{Arena, ArenaId};
