//! The token stream: a doubly-linked sequence of lexical tokens with
//! bracket linkage and variable identity.
//!
//! This crate owns the data structure every later analysis stage walks —
//! [`symbol database construction`](https://docs.rs/cavil-symbols),
//! [`pattern matching`](https://docs.rs/cavil-match), and the checks
//! themselves all traverse a [`TokenList`] rather than re-lexing source
//! text. Lexing and preprocessing are out of scope (spec.md's Non-goals);
//! [`fixture`] exists to build a `TokenList` directly from already-split
//! lexical text, for tests and for driving the checks end to end without a
//! real C-family front end.

pub mod fixture;
pub mod token;

pub use token::{Token, TokenId, TokenList, TokenStreamError};
