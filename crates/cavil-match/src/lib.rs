//! A compact pattern-matching DSL for locating token sequences in a
//! [`cavil_tokens::TokenList`] without building an AST.
//!
//! Patterns are precompiled once with [`Pattern::compile`] and then matched
//! as many times as needed with [`matches`]/[`find_match`] — see
//! [`matcher`] for the element semantics (`%var%`, `%type%`, `%num%`,
//! `%any%`, `%varid%`, alternation, negation, character classes, and
//! optional trailing-`|` elements).

pub mod matcher;
pub mod pattern;

pub use matcher::{find_match, match_str, matches, simple_match};
pub use pattern::{Pattern, PatternError};
