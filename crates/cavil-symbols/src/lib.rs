//! The SymbolDatabase: a forest of scopes (namespace/class/struct/union/
//! function) populated by a four-stage walk over an already bracket-linked
//! token stream, plus the flow-sensitive helpers (spec.md §4.4) built on
//! top of it.
//!
//! Cross-references (`nested_in`, `function_of`, `type_scope`,
//! `derived_from_scopes`) are non-owning [`cavil_base::ArenaId`] handles
//! resolved after construction — never owning pointers — per spec.md §9's
//! design note on avoiding reference cycles.

pub mod builder;
pub mod helpers;
pub mod types;

pub use builder::SymbolDatabase;
pub use types::{
    Access, ClassInfo, Function, FunctionId, FunctionType, NeedInitialization, Scope, ScopeId,
    ScopeKind, Variable, VariableId,
};
