//! Flow-sensitive helpers built on top of a constructed [`SymbolDatabase`]
//! (spec.md §4.4). These are deliberately conservative: an unresolved base
//! class or an unrecognized callee is always treated as "yes", matching the
//! original's bias toward under-reporting false negatives in `checkConstFunc`
//! and `isVirtualFunc` rather than producing spurious const-correctness
//! diagnostics.

use std::collections::HashSet;

use cavil_tokens::{TokenId, TokenList};

use crate::builder::SymbolDatabase;
use crate::types::ScopeId;

const ASSIGN_OPS: &[&str] = &[
    "=", "+=", "-=", "*=", "/=", "%=", "&=", "|=", "^=", "<<=", ">>=",
];

/// True iff `token` refers to a member variable of `scope` or one of its
/// (transitive) base classes.
///
/// Two shapes are treated as member access without a name-list lookup,
/// matching the original's conservative stance: `this -> NAME` and
/// `* this ) . NAME` (the dereferenced-this-pointer form) are always
/// member access, regardless of whether `NAME` is actually declared —
/// the caller already knows it's accessing *something* through `this`.
pub fn is_member_var(db: &SymbolDatabase, tokens: &TokenList, scope: ScopeId, token: TokenId) -> bool {
    if let Some(prev) = tokens.prev(token) {
        if tokens.get(prev).text == "->" {
            if let Some(this_tok) = tokens.prev(prev) {
                if tokens.get(this_tok).text == "this" {
                    return true;
                }
            }
        }
        if tokens.get(prev).text == "." {
            if let Some(close) = tokens.prev(prev) {
                if tokens.get(close).text == ")" {
                    if let Some(open) = tokens.link(close) {
                        if tokens.next(open) == tokens.prev(close)
                            && tokens.prev(close).is_some_and(|t| tokens.get(t).text == "this")
                        {
                            return true;
                        }
                    }
                }
            }
        }
    }

    let name = tokens.get(token).text.as_str();
    member_name_in_hierarchy(db, name, scope, &mut HashSet::new())
}

fn member_name_in_hierarchy(db: &SymbolDatabase, name: &str, scope: ScopeId, visited: &mut HashSet<ScopeId>) -> bool {
    if !visited.insert(scope) {
        return false;
    }
    let Some(info) = db.scope(scope).class_info.as_ref() else {
        return false;
    };
    if info.var_list.iter().any(|&v| db.variable(v).name == name) {
        return true;
    }
    info.derived_from_scopes
        .iter()
        .any(|&base| member_name_in_hierarchy(db, name, base, visited))
}

/// True iff `name` matches a `const`-qualified function in `scope` or any
/// base class.
pub fn is_const_member_func(db: &SymbolDatabase, scope: ScopeId, name: &str) -> bool {
    const_func_in_hierarchy(db, name, scope, &mut HashSet::new())
}

fn const_func_in_hierarchy(db: &SymbolDatabase, name: &str, scope: ScopeId, visited: &mut HashSet<ScopeId>) -> bool {
    if !visited.insert(scope) {
        return false;
    }
    let Some(info) = db.scope(scope).class_info.as_ref() else {
        return false;
    };
    if info
        .function_list
        .iter()
        .any(|&f| db.function(f).name == name && db.function(f).is_const)
    {
        return true;
    }
    info.derived_from_scopes
        .iter()
        .any(|&base| const_func_in_hierarchy(db, name, base, visited))
}

/// True iff a base class (transitively) declares a `virtual` function named
/// `name`. A base class name that failed to resolve to a scope (an
/// "unknown base") is treated conservatively as yes, per spec.md §4.4.
pub fn is_virtual_func(db: &SymbolDatabase, scope: ScopeId, name: &str) -> bool {
    virtual_in_hierarchy(db, name, scope, &mut HashSet::new())
}

fn virtual_in_hierarchy(db: &SymbolDatabase, name: &str, scope: ScopeId, visited: &mut HashSet<ScopeId>) -> bool {
    if !visited.insert(scope) {
        return false;
    }
    let Some(info) = db.scope(scope).class_info.as_ref() else {
        return false;
    };
    if info.derived_from.len() > info.derived_from_scopes.len() {
        // At least one base class name didn't resolve to a known scope.
        return true;
    }
    for &base in &info.derived_from_scopes {
        if db
            .scope(base)
            .class_info
            .as_ref()
            .is_some_and(|i| i.function_list.iter().any(|&f| db.function(f).name == name && db.function(f).is_virtual))
        {
            return true;
        }
        if virtual_in_hierarchy(db, name, base, visited) {
            return true;
        }
    }
    false
}

/// True iff the function body starting at `body_start` (its opening `{`)
/// never mutates a member of `scope` through any of the shapes spec.md
/// §4.4 lists: direct/compound assignment, `++`/`--`, a non-const member
/// call, streaming a member in via `>>`, or `delete`. An unresolved callee
/// name is treated as non-const, the conservative direction for this
/// check (it must never pass a function as const-safe when it can't prove
/// it is).
pub fn check_const_func(db: &SymbolDatabase, tokens: &TokenList, scope: ScopeId, body_start: TokenId) -> bool {
    let Some(body_end) = tokens.link(body_start) else {
        return false;
    };
    let mut cur = tokens.next(body_start);

    while let Some(id) = cur.filter(|&id| id != body_end) {
        let text = tokens.get(id).text.clone();

        if text == "delete" {
            return false;
        }

        if tokens.get(id).is_name && is_member_var(db, tokens, scope, id) {
            if let Some(next) = tokens.next(id) {
                let next_text = tokens.get(next).text.as_str();
                if ASSIGN_OPS.contains(&next_text) || next_text == "++" || next_text == "--" {
                    return false;
                }
                if next_text == "(" {
                    if !is_const_member_func(db, scope, &text) {
                        return false;
                    }
                }
            }
            if let Some(prev) = tokens.prev(id) {
                let prev_text = tokens.get(prev).text.as_str();
                if prev_text == "++" || prev_text == "--" || prev_text == ">>" {
                    return false;
                }
            }
        }

        cur = tokens.next(id);
    }
    true
}
