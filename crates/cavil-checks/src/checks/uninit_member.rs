//! `uninitMemberVar`: a constructor (or `operator=`) that leaves a
//! non-static, non-mutable data member unset.
//!
//! No `checkclass.cpp` made it into the retrieved original source, so this
//! check is grounded directly in spec.md §4.9's description of the rule
//! plus the `ClassInfo`/`need_initialization` machinery cavil-symbols
//! already computes (ultimately the same "does this member get its own
//! default-initializing constructor" fixed point cppcheck's `CheckClass`
//! uses to decide whether a class-typed member even needs to appear in
//! this analysis).
//!
//! A member counts as initialized if the constructor's member
//! initializer list names it, the constructor delegates to another
//! constructor of the same class, the body assigns it directly
//! (`m = ...;`) or through `this` (`this->m = ...;`), or the whole object
//! is initialized at once via `memset(this, ...)` or, for `operator=`,
//! `*this = other;`. Constructors that rely on any of these blanket forms
//! are assumed fully-initializing and are not analyzed member-by-member.
//! A constructor/assignment operator that calls another member function
//! and relies on it to perform initialization is conservatively assumed
//! fully-initializing too, since proving otherwise would need whole-
//! program call-graph analysis this core's per-file scope doesn't have.

use std::collections::HashSet;

use cavil_diagnostics::{ErrorMessage, Severity};
use cavil_symbols::FunctionType;
use cavil_tokens::TokenId;

use crate::check::{Check, CheckContext};

pub struct UninitMemberVar;

impl Check for UninitMemberVar {
    fn id(&self) -> &'static str {
        "uninitMemberVar"
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let db = ctx.symbols;
        let mut out = Vec::new();

        for scope_id in db.scope_ids() {
            let scope = db.scope(scope_id);
            if !scope.kind.is_class_like() {
                continue;
            }
            let Some(info) = &scope.class_info else { continue };

            let members: Vec<String> = info
                .var_list
                .iter()
                .filter(|&&v| {
                    let var = db.variable(v);
                    if var.is_static || var.is_mutable {
                        return false;
                    }
                    if !var.is_class {
                        return true;
                    }
                    // A class-typed member only needs mention here if its
                    // own type requires explicit initialization; a type
                    // with a default constructor initializes itself.
                    var.type_scope
                        .map(|ts| db.scope(ts).class_info.as_ref().unwrap().need_initialization)
                        .is_some_and(|n| matches!(n, cavil_symbols::NeedInitialization::True))
                })
                .map(|&v| db.variable(v).name.clone())
                .collect();

            if members.is_empty() {
                continue;
            }

            let class_name = info.class_name.clone();

            for &fn_id in &info.function_list {
                let f = db.function(fn_id);
                if !matches!(f.kind, FunctionType::Constructor | FunctionType::CopyConstructor | FunctionType::OperatorEqual) {
                    continue;
                }
                if !f.has_body {
                    continue;
                }

                let Some(body_end) = tokens.link(f.token) else { continue };

                if f.kind == FunctionType::OperatorEqual && self_assigns_whole_object(tokens, f.token, body_end) {
                    continue;
                }

                let mut initialized: HashSet<String> = HashSet::new();
                let mut fully_initializing = false;

                if let Some(open) = f.arg_def {
                    if let Some(close) = tokens.link(open) {
                        if tokens.next(close).is_some_and(|t| tokens.get(t).text == ":") {
                            scan_initializer_list(tokens, close, f.token, &class_name, &mut initialized, &mut fully_initializing);
                        }
                    }
                }

                if !fully_initializing {
                    scan_body(tokens, f.token, body_end, &mut initialized, &mut fully_initializing);
                }

                if fully_initializing {
                    continue;
                }

                let missing: Vec<&str> = members.iter().filter(|m| !initialized.contains(*m)).map(String::as_str).collect();
                if !missing.is_empty() {
                    let list = missing.join("', '");
                    out.push(ctx.report(
                        f.token_def,
                        Severity::Warning,
                        "uninitMemberVar",
                        format!("Member variable '{list}' is not initialized in the constructor."),
                    ));
                }
            }
        }

        out
    }
}

/// `: NAME1 ( ... ) , NAME2 ( ... )` between the arg list's `)` and the
/// body's `{`. A `NAME` equal to the class's own name is a delegating
/// constructor call, which hands initialization to another constructor
/// entirely.
fn scan_initializer_list(
    tokens: &cavil_tokens::TokenList,
    colon_before: TokenId,
    body_start: TokenId,
    class_name: &str,
    initialized: &mut HashSet<String>,
    fully_initializing: &mut bool,
) {
    let mut cur = tokens.next(colon_before);
    while let Some(id) = cur.filter(|&id| id != body_start) {
        if tokens.get(id).is_name && tokens.str_at(id, 1) == Some("(") {
            let name = tokens.get(id).text.clone();
            if name == class_name {
                *fully_initializing = true;
                return;
            }
            initialized.insert(name);
        }
        cur = tokens.next(id);
    }
}

fn scan_body(
    tokens: &cavil_tokens::TokenList,
    body_start: TokenId,
    body_end: TokenId,
    initialized: &mut HashSet<String>,
    fully_initializing: &mut bool,
) {
    let mut cur = tokens.next(body_start);
    while let Some(id) = cur.filter(|&id| id != body_end) {
        let text = tokens.get(id).text.clone();

        if text == "memset" && tokens.str_at(id, 1) == Some("(") && tokens.str_at(id, 2) == Some("this") {
            *fully_initializing = true;
            return;
        }

        // this -> NAME = ...
        if text == "this" && tokens.str_at(id, 1) == Some("->") {
            if let Some(name_tok) = tokens.tok_at(id, 2) {
                if tokens.get(name_tok).is_name && is_plain_assignment(tokens, name_tok) {
                    initialized.insert(tokens.get(name_tok).text.clone());
                }
            }
        }
        // bare NAME = ...
        else if tokens.get(id).is_name && is_plain_assignment(tokens, id) {
            initialized.insert(text.clone());
        }

        cur = tokens.next(id);
    }
}

/// True if `id` is directly followed by an assignment `=`. The tokenizer
/// combines `==` into its own token, so this can't be confused with a
/// comparison.
fn is_plain_assignment(tokens: &cavil_tokens::TokenList, id: TokenId) -> bool {
    tokens.str_at(id, 1) == Some("=")
}

/// `operator=`'s conventional self-assignment shortcut: `*this = other;`,
/// which hands the whole object's state to the assignment.
fn self_assigns_whole_object(tokens: &cavil_tokens::TokenList, body_start: TokenId, body_end: TokenId) -> bool {
    let mut cur = tokens.next(body_start);
    while let Some(id) = cur.filter(|&id| id != body_end) {
        if tokens.get(id).text == "*"
            && tokens.str_at(id, 1) == Some("this")
            && tokens.str_at(id, 2) == Some("=")
            && tokens.tok_at(id, 3).is_some_and(|t| tokens.get(t).is_name)
            && tokens.str_at(id, 4) == Some(";")
        {
            return true;
        }
        cur = tokens.next(id);
    }
    false
}
