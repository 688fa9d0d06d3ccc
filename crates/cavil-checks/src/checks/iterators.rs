//! Iterator-safety checks, grounded in `CheckStl::iterators` and
//! `CheckStl::mismatchingContainers` (original_source/lib/checkstl.cpp).
//!
//! The fixture tokenizer in cavil-tokens does not assign `var_id` (lexing a
//! real C-family grammar is out of scope), so where the original keys off
//! `tok->varId()` these checks key off the iterator/container's token text
//! instead. This is strictly weaker (it can't tell two same-named locals in
//! different scopes apart) but preserves the original's control flow and
//! message text exactly.

use cavil_diagnostics::{ErrorMessage, Severity};
use cavil_match::{match_str, simple_match};
use cavil_tokens::TokenId;

use crate::check::{Check, CheckContext};

/// `iterators`: flags an iterator obtained from one container (`it =
/// c1.begin();`) later compared against another container's `.end()`, or
/// erased/inserted against a container other than the one it came from.
pub struct Iterators;

impl Check for Iterators {
    fn id(&self) -> &'static str {
        "iterators"
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();

        for tok in tokens.iter() {
            if !match_str(tokens, tok, "%var% = %var% . begin ( )", 0).unwrap_or(false) {
                continue;
            }
            let container_tok = tokens.tok_at(tok, 2).unwrap();

            let iterator_name = tokens.get(tok).text.clone();
            let container_name = tokens.get(container_tok).text.clone();

            let Some(scan_start) = tokens.tok_at(tok, 7) else { continue };
            let mut valid_iterator = true;
            let mut indent = 0i32;
            let mut cur = Some(scan_start);

            while let Some(id) = cur {
                let text = tokens.get(id).text.clone();
                if text == "{" {
                    indent += 1;
                    cur = tokens.next(id);
                    continue;
                }
                if text == "}" {
                    indent -= 1;
                    if indent <= 0 {
                        break;
                    }
                    cur = tokens.next(id);
                    continue;
                }

                if match_str(tokens, id, &format!("{iterator_name} != %var% . end ( )"), 0).unwrap_or(false) {
                    let other_container = tokens.str_at(id, 2).unwrap_or("").to_string();
                    if other_container != container_name {
                        out.push(ctx.report(id, Severity::Error, "iterators", format!("Same iterator is used with both {container_name} and {other_container}")));
                    }
                    cur = tokens.tok_at(id, 6).or(cur);
                    continue;
                }

                if match_str(tokens, id, &format!("%var% . insert|erase ( {iterator_name}"), 0).unwrap_or(false) {
                    let this_container = text.clone();
                    if this_container != container_name {
                        out.push(ctx.report(
                            id,
                            Severity::Error,
                            "iterators",
                            format!("Same iterator is used with both {container_name} and {this_container}"),
                        ));
                    } else if tokens.str_at(id, 2) == Some("erase") {
                        valid_iterator = false;
                    }
                    cur = tokens.tok_at(id, 4).or(cur);
                    continue;
                }

                if !valid_iterator && simple_match(tokens, id, &format!("* {iterator_name}")) {
                    out.push(ctx.report(id, Severity::Error, "eraseDereference", format!("Dereferenced iterator '{iterator_name}' has been erased")));
                    cur = tokens.next(id);
                    continue;
                }
                if !valid_iterator && simple_match(tokens, id, &format!("{iterator_name} .")) {
                    out.push(ctx.report(id, Severity::Error, "eraseDereference", format!("Dereferenced iterator '{iterator_name}' has been erased")));
                    cur = tokens.tok_at(id, 2).or(cur);
                    continue;
                }

                if match_str(tokens, id, &format!("{iterator_name} = %var% . erase ("), 0).unwrap_or(false) {
                    valid_iterator = true;
                }

                if matches!(text.as_str(), "return" | "break" | "else") {
                    valid_iterator = true;
                }

                cur = tokens.next(id);
            }
        }

        out
    }
}

/// `mismatchingContainers`: a `std::` algorithm call whose range endpoints
/// come from two differently-named containers.
pub struct MismatchingContainers;

const ALGOS: &[&str] = &["find", "find_if", "count", "transform", "replace", "replace_if", "sort"];

impl Check for MismatchingContainers {
    fn id(&self) -> &'static str {
        "mismatchingContainers"
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();

        let algo_pattern = format!("std :: {} ( %var% . begin|rbegin ( ) , %var% . end|rend ( ) ,", ALGOS.join("|"));

        for tok in tokens.iter() {
            if !match_str(tokens, tok, &algo_pattern, 0).unwrap_or(false) {
                continue;
            }
            let c1 = tokens.tok_at(tok, 4).unwrap();
            let c2 = tokens.tok_at(tok, 10).unwrap();

            if tokens.get(c1).text != tokens.get(c2).text {
                out.push(ctx.report(tok, Severity::Error, "mismatchingContainers", "mismatching containers"));
            }
        }

        out
    }
}

/// `invalidIterator`: an iterator taken from a container
/// (`it = c.begin();`) that is later used after the same container was
/// mutated by `push_back`/`push_front`/`insert`/`reserve`, any of which may
/// reallocate and strand the iterator.
pub struct InvalidIterator;

const INVALIDATING_CALLS: &str = "push_front|push_back|insert|reserve";
const ITER_SOURCES: &str = "begin|end|rbegin|rend";

impl Check for InvalidIterator {
    fn id(&self) -> &'static str {
        "invalidIterator"
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();
        let source_pattern = format!("%var% = %var% . {ITER_SOURCES} ( )");

        for tok in tokens.iter() {
            if !match_str(tokens, tok, &source_pattern, 0).unwrap_or(false) {
                continue;
            }
            let container_tok = tokens.tok_at(tok, 2).unwrap();

            let iterator_name = tokens.get(tok).text.clone();
            let container_name = tokens.get(container_tok).text.clone();
            let mut invalidated_by: Option<String> = None;

            let mut cur = tokens.tok_at(tok, 7);
            while let Some(id) = cur {
                let text = tokens.get(id).text.clone();
                if text == "}" {
                    break;
                }
                if text == "return" {
                    break;
                }

                if invalidated_by.is_none()
                    && match_str(tokens, id, &format!("{container_name} . {INVALIDATING_CALLS} ("), 0).unwrap_or(false)
                {
                    invalidated_by = Some(tokens.str_at(id, 2).unwrap().to_string());
                    cur = tokens.next(id);
                    continue;
                }

                if let Some(call) = &invalidated_by {
                    if text == iterator_name {
                        out.push(ctx.report(
                            id,
                            Severity::Error,
                            "invalidIterator",
                            format!("After {call}, the iterator '{iterator_name}' may be invalid"),
                        ));
                        break;
                    }
                }

                cur = tokens.next(id);
            }
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavil_symbols::SymbolDatabase;
    use cavil_tokens::fixture::tokenize;
    use crate::settings::Settings;

    fn run(check: &dyn Check, src: &str) -> Vec<ErrorMessage> {
        let tokens = tokenize(src, 0).unwrap();
        let db = SymbolDatabase::build(&tokens);
        let settings = Settings::default();
        let ctx = CheckContext::new(&tokens, &db, &settings, "a.cpp");
        check.run_checks(&ctx)
    }

    #[test]
    fn flags_mismatching_container_iterator_comparison() {
        let out = run(
            &Iterators,
            "it = a . begin ( ) ; while ( it != b . end ( ) ) { it ++ ; }",
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "iterators");
        assert!(out[0].short_message.contains('a') && out[0].short_message.contains('b'));
    }

    #[test]
    fn same_container_comparison_is_fine() {
        let out = run(&Iterators, "it = a . begin ( ) ; while ( it != a . end ( ) ) { it ++ ; }");
        assert!(out.is_empty());
    }

    #[test]
    fn flags_dereference_after_erase() {
        let out = run(
            &Iterators,
            "it = a . begin ( ) ; a . erase ( it ) ; x = * it ;",
        );
        assert!(out.iter().any(|m| m.id == "eraseDereference"));
    }

    #[test]
    fn mismatching_containers_flags_mixed_ranges() {
        let out = run(
            &MismatchingContainers,
            "std :: find ( a . begin ( ) , b . end ( ) , x ) ;",
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "mismatchingContainers");
    }

    #[test]
    fn mismatching_containers_allows_matching_ranges() {
        let out = run(
            &MismatchingContainers,
            "std :: find ( a . begin ( ) , a . end ( ) , x ) ;",
        );
        assert!(out.is_empty());
    }
}
