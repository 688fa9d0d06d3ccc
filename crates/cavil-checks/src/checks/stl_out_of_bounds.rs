//! `stlOutOfBounds`, grounded in `CheckStl::stlOutOfBounds`
//! (original_source/lib/checkstl.cpp): a `for` loop bounded by
//! `i <= c.size()` lets `i` reach `c.size()` itself, one past the last
//! valid index, so any `c[i]` inside the loop body is out of bounds on the
//! final iteration.

use cavil_diagnostics::{ErrorMessage, Severity};
use cavil_match::{match_str, simple_match};

use crate::check::{Check, CheckContext};

const LOOP_BOUND_PATTERN: &str = "; %var% <= %var% . size ( ) ;";

pub struct StlOutOfBounds;

impl Check for StlOutOfBounds {
    fn id(&self) -> &'static str {
        "stlOutOfBounds"
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();

        for tok in tokens.iter() {
            if tokens.get(tok).text != "for" || tokens.str_at(tok, 1) != Some("(") {
                continue;
            }

            let Some(cond_start) = tokens.tok_at(tok, 2) else { continue };
            let mut indent = 0i32;
            let mut cur = Some(cond_start);

            while let Some(id) = cur {
                let text = tokens.get(id).text.clone();
                if text == "(" {
                    indent += 1;
                } else if text == ")" {
                    if indent == 0 {
                        break;
                    }
                    indent -= 1;
                }

                // ; %var% <= %var% . size ( ) ;
                if text == ";" && match_str(tokens, id, LOOP_BOUND_PATTERN, 0).unwrap_or(false) {
                    let num_tok = tokens.tok_at(id, 1).unwrap();
                    let container_tok = tokens.tok_at(id, 3).unwrap();
                    let num_name = tokens.get(num_tok).text.clone();
                    let container_name = tokens.get(container_tok).text.clone();

                    let Some(body_scan_start) = tokens.tok_at(id, 8) else { break };
                    let size_check = format!("{container_name} . size");
                    let index_access = format!("{container_name} [ {num_name} ]");
                    let mut indent2 = 0i32;
                    let mut cur3 = tokens.next(body_scan_start);
                    while let Some(id3) = cur3 {
                        let text3 = tokens.get(id3).text.clone();
                        if text3 == "{" {
                            indent2 += 1;
                        } else if text3 == "}" {
                            if indent2 <= 1 {
                                break;
                            }
                            indent2 -= 1;
                        } else if text3 == container_name {
                            if simple_match(tokens, id3, &size_check) {
                                break;
                            }
                            if simple_match(tokens, id3, &index_access) {
                                out.push(ctx.report(
                                    id3,
                                    Severity::Error,
                                    "stlOutOfBounds",
                                    format!("When {num_name}=={container_name}.size(), {container_name}[{num_name}] is out of bounds"),
                                ));
                            }
                        }
                        cur3 = tokens.next(id3);
                    }
                    break;
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

    fn run(src: &str) -> Vec<ErrorMessage> {
        let tokens = tokenize(src, 0).unwrap();
        let db = SymbolDatabase::build(&tokens);
        let settings = Settings::default();
        let ctx = CheckContext::new(&tokens, &db, &settings, "a.cpp");
        StlOutOfBounds.run_checks(&ctx)
    }

    #[test]
    fn flags_off_by_one_loop_bound() {
        let out = run("for ( i = 0 ; i <= v . size ( ) ; ++ i ) { x = v [ i ] ; }");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "stlOutOfBounds");
        assert!(out[0].short_message.contains("i==v.size()"));
    }

    #[test]
    fn correct_bound_is_not_flagged() {
        let out = run("for ( i = 0 ; i < v . size ( ) ; ++ i ) { x = v [ i ] ; }");
        assert!(out.is_empty());
    }

    #[test]
    fn a_subsequent_size_call_clears_the_finding() {
        let out = run("for ( i = 0 ; i <= v . size ( ) ; ++ i ) { n = v . size ( ) ; x = v [ i ] ; }");
        assert!(out.is_empty());
    }
}
