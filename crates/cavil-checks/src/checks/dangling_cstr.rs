//! `danglingTemporaryLifetime`, grounded in `CheckStl::string_c_str`
//! (original_source/lib/checkstl.cpp), renamed from the original's
//! `stlcstr` id to name what the diagnostic is actually about rather than
//! the specific API (`c_str`) that happens to trigger it.
//!
//! `std::ostringstream::str()` returns a `std::string` by value; calling
//! `.c_str()` on that temporary yields a pointer into a buffer that is
//! freed the moment the full expression ends. Storing, returning, or
//! throwing that pointer is a dangling-pointer bug on the next line.

use cavil_diagnostics::{ErrorMessage, Severity};
use cavil_match::{match_str, simple_match};

use crate::check::{Check, CheckContext};

const STR_C_STR_PATTERN: &str = "str ( ) . c_str ( )";

pub struct DanglingTemporaryLifetime;

impl Check for DanglingTemporaryLifetime {
    fn id(&self) -> &'static str {
        "danglingTemporaryLifetime"
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();

        for tok in tokens.iter() {
            // IDENT = EXPR . str ( ) . c_str ( ) ;  -- the pointer is kept
            // past the statement that produced the temporary.
            if match_str(tokens, tok, "%var% =", 0).unwrap_or(false) {
                if let Some(str_tok) = find_dot_str_c_str(tokens, tok) {
                    out.push(report_dangling(ctx, str_tok));
                    continue;
                }
            }

            // throw EXPR . c_str ( ) ; -- thrown pointer outlives the
            // temporary its string came from.
            if match_str(tokens, tok, "throw %var% . c_str ( )", 0).unwrap_or(false) {
                let owner = tokens.tok_at(tok, 1).unwrap();
                out.push(report_dangling(ctx, owner));
            }
        }

        out
    }
}

/// If `assign` is the `=` target of `IDENT = ... . str ( ) . c_str ( ) ;`,
/// returns the `str` token (used as the diagnostic's anchor, matching the
/// point the temporary is produced).
fn find_dot_str_c_str(tokens: &cavil_tokens::TokenList, ident: cavil_tokens::TokenId) -> Option<cavil_tokens::TokenId> {
    let mut cur = tokens.tok_at(ident, 2)?;
    loop {
        if tokens.get(cur).text == ";" {
            return None;
        }
        if simple_match(tokens, cur, STR_C_STR_PATTERN) {
            return Some(cur);
        }
        cur = tokens.next(cur)?;
    }
}

fn report_dangling(ctx: &CheckContext, token: cavil_tokens::TokenId) -> ErrorMessage {
    ctx.report(token, Severity::Error, "danglingTemporaryLifetime", "Dangerous usage of c_str()")
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
        DanglingTemporaryLifetime.run_checks(&ctx)
    }

    #[test]
    fn flags_pointer_kept_from_a_stream_str_temporary() {
        let out = run("p = oss . str ( ) . c_str ( ) ;");
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "danglingTemporaryLifetime");
    }

    #[test]
    fn flags_throwing_the_c_str_of_a_temporary() {
        let out = run("throw msg . c_str ( ) ;");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn a_direct_string_reference_is_fine() {
        let out = run("p = s . c_str ( ) ;");
        assert!(out.is_empty());
    }
}
