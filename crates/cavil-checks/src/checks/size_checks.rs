//! `redundantIfRemove` and `uselessCallsSize`, grounded in
//! `CheckStl::redundantCondition` and `CheckStl::size`
//! (original_source/lib/checkstl.cpp).

use cavil_diagnostics::{ErrorMessage, Severity};
use cavil_match::match_str;

use crate::check::{Check, CheckContext};

const REDUNDANT_IF_REMOVE_PATTERN: &str =
    "if ( %var% . find ( %any% ) != %var% . end ( ) ) { %var% . remove ( %any% ) ; }";

/// `redundantIfRemove`: `if (c.find(x) != c.end()) { c.remove(x); }` where
/// `remove` is a no-op when `x` isn't present, making the guard redundant.
pub struct RedundantIfRemove;

impl Check for RedundantIfRemove {
    fn id(&self) -> &'static str {
        "redundantIfRemove"
    }

    fn is_style_check(&self) -> bool {
        true
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();

        for tok in tokens.iter() {
            if !match_str(tokens, tok, REDUNDANT_IF_REMOVE_PATTERN, 0).unwrap_or(false) {
                continue;
            }
            let var1 = tokens.tok_at(tok, 2).unwrap();
            let any1 = tokens.tok_at(tok, 6).unwrap();
            let var2 = tokens.tok_at(tok, 9).unwrap();
            let var3 = tokens.tok_at(tok, 16).unwrap();
            let any2 = tokens.tok_at(tok, 20).unwrap();

            let name1 = &tokens.get(var1).text;
            let name2 = &tokens.get(var2).text;
            let name3 = &tokens.get(var3).text;
            if name1 == name2 && name2 == name3 && tokens.get(any1).text == tokens.get(any2).text {
                out.push(ctx.report(
                    tok,
                    Severity::Style,
                    "redundantIfRemove",
                    "Redundant checking of STL container element.\nThe remove method in the STL will not do anything if element doesn't exist",
                ));
            }
        }

        out
    }
}

/// `uselessCallsSize`: `c.size()` compared against `0` where `c.empty()`
/// says the same thing without the (possibly linear-time) size computation.
pub struct UselessCallsSize;

impl Check for UselessCallsSize {
    fn id(&self) -> &'static str {
        "uselessCallsSize"
    }

    fn is_style_check(&self) -> bool {
        true
    }

    fn is_inconclusive(&self) -> bool {
        true
    }

    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();

        for tok in tokens.iter() {
            if !match_str(tokens, tok, "%var% . size ( ) ==|!=|> 0", 0).unwrap_or(false) {
                continue;
            }

            let varname = tokens.get(tok).text.clone();
            out.push(ctx.report(
                tok,
                Severity::Performance,
                "uselessCallsSize",
                format!(
                    "Possible inefficient checking for '{varname}' emptiness.\nUsing {varname}.empty() instead of {varname}.size() can be faster. {varname}.size() can take linear time but {varname}.empty() is guaranteed to take constant time."
                ),
            ));
        }

        out
    }
}
