//! The generic execution-path engine (spec.md §4.7): a fixed-point driver
//! for intra-procedural, per-variable flow analysis, used by checks that
//! need more than syntactic pattern matching (iterator invalidation,
//! uninitialized-member tracking, ...).
//!
//! spec.md §9 prefers a trait-per-check encoding over the original's
//! runtime type tests on a common base class; [`ExecutionPath`] is that
//! trait, and [`check_scope`] is the generic driver over it.

use cavil_diagnostics::ErrorMessage;
use cavil_tokens::{TokenId, TokenList};

/// What a single `parse` step decided to do with its path.
pub enum ParseOutcome {
    /// Keep this path alive; resume scanning from the given token.
    Continue(TokenId),
    /// Remove this path from further consideration (the per-check
    /// equivalent of `bailOutVar` — this path stops tracking its
    /// variable, but other paths are unaffected).
    BailOut,
}

/// Per-variable flow state a check tracks through a scope.
///
/// `Clone` supplies `copy()` (paths are duplicated at branch points);
/// [`ExecutionPath::is_equal`] is used to collapse equivalent paths at
/// joins so the state space stays finite.
pub trait ExecutionPath: Clone {
    /// Inspects one non-control token, possibly mutating this path's
    /// state. Returning [`ParseOutcome::BailOut`] drops this path; note
    /// that `token` itself is always `id` on entry regardless of outcome —
    /// `parse` does not skip ahead on a normal step (the driver advances
    /// one token at a time outside of explicit branch handling).
    fn parse(&mut self, tokens: &TokenList, token: TokenId, out: &mut Vec<ErrorMessage>) -> ParseOutcome;

    /// Inspects the first token of an `if`/`while`/`for`/`switch`
    /// condition. Returning `true` bails out *every* path tracked in this
    /// scope (not just this one) — used when a condition makes the whole
    /// analysis unreliable from this point on.
    fn parse_condition(&mut self, tokens: &TokenList, first_condition_token: TokenId) -> bool {
        let _ = (tokens, first_condition_token);
        false
    }

    /// Called once when the enclosing scope closes, for a check to emit
    /// any diagnostics that depend on having reached the end of the scope
    /// without a disqualifying event.
    fn end(&self, tokens: &TokenList, scope_end: TokenId, out: &mut Vec<ErrorMessage>) {
        let _ = (tokens, scope_end, out);
    }

    fn is_equal(&self, other: &Self) -> bool;
}

fn dedup_paths<P: ExecutionPath>(paths: Vec<P>) -> Vec<P> {
    let mut out: Vec<P> = Vec::with_capacity(paths.len());
    for p in paths {
        if !out.iter().any(|kept| kept.is_equal(&p)) {
            out.push(p);
        }
    }
    out
}

/// Walks `[start, scope_end)` driving every path in `paths` through
/// [`ExecutionPath::parse`], splitting at branches, merging (by dedup) at
/// the point a branch's body ends, and bailing out on `break`/`goto`/
/// `return`. Finalizes by calling [`ExecutionPath::end`] on whatever paths
/// remain live when `scope_end` is reached.
///
/// Terminates because the token stream is finite and every step advances
/// by at least one token: no back-edges are walked twice.
pub fn check_scope<P: ExecutionPath>(tokens: &TokenList, start: TokenId, scope_end: TokenId, mut paths: Vec<P>) -> Vec<ErrorMessage> {
    let mut out = Vec::new();
    let mut cur = Some(start);

    while let Some(id) = cur.filter(|&id| id != scope_end) {
        if paths.is_empty() {
            break;
        }

        let text = tokens.get(id).text.clone();

        if matches!(text.as_str(), "if" | "while" | "for" | "switch") {
            if let Some(next_cur) = branch_into(tokens, id, &mut paths, &mut out) {
                cur = Some(next_cur);
                continue;
            }
        }

        if matches!(text.as_str(), "break" | "goto" | "return") {
            paths.clear();
            cur = tokens.next(id);
            continue;
        }

        let mut next_pos = None;
        let mut kept = Vec::with_capacity(paths.len());
        for mut path in paths.drain(..) {
            match path.parse(tokens, id, &mut out) {
                ParseOutcome::Continue(next) => {
                    next_pos = Some(next);
                    kept.push(path);
                }
                ParseOutcome::BailOut => {}
            }
        }
        paths = dedup_paths(kept);
        cur = next_pos.or_else(|| tokens.next(id));
    }

    for path in &paths {
        path.end(tokens, scope_end, &mut out);
    }
    out
}

/// Handles one `if`/`while`/`for`/`switch`: evaluates
/// `parse_condition` against every path, and if the controlled statement
/// is a `{ ... }` block, recurses `check_scope` over a copy of the
/// surviving paths for that block. Returns the token to resume the
/// *outer* scan from (just past the controlled statement), or `None` if
/// the shape wasn't a recognizable `KEYWORD ( ... ) { ... }`/`KEYWORD ( ... ) STMT`.
fn branch_into<P: ExecutionPath>(
    tokens: &TokenList,
    keyword: TokenId,
    paths: &mut Vec<P>,
    out: &mut Vec<ErrorMessage>,
) -> Option<TokenId> {
    let paren = tokens.next(keyword).filter(|&p| tokens.get(p).text == "(")?;
    let close = tokens.link(paren)?;
    let cond_first = tokens.next(paren)?;

    if cond_first != close {
        let bail_all = paths.iter_mut().any(|p| p.parse_condition(tokens, cond_first));
        if bail_all {
            paths.clear();
            return tokens.next(close);
        }
    }

    let after_cond = tokens.next(close)?;
    if tokens.get(after_cond).text == "{" {
        let body_end = tokens.link(after_cond)?;
        let body_start = tokens.next(after_cond).unwrap_or(body_end);
        let branch_paths: Vec<P> = paths.iter().map(Clone::clone).collect();
        out.extend(check_scope(tokens, body_start, body_end, branch_paths));
        tokens.next(body_end)
    } else {
        // A single-statement (unbraced) body: walk it as its own
        // pseudo-scope up to the next ';'.
        let mut stmt_end = after_cond;
        while tokens.get(stmt_end).text != ";" {
            stmt_end = tokens.next(stmt_end)?;
        }
        let branch_paths: Vec<P> = paths.iter().map(Clone::clone).collect();
        out.extend(check_scope(tokens, after_cond, stmt_end, branch_paths));
        tokens.next(stmt_end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavil_tokens::fixture::tokenize;

    /// Counts how many times a literal token appears along the paths that
    /// reach the end of the scope, bailing a path out the moment it sees
    /// `"poison"`.
    #[derive(Clone)]
    struct CountsToken {
        target: String,
        seen: u32,
    }

    impl ExecutionPath for CountsToken {
        fn parse(&mut self, tokens: &TokenList, token: TokenId, _out: &mut Vec<ErrorMessage>) -> ParseOutcome {
            let text = &tokens.get(token).text;
            if text == "poison" {
                return ParseOutcome::BailOut;
            }
            if *text == self.target {
                self.seen += 1;
            }
            ParseOutcome::Continue(tokens.next(token).unwrap_or(token))
        }

        fn is_equal(&self, other: &Self) -> bool {
            self.seen == other.seen
        }
    }

    /// A scope end exclusive of the whole stream: one past the last token,
    /// which `check_scope` treats the same as "run off the end".
    fn end_of_stream(list: &TokenList) -> TokenId {
        let last = list.iter().last().unwrap();
        list.next(last).unwrap_or(last)
    }

    #[test]
    fn walks_straight_line_code() {
        let list = tokenize("x ; target ; target ;", 0).unwrap();
        let path = CountsToken {
            target: "target".to_string(),
            seen: 0,
        };
        let front = list.front().unwrap();
        let out = check_scope(&list, front, end_of_stream(&list), vec![path]);
        assert!(out.is_empty());
    }

    #[test]
    fn bails_out_on_break_return_goto() {
        let list = tokenize("return ; target ;", 0).unwrap();
        let path = CountsToken {
            target: "target".to_string(),
            seen: 0,
        };
        let front = list.front().unwrap();
        check_scope(&list, front, end_of_stream(&list), vec![path]);
    }

    #[test]
    fn branches_into_an_if_body_and_continues_after() {
        let list = tokenize("if ( c ) { target ; } target ;", 0).unwrap();
        let path = CountsToken {
            target: "target".to_string(),
            seen: 0,
        };
        let front = list.front().unwrap();
        let out = check_scope(&list, front, end_of_stream(&list), vec![path]);
        assert!(out.is_empty());
    }
}
