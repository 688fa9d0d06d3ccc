//! The check framework (spec.md §4.5): the context a check runs against,
//! the `Check` trait every check implements, and the registry the core
//! enumerates per file.
//!
//! The original self-registers checks via file-scope static initializers.
//! spec.md §9 recommends explicit registration instead, which is both
//! simpler to reason about and avoids relying on C++-only linker tricks;
//! [`register_all`] is that explicit registration point.

use cavil_diagnostics::{ErrorMessage, FileLocation, Severity};
use cavil_symbols::SymbolDatabase;
use cavil_tokens::{TokenId, TokenList};

use crate::settings::Settings;

/// Everything a check needs: the token stream, the symbol database built
/// over it, the active settings, and the name of the file being analyzed
/// (used to build a diagnostic's call stack).
pub struct CheckContext<'a> {
    pub tokens: &'a TokenList,
    pub symbols: &'a SymbolDatabase,
    pub settings: &'a Settings,
    pub file_name: &'a str,
}

impl<'a> CheckContext<'a> {
    pub fn new(tokens: &'a TokenList, symbols: &'a SymbolDatabase, settings: &'a Settings, file_name: &'a str) -> Self {
        CheckContext {
            tokens,
            symbols,
            settings,
            file_name,
        }
    }

    /// Builds a diagnostic whose call stack is the single location of
    /// `token`.
    pub fn report(&self, token: TokenId, severity: Severity, id: &str, message: impl Into<String>) -> ErrorMessage {
        let line = self.tokens.get(token).line;
        ErrorMessage::new(
            vec![FileLocation::new(self.file_name.to_string(), line)],
            severity,
            &message.into(),
            id.to_string(),
        )
    }

    /// Builds a diagnostic with a multi-frame call stack (outermost first,
    /// deepest last), for checks that push enclosing context (e.g. the
    /// constructor a missing member-initialization was found in).
    pub fn report_stack(
        &self,
        stack_tokens: &[TokenId],
        severity: Severity,
        id: &str,
        message: impl Into<String>,
    ) -> ErrorMessage {
        let call_stack = stack_tokens
            .iter()
            .map(|&t| FileLocation::new(self.file_name.to_string(), self.tokens.get(t).line))
            .collect();
        ErrorMessage::new(call_stack, severity, &message.into(), id.to_string())
    }
}

/// A named, re-entrant analysis component. Implementors hold no mutable
/// state between calls — every run is given a fresh [`CheckContext`].
pub trait Check: Send + Sync {
    fn id(&self) -> &'static str;

    /// Runs against the raw (pre-simplification) token stream. Most checks
    /// only need this phase; spec.md's post-simplification phase exists
    /// for checks that depend on a simplified stream, which this core does
    /// not produce (simplification is part of the excluded front end).
    fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let _ = ctx;
        Vec::new()
    }

    fn run_simplified_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let _ = ctx;
        Vec::new()
    }

    /// Whether this check requires `--enable=style` (or is always-on).
    /// Pure correctness checks (`eraseDereference`, `uninitMemberVar`, ...)
    /// are always on; lint-ish style checks respect
    /// `Settings::check_coding_style`.
    fn is_style_check(&self) -> bool {
        false
    }

    /// Whether this check has a higher false-positive rate and should only
    /// run under `Settings::inconclusive`.
    fn is_inconclusive(&self) -> bool {
        false
    }
}

/// The process-wide set of checks the core runs for each input file.
pub struct CheckRegistry {
    checks: Vec<Box<dyn Check>>,
}

impl CheckRegistry {
    pub fn new() -> Self {
        CheckRegistry { checks: Vec::new() }
    }

    pub fn register(&mut self, check: Box<dyn Check>) {
        self.checks.push(check);
    }

    pub fn checks(&self) -> &[Box<dyn Check>] {
        &self.checks
    }

    /// Runs every registered check against `ctx`, gating style and
    /// inconclusive checks on the matching settings, and concatenating
    /// diagnostics in registration order (spec.md §5: "check order is
    /// registration order").
    pub fn run_all(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
        let mut out = Vec::new();
        for check in &self.checks {
            if check.is_style_check() && !ctx.settings.check_coding_style {
                continue;
            }
            if check.is_inconclusive() && !ctx.settings.inconclusive {
                continue;
            }
            out.extend(check.run_checks(ctx));
            out.extend(check.run_simplified_checks(ctx));
        }
        out
    }
}

impl Default for CheckRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds the registry with every concrete check from spec.md §4.9 wired
/// in, in a fixed order.
pub fn register_all() -> CheckRegistry {
    let mut registry = CheckRegistry::new();
    crate::checks::register(&mut registry);
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Noop;
    impl Check for Noop {
        fn id(&self) -> &'static str {
            "noop"
        }
    }

    struct StyleOnly;
    impl Check for StyleOnly {
        fn id(&self) -> &'static str {
            "styleOnly"
        }
        fn run_checks(&self, ctx: &CheckContext) -> Vec<ErrorMessage> {
            vec![ctx.report(ctx.tokens.front().unwrap(), Severity::Style, "styleOnly", "style finding")]
        }
        fn is_style_check(&self) -> bool {
            true
        }
    }

    #[test]
    fn run_all_concatenates_in_registration_order() {
        let tokens = cavil_tokens::fixture::tokenize("int x;", 0).unwrap();
        let db = SymbolDatabase::build(&tokens);
        let mut settings = Settings::default();
        settings.check_coding_style = true;
        let ctx = CheckContext::new(&tokens, &db, &settings, "a.cpp");

        let mut registry = CheckRegistry::new();
        registry.register(Box::new(Noop));
        registry.register(Box::new(StyleOnly));
        let out = registry.run_all(&ctx);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "styleOnly");
    }

    #[test]
    fn style_checks_are_gated_by_check_coding_style() {
        let tokens = cavil_tokens::fixture::tokenize("int x;", 0).unwrap();
        let db = SymbolDatabase::build(&tokens);
        let settings = Settings::default();
        let ctx = CheckContext::new(&tokens, &db, &settings, "a.cpp");

        let mut registry = CheckRegistry::new();
        registry.register(Box::new(StyleOnly));
        assert!(registry.run_all(&ctx).is_empty());
    }
}
