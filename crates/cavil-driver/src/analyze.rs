//! One file, start to finish: tokenize, build the symbol database, and run
//! every registered check over it. The only failure mode is a malformed
//! token stream (an unmatched bracket) — checks themselves never fail,
//! they only ever produce diagnostics.

use cavil_checks::{CheckContext, CheckRegistry, Settings};
use cavil_diagnostics::ErrorMessage;
use cavil_symbols::SymbolDatabase;
use cavil_tokens::fixture::tokenize;
use cavil_tokens::TokenStreamError;

/// One file's source text, paired with the name diagnostics should carry.
#[derive(Debug, Clone)]
pub struct AnalysisUnit {
    pub file_name: String,
    pub source: String,
}

impl AnalysisUnit {
    pub fn new(file_name: impl Into<String>, source: impl Into<String>) -> Self {
        AnalysisUnit {
            file_name: file_name.into(),
            source: source.into(),
        }
    }
}

pub fn analyze_unit(
    unit: &AnalysisUnit,
    checks: &CheckRegistry,
    settings: &Settings,
) -> Result<Vec<ErrorMessage>, TokenStreamError> {
    let tokens = tokenize(&unit.source, 0)?;
    let symbols = SymbolDatabase::build(&tokens);
    let ctx = CheckContext::new(&tokens, &symbols, settings, &unit.file_name);
    Ok(checks.run_all(&ctx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cavil_checks::register_all;

    #[test]
    fn analyzes_a_unit_and_returns_its_diagnostics() {
        let checks = register_all();
        let settings = Settings::default();
        let unit = AnalysisUnit::new("a.cpp", "class C { public: C ( ) { } int a ; } ;");
        let out = analyze_unit(&unit, &checks, &settings).unwrap();
        assert!(out.iter().any(|m| m.id == "uninitMemberVar"));
    }

    #[test]
    fn an_unmatched_brace_is_a_fatal_token_stream_error() {
        let checks = register_all();
        let settings = Settings::default();
        let unit = AnalysisUnit::new("a.cpp", "void f ( ) { ");
        assert!(analyze_unit(&unit, &checks, &settings).is_err());
    }
}
