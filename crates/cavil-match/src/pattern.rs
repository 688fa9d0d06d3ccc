//! Precompiled representation of a pattern string.
//!
//! A pattern is whitespace-separated elements; each element is compiled once
//! into a [`PatternElement`] so that repeated calls to `Match`/`findmatch`
//! against the same pattern never re-parse it. This is the precompile
//! strategy spec.md §9 calls out as preferable to interpreting the DSL
//! token-by-token on every call.

use std::fmt;

/// One alternative within a pattern element — the thing that either equals
/// a token's text, or tests one of the meta-token predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Atom {
    Literal(String),
    Var,
    Type,
    Num,
    Any,
    VarId,
    Negation(String),
    CharClass(Vec<char>),
}

impl Atom {
    fn parse(text: &str) -> Atom {
        match text {
            "%var%" => Atom::Var,
            "%type%" => Atom::Type,
            "%num%" => Atom::Num,
            "%any%" => Atom::Any,
            "%varid%" => Atom::VarId,
            _ if text.starts_with("!!") => Atom::Negation(text[2..].to_string()),
            _ if text.starts_with('[') && text.ends_with(']') && text.len() >= 2 => {
                Atom::CharClass(text[1..text.len() - 1].chars().collect())
            }
            _ => Atom::Literal(text.to_string()),
        }
    }
}

/// A single whitespace-delimited pattern element: one or more alternatives
/// (`a|b|c`), and whether the element may be skipped entirely when none of
/// its alternatives match the current token (a trailing `|`).
#[derive(Debug, Clone)]
pub struct PatternElement {
    pub(crate) alternatives: Vec<Atom>,
    pub(crate) optional: bool,
}

impl PatternElement {
    fn parse(text: &str) -> PatternElement {
        let (body, optional) = match text.strip_suffix('|') {
            Some(rest) => (rest, true),
            None => (text, false),
        };
        let alternatives = if body.is_empty() {
            // A bare trailing "|" with nothing before it: an element that
            // always counts as satisfied without consuming text.
            vec![Atom::Literal(String::new())]
        } else {
            body.split('|').map(Atom::parse).collect()
        };
        PatternElement {
            alternatives,
            optional,
        }
    }
}

/// Error compiling a pattern string. The closed element set in spec.md §4.2
/// never fails to parse — every other substring is a literal — so this
/// exists only to reject the one genuinely ill-formed case: an empty
/// pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternError {
    message: String,
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for PatternError {}

/// A compiled pattern, ready to be matched against a token stream as many
/// times as needed.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub(crate) elements: Vec<PatternElement>,
}

impl Pattern {
    pub fn compile(pattern: &str) -> Result<Pattern, PatternError> {
        let elements: Vec<PatternElement> = pattern.split_whitespace().map(PatternElement::parse).collect();
        if elements.is_empty() {
            return Err(PatternError {
                message: "pattern must contain at least one element".to_string(),
            });
        }
        Ok(Pattern { elements })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_elements() {
        let p = Pattern::compile("void f (").unwrap();
        assert_eq!(p.elements.len(), 3);
        assert_eq!(p.elements[0].alternatives, vec![Atom::Literal("void".into())]);
    }

    #[test]
    fn parses_meta_tokens() {
        let p = Pattern::compile("%type% %var% = %num%").unwrap();
        assert_eq!(p.elements[0].alternatives, vec![Atom::Type]);
        assert_eq!(p.elements[1].alternatives, vec![Atom::Var]);
        assert_eq!(p.elements[3].alternatives, vec![Atom::Num]);
    }

    #[test]
    fn parses_alternation_and_optional_suffix() {
        let p = Pattern::compile("const| %type%").unwrap();
        assert!(p.elements[0].optional);
        assert_eq!(p.elements[0].alternatives, vec![Atom::Literal("const".into())]);

        let p = Pattern::compile("public|private|protected").unwrap();
        assert!(!p.elements[0].optional);
        assert_eq!(p.elements[0].alternatives.len(), 3);
    }

    #[test]
    fn parses_negation_and_character_class() {
        let p = Pattern::compile("!!void [;,]").unwrap();
        assert_eq!(p.elements[0].alternatives, vec![Atom::Negation("void".into())]);
        assert_eq!(
            p.elements[1].alternatives,
            vec![Atom::CharClass(vec![';', ','])]
        );
    }

    #[test]
    fn rejects_empty_pattern() {
        assert!(Pattern::compile("").is_err());
        assert!(Pattern::compile("   ").is_err());
    }
}
