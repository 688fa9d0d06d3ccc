//! Diagnostic severity: a tag, not an ordering.

use std::fmt;

/// spec.md §3 is explicit that severities are not totally ordered — they
/// classify a diagnostic, they don't rank it. Don't derive `PartialOrd`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    None,
    Debug,
    Style,
    Performance,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::None => "none",
            Severity::Debug => "debug",
            Severity::Style => "style",
            Severity::Performance => "performance",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }

    /// Parses the canonical string form. Unknown input maps to `None`,
    /// matching cppcheck's `Severity::fromString` behavior of falling back
    /// to the default severity rather than failing.
    pub fn from_str_lenient(text: &str) -> Severity {
        match text {
            "debug" => Severity::Debug,
            "style" => Severity::Style,
            "performance" => Severity::Performance,
            "warning" => Severity::Warning,
            "error" => Severity::Error,
            _ => Severity::None,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_every_canonical_string() {
        for s in [
            Severity::None,
            Severity::Debug,
            Severity::Style,
            Severity::Performance,
            Severity::Warning,
            Severity::Error,
        ] {
            assert_eq!(Severity::from_str_lenient(s.as_str()), s);
        }
    }

    #[test]
    fn unknown_text_falls_back_to_none() {
        assert_eq!(Severity::from_str_lenient("bogus"), Severity::None);
    }
}
