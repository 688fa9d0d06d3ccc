//! `ErrorMessage`: a structured diagnostic with its wire serialization.
//!
//! The wire format is a direct port of cppcheck's
//! `ErrorLogger::ErrorMessage::serialize`/`deserialize`: a sequence of
//! length-prefixed fields, `LEN " " TEXT`, where `TEXT` is read as exactly
//! `LEN` raw bytes regardless of content (so a field's payload may itself
//! contain spaces, digits, or anything else). Only `(id, severity,
//! short-message, call-stack)` round-trip — the verbose message is derived
//! from the short one on the way back in, exactly as the original only
//! ever serializes the short form.

use std::fmt;

use crate::severity::Severity;

/// One frame of a diagnostic's call stack: a source line in a file.
/// Call stacks are ordered outermost-first, deepest last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileLocation {
    pub file: String,
    pub line: u32,
}

impl FileLocation {
    pub fn new(file: impl Into<String>, line: u32) -> Self {
        FileLocation {
            file: file.into(),
            line,
        }
    }
}

/// A structured finding: stable id, severity, short/verbose message text,
/// and the call stack that located it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorMessage {
    pub id: String,
    pub severity: Severity,
    pub short_message: String,
    pub verbose_message: String,
    pub call_stack: Vec<FileLocation>,
}

impl ErrorMessage {
    /// Builds a message from unsplit text, matching cppcheck's `setmsg`:
    /// the text up to the first `\n` is the short message, and everything
    /// after is the verbose message. With no `\n`, both coincide.
    pub fn new(call_stack: Vec<FileLocation>, severity: Severity, msg: &str, id: impl Into<String>) -> Self {
        let (short_message, verbose_message) = match msg.find('\n') {
            Some(pos) => (msg[..pos].to_string(), msg[pos + 1..].to_string()),
            None => (msg.to_string(), msg.to_string()),
        };
        ErrorMessage {
            id: id.into(),
            severity,
            short_message,
            verbose_message,
            call_stack,
        }
    }

    /// The deepest call-stack frame, if any — the location most renderers
    /// attribute the diagnostic to.
    pub fn innermost(&self) -> Option<&FileLocation> {
        self.call_stack.last()
    }

    pub fn serialize(&self) -> String {
        let mut out = String::new();
        push_field(&mut out, &self.id);
        push_field(&mut out, self.severity.as_str());
        push_field(&mut out, &self.short_message);
        out.push_str(&self.call_stack.len().to_string());
        out.push(' ');
        for loc in &self.call_stack {
            let frame = format!("{}:{}", loc.line, loc.file);
            push_field(&mut out, &frame);
        }
        out
    }

    pub fn deserialize(data: &str) -> Result<ErrorMessage, DeserializeError> {
        let bytes = data.as_bytes();
        let mut pos = 0usize;

        let id = read_field(bytes, &mut pos)?;
        let severity_text = read_field(bytes, &mut pos)?;
        let short_message = read_field(bytes, &mut pos)?;
        let stack_len = read_len(bytes, &mut pos)?;

        let mut call_stack = Vec::with_capacity(stack_len);
        for _ in 0..stack_len {
            let frame = read_field(bytes, &mut pos)?;
            let (line_text, file) = frame
                .split_once(':')
                .ok_or(DeserializeError::MalformedFrame)?;
            let line: u32 = line_text.parse().map_err(|_| DeserializeError::MalformedFrame)?;
            call_stack.push(FileLocation::new(file, line));
        }

        Ok(ErrorMessage {
            id,
            severity: Severity::from_str_lenient(&severity_text),
            verbose_message: short_message.clone(),
            short_message,
            call_stack,
        })
    }
}

fn push_field(out: &mut String, text: &str) {
    out.push_str(&text.len().to_string());
    out.push(' ');
    out.push_str(text);
}

/// A field is `LEN` (ASCII decimal), one separating space, then exactly
/// `LEN` raw bytes. Reads the length, skips the space, and returns the
/// payload as a `String` (the wire format assumes UTF-8 text throughout).
fn read_len(bytes: &[u8], pos: &mut usize) -> Result<usize, DeserializeError> {
    let start = *pos;
    while *pos < bytes.len() && bytes[*pos].is_ascii_digit() {
        *pos += 1;
    }
    if *pos == start {
        return Err(DeserializeError::Truncated);
    }
    let len: usize = std::str::from_utf8(&bytes[start..*pos])
        .unwrap()
        .parse()
        .map_err(|_| DeserializeError::Truncated)?;
    if *pos >= bytes.len() || bytes[*pos] != b' ' {
        return Err(DeserializeError::Truncated);
    }
    *pos += 1;
    Ok(len)
}

fn read_field(bytes: &[u8], pos: &mut usize) -> Result<String, DeserializeError> {
    let len = read_len(bytes, pos)?;
    if *pos + len > bytes.len() {
        return Err(DeserializeError::Truncated);
    }
    let field = std::str::from_utf8(&bytes[*pos..*pos + len])
        .map_err(|_| DeserializeError::Truncated)?
        .to_string();
    *pos += len;
    Ok(field)
}

/// A diagnostic's serialized form is trusted, internally generated data
/// (either our own worker pipe, or a round-trip test) — this only exists
/// to reject truncated or corrupt input cleanly rather than panicking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeserializeError {
    Truncated,
    MalformedFrame,
}

impl fmt::Display for DeserializeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeserializeError::Truncated => write!(f, "truncated diagnostic frame"),
            DeserializeError::MalformedFrame => write!(f, "malformed call-stack frame"),
        }
    }
}

impl std::error::Error for DeserializeError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ErrorMessage {
        ErrorMessage::new(
            vec![
                FileLocation::new("a.cpp", 3),
                FileLocation::new("a.cpp", 10),
            ],
            Severity::Error,
            "Dereference of an iterator that has been invalidated",
            "eraseDereference",
        )
    }

    #[test]
    fn setmsg_splits_short_and_verbose_on_first_newline() {
        let m = ErrorMessage::new(vec![], Severity::Warning, "short\nverbose detail", "x");
        assert_eq!(m.short_message, "short");
        assert_eq!(m.verbose_message, "verbose detail");
    }

    #[test]
    fn setmsg_with_no_newline_coincides() {
        let m = ErrorMessage::new(vec![], Severity::Warning, "just one line", "x");
        assert_eq!(m.short_message, "just one line");
        assert_eq!(m.verbose_message, "just one line");
    }

    #[test]
    fn serialize_deserialize_round_trips_identity_fields() {
        let m = sample();
        let wire = m.serialize();
        let back = ErrorMessage::deserialize(&wire).unwrap();
        assert_eq!(back.id, m.id);
        assert_eq!(back.severity, m.severity);
        assert_eq!(back.short_message, m.short_message);
        assert_eq!(back.call_stack, m.call_stack);
    }

    #[test]
    fn deserialize_derives_verbose_from_short_only() {
        let mut m = sample();
        m.verbose_message = "a longer explanation the wire format never carries".to_string();
        let wire = m.serialize();
        let back = ErrorMessage::deserialize(&wire).unwrap();
        assert_eq!(back.verbose_message, back.short_message);
        assert_ne!(back.verbose_message, m.verbose_message);
    }

    #[test]
    fn round_trips_an_empty_call_stack() {
        let m = ErrorMessage::new(vec![], Severity::Style, "no location", "bareId");
        let wire = m.serialize();
        let back = ErrorMessage::deserialize(&wire).unwrap();
        assert_eq!(back.call_stack, vec![]);
    }

    #[test]
    fn deserialize_rejects_truncated_input() {
        assert!(ErrorMessage::deserialize("5 abc").is_err());
        assert!(ErrorMessage::deserialize("").is_err());
    }

    #[test]
    fn innermost_is_the_last_stack_frame() {
        let m = sample();
        assert_eq!(m.innermost().unwrap().line, 10);
    }
}
