//! XML rendering, versions 1 (legacy single-line) and 2 (nested
//! `<location>` children), grounded in cppcheck's `ErrorMessage::toXML`.

use crate::message::ErrorMessage;
use crate::severity::Severity;

/// Escapes the five characters cppcheck's `stringToXml` escapes. Note `'\n'`
/// becomes the numeric entity `&#xa;`, not a literal newline — XML renders
/// every diagnostic as attribute text, which can't carry raw newlines.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\n' => out.push_str("&#xa;"),
            other => out.push(other),
        }
    }
    out
}

pub fn header(version: u8) -> String {
    if version > 1 {
        format!("<?xml version=\"1.0\"?>\n<results version=\"{version}\">")
    } else {
        "<?xml version=\"1.0\"?>\n<results>".to_string()
    }
}

pub fn footer() -> String {
    "</results>".to_string()
}

/// Version 1: a legacy single-line `<error .../>` carrying only the
/// deepest call-stack frame, and collapsing severity to `error`/`style`
/// (the only two the legacy consumers distinguished).
pub fn to_xml_v1(message: &ErrorMessage, verbose: bool) -> String {
    let mut xml = String::from("<error");
    if let Some(loc) = message.innermost() {
        xml.push_str(&format!(" file=\"{}\"", escape(&loc.file)));
        xml.push_str(&format!(" line=\"{}\"", loc.line));
    }
    xml.push_str(&format!(" id=\"{}\"", message.id));
    let severity = if message.severity == Severity::Error {
        "error"
    } else {
        "style"
    };
    xml.push_str(&format!(" severity=\"{severity}\""));
    let text = if verbose {
        &message.verbose_message
    } else {
        &message.short_message
    };
    xml.push_str(&format!(" msg=\"{}\"", escape(text)));
    xml.push_str("/>");
    xml
}

/// Version 2: one `<error>` with nested `<location>` children in call-stack
/// order, innermost first (i.e. the call stack reversed).
pub fn to_xml_v2(message: &ErrorMessage) -> String {
    let mut xml = String::from("  <error");
    xml.push_str(&format!(" id=\"{}\"", message.id));
    xml.push_str(&format!(" severity=\"{}\"", message.severity));
    xml.push_str(&format!(" msg=\"{}\"", escape(&message.short_message)));
    xml.push_str(&format!(" verbose=\"{}\"", escape(&message.verbose_message)));
    xml.push_str(">\n");
    for loc in message.call_stack.iter().rev() {
        xml.push_str("    <location");
        xml.push_str(&format!(" file=\"{}\"", escape(&loc.file)));
        xml.push_str(&format!(" line=\"{}\"", loc.line));
        xml.push_str("/>\n");
    }
    xml.push_str("  </error>");
    xml
}
