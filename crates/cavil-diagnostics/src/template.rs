//! Plain-text and free-form template rendering, grounded in cppcheck's
//! `ErrorMessage::toString` and `callStackToString`.

use crate::message::{ErrorMessage, FileLocation};
use crate::severity::Severity;

/// `[file:line] -> [file:line] -> ...` in call-stack order.
pub fn call_stack_to_string(call_stack: &[FileLocation]) -> String {
    call_stack
        .iter()
        .map(|loc| format!("[{}:{}]", loc.file, loc.line))
        .collect::<Vec<_>>()
        .join(" -> ")
}

/// The default, template-free rendering: `stack: (severity) message`, with
/// either part omitted when there is no call stack or no severity.
pub fn plain_text(message: &ErrorMessage, verbose: bool) -> String {
    let mut text = String::new();
    if !message.call_stack.is_empty() {
        text.push_str(&call_stack_to_string(&message.call_stack));
        text.push_str(": ");
    }
    if message.severity != Severity::None {
        text.push_str(&format!("({}) ", message.severity));
    }
    text.push_str(if verbose {
        &message.verbose_message
    } else {
        &message.short_message
    });
    text
}

/// Renders `template` with `{id}`, `{severity}`, `{message}`, `{file}`,
/// `{line}` substituted; `{file}`/`{line}` come from the deepest call-stack
/// frame, or empty strings when there is none.
pub fn render_template(message: &ErrorMessage, verbose: bool, template: &str) -> String {
    let text = if verbose {
        &message.verbose_message
    } else {
        &message.short_message
    };
    let (file, line) = match message.innermost() {
        Some(loc) => (loc.file.clone(), loc.line.to_string()),
        None => (String::new(), String::new()),
    };
    template
        .replace("{id}", &message.id)
        .replace("{severity}", message.severity.as_str())
        .replace("{message}", text)
        .replace("{file}", &file)
        .replace("{line}", &line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ErrorMessage {
        ErrorMessage::new(
            vec![FileLocation::new("a.cpp", 3), FileLocation::new("b.cpp", 10)],
            Severity::Error,
            "bad dereference",
            "eraseDereference",
        )
    }

    #[test]
    fn call_stack_to_string_joins_frames_with_arrows() {
        let m = sample();
        assert_eq!(call_stack_to_string(&m.call_stack), "[a.cpp:3] -> [b.cpp:10]");
    }

    #[test]
    fn plain_text_includes_stack_severity_and_message() {
        let m = sample();
        assert_eq!(
            plain_text(&m, false),
            "[a.cpp:3] -> [b.cpp:10]: (error) bad dereference"
        );
    }

    #[test]
    fn plain_text_omits_severity_tag_for_none() {
        let m = ErrorMessage::new(vec![], Severity::None, "just info", "x");
        assert_eq!(plain_text(&m, false), "just info");
    }

    #[test]
    fn render_template_substitutes_every_placeholder() {
        let m = sample();
        let rendered = render_template(&m, false, "{severity}: {message} [{file}:{line}] ({id})");
        assert_eq!(
            rendered,
            "error: bad dereference [b.cpp:10] (eraseDereference)"
        );
    }

    #[test]
    fn render_template_leaves_file_and_line_empty_without_a_call_stack() {
        let m = ErrorMessage::new(vec![], Severity::Warning, "msg", "x");
        assert_eq!(render_template(&m, false, "{file}:{line}"), ":");
    }
}
