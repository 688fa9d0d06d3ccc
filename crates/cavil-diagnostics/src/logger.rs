//! `ErrorLogger`: the sink every check reports through, and the renderer
//! that turns an `ErrorMessage` into output text. De-duplication lives
//! here because it's the one place every diagnostic — single-process or
//! aggregated from workers — necessarily passes through.

use std::collections::HashSet;
use std::io::Write;

use crate::message::ErrorMessage;
use crate::{template, xml};

/// How a logger tells two diagnostics apart for de-duplication purposes.
/// spec.md §4.6: the parallel driver de-duplicates `'2'` frames by exact
/// rendered-string equality; a single-process run may instead de-duplicate
/// by `(id, file, line)`, which is cheaper but coarser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DedupStrategy {
    RenderedString,
    IdFileLine,
}

/// Which form a logger renders diagnostics in.
#[derive(Debug, Clone)]
pub enum RenderMode {
    PlainText,
    Template(String),
    Xml { version: u8 },
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    pub mode: RenderMode,
    pub verbose: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            mode: RenderMode::PlainText,
            verbose: false,
        }
    }
}

impl RenderOptions {
    pub fn render(&self, message: &ErrorMessage) -> String {
        match &self.mode {
            RenderMode::PlainText => template::plain_text(message, self.verbose),
            RenderMode::Template(tpl) => template::render_template(message, self.verbose, tpl),
            RenderMode::Xml { version } if *version <= 1 => xml::to_xml_v1(message, self.verbose),
            RenderMode::Xml { .. } => xml::to_xml_v2(message),
        }
    }
}

/// The abstraction checks report through. In single-process mode this is
/// backed by [`StdLogger`]; in parallel mode, by a frame writer that
/// serializes each message onto the worker's pipe instead (see
/// `cavil-driver`).
pub trait ErrorLogger {
    fn report_error(&mut self, message: &ErrorMessage);
    fn report_info(&mut self, text: &str);
}

fn dedup_key(message: &ErrorMessage, rendered: &str, strategy: DedupStrategy) -> String {
    match strategy {
        DedupStrategy::RenderedString => rendered.to_string(),
        DedupStrategy::IdFileLine => match message.innermost() {
            Some(loc) => format!("{}|{}|{}", message.id, loc.file, loc.line),
            None => format!("{}||", message.id),
        },
    }
}

/// Renders diagnostics directly to a writer, de-duplicating as it goes.
/// `errors_only` suppresses `report_info` output, matching the
/// `errors-only` setting.
pub struct StdLogger<W: Write> {
    writer: W,
    options: RenderOptions,
    dedup: DedupStrategy,
    errors_only: bool,
    seen: HashSet<String>,
}

impl<W: Write> StdLogger<W> {
    pub fn new(writer: W, options: RenderOptions, dedup: DedupStrategy, errors_only: bool) -> Self {
        StdLogger {
            writer,
            options,
            dedup,
            errors_only,
            seen: HashSet::new(),
        }
    }
}

impl<W: Write> ErrorLogger for StdLogger<W> {
    fn report_error(&mut self, message: &ErrorMessage) {
        let rendered = self.options.render(message);
        let key = dedup_key(message, &rendered, self.dedup);
        if !self.seen.insert(key) {
            return;
        }
        let _ = writeln!(self.writer, "{rendered}");
    }

    fn report_info(&mut self, text: &str) {
        if self.errors_only {
            return;
        }
        let _ = writeln!(self.writer, "{text}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::FileLocation;
    use crate::severity::Severity;

    fn sample(id: &str) -> ErrorMessage {
        ErrorMessage::new(vec![FileLocation::new("a.cpp", 1)], Severity::Error, "boom", id)
    }

    #[test]
    fn deduplicates_identical_rendered_output() {
        let mut logger = StdLogger::new(Vec::new(), RenderOptions::default(), DedupStrategy::RenderedString, false);
        logger.report_error(&sample("x"));
        logger.report_error(&sample("x"));
        let text = String::from_utf8(logger.writer).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn distinct_ids_are_not_deduplicated() {
        let mut logger = StdLogger::new(Vec::new(), RenderOptions::default(), DedupStrategy::RenderedString, false);
        logger.report_error(&sample("x"));
        logger.report_error(&sample("y"));
        let text = String::from_utf8(logger.writer).unwrap();
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn id_file_line_strategy_collapses_differing_messages_at_the_same_site() {
        let mut logger = StdLogger::new(Vec::new(), RenderOptions::default(), DedupStrategy::IdFileLine, false);
        let a = sample("x");
        let mut b = sample("x");
        b.short_message = "a different message text".to_string();
        logger.report_error(&a);
        logger.report_error(&b);
        let text = String::from_utf8(logger.writer).unwrap();
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn errors_only_suppresses_informational_output() {
        let mut logger = StdLogger::new(Vec::new(), RenderOptions::default(), DedupStrategy::RenderedString, true);
        logger.report_info("Checking a.cpp...");
        assert!(logger.writer.is_empty());
    }
}
