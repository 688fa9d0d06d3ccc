//! The coordinator's `ErrorLogger`: collects diagnostics from every unit
//! (sequential or parallel) into one de-duplicated list, using the same
//! rendered-string strategy `cavil_diagnostics::logger::StdLogger` uses,
//! since nothing downstream of the driver has rendered anything yet and the
//! driver needs to hand back structured `ErrorMessage`s rather than text.

use std::collections::HashSet;

use cavil_diagnostics::{ErrorLogger, ErrorMessage, RenderOptions};

pub struct Aggregator {
    options: RenderOptions,
    seen: HashSet<String>,
    messages: Vec<ErrorMessage>,
}

impl Aggregator {
    pub fn new() -> Self {
        Aggregator {
            options: RenderOptions::default(),
            seen: HashSet::new(),
            messages: Vec::new(),
        }
    }

    pub fn into_messages(self) -> Vec<ErrorMessage> {
        self.messages
    }
}

impl Default for Aggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl ErrorLogger for Aggregator {
    fn report_error(&mut self, message: &ErrorMessage) {
        let rendered = self.options.render(message);
        if self.seen.insert(rendered) {
            self.messages.push(message.clone());
        }
    }

    fn report_info(&mut self, text: &str) {
        log::info!("{text}");
    }
}
