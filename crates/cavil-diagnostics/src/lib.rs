//! The diagnostic model: severities, structured error messages, their
//! byte-framed wire serialization, XML (v1/v2) and free-form renderings,
//! and the `ErrorLogger` sink checks report through.
//!
//! The wire format and XML rendering are deliberately exact ports of
//! cppcheck's `ErrorLogger::ErrorMessage` — these are the two places
//! spec.md §8 states a bijectivity/round-trip property must hold, so
//! faithfulness to the original field layout matters more than it does
//! elsewhere in this crate.

pub mod logger;
pub mod message;
pub mod severity;
pub mod template;
pub mod xml;

pub use logger::{DedupStrategy, ErrorLogger, RenderMode, RenderOptions, StdLogger};
pub use message::{DeserializeError, ErrorMessage, FileLocation};
pub use severity::Severity;
