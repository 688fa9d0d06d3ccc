//! The parallel/sequential file driver (spec.md §4.8/§5/§9): the wire
//! frame codec, per-unit analysis, and the coordinator that fans work out
//! across worker threads (or runs it inline when only one job is wanted).

pub mod aggregator;
pub mod analyze;
pub mod frame;
pub mod run;

pub use analyze::{analyze_unit, AnalysisUnit};
pub use frame::{decode_frame, encode_frame, FrameError, FrameType};
pub use run::run;
