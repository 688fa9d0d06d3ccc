//! The per-process driver (spec.md §4.8/§5): runs every analysis unit
//! through [`analyze_unit`] and hands back a de-duplicated diagnostic list,
//! either on the calling thread (`settings.jobs <= 1`) or fanned out across
//! `settings.jobs` worker threads.
//!
//! spec.md §9's design note licenses a substitution here: the original
//! forks one child process per job and reads `'1'`/`'2'`/`'3'` frames back
//! over a pipe (`original_source/cli/threadexecutor.cpp`). Rust has no
//! portable `fork`, so workers here are OS threads and the pipe is a
//! bounded `crossbeam_channel`, but the frame format itself is still
//! produced and parsed exactly as `cavil_driver::frame` defines it — a
//! worker encodes every diagnostic and its per-file completion count as a
//! real frame before sending it, and the coordinator decodes every frame
//! it receives, so the channel-vs-pipe substitution is invisible on either
//! side of the wire format.

use crossbeam_channel::{Receiver, Sender};
use std::thread;

use cavil_checks::{register_all, CheckRegistry, Settings};
use cavil_diagnostics::{ErrorLogger, ErrorMessage};

use crate::aggregator::Aggregator;
use crate::analyze::{analyze_unit, AnalysisUnit};
use crate::frame::{decode_frame, encode_frame, FrameType};

/// Analyzes every unit in `units` under `settings`, returning the
/// de-duplicated union of their diagnostics. `settings.jobs <= 1` runs
/// sequentially on the calling thread with no channel at all; this is the
/// baseline spec.md §8's property #8 (parallel and sequential runs agree on
/// the diagnostic multiset) is checked against.
pub fn run(units: &[AnalysisUnit], settings: &Settings) -> Vec<ErrorMessage> {
    let checks = register_all();
    if settings.jobs <= 1 {
        run_sequential(units, &checks, settings)
    } else {
        run_parallel(units, &checks, settings)
    }
}

fn run_sequential(units: &[AnalysisUnit], checks: &CheckRegistry, settings: &Settings) -> Vec<ErrorMessage> {
    let mut logger = Aggregator::new();
    for unit in units {
        report_unit(unit, checks, settings, &mut logger);
    }
    logger.into_messages()
}

fn run_parallel(units: &[AnalysisUnit], checks: &CheckRegistry, settings: &Settings) -> Vec<ErrorMessage> {
    let jobs = (settings.jobs as usize).max(1);
    let total = units.len();
    if total == 0 {
        return Vec::new();
    }

    let (work_tx, work_rx) = crossbeam_channel::unbounded::<&AnalysisUnit>();
    for unit in units {
        let _ = work_tx.send(unit);
    }
    drop(work_tx);

    let (frame_tx, frame_rx) = crossbeam_channel::bounded::<Vec<u8>>(jobs.saturating_mul(4).max(1));

    thread::scope(|scope| {
        for _ in 0..jobs {
            let work_rx = work_rx.clone();
            let frame_tx = frame_tx.clone();
            scope.spawn(move || worker_loop(&work_rx, &frame_tx, checks, settings));
        }
        drop(frame_tx);
        drop(work_rx);

        collect(&frame_rx, total)
    })
}

/// One worker thread's body: pull units until the queue is drained,
/// encoding each diagnostic as a `'2'` frame and each file's completion as
/// a `'3'` frame, exactly as `threadexecutor.cpp`'s child process would
/// write them back to its parent.
fn worker_loop(
    work_rx: &Receiver<&AnalysisUnit>,
    frame_tx: &Sender<Vec<u8>>,
    checks: &CheckRegistry,
    settings: &Settings,
) {
    while let Ok(unit) = work_rx.recv() {
        match analyze_unit(unit, checks, settings) {
            Ok(messages) => {
                for message in &messages {
                    let payload = message.serialize();
                    let _ = frame_tx.send(encode_frame(FrameType::Error, payload.as_bytes()));
                }
                let _ = frame_tx.send(encode_frame(FrameType::Done, messages.len().to_string().as_bytes()));
            }
            Err(err) => {
                log::error!("{err}");
                let _ = frame_tx.send(encode_frame(FrameType::Done, b"0"));
            }
        }
    }
}

/// The coordinator's read loop: decode frames until every unit's `'3'`
/// frame has arrived, rejecting a malformed frame exactly as
/// `threadexecutor.cpp` treats an unrecognized type byte — fatal to that
/// one frame, not to the run.
fn collect(frame_rx: &Receiver<Vec<u8>>, total: usize) -> Vec<ErrorMessage> {
    let mut logger = Aggregator::new();
    let mut files_done = 0;
    while files_done < total {
        let Ok(bytes) = frame_rx.recv() else { break };
        match decode_frame(&bytes) {
            Ok((FrameType::Error, payload)) => match std::str::from_utf8(payload).ok().and_then(|s| ErrorMessage::deserialize(s).ok()) {
                Some(message) => logger.report_error(&message),
                None => log::error!("#### You found a bug: malformed '2' frame payload"),
            },
            Ok((FrameType::Out, payload)) => logger.report_info(&String::from_utf8_lossy(payload)),
            Ok((FrameType::Done, _)) => files_done += 1,
            Err(err) => {
                log::error!("{err}");
                files_done += 1;
            }
        }
    }
    logger.into_messages()
}

fn report_unit(unit: &AnalysisUnit, checks: &CheckRegistry, settings: &Settings, logger: &mut Aggregator) {
    match analyze_unit(unit, checks, settings) {
        Ok(messages) => {
            for message in &messages {
                logger.report_error(message);
            }
        }
        Err(err) => log::error!("{err}"),
    }
}
