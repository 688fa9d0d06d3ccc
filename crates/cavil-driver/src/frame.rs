//! The wire frame codec (spec.md §4.8), grounded in
//! `original_source/cli/threadexecutor.cpp`'s `handleRead()`: a frame is a
//! single type byte, a length field, then exactly that many payload bytes.
//!
//! The original reads `len` as a platform-dependent `unsigned int` straight
//! off the pipe; SPEC_FULL.md resolves that ambiguity as an explicit 32-bit
//! little-endian length, which is what `encode_frame`/`decode_frame`
//! implement here. A type byte outside `'1'`/`'2'`/`'3'` is the same class
//! of fatal, "this should never happen" condition the original calls out
//! with its own bug message.

use std::fmt;

pub const FRAME_OUT: u8 = b'1';
pub const FRAME_ERROR: u8 = b'2';
pub const FRAME_DONE: u8 = b'3';

/// What a frame carries: plain informational text (`report_info`), a
/// serialized `ErrorMessage` (`report_error`), or a worker's per-file
/// completion count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    Out,
    Error,
    Done,
}

impl FrameType {
    fn to_byte(self) -> u8 {
        match self {
            FrameType::Out => FRAME_OUT,
            FrameType::Error => FRAME_ERROR,
            FrameType::Done => FRAME_DONE,
        }
    }

    fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            FRAME_OUT => Some(FrameType::Out),
            FRAME_ERROR => Some(FrameType::Error),
            FRAME_DONE => Some(FrameType::Done),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    UnknownType(u8),
    Truncated,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameError::UnknownType(byte) => {
                write!(f, "#### You found a bug: unknown frame type byte {byte:#04x}")
            }
            FrameError::Truncated => write!(f, "#### You found a bug: truncated frame"),
        }
    }
}

impl std::error::Error for FrameError {}

const HEADER_LEN: usize = 5;

/// `TYPE (1 byte) | LEN (4 bytes, little-endian) | PAYLOAD (LEN bytes)`.
pub fn encode_frame(frame_type: FrameType, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_LEN + payload.len());
    buf.push(frame_type.to_byte());
    buf.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    buf.extend_from_slice(payload);
    buf
}

/// Decodes one frame from the front of `buf`, returning the frame and the
/// payload slice. Does not support multiple frames packed into one buffer;
/// each channel message here carries exactly one frame.
pub fn decode_frame(buf: &[u8]) -> Result<(FrameType, &[u8]), FrameError> {
    if buf.is_empty() {
        return Err(FrameError::Truncated);
    }
    let frame_type = FrameType::from_byte(buf[0]).ok_or(FrameError::UnknownType(buf[0]))?;
    if buf.len() < HEADER_LEN {
        return Err(FrameError::Truncated);
    }
    let len = u32::from_le_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
    if buf.len() < HEADER_LEN + len {
        return Err(FrameError::Truncated);
    }
    Ok((frame_type, &buf[HEADER_LEN..HEADER_LEN + len]))
}
