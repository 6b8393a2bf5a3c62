//! Length-prefixed framing: a 4-byte big-endian length, then the payload.

use std::convert::TryFrom;
use std::io::{Read, Write};

use tracing::debug;

use crate::error::{Error, Result};

/// Length of the frame header.
const FRAME_HEADER_LEN: usize = 4;

/// Largest payload a receiver accepts unless configured otherwise.
pub const DEFAULT_MAX_FRAME_LEN: u32 = 256 * 1024 * 1024;

/// Writes `payload` as a single frame and flushes the writer.
pub fn write_frame<W: Write>(writer: &mut W, payload: &[u8]) -> Result<()> {
    let len = u32::try_from(payload.len()).map_err(|_| Error::FrameTooLarge {
        len: payload.len() as u64,
        max: u32::MAX as u64,
    })?;

    writer.write_all(&len.to_be_bytes())?;
    writer.write_all(payload)?;
    writer.flush()?;

    debug!("wrote frame of {} bytes", len);
    Ok(())
}

/// Reads exactly one frame.
///
/// A length above `max_len` is rejected before any payload buffer is
/// allocated. A peer that closes before the whole frame arrived yields
/// [`Error::Connection`] with `UnexpectedEof`.
pub fn read_frame<R: Read>(reader: &mut R, max_len: u32) -> Result<Vec<u8>> {
    let mut len_buf = [0u8; FRAME_HEADER_LEN];
    reader.read_exact(&mut len_buf)?;
    let len = u32::from_be_bytes(len_buf);

    if len > max_len {
        return Err(Error::FrameTooLarge {
            len: len as u64,
            max: max_len as u64,
        });
    }

    let mut payload = vec![0u8; len as usize];
    reader.read_exact(&mut payload)?;

    debug!("read frame of {} bytes", len);
    Ok(payload)
}
