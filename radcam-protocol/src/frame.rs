//! Request framing over a raw byte stream.
//!
//! The bridge delivers request bytes in arbitrary chunks. A frame is
//! complete once the header block terminator (an empty line, `\r\n\r\n`)
//! has been received:
//!
//! ```text
//! GET /set?tilt=1600 HTTP/1.1\r\n
//! Host: 192.168.2.42\r\n
//! \r\n              <- frame ends here
//! ```
//!
//! Only one request is in flight at a time, so anything that arrives after
//! the terminator (in the same chunk, or before the frame is taken) is
//! dropped rather than carried into the next frame.

use heapless::{String, Vec};

/// Blank-line sequence terminating a request
pub const FRAME_TERMINATOR: &[u8; 4] = b"\r\n\r\n";

/// Maximum accumulated request size in bytes
///
/// Sized for browser requests carrying `User-Agent`, `Accept`, `Referer`
/// and cookie headers.
pub const MAX_REQUEST_SIZE: usize = 2048;

/// Errors that can occur while framing requests
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrameError {
    /// Accumulator filled up before a terminator arrived
    Overflow,
    /// Completed frame was not valid UTF-8
    InvalidUtf8,
}

/// A complete request frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    text: String<MAX_REQUEST_SIZE>,
}

impl Frame {
    /// Full frame text, including the terminator
    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }

    /// The request line (`GET /path HTTP/1.1`), without its line ending
    pub fn request_line(&self) -> &str {
        let text = self.text.as_str();
        let end = text.find("\r\n").unwrap_or(text.len());
        &text[..end]
    }
}

/// Accumulates stream bytes until a complete request frame is available
#[derive(Debug, Clone, Default)]
pub struct StreamFramer {
    buffer: Vec<u8, MAX_REQUEST_SIZE>,
    complete: bool,
}

impl StreamFramer {
    /// Create an empty framer
    pub fn new() -> Self {
        Self {
            buffer: Vec::new(),
            complete: false,
        }
    }

    /// Discard all accumulated bytes
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.complete = false;
    }

    /// Number of accumulated bytes
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if nothing has been accumulated
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Check if a complete frame is waiting to be taken
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Append received bytes
    ///
    /// Stops consuming at the first terminator; the rest of `bytes` is
    /// dropped. Bytes fed while a frame is pending are dropped too.
    ///
    /// Returns `Err(FrameError::Overflow)` and resets the accumulator if the
    /// request grows past [`MAX_REQUEST_SIZE`] without a terminator.
    pub fn feed(&mut self, bytes: &[u8]) -> Result<(), FrameError> {
        if self.complete {
            return Ok(());
        }

        for &byte in bytes {
            if self.buffer.push(byte).is_err() {
                self.reset();
                return Err(FrameError::Overflow);
            }
            if self.buffer.ends_with(FRAME_TERMINATOR) {
                self.complete = true;
                break;
            }
        }
        Ok(())
    }

    /// Take the pending frame, if one is complete
    ///
    /// Clears the accumulator whenever a frame was pending, including when
    /// it fails to decode as text (`Err(FrameError::InvalidUtf8)`).
    pub fn try_take_frame(&mut self) -> Result<Option<Frame>, FrameError> {
        if !self.complete {
            return Ok(None);
        }

        let bytes = core::mem::take(&mut self.buffer);
        self.complete = false;

        String::from_utf8(bytes)
            .map(|text| Some(Frame { text }))
            .map_err(|_| FrameError::InvalidUtf8)
    }
}
