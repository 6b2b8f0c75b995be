//! Console line framing.
//!
//! Bytes from the UART are fed one at a time into a [`LineAssembler`],
//! a fixed-capacity buffer (no heap).  `\r` is ignored and `\n` ends a
//! line.  A line longer than the buffer is discarded up to its newline
//! and reported as [`LineError::TooLong`].

use core::fmt;

use heapless::{String, Vec};

/// Console line buffer size.
pub const LINE_CAP: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineError {
    TooLong,
    NotUtf8,
}

impl fmt::Display for LineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooLong => write!(f, "line too long (max {LINE_CAP} bytes)"),
            Self::NotUtf8 => write!(f, "line is not valid UTF-8"),
        }
    }
}

#[derive(Debug, Default)]
pub struct LineAssembler<const N: usize = LINE_CAP> {
    buf: Vec<u8, N>,
    overflowed: bool,
}

impl<const N: usize> LineAssembler<N> {
    pub const fn new() -> Self {
        Self {
            buf: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte.  Returns a finished line (or its error) when `byte`
    /// is the terminating `\n`.
    pub fn push(&mut self, byte: u8) -> Option<Result<String<N>, LineError>> {
        match byte {
            b'\r' => None,
            b'\n' => {
                let overflowed = core::mem::take(&mut self.overflowed);
                let bytes = core::mem::take(&mut self.buf);
                if overflowed {
                    return Some(Err(LineError::TooLong));
                }
                Some(String::from_utf8(bytes).map_err(|_| LineError::NotUtf8))
            }
            _ => {
                if !self.overflowed && self.buf.push(byte).is_err() {
                    self.overflowed = true;
                    self.buf.clear();
                }
                None
            }
        }
    }

    /// Bytes buffered for the current, unfinished line.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
