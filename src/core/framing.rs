//! Line framing for inbound connection streams
//!
//! Splits a byte stream on `\n`. Bytes after the last terminator stay buffered
//! until more data arrives and are dropped when the stream ends.

use bytes::BytesMut;
use thiserror::Error;
use tokio_util::codec::Decoder;

const LF: u8 = b'\n';
const CR: u8 = b'\r';

/// Framing errors
#[derive(Error, Debug)]
pub enum FramingError {
    /// A line grew past the configured maximum
    #[error("Line exceeds maximum length of {0} bytes")]
    LineTooLong(usize),

    /// I/O error from the underlying stream
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Newline framer producing one `String` per complete line
#[derive(Debug, Clone)]
pub struct LineFramer {
    max_length: Option<usize>,
    strip_cr: bool,
    // Bytes of the pending line already searched for a terminator
    next_index: usize,
}

impl LineFramer {
    /// Create a framer with no length limit that strips CR before LF
    pub fn new() -> Self {
        Self {
            max_length: None,
            strip_cr: true,
            next_index: 0,
        }
    }

    /// Limit the length of a single line
    #[must_use]
    pub fn max_length(mut self, max: Option<usize>) -> Self {
        self.max_length = max;
        self
    }

    /// Keep or drop the `\r` of CRLF terminators
    #[must_use]
    pub fn strip_carriage_return(mut self, strip: bool) -> Self {
        self.strip_cr = strip;
        self
    }

    fn check_length(&self, len: usize) -> Result<(), FramingError> {
        match self.max_length {
            Some(max) if len > max => Err(FramingError::LineTooLong(max)),
            _ => Ok(()),
        }
    }
}

impl Default for LineFramer {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for LineFramer {
    type Item = String;
    type Error = FramingError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<String>, FramingError> {
        let offset = src[self.next_index..].iter().position(|&b| b == LF);

        let Some(offset) = offset else {
            self.next_index = src.len();
            // A trailing CR may still turn out to be part of the terminator
            let pending = if self.strip_cr && src.last() == Some(&CR) {
                src.len() - 1
            } else {
                src.len()
            };
            self.check_length(pending)?;
            return Ok(None);
        };

        let newline_index = self.next_index + offset;
        self.next_index = 0;

        let mut line = src.split_to(newline_index + 1);
        line.truncate(newline_index);
        if self.strip_cr && line.last() == Some(&CR) {
            line.truncate(line.len() - 1);
        }
        self.check_length(line.len())?;

        Ok(Some(String::from_utf8_lossy(&line).into_owned()))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<String>, FramingError> {
        if let Some(line) = self.decode(src)? {
            return Ok(Some(line));
        }

        if !src.is_empty() {
            tracing::trace!(bytes = src.len(), "discarding unterminated trailing bytes");
            src.clear();
        }
        self.next_index = 0;
        Ok(None)
    }
}
