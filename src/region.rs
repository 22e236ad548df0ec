use crate::argv::ArgvView;
use crate::error::{Error, Result};
use crate::split::{self, Tokens};
use std::io::Write;
use std::ops::Range;

/// The argument span of a fetched blob: a buffer and the range inside it
/// that holds the (skip-adjusted) NUL-terminated arguments.
///
/// `B` is `Vec<u8>` when the library allocated the buffer and `&[u8]` when
/// the caller supplied it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRegion<B> {
    buffer: B,
    start: usize,
    end: usize,
}

impl<B: AsRef<[u8]>> RawRegion<B> {
    pub(crate) fn new(buffer: B, range: Range<usize>) -> Self {
        debug_assert!(range.start <= range.end && range.end <= buffer.as_ref().len());
        Self {
            buffer,
            start: range.start,
            end: range.end,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer.as_ref()[self.start..self.end]
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    pub fn buffer(&self) -> &[u8] {
        self.buffer.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn tokens(&self) -> Tokens<'_> {
        Tokens::new(self.as_bytes())
    }

    pub fn argc(&self) -> usize {
        split::count(self.as_bytes())
    }

    /// Drop `n` more leading arguments.
    pub fn skip(mut self, n: usize) -> Self {
        let offset = split::skip_offset(self.as_bytes(), n);
        self.start += offset;
        self
    }

    /// Write the arguments to `sink`. Separators become single spaces, and
    /// the final terminator is left out, unless `nuls` asks for the bytes
    /// verbatim.
    ///
    /// The output is assembled first and handed to the sink in one
    /// `write_all`, so a failure never leaves a partial rendering behind
    /// beyond what the sink itself already flushed.
    pub fn render<W: Write + ?Sized>(&self, sink: &mut W, nuls: bool) -> Result<()> {
        let bytes = self.as_bytes();
        if nuls {
            sink.write_all(bytes).map_err(Error::SinkWriteFailed)?;
        } else {
            let trimmed = bytes.strip_suffix(&[0]).unwrap_or(bytes);
            let spaced: Vec<u8> = trimmed
                .iter()
                .map(|&b| if b == 0 { b' ' } else { b })
                .collect();
            sink.write_all(&spaced).map_err(Error::SinkWriteFailed)?;
        }
        sink.flush().map_err(Error::SinkWriteFailed)
    }

    /// Release the region. Equivalent to dropping it.
    pub fn release(self) {}
}

impl RawRegion<Vec<u8>> {
    /// Build the indexable argv form, reusing this region's buffer.
    pub fn into_argv(self) -> Result<ArgvView> {
        let range = self.range();
        ArgvView::from_buffer(self.buffer, range)
    }

    pub fn into_inner(self) -> (Vec<u8>, Range<usize>) {
        let range = self.range();
        (self.buffer, range)
    }
}
