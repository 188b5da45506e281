//! Byte-oriented pull interface the decoder reads from.
//!
//! The decoder never accepts a short read as success: it asks for exactly
//! `n` bytes and either gets them or learns how many arrived before the
//! input ended.  Any [`std::io::Read`] works as a source, including `&[u8]`,
//! files and stdin.

use std::io::{self, Read};

/// Result of [`ByteSource::fill`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fill {
    /// The whole buffer was filled.
    Complete,
    /// End-of-input was reached after this many bytes.
    Partial(usize),
}

/// Something the decoder can pull bytes from.
pub trait ByteSource {
    /// Fills `buf` completely, or reports how many bytes were available
    /// before end-of-input.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors other than end-of-input.
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<Fill>;
}

impl<R: Read + ?Sized> ByteSource for R {
    fn fill(&mut self, buf: &mut [u8]) -> io::Result<Fill> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.read(&mut buf[filled..]) {
                Ok(0) => return Ok(Fill::Partial(filled)),
                Ok(n) => filled += n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
        Ok(Fill::Complete)
    }
}
