use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use super::{ByteSource, SourceError};

pub(crate) const READ_CHUNK_SIZE: usize = 4096;

/// `ByteSource` over any `Read` implementation (files, stdin, sockets).
pub struct ReaderSource<R> {
    inner: R,
    chunk_size: usize,
}

impl ReaderSource<File> {
    pub fn open(path: &Path) -> Result<Self, SourceError> {
        let file = File::open(path)?;
        Ok(Self::new(file))
    }
}

impl<R: Read> ReaderSource<R> {
    pub fn new(inner: R) -> Self {
        Self::with_chunk_size(inner, READ_CHUNK_SIZE)
    }

    /// `chunk_size` is clamped to at least one byte.
    pub fn with_chunk_size(inner: R, chunk_size: usize) -> Self {
        Self {
            inner,
            chunk_size: chunk_size.max(1),
        }
    }
}

impl<R: Read> ByteSource for ReaderSource<R> {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        let mut buf = vec![0u8; self.chunk_size];
        loop {
            match self.inner.read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(n) => {
                    buf.truncate(n);
                    return Ok(Some(buf));
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(SourceError::Io(err)),
            }
        }
    }
}
