mod reader;

pub use reader::ReaderSource;

use thiserror::Error;

/// Ordered producer of raw stream bytes.
///
/// Sources deliver bytes in their original order without duplication;
/// framing is left entirely to the decoder. `Ok(None)` marks end of input.
pub trait ByteSource {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError>;
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// In-memory source yielding one fixed chunk sequence.
impl ByteSource for std::vec::IntoIter<Vec<u8>> {
    fn next_chunk(&mut self) -> Result<Option<Vec<u8>>, SourceError> {
        Ok(self.next())
    }
}
