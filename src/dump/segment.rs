//! Segment locator.
//!
//! A multistream dump is a concatenation of independently terminated bzip2
//! streams, so a fresh decoder started at any stream boundary yields that
//! segment's markup from its first byte. Every stream opened here owns its
//! own cursor over the shared [`ReadAt`] source; nothing is seeked in place.

use bzip2::bufread::{BzDecoder, MultiBzDecoder};
use std::io::{self, BufReader, Read};
use std::sync::Arc;
use tokio::runtime::Handle;

use crate::io::ReadAt;

/// Read size used when pulling compressed bytes from the source.
///
/// Large enough that a remote source needs only a handful of Range requests
/// per segment.
pub const SOURCE_READ_SIZE: usize = 256 * 1024;

/// Decompressed markup of one segment, ready for tokenizing.
pub type SegmentStream<R> = BufReader<BzDecoder<BufReader<SourceCursor<R>>>>;

/// Sequential [`Read`] view over a [`ReadAt`] source.
///
/// Holds a private position, so any number of cursors can walk the same
/// source concurrently. Reads block on the async source through the runtime
/// handle and must therefore run off the async workers (inside
/// `spawn_blocking` or a plain thread).
pub struct SourceCursor<R: ReadAt> {
    source: Arc<R>,
    position: u64,
    handle: Handle,
}

impl<R: ReadAt> SourceCursor<R> {
    pub fn new(source: Arc<R>, position: u64, handle: Handle) -> Self {
        Self {
            source,
            position,
            handle,
        }
    }

    /// Current absolute position in the source
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: ReadAt> Read for SourceCursor<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self
            .handle
            .block_on(self.source.read_at(self.position, buf))?;
        self.position += n as u64;
        Ok(n)
    }
}

/// Open a fresh decompression stream at `offset`.
///
/// `offset` must be the first byte of a segment. Any other position yields a
/// decoder error on first read; an offset at or past the end yields a
/// truncated stream.
pub fn open_segment<R: ReadAt>(source: Arc<R>, offset: u64, handle: Handle) -> SegmentStream<R> {
    let cursor = SourceCursor::new(source, offset, handle);
    let compressed = BufReader::with_capacity(SOURCE_READ_SIZE, cursor);
    BufReader::new(BzDecoder::new(compressed))
}

/// Open the whole source as one decompressed stream, following every
/// concatenated bzip2 stream to the end. Used for the index container.
pub fn open_multistream<R: ReadAt>(
    source: Arc<R>,
    handle: Handle,
) -> BufReader<MultiBzDecoder<BufReader<SourceCursor<R>>>> {
    let cursor = SourceCursor::new(source, 0, handle);
    let compressed = BufReader::with_capacity(SOURCE_READ_SIZE, cursor);
    BufReader::new(MultiBzDecoder::new(compressed))
}
