mod http;
mod local;
mod memory;

pub use http::HttpRangeReader;
pub use local::LocalFileReader;
pub use memory::MemoryReader;

use async_trait::async_trait;
use std::path::Path;

use crate::Result;

/// Trait for random access reading from a data source.
///
/// Reads are positioned: there is no shared cursor, so one source can serve
/// any number of concurrent readers.
#[async_trait]
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer.
    ///
    /// Returns the number of bytes read; `0` means `offset` is at or past the end.
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;
}

/// Whether `location` names a remote source rather than a local path
pub fn is_http_url(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// A dump file given on the command line: local path or HTTP URL.
pub enum DumpSource {
    Local(LocalFileReader),
    Http(HttpRangeReader),
}

impl DumpSource {
    pub async fn open(location: &str) -> Result<Self> {
        if is_http_url(location) {
            Ok(Self::Http(HttpRangeReader::new(location.to_string()).await?))
        } else {
            Ok(Self::Local(LocalFileReader::new(Path::new(location))?))
        }
    }

    /// Bytes fetched over the network so far, `None` for local files
    pub fn transferred_bytes(&self) -> Option<u64> {
        match self {
            Self::Local(_) => None,
            Self::Http(reader) => Some(reader.transferred_bytes()),
        }
    }
}

#[async_trait]
impl ReadAt for DumpSource {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        match self {
            Self::Local(reader) => reader.read_at(offset, buf).await,
            Self::Http(reader) => reader.read_at(offset, buf).await,
        }
    }

    fn size(&self) -> u64 {
        match self {
            Self::Local(reader) => reader.size(),
            Self::Http(reader) => reader.size(),
        }
    }
}
