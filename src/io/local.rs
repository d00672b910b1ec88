use super::ReadAt;
use crate::Result;
use async_trait::async_trait;
use std::path::Path;

/// Local dump file with positioned reads
pub struct LocalFileReader {
    file: std::fs::File,
    size: u64,
}

impl LocalFileReader {
    pub fn new(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self { file, size })
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> std::io::Result<usize> {
        if offset >= self.size {
            return Ok(0);
        }

        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_at(buf, offset)
        }

        #[cfg(windows)]
        {
            // seek_read moves the handle's cursor, but every call passes its
            // own offset so no reader depends on it.
            use std::os::windows::fs::FileExt;
            self.file.seek_read(buf, offset)
        }

        #[cfg(not(any(unix, windows)))]
        {
            let _ = buf;
            Err(std::io::Error::new(
                std::io::ErrorKind::Unsupported,
                "positioned reads are not available on this platform",
            ))
        }
    }

    fn size(&self) -> u64 {
        self.size
    }
}
