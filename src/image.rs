//! Abstraction over the backing image.
//!
//! The image is addressed by byte offset, not by block: the superblock,
//! bitmap, inode table and cluster region sit back to back with no padding,
//! so every structure computes its own offsets.

use std::fs::OpenOptions;
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::Path;
use std::sync::Mutex;

use crate::error::Result;

pub trait ImageDevice: Send + Sync {
    /// Reads `buf.len()` bytes starting at `offset`.
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()>;

    /// Writes the whole of `buf` starting at `offset`.
    fn write_at(&self, offset: u64, buf: &[u8]) -> Result<()>;

    /// Grows or shrinks the image to exactly `len` bytes.
    fn set_len(&self, len: u64) -> Result<()>;

    /// Flushes buffered writes to the backing store.
    fn flush(&self) -> Result<()>;
}

/// An image backed by a regular host file, opened read/write for the whole
/// session and created on first use.
pub struct FileDevice {
    inner: Mutex<std::fs::File>,
}

impl FileDevice {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)?;
        Ok(FileDevice {
            inner: Mutex::new(file),
        })
    }
}

impl ImageDevice for FileDevice {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let mut file = self.inner.lock().unwrap();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)?;
        Ok(())
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> Result<()> {
        let mut file = self.inner.lock().unwrap();
        file.seek(SeekFrom::Start(offset))?;
        file.write_all(buf)?;
        Ok(())
    }

    fn set_len(&self, len: u64) -> Result<()> {
        let file = self.inner.lock().unwrap();
        file.set_len(len)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        let mut file = self.inner.lock().unwrap();
        file.flush()?;
        Ok(())
    }
}
