//! Common utilities for tests
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use zosfs::*;

pub const ORANGE: &str = "\x1b[38;5;214m";
pub const RESET: &str = "\x1b[0m";

/// Provides a macro for logging messages during tests.
/// e.g. log!("placeholder") -> println!("[test] placeholder");
#[macro_export]
macro_rules! log {
    ($msg:expr, $($arg:tt)*) => {
        println!("{}[test] {}{}", crate::common::ORANGE, format!($msg, $($arg)*), crate::common::RESET)
    };
}

/// A byte-addressed in-memory image. Cloning shares the backing storage, so
/// a test can keep a handle for remounting after the file system is dropped.
#[derive(Debug, Clone)]
pub struct RamDisk {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl RamDisk {
    pub fn new(len: usize) -> Self {
        RamDisk {
            inner: Arc::new(Mutex::new(vec![0u8; len])),
        }
    }
}

impl ImageDevice for RamDisk {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        let data = self.inner.lock().unwrap();
        let start = offset as usize;
        let end = start + buf.len();
        if end > data.len() {
            return Err(Error::Io(io::ErrorKind::UnexpectedEof.into()));
        }
        buf.copy_from_slice(&data[start..end]);
        Ok(())
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> Result<()> {
        let mut data = self.inner.lock().unwrap();
        let start = offset as usize;
        let end = start + buf.len();
        if end > data.len() {
            return Err(Error::Io(io::ErrorKind::UnexpectedEof.into()));
        }
        data[start..end].copy_from_slice(buf);
        Ok(())
    }

    fn set_len(&self, len: u64) -> Result<()> {
        let mut data = self.inner.lock().unwrap();
        data.resize(len as usize, 0);
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        // Nothing buffered in a RAM disk.
        Ok(())
    }
}

/// A RamDisk wrapper that rejects writes landing on one armed offset, for
/// driving the failure paths of multi-step operations.
#[derive(Debug, Clone)]
pub struct FaultyDisk {
    inner: RamDisk,
    deny: Arc<Mutex<Option<u64>>>,
}

impl FaultyDisk {
    pub fn new(len: usize) -> Self {
        FaultyDisk {
            inner: RamDisk::new(len),
            deny: Arc::new(Mutex::new(None)),
        }
    }

    pub fn deny_writes_at(&self, offset: u64) {
        *self.deny.lock().unwrap() = Some(offset);
    }

    pub fn clear_fault(&self) {
        *self.deny.lock().unwrap() = None;
    }
}

impl ImageDevice for FaultyDisk {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> Result<()> {
        self.inner.read_at(offset, buf)
    }

    fn write_at(&self, offset: u64, buf: &[u8]) -> Result<()> {
        if *self.deny.lock().unwrap() == Some(offset) {
            return Err(Error::Io(io::ErrorKind::Other.into()));
        }
        self.inner.write_at(offset, buf)
    }

    fn set_len(&self, len: u64) -> Result<()> {
        self.inner.set_len(len)
    }

    fn flush(&self) -> Result<()> {
        self.inner.flush()
    }
}

/// Writes a scratch file on the host for incp/outcp tests and returns its
/// path. Names are namespaced per process so suites don't collide.
pub fn write_host_file(name: &str, data: &[u8]) -> PathBuf {
    let path = host_file_path(name);
    std::fs::write(&path, data).unwrap();
    path
}

pub fn host_file_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("zosfs_test_{}_{}", std::process::id(), name))
}

pub fn remove_host_file(path: &PathBuf) {
    let _ = std::fs::remove_file(path);
}

/// A deterministic payload that makes off-by-one cluster bugs visible.
pub fn pattern_bytes(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}
