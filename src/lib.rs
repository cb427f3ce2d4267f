//! zosfs is a user-space emulation of a UNIX-style file system stored in a
//! single host file acting as a raw block device.
//!
//! The image's linear layout:
//! - Superblock
//! - Cluster Bitmap (one byte per cluster, `true` = free)
//! - Inode Table (fixed, 100 inodes)
//! - Cluster Region
//!
//! The crate's layers (from bottom to top):
//! 1. Image Device: positioned byte I/O on the backing file.       | `FileDevice`, or user implemented
//! 2. Allocators: cluster bitmap and inode table, first-fit.       | Fs implemented
//! 3. Codecs: cluster chains, directory payloads, file contents.   | Fs implemented
//! 4. Path Resolver: forward and reverse resolution.               | Fs implemented
//! 5. FileSystem: the command surface (`mkdir`, `incp`, `slink`…). | Fs implemented
//! 6. Shell: line-oriented command interface over a status sink.   | `Shell`, or user implemented

mod bitmap;
mod chain;
mod config;
mod directory;
mod error;
mod file;
mod fs;
mod image;
mod inode;
mod path;
mod shell;
mod structs;
mod superblock;

pub use bitmap::Bitmap;
pub use chain::*;
pub use config::*;
pub use directory::*;
pub use error::FsError as Error;
pub use error::Result;
pub use file::*;
pub use fs::*;
pub use image::{FileDevice, ImageDevice};
pub use inode::InodeTable;
pub use path::*;
pub use shell::*;
pub use structs::*;
pub use superblock::*;
