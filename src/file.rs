//! File-content I/O over a resolved cluster list.

use crate::chain::read_chain;
use crate::config::*;
use crate::error::Result;
use crate::image::ImageDevice;
use crate::structs::{Inode, SuperBlock};

/// Reads the whole payload of `inode`, truncated to its exact byte size.
/// Only the trailing cluster is partial; all others are read in full.
pub fn read_content<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    inode: &Inode,
) -> Result<Vec<u8>> {
    let clusters = read_chain(device, superblock, inode)?;
    let mut data = Vec::with_capacity(inode.size as usize);
    let mut remaining = inode.size as usize;
    let mut buf = vec![0u8; CLUSTER_SIZE];
    for &cluster in &clusters {
        let take = remaining.min(CLUSTER_SIZE);
        device.read_at(superblock.data_offset(cluster), &mut buf[..take])?;
        data.extend_from_slice(&buf[..take]);
        remaining -= take;
    }
    Ok(data)
}

/// Writes `data` across `clusters` in order; the last cluster receives the
/// trailing partial bytes. `clusters` must cover the whole of `data`.
pub fn write_content<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    clusters: &[i32],
    data: &[u8],
) -> Result<()> {
    for (&cluster, chunk) in clusters.iter().zip(data.chunks(CLUSTER_SIZE)) {
        device.write_at(superblock.data_offset(cluster), chunk)?;
    }
    Ok(())
}

/// Duplicates payload clusters inside the image, whole clusters at a time.
pub fn copy_content<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    source: &[i32],
    destination: &[i32],
) -> Result<()> {
    let mut buf = vec![0u8; CLUSTER_SIZE];
    for (&from, &to) in source.iter().zip(destination) {
        device.read_at(superblock.data_offset(from), &mut buf)?;
        device.write_at(superblock.data_offset(to), &buf)?;
    }
    Ok(())
}
