//! Superblock geometry and persistence.

use crate::config::*;
use crate::error::{FsError, Result};
use crate::image::ImageDevice;
use crate::structs::SuperBlock;

impl SuperBlock {
    /// Lays out a fresh image: bitmap right after the superblock, then the
    /// inode table, then the cluster region, with no padding in between.
    pub fn new(disk_size: i32, cluster_count: i32) -> Self {
        let mut signature = [0u8; SIGNATURE_LEN];
        signature[..SIGNATURE.len()].copy_from_slice(SIGNATURE.as_bytes());
        let mut volume_descriptor = [0u8; VOLUME_DESC_LEN];
        volume_descriptor[..VOLUME_DESCRIPTION.len()].copy_from_slice(VOLUME_DESCRIPTION.as_bytes());

        let bitmap_start = SUPERBLOCK_SIZE as i32;
        let inode_start = bitmap_start + cluster_count;
        let data_start = inode_start + INODE_TABLE_SIZE as i32;

        SuperBlock {
            signature,
            volume_descriptor,
            disk_size,
            cluster_size: CLUSTER_SIZE as i32,
            cluster_count,
            bitmap_start,
            inode_start,
            data_start,
        }
    }
}

pub fn read_superblock<D: ImageDevice>(device: &D) -> Result<SuperBlock> {
    let mut buf = [0u8; SUPERBLOCK_SIZE];
    device.read_at(0, &mut buf)?;
    let superblock = SuperBlock::decode(&buf);

    if &superblock.signature[..SIGNATURE.len()] != SIGNATURE.as_bytes() {
        return Err(FsError::InvalidSuperblock);
    }
    if superblock.cluster_size != CLUSTER_SIZE as i32 {
        return Err(FsError::InvalidSuperblock);
    }

    Ok(superblock)
}

pub fn write_superblock<D: ImageDevice>(device: &D, superblock: &SuperBlock) -> Result<()> {
    device.write_at(0, &superblock.encode())?;
    device.flush()?;
    Ok(())
}
