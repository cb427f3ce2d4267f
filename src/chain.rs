//! The cluster-chain codec.
//!
//! A payload of C clusters is wired to its inode as follows: the first five
//! go into the direct pointers; the next 250 are listed in a pointer cluster
//! referenced by `indirect[0]`; anything beyond that goes through
//! `indirect[1]`, a pointer cluster whose entries each reference another
//! pointer cluster of leaf pointers. That caps a payload at
//! 5 + 250 + 250 * 250 clusters.

use crate::bitmap::Bitmap;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::image::ImageDevice;
use crate::structs::{Inode, SuperBlock};

/// Number of clusters a payload of `size` bytes occupies.
pub fn clusters_for_size(size: i32) -> i32 {
    if size == 0 {
        return 0;
    }
    let full = size / CLUSTER_SIZE as i32;
    if size % CLUSTER_SIZE as i32 != 0 {
        full + 1
    } else {
        full
    }
}

fn read_pointer_cluster<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    cluster: i32,
    count: usize,
) -> Result<Vec<i32>> {
    let mut buf = vec![0u8; count * 4];
    device.read_at(superblock.data_offset(cluster), &mut buf)?;
    Ok(buf
        .chunks_exact(4)
        .map(|c| i32::from_le_bytes(c.try_into().unwrap()))
        .collect())
}

fn write_pointer_cluster<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    cluster: i32,
    pointers: &[i32],
) -> Result<()> {
    let mut buf = Vec::with_capacity(pointers.len() * 4);
    for pointer in pointers {
        buf.extend_from_slice(&pointer.to_le_bytes());
    }
    device.write_at(superblock.data_offset(cluster), &buf)?;
    Ok(())
}

/// Collects the data clusters of `inode` in chain order: direct pointers
/// first, then the single-indirect list, then the double-indirect leaves,
/// stopping once the size-derived cluster count is exhausted.
pub fn read_chain<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    inode: &Inode,
) -> Result<Vec<i32>> {
    let mut clusters = Vec::new();
    for &direct in &inode.direct {
        if direct == NULL_POINTER {
            return Ok(clusters);
        }
        clusters.push(direct);
    }

    let mut remaining = clusters_for_size(inode.size) - NUM_DIRECT_PTRS as i32;
    if remaining <= 0 || inode.indirect[0] == NULL_POINTER {
        return Ok(clusters);
    }

    let count = remaining.min(PTRS_PER_CLUSTER as i32);
    clusters.extend(read_pointer_cluster(device, superblock, inode.indirect[0], count as usize)?);
    remaining -= count;
    if remaining <= 0 || inode.indirect[1] == NULL_POINTER {
        return Ok(clusters);
    }

    let middle_count = (remaining as usize).div_ceil(PTRS_PER_CLUSTER);
    let middles = read_pointer_cluster(device, superblock, inode.indirect[1], middle_count)?;
    for middle in middles {
        let count = remaining.min(PTRS_PER_CLUSTER as i32);
        clusters.extend(read_pointer_cluster(device, superblock, middle, count as usize)?);
        remaining -= count;
        if remaining == 0 {
            break;
        }
    }
    Ok(clusters)
}

/// Attaches `clusters` to `inode`, drawing the pointer clusters the spill
/// requires from the bitmap. Availability is checked before anything is
/// drawn, so a capacity failure leaves the bitmap untouched.
pub fn write_chain<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    bitmap: &mut Bitmap,
    inode: &mut Inode,
    clusters: &[i32],
) -> Result<()> {
    for (slot, &cluster) in inode.direct.iter_mut().zip(clusters) {
        *slot = cluster;
    }
    if clusters.len() <= NUM_DIRECT_PTRS {
        return Ok(());
    }

    let spilled = &clusters[NUM_DIRECT_PTRS..];
    let first = &spilled[..spilled.len().min(PTRS_PER_CLUSTER)];
    let second = &spilled[first.len()..];

    let middle_count = second.len().div_ceil(PTRS_PER_CLUSTER);
    if middle_count > PTRS_PER_CLUSTER {
        return Err(FsError::FileTooLarge);
    }
    let pointer_clusters = 1 + if second.is_empty() { 0 } else { middle_count + 1 };
    if !bitmap.has_free(pointer_clusters) {
        return Err(FsError::OutOfClusters);
    }

    let head = bitmap.allocate().ok_or(FsError::OutOfClusters)?;
    inode.indirect[0] = head;
    write_pointer_cluster(device, superblock, head, first)?;

    if !second.is_empty() {
        let table = bitmap.allocate().ok_or(FsError::OutOfClusters)?;
        inode.indirect[1] = table;
        let middles: Vec<i32> = (0..middle_count)
            .map(|_| bitmap.allocate().ok_or(FsError::OutOfClusters))
            .collect::<Result<_>>()?;
        write_pointer_cluster(device, superblock, table, &middles)?;
        for (middle, leaves) in middles.iter().zip(second.chunks(PTRS_PER_CLUSTER)) {
            write_pointer_cluster(device, superblock, *middle, leaves)?;
        }
    }
    Ok(())
}

/// Returns every cluster owned by `inode` to the bitmap: the data chain, the
/// direct pointers (directories hold all five regardless of size), both
/// indirect pointer clusters and the middle clusters of the second level.
pub fn release_chain<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    bitmap: &mut Bitmap,
    inode: &Inode,
) -> Result<()> {
    for cluster in read_chain(device, superblock, inode)? {
        bitmap.release(cluster);
    }
    for &direct in &inode.direct {
        if direct != NULL_POINTER {
            bitmap.release(direct);
        }
    }
    if inode.indirect[0] != NULL_POINTER {
        bitmap.release(inode.indirect[0]);
    }
    if inode.indirect[1] != NULL_POINTER {
        let remaining = clusters_for_size(inode.size)
            - NUM_DIRECT_PTRS as i32
            - PTRS_PER_CLUSTER as i32;
        if remaining > 0 {
            let middle_count = (remaining as usize).div_ceil(PTRS_PER_CLUSTER);
            for middle in
                read_pointer_cluster(device, superblock, inode.indirect[1], middle_count)?
            {
                bitmap.release(middle);
            }
        }
        bitmap.release(inode.indirect[1]);
    }
    Ok(())
}
