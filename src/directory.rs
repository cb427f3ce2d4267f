use crate::chain::clusters_for_size;
use crate::config::*;
use crate::error::{FsError, Result};
use crate::image::ImageDevice;
use crate::structs::{DirEntry, Inode, SuperBlock};

/// On-disk size of a directory holding `count` entries.
pub fn dir_size(count: usize) -> i32 {
    (DIR_COUNT_SIZE + count * DIR_ENTRY_SIZE) as i32
}

/// Decodes the entry list of a directory inode.
///
/// The first direct cluster starts with the u64 entry count; entries then
/// run across the direct clusters, 62 to a cluster. Directories never use
/// indirect pointers.
pub fn read_dir<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    inode: &Inode,
) -> Result<Vec<DirEntry>> {
    if clusters_for_size(inode.size) > NUM_DIRECT_PTRS as i32 {
        return Err(FsError::DirectoryTooLarge);
    }

    let mut count_buf = [0u8; DIR_COUNT_SIZE];
    device.read_at(superblock.data_offset(inode.direct[0]), &mut count_buf)?;
    let count = u64::from_le_bytes(count_buf) as usize;

    let mut entries = Vec::with_capacity(count.min(NUM_DIRECT_PTRS * ENTRIES_PER_CLUSTER));
    for &cluster in &inode.direct {
        if entries.len() == count {
            break;
        }
        let in_cluster = (count - entries.len()).min(ENTRIES_PER_CLUSTER);
        let offset = superblock.data_offset(cluster)
            + if entries.is_empty() { DIR_COUNT_SIZE as u64 } else { 0 };
        let mut buf = vec![0u8; in_cluster * DIR_ENTRY_SIZE];
        device.read_at(offset, &mut buf)?;
        entries.extend(buf.chunks_exact(DIR_ENTRY_SIZE).map(DirEntry::decode));
    }
    Ok(entries)
}

/// Encodes `entries` into the directory's direct clusters and refreshes the
/// inode size. Fails without touching the image when the payload would spill
/// past the direct clusters (about 310 entries at default geometry).
pub fn write_dir<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    inode: &mut Inode,
    entries: &[DirEntry],
) -> Result<()> {
    // entry count is the binding limit: the count prefix lives only in the
    // first cluster, so the size formula alone undercounts clusters
    if entries.len() > NUM_DIRECT_PTRS * ENTRIES_PER_CLUSTER {
        return Err(FsError::DirectoryTooLarge);
    }
    inode.size = dir_size(entries.len());

    device.write_at(
        superblock.data_offset(inode.direct[0]),
        &(entries.len() as u64).to_le_bytes(),
    )?;
    for (i, chunk) in entries.chunks(ENTRIES_PER_CLUSTER).enumerate() {
        let offset = superblock.data_offset(inode.direct[i])
            + if i == 0 { DIR_COUNT_SIZE as u64 } else { 0 };
        let mut buf = Vec::with_capacity(chunk.len() * DIR_ENTRY_SIZE);
        for entry in chunk {
            buf.extend_from_slice(&entry.encode());
        }
        device.write_at(offset, &buf)?;
    }
    device.flush()?;
    Ok(())
}

/// True when `name` is already taken inside the entry list. Callers enforce
/// this before every insert; name uniqueness is an invariant of the image.
pub fn contains_name(entries: &[DirEntry], name: &str) -> bool {
    entries.iter().any(|entry| entry.name_str() == name)
}
