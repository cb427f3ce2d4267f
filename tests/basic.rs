#![allow(unused)]

mod common;

use std::sync::Arc;

use common::RamDisk;
use zosfs::*;

const IMAGE_SIZE: usize = 1_000_000;

fn fresh_fs() -> FileSystem<RamDisk> {
    let disk = RamDisk::new(IMAGE_SIZE);
    FileSystem::format(Arc::new(disk), IMAGE_SIZE as u64).unwrap()
}

#[test]
fn test_format_geometry() {
    let fs = fresh_fs();
    let sb = fs.superblock();
    assert_eq!(sb.disk_size, 1_000_000);
    assert_eq!(sb.cluster_size, CLUSTER_SIZE as i32);
    // (1_000_000 - 284 - 4400) / (1 + 1000)
    assert_eq!(sb.cluster_count, 994);
    assert_eq!(sb.bitmap_start, SUPERBLOCK_SIZE as i32);
    assert_eq!(sb.inode_start, SUPERBLOCK_SIZE as i32 + 994);
    assert_eq!(sb.data_start, SUPERBLOCK_SIZE as i32 + 994 + INODE_TABLE_SIZE as i32);
    // the root directory holds all five of its direct clusters
    assert_eq!(fs.free_cluster_count(), 994 - NUM_DIRECT_PTRS);
    assert_eq!(fs.free_inode_count(), INODES_COUNT - 1);
}

#[test]
fn test_format_too_small() {
    let disk = RamDisk::new(64);
    let result = FileSystem::format(Arc::new(disk), 4_000);
    assert!(matches!(result, Err(Error::CannotCreateFile)));
}

#[test]
fn test_root_inode() {
    let fs = fresh_fs();
    let root = fs.inode(ROOT_INODE_ID);
    assert_eq!(root.node_id, ROOT_INODE_ID);
    assert_eq!(root.parent_id, ROOT_INODE_ID);
    assert!(root.is_directory());
    assert_eq!(root.size, dir_size(2));
    assert!(root.direct.iter().all(|&c| c != NULL_POINTER));
    assert!(root.indirect.iter().all(|&c| c == NULL_POINTER));
}

#[test]
fn test_root_dir_entries() {
    let fs = fresh_fs();
    let entries = fs.ls(None).unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].name, ".");
    assert_eq!(entries[1].name, "..");
    assert!(entries.iter().all(|e| e.node_id == ROOT_INODE_ID));
}

#[test]
fn test_clusters_for_size() {
    assert_eq!(clusters_for_size(0), 0);
    assert_eq!(clusters_for_size(1), 1);
    assert_eq!(clusters_for_size(999), 1);
    assert_eq!(clusters_for_size(1000), 1);
    assert_eq!(clusters_for_size(1001), 2);
    assert_eq!(clusters_for_size(2500), 3);
    assert_eq!(clusters_for_size(6000), 6);
}

#[test]
fn test_mkdir_cd_pwd() {
    let mut fs = fresh_fs();
    fs.mkdir("Documents").unwrap();
    fs.cd("Documents").unwrap();
    assert_eq!(fs.current_path().unwrap(), "/Documents/");
    fs.cd("..").unwrap();
    assert_eq!(fs.current_path().unwrap(), "/");
}

#[test]
fn test_mkdir_existing_name() {
    let mut fs = fresh_fs();
    fs.mkdir("A").unwrap();
    let result = fs.mkdir("A");
    assert!(matches!(result, Err(Error::Exists)));
    // exactly one new entry next to "." and ".."
    assert_eq!(fs.ls(None).unwrap().len(), 3);
}

#[test]
fn test_mkdir_nested_paths() {
    let mut fs = fresh_fs();
    fs.mkdir("A").unwrap();
    fs.mkdir("A/B").unwrap();
    assert!(fs.lookup("/A/B").unwrap().is_some());

    fs.cd("A/B").unwrap();
    assert_eq!(fs.current_path().unwrap(), "/A/B/");
    fs.mkdir("../C").unwrap();
    assert!(fs.lookup("/A/C").unwrap().is_some());
    fs.cd("/").unwrap();
    assert!(fs.lookup("A/./B").unwrap().is_some());
}

#[test]
fn test_mkdir_missing_parent() {
    let mut fs = fresh_fs();
    let result = fs.mkdir("no/such/dir");
    assert!(matches!(result, Err(Error::PathNotFound)));
    // a leading slash leaves an empty parent path, which never resolves
    let result = fs.mkdir("/A");
    assert!(matches!(result, Err(Error::PathNotFound)));
}

#[test]
fn test_mkdir_trims_long_names() {
    let mut fs = fresh_fs();
    fs.mkdir("abcdefghijklmnop").unwrap();
    // only the trailing 11 bytes survive
    assert!(fs.lookup("fghijklmnop").unwrap().is_some());
    assert!(fs.lookup("abcdefghijklmnop").unwrap().is_none());
}

#[test]
fn test_cd_errors() {
    let mut fs = fresh_fs();
    let result = fs.cd("missing");
    assert!(matches!(result, Err(Error::PathNotFound)));
    assert_eq!(fs.current_path().unwrap(), "/");
}

#[test]
fn test_rmdir_guards() {
    let mut fs = fresh_fs();
    let result = fs.rmdir("missing");
    assert!(matches!(result, Err(Error::FileNotFound)));

    let result = fs.rmdir("/");
    assert!(matches!(result, Err(Error::CannotRemoveRoot)));

    fs.mkdir("A").unwrap();
    fs.cd("A").unwrap();
    let result = fs.rmdir(".");
    assert!(matches!(result, Err(Error::CannotRemoveCurrent)));
    fs.cd("..").unwrap();

    fs.mkdir("A/B").unwrap();
    let result = fs.rmdir("A");
    assert!(matches!(result, Err(Error::NotEmpty)));
    fs.rmdir("A/B").unwrap();
    fs.rmdir("A").unwrap();
}

#[test]
fn test_mkdir_rmdir_round_trip() {
    let mut fs = fresh_fs();
    let free_clusters = fs.free_cluster_count();
    let free_inodes = fs.free_inode_count();

    fs.mkdir("scratch").unwrap();
    assert_eq!(fs.free_cluster_count(), free_clusters - NUM_DIRECT_PTRS);
    assert_eq!(fs.free_inode_count(), free_inodes - 1);

    fs.rmdir("scratch").unwrap();
    assert_eq!(fs.free_cluster_count(), free_clusters);
    assert_eq!(fs.free_inode_count(), free_inodes);
}

#[test]
fn test_inode_reuse() {
    let mut fs = fresh_fs();
    fs.mkdir("A").unwrap();
    let first = fs.lookup("A").unwrap().unwrap();
    fs.rmdir("A").unwrap();
    fs.mkdir("B").unwrap();
    // first-fit hands the same inode out again
    assert_eq!(fs.lookup("B").unwrap().unwrap(), first);
}

#[test]
fn test_directory_entry_ceiling() {
    // the fixed 100-inode table caps real directories at 99 entries, so the
    // payload ceiling is driven against the codec directly
    let disk = RamDisk::new(IMAGE_SIZE);
    let superblock = SuperBlock::new(IMAGE_SIZE as i32, 994);
    let mut node = Inode::empty(1);
    node.kind = InodeKind::Directory;
    for (i, slot) in node.direct.iter_mut().enumerate() {
        *slot = i as i32;
    }

    let limit = NUM_DIRECT_PTRS * ENTRIES_PER_CLUSTER;
    let mut entries: Vec<DirEntry> = (0..limit)
        .map(|i| DirEntry::new(i as i32, &format!("e{}", i)))
        .collect();
    write_dir(&disk, &superblock, &mut node, &entries).unwrap();
    assert_eq!(node.size, dir_size(limit));

    let read_back = read_dir(&disk, &superblock, &node).unwrap();
    assert_eq!(read_back.len(), limit);
    assert_eq!(read_back[limit - 1].name_str(), "e309");

    // one entry past the direct clusters fails without touching the inode
    entries.push(DirEntry::new(limit as i32, "overflow"));
    let size_before = node.size;
    let result = write_dir(&disk, &superblock, &mut node, &entries);
    assert!(matches!(result, Err(Error::DirectoryTooLarge)));
    assert_eq!(node.size, size_before);

    // an inode claiming a payload past the direct clusters is rejected on read
    node.size = dir_size(400);
    let result = read_dir(&disk, &superblock, &node);
    assert!(matches!(result, Err(Error::DirectoryTooLarge)));
}

#[test]
fn test_inode_exhaustion() {
    let mut fs = fresh_fs();
    // the root holds inode 0; 99 more directories drain the table
    for i in 0..INODES_COUNT - 1 {
        fs.mkdir(&format!("d{}", i)).unwrap();
    }
    assert_eq!(fs.free_inode_count(), 0);
    let result = fs.mkdir("one_too_many");
    assert!(matches!(result, Err(Error::OutOfInodes)));
}

#[test]
fn test_mount_round_trip() {
    let disk = RamDisk::new(IMAGE_SIZE);
    {
        let mut fs = FileSystem::format(Arc::new(disk.clone()), IMAGE_SIZE as u64).unwrap();
        fs.mkdir("Documents").unwrap();
        fs.mkdir("Documents/Sub").unwrap();
    }

    let fs = FileSystem::load(Arc::new(disk)).unwrap();
    assert_eq!(fs.superblock().cluster_count, 994);
    assert_eq!(fs.current_path().unwrap(), "/");
    assert!(fs.lookup("/Documents/Sub").unwrap().is_some());

    let entries = fs.ls(Some("/Documents")).unwrap();
    for entry in &entries {
        log!("Inode {} Name {}", entry.node_id, entry.name);
    }
    let names: Vec<String> = entries.iter().map(|e| e.name.clone()).collect();
    assert_eq!(names, vec![".", "..", "Sub"]);
}

#[test]
fn test_load_rejects_garbage() {
    let disk = RamDisk::new(IMAGE_SIZE);
    let result = FileSystem::load(Arc::new(disk));
    assert!(matches!(result, Err(Error::InvalidSuperblock)));
}

#[test]
fn test_path_symmetry() {
    let mut fs = fresh_fs();
    fs.mkdir("A").unwrap();
    fs.mkdir("A/B").unwrap();
    let id = fs.lookup("/A/B").unwrap().unwrap();
    fs.cd("/A/B").unwrap();
    assert_eq!(fs.current_path().unwrap(), "/A/B/");
    assert_eq!(fs.lookup("/A/B").unwrap().unwrap(), id);
}

#[test]
fn test_reformat_destroys_state() {
    let mut fs = fresh_fs();
    fs.mkdir("A").unwrap();
    fs.cd("A").unwrap();
    fs.reformat(500_000).unwrap();
    assert_eq!(fs.current_path().unwrap(), "/");
    assert!(fs.lookup("A").unwrap().is_none());
    // (500_000 - 284 - 4400) / 1001
    assert_eq!(fs.superblock().cluster_count, 494);
}

#[test]
fn test_reformat_too_small_keeps_state() {
    let mut fs = fresh_fs();
    fs.mkdir("A").unwrap();
    let result = fs.reformat(100);
    assert!(matches!(result, Err(Error::CannotCreateFile)));
    assert!(fs.lookup("A").unwrap().is_some());
}
