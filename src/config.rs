pub const SIGNATURE: &str = "silhavyj";
pub const VOLUME_DESCRIPTION: &str = "ZOS project - A Simple File System Emulator";

pub const SIGNATURE_LEN: usize = 9;
pub const VOLUME_DESC_LEN: usize = 251;
pub const FILE_NAME_LEN: usize = 12; // 11 visible bytes + NUL
pub const MAX_FILE_NAME_LEN: usize = FILE_NAME_LEN - 1;

pub const NUM_DIRECT_PTRS: usize = 5; // direct cluster pointers per inode
pub const NUM_INDIRECT_PTRS: usize = 2; // single + double indirect

pub const CLUSTER_SIZE: usize = 1000; // deliberately not a power of two
pub const INODES_COUNT: usize = 100;
pub const DEFAULT_DISK_SIZE: u64 = 50_000_000; // 50 MB

pub const NULL_POINTER: i32 = -1;
pub const ROOT_INODE_ID: i32 = 0;

pub const SUPERBLOCK_SIZE: usize = SIGNATURE_LEN + VOLUME_DESC_LEN + 6 * 4;
pub const INODE_SIZE: usize = 44;
pub const INODE_TABLE_SIZE: usize = INODES_COUNT * INODE_SIZE;

pub const DIR_ENTRY_SIZE: usize = 16; // i32 inode id + 12-byte name
pub const DIR_COUNT_SIZE: usize = 8; // u64 entry count at the head of the first cluster
pub const ENTRIES_PER_CLUSTER: usize = (CLUSTER_SIZE - DIR_COUNT_SIZE) / DIR_ENTRY_SIZE;
pub const PTRS_PER_CLUSTER: usize = CLUSTER_SIZE / 4; // 32-bit cluster pointers

pub const DOT_NAME: &str = ".";
pub const DOTDOT_NAME: &str = "..";
