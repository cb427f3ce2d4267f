use crate::config::*;

/// All multi-byte fields in the image are little-endian; booleans are one
/// byte. The former host-width count fields are frozen to `u64`, which makes
/// this image format version 1 of this implementation.
#[derive(Debug, Clone, Copy)]
pub struct SuperBlock {
    pub signature: [u8; SIGNATURE_LEN],
    pub volume_descriptor: [u8; VOLUME_DESC_LEN],
    pub disk_size: i32,
    pub cluster_size: i32,
    pub cluster_count: i32,
    pub bitmap_start: i32,
    pub inode_start: i32,
    pub data_start: i32,
}

impl SuperBlock {
    /// Byte offset of the data cluster with the given index.
    pub fn data_offset(&self, cluster: i32) -> u64 {
        self.data_start as u64 + cluster as u64 * self.cluster_size as u64
    }

    pub fn encode(&self) -> [u8; SUPERBLOCK_SIZE] {
        let mut buf = [0u8; SUPERBLOCK_SIZE];
        buf[..SIGNATURE_LEN].copy_from_slice(&self.signature);
        buf[SIGNATURE_LEN..SIGNATURE_LEN + VOLUME_DESC_LEN].copy_from_slice(&self.volume_descriptor);
        let mut at = SIGNATURE_LEN + VOLUME_DESC_LEN;
        for field in [
            self.disk_size,
            self.cluster_size,
            self.cluster_count,
            self.bitmap_start,
            self.inode_start,
            self.data_start,
        ] {
            buf[at..at + 4].copy_from_slice(&field.to_le_bytes());
            at += 4;
        }
        buf
    }

    pub fn decode(buf: &[u8; SUPERBLOCK_SIZE]) -> Self {
        let mut signature = [0u8; SIGNATURE_LEN];
        signature.copy_from_slice(&buf[..SIGNATURE_LEN]);
        let mut volume_descriptor = [0u8; VOLUME_DESC_LEN];
        volume_descriptor.copy_from_slice(&buf[SIGNATURE_LEN..SIGNATURE_LEN + VOLUME_DESC_LEN]);
        let at = SIGNATURE_LEN + VOLUME_DESC_LEN;
        let field = |i: usize| i32::from_le_bytes(buf[at + i * 4..at + i * 4 + 4].try_into().unwrap());
        SuperBlock {
            signature,
            volume_descriptor,
            disk_size: field(0),
            cluster_size: field(1),
            cluster_count: field(2),
            bitmap_start: field(3),
            inode_start: field(4),
            data_start: field(5),
        }
    }
}

/// What an inode currently is. The free/directory/symlink flags stored in
/// the image decode into this variant; `Free` implies both flags are clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InodeKind {
    Free,
    File,
    Directory,
    Symlink,
}

#[derive(Debug, Clone, Copy)]
pub struct Inode {
    /// Equals the inode's index in the table.
    pub node_id: i32,
    pub parent_id: i32,
    pub kind: InodeKind,
    pub size: i32,
    pub direct: [i32; NUM_DIRECT_PTRS],
    pub indirect: [i32; NUM_INDIRECT_PTRS],
}

impl Inode {
    /// A free inode with the given id and every pointer nulled out.
    pub fn empty(node_id: i32) -> Self {
        Inode {
            node_id,
            parent_id: NULL_POINTER,
            kind: InodeKind::Free,
            size: 0,
            direct: [NULL_POINTER; NUM_DIRECT_PTRS],
            indirect: [NULL_POINTER; NUM_INDIRECT_PTRS],
        }
    }

    pub fn is_free(&self) -> bool {
        self.kind == InodeKind::Free
    }

    pub fn is_file(&self) -> bool {
        self.kind == InodeKind::File
    }

    pub fn is_directory(&self) -> bool {
        self.kind == InodeKind::Directory
    }

    pub fn is_symlink(&self) -> bool {
        self.kind == InodeKind::Symlink
    }

    pub fn encode(&self) -> [u8; INODE_SIZE] {
        let mut buf = [0u8; INODE_SIZE];
        buf[0..4].copy_from_slice(&self.node_id.to_le_bytes());
        buf[4..8].copy_from_slice(&self.parent_id.to_le_bytes());
        buf[8] = self.is_free() as u8;
        buf[9] = self.is_directory() as u8;
        buf[10] = self.is_symlink() as u8;
        // buf[11] is a reserved pad byte
        buf[12..16].copy_from_slice(&self.size.to_le_bytes());
        for (i, ptr) in self.direct.iter().enumerate() {
            buf[16 + i * 4..20 + i * 4].copy_from_slice(&ptr.to_le_bytes());
        }
        for (i, ptr) in self.indirect.iter().enumerate() {
            buf[36 + i * 4..40 + i * 4].copy_from_slice(&ptr.to_le_bytes());
        }
        buf
    }

    pub fn decode(buf: &[u8]) -> Self {
        let field = |at: usize| i32::from_le_bytes(buf[at..at + 4].try_into().unwrap());
        let kind = if buf[8] != 0 {
            InodeKind::Free
        } else if buf[9] != 0 {
            InodeKind::Directory
        } else if buf[10] != 0 {
            InodeKind::Symlink
        } else {
            InodeKind::File
        };
        let mut direct = [NULL_POINTER; NUM_DIRECT_PTRS];
        for (i, ptr) in direct.iter_mut().enumerate() {
            *ptr = field(16 + i * 4);
        }
        let mut indirect = [NULL_POINTER; NUM_INDIRECT_PTRS];
        for (i, ptr) in indirect.iter_mut().enumerate() {
            *ptr = field(36 + i * 4);
        }
        Inode {
            node_id: field(0),
            parent_id: field(4),
            kind,
            size: field(12),
            direct,
            indirect,
        }
    }
}

/// One 16-byte directory entry: inode id + zero-padded name.
#[derive(Debug, Clone, Copy)]
pub struct DirEntry {
    pub node_id: i32,
    pub name: [u8; FILE_NAME_LEN],
}

impl DirEntry {
    /// Builds an entry, truncating `name` to the 11 visible bytes the image
    /// stores. Callers normalize names before getting here.
    pub fn new(node_id: i32, name: &str) -> Self {
        let mut padded = [0u8; FILE_NAME_LEN];
        let bytes = name.as_bytes();
        let len = bytes.len().min(MAX_FILE_NAME_LEN);
        padded[..len].copy_from_slice(&bytes[..len]);
        DirEntry {
            node_id,
            name: padded,
        }
    }

    /// The entry name up to its NUL terminator.
    pub fn name_str(&self) -> String {
        let end = self.name.iter().position(|&b| b == 0).unwrap_or(FILE_NAME_LEN);
        String::from_utf8_lossy(&self.name[..end]).into_owned()
    }

    pub fn encode(&self) -> [u8; DIR_ENTRY_SIZE] {
        let mut buf = [0u8; DIR_ENTRY_SIZE];
        buf[0..4].copy_from_slice(&self.node_id.to_le_bytes());
        buf[4..].copy_from_slice(&self.name);
        buf
    }

    pub fn decode(buf: &[u8]) -> Self {
        let mut name = [0u8; FILE_NAME_LEN];
        name.copy_from_slice(&buf[4..DIR_ENTRY_SIZE]);
        DirEntry {
            node_id: i32::from_le_bytes(buf[0..4].try_into().unwrap()),
            name,
        }
    }
}
