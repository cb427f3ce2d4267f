//! The fixed inode table. All hundred inodes live in memory for the whole
//! session and are written back wholesale after every metadata mutation.

use crate::config::*;
use crate::error::Result;
use crate::image::ImageDevice;
use crate::structs::{Inode, SuperBlock};

#[derive(Debug, Clone)]
pub struct InodeTable {
    nodes: Vec<Inode>,
}

impl InodeTable {
    /// A table of free inodes, each carrying its index as its id.
    pub fn new() -> Self {
        InodeTable {
            nodes: (0..INODES_COUNT).map(|id| Inode::empty(id as i32)).collect(),
        }
    }

    pub fn node(&self, id: i32) -> &Inode {
        &self.nodes[id as usize]
    }

    pub fn node_mut(&mut self, id: i32) -> &mut Inode {
        &mut self.nodes[id as usize]
    }

    /// First-fit scan for a free inode.
    pub fn find_free(&self) -> Option<i32> {
        self.nodes.iter().find(|node| node.is_free()).map(|node| node.node_id)
    }

    /// Puts an inode back into its pristine free state.
    pub fn reset(&mut self, id: i32) {
        self.nodes[id as usize] = Inode::empty(id);
    }

    pub fn free_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_free()).count()
    }

    pub fn load<D: ImageDevice>(device: &D, superblock: &SuperBlock) -> Result<Self> {
        let mut buf = vec![0u8; INODE_TABLE_SIZE];
        device.read_at(superblock.inode_start as u64, &mut buf)?;
        Ok(InodeTable {
            nodes: buf.chunks_exact(INODE_SIZE).map(Inode::decode).collect(),
        })
    }

    pub fn save<D: ImageDevice>(&self, device: &D, superblock: &SuperBlock) -> Result<()> {
        let mut buf = Vec::with_capacity(INODE_TABLE_SIZE);
        for node in &self.nodes {
            buf.extend_from_slice(&node.encode());
        }
        device.write_at(superblock.inode_start as u64, &buf)?;
        device.flush()?;
        Ok(())
    }
}

impl Default for InodeTable {
    fn default() -> Self {
        Self::new()
    }
}
