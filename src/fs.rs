use std::fs::File;
use std::io::{Read, Write};
use std::sync::Arc;

use crate::bitmap::Bitmap;
use crate::chain::{clusters_for_size, read_chain, release_chain, write_chain};
use crate::config::*;
use crate::directory::{contains_name, dir_size, read_dir, write_dir};
use crate::error::{FsError, Result};
use crate::file::{copy_content, read_content, write_content};
use crate::image::ImageDevice;
use crate::inode::InodeTable;
use crate::path::{inode_to_path, normalize_name, resolve};
use crate::structs::{DirEntry, Inode, InodeKind, SuperBlock};
use crate::superblock::{read_superblock, write_superblock};

/// The file system facade: composes the allocators, the codecs and the path
/// resolver into the command surface. The bitmap and inode table live in
/// memory and are persisted after every mutation; directory payloads and
/// file contents go straight through the device.
pub struct FileSystem<D: ImageDevice> {
    device: Arc<D>,
    superblock: SuperBlock,
    bitmap: Bitmap,
    inodes: InodeTable,
    current: i32,
}

/// One row of an `ls` listing.
#[derive(Debug)]
pub struct LsEntry {
    pub name: String,
    pub size: i32,
    pub node_id: i32,
    pub parent_id: i32,
    pub is_directory: bool,
    /// The stored target path, for symbolic links.
    pub link_target: Option<String>,
}

/// Everything `info` reports about an inode.
#[derive(Debug)]
pub struct NodeInfo {
    pub node_id: i32,
    pub parent_id: i32,
    pub size: i32,
    pub is_free: bool,
    pub is_directory: bool,
    pub is_symlink: bool,
    pub direct: [i32; NUM_DIRECT_PTRS],
    pub indirect: [i32; NUM_INDIRECT_PTRS],
    /// The resolved cluster list; omitted for directories.
    pub clusters: Option<Vec<i32>>,
}

impl<D: ImageDevice> FileSystem<D> {
    /// Initializes a fresh image of `disk_size` bytes: superblock, an all
    /// free bitmap, a table of free inodes and the root directory with its
    /// five direct clusters and the `.` / `..` payload. Fails without
    /// touching the device when the size cannot hold the fixed structures.
    pub fn format(device: Arc<D>, disk_size: u64) -> Result<Self> {
        log::info!("formatting a new image of {} B", disk_size);
        let fixed = (SUPERBLOCK_SIZE + INODE_TABLE_SIZE) as u64;
        if disk_size < fixed || disk_size > i32::MAX as u64 {
            log::error!("disk size {} B is out of range", disk_size);
            return Err(FsError::CannotCreateFile);
        }
        let cluster_count = ((disk_size - fixed) / (1 + CLUSTER_SIZE as u64)) as i32;
        if (cluster_count as usize) < NUM_DIRECT_PTRS {
            log::error!("{} clusters cannot hold the root directory", cluster_count);
            return Err(FsError::CannotCreateFile);
        }

        device.set_len(disk_size)?;
        let superblock = SuperBlock::new(disk_size as i32, cluster_count);
        let mut bitmap = Bitmap::all_free(cluster_count as usize);
        let mut inodes = InodeTable::new();

        let mut root = *inodes.node(ROOT_INODE_ID);
        root.kind = InodeKind::Directory;
        root.parent_id = ROOT_INODE_ID;
        for slot in root.direct.iter_mut() {
            *slot = bitmap.allocate().ok_or(FsError::OutOfClusters)?;
        }
        let entries = [
            DirEntry::new(ROOT_INODE_ID, DOT_NAME),
            DirEntry::new(ROOT_INODE_ID, DOTDOT_NAME),
        ];
        write_dir(&*device, &superblock, &mut root, &entries)?;
        *inodes.node_mut(ROOT_INODE_ID) = root;

        write_superblock(&*device, &superblock)?;
        bitmap.save(&*device, &superblock)?;
        inodes.save(&*device, &superblock)?;

        Ok(FileSystem {
            device,
            superblock,
            bitmap,
            inodes,
            current: ROOT_INODE_ID,
        })
    }

    /// Mounts an existing image: reads the superblock, recomputes the
    /// cluster count from the stored disk size and loads the bitmap and the
    /// inode table. The current directory starts at the root.
    pub fn load(device: Arc<D>) -> Result<Self> {
        let mut superblock = read_superblock(&*device)?;
        let fixed = (SUPERBLOCK_SIZE + INODE_TABLE_SIZE) as i32;
        superblock.cluster_count = (superblock.disk_size - fixed) / (1 + CLUSTER_SIZE as i32);
        let bitmap = Bitmap::load(&*device, &superblock)?;
        let inodes = InodeTable::load(&*device, &superblock)?;
        log::info!(
            "mounted image: {} B, {} clusters",
            superblock.disk_size,
            superblock.cluster_count
        );
        Ok(FileSystem {
            device,
            superblock,
            bitmap,
            inodes,
            current: ROOT_INODE_ID,
        })
    }

    /// Reinitializes the image at a new size, destroying all prior state.
    /// On failure the old state stays in place.
    pub fn reformat(&mut self, disk_size: u64) -> Result<()> {
        *self = Self::format(Arc::clone(&self.device), disk_size)?;
        Ok(())
    }

    pub fn superblock(&self) -> &SuperBlock {
        &self.superblock
    }

    pub fn inode(&self, id: i32) -> &Inode {
        self.inodes.node(id)
    }

    pub fn device(&self) -> Arc<D> {
        Arc::clone(&self.device)
    }

    pub fn free_cluster_count(&self) -> usize {
        self.bitmap.free_count()
    }

    pub fn free_inode_count(&self) -> usize {
        self.inodes.free_count()
    }

    /// Resolves a path the way every operation does; `None` means no such
    /// file or directory.
    pub fn lookup(&self, path: &str) -> Result<Option<i32>> {
        self.resolve(path)
    }

    /// The absolute path of the current directory, trailing slash included.
    pub fn current_path(&self) -> Result<String> {
        inode_to_path(&*self.device, &self.superblock, &self.inodes, self.current)
    }

    /// Creates a directory. A path without `/` creates in the current
    /// directory; otherwise everything before the last `/` must resolve to
    /// an existing directory.
    pub fn mkdir(&mut self, path: &str) -> Result<()> {
        let (parent, name) = match path.rfind('/') {
            Some(pos) => (self.resolve(&path[..pos])?, normalize_name(&path[pos + 1..])),
            None => (Some(self.current), normalize_name(path)),
        };
        let Some(parent_id) = parent else {
            return Err(FsError::PathNotFound);
        };
        if !self.inodes.node(parent_id).is_directory() {
            return Err(FsError::NotADirectory);
        }
        let entries = self.read_dir_of(parent_id)?;
        if contains_name(&entries, &name) {
            return Err(FsError::Exists);
        }
        let node_id = self.inodes.find_free().ok_or(FsError::OutOfInodes)?;

        self.alloc_directory_clusters(node_id)?;
        self.inodes.node_mut(node_id).kind = InodeKind::Directory;
        if let Err(e) = self.attach_to_directory(parent_id, node_id, &name) {
            self.rollback_new_inode(node_id);
            return Err(e);
        }

        let entries = [
            DirEntry::new(node_id, DOT_NAME),
            DirEntry::new(parent_id, DOTDOT_NAME),
        ];
        let mut node = *self.inodes.node(node_id);
        write_dir(&*self.device, &self.superblock, &mut node, &entries)?;
        *self.inodes.node_mut(node_id) = node;

        self.inodes.save(&*self.device, &self.superblock)?;
        self.bitmap.save(&*self.device, &self.superblock)?;
        Ok(())
    }

    /// Removes an empty directory. The root and the current directory are
    /// protected.
    pub fn rmdir(&mut self, path: &str) -> Result<()> {
        let id = self.resolve(path)?.ok_or(FsError::FileNotFound)?;
        let node = self.inodes.node(id);
        if !node.is_directory() {
            return Err(FsError::NotADirectory);
        }
        if id == ROOT_INODE_ID {
            return Err(FsError::CannotRemoveRoot);
        }
        if id == self.current {
            return Err(FsError::CannotRemoveCurrent);
        }
        if node.size != dir_size(2) {
            return Err(FsError::NotEmpty);
        }
        self.detach_from_parent(id)?;
        self.release_inode(id)
    }

    /// Removes a file or a symbolic link; removing a link leaves its target
    /// untouched.
    pub fn rm(&mut self, path: &str) -> Result<()> {
        let id = self.resolve(path)?.ok_or(FsError::FileNotFound)?;
        if self.inodes.node(id).is_directory() {
            return Err(FsError::NotAFile);
        }
        self.detach_from_parent(id)?;
        self.release_inode(id)
    }

    /// Moves the current directory.
    pub fn cd(&mut self, path: &str) -> Result<()> {
        let id = self.resolve(path)?.ok_or(FsError::PathNotFound)?;
        if !self.inodes.node(id).is_directory() {
            return Err(FsError::NotADirectory);
        }
        self.current = id;
        Ok(())
    }

    /// Lists a directory, defaulting to the current one. Symbolic links
    /// carry their stored target path.
    pub fn ls(&self, path: Option<&str>) -> Result<Vec<LsEntry>> {
        let dir_id = match path {
            None => self.current,
            Some(p) => {
                let id = self.resolve(p)?.ok_or(FsError::PathNotFound)?;
                if !self.inodes.node(id).is_directory() {
                    return Err(FsError::NotADirectory);
                }
                id
            }
        };
        let entries = self.read_dir_of(dir_id)?;
        entries
            .iter()
            .map(|entry| {
                let node = self.inodes.node(entry.node_id);
                let link_target = if node.is_symlink() {
                    let payload = read_content(&*self.device, &self.superblock, node)?;
                    Some(String::from_utf8_lossy(&payload).into_owned())
                } else {
                    None
                };
                Ok(LsEntry {
                    name: entry.name_str(),
                    size: node.size,
                    node_id: node.node_id,
                    parent_id: node.parent_id,
                    is_directory: node.is_directory(),
                    link_target,
                })
            })
            .collect()
    }

    /// Returns the content of a file, following symbolic links all the way
    /// to a regular file.
    pub fn cat(&self, path: &str) -> Result<Vec<u8>> {
        let id = self.resolve(path)?.ok_or(FsError::FileNotFound)?;
        if self.inodes.node(id).is_directory() {
            return Err(FsError::CannotPrintDirectory);
        }
        let id = self.follow_symlink(id)?;
        read_content(&*self.device, &self.superblock, self.inodes.node(id))
    }

    /// Imports a host file into the image. Without a destination the file
    /// lands in the current directory under its own basename.
    pub fn incp(&mut self, host_path: &str, destination: Option<&str>) -> Result<()> {
        let destination = match destination {
            Some(d) => d.to_string(),
            None => self.current_path()?,
        };
        let file_name = normalize_name(&self.dest_file_name(host_path, &destination)?);
        let dir_path = self.dest_directory_path(&destination)?;

        let dest_id = self.resolve(&dir_path)?.ok_or(FsError::PathNotFound)?;
        if !self.inodes.node(dest_id).is_directory() {
            return Err(FsError::CannotIncpIntoFile);
        }
        let mut source = File::open(host_path).map_err(|_| FsError::FileNotFound)?;
        let node_id = self.inodes.find_free().ok_or(FsError::OutOfInodes)?;
        let entries = self.read_dir_of(dest_id)?;
        if contains_name(&entries, &file_name) {
            return Err(FsError::Exists);
        }

        let file_size = source.metadata()?.len();
        if file_size > i32::MAX as u64 {
            return Err(FsError::FileTooLarge);
        }
        let clusters = self.draw_clusters(clusters_for_size(file_size as i32))?;

        // stream the host file straight into the drawn clusters
        let mut buf = vec![0u8; CLUSTER_SIZE];
        let mut remaining = file_size as usize;
        for &cluster in &clusters {
            let take = remaining.min(CLUSTER_SIZE);
            if let Err(e) = source
                .read_exact(&mut buf[..take])
                .map_err(FsError::Io)
                .and_then(|_| {
                    self.device
                        .write_at(self.superblock.data_offset(cluster), &buf[..take])
                })
            {
                self.release_clusters(&clusters);
                return Err(e);
            }
            remaining -= take;
        }

        let mut node = *self.inodes.node(node_id);
        node.kind = InodeKind::File;
        node.size = file_size as i32;
        if let Err(e) = write_chain(&*self.device, &self.superblock, &mut self.bitmap, &mut node, &clusters) {
            self.release_clusters(&clusters);
            return Err(e);
        }
        *self.inodes.node_mut(node_id) = node;

        if let Err(e) = self.attach_to_directory(dest_id, node_id, &file_name) {
            self.rollback_new_inode(node_id);
            return Err(e);
        }
        self.bitmap.save(&*self.device, &self.superblock)?;
        Ok(())
    }

    /// Exports a file from the image onto the host, following symbolic
    /// links to the real payload.
    pub fn outcp(&self, source: &str, host_path: &str) -> Result<()> {
        let mut destination = File::create(host_path).map_err(|_| FsError::PathNotFound)?;
        let id = self.resolve(source)?.ok_or(FsError::FileNotFound)?;
        let id = self.follow_symlink(id)?;

        let node = *self.inodes.node(id);
        let clusters = read_chain(&*self.device, &self.superblock, &node)?;
        let mut buf = vec![0u8; CLUSTER_SIZE];
        let mut remaining = node.size as usize;
        for &cluster in &clusters {
            let take = remaining.min(CLUSTER_SIZE);
            self.device
                .read_at(self.superblock.data_offset(cluster), &mut buf[..take])?;
            destination.write_all(&buf[..take])?;
            remaining -= take;
        }
        destination.flush()?;
        Ok(())
    }

    /// Copies a file inside the image. The copy gets its own clusters; the
    /// symbolic-link flag carries over, so copying a link copies the link.
    pub fn cp(&mut self, source: &str, destination: &str) -> Result<()> {
        let file_name = normalize_name(&self.dest_file_name(source, destination)?);
        let dir_path = self.dest_directory_path(destination)?;

        let src_id = self.resolve(source)?.ok_or(FsError::FileNotFound)?;
        let dest_id = self.resolve(&dir_path)?.ok_or(FsError::PathNotFound)?;
        if self.inodes.node(src_id).is_directory() {
            return Err(FsError::CannotCopyDirectory);
        }
        if !self.inodes.node(dest_id).is_directory() {
            return Err(FsError::NotADirectory);
        }
        if file_name.is_empty() {
            return Err(FsError::InvalidName);
        }
        let entries = self.read_dir_of(dest_id)?;
        if contains_name(&entries, &file_name) {
            return Err(FsError::Exists);
        }
        let node_id = self.inodes.find_free().ok_or(FsError::OutOfInodes)?;

        let src = *self.inodes.node(src_id);
        let src_clusters = read_chain(&*self.device, &self.superblock, &src)?;
        let clusters = self.draw_clusters(src_clusters.len() as i32)?;
        if let Err(e) = copy_content(&*self.device, &self.superblock, &src_clusters, &clusters) {
            self.release_clusters(&clusters);
            return Err(e);
        }

        let mut node = *self.inodes.node(node_id);
        node.kind = if src.is_symlink() { InodeKind::Symlink } else { InodeKind::File };
        node.size = src.size;
        if let Err(e) = write_chain(&*self.device, &self.superblock, &mut self.bitmap, &mut node, &clusters) {
            self.release_clusters(&clusters);
            return Err(e);
        }
        *self.inodes.node_mut(node_id) = node;

        if let Err(e) = self.attach_to_directory(dest_id, node_id, &file_name) {
            self.rollback_new_inode(node_id);
            return Err(e);
        }
        self.bitmap.save(&*self.device, &self.superblock)?;
        Ok(())
    }

    /// Moves or renames a file. The inode id is preserved; only directory
    /// entries change. Directories cannot be moved.
    pub fn mv(&mut self, source: &str, destination: &str) -> Result<()> {
        let file_name = normalize_name(&self.dest_file_name(source, destination)?);
        let dir_path = self.dest_directory_path(destination)?;

        let src_id = self.resolve(source)?.ok_or(FsError::FileNotFound)?;
        if self.inodes.node(src_id).is_directory() {
            return Err(FsError::CannotMoveDirectory);
        }
        let dest_id = self.resolve(&dir_path)?.ok_or(FsError::PathNotFound)?;
        if !self.inodes.node(dest_id).is_directory() {
            return Err(FsError::NotADirectory);
        }
        if file_name.is_empty() {
            return Err(FsError::InvalidName);
        }
        let entries = self.read_dir_of(dest_id)?;
        if contains_name(&entries, &file_name) {
            return Err(FsError::Exists);
        }

        // remember the source entry: the detach below is durable before the
        // destination insert runs, so a failed insert must put it back
        let old_parent = self.inodes.node(src_id).parent_id;
        let old_name = self
            .read_dir_of(old_parent)?
            .iter()
            .find(|entry| entry.node_id == src_id)
            .map(|entry| entry.name_str());

        self.detach_from_parent(src_id)?;
        if let Err(e) = self.attach_to_directory(dest_id, src_id, &file_name) {
            if let Some(old_name) = old_name {
                if let Err(restore) = self.attach_to_directory(old_parent, src_id, &old_name) {
                    log::error!(
                        "failed to re-attach i-node {} to its old parent {}: {}",
                        src_id,
                        old_parent,
                        restore
                    );
                }
            }
            return Err(e);
        }
        Ok(())
    }

    /// Creates a symbolic link in the current directory. The link's payload
    /// is the target's absolute path, stored like any file content.
    pub fn slink(&mut self, target: &str, link_name: &str) -> Result<()> {
        let target_id = self.resolve(target)?.ok_or(FsError::FileNotFound)?;
        if self.inodes.node(target_id).is_directory() {
            return Err(FsError::NotAFile);
        }
        let link_name = normalize_name(link_name);
        let entries = self.read_dir_of(self.current)?;
        if contains_name(&entries, &link_name) {
            return Err(FsError::Exists);
        }
        let node_id = self.inodes.find_free().ok_or(FsError::OutOfInodes)?;

        let mut content =
            inode_to_path(&*self.device, &self.superblock, &self.inodes, target_id)?;
        content.pop(); // drop the trailing slash
        let clusters = self.draw_clusters(clusters_for_size(content.len() as i32))?;
        if let Err(e) = write_content(&*self.device, &self.superblock, &clusters, content.as_bytes())
        {
            self.release_clusters(&clusters);
            return Err(e);
        }

        let mut node = *self.inodes.node(node_id);
        node.kind = InodeKind::Symlink;
        node.size = content.len() as i32;
        if let Err(e) = write_chain(&*self.device, &self.superblock, &mut self.bitmap, &mut node, &clusters) {
            self.release_clusters(&clusters);
            return Err(e);
        }
        *self.inodes.node_mut(node_id) = node;

        let current = self.current;
        if let Err(e) = self.attach_to_directory(current, node_id, &link_name) {
            self.rollback_new_inode(node_id);
            return Err(e);
        }
        self.bitmap.save(&*self.device, &self.superblock)?;
        Ok(())
    }

    /// Dumps an inode's fields; for files and links also the full resolved
    /// cluster list.
    pub fn info(&self, path: &str) -> Result<NodeInfo> {
        let id = self.resolve(path)?.ok_or(FsError::FileNotFound)?;
        let node = self.inodes.node(id);
        let clusters = if node.is_directory() {
            None
        } else {
            Some(read_chain(&*self.device, &self.superblock, node)?)
        };
        Ok(NodeInfo {
            node_id: node.node_id,
            parent_id: node.parent_id,
            size: node.size,
            is_free: node.is_free(),
            is_directory: node.is_directory(),
            is_symlink: node.is_symlink(),
            direct: node.direct,
            indirect: node.indirect,
            clusters,
        })
    }

    fn resolve(&self, path: &str) -> Result<Option<i32>> {
        resolve(&*self.device, &self.superblock, &self.inodes, self.current, path)
    }

    fn read_dir_of(&self, id: i32) -> Result<Vec<DirEntry>> {
        read_dir(&*self.device, &self.superblock, self.inodes.node(id))
    }

    /// Follows a chain of symbolic links down to a non-link inode.
    fn follow_symlink(&self, mut id: i32) -> Result<i32> {
        while self.inodes.node(id).is_symlink() {
            let payload = read_content(&*self.device, &self.superblock, self.inodes.node(id))?;
            let target = String::from_utf8_lossy(&payload).into_owned();
            id = self.resolve(&target)?.ok_or(FsError::FileNotFound)?;
        }
        Ok(id)
    }

    /// Gives a fresh directory inode its full set of direct clusters. The
    /// count is fixed regardless of how little the payload needs.
    fn alloc_directory_clusters(&mut self, id: i32) -> Result<()> {
        if !self.bitmap.has_free(NUM_DIRECT_PTRS) {
            return Err(FsError::OutOfClusters);
        }
        for i in 0..NUM_DIRECT_PTRS {
            self.inodes.node_mut(id).direct[i] =
                self.bitmap.allocate().ok_or(FsError::OutOfClusters)?;
        }
        Ok(())
    }

    /// Draws `n` clusters after checking they are all available, so a
    /// capacity failure leaves the bitmap untouched.
    fn draw_clusters(&mut self, n: i32) -> Result<Vec<i32>> {
        if !self.bitmap.has_free(n as usize) {
            return Err(FsError::OutOfClusters);
        }
        (0..n)
            .map(|_| self.bitmap.allocate().ok_or(FsError::OutOfClusters))
            .collect()
    }

    fn release_clusters(&mut self, clusters: &[i32]) {
        for &cluster in clusters {
            self.bitmap.release(cluster);
        }
    }

    /// Links `child_id` into a directory under `name` and persists both the
    /// directory payload and the inode table.
    fn attach_to_directory(&mut self, dir_id: i32, child_id: i32, name: &str) -> Result<()> {
        self.inodes.node_mut(child_id).parent_id = dir_id;
        let mut entries = self.read_dir_of(dir_id)?;
        entries.push(DirEntry::new(child_id, name));
        let mut dir = *self.inodes.node(dir_id);
        write_dir(&*self.device, &self.superblock, &mut dir, &entries)?;
        *self.inodes.node_mut(dir_id) = dir;
        self.inodes.save(&*self.device, &self.superblock)
    }

    /// Removes `child_id`'s entry from its parent directory.
    fn detach_from_parent(&mut self, child_id: i32) -> Result<()> {
        let parent_id = self.inodes.node(child_id).parent_id;
        let mut entries = self.read_dir_of(parent_id)?;
        match entries.iter().position(|entry| entry.node_id == child_id) {
            Some(at) => {
                entries.remove(at);
            }
            None => log::warn!("i-node {} is missing from its parent {}", child_id, parent_id),
        }
        let mut parent = *self.inodes.node(parent_id);
        write_dir(&*self.device, &self.superblock, &mut parent, &entries)?;
        *self.inodes.node_mut(parent_id) = parent;
        self.inodes.save(&*self.device, &self.superblock)
    }

    /// Returns all of an inode's clusters to the bitmap, resets it to the
    /// free state and persists both tables.
    fn release_inode(&mut self, id: i32) -> Result<()> {
        let node = *self.inodes.node(id);
        release_chain(&*self.device, &self.superblock, &mut self.bitmap, &node)?;
        self.inodes.reset(id);
        self.inodes.save(&*self.device, &self.superblock)?;
        self.bitmap.save(&*self.device, &self.superblock)
    }

    /// Undoes a half-built inode after a failed insert: releases whatever
    /// clusters it already owns and frees it again.
    fn rollback_new_inode(&mut self, id: i32) {
        let node = *self.inodes.node(id);
        if let Err(e) = release_chain(&*self.device, &self.superblock, &mut self.bitmap, &node) {
            log::error!("failed to roll back i-node {}: {}", id, e);
        }
        self.inodes.reset(id);
    }

    fn source_file_name(source: &str) -> &str {
        match source.rfind('/') {
            None => source,
            Some(at) => &source[at + 1..],
        }
    }

    /// Works out the destination file name for `cp`/`mv`/`incp`: a plain
    /// name is taken as is; a trailing slash or an existing directory picks
    /// the source's basename; otherwise the last path component wins.
    fn dest_file_name(&self, source: &str, destination: &str) -> Result<String> {
        let Some(at) = destination.rfind('/') else {
            return Ok(destination.to_string());
        };
        if at == destination.len() - 1 {
            return Ok(Self::source_file_name(source).to_string());
        }
        Ok(match self.resolve(destination)? {
            Some(id) if self.inodes.node(id).is_directory() => {
                Self::source_file_name(source).to_string()
            }
            _ => destination[at + 1..].to_string(),
        })
    }

    /// The directory counterpart of [`Self::dest_file_name`].
    fn dest_directory_path(&self, destination: &str) -> Result<String> {
        let Some(at) = destination.rfind('/') else {
            return self.current_path();
        };
        if at == destination.len() - 1 {
            return Ok(destination.to_string());
        }
        Ok(match self.resolve(destination)? {
            Some(id) if self.inodes.node(id).is_directory() => destination.to_string(),
            _ => destination[..at].to_string(),
        })
    }
}
