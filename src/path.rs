//! Name normalization and path resolution.

use crate::config::*;
use crate::directory::read_dir;
use crate::error::Result;
use crate::image::ImageDevice;
use crate::inode::InodeTable;
use crate::structs::SuperBlock;

/// Normalizes a user-supplied name to the 11 visible bytes the image stores.
/// Overlong names lose their LEADING bytes, keeping the trailing 11 -
/// surprising, but existing images depend on this exact trimming.
pub fn normalize_name(name: &str) -> String {
    let bytes = name.as_bytes();
    if bytes.len() > MAX_FILE_NAME_LEN {
        String::from_utf8_lossy(&bytes[bytes.len() - MAX_FILE_NAME_LEN..]).into_owned()
    } else {
        name.to_string()
    }
}

/// Splits a path into its `/`-separated components, dropping empty ones, so
/// `//a///b` walks the same as `a/b`.
pub fn split_tokens(path: &str) -> Vec<&str> {
    path.split('/').filter(|token| !token.is_empty()).collect()
}

/// Resolves `path` to an inode id. Absolute paths walk from the root,
/// relative ones from `current`; `.` and `..` are resolved through the
/// entries every directory stores for them. Returns `None` when any
/// component is missing or a non-final component is not a directory.
pub fn resolve<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    inodes: &InodeTable,
    current: i32,
    path: &str,
) -> Result<Option<i32>> {
    if path.is_empty() {
        log::warn!("cannot resolve an empty path");
        return Ok(None);
    }
    if path == "/" {
        return Ok(Some(ROOT_INODE_ID));
    }
    if path == DOT_NAME || path == "./" {
        return Ok(Some(current));
    }
    if path == DOTDOT_NAME || path == "../" {
        return Ok(Some(inodes.node(current).parent_id));
    }

    let start = if path.starts_with('/') { ROOT_INODE_ID } else { current };
    let tokens = split_tokens(path);
    if tokens.is_empty() {
        return Ok(None);
    }

    let mut entries = read_dir(device, superblock, inodes.node(start))?;
    let mut target = None;
    for (i, token) in tokens.iter().enumerate() {
        let Some(entry) = entries.iter().find(|entry| entry.name_str() == *token) else {
            return Ok(None);
        };
        let node_id = entry.node_id;
        if i < tokens.len() - 1 {
            if !inodes.node(node_id).is_directory() {
                return Ok(None);
            }
            entries = read_dir(device, superblock, inodes.node(node_id))?;
        }
        target = Some(node_id);
    }
    Ok(target)
}

/// Builds the absolute path of an inode by walking the `parent_id` links up
/// to the root, whose parent is itself. The result always carries a trailing
/// slash (`/a/b/`); the root resolves to `/`.
pub fn inode_to_path<D: ImageDevice>(
    device: &D,
    superblock: &SuperBlock,
    inodes: &InodeTable,
    id: i32,
) -> Result<String> {
    let mut names = Vec::new();
    let mut node = inodes.node(id);
    while node.parent_id != node.node_id {
        let parent = inodes.node(node.parent_id);
        let entries = read_dir(device, superblock, parent)?;
        if let Some(entry) = entries.iter().find(|entry| entry.node_id == node.node_id) {
            names.push(entry.name_str());
        }
        node = parent;
    }

    let mut path = String::from("/");
    for name in names.iter().rev() {
        path.push_str(name);
        path.push('/');
    }
    Ok(path)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_normalize_short_names() {
        assert_eq!(normalize_name("data.txt"), "data.txt");
        assert_eq!(normalize_name("exactly11ch"), "exactly11ch");
    }

    #[test]
    fn test_normalize_trims_leading_bytes() {
        assert_eq!(normalize_name("a_very_long_name.txt"), "ng_name.txt");
        assert_eq!(normalize_name("twelve_chars"), "welve_chars");
    }

    #[test]
    fn test_split_tokens() {
        assert_eq!(split_tokens("/doc/zos/a.txt"), vec!["doc", "zos", "a.txt"]);
        assert_eq!(split_tokens("doc//a.txt"), vec!["doc", "a.txt"]);
        assert!(split_tokens("///").is_empty());
    }
}
