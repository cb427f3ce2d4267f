use thiserror::Error;

/// Errors produced by the file system core.
///
/// Variants with upper-case messages are the user-facing statuses; the shell
/// prints their `Display` form verbatim on the status channel. The remaining
/// variants are diagnostics and only ever reach the log sink.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("FILE NOT FOUND")]
    FileNotFound,
    #[error("PATH NOT FOUND")]
    PathNotFound,
    #[error("EXISTS")]
    Exists,
    #[error("CANNOT MOVE A DIRECTORY")]
    CannotMoveDirectory,
    #[error("CANNOT COPY A DIRECTORY")]
    CannotCopyDirectory,
    #[error("TARGET IS NOT A DIRECTORY")]
    NotADirectory,
    #[error("TARGET IS NOT A FILE")]
    NotAFile,
    #[error("NOT EMPTY")]
    NotEmpty,
    #[error("CANNOT REMOVE ROOT DIRECTORY")]
    CannotRemoveRoot,
    #[error("CANNOT REMOVE CURRENT DIRECTORY")]
    CannotRemoveCurrent,
    #[error("CANNOT IN-COPY INTO A FILE")]
    CannotIncpIntoFile,
    #[error("CANNOT PRINT OUT DIRECTORY")]
    CannotPrintDirectory,
    #[error("CANNOT CREATE FILE")]
    CannotCreateFile,

    #[error("all i-nodes are occupied")]
    OutOfInodes,
    #[error("not enough free clusters")]
    OutOfClusters,
    #[error("the file is too big for this geometry")]
    FileTooLarge,
    #[error("the directory does not fit into its direct clusters")]
    DirectoryTooLarge,
    #[error("empty file name")]
    InvalidName,
    #[error("invalid superblock")]
    InvalidSuperblock,
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl FsError {
    /// Whether the shell prints this error on the user-status channel.
    /// Everything else is reported through the log sink only.
    pub fn is_user_status(&self) -> bool {
        !matches!(
            self,
            FsError::OutOfInodes
                | FsError::OutOfClusters
                | FsError::FileTooLarge
                | FsError::DirectoryTooLarge
                | FsError::InvalidName
                | FsError::InvalidSuperblock
                | FsError::Io(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, FsError>;
