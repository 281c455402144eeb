use crate::core_shell::error::ShellError;
use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;

/// One row of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub size: u64,
    pub is_dir: bool,
    pub permissions: u32,
    pub hardlinks: u64,
    pub modified: DateTime<Utc>,
    pub owner: String,
    pub group: String,
}

pub type ListFuture<'a> =
    Pin<Box<dyn Future<Output = Result<Vec<DirEntry>, ShellError>> + Send + 'a>>;

/// Read-only view of the served FTP tree.
///
/// `segments` are already normalized (no `.`/`..`, nothing above the root).
pub trait FileShell: Send + Sync {
    fn list<'a>(&'a self, segments: &'a [String]) -> ListFuture<'a>;
}
