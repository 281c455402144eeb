use crate::core_shell::error::ShellError;
use crate::core_shell::shell::{DirEntry, FileShell, ListFuture};
use chrono::{DateTime, Utc};
use log::debug;
use std::fs::Metadata;
use std::path::{Path, PathBuf};

/// File shell over a directory on the local disk.
#[derive(Debug, Clone)]
pub struct LocalShell {
    root: PathBuf,
}

impl LocalShell {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, segments: &[String]) -> PathBuf {
        segments
            .iter()
            .fold(self.root.clone(), |path, segment| path.join(segment))
    }

    async fn list_path(&self, segments: &[String]) -> Result<Vec<DirEntry>, ShellError> {
        let path = self.resolve(segments);
        let display = format!("/{}", segments.join("/"));

        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|e| ShellError::from_io(display.clone(), e))?;

        if !metadata.is_dir() {
            let name = segments.last().cloned().unwrap_or_default();
            return Ok(vec![to_entry(name, &metadata)]);
        }

        let mut read_dir = tokio::fs::read_dir(&path)
            .await
            .map_err(|e| ShellError::from_io(display.clone(), e))?;

        let mut entries = Vec::new();
        while let Some(child) = read_dir
            .next_entry()
            .await
            .map_err(|e| ShellError::from_io(display.clone(), e))?
        {
            let name = child.file_name().to_string_lossy().into_owned();
            match tokio::fs::metadata(child.path()).await {
                Ok(metadata) => entries.push(to_entry(name, &metadata)),
                // dangling symlinks and races with deletion
                Err(e) => debug!("Skipping {:?} in listing: {}", child.path(), e),
            }
        }
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

impl FileShell for LocalShell {
    fn list<'a>(&'a self, segments: &'a [String]) -> ListFuture<'a> {
        Box::pin(self.list_path(segments))
    }
}

fn to_entry(name: String, metadata: &Metadata) -> DirEntry {
    let modified = metadata
        .modified()
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| DateTime::<Utc>::from(std::time::UNIX_EPOCH));
    let (permissions, hardlinks, owner, group) = ownership(metadata);

    DirEntry {
        name,
        size: metadata.len(),
        is_dir: metadata.is_dir(),
        permissions,
        hardlinks,
        modified,
        owner,
        group,
    }
}

#[cfg(unix)]
fn ownership(metadata: &Metadata) -> (u32, u64, String, String) {
    use std::os::unix::fs::MetadataExt;
    (
        metadata.mode() & 0o777,
        metadata.nlink(),
        metadata.uid().to_string(),
        metadata.gid().to_string(),
    )
}

#[cfg(not(unix))]
fn ownership(_metadata: &Metadata) -> (u32, u64, String, String) {
    (0o755, 1, String::from("ftp"), String::from("ftp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn segments(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_lists_directory_sorted() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("b.dtd"), b"<!ENTITY x 'y'>").unwrap();
        std::fs::write(dir.path().join("a.txt"), b"hello").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();

        let shell = LocalShell::new(dir.path());
        let entries = shell.list(&[]).await.unwrap();

        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.txt", "b.dtd", "sub"]);
        assert_eq!(entries[0].size, 5);
        assert!(!entries[0].is_dir);
        assert!(entries[2].is_dir);
    }

    #[tokio::test]
    async fn test_lists_single_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub").join("f.txt"), b"42").unwrap();

        let shell = LocalShell::new(dir.path());
        let entries = shell.list(&segments(&["sub", "f.txt"])).await.unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].name, "f.txt");
        assert_eq!(entries[0].size, 2);
    }

    #[tokio::test]
    async fn test_missing_path_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let shell = LocalShell::new(dir.path());
        let err = shell.list(&segments(&["nope"])).await.unwrap_err();
        assert!(matches!(err, ShellError::NotFound(ref p) if p == "/nope"));
    }
}
