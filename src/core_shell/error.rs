use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShellError {
    #[error("No such file or directory: {0}")]
    NotFound(String),

    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    #[error("Failed to read directory {0}: {1}")]
    ReadError(String, std::io::Error),
}

impl ShellError {
    pub fn from_io(path: String, e: std::io::Error) -> Self {
        match e.kind() {
            std::io::ErrorKind::NotFound => ShellError::NotFound(path),
            std::io::ErrorKind::PermissionDenied => ShellError::PermissionDenied(path),
            _ => ShellError::ReadError(path, e),
        }
    }
}
