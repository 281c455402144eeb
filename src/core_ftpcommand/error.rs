use crate::core_shell::ShellError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FtpError {
    #[error("Invalid path {path:?} from working directory /{}", cwd.join("/"))]
    InvalidPath { cwd: Vec<String>, path: String },

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Listing failed: {0}")]
    Shell(#[from] ShellError),

    #[error("Control connection I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl FtpError {
    /// Reply sent to the client for failures that keep the connection open.
    /// `None` means the failure is fatal to the connection.
    pub fn to_ftp_response(&self) -> Option<String> {
        match self {
            FtpError::InvalidPath { path, .. } | FtpError::FileNotFound(path) => {
                Some(format!("550 {}: No such file or directory.\r\n", path))
            }
            FtpError::Shell(ShellError::NotFound(path)) => {
                Some(format!("550 {}: No such file or directory.\r\n", path))
            }
            FtpError::Shell(ShellError::PermissionDenied(path)) => {
                Some(format!("550 {}: Permission denied.\r\n", path))
            }
            FtpError::Shell(ShellError::ReadError(..)) => {
                Some("451 Requested action aborted. Local error in processing.\r\n".to_string())
            }
            FtpError::Io(_) => None,
        }
    }
}
