// Directory access behind the FTP LIST command.

pub mod error;
pub mod local;
pub mod shell;

pub use error::ShellError;
pub use local::LocalShell;
pub use shell::{DirEntry, FileShell};
