use chrono::{SecondsFormat, Utc};
use log::warn;
use std::fmt;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Where a captured line came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Ftp,
    FtpData,
    Http,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::Ftp => write!(f, "FTP"),
            Channel::FtpData => write!(f, "FTP-DATA"),
            Channel::Http => write!(f, "HTTP"),
        }
    }
}

/// Append-only record of everything targets send us.
///
/// This is the actual loot of an out-of-band session: exfiltrated content
/// arrives as FTP command arguments, data-channel lines or HTTP requests.
pub struct CaptureLog {
    path: PathBuf,
    file: Mutex<Option<File>>,
}

impl CaptureLog {
    pub async fn open(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        Ok(Self {
            path,
            file: Mutex::new(Some(file)),
        })
    }

    /// A capture log that drops everything.
    pub fn disabled() -> Self {
        Self {
            path: PathBuf::new(),
            file: Mutex::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line. Failures are logged and otherwise ignored.
    pub async fn record(&self, peer: SocketAddr, channel: Channel, line: &str) {
        let mut file = self.file.lock().await;
        let Some(file) = file.as_mut() else {
            return;
        };

        let entry = format_entry(peer, channel, line);
        if let Err(e) = write_entry(file, &entry).await {
            warn!("Failed to write capture entry to {:?}: {}", self.path, e);
        }
    }
}

async fn write_entry(file: &mut File, entry: &str) -> std::io::Result<()> {
    file.write_all(entry.as_bytes()).await?;
    file.flush().await
}

fn format_entry(peer: SocketAddr, channel: Channel, line: &str) -> String {
    format!(
        "{} [{}] {}: {}\n",
        Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        peer,
        channel,
        line.trim_end_matches(['\r', '\n'])
    )
}
