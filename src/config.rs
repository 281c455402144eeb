use crate::constants::{
    DEFAULT_FTP_TIMEOUT_SECS, DEFAULT_LISTEN_PORT, DEFAULT_OUTFILE, DEFAULT_WELCOME_MESSAGE,
};
use crate::core_tls::TlsConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_address: String,
    pub listen_port: u16,
    /// Silence (in seconds) after which a fresh connection is treated as FTP.
    pub ftp_timeout: f64,
    pub ftp_dir: PathBuf,
    pub dtd_dir: PathBuf,
    pub outfile: PathBuf,
    /// Public IPv4 address announced in PASV replies. Defaults to the local
    /// address of the control connection.
    pub pasv_address: Option<String>,
    pub welcome_message: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub tls: TlsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_address: String::from("0.0.0.0"),
            listen_port: DEFAULT_LISTEN_PORT,
            ftp_timeout: DEFAULT_FTP_TIMEOUT_SECS,
            ftp_dir: PathBuf::from("./"),
            dtd_dir: PathBuf::from("./"),
            outfile: PathBuf::from(DEFAULT_OUTFILE),
            pasv_address: None,
            welcome_message: String::from(DEFAULT_WELCOME_MESSAGE),
        }
    }
}

impl ServerConfig {
    /// Classification timeout as a `Duration`; negative or NaN values collapse to zero.
    pub fn ftp_timeout(&self) -> Duration {
        if self.ftp_timeout.is_finite() && self.ftp_timeout > 0.0 {
            Duration::from_secs_f64(self.ftp_timeout)
        } else {
            Duration::ZERO
        }
    }
}
