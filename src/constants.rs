// src/constants.rs

use std::time::Duration;

pub const DEFAULT_LISTEN_PORT: u16 = 5000;
pub const DEFAULT_FTP_TIMEOUT_SECS: f64 = 3.0;
pub const DEFAULT_OUTFILE: &str = "./output.txt";
pub const DEFAULT_WELCOME_MESSAGE: &str = "Welcome to XXE UNO FTP server.";

/// Longest command or data line accepted before it is cut.
pub const MAX_LINE_LENGTH: u64 = 64 * 1024;
/// Read buffer limit for an HTTP request head.
pub const MAX_HTTP_HEAD: usize = 16 * 1024;
/// Time an HTTP client gets to send its complete request head.
pub const HTTP_HEADER_TIMEOUT: Duration = Duration::from_secs(10);

/// TLS record header prefix of a handshake record (content type 22, major version 3).
pub const TLS_HANDSHAKE_PREFIX: [u8; 2] = [0x16, 0x03];

/// Arguments some clients send with LIST that are not paths.
/// -a: konqueror, -aL: gFTP 2.0.15, -L: Nautilus 2.10.0, -la: ange-ftp.
pub const LIST_QUIRK_FLAGS: [&str; 4] = ["-a", "-aL", "-L", "-la"];

pub const PERMISSIONS_PLACEHOLDER: &str = "rwxr-xr-x";
