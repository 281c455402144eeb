use crate::core_ftpcommand::error::FtpError;
use crate::core_network::connection_table::ClientConnectionState;
use crate::core_tls::TlsError;
use std::net::SocketAddr;
use thiserror::Error;

/// Failures scoped to a single accepted connection.
#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Silent connection from {peer} with no pending data channel ({state:?})")]
    ClassificationAnomaly {
        peer: SocketAddr,
        state: ClientConnectionState,
    },

    #[error("Could not hand off connection from {peer}: {source}")]
    HandoffFailure { peer: SocketAddr, source: TlsError },

    #[error("TLS error: {0}")]
    Tls(#[from] TlsError),

    #[error("HTTP error: {0}")]
    Http(#[from] hyper::Error),

    #[error("FTP error: {0}")]
    Ftp(#[from] FtpError),

    #[error("Transport error: {0}")]
    Transport(#[from] std::io::Error),
}
