use crate::capture::CaptureLog;
use crate::core_network::demux::Demultiplexer;
use crate::core_network::network;
use crate::core_shell::LocalShell;
use crate::core_tls::TlsConnection;
use crate::Config;
use anyhow::{Context, Result};
use log::{error, info, warn};
use std::sync::Arc;

/// Builds the shared services and runs the single-port listener until it fails.
pub async fn run(config: Config) -> Result<()> {
    // A broken TLS setup only affects HTTPS clients, plain traffic still works.
    if let Err(e) = config.tls.validate() {
        warn!("TLS configuration is unusable, HTTPS connections will fail: {}", e);
    }

    let capture = CaptureLog::open(&config.server.outfile)
        .await
        .with_context(|| format!("Failed to open capture file {:?}", config.server.outfile))?;
    info!("Capturing exfiltrated lines to {:?}", capture.path());

    let shell = Arc::new(LocalShell::new(config.server.ftp_dir.clone()));
    info!("Serving FTP listings from {:?}", shell.root());
    let tls = Arc::new(TlsConnection::new(config.tls.clone()));
    let config = Arc::new(config);
    let demux = Arc::new(Demultiplexer::new(
        Arc::clone(&config),
        shell,
        Arc::new(capture),
        tls,
    ));

    match network::start_server(config, demux).await {
        Ok(()) => Ok(()),
        Err(e) => {
            error!("Failed to start server: {:#}", e);
            Err(e)
        }
    }
}
