use crate::Config;
use anyhow::{Context, Result};
use log::info;
use std::fs;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Sends a response to the client.
pub async fn send_response<W>(writer: &mut W, message: &[u8]) -> Result<(), std::io::Error>
where
    W: AsyncWrite + Unpin,
{
    writer.write_all(message).await?;
    writer.flush().await?;
    Ok(())
}

pub fn load_config(path: &str) -> Result<Config> {
    let config_str = fs::read_to_string(path)
        .with_context(|| format!("Failed to read configuration file: {}", path))?;
    let config: Config = toml::from_str(&config_str)
        .with_context(|| format!("Failed to parse configuration file: {}", path))?;
    Ok(config)
}

// Helper function to log configuration options
pub fn log_config(config: &Config) {
    info!(
        "  Listen Address: {}:{}",
        config.server.listen_address, config.server.listen_port
    );
    info!("  FTP Timeout: {:?}", config.server.ftp_timeout());
    info!("  FTP Directory: {:?}", config.server.ftp_dir);
    info!("  DTD Directory: {:?}", config.server.dtd_dir);
    info!("  Capture File: {:?}", config.server.outfile);
    info!(
        "  PASV Address: {}",
        config
            .server
            .pasv_address
            .as_deref()
            .unwrap_or("(control connection address)")
    );
    match (&config.tls.cert_file, &config.tls.key_file) {
        (Some(cert), Some(key)) => info!("  TLS: {:?} / {:?}", cert, key),
        _ => info!("  TLS: self-signed for {:?}", config.tls.hostnames),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_response_writes_bytes() {
        let mut out: Vec<u8> = Vec::new();
        send_response(&mut out, b"200 OK\r\n").await.unwrap();
        assert_eq!(out, b"200 OK\r\n");
    }

    #[test]
    fn test_load_config_reports_path() {
        let err = load_config("/nonexistent/xxeuno.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/xxeuno.toml"));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("xxeuno.toml");
        std::fs::write(&path, "[server]\nlisten_port = 8021\n").unwrap();
        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.server.listen_port, 8021);
    }
}
