use thiserror::Error;

#[derive(Error, Debug)]
pub enum TlsError {
    #[error("Failed to load SSL certificate: {0}")]
    CertificateLoadError(String),

    #[error("Failed to load SSL private key: {0}")]
    PrivateKeyLoadError(String),

    #[error("Failed to generate self-signed certificate: {0}")]
    CertificateGenerationError(String),

    #[error("TLS handshake failed: {0}")]
    TlsHandshakeError(String),

    #[error("TLS configuration error: {0}")]
    TlsConfigError(String),
}

impl TlsError {
    /// Whether the failure happened while building the server context, as
    /// opposed to while talking to one peer.
    pub fn is_setup_failure(&self) -> bool {
        !matches!(self, TlsError::TlsHandshakeError(_))
    }
}
