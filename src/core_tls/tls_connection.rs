use crate::core_tls::error::TlsError;
use crate::core_tls::tls_config::TlsConfig;
use log::info;
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs8KeyDer};
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::OnceCell;
use tokio_rustls::server::TlsStream;
use tokio_rustls::TlsAcceptor;

/// Hands out the TLS server context used for HTTPS connections.
///
/// The acceptor is built on first use and shared afterwards, so a proxy that
/// never sees an HTTPS client never touches certificates.
pub struct TlsConnection {
    config: TlsConfig,
    tls_acceptor: OnceCell<TlsAcceptor>,
}

impl TlsConnection {
    pub fn new(config: TlsConfig) -> Self {
        Self {
            config,
            tls_acceptor: OnceCell::new(),
        }
    }

    pub fn is_ready(&self) -> bool {
        self.tls_acceptor.initialized()
    }

    pub async fn acceptor(&self) -> Result<&TlsAcceptor, TlsError> {
        self.tls_acceptor
            .get_or_try_init(|| async { build_acceptor(&self.config) })
            .await
    }

    pub async fn accept_tls<IO>(&self, stream: IO) -> Result<TlsStream<IO>, TlsError>
    where
        IO: AsyncRead + AsyncWrite + Unpin,
    {
        let acceptor = self.acceptor().await?;
        acceptor
            .accept(stream)
            .await
            .map_err(|e| TlsError::TlsHandshakeError(e.to_string()))
    }
}

fn build_acceptor(config: &TlsConfig) -> Result<TlsAcceptor, TlsError> {
    config.validate()?;

    let (cert_chain, private_key) = match (&config.cert_file, &config.key_file) {
        (Some(cert), Some(key)) => {
            info!("Loading TLS certificate from {:?}", cert);
            (load_certs(cert)?, load_private_key(key)?)
        }
        _ => {
            info!(
                "Generating self-signed TLS certificate for {:?}",
                config.hostnames
            );
            generate_self_signed(&config.hostnames)?
        }
    };

    let server_config = rustls::ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert_chain, private_key)
        .map_err(|e| TlsError::TlsConfigError(e.to_string()))?;

    Ok(TlsAcceptor::from(Arc::new(server_config)))
}

fn load_certs(path: &Path) -> Result<Vec<CertificateDer<'static>>, TlsError> {
    let file =
        std::fs::File::open(path).map_err(|e| TlsError::CertificateLoadError(e.to_string()))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| TlsError::CertificateLoadError(e.to_string()))?;

    if certs.is_empty() {
        return Err(TlsError::CertificateLoadError(format!(
            "No certificate found in {:?}",
            path
        )));
    }
    Ok(certs)
}

fn load_private_key(path: &Path) -> Result<PrivateKeyDer<'static>, TlsError> {
    let file =
        std::fs::File::open(path).map_err(|e| TlsError::PrivateKeyLoadError(e.to_string()))?;
    match rustls_pemfile::private_key(&mut BufReader::new(file)) {
        Ok(Some(key)) => Ok(key),
        Ok(None) => Err(TlsError::PrivateKeyLoadError(
            "No private key found".to_string(),
        )),
        Err(e) => Err(TlsError::PrivateKeyLoadError(e.to_string())),
    }
}

fn generate_self_signed(
    hostnames: &[String],
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>), TlsError> {
    let cert = rcgen::generate_simple_self_signed(hostnames.to_vec())
        .map_err(|e| TlsError::CertificateGenerationError(e.to_string()))?;
    let cert_der = cert
        .serialize_der()
        .map_err(|e| TlsError::CertificateGenerationError(e.to_string()))?;
    let key_der = PrivatePkcs8KeyDer::from(cert.serialize_private_key_der());

    Ok((
        vec![CertificateDer::from(cert_der)],
        PrivateKeyDer::Pkcs8(key_der),
    ))
}
