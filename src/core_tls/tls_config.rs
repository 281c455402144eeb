use crate::core_tls::error::TlsError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TlsConfig {
    /// PEM certificate chain. When absent a self-signed certificate is generated.
    pub cert_file: Option<PathBuf>,

    /// PEM private key matching `cert_file`.
    pub key_file: Option<PathBuf>,

    /// Subject alternative names for the generated certificate.
    pub hostnames: Vec<String>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            cert_file: None,
            key_file: None,
            hostnames: vec![String::from("localhost")],
        }
    }
}

impl TlsConfig {
    /// Checks that cert and key are given together and exist on disk.
    pub fn validate(&self) -> Result<(), TlsError> {
        match (&self.cert_file, &self.key_file) {
            (None, None) => {
                if self.hostnames.is_empty() {
                    return Err(TlsError::TlsConfigError(
                        "at least one hostname is required for a generated certificate".into(),
                    ));
                }
                Ok(())
            }
            (Some(cert), Some(key)) => {
                if !cert.exists() {
                    return Err(TlsError::CertificateLoadError(format!(
                        "Certificate file not found: {:?}",
                        cert
                    )));
                }
                if !key.exists() {
                    return Err(TlsError::PrivateKeyLoadError(format!(
                        "Private key file not found: {:?}",
                        key
                    )));
                }
                Ok(())
            }
            _ => Err(TlsError::TlsConfigError(
                "cert_file and key_file must be set together".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_certificate_is_valid_by_default() {
        assert!(TlsConfig::default().validate().is_ok());
    }

    #[test]
    fn test_cert_without_key_is_rejected() {
        let config = TlsConfig {
            cert_file: Some(PathBuf::from("cert.pem")),
            ..TlsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TlsError::TlsConfigError(_))
        ));
    }

    #[test]
    fn test_missing_files_are_reported() {
        let config = TlsConfig {
            cert_file: Some(PathBuf::from("/nonexistent/cert.pem")),
            key_file: Some(PathBuf::from("/nonexistent/key.pem")),
            ..TlsConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(TlsError::CertificateLoadError(_))
        ));
    }
}
