use crate::Config;
use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(
    name = "xxeuno",
    about = "XXE UNO - XXE exploitation helper, aids OAST exploitation of XXE vulnerabilities over a single port using FTP egress"
)]
pub struct Cli {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Global port to listen on (default 5000)
    #[arg(short, long)]
    pub uno: Option<u16>,

    /// Path to the capture output file (default ./output.txt)
    #[arg(short, long)]
    pub outfile: Option<PathBuf>,

    /// Folder to serve DTD(s) from over HTTP (default ./)
    #[arg(short = 'w', long)]
    pub dtddir: Option<PathBuf>,

    /// Folder to serve FTP listings from (default ./)
    #[arg(short = 'f', long)]
    pub ftpdir: Option<PathBuf>,

    /// Seconds of silence before a connection is treated as FTP (default 3)
    #[arg(long)]
    pub ftptimeout: Option<f64>,

    /// IPv4 address announced in PASV replies
    #[arg(long)]
    pub pasv_address: Option<String>,

    /// PEM certificate for HTTPS (self-signed when omitted)
    #[arg(long, requires = "tls_key")]
    pub tls_cert: Option<PathBuf>,

    /// PEM private key for HTTPS
    #[arg(long, requires = "tls_cert")]
    pub tls_key: Option<PathBuf>,

    /// Enable verbose mode
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Overrides configuration values with the ones given on the command line.
    pub fn apply(&self, config: &mut Config) {
        if let Some(port) = self.uno {
            config.server.listen_port = port;
        }
        if let Some(outfile) = &self.outfile {
            config.server.outfile = outfile.clone();
        }
        if let Some(dtddir) = &self.dtddir {
            config.server.dtd_dir = dtddir.clone();
        }
        if let Some(ftpdir) = &self.ftpdir {
            config.server.ftp_dir = ftpdir.clone();
        }
        if let Some(timeout) = self.ftptimeout {
            config.server.ftp_timeout = timeout;
        }
        if let Some(address) = &self.pasv_address {
            config.server.pasv_address = Some(address.clone());
        }
        if let (Some(cert), Some(key)) = (&self.tls_cert, &self.tls_key) {
            config.tls.cert_file = Some(cert.clone());
            config.tls.key_file = Some(key.clone());
        }
    }
}
