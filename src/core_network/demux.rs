use crate::capture::CaptureLog;
use crate::core_ftpcommand::handlers::FtpContext;
use crate::core_http::HttpForwarder;
use crate::core_network::connection_table::{ConnectionTable, SilentDispatch};
use crate::core_network::control_channel::handle_control_connection;
use crate::core_network::data_channel::handle_data_connection;
use crate::core_network::error::NetworkError;
use crate::core_network::replay::ReplayStream;
use crate::core_network::sniffer::{sniff, Protocol};
use crate::core_shell::FileShell;
use crate::core_tls::TlsConnection;
use crate::constants::TLS_HANDSHAKE_PREFIX;
use crate::Config;
use log::{debug, info};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite};

/// Outcome of waiting on a fresh connection.
#[derive(Debug, PartialEq, Eq)]
pub enum FirstContact {
    /// Nothing arrived before the timer fired.
    Silent,
    /// The peer spoke first; these bytes must be replayed.
    Spoke(Vec<u8>),
    /// The peer closed without sending anything.
    Closed,
}

/// The engine a connection is bound to. Chosen once, never revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handoff {
    Control,
    Data { generation: u64 },
    Http { tls: bool },
}

/// Routes every connection of the shared port to its protocol engine.
pub struct Demultiplexer {
    config: Arc<Config>,
    table: Arc<ConnectionTable>,
    shell: Arc<dyn FileShell>,
    capture: Arc<CaptureLog>,
    http: HttpForwarder,
}

impl Demultiplexer {
    pub fn new(
        config: Arc<Config>,
        shell: Arc<dyn FileShell>,
        capture: Arc<CaptureLog>,
        tls: Arc<TlsConnection>,
    ) -> Self {
        let http = HttpForwarder::new(
            config.server.dtd_dir.clone(),
            Arc::clone(&capture),
            tls,
        );
        Self {
            config,
            table: Arc::new(ConnectionTable::new()),
            shell,
            capture,
            http,
        }
    }

    #[cfg(test)]
    pub fn table(&self) -> &ConnectionTable {
        &self.table
    }

    /// Classifies one accepted connection and runs the chosen engine to
    /// completion.
    pub async fn on_accept<S>(
        &self,
        mut stream: S,
        peer: SocketAddr,
        local: SocketAddr,
    ) -> Result<(), NetworkError>
    where
        S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
    {
        let timeout = self.config.server.ftp_timeout();
        let (handoff, consumed) = match first_contact(&mut stream, timeout).await? {
            FirstContact::Closed => {
                debug!("Connection from {} closed before classification", peer);
                return Ok(());
            }
            FirstContact::Silent => {
                info!("Connection from {} stayed silent for {:?}", peer, timeout);
                match self.table.dispatch_silent(peer.ip()).await {
                    SilentDispatch::Control => (Handoff::Control, Vec::new()),
                    SilentDispatch::Data { generation } => (Handoff::Data { generation }, Vec::new()),
                    SilentDispatch::Anomaly(state) => {
                        return Err(NetworkError::ClassificationAnomaly { peer, state });
                    }
                }
            }
            FirstContact::Spoke(bytes) => {
                let tls = sniff(&bytes) == Protocol::Https;
                (Handoff::Http { tls }, bytes)
            }
        };

        let stream = ReplayStream::new(consumed, stream);
        info!(
            "Passing connection from {} to {:?} ({} byte(s) to replay)",
            peer,
            handoff,
            stream.pending().len()
        );

        match handoff {
            Handoff::Control => {
                let ctx = FtpContext {
                    config: Arc::clone(&self.config),
                    shell: Arc::clone(&self.shell),
                    table: Arc::clone(&self.table),
                };
                handle_control_connection(stream, peer, local, ctx, &self.capture).await
            }
            Handoff::Data { generation } => {
                handle_data_connection(stream, peer, generation, &self.table, &self.capture).await
            }
            Handoff::Http { tls } => self.http.handle(stream, peer, tls).await,
        }
    }
}

/// Waits up to `timeout` for the first bytes of a connection.
///
/// Once something arrived, reading continues for at most another `timeout`
/// until enough bytes are buffered to tell TLS from plain text. Whatever is
/// buffered when that runs out gets sniffed as is.
pub async fn first_contact<S>(stream: &mut S, timeout: Duration) -> std::io::Result<FirstContact>
where
    S: AsyncRead + Unpin,
{
    let mut buf = vec![0u8; 4096];
    let n = match tokio::time::timeout(timeout, stream.read(&mut buf)).await {
        Err(_elapsed) => return Ok(FirstContact::Silent),
        Ok(read) => read?,
    };
    if n == 0 {
        return Ok(FirstContact::Closed);
    }
    buf.truncate(n);

    let top_up = async {
        let mut chunk = [0u8; 512];
        while buf.len() < TLS_HANDSHAKE_PREFIX.len() {
            let m = stream.read(&mut chunk).await?;
            if m == 0 {
                break;
            }
            buf.extend_from_slice(&chunk[..m]);
        }
        Ok::<_, std::io::Error>(())
    };
    if let Ok(read) = tokio::time::timeout(timeout, top_up).await {
        read?;
    }
    Ok(FirstContact::Spoke(buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_network::connection_table::DataChannelState;
    use crate::core_shell::LocalShell;
    use crate::core_tls::TlsConfig;
    use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream};

    const TIMEOUT: f64 = 0.05;

    fn demux(root: &std::path::Path) -> Arc<Demultiplexer> {
        let mut config = Config::default();
        config.server.ftp_timeout = TIMEOUT;
        config.server.dtd_dir = root.to_path_buf();
        Arc::new(Demultiplexer::new(
            Arc::new(config),
            Arc::new(LocalShell::new(root)),
            Arc::new(CaptureLog::disabled()),
            Arc::new(TlsConnection::new(TlsConfig::default())),
        ))
    }

    fn connect(
        demux: &Arc<Demultiplexer>,
        peer: &str,
    ) -> (DuplexStream, tokio::task::JoinHandle<Result<(), NetworkError>>) {
        let (client, server) = tokio::io::duplex(64 * 1024);
        let demux = Arc::clone(demux);
        let peer: SocketAddr = peer.parse().unwrap();
        let local: SocketAddr = "10.0.0.1:5000".parse().unwrap();
        let handle = tokio::spawn(async move { demux.on_accept(server, peer, local).await });
        (client, handle)
    }

    async fn read_line(reader: &mut BufReader<DuplexStream>) -> String {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        line
    }

    async fn command(reader: &mut BufReader<DuplexStream>, cmd: &str) -> String {
        reader
            .get_mut()
            .write_all(format!("{}\r\n", cmd).as_bytes())
            .await
            .unwrap();
        read_line(reader).await
    }

    #[tokio::test]
    async fn test_first_contact_outcomes() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        assert_eq!(
            first_contact(&mut server, Duration::from_millis(20))
                .await
                .unwrap(),
            FirstContact::Silent
        );

        client.write_all(b"GET /").await.unwrap();
        assert_eq!(
            first_contact(&mut server, Duration::from_millis(20))
                .await
                .unwrap(),
            FirstContact::Spoke(b"GET /".to_vec())
        );

        drop(client);
        assert_eq!(
            first_contact(&mut server, Duration::from_millis(20))
                .await
                .unwrap(),
            FirstContact::Closed
        );
    }

    #[tokio::test]
    async fn test_first_contact_waits_for_two_bytes() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(&[0x16]).await.unwrap();
        let pending = tokio::spawn(async move {
            first_contact(&mut server, Duration::from_millis(20)).await
        });
        tokio::time::sleep(Duration::from_millis(50)).await;
        client.write_all(&[0x03, 0x01]).await.unwrap();
        assert_eq!(
            pending.await.unwrap().unwrap(),
            FirstContact::Spoke(vec![0x16, 0x03, 0x01])
        );
    }

    #[tokio::test]
    async fn test_first_contact_single_byte_then_quiet() {
        let (mut client, mut server) = tokio::io::duplex(1024);
        client.write_all(b"G").await.unwrap();

        let contact = tokio::time::timeout(
            Duration::from_secs(2),
            first_contact(&mut server, Duration::from_millis(50)),
        )
        .await
        .expect("classification must not hang")
        .unwrap();
        assert_eq!(contact, FirstContact::Spoke(b"G".to_vec()));
        assert_eq!(sniff(b"G"), Protocol::Http);
        drop(client);
    }

    #[tokio::test]
    async fn test_pasv_then_silent_second_connection_is_data() {
        let dir = tempfile::tempdir().unwrap();
        let demux = demux(dir.path());

        let (control, _control_task) = connect(&demux, "10.0.0.2:40000");
        let mut control = BufReader::new(control);
        assert!(read_line(&mut control).await.starts_with("220 "));
        command(&mut control, "USER anonymous").await;
        command(&mut control, "PASS x").await;
        assert!(command(&mut control, "PASV").await.starts_with("227 "));

        let (mut data, data_task) = connect(&demux, "10.0.0.2:40001");
        tokio::time::sleep(Duration::from_secs_f64(TIMEOUT * 4.0)).await;
        let ip = "10.0.0.2".parse().unwrap();
        assert_eq!(
            demux.table().state(ip).await.unwrap().data_channel,
            DataChannelState::Established
        );

        data.write_all(b"exfiltrated line\n").await.unwrap();
        drop(data);
        data_task.await.unwrap().unwrap();
        assert_eq!(
            demux.table().state(ip).await.unwrap().data_channel,
            DataChannelState::Closed
        );
    }

    #[tokio::test]
    async fn test_speaking_second_connection_is_http_despite_pasv() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("x.dtd"), "<!ENTITY a 'b'>").unwrap();
        let demux = demux(dir.path());

        let (control, _control_task) = connect(&demux, "10.0.0.2:40000");
        let mut control = BufReader::new(control);
        read_line(&mut control).await;
        command(&mut control, "USER anonymous").await;
        command(&mut control, "PASS x").await;
        assert!(command(&mut control, "PASV").await.starts_with("227 "));

        let (mut http, http_task) = connect(&demux, "10.0.0.2:40002");
        http.write_all(b"GET /x.dtd HTTP/1.1\r\nHost: a\r\n\r\n")
            .await
            .unwrap();
        let mut out = String::new();
        http.read_to_string(&mut out).await.unwrap();
        http_task.await.unwrap().unwrap();

        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(out.ends_with("<!ENTITY a 'b'>"));
        // the pending PASV is still waiting for its data connection
        assert_eq!(
            demux
                .table()
                .state("10.0.0.2".parse().unwrap())
                .await
                .unwrap()
                .data_channel,
            DataChannelState::Awaiting
        );
    }

    #[tokio::test]
    async fn test_tls_client_hello_goes_to_https() {
        let dir = tempfile::tempdir().unwrap();
        let demux = demux(dir.path());

        let (mut client, task) = connect(&demux, "10.0.0.5:40000");
        // Not a valid ClientHello: the handshake fails after the sniff chose TLS.
        client
            .write_all(&[0x16, 0x03, 0x01, 0x00, 0x01, 0xff])
            .await
            .unwrap();
        drop(client);
        let err = task.await.unwrap().unwrap_err();
        assert!(matches!(err, NetworkError::Tls(_)));
        assert!(demux
            .table()
            .state("10.0.0.5".parse().unwrap())
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_silent_without_pasv_is_closed() {
        let dir = tempfile::tempdir().unwrap();
        let demux = demux(dir.path());

        let (control, _control_task) = connect(&demux, "10.0.0.6:40000");
        let mut control = BufReader::new(control);
        assert!(read_line(&mut control).await.starts_with("220 "));

        let (mut stray, stray_task) = connect(&demux, "10.0.0.6:40001");
        let err = stray_task.await.unwrap().unwrap_err();
        assert!(matches!(err, NetworkError::ClassificationAnomaly { .. }));

        let mut buf = Vec::new();
        stray.read_to_end(&mut buf).await.unwrap();
        assert!(buf.is_empty());
    }

    #[tokio::test]
    async fn test_other_peer_gets_its_own_control_channel() {
        let dir = tempfile::tempdir().unwrap();
        let demux = demux(dir.path());

        let (first, _first_task) = connect(&demux, "10.0.0.7:40000");
        let mut first = BufReader::new(first);
        assert!(read_line(&mut first).await.starts_with("220 "));

        let (second, _second_task) = connect(&demux, "10.0.0.8:40000");
        let mut second = BufReader::new(second);
        assert!(read_line(&mut second).await.starts_with("220 "));
    }
}
