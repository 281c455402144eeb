use crate::capture::{CaptureLog, Channel};
use crate::core_network::connection_table::ConnectionTable;
use crate::core_network::control_channel::read_line;
use crate::core_network::error::NetworkError;
use log::{info, warn};
use std::net::SocketAddr;
use tokio::io::{AsyncRead, BufReader};

/// Data engine for the connection announced by PASV/EPSV.
///
/// Nothing is ever sent; every line the client pushes is logged and captured.
/// Lines longer than the line limit are captured as several consecutive
/// entries. `generation` is the table binding this connection owns.
pub async fn handle_data_connection<S>(
    stream: S,
    peer: SocketAddr,
    generation: u64,
    table: &ConnectionTable,
    capture: &CaptureLog,
) -> Result<(), NetworkError>
where
    S: AsyncRead + Unpin,
{
    info!("FTP-Data connection made for {}", peer);

    let result = drain_lines(stream, peer, capture).await;
    match &result {
        Ok(lines) => {
            info!("FTP-Data connection lost for {} after {} line(s)", peer, lines);
            table.data_channel_closed(peer.ip(), generation).await;
        }
        Err(e) => {
            warn!("FTP-Data connection for {} failed: {}", peer, e);
            table.data_channel_failed(peer.ip(), generation).await;
        }
    }
    result.map(|_| ()).map_err(NetworkError::from)
}

async fn drain_lines<S: AsyncRead + Unpin>(
    stream: S,
    peer: SocketAddr,
    capture: &CaptureLog,
) -> std::io::Result<usize> {
    let mut reader = BufReader::new(stream);
    let mut buffer = Vec::new();
    let mut lines = 0;
    while let Some(line) = read_line(&mut reader, &mut buffer).await? {
        info!("FTP-Data received line from {}: {}", peer, line.text);
        capture.record(peer, Channel::FtpData, &line.text).await;
        lines += 1;
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core_network::connection_table::{DataChannelState, SilentDispatch};
    use tokio::io::AsyncWriteExt;

    #[tokio::test]
    async fn test_lines_are_captured_and_state_closed() {
        let dir = tempfile::tempdir().unwrap();
        let capture = CaptureLog::open(dir.path().join("out.txt")).await.unwrap();
        let table = ConnectionTable::new();
        let peer: SocketAddr = "10.0.0.3:41000".parse().unwrap();

        table.dispatch_silent(peer.ip()).await;
        table.request_data_channel(peer.ip()).await;
        let SilentDispatch::Data { generation } = table.dispatch_silent(peer.ip()).await else {
            panic!("expected a data binding");
        };

        let (mut client, server) = tokio::io::duplex(1024);
        client
            .write_all(b"root:x:0:0:root:/root:/bin/bash\ndaemon:x:1:1\r\npartial")
            .await
            .unwrap();
        drop(client);

        handle_data_connection(server, peer, generation, &table, &capture)
            .await
            .unwrap();

        assert_eq!(
            table.state(peer.ip()).await.unwrap().data_channel,
            DataChannelState::Closed
        );
        let contents = std::fs::read_to_string(dir.path().join("out.txt")).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with("FTP-DATA: root:x:0:0:root:/root:/bin/bash"));
        assert!(lines[1].ends_with("FTP-DATA: daemon:x:1:1"));
        assert!(lines[2].ends_with("FTP-DATA: partial"));
    }
}
