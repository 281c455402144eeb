use crate::core_ftpcommand::error::FtpError;
use crate::core_network::connection_table::ConnectionTable;
use crate::helpers::send_response;
use crate::session::Session;
use crate::Config;
use log::{info, warn};
use std::net::{IpAddr, Ipv4Addr};
use tokio::io::AsyncWrite;

/// Handles PASV by announcing the shared port itself.
///
/// No second listener exists: the client's data connection lands on the same
/// port and the demultiplexer recognizes it from the table entry set here.
pub async fn handle_pasv_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &Session,
    config: &Config,
    table: &ConnectionTable,
) -> Result<(), FtpError> {
    let Some(host) = passive_ipv4(config, session) else {
        warn!(
            "PASV from {} on a non-IPv4 control connection {}",
            session.peer, session.local
        );
        send_response(writer, b"425 Can't open passive connection, use EPSV.\r\n").await?;
        return Ok(());
    };

    let port = session.local.port();
    let response = format!(
        "227 Entering Passive Mode ({}).\r\n",
        encode_host_port(host, port)
    );
    info!("PASV cmd received from {}, replying: {}:{}", session.peer, host, port);

    // Recorded before replying: the client may connect as soon as it reads the reply.
    table.request_data_channel(session.peer.ip()).await;
    send_response(writer, response.as_bytes()).await?;
    Ok(())
}

/// Handles EPSV (RFC 2428), the address-family agnostic twin of PASV.
pub async fn handle_epsv_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &Session,
    table: &ConnectionTable,
    arg: &str,
) -> Result<(), FtpError> {
    if arg.eq_ignore_ascii_case("ALL") {
        send_response(writer, b"200 EPSV ALL ok.\r\n").await?;
        return Ok(());
    }

    let port = session.local.port();
    let response = format!("229 Entering Extended Passive Mode (|||{}|)\r\n", port);
    info!("EPSV cmd received from {}, replying port {}", session.peer, port);

    table.request_data_channel(session.peer.ip()).await;
    send_response(writer, response.as_bytes()).await?;
    Ok(())
}

/// RFC 959 host-port form: four address octets, then port high and low byte.
pub fn encode_host_port(host: Ipv4Addr, port: u16) -> String {
    let [h1, h2, h3, h4] = host.octets();
    format!("{},{},{},{},{},{}", h1, h2, h3, h4, port >> 8, port & 0xFF)
}

/// Address announced in PASV: the configured one, or the local end of the
/// control connection.
pub fn passive_ipv4(config: &Config, session: &Session) -> Option<Ipv4Addr> {
    if let Some(address) = config.server.pasv_address.as_deref() {
        match address.parse::<Ipv4Addr>() {
            Ok(ip) => return Some(ip),
            Err(e) => warn!("Ignoring invalid pasv_address {:?}: {}", address, e),
        }
    }
    match session.local.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(ip) => ip.to_ipv4_mapped(),
    }
}
