use crate::capture::{CaptureLog, Channel};
use crate::constants::MAX_LINE_LENGTH;
use crate::core_ftpcommand::ftpcommand::parse_command_line;
use crate::core_ftpcommand::handlers::{dispatch_command, FtpContext};
use crate::core_network::error::NetworkError;
use crate::helpers::send_response;
use crate::session::Session;
use log::{debug, info, warn};
use std::net::SocketAddr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, BufReader};

/// FTP control engine for one connection.
///
/// Greets, then interprets CRLF command lines until QUIT, EOF or an I/O
/// error. The peer's table entry is released on every exit path.
pub async fn handle_control_connection<S>(
    stream: S,
    peer: SocketAddr,
    local: SocketAddr,
    ctx: FtpContext,
    capture: &CaptureLog,
) -> Result<(), NetworkError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    info!("FTP control connection made for {}", peer);

    let (reader, mut writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let mut session = Session::new(peer, local);

    let result: Result<(), NetworkError> = async {
        let greeting = format!("220 {}\r\n", ctx.config.server.welcome_message);
        send_response(&mut writer, greeting.as_bytes()).await?;
        command_loop(&mut reader, &mut writer, &mut session, &ctx, capture).await
    }
    .await;

    ctx.table.release_control(peer.ip()).await;
    match &result {
        Ok(()) => info!("FTP control connection closed for {}", peer),
        Err(e) => warn!("FTP control connection for {} failed: {}", peer, e),
    }
    result
}

async fn command_loop<R, W>(
    reader: &mut R,
    writer: &mut W,
    session: &mut Session,
    ctx: &FtpContext,
    capture: &CaptureLog,
) -> Result<(), NetworkError>
where
    R: AsyncRead + AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buffer = Vec::new();
    loop {
        let Some(line) = read_line(reader, &mut buffer).await? else {
            debug!("Client {} disconnected", session.peer);
            return Ok(());
        };

        info!("Received line from {}: {}", session.peer, line.text);
        capture.record(session.peer, Channel::Ftp, &line.text).await;

        if line.truncated {
            skip_line(reader).await?;
            warn!("Command line from {} exceeds {} bytes", session.peer, MAX_LINE_LENGTH);
            send_response(writer, b"500 Command line too long.\r\n").await?;
            continue;
        }

        let (verb, arg) = parse_command_line(&line.text);
        dispatch_command(writer, session, ctx, verb, arg).await?;

        if session.quit {
            return Ok(());
        }
    }
}

/// One line read from a connection, terminator stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    /// The line reached `MAX_LINE_LENGTH` before its terminator; the rest is
    /// still unread.
    pub truncated: bool,
}

/// Reads one `\n`-terminated line (lossy UTF-8), at most `MAX_LINE_LENGTH`
/// bytes. Returns `None` at end of stream.
pub async fn read_line<R>(reader: &mut R, buffer: &mut Vec<u8>) -> std::io::Result<Option<Line>>
where
    R: AsyncRead + AsyncBufRead + Unpin,
{
    buffer.clear();
    let n = (&mut *reader)
        .take(MAX_LINE_LENGTH)
        .read_until(b'\n', buffer)
        .await?;
    if n == 0 {
        return Ok(None);
    }
    let truncated = n as u64 == MAX_LINE_LENGTH && buffer.last() != Some(&b'\n');
    let text = String::from_utf8_lossy(buffer)
        .trim_end_matches(['\r', '\n'])
        .to_string();
    Ok(Some(Line { text, truncated }))
}

/// Discards input up to and including the next `\n`.
async fn skip_line<R: AsyncBufRead + Unpin>(reader: &mut R) -> std::io::Result<()> {
    loop {
        let available = reader.fill_buf().await?;
        if available.is_empty() {
            return Ok(());
        }
        match available.iter().position(|&b| b == b'\n') {
            Some(i) => {
                reader.consume(i + 1);
                return Ok(());
            }
            None => {
                let len = available.len();
                reader.consume(len);
            }
        }
    }
}
