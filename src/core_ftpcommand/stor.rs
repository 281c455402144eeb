use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the STOR (Store File) FTP command.
///
/// Nothing is stored. The reply only keeps the client pushing its bytes to the
/// data channel, where they are captured.
pub async fn handle_stor_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &Session,
    arg: &str,
) -> Result<(), FtpError> {
    if arg.is_empty() {
        send_response(writer, b"501 Syntax error in parameters or arguments.\r\n").await?;
        return Ok(());
    }

    info!("STOR command received from {}. Path: {}", session.peer, arg);
    send_response(writer, b"125 Data connection already open, starting transfer\r\n").await?;
    Ok(())
}
