use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the RETR FTP command. Files are never sent over FTP.
pub async fn handle_retr_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &Session,
    arg: &str,
) -> Result<(), FtpError> {
    if arg.is_empty() {
        send_response(writer, b"501 Syntax error in parameters or arguments.\r\n").await?;
        return Ok(());
    }

    info!("RETR command received from {}. Path: {}", session.peer, arg);
    Err(FtpError::FileNotFound(arg.to_string()))
}
