use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the QUIT FTP command: replies and marks the session for closing.
pub async fn handle_quit_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
) -> Result<(), FtpError> {
    info!("Received QUIT command from {}. Closing connection.", session.peer);
    session.quit = true;
    send_response(writer, b"221 Goodbye.\r\n").await?;
    Ok(())
}
