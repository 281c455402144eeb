use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use tokio::io::AsyncWrite;

/// Handles the SYST (System) FTP command.
pub async fn handle_syst_command<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<(), FtpError> {
    send_response(writer, b"215 UNIX Type: L8\r\n").await?;
    Ok(())
}
