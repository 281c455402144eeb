use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use tokio::io::AsyncWrite;

pub async fn handle_noop_command<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<(), FtpError> {
    send_response(writer, b"200 Command OK\r\n").await?;
    Ok(())
}
