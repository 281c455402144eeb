use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use tokio::io::AsyncWrite;

pub async fn handle_feat_command<W: AsyncWrite + Unpin>(writer: &mut W) -> Result<(), FtpError> {
    send_response(writer, b"211-Features:\r\n EPSV\r\n PASV\r\n211 End\r\n").await?;
    Ok(())
}
