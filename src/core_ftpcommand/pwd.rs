use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::display_path;
use crate::helpers::send_response;
use crate::session::Session;
use tokio::io::AsyncWrite;

pub async fn handle_pwd_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &Session,
) -> Result<(), FtpError> {
    let response = format!(
        "257 \"{}\" is current directory.\r\n",
        display_path(&session.working_dir)
    );
    send_response(writer, response.as_bytes()).await?;
    Ok(())
}
