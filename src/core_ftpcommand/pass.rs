use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

pub async fn handle_pass_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
    password: &str,
) -> Result<(), FtpError> {
    if session.username.is_none() {
        send_response(writer, b"503 Incorrect sequence of commands: USER required before PASS\r\n")
            .await?;
        return Ok(());
    }

    info!("Received PASS command from {} with password: {}", session.peer, password);
    session.is_authenticated = true;
    send_response(writer, b"230 Anonymous login ok, access restrictions apply.\r\n").await?;
    Ok(())
}
