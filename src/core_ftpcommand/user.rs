use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the USER FTP command.
///
/// Any user name is accepted and logged; the session always ends up anonymous.
pub async fn handle_user_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
    username: &str,
) -> Result<(), FtpError> {
    info!("Received USER command from {} with username: {}", session.peer, username);

    session.username = Some(username.to_string());
    session.is_authenticated = false;

    let response: &[u8] = if username.eq_ignore_ascii_case("anonymous") {
        b"331 Guest login ok, type your email address as password.\r\n"
    } else {
        b"331 Password required for user.\r\n"
    };
    send_response(writer, response).await?;
    Ok(())
}
