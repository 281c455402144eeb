use crate::core_ftpcommand::cwd::handle_cwd_command;
use crate::core_ftpcommand::error::FtpError;
use crate::session::Session;
use tokio::io::AsyncWrite;

pub async fn handle_cdup_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
) -> Result<(), FtpError> {
    handle_cwd_command(writer, session, "..").await
}
