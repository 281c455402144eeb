use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::{display_path, to_segments};
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the CWD FTP command.
///
/// The target is only normalized, never checked on disk: out-of-band clients
/// put exfiltrated data into the path and must be allowed to keep going.
pub async fn handle_cwd_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    if arg.is_empty() {
        send_response(writer, b"501 Syntax error in parameters or arguments.\r\n").await?;
        return Ok(());
    }

    session.working_dir = to_segments(&session.working_dir, arg)?;
    info!(
        "Working directory of {} is now {}",
        session.peer,
        display_path(&session.working_dir)
    );
    send_response(writer, b"250 Requested File Action Completed OK\r\n").await?;
    Ok(())
}
