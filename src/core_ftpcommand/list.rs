use crate::constants::LIST_QUIRK_FLAGS;
use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::utils::{format_list_line, to_segments};
use crate::core_shell::FileShell;
use crate::helpers::send_response;
use crate::session::Session;
use chrono::{Datelike, Utc};
use log::info;
use tokio::io::AsyncWrite;

/// Handles the LIST FTP command.
///
/// The listing is written to the control connection as a single multi-line
/// reply closed by a 226 line.
pub async fn handle_list_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &Session,
    shell: &dyn FileShell,
    arg: &str,
) -> Result<(), FtpError> {
    let path = strip_quirk_flags(arg);
    info!("FTP LIST command from {} for {:?}", session.peer, path);

    let segments = to_segments(&session.working_dir, path)?;
    let entries = shell.list(&segments).await?;

    let current_year = Utc::now().year();
    let mut msg = String::new();
    for entry in &entries {
        msg.push_str(&format_list_line(entry, current_year));
        msg.push_str("\r\n");
    }
    msg.push_str("226 Directory send OK\r\n");

    send_response(writer, msg.as_bytes()).await?;
    Ok(())
}

/// Flags some clients send as the LIST argument mean "current directory".
pub fn strip_quirk_flags(arg: &str) -> &str {
    if LIST_QUIRK_FLAGS.contains(&arg) {
        ""
    } else {
        arg
    }
}
