use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use crate::session::Session;
use tokio::io::AsyncWrite;

/// Handles the TYPE FTP command.
///
/// The type only changes the wording of replies; no data is ever converted.
pub async fn handle_type_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
    arg: &str,
) -> Result<(), FtpError> {
    let parts: Vec<&str> = arg.split_whitespace().collect();
    let primary_type = parts.first().map(|s| s.to_ascii_uppercase()).unwrap_or_default();

    let response = match (primary_type.as_str(), parts.get(1)) {
        ("A", _) | ("I", None) => {
            session.type_ = primary_type.clone();
            format!("200 Type set to {}.\r\n", primary_type)
        }
        ("L", Some(&"8")) => {
            session.type_ = "I".to_string();
            "200 Type set to L 8.\r\n".to_string()
        }
        ("", _) => "501 Syntax error in parameters or arguments.\r\n".to_string(),
        _ => format!("504 Type '{}' not supported.\r\n", arg),
    };

    send_response(writer, response.as_bytes()).await?;
    Ok(())
}
