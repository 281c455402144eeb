use crate::core_ftpcommand::error::FtpError;
use crate::helpers::send_response;
use crate::session::Session;
use log::info;
use tokio::io::AsyncWrite;

/// Handles the PORT (Active Mode) FTP command by refusing it, which makes
/// clients fall back to PASV.
pub async fn handle_port_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &Session,
    arg: &str,
) -> Result<(), FtpError> {
    info!("PORT cmd received from {} ({}), forcing PASV mode", session.peer, arg);
    send_response(writer, b"502 PORT cmd not supported, use PASV mode\r\n").await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_port_is_always_rejected() {
        let session = Session::new(
            "10.0.0.2:40000".parse().unwrap(),
            "10.0.0.1:5000".parse().unwrap(),
        );
        let mut replies = Vec::new();
        for arg in ["10,0,0,2,156,64", "10,0,0,2,156,64", "garbage"] {
            let mut out: Vec<u8> = Vec::new();
            handle_port_command(&mut out, &session, arg).await.unwrap();
            replies.push(out);
        }
        assert!(replies.windows(2).all(|w| w[0] == w[1]));
        assert!(replies[0].starts_with(b"502 "));
    }
}
