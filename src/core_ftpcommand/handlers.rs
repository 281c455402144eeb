use crate::core_ftpcommand::error::FtpError;
use crate::core_ftpcommand::ftpcommand::FtpCommand;
use crate::core_ftpcommand::{
    cdup, cwd, feat, list, noop, pass, pwd, quit, retr, stor, syst, type_, user,
};
use crate::core_network::connection_table::ConnectionTable;
use crate::core_network::{pasv, port};
use crate::core_shell::FileShell;
use crate::helpers::send_response;
use crate::session::Session;
use crate::Config;
use log::warn;
use std::sync::Arc;
use tokio::io::AsyncWrite;

/// Everything a control connection shares with the rest of the proxy.
#[derive(Clone)]
pub struct FtpContext {
    pub config: Arc<Config>,
    pub shell: Arc<dyn FileShell>,
    pub table: Arc<ConnectionTable>,
}

/// Runs one command line and writes its reply.
///
/// Per-command failures (bad path, missing file) are answered here and the
/// connection stays open; only I/O errors are returned.
pub async fn dispatch_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
    ctx: &FtpContext,
    verb: &str,
    arg: &str,
) -> Result<(), FtpError> {
    let result = match FtpCommand::from_str(verb) {
        None if verb.is_empty() => {
            send_response(writer, b"500 Syntax error, command unrecognized.\r\n").await?;
            Ok(())
        }
        None => {
            let response = format!("500 '{}': command not understood.\r\n", verb);
            send_response(writer, response.as_bytes()).await?;
            Ok(())
        }
        Some(cmd) if !session.is_authenticated && !cmd.allowed_before_login() => {
            send_response(writer, b"530 Please login with USER and PASS.\r\n").await?;
            Ok(())
        }
        Some(cmd) => run_command(writer, session, ctx, cmd, arg).await,
    };

    match result {
        Ok(()) => Ok(()),
        Err(e) => match e.to_ftp_response() {
            Some(response) => {
                warn!("{} failed for {}: {}", verb, session.peer, e);
                send_response(writer, response.as_bytes()).await?;
                Ok(())
            }
            None => Err(e),
        },
    }
}

async fn run_command<W: AsyncWrite + Unpin>(
    writer: &mut W,
    session: &mut Session,
    ctx: &FtpContext,
    cmd: FtpCommand,
    arg: &str,
) -> Result<(), FtpError> {
    match cmd {
        FtpCommand::USER => user::handle_user_command(writer, session, arg).await,
        FtpCommand::PASS => pass::handle_pass_command(writer, session, arg).await,
        FtpCommand::QUIT => quit::handle_quit_command(writer, session).await,
        FtpCommand::PWD => pwd::handle_pwd_command(writer, session).await,
        FtpCommand::CWD => cwd::handle_cwd_command(writer, session, arg).await,
        FtpCommand::CDUP => cdup::handle_cdup_command(writer, session).await,
        FtpCommand::NOOP => noop::handle_noop_command(writer).await,
        FtpCommand::SYST => syst::handle_syst_command(writer).await,
        FtpCommand::FEAT => feat::handle_feat_command(writer).await,
        FtpCommand::TYPE => type_::handle_type_command(writer, session, arg).await,
        FtpCommand::LIST => {
            list::handle_list_command(writer, session, ctx.shell.as_ref(), arg).await
        }
        FtpCommand::STOR => stor::handle_stor_command(writer, session, arg).await,
        FtpCommand::RETR => retr::handle_retr_command(writer, session, arg).await,
        FtpCommand::PORT => port::handle_port_command(writer, session, arg).await,
        FtpCommand::PASV => {
            pasv::handle_pasv_command(writer, session, &ctx.config, &ctx.table).await
        }
        FtpCommand::EPSV => pasv::handle_epsv_command(writer, session, &ctx.table, arg).await,
    }
}
