#[derive(Eq, Hash, PartialEq, Debug, Clone, Copy)]
pub enum FtpCommand {
    USER,
    PASS,
    QUIT,
    PWD,
    LIST,
    CWD,
    CDUP,
    NOOP,
    RETR,
    STOR,
    PORT,
    PASV,
    EPSV,
    FEAT,
    SYST,
    TYPE,
}

impl FtpCommand {
    pub fn from_str(cmd: &str) -> Option<FtpCommand> {
        match cmd.to_ascii_uppercase().as_str() {
            "USER" => Some(FtpCommand::USER),
            "PASS" => Some(FtpCommand::PASS),
            "QUIT" => Some(FtpCommand::QUIT),
            "PWD" | "XPWD" => Some(FtpCommand::PWD),
            "LIST" => Some(FtpCommand::LIST),
            "CWD" | "XCWD" => Some(FtpCommand::CWD),
            "CDUP" | "XCUP" => Some(FtpCommand::CDUP),
            "NOOP" => Some(FtpCommand::NOOP),
            "RETR" => Some(FtpCommand::RETR),
            "STOR" => Some(FtpCommand::STOR),
            "PORT" => Some(FtpCommand::PORT),
            "PASV" => Some(FtpCommand::PASV),
            "EPSV" => Some(FtpCommand::EPSV),
            "FEAT" => Some(FtpCommand::FEAT),
            "SYST" => Some(FtpCommand::SYST),
            "TYPE" => Some(FtpCommand::TYPE),
            _ => None,
        }
    }

    /// Commands accepted before USER/PASS completed.
    pub fn allowed_before_login(&self) -> bool {
        matches!(
            self,
            FtpCommand::USER
                | FtpCommand::PASS
                | FtpCommand::QUIT
                | FtpCommand::SYST
                | FtpCommand::FEAT
                | FtpCommand::NOOP
        )
    }
}

/// Splits a raw command line into its verb and the untouched remainder.
///
/// Arguments keep inner spaces: exfiltrated content often contains them.
pub fn parse_command_line(line: &str) -> (&str, &str) {
    let line = line.trim_end_matches(['\r', '\n']);
    match line.split_once(' ') {
        Some((verb, arg)) => (verb, arg),
        None => (line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(FtpCommand::from_str("pasv"), Some(FtpCommand::PASV));
        assert_eq!(FtpCommand::from_str("Xpwd"), Some(FtpCommand::PWD));
        assert_eq!(FtpCommand::from_str("MLSD"), None);
    }

    #[test]
    fn test_parse_keeps_spaces_in_argument() {
        assert_eq!(
            parse_command_line("CWD root:x:0:0:root /root\r\n"),
            ("CWD", "root:x:0:0:root /root")
        );
        assert_eq!(parse_command_line("PASV\r\n"), ("PASV", ""));
        assert_eq!(parse_command_line(""), ("", ""));
    }

    #[test]
    fn test_login_gate() {
        assert!(FtpCommand::USER.allowed_before_login());
        assert!(!FtpCommand::LIST.allowed_before_login());
        assert!(!FtpCommand::PASV.allowed_before_login());
    }
}
