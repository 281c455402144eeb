use crate::constants::TLS_HANDSHAKE_PREFIX;

/// Protocol of a connection that spoke before the FTP timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Protocol {
    Http,
    Https,
}

pub fn sniff(first_bytes: &[u8]) -> Protocol {
    if first_bytes.starts_with(&TLS_HANDSHAKE_PREFIX) {
        Protocol::Https
    } else {
        Protocol::Http
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_hello_is_https() {
        assert_eq!(sniff(&[0x16, 0x03, 0x01, 0x02, 0x00]), Protocol::Https);
        assert_eq!(sniff(&[0x16, 0x03]), Protocol::Https);
    }

    #[test]
    fn test_everything_else_is_http() {
        assert_eq!(sniff(b"GET / HTTP/1.1\r\n"), Protocol::Http);
        assert_eq!(sniff(&[0x16]), Protocol::Http);
        assert_eq!(sniff(&[0x16, 0x02]), Protocol::Http);
        assert_eq!(sniff(b""), Protocol::Http);
    }
}
