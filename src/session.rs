use std::net::SocketAddr;

/// Per control-connection FTP state. Never shared between connections.
#[derive(Debug)]
pub struct Session {
    pub peer: SocketAddr,
    pub local: SocketAddr,
    pub working_dir: Vec<String>, // normalized segments below the FTP root
    pub username: Option<String>,
    pub is_authenticated: bool,
    pub type_: String, // A or I
    pub quit: bool,
}

impl Session {
    pub fn new(peer: SocketAddr, local: SocketAddr) -> Self {
        Self {
            peer,
            local,
            working_dir: Vec::new(),
            username: None,
            is_authenticated: false,
            type_: "A".to_string(),
            quit: false,
        }
    }
}
