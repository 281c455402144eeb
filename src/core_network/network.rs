use crate::core_network::demux::Demultiplexer;
use crate::core_network::error::NetworkError;
use crate::Config;
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::sync::Arc;
use tokio::net::{TcpListener, TcpStream};

pub async fn start_server(config: Arc<Config>, demux: Arc<Demultiplexer>) -> Result<()> {
    let address = format!(
        "{}:{}",
        config.server.listen_address, config.server.listen_port
    );
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;
    info!("Server listening on {}", listener.local_addr()?);

    serve(listener, demux).await
}

/// Accepts connections forever, one task each.
pub async fn serve(listener: TcpListener, demux: Arc<Demultiplexer>) -> Result<()> {
    loop {
        let (socket, addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                error!("Error accepting connection: {}", e);
                continue;
            }
        };
        info!("Incoming connection from {}", addr);

        let demux = Arc::clone(&demux);
        tokio::spawn(async move {
            if let Err(e) = handle_connection(socket, &demux).await {
                match e {
                    NetworkError::ClassificationAnomaly { .. } => warn!("{}", e),
                    _ => debug!("Connection from {} ended with error: {}", addr, e),
                }
            }
            debug!("Connection closed for {}", addr);
        });
    }
}

pub async fn handle_connection(socket: TcpStream, demux: &Demultiplexer) -> Result<(), NetworkError> {
    let peer = socket.peer_addr()?;
    let local = socket.local_addr()?;
    demux.on_accept(socket, peer, local).await
}
