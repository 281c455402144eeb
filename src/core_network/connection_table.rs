use log::debug;
use std::collections::HashMap;
use std::net::IpAddr;
use tokio::sync::Mutex;

/// Lifecycle of the data connection announced by PASV/EPSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DataChannelState {
    #[default]
    Closed,
    Awaiting,
    Established,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientConnectionState {
    pub control_established: bool,
    pub data_channel: DataChannelState,
    /// Bumped by every PASV/EPSV. A data connection only owns the state of
    /// the generation it was bound under.
    pub data_generation: u64,
}

/// What to do with a connection that stayed silent for the whole timeout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SilentDispatch {
    Control,
    Data { generation: u64 },
    /// The peer already has a control channel and announced no data channel.
    Anomaly(ClientConnectionState),
}

/// Per-peer record correlating a control channel with its data channel.
///
/// Both connections of one FTP session arrive on the same port from the same
/// address, so the peer IP is the only key that ties them together. Every
/// transition is a single read-modify-write under one lock.
#[derive(Debug, Default)]
pub struct ConnectionTable {
    peers: Mutex<HashMap<IpAddr, ClientConnectionState>>,
}

impl ConnectionTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub async fn state(&self, peer: IpAddr) -> Option<ClientConnectionState> {
        self.peers.lock().await.get(&key(peer)).copied()
    }

    /// Classifies a silent connection and records the binding it implies.
    pub async fn dispatch_silent(&self, peer: IpAddr) -> SilentDispatch {
        let mut peers = self.peers.lock().await;
        let state = peers.entry(key(peer)).or_default();

        if !state.control_established {
            state.control_established = true;
            return SilentDispatch::Control;
        }
        if state.data_channel == DataChannelState::Awaiting {
            state.data_channel = DataChannelState::Established;
            return SilentDispatch::Data {
                generation: state.data_generation,
            };
        }
        SilentDispatch::Anomaly(*state)
    }

    /// PASV/EPSV was answered: the next silent connection from `peer` is data.
    pub async fn request_data_channel(&self, peer: IpAddr) {
        let mut peers = self.peers.lock().await;
        let state = peers.entry(key(peer)).or_default();
        debug!(
            "Awaiting FTP data channel for {} (was {:?})",
            peer, state.data_channel
        );
        state.data_channel = DataChannelState::Awaiting;
        state.data_generation = state.data_generation.wrapping_add(1);
    }

    /// The data connection bound under `generation` ended cleanly.
    pub async fn data_channel_closed(&self, peer: IpAddr, generation: u64) {
        self.finish_data_channel(peer, generation, DataChannelState::Closed)
            .await;
    }

    /// The data connection bound under `generation` failed with a transport error.
    pub async fn data_channel_failed(&self, peer: IpAddr, generation: u64) {
        self.finish_data_channel(peer, generation, DataChannelState::Error)
            .await;
    }

    async fn finish_data_channel(&self, peer: IpAddr, generation: u64, next: DataChannelState) {
        let mut peers = self.peers.lock().await;
        if let Some(state) = peers.get_mut(&key(peer)) {
            // A newer PASV owns the state now; leave it alone.
            if state.data_generation == generation
                && state.data_channel == DataChannelState::Established
            {
                state.data_channel = next;
            }
        }
    }

    /// The control connection is gone; the peer may start over.
    pub async fn release_control(&self, peer: IpAddr) {
        let mut peers = self.peers.lock().await;
        if let Some(state) = peers.get_mut(&key(peer)) {
            // generations keep counting so stale data connections stay stale
            *state = ClientConnectionState {
                data_generation: state.data_generation,
                ..ClientConnectionState::default()
            };
        }
    }
}

fn key(peer: IpAddr) -> IpAddr {
    peer.to_canonical()
}
