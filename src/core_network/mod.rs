pub mod connection_table;
pub mod control_channel;
pub mod data_channel;
pub mod demux;
pub mod error;
pub mod network;
pub mod pasv;
pub mod port;
pub mod replay;
pub mod sniffer;
