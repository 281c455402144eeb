// HTTP(S) side of the shared port: serves DTDs and records requests.

pub mod forwarder;
pub mod request;

pub use forwarder::HttpForwarder;
