//! What goes over the stream between peers.
//!
//! A message is plain text with a human-readable sender prefix. There is no
//! framing: a receiver reads at most [`MAX_CHUNK`] bytes at a time and treats
//! whatever one read returns as one message, so a long send can show up as
//! several messages and nothing is reassembled.

use std::net::SocketAddr;

pub const MAX_CHUNK: usize = 1024;

/// Prefix for messages a client sends to its server.
pub fn from_client(addr: &SocketAddr, text: &str) -> String {
    format!("Message from {} --> {}", addr, text)
}

/// Prefix for replies the server sends back.
pub fn from_server(text: &str) -> String {
    format!("Message from server --> {}", text)
}

/// Text of one received chunk. A multi-byte character cut by a chunk boundary
/// is replaced rather than dropped.
pub fn decode(chunk: &[u8]) -> String {
    String::from_utf8_lossy(chunk).into_owned()
}
