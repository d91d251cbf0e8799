use crate::Error;
use dashmap::DashMap;
use parley::{wire, ConnectionId};
use std::net::SocketAddr;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

/// Connections accepted and not yet finished, by id.
pub type Store = DashMap<ConnectionId, SocketAddr>;

/// One accepted stream.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    pub peer: SocketAddr,
    stream: TcpStream,
    buf: Vec<u8>,
}

impl Connection {
    pub fn new(stream: TcpStream, peer: SocketAddr) -> Self {
        Self {
            id: ConnectionId::new_v4(),
            peer,
            stream,
            buf: vec![0; wire::MAX_CHUNK],
        }
    }

    /// Waits for one chunk of at most [`wire::MAX_CHUNK`] bytes.
    pub async fn receive(&mut self) -> Result<String, Error> {
        let n = self.stream.read(&mut self.buf).await?;
        if n == 0 {
            return Err(Error::Closed);
        }
        tracing::debug!(id = %self.id, "Received {} bytes", n);
        Ok(wire::decode(&self.buf[..n]))
    }

    /// Resolves once the peer has gone away with nothing left unread.
    ///
    /// Never resolves while unread data is waiting; that is picked up by the
    /// next [`receive`](Self::receive).
    pub async fn closed(&self) -> Error {
        let mut byte = [0; 1];
        match self.stream.peek(&mut byte).await {
            Ok(0) => Error::Closed,
            Ok(_) => std::future::pending().await,
            Err(err) => err.into(),
        }
    }

    pub async fn send(&mut self, text: &str) -> Result<(), Error> {
        let message = wire::from_server(text);
        self.stream.write_all(message.as_bytes()).await?;
        tracing::debug!(id = %self.id, "Sent {} bytes", message.len());
        Ok(())
    }
}
