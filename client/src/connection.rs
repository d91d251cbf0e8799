use parley::{wire, ConnectionId, Endpoint};
use std::net::SocketAddr;
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::TcpStream,
};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    IO(#[from] std::io::Error),
    #[error("connection closed by peer")]
    Closed,
    #[error("session: {0}")]
    State(#[from] parley::StateError),
}

async fn send(stream: &mut TcpStream, text: &str) -> Result<(), Error> {
    tracing::debug!("Sending {} bytes", text.len());
    stream.write_all(text.as_bytes()).await?;
    Ok(())
}

async fn recv(stream: &mut TcpStream, buf: &mut [u8]) -> Result<String, Error> {
    let n = stream.read(buf).await?;
    if n == 0 {
        return Err(Error::Closed);
    }
    tracing::debug!("Received {} bytes", n);
    Ok(wire::decode(&buf[..n]))
}

/// The one stream a client holds to its server.
#[derive(Debug)]
pub struct Connection {
    pub id: ConnectionId,
    stream: TcpStream,
    local: SocketAddr,
    buf: Vec<u8>,
}

impl Connection {
    #[tracing::instrument(err)]
    pub async fn connect(endpoint: &Endpoint) -> Result<Self, Error> {
        let stream = TcpStream::connect(endpoint.socket()?).await?;
        let local = stream.local_addr()?;
        let id = ConnectionId::new_v4();
        tracing::info!(%id, %local, "Connected");
        Ok(Self {
            id,
            stream,
            local,
            buf: vec![0; wire::MAX_CHUNK],
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local
    }

    pub async fn send_message(&mut self, text: &str) -> Result<(), Error> {
        let message = wire::from_client(&self.local, text);
        send(&mut self.stream, &message).await
    }

    /// Waits for one chunk of at most [`wire::MAX_CHUNK`] bytes.
    pub async fn receive_message(&mut self) -> Result<String, Error> {
        recv(&mut self.stream, &mut self.buf).await
    }

    pub async fn close(mut self) -> Result<(), Error> {
        self.stream.shutdown().await?;
        tracing::info!(id = %self.id, "Closed connection");
        Ok(())
    }
}
