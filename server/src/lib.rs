//! Server side of a session.
//!
//! An accept task puts every new connection on a bounded queue, a fixed pool
//! of workers takes connections off it, and the dispatcher running on the
//! caller's task reads operator input and routes replies back to workers.
//! A failing connection is dropped on its own; the rest carry on.

mod connection;
mod dispatch;
mod pool;

pub use connection::{Connection, Store};
pub use dispatch::{Dispatcher, Replies};

use parley::{Config, Endpoint, Operator, Role, Screen, Session};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::{
    net::TcpListener,
    sync::{mpsc, Mutex},
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

/// Fixes the session as a server and binds `endpoint`.
pub async fn start(session: &mut Session, endpoint: &Endpoint) -> Result<Server, Error> {
    session.assume(Role::Server)?;
    Server::bind(endpoint, session.config()).await
}

pub struct Server {
    listener: TcpListener,
    workers: usize,
    queue: usize,
    connections: Arc<Store>,
}

impl Server {
    #[tracing::instrument(err, skip(config))]
    pub async fn bind(endpoint: &Endpoint, config: &Config) -> Result<Self, Error> {
        let listener = TcpListener::bind(endpoint.socket()?).await?;
        tracing::info!("Listening on {}", listener.local_addr()?);
        Ok(Self {
            listener,
            workers: config.workers,
            queue: config.queue,
            connections: Arc::new(Store::default()),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, Error> {
        Ok(self.listener.local_addr()?)
    }

    /// Live view of the connections currently accepted.
    pub fn connections(&self) -> Arc<Store> {
        self.connections.clone()
    }

    /// Serves until the operator quits. Returns the error that ended the
    /// session otherwise.
    pub async fn run(
        self,
        session: &Session,
        operator: &mut Operator,
        screen: Arc<dyn Screen>,
    ) -> Result<(), Error> {
        let (queue_tx, queue_rx) = mpsc::channel(self.queue);
        let (replies, dispatcher) = Dispatcher::new(self.workers);
        let workers = pool::spawn(
            self.workers,
            Arc::new(Mutex::new(queue_rx)),
            pool::Worker {
                replies,
                connections: self.connections.clone(),
                screen: screen.clone(),
            },
        );
        let accept = tokio::spawn(accept(self.listener, queue_tx, self.connections));

        let result = dispatcher.run(session, operator, &*screen).await;

        accept.abort();
        for worker in workers {
            worker.abort();
        }
        result
    }
}

async fn accept(listener: TcpListener, queue: mpsc::Sender<Connection>, connections: Arc<Store>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(err) => {
                tracing::warn!(%err, "Failed to accept connection");
                tokio::time::sleep(Duration::from_millis(100)).await;
                continue;
            }
        };
        let connection = Connection::new(stream, peer);
        connections.insert(connection.id, peer);
        tracing::info!(id = %connection.id, %peer, "Accepted connection");
        if queue.send(connection).await.is_err() {
            return;
        }
    }
}
