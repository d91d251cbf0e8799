use crate::{
    connection::{Connection, Store},
    dispatch::Replies,
    Error,
};
use parley::Screen;
use std::sync::Arc;
use tokio::{
    sync::{mpsc, Mutex},
    task::JoinHandle,
};

/// Accepted connections waiting for a free worker.
pub type Queue = Arc<Mutex<mpsc::Receiver<Connection>>>;

#[derive(Clone)]
pub struct Worker {
    pub replies: Replies,
    pub connections: Arc<Store>,
    pub screen: Arc<dyn Screen>,
}

/// Starts `size` workers sharing `queue`.
pub fn spawn(size: usize, queue: Queue, worker: Worker) -> Vec<JoinHandle<()>> {
    (0..size)
        .map(|n| {
            let queue = queue.clone();
            let worker = worker.clone();
            tokio::spawn(async move { worker.run(n, queue).await })
        })
        .collect()
}

impl Worker {
    async fn run(self, n: usize, queue: Queue) {
        loop {
            let next = queue.lock().await.recv().await;
            let connection = match next {
                Some(connection) => connection,
                None => {
                    tracing::debug!(worker = n, "Queue closed");
                    return;
                }
            };
            let (id, peer) = (connection.id, connection.peer);
            tracing::info!(worker = n, %id, %peer, "Serving connection");

            match self.serve(connection).await {
                Ok(()) => tracing::info!(%id, "Connection finished"),
                Err(err) => {
                    tracing::warn!(%id, %err, "Connection failed");
                    self.screen.error(&format!("{} disconnected: {}", peer, err));
                }
            }
            self.connections.remove(&id);
        }
    }

    /// Receive, wait for the operator's reply, send it, repeat.
    ///
    /// A peer that closes while its reply is pending withdraws the request, so
    /// the dispatcher passes the next reply on to someone still listening.
    #[tracing::instrument(skip(self, connection), fields(id = %connection.id))]
    async fn serve(&self, mut connection: Connection) -> Result<(), Error> {
        self.screen.status(&format!("Connected to {}", connection.peer));
        loop {
            let text = connection.receive().await?;
            self.screen.incoming(&text);
            let reply = tokio::select! {
                reply = self.replies.request(connection.id, connection.peer) => match reply {
                    Some(reply) => reply,
                    None => return Ok(()),
                },
                err = connection.closed() => return Err(err),
            };
            connection.send(&reply).await?;
        }
    }
}
