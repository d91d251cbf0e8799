//! Routing of operator replies to connections.
//!
//! Operator input is read by the dispatcher alone. A worker that has received
//! something asks for a reply and waits; typed replies go to the waiting
//! workers strictly in the order they asked.

use crate::Error;
use parley::{
    resources, screen::INVALID_COMMAND, Command, ConnectionId, Operator, Role, Screen, Session,
};
use std::{collections::VecDeque, net::SocketAddr};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub struct Request {
    pub id: ConnectionId,
    pub peer: SocketAddr,
    reply: oneshot::Sender<String>,
}

/// Handle workers use to ask the dispatcher for a reply.
#[derive(Debug, Clone)]
pub struct Replies {
    tx: mpsc::Sender<Request>,
}

impl Replies {
    /// `None` once the dispatcher is gone.
    pub async fn request(&self, id: ConnectionId, peer: SocketAddr) -> Option<String> {
        let (reply, rx) = oneshot::channel();
        self.tx.send(Request { id, peer, reply }).await.ok()?;
        rx.await.ok()
    }
}

#[derive(Debug)]
pub struct Dispatcher {
    requests: mpsc::Receiver<Request>,
    pending: VecDeque<Request>,
}

impl Dispatcher {
    /// `capacity` bounds requests in flight; a worker has at most one.
    pub fn new(capacity: usize) -> (Replies, Self) {
        let (tx, requests) = mpsc::channel(capacity);
        let dispatcher = Self {
            requests,
            pending: VecDeque::new(),
        };
        (Replies { tx }, dispatcher)
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    fn enqueue(&mut self, request: Request) {
        self.pending.push_back(request);
    }

    /// Hands `text` to the oldest request whose worker is still waiting.
    /// Gives the text back when nobody is.
    pub fn route(&mut self, mut text: String) -> Result<(ConnectionId, SocketAddr), String> {
        while let Some(Request { id, peer, reply }) = self.pending.pop_front() {
            match reply.send(text) {
                Ok(()) => return Ok((id, peer)),
                Err(returned) => {
                    tracing::debug!(%id, "Dropping stale reply request");
                    text = returned;
                }
            }
        }
        Err(text)
    }

    /// Owns operator input until the operator quits.
    ///
    /// Returns `Ok` on `quit NOW` or end of input, and the state error when the
    /// operator tries to start or connect again.
    pub async fn run(
        mut self,
        session: &Session,
        operator: &mut Operator,
        screen: &dyn Screen,
    ) -> Result<(), Error> {
        screen.prompt();
        loop {
            tokio::select! {
                biased;
                Some(request) = self.requests.recv() => {
                    screen.status(&format!("{} is waiting for a reply", request.peer));
                    self.enqueue(request);
                }
                line = operator.read_line() => {
                    let line = match line {
                        Some(line) => line,
                        None => return Ok(()),
                    };
                    match Command::parse(&line) {
                        Command::Quit => return Ok(()),
                        Command::StartServer(_) => session.request_role(Role::Server)?,
                        Command::Connect(_) => session.request_role(Role::Client)?,
                        Command::Help => screen.status(&resources::help(session.config())),
                        Command::Unrecognized if line.trim().is_empty() => {}
                        Command::Unrecognized => screen.error(INVALID_COMMAND),
                        command => {
                            if let Some(text) = command.payload() {
                                match self.route(text) {
                                    Ok((id, peer)) => tracing::debug!(%id, %peer, "Routed reply"),
                                    Err(_) => screen.error("No connection is waiting for a reply."),
                                }
                            }
                        }
                    }
                }
            }
            screen.prompt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peer(port: u16) -> SocketAddr {
        SocketAddr::from(([127, 0, 0, 1], port))
    }

    fn request(port: u16) -> (Request, oneshot::Receiver<String>) {
        let (reply, rx) = oneshot::channel();
        let request = Request {
            id: ConnectionId::new_v4(),
            peer: peer(port),
            reply,
        };
        (request, rx)
    }

    #[test]
    fn routes_in_arrival_order() {
        let (_replies, mut dispatcher) = Dispatcher::new(4);
        let (first, mut first_rx) = request(1);
        let (second, mut second_rx) = request(2);
        dispatcher.enqueue(first);
        dispatcher.enqueue(second);

        assert_eq!(dispatcher.route("a".into()).unwrap().1, peer(1));
        assert_eq!(dispatcher.route("b".into()).unwrap().1, peer(2));
        assert_eq!(first_rx.try_recv().unwrap(), "a");
        assert_eq!(second_rx.try_recv().unwrap(), "b");
        assert_eq!(dispatcher.pending(), 0);
    }

    #[test]
    fn skips_abandoned_requests() {
        let (_replies, mut dispatcher) = Dispatcher::new(4);
        let (gone, gone_rx) = request(1);
        let (alive, mut alive_rx) = request(2);
        dispatcher.enqueue(gone);
        dispatcher.enqueue(alive);
        drop(gone_rx);

        assert_eq!(dispatcher.route("hi".into()).unwrap().1, peer(2));
        assert_eq!(alive_rx.try_recv().unwrap(), "hi");
    }

    #[test]
    fn nobody_waiting() {
        let (_replies, mut dispatcher) = Dispatcher::new(4);
        assert_eq!(dispatcher.route("hi".into()).unwrap_err(), "hi");
    }

    #[tokio::test]
    async fn request_is_answered() {
        let (replies, mut dispatcher) = Dispatcher::new(4);
        let id = ConnectionId::new_v4();
        let waiting = tokio::spawn(async move { replies.request(id, peer(7)).await });
        let request = dispatcher.requests.recv().await.unwrap();
        assert_eq!(request.id, id);
        dispatcher.enqueue(request);
        dispatcher.route("there".into()).unwrap();
        assert_eq!(waiting.await.unwrap().as_deref(), Some("there"));
    }

    #[tokio::test]
    async fn request_without_dispatcher() {
        let (replies, dispatcher) = Dispatcher::new(4);
        drop(dispatcher);
        assert_eq!(replies.request(ConnectionId::new_v4(), peer(1)).await, None);
    }
}
