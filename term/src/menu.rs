use parley::{
    resources, screen::INVALID_COMMAND, Command, Endpoint, Operator, Screen, Session, StateError,
};
use std::sync::Arc;

/// Conditions that end the process with a failure status.
#[derive(Debug, thiserror::Error)]
pub enum Fatal {
    #[error("{0}")]
    State(#[from] StateError),
    #[error("cannot start server on {endpoint}: {source}")]
    Bind {
        endpoint: Endpoint,
        source: parley_server::Error,
    },
    #[error("cannot connect to {endpoint}: {source}")]
    Connect {
        endpoint: Endpoint,
        source: parley_client::Error,
    },
    #[error("Server disconnected: {0}")]
    Disconnected(parley_client::Error),
    #[error("Shutdown Server: {0}")]
    Server(parley_server::Error),
}

impl From<parley_client::Error> for Fatal {
    fn from(err: parley_client::Error) -> Self {
        match err {
            parley_client::Error::State(err) => Fatal::State(err),
            err => Fatal::Disconnected(err),
        }
    }
}

impl From<parley_server::Error> for Fatal {
    fn from(err: parley_server::Error) -> Self {
        match err {
            parley_server::Error::State(err) => Fatal::State(err),
            err => Fatal::Server(err),
        }
    }
}

/// Reads commands until the operator picks a role, then hands operator input
/// over to the client or server for the rest of the process.
pub struct Menu {
    session: Session,
    operator: Operator,
    screen: Arc<dyn Screen>,
}

impl Menu {
    pub fn new(session: Session, operator: Operator, screen: Arc<dyn Screen>) -> Self {
        Self {
            session,
            operator,
            screen,
        }
    }

    pub async fn run(mut self) -> Result<(), Fatal> {
        self.screen.status("Server Manager");
        self.screen
            .status("Start a server or connect to a server? Type help for commands.");
        loop {
            self.screen.prompt();
            let line = match self.operator.read_line().await {
                Some(line) => line,
                None => return Ok(()),
            };
            if line.trim().is_empty() {
                continue;
            }

            match Command::parse(&line) {
                Command::Quit => {
                    self.screen.status("Program will now exit.");
                    return Ok(());
                }
                Command::StartServer(endpoint) => return self.serve(endpoint).await,
                Command::Connect(endpoint) => return self.join(endpoint).await,
                Command::Help => self
                    .screen
                    .status(&resources::help(self.session.config())),
                Command::Unrecognized => self.screen.error(INVALID_COMMAND),
                command => {
                    if let Some(text) = command.payload() {
                        self.screen.status(&text);
                    }
                }
            }
        }
    }

    #[tracing::instrument(skip(self))]
    async fn serve(mut self, endpoint: Endpoint) -> Result<(), Fatal> {
        let server = parley_server::start(&mut self.session, &endpoint)
            .await
            .map_err(|source| match source {
                parley_server::Error::State(err) => Fatal::State(err),
                source => Fatal::Bind {
                    endpoint: endpoint.clone(),
                    source,
                },
            })?;
        self.screen.status("Created Server");
        server
            .run(&self.session, &mut self.operator, self.screen.clone())
            .await?;
        self.screen.status("Program will now exit.");
        Ok(())
    }

    #[tracing::instrument(skip(self))]
    async fn join(mut self, endpoint: Endpoint) -> Result<(), Fatal> {
        let connection = parley_client::connect(&mut self.session, &endpoint)
            .await
            .map_err(|source| match source {
                parley_client::Error::State(err) => Fatal::State(err),
                source => Fatal::Connect {
                    endpoint: endpoint.clone(),
                    source,
                },
            })?;
        self.screen.status("Created client");
        parley_client::run(&self.session, connection, &mut self.operator, &*self.screen).await?;
        self.screen.status("Program will now exit.");
        Ok(())
    }
}
