//! Client side of a session: one stream to one server, driven by the
//! operator's commands.

mod connection;

pub use connection::{Connection, Error};

use parley::{
    resources, screen::INVALID_COMMAND, Command, Endpoint, Operator, Role, Screen, Session,
};

/// Fixes the session as a client and opens the stream to `endpoint`.
pub async fn connect(session: &mut Session, endpoint: &Endpoint) -> Result<Connection, Error> {
    session.assume(Role::Client)?;
    Connection::connect(endpoint).await
}

/// Send, wait for one reply, repeat, until the operator quits.
///
/// Returns `Ok` on `quit NOW` or end of operator input. Any I/O failure and
/// any attempt to start or connect again is returned as an error.
pub async fn run(
    session: &Session,
    mut connection: Connection,
    operator: &mut Operator,
    screen: &dyn Screen,
) -> Result<(), Error> {
    loop {
        screen.prompt();
        let line = match operator.read_line().await {
            Some(line) => line,
            None => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        match Command::parse(&line) {
            Command::Quit => break,
            Command::StartServer(_) => session.request_role(Role::Server)?,
            Command::Connect(_) => session.request_role(Role::Client)?,
            Command::Help => screen.status(&resources::help(session.config())),
            Command::Unrecognized => screen.error(INVALID_COMMAND),
            command => {
                if let Some(text) = command.payload() {
                    connection.send_message(&text).await?;
                    screen.status("Waiting to receive");
                    let reply = connection.receive_message().await?;
                    screen.incoming(&reply);
                }
            }
        }
    }
    connection.close().await
}
